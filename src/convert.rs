use std::fmt;

/// DPI values the profile pane lists a pro's sensitivity at.
pub const PROFILE_DPIS: [u32; 3] = [400, 800, 1600];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConvertError {
    InvalidDpi(f64),
    InvalidSens(f64),
    NonFinite,
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::InvalidDpi(v) => write!(f, "dpi must be a positive number (got {v})"),
            ConvertError::InvalidSens(v) => {
                write!(f, "sensitivity must be a positive number (got {v})")
            }
            ConvertError::NonFinite => write!(f, "conversion produced a non-finite value"),
        }
    }
}

impl std::error::Error for ConvertError {}

pub fn edpi(sens: f64, dpi: f64) -> f64 {
    sens * dpi
}

/// Sensitivity that keeps the same eDPI when moving from `source_dpi` to `target_dpi`.
pub fn convert_sensitivity(
    source_dpi: f64,
    source_sens: f64,
    target_dpi: f64,
) -> Result<f64, ConvertError> {
    if !is_positive(source_dpi) {
        return Err(ConvertError::InvalidDpi(source_dpi));
    }
    if !is_positive(target_dpi) {
        return Err(ConvertError::InvalidDpi(target_dpi));
    }
    if !is_positive(source_sens) {
        return Err(ConvertError::InvalidSens(source_sens));
    }
    let result = (source_dpi * source_sens) / target_dpi;
    if !result.is_finite() {
        return Err(ConvertError::NonFinite);
    }
    Ok(result)
}

pub fn parse_positive(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| is_positive(*v))
}

pub fn profile_sensitivities(edpi: f64) -> Vec<(u32, f64)> {
    PROFILE_DPIS
        .iter()
        .map(|dpi| (*dpi, edpi / f64::from(*dpi)))
        .collect()
}

pub fn format_sens(value: f64) -> String {
    format!("{value:.3}")
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
