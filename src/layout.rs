use std::fmt;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const PROFILE_WIDTH: u16 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRegions {
    pub input: Rect,
    pub list: Rect,
    pub profile: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarRegions {
    pub sens_input: Rect,
    pub dpi_input: Rect,
    pub list: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvancedRegions {
    pub sens_input: Rect,
    pub target_input: Rect,
    pub button: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertRegions {
    pub dpi_input: Rect,
    pub pro_search: Rect,
    pub result: Rect,
    pub toggle: Rect,
    pub advanced: Option<AdvancedRegions>,
    pub list: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub header: Rect,
    pub body: Rect,
    pub console: Rect,
    pub footer: Rect,
    pub search: SearchRegions,
    pub similar: SimilarRegions,
    pub convert: ConvertRegions,
}

pub fn compute(area: Rect, advanced_open: bool) -> Regions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(area);
    let body = rows[1];

    Regions {
        header: rows[0],
        body,
        console: rows[2],
        footer: rows[3],
        search: search_regions(body),
        similar: similar_regions(body),
        convert: convert_regions(body, advanced_open),
    }
}

fn search_regions(body: Rect) -> SearchRegions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(body);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(24), Constraint::Length(PROFILE_WIDTH)])
        .split(rows[1]);
    SearchRegions {
        input: rows[0],
        list: cols[0],
        profile: cols[1],
    }
}

fn similar_regions(body: Rect) -> SimilarRegions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(body);
    let form = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    SimilarRegions {
        sens_input: form[0],
        dpi_input: form[1],
        list: rows[1],
    }
}

fn convert_regions(body: Rect, advanced_open: bool) -> ConvertRegions {
    let advanced_height = if advanced_open { 3 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(advanced_height),
            Constraint::Min(1),
        ])
        .split(body);
    let form = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);
    let advanced = advanced_open.then(|| {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(40),
                Constraint::Percentage(20),
            ])
            .split(rows[3]);
        AdvancedRegions {
            sens_input: cols[0],
            target_input: cols[1],
            button: cols[2],
        }
    });
    ConvertRegions {
        dpi_input: form[0],
        pro_search: form[1],
        result: rows[1],
        toggle: rows[2],
        advanced,
        list: rows[4],
    }
}

pub fn inner_height(rect: Rect) -> usize {
    rect.height.saturating_sub(2) as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRegions(pub Vec<&'static str>);

impl fmt::Display for MissingRegions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl std::error::Error for MissingRegions {}

/// Every region the UI needs in order to be interactive. Bordered regions
/// must have at least one inner row and column.
pub fn validate(area: Rect) -> Result<Regions, MissingRegions> {
    let regions = compute(area, false);
    let bordered = [
        ("search input", regions.search.input),
        ("browse list", regions.search.list),
        ("similar sensitivity input", regions.similar.sens_input),
        ("similar dpi input", regions.similar.dpi_input),
        ("similar list", regions.similar.list),
        ("your dpi input", regions.convert.dpi_input),
        ("pro search", regions.convert.pro_search),
        ("conversion result", regions.convert.result),
        ("picker list", regions.convert.list),
        ("console", regions.console),
    ];
    let mut missing: Vec<&'static str> = bordered
        .into_iter()
        .filter(|(_, rect)| rect.width < 3 || rect.height < 3)
        .map(|(name, _)| name)
        .collect();
    if regions.convert.toggle.width == 0 || regions.convert.toggle.height == 0 {
        missing.push("advanced toggle");
    }
    if missing.is_empty() {
        Ok(regions)
    } else {
        Err(MissingRegions(missing))
    }
}
