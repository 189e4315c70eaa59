use std::collections::HashMap;

use crate::state::Player;

#[derive(Debug, Clone, PartialEq)]
pub struct TeamSummary {
    pub team: String,
    pub players: usize,
    pub min: Player,
    pub max: Player,
    pub mean_edpi: f64,
    pub median_edpi: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSummary {
    pub players: usize,
    /// Ordered by mean eDPI, highest first.
    pub teams: Vec<TeamSummary>,
    pub lowest: Player,
    pub highest: Player,
    pub mean_edpi: f64,
    pub median_edpi: f64,
}

pub fn summarize(catalog: &[Player]) -> Option<CatalogSummary> {
    let lowest = min_by_edpi(catalog.iter())?.clone();
    let highest = max_by_edpi(catalog.iter())?.clone();

    // Teams in first-seen order so equal means stay deterministic.
    let mut order: Vec<&str> = Vec::new();
    let mut by_team: HashMap<&str, Vec<&Player>> = HashMap::new();
    for player in catalog {
        let entry = by_team.entry(player.team.as_str()).or_default();
        if entry.is_empty() {
            order.push(player.team.as_str());
        }
        entry.push(player);
    }

    let mut teams = Vec::with_capacity(order.len());
    for team in order {
        let Some(members) = by_team.get(team) else {
            continue;
        };
        let (Some(min), Some(max)) = (
            min_by_edpi(members.iter().copied()),
            max_by_edpi(members.iter().copied()),
        ) else {
            continue;
        };
        let values: Vec<f64> = members.iter().map(|p| p.edpi).collect();
        teams.push(TeamSummary {
            team: team.to_string(),
            players: members.len(),
            min: min.clone(),
            max: max.clone(),
            mean_edpi: mean(&values),
            median_edpi: median(values),
        });
    }
    teams.sort_by(|a, b| b.mean_edpi.total_cmp(&a.mean_edpi));

    let values: Vec<f64> = catalog.iter().map(|p| p.edpi).collect();
    Some(CatalogSummary {
        players: catalog.len(),
        teams,
        lowest,
        highest,
        mean_edpi: mean(&values),
        median_edpi: median(values),
    })
}

fn min_by_edpi<'a>(players: impl Iterator<Item = &'a Player>) -> Option<&'a Player> {
    // First player wins ties.
    players.fold(None, |best: Option<&Player>, p| match best {
        Some(b) if b.edpi <= p.edpi => Some(b),
        _ => Some(p),
    })
}

fn max_by_edpi<'a>(players: impl Iterator<Item = &'a Player>) -> Option<&'a Player> {
    players.fold(None, |best: Option<&Player>, p| match best {
        Some(b) if b.edpi >= p.edpi => Some(b),
        _ => Some(p),
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
