use crate::state::Player;

pub const SIMILAR_LIMIT: usize = 10;

/// The `limit` players closest to `target_edpi`, nearest first.
///
/// The sort is stable, so players at the same distance keep catalog order.
pub fn find_similar(catalog: &[Player], target_edpi: f64, limit: usize) -> Vec<Player> {
    let mut ranked: Vec<(f64, &Player)> = catalog
        .iter()
        .map(|player| ((player.edpi - target_edpi).abs(), player))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked
        .into_iter()
        .take(limit)
        .map(|(_, player)| player.clone())
        .collect()
}
