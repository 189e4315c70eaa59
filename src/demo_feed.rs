use rand::Rng;
use rand::seq::SliceRandom;

use crate::state::Player;

const DEMO_TEAMS: &[&str] = &[
    "Sentinels",
    "Fnatic",
    "LOUD",
    "Paper Rex",
    "DRX",
    "Team Heretics",
    "G2 Esports",
    "EDward Gaming",
    "Leviatán",
    "NAVI",
];

const DEMO_HANDLES: &[&str] = &[
    "ace", "blitz", "cipher", "drift", "echo", "flick", "ghost", "halo", "ion", "jolt", "kite",
    "lumen", "mako", "nova", "onyx", "pulse", "quill", "rift", "sable", "tempo",
];

const DEMO_DPIS: &[u32] = &[400, 400, 800, 800, 800, 1600, 1200, 3200];

pub fn generate_catalog(rng: &mut impl Rng, count: usize) -> Vec<Player> {
    (0..count)
        .map(|idx| {
            let handle = DEMO_HANDLES.choose(rng).copied().unwrap_or("player");
            let team = DEMO_TEAMS.choose(rng).copied().unwrap_or("Free Agent");
            let dpi = DEMO_DPIS.choose(rng).copied().unwrap_or(800);
            // Most pros sit between 200 and 400 eDPI.
            let target_edpi = rng.gen_range(180.0..420.0);
            let sens = round3(target_edpi / f64::from(dpi)).max(0.001);
            Player::new(format!("{handle}{idx}"), team, sens, dpi)
        })
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn generated_players_are_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        let players = generate_catalog(&mut rng, 50);
        assert_eq!(players.len(), 50);
        for p in &players {
            assert!(p.sens > 0.0);
            assert!(p.dpi > 0);
            assert!((p.edpi - p.sens * f64::from(p.dpi)).abs() < 1e-9);
        }
    }
}
