use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use prosens_terminal::catalog_fetch::{self, parse_catalog_json};
use prosens_terminal::config::{AppConfig, CatalogSource};
use prosens_terminal::convert::{format_sens, profile_sensitivities};
use prosens_terminal::demo_feed;
use prosens_terminal::similar::{SIMILAR_LIMIT, find_similar};
use prosens_terminal::state::Player;
use prosens_terminal::stats::summarize;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = AppConfig::from_env();

    let catalog = load_catalog(&config)?;
    if catalog.is_empty() {
        return Err(anyhow!("catalog is empty"));
    }
    let as_json = has_flag("--json");

    if let Some(raw) = arg_value("--edpi") {
        let target = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .with_context(|| format!("invalid --edpi value: {raw}"))?;
        let closest = find_similar(&catalog, target, SIMILAR_LIMIT);
        if as_json {
            println!("{}", serde_json::to_string_pretty(&closest)?);
            return Ok(());
        }
        println!("Closest {} pros to eDPI {target:.1}", closest.len());
        for player in &closest {
            println!(
                "  {:<20} {:<16} {:>7} @ {:>5}  eDPI {:>7.1}  (Δ {:.1})",
                player.name,
                player.team,
                format_sens(player.sens),
                player.dpi,
                player.edpi,
                (player.edpi - target).abs()
            );
        }
        return Ok(());
    }

    if let Some(name) = arg_value("--player") {
        let needle = name.trim().to_lowercase();
        let player = catalog
            .iter()
            .find(|p| p.name.to_lowercase() == needle)
            .with_context(|| format!("no player named {name}"))?;
        if as_json {
            println!("{}", serde_json::to_string_pretty(player)?);
            return Ok(());
        }
        print_profile(player);
        return Ok(());
    }

    print_summary(&catalog);
    Ok(())
}

fn load_catalog(config: &AppConfig) -> Result<Vec<Player>> {
    if let Some(path) = arg_value("--file").map(PathBuf::from) {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("unable to read {}", path.display()))?;
        return parse_catalog_json(&raw);
    }
    match config.source {
        CatalogSource::Demo => Ok(demo_feed::generate_catalog(
            &mut rand::thread_rng(),
            config.demo_players,
        )),
        CatalogSource::Api => Ok(catalog_fetch::fetch_catalog(&config.api_url)?.players),
    }
}

fn print_summary(catalog: &[Player]) {
    let Some(summary) = summarize(catalog) else {
        return;
    };
    println!("Catalog summary");
    println!("Players: {}", summary.players);
    println!(
        "eDPI mean={:.1} median={:.1}",
        summary.mean_edpi, summary.median_edpi
    );
    println!(
        "Lowest: {} ({}) {:.1}",
        summary.lowest.name, summary.lowest.team, summary.lowest.edpi
    );
    println!(
        "Highest: {} ({}) {:.1}",
        summary.highest.name, summary.highest.team, summary.highest.edpi
    );
    println!("Teams: {}", summary.teams.len());
    for team in &summary.teams {
        println!(
            "  {:<20} n={:<3} mean={:>7.1} median={:>7.1} min={} max={}",
            team.team,
            team.players,
            team.mean_edpi,
            team.median_edpi,
            team.min.name,
            team.max.name
        );
    }
}

fn print_profile(player: &Player) {
    println!("{} ({})", player.name, player.team);
    println!(
        "Sens {} @ {} DPI, eDPI {:.1}",
        format_sens(player.sens),
        player.dpi,
        player.edpi
    );
    for (dpi, sens) in profile_sensitivities(player.edpi) {
        println!("  {dpi:>5} DPI -> {}", format_sens(sens));
    }
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}

fn arg_value(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.clone());
        }
    }
    None
}
