use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::catalog_fetch;
use crate::config::{AppConfig, CatalogSource};
use crate::demo_feed;
use crate::state::{Delta, ProviderCommand};

/// Runs catalog fetches on a worker thread. Each `FetchCatalog` command is
/// answered with exactly one `SetCatalog` or `CatalogFailed` delta.
pub fn spawn_catalog_provider(
    config: AppConfig,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchCatalog => {
                    let delta = match config.source {
                        CatalogSource::Demo => {
                            let players = demo_feed::generate_catalog(&mut rng, config.demo_players);
                            let _ = tx.send(Delta::Log(format!(
                                "[INFO] Demo catalog generated ({} players)",
                                players.len()
                            )));
                            Delta::SetCatalog(players)
                        }
                        CatalogSource::Api => fetch_delta(&config.api_url, &tx),
                    };
                    if tx.send(delta).is_err() {
                        return;
                    }
                }
            }
        }
    })
}

fn fetch_delta(url: &str, tx: &Sender<Delta>) -> Delta {
    match catalog_fetch::fetch_catalog(url) {
        Ok(fetched) => {
            let note = if fetched.not_modified {
                " (not modified)"
            } else {
                ""
            };
            let _ = tx.send(Delta::Log(format!(
                "[INFO] Catalog fetched: {} players{note}",
                fetched.players.len()
            )));
            Delta::SetCatalog(fetched.players)
        }
        Err(err) => Delta::CatalogFailed(format!("{err:#}")),
    }
}
