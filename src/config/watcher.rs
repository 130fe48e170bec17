//! Build output watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_route_table;
use crate::observability::metrics::record_reload;
use crate::routing::{RouteObserver, RouteTable};

/// Watches the build output and compiles a fresh route table on change.
pub struct TableWatcher {
    path: PathBuf,
    observer: Arc<dyn RouteObserver>,
    update_tx: mpsc::UnboundedSender<Arc<RouteTable>>,
}

impl TableWatcher {
    /// Create a new watcher.
    ///
    /// Returns the watcher and a receiver for compiled tables.
    pub fn new(
        path: &Path,
        observer: Arc<dyn RouteObserver>,
    ) -> (Self, mpsc::UnboundedReceiver<Arc<RouteTable>>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                observer,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned handle must be kept alive for the watch to continue.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();
        let observer = self.observer.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::info!("Build output change detected, recompiling routes...");
                    match load_route_table(&path) {
                        Ok(table) => {
                            let _ = tx.send(Arc::new(table.with_observer(observer.clone())));
                        }
                        Err(e) => {
                            record_reload(false);
                            tracing::error!(
                                "Failed to reload routes: {}. Keeping current table.",
                                e
                            );
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Route watcher started");
        Ok(watcher)
    }
}
