// Application state module
// Everything a connection task needs, shared read-only behind an Arc

use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::Config;
use crate::routing::Router;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Route table, frozen at startup
    pub router: Router,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub const fn new(config: Config, router: Router) -> Self {
        Self {
            config,
            router,
            active_connections: AtomicUsize::new(0),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }
}
