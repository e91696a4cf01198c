use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::config::Config;
use crate::routes::Router;
use crate::session::SessionStore;
use crate::store::FileStore;

/// Optional per-operation socket deadlines.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timeouts {
    pub read: Option<Duration>,
    pub write: Option<Duration>,
}

/// State shared by every connection task.
#[derive(Debug)]
pub struct AppState {
    pub router: Router,
    /// `None` when session support is off.
    pub sessions: Option<Arc<SessionStore>>,
    pub timeouts: Timeouts,
}

impl AppState {
    pub fn new(router: Router, sessions: Option<Arc<SessionStore>>, timeouts: Timeouts) -> Self {
        Self {
            router,
            sessions,
            timeouts,
        }
    }

    /// Validates `cfg`, creates the files directory if needed and wires up
    /// the stores.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        cfg.validate()?;

        let root = cfg.files_root();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("failed to create files directory {}", root.display()))?;

        let files = FileStore::new(&root)
            .with_context(|| format!("failed to resolve files directory {}", root.display()))?;

        let sessions = cfg
            .session
            .enabled
            .then(|| Arc::new(SessionStore::new(cfg.idle_timeout())));

        let timeouts = Timeouts {
            read: cfg.read_timeout(),
            write: cfg.write_timeout(),
        };

        Ok(Self::new(Router::new(files), sessions, timeouts))
    }
}
