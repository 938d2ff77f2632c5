// src/workspace.rs
//! The active analysis root.
//!
//! A [`Workspace`] owns the current [`Snapshot`] behind a generation
//! pointer. Switching roots or refreshing builds a complete new snapshot
//! first and only then swaps the pointer, so readers never see a half-built
//! state and snapshots already handed out stay valid.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::Result;
use crate::metrics::Snapshot;

#[derive(Debug)]
pub struct Workspace {
    current: RwLock<Arc<Snapshot>>,
}

impl Workspace {
    /// Preprocesses `root` with the config found there.
    ///
    /// # Errors
    /// Returns error if the config is malformed or the root cannot be walked.
    pub fn open(root: &Path) -> Result<Self> {
        let config = Config::load(root)?;
        Self::open_with(root, &config)
    }

    /// Preprocesses `root` with an explicit config.
    ///
    /// # Errors
    /// Returns error if the root cannot be walked.
    pub fn open_with(root: &Path, config: &Config) -> Result<Self> {
        let snapshot = Snapshot::build(root, config)?;
        Ok(Self {
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// The current snapshot. Stays consistent even if the workspace switches.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read())
    }

    /// Makes `root` the active root, loading its config.
    ///
    /// On error the previous snapshot stays active.
    ///
    /// # Errors
    /// Returns error if the new root cannot be preprocessed.
    pub fn switch(&self, root: &Path) -> Result<Arc<Snapshot>> {
        let config = Config::load(root)?;
        self.switch_with(root, &config)
    }

    /// Makes `root` the active root with an explicit config.
    ///
    /// # Errors
    /// Returns error if the new root cannot be preprocessed.
    pub fn switch_with(&self, root: &Path, config: &Config) -> Result<Arc<Snapshot>> {
        let next = Arc::new(Snapshot::build(root, config)?);
        *self.current.write() = Arc::clone(&next);
        tracing::info!(root = %next.root().display(), "workspace switched");
        Ok(next)
    }

    /// Re-scans the active root with its current config.
    ///
    /// # Errors
    /// Returns error if the root can no longer be preprocessed.
    pub fn refresh(&self) -> Result<Arc<Snapshot>> {
        let current = self.snapshot();
        self.switch_with(current.root(), current.config())
    }
}
