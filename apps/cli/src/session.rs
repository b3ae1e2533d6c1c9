//! # Session File
//!
//! The recorded sign-in state: a small JSON file in the data directory.
//!
//! ## What a Session Is (and Isn't)
//! A session records WHICH owner the user signed in as; it is not a
//! credential check. While the file exists, record operations route to the
//! authenticated scope for that owner. No file (or an unreadable one) means
//! offline mode.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tillbox_core::StorageMode;

/// On-disk session shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    owner_id: String,
    signed_in_at: DateTime<Utc>,
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a session store using `session.json` in the given directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        SessionStore {
            path: data_dir.as_ref().join("session.json"),
        }
    }

    /// The storage mode implied by the current session state.
    ///
    /// Missing or unreadable session files mean offline; an unreadable file
    /// logs a warning but never blocks the tool.
    pub fn current_mode(&self) -> StorageMode {
        let contents = match std::fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No session file, running offline");
                return StorageMode::Offline;
            }
            Err(err) => {
                warn!(error = %err, "Session file unreadable, running offline");
                return StorageMode::Offline;
            }
        };

        match serde_json::from_slice::<SessionFile>(&contents) {
            Ok(session) => StorageMode::authenticated(session.owner_id),
            Err(err) => {
                warn!(error = %err, "Session file corrupt, running offline");
                StorageMode::Offline
            }
        }
    }

    /// Records a sign-in and returns the new mode.
    pub fn sign_in(&self, owner_id: impl Into<String>) -> Result<StorageMode> {
        let owner_id = owner_id.into();
        let session = SessionFile {
            owner_id: owner_id.clone(),
            signed_in_at: Utc::now(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_vec_pretty(&session)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("failed to write session: {}", self.path.display()))?;

        info!(owner = %owner_id, "Signed in");
        Ok(StorageMode::authenticated(owner_id))
    }

    /// Removes the session, returning to offline mode. Signing out while
    /// already offline is a no-op.
    pub fn sign_out(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Signed out");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).context("failed to remove session file"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
