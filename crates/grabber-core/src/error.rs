use std::path::PathBuf;

use thiserror::Error;

use crate::app::BuildError;
use crate::domain::PolicyError;

/// Errors from loading a task file and turning it into an engine.
#[derive(Debug, Error)]
pub enum GrabberError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid task file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("cannot build grabber: {0}")]
    Build(#[from] BuildError),
}
