//! Run-level error type.

use std::error::Error;
use std::fmt;

use spore_comm::CommError;
use spore_grid::GridError;

use crate::config::ConfigError;

/// Errors that end a simulation run.
///
/// Every failure is fatal to the whole run: workers advance in lockstep,
/// so one worker's error leaves the others without consistent halos or
/// reductions.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineError {
    /// Configuration failed validation.
    Config(ConfigError),
    /// Grid construction or layer access failed.
    Grid(GridError),
    /// A transfer or reduction failed.
    Comm(CommError),
    /// A worker's compute thread pool could not be built.
    ThreadPool {
        /// The owning worker.
        rank: usize,
        /// Description from the pool builder.
        reason: String,
    },
    /// A worker thread could not be spawned.
    SpawnFailed {
        /// The worker that failed to start.
        rank: usize,
        /// Description from the OS.
        reason: String,
    },
    /// A worker thread panicked.
    WorkerPanicked {
        /// The worker that panicked.
        rank: usize,
    },
    /// No coordinator result was produced.
    MissingCoordinator,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Comm(e) => write!(f, "comm: {e}"),
            Self::ThreadPool { rank, reason } => {
                write!(f, "worker {rank}: thread pool build failed: {reason}")
            }
            Self::SpawnFailed { rank, reason } => {
                write!(f, "worker {rank}: thread spawn failed: {reason}")
            }
            Self::WorkerPanicked { rank } => write!(f, "worker {rank} panicked"),
            Self::MissingCoordinator => write!(f, "coordinator produced no result"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Comm(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<GridError> for EngineError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<CommError> for EngineError {
    fn from(e: CommError) -> Self {
        Self::Comm(e)
    }
}

impl EngineError {
    /// Whether this worker stopped only because another one failed.
    ///
    /// A peer only disconnects by exiting early, which it does only on
    /// failure, so a disconnect is a consequence rather than a cause.
    pub fn is_secondary(&self) -> bool {
        matches!(
            self,
            Self::Comm(CommError::Aborted | CommError::Disconnected { .. })
        )
    }
}
