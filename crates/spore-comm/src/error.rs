//! Communication error types.

use std::error::Error;
use std::fmt;

/// Errors from point-to-point or collective operations.
///
/// None of these are retried: a failed transfer leaves the workers with
/// inconsistent generations, so the run is abandoned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommError {
    /// A group must contain at least one rank.
    EmptyGroup,
    /// A peer rank outside the communicator.
    RankOutOfRange {
        /// The requested rank.
        rank: usize,
        /// Number of ranks in the communicator.
        size: usize,
    },
    /// The peer's mailbox is gone (its worker exited).
    Disconnected {
        /// The unreachable peer.
        peer: usize,
    },
    /// A message carried a different payload kind than expected.
    UnexpectedPayload {
        /// Payload kind the receiver asked for.
        expected: &'static str,
        /// Payload kind that arrived.
        got: &'static str,
    },
    /// A payload had the wrong number of elements.
    LengthMismatch {
        /// Elements expected.
        expected: usize,
        /// Elements received.
        got: usize,
    },
    /// A reduction was issued while another was still outstanding.
    ReductionInFlight,
    /// Another worker failed and the run was aborted.
    Aborted,
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGroup => write!(f, "communicator group must not be empty"),
            Self::RankOutOfRange { rank, size } => {
                write!(f, "rank {rank} out of range for communicator of size {size}")
            }
            Self::Disconnected { peer } => write!(f, "peer {peer} disconnected"),
            Self::UnexpectedPayload { expected, got } => {
                write!(f, "expected {expected} payload, got {got}")
            }
            Self::LengthMismatch { expected, got } => {
                write!(f, "payload length {got}, expected {expected}")
            }
            Self::ReductionInFlight => write!(f, "a reduction is already outstanding"),
            Self::Aborted => write!(f, "run aborted by another worker"),
        }
    }
}

impl Error for CommError {}
