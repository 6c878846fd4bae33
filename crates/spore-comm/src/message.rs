//! Message tags and payloads.

use spore_core::Species;

use crate::error::CommError;

/// Distinguishes concurrent messages between the same pair of ranks.
///
/// With a ring of one or two workers the previous and next neighbour are
/// the same rank, so halo layers travelling in opposite directions can
/// only be told apart by tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// A boundary layer travelling to the previous ring neighbour.
    TowardPrev,
    /// A boundary layer travelling to the next ring neighbour.
    TowardNext,
    /// A contribution to a sum-reduction.
    Reduce,
}

/// Message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// One grid layer.
    Cells(Vec<Species>),
    /// Population counts.
    Counts(Vec<u64>),
}

impl Payload {
    /// Short name of the payload kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cells(_) => "cells",
            Self::Counts(_) => "counts",
        }
    }

    /// Unwrap a [`Payload::Cells`].
    pub fn into_cells(self) -> Result<Vec<Species>, CommError> {
        match self {
            Self::Cells(cells) => Ok(cells),
            other => Err(CommError::UnexpectedPayload {
                expected: "cells",
                got: other.kind(),
            }),
        }
    }

    /// Unwrap a [`Payload::Counts`].
    pub fn into_counts(self) -> Result<Vec<u64>, CommError> {
        match self {
            Self::Counts(counts) => Ok(counts),
            other => Err(CommError::UnexpectedPayload {
                expected: "counts",
                got: other.kind(),
            }),
        }
    }
}

/// A payload in transit, stamped with its origin.
#[derive(Debug)]
pub(crate) struct Envelope {
    pub source: usize,
    pub tag: Tag,
    pub payload: Payload,
}

impl Envelope {
    pub(crate) fn matches(&self, source: usize, tag: Tag) -> bool {
        self.source == source && self.tag == tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_matching_kind() {
        assert_eq!(Payload::Cells(vec![1, 2]).into_cells().unwrap(), vec![1, 2]);
        assert_eq!(Payload::Counts(vec![3]).into_counts().unwrap(), vec![3]);
    }

    #[test]
    fn unwrap_wrong_kind() {
        assert_eq!(
            Payload::Counts(vec![]).into_cells(),
            Err(CommError::UnexpectedPayload {
                expected: "cells",
                got: "counts"
            })
        );
    }
}
