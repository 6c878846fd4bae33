//! Handles for outstanding operations.
//!
//! Every non-blocking call returns a request that must be handed back to
//! the [`Communicator`](crate::Communicator) to complete it. Requests are
//! plain descriptors: they borrow nothing, so the caller is free to keep
//! computing while they are outstanding.

use crate::message::Tag;

/// An issued send.
///
/// Mailboxes are unbounded, so a send is complete as soon as it is
/// issued; waiting on it only preserves the issue/complete shape of the
/// protocol.
#[must_use = "requests must be completed with wait_all"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SendRequest {
    pub(crate) dest: usize,
    pub(crate) tag: Tag,
}

/// A posted receive, completed by waiting for the matching message.
#[must_use = "requests must be completed with wait or wait_all"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecvRequest {
    pub(crate) source: usize,
    pub(crate) tag: Tag,
}

/// Either kind of point-to-point request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// An issued send.
    Send(SendRequest),
    /// A posted receive.
    Recv(RecvRequest),
}

impl From<SendRequest> for Request {
    fn from(r: SendRequest) -> Self {
        Self::Send(r)
    }
}

impl From<RecvRequest> for Request {
    fn from(r: RecvRequest) -> Self {
        Self::Recv(r)
    }
}

/// An outstanding sum-reduction.
///
/// On the root it carries the root's own contribution, to which the other
/// ranks' contributions are added on completion. Elsewhere the
/// contribution has already been sent and completion yields nothing.
#[must_use = "reductions must be completed with wait_reduce"]
#[derive(Debug)]
pub struct ReduceRequest {
    pub(crate) state: ReduceState,
}

#[derive(Debug)]
pub(crate) enum ReduceState {
    Root { partial: Vec<u64> },
    Contributed,
}
