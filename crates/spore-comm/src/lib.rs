//! Message passing between Spore workers.
//!
//! Workers share no memory. Each one owns a [`Communicator`] endpoint
//! with a private inbox; every endpoint holds a sender into every other
//! inbox. On top of that the crate offers the small set of operations the
//! engine needs:
//!
//! - non-blocking point-to-point sends and receives, matched on
//!   `(source, tag)` with per-sender FIFO ordering;
//! - a wait-all over a batch of requests;
//! - an asynchronous sum-reduction of `u64` counts to a root rank;
//! - a sub-group holding only the first `n` ranks.
//!
//! Sends never block (mailboxes are unbounded). Receives block until the
//! matching message arrives or the run-wide [`AbortSignal`] is raised.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod communicator;
pub mod error;
pub mod message;
pub mod request;

pub use communicator::{AbortSignal, Communicator, Universe};
pub use error::CommError;
pub use message::{Payload, Tag};
pub use request::{RecvRequest, ReduceRequest, Request, SendRequest};
