//! Communicator endpoints and the universe that wires them together.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use smallvec::SmallVec;

use crate::error::CommError;
use crate::message::{Envelope, Payload, Tag};
use crate::request::{RecvRequest, ReduceRequest, ReduceState, Request, SendRequest};

/// How often a blocked receive re-checks the abort signal.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

// ── AbortSignal ────────────────────────────────────────────────────

/// Run-wide failure flag shared by every endpoint of a [`Universe`].
///
/// A worker that fails raises the signal so that peers blocked on a
/// receive from it return [`CommError::Aborted`] instead of waiting
/// forever.
#[derive(Clone, Debug, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    /// Mark the run as failed.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether any worker has raised the signal.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ── Universe ───────────────────────────────────────────────────────

/// The full set of endpoints for one run.
///
/// Built once before workers start; each worker thread takes ownership of
/// exactly one [`Communicator`].
#[derive(Debug)]
pub struct Universe {
    endpoints: Vec<Communicator>,
    abort: AbortSignal,
}

impl Universe {
    /// Wire up `size` fully connected endpoints.
    ///
    /// Returns `Err(CommError::EmptyGroup)` if `size == 0`.
    pub fn new(size: usize) -> Result<Self, CommError> {
        if size == 0 {
            return Err(CommError::EmptyGroup);
        }
        let abort = AbortSignal::default();
        let (senders, receivers): (Vec<Sender<Envelope>>, Vec<Receiver<Envelope>>) =
            (0..size).map(|_| crossbeam_channel::unbounded()).unzip();

        let endpoints = receivers
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| Communicator {
                rank,
                size,
                outboxes: senders.clone(),
                inbox,
                unexpected: VecDeque::new(),
                abort: abort.clone(),
            })
            .collect();

        Ok(Self { endpoints, abort })
    }

    /// Number of endpoints.
    pub fn size(&self) -> usize {
        self.endpoints.len()
    }

    /// The shared abort signal.
    pub fn abort_signal(&self) -> AbortSignal {
        self.abort.clone()
    }

    /// Hand out the endpoints, in rank order.
    pub fn into_endpoints(self) -> Vec<Communicator> {
        self.endpoints
    }
}

// ── Communicator ───────────────────────────────────────────────────

/// One worker's endpoint.
///
/// Messages from a given sender are delivered in the order they were
/// sent. A receive for `(source, tag)` takes the oldest matching message;
/// anything else that arrives meanwhile is set aside until asked for.
pub struct Communicator {
    rank: usize,
    size: usize,
    outboxes: Vec<Sender<Envelope>>,
    inbox: Receiver<Envelope>,
    unexpected: VecDeque<Envelope>,
    abort: AbortSignal,
}

impl Communicator {
    /// This endpoint's rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of ranks in the group.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of received messages waiting for a matching receive.
    pub fn pending_unexpected(&self) -> usize {
        self.unexpected.len()
    }

    /// Restrict the group to ranks `0..count`.
    ///
    /// Consumes the endpoint. Ranks inside the range get an endpoint of
    /// the smaller group with the same rank; ranks outside get `None` and
    /// drop out of all further communication. Every rank must call this
    /// with the same `count`.
    pub fn include_first(mut self, count: usize) -> Option<Self> {
        if self.rank >= count {
            return None;
        }
        self.size = count.min(self.size);
        self.outboxes.truncate(self.size);
        Some(self)
    }

    fn check_rank(&self, rank: usize) -> Result<(), CommError> {
        if rank >= self.size {
            return Err(CommError::RankOutOfRange {
                rank,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Start sending `payload` to `dest`.
    pub fn isend(&self, dest: usize, tag: Tag, payload: Payload) -> Result<SendRequest, CommError> {
        self.check_rank(dest)?;
        tracing::trace!(rank = self.rank, dest, ?tag, kind = payload.kind(), "isend");
        self.outboxes[dest]
            .send(Envelope {
                source: self.rank,
                tag,
                payload,
            })
            .map_err(|_| CommError::Disconnected { peer: dest })?;
        Ok(SendRequest { dest, tag })
    }

    /// Post a receive for the next message from `source` with `tag`.
    pub fn irecv(&self, source: usize, tag: Tag) -> Result<RecvRequest, CommError> {
        self.check_rank(source)?;
        Ok(RecvRequest { source, tag })
    }

    /// Block until the message for `request` arrives.
    pub fn wait(&mut self, request: RecvRequest) -> Result<Payload, CommError> {
        self.receive(request.source, request.tag)
    }

    /// Complete every request, in order.
    ///
    /// The result holds `Some(payload)` for each receive and `None` for
    /// each send, positionally matching `requests`.
    pub fn wait_all<I>(&mut self, requests: I) -> Result<SmallVec<[Option<Payload>; 4]>, CommError>
    where
        I: IntoIterator<Item = Request>,
    {
        requests
            .into_iter()
            .map(|request| match request {
                Request::Send(s) => {
                    tracing::trace!(rank = self.rank, dest = s.dest, tag = ?s.tag, "send complete");
                    Ok(None)
                }
                Request::Recv(r) => self.wait(r).map(Some),
            })
            .collect()
    }

    /// Start a sum-reduction of `counts` onto `root`.
    ///
    /// Every rank of the group must issue the same sequence of
    /// reductions with equal-length inputs.
    pub fn ireduce_sum(&self, root: usize, counts: &[u64]) -> Result<ReduceRequest, CommError> {
        self.check_rank(root)?;
        if self.rank == root {
            return Ok(ReduceRequest {
                state: ReduceState::Root {
                    partial: counts.to_vec(),
                },
            });
        }
        let _sent = self.isend(root, Tag::Reduce, Payload::Counts(counts.to_vec()))?;
        Ok(ReduceRequest {
            state: ReduceState::Contributed,
        })
    }

    /// Complete a reduction. The root receives the element-wise sum over
    /// all ranks; every other rank receives `None`.
    pub fn wait_reduce(&mut self, request: ReduceRequest) -> Result<Option<Vec<u64>>, CommError> {
        let mut partial = match request.state {
            ReduceState::Contributed => return Ok(None),
            ReduceState::Root { partial } => partial,
        };
        let me = self.rank;
        for source in (0..self.size).filter(|&s| s != me) {
            let contribution = self.receive(source, Tag::Reduce)?.into_counts()?;
            if contribution.len() != partial.len() {
                return Err(CommError::LengthMismatch {
                    expected: partial.len(),
                    got: contribution.len(),
                });
            }
            for (acc, v) in partial.iter_mut().zip(contribution) {
                *acc += v;
            }
        }
        Ok(Some(partial))
    }

    fn receive(&mut self, source: usize, tag: Tag) -> Result<Payload, CommError> {
        if let Some(pos) = self.unexpected.iter().position(|e| e.matches(source, tag)) {
            if let Some(envelope) = self.unexpected.remove(pos) {
                return Ok(envelope.payload);
            }
        }
        loop {
            match self.inbox.recv_timeout(POLL_INTERVAL) {
                Ok(envelope) if envelope.matches(source, tag) => return Ok(envelope.payload),
                Ok(envelope) => self.unexpected.push_back(envelope),
                Err(RecvTimeoutError::Timeout) => {
                    if self.abort.is_raised() {
                        return Err(CommError::Aborted);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(CommError::Disconnected { peer: source })
                }
            }
        }
    }
}

impl std::fmt::Debug for Communicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Communicator")
            .field("rank", &self.rank)
            .field("size", &self.size)
            .field("unexpected", &self.unexpected.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn pair() -> (Communicator, Communicator) {
        let mut it = Universe::new(2).unwrap().into_endpoints().into_iter();
        (it.next().unwrap(), it.next().unwrap())
    }

    #[test]
    fn empty_universe_rejected() {
        assert_eq!(Universe::new(0).unwrap_err(), CommError::EmptyGroup);
    }

    #[test]
    fn send_then_receive() {
        let (a, mut b) = pair();
        let _s = a.isend(1, Tag::TowardNext, Payload::Cells(vec![1, 2, 3])).unwrap();
        let r = b.irecv(0, Tag::TowardNext).unwrap();
        assert_eq!(b.wait(r).unwrap(), Payload::Cells(vec![1, 2, 3]));
    }

    #[test]
    fn tags_disambiguate_same_peer() {
        let (a, mut b) = pair();
        let _ = a.isend(1, Tag::TowardPrev, Payload::Cells(vec![1])).unwrap();
        let _ = a.isend(1, Tag::TowardNext, Payload::Cells(vec![2])).unwrap();
        // Ask for the later message first.
        let next = b.irecv(0, Tag::TowardNext).unwrap();
        let prev = b.irecv(0, Tag::TowardPrev).unwrap();
        assert_eq!(b.wait(next).unwrap(), Payload::Cells(vec![2]));
        assert_eq!(b.pending_unexpected(), 1);
        assert_eq!(b.wait(prev).unwrap(), Payload::Cells(vec![1]));
        assert_eq!(b.pending_unexpected(), 0);
    }

    #[test]
    fn same_tag_preserves_send_order() {
        let (a, mut b) = pair();
        for i in 0..5u8 {
            let _ = a.isend(1, Tag::TowardNext, Payload::Cells(vec![i])).unwrap();
        }
        for i in 0..5u8 {
            let r = b.irecv(0, Tag::TowardNext).unwrap();
            assert_eq!(b.wait(r).unwrap(), Payload::Cells(vec![i]));
        }
    }

    #[test]
    fn self_send_on_single_rank() {
        let mut solo = Universe::new(1).unwrap().into_endpoints().remove(0);
        let s = solo.isend(0, Tag::TowardPrev, Payload::Cells(vec![7])).unwrap();
        let r = solo.irecv(0, Tag::TowardPrev).unwrap();
        let out = solo.wait_all([Request::from(s), Request::from(r)]).unwrap();
        assert_eq!(out.as_slice(), &[None, Some(Payload::Cells(vec![7]))]);
    }

    #[test]
    fn rank_out_of_range() {
        let (a, _b) = pair();
        assert_eq!(
            a.isend(2, Tag::Reduce, Payload::Counts(vec![])).unwrap_err(),
            CommError::RankOutOfRange { rank: 2, size: 2 }
        );
        assert!(a.irecv(5, Tag::Reduce).is_err());
    }

    #[test]
    fn reduce_sums_on_root_only() {
        let endpoints = Universe::new(3).unwrap().into_endpoints();
        let handles: Vec<_> = endpoints
            .into_iter()
            .map(|mut comm| {
                thread::spawn(move || {
                    let rank = comm.rank() as u64;
                    let req = comm.ireduce_sum(0, &[rank, 10 * rank, 1]).unwrap();
                    comm.wait_reduce(req).unwrap()
                })
            })
            .collect();
        let results: Vec<Option<Vec<u64>>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results[0], Some(vec![3, 30, 3]));
        assert_eq!(results[1], None);
        assert_eq!(results[2], None);
    }

    #[test]
    fn reduce_length_mismatch_detected() {
        let (mut a, b) = pair();
        let root = a.ireduce_sum(0, &[1, 2]).unwrap();
        let _ = b.ireduce_sum(0, &[1, 2, 3]).unwrap();
        assert_eq!(
            a.wait_reduce(root).unwrap_err(),
            CommError::LengthMismatch {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn include_first_drops_trailing_ranks() {
        let endpoints = Universe::new(4).unwrap().into_endpoints();
        let kept: Vec<Option<Communicator>> =
            endpoints.into_iter().map(|c| c.include_first(2)).collect();
        assert!(kept[0].is_some());
        assert!(kept[1].is_some());
        assert!(kept[2].is_none());
        assert!(kept[3].is_none());
        let zero = kept[0].as_ref().unwrap();
        assert_eq!(zero.size(), 2);
        assert!(zero.isend(2, Tag::Reduce, Payload::Counts(vec![])).is_err());
    }

    #[test]
    fn abort_unblocks_pending_receive() {
        let universe = Universe::new(2).unwrap();
        let abort = universe.abort_signal();
        let mut endpoints = universe.into_endpoints();
        let _silent = endpoints.pop().unwrap();
        let mut waiting = endpoints.pop().unwrap();

        let h = thread::spawn(move || {
            let r = waiting.irecv(1, Tag::TowardPrev).unwrap();
            waiting.wait(r)
        });
        abort.raise();
        assert_eq!(h.join().unwrap(), Err(CommError::Aborted));
    }
}
