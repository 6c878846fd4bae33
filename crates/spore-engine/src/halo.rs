//! Boundary-layer exchange between ring neighbours.
//!
//! Each exchange moves two layers in each direction around the ring:
//!
//! | Sent layer       | To   | Tag          | Lands in (receiver)  |
//! |------------------|------|--------------|----------------------|
//! | first interior   | prev | `TowardPrev` | trailing halo        |
//! | last interior    | next | `TowardNext` | leading halo         |
//!
//! All four operations are posted before any is waited on, so a ring of
//! one or two workers (where `prev == next`, or both are self) cannot
//! deadlock.

use smallvec::SmallVec;
use spore_comm::{CommError, Communicator, Payload, Request, Tag};
use spore_grid::{GridBuffer, Halo, RingTopology};

use crate::error::EngineError;

/// Posted but not yet completed halo exchange.
#[must_use = "a halo exchange must be completed before the buffer is read"]
#[derive(Debug)]
pub struct PendingHalo {
    requests: SmallVec<[Request; 4]>,
}

/// Post the exchange of `grid`'s boundary layers with the neighbours in
/// `ring`.
pub fn post(
    comm: &Communicator,
    ring: &RingTopology,
    grid: &GridBuffer,
) -> Result<PendingHalo, CommError> {
    let mut requests: SmallVec<[Request; 4]> = SmallVec::new();
    requests.push(
        comm.isend(
            ring.prev,
            Tag::TowardPrev,
            Payload::Cells(grid.first_interior().to_vec()),
        )?
        .into(),
    );
    requests.push(comm.irecv(ring.next, Tag::TowardPrev)?.into());
    requests.push(
        comm.isend(
            ring.next,
            Tag::TowardNext,
            Payload::Cells(grid.last_interior().to_vec()),
        )?
        .into(),
    );
    requests.push(comm.irecv(ring.prev, Tag::TowardNext)?.into());
    Ok(PendingHalo { requests })
}

impl PendingHalo {
    /// Wait for every transfer and write the received layers into
    /// `grid`'s halos.
    pub fn complete(self, comm: &mut Communicator, grid: &mut GridBuffer) -> Result<(), EngineError> {
        let mut received = comm.wait_all(self.requests)?.into_iter().flatten();
        let (Some(from_next), Some(from_prev)) = (received.next(), received.next()) else {
            return Err(CommError::UnexpectedPayload {
                expected: "cells",
                got: "nothing",
            }
            .into());
        };
        grid.fill_halo(Halo::Trailing, &from_next.into_cells()?)?;
        grid.fill_halo(Halo::Leading, &from_prev.into_cells()?)?;
        Ok(())
    }
}

/// Post and complete an exchange in one call.
pub fn exchange(
    comm: &mut Communicator,
    ring: &RingTopology,
    grid: &mut GridBuffer,
) -> Result<(), EngineError> {
    let pending = post(comm, ring, grid)?;
    pending.complete(comm, grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spore_comm::Universe;
    use spore_grid::Partition;
    use std::thread;

    /// Each worker's interior layer `i` is filled with `rank * 10 + i`.
    fn labelled(rank: usize, depth: usize, side: usize) -> GridBuffer {
        let mut g = GridBuffer::new(depth, side).unwrap();
        for x in 1..=depth {
            g.layer_mut(x).unwrap().fill((rank * 10 + x) as u8);
        }
        g
    }

    fn run_ring(workers: usize) -> Vec<GridBuffer> {
        let partition = Partition::new(6, workers).unwrap();
        let handles: Vec<_> = Universe::new(workers)
            .unwrap()
            .into_endpoints()
            .into_iter()
            .map(|mut comm| {
                let ring = partition.ring(comm.rank()).unwrap();
                let depth = partition.slab(comm.rank()).unwrap().depth();
                thread::spawn(move || {
                    let mut grid = labelled(comm.rank(), depth, 6);
                    exchange(&mut comm, &ring, &mut grid).unwrap();
                    grid
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    }

    #[test]
    fn single_worker_wraps_onto_itself() {
        let grids = run_ring(1);
        let g = &grids[0];
        assert!(g.layer(0).unwrap().iter().all(|&c| c == 6));
        assert!(g.layer(7).unwrap().iter().all(|&c| c == 1));
    }

    #[test]
    fn two_workers_swap_both_directions() {
        let grids = run_ring(2);
        // Worker 0 owns layers 1..=3 labelled 1..=3; worker 1 labelled 11..=13.
        assert!(grids[0].layer(0).unwrap().iter().all(|&c| c == 13));
        assert!(grids[0].layer(4).unwrap().iter().all(|&c| c == 11));
        assert!(grids[1].layer(0).unwrap().iter().all(|&c| c == 3));
        assert!(grids[1].layer(4).unwrap().iter().all(|&c| c == 1));
    }

    #[test]
    fn three_workers_receive_from_correct_sides() {
        let grids = run_ring(3);
        // Depth 2 each: labels (1,2), (11,12), (21,22).
        assert!(grids[1].layer(0).unwrap().iter().all(|&c| c == 2));
        assert!(grids[1].layer(3).unwrap().iter().all(|&c| c == 21));
        assert!(grids[0].layer(0).unwrap().iter().all(|&c| c == 22));
        assert!(grids[2].layer(3).unwrap().iter().all(|&c| c == 1));
    }

    #[test]
    fn interior_unchanged_by_exchange() {
        let grids = run_ring(3);
        for (rank, g) in grids.iter().enumerate() {
            assert_eq!(g.interior(), labelled(rank, 2, 6).interior());
        }
    }
}
