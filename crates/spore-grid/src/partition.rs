//! Domain decomposition along the layer axis.
//!
//! The global grid is cut into contiguous slabs of layers, one per active
//! worker, with balanced integer division so slab depths differ by at
//! most one. When there are more workers than layers only the first
//! `side` workers are active; the rest are left out of the topology.
//!
//! Active workers form a ring: worker 0's previous neighbour is the last
//! active worker, which keeps the layer axis toroidal across workers.

use crate::error::GridError;

/// The inclusive layer range `[start, end]` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slab {
    /// Owning worker.
    pub rank: usize,
    /// First global layer (inclusive).
    pub start: usize,
    /// Last global layer (inclusive).
    pub end: usize,
}

impl Slab {
    /// Number of layers in the slab.
    pub fn depth(&self) -> usize {
        self.end + 1 - self.start
    }
}

/// Ring adjacency of one active worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingTopology {
    /// This worker.
    pub rank: usize,
    /// Number of workers in the ring.
    pub size: usize,
    /// Neighbour owning the layers just before ours (wrapping).
    pub prev: usize,
    /// Neighbour owning the layers just after ours (wrapping).
    pub next: usize,
}

impl RingTopology {
    /// Ring position of `rank` among `size` workers.
    ///
    /// Returns `None` if `rank >= size`.
    pub fn new(rank: usize, size: usize) -> Option<Self> {
        if rank >= size {
            return None;
        }
        Some(Self {
            rank,
            size,
            prev: (rank + size - 1) % size,
            next: (rank + 1) % size,
        })
    }

    /// Whether both neighbours are the same worker (ring of one or two).
    pub fn neighbours_coincide(&self) -> bool {
        self.prev == self.next
    }
}

/// Assignment of grid layers to workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    side: usize,
    workers: usize,
}

impl Partition {
    /// Decompose a grid of side `side` across `workers` workers.
    ///
    /// Returns `Err(GridError::EmptyDimension)` if either is zero.
    pub fn new(side: usize, workers: usize) -> Result<Self, GridError> {
        if side == 0 {
            return Err(GridError::EmptyDimension { name: "side" });
        }
        if workers == 0 {
            return Err(GridError::EmptyDimension { name: "workers" });
        }
        Ok(Self { side, workers })
    }

    /// Global side length.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Total workers, active or not.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of workers that receive layers: `min(workers, side)`.
    pub fn active(&self) -> usize {
        self.workers.min(self.side)
    }

    /// Whether `rank` takes part in the simulation.
    pub fn is_active(&self, rank: usize) -> bool {
        rank < self.active()
    }

    /// Layers owned by `rank`, or `None` for inactive workers.
    pub fn slab(&self, rank: usize) -> Option<Slab> {
        if !self.is_active(rank) {
            return None;
        }
        let active = self.active();
        Some(Slab {
            rank,
            start: rank * self.side / active,
            end: (rank + 1) * self.side / active - 1,
        })
    }

    /// Every active worker's slab, in rank order.
    pub fn slabs(&self) -> impl Iterator<Item = Slab> + '_ {
        (0..self.active()).filter_map(move |rank| self.slab(rank))
    }

    /// Ring adjacency of `rank` among the active workers.
    pub fn ring(&self, rank: usize) -> Option<RingTopology> {
        RingTopology::new(rank, self.active())
    }
}
