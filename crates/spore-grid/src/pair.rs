//! Double-buffered grid pair.
//!
//! [`GridPair`] holds the "current" generation (read-only during the
//! compute phase) and the "next" generation (written during the compute
//! phase, halos filled by the exchange). [`GridPair::swap`] exchanges the
//! two roles by moving ownership, never by copying cells.

use crate::buffer::GridBuffer;

/// Two equally-shaped [`GridBuffer`]s alternating current/next roles.
#[derive(Debug)]
pub struct GridPair {
    current: GridBuffer,
    next: GridBuffer,
}

impl GridPair {
    /// Wrap an initial grid; the "next" buffer is allocated with the same
    /// shape and reused for the rest of the run.
    pub fn new(initial: GridBuffer) -> Self {
        let next = initial.clone();
        Self {
            current: initial,
            next,
        }
    }

    /// The current generation.
    pub fn current(&self) -> &GridBuffer {
        &self.current
    }

    /// Mutable access to the current buffer, for filling its halos
    /// before the first compute phase.
    pub fn current_mut(&mut self) -> &mut GridBuffer {
        &mut self.current
    }

    /// The buffer the next generation is written into.
    pub fn next(&self) -> &GridBuffer {
        &self.next
    }

    /// Mutable access to the next buffer.
    pub fn next_mut(&mut self) -> &mut GridBuffer {
        &mut self.next
    }

    /// Split borrow: read the current buffer while writing the next one.
    pub fn split(&mut self) -> (&GridBuffer, &mut GridBuffer) {
        (&self.current, &mut self.next)
    }

    /// Make the next buffer current. The old current buffer becomes the
    /// next write target; its contents are overwritten by the following
    /// compute phase.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Consume the pair and return the current buffer.
    pub fn into_current(self) -> GridBuffer {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_exchanges_roles() {
        let mut a = GridBuffer::new(1, 2).unwrap();
        a.set(1, 0, 0, 1);
        let mut pair = GridPair::new(a);
        pair.next_mut().set(1, 0, 0, 2);

        pair.swap();
        assert_eq!(pair.current().get(1, 0, 0), 2);
        assert_eq!(pair.next().get(1, 0, 0), 1);

        pair.swap();
        assert_eq!(pair.current().get(1, 0, 0), 1);
    }

    #[test]
    fn split_reads_current_writes_next() {
        let mut a = GridBuffer::new(1, 2).unwrap();
        a.set(1, 1, 1, 3);
        let mut pair = GridPair::new(a);
        let (cur, next) = pair.split();
        next.set(1, 1, 1, cur.get(1, 1, 1) + 1);
        assert_eq!(pair.next().get(1, 1, 1), 4);
        assert_eq!(pair.current().get(1, 1, 1), 3);
    }
}
