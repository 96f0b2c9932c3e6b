//! Periodic boundary resolution.
//!
//! The domain is a torus of `nx × ny` cells. A neighbor lookup that steps
//! off one edge lands on the opposite edge, and the coordinates of particles
//! found there are shifted by one domain length so they are expressed in the
//! same frame as the querying particle. Nothing here holds state, so there
//! is no alias table to refresh after particles move between cells.

use crate::model::grid::{CellIndex, GridDims};

/// A real cell seen from a neighbor query, with the offset that places its
/// particles in the querying cell's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborCell {
    pub cell: CellIndex,
    /// Origin of the virtual (possibly off-grid) cell in global coordinates.
    pub origin: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicBoundary {
    dims: GridDims,
    cell_size: f64,
}

impl PeriodicBoundary {
    pub fn new(dims: GridDims, cell_size: f64) -> Self {
        Self { dims, cell_size }
    }

    /// Maps a virtual cell index, possibly one step outside the grid, onto
    /// the real cell it aliases.
    #[inline]
    pub fn wrap(&self, i: isize, j: isize) -> CellIndex {
        CellIndex::new(wrap_axis(i, self.dims.nx), wrap_axis(j, self.dims.ny))
    }

    /// The 3×3 block of cells centred on `cell`, including `cell` itself.
    ///
    /// Each entry carries the origin of the virtual cell, so a particle at
    /// local position `x` in that entry sits at `origin + x` in the frame of
    /// `cell`. On grids narrower than three cells the same real cell can
    /// appear more than once with different origins; those are distinct
    /// periodic images.
    pub fn neighborhood(&self, cell: CellIndex) -> [NeighborCell; 9] {
        let mut out = [NeighborCell {
            cell,
            origin: [0.0; 2],
        }; 9];

        let ci = cell.i as isize;
        let cj = cell.j as isize;
        let mut k = 0;
        for a in -1..=1 {
            for b in -1..=1 {
                let vi = ci + a;
                let vj = cj + b;
                out[k] = NeighborCell {
                    cell: self.wrap(vi, vj),
                    origin: [vi as f64 * self.cell_size, vj as f64 * self.cell_size],
                };
                k += 1;
            }
        }
        out
    }
}

#[inline]
fn wrap_axis(v: isize, n: usize) -> usize {
    v.rem_euclid(n as isize) as usize
}
