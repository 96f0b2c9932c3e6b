//! Initial particle placement and velocity assignment.

use std::f64::consts::TAU;

use log::debug;
use rand::Rng;

use crate::model::grid::CellGrid;

/// Fills every cell with an `n × n` sub-lattice of resting particles.
///
/// Points sit at local coordinates `((a + 0.5) / n · cell_size, (b + 0.5) /
/// n · cell_size)` for `a, b` in `0..n`. Returns the number of particles
/// placed.
pub fn place_lattice(grid: &mut CellGrid, particles_per_dim: usize) -> usize {
    let cell_size = grid.cell_size();
    let cells: Vec<_> = grid.dims().cells().collect();
    let before = grid.len();

    for cell in cells {
        for a in 0..particles_per_dim {
            for b in 0..particles_per_dim {
                let local = [
                    lattice_coord(a, particles_per_dim, cell_size),
                    lattice_coord(b, particles_per_dim, cell_size),
                ];
                grid.insert(cell, local, [0.0, 0.0]);
            }
        }
    }

    let placed = grid.len() - before;
    debug!(
        "Placed {placed} particles on a {n}×{n} lattice per cell",
        n = particles_per_dim
    );
    placed
}

#[inline]
pub(crate) fn lattice_coord(k: usize, n: usize, cell_size: f64) -> f64 {
    (k as f64 + 0.5) / n as f64 * cell_size
}

/// Gives every particle speed `√(3T)` in a random direction, then removes
/// the mean velocity so total momentum is zero.
pub fn assign_velocities<R: Rng + ?Sized>(grid: &mut CellGrid, temperature: f64, rng: &mut R) {
    if grid.is_empty() {
        return;
    }

    let speed = (3.0 * temperature).sqrt();
    let mut sum = [0.0; 2];
    for p in grid.particles_mut() {
        let phi: f64 = rng.random_range(0.0..TAU);
        p.velocity = [speed * phi.cos(), speed * phi.sin()];
        sum[0] += p.velocity[0];
        sum[1] += p.velocity[1];
    }

    let n = grid.len() as f64;
    let mean = [sum[0] / n, sum[1] / n];
    for p in grid.particles_mut() {
        p.velocity[0] -= mean[0];
        p.velocity[1] -= mean[1];
    }
    debug!(
        "Assigned velocities at T = {temperature} (removed drift {:.3e}, {:.3e})",
        mean[0], mean[1]
    );
}
