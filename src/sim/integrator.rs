//! Kick-drift-kick (velocity Verlet) halves.
//!
//! [`half_kick_and_drift`] uses the accelerations from the previous force
//! evaluation and runs before migration. [`half_kick`] uses the freshly
//! recomputed ones and closes the step.

use super::config::Constants;
use crate::model::grid::CellGrid;

/// `v += a·dt/2`, then `x += v·dt`, for every particle.
///
/// Positions are local to the owning cell and may leave `[0, cell_size)`;
/// migration puts them back.
pub fn half_kick_and_drift(grid: &mut CellGrid, constants: &Constants) {
    let half_dt = constants.half_dt;
    let dt = constants.dt;
    for p in grid.particles_mut() {
        p.velocity[0] += half_dt * p.acceleration[0];
        p.velocity[1] += half_dt * p.acceleration[1];
        p.position[0] += dt * p.velocity[0];
        p.position[1] += dt * p.velocity[1];
    }
}

/// `v += a·dt/2` for every particle, returning the mean kinetic energy per
/// particle.
pub fn half_kick(grid: &mut CellGrid, constants: &Constants) -> f64 {
    let half_dt = constants.half_dt;
    let mut sum = 0.0;
    for p in grid.particles_mut() {
        p.velocity[0] += half_dt * p.acceleration[0];
        p.velocity[1] += half_dt * p.acceleration[1];
        sum += p.speed_sq();
    }
    if grid.is_empty() {
        return 0.0;
    }
    0.5 * sum / grid.len() as f64
}

/// Mean kinetic energy per particle without touching velocities.
pub fn kinetic_energy(grid: &CellGrid) -> f64 {
    if grid.is_empty() {
        return 0.0;
    }
    let sum: f64 = grid.particles().iter().map(|p| p.speed_sq()).sum();
    0.5 * sum / grid.len() as f64
}
