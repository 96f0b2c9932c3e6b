//! Lennard-Jones force evaluation over the cell list.
//!
//! Every real particle is the outer particle exactly once and scans the 3×3
//! neighborhood of its own cell. Only the outer particle's acceleration is
//! written on a visit; its partner receives the opposite contribution when
//! it becomes the outer particle in its own pass.

use rayon::prelude::*;

use super::boundary::PeriodicBoundary;
use super::config::Constants;
use crate::model::grid::{CellGrid, CellIndex};
use crate::model::particle::ParticleId;

/// Force factor and shifted potential energy for one pair at squared
/// separation `r_sq`.
///
/// The factor multiplies the separation vector `p - q` to give the
/// acceleration of `p`. The energy is shifted so both it and its slope are
/// zero at the cutoff.
#[inline]
pub fn lj_pair(r_sq: f64, constants: &Constants) -> (f64, f64) {
    let r_inv2 = 1.0 / r_sq;
    let r_inv6 = r_inv2 * r_inv2 * r_inv2;
    let force = 48.0 * r_inv2 * r_inv6 * (r_inv6 - 0.5);
    let energy = 4.0 * r_inv6 * (r_inv6 - 1.0)
        - constants.uc
        - constants.duc * (r_sq.sqrt() - constants.cutoff);
    (force, energy)
}

struct CellForces {
    accelerations: Vec<(ParticleId, [f64; 2])>,
    potential: f64,
}

/// Recomputes every particle's acceleration and returns the mean potential
/// energy per particle.
///
/// Each ordered pair inside the cutoff adds half of its shifted pair
/// energy, so the sum over all ordered pairs is the total potential energy
/// of the system. Cells are evaluated in parallel and partial energies are
/// reduced in cell order, which keeps the result independent of thread
/// count.
pub fn compute_accelerations(grid: &mut CellGrid, constants: &Constants) -> f64 {
    for particle in grid.particles_mut() {
        particle.acceleration = [0.0; 2];
    }
    if grid.is_empty() {
        return 0.0;
    }

    let boundary = PeriodicBoundary::new(grid.dims(), grid.cell_size());
    let cells: Vec<CellIndex> = grid.dims().cells().collect();

    let per_cell: Vec<CellForces> = {
        let view: &CellGrid = grid;
        cells
            .par_iter()
            .map(|&cell| cell_forces(view, &boundary, constants, cell))
            .collect()
    };

    let mut potential = 0.0;
    for result in per_cell {
        for (id, acceleration) in result.accelerations {
            grid.particle_mut(id).acceleration = acceleration;
        }
        potential += result.potential;
    }

    potential / grid.len() as f64
}

fn cell_forces(
    grid: &CellGrid,
    boundary: &PeriodicBoundary,
    constants: &Constants,
    cell: CellIndex,
) -> CellForces {
    let hood = boundary.neighborhood(cell);
    let mut accelerations = Vec::new();
    let mut potential = 0.0;

    for p in grid.members(cell) {
        let pos = grid.global_position(cell, p);
        let mut acc = [0.0; 2];

        for neighbor in &hood {
            for q in grid.members(neighbor.cell) {
                if q == p {
                    continue;
                }
                let local = grid.particle(q).position;
                let dx = pos[0] - (neighbor.origin[0] + local[0]);
                let dy = pos[1] - (neighbor.origin[1] + local[1]);
                let r_sq = dx * dx + dy * dy;
                if r_sq >= constants.cutoff_sq {
                    continue;
                }

                let (force, energy) = lj_pair(r_sq, constants);
                acc[0] += force * dx;
                acc[1] += force * dy;
                potential += 0.5 * energy;
            }
        }

        accelerations.push((p, acc));
    }

    CellForces {
        accelerations,
        potential,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::grid::GridDims;
    use crate::sim::config::SimulationConfig;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn constants(nx: usize, ny: usize, cutoff: f64) -> Constants {
        Constants::derive(&SimulationConfig {
            cells_x: nx,
            cells_y: ny,
            cell_size: 2.5,
            cutoff,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn pair_energy_vanishes_at_cutoff() {
        let c = constants(3, 3, 2.5);
        let (_, energy) = lj_pair(c.cutoff_sq, &c);
        assert_abs_diff_eq!(energy, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn pair_energy_is_smooth_at_cutoff() {
        let c = constants(3, 3, 2.5);
        let h = 1e-6;
        let r = c.cutoff - h;
        let (_, inside) = lj_pair(r * r, &c);
        assert_abs_diff_eq!(inside, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn force_vanishes_at_potential_minimum() {
        let c = constants(3, 3, 2.5);
        let r_min = 2f64.powf(1.0 / 6.0);
        let (force, _) = lj_pair(r_min * r_min, &c);
        assert_abs_diff_eq!(force, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn pair_forces_are_antisymmetric() {
        let c = constants(4, 4, 2.5);
        let mut grid = CellGrid::new(GridDims::new(4, 4), 2.5);
        let p = grid.insert_global([3.0, 3.0], [0.0, 0.0]);
        let q = grid.insert_global([4.1, 3.4], [0.0, 0.0]);

        compute_accelerations(&mut grid, &c);

        let ap = grid.particle(p).acceleration;
        let aq = grid.particle(q).acceleration;
        assert_relative_eq!(ap[0], -aq[0], max_relative = 1e-12);
        assert_relative_eq!(ap[1], -aq[1], max_relative = 1e-12);
        assert!(ap[0] != 0.0);
    }

    #[test]
    fn two_body_matches_analytic_force() {
        let c = constants(4, 4, 2.5);
        let mut grid = CellGrid::new(GridDims::new(4, 4), 2.5);
        let p = grid.insert(CellIndex::new(1, 1), [0.5, 1.0], [0.0, 0.0]);
        grid.insert(CellIndex::new(1, 1), [1.6, 1.0], [0.0, 0.0]);

        let potential = compute_accelerations(&mut grid, &c);

        let r_sq = 1.1 * 1.1;
        let (force, energy) = lj_pair(r_sq, &c);
        let ap = grid.particle(p).acceleration;
        assert_relative_eq!(ap[0], force * -1.1, max_relative = 1e-9);
        assert_abs_diff_eq!(ap[1], 0.0);
        // One unordered pair shared between two particles.
        assert_relative_eq!(potential, energy / 2.0, max_relative = 1e-9);
    }

    #[test]
    fn pair_at_exact_cutoff_does_not_interact() {
        let c = constants(4, 4, 2.5);
        let mut grid = CellGrid::new(GridDims::new(4, 4), 2.5);
        let p = grid.insert(CellIndex::new(0, 0), [0.5, 0.5], [0.0, 0.0]);
        grid.insert(CellIndex::new(1, 0), [0.5, 0.5], [0.0, 0.0]);

        let potential = compute_accelerations(&mut grid, &c);
        assert_eq!(grid.particle(p).acceleration, [0.0, 0.0]);
        assert_eq!(potential, 0.0);
    }

    #[test]
    fn isolated_particle_feels_nothing() {
        let c = constants(3, 3, 2.5);
        let mut grid = CellGrid::new(GridDims::new(3, 3), 2.5);
        let p = grid.insert(CellIndex::new(1, 1), [1.25, 1.25], [0.0, 0.0]);
        grid.particle_mut(p).acceleration = [9.0, 9.0];

        let potential = compute_accelerations(&mut grid, &c);
        assert_eq!(grid.particle(p).acceleration, [0.0, 0.0]);
        assert_eq!(potential, 0.0);
    }

    #[test]
    fn interaction_reaches_across_periodic_seam() {
        let c = constants(3, 3, 2.5);

        let mut seam = CellGrid::new(GridDims::new(3, 3), 2.5);
        let p_seam = seam.insert(CellIndex::new(0, 0), [0.2, 0.2], [0.0, 0.0]);
        let q_seam = seam.insert(CellIndex::new(2, 2), [2.3, 2.3], [0.0, 0.0]);
        let pe_seam = compute_accelerations(&mut seam, &c);

        let mut interior = CellGrid::new(GridDims::new(3, 3), 2.5);
        let p_int = interior.insert(CellIndex::new(1, 1), [0.2, 0.2], [0.0, 0.0]);
        interior.insert(CellIndex::new(0, 0), [2.3, 2.3], [0.0, 0.0]);
        let pe_int = compute_accelerations(&mut interior, &c);

        let a_seam = seam.particle(p_seam).acceleration;
        let a_int = interior.particle(p_int).acceleration;
        assert!(a_seam[0] > 0.0 && a_seam[1] > 0.0, "{a_seam:?}");
        assert_relative_eq!(a_seam[0], a_int[0], max_relative = 1e-9);
        assert_relative_eq!(a_seam[1], a_int[1], max_relative = 1e-9);
        assert_relative_eq!(pe_seam, pe_int, max_relative = 1e-9);

        let a_q = seam.particle(q_seam).acceleration;
        assert_relative_eq!(a_q[0], -a_seam[0], max_relative = 1e-9);
    }

    #[test]
    fn net_force_vanishes_for_jittered_lattice() {
        let c = constants(4, 4, 2.5);
        let mut grid = CellGrid::new(GridDims::new(4, 4), 2.5);
        let mut rng = StdRng::seed_from_u64(11);
        for cell in grid.dims().cells().collect::<Vec<_>>() {
            for a in 0..2 {
                for b in 0..2 {
                    let x = (a as f64 + 0.5) * 1.25 + rng.random_range(-0.1..0.1);
                    let y = (b as f64 + 0.5) * 1.25 + rng.random_range(-0.1..0.1);
                    grid.insert(cell, [x, y], [0.0, 0.0]);
                }
            }
        }

        compute_accelerations(&mut grid, &c);

        let mut sum = [0.0; 2];
        let mut scale = 0.0f64;
        for p in grid.particles() {
            sum[0] += p.acceleration[0];
            sum[1] += p.acceleration[1];
            scale = scale.max(p.acceleration[0].abs()).max(p.acceleration[1].abs());
        }
        assert!(scale > 0.0);
        assert_abs_diff_eq!(sum[0], 0.0, epsilon = 1e-9 * scale * grid.len() as f64);
        assert_abs_diff_eq!(sum[1], 0.0, epsilon = 1e-9 * scale * grid.len() as f64);
    }
}
