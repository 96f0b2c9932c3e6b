//! The simulation engine.
//!
//! A [`Simulation`] owns the cell grid and the derived [`Constants`] and
//! advances the system one kick-drift-kick step at a time:
//!
//! 1. [`half_kick_and_drift`] with the previous accelerations.
//! 2. [`migrate_particles`] to restore cell membership.
//! 3. [`compute_accelerations`] over the periodic 3×3 neighborhoods.
//! 4. [`half_kick`] with the new accelerations.
//!
//! The stages are also exported individually for callers that drive a
//! [`CellGrid`] themselves.

mod boundary;
mod config;
mod error;
mod forces;
mod integrator;
mod lattice;
mod migrate;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::model::grid::CellGrid;
use crate::model::snapshot::{Energies, Snapshot};

pub use boundary::{NeighborCell, PeriodicBoundary};
pub use config::{Constants, SimulationConfig};
pub use error::Error;
pub use forces::{compute_accelerations, lj_pair};
pub use integrator::{half_kick, half_kick_and_drift, kinetic_energy};
pub use lattice::{assign_velocities, place_lattice};
pub use migrate::migrate_particles;

/// A periodic 2-D Lennard-Jones system and its step counter.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    constants: Constants,
    grid: CellGrid,
    iteration: usize,
    energies: Energies,
    fault: Option<Error>,
}

impl Simulation {
    /// Builds the initial lattice with seeded random velocities and
    /// evaluates the starting forces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails
    /// validation.
    pub fn new(config: SimulationConfig) -> Result<Self, Error> {
        let constants = Constants::derive(&config)?;
        info!(
            "Setting up {} particles on a {} × {} grid (dt = {:.6e}, {} steps)",
            config.particle_count(),
            config.cells_x,
            config.cells_y,
            constants.dt,
            constants.iterations
        );

        let mut grid =
            CellGrid::with_capacity(config.dims(), config.cell_size, config.particle_count());
        place_lattice(&mut grid, config.particles_per_dim);

        let mut rng = StdRng::seed_from_u64(config.seed);
        assign_velocities(&mut grid, config.temperature, &mut rng);

        Ok(Self::start(config, constants, grid))
    }

    /// Wraps a grid the caller populated.
    ///
    /// Velocities are used as given. Forces are evaluated once so the first
    /// step starts from valid accelerations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation
    /// and [`Error::GridMismatch`] if the grid's dimensions or cell size
    /// differ from the configuration, or if a particle is not linked into
    /// exactly one cell with a local position inside it.
    pub fn from_grid(config: SimulationConfig, grid: CellGrid) -> Result<Self, Error> {
        let constants = Constants::derive(&config)?;
        if grid.dims() != config.dims() {
            return Err(Error::GridMismatch(format!(
                "grid has {} × {} cells, configuration expects {} × {}",
                grid.dims().nx,
                grid.dims().ny,
                config.cells_x,
                config.cells_y
            )));
        }
        if grid.cell_size() != config.cell_size {
            return Err(Error::GridMismatch(format!(
                "grid cell size {} differs from configured {}",
                grid.cell_size(),
                config.cell_size
            )));
        }
        check_membership(&grid)?;
        Ok(Self::start(config, constants, grid))
    }

    fn start(config: SimulationConfig, constants: Constants, mut grid: CellGrid) -> Self {
        let potential = compute_accelerations(&mut grid, &constants);
        let kinetic = kinetic_energy(&grid);
        debug!("Initial energies: potential {potential:.6e}, kinetic {kinetic:.6e}");
        Self {
            config,
            constants,
            grid,
            iteration: 0,
            energies: Energies { potential, kinetic },
            fault: None,
        }
    }

    /// Advances one timestep and returns the resulting energies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DisplacementExceeded`] if a particle crossed more
    /// than one cell. Once that happens the state is no longer a valid
    /// trajectory, and every later call returns the same error.
    pub fn step(&mut self) -> Result<Energies, Error> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        half_kick_and_drift(&mut self.grid, &self.constants);
        if let Err(e) = migrate_particles(&mut self.grid) {
            self.fault = Some(e.clone());
            return Err(e);
        }
        let potential = compute_accelerations(&mut self.grid, &self.constants);
        let kinetic = half_kick(&mut self.grid, &self.constants);

        self.iteration += 1;
        self.energies = Energies { potential, kinetic };
        Ok(self.energies)
    }

    /// Global positions and scalar state at the current step.
    pub fn snapshot(&self) -> Snapshot {
        let positions = self
            .grid
            .iter()
            .map(|(cell, id)| self.grid.global_position(cell, id))
            .collect();
        Snapshot {
            iteration: self.iteration,
            time: self.time(),
            energies: self.energies,
            positions,
        }
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[inline]
    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    #[inline]
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Completed steps.
    #[inline]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Simulated time, `iteration · dt`.
    #[inline]
    pub fn time(&self) -> f64 {
        self.iteration as f64 * self.constants.dt
    }

    /// Energies after the most recent force evaluation.
    #[inline]
    pub fn energies(&self) -> Energies {
        self.energies
    }

    /// Whether the configured number of steps has been taken.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.iteration >= self.constants.iterations
    }

    /// The error that stopped the run, if a step failed.
    #[inline]
    pub fn fault(&self) -> Option<&Error> {
        self.fault.as_ref()
    }
}

/// Every particle must be linked exactly once, with a local position inside
/// its cell.
fn check_membership(grid: &CellGrid) -> Result<(), Error> {
    let cs = grid.cell_size();
    let mut seen = vec![false; grid.len()];

    for (cell, id) in grid.iter() {
        if std::mem::replace(&mut seen[id.index()], true) {
            return Err(Error::GridMismatch(format!(
                "particle {id} is linked more than once"
            )));
        }
        let local = grid.particle(id).position;
        if !local.iter().all(|c| (0.0..cs).contains(c)) {
            return Err(Error::GridMismatch(format!(
                "particle {id} at local position {local:?} lies outside cell {cell}"
            )));
        }
    }

    match seen.iter().position(|linked| !linked) {
        Some(k) => Err(Error::GridMismatch(format!(
            "particle #{k} is not linked into any cell"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::grid::{CellIndex, GridDims};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            cells_x: 4,
            cells_y: 4,
            particles_per_dim: 2,
            cell_size: 2.5,
            cutoff: 2.2,
            end_time: 0.1,
            iterations: 100,
            temperature: 0.1,
            seed: 42,
            ..Default::default()
        }
    }

    fn assert_membership(sim: &Simulation) {
        let grid = sim.grid();
        let cs = grid.cell_size();
        for (cell, id) in grid.iter() {
            let local = grid.particle(id).position;
            assert!((0.0..cs).contains(&local[0]), "{id} at {local:?}");
            assert!((0.0..cs).contains(&local[1]), "{id} at {local:?}");
            let (owner, _) = grid.locate(grid.global_position(cell, id));
            assert_eq!(owner, cell, "{id} listed in {cell} but located in {owner}");
        }
    }

    #[test]
    fn new_rejects_invalid_configuration() {
        let config = SimulationConfig {
            cutoff: 3.0,
            ..small_config()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn perfect_lattice_starts_force_free() {
        let sim = Simulation::new(small_config()).unwrap();
        assert_eq!(sim.grid().len(), 64);
        for p in sim.grid().particles() {
            assert_abs_diff_eq!(p.acceleration[0], 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(p.acceleration[1], 0.0, epsilon = 1e-9);
        }
        assert!(sim.energies().potential != 0.0);
    }

    #[test]
    fn initial_momentum_is_zero() {
        let sim = Simulation::new(small_config()).unwrap();
        let mut sum = [0.0; 2];
        for p in sim.grid().particles() {
            sum[0] += p.velocity[0];
            sum[1] += p.velocity[1];
        }
        assert_abs_diff_eq!(sum[0], 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(sum[1], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn total_energy_is_conserved() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let e0 = sim.energies().total();
        assert!(e0.abs() > 1e-6);

        while !sim.is_finished() {
            let e = sim.step().unwrap().total();
            assert!(
                ((e - e0) / e0).abs() < 1e-2,
                "energy drifted from {e0} to {e} at step {}",
                sim.iteration()
            );
        }
        assert_eq!(sim.iteration(), 100);
        assert_relative_eq!(sim.time(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn membership_holds_after_steps() {
        let config = SimulationConfig {
            temperature: 2.0,
            cutoff: 2.5,
            end_time: 0.5,
            iterations: 250,
            ..small_config()
        };
        let mut sim = Simulation::new(config).unwrap();
        for _ in 0..250 {
            sim.step().unwrap();
        }
        assert_membership(&sim);
        assert_eq!(sim.grid().len(), 64);
    }

    #[test]
    fn particle_crosses_into_next_cell() {
        let config = SimulationConfig {
            cells_x: 3,
            cells_y: 3,
            end_time: 1.0,
            iterations: 100,
            ..small_config()
        };
        let mut grid = CellGrid::new(GridDims::new(3, 3), 2.5);
        let id = grid.insert(CellIndex::new(1, 1), [2.5 - 1e-3, 1.0], [1.0, 0.0]);

        let mut sim = Simulation::from_grid(config, grid).unwrap();
        sim.step().unwrap();

        let grid = sim.grid();
        assert_eq!(grid.head(CellIndex::new(2, 1)), Some(id));
        assert_relative_eq!(grid.particle(id).position[0], 0.01 - 1e-3, epsilon = 1e-12);
    }

    #[test]
    fn particle_exits_left_and_wraps() {
        let config = SimulationConfig {
            cells_x: 3,
            cells_y: 3,
            end_time: 1.0,
            iterations: 100,
            ..small_config()
        };
        let mut grid = CellGrid::new(GridDims::new(3, 3), 2.5);
        let id = grid.insert(CellIndex::new(0, 1), [1e-3, 1.0], [-1.0, 0.0]);

        let mut sim = Simulation::from_grid(config, grid).unwrap();
        sim.step().unwrap();

        let grid = sim.grid();
        assert_eq!(grid.head(CellIndex::new(2, 1)), Some(id));
        assert_relative_eq!(grid.particle(id).position[0], 2.5 - 9e-3, epsilon = 1e-12);
    }

    #[test]
    fn fast_particle_aborts_step() {
        let config = SimulationConfig {
            cells_x: 3,
            cells_y: 3,
            end_time: 1.0,
            iterations: 10,
            ..small_config()
        };
        let mut grid = CellGrid::new(GridDims::new(3, 3), 2.5);
        grid.insert(CellIndex::new(1, 1), [1.0, 1.0], [50.0, 0.0]);

        let mut sim = Simulation::from_grid(config, grid).unwrap();
        assert!(matches!(
            sim.step(),
            Err(Error::DisplacementExceeded { .. })
        ));
        assert!(sim.fault().is_some());
    }

    #[test]
    fn failed_step_keeps_failing() {
        let config = SimulationConfig {
            cells_x: 3,
            cells_y: 3,
            end_time: 1.0,
            iterations: 10,
            ..small_config()
        };
        let mut grid = CellGrid::new(GridDims::new(3, 3), 2.5);
        let id = grid.insert(CellIndex::new(1, 1), [1.0, 1.0], [50.0, 0.0]);

        let mut sim = Simulation::from_grid(config, grid).unwrap();
        let first = sim.step().unwrap_err();
        let position = sim.grid().particle(id).position;

        for _ in 0..3 {
            let again = sim.step().unwrap_err();
            assert_eq!(again.to_string(), first.to_string());
        }
        assert_eq!(sim.iteration(), 0);
        assert_eq!(sim.grid().particle(id).position, position);
    }

    #[test]
    fn from_grid_rejects_particle_outside_its_cell() {
        let mut grid = CellGrid::new(GridDims::new(4, 4), 2.5);
        grid.insert(CellIndex::new(1, 2), [3.0, 0.5], [0.0, 0.0]);
        assert!(matches!(
            Simulation::from_grid(small_config(), grid),
            Err(Error::GridMismatch(msg)) if msg.contains("outside cell (1, 2)")
        ));
    }

    #[test]
    fn from_grid_rejects_unlinked_particle() {
        let mut grid = CellGrid::new(GridDims::new(4, 4), 2.5);
        let cell = CellIndex::new(0, 0);
        grid.insert(cell, [0.5, 0.5], [0.0, 0.0]);
        let id = grid.insert(cell, [1.5, 1.5], [0.0, 0.0]);
        grid.remove(cell, id);
        assert!(matches!(
            Simulation::from_grid(small_config(), grid),
            Err(Error::GridMismatch(msg)) if msg.contains("#1 is not linked")
        ));
    }

    #[test]
    fn from_grid_rejects_mismatched_dimensions() {
        let grid = CellGrid::new(GridDims::new(2, 4), 2.5);
        assert!(matches!(
            Simulation::from_grid(small_config(), grid),
            Err(Error::GridMismatch(_))
        ));

        let grid = CellGrid::new(GridDims::new(4, 4), 3.0);
        assert!(matches!(
            Simulation::from_grid(small_config(), grid),
            Err(Error::GridMismatch(_))
        ));
    }

    #[test]
    fn snapshot_reports_global_positions() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.step().unwrap();
        let snap = sim.snapshot();

        assert_eq!(snap.iteration, 1);
        assert_relative_eq!(snap.time, sim.constants().dt);
        assert_eq!(snap.particle_count(), 64);
        assert_eq!(snap.energies, sim.energies());
        let extent = sim.grid().extent();
        for p in &snap.positions {
            assert!((0.0..extent[0]).contains(&p[0]));
            assert!((0.0..extent[1]).contains(&p[1]));
        }
    }

    #[test]
    fn runs_are_reproducible() {
        let run = || {
            let mut sim = Simulation::new(small_config()).unwrap();
            for _ in 0..20 {
                sim.step().unwrap();
            }
            sim.snapshot()
        };
        assert_eq!(run(), run());
    }
}
