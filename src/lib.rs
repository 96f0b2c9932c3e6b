//! A cell-list molecular dynamics engine for two-dimensional Lennard-Jones
//! systems with periodic boundaries.
//!
//! The domain is split into square cells at least as wide as the interaction
//! cutoff, so every interacting pair lives in the same or an adjacent cell.
//! Particles are kept in per-cell linked lists, stored with coordinates local
//! to their cell, and integrated with velocity Verlet.
//!
//! # Features
//!
//! - **Cell lists** — Arena-backed, index-linked lists with O(1) insert,
//!   remove, and relink
//! - **Periodic boundaries** — Neighbor cells and image offsets resolved by
//!   modular index arithmetic, no ghost layer to keep in sync
//! - **Shifted Lennard-Jones** — Potential energy shifted to vanish smoothly
//!   at the cutoff
//! - **Parallel forces** — Cells evaluated concurrently with deterministic
//!   energy reduction
//! - **VTK output** — Particle snapshots and grid overlays for ParaView
//!
//! # Quick Start
//!
//! ```
//! use cellmd::{SimError, Simulation, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     cells_x: 6,
//!     cells_y: 6,
//!     end_time: 0.01,
//!     iterations: 10,
//!     ..Default::default()
//! };
//!
//! let mut sim = Simulation::new(config)?;
//! assert_eq!(sim.grid().len(), 6 * 6 * 4);
//!
//! while !sim.is_finished() {
//!     let energies = sim.step()?;
//!     assert!(energies.total().is_finite());
//! }
//!
//! let snapshot = sim.snapshot();
//! assert_eq!(snapshot.iteration, 10);
//! assert_eq!(snapshot.positions.len(), 144);
//! # Ok::<(), SimError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — VTK writers and output file naming
//! - [`Simulation`] — Setup and the kick-drift-kick step
//! - [`SimulationConfig`] — Run parameters, loadable from TOML
//!
//! # Data Types
//!
//! - [`CellGrid`] — The periodic grid that owns all particles
//! - [`CellIndex`], [`GridDims`] — Cell addressing
//! - [`Particle`], [`ParticleId`] — Per-particle state and its stable handle
//! - [`Energies`], [`Snapshot`] — Per-step output
//!
//! # Engine Stages
//!
//! The individual stages are public for callers that drive a [`CellGrid`]
//! directly: [`half_kick_and_drift`], [`migrate_particles`],
//! [`compute_accelerations`], and [`half_kick`]. Initial conditions come from
//! [`place_lattice`] and [`assign_velocities`].

mod model;
mod sim;

pub mod io;

pub use model::grid::{CellGrid, CellIndex, GridDims, Members};
pub use model::particle::{Particle, ParticleId};
pub use model::snapshot::{Energies, Snapshot};

pub use sim::{
    Constants, NeighborCell, PeriodicBoundary, Simulation, SimulationConfig, assign_velocities,
    compute_accelerations, half_kick, half_kick_and_drift, kinetic_energy, lj_pair,
    migrate_particles, place_lattice,
};

pub use sim::Error as SimError;
