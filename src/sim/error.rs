//! Error types for the simulation engine.
//!
//! Two failure classes exist at runtime: a configuration that cannot drive
//! the cell-list scheme, rejected before any step runs, and a particle that
//! crossed more than one cell boundary in a single step.

use thiserror::Error;

use crate::model::grid::CellIndex;
use crate::model::particle::ParticleId;

/// Errors that can occur while setting up or stepping a [`Simulation`](super::Simulation).
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The configuration violates a setup invariant.
    ///
    /// The most important one is `cutoff <= cell_size`, which keeps the
    /// 3×3 neighborhood scan exhaustive.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Failed to parse a TOML configuration document.
    #[error("failed to parse simulation configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A particle left its cell by more than one cell width in one step.
    ///
    /// There is no well-defined destination cell, so the run must stop.
    /// The usual cause is a timestep too large for the particle velocities.
    #[error(
        "particle {particle} in cell {cell} moved more than one cell in a single step \
         (local position {position:?}, cell size {cell_size})"
    )]
    DisplacementExceeded {
        /// The offending particle.
        particle: ParticleId,
        /// Cell the particle was in before the step.
        cell: CellIndex,
        /// Local position after the drift.
        position: [f64; 2],
        /// Configured cell edge length.
        cell_size: f64,
    },

    /// A caller-supplied grid does not match the configuration.
    #[error("grid does not match configuration: {0}")]
    GridMismatch(String),
}

impl Error {
    /// Creates an [`InvalidConfiguration`](Error::InvalidConfiguration) error.
    pub fn invalid_configuration(details: impl Into<String>) -> Self {
        Self::InvalidConfiguration(details.into())
    }
}
