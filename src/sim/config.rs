//! Run configuration and the constants derived from it.
//!
//! [`SimulationConfig`] is the user-facing description of a run and can be
//! loaded from TOML. [`Constants`] is computed from it once, after
//! validation, and is what every engine stage reads.

use serde::Deserialize;

use super::error::Error;
use crate::model::grid::GridDims;

/// Configuration for a periodic Lennard-Jones cell-list run.
///
/// Every field has a default, so a TOML document only needs the keys it
/// changes.
///
/// # Examples
///
/// ```
/// use cellmd::SimulationConfig;
///
/// let config = SimulationConfig {
///     cells_x: 8,
///     cells_y: 8,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of real cells along x.
    pub cells_x: usize,

    /// Number of real cells along y.
    pub cells_y: usize,

    /// Lattice points per cell per axis at setup.
    pub particles_per_dim: usize,

    /// Edge length of one square cell.
    pub cell_size: f64,

    /// Interaction cutoff radius. Must not exceed `cell_size`.
    pub cutoff: f64,

    /// Simulated end time.
    pub end_time: f64,

    /// Number of integration steps.
    pub iterations: usize,

    /// Explicit timestep.
    ///
    /// When set, the step count becomes `ceil(end_time / time_step)` and
    /// the effective timestep is recomputed from it so the run still ends
    /// exactly at `end_time`.
    pub time_step: Option<f64>,

    /// Initial temperature used to scale velocity magnitudes.
    pub temperature: f64,

    /// Seed for initial velocity directions.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cells_x: 500,
            cells_y: 500,
            particles_per_dim: 2,
            cell_size: 2.5,
            cutoff: 2.5,
            end_time: 0.5,
            iterations: 1000,
            time_step: None,
            temperature: 1.0,
            seed: 100,
        }
    }
}

impl SimulationConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml(source: &str) -> Result<Self, Error> {
        Ok(toml::from_str(source)?)
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        GridDims::new(self.cells_x, self.cells_y)
    }

    /// Total particle count placed by the initial lattice.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.cells_x * self.cells_y * self.particles_per_dim * self.particles_per_dim
    }

    /// Checks every setup invariant.
    pub fn validate(&self) -> Result<(), Error> {
        if self.cells_x == 0 || self.cells_y == 0 {
            return Err(Error::invalid_configuration(format!(
                "grid must have at least one cell per axis (got {} × {})",
                self.cells_x, self.cells_y
            )));
        }
        if self.particles_per_dim == 0 {
            return Err(Error::invalid_configuration(
                "particles per dimension must be at least 1",
            ));
        }

        ensure_positive("cell size", self.cell_size)?;
        ensure_positive("cutoff", self.cutoff)?;
        ensure_positive("end time", self.end_time)?;
        if let Some(dt) = self.time_step {
            ensure_positive("time step", dt)?;
        } else if self.iterations == 0 {
            return Err(Error::invalid_configuration(
                "iteration count must be at least 1",
            ));
        }

        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(Error::invalid_configuration(format!(
                "temperature must be a non-negative number (got {})",
                self.temperature
            )));
        }

        if self.cutoff > self.cell_size {
            return Err(Error::invalid_configuration(format!(
                "cutoff {} exceeds cell size {}; the cell size must be greater than or equal to the cutoff",
                self.cutoff, self.cell_size
            )));
        }

        Ok(())
    }

    /// Step count after resolving an explicit timestep.
    pub fn resolved_iterations(&self) -> usize {
        match self.time_step {
            Some(dt) => ((self.end_time / dt).ceil() as usize).max(1),
            None => self.iterations,
        }
    }
}

fn ensure_positive(name: &str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_configuration(format!(
            "{name} must be a positive number (got {value})"
        )))
    }
}

/// Immutable values derived once from a validated [`SimulationConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constants {
    pub cell_size: f64,
    pub cutoff: f64,
    pub cutoff_sq: f64,
    pub cutoff_inv2: f64,
    pub cutoff_inv6: f64,
    /// Pair potential at the cutoff.
    pub uc: f64,
    /// Slope of the pair potential at the cutoff.
    pub duc: f64,
    pub dt: f64,
    pub half_dt: f64,
    pub iterations: usize,
}

impl Constants {
    /// Validates `config` and computes the derived constants.
    pub fn derive(config: &SimulationConfig) -> Result<Self, Error> {
        config.validate()?;

        let cutoff = config.cutoff;
        let cutoff_sq = cutoff * cutoff;
        let cutoff_inv2 = 1.0 / cutoff_sq;
        let cutoff_inv6 = cutoff_inv2 * cutoff_inv2 * cutoff_inv2;

        let uc = 4.0 * cutoff_inv6 * (cutoff_inv6 - 1.0);
        let duc = -48.0 * cutoff_inv6 * (cutoff_inv6 - 0.5) / cutoff;

        let iterations = config.resolved_iterations();
        let dt = config.end_time / iterations as f64;

        Ok(Self {
            cell_size: config.cell_size,
            cutoff,
            cutoff_sq,
            cutoff_inv2,
            cutoff_inv6,
            uc,
            duc,
            dt,
            half_dt: dt / 2.0,
            iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small() -> SimulationConfig {
        SimulationConfig {
            cells_x: 4,
            cells_y: 3,
            ..Default::default()
        }
    }

    #[test]
    fn default_config_values() {
        let config = SimulationConfig::default();
        assert_eq!(config.cells_x, 500);
        assert_eq!(config.cells_y, 500);
        assert_eq!(config.particles_per_dim, 2);
        assert_eq!(config.cell_size, 2.5);
        assert_eq!(config.cutoff, 2.5);
        assert_eq!(config.end_time, 0.5);
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.seed, 100);
        assert!(config.time_step.is_none());
    }

    #[test]
    fn particle_count_from_lattice() {
        let config = SimulationConfig {
            particles_per_dim: 3,
            ..small()
        };
        assert_eq!(config.particle_count(), 4 * 3 * 9);
    }

    #[test]
    fn rejects_cutoff_larger_than_cell() {
        let config = SimulationConfig {
            cutoff: 3.0,
            ..small()
        };
        let err = config.validate().expect_err("cutoff > cell size");
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(err.to_string().contains("exceeds cell size"));
    }

    #[test]
    fn accepts_cutoff_equal_to_cell() {
        assert!(small().validate().is_ok());
    }

    #[test]
    fn rejects_empty_grid() {
        let config = SimulationConfig {
            cells_y: 0,
            ..small()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        let config = SimulationConfig {
            end_time: f64::NAN,
            ..small()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            time_step: Some(-1.0),
            ..small()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn derives_timestep_from_end_time() {
        let constants = Constants::derive(&small()).unwrap();
        assert_eq!(constants.iterations, 1000);
        assert_relative_eq!(constants.dt, 5e-4);
        assert_relative_eq!(constants.half_dt, 2.5e-4);
    }

    #[test]
    fn explicit_time_step_sets_iterations() {
        let config = SimulationConfig {
            end_time: 1.0,
            time_step: Some(0.003),
            ..small()
        };
        let constants = Constants::derive(&config).unwrap();
        assert_eq!(constants.iterations, 334);
        assert_relative_eq!(constants.dt * 334.0, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn shift_constants_match_cutoff() {
        let constants = Constants::derive(&small()).unwrap();
        let rc6 = 2.5f64.powi(-6);
        assert_relative_eq!(constants.cutoff_sq, 6.25);
        assert_relative_eq!(constants.cutoff_inv6, rc6);
        assert_relative_eq!(constants.uc, 4.0 * rc6 * (rc6 - 1.0));
        assert_relative_eq!(constants.duc, -48.0 * rc6 * (rc6 - 0.5) / 2.5);
    }

    #[test]
    fn parses_partial_toml() {
        let config = SimulationConfig::from_toml(
            r#"
                cells_x = 16
                cells_y = 8
                cutoff = 2.0
                seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.cells_x, 16);
        assert_eq!(config.cells_y, 8);
        assert_eq!(config.cutoff, 2.0);
        assert_eq!(config.seed, 7);
        assert_eq!(config.cell_size, 2.5);
    }

    #[test]
    fn errors_on_unknown_toml_key() {
        let result = SimulationConfig::from_toml("cellz = 3");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }
}
