/// Mean per-particle energies after a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Energies {
    pub potential: f64,
    pub kinetic: f64,
}

impl Energies {
    #[inline]
    pub fn total(&self) -> f64 {
        self.potential + self.kinetic
    }

    /// Instantaneous temperature in reduced units, `2/3 · KE`.
    #[inline]
    pub fn temperature(&self) -> f64 {
        self.kinetic * (2.0 / 3.0)
    }
}

/// Global particle coordinates plus scalar state at one instant.
///
/// Positions are ordered by cell (`i`-major), then by list order within the
/// cell; the order is not stable across steps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub iteration: usize,
    pub time: f64,
    pub energies: Energies,
    pub positions: Vec<[f64; 2]>,
}

impl Snapshot {
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_components() {
        let e = Energies {
            potential: -2.5,
            kinetic: 1.0,
        };
        assert_eq!(e.total(), -1.5);
    }

    #[test]
    fn temperature_is_two_thirds_kinetic() {
        let e = Energies {
            potential: 0.0,
            kinetic: 1.5,
        };
        assert!((e.temperature() - 1.0).abs() < 1e-15);
    }
}
