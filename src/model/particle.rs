use std::fmt;

/// Stable handle to a particle inside a [`CellGrid`](super::grid::CellGrid) arena.
///
/// Identifiers are assigned in insertion order and never reused; particles are
/// created once during setup and only ever relinked between cells afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub(crate) usize);

impl ParticleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kinematic state of one particle plus its links within the owning cell.
///
/// `position` is local to the owning cell: between migration passes it lies
/// in `[0, cell_size)` on both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    pub acceleration: [f64; 2],
    pub(crate) next: Option<ParticleId>,
    pub(crate) prev: Option<ParticleId>,
}

impl Particle {
    pub fn new(position: [f64; 2], velocity: [f64; 2]) -> Self {
        Self {
            position,
            velocity,
            acceleration: [0.0; 2],
            next: None,
            prev: None,
        }
    }

    #[inline]
    pub fn speed_sq(&self) -> f64 {
        self.velocity[0] * self.velocity[0] + self.velocity[1] * self.velocity[1]
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.next.is_some() || self.prev.is_some()
    }
}
