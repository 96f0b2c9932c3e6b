//! Cell grid with index-linked particle lists.
//!
//! The grid owns every particle in a single arena and threads them through
//! per-cell doubly-linked lists using [`ParticleId`] links instead of
//! pointers. Moving a particle between cells is an O(1) unlink/relink and
//! never invalidates an identifier.

use std::fmt;

use super::particle::{Particle, ParticleId};

/// Zero-based index of a real cell: `i` along x, `j` along y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellIndex {
    pub i: usize,
    pub j: usize,
}

impl CellIndex {
    #[inline]
    pub const fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// Number of real cells along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDims {
    pub nx: usize,
    pub ny: usize,
}

impl GridDims {
    #[inline]
    pub const fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny }
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    #[inline]
    pub fn contains(&self, cell: CellIndex) -> bool {
        cell.i < self.nx && cell.j < self.ny
    }

    /// Iterates every real cell, `i`-major.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + use<> {
        let ny = self.ny;
        (0..self.nx).flat_map(move |i| (0..ny).map(move |j| CellIndex::new(i, j)))
    }

    #[inline]
    pub(crate) fn flat(&self, cell: CellIndex) -> usize {
        assert!(
            self.contains(cell),
            "cell {cell} outside {} × {} grid",
            self.nx,
            self.ny
        );
        cell.i * self.ny + cell.j
    }
}

/// Periodic 2-D grid of square cells, each holding an unordered particle list.
///
/// Every method taking a [`CellIndex`] panics if the index lies outside
/// [`dims`](Self::dims).
#[derive(Debug, Clone)]
pub struct CellGrid {
    dims: GridDims,
    cell_size: f64,
    heads: Vec<Option<ParticleId>>,
    particles: Vec<Particle>,
}

impl CellGrid {
    /// Creates an empty grid.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or `cell_size` is not a positive
    /// finite number. Configuration validation rejects both before a grid is
    /// ever built from user input.
    pub fn new(dims: GridDims, cell_size: f64) -> Self {
        assert!(dims.nx > 0 && dims.ny > 0, "Grid dimensions must be non-zero");
        assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "Cell size must be positive"
        );
        Self {
            dims,
            cell_size,
            heads: vec![None; dims.cell_count()],
            particles: Vec::new(),
        }
    }

    /// Same as [`new`](Self::new) but reserves arena space up front.
    pub fn with_capacity(dims: GridDims, cell_size: f64, capacity: usize) -> Self {
        let mut grid = Self::new(dims, cell_size);
        grid.particles.reserve_exact(capacity);
        grid
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Side lengths of the periodic domain.
    #[inline]
    pub fn extent(&self) -> [f64; 2] {
        [
            self.dims.nx as f64 * self.cell_size,
            self.dims.ny as f64 * self.cell_size,
        ]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn particle(&self, id: ParticleId) -> &Particle {
        &self.particles[id.0]
    }

    #[inline]
    pub fn particle_mut(&mut self, id: ParticleId) -> &mut Particle {
        &mut self.particles[id.0]
    }

    /// All particles in arena order. Links are crate-private, so callers can
    /// change kinematics without corrupting cell membership.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    #[inline]
    pub fn head(&self, cell: CellIndex) -> Option<ParticleId> {
        self.heads[self.dims.flat(cell)]
    }

    /// Lower-left corner of a real cell in global coordinates.
    #[inline]
    pub fn origin(&self, cell: CellIndex) -> [f64; 2] {
        [
            cell.i as f64 * self.cell_size,
            cell.j as f64 * self.cell_size,
        ]
    }

    /// Global coordinates of a particle owned by `cell`.
    #[inline]
    pub fn global_position(&self, cell: CellIndex, id: ParticleId) -> [f64; 2] {
        let origin = self.origin(cell);
        let local = self.particles[id.0].position;
        [origin[0] + local[0], origin[1] + local[1]]
    }

    /// Links `id` at the head of `cell`'s list.
    pub fn add(&mut self, cell: CellIndex, id: ParticleId) {
        let slot = self.dims.flat(cell);
        let old_head = self.heads[slot];

        if let Some(head) = old_head {
            self.particles[head.0].prev = Some(id);
        }

        let particle = &mut self.particles[id.0];
        particle.prev = None;
        particle.next = old_head;

        self.heads[slot] = Some(id);
    }

    /// Unlinks `id` from `cell`'s list and clears its links.
    ///
    /// The particle must currently be a member of `cell`.
    pub fn remove(&mut self, cell: CellIndex, id: ParticleId) {
        debug_assert!(
            self.members(cell).any(|member| member == id),
            "particle {id} is not a member of cell {cell:?}"
        );

        let slot = self.dims.flat(cell);
        let (prev, next) = {
            let p = &self.particles[id.0];
            (p.prev, p.next)
        };

        if self.heads[slot] == Some(id) {
            self.heads[slot] = next;
        }
        if let Some(prev) = prev {
            self.particles[prev.0].next = next;
        }
        if let Some(next) = next {
            self.particles[next.0].prev = prev;
        }

        let particle = &mut self.particles[id.0];
        particle.next = None;
        particle.prev = None;
    }

    /// Moves `id` from `from` to `to`.
    #[inline]
    pub fn relink(&mut self, from: CellIndex, to: CellIndex, id: ParticleId) {
        self.remove(from, id);
        self.add(to, id);
    }

    /// Creates a particle at a local position inside `cell`.
    pub fn insert(&mut self, cell: CellIndex, local: [f64; 2], velocity: [f64; 2]) -> ParticleId {
        let id = ParticleId(self.particles.len());
        self.particles.push(Particle::new(local, velocity));
        self.add(cell, id);
        id
    }

    /// Creates a particle from a global position, wrapping it into the
    /// periodic domain first.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is not finite.
    pub fn insert_global(&mut self, position: [f64; 2], velocity: [f64; 2]) -> ParticleId {
        let (cell, local) = self.locate(position);
        self.insert(cell, local, velocity)
    }

    /// Owning cell and local coordinate for a global position.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is not finite.
    pub fn locate(&self, position: [f64; 2]) -> (CellIndex, [f64; 2]) {
        assert!(
            position.iter().all(|c| c.is_finite()),
            "Position {position:?} is not finite"
        );
        let (i, x) = split_axis(position[0], self.dims.nx, self.cell_size);
        let (j, y) = split_axis(position[1], self.dims.ny, self.cell_size);
        (CellIndex::new(i, j), [x, y])
    }

    /// Iterates the particles linked into `cell`.
    pub fn members(&self, cell: CellIndex) -> Members<'_> {
        Members {
            grid: self,
            cursor: self.head(cell),
        }
    }

    /// Iterates `(cell, particle)` over every real cell in index order.
    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, ParticleId)> + '_ {
        self.dims
            .cells()
            .flat_map(move |cell| self.members(cell).map(move |id| (cell, id)))
    }

    #[inline]
    pub(crate) fn next_of(&self, id: ParticleId) -> Option<ParticleId> {
        self.particles[id.0].next
    }
}

/// Iterator over one cell's list, following `next` links.
#[derive(Debug, Clone)]
pub struct Members<'a> {
    grid: &'a CellGrid,
    cursor: Option<ParticleId>,
}

impl Iterator for Members<'_> {
    type Item = ParticleId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self.grid.next_of(current);
        Some(current)
    }
}

fn split_axis(coord: f64, n: usize, cell_size: f64) -> (usize, f64) {
    let extent = n as f64 * cell_size;
    let mut wrapped = coord.rem_euclid(extent);
    if wrapped >= extent {
        wrapped = 0.0;
    }

    let idx = ((wrapped / cell_size) as usize).min(n - 1);
    let local = (wrapped - idx as f64 * cell_size).max(0.0);
    if local >= cell_size {
        // Division rounded down across a cell edge.
        return ((idx + 1) % n, 0.0);
    }
    (idx, local)
}
