//! Moves particles whose local coordinates left their cell after a drift.

use log::warn;

use super::boundary::PeriodicBoundary;
use super::error::Error;
use crate::model::grid::CellGrid;

/// Relinks every particle that drifted out of `[0, cell_size)` into the
/// neighboring cell it entered, rebasing its local coordinate.
///
/// Returns the number of particles that changed cell.
///
/// # Errors
///
/// Returns [`Error::DisplacementExceeded`] if a particle moved further than
/// one cell width. The offending particle is left untouched in its cell, so
/// every particle is still linked into exactly one list, but the run cannot
/// continue.
pub fn migrate_particles(grid: &mut CellGrid) -> Result<usize, Error> {
    let dims = grid.dims();
    let cell_size = grid.cell_size();
    let boundary = PeriodicBoundary::new(dims, cell_size);
    let mut moved = 0;

    for cell in dims.cells() {
        let mut cursor = grid.head(cell);
        while let Some(id) = cursor {
            // Relinking rewrites `next`, so advance first.
            cursor = grid.next_of(id);

            let position = grid.particle(id).position;
            let (si, x) = rebase_axis(position[0], cell_size);
            let (sj, y) = rebase_axis(position[1], cell_size);
            let (Some(si), Some(sj)) = (si, sj) else {
                warn!(
                    "particle {id} in cell {cell} left its neighborhood (local position {position:?})"
                );
                return Err(Error::DisplacementExceeded {
                    particle: id,
                    cell,
                    position,
                    cell_size,
                });
            };

            if si == 0 && sj == 0 {
                grid.particle_mut(id).position = [x, y];
                continue;
            }

            let target = boundary.wrap(cell.i as isize + si, cell.j as isize + sj);
            grid.particle_mut(id).position = [x, y];
            grid.relink(cell, target, id);
            moved += 1;
        }
    }

    Ok(moved)
}

/// Cell shift in `{-1, 0, 1}` and rebased coordinate along one axis, or
/// `None` if the coordinate is more than one cell outside `[0, cell_size)`.
fn rebase_axis(coord: f64, cell_size: f64) -> (Option<isize>, f64) {
    if !(coord >= -cell_size && coord < 2.0 * cell_size) {
        return (None, coord);
    }
    if coord < 0.0 {
        let rebased = coord + cell_size;
        if rebased >= cell_size {
            // A tiny negative excursion rounded back onto the upper edge.
            return (Some(0), 0.0);
        }
        return (Some(-1), rebased);
    }
    if coord >= cell_size {
        return (Some(1), coord - cell_size);
    }
    (Some(0), coord)
}
