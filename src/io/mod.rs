//! Snapshot output.
//!
//! Particle snapshots are written as VTK XML PolyData (`.vtp`) and the cell
//! grid as VTK ImageData (`.vti`), both in ASCII so they can be opened
//! directly in ParaView or VisIt.

pub mod error;
pub mod vtk;

pub use error::Error;
pub use vtk::{DEFAULT_BASENAME, OutputPaths, scientific, write_mesh, write_particles};
