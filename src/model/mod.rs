//! Plain data carried through the engine.
//!
//! - [`particle`] – Per-particle kinematics and list links.
//! - [`grid`] – The periodic cell grid that owns every particle.
//! - [`snapshot`] – Energies and global coordinates handed to output sinks.

pub mod grid;
pub mod particle;
pub mod snapshot;
