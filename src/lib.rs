//! Interactive RVEA with slowly adapting reference vectors.
//!
//! An [`IterationController`] evolves a [`Population`] against a
//! [`ReferenceVectorSet`] using angle-penalized distance selection. Between
//! interactive iterations a [`BoundaryPolicy`] reshapes the vectors; the
//! default [`SlowInteractiveAdaptation`] turns them a bounded angle toward
//! the decision maker's preference point on every boundary.

pub mod array_solution;
pub mod config;
mod ens_nondominating_sorting;
pub mod error;
pub mod optimizers;
pub mod population;
pub mod problem;

pub use crate::config::{ControllerState, EaParameters, RunState};
pub use crate::error::{Error, Result};
pub use crate::optimizers::reference_vectors::{CreationType, ReferenceVectorSet};
pub use crate::optimizers::rvea::apd_selection::apd_select;
pub use crate::optimizers::rvea::boundary::{BoundaryContext, BoundaryPolicy, SlowInteractiveAdaptation};
pub use crate::optimizers::rvea::IterationController;
pub use crate::population::Population;

/// A simple ratio type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio(pub u32, pub u32);
