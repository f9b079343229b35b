use log::debug;
use crate::error::Result;
use crate::optimizers::reference_vectors::ReferenceVectorSet;

/// What a [`BoundaryPolicy`] sees when an interactive iteration ends.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryContext<'a> {
    /// Generations run in the iteration that just ended.
    pub generation: usize,
    /// Iterations completed before this boundary.
    pub iteration: usize,
    pub iterations: usize,
    pub total_generations: usize,
    /// Active preference point of the run.
    pub reference_point: &'a [f64],
    /// Objective vectors of the current population.
    pub objectives: &'a [Vec<f64>],
}

/// Hook run by the controller between two interactive iterations.
///
/// It is the only behaviour that differs between RVEA variants; mating,
/// selection and counters are shared by the controller.
pub trait BoundaryPolicy {
    fn name(&self) -> &str {
        "custom"
    }

    fn on_iteration_boundary(&mut self,
                             reference_vectors: &mut ReferenceVectorSet,
                             context: &BoundaryContext) -> Result<()>;
}

impl<F> BoundaryPolicy for F
    where
        F: FnMut(&mut ReferenceVectorSet, &BoundaryContext) -> Result<()>
{
    fn on_iteration_boundary(&mut self,
                             reference_vectors: &mut ReferenceVectorSet,
                             context: &BoundaryContext) -> Result<()>
    {
        self(reference_vectors, context)
    }
}

/// Pins down the signature of a closure used as a [`BoundaryPolicy`].
///
/// ```
/// use sss_irvea::optimizers::rvea::boundary::boundary_hook;
///
/// let mut calls = 0;
/// let _hook = boundary_hook(move |_, _| {
///     calls += 1;
///     Ok(())
/// });
/// ```
pub fn boundary_hook<F>(hook: F) -> F
    where
        F: FnMut(&mut ReferenceVectorSet, &BoundaryContext) -> Result<()>
{
    hook
}

/// Slowly rotates the vector set toward the run's preference point.
#[derive(Debug, Clone, Default)]
pub struct SlowInteractiveAdaptation {
    target_reached: bool,
}

impl SlowInteractiveAdaptation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last boundary brought the set onto the preference direction.
    pub fn target_reached(&self) -> bool {
        self.target_reached
    }
}

impl BoundaryPolicy for SlowInteractiveAdaptation {
    fn name(&self) -> &str {
        "slow interactive adaptation"
    }

    fn on_iteration_boundary(&mut self,
                             reference_vectors: &mut ReferenceVectorSet,
                             context: &BoundaryContext) -> Result<()>
    {
        self.target_reached = reference_vectors.slow_interactive_adapt(context.reference_point)?;

        if self.target_reached {
            debug!("reference vectors reached preference direction {:?}", context.reference_point);
        }

        Ok(())
    }
}

/// Rescales the vectors by the spread of the current objectives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectiveRangeAdaptation;

impl BoundaryPolicy for ObjectiveRangeAdaptation {
    fn name(&self) -> &str {
        "objective range adaptation"
    }

    fn on_iteration_boundary(&mut self,
                             reference_vectors: &mut ReferenceVectorSet,
                             context: &BoundaryContext) -> Result<()>
    {
        reference_vectors.adapt_to_objective_range(context.objectives)
    }
}

/// Narrows the vectors toward their focal direction as iterations pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduledAdaptation;

impl BoundaryPolicy for ScheduledAdaptation {
    fn name(&self) -> &str {
        "scheduled adaptation"
    }

    fn on_iteration_boundary(&mut self,
                             reference_vectors: &mut ReferenceVectorSet,
                             context: &BoundaryContext) -> Result<()>
    {
        reference_vectors.adapt(context.iteration + 1, context.iterations);
        Ok(())
    }
}
