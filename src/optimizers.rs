use crate::error::Result;

pub mod reference_directions;
pub mod reference_vectors;
pub mod rvea;

pub trait Optimizer<S>
{
    fn name(&self) -> &str;

    /// Runs until the optimizer's own termination criterion is met.
    fn optimize(&mut self) -> Result<()>;

    /// Non-dominated members of the current population with their objectives.
    fn best_solutions(&self) -> Vec<(Vec<f64>, S)>;
}
