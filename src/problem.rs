pub mod dtlz;

use dyn_clone::DynClone;

/// Benchmark metadata used when reporting on a run.
pub trait Problem: DynClone {
    fn name(&self) -> &str;
    fn problem_class_name(&self) -> &str;

    /// Distance-to-front measure of a decision vector; lower is better.
    fn convergence_metric(&self, x: &[f64]) -> f64;
    fn best_metric(&self) -> f64;

    /// `(min, max)` corners of the box the 3-objective front fits in.
    fn plot_3d_bounds(&self) -> ([f64; 3], [f64; 3]);
}

dyn_clone::clone_trait_object!(Problem);
