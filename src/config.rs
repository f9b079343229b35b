//! Run parameters of the interactive RVEA.
//!
//! [`EaParameters`] is fixed for the lifetime of an
//! [`IterationController`](crate::optimizers::rvea::IterationController);
//! the counters that change while it runs live in [`RunState`].

use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

/// Immutable configuration of one interactive run.
///
/// Field names follow the option names accepted by the run configuration,
/// so a JSON object such as
/// `{"generations_per_iteration": 5, "iterations": 3, "Alpha": 2.0}`
/// deserializes directly.
///
/// ```
/// use sss_irvea::config::EaParameters;
///
/// let params = EaParameters::default()
///     .with_generations_per_iteration(20)
///     .with_ref_point(vec![0.2, 0.4, 1.0]);
/// assert_eq!(params.iterations, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EaParameters {
    /// Generations run between two interactive boundaries.
    pub generations_per_iteration: usize,

    /// Number of interactive iterations before the run terminates.
    pub iterations: usize,

    /// Sharpness of the angle penalty in APD selection.
    #[serde(rename = "Alpha", alias = "alpha")]
    pub alpha: f64,

    /// Accepted for compatibility; the library never plots.
    pub plotting: bool,

    /// Preference point the vectors are steered toward.
    ///
    /// `None` keeps the direction of the first created vector.
    pub ref_point: Option<Vec<f64>>,

    /// Previous preference point the vector set is initially focused around.
    pub old_point: Option<Vec<f64>>,

    /// Largest rotation, in degrees, applied at one boundary.
    pub rotation_step_degrees: f64,
}

impl Default for EaParameters {
    fn default() -> Self {
        Self {
            generations_per_iteration: 100,
            iterations: 10,
            alpha: 2.0,
            plotting: true,
            ref_point: None,
            old_point: None,
            rotation_step_degrees: 5.0,
        }
    }
}

impl EaParameters {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_generations_per_iteration(mut self, n: usize) -> Self {
        self.generations_per_iteration = n;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_plotting(mut self, plotting: bool) -> Self {
        self.plotting = plotting;
        self
    }

    pub fn with_ref_point(mut self, ref_point: Vec<f64>) -> Self {
        self.ref_point = Some(ref_point);
        self
    }

    pub fn with_old_point(mut self, old_point: Vec<f64>) -> Self {
        self.old_point = Some(old_point);
        self
    }

    pub fn with_rotation_step_degrees(mut self, degrees: f64) -> Self {
        self.rotation_step_degrees = degrees;
        self
    }

    /// Checks the parameters against the objective space of the problem.
    pub fn validate(&self, number_of_objectives: usize) -> Result<()> {
        if self.generations_per_iteration == 0 {
            return Err(Error::InvalidConfiguration(
                "generations_per_iteration must be positive".to_string(),
            ));
        }

        if self.iterations == 0 {
            return Err(Error::InvalidConfiguration("iterations must be positive".to_string()));
        }

        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "Alpha must be a non-negative number, got {}",
                self.alpha
            )));
        }

        if !self.rotation_step_degrees.is_finite() || self.rotation_step_degrees <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "rotation step must be positive, got {}",
                self.rotation_step_degrees
            )));
        }

        for point in [&self.ref_point, &self.old_point].into_iter().flatten() {
            Error::check_point(number_of_objectives, point)?;
        }

        Ok(())
    }
}

/// Where the controller is in its generation/iteration cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    Initialized,
    Generating,
    IterationBoundary,
    Terminated,
}

/// Mutable counters of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Generations completed in the current iteration.
    pub generation: usize,
    /// Completed interactive iterations.
    pub iteration: usize,
    /// Generations completed over the whole run.
    pub total_generations: usize,
    /// Reference vector count, the size an empty population is filled to.
    /// APD selection may leave fewer survivors.
    pub population_size: usize,
    pub ref_point: Vec<f64>,
    pub state: ControllerState,
}
