mod rotation;

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use itertools::Itertools;
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use crate::error::{Error, Result};
use crate::optimizers::reference_directions::ReferenceDirections;
use crate::optimizers::reference_vectors::rotation::{rotate_toward, rotation_between, unit};

pub(crate) use crate::optimizers::reference_vectors::rotation::angle_between;

/// How the initial vector set is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationType {
    /// Simplex lattice covering the positive orthant.
    Uniform,
    /// Axis plus the full `{-1, 0, 1}^(M-1)` ring around the reference direction.
    Focused,
    /// Axis plus `2 (M - 1)` vectors around the reference direction.
    SparseFocused,
}

impl FromStr for CreationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "uniform" => Ok(CreationType::Uniform),
            "focused" => Ok(CreationType::Focused),
            "sparse_focused" | "sparsefocused" => Ok(CreationType::SparseFocused),
            _ => Err(Error::InvalidConfiguration(format!("unknown creation type '{}'", s))),
        }
    }
}

impl Display for CreationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CreationType::Uniform => "Uniform",
            CreationType::Focused => "Focused",
            CreationType::SparseFocused => "Sparse_Focused",
        };

        write!(f, "{}", name)
    }
}

/// A set of unit direction vectors in objective space.
///
/// Rows of [`values`](ReferenceVectorSet::values) always have unit norm.
/// The set is centred on [`focal_point`](ReferenceVectorSet::focal_point),
/// which the interactive adaptation rotates toward the decision maker's
/// [`reference_point`](ReferenceVectorSet::reference_point).
#[derive(Debug, Clone)]
pub struct ReferenceVectorSet {
    number_of_objectives: usize,
    creation_type: CreationType,
    lattice_resolution: Option<usize>,
    values: Array2<f64>,
    initial_values: Array2<f64>,
    reference_point: Vec<f64>,
    focal_point: Vec<f64>,
    adaptation_power: f64,
    rotation_step_degrees: f64,
}

impl ReferenceVectorSet {
    pub const DEFAULT_FOCUS_SPREAD_DEGREES: f64 = 5.0;
    pub const DEFAULT_ROTATION_STEP_DEGREES: f64 = 5.0;
    pub const DEFAULT_ADAPTATION_POWER: f64 = 2.0;

    pub fn create(number_of_objectives: usize,
                  creation_type: CreationType,
                  reference_point: Option<&[f64]>) -> Result<Self>
    {
        Self::build(number_of_objectives, creation_type, reference_point, None)
    }

    /// Uniform lattice with an explicit resolution instead of the per-dimension default.
    pub fn with_lattice_resolution(number_of_objectives: usize, lattice_resolution: usize) -> Result<Self> {
        Self::build(number_of_objectives, CreationType::Uniform, None, Some(lattice_resolution))
    }

    fn build(number_of_objectives: usize,
             creation_type: CreationType,
             reference_point: Option<&[f64]>,
             lattice_resolution: Option<usize>) -> Result<Self>
    {
        if number_of_objectives < 2 {
            return Err(Error::InvalidConfiguration(format!(
                "reference vectors need at least 2 objectives, got {}",
                number_of_objectives
            )));
        }

        if let Some(point) = reference_point {
            Error::check_point(number_of_objectives, point)?;
        }

        let reference_point = reference_point
            .map(|point| point.to_vec())
            .unwrap_or_else(|| vec![1.0; number_of_objectives]);

        let axis = unit(ArrayView1::from(&reference_point))
            .unwrap_or_else(|| Array1::from_elem(number_of_objectives, 1.0 / (number_of_objectives as f64).sqrt()));

        let (values, focal_point, lattice_resolution) = match creation_type {
            CreationType::Uniform => {
                let resolution = lattice_resolution
                    .unwrap_or_else(|| ReferenceDirections::default_lattice_resolution(number_of_objectives));
                let lattice = ReferenceDirections::new(number_of_objectives, resolution)?;

                let values = to_matrix(lattice.reference_directions, number_of_objectives);
                let centre = Array1::from_elem(number_of_objectives, 1.0 / (number_of_objectives as f64).sqrt());

                (values, centre, Some(resolution))
            }
            CreationType::Focused | CreationType::SparseFocused => {
                let offsets = if creation_type == CreationType::Focused {
                    full_ring(number_of_objectives - 1)
                } else {
                    sparse_ring(number_of_objectives - 1)
                };

                let local = focused_around_first_axis(number_of_objectives, &offsets, Self::DEFAULT_FOCUS_SPREAD_DEGREES);

                let mut first_axis = Array1::zeros(number_of_objectives);
                first_axis[0] = 1.0;

                let rotation = rotation_between(&first_axis, &axis);

                (local.dot(&rotation.t()), axis.clone(), None)
            }
        };

        let mut set = ReferenceVectorSet {
            number_of_objectives,
            creation_type,
            lattice_resolution,
            initial_values: values.clone(),
            values,
            reference_point,
            focal_point: focal_point.to_vec(),
            adaptation_power: Self::DEFAULT_ADAPTATION_POWER,
            rotation_step_degrees: Self::DEFAULT_ROTATION_STEP_DEGREES,
        };

        set.normalize();
        set.initial_values = set.values.clone();

        debug!("created {} {} reference vectors for {} objectives",
               set.len(), set.creation_type, number_of_objectives);

        Ok(set)
    }

    /// Largest rotation per [`slow_interactive_adapt`](ReferenceVectorSet::slow_interactive_adapt) call.
    ///
    /// Fails with `InvalidConfiguration` unless `degrees` is finite and positive.
    pub fn with_rotation_step_degrees(mut self, degrees: f64) -> Result<Self> {
        if !degrees.is_finite() || degrees <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "rotation step must be positive, got {}",
                degrees
            )));
        }

        self.rotation_step_degrees = degrees;
        Ok(self)
    }

    pub fn with_adaptation_power(mut self, power: f64) -> Self {
        self.adaptation_power = power.max(0.0);
        self
    }

    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    pub fn number_of_objectives(&self) -> usize {
        self.number_of_objectives
    }

    pub fn creation_type(&self) -> CreationType {
        self.creation_type
    }

    pub fn lattice_resolution(&self) -> Option<usize> {
        self.lattice_resolution
    }

    pub fn values(&self) -> ArrayView2<f64> {
        self.values.view()
    }

    pub fn vector(&self, index: usize) -> ArrayView1<f64> {
        self.values.row(index)
    }

    pub fn reference_point(&self) -> &[f64] {
        &self.reference_point
    }

    pub fn focal_point(&self) -> &[f64] {
        &self.focal_point
    }

    pub fn rotation_step_degrees(&self) -> f64 {
        self.rotation_step_degrees
    }

    /// Smallest angle between each vector and any other vector of the set.
    pub fn neighbouring_angles(&self) -> Vec<f64> {
        let n = self.len();
        if n < 2 {
            return vec![std::f64::consts::FRAC_PI_2; n];
        }

        let cosines = self.values.dot(&self.values.t());

        cosines
            .axis_iter(Axis(0))
            .enumerate()
            .map(|(i, row)| {
                let nearest = row
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, cos)| *cos)
                    .fold(f64::MIN, f64::max);

                nearest.clamp(-1.0, 1.0).acos()
            })
            .collect()
    }

    /// Bends every vector toward the focal direction by `(current / max)^power`.
    ///
    /// Repeated calls are absolute, not cumulative: the result only depends
    /// on the ratio, never on the previous adaptation.
    pub fn adapt(&mut self, current_generation: usize, max_generations: usize) {
        let ratio = if max_generations == 0 {
            1.0
        } else {
            (current_generation as f64 / max_generations as f64).min(1.0)
        };
        let scale = ratio.powf(self.adaptation_power);

        let focal = Array1::from(self.focal_point.clone());

        for (mut row, initial) in self.values.axis_iter_mut(Axis(0)).zip(self.initial_values.axis_iter(Axis(0))) {
            let bent = &initial + &focal.mapv(|v| v * scale);

            match unit(bent.view()) {
                Some(bent) => row.assign(&bent),
                None => row.assign(&initial),
            }
        }

        debug!("adapted reference vectors with scale {:.4}", scale);
    }

    /// Classic RVEA rule: scales the initial vectors by the objective ranges.
    pub fn adapt_to_objective_range(&mut self, objectives: &[Vec<f64>]) -> Result<()> {
        if objectives.is_empty() {
            return Err(Error::EmptyPopulation);
        }

        let mut min_val = vec![f64::INFINITY; self.number_of_objectives];
        let mut max_val = vec![f64::NEG_INFINITY; self.number_of_objectives];

        for (index, values) in objectives.iter().enumerate() {
            if values.len() != self.number_of_objectives {
                return Err(Error::DimensionMismatch {
                    expected: self.number_of_objectives,
                    got: values.len(),
                    index,
                });
            }

            for (i, value) in values.iter().enumerate() {
                min_val[i] = min_val[i].min(*value);
                max_val[i] = max_val[i].max(*value);
            }
        }

        let range = Array1::from_iter(max_val.iter().zip(&min_val).map(|(max, min)| max - min));

        for (mut row, initial) in self.values.axis_iter_mut(Axis(0)).zip(self.initial_values.axis_iter(Axis(0))) {
            let scaled = &initial * &range;

            match unit(scaled.view()) {
                Some(scaled) => row.assign(&scaled),
                None => row.assign(&initial),
            }
        }

        debug!("adapted reference vectors to objective range {:?}", range.to_vec());

        Ok(())
    }

    /// Rotates the whole set a bounded step toward `reference_point`.
    ///
    /// The focal direction moves by at most the rotation step per call and
    /// lands exactly on the target once it is within one step, after which
    /// further calls with the same point leave the set unchanged. Returns
    /// `true` when the target direction has been reached.
    pub fn slow_interactive_adapt(&mut self, reference_point: &[f64]) -> Result<bool> {
        Error::check_point(self.number_of_objectives, reference_point)?;

        let target = match unit(ArrayView1::from(reference_point)) {
            Some(target) => target,
            None => {
                warn!("ignoring zero reference point, reference vectors left unchanged");
                return Ok(false);
            }
        };

        let focal = Array1::from(self.focal_point.clone());
        let (next, reached) = rotate_toward(&focal, &target, self.rotation_step_degrees.to_radians());

        let rotation = rotation_between(&focal, &next).reversed_axes();

        self.values = self.values.dot(&rotation);
        self.initial_values = self.initial_values.dot(&rotation);
        self.normalize();

        debug!("rotated reference vectors by {:.3} deg toward {:?} (reached: {})",
               angle_between(focal.view(), next.view()).to_degrees(), reference_point, reached);

        self.focal_point = next.to_vec();
        self.reference_point = reference_point.to_vec();

        Ok(reached)
    }

    fn normalize(&mut self) {
        for mut row in self.values.axis_iter_mut(Axis(0)) {
            let norm = row.dot(&row).sqrt();

            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }
    }
}

fn to_matrix(rows: Vec<Vec<f64>>, n_dim: usize) -> Array2<f64> {
    let n_rows = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();

    Array2::from_shape_vec((n_rows, n_dim), flat)
        .unwrap_or_else(|_| Array2::zeros((0, n_dim)))
}

fn sparse_ring(n_offsets: usize) -> Vec<Vec<f64>> {
    let mut ring = Vec::with_capacity(2 * n_offsets);

    for sign in [1.0, -1.0] {
        for i in 0..n_offsets {
            let mut offset = vec![0.0; n_offsets];
            offset[i] = sign;
            ring.push(offset);
        }
    }

    ring
}

fn full_ring(n_offsets: usize) -> Vec<Vec<f64>> {
    (0..n_offsets)
        .map(|_| [-1.0, 0.0, 1.0])
        .multi_cartesian_product()
        .filter(|offset| offset.iter().any(|v| *v != 0.0))
        .collect()
}

/// First axis plus one vector per offset, each `spread_degrees` away from it.
fn focused_around_first_axis(number_of_objectives: usize, offsets: &[Vec<f64>], spread_degrees: f64) -> Array2<f64> {
    let tilt = spread_degrees.to_radians().tan();

    let mut values = Array2::zeros((offsets.len() + 1, number_of_objectives));
    values[[0, 0]] = 1.0;

    for (row, offset) in offsets.iter().enumerate() {
        let norm = offset.iter().map(|v| v * v).sum::<f64>().sqrt();

        values[[row + 1, 0]] = 1.0;
        for (i, v) in offset.iter().enumerate() {
            values[[row + 1, i + 1]] = tilt * v / norm;
        }
    }

    values
}
