use log::trace;
use ndarray::{Array2, Axis};
use crate::error::{Error, Result};
use crate::optimizers::reference_vectors::ReferenceVectorSet;

/// `M * (current / max)^alpha`, the weight of the angle term in the APD.
pub fn penalty_factor(alpha: f64, current_generation: usize, max_generations: usize, number_of_objectives: usize) -> f64 {
    let ratio = if max_generations == 0 {
        1.0
    } else {
        (current_generation as f64 / max_generations as f64).min(1.0)
    };

    ratio.powf(alpha) * number_of_objectives as f64
}

/// Angle-penalized distance environmental selection.
///
/// Every candidate is assigned to the reference vector it makes the smallest
/// angle with, and each non-empty niche keeps the single candidate with the
/// smallest `|f'| * (1 + P * theta / gamma)`, where `f'` is the objective
/// vector translated by the ideal point, `theta` its angle to the niche
/// vector, `gamma` the niche vector's angle to its nearest neighbour and `P`
/// the [`penalty_factor`]. Empty niches contribute nothing, so the result can
/// be smaller than the number of vectors.
///
/// Returns candidate indices ordered by niche. When `ideal` is `None` the
/// coordinate-wise minimum of `objectives` is used.
pub fn apd_select(objectives: &[Vec<f64>],
                  reference_vectors: &ReferenceVectorSet,
                  alpha: f64,
                  current_generation: usize,
                  max_generations: usize,
                  ideal: Option<&[f64]>) -> Result<Vec<usize>>
{
    let n_obj = reference_vectors.number_of_objectives();

    if objectives.is_empty() {
        return Err(Error::EmptyPopulation);
    }

    for (index, values) in objectives.iter().enumerate() {
        if values.len() != n_obj {
            return Err(Error::DimensionMismatch {
                expected: n_obj,
                got: values.len(),
                index,
            });
        }
    }

    let ideal = match ideal {
        Some(ideal) => {
            Error::check_point(n_obj, ideal)?;
            ideal.to_vec()
        }
        None => ideal_point(objectives, n_obj),
    };

    let translated = Array2::from_shape_fn((objectives.len(), n_obj), |(i, j)| objectives[i][j] - ideal[j]);
    let magnitudes: Vec<f64> = translated
        .axis_iter(Axis(0))
        .map(|row| row.dot(&row).sqrt())
        .collect();

    let mut normalized = translated.clone();
    for (mut row, magnitude) in normalized.axis_iter_mut(Axis(0)).zip(&magnitudes) {
        if *magnitude > 0.0 {
            row.mapv_inplace(|v| v / magnitude);
        } else {
            row.fill(0.0);
        }
    }

    let cosine = normalized
        .dot(&reference_vectors.values().reversed_axes())
        .mapv(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) });

    let neighbouring_angles = reference_vectors.neighbouring_angles();
    let penalty = penalty_factor(alpha, current_generation, max_generations, n_obj);

    // niche -> (best candidate, its apd)
    let mut winners: Vec<Option<(usize, f64)>> = vec![None; reference_vectors.len()];

    for (candidate, row) in cosine.axis_iter(Axis(0)).enumerate() {
        let (niche, best_cosine) = row
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, c)| if *c > best.1 { (i, *c) } else { best });

        let apd = if magnitudes[candidate] > 0.0 {
            let theta = best_cosine.acos();
            let gamma = neighbouring_angles[niche].max(f64::EPSILON);

            magnitudes[candidate] * (1.0 + penalty * theta / gamma)
        } else {
            f64::INFINITY
        };

        trace!("candidate {} -> niche {} (apd {:.6})", candidate, niche, apd);

        match winners[niche] {
            Some((_, best_apd)) if best_apd <= apd => {}
            _ => winners[niche] = Some((candidate, apd)),
        }
    }

    Ok(winners.into_iter().flatten().map(|(candidate, _)| candidate).collect())
}

/// Coordinate-wise minimum of the objective vectors.
pub fn ideal_point(objectives: &[Vec<f64>], number_of_objectives: usize) -> Vec<f64> {
    objectives.iter().fold(vec![f64::INFINITY; number_of_objectives], |mut ideal, values| {
        for (min, value) in ideal.iter_mut().zip(values) {
            *min = min.min(*value);
        }
        ideal
    })
}
