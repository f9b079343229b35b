use ndarray::{Array1, Array2, ArrayView1};

const EPS: f64 = 1e-12;

pub(crate) fn unit(vector: ArrayView1<f64>) -> Option<Array1<f64>> {
    let norm = vector.dot(&vector).sqrt();

    if norm <= EPS || !norm.is_finite() {
        None
    } else {
        Some(vector.mapv(|v| v / norm))
    }
}

pub(crate) fn angle_between(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    match (unit(a), unit(b)) {
        (Some(a), Some(b)) => a.dot(&b).clamp(-1.0, 1.0).acos(),
        _ => std::f64::consts::FRAC_PI_2,
    }
}

/// `I - 2 v v^T / (v^T v)`; identity for a zero reflector.
pub(crate) fn householder(reflector: &Array1<f64>) -> Array2<f64> {
    let n = reflector.len();
    let denominator = reflector.dot(reflector);

    let mut matrix = Array2::eye(n);
    if denominator <= EPS * EPS {
        return matrix;
    }

    for i in 0..n {
        for j in 0..n {
            matrix[[i, j]] -= 2.0 * reflector[i] * reflector[j] / denominator;
        }
    }

    matrix
}

/// Orthogonal map taking unit `from` onto unit `to`.
///
/// Composed of two reflections through the bisector, so it acts as a plane
/// rotation and leaves the orthogonal complement of `span(from, to)` alone.
/// Antipodal inputs fall back to the single reflection swapping them.
pub(crate) fn rotation_between(from: &Array1<f64>, to: &Array1<f64>) -> Array2<f64> {
    let middle = match unit((from + to).view()) {
        Some(middle) => middle,
        None => return householder(&(from - to)),
    };

    let first = householder(&(from - &middle));
    let second = householder(&(&middle - to));

    second.dot(&first)
}

/// Moves unit `initial` toward unit `target` by at most `step` radians.
///
/// Returns the new direction and whether the target was reached.
pub(crate) fn rotate_toward(initial: &Array1<f64>, target: &Array1<f64>, step: f64) -> (Array1<f64>, bool) {
    let cos_phi = initial.dot(target).clamp(-1.0, 1.0);
    let phi = cos_phi.acos();

    if phi <= step + EPS {
        return (target.clone(), true);
    }

    let sin_sq = 1.0 - cos_phi * cos_phi;
    if sin_sq <= EPS {
        // antipodal: any perpendicular direction spans a valid rotation plane
        let perpendicular = perpendicular_to(initial);
        return (
            initial.mapv(|v| v * step.cos()) + perpendicular.mapv(|v| v * step.sin()),
            false,
        );
    }

    let cos_step = step.cos();
    let cos_rest = (phi - step).cos();

    let a = (cos_step - cos_phi * cos_rest) / sin_sq;
    let b = (cos_rest - cos_phi * cos_step) / sin_sq;

    let rotated = initial.mapv(|v| v * a) + target.mapv(|v| v * b);

    match unit(rotated.view()) {
        Some(rotated) => (rotated, false),
        None => (initial.clone(), false),
    }
}

fn perpendicular_to(vector: &Array1<f64>) -> Array1<f64> {
    let (axis, _) = vector
        .iter()
        .enumerate()
        .fold((0, f64::MAX), |best, (i, v)| if v.abs() < best.1 { (i, v.abs()) } else { best });

    let mut basis = Array1::zeros(vector.len());
    basis[axis] = 1.0;

    let projected = &basis - &vector.mapv(|v| v * vector[axis]);

    unit(projected.view()).unwrap_or(basis)
}
