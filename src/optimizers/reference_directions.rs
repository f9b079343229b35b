use crate::error::{Error, Result};

/// Das-Dennis points on the unit simplex, one row per direction.
pub struct ReferenceDirections {
    pub reference_directions: Vec<Vec<f64>>,
}

impl ReferenceDirections {
    pub fn new(dimension: usize, n_partition: usize) -> Result<Self> {
        if dimension < 2 {
            return Err(Error::InvalidConfiguration(format!(
                "at least 2 objectives are required, got {}",
                dimension
            )));
        }

        if n_partition == 0 {
            return Err(Error::InvalidConfiguration(
                "lattice resolution must be positive".to_string(),
            ));
        }

        Ok(Self {
            reference_directions: Self::das_dennis(n_partition, dimension),
        })
    }

    /// Lattice resolution used when the caller does not pick one.
    pub fn default_lattice_resolution(dimension: usize) -> usize {
        match dimension {
            2 => 49,
            3 => 12,
            4 => 6,
            5 => 5,
            6 => 4,
            _ => 3,
        }
    }

    /// `C(n_partition + dimension - 1, dimension - 1)`
    pub fn expected_count(dimension: usize, n_partition: usize) -> usize {
        let n = n_partition + dimension - 1;
        let k = (dimension - 1).min(n_partition);

        (0..k).fold(1usize, |acc, i| acc * (n - i) / (i + 1))
    }

    fn das_dennis(n_partitions: usize, n_dim: usize) -> Vec<Vec<f64>> {
        let mut ref_dirs = Vec::with_capacity(Self::expected_count(n_dim, n_partitions));
        let mut ref_dir = vec![0.0; n_dim];

        Self::das_dennis_recursion(&mut ref_dirs, &mut ref_dir, n_partitions, n_partitions, 0);

        ref_dirs
    }

    fn das_dennis_recursion(
        ref_dirs: &mut Vec<Vec<f64>>,
        ref_dir: &mut Vec<f64>,
        n_partitions: usize,
        beta: usize,
        depth: usize,
    ) {
        if depth == ref_dir.len() - 1 {
            ref_dir[depth] = beta as f64 / n_partitions as f64;
            ref_dirs.push(ref_dir.clone());
        } else {
            for i in 0..=beta {
                ref_dir[depth] = i as f64 / n_partitions as f64;
                Self::das_dennis_recursion(ref_dirs, ref_dir, n_partitions, beta - i, depth + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::ReferenceDirections;

    #[test]
    fn lattice_sizes_match_binomial() {
        for n_obj in 2..8 {
            for n_partition in 1..6 {
                let dirs = ReferenceDirections::new(n_obj, n_partition).unwrap();

                assert_eq!(
                    dirs.reference_directions.len(),
                    ReferenceDirections::expected_count(n_obj, n_partition)
                );
            }
        }

        assert_eq!(ReferenceDirections::expected_count(3, 3), 10);
        assert_eq!(ReferenceDirections::expected_count(3, 12), 91);
    }

    #[test]
    fn points_lie_on_simplex() {
        let dirs = ReferenceDirections::new(4, 5).unwrap();

        for dir in dirs.reference_directions {
            assert_abs_diff_eq!(dir.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
            assert!(dir.iter().all(|v| *v >= 0.0));
        }
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(ReferenceDirections::new(1, 3).is_err());
        assert!(ReferenceDirections::new(3, 0).is_err());
    }
}
