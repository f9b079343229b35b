use std::f64::consts::PI;
use crate::array_solution::ArraySolutionEvaluator;
use crate::error::{Error, Result};
use crate::problem::Problem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtlzVariant {
    Dtlz1,
    Dtlz2,
    Dtlz4,
    Dtlz5,
    Dtlz7,
}

/// Scalable DTLZ test problems, minimized over `x in [0, 1]^n_var`.
#[derive(Debug, Clone)]
pub struct Dtlz
{
    variant: DtlzVariant,
    name: String,
    n_var: usize,
    n_obj: usize
}

impl Dtlz {
    pub fn new(variant: DtlzVariant, n_var: usize, n_obj: usize) -> Result<Self>
    {
        if n_obj < 2 || n_var < n_obj
        {
            return Err(Error::InvalidConfiguration(format!(
                "{:?} needs at least 2 objectives and n_var >= n_obj, got n_var {} n_obj {}",
                variant, n_var, n_obj
            )));
        }

        Ok(Dtlz {
            variant,
            name: format!("{} ({} {})", Self::class_name(variant), n_var, n_obj),
            n_var,
            n_obj
        })
    }

    pub fn variant(&self) -> DtlzVariant {
        self.variant
    }

    fn class_name(variant: DtlzVariant) -> &'static str {
        match variant {
            DtlzVariant::Dtlz1 => "DTLZ1",
            DtlzVariant::Dtlz2 => "DTLZ2",
            DtlzVariant::Dtlz4 => "DTLZ4",
            DtlzVariant::Dtlz5 => "DTLZ5",
            DtlzVariant::Dtlz7 => "DTLZ7",
        }
    }

    fn g(&self, x: &[f64]) -> f64
    {
        let x_m = &x[self.n_obj - 1..];

        match self.variant {
            DtlzVariant::Dtlz1 => g1(x_m),
            DtlzVariant::Dtlz7 => 1.0 + 9.0 * x_m.iter().sum::<f64>() / x_m.len() as f64,
            _ => g2(x_m),
        }
    }
}

fn g1(x_m: &[f64]) -> f64
{
    let sum: f64 = x_m
        .iter()
        .map(|x_i| (x_i - 0.5).powi(2) - (20.0 * PI * (x_i - 0.5)).cos())
        .sum();

    100.0 * (x_m.len() as f64 + sum)
}

fn g2(x_m: &[f64]) -> f64
{
    x_m.iter().map(|x_i| (x_i - 0.5).powi(2)).sum()
}

/// Objectives on the sphere of radius `1 + g`, angles `x_i^alpha * pi / 2`.
fn spherical(x: &[f64], g: f64, alpha: f64, f: &mut [f64])
{
    let n_obj = f.len();

    for (i, f_i) in f.iter_mut().enumerate()
    {
        let cut = n_obj - 1 - i;
        let mut value = 1.0 + g;

        for x_j in &x[..cut]
        {
            value *= (x_j.powf(alpha) * PI / 2.0).cos();
        }

        if i > 0
        {
            value *= (x[cut].powf(alpha) * PI / 2.0).sin();
        }

        *f_i = value;
    }
}

/// Objectives on the hyperplane `sum f = 0.5 (1 + g)`.
fn linear(x: &[f64], g: f64, f: &mut [f64])
{
    let n_obj = f.len();

    for (i, f_i) in f.iter_mut().enumerate()
    {
        let cut = n_obj - 1 - i;
        let mut value = 0.5 * (1.0 + g);

        for x_j in &x[..cut]
        {
            value *= x_j;
        }

        if i > 0
        {
            value *= 1.0 - x[cut];
        }

        *f_i = value;
    }
}

impl Problem for Dtlz
{
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn problem_class_name(&self) -> &str {
        Self::class_name(self.variant)
    }

    fn convergence_metric(&self, x: &[f64]) -> f64 {
        match self.variant {
            DtlzVariant::Dtlz7 => self.g(x) - 1.0,
            _ => self.g(x),
        }
    }

    fn best_metric(&self) -> f64 {
        0.0
    }

    fn plot_3d_bounds(&self) -> ([f64; 3], [f64; 3]) {
        match self.variant {
            DtlzVariant::Dtlz1 => ([0.0; 3], [0.6; 3]),
            DtlzVariant::Dtlz7 => ([0.0; 3], [1.0, 1.0, 6.1]),
            _ => ([0.0; 3], [1.1; 3]),
        }
    }
}

impl ArraySolutionEvaluator for Dtlz
{
    fn calculate_objectives(&self, x: &[f64], f: &mut Vec<f64>) {
        f.resize(self.n_obj, 0.0);

        let position = &x[..self.n_obj - 1];
        let g = self.g(x);

        match self.variant {
            DtlzVariant::Dtlz1 => linear(position, g, f),
            DtlzVariant::Dtlz2 => spherical(position, g, 1.0, f),
            DtlzVariant::Dtlz4 => spherical(position, g, 100.0, f),
            DtlzVariant::Dtlz5 => {
                let mut q: Vec<f64> = position
                    .iter()
                    .map(|x_i| (1.0 + 2.0 * g * x_i) / (2.0 * (1.0 + g)))
                    .collect();
                q[0] = position[0];

                spherical(&q, g, 1.0, f);
            }
            DtlzVariant::Dtlz7 => {
                let last = self.n_obj - 1;
                f[..last].copy_from_slice(position);

                let h = self.n_obj as f64 - f[..last]
                    .iter()
                    .map(|f_i| f_i / (1.0 + g) * (1.0 + (3.0 * PI * f_i).sin()))
                    .sum::<f64>();

                f[last] = h * (1.0 + g);
            }
        }
    }

    fn x_len(&self) -> usize {
        self.n_var
    }

    fn objectives_len(&self) -> usize {
        self.n_obj
    }

    fn min_x_value(&self) -> f64 {
        0.0
    }

    fn max_x_value(&self) -> f64 {
        1.0
    }
}
