use std::fmt::{Debug, Formatter};
use dyn_clone::DynClone;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use crate::error::{Error, Result};
use crate::population::Population;
use crate::Ratio;

pub trait ArraySolutionEvaluator: DynClone
{
    fn calculate_objectives(&self, x: &[f64], f: &mut Vec<f64>);
    fn x_len(&self) -> usize;
    fn objectives_len(&self) -> usize;
    fn min_x_value(&self) -> f64;
    fn max_x_value(&self) -> f64;
}

dyn_clone::clone_trait_object!(ArraySolutionEvaluator);

/// A real-coded candidate with its objective values.
#[derive(Clone, Debug, PartialEq)]
pub struct ArraySolution
{
    pub x: Vec<f64>,
    pub f: Vec<f64>,
}

impl ArraySolution
{
    fn crossover<R: Rng>(&mut self, rng: &mut R, other: &mut Self)
    {
        for (x_i, other_i) in self.x.iter_mut().zip(other.x.iter_mut())
        {
            if rng.gen_ratio(1, 2)
            {
                std::mem::swap(x_i, other_i);
            }
        }
    }

    fn mutate<R: Rng>(&mut self, rng: &mut R, normal: &Normal<f64>, min_x: f64, max_x: f64)
    {
        let x_len = self.x.len().max(1) as u32;

        for x_i in self.x.iter_mut()
        {
            if rng.gen_ratio(1, x_len)
            {
                *x_i = (*x_i + normal.sample(rng)).clamp(min_x, max_x);
            }
        }
    }
}

/// [`Population`] of [`ArraySolution`]s scored by an [`ArraySolutionEvaluator`].
///
/// Mating draws random parent pairs, swaps genes uniformly with
/// `crossover_odds` and applies a clamped Gaussian step to each gene of a
/// child with `mutation_odds`. One call yields as many children as there
/// are parents.
pub struct ArrayPopulation
{
    individuals: Vec<ArraySolution>,
    objectives: Vec<Vec<f64>>,
    array_evaluator: Box<dyn ArraySolutionEvaluator + Send>,
    crossover_odds: Ratio,
    mutation_odds: Ratio,
    mutation: Option<Normal<f64>>,
    rng: StdRng,
}

impl Debug for ArrayPopulation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayPopulation")
            .field("individuals", &self.individuals.len())
            .field("x_len", &self.array_evaluator.x_len())
            .field("objectives_len", &self.array_evaluator.objectives_len())
            .finish()
    }
}

impl ArrayPopulation
{
    /// Relative width of the Gaussian mutation step.
    pub const MUTATION_SCALE: f64 = 0.1;

    pub fn new(array_evaluator: Box<dyn ArraySolutionEvaluator + Send>) -> Self
    {
        let width = array_evaluator.max_x_value() - array_evaluator.min_x_value();
        let mutation = Normal::new(0.0, (width * Self::MUTATION_SCALE).abs()).ok();

        ArrayPopulation {
            individuals: vec![],
            objectives: vec![],
            array_evaluator,
            crossover_odds: Ratio(1, 2),
            mutation_odds: Ratio(3, 10),
            mutation,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self
    {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Fails with `InvalidConfiguration` unless both ratios are proper
    /// probabilities (`numerator <= denominator`, `denominator > 0`).
    pub fn with_odds(mut self, crossover_odds: Ratio, mutation_odds: Ratio) -> Result<Self>
    {
        for (name, odds) in [("crossover", crossover_odds), ("mutation", mutation_odds)]
        {
            if odds.1 == 0 || odds.0 > odds.1
            {
                return Err(Error::InvalidConfiguration(format!(
                    "{} odds must be a probability, got {}/{}",
                    name, odds.0, odds.1
                )));
            }
        }

        self.crossover_odds = crossover_odds;
        self.mutation_odds = mutation_odds;
        Ok(self)
    }

    pub fn individuals(&self) -> &[ArraySolution]
    {
        &self.individuals
    }

    pub fn evaluator(&self) -> &(dyn ArraySolutionEvaluator + Send)
    {
        self.array_evaluator.as_ref()
    }

    fn evaluate(&self, x: Vec<f64>) -> ArraySolution
    {
        let mut f = Vec::with_capacity(self.array_evaluator.objectives_len());
        self.array_evaluator.calculate_objectives(&x, &mut f);

        ArraySolution { x, f }
    }
}

impl Population for ArrayPopulation
{
    type Individual = ArraySolution;

    fn len(&self) -> usize {
        self.individuals.len()
    }

    fn num_of_objectives(&self) -> usize {
        self.array_evaluator.objectives_len()
    }

    fn create_new_individuals(&mut self, pop_size: usize) {
        let min_x = self.array_evaluator.min_x_value();
        let max_x = self.array_evaluator.max_x_value();
        let x_len = self.array_evaluator.x_len();

        let mut fresh = Vec::with_capacity(pop_size);
        for _ in 0..pop_size {
            let x: Vec<f64> = (0..x_len).map(|_| self.rng.gen_range(min_x..=max_x)).collect();
            fresh.push(self.evaluate(x));
        }

        debug!("sampled {} new individuals", fresh.len());

        self.add(fresh);
    }

    fn mate(&mut self) -> Vec<ArraySolution> {
        let min_x = self.array_evaluator.min_x_value();
        let max_x = self.array_evaluator.max_x_value();

        let mut children: Vec<Vec<f64>> = Vec::with_capacity(self.individuals.len() + 1);

        while children.len() < self.individuals.len() {
            let (mut c1, mut c2) = match (self.individuals.choose(&mut self.rng), self.individuals.choose(&mut self.rng)) {
                (Some(p1), Some(p2)) => (p1.clone(), p2.clone()),
                _ => break,
            };

            if self.rng.gen_ratio(self.crossover_odds.0, self.crossover_odds.1) {
                c1.crossover(&mut self.rng, &mut c2);
            }

            if let Some(normal) = &self.mutation {
                for child in [&mut c1, &mut c2] {
                    if self.rng.gen_ratio(self.mutation_odds.0, self.mutation_odds.1) {
                        child.mutate(&mut self.rng, normal, min_x, max_x);
                    }
                }
            }

            children.push(c1.x);
            children.push(c2.x);
        }

        children.truncate(self.individuals.len());

        children.into_iter().map(|x| self.evaluate(x)).collect()
    }

    fn add(&mut self, offspring: Vec<ArraySolution>) {
        self.objectives.extend(offspring.iter().map(|solution| solution.f.clone()));
        self.individuals.extend(offspring);
    }

    fn individual(&self, index: usize) -> Option<&ArraySolution> {
        self.individuals.get(index)
    }

    fn keep(&mut self, selected: &[usize]) {
        let mut slots: Vec<Option<ArraySolution>> = std::mem::take(&mut self.individuals)
            .into_iter()
            .map(Some)
            .collect();

        self.individuals = selected
            .iter()
            .filter_map(|index| slots.get_mut(*index).and_then(Option::take))
            .collect();

        self.objectives = self.individuals.iter().map(|solution| solution.f.clone()).collect();
    }

    fn objectives(&self) -> &[Vec<f64>] {
        &self.objectives
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::population::Population;
    use crate::problem::dtlz::{Dtlz, DtlzVariant};
    use crate::Ratio;
    use super::ArrayPopulation;

    fn population() -> ArrayPopulation {
        ArrayPopulation::new(Box::new(Dtlz::new(DtlzVariant::Dtlz2, 7, 3).unwrap())).with_seed(7)
    }

    #[test]
    fn create_evaluates_individuals() {
        let mut pop = population();
        assert!(pop.is_empty());

        pop.create_new_individuals(12);

        assert_eq!(pop.len(), 12);
        assert_eq!(pop.objectives().len(), 12);
        assert!(pop.individuals().iter().all(|s| s.f.len() == 3 && s.x.len() == 7));
        assert!(pop.individuals().iter().flat_map(|s| s.x.iter()).all(|x| (0.0..=1.0).contains(x)));
    }

    #[test]
    fn mate_produces_one_child_per_parent() {
        let mut pop = population();
        pop.create_new_individuals(9);

        let offspring = pop.mate();

        assert_eq!(offspring.len(), 9);
        assert_eq!(pop.len(), 9);
        assert!(offspring.iter().flat_map(|s| s.x.iter()).all(|x| (0.0..=1.0).contains(x)));

        pop.add(offspring);
        assert_eq!(pop.len(), 18);
        assert_eq!(pop.objectives().len(), 18);
    }

    #[test]
    fn keep_follows_selection_order() {
        let mut pop = population();
        pop.create_new_individuals(5);
        let before = pop.individuals().to_vec();

        pop.keep(&[4, 1, 1, 9]);

        assert_eq!(pop.individuals(), &[before[4].clone(), before[1].clone()][..]);
        assert_eq!(pop.objectives(), &[before[4].f.clone(), before[1].f.clone()][..]);
    }

    #[test]
    fn odds_must_be_probabilities() {
        for (crossover, mutation) in [(Ratio(3, 2), Ratio(1, 2)), (Ratio(1, 2), Ratio(1, 0)), (Ratio(0, 0), Ratio(0, 1))] {
            assert!(matches!(population().with_odds(crossover, mutation), Err(Error::InvalidConfiguration(_))));
        }

        let mut pop = population().with_odds(Ratio(1, 1), Ratio(0, 1)).unwrap();
        pop.create_new_individuals(6);

        let offspring = pop.mate();
        assert_eq!(offspring.len(), 6);
        for child in &offspring {
            for (i, gene) in child.x.iter().enumerate() {
                assert!(pop.individuals().iter().any(|parent| parent.x[i] == *gene));
            }
        }
    }

    #[test]
    fn seeded_populations_are_reproducible() {
        let mut a = population();
        let mut b = population();
        a.create_new_individuals(4);
        b.create_new_individuals(4);

        assert_eq!(a.individuals(), b.individuals());
        assert_eq!(a.mate(), b.mate());
    }
}
