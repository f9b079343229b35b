pub mod apd_selection;
pub mod boundary;
#[cfg(test)]
mod tests;

use log::{debug, info};
use crate::config::{ControllerState, EaParameters, RunState};
use crate::ens_nondominating_sorting::ens_nondominated_sorting;
use crate::error::{Error, Result};
use crate::optimizers::reference_vectors::{CreationType, ReferenceVectorSet};
use crate::optimizers::rvea::apd_selection::apd_select;
use crate::optimizers::rvea::boundary::{BoundaryContext, BoundaryPolicy};
use crate::optimizers::Optimizer;
use crate::population::Population;

/// Interactive RVEA driver.
///
/// Runs `iterations` interactive iterations of `generations_per_iteration`
/// generations each. A generation mates the population twice, stacks both
/// offspring batches onto it and keeps the APD survivors. Between
/// iterations the injected [`BoundaryPolicy`] reshapes the reference vectors,
/// typically toward the preference point set with
/// [`set_reference_point`](IterationController::set_reference_point).
///
/// Construction is not a pure factory: [`new`](IterationController::new)
/// runs the first generation before returning, so a fresh controller
/// already reports one completed generation.
pub struct IterationController<P: Population, B: BoundaryPolicy> {
    name: String,
    params: EaParameters,
    population: P,
    reference_vectors: ReferenceVectorSet,
    boundary_policy: B,
    ref_point: Vec<f64>,
    /// Vector count at the last boundary. Reported through `run_state` and
    /// used to fill an empty population; survivors are never resized to it.
    population_size: usize,
    generation: usize,
    iteration: usize,
    total_generations: usize,
    state: ControllerState,
}

impl<P: Population, B: BoundaryPolicy> IterationController<P, B> {
    pub fn new(mut population: P, params: EaParameters, boundary_policy: B) -> Result<Self> {
        let n_obj = population.num_of_objectives();
        params.validate(n_obj)?;

        let reference_vectors = ReferenceVectorSet::create(
            n_obj,
            CreationType::SparseFocused,
            params.old_point.as_deref(),
        )?
        .with_rotation_step_degrees(params.rotation_step_degrees)?;

        let ref_point = match &params.ref_point {
            Some(point) => point.clone(),
            None => reference_vectors.vector(0).to_vec(),
        };

        let population_size = reference_vectors.len();

        if population.is_empty() {
            population.create_new_individuals(population_size);
        }

        if population.is_empty() {
            return Err(Error::EmptyPopulation);
        }

        info!("starting interactive RVEA: {} objectives, {} reference vectors, {} x {} generations, boundary policy: {}",
              n_obj, population_size, params.iterations, params.generations_per_iteration, boundary_policy.name());

        let mut controller = IterationController {
            name: format!("iRVEA ({})", boundary_policy.name()),
            params,
            population,
            reference_vectors,
            boundary_policy,
            ref_point,
            population_size,
            generation: 0,
            iteration: 0,
            total_generations: 0,
            state: ControllerState::Initialized,
        };

        controller.next_generation()?;

        Ok(controller)
    }

    /// One generation: double mating, APD selection, counter update.
    fn next_generation(&mut self) -> Result<()> {
        let mut offspring = self.population.mate();
        offspring.extend(self.population.mate());
        self.population.add(offspring);

        let survivors = apd_select(
            self.population.objectives(),
            &self.reference_vectors,
            self.params.alpha,
            self.generation + 1,
            self.params.generations_per_iteration,
            None,
        )?;

        debug!("generation {} of iteration {}: kept {} of {} candidates",
               self.generation + 1, self.iteration + 1, survivors.len(), self.population.len());

        self.population.keep(&survivors);

        self.generation += 1;
        self.total_generations += 1;

        self.state = if self.generation >= self.params.generations_per_iteration {
            ControllerState::IterationBoundary
        } else {
            ControllerState::Generating
        };

        Ok(())
    }

    /// Ends the current interactive iteration through the boundary policy.
    fn run_interruption(&mut self) -> Result<()> {
        let context = BoundaryContext {
            generation: self.generation,
            iteration: self.iteration,
            iterations: self.params.iterations,
            total_generations: self.total_generations,
            reference_point: &self.ref_point,
            objectives: self.population.objectives(),
        };

        self.boundary_policy.on_iteration_boundary(&mut self.reference_vectors, &context)?;

        self.generation = 0;
        self.iteration += 1;
        self.population_size = self.reference_vectors.len();

        self.state = if self.iteration >= self.params.iterations {
            ControllerState::Terminated
        } else {
            ControllerState::Generating
        };

        info!("iteration {}/{} done after {} generations, population {}",
              self.iteration, self.params.iterations, self.total_generations, self.population.len());

        Ok(())
    }

    /// Performs a single transition of the state machine: a generation while
    /// generating, the boundary policy at an iteration boundary and nothing
    /// once terminated.
    pub fn step(&mut self) -> Result<()> {
        match self.state {
            ControllerState::Initialized | ControllerState::Generating => self.next_generation(),
            ControllerState::IterationBoundary => self.run_interruption(),
            ControllerState::Terminated => Ok(()),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        while self.state != ControllerState::Terminated {
            self.step()?;
        }

        Ok(())
    }

    /// Injects a new preference point, used from the next boundary on.
    pub fn set_reference_point(&mut self, point: &[f64]) -> Result<()> {
        Error::check_point(self.reference_vectors.number_of_objectives(), point)?;

        debug!("reference point set to {:?}", point);
        self.ref_point = point.to_vec();

        Ok(())
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn run_state(&self) -> RunState {
        RunState {
            generation: self.generation,
            iteration: self.iteration,
            total_generations: self.total_generations,
            population_size: self.population_size,
            ref_point: self.ref_point.clone(),
            state: self.state,
        }
    }

    pub fn params(&self) -> &EaParameters {
        &self.params
    }

    pub fn reference_vectors(&self) -> &ReferenceVectorSet {
        &self.reference_vectors
    }

    pub fn population(&self) -> &P {
        &self.population
    }

    pub fn into_population(self) -> P {
        self.population
    }

    pub fn boundary_policy(&self) -> &B {
        &self.boundary_policy
    }
}

impl<P, B> Optimizer<P::Individual> for IterationController<P, B>
    where
        P: Population,
        P::Individual: Clone,
        B: BoundaryPolicy,
{
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn optimize(&mut self) -> Result<()> {
        self.run()
    }

    fn best_solutions(&self) -> Vec<(Vec<f64>, P::Individual)> {
        let objectives = self.population.objectives();

        ens_nondominated_sorting(objectives)
            .first()
            .map(|front| {
                front
                    .iter()
                    .filter_map(|index| {
                        self.population
                            .individual(*index)
                            .map(|individual| (objectives[*index].clone(), individual.clone()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
