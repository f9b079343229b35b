use std::cell::Cell;
use std::rc::Rc;
use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::array_solution::ArrayPopulation;
use crate::config::{ControllerState, EaParameters};
use crate::error::Error;
use crate::optimizers::reference_vectors::angle_between;
use crate::optimizers::rvea::boundary::{boundary_hook, ObjectiveRangeAdaptation, ScheduledAdaptation, SlowInteractiveAdaptation};
use crate::optimizers::rvea::IterationController;
use crate::optimizers::Optimizer;
use crate::population::Population;
use crate::problem::dtlz::{Dtlz, DtlzVariant};

/// Candidates are their own objective vectors; mating samples fresh ones.
struct RandomPopulation {
    individuals: Vec<Vec<f64>>,
    n_obj: usize,
    mate_calls: usize,
    created: usize,
    rng: StdRng,
}

impl RandomPopulation {
    fn new(n_obj: usize) -> Self {
        RandomPopulation {
            individuals: vec![],
            n_obj,
            mate_calls: 0,
            created: 0,
            rng: StdRng::seed_from_u64(42),
        }
    }

    fn sample(&mut self) -> Vec<f64> {
        (0..self.n_obj).map(|_| self.rng.gen_range(0.0..1.0)).collect()
    }
}

impl Population for RandomPopulation {
    type Individual = Vec<f64>;

    fn len(&self) -> usize {
        self.individuals.len()
    }

    fn num_of_objectives(&self) -> usize {
        self.n_obj
    }

    fn create_new_individuals(&mut self, pop_size: usize) {
        self.created += pop_size;
        for _ in 0..pop_size {
            let individual = self.sample();
            self.individuals.push(individual);
        }
    }

    fn mate(&mut self) -> Vec<Vec<f64>> {
        self.mate_calls += 1;
        (0..self.individuals.len()).map(|_| self.sample()).collect()
    }

    fn add(&mut self, offspring: Vec<Vec<f64>>) {
        self.individuals.extend(offspring);
    }

    fn individual(&self, index: usize) -> Option<&Vec<f64>> {
        self.individuals.get(index)
    }

    fn keep(&mut self, selected: &[usize]) {
        self.individuals = selected.iter().map(|i| self.individuals[*i].clone()).collect();
    }

    fn objectives(&self) -> &[Vec<f64>] {
        &self.individuals
    }
}

fn params() -> EaParameters {
    EaParameters::default()
        .with_generations_per_iteration(5)
        .with_iterations(3)
}

fn dtlz2_population() -> ArrayPopulation {
    ArrayPopulation::new(Box::new(Dtlz::new(DtlzVariant::Dtlz2, 7, 3).unwrap())).with_seed(3)
}

#[test]
fn construction_runs_first_generation() {
    let controller = IterationController::new(RandomPopulation::new(3), params(), SlowInteractiveAdaptation::new()).unwrap();
    let run_state = controller.run_state();

    assert_eq!(controller.state(), ControllerState::Generating);
    assert_eq!(run_state.generation, 1);
    assert_eq!(run_state.total_generations, 1);
    assert_eq!(run_state.iteration, 0);
    assert_eq!(run_state.population_size, 5);
    assert_eq!(controller.population().created, 5);
    assert_eq!(controller.population().mate_calls, 2);
    assert!(controller.population().len() <= controller.reference_vectors().len());
}

#[test]
fn existing_population_is_not_refilled() {
    let mut population = RandomPopulation::new(3);
    population.create_new_individuals(2);

    let controller = IterationController::new(population, params(), SlowInteractiveAdaptation::new()).unwrap();

    assert_eq!(controller.population().created, 2);
    assert_eq!(controller.population().mate_calls, 2);
    assert!(controller.population().len() <= 5);
}

#[test]
fn boundary_hook_runs_once_per_iteration() {
    let calls = Rc::new(Cell::new(0));
    let generations_seen = Rc::new(Cell::new(0));

    let hook = {
        let calls = calls.clone();
        let generations_seen = generations_seen.clone();
        boundary_hook(move |_, context| {
            assert_eq!(context.iteration, calls.get());
            assert_eq!(context.iterations, 3);
            calls.set(calls.get() + 1);
            generations_seen.set(context.generation);
            Ok(())
        })
    };

    let mut controller = IterationController::new(RandomPopulation::new(3), params(), hook).unwrap();

    for _ in 0..4 {
        controller.step().unwrap();
    }
    assert_eq!(controller.state(), ControllerState::IterationBoundary);
    assert_eq!(controller.run_state().generation, 5);
    assert_eq!(calls.get(), 0);

    controller.step().unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(generations_seen.get(), 5);
    assert_eq!(controller.run_state().generation, 0);
    assert_eq!(controller.run_state().iteration, 1);
    assert_eq!(controller.state(), ControllerState::Generating);

    controller.run().unwrap();

    let run_state = controller.run_state();
    assert_eq!(calls.get(), 3);
    assert_eq!(run_state.state, ControllerState::Terminated);
    assert_eq!(run_state.iteration, 3);
    assert_eq!(run_state.generation, 0);
    assert_eq!(run_state.total_generations, 15);
    assert_eq!(controller.population().mate_calls, 30);
}

#[test]
fn terminated_controller_does_not_step() {
    let mut controller = IterationController::new(
        RandomPopulation::new(3),
        params().with_generations_per_iteration(1).with_iterations(1),
        SlowInteractiveAdaptation::new(),
    ).unwrap();

    assert_eq!(controller.state(), ControllerState::IterationBoundary);
    controller.run().unwrap();
    assert_eq!(controller.state(), ControllerState::Terminated);

    let before = controller.run_state();
    controller.step().unwrap();

    assert_eq!(controller.run_state(), before);
    assert_eq!(controller.population().mate_calls, 2);
}

#[test]
fn finished_run_cannot_be_extended() {
    let calls = Rc::new(Cell::new(0));
    let hook = {
        let calls = calls.clone();
        boundary_hook(move |_, _| {
            calls.set(calls.get() + 1);
            Ok(())
        })
    };

    let mut controller = IterationController::new(
        RandomPopulation::new(3),
        params().with_generations_per_iteration(1).with_iterations(1),
        hook,
    ).unwrap();

    controller.run().unwrap();
    let finished = controller.run_state();

    controller.run().unwrap();
    controller.optimize().unwrap();
    for _ in 0..3 {
        controller.step().unwrap();
    }

    assert_eq!(controller.run_state(), finished);
    assert_eq!(finished.iteration, 1);
    assert_eq!(finished.total_generations, 1);
    assert_eq!(calls.get(), 1);
}

#[test]
fn survivors_never_exceed_reference_vectors() {
    let mut controller = IterationController::new(dtlz2_population(), params(), SlowInteractiveAdaptation::new()).unwrap();

    while controller.state() != ControllerState::Terminated {
        controller.step().unwrap();
        assert!(controller.population().len() <= controller.reference_vectors().len());
        assert!(!controller.population().is_empty());
    }
}

#[test]
fn reference_point_defaults_to_first_vector() {
    let controller = IterationController::new(RandomPopulation::new(3), params(), SlowInteractiveAdaptation::new()).unwrap();

    assert_eq!(controller.run_state().ref_point, controller.reference_vectors().vector(0).to_vec());
}

#[test]
fn mismatched_reference_point_is_rejected() {
    let mut controller = IterationController::new(RandomPopulation::new(3), params(), SlowInteractiveAdaptation::new()).unwrap();
    let before = controller.reference_vectors().values().to_owned();
    let ref_point = controller.run_state().ref_point;

    assert!(matches!(
        controller.set_reference_point(&[1.0, 0.0]),
        Err(Error::InvalidArgument { expected: 3, got: 2 })
    ));
    assert_eq!(controller.run_state().ref_point, ref_point);
    assert_eq!(controller.reference_vectors().values(), before);
}

#[test]
fn invalid_parameters_are_rejected() {
    assert!(matches!(
        IterationController::new(RandomPopulation::new(3), params().with_iterations(0), SlowInteractiveAdaptation::new()),
        Err(Error::InvalidConfiguration(_))
    ));
    assert!(matches!(
        IterationController::new(RandomPopulation::new(3), params().with_ref_point(vec![1.0; 4]), SlowInteractiveAdaptation::new()),
        Err(Error::InvalidArgument { expected: 3, got: 4 })
    ));
    assert!(matches!(
        IterationController::new(RandomPopulation::new(1), params(), SlowInteractiveAdaptation::new()),
        Err(Error::InvalidConfiguration(_))
    ));
}

#[test]
fn vectors_turn_toward_injected_preference() {
    let target = [0.1, 0.2, 1.0];
    let mut controller = IterationController::new(dtlz2_population(), params(), SlowInteractiveAdaptation::new()).unwrap();
    controller.set_reference_point(&target).unwrap();

    let focal_angle = |controller: &IterationController<ArrayPopulation, SlowInteractiveAdaptation>| {
        angle_between(
            ArrayView1::from(controller.reference_vectors().focal_point()),
            ArrayView1::from(&target[..]),
        )
    };

    let start = focal_angle(&controller);
    controller.run().unwrap();
    let end = focal_angle(&controller);

    assert!(end < start);
    assert!(start - end <= 3.0 * 5f64.to_radians() + 1e-9);
    assert_eq!(controller.reference_vectors().reference_point(), &target[..]);
    assert!(!controller.boundary_policy().target_reached());
}

#[test]
fn old_point_centres_the_initial_vectors() {
    let old_point = [1.0, 0.0, 0.0];
    let controller = IterationController::new(
        RandomPopulation::new(3),
        params().with_old_point(old_point.to_vec()),
        SlowInteractiveAdaptation::new(),
    ).unwrap();

    let angle = angle_between(controller.reference_vectors().vector(0), ArrayView1::from(&old_point[..]));
    assert!(angle < 1e-6);
}

#[test]
fn alternative_policies_run_to_termination() {
    let mut by_range = IterationController::new(dtlz2_population(), params(), ObjectiveRangeAdaptation).unwrap();
    by_range.run().unwrap();
    assert_eq!(by_range.state(), ControllerState::Terminated);

    let mut scheduled = IterationController::new(dtlz2_population(), params(), ScheduledAdaptation).unwrap();
    scheduled.optimize().unwrap();
    assert_eq!(scheduled.state(), ControllerState::Terminated);
    assert_eq!(scheduled.run_state().total_generations, 15);
}

#[test]
fn best_solutions_are_mutually_non_dominated() {
    let mut controller = IterationController::new(dtlz2_population(), params(), SlowInteractiveAdaptation::new()).unwrap();
    controller.optimize().unwrap();

    let best = controller.best_solutions();
    assert!(!best.is_empty());
    assert_eq!(controller.name(), "iRVEA (slow interactive adaptation)");

    for (f, solution) in &best {
        assert_eq!(f, &solution.f);
    }

    for (a, _) in &best {
        for (b, _) in &best {
            let dominates = a.iter().zip(b).all(|(x, y)| x <= y) && a.iter().zip(b).any(|(x, y)| x < y);
            assert!(!dominates);
        }
    }
}

#[test]
fn into_population_returns_survivors() {
    let controller = IterationController::new(dtlz2_population(), params(), SlowInteractiveAdaptation::new()).unwrap();
    let n = controller.population().len();

    assert_eq!(controller.into_population().individuals().len(), n);
}
