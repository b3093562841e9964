//! GA problem definition for the bi-objective CVRPTW.
//!
//! Implements the [`GaProblem`](u_metaheur::ga::GaProblem) trait over the
//! separator encoding so that the generic
//! [`GaRunner`](u_metaheur::ga::GaRunner) can drive the repair crossover and
//! the swap mutation.
//!
//! # Operators
//!
//! - **Crossover**: PMX with separator repair
//! - **Mutation**: exchange of two positions
//! - **Evaluation**: one objective (distance or fuel) plus a weighted
//!   constraint penalty
//!
//! Greedy seeds replace the first individuals of each initial population.
//! The seed cursor rewinds when a generation finishes and at the start of
//! [`CvrptwGaProblem::run`], so repeated runs on one problem are all seeded.
//!
//! The runner draws its own crossover and mutation rates before calling the
//! operators. The probabilities configured here are applied on top and
//! default to `1.0`, leaving [`GaConfig`](u_metaheur::ga::GaConfig) in
//! charge.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;
use tracing::{debug, trace};
use u_metaheur::ga::multi_objective::non_dominated_sort;
use u_metaheur::ga::{GaConfig, GaProblem, GaResult, GaRunner};

use crate::constructive::{distance_greedy, fuel_greedy};
use crate::error::EvaluationError;
use crate::evaluation::{evaluate_full, Evaluation};
use crate::models::{Encoding, Instance};

use super::chromosome::RouteChromosome;
use super::crossover::pmx_separator_crossover;
use super::mutation::swap_mutation_in_place;

/// The objective minimized by the single-objective runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Objective {
    /// Total travel distance.
    #[default]
    Distance,
    /// Load-weighted travel distance.
    Fuel,
}

/// GA problem for the capacitated VRP with time windows.
///
/// Individuals are [`RouteChromosome`]s holding valid separator encodings.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::{Customer, Fleet, Instance};
/// use u_cvrptw::ga::{CvrptwGaProblem, Objective};
/// use u_metaheur::ga::{GaConfig, GaRunner};
///
/// let instance = Instance::new(
///     "line",
///     Fleet::new(2, 30.0),
///     vec![
///         Customer::depot(0.0, 0.0),
///         Customer::new(1, 1.0, 0.0, 10.0, 0.0),
///         Customer::new(2, 2.0, 0.0, 10.0, 0.0),
///         Customer::new(3, 3.0, 0.0, 10.0, 0.0),
///     ],
/// )
/// .unwrap();
///
/// let problem = CvrptwGaProblem::new(instance)
///     .with_objective(Objective::Fuel)
///     .with_greedy_seeds();
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(30)
///     .with_parallel(false)
///     .with_seed(42);
///
/// let result = GaRunner::run(&problem, &config);
/// assert!(result.best_fitness < f64::INFINITY);
/// assert!(result.best.encoding().is_structurally_valid(problem.instance()));
/// ```
#[derive(Debug)]
pub struct CvrptwGaProblem {
    instance: Instance,
    objective: Objective,
    penalty_weight: f64,
    crossover_probability: f64,
    mutation_probability: f64,
    seeds: Vec<Encoding>,
    next_seed: AtomicUsize,
}

impl CvrptwGaProblem {
    /// Default weight of one unit of constraint violation.
    pub const DEFAULT_PENALTY_WEIGHT: f64 = 1000.0;

    /// Creates a problem minimizing distance with default settings.
    pub fn new(instance: Instance) -> Self {
        Self {
            instance,
            objective: Objective::default(),
            penalty_weight: Self::DEFAULT_PENALTY_WEIGHT,
            crossover_probability: 1.0,
            mutation_probability: 1.0,
            seeds: Vec::new(),
            next_seed: AtomicUsize::new(0),
        }
    }

    /// Sets the minimized objective.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Sets the weight applied to the absolute constraint violation.
    pub fn with_penalty_weight(mut self, weight: f64) -> Self {
        self.penalty_weight = weight;
        self
    }

    /// Sets the probability passed to the crossover operator.
    pub fn with_crossover_probability(mut self, probability: f64) -> Self {
        self.crossover_probability = probability;
        self
    }

    /// Sets the probability passed to the mutation operator.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability;
        self
    }

    /// Places the distance-first and fuel-first greedy constructions at the
    /// front of the initial population.
    ///
    /// Constructions that leave customers uncovered are skipped.
    pub fn with_greedy_seeds(mut self) -> Self {
        for construction in [distance_greedy(&self.instance), fuel_greedy(&self.instance)] {
            match construction.into_padded_encoding(&self.instance) {
                Some(encoding) if !self.seeds.contains(&encoding) => self.seeds.push(encoding),
                Some(_) => {}
                None => debug!(instance = self.instance.name(), "skipping incomplete greedy seed"),
            }
        }
        self
    }

    /// The problem instance.
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// The minimized objective.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Encodings injected before random individuals.
    pub fn seeds(&self) -> &[Encoding] {
        &self.seeds
    }

    /// Makes the next [`create_individual`](GaProblem::create_individual)
    /// calls hand out the greedy seeds again.
    pub fn reset_seeds(&self) {
        self.next_seed.store(0, Ordering::Relaxed);
    }

    /// Runs the GA with a freshly seeded initial population.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid, as [`GaRunner::run`] does.
    pub fn run(&self, config: &GaConfig) -> GaResult<RouteChromosome> {
        self.reset_seeds();
        GaRunner::run(self, config)
    }

    /// Objectives and constraint report of an encoding.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](crate::evaluation::evaluate).
    pub fn assess(&self, encoding: &Encoding) -> Result<Evaluation, EvaluationError> {
        evaluate_full(&self.instance, encoding)
    }

    /// Scalar fitness of an evaluation: the selected objective plus the
    /// weighted absolute violation.
    pub fn scalarize(&self, evaluation: &Evaluation) -> f64 {
        let value = match self.objective {
            Objective::Distance => evaluation.objectives.distance,
            Objective::Fuel => evaluation.objectives.fuel,
        };
        value + self.penalty_weight * evaluation.constraints.overall_violation.abs()
    }

    /// Indices of the feasible encodings that are non-dominated in
    /// `(distance, fuel)`.
    ///
    /// Encodings that fail evaluation or violate a constraint never belong
    /// to the front.
    pub fn pareto_front(&self, encodings: &[Encoding]) -> Vec<usize> {
        let (indices, objectives): (Vec<usize>, Vec<Vec<f64>>) = encodings
            .iter()
            .enumerate()
            .filter_map(|(i, encoding)| {
                let evaluation = self.assess(encoding).ok()?;
                evaluation
                    .is_feasible()
                    .then(|| (i, evaluation.objectives.as_array().to_vec()))
            })
            .unzip();

        if objectives.is_empty() {
            return Vec::new();
        }

        let sorted = non_dominated_sort(&objectives);
        let mut front: Vec<usize> = sorted
            .fronts
            .first()
            .map(|f| f.iter().map(|&k| indices[k]).collect())
            .unwrap_or_default();
        front.sort_unstable();
        front
    }
}

impl GaProblem for CvrptwGaProblem {
    type Individual = RouteChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> RouteChromosome {
        let k = self.next_seed.fetch_add(1, Ordering::Relaxed);
        match self.seeds.get(k) {
            Some(seed) => RouteChromosome::new(seed.clone()),
            None => RouteChromosome::new(Encoding::random(&self.instance, rng)),
        }
    }

    fn evaluate(&self, individual: &RouteChromosome) -> f64 {
        match self.assess(individual.encoding()) {
            Ok(evaluation) => self.scalarize(&evaluation),
            Err(err) => {
                debug!(%err, "unevaluable individual");
                f64::INFINITY
            }
        }
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &RouteChromosome,
        parent2: &RouteChromosome,
        rng: &mut R,
    ) -> Vec<RouteChromosome> {
        let (c1, c2) = pmx_separator_crossover(
            &self.instance,
            rng,
            self.crossover_probability,
            parent1.encoding(),
            parent2.encoding(),
        );
        vec![RouteChromosome::new(c1), RouteChromosome::new(c2)]
    }

    fn mutate<R: Rng>(&self, individual: &mut RouteChromosome, rng: &mut R) {
        swap_mutation_in_place(rng, self.mutation_probability, individual.encoding_mut());
    }

    fn on_generation(&self, generation: usize, best_fitness: f64) {
        // the initial population is complete once a generation has run
        self.reset_seeds();
        trace!(generation, best_fitness, "generation finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Fleet, TimeWindow};
    use u_metaheur::ga::Individual;

    fn setup() -> Instance {
        Instance::new(
            "ga",
            Fleet::new(3, 20.0),
            vec![
                Customer::depot(0.0, 0.0),
                Customer::new(1, 3.0, 4.0, 10.0, 0.0),
                Customer::new(2, 6.0, 8.0, 5.0, 0.0),
                Customer::new(3, 0.0, 10.0, 5.0, 0.0),
                Customer::new(4, -5.0, 0.0, 8.0, 0.0),
            ],
        )
        .expect("valid")
    }

    #[test]
    fn test_create_individual_is_valid() {
        let problem = CvrptwGaProblem::new(setup());
        let mut rng = u_numflow::random::create_rng(42);
        for _ in 0..20 {
            let ind = problem.create_individual(&mut rng);
            assert!(ind.encoding().is_structurally_valid(problem.instance()));
        }
    }

    #[test]
    fn test_greedy_seeds_come_first() {
        let problem = CvrptwGaProblem::new(setup()).with_greedy_seeds();
        assert!(!problem.seeds().is_empty());
        let mut rng = u_numflow::random::create_rng(1);
        for seed in problem.seeds().to_vec() {
            assert_eq!(problem.create_individual(&mut rng).encoding(), &seed);
        }
    }

    fn best_seed_fitness(problem: &CvrptwGaProblem) -> f64 {
        problem
            .seeds()
            .iter()
            .map(|s| problem.evaluate(&RouteChromosome::new(s.clone())))
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn test_reset_seeds_rewinds() {
        let problem = CvrptwGaProblem::new(setup()).with_greedy_seeds();
        let first = problem.seeds()[0].clone();
        let mut rng = u_numflow::random::create_rng(5);
        for _ in 0..10 {
            problem.create_individual(&mut rng);
        }
        problem.reset_seeds();
        assert_eq!(problem.create_individual(&mut rng).encoding(), &first);
    }

    #[test]
    fn test_repeated_runs_are_seeded() {
        let problem = CvrptwGaProblem::new(setup()).with_greedy_seeds();
        let first = problem.seeds()[0].clone();
        let seeded = best_seed_fitness(&problem);
        let config = GaConfig::default()
            .with_population_size(4)
            .with_max_generations(2)
            .with_parallel(false)
            .with_seed(11);

        let mut rng = u_numflow::random::create_rng(5);
        for _ in 0..10 {
            problem.create_individual(&mut rng);
        }
        for _ in 0..2 {
            let result = problem.run(&config);
            assert!(result.best_fitness <= seeded);
        }

        for _ in 0..2 {
            let result = GaRunner::run(&problem, &config);
            assert!(result.best_fitness <= seeded);
        }
        assert_eq!(problem.create_individual(&mut rng).encoding(), &first);
    }

    #[test]
    fn test_incomplete_greedy_not_seeded() {
        let inst = Instance::new(
            "tight",
            Fleet::new(1, 5.0),
            vec![
                Customer::depot(0.0, 0.0),
                Customer::new(1, 1.0, 0.0, 5.0, 0.0),
                Customer::new(2, 2.0, 0.0, 5.0, 0.0),
            ],
        )
        .expect("valid");
        let problem = CvrptwGaProblem::new(inst).with_greedy_seeds();
        assert!(problem.seeds().is_empty());
    }

    #[test]
    fn test_evaluate_distance_and_fuel() {
        let inst = setup();
        let enc = Encoding::new(vec![1, 0, 0, 2, 3, 4]);
        let ind = RouteChromosome::new(enc.clone());
        let expected = evaluate_full(&inst, &enc).expect("ok");

        let by_distance = CvrptwGaProblem::new(inst.clone()).with_penalty_weight(0.0);
        assert!((by_distance.evaluate(&ind) - expected.objectives.distance).abs() < 1e-10);

        let by_fuel = CvrptwGaProblem::new(inst)
            .with_objective(Objective::Fuel)
            .with_penalty_weight(0.0);
        assert!((by_fuel.evaluate(&ind) - expected.objectives.fuel).abs() < 1e-10);
    }

    #[test]
    fn test_penalty_applied() {
        let inst = setup();
        // one run carrying 28 > 20
        let enc = Encoding::new(vec![1, 2, 3, 4, 0, 0]);
        let ind = RouteChromosome::new(enc.clone());
        let eval = evaluate_full(&inst, &enc).expect("ok");
        let problem = CvrptwGaProblem::new(inst).with_penalty_weight(10.0);
        let expected = eval.objectives.distance + 10.0 * 8.0;
        assert!((problem.evaluate(&ind) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_customer_is_worst() {
        let problem = CvrptwGaProblem::new(setup());
        let ind = RouteChromosome::new(Encoding::new(vec![1, 9, 0, 2, 3, 4]));
        assert_eq!(problem.evaluate(&ind), f64::INFINITY);
    }

    #[test]
    fn test_operators_keep_validity() {
        let problem = CvrptwGaProblem::new(setup());
        let mut rng = u_numflow::random::create_rng(7);
        for _ in 0..100 {
            let p1 = problem.create_individual(&mut rng);
            let p2 = problem.create_individual(&mut rng);
            for mut child in problem.crossover(&p1, &p2, &mut rng) {
                problem.mutate(&mut child, &mut rng);
                assert!(child.encoding().is_structurally_valid(problem.instance()));
            }
        }
    }

    #[test]
    fn test_pareto_front_filters_dominated_and_infeasible() {
        let inst = Instance::new(
            "front",
            Fleet::new(2, 20.0),
            vec![
                Customer::depot(0.0, 0.0),
                Customer::new(1, 3.0, 4.0, 10.0, 0.0),
                Customer::new(2, 6.0, 8.0, 5.0, 0.0),
                Customer::new(3, 0.0, 10.0, 5.0, 0.0)
                    .with_time_window(TimeWindow::new(0.0, 100.0).expect("valid")),
            ],
        )
        .expect("valid");
        let problem = CvrptwGaProblem::new(inst);
        let encodings = vec![
            Encoding::new(vec![1, 2, 3, 0]), // load 20: feasible
            Encoding::new(vec![3, 2, 1, 0]), // same distance, heavy last
            Encoding::new(vec![1, 0, 2, 3]),
            Encoding::new(vec![1, 9, 3, 0]), // unknown customer
        ];
        let front = problem.pareto_front(&encodings);
        assert!(!front.contains(&3));
        assert!(!front.contains(&1));
        assert!(!front.is_empty());
    }

    #[test]
    fn test_pareto_front_empty() {
        let problem = CvrptwGaProblem::new(setup());
        assert!(problem.pareto_front(&[]).is_empty());
    }

    #[test]
    fn test_runner_improves_on_random() {
        let problem = CvrptwGaProblem::new(setup()).with_greedy_seeds();
        let config = GaConfig::default()
            .with_population_size(30)
            .with_max_generations(40)
            .with_parallel(false)
            .with_seed(3);
        let result = GaRunner::run(&problem, &config);
        assert!(result.best.encoding().is_structurally_valid(problem.instance()));
        assert!(result.best.fitness() < f64::INFINITY);

        assert!(result.best_fitness <= best_seed_fitness(&problem));
    }
}
