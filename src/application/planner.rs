// Planner: normalize -> build -> solve -> decode, with the solve guarded by
// a time limit and a single retry for transient backend failures

use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::domain::{
    CapacityRule, OptimizationProblem, PlanReport, PlanningProblem, RawPlanRequest, Solution,
    SolutionStatus, SolverBackend, SolverConfig, SolverError, SolverService,
};

use super::error::{PlanError, Result};
use super::model_builder::ModelBuilder;
use super::normalizer::normalize;
use super::result_decoder::decode;

/// Extra wall-clock time granted past the backend's own time limit
const WATCHDOG_GRACE: Duration = Duration::from_millis(500);

/// Problems with more integer variables than this get a slow-solve warning
const LARGE_MIP_THRESHOLD: usize = 100;

#[derive(Debug, Clone)]
pub struct PlannerOptions {
    pub backend: SolverBackend,
    pub time_limit: Option<Duration>,
    pub gap_tolerance: Option<f64>,
    pub retry_backoff: Duration,
    pub capacity_rule: CapacityRule,
    pub verbose: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            gap_tolerance: None,
            retry_backoff: Duration::from_millis(200),
            capacity_rule: CapacityRule::RegularOnly,
            verbose: false,
        }
    }
}

/// Size of the LP a request would produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    pub num_periods: usize,
    pub num_variables: usize,
    pub num_integer_variables: usize,
    pub num_constraints: usize,
    pub warnings: Vec<String>,
}

/// Entry point of the planning core
///
/// Holds no per-request state, so one instance can serve concurrent callers.
#[derive(Clone)]
pub struct Planner {
    solver: Arc<dyn SolverService>,
    options: PlannerOptions,
}

impl Planner {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self {
            solver,
            options: PlannerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PlannerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    fn model_builder(&self) -> ModelBuilder {
        ModelBuilder::new()
            .with_capacity_rule(self.options.capacity_rule)
            .with_solver_config(SolverConfig {
                backend: self.options.backend,
                time_limit: self.options.time_limit.map(|d| d.as_secs_f64()),
                gap_tolerance: self.options.gap_tolerance,
                verbose: self.options.verbose,
            })
    }

    /// Validate and solve a raw request
    pub fn plan(&self, request: &RawPlanRequest) -> Result<PlanReport> {
        let problem = normalize(request)?;
        self.plan_problem(&problem)
    }

    /// Solve an already validated problem
    pub fn plan_problem(&self, plan: &PlanningProblem) -> Result<PlanReport> {
        let started = Instant::now();
        let model = self.model_builder().build(plan);
        debug!(
            variables = model.problem.num_variables(),
            integer_variables = model.problem.num_integer_variables(),
            constraints = model.problem.constraints.len(),
            nonzeros = model.problem.num_nonzeros(),
            "built aggregate plan model"
        );

        let solution = self.solve_with_retry(&model.problem)?;
        let report = decode(plan, &model, solution, self.solver.name())?;

        if let Some(quality) = report.diagnostics.quality {
            if !quality.is_integral() {
                warn!(
                    max_integrality_violation = quality.max_integrality_violation,
                    "solver returned fractional headcount changes"
                );
            }
            debug!(
                max_constraint_violation = quality.max_constraint_violation,
                "solution quality"
            );
        }
        info!(
            periods = plan.num_periods(),
            total_demand = plan.total_demand(),
            solver = self.solver.name(),
            status = %report.status,
            total_cost = ?report.total_cost,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "aggregate plan solved"
        );

        Ok(report)
    }

    /// Validate a request and size its model without solving
    pub fn inspect(&self, request: &RawPlanRequest) -> Result<ModelSummary> {
        let plan = normalize(request)?;
        let model = self.model_builder().build(&plan);
        let lp = &model.problem;

        self.solver
            .validate(lp)
            .map_err(|source| self.unavailable(source))?;

        let mut warnings = Vec::new();
        if lp.num_integer_variables() > LARGE_MIP_THRESHOLD {
            warnings.push(format!(
                "Problem has {} integer variables, may be slow to solve",
                lp.num_integer_variables()
            ));
        }
        if lp.is_mixed_integer() && !self.solver.supports_mip() {
            warnings.push(format!(
                "Solver '{}' does not support integer variables; hires and layoffs will be relaxed",
                self.solver.name()
            ));
        }

        Ok(ModelSummary {
            num_periods: plan.num_periods(),
            num_variables: lp.num_variables(),
            num_integer_variables: lp.num_integer_variables(),
            num_constraints: lp.constraints.len(),
            warnings,
        })
    }

    fn unavailable(&self, source: SolverError) -> PlanError {
        PlanError::SolverUnavailable {
            solver: self.solver.name().to_string(),
            source,
        }
    }

    fn crashed(&self) -> PlanError {
        error!(solver = self.solver.name(), "solver panicked during solve");
        PlanError::SolverCrashed {
            solver: self.solver.name().to_string(),
        }
    }

    fn solve_with_retry(&self, lp: &OptimizationProblem) -> Result<Solution> {
        match self.attempt(lp) {
            Err(PlanError::SolverUnavailable { source, .. }) if source.is_transient() => {
                warn!(
                    error = %source,
                    backoff_ms = self.options.retry_backoff.as_millis() as u64,
                    "transient solver failure, retrying once"
                );
                thread::sleep(self.options.retry_backoff);
                self.attempt(lp)
            }
            other => other,
        }
    }

    fn attempt(&self, lp: &OptimizationProblem) -> Result<Solution> {
        let Some(limit) = self.options.time_limit else {
            return match panic::catch_unwind(AssertUnwindSafe(|| self.solver.solve(lp))) {
                Ok(result) => result.map_err(|e| self.unavailable(e)),
                Err(_) => Err(self.crashed()),
            };
        };

        let (tx, rx) = mpsc::channel();
        let solver = Arc::clone(&self.solver);
        let owned = lp.clone();
        thread::Builder::new()
            .name("aggplan-solver".to_string())
            .spawn(move || {
                // receiver is gone once the watchdog fired
                let _ = tx.send(solver.solve(&owned));
            })
            .map_err(|e| self.unavailable(SolverError::ResourceExhausted(e.to_string())))?;

        match rx.recv_timeout(limit + WATCHDOG_GRACE) {
            Ok(result) => result.map_err(|e| self.unavailable(e)),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(
                    limit_ms = limit.as_millis() as u64,
                    solver = self.solver.name(),
                    "solver exceeded time limit"
                );
                Ok(Solution::new(
                    SolutionStatus::Undefined,
                    format!("Time limit of {:.3}s reached", limit.as_secs_f64()),
                ))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(self.crashed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CostKind, PeriodId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedSolver {
        calls: AtomicUsize,
        transient_failures: usize,
    }

    impl SolverService for ScriptedSolver {
        fn solve(
            &self,
            problem: &OptimizationProblem,
        ) -> crate::domain::solver_service::Result<Solution> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.transient_failures {
                return Err(SolverError::ResourceExhausted("out of memory".into()));
            }
            Ok(Solution::optimal(0.0, vec![0.0; problem.num_variables()]))
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn supports_mip(&self) -> bool {
            true
        }
    }

    fn request() -> RawPlanRequest {
        RawPlanRequest {
            periods: vec![PeriodId::Number(1)],
            initial_workforce: 0.0,
            initial_inventory: 0.0,
            initial_backlog: 0.0,
            regular_rate: 1.0,
            overtime_rate: 1.0,
            overtime_capacity_ratio: 1.0,
            demand: [("1".to_string(), 0.0)].into_iter().collect(),
            costs: CostKind::ALL
                .iter()
                .map(|k| (k.key().to_string(), 1.0))
                .collect(),
            min_final_inventory: 0.0,
        }
    }

    fn planner(transient_failures: usize) -> (Planner, Arc<ScriptedSolver>) {
        let solver = Arc::new(ScriptedSolver {
            calls: AtomicUsize::new(0),
            transient_failures,
        });
        let planner = Planner::new(solver.clone()).with_options(PlannerOptions {
            retry_backoff: Duration::from_millis(1),
            ..PlannerOptions::default()
        });
        (planner, solver)
    }

    #[test]
    fn retries_transient_failure_once() {
        let (planner, solver) = planner(1);
        let report = planner.plan(&request()).unwrap();
        assert!(report.is_optimal());
        assert_eq!(solver.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn gives_up_after_second_transient_failure() {
        let (planner, solver) = planner(2);
        let err = planner.plan(&request()).unwrap_err();
        assert!(matches!(
            err,
            PlanError::SolverUnavailable {
                source: SolverError::ResourceExhausted(_),
                ..
            }
        ));
        assert_eq!(solver.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn validation_failure_never_reaches_solver() {
        let (planner, solver) = planner(0);
        let mut req = request();
        req.demand.clear();
        assert!(matches!(
            planner.plan(&req),
            Err(PlanError::Validation(_))
        ));
        assert_eq!(solver.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn inspect_sizes_the_model() {
        let (planner, solver) = planner(0);
        let summary = planner.inspect(&request()).unwrap();
        assert_eq!(summary.num_periods, 1);
        assert_eq!(summary.num_variables, 8);
        assert_eq!(summary.num_integer_variables, 2);
        assert_eq!(summary.num_constraints, 6);
        assert!(summary.warnings.is_empty());
        assert_eq!(solver.calls.load(Ordering::SeqCst), 0);
    }
}
