use super::value_objects::{ConstraintType, SolutionStatus, SolverBackend, VariableType};

/// Values closer than this to an integer count as integral
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Decision variable in an optimization problem
#[derive(Debug, Clone)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Continuous,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Integer,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn of_type(variable_type: VariableType, name: impl Into<String>) -> Self {
        match variable_type {
            VariableType::Continuous => Self::continuous(name),
            VariableType::Integer => Self::integer(name),
        }
    }

    pub fn is_integer(&self) -> bool {
        self.variable_type == VariableType::Integer
    }
}

/// Linear objective to minimize
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub coefficients: Vec<f64>,
}

impl ObjectiveFunction {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum()
    }
}

/// Linear constraint on variables, stored as sparse `(column, coefficient)` terms
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub terms: Vec<(usize, f64)>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, terms: Vec<(usize, f64)>, bound: f64) -> Self {
        Self {
            constraint_type,
            terms,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Combined coefficient of `column` (0 when the row does not touch it)
    pub fn coefficient(&self, column: usize) -> f64 {
        self.terms
            .iter()
            .filter(|(c, _)| *c == column)
            .map(|(_, k)| k)
            .sum()
    }

    /// Highest column referenced by this row
    pub fn max_column(&self) -> Option<usize> {
        self.terms.iter().map(|(c, _)| *c).max()
    }

    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(c, k)| k * values.get(c).copied().unwrap_or(0.0))
            .sum()
    }

    /// How far `values` fall outside this constraint (0 when satisfied)
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.lhs(values);
        match self.constraint_type {
            ConstraintType::LessThanOrEqual => (lhs - self.bound).max(0.0),
            ConstraintType::Equal => (lhs - self.bound).abs(),
            ConstraintType::GreaterThanOrEqual => (self.bound - lhs).max(0.0),
        }
    }
}

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    pub time_limit: Option<f64>,
    pub gap_tolerance: Option<f64>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            gap_tolerance: None,
            verbose: false,
        }
    }
}

/// Complete optimization problem handed to a solver backend
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    pub name: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver_config: SolverConfig,
}

impl OptimizationProblem {
    pub fn new(objective: ObjectiveFunction) -> Self {
        Self {
            name: String::new(),
            objective,
            constraints: Vec::new(),
            variables: Vec::new(),
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_constraint_capacity(mut self, rows: usize) -> Self {
        self.constraints.reserve(rows);
        self
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.num_variables()
    }

    pub fn num_integer_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integer()).count()
    }

    pub fn is_mixed_integer(&self) -> bool {
        self.num_integer_variables() > 0
    }

    /// True when no assignment can push the (minimized) objective to -∞
    pub fn objective_bounded_below(&self) -> bool {
        self.variables
            .iter()
            .zip(&self.objective.coefficients)
            .all(|(var, &c)| c == 0.0 || (c > 0.0 && var.lower_bound.is_finite()))
    }

    /// Total number of stored constraint coefficients
    pub fn num_nonzeros(&self) -> usize {
        self.constraints.iter().map(|c| c.terms.len()).sum()
    }

    /// Measure how well `values` satisfy this problem
    pub fn assess(&self, values: &[f64]) -> SolutionQuality {
        let max_constraint_violation = self
            .constraints
            .iter()
            .map(|c| c.violation(values))
            .chain(
                self.variables
                    .iter()
                    .zip(values)
                    .map(|(var, &v)| (var.lower_bound - v).max(0.0)),
            )
            .fold(0.0, f64::max);

        let max_integrality_violation = self
            .variables
            .iter()
            .zip(values)
            .filter(|(var, _)| var.is_integer())
            .map(|(_, &v)| (v - v.round()).abs())
            .fold(0.0, f64::max);

        SolutionQuality {
            max_constraint_violation,
            max_integrality_violation,
        }
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
}

impl SolverStatistics {
    pub fn for_problem(problem: &OptimizationProblem, solve_time_ms: f64) -> Self {
        Self {
            solve_time_ms,
            num_variables: problem.num_variables() as u32,
            num_constraints: problem.constraints.len() as u32,
            num_integer_vars: problem.num_integer_variables() as u32,
        }
    }
}

/// Quality metrics for the solution
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolutionQuality {
    pub max_constraint_violation: f64,
    pub max_integrality_violation: f64,
}

impl SolutionQuality {
    pub fn is_integral(&self) -> bool {
        self.max_integrality_violation <= INTEGRALITY_TOLERANCE
    }
}

/// Solution to an optimization problem
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub optimal_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            optimal_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            optimal_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_respects_direction() {
        let le = Constraint::new(ConstraintType::LessThanOrEqual, vec![(0, 1.0), (1, 1.0)], 4.0);
        assert_eq!(le.violation(&[1.0, 2.0]), 0.0);
        assert_eq!(le.violation(&[3.0, 2.0]), 1.0);

        let ge = Constraint::new(ConstraintType::GreaterThanOrEqual, vec![(0, 2.0)], 4.0);
        assert_eq!(ge.violation(&[1.0, 9.0]), 2.0);

        let eq = Constraint::new(ConstraintType::Equal, vec![(0, 1.0), (1, -1.0)], 0.0);
        assert_eq!(eq.violation(&[2.0, 3.5]), 1.5);
    }

    #[test]
    fn repeated_columns_add_up() {
        let row = Constraint::new(ConstraintType::Equal, vec![(3, 1.0), (1, 2.0), (3, -0.5)], 0.0);
        assert_eq!(row.coefficient(3), 0.5);
        assert_eq!(row.coefficient(1), 2.0);
        assert_eq!(row.coefficient(0), 0.0);
        assert_eq!(row.max_column(), Some(3));
        assert_eq!(row.lhs(&[0.0, 1.0, 0.0, 4.0]), 4.0);
    }

    #[test]
    fn assess_reports_integrality_gap() {
        let mut problem = OptimizationProblem::new(ObjectiveFunction::new(vec![1.0, 1.0]))
            .with_variables(vec![Variable::continuous("x"), Variable::integer("y")]);
        problem.add_constraint(Constraint::new(
            ConstraintType::GreaterThanOrEqual,
            vec![(0, 1.0), (1, 1.0)],
            3.0,
        ));

        let quality = problem.assess(&[0.5, 2.25]);
        assert!((quality.max_constraint_violation - 0.25).abs() < 1e-12);
        assert!((quality.max_integrality_violation - 0.25).abs() < 1e-12);
        assert!(!quality.is_integral());
        assert!(problem.is_mixed_integer());
        assert!(problem.objective_bounded_below());

        problem.objective.coefficients[0] = -1.0;
        assert!(!problem.objective_bounded_below());
    }
}
