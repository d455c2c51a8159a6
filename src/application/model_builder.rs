// Model builder: planning problem -> LP description
//
// Columns are laid out period-major: period `i` owns the block
// `[i * 8, i * 8 + 8)`, ordered as `PlanVariable::ALL`.

use crate::domain::{
    CapacityRule, Constraint, ConstraintType, CostKind, ObjectiveFunction, OptimizationProblem,
    PlanVariable, PlanningProblem, SolverConfig, Variable,
};

/// Maps (variable kind, period index) pairs to LP columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableMap {
    num_periods: usize,
}

impl VariableMap {
    pub fn new(num_periods: usize) -> Self {
        Self { num_periods }
    }

    pub fn num_periods(&self) -> usize {
        self.num_periods
    }

    pub fn num_columns(&self) -> usize {
        self.num_periods * PlanVariable::COUNT
    }

    pub fn column(&self, variable: PlanVariable, period: usize) -> usize {
        debug_assert!(period < self.num_periods);
        period * PlanVariable::COUNT + variable.offset()
    }

    /// Inverse of [`VariableMap::column`]
    pub fn locate(&self, column: usize) -> Option<(PlanVariable, usize)> {
        if column >= self.num_columns() {
            return None;
        }
        let variable = PlanVariable::ALL[column % PlanVariable::COUNT];
        Some((variable, column / PlanVariable::COUNT))
    }
}

/// LP description of a planning problem plus its column handle
#[derive(Debug, Clone)]
pub struct PlanModel {
    pub problem: OptimizationProblem,
    pub variables: VariableMap,
}

/// Sparse constraint row under construction
struct Row {
    terms: Vec<(usize, f64)>,
}

impl Row {
    fn new() -> Self {
        Self {
            terms: Vec::with_capacity(6),
        }
    }

    fn term(mut self, column: usize, coefficient: f64) -> Self {
        self.terms.push((column, coefficient));
        self
    }

    fn finish(self, kind: ConstraintType, bound: f64, name: String) -> Constraint {
        Constraint::new(kind, self.terms, bound).with_name(name)
    }
}

/// Cost coefficient attached to each decision variable in the objective
fn objective_cost(variable: PlanVariable) -> CostKind {
    match variable {
        PlanVariable::Workforce => CostKind::RegularLabor,
        PlanVariable::OvertimeProduction => CostKind::OvertimeLabor,
        PlanVariable::Hires => CostKind::Hiring,
        PlanVariable::Layoffs => CostKind::Layoff,
        PlanVariable::Inventory => CostKind::Holding,
        PlanVariable::Shortage => CostKind::Shortage,
        PlanVariable::RegularProduction => CostKind::Materials,
        PlanVariable::Subcontracted => CostKind::Subcontracting,
    }
}

/// Deterministic translation of a [`PlanningProblem`] into an LP
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    capacity_rule: CapacityRule,
    solver_config: SolverConfig,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_rule(mut self, rule: CapacityRule) -> Self {
        self.capacity_rule = rule;
        self
    }

    pub fn with_solver_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn build(&self, plan: &PlanningProblem) -> PlanModel {
        let map = VariableMap::new(plan.num_periods());
        let width = map.num_columns();
        let rows = 4 * plan.num_periods() + 2;
        let costs = plan.costs();

        let mut variables = Vec::with_capacity(width);
        let mut objective = Vec::with_capacity(width);
        for period in plan.periods() {
            for var in PlanVariable::ALL {
                variables.push(Variable::of_type(
                    var.variable_type(),
                    format!("{}[{}]", var.label(), period.id),
                ));
                objective.push(costs.get(objective_cost(var)));
            }
        }

        let mut lp = OptimizationProblem::new(ObjectiveFunction::new(objective))
            .with_name("aggregate_plan")
            .with_constraint_capacity(rows)
            .with_variables(variables)
            .with_config(self.solver_config.clone());

        let col = |var: PlanVariable, i: usize| map.column(var, i);

        for (i, period) in plan.periods().iter().enumerate() {
            let t = &period.id;

            // W(t) - W(t-1) - H(t) + L(t) = 0, with W(t-1) = W0 moved right at i = 0
            let mut row = Row::new()
                .term(col(PlanVariable::Workforce, i), 1.0)
                .term(col(PlanVariable::Hires, i), -1.0)
                .term(col(PlanVariable::Layoffs, i), 1.0);
            let bound = if i == 0 {
                plan.initial_workforce()
            } else {
                row = row.term(col(PlanVariable::Workforce, i - 1), -1.0);
                0.0
            };
            lp.add_constraint(row.finish(
                ConstraintType::Equal,
                bound,
                format!("workforce_balance[{t}]"),
            ));

            // I(t-1) + P(t) + C(t) - I(t) + S(t) - S(t-1) = D(t)
            let mut row = Row::new()
                .term(col(PlanVariable::RegularProduction, i), 1.0)
                .term(col(PlanVariable::Subcontracted, i), 1.0)
                .term(col(PlanVariable::Inventory, i), -1.0)
                .term(col(PlanVariable::Shortage, i), 1.0);
            let bound = if i == 0 {
                period.demand + plan.initial_backlog() - plan.initial_inventory()
            } else {
                row = row
                    .term(col(PlanVariable::Inventory, i - 1), 1.0)
                    .term(col(PlanVariable::Shortage, i - 1), -1.0);
                period.demand
            };
            lp.add_constraint(row.finish(
                ConstraintType::Equal,
                bound,
                format!("material_balance[{t}]"),
            ));

            let mut row = Row::new()
                .term(col(PlanVariable::RegularProduction, i), 1.0)
                .term(col(PlanVariable::Workforce, i), -plan.regular_rate());
            if self.capacity_rule == CapacityRule::OvertimeAugmented {
                row = row.term(
                    col(PlanVariable::OvertimeProduction, i),
                    -plan.overtime_rate(),
                );
            }
            lp.add_constraint(row.finish(
                ConstraintType::LessThanOrEqual,
                0.0,
                format!("regular_capacity[{t}]"),
            ));

            let row = Row::new()
                .term(col(PlanVariable::OvertimeProduction, i), 1.0)
                .term(col(PlanVariable::Workforce, i), -plan.overtime_capacity_ratio());
            lp.add_constraint(row.finish(
                ConstraintType::LessThanOrEqual,
                0.0,
                format!("overtime_capacity[{t}]"),
            ));
        }

        let last = plan.num_periods() - 1;
        lp.add_constraint(
            Row::new()
                .term(col(PlanVariable::Inventory, last), 1.0)
                .finish(
                    ConstraintType::GreaterThanOrEqual,
                    plan.min_final_inventory(),
                    "final_inventory".to_string(),
                ),
        );
        lp.add_constraint(
            Row::new()
                .term(col(PlanVariable::Shortage, last), 1.0)
                .finish(ConstraintType::Equal, 0.0, "final_shortage".to_string()),
        );

        PlanModel {
            problem: lp,
            variables: map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::normalizer::normalize;
    use crate::domain::{PeriodId, RawPlanRequest, VariableType};

    fn plan(periods: &[(&str, f64)]) -> PlanningProblem {
        let costs = [
            ("tiempo_regular", 640.0),
            ("tiempo_extra", 6.0),
            ("contratacion", 300.0),
            ("despido", 500.0),
            ("inventario", 2.0),
            ("faltante", 5.0),
            ("materiales", 10.0),
            ("subcontratacion", 30.0),
        ];
        normalize(&RawPlanRequest {
            periods: periods.iter().map(|(p, _)| PeriodId::from(*p)).collect(),
            initial_workforce: 80.0,
            initial_inventory: 1000.0,
            initial_backlog: 50.0,
            regular_rate: 40.0,
            overtime_rate: 0.25,
            overtime_capacity_ratio: 10.0,
            demand: periods.iter().map(|(p, d)| (p.to_string(), *d)).collect(),
            costs: costs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            min_final_inventory: 500.0,
        })
        .unwrap()
    }

    fn row<'a>(model: &'a PlanModel, name: &str) -> &'a Constraint {
        model
            .problem
            .constraints
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("no constraint named {name}"))
    }

    #[test]
    fn variable_map_round_trips() {
        let map = VariableMap::new(3);
        assert_eq!(map.num_columns(), 24);
        for period in 0..3 {
            for var in PlanVariable::ALL {
                assert_eq!(map.locate(map.column(var, period)), Some((var, period)));
            }
        }
        assert_eq!(map.locate(24), None);
    }

    #[test]
    fn builds_expected_shape() {
        let model = ModelBuilder::new().build(&plan(&[("Ene", 1600.0), ("Feb", 3000.0)]));
        let lp = &model.problem;

        assert_eq!(lp.num_variables(), 16);
        // four rows per period plus two terminal rows
        assert_eq!(lp.constraints.len(), 10);
        assert_eq!(lp.num_integer_variables(), 4);
        assert!(lp
            .constraints
            .iter()
            .all(|c| !c.terms.is_empty() && c.terms.len() <= 6));

        let hires = model.variables.column(PlanVariable::Hires, 1);
        assert_eq!(lp.variables[hires].variable_type, VariableType::Integer);
        assert_eq!(lp.variables[hires].name, "H[Feb]");
        assert_eq!(lp.objective.coefficients[hires], 300.0);

        let sub = model.variables.column(PlanVariable::Subcontracted, 0);
        assert_eq!(lp.objective.coefficients[sub], 30.0);
        let prod = model.variables.column(PlanVariable::RegularProduction, 0);
        assert_eq!(lp.objective.coefficients[prod], 10.0);
    }

    #[test]
    fn first_period_uses_initial_state() {
        let model = ModelBuilder::new().build(&plan(&[("Ene", 1600.0), ("Feb", 3000.0)]));
        let map = model.variables;

        let workforce = row(&model, "workforce_balance[Ene]");
        assert_eq!(workforce.constraint_type, ConstraintType::Equal);
        assert_eq!(workforce.bound, 80.0);
        assert_eq!(workforce.coefficient(map.column(PlanVariable::Workforce, 0)), 1.0);
        assert_eq!(workforce.coefficient(map.column(PlanVariable::Hires, 0)), -1.0);
        assert_eq!(workforce.coefficient(map.column(PlanVariable::Layoffs, 0)), 1.0);

        // demand + backlog - opening inventory
        let material = row(&model, "material_balance[Ene]");
        assert_eq!(material.bound, 1600.0 + 50.0 - 1000.0);
    }

    #[test]
    fn later_periods_chain_to_predecessor() {
        let model = ModelBuilder::new().build(&plan(&[("Ene", 1600.0), ("Feb", 3000.0)]));
        let map = model.variables;

        let workforce = row(&model, "workforce_balance[Feb]");
        assert_eq!(workforce.bound, 0.0);
        assert_eq!(workforce.coefficient(map.column(PlanVariable::Workforce, 0)), -1.0);
        assert_eq!(workforce.coefficient(map.column(PlanVariable::Workforce, 1)), 1.0);

        let material = row(&model, "material_balance[Feb]");
        assert_eq!(material.bound, 3000.0);
        assert_eq!(material.coefficient(map.column(PlanVariable::Inventory, 0)), 1.0);
        assert_eq!(material.coefficient(map.column(PlanVariable::Shortage, 0)), -1.0);
        assert_eq!(material.coefficient(map.column(PlanVariable::Inventory, 1)), -1.0);
        assert_eq!(material.coefficient(map.column(PlanVariable::Shortage, 1)), 1.0);
    }

    #[test]
    fn capacity_rows_couple_to_workforce() {
        let problem = plan(&[("Ene", 1600.0)]);
        let map = VariableMap::new(1);
        let ot = map.column(PlanVariable::OvertimeProduction, 0);
        let w = map.column(PlanVariable::Workforce, 0);

        let model = ModelBuilder::new().build(&problem);
        let regular = row(&model, "regular_capacity[Ene]");
        assert_eq!(regular.constraint_type, ConstraintType::LessThanOrEqual);
        assert_eq!(regular.coefficient(w), -40.0);
        assert_eq!(regular.coefficient(ot), 0.0);
        assert_eq!(row(&model, "overtime_capacity[Ene]").coefficient(w), -10.0);

        let augmented = ModelBuilder::new()
            .with_capacity_rule(CapacityRule::OvertimeAugmented)
            .build(&problem);
        assert_eq!(
            row(&augmented, "regular_capacity[Ene]").coefficient(ot),
            -0.25
        );
    }

    #[test]
    fn terminal_rows_target_last_period() {
        let model = ModelBuilder::new().build(&plan(&[("Ene", 1.0), ("Feb", 2.0), ("Mar", 3.0)]));
        let map = model.variables;

        let inventory = row(&model, "final_inventory");
        assert_eq!(inventory.constraint_type, ConstraintType::GreaterThanOrEqual);
        assert_eq!(inventory.bound, 500.0);
        assert_eq!(inventory.coefficient(map.column(PlanVariable::Inventory, 2)), 1.0);

        let shortage = row(&model, "final_shortage");
        assert_eq!(shortage.constraint_type, ConstraintType::Equal);
        assert_eq!(shortage.coefficient(map.column(PlanVariable::Shortage, 2)), 1.0);
        assert_eq!(shortage.coefficient(map.column(PlanVariable::Shortage, 1)), 0.0);
    }

    #[test]
    fn long_horizons_stay_sparse() {
        let periods: Vec<(String, f64)> = (1..=1500).map(|p| (p.to_string(), 100.0)).collect();
        let periods: Vec<(&str, f64)> = periods.iter().map(|(p, d)| (p.as_str(), *d)).collect();
        let model = ModelBuilder::new().build(&plan(&periods));
        let lp = &model.problem;

        assert_eq!(lp.constraints.len(), 4 * 1500 + 2);
        // 14 terms per period, 3 fewer in the first, plus the two terminal rows
        assert_eq!(lp.num_nonzeros(), 14 * 1500 - 3 + 2);
        assert!(lp
            .constraints
            .iter()
            .all(|c| c.max_column().is_some_and(|col| col < lp.num_variables())));
    }

    #[test]
    fn construction_is_deterministic() {
        let problem = plan(&[("Ene", 1600.0), ("Feb", 3000.0)]);
        let a = ModelBuilder::new().build(&problem);
        let b = ModelBuilder::new().build(&problem);
        assert_eq!(a.problem.objective.coefficients, b.problem.objective.coefficients);
        for (x, y) in a.problem.constraints.iter().zip(&b.problem.constraints) {
            assert_eq!(x.name, y.name);
            assert_eq!(x.terms, y.terms);
            assert_eq!(x.bound, y.bound);
        }
    }
}
