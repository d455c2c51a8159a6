#![allow(dead_code)]

use aggplan::{PeriodId, PlanReport, RawPlanRequest};
use indexmap::IndexMap;

pub const TOLERANCE: f64 = 1e-4;

pub fn costs() -> IndexMap<String, f64> {
    [
        ("tiempo_regular", 640.0),
        ("tiempo_extra", 6.0),
        ("contratacion", 300.0),
        ("despido", 500.0),
        ("inventario", 2.0),
        ("faltante", 5.0),
        ("materiales", 10.0),
        ("subcontratacion", 30.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

pub fn request(demand: &[(&str, f64)]) -> RawPlanRequest {
    RawPlanRequest {
        periods: demand.iter().map(|(p, _)| PeriodId::from(*p)).collect(),
        initial_workforce: 0.0,
        initial_inventory: 0.0,
        initial_backlog: 0.0,
        regular_rate: 40.0,
        overtime_rate: 0.25,
        overtime_capacity_ratio: 10.0,
        demand: demand.iter().map(|(p, d)| (p.to_string(), *d)).collect(),
        costs: costs(),
        min_final_inventory: 0.0,
    }
}

/// Six-month horizon with a growing then falling demand curve
pub fn seasonal_request() -> RawPlanRequest {
    RawPlanRequest {
        initial_workforce: 80.0,
        initial_inventory: 1000.0,
        min_final_inventory: 500.0,
        ..request(&[
            ("Ene", 1600.0),
            ("Feb", 3000.0),
            ("Mar", 3200.0),
            ("Abr", 3800.0),
            ("May", 2200.0),
            ("Jun", 2200.0),
        ])
    }
}

/// Several years of the seasonal curve, month keys "M1", "M2", ...
pub fn long_seasonal_request(months: usize) -> RawPlanRequest {
    let curve = [1600.0, 3000.0, 3200.0, 3800.0, 2200.0, 2200.0];
    let periods: Vec<(String, f64)> = (0..months)
        .map(|m| (format!("M{}", m + 1), curve[m % curve.len()] + (m % 7) as f64 * 35.0))
        .collect();
    let borrowed: Vec<(&str, f64)> = periods.iter().map(|(p, d)| (p.as_str(), *d)).collect();
    RawPlanRequest {
        initial_workforce: 80.0,
        initial_inventory: 1000.0,
        min_final_inventory: 500.0,
        ..request(&borrowed)
    }
}

fn value(
    report: &PlanReport,
    period: &str,
    f: impl Fn(&aggplan::PeriodDetail) -> Option<f64>,
) -> f64 {
    f(report.period(period).expect("period present")).expect("value present")
}

/// Check the continuity, capacity and terminal laws of an optimal plan
pub fn assert_plan_laws(request: &RawPlanRequest, report: &PlanReport) {
    assert!(report.is_optimal(), "expected optimal plan, got {}", report.status);

    let mut prev_workforce = request.initial_workforce;
    let mut prev_inventory = request.initial_inventory;
    let mut prev_shortage = request.initial_backlog;

    for period in &request.periods {
        let key = period.key();
        let w = value(report, &key, |d| d.workforce);
        let h = value(report, &key, |d| d.hires);
        let l = value(report, &key, |d| d.layoffs);
        let p = value(report, &key, |d| d.regular_production);
        let ot = value(report, &key, |d| d.overtime_production);
        let c = value(report, &key, |d| d.subcontracted);
        let i = value(report, &key, |d| d.inventory);
        let s = value(report, &key, |d| d.shortage);
        let demand = request.demand[&key];

        assert!(
            (w - prev_workforce - (h - l)).abs() < TOLERANCE,
            "workforce continuity broken in {key}"
        );
        assert!(
            (prev_inventory + p + c - (demand + prev_shortage + i - s)).abs() < TOLERANCE,
            "material balance broken in {key}"
        );
        assert!(p <= request.regular_rate * w + TOLERANCE, "regular capacity exceeded in {key}");
        assert!(
            ot <= request.overtime_capacity_ratio * w + TOLERANCE,
            "overtime capacity exceeded in {key}"
        );
        let values = [
            ("W", w),
            ("H", h),
            ("L", l),
            ("P", p),
            ("OT", ot),
            ("SUB", c),
            ("I", i),
            ("S", s),
        ];
        for (name, v) in values {
            assert!(v >= -TOLERANCE, "{name} negative in {key}: {v}");
        }
        assert_eq!(h, h.round(), "fractional hires in {key}");
        assert_eq!(l, l.round(), "fractional layoffs in {key}");

        prev_workforce = w;
        prev_inventory = i;
        prev_shortage = s;
    }

    assert!(prev_shortage.abs() < TOLERANCE, "shortage left at horizon end");
    assert!(
        prev_inventory >= request.min_final_inventory - TOLERANCE,
        "final inventory below floor"
    );
}
