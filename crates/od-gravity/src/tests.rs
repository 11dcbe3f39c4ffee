//! Unit tests for od-gravity.

use std::sync::Arc;

use od_core::{Matrix, SparseZoneIndex, Vector, Zone, ZoneNumber, ZoneSystem};

use crate::{
    balance_marginals, balance_marginals_grouped, BalancePolicy, GravityBalancer, GravityConfig,
    GravityError, GravityModel, NoProgress, SpatialAggregation,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn index(zones: &[u32]) -> Arc<SparseZoneIndex> {
    Arc::new(SparseZoneIndex::new(zones.iter().map(|&z| ZoneNumber(z))).unwrap())
}

fn vector(idx: &Arc<SparseZoneIndex>, values: &[f32]) -> Vector<f32> {
    Vector::from_flat(idx.clone(), values.to_vec()).unwrap()
}

fn matrix(idx: &Arc<SparseZoneIndex>, values: &[f32]) -> Matrix<f32> {
    Matrix::from_flat(idx.clone(), idx.clone(), values.to_vec()).unwrap()
}

fn close(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

/// Four zones in two planning districts (1: zones 1,2; 2: zones 3,4).
fn two_district_system() -> ZoneSystem {
    ZoneSystem::new(vec![
        Zone::new(1, 1, 1),
        Zone::new(2, 1, 1),
        Zone::new(3, 2, 1),
        Zone::new(4, 2, 1),
    ])
    .unwrap()
}

// ── Marginal balancing ────────────────────────────────────────────────────────

#[cfg(test)]
mod marginals {
    use super::*;

    #[test]
    fn no_balancing_passes_through() {
        let idx = index(&[1, 2]);
        let m = balance_marginals(
            BalancePolicy::NoBalancing,
            &vector(&idx, &[1.0, 2.0]),
            &vector(&idx, &[5.0, 5.0]),
        )
        .unwrap();
        assert_eq!(m.production.as_slice(), &[1.0, 2.0]);
        assert_eq!(m.attraction.as_slice(), &[5.0, 5.0]);
    }

    #[test]
    fn match_to_production_equalizes_totals() {
        let idx = index(&[1, 2, 3]);
        let p = vector(&idx, &[10.0, 20.0, 30.0]);
        let a = vector(&idx, &[5.0, 10.0, 15.0]);
        let m = balance_marginals(BalancePolicy::MatchToProduction, &p, &a).unwrap();
        assert_eq!(m.production.as_slice(), p.as_slice());
        assert!(close(m.attraction.total(), 60.0, 1e-4));
        assert!(close(m.attraction.as_slice()[0], 10.0, 1e-5));
    }

    #[test]
    fn match_to_attraction_scales_production() {
        let idx = index(&[1, 2]);
        let p = vector(&idx, &[1.0, 3.0]);
        let a = vector(&idx, &[6.0, 2.0]);
        let m = balance_marginals(BalancePolicy::MatchToAttraction, &p, &a).unwrap();
        assert_eq!(m.attraction.as_slice(), a.as_slice());
        assert_eq!(m.production.as_slice(), &[2.0, 6.0]);
    }

    #[test]
    fn average_brings_both_to_the_mean_total() {
        let idx = index(&[1, 2]);
        let p = vector(&idx, &[10.0, 30.0]); // 40
        let a = vector(&idx, &[20.0, 60.0]); // 80
        let m = balance_marginals(BalancePolicy::AverageProductionAttraction, &p, &a).unwrap();
        assert!(close(m.production.total(), 60.0, 1e-4));
        assert!(close(m.attraction.total(), 60.0, 1e-4));
        assert!(close(m.production.as_slice()[0], 15.0, 1e-5));
        assert!(close(m.attraction.as_slice()[1], 45.0, 1e-5));
    }

    #[test]
    fn zero_attraction_total_collapses_to_zero() {
        let idx = index(&[1, 2]);
        let p = vector(&idx, &[10.0, 30.0]);
        let a = vector(&idx, &[0.0, 0.0]);
        let m = balance_marginals(BalancePolicy::MatchToProduction, &p, &a).unwrap();
        assert!(m.attraction.as_slice().iter().all(|&v| v == 0.0));
        let m = balance_marginals(BalancePolicy::MatchToAttraction, &p, &a).unwrap();
        assert!(m.production.as_slice().iter().all(|&v| v == 0.0 && !v.is_nan()));
    }

    #[test]
    fn grouped_balancing_is_per_district() {
        let zs = two_district_system();
        let idx = zs.index().clone();
        let p = vector(&idx, &[10.0, 10.0, 5.0, 5.0]);
        let a = vector(&idx, &[1.0, 3.0, 30.0, 10.0]);
        let pd = zs.planning_district_index();
        let m = balance_marginals_grouped(BalancePolicy::MatchToProduction, &p, &a, &pd).unwrap();
        let att = m.attraction.as_slice();
        // District 1: 20 / 4 = ×5; district 2: 10 / 40 = ×0.25.
        assert!(close(att[0], 5.0, 1e-5));
        assert!(close(att[1], 15.0, 1e-5));
        assert!(close(att[2], 7.5, 1e-5));
        assert!(close(att[3], 2.5, 1e-5));
    }

    #[test]
    fn grouping_over_other_zones_rejected() {
        let idx = index(&[1, 2, 3]);
        let p = vector(&idx, &[1.0, 1.0, 1.0]);
        let pd = two_district_system().planning_district_index();
        assert!(matches!(
            balance_marginals_grouped(BalancePolicy::MatchToProduction, &p, &p, &pd),
            Err(GravityError::Core(od_core::OdError::DimensionMismatch { expected: 4, got: 3, .. }))
        ));
    }

    #[test]
    fn mismatched_vectors_rejected() {
        let p = vector(&index(&[1, 2]), &[1.0, 1.0]);
        let a = vector(&index(&[1, 2, 3]), &[1.0, 1.0, 1.0]);
        assert!(matches!(
            balance_marginals(BalancePolicy::MatchToProduction, &p, &a),
            Err(GravityError::Core(od_core::OdError::DimensionMismatch { .. }))
        ));
        let other = vector(&index(&[1, 5]), &[1.0, 1.0]);
        assert!(matches!(
            balance_marginals(BalancePolicy::MatchToProduction, &p, &other),
            Err(GravityError::Core(od_core::OdError::IndexMismatch { .. }))
        ));
    }
}

// ── Gravity balancer ──────────────────────────────────────────────────────────

#[cfg(test)]
mod balancer {
    use super::*;

    #[test]
    fn uniform_friction_three_zones() {
        let idx = index(&[1, 2, 3]);
        let friction = matrix(&idx, &[1.0; 9]);
        let p = vector(&idx, &[10.0, 20.0, 30.0]);
        let a = vector(&idx, &[20.0, 20.0, 20.0]);

        let dist = GravityBalancer::new(0.01, 100)
            .unwrap()
            .balance(&friction, &p, &a, &mut NoProgress)
            .unwrap();

        assert!(dist.report.converged);
        let rows = dist.flows.row_sums();
        for (r, target) in rows.iter().zip([10.0, 20.0, 30.0]) {
            assert!(close(*r, target, 1e-4), "row {r} vs {target}");
        }
        for c in dist.flows.column_sums() {
            assert!(close(c, 20.0, 0.2 + 1e-4), "column {c}");
        }
        assert!(dist.flows.as_slice().iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn asymmetric_friction_converges() {
        let idx = index(&[1, 2, 3]);
        let friction = matrix(&idx, &[1.0, 2.0, 3.0, 4.0, 1.0, 2.0, 1.0, 1.0, 5.0]);
        let p = vector(&idx, &[10.0, 20.0, 30.0]);
        let a = vector(&idx, &[25.0, 15.0, 20.0]);
        let max_error = 0.001;

        let dist = GravityBalancer::new(max_error, 1000)
            .unwrap()
            .balance(&friction, &p, &a, &mut NoProgress)
            .unwrap();

        assert!(dist.report.converged);
        assert!(dist.report.max_deviation <= max_error);
        for (r, target) in dist.flows.row_sums().iter().zip(p.as_slice()) {
            assert!(close(*r, *target, 1e-3));
        }
        for (c, target) in dist.flows.column_sums().iter().zip(a.as_slice()) {
            assert!(close(*c, *target, 2.0 * max_error * target), "column {c} vs {target}");
        }
    }

    #[test]
    fn iteration_cap_is_not_an_error() {
        let idx = index(&[1, 2, 3]);
        let friction = matrix(&idx, &[1.0, 2.0, 3.0, 4.0, 1.0, 2.0, 1.0, 1.0, 5.0]);
        let p = vector(&idx, &[10.0, 20.0, 30.0]);
        let a = vector(&idx, &[25.0, 15.0, 20.0]);

        let dist = GravityBalancer::new(1e-6, 1)
            .unwrap()
            .balance(&friction, &p, &a, &mut NoProgress)
            .unwrap();

        assert!(!dist.report.converged);
        assert_eq!(dist.report.iterations, 1);
        assert!(dist.report.max_deviation > 1e-6);
        for (r, target) in dist.flows.row_sums().iter().zip(p.as_slice()) {
            assert!(close(*r, *target, 1e-3));
        }
    }

    #[test]
    fn zero_marginals_give_zero_flows_not_nan() {
        let idx = index(&[1, 2, 3]);
        let friction = matrix(&idx, &[1.0; 9]);
        let p = vector(&idx, &[0.0, 10.0, 10.0]);
        let a = vector(&idx, &[10.0, 0.0, 10.0]);

        let dist = GravityBalancer::new(0.01, 50)
            .unwrap()
            .balance(&friction, &p, &a, &mut NoProgress)
            .unwrap();

        assert!(dist.flows.as_slice().iter().all(|v| !v.is_nan()));
        assert!(dist.flows.row(0).iter().all(|&v| v == 0.0));
        assert!((0..3).all(|o| *dist.flows.at(o, 1) == 0.0));
        assert!(close(*dist.flows.at(1, 0), 5.0, 1e-5));
    }

    #[test]
    fn progress_runs_from_zero_to_one() {
        let idx = index(&[1, 2, 3]);
        let friction = matrix(&idx, &[1.0, 2.0, 3.0, 4.0, 1.0, 2.0, 1.0, 1.0, 5.0]);
        let p = vector(&idx, &[10.0, 20.0, 30.0]);
        let a = vector(&idx, &[25.0, 15.0, 20.0]);

        let mut seen = Vec::new();
        GravityBalancer::new(1e-6, 4)
            .unwrap()
            .balance(&friction, &p, &a, &mut |x: f32| seen.push(x))
            .unwrap();

        assert_eq!(seen, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn dimension_mismatch_rejected_before_solving() {
        let idx = index(&[1, 2, 3]);
        let friction = matrix(&idx, &[1.0; 9]);
        let short = vector(&index(&[1, 2]), &[1.0, 1.0]);
        let ok = vector(&idx, &[1.0, 1.0, 1.0]);
        let b = GravityBalancer::new(0.05, 10).unwrap();

        assert!(matches!(
            b.balance(&friction, &short, &ok, &mut NoProgress),
            Err(GravityError::Core(od_core::OdError::DimensionMismatch { what: "production", .. }))
        ));
        assert!(matches!(
            b.balance(&friction, &ok, &short, &mut NoProgress),
            Err(GravityError::Core(od_core::OdError::DimensionMismatch { what: "attraction", .. }))
        ));
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(matches!(GravityBalancer::new(0.05, 0), Err(GravityError::Config(_))));
        assert!(matches!(GravityBalancer::new(f32::NAN, 10), Err(GravityError::Config(_))));
        assert!(matches!(GravityBalancer::new(-0.1, 10), Err(GravityError::Config(_))));
    }
}

// ── GravityModel ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod model {
    use super::*;

    #[test]
    fn balances_then_distributes() {
        let idx = index(&[1, 2, 3]);
        let friction = matrix(&idx, &[1.0, 0.5, 0.25, 0.5, 1.0, 0.5, 0.25, 0.5, 1.0]);
        let p = vector(&idx, &[10.0, 20.0, 30.0]);
        let a = vector(&idx, &[10.0, 10.0, 10.0]); // half of production

        let model = GravityModel::new(GravityConfig {
            max_error: 0.001,
            max_iterations: 500,
            ..GravityConfig::default()
        })
        .unwrap();
        let dist = model.distribute(&friction, &p, &a, None, &mut NoProgress).unwrap();

        assert!(dist.report.converged);
        assert!(close(dist.flows.total() as f32, 60.0, 1e-3));
        for c in dist.flows.column_sums() {
            assert!(close(c, 20.0, 0.05), "column {c}");
        }
    }

    #[test]
    fn district_scope_needs_a_zone_system() {
        let idx = index(&[1, 2]);
        let model = GravityModel::new(GravityConfig {
            spatial: SpatialAggregation::PlanningDistrict,
            ..GravityConfig::default()
        })
        .unwrap();
        let err = model
            .balance(&vector(&idx, &[1.0, 1.0]), &vector(&idx, &[1.0, 1.0]), None)
            .unwrap_err();
        assert!(matches!(err, GravityError::Config(_)));
    }

    #[test]
    fn region_scope_uses_the_zone_system() {
        let zs = two_district_system();
        let idx = zs.index().clone();
        let model = GravityModel::new(GravityConfig {
            balance: BalancePolicy::AverageProductionAttraction,
            spatial: SpatialAggregation::Region,
            ..GravityConfig::default()
        })
        .unwrap();
        let m = model
            .balance(&vector(&idx, &[1.0, 1.0, 1.0, 1.0]), &vector(&idx, &[3.0, 3.0, 3.0, 3.0]), Some(&zs))
            .unwrap();
        // Single region: both totals move to (4 + 12) / 2 = 8.
        assert!(close(m.production.total(), 8.0, 1e-5));
        assert!(close(m.attraction.total(), 8.0, 1e-5));
    }
}
