//! Cross-model checks of the closed-form results.

use qsim_core::validate::validate_probability_sum;
use qsim_core::ParameterError;
use qsim_models::{
    md1, mm1, mm1k, mmc, mmck, AnalyticalResult, QueueModel, MD1, MM1, MM1K, MMC, MMCK,
    UNSTABLE_WARNING,
};

const LITTLE_TOLERANCE: f64 = 2e-3;

fn assert_littles_law(result: &AnalyticalResult, lambda: f64) {
    assert!(
        (result.l - lambda * result.w).abs() < LITTLE_TOLERANCE,
        "L = {} but λW = {}",
        result.l,
        lambda * result.w
    );
    assert!(
        (result.lq - lambda * result.wq).abs() < LITTLE_TOLERANCE,
        "Lq = {} but λWq = {}",
        result.lq,
        lambda * result.wq
    );
}

#[test]
fn mm1_reference_values() {
    let result = mm1::analytical_results(&MM1 { lambda: 2.0, mu: 3.0 }).unwrap();
    assert!(result.stable);
    assert_eq!(result.rho, 0.6667);
    assert_eq!(result.l, 2.0);
    assert_eq!(result.lq, 1.3333);
    assert_eq!(result.w, 1.0);
    assert_eq!(result.wq, 0.6667);
    assert!(result.warning.is_none());
}

#[test]
fn mm1_unstable_reference() {
    let result = mm1::analytical_results(&MM1 { lambda: 5.0, mu: 3.0 }).unwrap();
    assert!(!result.stable);
    for metric in [result.l, result.lq, result.w, result.wq] {
        assert_eq!(metric, f64::INFINITY);
    }
    assert_eq!(result.warning.as_deref(), Some(UNSTABLE_WARNING));
    assert!(result.probabilities.is_empty());
}

#[test]
fn mm1_closed_forms_over_a_grid() {
    for lambda in [0.1, 0.5, 1.0, 2.5, 4.9] {
        for mu in [0.5, 1.0, 3.0, 5.0, 10.0] {
            let rho: f64 = lambda / mu;
            let result = mm1::analytical_results(&MM1 { lambda, mu }).unwrap();
            if rho >= 1.0 {
                assert!(!result.stable);
                continue;
            }
            assert!((result.l - rho / (1.0 - rho)).abs() <= 1e-4);
            assert!((result.lq - rho * rho / (1.0 - rho)).abs() <= 1e-4);
            assert!((result.w - 1.0 / (mu - lambda)).abs() <= 1e-4);
            assert!((result.wq - rho / (mu - lambda)).abs() <= 1e-4);
            assert_littles_law(&result, lambda);
        }
    }
}

#[test]
fn infinite_models_satisfy_littles_law() {
    for (lambda, mu, servers) in [(1.0, 2.0, 1), (5.0, 2.0, 3), (9.0, 1.0, 10), (0.3, 0.2, 2)] {
        let result = mmc::analytical_results(&MMC { lambda, mu, servers }).unwrap();
        assert!(result.stable);
        assert_littles_law(&result, lambda);
    }
    for (lambda, service_time) in [(0.5, 1.0), (2.0, 0.3), (0.9, 1.0)] {
        let result = md1::analytical_results(&MD1 { lambda, service_time }).unwrap();
        assert_littles_law(&result, lambda);
    }
}

#[test]
fn finite_models_satisfy_littles_law_with_effective_rate() {
    for (lambda, mu, servers, capacity) in [(1.0, 2.0, 1, 4), (4.0, 1.0, 3, 10), (6.0, 2.0, 2, 3)] {
        let result = mmck::analytical_results(&MMCK { lambda, mu, servers, capacity }).unwrap();
        let lambda_eff = lambda * (1.0 - result.probability(capacity).unwrap());
        assert_littles_law(&result, lambda_eff);
    }
}

#[test]
fn finite_distributions_sum_to_one() {
    let loads = [0.05, 0.5, 0.999, 1.0, 1.0 + 1e-12, 1.5, 4.0, 20.0];
    for rho in loads {
        for capacity in [0, 1, 2, 5, 10, 50, 200] {
            let mm1k = mm1k::analytical_results(&MM1K { lambda: rho, mu: 1.0, capacity }).unwrap();
            assert_eq!(mm1k.probabilities.len(), capacity + 1);
            assert!(
                (mm1k.probability_mass() - 1.0).abs() <= 1e-9,
                "M/M/1/K rho={rho} K={capacity}: mass {}",
                mm1k.probability_mass()
            );

            for servers in [1, 2, 7] {
                let params = MMCK { lambda: rho * servers as f64, mu: 1.0, servers, capacity };
                let mmck = mmck::analytical_results(&params).unwrap();
                assert_eq!(mmck.probabilities.len(), capacity + 1);
                assert!(
                    (mmck.probability_mass() - 1.0).abs() <= 1e-9,
                    "M/M/c/K rho={rho} c={servers} K={capacity}: mass {}",
                    mmck.probability_mass()
                );
                assert!(mmck.stable);
                validate_probability_sum(
                    "probabilities",
                    mmck.probabilities.iter().map(|p| p.probability),
                    1e-9,
                )
                .unwrap();
            }
        }
    }
}

#[test]
fn probabilities_are_indexed_by_state() {
    let result = mmc::analytical_results(&MMC { lambda: 3.0, mu: 2.0, servers: 2 }).unwrap();
    for (i, point) in result.probabilities.iter().enumerate() {
        assert_eq!(point.n, i);
        assert!(point.probability >= 0.0);
    }
    // Infinite-capacity lists are truncated at n = 20
    assert!(result.probability_mass() < 1.0);
}

#[test]
fn invalid_parameters_are_rejected() {
    let err = mm1::analytical_results(&MM1 { lambda: -1.0, mu: 1.0 }).unwrap_err();
    assert_eq!(err.field(), "lambda");
    let err = mmc::analytical_results(&MMC { lambda: 1.0, mu: f64::NAN, servers: 2 }).unwrap_err();
    assert_eq!(err.field(), "mu");
    let err = mmck::analytical_results(&MMCK { lambda: 1.0, mu: 1.0, servers: 0, capacity: 3 }).unwrap_err();
    assert!(matches!(err, ParameterError::ConstraintViolation { field: "servers", .. }));
    let err = md1::analytical_results(&MD1 { lambda: 1.0, service_time: f64::INFINITY }).unwrap_err();
    assert_eq!(err.field(), "service_time");
}

#[test]
fn results_serialize_with_conventional_names() {
    let result = mm1k::analytical_results(&MM1K { lambda: 2.0, mu: 3.0, capacity: 3 }).unwrap();
    let value = serde_json::to_value(&result).unwrap();
    for key in ["rho", "stable", "L", "Lq", "W", "Wq", "rejectionProb", "probabilities"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert!(value.get("warning").is_none());
    assert!(value.get("erlangFactor").is_none());
    assert_eq!(value["probabilities"][2]["n"], 2);

    let mmc = mmc::analytical_results(&MMC { lambda: 3.0, mu: 2.0, servers: 2 }).unwrap();
    let value = serde_json::to_value(&mmc).unwrap();
    assert!(value.get("erlangFactor").is_some());

    let unstable = mm1::analytical_results(&MM1 { lambda: 5.0, mu: 3.0 }).unwrap();
    let value = serde_json::to_value(&unstable).unwrap();
    assert!(value["L"].is_null());
    assert_eq!(value["warning"], UNSTABLE_WARNING);
}

#[test]
fn parameters_deserialize_from_json() {
    let params: MMCK =
        serde_json::from_str(r#"{"lambda": 4.0, "mu": 1.5, "servers": 3, "capacity": 8}"#).unwrap();
    assert_eq!(params.servers, 3);
    let via_trait = params.analytical_results().unwrap();
    assert_eq!(via_trait, mmck::analytical_results(&params).unwrap());

    let params: MD1 = serde_json::from_str(r#"{"lambda": 0.5, "service_time": 1.2}"#).unwrap();
    assert_eq!(params.name(), "M/D/1");
}
