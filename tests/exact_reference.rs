//! Exact engine reference tests: boundary cases, brute-force enumeration, binomial oracle,
//! and order/monotonicity properties.

use approx::assert_relative_eq;
use poibin::engines::analytic::{cdf_less_than, exact_probability, pmf};
use poibin::math::probability::success_probabilities;
use proptest::prelude::*;
use statrs::distribution::{Binomial, DiscreteCDF};

const DRAFT_PARAMETERS: [i64; 17] = [
    4667, 4400, 4000, 4000, 1304, 2128, 3103, 5217, 1111, 2333, 857, 857, 1400, 10000, 2500,
    3333, 1250,
];

/// `P(S < L)` for `DRAFT_PARAMETERS`, indexed by `L`.
const DRAFT_REFERENCE: [(i64, f64); 8] = [
    (1, 4.125640574497466e-11),
    (5, 2.3128239141523234e-05),
    (9, 0.029692491547515215),
    (11, 0.221391927117553),
    (13, 0.6611053425333805),
    (14, 0.8540000479147398),
    (15, 0.9599216062003525),
    (16, 0.994803791964604),
];

fn brute_force_less_than(q: &[f64], limit: i64) -> f64 {
    (0_u32..(1 << q.len()))
        .filter(|mask| (mask.count_ones() as i64) < limit)
        .map(|mask| {
            q.iter()
                .enumerate()
                .map(|(i, &qi)| if mask & (1 << i) != 0 { qi } else { 1.0 - qi })
                .product::<f64>()
        })
        .sum()
}

#[test]
fn draft_scenario_matches_reference_values() {
    for (limit, expected) in DRAFT_REFERENCE {
        let got = exact_probability(&DRAFT_PARAMETERS, limit).unwrap();
        assert_relative_eq!(got, expected, max_relative = 1e-12);
    }
}

#[test]
fn draft_scenario_boundaries_are_exact() {
    assert_eq!(exact_probability(&DRAFT_PARAMETERS, 0).unwrap(), 0.0);
    assert_eq!(exact_probability(&DRAFT_PARAMETERS, -3).unwrap(), 0.0);
    assert_eq!(exact_probability(&DRAFT_PARAMETERS, 18).unwrap(), 1.0);
    // p = 10000 never succeeds, so S <= 16 < 17 surely; rounding must not leave [0, 1].
    assert_eq!(exact_probability(&DRAFT_PARAMETERS, 17).unwrap(), 1.0);
}

#[test]
fn matches_enumeration_for_fifteen_trials() {
    let q = success_probabilities(&DRAFT_PARAMETERS[..15]);
    for limit in 0..=16 {
        let exact = cdf_less_than(&q, limit);
        let brute = brute_force_less_than(&q, limit);
        assert!((exact - brute).abs() <= 1e-9, "limit={limit} exact={exact} brute={brute}");
    }
}

#[test]
fn equal_probabilities_reduce_to_the_binomial() {
    let n = 40_u64;
    let parameters = vec![3_000_i64; n as usize];
    let q = success_probabilities(&parameters);
    let binomial = Binomial::new(q[0], n).unwrap();

    for limit in 1..=(n as i64) {
        let exact = exact_probability(&parameters, limit).unwrap();
        let oracle = binomial.cdf((limit - 1) as u64);
        assert!((exact - oracle).abs() <= 1e-10, "limit={limit} exact={exact} oracle={oracle}");
    }
}

#[test]
fn zero_success_probabilities_concentrate_at_zero() {
    let parameters = [10_000_i64; 9];
    assert_eq!(exact_probability(&parameters, 0).unwrap(), 0.0);
    for limit in 1..=12 {
        assert_eq!(exact_probability(&parameters, limit).unwrap(), 1.0);
    }
}

#[test]
fn certain_successes_concentrate_at_n() {
    let q = [1.0_f64; 9];
    for limit in -1..=12 {
        let expected = if limit > 9 { 1.0 } else { 0.0 };
        assert_eq!(cdf_less_than(&q, limit), expected, "limit={limit}");
    }
}

#[test]
fn lowest_parameter_is_not_a_sure_success() {
    // p = 0 fails when R = 0, so q = 10000 / 10001 rather than 1.
    let parameters = [0_i64; 9];
    let q = 10_000.0 / 10_001.0_f64;
    assert_relative_eq!(
        exact_probability(&parameters, 9).unwrap(),
        1.0 - q.powi(9),
        max_relative = 1e-9
    );
    assert_eq!(exact_probability(&parameters, 10).unwrap(), 1.0);
}

#[test]
fn pmf_of_draft_scenario_reconstructs_every_threshold() {
    let q = success_probabilities(&DRAFT_PARAMETERS);
    let f = pmf(&q);
    let mut running = 0.0;
    for limit in 1..=(q.len() as i64) {
        running += f[(limit - 1) as usize];
        assert_relative_eq!(cdf_less_than(&q, limit), running.min(1.0), epsilon = 1e-12);
    }
}

fn trial_parameters() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0_i64..=10_000, 0..24)
}

proptest! {
    #[test]
    fn result_is_a_probability(parameters in trial_parameters(), limit in -3_i64..30) {
        let p = exact_probability(&parameters, limit).unwrap();
        prop_assert!((0.0..=1.0).contains(&p), "p={}", p);
    }

    #[test]
    fn result_is_non_decreasing_in_the_threshold(parameters in trial_parameters()) {
        let q = success_probabilities(&parameters);
        let mut previous = 0.0;
        for limit in -1..=(q.len() as i64 + 2) {
            let p = cdf_less_than(&q, limit);
            prop_assert!(p >= previous, "limit={} p={} previous={}", limit, p, previous);
            previous = p;
        }
    }

    #[test]
    fn result_ignores_trial_order(
        (original, shuffled) in trial_parameters()
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
        limit in 0_i64..26,
    ) {
        let a = exact_probability(&original, limit).unwrap();
        let b = exact_probability(&shuffled, limit).unwrap();
        prop_assert!((a - b).abs() <= 1e-12, "a={} b={}", a, b);
    }

    #[test]
    fn out_of_range_parameters_are_rejected(bad in prop_oneof![i64::MIN..0, 10_001_i64..i64::MAX]) {
        prop_assert!(exact_probability(&[5_000, bad], 1).is_err());
    }
}
