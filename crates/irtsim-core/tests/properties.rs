//! Property-based tests for the response model and the adaptive loop.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use irtsim_core::adaptive::{run_adaptive_test, NoopReporter};
use irtsim_core::generator::{generate, GeneratorConfig};
use irtsim_core::model::{Item, ItemPool, ModelKind};
use irtsim_core::probability::{information, probability};

/// Strategy: a valid (b, a, c) triple.
fn item_params() -> impl Strategy<Value = (f64, f64, f64)> {
    (-4.0f64..4.0, 0.2f64..3.0, 0.0f64..0.5)
}

fn model_kind() -> impl Strategy<Value = ModelKind> {
    prop_oneof![
        Just(ModelKind::OnePL),
        Just(ModelKind::TwoPL),
        Just(ModelKind::ThreePL),
    ]
}

proptest! {
    // 1. Probability stays between the guessing floor and one
    #[test]
    fn probability_bounded(theta in -50.0f64..50.0, (b, a, c) in item_params()) {
        let p = probability(theta, b, a, c);
        prop_assert!(p >= c && p <= 1.0 + 1e-12, "p={p} c={c}");
    }

    // 2. Probability strictly increases with ability on a moderate range
    #[test]
    fn probability_increasing(
        theta in -3.0f64..3.0,
        delta in 0.01f64..2.0,
        b in -3.0f64..3.0,
        a in 0.2f64..3.0,
        c in 0.0f64..0.5,
    ) {
        let lo = probability(theta, b, a, c);
        let hi = probability(theta + delta, b, a, c);
        prop_assert!(hi > lo, "p({theta})={lo} p({})={hi}", theta + delta);
    }

    // 3. Midpoint property at θ = b
    #[test]
    fn probability_midpoint((b, a, c) in item_params()) {
        let p = probability(b, b, a, c);
        prop_assert!((p - (c + (1.0 - c) / 2.0)).abs() < 1e-12);
    }

    // 4. Information is finite and non-negative everywhere
    #[test]
    fn information_non_negative(theta in -1e4f64..1e4, (b, a, c) in item_params()) {
        let info = information(theta, b, a, c);
        prop_assert!(info.is_finite());
        prop_assert!(info >= 0.0);
    }

    // 5. Generation is shaped, binary and reproducible
    #[test]
    fn generation_shape_and_determinism(
        n_students in 1usize..40,
        n_items in 1usize..15,
        model in model_kind(),
        seed in any::<u64>(),
    ) {
        let config = GeneratorConfig { n_students, n_items, model, seed };
        let a = generate(&config).unwrap();
        let b = generate(&config).unwrap();
        prop_assert_eq!(a.responses.shape(), (n_students, n_items));
        prop_assert!(a.responses.responses().all(|r| r.outcome <= 1));
        prop_assert_eq!(&a, &b);
        if model == ModelKind::OnePL {
            prop_assert!(a.items.iter().all(|i| i.discrimination() == 1.0 && i.guessing() == 0.0));
        }
    }

    // 6. Adaptive sessions never repeat an item and always run to length
    #[test]
    fn adaptive_items_distinct(
        pool_size in 1usize..30,
        fraction in 0.0f64..1.0,
        true_ability in -3.0f64..3.0,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pool = ItemPool::demonstration(pool_size, &mut rng).unwrap();
        let max_items = 1 + ((pool_size - 1) as f64 * fraction) as usize;
        let result = run_adaptive_test(&pool, true_ability, max_items, &mut rng, &NoopReporter).unwrap();

        let ids: HashSet<usize> = result.administered_ids().into_iter().collect();
        prop_assert_eq!(ids.len(), max_items);
        prop_assert_eq!(result.history.len(), max_items);
        prop_assert_eq!(result.trajectory.len(), max_items + 1);
        prop_assert_eq!(result.trajectory[0], 0.0);
    }

    // 7. Item construction accepts exactly the valid parameter region
    #[test]
    fn item_validation_region(a in -2.0f64..3.0, c in -0.5f64..1.5) {
        let ok = Item::new(1, 0.0, a, c).is_ok();
        prop_assert_eq!(ok, a > 0.0 && (0.0..1.0).contains(&c));
    }
}
