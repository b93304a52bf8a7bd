use super::*;
use crate::random::create_rng;
use crate::sa::{AnnealingConfig, SaProblem};
use proptest::prelude::*;

fn device_strategy() -> impl Strategy<Value = DeviceState> {
    (0.0f64..3000.0, any::<bool>(), any::<bool>()).prop_map(|(power, state, usable)| {
        DeviceState::new(format!("dev-{}", power as u32), power, state, usable)
    })
}

fn devices_strategy() -> impl Strategy<Value = Vec<DeviceState>> {
    prop::collection::vec(device_strategy(), 1..8)
}

fn context_strategy() -> impl Strategy<Value = TariffContext> {
    (-5000.0f64..5000.0, 0.0f64..6000.0, 1.0f64..40.0, 0.0f64..30.0, 0.0f64..100.0).prop_map(
        |(net_consumption, solar_production, buy_cost, sell_cost, sell_tax_percent)| {
            TariffContext {
                net_consumption,
                solar_production,
                buy_cost,
                sell_cost,
                sell_tax_percent,
            }
        },
    )
}

fn short_config(seed: u64) -> AnnealingConfig {
    AnnealingConfig::default()
        .with_max_iterations(300)
        .with_seed(seed)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn total_power_sums_active_devices(devices in devices_strategy()) {
        let expected: f64 = devices.iter().filter(|d| d.state).map(|d| d.power_max).sum();
        prop_assert!((total_power(&devices) - expected).abs() < 1e-9);

        let (assignment, baseline) = initial_solution(&devices);
        prop_assert!((assignment.total_power(&devices) - expected).abs() < 1e-9);
        prop_assert!((baseline - expected).abs() < 1e-9);
    }

    #[test]
    fn neighbors_never_touch_fixed_devices(
        devices in devices_strategy(),
        context in context_strategy(),
        seed in any::<u64>(),
    ) {
        prop_assume!(devices.iter().any(|d| d.is_usable));
        let problem = DeviceProblem::new(&devices, &context).unwrap();

        let mut rng = create_rng(seed);
        let mut current = problem.initial_solution(&mut rng);
        for _ in 0..50 {
            current = problem.neighbor(&current, &mut rng).unwrap();
            for (i, device) in devices.iter().enumerate() {
                if !device.is_usable {
                    prop_assert_eq!(current.is_on(i), device.state);
                }
            }
        }
    }

    #[test]
    fn solve_keeps_fixed_devices(
        devices in devices_strategy(),
        context in context_strategy(),
        seed in any::<u64>(),
    ) {
        prop_assume!(devices.iter().any(|d| d.is_usable));
        let solver = Solver::new(short_config(seed)).unwrap();
        let result = solver.optimize(&devices, &context, &mut create_rng(seed), None).unwrap();

        prop_assert_eq!(result.solution.len(), devices.len());
        for (before, after) in devices.iter().zip(&result.solution.devices) {
            prop_assert_eq!(&before.name, &after.name);
            if !before.is_usable {
                prop_assert_eq!(before.state, after.state);
            }
        }
    }

    #[test]
    fn import_and_export_are_exclusive(
        context in context_strategy(),
        total in 0.0f64..10000.0,
        baseline in 0.0f64..10000.0,
    ) {
        let weights = context.weights().unwrap();
        let balance = weights.balance(total, baseline);
        prop_assert!(balance.grid_import == 0.0 || balance.grid_export == 0.0);
        prop_assert!(balance.grid_import >= 0.0 && balance.grid_export >= 0.0);
    }

    #[test]
    fn objective_non_decreasing_in_import(
        context in context_strategy(),
        extra in 0.0f64..5000.0,
        step in 0.0f64..1000.0,
    ) {
        // Start at or above the import threshold, then add more load.
        let weights = context.weights().unwrap();
        prop_assume!(weights.import_weight > 0.0);
        let base = -context.net_consumption + extra;
        let a = weights.evaluate(base, 0.0);
        let b = weights.evaluate(base + step, 0.0);
        prop_assert!(b + 1e-9 >= a);
    }

    #[test]
    fn objective_non_decreasing_in_export(
        context in context_strategy(),
        shed in 0.0f64..1000.0,
    ) {
        // Shedding load below the export threshold only grows the surplus.
        let weights = context.weights().unwrap();
        prop_assume!(weights.export_weight > 0.0);
        let threshold = -context.net_consumption;
        let a = weights.evaluate(threshold, 0.0);
        let b = weights.evaluate(threshold - shed, 0.0);
        prop_assert!(b + 1e-9 >= a);
    }

    #[test]
    fn best_never_regresses(
        devices in devices_strategy(),
        context in context_strategy(),
        seed in any::<u64>(),
    ) {
        prop_assume!(devices.iter().any(|d| d.is_usable));
        let solver = Solver::new(short_config(seed)).unwrap();
        let result = solver.optimize(&devices, &context, &mut create_rng(seed), None).unwrap();

        let initial = objective(&devices, result.baseline_power, &context).unwrap();
        prop_assert!(result.objective <= initial + 1e-9);
        for window in result.stats.cost_history.windows(2) {
            prop_assert!(window[1] <= window[0] + 1e-9);
        }
        prop_assert!(result.stats.iterations <= 300);
    }

    #[test]
    fn temperature_follows_geometric_schedule(
        devices in devices_strategy(),
        context in context_strategy(),
        seed in any::<u64>(),
    ) {
        prop_assume!(devices.iter().any(|d| d.is_usable));
        let config = short_config(seed);
        let solver = Solver::new(config.clone()).unwrap();
        let result = solver.optimize(&devices, &context, &mut create_rng(seed), None).unwrap();

        let expected = config.initial_temperature
            * config.cooling_factor.powi(result.stats.iterations as i32);
        prop_assert!((result.stats.final_temperature - expected).abs() < 1e-6);
        prop_assert_eq!(result.stats.iterations, config.cooling_steps());
    }

    #[test]
    fn seeded_solve_is_bit_reproducible(
        devices in devices_strategy(),
        context in context_strategy(),
        seed in any::<u64>(),
    ) {
        prop_assume!(devices.iter().any(|d| d.is_usable));
        let solver = Solver::new(short_config(seed)).unwrap();
        let a = solver.optimize(&devices, &context, &mut create_rng(seed), None).unwrap();
        let b = solver.optimize(&devices, &context, &mut create_rng(seed), None).unwrap();

        prop_assert_eq!(a.objective.to_bits(), b.objective.to_bits());
        prop_assert_eq!(a.total_power.to_bits(), b.total_power.to_bits());
        prop_assert_eq!(a.solution, b.solution);
    }
}
