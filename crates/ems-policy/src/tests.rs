use std::sync::Arc;

use ems_core::{AmbulanceId, EmergencyId, LocationId, SimRng, Tick};

use crate::{
    Assignment, CostTable, CrispPriority, DispatchContext, DispatchPolicy, GENE_COUNT,
    GreedyNearest, IdleUnit, PendingCall, PriorityModel, Strategy, StrategyPolicy,
};

fn amb(i: u32) -> AmbulanceId {
    AmbulanceId(i)
}

fn em(i: u32) -> EmergencyId {
    EmergencyId(i)
}

fn loc(i: u32) -> LocationId {
    LocationId(i)
}

fn call(id: u32, priority: u8, waiting: u64) -> PendingCall {
    PendingCall {
        emergency: em(id),
        location: loc(id),
        priority,
        score: None,
        waiting_ticks: waiting,
    }
}

fn unit(id: u32) -> IdleUnit {
    IdleUnit { ambulance: amb(id), location: loc(100 + id) }
}

mod greedy {
    use super::*;

    #[test]
    fn picks_nearest_unit_per_call() {
        let pending = [call(0, 3, 0)];
        let idle = [unit(0), unit(1)];
        let mut costs = CostTable::new();
        costs.insert(amb(0), em(0), 7);
        costs.insert(amb(1), em(0), 2);

        let ctx = DispatchContext::new(Tick::ZERO, &pending, &idle, &costs);
        let out = GreedyNearest.assign(&ctx, &mut SimRng::new(1));
        assert_eq!(out, vec![Assignment::new(amb(1), em(0))]);
    }

    #[test]
    fn cost_tie_breaks_toward_lower_ambulance_id() {
        let pending = [call(0, 3, 0)];
        let idle = [unit(1), unit(0)];
        let mut costs = CostTable::new();
        costs.insert(amb(0), em(0), 4);
        costs.insert(amb(1), em(0), 4);

        let ctx = DispatchContext::new(Tick::ZERO, &pending, &idle, &costs);
        let out = GreedyNearest.assign(&ctx, &mut SimRng::new(1));
        assert_eq!(out[0].ambulance, amb(0));
    }

    #[test]
    fn a_unit_is_committed_at_most_once() {
        let pending = [call(0, 5, 0), call(1, 4, 0)];
        let idle = [unit(0)];
        let mut costs = CostTable::new();
        costs.insert(amb(0), em(0), 1);
        costs.insert(amb(0), em(1), 1);

        let ctx = DispatchContext::new(Tick::ZERO, &pending, &idle, &costs);
        let out = GreedyNearest.assign(&ctx, &mut SimRng::new(1));
        // First call in queue order wins; the second waits for next tick.
        assert_eq!(out, vec![Assignment::new(amb(0), em(0))]);
    }

    #[test]
    fn unreachable_calls_are_left_pending() {
        let pending = [call(0, 3, 0), call(1, 2, 0)];
        let idle = [unit(0)];
        let mut costs = CostTable::new();
        costs.insert(amb(0), em(1), 5);

        let ctx = DispatchContext::new(Tick::ZERO, &pending, &idle, &costs);
        let out = GreedyNearest.assign(&ctx, &mut SimRng::new(1));
        assert_eq!(out, vec![Assignment::new(amb(0), em(1))]);
    }
}

mod strategy {
    use super::*;

    #[test]
    fn random_strategies_are_valid() {
        let mut rng = SimRng::new(42);
        for _ in 0..100 {
            assert!(Strategy::random(&mut rng).is_valid());
        }
    }

    #[test]
    fn out_of_bounds_and_nan_genes_are_invalid() {
        let mut s = Strategy::nearest_first();
        assert!(s.is_valid());

        s.genes[0] = 1.5;
        assert!(!s.is_valid());

        s.genes[0] = f64::NAN;
        assert!(!s.is_valid());

        s.genes[0] = 0.5;
        s.genes[3] = 0.1; // below urgency floor
        assert!(!s.is_valid());
    }

    #[test]
    fn crossover_child_mixes_parent_genes() {
        let mut rng = SimRng::new(7);
        let a = Strategy { genes: [0.5, 0.5, 0.5, 1.0, 1.0, 1.0, 1.0, 1.0] };
        let b = Strategy { genes: [0.9, 0.9, 0.9, 2.0, 2.0, 2.0, 2.0, 2.0] };
        let child = a.crossover(&b, &mut rng);

        assert!(child.is_valid());
        for (i, g) in child.genes.iter().enumerate() {
            assert!(
                *g == a.genes[i] || *g == b.genes[i],
                "gene {i} came from neither parent"
            );
        }
        // Single-point: a prefix from `a`, a suffix from `b`.
        assert_eq!(child.genes[0], a.genes[0]);
        assert_eq!(child.genes[GENE_COUNT - 1], b.genes[GENE_COUNT - 1]);
    }

    #[test]
    fn mutation_stays_within_bounds() {
        let mut rng = SimRng::new(9);
        let mut s = Strategy::random(&mut rng);
        for _ in 0..200 {
            s.mutate(1.0, &mut rng);
            assert!(s.is_valid());
        }
    }

    #[test]
    fn zero_probability_mutation_is_a_noop() {
        let mut rng = SimRng::new(3);
        let mut s = Strategy::random(&mut rng);
        let before = s.clone();
        s.mutate(0.0, &mut rng);
        assert_eq!(s, before);
    }
}

mod strategy_policy {
    use super::*;

    fn two_calls_two_units() -> ([PendingCall; 2], [IdleUnit; 2], CostTable) {
        let pending = [call(0, 5, 4), call(1, 1, 0)];
        let idle = [unit(0), unit(1)];
        let mut costs = CostTable::new();
        costs.insert(amb(0), em(0), 3);
        costs.insert(amb(0), em(1), 3);
        costs.insert(amb(1), em(0), 8);
        costs.insert(amb(1), em(1), 8);
        (pending, idle, costs)
    }

    #[test]
    fn high_severity_call_gets_the_close_unit() {
        let (pending, idle, costs) = two_calls_two_units();
        let ctx = DispatchContext::new(Tick::ZERO, &pending, &idle, &costs);

        let policy = StrategyPolicy::new(Strategy {
            genes: [0.5, 1.0, 0.5, 0.25, 0.25, 0.25, 0.25, 2.0],
        });
        let out = policy.assign(&ctx, &mut SimRng::new(1));

        assert_eq!(out.len(), 2);
        assert!(out.contains(&Assignment::new(amb(0), em(0))));
        assert!(out.contains(&Assignment::new(amb(1), em(1))));
    }

    #[test]
    fn assignments_are_deterministic_for_a_fixed_context() {
        let (pending, idle, costs) = two_calls_two_units();
        let ctx = DispatchContext::new(Tick::ZERO, &pending, &idle, &costs);
        let policy = StrategyPolicy::new(Strategy::nearest_first());

        let a = policy.assign(&ctx, &mut SimRng::new(1));
        let b = policy.assign(&ctx, &mut SimRng::new(99));
        assert_eq!(a, b);
    }

    #[test]
    fn each_id_appears_at_most_once() {
        let pending = [call(0, 4, 0), call(1, 4, 0), call(2, 4, 0)];
        let idle = [unit(0), unit(1)];
        let mut costs = CostTable::new();
        for u in 0..2 {
            for c in 0..3 {
                costs.insert(amb(u), em(c), 1 + u + c);
            }
        }
        let ctx = DispatchContext::new(Tick::ZERO, &pending, &idle, &costs);
        let policy = StrategyPolicy::new(Strategy::nearest_first());
        let out = policy.assign(&ctx, &mut SimRng::new(1));

        assert_eq!(out.len(), 2);
        let mut units: Vec<_> = out.iter().map(|a| a.ambulance).collect();
        let mut calls: Vec<_> = out.iter().map(|a| a.emergency).collect();
        units.sort();
        units.dedup();
        calls.sort();
        calls.dedup();
        assert_eq!(units.len(), 2);
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn scorer_replaces_the_raw_priority_term() {
        let pending = [call(0, 5, 0)];
        let idle = [unit(0)];
        let mut costs = CostTable::new();
        costs.insert(amb(0), em(0), 10);
        let ctx = DispatchContext::new(Tick::ZERO, &pending, &idle, &costs);

        // A scorer that refuses everything still yields an assignment — it
        // changes scores, never feasibility.
        let zero: Arc<dyn PriorityModel> = Arc::new(|_p: f64, _t: f64| 0.0);
        let policy = StrategyPolicy::with_scorer(Strategy::nearest_first(), zero);
        let out = policy.assign(&ctx, &mut SimRng::new(1));
        assert_eq!(out, vec![Assignment::new(amb(0), em(0))]);
        assert_eq!(policy.name(), "strategy+scorer");
    }
}

mod scorer {
    use super::*;

    #[test]
    fn crisp_score_matches_weighted_sum() {
        let m = CrispPriority::default();
        // Max priority, zero travel: full marks.
        assert!((m.score(5.0, 0.0) - 100.0).abs() < 1e-9);
        // Max priority, travel at the cap: the 20-point term vanishes.
        assert!((m.score(5.0, 60.0) - 80.0).abs() < 1e-9);
        // Mid priority, half the cap.
        let got = m.score(3.0, 30.0);
        assert!((got - (48.0 + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn travel_beyond_the_cap_is_clamped() {
        let m = CrispPriority::new(60.0);
        assert_eq!(m.score(2.0, 600.0), m.score(2.0, 60.0));
    }
}
