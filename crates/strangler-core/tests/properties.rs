//! Algebraic properties of the planner and the core types

use proptest::prelude::*;
use std::collections::HashMap;
use strangler_core::{BoundedContext, MicroserviceCandidate, MigrationPlanner, PlannerConfig};

fn candidates(n: usize) -> Vec<MicroserviceCandidate> {
    (0..n)
        .map(|i| {
            let name = format!("svc-{i}");
            MicroserviceCandidate::new(name.clone(), BoundedContext::new(name, ""))
        })
        .collect()
}

proptest! {
    /// Phase numbers are contiguous starting at 1, no gaps or repeats.
    #[test]
    fn phase_numbers_are_contiguous(n in 0usize..24) {
        let plan = MigrationPlanner::default().plan(&candidates(n)).unwrap();
        let numbers: Vec<usize> = plan.phases.iter().map(|p| p.number).collect();
        prop_assert_eq!(numbers, (1..=n).collect::<Vec<_>>());
    }

    /// For any fixed path, route weights sum to at most 100.
    #[test]
    fn route_weights_never_oversubscribe(weight in 0u8..=100, n in 1usize..12) {
        let planner = MigrationPlanner::new(PlannerConfig::new().with_route_weight(weight));
        let plan = planner.plan(&candidates(n)).unwrap();

        let mut totals: HashMap<&str, u32> = HashMap::new();
        for route in &plan.gateway.routes {
            *totals.entry(route.path.as_str()).or_default() += u32::from(route.weight);
        }
        for total in totals.values() {
            prop_assert!(*total <= 100);
        }
    }

    /// Command and query sets stay disjoint under any interleaving.
    #[test]
    fn command_and_query_sets_are_disjoint(
        ops in prop::collection::vec(("[a-z]{1,8}", any::<bool>()), 0..32)
    ) {
        let mut candidate =
            MicroserviceCandidate::new("svc", BoundedContext::new("svc", ""));
        for (name, is_command) in ops {
            if is_command {
                candidate.record_command(name);
            } else {
                candidate.record_query(name);
            }
        }
        prop_assert!(candidate.commands().is_disjoint(candidate.queries()));
    }

    /// Every non-Validate step defines its rollback.
    #[test]
    fn every_mutating_step_is_reversible(n in 1usize..8) {
        let plan = MigrationPlanner::default().plan(&candidates(n)).unwrap();
        for phase in &plan.phases {
            for step in &phase.steps {
                if step.step_type == strangler_core::StepType::Validate {
                    prop_assert!(step.rollback_steps.is_empty());
                } else {
                    prop_assert!(!step.rollback_steps.is_empty());
                }
            }
        }
    }
}
