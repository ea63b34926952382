//! Strangler migration planning
//!
//! The planner performs no topological reordering: the default policy is one
//! phase per candidate, numbered by input order, and callers needing
//! dependency-aware batching supply pre-sorted input. The planner only
//! validates that the ordering respects declared `requiredServices`. An
//! invalid plan must never reach execution, so every violation is fatal
//! before a single step is emitted.

use crate::candidate::route_segment;
use crate::error::PlanError;
use crate::plan::{
    DataMigrationStrategy, DatabaseConfig, GatewayConfig, MigrationPhase, MigrationPlan,
    MigrationStep, RouteConfig, StepType, ValidationStrategy,
};
use crate::types::{MicroserviceCandidate, PlannerConfig, RunId};
use indexmap::IndexMap;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use std::collections::HashMap;

/// Builds migration plans from candidate lists
#[derive(Debug, Default)]
pub struct MigrationPlanner {
    config: PlannerConfig,
}

impl MigrationPlanner {
    /// Create a planner with the given policy
    #[inline]
    #[must_use]
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Plan with the default policy: one phase per candidate, input order
    ///
    /// # Errors
    /// Fails when the input order violates declared `requiredServices`, a
    /// requirement cannot be resolved, candidate names collide, or route
    /// weights oversubscribe a path.
    pub fn plan(&self, candidates: &[MicroserviceCandidate]) -> Result<MigrationPlan, PlanError> {
        let batches: Vec<Vec<MicroserviceCandidate>> =
            candidates.iter().cloned().map(|c| vec![c]).collect();
        self.plan_batched(batches)
    }

    /// Plan with caller-chosen phase batches
    ///
    /// A phase may carry multiple candidates when they have no unresolved
    /// inter-dependencies; same-phase cycles are rejected.
    ///
    /// # Errors
    /// Same conditions as [`MigrationPlanner::plan`].
    pub fn plan_batched(
        &self,
        batches: Vec<Vec<MicroserviceCandidate>>,
    ) -> Result<MigrationPlan, PlanError> {
        let batches: Vec<Vec<MicroserviceCandidate>> =
            batches.into_iter().filter(|b| !b.is_empty()).collect();
        validate_ordering(&batches)?;

        let gateway = self.gateway(batches.iter().flatten())?;
        let phases = batches
            .into_iter()
            .enumerate()
            .map(|(idx, batch)| self.phase(idx + 1, batch))
            .collect::<Vec<_>>();

        tracing::info!(phases = phases.len(), "migration plan generated");
        Ok(MigrationPlan {
            run: RunId::new(),
            generated_at: chrono::Utc::now(),
            phases,
            gateway,
            data_migration: default_data_migration(),
        })
    }

    fn phase(&self, number: usize, candidates: Vec<MicroserviceCandidate>) -> MigrationPhase {
        let names: Vec<&str> = candidates.iter().map(MicroserviceCandidate::name).collect();
        let description = format!("Migrate {}", names.join(", "));
        let steps = candidates
            .iter()
            .flat_map(|c| canonical_steps(c.name()))
            .collect();

        MigrationPhase {
            number,
            description,
            candidates,
            steps,
            validation: ValidationStrategy {
                test_types: vec!["Integration".into(), "Load".into(), "Smoke".into()],
                metrics: self.config.validation_metrics.clone(),
                success_threshold: self.config.success_threshold,
                rollback_triggers: vec!["ErrorRate > 5%".into(), "ResponseTime > 2s".into()],
            },
        }
    }

    fn gateway<'a>(
        &self,
        candidates: impl Iterator<Item = &'a MicroserviceCandidate>,
    ) -> Result<GatewayConfig, PlanError> {
        let routes: Vec<RouteConfig> = candidates
            .map(|candidate| RouteConfig {
                path: format!("/api/{}", route_segment(candidate.name())),
                destination: candidate.name().to_string(),
                weight: self.config.route_weight,
                strip_prefix: true,
                headers: Vec::new(),
            })
            .collect();

        // Staged rollout keeps sums under 100; oversubscription is an error.
        let mut totals: IndexMap<&str, u32> = IndexMap::new();
        for route in &routes {
            *totals.entry(route.path.as_str()).or_default() += u32::from(route.weight);
        }
        if let Some((path, total)) = totals.into_iter().find(|(_, total)| *total > 100) {
            return Err(PlanError::RouteOverspill {
                path: path.to_string(),
                total,
            });
        }

        Ok(GatewayConfig {
            kind: "api-gateway".to_string(),
            routes,
            circuit_breaker: true,
            rate_limiting: true,
        })
    }
}

/// The canonical step sequence for migrating one candidate
///
/// Every step names what undoes it; `Validate` performs no mutation and has
/// an empty rollback list.
fn canonical_steps(service: &str) -> Vec<MigrationStep> {
    let step = |description: &str, step_type, rollback: &[&str]| MigrationStep {
        description: description.to_string(),
        step_type,
        service: service.to_string(),
        dependencies: Vec::new(),
        rollback_steps: rollback.iter().map(ToString::to_string).collect(),
    };

    vec![
        step(
            "Create microservice project structure",
            StepType::SetupInfrastructure,
            &["Delete project structure"],
        ),
        step(
            "Move domain classes",
            StepType::DeployService,
            &["Revert domain class migration"],
        ),
        step(
            "Configure service endpoints",
            StepType::ConfigureGateway,
            &["Remove service endpoints"],
        ),
        step("Migrate data", StepType::MigrateData, &["Rollback data migration"]),
        step(
            "Update client references",
            StepType::UpdateClients,
            &["Revert client updates"],
        ),
        step("Validate migration", StepType::Validate, &[]),
    ]
}

/// Default data migration: change data capture with rollback enabled
fn default_data_migration() -> DataMigrationStrategy {
    DataMigrationStrategy {
        kind: "change-data-capture".to_string(),
        tools: vec!["Debezium".to_string(), "Apache Kafka".to_string()],
        sources: vec![DatabaseConfig {
            engine: "MySQL".to_string(),
            version: "8.0".to_string(),
            schemas: vec!["public".to_string()],
            tables: vec!["*".to_string()],
        }],
        targets: vec![DatabaseConfig {
            engine: "PostgreSQL".to_string(),
            version: "15".to_string(),
            schemas: vec!["public".to_string()],
            tables: vec!["*".to_string()],
        }],
        rollback_enabled: true,
    }
}

/// Check that phase order satisfies every declared requirement
///
/// A requirement resolves to the phase where the required candidate first
/// completes; it must not be a later phase, and within one phase the
/// requirement subgraph must be acyclic.
fn validate_ordering(batches: &[Vec<MicroserviceCandidate>]) -> Result<(), PlanError> {
    let mut phase_of: HashMap<&str, usize> = HashMap::new();
    for (idx, batch) in batches.iter().enumerate() {
        for candidate in batch {
            if phase_of.insert(candidate.name(), idx + 1).is_some() {
                return Err(PlanError::DuplicateCandidate {
                    name: candidate.name().to_string(),
                });
            }
        }
    }

    for (idx, batch) in batches.iter().enumerate() {
        let phase = idx + 1;
        for candidate in batch {
            for required in candidate.required_services() {
                match phase_of.get(required.as_str()) {
                    None => {
                        return Err(PlanError::UnknownRequiredService {
                            service: candidate.name().to_string(),
                            required: required.clone(),
                        });
                    }
                    Some(&satisfied_in) if satisfied_in > phase => {
                        return Err(PlanError::UnsatisfiedDependencyOrder {
                            service: candidate.name().to_string(),
                            required: required.clone(),
                            phase,
                            satisfied_in,
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        check_same_phase_cycles(phase, batch)?;
    }

    Ok(())
}

fn check_same_phase_cycles(
    phase: usize,
    batch: &[MicroserviceCandidate],
) -> Result<(), PlanError> {
    let index_of: HashMap<&str, usize> = batch
        .iter()
        .enumerate()
        .map(|(i, c)| (c.name(), i))
        .collect();

    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for (i, candidate) in batch.iter().enumerate() {
        graph.add_node(i);
        for required in candidate.required_services() {
            if let Some(&j) = index_of.get(required.as_str()) {
                graph.add_edge(j, i, ());
            }
        }
    }

    match toposort(&graph, None) {
        Ok(_) => Ok(()),
        Err(cycle) => Err(PlanError::CyclicPhase {
            phase,
            service: batch[cycle.node_id()].name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundedContext;
    use pretty_assertions::assert_eq;

    fn candidate(name: &str, requires: &[&str]) -> MicroserviceCandidate {
        let mut c = MicroserviceCandidate::new(name, BoundedContext::new(name, ""));
        for r in requires {
            c.require(*r);
        }
        c
    }

    #[test]
    fn one_phase_per_candidate_with_canonical_steps() {
        let planner = MigrationPlanner::default();
        let plan = planner
            .plan(&[candidate("order-service", &[]), candidate("catalog-service", &[])])
            .unwrap();

        assert_eq!(plan.phases.len(), 2);
        assert_eq!(plan.phases[0].number, 1);
        assert_eq!(plan.phases[1].number, 2);
        assert_eq!(plan.phases[0].steps.len(), 6);
        assert_eq!(plan.phases[0].steps[0].step_type, StepType::SetupInfrastructure);
        assert_eq!(plan.phases[0].steps[5].step_type, StepType::Validate);
        assert!(plan.phases[0].steps[5].rollback_steps.is_empty());
        for step in &plan.phases[0].steps[..5] {
            assert!(!step.rollback_steps.is_empty(), "{:?} lacks rollback", step.step_type);
        }
        assert_eq!(plan.phases[0].validation.success_threshold, 95);
    }

    #[test]
    fn forward_requirement_violates_ordering() {
        let planner = MigrationPlanner::default();
        let err = planner
            .plan(&[
                candidate("order-service", &["catalog-service"]),
                candidate("catalog-service", &[]),
            ])
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::UnsatisfiedDependencyOrder { phase: 1, satisfied_in: 2, .. }
        ));
    }

    #[test]
    fn backward_requirement_is_satisfied() {
        let planner = MigrationPlanner::default();
        let plan = planner
            .plan(&[
                candidate("catalog-service", &[]),
                candidate("order-service", &["catalog-service"]),
            ])
            .unwrap();
        assert_eq!(plan.phases.len(), 2);
    }

    #[test]
    fn same_phase_acyclic_requirements_are_legal() {
        let planner = MigrationPlanner::default();
        let plan = planner
            .plan_batched(vec![vec![
                candidate("catalog-service", &[]),
                candidate("order-service", &["catalog-service"]),
            ]])
            .unwrap();
        assert_eq!(plan.phases.len(), 1);
        assert_eq!(plan.phases[0].candidates.len(), 2);
        assert_eq!(plan.phases[0].steps.len(), 12);
    }

    #[test]
    fn same_phase_cycle_is_rejected() {
        let planner = MigrationPlanner::default();
        let err = planner
            .plan_batched(vec![vec![
                candidate("order-service", &["billing-service"]),
                candidate("billing-service", &["order-service"]),
            ]])
            .unwrap_err();
        assert!(matches!(err, PlanError::CyclicPhase { phase: 1, .. }));
    }

    #[test]
    fn unknown_requirement_is_rejected() {
        let planner = MigrationPlanner::default();
        let err = planner
            .plan(&[candidate("order-service", &["nonexistent-service"])])
            .unwrap_err();
        assert!(matches!(err, PlanError::UnknownRequiredService { .. }));
    }

    #[test]
    fn duplicate_candidate_names_are_rejected() {
        let planner = MigrationPlanner::default();
        let err = planner
            .plan(&[candidate("order-service", &[]), candidate("order-service", &[])])
            .unwrap_err();
        assert!(matches!(err, PlanError::DuplicateCandidate { .. }));
    }

    #[test]
    fn routes_default_to_full_cutover() {
        let planner = MigrationPlanner::default();
        let plan = planner.plan(&[candidate("order-service", &[])]).unwrap();
        let route = &plan.gateway.routes[0];
        assert_eq!(route.path, "/api/order");
        assert_eq!(route.destination, "order-service");
        assert_eq!(route.weight, 100);
        assert!(route.strip_prefix);
    }

    #[test]
    fn colliding_route_paths_cannot_oversubscribe() {
        // Distinct candidate names, same route segment.
        let planner = MigrationPlanner::default();
        let err = planner
            .plan(&[candidate("order-service", &[]), candidate("order", &[])])
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::RouteOverspill { ref path, total: 200 } if path == "/api/order"
        ));
    }

    #[test]
    fn staged_rollout_weight_is_configurable() {
        let planner = MigrationPlanner::new(PlannerConfig::new().with_route_weight(20));
        let plan = planner.plan(&[candidate("order-service", &[])]).unwrap();
        assert_eq!(plan.gateway.routes[0].weight, 20);
    }

    #[test]
    fn data_migration_defaults_to_cdc_with_rollback() {
        let planner = MigrationPlanner::default();
        let plan = planner.plan(&[candidate("order-service", &[])]).unwrap();
        assert_eq!(plan.data_migration.kind, "change-data-capture");
        assert!(plan.data_migration.rollback_enabled);
        assert!(plan.data_migration.tools.contains(&"Debezium".to_string()));
    }

    #[test]
    fn empty_candidate_list_plans_no_phases() {
        let planner = MigrationPlanner::default();
        let plan = planner.plan(&[]).unwrap();
        assert!(plan.phases.is_empty());
        assert!(plan.gateway.routes.is_empty());
    }
}
