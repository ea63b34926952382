//! Migration plan data model
//!
//! A plan is an ordered list of phases, a single gateway configuration, and
//! a single data-migration strategy. Everything here is produced once by the
//! planner and immutable thereafter.

use crate::types::{MicroserviceCandidate, RunId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Kind of a migration step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StepType {
    /// Provision the service's runtime environment
    SetupInfrastructure,
    /// Move domain code and deploy the service
    DeployService,
    /// Point gateway routes at the service
    ConfigureGateway,
    /// Copy and synchronize data stores
    MigrateData,
    /// Switch clients to the new endpoints
    UpdateClients,
    /// Verify the phase before promotion
    Validate,
    /// Undo a previously executed step
    Rollback,
}

/// One step within a phase
///
/// Steps for one candidate are totally ordered, and every step defines what
/// undoes it, except terminal `Validate` steps, which perform no mutation
/// and may carry an empty rollback list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStep {
    /// What the step does
    pub description: String,
    /// Step kind
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// Owning candidate
    pub service: String,
    /// Step-level dependency names
    pub dependencies: Vec<String>,
    /// How to undo this step
    #[serde(rename = "rollbackSteps")]
    pub rollback_steps: Vec<String>,
}

/// Validation policy gating promotion to the next phase
///
/// The shape is fixed: all four fields are present in every plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationStrategy {
    /// Test suites to run
    #[serde(rename = "testTypes")]
    pub test_types: Vec<String>,
    /// Metrics observed while validating
    pub metrics: Vec<String>,
    /// Success threshold in percent
    #[serde(rename = "successThreshold")]
    pub success_threshold: u8,
    /// Conditions that trigger rollback
    #[serde(rename = "rollbackTriggers")]
    pub rollback_triggers: Vec<String>,
}

/// One migration phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationPhase {
    /// Monotonically increasing phase number, starting at 1
    #[serde(rename = "phaseNumber")]
    pub number: usize,
    /// Human description
    pub description: String,
    /// Candidates executed in this phase
    pub candidates: Vec<MicroserviceCandidate>,
    /// Ordered steps
    pub steps: Vec<MigrationStep>,
    /// Promotion gate
    pub validation: ValidationStrategy,
}

/// One gateway route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteConfig {
    /// Matched path
    pub path: String,
    /// Destination candidate
    #[serde(rename = "destinationService")]
    pub destination: String,
    /// Traffic weight, 0–100
    pub weight: u8,
    /// Whether the matched prefix is stripped before forwarding
    #[serde(rename = "stripPrefix")]
    pub strip_prefix: bool,
    /// Headers added on forward
    pub headers: Vec<String>,
}

/// Gateway routing configuration for the whole plan
///
/// For any fixed path, the weights of all routes mapped to it must sum to
/// at most 100. Partial/staged rollout is legal, oversubscription is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayConfig {
    /// Routing type tag
    #[serde(rename = "type")]
    pub kind: String,
    /// All routes
    pub routes: Vec<RouteConfig>,
    /// Whether the gateway circuit-breaks failing destinations
    #[serde(rename = "enableCircuitBreaker")]
    pub circuit_breaker: bool,
    /// Whether the gateway rate-limits clients
    #[serde(rename = "enableRateLimiting")]
    pub rate_limiting: bool,
}

/// Database endpoint description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseConfig {
    /// Engine name
    #[serde(rename = "type")]
    pub engine: String,
    /// Engine version
    pub version: String,
    /// Schemas in scope
    pub schemas: Vec<String>,
    /// Tables in scope (`*` for all)
    pub tables: Vec<String>,
}

/// Strategy for moving data out of the monolith's store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataMigrationStrategy {
    /// Strategy tag (`change-data-capture`, `dual-write`, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Supporting tools
    pub tools: Vec<String>,
    /// Source stores
    #[serde(rename = "sourceConfigs")]
    pub sources: Vec<DatabaseConfig>,
    /// Target stores
    #[serde(rename = "targetConfigs")]
    pub targets: Vec<DatabaseConfig>,
    /// Whether the strategy supports rolling back
    #[serde(rename = "enableRollback")]
    pub rollback_enabled: bool,
}

/// The complete strangler migration plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    /// Pipeline run that produced the plan
    pub run: RunId,
    /// When the plan was generated
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    /// Ordered phases
    pub phases: Vec<MigrationPhase>,
    /// Gateway routing for all candidates
    pub gateway: GatewayConfig,
    /// Data migration strategy
    #[serde(rename = "dataMigration")]
    pub data_migration: DataMigrationStrategy,
}

impl MigrationPlan {
    /// All candidates across all phases, in phase order
    pub fn candidates(&self) -> impl Iterator<Item = &MicroserviceCandidate> {
        self.phases.iter().flat_map(|p| p.candidates.iter())
    }
}
