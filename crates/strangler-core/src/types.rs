//! Core domain types
//!
//! Defines the fundamental types of the decomposition stage:
//! - Pipeline run identity and configuration
//! - [`BoundedContext`] with five disjoint-by-construction role sets
//! - [`MicroserviceCandidate`] with disjoint command/query sets
//!
//! All of these are produced once per pipeline run and immutable once the
//! stage that builds them completes.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use ulid::Ulid;

/// Unique pipeline run identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub Ulid);

impl RunId {
    /// Generate a new run id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// DDD role a class plays inside its bounded context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainRole {
    /// Entry point of a consistency boundary
    AggregateRoot,
    /// Identity-bearing domain object
    Entity,
    /// Immutable value-semantics object
    ValueObject,
    /// Persistence access point
    Repository,
    /// Stateless domain operation holder
    Service,
}

impl Display for DomainRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::AggregateRoot => "aggregate root",
            Self::Entity => "entity",
            Self::ValueObject => "value object",
            Self::Repository => "repository",
            Self::Service => "service",
        };
        f.write_str(text)
    }
}

/// A domain event owned by an aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainEvent {
    /// Event name
    pub name: String,
    /// Owning aggregate root
    #[serde(rename = "aggregateRoot")]
    pub aggregate_root: String,
    /// Payload field names
    pub payload: Vec<String>,
}

/// A self-consistent grouping of domain classes
///
/// The five role sets are disjoint by construction: every assignment routes
/// through [`BoundedContext::assign`], which rejects a class already present
/// in another set of the same context. Domain events keep the order the
/// oracle proposed them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundedContext {
    name: String,
    description: String,
    aggregate_roots: BTreeSet<String>,
    entities: BTreeSet<String>,
    value_objects: BTreeSet<String>,
    repositories: BTreeSet<String>,
    services: BTreeSet<String>,
    domain_events: Vec<DomainEvent>,
}

impl BoundedContext {
    /// Create an empty context
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            aggregate_roots: BTreeSet::new(),
            entities: BTreeSet::new(),
            value_objects: BTreeSet::new(),
            repositories: BTreeSet::new(),
            services: BTreeSet::new(),
            domain_events: Vec::new(),
        }
    }

    /// Context name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Classes judged to be aggregate roots
    #[inline]
    #[must_use]
    pub fn aggregate_roots(&self) -> &BTreeSet<String> {
        &self.aggregate_roots
    }

    /// Classes judged to be entities
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &BTreeSet<String> {
        &self.entities
    }

    /// Classes judged to be value objects
    #[inline]
    #[must_use]
    pub fn value_objects(&self) -> &BTreeSet<String> {
        &self.value_objects
    }

    /// Classes judged to be repositories
    #[inline]
    #[must_use]
    pub fn repositories(&self) -> &BTreeSet<String> {
        &self.repositories
    }

    /// Classes judged to be domain services
    #[inline]
    #[must_use]
    pub fn services(&self) -> &BTreeSet<String> {
        &self.services
    }

    /// Domain events in proposal order
    #[inline]
    #[must_use]
    pub fn domain_events(&self) -> &[DomainEvent] {
        &self.domain_events
    }

    /// Assign a class to a role set
    ///
    /// # Errors
    /// Returns [`CoreError::RoleConflict`] when the class already belongs to
    /// one of the five sets of this context.
    pub fn assign(&mut self, class: impl Into<String>, role: DomainRole) -> Result<(), CoreError> {
        let class = class.into();
        if let Some(existing) = self.role_of(&class) {
            return Err(CoreError::RoleConflict {
                context: self.name.clone(),
                class,
                existing,
                requested: role,
            });
        }
        self.set_mut(role).insert(class);
        Ok(())
    }

    /// Role the class currently holds in this context, if any
    #[must_use]
    pub fn role_of(&self, class: &str) -> Option<DomainRole> {
        const ROLES: [DomainRole; 5] = [
            DomainRole::AggregateRoot,
            DomainRole::Entity,
            DomainRole::ValueObject,
            DomainRole::Repository,
            DomainRole::Service,
        ];
        ROLES.into_iter().find(|role| self.set(*role).contains(class))
    }

    /// Append a domain event
    pub fn push_event(&mut self, event: DomainEvent) {
        self.domain_events.push(event);
    }

    /// All member classes across the five role sets
    pub fn members(&self) -> impl Iterator<Item = &String> {
        self.aggregate_roots
            .iter()
            .chain(&self.entities)
            .chain(&self.value_objects)
            .chain(&self.repositories)
            .chain(&self.services)
    }

    /// Whether no class survived validation
    #[must_use]
    pub fn is_unpopulated(&self) -> bool {
        self.members().next().is_none()
    }

    fn set(&self, role: DomainRole) -> &BTreeSet<String> {
        match role {
            DomainRole::AggregateRoot => &self.aggregate_roots,
            DomainRole::Entity => &self.entities,
            DomainRole::ValueObject => &self.value_objects,
            DomainRole::Repository => &self.repositories,
            DomainRole::Service => &self.services,
        }
    }

    fn set_mut(&mut self, role: DomainRole) -> &mut BTreeSet<String> {
        match role {
            DomainRole::AggregateRoot => &mut self.aggregate_roots,
            DomainRole::Entity => &mut self.entities,
            DomainRole::ValueObject => &mut self.value_objects,
            DomainRole::Repository => &mut self.repositories,
            DomainRole::Service => &mut self.services,
        }
    }
}

/// A microservice candidate synthesized from one bounded context
///
/// Owns its source context. Command and query name sets are disjoint by
/// construction: an operation is either a command or a query, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MicroserviceCandidate {
    name: String,
    #[serde(rename = "boundedContext")]
    context: BoundedContext,
    apis: BTreeSet<String>,
    commands: BTreeSet<String>,
    queries: BTreeSet<String>,
    #[serde(rename = "requiredServices")]
    required_services: Vec<String>,
}

impl MicroserviceCandidate {
    /// Create a candidate with empty operation sets
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, context: BoundedContext) -> Self {
        Self {
            name: name.into(),
            context,
            apis: BTreeSet::new(),
            commands: BTreeSet::new(),
            queries: BTreeSet::new(),
            required_services: Vec::new(),
        }
    }

    /// Candidate name (unique within a planning run)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bounded context this candidate owns
    #[inline]
    #[must_use]
    pub fn context(&self) -> &BoundedContext {
        &self.context
    }

    /// Exposed API paths
    #[inline]
    #[must_use]
    pub fn apis(&self) -> &BTreeSet<String> {
        &self.apis
    }

    /// Command names
    #[inline]
    #[must_use]
    pub fn commands(&self) -> &BTreeSet<String> {
        &self.commands
    }

    /// Query names
    #[inline]
    #[must_use]
    pub fn queries(&self) -> &BTreeSet<String> {
        &self.queries
    }

    /// Names of other candidates this one depends on
    #[inline]
    #[must_use]
    pub fn required_services(&self) -> &[String] {
        &self.required_services
    }

    /// Expose an API path (duplicates collapse into the set)
    pub fn add_api(&mut self, path: impl Into<String>) {
        self.apis.insert(path.into());
    }

    /// Record a command
    ///
    /// A name already recorded as a query is dropped with a warning: the
    /// first classification wins.
    pub fn record_command(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.queries.contains(&name) {
            tracing::warn!(candidate = %self.name, operation = %name,
                "operation already a query, dropping command classification");
            return;
        }
        self.commands.insert(name);
    }

    /// Record a query
    ///
    /// A name already recorded as a command is dropped with a warning: the
    /// first classification wins.
    pub fn record_query(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.commands.contains(&name) {
            tracing::warn!(candidate = %self.name, operation = %name,
                "operation already a command, dropping query classification");
            return;
        }
        self.queries.insert(name);
    }

    /// Declare a dependency on another candidate
    pub fn require(&mut self, service: impl Into<String>) {
        self.required_services.push(service.into());
    }
}

/// Per-phase validation policy overrides
///
/// The validation strategy's shape is fixed (all four fields are always
/// present in every plan); only the threshold and metric list may vary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Success threshold in percent
    pub success_threshold: u8,
    /// Metrics observed during validation
    pub validation_metrics: Vec<String>,
    /// Traffic weight for newly configured routes (100 = full cutover)
    pub route_weight: u8,
}

impl PlannerConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a validation success threshold
    #[inline]
    #[must_use]
    pub fn with_success_threshold(mut self, threshold: u8) -> Self {
        self.success_threshold = threshold;
        self
    }

    /// With an explicit metric list
    #[inline]
    #[must_use]
    pub fn with_validation_metrics(mut self, metrics: Vec<String>) -> Self {
        self.validation_metrics = metrics;
        self
    }

    /// With a staged-rollout route weight
    #[inline]
    #[must_use]
    pub fn with_route_weight(mut self, weight: u8) -> Self {
        self.route_weight = weight.min(100);
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            success_threshold: 95,
            validation_metrics: vec![
                "ResponseTime".to_string(),
                "ErrorRate".to_string(),
                "Throughput".to_string(),
            ],
            route_weight: 100,
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum oracle judgments in flight at once
    pub max_concurrent_judgments: usize,
    /// Planner policy
    pub planner: PlannerConfig,
}

impl PipelineConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a judgment concurrency width
    #[inline]
    #[must_use]
    pub fn with_max_concurrent_judgments(mut self, width: usize) -> Self {
        self.max_concurrent_judgments = width.max(1);
        self
    }

    /// With planner policy overrides
    #[inline]
    #[must_use]
    pub fn with_planner(mut self, planner: PlannerConfig) -> Self {
        self.planner = planner;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_judgments: 8,
            planner: PlannerConfig::default(),
        }
    }
}
