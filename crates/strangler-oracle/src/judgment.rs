//! Typed judgment schemas
//!
//! The oracle's response text is expected (but not guaranteed) to be JSON
//! matching one of four documented per-template schemas. Parsing here is the
//! only path from raw text to typed values: a shape violation becomes
//! [`OracleError::MalformedJudgment`] carrying the raw text, and unvalidated
//! maps never flow downstream.

use crate::error::OracleError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Response to `identify-bounded-contexts`
#[derive(Debug, Clone, Deserialize)]
pub struct ContextsJudgment {
    /// The proposed decomposition
    #[serde(rename = "boundedContexts")]
    pub bounded_contexts: Vec<ContextJudgment>,
}

/// One proposed bounded context
#[derive(Debug, Clone, Deserialize)]
pub struct ContextJudgment {
    /// Context name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Classes judged to be aggregate roots
    #[serde(default, rename = "aggregateRoots")]
    pub aggregate_roots: Vec<String>,
    /// Classes judged to be entities
    #[serde(default)]
    pub entities: Vec<String>,
    /// Classes judged to be value objects
    #[serde(default, rename = "valueObjects")]
    pub value_objects: Vec<String>,
    /// Classes judged to be repositories
    #[serde(default)]
    pub repositories: Vec<String>,
    /// Classes judged to be domain services
    #[serde(default)]
    pub services: Vec<String>,
    /// Domain events, in the order the oracle proposed them
    #[serde(default)]
    pub relationships: Vec<EventJudgment>,
}

/// One proposed domain event
#[derive(Debug, Clone, Deserialize)]
pub struct EventJudgment {
    /// Event name
    pub name: String,
    /// Aggregate the event belongs to
    #[serde(default, rename = "aggregateRoot")]
    pub aggregate_root: String,
    /// Payload field names
    #[serde(default)]
    pub payload: Vec<String>,
}

/// Response to `microservice-candidate-design`
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateJudgment {
    /// The proposed service
    pub microservice: MicroserviceJudgment,
}

/// One proposed microservice
#[derive(Debug, Clone, Deserialize)]
pub struct MicroserviceJudgment {
    /// Service name; the caller derives one from the context when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Exposed API paths
    #[serde(default)]
    pub apis: Vec<ApiJudgment>,
    /// Commands and queries
    #[serde(default)]
    pub events: Vec<InteractionJudgment>,
    /// Names of services this one depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// One exposed API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiJudgment {
    /// Route path
    pub path: String,
}

/// One service interaction with its classification tag
///
/// Classification is closed: a tag of exactly `COMMAND` makes a command,
/// anything else is a query.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionJudgment {
    /// Interaction name
    pub name: String,
    /// Classification tag as spelled by the oracle
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl InteractionJudgment {
    /// Whether this interaction classifies as a command
    #[inline]
    #[must_use]
    pub fn is_command(&self) -> bool {
        self.kind == "COMMAND"
    }
}

/// Response to `refactor-class`
#[derive(Debug, Clone, Deserialize)]
pub struct RefactorJudgment {
    /// The move-and-edit plan
    pub refactoring: RefactorPlanJudgment,
}

/// The plan for moving one file
#[derive(Debug, Clone, Deserialize)]
pub struct RefactorPlanJudgment {
    /// Target location relative to the service source root
    #[serde(rename = "newLocation")]
    pub new_location: String,
    /// Ordered text edits, applied top to bottom
    #[serde(default)]
    pub steps: Vec<EditJudgment>,
}

/// One exact-string edit
#[derive(Debug, Clone, Deserialize)]
pub struct EditJudgment {
    /// Text to find
    #[serde(rename = "oldCode")]
    pub old_code: String,
    /// Replacement text
    #[serde(rename = "newCode")]
    pub new_code: String,
}

/// Response to `dependency-update`
#[derive(Debug, Clone, Deserialize)]
pub struct DependencyUpdateJudgment {
    /// Substitution groups
    #[serde(default)]
    pub updates: Vec<UpdateJudgment>,
}

/// One substitution group
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateJudgment {
    /// Substitutions spelled `old ->> new`
    #[serde(default, rename = "codeChanges")]
    pub code_changes: Vec<String>,
}

/// Parse an `identify-bounded-contexts` response
///
/// # Errors
/// [`OracleError::MalformedJudgment`] on shape violations, including an
/// empty context list: an empty decomposition is a visible failure, never
/// a silent success.
pub fn parse_contexts(raw: &str) -> Result<ContextsJudgment, OracleError> {
    let judgment: ContextsJudgment = parse_json(raw)?;
    if judgment.bounded_contexts.is_empty() {
        return Err(OracleError::malformed("no bounded contexts in judgment", raw));
    }
    Ok(judgment)
}

/// Parse a `microservice-candidate-design` response
///
/// # Errors
/// [`OracleError::MalformedJudgment`] on shape violations.
pub fn parse_candidate(raw: &str) -> Result<CandidateJudgment, OracleError> {
    parse_json(raw)
}

/// Parse a `refactor-class` response
///
/// # Errors
/// [`OracleError::MalformedJudgment`] on shape violations, including an
/// empty target location.
pub fn parse_refactor(raw: &str) -> Result<RefactorJudgment, OracleError> {
    let judgment: RefactorJudgment = parse_json(raw)?;
    if judgment.refactoring.new_location.trim().is_empty() {
        return Err(OracleError::malformed("empty target location", raw));
    }
    Ok(judgment)
}

/// Parse a `dependency-update` response
///
/// # Errors
/// [`OracleError::MalformedJudgment`] on shape violations.
pub fn parse_dependency_update(raw: &str) -> Result<DependencyUpdateJudgment, OracleError> {
    parse_json(raw)
}

fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, OracleError> {
    serde_json::from_str(strip_fences(raw))
        .map_err(|err| OracleError::malformed(err.to_string(), raw))
}

/// Tolerate a response wrapped in a markdown code fence
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
