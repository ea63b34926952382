//! Microservice candidate synthesis
//!
//! Each bounded context is judged independently and concurrently. Failure is
//! isolated per context: the stage always waits for every outstanding
//! judgment and returns the complete success/failure partition, never
//! failing fast and never discarding completed siblings.

use crate::error::{ContextFailure, CoreError};
use crate::types::{BoundedContext, MicroserviceCandidate};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use strangler_oracle::judgment::{self, MicroserviceJudgment};
use strangler_oracle::{Oracle, OracleError, OracleRequest, TemplateId};

/// Turns bounded contexts into microservice candidates
#[derive(Debug)]
pub struct CandidateSynthesizer {
    oracle: Arc<dyn Oracle>,
    max_concurrent: usize,
}

impl CandidateSynthesizer {
    /// Create a synthesizer over the given oracle
    #[inline]
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            max_concurrent: 8,
        }
    }

    /// With a judgment concurrency width
    #[inline]
    #[must_use]
    pub fn with_max_concurrent(mut self, width: usize) -> Self {
        self.max_concurrent = width.max(1);
        self
    }

    /// Generate one candidate per context
    ///
    /// # Errors
    /// Returns [`CoreError::PartialSynthesis`] when any context failed,
    /// carrying both the candidates that succeeded and the per-context
    /// failure reasons.
    pub async fn generate(
        &self,
        contexts: Vec<BoundedContext>,
    ) -> Result<Vec<MicroserviceCandidate>, CoreError> {
        let total = contexts.len();
        let outcomes: Vec<Result<MicroserviceCandidate, ContextFailure>> =
            stream::iter(contexts.into_iter().map(|context| self.design(context)))
                .buffered(self.max_concurrent)
                .collect()
                .await;

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(candidate) => succeeded.push(candidate),
                Err(failure) => failed.push(failure),
            }
        }

        tracing::info!(
            succeeded = succeeded.len(),
            failed = failed.len(),
            total,
            "candidate synthesis complete"
        );
        if failed.is_empty() {
            Ok(succeeded)
        } else {
            Err(CoreError::PartialSynthesis { succeeded, failed })
        }
    }

    /// Derive candidates structurally, without an oracle
    ///
    /// Used in offline mode: each context becomes a service named after it
    /// with one API path and empty operation sets.
    #[must_use]
    pub fn derive_offline(contexts: Vec<BoundedContext>) -> Vec<MicroserviceCandidate> {
        contexts
            .into_iter()
            .map(|context| {
                let name = default_service_name(context.name());
                let mut candidate = MicroserviceCandidate::new(name.clone(), context);
                candidate.add_api(format!("/api/{}", route_segment(&name)));
                candidate
            })
            .collect()
    }

    async fn design(
        &self,
        context: BoundedContext,
    ) -> Result<MicroserviceCandidate, ContextFailure> {
        let name = context.name().to_string();
        let context_json = serde_json::to_string(&context).map_err(|err| {
            ContextFailure::new(&name, OracleError::Config(format!("serialize context: {err}")))
        })?;
        let request = OracleRequest::new(TemplateId::MicroserviceCandidateDesign)
            .with_var("boundedContext", context_json);

        let raw = self
            .oracle
            .judge(request)
            .await
            .map_err(|err| ContextFailure::new(&name, err))?;
        let proposed =
            judgment::parse_candidate(&raw).map_err(|err| ContextFailure::new(&name, err))?;

        Ok(convert(proposed.microservice, context))
    }
}

/// Build the candidate from a validated judgment
///
/// API paths deduplicate into the set; interactions classify closed
/// (exactly `COMMAND` makes a command, everything else a query).
fn convert(proposed: MicroserviceJudgment, context: BoundedContext) -> MicroserviceCandidate {
    let name = proposed
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| default_service_name(context.name()));

    let mut candidate = MicroserviceCandidate::new(name, context);
    for api in proposed.apis {
        candidate.add_api(api.path);
    }
    for interaction in proposed.events {
        if interaction.is_command() {
            candidate.record_command(interaction.name);
        } else {
            candidate.record_query(interaction.name);
        }
    }
    for dependency in proposed.dependencies {
        candidate.require(dependency);
    }
    candidate
}

/// Service name derived from a context name: lower-kebab plus `-service`
pub(crate) fn default_service_name(context: &str) -> String {
    let kebab: String = context
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let kebab = kebab.trim_matches('-').to_string();
    if kebab.ends_with("-service") {
        kebab
    } else {
        format!("{kebab}-service")
    }
}

/// Route segment for a service: its name without the `-service` suffix
pub(crate) fn route_segment(service: &str) -> String {
    service
        .strip_suffix("-service")
        .unwrap_or(service)
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DomainRole;
    use pretty_assertions::assert_eq;
    use strangler_oracle::judgment::{ApiJudgment, InteractionJudgment};

    fn orders_context() -> BoundedContext {
        let mut ctx = BoundedContext::new("Orders", "order lifecycle");
        ctx.assign("Order", DomainRole::AggregateRoot).unwrap();
        ctx
    }

    #[test]
    fn convert_classifies_closed_and_dedupes_apis() {
        let proposed = MicroserviceJudgment {
            name: Some("order-service".into()),
            apis: vec![
                ApiJudgment { path: "/api/orders".into() },
                ApiJudgment { path: "/api/orders".into() },
                ApiJudgment { path: "/api/orders/{id}".into() },
            ],
            events: vec![
                InteractionJudgment { name: "PlaceOrder".into(), kind: "COMMAND".into() },
                InteractionJudgment { name: "GetOrder".into(), kind: "QUERY".into() },
                InteractionJudgment { name: "ListOrders".into(), kind: String::new() },
            ],
            dependencies: vec!["catalog-service".into()],
        };

        let candidate = convert(proposed, orders_context());
        assert_eq!(candidate.apis().len(), 2);
        assert_eq!(candidate.commands().len(), 1);
        assert_eq!(candidate.queries().len(), 2);
        assert_eq!(candidate.required_services(), ["catalog-service"]);
    }

    #[test]
    fn missing_name_derives_from_context() {
        let proposed = MicroserviceJudgment {
            name: None,
            apis: vec![],
            events: vec![],
            dependencies: vec![],
        };
        let candidate = convert(proposed, orders_context());
        assert_eq!(candidate.name(), "orders-service");
    }

    #[test]
    fn default_service_name_is_lower_kebab() {
        assert_eq!(default_service_name("Orders"), "orders-service");
        assert_eq!(default_service_name("Order Management"), "order-management-service");
        assert_eq!(default_service_name("billing-service"), "billing-service");
        assert_eq!(default_service_name("com.shop.orders"), "com-shop-orders-service");
    }

    #[test]
    fn route_segment_strips_the_suffix() {
        assert_eq!(route_segment("order-service"), "order");
        assert_eq!(route_segment("Catalog"), "catalog");
    }

    #[test]
    fn derive_offline_exposes_one_route_per_context() {
        let candidates = CandidateSynthesizer::derive_offline(vec![orders_context()]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name(), "orders-service");
        assert!(candidates[0].apis().contains("/api/orders"));
    }
}
