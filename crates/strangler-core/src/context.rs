//! Bounded context synthesis
//!
//! Serializes the structural model's class list into a judgment request,
//! validates the oracle's proposed decomposition against the model, and
//! degrades to a per-package structural decomposition when no oracle is
//! available. The oracle is advisory: unknown class names are dropped with
//! warnings, but a failed or unparsable judgment is surfaced to the caller,
//! since an empty or fabricated decomposition would poison everything
//! downstream.

use crate::error::CoreError;
use crate::types::{BoundedContext, DomainEvent, DomainRole};
use std::collections::HashMap;
use std::sync::Arc;
use strangler_model::StructuralModel;
use strangler_oracle::judgment::{self, ContextJudgment};
use strangler_oracle::{Oracle, OracleRequest, TemplateId};

/// Groups classes into bounded contexts
#[derive(Debug)]
pub struct ContextSynthesizer {
    oracle: Option<Arc<dyn Oracle>>,
}

impl ContextSynthesizer {
    /// Create an oracle-driven synthesizer
    #[inline]
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle: Some(oracle),
        }
    }

    /// Create a synthesizer without an oracle
    ///
    /// [`ContextSynthesizer::identify`] then always takes the structural
    /// fallback path.
    #[inline]
    #[must_use]
    pub fn offline() -> Self {
        Self { oracle: None }
    }

    /// Identify bounded contexts for the model's classes
    ///
    /// # Errors
    /// Surfaces oracle transport failures and schema violations unchanged.
    /// Never fabricates a decomposition on oracle failure.
    pub async fn identify(&self, model: &StructuralModel) -> Result<Vec<BoundedContext>, CoreError> {
        match &self.oracle {
            Some(oracle) => self.identify_judged(oracle.as_ref(), model).await,
            None => {
                tracing::info!("no oracle configured, using per-package decomposition");
                Ok(Self::identify_offline(model))
            }
        }
    }

    async fn identify_judged(
        &self,
        oracle: &dyn Oracle,
        model: &StructuralModel,
    ) -> Result<Vec<BoundedContext>, CoreError> {
        let classes_json = serde_json::to_string(model.classes())?;
        let request = OracleRequest::new(TemplateId::IdentifyBoundedContexts)
            .with_var("classes", classes_json);

        let raw = oracle.judge(request).await?;
        let proposed = judgment::parse_contexts(&raw)?;

        let contexts = validate(proposed.bounded_contexts, model);
        tracing::info!(contexts = contexts.len(), "bounded contexts identified");
        Ok(contexts)
    }

    /// Structural fallback: one bounded context per package
    ///
    /// Each context is named after its package and contains exactly the
    /// classes physically located there, classified as services. Keeps the
    /// pipeline runnable and testable without live oracle access.
    #[must_use]
    pub fn identify_offline(model: &StructuralModel) -> Vec<BoundedContext> {
        let mut contexts = Vec::new();
        for package in model.packages() {
            let mut context = BoundedContext::new(
                package.name.clone(),
                format!("Classes in package {}", package.name),
            );
            for class in model.classes_in_package(&package.name) {
                // Same package, so names cannot collide.
                let _ = context.assign(class.name.clone(), DomainRole::Service);
            }
            contexts.push(context);
        }
        contexts
    }
}

/// Validate a proposed decomposition against the structural model
///
/// Unknown class names are dropped with a warning, role conflicts keep the
/// first assignment, and contexts left with no classes are discarded.
/// Cross-context duplicates are tolerated with a warning, since source data
/// may be noisy.
fn validate(proposed: Vec<ContextJudgment>, model: &StructuralModel) -> Vec<BoundedContext> {
    let mut assigned_elsewhere: HashMap<String, String> = HashMap::new();
    let mut contexts = Vec::new();

    for ctx in proposed {
        let mut context = BoundedContext::new(ctx.name.clone(), ctx.description);
        let role_sets = [
            (ctx.aggregate_roots, DomainRole::AggregateRoot),
            (ctx.entities, DomainRole::Entity),
            (ctx.value_objects, DomainRole::ValueObject),
            (ctx.repositories, DomainRole::Repository),
            (ctx.services, DomainRole::Service),
        ];

        for (names, role) in role_sets {
            for class in names {
                if !model.is_known_name(&class) {
                    tracing::warn!(context = %ctx.name, %class,
                        "judgment references unknown class, dropping");
                    continue;
                }
                if let Some(other) = assigned_elsewhere.get(&class) {
                    if other != &ctx.name {
                        tracing::warn!(%class, first = %other, second = %ctx.name,
                            "class appears in multiple contexts");
                    }
                }
                match context.assign(class.clone(), role) {
                    Ok(()) => {
                        assigned_elsewhere.entry(class).or_insert_with(|| ctx.name.clone());
                    }
                    Err(err) => {
                        tracing::warn!(%err, "conflicting role assignment, keeping first");
                    }
                }
            }
        }

        for event in ctx.relationships {
            if !event.aggregate_root.is_empty() && !model.is_known_name(&event.aggregate_root) {
                tracing::warn!(context = %ctx.name, event = %event.name,
                    aggregate = %event.aggregate_root,
                    "event owned by unknown aggregate, dropping");
                continue;
            }
            context.push_event(DomainEvent {
                name: event.name,
                aggregate_root: event.aggregate_root,
                payload: event.payload,
            });
        }

        if context.is_unpopulated() {
            tracing::warn!(context = %context.name(), "no classes survived validation, dropping context");
            continue;
        }
        contexts.push(context);
    }

    contexts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strangler_oracle::judgment::EventJudgment;

    fn model_with(names: &[(&str, &str)]) -> StructuralModel {
        strangler_test_utils::model_from_classes(names)
    }

    fn proposal(name: &str) -> ContextJudgment {
        ContextJudgment {
            name: name.to_string(),
            description: String::new(),
            aggregate_roots: vec![],
            entities: vec![],
            value_objects: vec![],
            repositories: vec![],
            services: vec![],
            relationships: vec![],
        }
    }

    #[test]
    fn unknown_names_are_dropped_not_fatal() {
        let model = model_with(&[("com.shop", "Order")]);
        let mut ctx = proposal("Orders");
        ctx.aggregate_roots = vec!["Order".into(), "Phantom".into()];

        let contexts = validate(vec![ctx], &model);
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].aggregate_roots().len(), 1);
        assert!(contexts[0].aggregate_roots().contains("Order"));
    }

    #[test]
    fn conflicting_roles_keep_first_assignment() {
        let model = model_with(&[("com.shop", "Order")]);
        let mut ctx = proposal("Orders");
        ctx.aggregate_roots = vec!["Order".into()];
        ctx.entities = vec!["Order".into()];

        let contexts = validate(vec![ctx], &model);
        assert_eq!(contexts[0].role_of("Order"), Some(DomainRole::AggregateRoot));
        assert!(contexts[0].entities().is_empty());
    }

    #[test]
    fn cross_context_duplicates_are_tolerated() {
        let model = model_with(&[("com.shop", "Order")]);
        let mut first = proposal("Orders");
        first.aggregate_roots = vec!["Order".into()];
        let mut second = proposal("Billing");
        second.entities = vec!["Order".into()];

        let contexts = validate(vec![first, second], &model);
        assert_eq!(contexts.len(), 2);
        assert!(contexts[0].aggregate_roots().contains("Order"));
        assert!(contexts[1].entities().contains("Order"));
    }

    #[test]
    fn fully_unknown_context_is_discarded() {
        let model = model_with(&[("com.shop", "Order")]);
        let mut ctx = proposal("Ghosts");
        ctx.services = vec!["Phantom".into()];
        assert!(validate(vec![ctx], &model).is_empty());
    }

    #[test]
    fn events_with_unknown_aggregates_are_dropped() {
        let model = model_with(&[("com.shop", "Order")]);
        let mut ctx = proposal("Orders");
        ctx.aggregate_roots = vec!["Order".into()];
        ctx.relationships = vec![
            EventJudgment {
                name: "OrderPlaced".into(),
                aggregate_root: "Order".into(),
                payload: vec!["orderId".into()],
            },
            EventJudgment {
                name: "GhostSeen".into(),
                aggregate_root: "Phantom".into(),
                payload: vec![],
            },
        ];

        let contexts = validate(vec![ctx], &model);
        assert_eq!(contexts[0].domain_events().len(), 1);
        assert_eq!(contexts[0].domain_events()[0].name, "OrderPlaced");
    }

    #[test]
    fn offline_fallback_is_one_context_per_package() {
        let model = model_with(&[
            ("com.shop.orders", "Order"),
            ("com.shop.orders", "OrderLine"),
            ("com.shop.catalog", "Product"),
        ]);
        let contexts = ContextSynthesizer::identify_offline(&model);
        assert_eq!(contexts.len(), 2);

        let orders = contexts.iter().find(|c| c.name() == "com.shop.orders").unwrap();
        assert_eq!(orders.services().len(), 2);
        let catalog = contexts.iter().find(|c| c.name() == "com.shop.catalog").unwrap();
        assert!(catalog.services().contains("Product"));
    }
}
