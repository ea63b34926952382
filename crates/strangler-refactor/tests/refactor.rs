//! Refactor orchestrator scenarios over a scripted oracle

use std::path::Path;
use std::sync::Arc;
use strangler_core::{BoundedContext, DomainRole, MicroserviceCandidate};
use strangler_oracle::TemplateId;
use strangler_refactor::{
    FileFailureReason, RefactorError, RefactorOptions, RefactorOrchestrator,
};
use strangler_test_utils::{init_test_tracing, java_source, write_tree, ScriptedOracle};

fn order_candidate(classes: &[(&str, DomainRole)]) -> MicroserviceCandidate {
    let mut ctx = BoundedContext::new("Orders", "order lifecycle");
    for (class, role) in classes {
        ctx.assign(*class, *role).unwrap();
    }
    MicroserviceCandidate::new("order-service", ctx)
}

/// Scripts a move plan that rewrites the package declaration, and malformed
/// output for any class named in `broken`.
fn script_moves(oracle: &ScriptedOracle, broken: &'static [&'static str]) {
    oracle.respond_with(TemplateId::RefactorClass, move |vars| {
        let source = vars.get("sourceCode").cloned().unwrap_or_default();
        let name = ["OrderRepository", "OrderLine", "Order"]
            .iter()
            .find(|n| source.contains(&format!("class {n} ")))
            .expect("fixture class name");
        if broken.contains(name) {
            return Ok("definitely not json".to_string());
        }
        Ok(format!(
            r#"{{"refactoring": {{
                "newLocation": "src/main/java/com/orders/{name}.java",
                "steps": [{{"oldCode": "package com.shop;", "newCode": "package com.orders;"}}]
            }}}}"#
        ))
    });
}

fn script_no_reference_updates(oracle: &ScriptedOracle) {
    oracle.respond_with(TemplateId::DependencyUpdate, |_| {
        Ok(r#"{"updates": []}"#.to_string())
    });
}

fn write_order_monolith(root: &Path, classes: &[&str]) {
    let files: Vec<(String, String)> = classes
        .iter()
        .map(|name| {
            (
                format!("com/shop/{name}.java"),
                java_source("com.shop", name, &["java.util.List"], ""),
            )
        })
        .collect();
    let pairs: Vec<(&str, &str)> = files
        .iter()
        .map(|(p, c)| (p.as_str(), c.as_str()))
        .collect();
    write_tree(root, &pairs);
}

#[tokio::test]
async fn malformed_file_fails_alone_and_siblings_land_on_disk() {
    init_test_tracing();
    let monolith = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    write_order_monolith(monolith.path(), &["Order", "OrderLine", "OrderRepository"]);

    let oracle = ScriptedOracle::new();
    script_moves(&oracle, &["OrderLine"]);
    script_no_reference_updates(&oracle);

    let candidate = order_candidate(&[
        ("Order", DomainRole::AggregateRoot),
        ("OrderLine", DomainRole::Entity),
        ("OrderRepository", DomainRole::Repository),
    ]);
    let orchestrator = RefactorOrchestrator::new(Arc::new(oracle));
    let err = orchestrator
        .refactor(monolith.path(), &candidate, target.path())
        .await
        .unwrap_err();

    let RefactorError::Partial(partial) = err else {
        panic!("expected partial failure");
    };
    assert_eq!(partial.moved.len(), 2);
    assert_eq!(partial.failed.len(), 1);
    assert!(partial.failed[0].path.ends_with("OrderLine.java"));
    assert!(matches!(
        partial.failed[0].reason,
        FileFailureReason::Oracle(_)
    ));

    let moved_dir = target.path().join("src/main/java/com/orders");
    for name in ["Order.java", "OrderRepository.java"] {
        let content = std::fs::read_to_string(moved_dir.join(name)).unwrap();
        assert!(content.contains("package com.orders;"), "{name} not rewritten");
    }
    assert!(!moved_dir.join("OrderLine.java").exists());

    // Originals stay in place: rollback is delete-target-keep-original.
    assert!(monolith.path().join("com/shop/Order.java").exists());
}

#[tokio::test]
async fn propagation_rewrites_references_after_moves() {
    let monolith = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    write_tree(
        monolith.path(),
        &[(
            "com/shop/Order.java",
            &java_source("com.shop", "Order", &["com.shop.catalog.Product"], ""),
        )],
    );

    let oracle = ScriptedOracle::new();
    script_moves(&oracle, &[]);
    oracle.respond_with(TemplateId::DependencyUpdate, |vars| {
        // The pass hands over exactly the import lines of the moved content.
        assert!(vars["originalDependencies"].contains("import com.shop.catalog.Product;"));
        Ok(r#"{"updates": [{"codeChanges": ["com.shop.catalog.Product ->> com.catalog.Product"]}]}"#
            .to_string())
    });

    let candidate = order_candidate(&[("Order", DomainRole::AggregateRoot)]);
    let orchestrator = RefactorOrchestrator::new(Arc::new(oracle));
    let outcome = orchestrator
        .refactor(monolith.path(), &candidate, target.path())
        .await
        .unwrap();

    assert_eq!(outcome.moved.len(), 1);
    let content = std::fs::read_to_string(&outcome.moved[0]).unwrap();
    assert!(content.contains("import com.catalog.Product;"));
    assert!(!content.contains("com.shop.catalog.Product"));

    let source = monolith.path().join("com/shop/Order.java");
    assert_eq!(
        outcome.old_to_new.get(&source).map(|t| t.value().clone()),
        Some(outcome.moved[0].clone())
    );
}

#[tokio::test]
async fn rerunning_a_move_overwrites_the_same_target() {
    let monolith = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    write_order_monolith(monolith.path(), &["Order"]);

    let oracle = Arc::new(ScriptedOracle::new());
    script_moves(&oracle, &[]);
    script_no_reference_updates(&oracle);

    let candidate = order_candidate(&[("Order", DomainRole::AggregateRoot)]);
    let orchestrator = RefactorOrchestrator::new(Arc::clone(&oracle) as Arc<dyn strangler_oracle::Oracle>);

    let first = orchestrator
        .refactor(monolith.path(), &candidate, target.path())
        .await
        .unwrap();
    let second = orchestrator
        .refactor(monolith.path(), &candidate, target.path())
        .await
        .unwrap();

    assert_eq!(first.moved, second.moved);
    assert!(first.moved[0].exists());
}

#[tokio::test]
async fn remove_original_deletes_sources_after_move() {
    let monolith = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    write_order_monolith(monolith.path(), &["Order"]);

    let oracle = ScriptedOracle::new();
    script_moves(&oracle, &[]);
    script_no_reference_updates(&oracle);

    let candidate = order_candidate(&[("Order", DomainRole::AggregateRoot)]);
    let orchestrator = RefactorOrchestrator::new(Arc::new(oracle))
        .with_options(RefactorOptions::new().with_remove_original());

    orchestrator
        .refactor(monolith.path(), &candidate, target.path())
        .await
        .unwrap();

    assert!(!monolith.path().join("com/shop/Order.java").exists());
    assert!(target
        .path()
        .join("src/main/java/com/orders/Order.java")
        .exists());
}

#[tokio::test]
async fn skipping_reference_updates_leaves_moved_content_untouched() {
    let monolith = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    write_tree(
        monolith.path(),
        &[(
            "com/shop/Order.java",
            &java_source("com.shop", "Order", &["com.shop.catalog.Product"], ""),
        )],
    );

    let oracle = ScriptedOracle::new();
    script_moves(&oracle, &[]);
    // No dependency-update script: the pass must not run at all.

    let candidate = order_candidate(&[("Order", DomainRole::AggregateRoot)]);
    let orchestrator = RefactorOrchestrator::new(Arc::new(oracle))
        .with_options(RefactorOptions::new().without_reference_updates());

    let outcome = orchestrator
        .refactor(monolith.path(), &candidate, target.path())
        .await
        .unwrap();
    let content = std::fs::read_to_string(&outcome.moved[0]).unwrap();
    assert!(content.contains("import com.shop.catalog.Product;"));
}
