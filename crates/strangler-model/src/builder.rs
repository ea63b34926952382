//! Structural model assembly
//!
//! Walks a source tree, hands each file to the external parser, and folds
//! the per-file results into an immutable [`StructuralModel`]. Traversal is
//! a pure fold: each file produces an independent `FileFacts` value and the
//! builder alone merges them, so reruns on an unchanged tree yield identical
//! collections.

use crate::error::{ModelError, ParseWarning};
use crate::facts::{
    qualify, ClassFact, DependencyEdge, DependencyKind, DependencyTarget, PackageInfo,
};
use crate::id::ClassId;
use crate::model::StructuralModel;
use crate::parser::{FileFacts, RawClass, SourceParser};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Builds a [`StructuralModel`] from a source tree
///
/// Files whose parse fails are skipped with a recorded warning; the run
/// continues and returns partial results.
#[derive(Debug, Default)]
pub struct ModelBuilder;

impl ModelBuilder {
    /// Create a new builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the model for the tree rooted at `root`
    ///
    /// # Errors
    /// Returns [`ModelError::SourceRoot`] when the root cannot be walked at
    /// all, and [`ModelError::DuplicateClass`] when two declarations share a
    /// qualified name. Per-file failures are warnings, not errors.
    pub fn build(
        &self,
        root: &Path,
        parser: &dyn SourceParser,
    ) -> Result<StructuralModel, ModelError> {
        let files = collect_files(root)?;
        tracing::debug!(root = %root.display(), files = files.len(), "walking source tree");

        let mut warnings = Vec::new();
        let mut facts = Vec::new();
        for path in files {
            if !parser.handles(&path) {
                continue;
            }
            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping unreadable file");
                    warnings.push(ParseWarning::new(path, err.to_string()));
                    continue;
                }
            };
            match parser.parse(&path, &source) {
                Ok(file_facts) => facts.push(file_facts),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping unparsable file");
                    warnings.push(ParseWarning::new(path, err.message));
                }
            }
        }

        let model = assemble(facts, warnings)?;
        tracing::info!(
            classes = model.len(),
            packages = model.packages().len(),
            edges = model.dependencies().len(),
            skipped = model.warnings().len(),
            "structural model built"
        );
        Ok(model)
    }
}

/// Recursively collect regular files under `root`, sorted by path
fn collect_files(root: &Path) -> Result<Vec<PathBuf>, ModelError> {
    fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                walk(&path, out)?;
            } else {
                out.push(path);
            }
        }
        Ok(())
    }

    let mut files = Vec::new();
    walk(root, &mut files).map_err(|source| ModelError::SourceRoot {
        path: root.to_path_buf(),
        source,
    })?;
    files.sort();
    Ok(files)
}

/// Fold per-file facts into the model
fn assemble(
    file_facts: Vec<FileFacts>,
    warnings: Vec<ParseWarning>,
) -> Result<StructuralModel, ModelError> {
    let mut classes: Vec<ClassFact> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut packages: IndexMap<String, PackageInfo> = IndexMap::new();

    for raw in file_facts.into_iter().flat_map(|f| f.classes) {
        let qualified = qualify(&raw.package, &raw.name);
        let id = ClassId::of(&qualified);
        if !seen.insert(qualified.clone()) {
            return Err(ModelError::DuplicateClass {
                qualified_name: qualified,
            });
        }
        if !raw.package.is_empty() {
            packages
                .entry(raw.package.clone())
                .or_insert_with(|| PackageInfo::new(&raw.package))
                .classes
                .push(id);
        }
        classes.push(to_fact(id, raw));
    }

    let dependencies = derive_edges(&classes);
    Ok(StructuralModel::new(
        classes,
        packages.into_values().collect(),
        dependencies,
        warnings,
    ))
}

fn to_fact(id: ClassId, raw: RawClass) -> ClassFact {
    ClassFact {
        id,
        name: raw.name,
        package: raw.package,
        methods: raw.methods,
        fields: raw.fields,
        annotations: raw.annotations,
        supertypes: raw.supertypes,
        field_types: raw.field_types,
    }
}

/// Derive dependency edges structurally from each class declaration
///
/// Supertypes yield `Inheritance`; fields yield `Composition` when final,
/// else `Aggregation`. Edges to undeclared types keep the spelled name.
/// Duplicate (source, target) pairs with different kinds are preserved.
fn derive_edges(classes: &[ClassFact]) -> Vec<DependencyEdge> {
    let resolver = Resolver::new(classes);
    let mut edges = Vec::new();

    for class in classes {
        for supertype in &class.supertypes {
            edges.push(DependencyEdge {
                source: class.id,
                target: resolver.resolve(supertype, &class.package),
                kind: DependencyKind::Inheritance,
            });
        }
        for field in &class.field_types {
            let kind = if field.is_final {
                DependencyKind::Composition
            } else {
                DependencyKind::Aggregation
            };
            edges.push(DependencyEdge {
                source: class.id,
                target: resolver.resolve(&field.type_name, &class.package),
                kind,
            });
        }
    }
    edges
}

/// Resolves spelled type names to declared classes
///
/// Resolution order: qualified name as spelled, then the referencing class's
/// own package, then a unique simple-name match anywhere in the model.
/// Ambiguous or unknown names stay external.
struct Resolver {
    by_qualified: HashMap<String, ClassId>,
    by_simple: HashMap<String, Vec<ClassId>>,
}

impl Resolver {
    fn new(classes: &[ClassFact]) -> Self {
        let mut by_qualified = HashMap::new();
        let mut by_simple: HashMap<String, Vec<ClassId>> = HashMap::new();
        for class in classes {
            by_qualified.insert(class.qualified_name(), class.id);
            by_simple.entry(class.name.clone()).or_default().push(class.id);
        }
        Self {
            by_qualified,
            by_simple,
        }
    }

    fn resolve(&self, spelled: &str, source_package: &str) -> DependencyTarget {
        if spelled.contains('.') {
            return match self.by_qualified.get(spelled) {
                Some(id) => DependencyTarget::Resolved(*id),
                None => DependencyTarget::External(spelled.to_string()),
            };
        }
        if let Some(id) = self.by_qualified.get(&qualify(source_package, spelled)) {
            return DependencyTarget::Resolved(*id);
        }
        match self.by_simple.get(spelled) {
            Some(ids) if ids.len() == 1 => DependencyTarget::Resolved(ids[0]),
            _ => DependencyTarget::External(spelled.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::FieldType;
    use crate::parser::ParseFailure;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    /// Line-oriented fixture parser: `package`, `class`, `final-field`,
    /// `field`, `method` directives, one per line.
    struct StubParser;

    impl SourceParser for StubParser {
        fn handles(&self, path: &Path) -> bool {
            path.extension().is_some_and(|ext| ext == "stub")
        }

        fn parse(&self, _path: &Path, source: &str) -> Result<FileFacts, ParseFailure> {
            let mut package = String::new();
            let mut classes: Vec<RawClass> = Vec::new();
            for line in source.lines().map(str::trim).filter(|l| !l.is_empty()) {
                let mut words = line.split_whitespace();
                match words.next() {
                    Some("package") => package = words.next().unwrap_or("").to_string(),
                    Some("class") => {
                        let name = words.next().ok_or_else(|| ParseFailure::new("class without name"))?;
                        let mut class = RawClass {
                            name: name.to_string(),
                            package: package.clone(),
                            ..RawClass::default()
                        };
                        if words.next() == Some("extends") {
                            class.supertypes.extend(words.map(String::from));
                        }
                        classes.push(class);
                    }
                    Some(kind @ ("field" | "final-field")) => {
                        let class = classes
                            .last_mut()
                            .ok_or_else(|| ParseFailure::new("field before class"))?;
                        let type_name = words.next().unwrap_or("Object").to_string();
                        let field_name = words.next().unwrap_or("value").to_string();
                        class.fields.push(field_name);
                        class.field_types.push(FieldType {
                            type_name,
                            is_final: kind == "final-field",
                        });
                    }
                    Some("method") => {
                        let class = classes
                            .last_mut()
                            .ok_or_else(|| ParseFailure::new("method before class"))?;
                        class.methods.push(words.next().unwrap_or("run").to_string());
                    }
                    Some(other) => return Err(ParseFailure::new(format!("unknown directive {other}"))),
                    None => {}
                }
            }
            Ok(FileFacts { classes })
        }
    }

    fn write_tree(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn derives_edge_kinds_from_declarations() {
        let dir = write_tree(&[(
            "shop/Order.stub",
            "package com.shop\n\
             class Order extends BaseEntity\n\
             final-field Money total\n\
             field Customer customer\n\
             method submit\n\
             class Money\n\
             class Customer\n",
        )]);
        let model = ModelBuilder::new().build(dir.path(), &StubParser).unwrap();

        let order = model.classes().iter().find(|c| c.name == "Order").unwrap();
        let kinds: Vec<_> = model
            .dependencies()
            .iter()
            .filter(|e| e.source == order.id)
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                DependencyKind::Inheritance,
                DependencyKind::Composition,
                DependencyKind::Aggregation,
            ]
        );
    }

    #[test]
    fn unresolved_targets_stay_external() {
        let dir = write_tree(&[(
            "Order.stub",
            "package com.shop\nclass Order extends BaseEntity\n",
        )]);
        let model = ModelBuilder::new().build(dir.path(), &StubParser).unwrap();
        assert_eq!(
            model.dependencies()[0].target,
            DependencyTarget::External("BaseEntity".into())
        );
    }

    #[test]
    fn same_package_resolution_wins_over_simple_name() {
        let dir = write_tree(&[
            ("a/Order.stub", "package com.a\nclass Order\nfield Line line\nclass Line\n"),
            ("b/Line.stub", "package com.b\nclass Line\n"),
        ]);
        let model = ModelBuilder::new().build(dir.path(), &StubParser).unwrap();
        let line_a = ClassId::of("com.a.Line");
        let edge = model
            .dependencies()
            .iter()
            .find(|e| e.kind == DependencyKind::Aggregation)
            .unwrap();
        assert_eq!(edge.target, DependencyTarget::Resolved(line_a));
    }

    #[test]
    fn unparsable_file_is_skipped_with_warning() {
        let dir = write_tree(&[
            ("Good.stub", "package com.shop\nclass Good\n"),
            ("Bad.stub", "garbage directive\n"),
        ]);
        let model = ModelBuilder::new().build(dir.path(), &StubParser).unwrap();
        assert_eq!(model.len(), 1);
        assert_eq!(model.warnings().len(), 1);
        assert!(model.warnings()[0].path.ends_with("Bad.stub"));
    }

    #[test]
    fn duplicate_qualified_name_is_an_error() {
        let dir = write_tree(&[
            ("a/Order.stub", "package com.shop\nclass Order\n"),
            ("b/Order.stub", "package com.shop\nclass Order\n"),
        ]);
        let err = ModelBuilder::new().build(dir.path(), &StubParser).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateClass { ref qualified_name }
            if qualified_name == "com.shop.Order"));
    }

    #[test]
    fn packages_materialize_only_with_classes() {
        let dir = write_tree(&[
            ("Order.stub", "package com.shop.orders\nclass Order\n"),
            ("notes.txt", "not source"),
        ]);
        let model = ModelBuilder::new().build(dir.path(), &StubParser).unwrap();
        assert_eq!(model.packages().len(), 1);
        assert_eq!(model.packages()[0].name, "com.shop.orders");
        assert_eq!(model.packages()[0].classes.len(), 1);
    }

    #[test]
    fn rebuild_on_unchanged_tree_is_identical() {
        let dir = write_tree(&[
            ("a/Order.stub", "package com.a\nclass Order\nfield Line line\n"),
            ("b/Line.stub", "package com.b\nclass Line\nmethod total\n"),
        ]);
        let builder = ModelBuilder::new();
        let first = builder.build(dir.path(), &StubParser).unwrap();
        let second = builder.build(dir.path(), &StubParser).unwrap();
        assert_eq!(first.classes(), second.classes());
        assert_eq!(first.dependencies(), second.dependencies());
        assert_eq!(first.packages(), second.packages());
    }
}
