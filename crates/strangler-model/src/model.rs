//! The assembled structural model
//!
//! [`StructuralModel`] is the read-only resource that crosses pipeline
//! stages: downstream components look classes up by id or name but never
//! mutate the model.

use crate::error::ParseWarning;
use crate::facts::{ClassFact, DependencyEdge, PackageInfo};
use crate::id::ClassId;
use std::collections::HashMap;

/// Immutable structural facts about the monolith
///
/// Produced once per run by the builder; lookup maps are precomputed at
/// assembly time.
#[derive(Debug)]
pub struct StructuralModel {
    classes: Vec<ClassFact>,
    packages: Vec<PackageInfo>,
    dependencies: Vec<DependencyEdge>,
    warnings: Vec<ParseWarning>,
    by_id: HashMap<ClassId, usize>,
}

impl StructuralModel {
    pub(crate) fn new(
        classes: Vec<ClassFact>,
        packages: Vec<PackageInfo>,
        dependencies: Vec<DependencyEdge>,
        warnings: Vec<ParseWarning>,
    ) -> Self {
        let by_id = classes
            .iter()
            .enumerate()
            .map(|(idx, fact)| (fact.id, idx))
            .collect();
        Self {
            classes,
            packages,
            dependencies,
            warnings,
            by_id,
        }
    }

    /// All class facts, in deterministic (sorted-path, declaration) order
    #[inline]
    #[must_use]
    pub fn classes(&self) -> &[ClassFact] {
        &self.classes
    }

    /// All discovered packages (each owns at least one class)
    #[inline]
    #[must_use]
    pub fn packages(&self) -> &[PackageInfo] {
        &self.packages
    }

    /// All derived dependency edges
    #[inline]
    #[must_use]
    pub fn dependencies(&self) -> &[DependencyEdge] {
        &self.dependencies
    }

    /// Files skipped during assembly
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Look a class up by id
    #[inline]
    #[must_use]
    pub fn class(&self, id: ClassId) -> Option<&ClassFact> {
        self.by_id.get(&id).map(|idx| &self.classes[*idx])
    }

    /// Whether any declared class carries this simple name
    ///
    /// Oracle judgments reference classes by simple name; this is the
    /// validation hook for dropping unknown names.
    #[must_use]
    pub fn is_known_name(&self, simple_name: &str) -> bool {
        self.classes.iter().any(|c| c.name == simple_name)
    }

    /// Classes physically located in the named package
    pub fn classes_in_package<'a>(
        &'a self,
        package: &'a str,
    ) -> impl Iterator<Item = &'a ClassFact> + 'a {
        self.classes.iter().filter(move |c| c.package == package)
    }

    /// Number of declared classes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the model holds no classes at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
