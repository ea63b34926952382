//! Structural facts extracted from the monolith
//!
//! All types here are produced once per analysis run and immutable
//! thereafter. Rerunning the pipeline regenerates them from scratch.

use crate::id::ClassId;
use serde::Serialize;

/// Kind of a dependency edge between two classes
///
/// Derivation rule: an extended/implemented type yields `Inheritance`; a
/// field typed `T` yields `Composition` when the field is final, else
/// `Aggregation`. Field finality is a heuristic proxy for ownership
/// strength, kept unchanged from the source design. `Association` is
/// reserved for semantically-judged edges and is never derived structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DependencyKind {
    /// Supertype relationship (extends/implements)
    Inheritance,
    /// Final field of the target type
    Composition,
    /// Mutable field of the target type
    Aggregation,
    /// Semantic association (not structurally derived)
    Association,
}

/// A field declaration: spelled type plus finality
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldType {
    /// Type name as spelled in the declaration
    pub type_name: String,
    /// Whether the field is final (immutable binding)
    pub is_final: bool,
}

/// Immutable facts about one class declaration
///
/// Identity is the qualified name; no two `ClassFact`s may share one within
/// a single analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassFact {
    /// Stable id (hash of the qualified name)
    #[serde(skip)]
    pub id: ClassId,
    /// Simple class name
    pub name: String,
    /// Owning package ("" for the default package)
    #[serde(rename = "packageName")]
    pub package: String,
    /// Declared method names, in declaration order
    pub methods: Vec<String>,
    /// Declared field names, in declaration order
    pub fields: Vec<String>,
    /// Declared annotations
    pub annotations: Vec<String>,
    /// Extended/implemented type names
    #[serde(skip)]
    pub supertypes: Vec<String>,
    /// (field type, finality) pairs, in declaration order
    #[serde(skip)]
    pub field_types: Vec<FieldType>,
}

impl ClassFact {
    /// Qualified name of this class (`package.Name`)
    #[inline]
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualify(&self.package, &self.name)
    }
}

/// Join a package and simple name into a qualified name
#[inline]
#[must_use]
pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

/// Target of a dependency edge
///
/// The model does not require closure: edges to undeclared/external types
/// are valid leaves and keep the spelled name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyTarget {
    /// Target declared inside the analyzed tree
    Resolved(ClassId),
    /// Target not declared in the tree (external or unresolved)
    External(String),
}

/// A directed dependency between two classes
///
/// Multiple edges between the same pair with different kinds are legal and
/// preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Declaring class
    pub source: ClassId,
    /// Referenced class or external name
    pub target: DependencyTarget,
    /// Structural kind of the reference
    pub kind: DependencyKind,
}

/// A package discovered from class declarations
///
/// Packages with zero classes are never materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    /// Dotted package name
    pub name: String,
    /// Package name as a path (`com/shop/orders`)
    pub path: String,
    /// Classes physically located in this package
    pub classes: Vec<ClassId>,
}

impl PackageInfo {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.replace('.', "/"),
            classes: Vec::new(),
        }
    }
}
