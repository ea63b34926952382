//! Testing utilities for the strangler workspace
//!
//! Shared fixtures: a scripted oracle, a regex-grade Java declaration
//! scanner for fixture trees, and helpers for writing monolith trees to
//! disk and building structural models from them.

#![allow(missing_docs)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::path::Path;
use std::sync::Mutex;
use strangler_model::{
    FieldType, FileFacts, ModelBuilder, ParseFailure, RawClass, SourceParser, StructuralModel,
};
use strangler_oracle::{Oracle, OracleError, OracleRequest, TemplateId};

type Handler = Box<dyn Fn(&BTreeMap<String, String>) -> Result<String, OracleError> + Send + Sync>;

/// Oracle test double with scripted responses
///
/// Responses can be queued per template (consumed in order) or computed by a
/// per-template handler over the request variables. Handlers win over
/// queues. An unscripted template yields a transport failure naming it.
#[derive(Default)]
pub struct ScriptedOracle {
    queues: Mutex<HashMap<TemplateId, VecDeque<Result<String, OracleError>>>>,
    handlers: Mutex<HashMap<TemplateId, Handler>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one successful response for a template
    pub fn enqueue(&self, template: TemplateId, response: impl Into<String>) {
        self.queues
            .lock()
            .unwrap()
            .entry(template)
            .or_default()
            .push_back(Ok(response.into()));
    }

    /// Queue one failure for a template
    pub fn enqueue_failure(&self, template: TemplateId, error: OracleError) {
        self.queues
            .lock()
            .unwrap()
            .entry(template)
            .or_default()
            .push_back(Err(error));
    }

    /// Compute responses for a template from the request variables
    pub fn respond_with(
        &self,
        template: TemplateId,
        handler: impl Fn(&BTreeMap<String, String>) -> Result<String, OracleError>
            + Send
            + Sync
            + 'static,
    ) {
        self.handlers
            .lock()
            .unwrap()
            .insert(template, Box::new(handler));
    }
}

impl fmt::Debug for ScriptedOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedOracle").finish_non_exhaustive()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn judge(&self, request: OracleRequest) -> Result<String, OracleError> {
        if let Some(handler) = self.handlers.lock().unwrap().get(&request.template) {
            return handler(&request.variables);
        }
        self.queues
            .lock()
            .unwrap()
            .get_mut(&request.template)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(OracleError::Transport {
                    message: format!("no scripted response for template {}", request.template),
                })
            })
    }
}

static PACKAGE_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*package\s+([A-Za-z_][\w.]*)\s*;").unwrap());
static CLASS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:public\s+|abstract\s+|final\s+)*class\s+(\w+)(?:\s+extends\s+(\w+))?(?:\s+implements\s+([\w\s,]+?))?\s*\{",
    )
    .unwrap()
});
static ANNOTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*@(\w+)").unwrap());
static FIELD_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(?:private|protected|public)\s+)?(final\s+)?([A-Z]\w*)\s+(\w+)\s*;").unwrap()
});
static METHOD_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(?:public|private|protected|static|final|abstract)\s+)+[\w<>\[\], ]+\s+(\w+)\s*\(")
        .unwrap()
});

/// Fixture-grade Java declaration scanner
///
/// A regex line scanner, deliberately far short of a real parser: enough to
/// turn fixture `.java` files into class facts for tests. Real parsing
/// belongs to an external collaborator.
#[derive(Debug, Default)]
pub struct JavaStubParser;

impl SourceParser for JavaStubParser {
    fn handles(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "java")
    }

    fn parse(&self, _path: &Path, source: &str) -> Result<FileFacts, ParseFailure> {
        let mut package = String::new();
        let mut classes: Vec<RawClass> = Vec::new();
        let mut pending_annotations: Vec<String> = Vec::new();

        for line in source.lines() {
            if let Some(m) = PACKAGE_DECL.captures(line) {
                package = m[1].to_string();
                continue;
            }
            if let Some(m) = ANNOTATION.captures(line) {
                pending_annotations.push(m[1].to_string());
                continue;
            }
            if let Some(m) = CLASS_DECL.captures(line) {
                let mut class = RawClass {
                    name: m[1].to_string(),
                    package: package.clone(),
                    annotations: std::mem::take(&mut pending_annotations),
                    ..RawClass::default()
                };
                if let Some(superclass) = m.get(2) {
                    class.supertypes.push(superclass.as_str().to_string());
                }
                if let Some(interfaces) = m.get(3) {
                    class.supertypes.extend(
                        interfaces
                            .as_str()
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty()),
                    );
                }
                classes.push(class);
                continue;
            }
            if let Some(m) = FIELD_DECL.captures(line) {
                if let Some(class) = classes.last_mut() {
                    class.fields.push(m[3].to_string());
                    class.field_types.push(FieldType {
                        type_name: m[2].to_string(),
                        is_final: m.get(1).is_some(),
                    });
                }
                continue;
            }
            if let Some(m) = METHOD_DECL.captures(line) {
                if let Some(class) = classes.last_mut() {
                    class.methods.push(m[1].to_string());
                }
            }
        }

        if classes.is_empty() && !source.trim().is_empty() {
            return Err(ParseFailure::new("no class declaration found"));
        }
        Ok(FileFacts { classes })
    }
}

/// Minimal Java source for one class
pub fn java_class(package: &str, name: &str) -> String {
    java_source(package, name, &[], "")
}

/// Java source with imports and a body fragment
pub fn java_source(package: &str, name: &str, imports: &[&str], body: &str) -> String {
    let mut out = String::new();
    if !package.is_empty() {
        out.push_str(&format!("package {package};\n\n"));
    }
    for import in imports {
        out.push_str(&format!("import {import};\n"));
    }
    if !imports.is_empty() {
        out.push('\n');
    }
    out.push_str(&format!("public class {name} {{\n{body}}}\n"));
    out
}

/// Write `(relative path, content)` pairs under `root`
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
}

/// Write a monolith tree holding one minimal class per `(package, name)`
pub fn write_monolith(root: &Path, classes: &[(&str, &str)]) {
    for (package, name) in classes {
        let rel = format!("{}/{name}.java", package.replace('.', "/"));
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, java_class(package, name)).unwrap();
    }
}

/// Initialize env-filtered tracing output for a test run (idempotent)
///
/// Controlled with `RUST_LOG`, e.g. `RUST_LOG=strangler_core=debug`.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a structural model holding one minimal class per `(package, name)`
pub fn model_from_classes(classes: &[(&str, &str)]) -> StructuralModel {
    let dir = tempfile::tempdir().unwrap();
    write_monolith(dir.path(), classes);
    ModelBuilder::new()
        .build(dir.path(), &JavaStubParser)
        .unwrap()
}
