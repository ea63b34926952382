//! Prompt template pack
//!
//! Templates live in a YAML pack embedded at build time. Each template
//! declares its required variables; rendering substitutes `{{name}}`
//! placeholders from the request's variable mapping.

use crate::error::OracleError;
use crate::request::OracleRequest;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

static BUILTIN: Lazy<PromptPack> = Lazy::new(|| {
    PromptPack::from_yaml(include_str!("../prompts/templates.yaml"))
        .expect("embedded template pack is valid")
});

/// One prompt template from the pack
#[derive(Debug, Clone, Deserialize)]
pub struct PromptTemplate {
    /// Stable identifier
    pub id: String,
    /// What the template is for
    #[serde(default)]
    pub description: String,
    /// Template text with `{{name}}` placeholders
    pub template: String,
    /// Variables that must be present in every request
    #[serde(default, rename = "requiredVariables")]
    pub required_variables: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PackFile {
    #[allow(dead_code)]
    name: String,
    #[serde(default)]
    #[allow(dead_code)]
    description: String,
    templates: Vec<PromptTemplate>,
}

/// A loaded set of prompt templates, keyed by id
#[derive(Debug)]
pub struct PromptPack {
    templates: HashMap<String, PromptTemplate>,
}

impl PromptPack {
    /// The pack embedded in this crate
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Parse a pack from YAML text
    ///
    /// # Errors
    /// Returns [`OracleError::TemplatePack`] when the YAML does not match
    /// the pack shape.
    pub fn from_yaml(yaml: &str) -> Result<Self, OracleError> {
        let file: PackFile =
            serde_yaml::from_str(yaml).map_err(|err| OracleError::TemplatePack(err.to_string()))?;
        let templates = file
            .templates
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();
        Ok(Self { templates })
    }

    /// Look a template up by id
    #[must_use]
    pub fn template(&self, id: &str) -> Option<&PromptTemplate> {
        self.templates.get(id)
    }

    /// Render a request to the final prompt text
    ///
    /// # Errors
    /// Returns [`OracleError::UnknownTemplate`] for an id the pack does not
    /// carry and [`OracleError::MissingVariable`] when a required variable
    /// is absent from the request.
    pub fn render(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let id = request.template.as_str();
        let template = self
            .templates
            .get(id)
            .ok_or_else(|| OracleError::UnknownTemplate(id.to_string()))?;

        for required in &template.required_variables {
            if !request.variables.contains_key(required) {
                return Err(OracleError::MissingVariable {
                    template: id.to_string(),
                    variable: required.clone(),
                });
            }
        }

        let mut rendered = template.template.clone();
        for (name, value) in &request.variables {
            rendered = rendered.replace(&format!("{{{{{name}}}}}"), value);
        }
        Ok(rendered)
    }
}
