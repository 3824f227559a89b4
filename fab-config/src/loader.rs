// Standard library imports
use std::fs;
use std::path::Path;

// External crate imports
use anyhow::Context;
use fab_core::error::{FabError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_yaml_ng as serde_yaml;
use tracing::debug;

// Internal imports
use crate::config::{DeployConfig, DEFAULT_SOLUTION_VERSION};

const SOLUTION_VERSION_TOKEN: &str = "{{SOLUTION_VERSION}}";

/// `$$`, `$NAME` and `${NAME}` placeholders.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:(\$)|([_A-Za-z][_A-Za-z0-9]*)|\{([_A-Za-z][_A-Za-z0-9]*)\})")
        .expect("placeholder pattern is valid")
});

/// Loads deployment templates.
///
/// Loading happens in three passes over the raw text:
/// 1. The raw YAML is parsed once to read `solution_version` (default `av01`).
/// 2. Every `{{SOLUTION_VERSION}}` token is replaced with that version.
/// 3. `$NAME` / `${NAME}` placeholders are substituted from the environment.
///    Unknown variables are left untouched and `$$` yields a literal `$`.
pub struct TemplateLoader<F> {
    lookup: F,
}

impl TemplateLoader<fn(&str) -> Option<String>> {
    /// A loader that resolves placeholders from the process environment.
    pub fn from_env() -> Self {
        Self {
            lookup: |name| std::env::var(name).ok(),
        }
    }
}

impl<F> TemplateLoader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// A loader with a custom variable lookup.
    pub fn with_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    pub fn load(&self, path: &Path) -> Result<DeployConfig> {
        if !path.exists() {
            return Err(FabError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        debug!("Loading template from: {}", path.display());

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file at {}", path.display()))?;
        self.load_str(&contents).map_err(|e| match e {
            FabError::Serialization(msg) => {
                FabError::Serialization(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn load_str(&self, contents: &str) -> Result<DeployConfig> {
        let version = Self::read_solution_version(contents)?;
        let versioned = contents.replace(SOLUTION_VERSION_TOKEN, &version);
        let substituted = self.substitute(&versioned);

        let mut config: DeployConfig = serde_yaml::from_str(&substituted)?;
        if config.solution_version.is_none() {
            config.solution_version = Some(version);
        }
        Ok(config)
    }

    /// Safe substitution: placeholders without a value stay verbatim.
    pub fn substitute(&self, text: &str) -> String {
        PLACEHOLDER
            .replace_all(text, |caps: &Captures| {
                if caps.get(1).is_some() {
                    return "$".to_string();
                }
                let name = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                (self.lookup)(name).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    fn read_solution_version(contents: &str) -> Result<String> {
        let raw: serde_yaml::Value = serde_yaml::from_str(contents)?;
        let version = match raw.get("solution_version") {
            Some(serde_yaml::Value::String(s)) => s.clone(),
            Some(serde_yaml::Value::Number(n)) => n.to_string(),
            _ => DEFAULT_SOLUTION_VERSION.to_string(),
        };
        Ok(version)
    }
}
