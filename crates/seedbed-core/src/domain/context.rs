//! Frozen per-run render record.

use std::collections::HashMap;

use chrono::Datelike;
use uuid::Uuid;

use crate::domain::parameters::VariantParameters;
use crate::domain::variant::Variant;

/// Context for template rendering.
///
/// A **Value Object** holding everything a template may reference for one
/// generation run: the project name in several casings, the run's year and
/// secret, and the [`VariantParameters`] of the chosen variant. All variables
/// are computed once in [`RenderContext::new`]; every artifact of the run is
/// rendered against the same instance, which is what keeps artifacts
/// consistent with each other.
///
/// ## Built-in Variables
///
/// | Variable | Example | Source |
/// |----------|---------|--------|
/// | `PROJECT_NAME` | "My Shop" | User input |
/// | `PROJECT_NAME_SNAKE` | "my_shop" | Computed |
/// | `PROJECT_NAME_KEBAB` | "my-shop" | Computed |
/// | `PROJECT_NAME_PASCAL` | "MyShop" | Computed |
/// | `YEAR` | "2026" | System clock |
/// | `SECRET_KEY_BASE` | 128 hex chars | Generated per run |
/// | `DATABASE_*` | see `VariantParameters::variables` | Registry |
#[derive(Debug, Clone)]
pub struct RenderContext {
    parameters: VariantParameters,
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new(project_name: impl Into<String>, parameters: VariantParameters) -> Self {
        let name = project_name.into();
        let mut vars = HashMap::new();

        vars.insert("PROJECT_NAME".to_string(), name.clone());
        vars.insert("PROJECT_NAME_SNAKE".to_string(), to_snake_case(&name));
        vars.insert("PROJECT_NAME_KEBAB".to_string(), to_kebab_case(&name));
        vars.insert("PROJECT_NAME_PASCAL".to_string(), to_pascal_case(&name));
        vars.insert("YEAR".to_string(), chrono::Local::now().year().to_string());
        vars.insert("SECRET_KEY_BASE".to_string(), generate_secret());

        vars.extend(parameters.variables());

        Self {
            parameters,
            variables: vars,
        }
    }

    /// Replace the generated secret, e.g. for reproducible output.
    pub fn with_secret(self, secret: impl Into<String>) -> Self {
        self.with_variable("SECRET_KEY_BASE", secret)
    }

    pub fn with_year(self, year: i32) -> Self {
        self.with_variable("YEAR", year.to_string())
    }

    /// Registry-derived variables are never overridden, so substitutions
    /// cannot drift from `parameters`.
    fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    pub fn parameters(&self) -> &VariantParameters {
        &self.parameters
    }

    pub fn variant(&self) -> Variant {
        self.parameters.variant
    }
}

/// 128 hex characters of fresh randomness.
pub fn generate_secret() -> String {
    (0..4).map(|_| Uuid::new_v4().simple().to_string()).collect()
}

// ============================================================================
// String Case Conversion Helpers
// ============================================================================

fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::new();
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Split a string into lowercase words.
///
/// Boundaries: `_`, `-` and whitespace; a lower→upper transition
/// (`myApp`); the end of an acronym (`HTTPServer` → `http`, `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(next) = chars.peek() {
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
