// Variable-reference validation
use crate::domain::dashboard::Dashboard;
use crate::domain::error::{BuildError, UndeclaredVariable};
use regex::Regex;
use std::sync::LazyLock;

/// Matches `$name`, `${name}`, `${name:format}` and the legacy `[[name]]` / `[[name:format]]`.
/// An unterminated `${name` is not interpolated by Grafana and is not matched.
static VARIABLE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)(?::[^}]*)?\}|([A-Za-z_][A-Za-z0-9_]*))|\[\[([A-Za-z_][A-Za-z0-9_]*)(?::[^\]]*)?\]\]",
    )
    .expect("variable token pattern is valid")
});

/// Variable names referenced by an expression, in order of first appearance.
/// Grafana's global variables (`$__interval`, `$__rate_interval`, ...) are skipped.
pub fn referenced_variables(expr: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in VARIABLE_TOKEN.captures_iter(expr) {
        let Some(name) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
            continue;
        };
        let name = name.as_str();
        if name.starts_with("__") || names.contains(&name) {
            continue;
        }
        names.push(name);
    }
    names
}

/// Checks that every query only references variables declared on the dashboard.
pub fn validate_variable_references(dashboard: &Dashboard) -> Result<(), BuildError> {
    let declared = dashboard.variable_names();
    let mut missing = Vec::new();

    for section in &dashboard.sections {
        for panel in &section.panels {
            if panel.queries.is_empty() {
                tracing::warn!(
                    "Panel '{}' in section '{}' has no queries and will show no data",
                    panel.title,
                    section.title
                );
                continue;
            }

            for query in &panel.queries {
                for name in referenced_variables(&query.expr) {
                    if !declared.iter().any(|d| d == name) {
                        missing.push(UndeclaredVariable {
                            section: section.title.clone(),
                            panel: panel.title.clone(),
                            query: query.expr.trim().to_string(),
                            variable: name.to_string(),
                        });
                    }
                }
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(BuildError::UndeclaredVariables { missing, declared })
    }
}
