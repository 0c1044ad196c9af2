pub mod antenna;

use serde::Serialize;
use std::collections::HashMap;

use crate::config::{BranchRule, ExactName, IdentityConfig};
use crate::error::ConfigError;
pub use antenna::AntennaResolver;

/// Who handled a chat, and which branch they volunteer for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorIdentity {
    pub canonical_name: String,
    pub branch_label: String,
}

/// Operator-id and routing-message lookups.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    operators: HashMap<i64, String>,
    exact_names: Vec<ExactName>,
    branch_rules: Vec<BranchRule>,
    unknown_operator: String,
    other_branch: String,
    antenna: AntennaResolver,
}

impl IdentityResolver {
    pub fn new(config: &IdentityConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            operators: config
                .operators
                .iter()
                .map(|entry| (entry.id, entry.name.clone()))
                .collect(),
            exact_names: config.exact_names.clone(),
            branch_rules: config.branch_rules.clone(),
            unknown_operator: config.unknown_operator.clone(),
            other_branch: config.other_branch.clone(),
            antenna: AntennaResolver::new(&config.antenna)?,
        })
    }

    /// Resolve a numeric operator id. Missing or unlisted ids give the
    /// unknown/other pair.
    pub fn resolve_operator(&self, id: Option<i64>) -> OperatorIdentity {
        match id.and_then(|id| self.operators.get(&id)) {
            Some(name) => OperatorIdentity {
                branch_label: self.branch_for(name).to_string(),
                canonical_name: name.clone(),
            },
            None => self.unknown(),
        }
    }

    /// Resolve an operator id as found in an export: integer, integral
    /// float or numeric string. Anything else is unknown.
    pub fn resolve_operator_value(&self, raw: Option<&serde_json::Value>) -> OperatorIdentity {
        self.resolve_operator(raw.and_then(parse_operator_id))
    }

    pub fn resolve_operator_str(&self, raw: &str) -> OperatorIdentity {
        self.resolve_operator(raw.trim().parse().ok())
    }

    /// Branch for a canonical operator name: exact names first, then the
    /// first substring rule that matches.
    pub fn branch_for(&self, canonical_name: &str) -> &str {
        if let Some(exact) = self.exact_names.iter().find(|e| e.name == canonical_name) {
            return &exact.branch;
        }
        self.branch_rules
            .iter()
            .find(|rule| !rule.marker.is_empty() && canonical_name.contains(&rule.marker))
            .map(|rule| rule.branch.as_str())
            .unwrap_or(self.other_branch.as_str())
    }

    pub fn resolve_antenna(&self, routing_message: Option<&str>, department: Option<&str>) -> String {
        self.antenna.resolve(routing_message, department)
    }

    pub fn normalize_antenna(&self, raw: &str) -> String {
        self.antenna.normalize(raw)
    }

    fn unknown(&self) -> OperatorIdentity {
        OperatorIdentity {
            canonical_name: self.unknown_operator.clone(),
            branch_label: self.other_branch.clone(),
        }
    }
}

/// Integer ids as they show up in exports: `12`, `12.0`, `"12"`.
pub fn parse_operator_id(raw: &serde_json::Value) -> Option<i64> {
    match raw {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
