use regex::Regex;

use crate::config::AntennaRules;
use crate::error::ConfigError;

/// Reads the antenna (regional branch) a chat was routed from.
#[derive(Debug, Clone)]
pub struct AntennaResolver {
    rules: AntennaRules,
    loose: Regex,
    regional_marker: String,
}

impl AntennaResolver {
    pub fn new(rules: &AntennaRules) -> Result<Self, ConfigError> {
        if rules.national_departments.iter().all(|d| d.trim().is_empty()) {
            return Err(ConfigError::NoNationalDepartments);
        }
        let loose = Regex::new(&format!(r#"{}\s+([^"]+)"#, regex::escape(&rules.loose_keyword)))
            .map_err(|source| ConfigError::PhraseSet {
                set: "antenna.loose_keyword",
                source,
            })?;
        Ok(Self {
            regional_marker: rules.regional_marker.to_lowercase(),
            rules: rules.clone(),
            loose,
        })
    }

    /// Extract then normalize.
    pub fn resolve(&self, routing_message: Option<&str>, department: Option<&str>) -> String {
        self.normalize(&self.extract(routing_message, department))
    }

    /// Raw antenna name, before normalization.
    ///
    /// A department outside the national pools already names the branch and
    /// is returned as is, whatever the message says. For national pools the
    /// branch is read out of the routing message.
    pub fn extract(&self, routing_message: Option<&str>, department: Option<&str>) -> String {
        let department = department.map(str::trim).unwrap_or_default();
        if department.is_empty() {
            return self.rules.unknown.clone();
        }
        if !self.is_national(department) {
            return department.to_string();
        }

        let message = routing_message.unwrap_or_default();
        if message.trim().is_empty() {
            return self.rules.unknown.clone();
        }

        let start = self
            .rules
            .lead_ins
            .iter()
            .filter(|lead| !lead.is_empty())
            .find_map(|lead| message.find(lead.as_str()).map(|pos| pos + lead.len()));

        let Some(start) = start else {
            // No lead-in: fall back to keyword + anything up to a quote.
            return match self.loose.captures(message) {
                Some(caps) => caps[1].trim().to_string(),
                None => self.rules.unknown.clone(),
            };
        };

        let rest = &message[start..];
        let end = rest.find('"').or_else(|| rest.find('.')).unwrap_or(rest.len());
        rest[..end].trim().to_string()
    }

    /// Map a raw antenna name onto its reporting label. Idempotent.
    pub fn normalize(&self, raw: &str) -> String {
        let name = raw.trim();
        if name.is_empty() || name == self.rules.unknown {
            return self.rules.unknown.clone();
        }
        if !self.rules.anglophone_marker.is_empty() && name.contains(&self.rules.anglophone_marker) {
            return self.rules.anglophone_label.clone();
        }
        if !self.regional_marker.is_empty() && name.to_lowercase().contains(&self.regional_marker) {
            return self.rules.regional_label.clone();
        }

        let prefix = self.rules.prefix.as_str();
        let mut stripped = name;
        if !prefix.is_empty() {
            while let Some(rest) = stripped.strip_prefix(prefix) {
                stripped = rest.trim_start();
            }
        }
        if stripped.is_empty() {
            return self.rules.unknown.clone();
        }
        stripped.to_string()
    }

    pub fn is_national(&self, department: &str) -> bool {
        self.rules
            .national_departments
            .iter()
            .any(|d| d.trim() == department)
    }
}
