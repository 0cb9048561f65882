//! Validation findings for a circuit.
//!
//! [`Circuit::validate_into`](crate::Circuit::validate_into) walks the model
//! and records anything that would make a solver or a display stumble:
//! empty branches, element values that were never set, dependent sources
//! without a controller or controlling each other in a loop, and disconnected
//! parts of the graph.
//!
//! # Example
//!
//! ```
//! use acnet_core::diagnostics::{Diagnostics, Severity};
//!
//! let mut diag = Diagnostics::new();
//! diag.add_warning("topology", "Circuit splits into 2 islands");
//! diag.add_error_with_entity("control", "control cycle through U2", "U2");
//!
//! assert_eq!(diag.warning_count(), 1);
//! assert_eq!(diag.error_count(), 1);
//! assert_eq!(diag.summary(), "1 warning, 1 error");
//! ```

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Model is usable but probably not what was intended
    Warning,
    /// A quantity cannot be evaluated
    Error,
}

/// A single finding
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    /// Grouping such as "structure", "validation", "physical", "control", "topology"
    pub category: String,
    pub message: String,
    /// Element the issue refers to (`"R1"`, `"Branch(Node0 --- Node1)"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl DiagnosticIssue {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

impl std::fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}:{}] {}", severity, self.category, self.message)?;
        if let Some(entity) = &self.entity {
            write!(f, " ({})", entity)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: DiagnosticIssue) {
        self.issues.push(issue);
    }

    pub fn add_warning(&mut self, category: &str, message: &str) {
        self.add(DiagnosticIssue::new(Severity::Warning, category, message));
    }

    pub fn add_warning_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.add(DiagnosticIssue::new(Severity::Warning, category, message).with_entity(entity));
    }

    /// Warning in the "validation" category
    pub fn add_validation_warning(&mut self, entity: &str, message: &str) {
        self.add_warning_with_entity("validation", message, entity);
    }

    pub fn add_error(&mut self, category: &str, message: &str) {
        self.add(DiagnosticIssue::new(Severity::Error, category, message));
    }

    pub fn add_error_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.add(DiagnosticIssue::new(Severity::Error, category, message).with_entity(entity));
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn issues_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.issues.extend(other.issues);
    }

    /// `"2 warnings, 1 error"` / `"No issues"`
    pub fn summary(&self) -> String {
        fn plural(n: usize, word: &str) -> String {
            format!("{} {}{}", n, word, if n == 1 { "" } else { "s" })
        }
        match (self.warning_count(), self.error_count()) {
            (0, 0) => "No issues".to_string(),
            (w, 0) => plural(w, "warning"),
            (0, e) => plural(e, "error"),
            (w, e) => format!("{}, {}", plural(w, "warning"), plural(e, "error")),
        }
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Diagnostics: {}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_summary() {
        let mut diag = Diagnostics::new();
        assert_eq!(diag.summary(), "No issues");
        assert!(!diag.has_issues());

        diag.add_validation_warning("R1", "Element value is not set");
        assert_eq!(diag.summary(), "1 warning");

        diag.add_error_with_entity("physical", "domain error: division by zero", "C1");
        diag.add_warning("topology", "Circuit splits into 2 islands");
        assert_eq!(diag.summary(), "2 warnings, 1 error");
        assert!(diag.has_errors());
        assert_eq!(diag.issues_by_category("validation").count(), 1);
    }

    #[test]
    fn test_issue_display() {
        let issue = DiagnosticIssue::new(Severity::Error, "control", "control cycle through U1")
            .with_entity("U1");
        assert_eq!(
            issue.to_string(),
            "[error:control] control cycle through U1 (U1)"
        );
    }

    #[test]
    fn test_serialization() {
        let mut diag = Diagnostics::new();
        diag.add_warning_with_entity("structure", "Branch has no components", "Branch(Node0 --- Node1)");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["issues"][0]["severity"], "warning");
        assert_eq!(json["issues"][0]["entity"], "Branch(Node0 --- Node1)");

        let empty = serde_json::to_string(&Diagnostics::new()).unwrap();
        assert_eq!(empty, "{}");
    }

    #[test]
    fn test_merge() {
        let mut a = Diagnostics::new();
        a.add_warning("structure", "w");
        let mut b = Diagnostics::new();
        b.add_error("structure", "e");
        a.merge(b);
        assert_eq!((a.warning_count(), a.error_count()), (1, 1));
    }
}
