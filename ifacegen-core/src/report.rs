//! Run report and its output formatting - plaintext and JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What happened to one generated unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    Updated,
    Unchanged,
    /// The type projects to no declarations.
    Skipped,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeOutcome {
    pub key: String,
    pub outcome: Outcome,
    /// Identifiers of the generated declarations, in emission order.
    pub declarations: Vec<String>,
    pub dropped_constants: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeFailure {
    pub type_name: String,
    pub message: String,
}

/// Summary of one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub generated_at: DateTime<Utc>,
    pub dry_run: bool,
    /// Sorted by key.
    pub outcomes: Vec<TypeOutcome>,
    /// Sorted by type name.
    pub failures: Vec<TypeFailure>,
    pub dropped_constants: usize,
}

impl GenerationReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            generated_at: Utc::now(),
            dry_run,
            outcomes: Vec::new(),
            failures: Vec::new(),
            dropped_constants: 0,
        }
    }

    pub fn record(&mut self, outcome: TypeOutcome) {
        self.dropped_constants += outcome.dropped_constants;
        self.outcomes.push(outcome);
    }

    pub fn fail(&mut self, type_name: impl Into<String>, message: impl Into<String>) {
        self.failures.push(TypeFailure {
            type_name: type_name.into(),
            message: message.into(),
        });
    }

    /// Sorts outcomes and failures so output does not depend on task order.
    pub fn finish(&mut self) {
        self.outcomes.sort_by(|a, b| a.key.cmp(&b.key));
        self.failures.sort_by(|a, b| a.type_name.cmp(&b.type_name));
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.iter().filter(|o| o.outcome == outcome).count()
    }

    pub fn outcome_for(&self, key: &str) -> Option<&TypeOutcome> {
        self.outcomes.iter().find(|o| o.key == key)
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Prints the report in plain text format.
pub fn print_plain(report: &GenerationReport) {
    let mode = if report.dry_run { " (dry run)" } else { "" };
    println!(
        "GENERATED{} at {}: {} created, {} updated, {} unchanged, {} skipped",
        mode,
        report.generated_at.to_rfc3339(),
        report.count(Outcome::Created),
        report.count(Outcome::Updated),
        report.count(Outcome::Unchanged),
        report.count(Outcome::Skipped),
    );
    for o in &report.outcomes {
        if o.outcome == Outcome::Skipped {
            continue;
        }
        println!("- {} [{}] {}", o.key, o.outcome.label(), o.declarations.join(", "));
    }
    if report.dropped_constants > 0 {
        println!("DROPPED CONSTANT VALUES: {}", report.dropped_constants);
    }
    if report.has_failures() {
        println!("FAILED ({}):", report.failures.len());
        for f in &report.failures {
            println!("- {}: {}", f.type_name, f.message);
        }
    }
}

/// Prints the report in JSON format.
pub fn print_json(report: &GenerationReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"failures\": {}}}", report.failures.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(key: &str, outcome: Outcome, dropped: usize) -> TypeOutcome {
        TypeOutcome {
            key: key.to_string(),
            outcome,
            declarations: vec![format!("I{}", key)],
            dropped_constants: dropped,
        }
    }

    #[test]
    fn test_record_accumulates_and_finish_sorts() {
        let mut report = GenerationReport::new(false);
        report.record(outcome("B", Outcome::Created, 1));
        report.record(outcome("A", Outcome::Unchanged, 2));
        report.fail("Z", "boom");
        report.fail("Y", "bang");
        report.finish();

        assert_eq!(report.outcomes[0].key, "A");
        assert_eq!(report.failures[0].type_name, "Y");
        assert_eq!(report.dropped_constants, 3);
        assert_eq!(report.count(Outcome::Created), 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_json_shape() {
        let mut report = GenerationReport::new(true);
        report.record(outcome("Acme.Foo", Outcome::Created, 0));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["dry_run"], true);
        assert_eq!(value["outcomes"][0]["outcome"], "created");
        assert!(value["generated_at"].is_string());
    }
}
