//! Builder pattern API for a generation run.
//!
//! ```rust,ignore
//! use ifacegen_core::prelude::*;
//!
//! let library = JsonTypeLibrary::load_path(Path::new("Acme.Core.json"))?;
//! let store = FsTextStore::new("generated");
//! let report = Ifacegen::new()
//!     .simplify_namespaces(true)
//!     .dry_run(false)
//!     .run(&library, &store);
//!
//! report::print_plain(&report);
//! ```

use rayon::prelude::*;
use tracing::{error, info};

use crate::config::{IfacegenConfig, Selection};
use crate::error::{IfacegenError, IfacegenResult};
use crate::generate::{compare_prior, GeneratedUnit, Generator, PriorState};
use crate::metadata::{InheritanceGraph, MetadataProvider, TypeDescriptor};
use crate::model::TypeKind;
use crate::project::{ProjectionOptions, TypeProjector};
use crate::report::{GenerationReport, Outcome, TypeOutcome};
use crate::store::{write_text, TextStore};

/// Builder for configuring a generation run.
#[derive(Debug, Clone)]
pub struct Ifacegen {
    /// Emit bare identifiers plus `using` lines
    simplify_namespaces: bool,

    /// Generate obsolete types and members
    include_obsolete: bool,

    /// Compare against prior output without writing
    dry_run: bool,

    /// Which provider types are generated
    selection: Selection,

    /// Explicit type full names; overrides `selection` when non-empty
    only: Vec<String>,
}

impl Default for Ifacegen {
    fn default() -> Self {
        Self::new()
    }
}

impl Ifacegen {
    pub fn new() -> Self {
        Self {
            simplify_namespaces: true,
            include_obsolete: false,
            dry_run: false,
            selection: Selection::all(),
            only: Vec::new(),
        }
    }

    /// Builder seeded from a loaded ifacegen.toml.
    pub fn from_config(config: &IfacegenConfig) -> IfacegenResult<Self> {
        Ok(Self::new()
            .simplify_namespaces(config.generation.simplify_namespaces)
            .selection(Selection::from_config(config)?))
    }

    pub fn simplify_namespaces(mut self, enabled: bool) -> Self {
        self.simplify_namespaces = enabled;
        self
    }

    /// Applies to both type selection and member classification.
    pub fn include_obsolete(mut self, enabled: bool) -> Self {
        self.include_obsolete = enabled;
        self.selection = self.selection.include_obsolete(enabled);
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Replaces the selection; its obsolete flag becomes the run's.
    pub fn selection(mut self, selection: Selection) -> Self {
        self.include_obsolete = selection.includes_obsolete();
        self.selection = selection;
        self
    }

    /// Restricts the run to the named types.
    pub fn types(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.only.extend(names.into_iter().map(Into::into));
        self
    }

    /// Projects and serializes one type without touching any store.
    pub fn generate(
        &self,
        provider: &dyn MetadataProvider,
        ty: &TypeDescriptor,
    ) -> IfacegenResult<(Vec<String>, GeneratedUnit)> {
        let projector = TypeProjector::new(
            provider,
            ProjectionOptions {
                include_obsolete: self.include_obsolete,
            },
        );
        let unit = projector.project(ty)?;
        let declarations = unit.types.iter().map(|t| t.name.clone()).collect();
        let generated = Generator::new(self.simplify_namespaces).serialize(&unit);
        Ok((declarations, generated))
    }

    /// Runs generation over the selected types, one parallel task per type.
    ///
    /// A failing type is recorded in the report; the others still run.
    pub fn run(&self, provider: &dyn MetadataProvider, store: &dyn TextStore) -> GenerationReport {
        let mut report = GenerationReport::new(self.dry_run);
        let cyclic = InheritanceGraph::build(provider).cyclic_types();

        let mut candidates = Vec::new();
        if self.only.is_empty() {
            candidates.extend(
                provider
                    .types()
                    .into_iter()
                    .filter(|t| is_candidate(t) && self.selection.includes(t)),
            );
        } else {
            for name in &self.only {
                match provider.require(name) {
                    Ok(ty) => candidates.push(ty),
                    Err(e) => report.fail(name.as_str(), e.to_string()),
                }
            }
        }

        info!(
            types = candidates.len(),
            dry_run = self.dry_run,
            simplify_namespaces = self.simplify_namespaces,
            "generation started"
        );

        let results: Vec<(String, IfacegenResult<TypeOutcome>)> = candidates
            .par_iter()
            .map(|ty| {
                let key = ty.full_name();
                let result = if cyclic.contains(&key) {
                    Err(IfacegenError::cycle(key.as_str()))
                } else {
                    self.run_one(provider, store, ty)
                };
                (key, result)
            })
            .collect();

        for (key, result) in results {
            match result {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    error!(
                        type_name = %key,
                        error = %e,
                        recoverable = e.is_recoverable(),
                        "generation failed"
                    );
                    report.fail(key, e.to_string());
                }
            }
        }
        report.finish();

        info!(
            created = report.count(Outcome::Created),
            updated = report.count(Outcome::Updated),
            unchanged = report.count(Outcome::Unchanged),
            failed = report.failures.len(),
            "generation finished"
        );
        report
    }

    fn run_one(
        &self,
        provider: &dyn MetadataProvider,
        store: &dyn TextStore,
        ty: &TypeDescriptor,
    ) -> IfacegenResult<TypeOutcome> {
        let (declarations, generated) = self.generate(provider, ty)?;
        let mut outcome = TypeOutcome {
            key: generated.key.clone(),
            outcome: Outcome::Skipped,
            declarations,
            dropped_constants: generated.dropped_constants,
        };
        if outcome.declarations.is_empty() {
            return Ok(outcome);
        }

        let prior = compare_prior(store, &generated.key, &generated.text);
        outcome.outcome = match prior {
            PriorState::Missing => Outcome::Created,
            PriorState::Unchanged => Outcome::Unchanged,
            PriorState::Changed { .. } | PriorState::Unreadable => Outcome::Updated,
        };
        if prior.needs_write() && !self.dry_run {
            write_text(store, &generated.key, &generated.text)?;
        }
        Ok(outcome)
    }
}

/// Types considered when no explicit list is given.
fn is_candidate(ty: &TypeDescriptor) -> bool {
    matches!(ty.kind, TypeKind::Class | TypeKind::Struct) && !ty.is_nested
}
