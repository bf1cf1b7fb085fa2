//! ifacegen-core: interface extraction for object-oriented type metadata
//!
//! Given descriptions of concrete classes and value types, this library
//! projects each type's public surface into up to three interfaces:
//!
//! - **Instance** (`IWidget`): instance properties, methods, events, indexers
//! - **Factory** (`IWidgetFactory`): one `CreateWidget(..)` per public constructor
//! - **Manager** (`IWidgetManager`): static members
//!
//! and serializes them as deterministic declaration text.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use ifacegen_core::prelude::*;
//!
//! let library = JsonTypeLibrary::load_path(Path::new("Acme.Core.json"))?;
//! let report = Ifacegen::new()
//!     .include_obsolete(false)
//!     .run(&library, &FsTextStore::new("generated"));
//!
//! for outcome in &report.outcomes {
//!     println!("{}: {:?}", outcome.key, outcome.declarations);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`model`]: Types, members, parameters and type references
//! - [`metadata`]: Metadata provider trait, JSON type libraries, inheritance
//! - [`resolve`]: Name and generic-parameter resolution
//! - [`classify`]: Member role classification and hiding detection
//! - [`project`]: Per-type projection into interface declarations
//! - [`generate`]: Text serialization and prior-output comparison
//! - [`store`]: Text stores for generated units
//! - [`builder`]: Fluent builder API for whole runs
//! - [`error`]: Typed error handling
//!
//! # Cargo Features
//!
//! - `fs-store` (default): Filesystem-backed text store

pub mod builder;
pub mod classify;
pub mod config;
pub mod error;
pub mod generate;
pub mod logging;
pub mod metadata;
pub mod model;
pub mod prelude;
pub mod project;
pub mod report;
pub mod resolve;
pub mod store;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{IfacegenError, IfacegenResult, IoResultExt};

// Builder API
pub use builder::Ifacegen;

// Configuration
pub use config::{
    load_config, load_config_file, AssemblyConfig, GenerationConfig, IfacegenConfig,
    NamespaceSelector, Selection, SelectionMode, CONFIG_FILE,
};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Metadata
pub use metadata::{
    ancestor_chain, gather_library_files, Ancestor, InheritanceGraph, JsonTypeLibrary,
    MetadataProvider, TypeDescriptor, TypeLibrary,
};

// Classification and projection
pub use classify::{ClassifiedMember, ClassifierOptions, HidingStatus, MemberClassifier};
pub use project::{ProjectionOptions, TypeProjector};

// Resolution
pub use resolve::{GenericResolver, NameResolver, NamespaceSet};

// Generation
pub use generate::{compare_prior, fingerprint, GeneratedUnit, Generator, PriorState};

// Reporting
pub use report::{print_json, print_plain, GenerationReport, Outcome, TypeFailure, TypeOutcome};

// Storage
#[cfg(feature = "fs-store")]
pub use store::FsTextStore;
pub use store::{read_text, write_text, MemoryTextStore, TextSink, TextStore};
