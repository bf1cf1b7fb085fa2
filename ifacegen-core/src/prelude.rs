//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use ifacegen_core::prelude::*;
//! ```

// Errors
pub use crate::error::{IfacegenError, IfacegenResult};

// Metadata
pub use crate::metadata::{JsonTypeLibrary, MetadataProvider, TypeDescriptor};

// Model
pub use crate::model::{ApiMember, ApiType, CompilationUnit, InterfaceRole, TypeRef};

// Projection and generation
pub use crate::generate::{GeneratedUnit, Generator};
pub use crate::project::{ProjectionOptions, TypeProjector};

// Storage
#[cfg(feature = "fs-store")]
pub use crate::store::FsTextStore;
pub use crate::store::{MemoryTextStore, TextStore};

// Configuration
pub use crate::config::{load_config, IfacegenConfig, Selection};

// Builder API
pub use crate::builder::Ifacegen;

// Reporting
pub use crate::report::{self, GenerationReport, Outcome};
