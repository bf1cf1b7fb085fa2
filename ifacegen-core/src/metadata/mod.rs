//! Metadata provider abstraction and its JSON type-library implementation.
//!
//! ```text
//! ┌──────────────────────┐     ┌─────────────────────┐
//! │   descriptor.rs      │     │     json.rs         │
//! │  ──────────────────  │     │  ─────────────────  │
//! │  Type / member       │◄────│  Load libraries by  │
//! │  descriptions        │     │  path or by name    │
//! └──────────┬───────────┘     └──────────┬──────────┘
//!            │                            │
//!            └────────────┬───────────────┘
//!                         ▼
//!             ┌──────────────────────┐
//!             │    hierarchy.rs      │
//!             │  ──────────────────  │
//!             │  Ancestor chains and │
//!             │  cycle detection     │
//!             └──────────────────────┘
//! ```

pub mod descriptor;
pub mod hierarchy;
pub mod json;

pub use descriptor::{
    AccessorDescriptor, AttributeDescriptor, ConstructorDescriptor, EventDescriptor,
    FieldDescriptor, GenericParameterDescriptor, MemberDescriptor, MethodDescriptor,
    ParameterDescriptor, PropertyDescriptor, TypeDescriptor, TypeLibrary,
};
pub use hierarchy::{ancestor_chain, Ancestor, InheritanceGraph};
pub use json::{gather_library_files, JsonTypeLibrary};

use crate::error::{IfacegenError, IfacegenResult};
use crate::model::TypeRef;

/// Read-only access to source type descriptions.
///
/// Implementations must be thread-safe: generation projects types in
/// parallel against one shared provider.
pub trait MetadataProvider: Send + Sync {
    /// Looks up a type definition by metadata full name (`Ns.Name`1`).
    fn type_by_name(&self, full_name: &str) -> Option<&TypeDescriptor>;

    /// All known types, in load order.
    fn types(&self) -> Vec<&TypeDescriptor>;

    /// Resolves a reference to its definition, if the provider knows it.
    fn resolve(&self, type_ref: &TypeRef) -> Option<&TypeDescriptor> {
        type_ref
            .definition_name()
            .and_then(|name| self.type_by_name(&name))
    }

    /// Looks up a type that must exist.
    fn require(&self, full_name: &str) -> IfacegenResult<&TypeDescriptor> {
        self.type_by_name(full_name)
            .ok_or_else(|| IfacegenError::missing_type(full_name))
    }
}
