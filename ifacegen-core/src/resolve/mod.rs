//! Name and generic-parameter resolution.

pub mod generics;
pub mod names;

pub use generics::GenericResolver;
pub use names::{
    factory_method_name, keyword_for, role_identifier, role_type_ref, NameResolver, NamespaceSet,
};
