//! Plain data for the API model and type references.
//!
//! Nothing here has behavior beyond construction helpers; classification,
//! projection and generation live in their own modules.

mod api;
mod flags;
mod literal;
mod type_ref;

pub use api::{
    ApiAttribute, ApiMember, ApiParameter, ApiType, ApiTypeParameter, CompilationUnit, Constraint,
    InterfaceRole, MemberKind, MethodSig, PropertySig, RefKind, TypeKind, Variance,
};
pub use flags::{Access, Modifiers};
pub use literal::LiteralValue;
pub use type_ref::{declared_arity, full_name, strip_arity, with_arity, TypeRef, ARITY_MARKER};
