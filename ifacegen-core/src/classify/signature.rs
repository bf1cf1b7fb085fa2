//! Member signatures for hiding detection.
//!
//! Two members share a signature when they are the same category
//! (property-like, event, method), have the same name, the same generic
//! arity and the same parameter types. Method-level generic parameters
//! are compared by position, so `M<T>(T)` matches `M<U>(U)`. An inherited
//! member is compared after its declaring type's parameters are replaced
//! by the arguments the derived type supplies.

use std::collections::HashMap;

use crate::metadata::{MemberDescriptor, ParameterDescriptor};
use crate::model::{RefKind, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    Property,
    Event,
    Method,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberSignature {
    pub kind: SignatureKind,
    pub name: String,
    pub generic_arity: usize,
    /// (passed by reference, parameter type)
    pub parameters: Vec<(bool, TypeRef)>,
}

/// Signature of a member that can hide an inherited one.
///
/// Constructors, fields and nested types have none.
pub fn signature_of(member: &MemberDescriptor) -> Option<MemberSignature> {
    signature_in(member, &HashMap::new())
}

/// Signature of an inherited member, with the declaring type's parameters
/// rewritten through `substitution`.
pub fn signature_in(
    member: &MemberDescriptor,
    substitution: &HashMap<String, TypeRef>,
) -> Option<MemberSignature> {
    match member {
        MemberDescriptor::Property(p) => Some(MemberSignature {
            kind: SignatureKind::Property,
            name: p.name.clone(),
            generic_arity: 0,
            parameters: params(&p.index_parameters, &[], substitution),
        }),
        MemberDescriptor::Event(e) => Some(MemberSignature {
            kind: SignatureKind::Event,
            name: e.name.clone(),
            generic_arity: 0,
            parameters: Vec::new(),
        }),
        MemberDescriptor::Method(m) => {
            let generic_names: Vec<&str> =
                m.generic_parameters.iter().map(|g| g.name.as_str()).collect();
            Some(MemberSignature {
                kind: SignatureKind::Method,
                name: m.name.clone(),
                generic_arity: generic_names.len(),
                parameters: params(&m.parameters, &generic_names, substitution),
            })
        }
        _ => None,
    }
}

fn params(
    parameters: &[ParameterDescriptor],
    generic_names: &[&str],
    substitution: &HashMap<String, TypeRef>,
) -> Vec<(bool, TypeRef)> {
    parameters
        .iter()
        .map(|p| {
            let by_ref = matches!(p.ref_kind, RefKind::Ref | RefKind::Out | RefKind::In);
            (by_ref, positional(&p.param_type, generic_names, substitution))
        })
        .collect()
}

/// Method parameters shadow type parameters. Substituted arguments are
/// already in the derived type's terms and are not rewritten again.
fn positional(
    ty: &TypeRef,
    generic_names: &[&str],
    substitution: &HashMap<String, TypeRef>,
) -> TypeRef {
    match ty {
        TypeRef::GenericParam { name } => match generic_names.iter().position(|g| g == name) {
            Some(idx) => TypeRef::param(&format!("!!{}", idx)),
            None => substitution.get(name).cloned().unwrap_or_else(|| ty.clone()),
        },
        TypeRef::Array { element, rank } => TypeRef::Array {
            element: Box::new(positional(element, generic_names, substitution)),
            rank: *rank,
        },
        TypeRef::Named {
            namespace,
            name,
            args,
        } => TypeRef::Named {
            namespace: namespace.clone(),
            name: name.clone(),
            args: args
                .iter()
                .map(|a| positional(a, generic_names, substitution))
                .collect(),
        },
    }
}
