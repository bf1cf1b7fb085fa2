//! Generic parameter and constraint extraction.
//!
//! Constraint order per parameter: one of `class` / `struct` (reference
//! wins when metadata claims both), then named type constraints in
//! declared order, then `new()`. The value-type constraint implies both
//! `new()` and `System.ValueType`, so those are not repeated.

use crate::metadata::{GenericParameterDescriptor, MethodDescriptor, TypeDescriptor};
use crate::model::{ApiTypeParameter, Constraint};

/// Extracts type parameters for generic types and methods.
pub struct GenericResolver;

impl GenericResolver {
    /// Type-level parameters of `ty`, in declaration order.
    pub fn type_parameters(ty: &TypeDescriptor) -> Vec<ApiTypeParameter> {
        ty.generic_parameters
            .iter()
            .map(|p| Self::resolve_parameter(p, None))
            .collect()
    }

    /// Method-level parameters of `method`, in declaration order.
    pub fn method_parameters(method: &MethodDescriptor) -> Vec<ApiTypeParameter> {
        method
            .generic_parameters
            .iter()
            .map(|p| Self::resolve_parameter(p, Some(&method.name)))
            .collect()
    }

    fn resolve_parameter(
        desc: &GenericParameterDescriptor,
        declaring_method: Option<&str>,
    ) -> ApiTypeParameter {
        let mut constraints = Vec::new();

        if desc.reference_type {
            constraints.push(Constraint::ReferenceType);
        } else if desc.value_type {
            constraints.push(Constraint::ValueType);
        }

        let value_type = !desc.reference_type && desc.value_type;
        for named in &desc.constraints {
            if value_type && named.is("System", "ValueType") {
                continue;
            }
            let constraint = Constraint::Type(named.clone());
            if !constraints.contains(&constraint) {
                constraints.push(constraint);
            }
        }

        if desc.default_constructor && !value_type {
            constraints.push(Constraint::Constructible);
        }

        ApiTypeParameter {
            name: desc.name.clone(),
            declaring_method: declaring_method.map(str::to_string),
            constraints,
            variance: desc.variance,
        }
    }
}
