//! Member role classification.
//!
//! For each public member a type declares, decide:
//! - whether it is an override (excluded: the base type's generated
//!   interface already exposes it),
//! - whether it hides an ancestor member (emitted with `new`),
//! - which generated interface it belongs to.
//!
//! Fields, constants and nested types are not projected.

use tracing::debug;

use super::signature::{signature_in, signature_of};
use crate::metadata::{
    Ancestor, AttributeDescriptor, MemberDescriptor, ParameterDescriptor, TypeDescriptor,
};
use crate::model::{
    Access, ApiAttribute, ApiMember, ApiParameter, InterfaceRole, MemberKind, MethodSig, Modifiers,
    PropertySig,
};
use crate::resolve::GenericResolver;

/// Whether a member hides an inherited member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HidingStatus {
    Normal,
    HidesBase,
}

/// A member ready for projection.
#[derive(Debug, Clone)]
pub struct ClassifiedMember {
    pub member: ApiMember,
    pub role: InterfaceRole,
    pub hiding: HidingStatus,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifierOptions {
    pub include_obsolete: bool,
}

/// Classifies the members of one type against its ancestor chain.
pub struct MemberClassifier<'a> {
    ty: &'a TypeDescriptor,
    ancestors: &'a [Ancestor<'a>],
    options: ClassifierOptions,
}

impl<'a> MemberClassifier<'a> {
    /// `ancestors` are ordered nearest first.
    pub fn new(
        ty: &'a TypeDescriptor,
        ancestors: &'a [Ancestor<'a>],
        options: ClassifierOptions,
    ) -> Self {
        Self {
            ty,
            ancestors,
            options,
        }
    }

    /// Classifies every eligible member, in declaration order.
    pub fn classify(&self) -> Vec<ClassifiedMember> {
        let declaring = self.ty.full_name();
        self.ty
            .members
            .iter()
            .filter_map(|m| self.classify_member(m, &declaring))
            .collect()
    }

    fn classify_member(&self, m: &MemberDescriptor, declaring: &str) -> Option<ClassifiedMember> {
        if !self.is_eligible(m) {
            return None;
        }
        if is_override(m, declaring) {
            debug!(type_name = %declaring, member = %m.name(), "override excluded");
            return None;
        }

        let hiding = if self.hides_base(m) {
            HidingStatus::HidesBase
        } else {
            HidingStatus::Normal
        };
        let role = route(m);
        let member = project_member(m, hiding)?;

        debug!(
            type_name = %declaring,
            member = %m.name(),
            role = %role,
            hides_base = hiding == HidingStatus::HidesBase,
            "classified member"
        );
        Some(ClassifiedMember {
            member,
            role,
            hiding,
        })
    }

    fn is_eligible(&self, m: &MemberDescriptor) -> bool {
        match m {
            MemberDescriptor::NestedType { name } => {
                debug!(nested = %name, "nested types are not projected");
                false
            }
            MemberDescriptor::Field(f) => {
                debug!(field = %f.name, constant = f.is_literal, "fields are not projected");
                false
            }
            MemberDescriptor::Method(md) if md.special_name => false,
            _ if m.is_compiler_generated() => false,
            _ if !m.is_public() => false,
            _ if !self.options.include_obsolete && m.is_obsolete() => false,
            _ => true,
        }
    }

    fn hides_base(&self, m: &MemberDescriptor) -> bool {
        let Some(sig) = signature_of(m) else {
            return false;
        };
        self.ancestors.iter().any(|ancestor| {
            let substitution = ancestor.substitution();
            ancestor.ty.members.iter().any(|am| {
                visible_to_derived(am)
                    && signature_in(am, &substitution).is_some_and(|other| other == sig)
            })
        })
    }
}

/// True when the member's first accessor roots in another type.
fn is_override(m: &MemberDescriptor, declaring: &str) -> bool {
    m.first_accessor()
        .and_then(|a| a.root_declaring_type.as_deref())
        .is_some_and(|root| root != declaring)
}

fn visible_to_derived(m: &MemberDescriptor) -> bool {
    let special = matches!(m, MemberDescriptor::Method(md) if md.special_name);
    !special && !m.is_compiler_generated() && m.is_public()
}

fn route(m: &MemberDescriptor) -> InterfaceRole {
    match m {
        MemberDescriptor::Constructor(_) => InterfaceRole::Factory,
        MemberDescriptor::Property(p) if p.is_indexer() => InterfaceRole::Instance,
        _ if m.is_static() => InterfaceRole::Manager,
        _ => InterfaceRole::Instance,
    }
}

fn project_member(m: &MemberDescriptor, hiding: HidingStatus) -> Option<ApiMember> {
    let kind = match m {
        MemberDescriptor::Property(p) => {
            let property = PropertySig {
                property_type: p.property_type.clone(),
                getter: public_access(p.getter.as_ref().map(|a| a.access)),
                setter: public_access(p.setter.as_ref().map(|a| a.access)),
            };
            if p.is_indexer() {
                MemberKind::Indexer {
                    property,
                    parameters: project_parameters(&p.index_parameters),
                }
            } else {
                MemberKind::Property(property)
            }
        }
        MemberDescriptor::Event(e) => MemberKind::Event {
            handler_type: e.handler_type.clone(),
            explicit_accessors: e.explicit_accessors,
        },
        MemberDescriptor::Method(md) => MemberKind::Method(MethodSig {
            parameters: project_parameters(&md.parameters),
            type_parameters: GenericResolver::method_parameters(md),
            return_type: md.return_type.clone(),
        }),
        MemberDescriptor::Constructor(c) => MemberKind::Constructor {
            parameters: project_parameters(&c.parameters),
        },
        MemberDescriptor::Field(_) | MemberDescriptor::NestedType { .. } => return None,
    };

    let modifiers = match hiding {
        HidingStatus::HidesBase => Modifiers::NEW,
        HidingStatus::Normal => Modifiers::empty(),
    };
    let mut member = ApiMember::new(m.name(), kind).with_modifiers(modifiers);
    member.attributes = carried_attributes(m.attributes());
    Some(member)
}

/// Only public accessors survive into an interface.
fn public_access(access: Option<Access>) -> Option<Access> {
    access.filter(|a| a.is_public())
}

fn project_parameters(parameters: &[ParameterDescriptor]) -> Vec<ApiParameter> {
    parameters
        .iter()
        .map(|p| ApiParameter {
            name: p.name.clone(),
            param_type: p.param_type.clone(),
            default: p.default.clone(),
            ref_kind: p.ref_kind,
        })
        .collect()
}

/// `[Obsolete]` is the one attribute consumers need on the interface.
fn carried_attributes(attributes: &[AttributeDescriptor]) -> Vec<ApiAttribute> {
    attributes
        .iter()
        .filter(|a| a.is_obsolete())
        .map(|a| ApiAttribute {
            attribute_type: a.attribute_type.clone(),
            arguments: a.arguments.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeRef;
    use serde_json::json;

    fn ty(value: serde_json::Value) -> TypeDescriptor {
        serde_json::from_value(value).unwrap()
    }

    fn int() -> serde_json::Value {
        json!({"kind": "named", "namespace": "System", "name": "Int32"})
    }

    fn classify(t: &TypeDescriptor, ancestors: &[&TypeDescriptor]) -> Vec<ClassifiedMember> {
        let chain: Vec<Ancestor> = ancestors
            .iter()
            .map(|a| Ancestor::new(a, Vec::new()))
            .collect();
        MemberClassifier::new(t, &chain, ClassifierOptions::default()).classify()
    }

    fn generic_base() -> TypeDescriptor {
        ty(json!({
            "namespace": "Acme", "name": "Base`1", "kind": "class",
            "generic_parameters": [{"name": "T"}],
            "members": [{"member": "method", "name": "Put",
                         "parameters": [{"name": "x", "param_type": {"kind": "generic_param", "name": "T"}}]}]
        }))
    }

    fn names(members: &[ClassifiedMember]) -> Vec<&str> {
        members.iter().map(|c| c.member.name.as_str()).collect()
    }

    #[test]
    fn test_routes_by_role_in_declaration_order() {
        let t = ty(json!({
            "namespace": "Acme", "name": "Widget", "kind": "class",
            "members": [
                {"member": "method", "name": "Spin"},
                {"member": "constructor"},
                {"member": "method", "name": "Default", "is_static": true},
                {"member": "property", "name": "Size", "property_type": int(),
                 "getter": {}, "setter": {}},
            ]
        }));
        let classified = classify(&t, &[]);
        let roles: Vec<InterfaceRole> = classified.iter().map(|c| c.role).collect();
        assert_eq!(names(&classified), vec!["Spin", ".ctor", "Default", "Size"]);
        assert_eq!(
            roles,
            vec![
                InterfaceRole::Instance,
                InterfaceRole::Factory,
                InterfaceRole::Manager,
                InterfaceRole::Instance,
            ]
        );
    }

    #[test]
    fn test_skips_non_public_synthesized_accessors_and_fields() {
        let t = ty(json!({
            "namespace": "Acme", "name": "Widget", "kind": "class",
            "members": [
                {"member": "method", "name": "Hidden", "access": "internal"},
                {"member": "method", "name": "get_Size", "special_name": true},
                {"member": "method", "name": "<Clone>$", "compiler_generated": true},
                {"member": "field", "name": "count", "field_type": int()},
                {"member": "field", "name": "Max", "field_type": int(), "is_literal": true, "is_static": true},
                {"member": "nested_type", "name": "Inner"},
                {"member": "constructor", "is_static": true, "access": "private"},
                {"member": "method", "name": "Visible"},
            ]
        }));
        assert_eq!(names(&classify(&t, &[])), vec!["Visible"]);
    }

    #[test]
    fn test_overrides_excluded() {
        let t = ty(json!({
            "namespace": "Acme", "name": "Widget", "kind": "class",
            "members": [
                {"member": "method", "name": "ToString", "is_virtual": true,
                 "root_declaring_type": "System.Object",
                 "return_type": {"kind": "named", "namespace": "System", "name": "String"}},
                {"member": "property", "name": "Size", "property_type": int(),
                 "getter": {"is_virtual": true, "root_declaring_type": "Acme.Part"}},
                {"member": "method", "name": "Own", "is_virtual": true,
                 "root_declaring_type": "Acme.Widget"},
            ]
        }));
        assert_eq!(names(&classify(&t, &[])), vec!["Own"]);
    }

    #[test]
    fn test_hiding_marks_new() {
        let base = ty(json!({
            "namespace": "Acme", "name": "Part", "kind": "class",
            "members": [
                {"member": "method", "name": "Reset"},
                {"member": "method", "name": "Scale", "parameters": [{"name": "f", "param_type": int()}]},
                {"member": "method", "name": "Private", "access": "private"},
            ]
        }));
        let derived = ty(json!({
            "namespace": "Acme", "name": "Widget", "kind": "class",
            "base": {"kind": "named", "namespace": "Acme", "name": "Part"},
            "members": [
                {"member": "method", "name": "Reset"},
                {"member": "method", "name": "Scale"},
                {"member": "method", "name": "Private"},
            ]
        }));
        let classified = classify(&derived, &[&base]);
        let hiding: Vec<HidingStatus> = classified.iter().map(|c| c.hiding).collect();
        assert_eq!(
            hiding,
            vec![HidingStatus::HidesBase, HidingStatus::Normal, HidingStatus::Normal]
        );
        assert!(classified[0].member.hides_base());
        assert!(!classified[1].member.hides_base());
    }

    #[test]
    fn test_hiding_through_closed_generic_base() {
        let base = generic_base();
        let derived = ty(json!({
            "namespace": "Acme", "name": "Derived", "kind": "class",
            "members": [{"member": "method", "name": "Put",
                         "parameters": [{"name": "x", "param_type": int()}]}]
        }));
        let chain = [Ancestor::new(&base, vec![TypeRef::named("System", "Int32")])];
        let classified =
            MemberClassifier::new(&derived, &chain, ClassifierOptions::default()).classify();
        assert_eq!(classified[0].hiding, HidingStatus::HidesBase);
    }

    #[test]
    fn test_same_parameter_name_under_other_argument_is_not_hiding() {
        let base = generic_base();
        let other = ty(json!({
            "namespace": "Acme", "name": "Other`1", "kind": "class",
            "generic_parameters": [{"name": "T"}],
            "members": [{"member": "method", "name": "Put",
                         "parameters": [{"name": "x", "param_type": {"kind": "generic_param", "name": "T"}}]}]
        }));
        let chain = [Ancestor::new(&base, vec![TypeRef::named("System", "String")])];
        let classified =
            MemberClassifier::new(&other, &chain, ClassifierOptions::default()).classify();
        assert_eq!(classified[0].hiding, HidingStatus::Normal);
    }

    #[test]
    fn test_hiding_found_on_far_ancestor() {
        let root = ty(json!({
            "namespace": "Acme", "name": "Root", "kind": "class",
            "members": [{"member": "event", "name": "Changed",
                         "handler_type": {"kind": "named", "namespace": "System", "name": "EventHandler"},
                         "add": {}, "remove": {}}]
        }));
        let middle = ty(json!({"namespace": "Acme", "name": "Middle", "kind": "class"}));
        let leaf = ty(json!({
            "namespace": "Acme", "name": "Leaf", "kind": "class",
            "members": [{"member": "event", "name": "Changed",
                         "handler_type": {"kind": "named", "namespace": "System", "name": "EventHandler"},
                         "add": {}, "remove": {}}]
        }));
        let classified = classify(&leaf, &[&middle, &root]);
        assert_eq!(classified[0].hiding, HidingStatus::HidesBase);
    }

    #[test]
    fn test_indexer_always_instance() {
        let t = ty(json!({
            "namespace": "Acme", "name": "Table", "kind": "class",
            "members": [{
                "member": "property", "name": "Item", "property_type": int(),
                "getter": {"is_static": true},
                "index_parameters": [{"name": "row", "param_type": int()}]
            }]
        }));
        let classified = classify(&t, &[]);
        assert_eq!(classified[0].role, InterfaceRole::Instance);
        assert!(matches!(classified[0].member.kind, MemberKind::Indexer { .. }));
    }

    #[test]
    fn test_non_public_accessor_dropped_from_projection() {
        let t = ty(json!({
            "namespace": "Acme", "name": "Widget", "kind": "class",
            "members": [{"member": "property", "name": "Size", "property_type": int(),
                         "getter": {}, "setter": {"access": "protected"}}]
        }));
        let classified = classify(&t, &[]);
        match &classified[0].member.kind {
            MemberKind::Property(p) => {
                assert!(p.can_read());
                assert!(!p.can_write());
            }
            other => panic!("Expected property, got {:?}", other),
        }
    }

    #[test]
    fn test_obsolete_members_follow_option() {
        let t = ty(json!({
            "namespace": "Acme", "name": "Widget", "kind": "class",
            "members": [{"member": "method", "name": "Old", "attributes": [
                {"attribute_type": {"kind": "named", "namespace": "System", "name": "ObsoleteAttribute"},
                 "arguments": [{"type": "string", "value": "use New"}]}
            ]}]
        }));
        assert!(classify(&t, &[]).is_empty());

        let options = ClassifierOptions {
            include_obsolete: true,
        };
        let classified = MemberClassifier::new(&t, &[], options).classify();
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].member.attributes.len(), 1);
    }
}
