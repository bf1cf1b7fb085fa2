//! Type projection: one source type → zero to three interface declarations.
//!
//! | Source shape          | Instance | Factory          | Manager             |
//! |-----------------------|----------|------------------|---------------------|
//! | Normal class / struct | always   | ≥1 constructor   | ≥1 static member    |
//! | Static-like           | never    | never            | always              |
//!
//! Interfaces, enums, delegates and nested types project to nothing.

use tracing::{debug, info};

use crate::classify::{ClassifierOptions, MemberClassifier};
use crate::error::{IfacegenError, IfacegenResult};
use crate::metadata::{ancestor_chain, MetadataProvider, TypeDescriptor};
use crate::model::{
    declared_arity, ApiAttribute, ApiMember, ApiType, ApiTypeParameter, CompilationUnit,
    InterfaceRole, MemberKind, MethodSig, TypeKind, TypeRef,
};
use crate::resolve::{factory_method_name, role_identifier, role_type_ref, GenericResolver};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionOptions {
    pub include_obsolete: bool,
}

/// Projects source types read from a metadata provider.
pub struct TypeProjector<'p> {
    provider: &'p dyn MetadataProvider,
    options: ProjectionOptions,
}

impl<'p> TypeProjector<'p> {
    pub fn new(provider: &'p dyn MetadataProvider, options: ProjectionOptions) -> Self {
        Self { provider, options }
    }

    /// Projects the type with metadata full name `full_name`.
    pub fn project_by_name(&self, full_name: &str) -> IfacegenResult<CompilationUnit> {
        let ty = self.provider.require(full_name)?;
        self.project(ty)
    }

    pub fn project(&self, ty: &TypeDescriptor) -> IfacegenResult<CompilationUnit> {
        validate(ty)?;

        let key = ty.full_name();
        let mut unit = CompilationUnit::new(key.as_str(), ty.namespace.as_deref());
        if !is_projectable(ty) {
            debug!(type_name = %key, kind = ty.kind.keyword(), "not projected");
            return Ok(unit);
        }

        let ancestors = ancestor_chain(self.provider, ty)?;
        let classifier_options = ClassifierOptions {
            include_obsolete: self.options.include_obsolete,
        };
        let classified = MemberClassifier::new(ty, &ancestors, classifier_options).classify();

        let type_parameters = GenericResolver::type_parameters(ty);
        let mut instance = declaration(ty, InterfaceRole::Instance, &type_parameters);
        let mut factory = declaration(ty, InterfaceRole::Factory, &type_parameters);
        let mut manager = declaration(ty, InterfaceRole::Manager, &type_parameters);
        let static_like = ty.is_static_like();

        if !static_like {
            self.add_instance_bases(ty, &mut instance);
        }
        let instance_ref = instance.self_ref();

        for c in classified {
            match c.role {
                InterfaceRole::Factory => {
                    if let Some(create) = factory_member(ty, c.member, &instance_ref) {
                        factory.add_member(create);
                    }
                }
                _ if static_like => manager.add_member(c.member),
                InterfaceRole::Manager => manager.add_member(c.member),
                InterfaceRole::Instance => instance.add_member(c.member),
            }
        }

        if static_like {
            unit.types.push(manager);
        } else {
            unit.types.push(instance);
            if !factory.members().is_empty() {
                unit.types.push(factory);
            }
            if !manager.members().is_empty() {
                unit.types.push(manager);
            }
        }

        info!(
            type_name = %key,
            declarations = unit.types.len(),
            static_like,
            "projected type"
        );
        Ok(unit)
    }

    /// Base list: projected base class (root types excluded), then each
    /// implemented interface.
    fn add_instance_bases(&self, ty: &TypeDescriptor, instance: &mut ApiType) {
        if let Some(base) = ty.base.as_ref().filter(|b| !is_root_type(b)) {
            let kind = self.kind_of(base, TypeKind::Class);
            instance.add_interface(role_type_ref(base, kind, InterfaceRole::Instance));
        }
        for iface in &ty.interfaces {
            let kind = self.kind_of(iface, TypeKind::Interface);
            instance.add_interface(role_type_ref(iface, kind, InterfaceRole::Instance));
        }
    }

    fn kind_of(&self, ty: &TypeRef, fallback: TypeKind) -> TypeKind {
        self.provider.resolve(ty).map_or(fallback, |d| d.kind)
    }
}

fn is_projectable(ty: &TypeDescriptor) -> bool {
    matches!(ty.kind, TypeKind::Class | TypeKind::Struct) && !ty.is_nested
}

/// `System.Object` and `System.ValueType` add nothing to a base list.
fn is_root_type(ty: &TypeRef) -> bool {
    ty.is("System", "Object") || ty.is("System", "ValueType")
}

fn validate(ty: &TypeDescriptor) -> IfacegenResult<()> {
    if ty.name.trim().is_empty() {
        return Err(IfacegenError::metadata(ty.full_name(), "empty type name"));
    }
    match declared_arity(&ty.name) {
        None => Err(IfacegenError::metadata(
            ty.full_name(),
            "malformed generic arity marker",
        )),
        Some(arity) if arity != ty.generic_parameters.len() => Err(IfacegenError::metadata(
            ty.full_name(),
            format!(
                "name declares arity {} but {} generic parameters are listed",
                arity,
                ty.generic_parameters.len()
            ),
        )),
        Some(_) => Ok(()),
    }
}

fn declaration(
    ty: &TypeDescriptor,
    role: InterfaceRole,
    type_parameters: &[ApiTypeParameter],
) -> ApiType {
    let mut decl = ApiType::new(
        ty.namespace.as_deref(),
        role_identifier(&ty.name, ty.kind, role),
        TypeKind::Interface,
    );
    decl.type_parameters = type_parameters.to_vec();
    decl.attributes = ty
        .attributes
        .iter()
        .filter(|a| a.is_obsolete())
        .map(|a| ApiAttribute {
            attribute_type: a.attribute_type.clone(),
            arguments: a.arguments.clone(),
        })
        .collect();
    decl
}

/// Turns a constructor into `I{Name} Create{Name}(params)`.
fn factory_member(
    ty: &TypeDescriptor,
    ctor: ApiMember,
    instance_ref: &TypeRef,
) -> Option<ApiMember> {
    let MemberKind::Constructor { parameters } = ctor.kind else {
        return None;
    };
    let mut create = ApiMember::new(
        factory_method_name(&ty.name),
        MemberKind::Method(MethodSig {
            parameters,
            type_parameters: Vec::new(),
            return_type: instance_ref.clone(),
        }),
    );
    create.attributes = ctor.attributes;
    Some(create)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::JsonTypeLibrary;
    use crate::model::Constraint;
    use serde_json::json;

    fn library(types: serde_json::Value) -> JsonTypeLibrary {
        JsonTypeLibrary::from_types("Test", serde_json::from_value(types).unwrap()).unwrap()
    }

    fn project(lib: &JsonTypeLibrary, name: &str) -> CompilationUnit {
        TypeProjector::new(lib, ProjectionOptions::default())
            .project_by_name(name)
            .unwrap()
    }

    fn identifiers(unit: &CompilationUnit) -> Vec<&str> {
        unit.types.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_empty_class_gets_instance_and_factory() {
        let lib = library(json!([
            {"namespace": "Acme", "name": "Foo", "kind": "class",
             "base": {"kind": "named", "namespace": "System", "name": "Object"},
             "members": [{"member": "constructor"}]}
        ]));
        let unit = project(&lib, "Acme.Foo");
        assert_eq!(identifiers(&unit), vec!["IFoo", "IFooFactory"]);

        let instance = unit.declaration("IFoo").unwrap();
        assert!(instance.members().is_empty());
        assert!(instance.interfaces().is_empty(), "root object is not a base");

        let factory = unit.declaration("IFooFactory").unwrap();
        assert_eq!(factory.members().len(), 1);
        let create = &factory.members()[0];
        assert_eq!(create.name, "CreateFoo");
        assert_eq!(create.declaring_type(), Some("Acme.IFooFactory"));
        match &create.kind {
            MemberKind::Method(sig) => {
                assert_eq!(sig.return_type, TypeRef::named("Acme", "IFoo"));
                assert!(sig.parameters.is_empty());
            }
            other => panic!("Expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_static_like_gets_only_manager() {
        let lib = library(json!([
            {"namespace": "Acme", "name": "Foo", "kind": "class",
             "is_sealed": true, "is_abstract": true,
             "members": [
                {"member": "method", "name": "Run", "is_static": true},
                {"member": "property", "name": "Count",
                 "property_type": {"kind": "named", "namespace": "System", "name": "Int32"},
                 "getter": {"is_static": true}}
             ]},
            {"namespace": "Acme", "name": "Empty", "kind": "class",
             "is_sealed": true, "is_abstract": true}
        ]));
        let unit = project(&lib, "Acme.Foo");
        assert_eq!(identifiers(&unit), vec!["IFooManager"]);
        assert_eq!(unit.types[0].members().len(), 2);

        let empty = project(&lib, "Acme.Empty");
        assert_eq!(identifiers(&empty), vec!["IEmptyManager"]);
        assert!(empty.types[0].members().is_empty());
    }

    #[test]
    fn test_manager_only_when_static_members_exist() {
        let lib = library(json!([
            {"namespace": "Acme", "name": "Pool", "kind": "class",
             "members": [
                {"member": "method", "name": "Rent"},
                {"member": "method", "name": "Shared", "is_static": true}
             ]}
        ]));
        let unit = project(&lib, "Acme.Pool");
        assert_eq!(identifiers(&unit), vec!["IPool", "IPoolManager"]);
    }

    #[test]
    fn test_generic_type_shares_parameters() {
        let lib = library(json!([
            {"namespace": "Acme", "name": "Foo`1", "kind": "class",
             "generic_parameters": [{"name": "T1", "reference_type": true}],
             "members": [
                {"member": "constructor"},
                {"member": "method", "name": "Make", "is_static": true}
             ]}
        ]));
        let unit = project(&lib, "Acme.Foo`1");
        assert_eq!(identifiers(&unit), vec!["IFoo", "IFooFactory", "IFooManager"]);
        for decl in &unit.types {
            assert_eq!(decl.type_parameters.len(), 1);
            assert_eq!(decl.type_parameters[0].constraints, vec![Constraint::ReferenceType]);
        }
        let factory = unit.declaration("IFooFactory").unwrap();
        match &factory.members()[0].kind {
            MemberKind::Method(sig) => assert_eq!(
                sig.return_type,
                TypeRef::generic("Acme", "IFoo", vec![TypeRef::param("T1")])
            ),
            other => panic!("Expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_instance_base_list_order() {
        let lib = library(json!([
            {"namespace": "Acme", "name": "Part", "kind": "class"},
            {"namespace": "Acme", "name": "IShape", "kind": "interface"},
            {"namespace": "Acme", "name": "Widget", "kind": "class",
             "base": {"kind": "named", "namespace": "Acme", "name": "Part"},
             "interfaces": [
                {"kind": "named", "namespace": "System", "name": "IDisposable"},
                {"kind": "named", "namespace": "Acme", "name": "IShape"}
             ]}
        ]));
        let unit = project(&lib, "Acme.Widget");
        let bases = unit.types[0].interfaces();
        assert_eq!(
            bases,
            [
                TypeRef::named("Acme", "IPart"),
                TypeRef::named("System", "IDisposable"),
                TypeRef::named("Acme", "IShape"),
            ]
        );
    }

    #[test]
    fn test_interfaces_and_enums_project_to_nothing() {
        let lib = library(json!([
            {"namespace": "Acme", "name": "IShape", "kind": "interface"},
            {"namespace": "Acme", "name": "Color", "kind": "enum"}
        ]));
        assert!(project(&lib, "Acme.IShape").is_empty());
        assert!(project(&lib, "Acme.Color").is_empty());
    }

    #[test]
    fn test_missing_and_malformed_types_fail() {
        let lib = library(json!([
            {"namespace": "Acme", "name": "Broken`2", "kind": "class",
             "generic_parameters": [{"name": "T"}]}
        ]));
        let projector = TypeProjector::new(&lib, ProjectionOptions::default());
        assert!(matches!(
            projector.project_by_name("Acme.Nope"),
            Err(IfacegenError::MissingType { .. })
        ));
        assert!(matches!(
            projector.project_by_name("Acme.Broken`2"),
            Err(IfacegenError::Metadata { .. })
        ));
    }
}
