//! Source-side type descriptions consumed by the projector.
//!
//! These mirror what a reflection API reports for a loaded type: kind,
//! base, interfaces, generic parameters and the members the type itself
//! declares, each with accessor visibility, staticness and the type that
//! holds the root declaration (for override detection).

use serde::{Deserialize, Serialize};

use crate::model::{full_name, Access, LiteralValue, Modifiers, RefKind, TypeKind, TypeRef, Variance};

/// A type library document: one assembly's worth of types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeLibrary {
    pub assembly: String,
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

/// A custom attribute on a type or member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub attribute_type: TypeRef,
    #[serde(default)]
    pub arguments: Vec<LiteralValue>,
}

impl AttributeDescriptor {
    pub fn is_obsolete(&self) -> bool {
        self.attribute_type.is("System", "ObsoleteAttribute")
    }
}

fn any_obsolete(attributes: &[AttributeDescriptor]) -> bool {
    attributes.iter().any(AttributeDescriptor::is_obsolete)
}

/// A declared generic parameter with its raw constraint flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenericParameterDescriptor {
    pub name: String,
    #[serde(default)]
    pub reference_type: bool,
    #[serde(default)]
    pub value_type: bool,
    #[serde(default)]
    pub default_constructor: bool,
    #[serde(default)]
    pub constraints: Vec<TypeRef>,
    #[serde(default)]
    pub variance: Variance,
}

/// Visibility and dispatch facts for one accessor or method body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessorDescriptor {
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_final: bool,
    /// Full name of the type holding the root declaration of this slot.
    /// `None` means the declaring type itself.
    #[serde(default)]
    pub root_declaring_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub param_type: TypeRef,
    #[serde(default)]
    pub default: Option<LiteralValue>,
    #[serde(default)]
    pub ref_kind: RefKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: TypeRef,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub is_static: bool,
    /// Compile-time constant.
    #[serde(default)]
    pub is_literal: bool,
    #[serde(default)]
    pub compiler_generated: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub property_type: TypeRef,
    #[serde(default)]
    pub getter: Option<AccessorDescriptor>,
    #[serde(default)]
    pub setter: Option<AccessorDescriptor>,
    /// Non-empty for indexers.
    #[serde(default)]
    pub index_parameters: Vec<ParameterDescriptor>,
    #[serde(default)]
    pub compiler_generated: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeDescriptor>,
}

impl PropertyDescriptor {
    pub fn is_indexer(&self) -> bool {
        !self.index_parameters.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub name: String,
    pub handler_type: TypeRef,
    #[serde(default)]
    pub add: Option<AccessorDescriptor>,
    #[serde(default)]
    pub remove: Option<AccessorDescriptor>,
    #[serde(default)]
    pub explicit_accessors: bool,
    #[serde(default)]
    pub compiler_generated: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub accessor: AccessorDescriptor,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(default = "TypeRef::void")]
    pub return_type: TypeRef,
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameterDescriptor>,
    /// Accessor and operator methods carry a special name.
    #[serde(default)]
    pub special_name: bool,
    #[serde(default)]
    pub compiler_generated: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructorDescriptor {
    #[serde(default)]
    pub access: Access,
    /// Type initializers are static constructors.
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(default)]
    pub compiler_generated: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeDescriptor>,
}

/// A member declared by a type, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum MemberDescriptor {
    Field(FieldDescriptor),
    Property(PropertyDescriptor),
    Event(EventDescriptor),
    Method(MethodDescriptor),
    Constructor(ConstructorDescriptor),
    NestedType { name: String },
}

impl MemberDescriptor {
    pub fn name(&self) -> &str {
        match self {
            Self::Field(f) => &f.name,
            Self::Property(p) => &p.name,
            Self::Event(e) => &e.name,
            Self::Method(m) => &m.name,
            Self::Constructor(_) => ".ctor",
            Self::NestedType { name } => name,
        }
    }

    pub fn attributes(&self) -> &[AttributeDescriptor] {
        match self {
            Self::Field(f) => &f.attributes,
            Self::Property(p) => &p.attributes,
            Self::Event(e) => &e.attributes,
            Self::Method(m) => &m.attributes,
            Self::Constructor(c) => &c.attributes,
            Self::NestedType { .. } => &[],
        }
    }

    pub fn is_compiler_generated(&self) -> bool {
        match self {
            Self::Field(f) => f.compiler_generated,
            Self::Property(p) => p.compiler_generated,
            Self::Event(e) => e.compiler_generated,
            Self::Method(m) => m.compiler_generated,
            Self::Constructor(c) => c.compiler_generated,
            Self::NestedType { .. } => false,
        }
    }

    /// The accessor used for override and staticness tests: the getter
    /// (setter for write-only properties), the add accessor, or the
    /// method itself.
    pub fn first_accessor(&self) -> Option<&AccessorDescriptor> {
        match self {
            Self::Property(p) => p.getter.as_ref().or(p.setter.as_ref()),
            Self::Event(e) => e.add.as_ref().or(e.remove.as_ref()),
            Self::Method(m) => Some(&m.accessor),
            _ => None,
        }
    }

    /// Public as seen by consumers: for properties and events, any public
    /// accessor makes the member public.
    pub fn is_public(&self) -> bool {
        match self {
            Self::Field(f) => f.access.is_public(),
            Self::Property(p) => [&p.getter, &p.setter]
                .into_iter()
                .flatten()
                .any(|a| a.access.is_public()),
            Self::Event(e) => [&e.add, &e.remove]
                .into_iter()
                .flatten()
                .any(|a| a.access.is_public()),
            Self::Method(m) => m.accessor.access.is_public(),
            Self::Constructor(c) => c.access.is_public() && !c.is_static,
            Self::NestedType { .. } => false,
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            Self::Field(f) => f.is_static,
            Self::Constructor(c) => c.is_static,
            _ => self.first_accessor().is_some_and(|a| a.is_static),
        }
    }

    pub fn is_obsolete(&self) -> bool {
        any_obsolete(self.attributes())
    }
}

/// One type as described by a metadata provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    #[serde(default)]
    pub namespace: Option<String>,
    /// Metadata name including the arity marker (`Cache`2`).
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub is_sealed: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_nested: bool,
    #[serde(default)]
    pub base: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameterDescriptor>,
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
    #[serde(default)]
    pub attributes: Vec<AttributeDescriptor>,
    /// Owning assembly; filled in when the library is loaded.
    #[serde(default)]
    pub assembly: String,
}

impl TypeDescriptor {
    pub fn full_name(&self) -> String {
        full_name(self.namespace.as_deref(), &self.name)
    }

    pub fn modifiers(&self) -> Modifiers {
        let mut m = Modifiers::empty();
        m.set(Modifiers::SEALED, self.is_sealed);
        m.set(Modifiers::ABSTRACT, self.is_abstract);
        m
    }

    /// Sealed and abstract: cannot be instantiated, static members only.
    pub fn is_static_like(&self) -> bool {
        self.modifiers().is_static_like()
    }

    pub fn is_obsolete(&self) -> bool {
        any_obsolete(&self.attributes)
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }
}
