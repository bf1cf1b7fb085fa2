//! The abstract API model: declarations the generator turns into text.
//!
//! An [`ApiType`] owns its members. Each member keeps a non-owning
//! back-reference to its declaring type (by full name), assigned by
//! [`ApiType::add_member`] before the member becomes visible.

use serde::{Deserialize, Serialize};

use super::flags::{Access, Modifiers};
use super::literal::LiteralValue;
use super::type_ref::{full_name, TypeRef};

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Delegate => "delegate",
        }
    }

    /// Interface and enum names are already abstract-looking and are
    /// never given the interface prefix.
    pub fn is_interface_or_enum_like(self) -> bool {
        matches!(self, Self::Interface | Self::Enum)
    }
}

/// Which generated declaration a classified member lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceRole {
    Instance,
    Factory,
    Manager,
}

impl InterfaceRole {
    /// Identifier suffix for the role.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Instance => "",
            Self::Factory => "Factory",
            Self::Manager => "Manager",
        }
    }
}

impl std::fmt::Display for InterfaceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance => write!(f, "instance"),
            Self::Factory => write!(f, "factory"),
            Self::Manager => write!(f, "manager"),
        }
    }
}

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    #[default]
    ByValue,
    Ref,
    Out,
    In,
    This,
    Params,
}

impl RefKind {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::ByValue => None,
            Self::Ref => Some("ref"),
            Self::Out => Some("out"),
            Self::In => Some("in"),
            Self::This => Some("this"),
            Self::Params => Some("params"),
        }
    }
}

/// Generic parameter variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variance {
    #[default]
    Invariant,
    Covariant,
    Contravariant,
}

impl Variance {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Invariant => None,
            Self::Covariant => Some("out"),
            Self::Contravariant => Some("in"),
        }
    }
}

/// One entry of a generic constraint clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    ReferenceType,
    ValueType,
    Constructible,
    Type(TypeRef),
}

/// A generic type parameter of a type or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTypeParameter {
    pub name: String,
    /// Name of the declaring method; `None` for type-level parameters.
    pub declaring_method: Option<String>,
    pub constraints: Vec<Constraint>,
    pub variance: Variance,
}

impl ApiTypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaring_method: None,
            constraints: Vec::new(),
            variance: Variance::Invariant,
        }
    }

    pub fn is_type_level(&self) -> bool {
        self.declaring_method.is_none()
    }
}

/// A custom attribute applied to a type or member.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiAttribute {
    pub attribute_type: TypeRef,
    pub arguments: Vec<LiteralValue>,
}

/// A method, constructor or indexer parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiParameter {
    pub name: String,
    pub param_type: TypeRef,
    /// `Some` when the parameter has a default value.
    pub default: Option<LiteralValue>,
    pub ref_kind: RefKind,
}

impl ApiParameter {
    pub fn new(name: impl Into<String>, param_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            param_type,
            default: None,
            ref_kind: RefKind::ByValue,
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Property shape shared by properties and indexers.
///
/// An accessor is present when its access is `Some`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySig {
    pub property_type: TypeRef,
    pub getter: Option<Access>,
    pub setter: Option<Access>,
}

impl PropertySig {
    pub fn can_read(&self) -> bool {
        self.getter.is_some()
    }

    pub fn can_write(&self) -> bool {
        self.setter.is_some()
    }
}

/// Method shape.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub parameters: Vec<ApiParameter>,
    pub type_parameters: Vec<ApiTypeParameter>,
    pub return_type: TypeRef,
}

/// The member variants.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    Field {
        field_type: TypeRef,
    },
    Property(PropertySig),
    Indexer {
        property: PropertySig,
        parameters: Vec<ApiParameter>,
    },
    Event {
        handler_type: TypeRef,
        explicit_accessors: bool,
    },
    Method(MethodSig),
    Constructor {
        parameters: Vec<ApiParameter>,
    },
}

/// A member of an [`ApiType`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiMember {
    pub name: String,
    declaring_type: Option<String>,
    pub access: Access,
    pub modifiers: Modifiers,
    pub attributes: Vec<ApiAttribute>,
    pub kind: MemberKind,
}

impl ApiMember {
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            declaring_type: None,
            access: Access::Public,
            modifiers: Modifiers::empty(),
            attributes: Vec::new(),
            kind,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Full name of the type this member was added to.
    pub fn declaring_type(&self) -> Option<&str> {
        self.declaring_type.as_deref()
    }

    pub fn hides_base(&self) -> bool {
        self.modifiers.contains(Modifiers::NEW)
    }
}

/// A type declaration in the API model.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiType {
    pub namespace: Option<String>,
    /// Bare identifier, without arity marker.
    pub name: String,
    pub kind: TypeKind,
    pub access: Access,
    pub modifiers: Modifiers,
    /// Base class; ignored for interfaces, which list bases as interfaces.
    pub base: Option<TypeRef>,
    interfaces: Vec<TypeRef>,
    pub type_parameters: Vec<ApiTypeParameter>,
    pub attributes: Vec<ApiAttribute>,
    members: Vec<ApiMember>,
}

impl ApiType {
    pub fn new(namespace: Option<&str>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
            name: name.into(),
            kind,
            access: Access::Public,
            modifiers: Modifiers::empty(),
            base: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            attributes: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn full_name(&self) -> String {
        full_name(self.namespace.as_deref(), &self.name)
    }

    /// Appends an implemented interface, ignoring duplicates.
    pub fn add_interface(&mut self, iface: TypeRef) {
        if !self.interfaces.contains(&iface) {
            self.interfaces.push(iface);
        }
    }

    pub fn interfaces(&self) -> &[TypeRef] {
        &self.interfaces
    }

    /// Appends a member, assigning its declaring-type back-reference.
    pub fn add_member(&mut self, mut member: ApiMember) {
        member.declaring_type = Some(self.full_name());
        self.members.push(member);
    }

    pub fn members(&self) -> &[ApiMember] {
        &self.members
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// A reference to this declaration, with its own type parameters as
    /// type arguments.
    pub fn self_ref(&self) -> TypeRef {
        let args = self
            .type_parameters
            .iter()
            .map(|p| TypeRef::param(&p.name))
            .collect();
        TypeRef::generic(self.namespace.as_deref().unwrap_or(""), &self.name, args)
    }
}

/// Everything generated for one source type: a namespace and the
/// declarations that go in it. `key` is the source type's full name.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub key: String,
    pub namespace: Option<String>,
    pub types: Vec<ApiType>,
}

impl CompilationUnit {
    pub fn new(key: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            key: key.into(),
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
            types: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The declaration with the given identifier.
    pub fn declaration(&self, identifier: &str) -> Option<&ApiType> {
        self.types.iter().find(|t| t.name == identifier)
    }
}
