//! Type reference → emittable identifier, with namespace accumulation.
//!
//! The accumulator is an explicit value owned by one traversal. Nothing in
//! the resolver itself is mutable, so one resolver can be shared across
//! parallel generation tasks.

use std::collections::BTreeSet;

use crate::model::{strip_arity, with_arity, InterfaceRole, TypeKind, TypeRef};

/// Namespaces referenced during one traversal, kept sorted and unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceSet {
    namespaces: BTreeSet<String>,
}

impl NamespaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, namespace: &str) {
        if !namespace.is_empty() && !self.namespaces.contains(namespace) {
            self.namespaces.insert(namespace.to_string());
        }
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.namespaces.contains(namespace)
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Namespaces needing an import from code that lives in `current`.
    pub fn imports_for<'a>(&'a self, current: Option<&'a str>) -> impl Iterator<Item = &'a str> {
        self.namespaces
            .iter()
            .map(String::as_str)
            .filter(move |ns| Some(*ns) != current)
    }
}

/// Keyword for a built-in type, if `namespace.name` is one.
pub fn keyword_for(namespace: &str, name: &str) -> Option<&'static str> {
    if namespace != "System" {
        return None;
    }
    let keyword = match name {
        "Boolean" => "bool",
        "Byte" => "byte",
        "SByte" => "sbyte",
        "Int16" => "short",
        "UInt16" => "ushort",
        "Int32" => "int",
        "UInt32" => "uint",
        "Int64" => "long",
        "UInt64" => "ulong",
        "Char" => "char",
        "Single" => "float",
        "Double" => "double",
        "Decimal" => "decimal",
        "Void" => "void",
        "String" => "string",
        "Object" => "object",
        _ => return None,
    };
    Some(keyword)
}

/// Resolves type references to source identifiers.
#[derive(Debug, Clone, Copy)]
pub struct NameResolver {
    simplify_namespaces: bool,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NameResolver {
    pub fn new(simplify_namespaces: bool) -> Self {
        Self {
            simplify_namespaces,
        }
    }

    pub fn simplifies_namespaces(&self) -> bool {
        self.simplify_namespaces
    }

    /// Resolves with type arguments, registering namespaces.
    pub fn resolve(&self, ty: &TypeRef, namespaces: &mut NamespaceSet) -> String {
        self.resolve_with(ty, true, false, namespaces)
    }

    /// Resolves a reference.
    ///
    /// With `ignore_namespace` the bare identifier is returned and nothing
    /// is registered. Type arguments are always resolved with namespace
    /// handling enabled.
    pub fn resolve_with(
        &self,
        ty: &TypeRef,
        include_type_arguments: bool,
        ignore_namespace: bool,
        namespaces: &mut NamespaceSet,
    ) -> String {
        match ty {
            TypeRef::GenericParam { name } => name.clone(),
            TypeRef::Array { element, rank } => {
                let element = self.resolve_with(element, true, ignore_namespace, namespaces);
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                format!("{}[{}]", element, commas)
            }
            TypeRef::Named {
                namespace,
                name,
                args,
            } => {
                let ns = namespace.as_deref().unwrap_or("");
                if args.is_empty() {
                    if let Some(keyword) = keyword_for(ns, name) {
                        return keyword.to_string();
                    }
                }
                if ns == "System" && strip_arity(name) == "Nullable" && args.len() == 1 {
                    let inner = self.resolve(&args[0], namespaces);
                    return format!("{}?", inner);
                }

                let mut identifier = strip_arity(name).to_string();
                if include_type_arguments && !args.is_empty() {
                    let args: Vec<String> = args
                        .iter()
                        .map(|a| self.resolve(a, namespaces))
                        .collect();
                    identifier = format!("{}<{}>", identifier, args.join(", "));
                }

                if ignore_namespace || ns.is_empty() {
                    identifier
                } else if self.simplify_namespaces {
                    namespaces.insert(ns);
                    identifier
                } else {
                    format!("global::{}.{}", ns, identifier)
                }
            }
        }
    }
}

/// Identifier of the generated declaration for `source_name` in `role`.
///
/// `IWidget`, `IWidgetFactory`, `IWidgetManager`; interface- and enum-like
/// sources keep their name unprefixed.
pub fn role_identifier(source_name: &str, kind: TypeKind, role: InterfaceRole) -> String {
    let bare = strip_arity(source_name);
    let prefix = if kind.is_interface_or_enum_like() { "" } else { "I" };
    format!("{}{}{}", prefix, bare, role.suffix())
}

/// Reference to the generated declaration standing in for `source` in
/// `role`. Type arguments are carried over.
pub fn role_type_ref(source: &TypeRef, kind: TypeKind, role: InterfaceRole) -> TypeRef {
    match source {
        TypeRef::Named {
            namespace,
            name,
            args,
        } => TypeRef::Named {
            namespace: namespace.clone(),
            name: with_arity(&role_identifier(name, kind, role), args.len()),
            args: args.clone(),
        },
        other => other.clone(),
    }
}

/// Factory method name for constructors of `source_name`: `CreateWidget`.
pub fn factory_method_name(source_name: &str) -> String {
    format!("Create{}", strip_arity(source_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> TypeRef {
        TypeRef::named("System", "Int32")
    }

    #[test]
    fn test_primitives_resolve_to_keywords() {
        let mut ns = NamespaceSet::new();
        for resolver in [NameResolver::new(true), NameResolver::new(false)] {
            assert_eq!(resolver.resolve(&int(), &mut ns), "int");
            assert_eq!(
                resolver.resolve(&TypeRef::named("System", "Object"), &mut ns),
                "object"
            );
            assert_eq!(resolver.resolve(&TypeRef::void(), &mut ns), "void");
        }
        assert!(ns.is_empty(), "keywords never register a namespace");
    }

    #[test]
    fn test_non_keyword_system_type_registers_namespace() {
        let mut ns = NamespaceSet::new();
        let resolver = NameResolver::new(true);
        let guid = TypeRef::named("System", "Guid");
        assert_eq!(resolver.resolve(&guid, &mut ns), "Guid");
        assert!(ns.contains("System"));
    }

    #[test]
    fn test_generic_arguments_resolved_recursively() {
        let mut ns = NamespaceSet::new();
        let resolver = NameResolver::new(true);
        let dict = TypeRef::generic(
            "System.Collections.Generic",
            "Dictionary",
            vec![
                TypeRef::named("System", "String"),
                TypeRef::generic("Acme.Data", "Row", vec![TypeRef::param("T")]),
            ],
        );
        assert_eq!(resolver.resolve(&dict, &mut ns), "Dictionary<string, Row<T>>");
        let imports: Vec<&str> = ns.imports_for(None).collect();
        assert_eq!(imports, vec!["Acme.Data", "System.Collections.Generic"]);
    }

    #[test]
    fn test_without_type_arguments() {
        let mut ns = NamespaceSet::new();
        let list = TypeRef::generic("System.Collections.Generic", "List", vec![int()]);
        let resolver = NameResolver::new(true);
        assert_eq!(resolver.resolve_with(&list, false, false, &mut ns), "List");
    }

    #[test]
    fn test_ignore_namespace_skips_accumulation() {
        let mut ns = NamespaceSet::new();
        let resolver = NameResolver::new(true);
        let widget = TypeRef::named("Acme", "Widget");
        assert_eq!(resolver.resolve_with(&widget, true, true, &mut ns), "Widget");
        assert!(ns.is_empty());
    }

    #[test]
    fn test_qualified_names_when_not_simplifying() {
        let mut ns = NamespaceSet::new();
        let resolver = NameResolver::new(false);
        let list = TypeRef::generic(
            "System.Collections.Generic",
            "List",
            vec![TypeRef::named("Acme", "Widget")],
        );
        assert_eq!(
            resolver.resolve(&list, &mut ns),
            "global::System.Collections.Generic.List<global::Acme.Widget>"
        );
        assert!(ns.is_empty());
    }

    #[test]
    fn test_arrays_and_nullable() {
        let mut ns = NamespaceSet::new();
        let resolver = NameResolver::new(true);
        assert_eq!(resolver.resolve(&TypeRef::array(int()), &mut ns), "int[]");
        let grid = TypeRef::Array {
            element: Box::new(TypeRef::param("T")),
            rank: 2,
        };
        assert_eq!(resolver.resolve(&grid, &mut ns), "T[,]");
        let nullable = TypeRef::generic("System", "Nullable", vec![int()]);
        assert_eq!(resolver.resolve(&nullable, &mut ns), "int?");
    }

    #[test]
    fn test_imports_exclude_current_namespace() {
        let mut ns = NamespaceSet::new();
        ns.insert("Acme");
        ns.insert("System");
        ns.insert("Acme");
        let imports: Vec<&str> = ns.imports_for(Some("Acme")).collect();
        assert_eq!(imports, vec!["System"]);
    }

    #[test]
    fn test_role_identifiers() {
        assert_eq!(role_identifier("Widget", TypeKind::Class, InterfaceRole::Instance), "IWidget");
        assert_eq!(
            role_identifier("Cache`2", TypeKind::Class, InterfaceRole::Factory),
            "ICacheFactory"
        );
        assert_eq!(
            role_identifier("Point", TypeKind::Struct, InterfaceRole::Manager),
            "IPointManager"
        );
        assert_eq!(
            role_identifier("IDisposable", TypeKind::Interface, InterfaceRole::Instance),
            "IDisposable"
        );
        assert_eq!(factory_method_name("Cache`2"), "CreateCache");
    }

    #[test]
    fn test_role_type_ref_keeps_arguments() {
        let base = TypeRef::generic("Acme", "Repository", vec![TypeRef::param("T")]);
        let projected = role_type_ref(&base, TypeKind::Class, InterfaceRole::Instance);
        assert_eq!(
            projected,
            TypeRef::generic("Acme", "IRepository", vec![TypeRef::param("T")])
        );
    }
}
