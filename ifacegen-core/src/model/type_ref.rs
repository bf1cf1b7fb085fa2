//! References to types as they appear in signatures and base lists.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Separator between a generic type's name and its arity (`List`1`).
pub const ARITY_MARKER: char = '`';

/// A reference to a type.
///
/// Named types keep their metadata name including the arity marker, so
/// `List<int>` is `Named { namespace: "System.Collections.Generic",
/// name: "List`1", args: [Int32] }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Named {
        #[serde(default)]
        namespace: Option<String>,
        name: String,
        #[serde(default)]
        args: Vec<TypeRef>,
    },
    GenericParam {
        name: String,
    },
    Array {
        element: Box<TypeRef>,
        #[serde(default = "default_rank")]
        rank: u32,
    },
}

fn default_rank() -> u32 {
    1
}

impl TypeRef {
    /// A non-generic named type.
    pub fn named(namespace: &str, name: &str) -> Self {
        Self::Named {
            namespace: non_empty(namespace),
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    /// A constructed generic type. The arity marker is added when missing.
    pub fn generic(namespace: &str, name: &str, args: Vec<TypeRef>) -> Self {
        let name = if args.is_empty() || name.contains(ARITY_MARKER) {
            name.to_string()
        } else {
            with_arity(name, args.len())
        };
        Self::Named {
            namespace: non_empty(namespace),
            name,
            args,
        }
    }

    /// A reference to a generic type parameter.
    pub fn param(name: &str) -> Self {
        Self::GenericParam {
            name: name.to_string(),
        }
    }

    /// A single-dimension array of `element`.
    pub fn array(element: TypeRef) -> Self {
        Self::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    /// `System.Void`.
    pub fn void() -> Self {
        Self::named("System", "Void")
    }

    /// Namespace of a named type.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Named { namespace, .. } => namespace.as_deref(),
            _ => None,
        }
    }

    /// Metadata full name of the type definition (`Ns.List`1`), without
    /// type arguments. Generic parameters and arrays have no definition.
    pub fn definition_name(&self) -> Option<String> {
        match self {
            Self::Named {
                namespace, name, ..
            } => Some(full_name(namespace.as_deref(), name)),
            _ => None,
        }
    }

    /// True when this names `namespace.name` exactly.
    pub fn is(&self, ns: &str, type_name: &str) -> bool {
        matches!(self, Self::Named { namespace, name, .. }
            if namespace.as_deref() == Some(ns) && name == type_name)
    }

    pub fn is_void(&self) -> bool {
        self.is("System", "Void")
    }

    /// Type arguments of a constructed named type.
    pub fn type_args(&self) -> &[TypeRef] {
        match self {
            Self::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// Replaces generic parameters found in `map`; unmapped ones are kept.
    pub fn substitute(&self, map: &HashMap<String, TypeRef>) -> TypeRef {
        match self {
            Self::GenericParam { name } => map.get(name).cloned().unwrap_or_else(|| self.clone()),
            Self::Array { element, rank } => Self::Array {
                element: Box::new(element.substitute(map)),
                rank: *rank,
            },
            Self::Named {
                namespace,
                name,
                args,
            } => Self::Named {
                namespace: namespace.clone(),
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(map)).collect(),
            },
        }
    }
}

/// `namespace.name`, or just `name` for the global namespace.
pub fn full_name(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{}.{}", ns, name),
        _ => name.to_string(),
    }
}

/// Removes the arity marker and count from a metadata name.
pub fn strip_arity(name: &str) -> &str {
    match name.find(ARITY_MARKER) {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Appends the arity marker for `arity > 0`.
pub fn with_arity(name: &str, arity: usize) -> String {
    if arity == 0 {
        name.to_string()
    } else {
        format!("{}{}{}", name, ARITY_MARKER, arity)
    }
}

/// Arity encoded in a metadata name, `0` when there is no marker.
pub fn declared_arity(name: &str) -> Option<usize> {
    match name.find(ARITY_MARKER) {
        Some(idx) => name[idx + 1..].parse().ok(),
        None => Some(0),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
