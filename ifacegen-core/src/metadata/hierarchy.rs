//! Inheritance chains over provider metadata.
//!
//! The ancestor walk stops at the first base the provider does not know
//! (external library types). A base chain that revisits a type is
//! malformed metadata.

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::descriptor::TypeDescriptor;
use super::MetadataProvider;
use crate::error::{IfacegenError, IfacegenResult};
use crate::model::TypeRef;

/// A known ancestor and the type arguments the descendant supplies to it.
///
/// `type_args` are expressed in the descendant's own type parameters, so
/// for `Leaf<U> : Middle<U[]>` and `Middle<T> : Root<List<T>>` the `Root`
/// entry carries `List<U[]>`.
#[derive(Debug, Clone)]
pub struct Ancestor<'p> {
    pub ty: &'p TypeDescriptor,
    pub type_args: Vec<TypeRef>,
}

impl<'p> Ancestor<'p> {
    pub fn new(ty: &'p TypeDescriptor, type_args: Vec<TypeRef>) -> Self {
        Self { ty, type_args }
    }

    /// Maps each of the ancestor's type parameters to its argument.
    ///
    /// Parameters without an argument (an open base reference) stay unmapped.
    pub fn substitution(&self) -> HashMap<String, TypeRef> {
        self.ty
            .generic_parameters
            .iter()
            .zip(&self.type_args)
            .map(|(g, arg)| (g.name.clone(), arg.clone()))
            .collect()
    }
}

/// Returns the known ancestors of `ty`, nearest first.
pub fn ancestor_chain<'p>(
    provider: &'p dyn MetadataProvider,
    ty: &TypeDescriptor,
) -> IfacegenResult<Vec<Ancestor<'p>>> {
    let start = ty.full_name();
    let mut seen: HashSet<String> = HashSet::from([start.clone()]);
    let mut chain = Vec::new();
    let mut next = constructed_base(provider, ty, &HashMap::new());

    while let Some(ancestor) = next {
        if !seen.insert(ancestor.ty.full_name()) {
            return Err(IfacegenError::cycle(start));
        }
        next = constructed_base(provider, ancestor.ty, &ancestor.substitution());
        chain.push(ancestor);
    }

    Ok(chain)
}

fn constructed_base<'p>(
    provider: &'p dyn MetadataProvider,
    ty: &TypeDescriptor,
    outer: &HashMap<String, TypeRef>,
) -> Option<Ancestor<'p>> {
    let base = ty.base.as_ref()?;
    let definition = provider.resolve(base)?;
    let args = base.type_args().iter().map(|a| a.substitute(outer)).collect();
    Some(Ancestor::new(definition, args))
}

/// Derived-to-base graph over every type a provider knows.
///
/// Built once per run to reject cyclic hierarchies up front.
pub struct InheritanceGraph {
    graph: DiGraph<String, ()>,
}

impl InheritanceGraph {
    pub fn build(provider: &dyn MetadataProvider) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<String, NodeIndex> = HashMap::new();

        let types = provider.types();
        for ty in &types {
            let name = ty.full_name();
            let idx = graph.add_node(name.clone());
            nodes.insert(name, idx);
        }

        for ty in &types {
            let Some(base) = ty.base.as_ref().and_then(|b| b.definition_name()) else {
                continue;
            };
            if let (Some(&from), Some(&to)) = (nodes.get(&ty.full_name()), nodes.get(&base)) {
                graph.add_edge(from, to, ());
            }
        }

        Self { graph }
    }

    /// Full names of every type sitting on an inheritance cycle.
    pub fn cyclic_types(&self) -> BTreeSet<String> {
        let mut cyclic = BTreeSet::new();
        for scc in tarjan_scc(&self.graph) {
            let self_loop = scc.len() == 1 && self.graph.contains_edge(scc[0], scc[0]);
            if scc.len() > 1 || self_loop {
                cyclic.extend(scc.into_iter().map(|idx| self.graph[idx].clone()));
            }
        }
        cyclic
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::JsonTypeLibrary;
    use serde_json::json;

    fn library(types: serde_json::Value) -> JsonTypeLibrary {
        let types = serde_json::from_value(types).unwrap();
        JsonTypeLibrary::from_types("Test", types).unwrap()
    }

    fn base(name: &str) -> serde_json::Value {
        json!({"kind": "named", "namespace": "Acme", "name": name})
    }

    #[test]
    fn test_ancestor_chain_nearest_first() {
        let lib = library(json!([
            {"namespace": "Acme", "name": "A", "kind": "class"},
            {"namespace": "Acme", "name": "B", "kind": "class", "base": base("A")},
            {"namespace": "Acme", "name": "C", "kind": "class", "base": base("B")},
        ]));
        let c = lib.type_by_name("Acme.C").unwrap();
        let chain: Vec<String> = ancestor_chain(&lib, c)
            .unwrap()
            .iter()
            .map(|a| a.ty.full_name())
            .collect();
        assert_eq!(chain, vec!["Acme.B", "Acme.A"]);
    }

    #[test]
    fn test_ancestor_chain_stops_at_unknown_base() {
        let lib = library(json!([
            {"namespace": "Acme", "name": "A", "kind": "class",
             "base": {"kind": "named", "namespace": "Vendor", "name": "External"}},
        ]));
        let a = lib.type_by_name("Acme.A").unwrap();
        assert!(ancestor_chain(&lib, a).unwrap().is_empty());
    }

    #[test]
    fn test_ancestor_arguments_compose_down_the_chain() {
        let t = json!({"kind": "generic_param", "name": "T"});
        let u = json!({"kind": "generic_param", "name": "U"});
        let lib = library(json!([
            {"namespace": "Acme", "name": "Root`1", "kind": "class",
             "generic_parameters": [{"name": "T"}]},
            {"namespace": "Acme", "name": "Middle`1", "kind": "class",
             "generic_parameters": [{"name": "T"}],
             "base": {"kind": "named", "namespace": "Acme", "name": "Root`1",
                      "args": [{"kind": "array", "element": t}]}},
            {"namespace": "Acme", "name": "Leaf`1", "kind": "class",
             "generic_parameters": [{"name": "U"}],
             "base": {"kind": "named", "namespace": "Acme", "name": "Middle`1", "args": [u]}},
        ]));
        let leaf = lib.type_by_name("Acme.Leaf`1").unwrap();
        let chain = ancestor_chain(&lib, leaf).unwrap();
        assert_eq!(chain[0].type_args, vec![TypeRef::param("U")]);
        assert_eq!(chain[1].type_args, vec![TypeRef::array(TypeRef::param("U"))]);
        assert_eq!(
            chain[1].substitution().get("T"),
            Some(&TypeRef::array(TypeRef::param("U")))
        );
    }

    #[test]
    fn test_cycle_detected() {
        let lib = library(json!([
            {"namespace": "Acme", "name": "A", "kind": "class", "base": base("B")},
            {"namespace": "Acme", "name": "B", "kind": "class", "base": base("A")},
            {"namespace": "Acme", "name": "C", "kind": "class", "base": base("A")},
        ]));
        let c = lib.type_by_name("Acme.C").unwrap();
        assert!(matches!(
            ancestor_chain(&lib, c),
            Err(IfacegenError::InheritanceCycle { .. })
        ));

        let graph = InheritanceGraph::build(&lib);
        let cyclic: Vec<String> = graph.cyclic_types().into_iter().collect();
        assert_eq!(cyclic, vec!["Acme.A", "Acme.B"]);
    }
}
