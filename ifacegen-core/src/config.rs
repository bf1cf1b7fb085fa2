//! Configuration loading from ifacegen.toml, and type selection.
//!
//! ```toml
//! [generation]
//! simplify_namespaces = true
//! include_obsolete = false
//! output_dir = "generated"
//!
//! [[assembly]]
//! name = "Acme.Core"
//! mode = "whitelist"
//! namespaces = [{ name = "Acme.Widgets", recursive = true }]
//! types = ["Acme.Legacy.*Helper"]
//! ```

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{IfacegenError, IfacegenResult};
use crate::metadata::TypeDescriptor;

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = "ifacegen.toml";

/// Main configuration structure for ifacegen.toml.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct IfacegenConfig {
    pub generation: GenerationConfig,
    /// Per-assembly selection entries.
    #[serde(rename = "assembly")]
    pub assemblies: Vec<AssemblyConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub simplify_namespaces: bool,
    pub include_obsolete: bool,
    pub output_dir: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            simplify_namespaces: true,
            include_obsolete: false,
            output_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Only matching types are generated.
    #[default]
    Whitelist,
    /// Everything except matching types is generated.
    Blacklist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssemblyConfig {
    pub name: String,
    #[serde(default)]
    pub mode: SelectionMode,
    #[serde(default)]
    pub namespaces: Vec<NamespaceSelector>,
    /// Type full names; `*` matches any run of characters.
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamespaceSelector {
    pub name: String,
    #[serde(default)]
    pub recursive: bool,
}

impl NamespaceSelector {
    fn matches(&self, namespace: &str) -> bool {
        namespace == self.name
            || (self.recursive
                && namespace
                    .strip_prefix(self.name.as_str())
                    .is_some_and(|rest| rest.starts_with('.')))
    }
}

/// Loads configuration from ifacegen.toml in `root` if it exists.
pub fn load_config(root: &Path) -> Result<Option<IfacegenConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Loads configuration from an explicit path.
pub fn load_config_file(path: &Path) -> Result<IfacegenConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content)
        .with_context(|| format!("Invalid {}", path.display()))?;
    Ok(cfg)
}

#[derive(Debug, Clone)]
struct CompiledAssembly {
    name: String,
    mode: SelectionMode,
    namespaces: Vec<NamespaceSelector>,
    types: Vec<Regex>,
}

impl CompiledAssembly {
    fn matches(&self, ty: &TypeDescriptor) -> bool {
        let ns = ty.namespace.as_deref().unwrap_or("");
        let full_name = ty.full_name();
        self.namespaces.iter().any(|s| s.matches(ns))
            || self.types.iter().any(|re| re.is_match(&full_name))
    }
}

/// Decides which types a run generates.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    assemblies: Vec<CompiledAssembly>,
    include_obsolete: bool,
}

impl Selection {
    /// Selects every non-obsolete type.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn from_config(config: &IfacegenConfig) -> IfacegenResult<Self> {
        let assemblies = config
            .assemblies
            .iter()
            .map(|a| {
                let types = a
                    .types
                    .iter()
                    .map(|p| wildcard(p))
                    .collect::<IfacegenResult<Vec<_>>>()?;
                Ok(CompiledAssembly {
                    name: a.name.clone(),
                    mode: a.mode,
                    namespaces: a.namespaces.clone(),
                    types,
                })
            })
            .collect::<IfacegenResult<Vec<_>>>()?;
        Ok(Self {
            assemblies,
            include_obsolete: config.generation.include_obsolete,
        })
    }

    pub fn include_obsolete(mut self, enabled: bool) -> Self {
        self.include_obsolete = enabled;
        self
    }

    pub fn includes_obsolete(&self) -> bool {
        self.include_obsolete
    }

    /// Whether `ty` is generated. Assemblies without an entry are skipped
    /// once any entry exists.
    pub fn includes(&self, ty: &TypeDescriptor) -> bool {
        if ty.is_obsolete() && !self.include_obsolete {
            return false;
        }
        if self.assemblies.is_empty() {
            return true;
        }
        let Some(entry) = self.assemblies.iter().find(|a| a.name == ty.assembly) else {
            return false;
        };
        match entry.mode {
            SelectionMode::Whitelist => entry.matches(ty),
            SelectionMode::Blacklist => !entry.matches(ty),
        }
    }
}

fn wildcard(pattern: &str) -> IfacegenResult<Regex> {
    let body = regex::escape(pattern).replace(r"\*", ".*");
    Regex::new(&format!("^{}$", body)).map_err(|e| {
        IfacegenError::invalid_argument(format!("bad type pattern {:?}: {}", pattern, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ty(assembly: &str, ns: &str, name: &str) -> TypeDescriptor {
        let mut t: TypeDescriptor =
            serde_json::from_value(json!({"namespace": ns, "name": name, "kind": "class"}))
                .unwrap();
        t.assembly = assembly.to_string();
        t
    }

    fn parse(text: &str) -> IfacegenConfig {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = parse("");
        assert!(cfg.generation.simplify_namespaces);
        assert!(!cfg.generation.include_obsolete);
        assert!(cfg.assemblies.is_empty());
    }

    #[test]
    fn test_load_config_from_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(dir.path()).unwrap().is_none());

        fs::write(
            dir.path().join(CONFIG_FILE),
            "[generation]\nsimplify_namespaces = false\noutput_dir = \"gen\"\n",
        )
        .unwrap();
        let cfg = load_config(dir.path()).unwrap().unwrap();
        assert!(!cfg.generation.simplify_namespaces);
        assert_eq!(cfg.generation.output_dir, Some(PathBuf::from("gen")));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[[assembly]]\nmode = 3\n").unwrap();
        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_whitelist_namespaces() {
        let cfg = parse(
            r#"
            [[assembly]]
            name = "Core"
            namespaces = [{ name = "Acme", recursive = false }, { name = "Acme.Io", recursive = true }]
            "#,
        );
        let sel = Selection::from_config(&cfg).unwrap();
        assert!(sel.includes(&ty("Core", "Acme", "Foo")));
        assert!(!sel.includes(&ty("Core", "Acme.Util", "Foo")));
        assert!(sel.includes(&ty("Core", "Acme.Io.Pipes", "Pipe")));
        assert!(!sel.includes(&ty("Core", "Acme.Iox", "Foo")));
        assert!(!sel.includes(&ty("Other", "Acme", "Foo")), "unlisted assembly");
    }

    #[test]
    fn test_blacklist_types_with_wildcards() {
        let cfg = parse(
            r#"
            [[assembly]]
            name = "Core"
            mode = "blacklist"
            types = ["Acme.*Helper", "Acme.Box`1"]
            "#,
        );
        let sel = Selection::from_config(&cfg).unwrap();
        assert!(sel.includes(&ty("Core", "Acme", "Foo")));
        assert!(!sel.includes(&ty("Core", "Acme", "StringHelper")));
        assert!(!sel.includes(&ty("Core", "Acme", "Box`1")));
    }

    #[test]
    fn test_obsolete_types_follow_flag() {
        let mut t = ty("Core", "Acme", "Old");
        t.attributes = serde_json::from_value(json!([
            {"attribute_type": {"kind": "named", "namespace": "System", "name": "ObsoleteAttribute"}}
        ]))
        .unwrap();
        assert!(!Selection::all().includes(&t));
        assert!(Selection::all().include_obsolete(true).includes(&t));
    }
}
