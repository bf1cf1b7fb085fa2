//! JSON type-library provider.
//!
//! A library document looks like:
//!
//! ```json
//! { "assembly": "Acme.Core",
//!   "types": [ { "namespace": "Acme", "name": "Widget", "kind": "class",
//!                "members": [ { "member": "constructor" } ] } ] }
//! ```
//!
//! Libraries are loaded by path or by assembly name from a directory of
//! `<assembly>.json` files. Dropping the provider releases everything it
//! loaded.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::descriptor::{TypeDescriptor, TypeLibrary};
use super::MetadataProvider;
use crate::error::{IfacegenError, IfacegenResult, IoResultExt};

/// Directories skipped when scanning for library documents.
const EXCLUDED_DIRS: &[&str] = &["target", ".git", "node_modules", "bin", "obj"];

/// In-memory index over one or more loaded type libraries.
#[derive(Debug, Default)]
pub struct JsonTypeLibrary {
    assemblies: Vec<String>,
    types: Vec<TypeDescriptor>,
    index: HashMap<String, usize>,
}

impl JsonTypeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a provider from already-parsed types of one assembly.
    pub fn from_types(
        assembly: impl Into<String>,
        types: Vec<TypeDescriptor>,
    ) -> IfacegenResult<Self> {
        let mut lib = Self::new();
        lib.add_library(TypeLibrary {
            assembly: assembly.into(),
            types,
        })?;
        Ok(lib)
    }

    /// Loads a single library document.
    pub fn load_path(path: &Path) -> IfacegenResult<Self> {
        let mut lib = Self::new();
        lib.add_path(path)?;
        Ok(lib)
    }

    /// Loads `<assembly>.json` from anywhere under `dir`.
    pub fn load_by_name(dir: &Path, assembly: &str) -> IfacegenResult<Self> {
        let wanted = format!("{}.json", assembly);
        let path = gather_library_files(dir)?
            .into_iter()
            .find(|p| p.file_name().is_some_and(|n| n.to_string_lossy() == wanted))
            .ok_or_else(|| {
                IfacegenError::invalid_argument(format!(
                    "no type library named '{}' under {}",
                    assembly,
                    dir.display()
                ))
            })?;
        Self::load_path(&path)
    }

    /// Parses and adds a library document from disk.
    pub fn add_path(&mut self, path: &Path) -> IfacegenResult<()> {
        let text = fs::read_to_string(path).with_path(path)?;
        let library: TypeLibrary = serde_json::from_str(&text).map_err(|e| IfacegenError::Io {
            path: path.to_path_buf(),
            message: format!("invalid type library: {}", e),
            source: None,
        })?;
        debug!(path = %path.display(), assembly = %library.assembly, "loaded type library");
        self.add_library(library)
    }

    /// Adds a parsed library. A type defined twice is rejected.
    pub fn add_library(&mut self, library: TypeLibrary) -> IfacegenResult<()> {
        let TypeLibrary { assembly, types } = library;
        for mut ty in types {
            ty.assembly = assembly.clone();
            let name = ty.full_name();
            if self.index.contains_key(&name) {
                return Err(IfacegenError::metadata(
                    name,
                    format!("defined more than once (last seen in {})", assembly),
                ));
            }
            self.index.insert(name, self.types.len());
            self.types.push(ty);
        }
        if !self.assemblies.contains(&assembly) {
            self.assemblies.push(assembly);
        }
        Ok(())
    }

    pub fn assemblies(&self) -> &[String] {
        &self.assemblies
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl MetadataProvider for JsonTypeLibrary {
    fn type_by_name(&self, full_name: &str) -> Option<&TypeDescriptor> {
        self.index.get(full_name).map(|&i| &self.types[i])
    }

    fn types(&self) -> Vec<&TypeDescriptor> {
        self.types.iter().collect()
    }
}

/// Gathers all `.json` library documents under `root`, sorted by path.
///
/// A file path is returned as-is.
pub fn gather_library_files(root: &Path) -> IfacegenResult<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
        !(e.file_type().is_dir()
            && e.depth() > 0
            && e.file_name()
                .to_str()
                .is_some_and(|name| EXCLUDED_DIRS.contains(&name)))
    });
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            IfacegenError::Io {
                path,
                message: e.to_string(),
                source: None,
            }
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
