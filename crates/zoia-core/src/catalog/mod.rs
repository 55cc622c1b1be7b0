//! Module metadata table.
//!
//! The ZOIA firmware identifies module types by integer id only; names, CPU
//! costs, block layouts and option schemas come from an external, versioned
//! JSON descriptor keyed by the stringified type id. The catalog is loaded
//! once and is read-only afterwards, so a single instance can be shared by
//! reference across any number of decode calls.

mod error;
mod spec;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub use error::CatalogError;
pub use spec::{BlockPosition, BlockSpec, ModuleSpec, block_name};

/// Read-only mapping from module type id to its metadata.
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    entries: HashMap<i32, ModuleSpec>,
}

impl ModuleCatalog {
    /// Build a catalog from already-parsed entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (i32, ModuleSpec)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Parse a descriptor from a JSON string.
    ///
    /// # Examples
    /// ```
    /// use zoia_core::ModuleCatalog;
    ///
    /// let catalog = ModuleCatalog::from_json_str(
    ///     r#"{"5": {"name": "LFO", "cpu": 0.9, "default_blocks": 2}}"#,
    /// ).unwrap();
    /// assert_eq!(catalog.lookup(5).unwrap().name, "LFO");
    /// ```
    ///
    /// # Errors
    /// Returns `CatalogError::Json` for malformed JSON and
    /// `CatalogError::InvalidTypeId` when a key is not an integer.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: HashMap<String, ModuleSpec> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Parse a descriptor from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let raw: HashMap<String, ModuleSpec> = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    /// Load a descriptor file from disk.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        let catalog = Self::from_reader(BufReader::new(file))?;
        tracing::debug!(
            path = %path.display(),
            entries = catalog.len(),
            "loaded module index"
        );
        Ok(catalog)
    }

    fn from_raw(raw: HashMap<String, ModuleSpec>) -> Result<Self, CatalogError> {
        let mut entries = HashMap::with_capacity(raw.len());
        for (key, spec) in raw {
            let type_id = key
                .trim()
                .parse::<i32>()
                .map_err(|_| CatalogError::InvalidTypeId { key: key.clone() })?;
            entries.insert(type_id, spec);
        }
        Ok(Self { entries })
    }

    /// Look up the metadata of a module type.
    ///
    /// # Errors
    /// Returns `CatalogError::UnknownModuleType` when the id is absent.
    pub fn lookup(&self, type_id: i32) -> Result<&ModuleSpec, CatalogError> {
        self.entries
            .get(&type_id)
            .ok_or(CatalogError::UnknownModuleType { type_id })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Known type ids in ascending order.
    pub fn type_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
