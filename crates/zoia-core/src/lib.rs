//! ZOIA core library for offline patch inspection.
//!
//! This crate decodes the binary patch exports written by the ZOIA modular
//! pedal into a deterministic, serializable document: module records, the
//! connections between them, page names, starred parameters and aggregate
//! metadata. The decoder follows a layered structure (layout/reader/parser)
//! so that offset arithmetic stays in one place and the parser reads like the
//! format description.
//!
//! The per-module-type metadata table (`ModuleCatalog`) is configuration
//! data loaded once and injected into every decode call. Decoding itself is
//! pure: a byte buffer in, a `PatchDocument` or a `PatchError` out.
//!
//! Invariants:
//! - `modules.len()` always equals the module count declared in the header.
//! - `pages` always holds exactly `PAGE_SLOTS` entries.
//! - Each module color comes from exactly one color source (trailing table
//!   or embedded field), never a mix of both.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use zoia_core::{ModuleCatalog, decode_patch_file};
//!
//! let catalog = ModuleCatalog::from_path(Path::new("ModuleIndex.json"))?;
//! let document = decode_patch_file(Path::new("000_zoia_Init.bin"), &catalog)?;
//! println!("{} modules", document.meta.n_modules);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod catalog;
mod decode;
mod io_summary;
mod patch;

pub use catalog::{BlockPosition, BlockSpec, CatalogError, ModuleCatalog, ModuleSpec};
pub use decode::{DecodeError, decode_patch, decode_patch_file};
pub use io_summary::summarize_io;
pub use patch::error::PatchError;
pub use patch::layout::{PAGE_SLOTS, PALETTE};
pub use patch::parser::{
    ConnectionRecord, ModuleRecord, PageRecord, PatchRecords, StarredParam, parse_records,
};
pub use patch::reader::{read_fixed_string, read_int16_pair, read_int32_sequence};

/// Fully decoded patch, ready for display or JSON export.
///
/// # Examples
/// ```
/// use zoia_core::{IoSummary, PatchDocument, PatchMeta};
///
/// let document = PatchDocument {
///     name: "Init".to_string(),
///     modules: Vec::new(),
///     pages: vec![String::new(); zoia_core::PAGE_SLOTS],
///     meta: PatchMeta {
///         name: "Init".to_string(),
///         cpu: 0.0,
///         n_modules: 0,
///         n_connections: 0,
///         n_pages: 0,
///         n_starred: 0,
///         i_o: IoSummary::default(),
///     },
/// };
/// assert_eq!(document.pages.len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchDocument {
    /// Patch name from the header.
    pub name: String,
    /// Modules in record order; `modules[i].number == i`.
    pub modules: Vec<Module>,
    /// Page names, padded with empty strings to `PAGE_SLOTS` entries.
    pub pages: Vec<String>,
    /// Aggregate metadata.
    pub meta: PatchMeta,
}

/// One decoded module instance.
///
/// # Examples
/// ```
/// use indexmap::IndexMap;
/// use zoia_core::Module;
///
/// let module = Module {
///     number: 0,
///     mod_idx: 5,
///     name: "LFO".to_string(),
///     cpu: 0.9,
///     module_type: "LFO".to_string(),
///     page: 0,
///     position: vec![0, 1],
///     blocks: IndexMap::new(),
///     options: IndexMap::new(),
///     parameters: IndexMap::new(),
///     connections: Vec::new(),
///     starred: Vec::new(),
///     color: "Blue".to_string(),
/// };
/// assert_eq!(module.position.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Index of the module within the patch.
    pub number: usize,
    /// Module type id (key into the module catalog).
    pub mod_idx: i32,
    /// User-assigned name; empty when the module was never renamed.
    pub name: String,
    /// Estimated CPU cost from the catalog.
    pub cpu: f64,
    /// Display name of the module type.
    #[serde(rename = "type")]
    pub module_type: String,
    /// Page the module sits on.
    pub page: i32,
    /// Grid positions occupied by the module's default blocks.
    pub position: Vec<i32>,
    /// Block map of the module type, in catalog order.
    pub blocks: IndexMap<String, BlockSpec>,
    /// Active option values, in schema order.
    pub options: IndexMap<String, Value>,
    /// Raw parameter values keyed `param_<index>`.
    pub parameters: IndexMap<String, i32>,
    /// Outgoing connections, formatted `Src.block -> Dst.block: strength`.
    pub connections: Vec<String>,
    /// Starred parameters, formatted `Module.block CC <cc>`.
    pub starred: Vec<String>,
    /// Palette color name.
    pub color: String,
}

/// Aggregate patch metadata.
///
/// # Examples
/// ```
/// use zoia_core::{IoSummary, PatchMeta};
///
/// let meta = PatchMeta {
///     name: "Init".to_string(),
///     cpu: 1.25,
///     n_modules: 2,
///     n_connections: 1,
///     n_pages: 1,
///     n_starred: 0,
///     i_o: IoSummary::default(),
/// };
/// assert_eq!(meta.n_modules, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchMeta {
    pub name: String,
    /// Sum of module CPU costs, rounded to two decimals.
    pub cpu: f64,
    pub n_modules: usize,
    pub n_connections: usize,
    /// Number of pages actually stored in the patch (before padding).
    pub n_pages: usize,
    pub n_starred: usize,
    pub i_o: IoSummary,
}

/// Quick-view of the patch's audio and MIDI interface.
///
/// Every field serializes as `null` when no matching module exists.
///
/// # Examples
/// ```
/// use zoia_core::{IoSummary, IoValue};
///
/// let summary = IoSummary {
///     inputs: Some(IoValue::from("Stereo")),
///     ..IoSummary::default()
/// };
/// let json = serde_json::to_value(&summary).unwrap();
/// assert_eq!(json["inputs"], "Stereo");
/// assert!(json["outputs"].is_null());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IoSummary {
    pub inputs: Option<IoValue>,
    pub outputs: Option<IoValue>,
    pub midi_channel: Option<IoValue>,
    pub stompswitches: Option<IoValue>,
}

/// A single I/O value or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IoValue {
    Many(Vec<Value>),
    One(Value),
}

impl From<&str> for IoValue {
    fn from(value: &str) -> Self {
        IoValue::One(Value::String(value.to_string()))
    }
}

impl From<String> for IoValue {
    fn from(value: String) -> Self {
        IoValue::One(Value::String(value))
    }
}
