use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors returned by patch decoding.
///
/// Every variant is terminal for the decode call: no partial document is
/// ever produced.
///
/// # Examples
/// ```
/// use zoia_core::PatchError;
///
/// let err = PatchError::TruncatedBuffer { offset: 8, needed: 4, actual: 10 };
/// assert!(err.to_string().contains("truncated"));
/// ```
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("empty patch buffer")]
    EmptyInput,
    #[error("patch length {len} is not a multiple of 4 bytes")]
    MisalignedLength { len: usize },
    #[error("buffer truncated: need {needed} bytes at offset {offset}, buffer has {actual}")]
    TruncatedBuffer {
        offset: usize,
        needed: usize,
        actual: usize,
    },
    #[error("invalid {field} count: {value}")]
    InvalidCount { field: &'static str, value: i32 },
    #[error("unknown module type: {type_id}")]
    UnknownModuleType { type_id: i32 },
    #[error("module {module} blocks overflow the grid: start {start}, {blocks} blocks")]
    BlockRangeOverflow { module: usize, start: i32, blocks: u32 },
    #[error("module {module} record is {size} words, need at least {minimum}")]
    MalformedRecord {
        module: usize,
        size: i32,
        minimum: usize,
    },
    #[error("module {module} ran out of option selectors at option '{option}'")]
    OptionSelectorExhausted { module: usize, option: String },
    #[error("module {module} option '{option}' selector {selector} is out of range ({choices} choices)")]
    OptionValueOutOfRange {
        module: usize,
        option: String,
        selector: u8,
        choices: usize,
    },
    #[error("unknown color index {index} for module {module}")]
    UnknownColorIndex { module: usize, index: i32 },
    #[error("{context} references module {index}, patch has {modules} modules")]
    DanglingModuleReference {
        context: &'static str,
        index: i32,
        modules: usize,
    },
    #[error("module {module} ({module_type}) is missing option '{option}'")]
    MissingIoOption {
        module: usize,
        module_type: String,
        option: &'static str,
    },
    #[error("module catalog error: {0}")]
    Catalog(String),
}

impl From<CatalogError> for PatchError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::UnknownModuleType { type_id } => PatchError::UnknownModuleType { type_id },
            other => PatchError::Catalog(other.to_string()),
        }
    }
}
