use thiserror::Error;

/// Errors returned while loading or querying the module catalog.
///
/// # Examples
/// ```
/// use zoia_core::CatalogError;
///
/// let err = CatalogError::UnknownModuleType { type_id: 999 };
/// assert!(err.to_string().contains("unknown module type"));
/// ```
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("module index JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid module type id key: {key:?}")]
    InvalidTypeId { key: String },
    #[error("unknown module type: {type_id}")]
    UnknownModuleType { type_id: i32 },
}
