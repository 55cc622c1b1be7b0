use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::PatchDocument;
use crate::catalog::ModuleCatalog;
use crate::patch::error::PatchError;
use crate::patch::{assemble_document, parse_records};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("patch failed to parse: {0}")]
    Patch(#[from] PatchError),
}

/// Decode one patch export.
///
/// # Examples
/// ```
/// use zoia_core::{ModuleCatalog, PatchError, decode_patch};
///
/// let catalog = ModuleCatalog::default();
/// let err = decode_patch(&[], &catalog).unwrap_err();
/// assert!(matches!(err, PatchError::EmptyInput));
/// ```
///
/// # Errors
/// Returns `PatchError` when the buffer cannot be decoded; no partial
/// document is produced.
pub fn decode_patch(buffer: &[u8], catalog: &ModuleCatalog) -> Result<PatchDocument, PatchError> {
    let records = parse_records(buffer, catalog)?;
    let document = assemble_document(records, catalog)?;
    tracing::debug!(
        name = %document.name,
        modules = document.meta.n_modules,
        cpu = document.meta.cpu,
        "patch decoded"
    );
    Ok(document)
}

/// Read a patch file and decode it.
pub fn decode_patch_file(path: &Path, catalog: &ModuleCatalog) -> Result<PatchDocument, DecodeError> {
    let buffer = fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = buffer.len(), "read patch file");
    Ok(decode_patch(&buffer, catalog)?)
}
