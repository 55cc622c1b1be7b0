//! Module color resolution.
//!
//! Older firmware stores each module's color inside its record. Newer
//! firmware appends a table of palette indices, one per module, ending at the
//! last non-zero word of the file. The trailing table wins when it is
//! present and valid; otherwise every module falls back to its embedded
//! field. The two sources are never mixed.

use super::error::PatchError;
use super::layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSource<'w> {
    /// Palette indices from the trailing table, one per module.
    Trailing(&'w [i32]),
    /// Each record's own color field.
    Embedded,
}

/// Pick the color source for a patch with `module_count` modules.
pub fn select_color_source(words: &[i32], module_count: usize) -> ColorSource<'_> {
    let Some(last_nonzero) = words.iter().rposition(|&word| word != 0) else {
        return if module_count == 0 {
            ColorSource::Trailing(&[])
        } else {
            ColorSource::Embedded
        };
    };
    let end = last_nonzero + 1;
    let Some(start) = end.checked_sub(module_count) else {
        tracing::debug!(module_count, end, "trailing color table does not fit");
        return ColorSource::Embedded;
    };

    let table = &words[start..end];
    if let Some(invalid) = table.iter().find(|&&index| index > layout::MAX_PALETTE_INDEX) {
        tracing::debug!(invalid, "trailing color table rejected, using embedded colors");
        return ColorSource::Embedded;
    }
    ColorSource::Trailing(table)
}

impl ColorSource<'_> {
    /// Palette index for `module`, given the record's embedded field.
    pub fn index_for(&self, module: usize, embedded: i32) -> i32 {
        match self {
            ColorSource::Trailing(table) => table.get(module).copied().unwrap_or(embedded),
            ColorSource::Embedded => embedded,
        }
    }
}

/// Palette name of a color index.
///
/// # Errors
/// Returns `PatchError::UnknownColorIndex` for ids outside 1..=15.
pub fn color_name(module: usize, index: i32) -> Result<&'static str, PatchError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| layout::PALETTE.get(i))
        .copied()
        .ok_or(PatchError::UnknownColorIndex { module, index })
}
