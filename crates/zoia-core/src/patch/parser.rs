use indexmap::IndexMap;
use serde_json::Value;

use super::color::{ColorSource, select_color_source};
use super::error::PatchError;
use super::layout;
use super::reader::{PatchReader, WordCursor, word_at};
use crate::catalog::{ModuleCatalog, ModuleSpec};

/// Flat records read from a patch, before cross-referencing.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchRecords {
    pub name: String,
    pub modules: Vec<ModuleRecord>,
    pub connections: Vec<ConnectionRecord>,
    pub pages: Vec<PageRecord>,
    pub starred: Vec<StarredParam>,
    /// Final palette index per module, from whichever color source won.
    pub color_indices: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRecord {
    pub index: usize,
    pub type_id: i32,
    pub size_words: usize,
    pub name: String,
    pub page: i32,
    /// Color field stored in the record itself.
    pub embedded_color: i32,
    pub block_start: i32,
    pub option_selectors: [u8; 8],
    /// Active option values, in schema order.
    pub options: IndexMap<String, Value>,
    pub parameters: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub source_module: i32,
    pub source_block: i32,
    pub dest_module: i32,
    pub dest_block: i32,
    /// Mix level, 0..=100.
    pub strength: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarredParam {
    pub module: i32,
    pub block: i32,
    pub midi_cc: Option<i32>,
}

impl StarredParam {
    /// Unpack a starred entry from its module index and raw block field.
    ///
    /// # Examples
    /// ```
    /// use zoia_core::StarredParam;
    ///
    /// let mapped = StarredParam::from_raw(0, 130);
    /// assert_eq!((mapped.block, mapped.midi_cc), (2, Some(0)));
    ///
    /// let plain = StarredParam::from_raw(0, 5);
    /// assert_eq!((plain.block, plain.midi_cc), (5, None));
    /// ```
    pub fn from_raw(module: i16, raw_block: i16) -> Self {
        let raw = i32::from(raw_block);
        let midi_cc = (raw >= layout::STARRED_BLOCK_MODULUS).then(|| {
            (f64::from(raw) / f64::from(layout::STARRED_BLOCK_MODULUS)).round_ties_even() as i32 - 1
        });
        Self {
            module: i32::from(module),
            block: raw.rem_euclid(layout::STARRED_BLOCK_MODULUS),
            midi_cc,
        }
    }
}

/// Walk a patch buffer and collect its flat records.
///
/// Module types are resolved against `catalog` while walking, so an unknown
/// type or an option selector mismatch stops the walk immediately.
///
/// # Errors
/// Returns `PatchError` for empty, misaligned or truncated buffers, unknown
/// module types, malformed records and option selector mismatches.
pub fn parse_records(buffer: &[u8], catalog: &ModuleCatalog) -> Result<PatchRecords, PatchError> {
    if buffer.is_empty() {
        return Err(PatchError::EmptyInput);
    }
    let reader = PatchReader::new(buffer);
    let words = reader.words()?;

    let name = reader.read_fixed_string(layout::PATCH_NAME_RANGE.start, layout::NAME_LEN)?;
    let declared = word_at(&words, layout::MODULE_COUNT_WORD)?;
    let module_count = usize::try_from(declared).map_err(|_| PatchError::InvalidCount {
        field: "module",
        value: declared,
    })?;
    tracing::debug!(%name, module_count, bytes = buffer.len(), "decoding patch");

    let color_source = select_color_source(&words, module_count);

    let mut cursor = WordCursor::new(&words, layout::FIRST_MODULE_WORD);
    let mut modules = Vec::with_capacity(module_count.min(words.len()));
    for index in 0..module_count {
        modules.push(parse_module(&reader, &mut cursor, index, catalog)?);
    }
    tracing::trace!(word = cursor.position(), "module records end");

    let connections = parse_connections(&mut cursor)?;
    let pages = parse_pages(&reader, &mut cursor)?;
    let starred = parse_starred(&reader, &mut cursor)?;

    let color_indices = modules
        .iter()
        .map(|module| color_source.index_for(module.index, module.embedded_color))
        .collect();
    let trailing_colors = matches!(color_source, ColorSource::Trailing(_));
    tracing::debug!(
        connections = connections.len(),
        pages = pages.len(),
        starred = starred.len(),
        trailing_colors,
        "patch records parsed"
    );

    Ok(PatchRecords {
        name,
        modules,
        connections,
        pages,
        starred,
        color_indices,
    })
}

fn parse_module(
    reader: &PatchReader<'_>,
    cursor: &mut WordCursor<'_>,
    index: usize,
    catalog: &ModuleCatalog,
) -> Result<ModuleRecord, PatchError> {
    let size = cursor.peek(layout::RECORD_SIZE_WORD)?;
    let size_words = usize::try_from(size)
        .ok()
        .filter(|&words| words >= layout::MIN_RECORD_WORDS)
        .ok_or(PatchError::MalformedRecord {
            module: index,
            size,
            minimum: layout::MIN_RECORD_WORDS,
        })?;

    let type_id = cursor.peek(layout::RECORD_TYPE_WORD)?;
    let spec = catalog.lookup(type_id)?;

    let name_offset = cursor.byte_offset(size_words - layout::RECORD_NAME_TAIL_WORDS);
    let name = reader.read_fixed_string(name_offset, layout::NAME_LEN)?;

    let declared_params = cursor.peek(layout::RECORD_PARAM_COUNT_WORD)?;
    let param_count = usize::try_from(declared_params).map_err(|_| PatchError::InvalidCount {
        field: "parameter",
        value: declared_params,
    })?;
    let parameters = (0..param_count)
        .map(|i| cursor.peek(layout::RECORD_PARAMS_WORD + i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut option_selectors = [0u8; 8];
    for (chunk, word) in option_selectors
        .chunks_exact_mut(layout::WORD_SIZE)
        .zip(layout::RECORD_OPTION_WORDS)
    {
        let start = cursor.byte_offset(word);
        chunk.copy_from_slice(reader.read_slice(start..start + layout::WORD_SIZE)?);
    }
    let options = resolve_options(index, spec, &option_selectors)?;

    let record = ModuleRecord {
        index,
        type_id,
        size_words,
        name,
        page: cursor.peek(layout::RECORD_PAGE_WORD)?,
        embedded_color: cursor.peek(layout::RECORD_OLD_COLOR_WORD)?,
        block_start: cursor.peek(layout::RECORD_BLOCK_START_WORD)?,
        option_selectors,
        options,
        parameters,
    };
    tracing::trace!(
        index,
        type_id,
        size_words,
        module_type = %spec.name,
        "module record"
    );
    cursor.advance(size_words);
    Ok(record)
}

/// Pick the active value of each option in schema order.
///
/// Options with an empty value list take no selector; every other option
/// consumes the next selector byte.
pub fn resolve_options(
    module: usize,
    spec: &ModuleSpec,
    selectors: &[u8],
) -> Result<IndexMap<String, Value>, PatchError> {
    let mut remaining = selectors.iter().copied();
    let mut options = IndexMap::new();
    for (option, choices) in &spec.options {
        if option.is_empty() || choices.is_empty() {
            continue;
        }
        let selector = remaining
            .next()
            .ok_or_else(|| PatchError::OptionSelectorExhausted {
                module,
                option: option.clone(),
            })?;
        let value = choices
            .get(usize::from(selector))
            .ok_or_else(|| PatchError::OptionValueOutOfRange {
                module,
                option: option.clone(),
                selector,
                choices: choices.len(),
            })?;
        options.insert(option.clone(), value.clone());
    }
    Ok(options)
}

fn parse_connections(cursor: &mut WordCursor<'_>) -> Result<Vec<ConnectionRecord>, PatchError> {
    let count = cursor.read_count("connection")?;
    let mut connections = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        connections.push(ConnectionRecord {
            source_module: cursor.read_word()?,
            source_block: cursor.read_word()?,
            dest_module: cursor.read_word()?,
            dest_block: cursor.read_word()?,
            strength: cursor.read_word()? / layout::STRENGTH_SCALE,
        });
    }
    Ok(connections)
}

fn parse_pages(
    reader: &PatchReader<'_>,
    cursor: &mut WordCursor<'_>,
) -> Result<Vec<PageRecord>, PatchError> {
    let count = cursor.read_count("page")?;
    let mut pages = Vec::with_capacity(count.min(layout::PAGE_SLOTS));
    for index in 0..count {
        let name = reader.read_fixed_string(cursor.byte_offset(0), layout::NAME_LEN)?;
        pages.push(PageRecord { index, name });
        cursor.advance(layout::PAGE_WORDS);
    }
    Ok(pages)
}

fn parse_starred(
    reader: &PatchReader<'_>,
    cursor: &mut WordCursor<'_>,
) -> Result<Vec<StarredParam>, PatchError> {
    let count = cursor.read_count("starred")?;
    let mut starred = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let (module, raw_block) = reader.read_i16_pair(cursor.byte_offset(0))?;
        starred.push(StarredParam::from_raw(module, raw_block));
        cursor.advance(1);
    }
    Ok(starred)
}
