use indexmap::IndexMap;

use super::color::color_name;
use super::error::PatchError;
use super::layout;
use super::links::{attach_connections, attach_starred};
use super::parser::{ModuleRecord, PatchRecords};
use crate::catalog::ModuleCatalog;
use crate::io_summary::summarize_io;
use crate::{Module, PatchDocument, PatchMeta};

/// Build the output document from parsed records.
pub fn assemble_document(
    records: PatchRecords,
    catalog: &ModuleCatalog,
) -> Result<PatchDocument, PatchError> {
    let PatchRecords {
        name,
        modules: module_records,
        connections,
        pages,
        starred,
        color_indices,
    } = records;

    let mut modules = module_records
        .into_iter()
        .zip(color_indices)
        .map(|(record, color)| build_module(record, color, catalog))
        .collect::<Result<Vec<_>, _>>()?;

    attach_connections(&mut modules, &connections)?;
    attach_starred(&mut modules, &starred)?;

    let n_pages = pages.len();
    let mut page_names: Vec<String> = pages.into_iter().map(|page| page.name).collect();
    page_names.resize(layout::PAGE_SLOTS, String::new());

    let cpu = round_cents(modules.iter().map(|module| module.cpu).sum());
    let i_o = summarize_io(&modules)?;

    let meta = PatchMeta {
        name: name.clone(),
        cpu,
        n_modules: modules.len(),
        n_connections: connections.len(),
        n_pages,
        n_starred: starred.len(),
        i_o,
    };

    Ok(PatchDocument {
        name,
        modules,
        pages: page_names,
        meta,
    })
}

fn build_module(
    record: ModuleRecord,
    color: i32,
    catalog: &ModuleCatalog,
) -> Result<Module, PatchError> {
    let spec = catalog.lookup(record.type_id)?;
    let position = spec
        .default_positions(record.block_start)
        .ok_or(PatchError::BlockRangeOverflow {
            module: record.index,
            start: record.block_start,
            blocks: spec.default_blocks,
        })?;
    // The embedded field must be a palette id even when the trailing table wins.
    color_name(record.index, record.embedded_color)?;
    let parameters: IndexMap<String, i32> = record
        .parameters
        .iter()
        .enumerate()
        .map(|(i, value)| (format!("param_{i}"), *value))
        .collect();

    Ok(Module {
        number: record.index,
        mod_idx: record.type_id,
        name: record.name,
        cpu: spec.cpu,
        module_type: spec.name.clone(),
        page: record.page,
        position,
        blocks: spec.blocks.clone(),
        options: record.options,
        parameters,
        connections: Vec::new(),
        starred: Vec::new(),
        color: color_name(record.index, color)?.to_string(),
    })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
