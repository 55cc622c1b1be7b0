//! Connection and starred-parameter descriptions.
//!
//! Both record kinds reference modules by index and blocks by grid position.
//! They are rendered as display strings and attached to the module they
//! belong to: connections to their source module, starred parameters to the
//! module that owns the parameter.

use super::error::PatchError;
use super::parser::{ConnectionRecord, StarredParam};
use crate::Module;
use crate::catalog::block_name;

/// Name shown for a module: its user name, or its type when unnamed.
pub fn display_name(module: &Module) -> &str {
    if module.name.is_empty() {
        &module.module_type
    } else {
        &module.name
    }
}

fn resolve(modules: &[Module], index: i32, context: &'static str) -> Result<usize, PatchError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < modules.len())
        .ok_or(PatchError::DanglingModuleReference {
            context,
            index,
            modules: modules.len(),
        })
}

/// Format a connection as `Src.block -> Dst.block: strength`.
pub fn describe_connection(
    modules: &[Module],
    connection: &ConnectionRecord,
) -> Result<(usize, String), PatchError> {
    let source = resolve(modules, connection.source_module, "connection source")?;
    let dest = resolve(modules, connection.dest_module, "connection destination")?;
    let line = format!(
        "{}.{} -> {}.{}: {}",
        display_name(&modules[source]),
        block_name(&modules[source].blocks, connection.source_block),
        display_name(&modules[dest]),
        block_name(&modules[dest].blocks, connection.dest_block),
        connection.strength
    );
    Ok((source, line))
}

/// Format a starred parameter as `Module.block CC <cc>`.
pub fn describe_starred(
    modules: &[Module],
    starred: &StarredParam,
) -> Result<(usize, String), PatchError> {
    let owner = resolve(modules, starred.module, "starred parameter")?;
    let cc = match starred.midi_cc {
        Some(cc) => cc.to_string(),
        None => "none".to_string(),
    };
    let line = format!(
        "{}.{} CC {}",
        display_name(&modules[owner]),
        block_name(&modules[owner].blocks, starred.block),
        cc
    );
    Ok((owner, line))
}

pub fn attach_connections(
    modules: &mut [Module],
    connections: &[ConnectionRecord],
) -> Result<(), PatchError> {
    for connection in connections {
        let (source, line) = describe_connection(modules, connection)?;
        modules[source].connections.push(line);
    }
    Ok(())
}

pub fn attach_starred(modules: &mut [Module], starred: &[StarredParam]) -> Result<(), PatchError> {
    for param in starred {
        let (owner, line) = describe_starred(modules, param)?;
        modules[owner].starred.push(line);
    }
    Ok(())
}
