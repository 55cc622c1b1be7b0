//! ZOIA patch binary decoding.
//!
//! The decoder follows a layered structure:
//! - `layout`: word and byte offsets (source of truth)
//! - `reader`: bounds-checked byte access and the word cursor
//! - `parser`: record walk (header, modules, connections, pages, starred)
//! - `color`, `links`: cross-record resolution
//! - `assemble`: output document construction
//! - `error`: explicit, actionable errors
//!
//! Everything here is pure and contains no I/O.

pub mod assemble;
pub mod color;
pub mod error;
pub mod layout;
pub mod links;
pub mod parser;
pub mod reader;

pub use assemble::assemble_document;
pub use parser::parse_records;
