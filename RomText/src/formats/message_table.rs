//! Standalone message-table files (`msgdata.bin` as extracted to disk)
//!
//! A simpler sibling of the nested table: every row holds exactly one
//! string, addressed through an offset array at table + 20. Strings are kept
//! as stored, without the normalization applied to archive records.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::bytes::{offset_from, read_u16, read_u32};
use super::text::read_cstring_raw;
use crate::error::{Error, Result};

const ROW_TABLE: usize = 20;

/// Decoded message table: `sections[section][table][row]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageTableSet {
    pub sections: Vec<Vec<Vec<String>>>,
}

impl MessageTableSet {
    /// Rows of one table, empty if it does not exist
    #[must_use]
    pub fn rows(&self, section: usize, table: usize) -> &[String] {
        self.sections
            .get(section)
            .and_then(|tables| tables.get(table))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Read a message-table file from disk
///
/// # Errors
///
/// Returns [`Error::Resource`] if the file cannot be read, or an integrity
/// error if its offsets are inconsistent.
pub fn read_message_table<P: AsRef<Path>>(path: P) -> Result<MessageTableSet> {
    let path = path.as_ref();
    let mut buffer = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut buffer))
        .map_err(|e| Error::resource(path, e))?;
    parse_message_table_bytes(&buffer)
}

/// Parse message-table data from bytes
pub fn parse_message_table_bytes(data: &[u8]) -> Result<MessageTableSet> {
    let section_count = read_u32(data, 0, "section count")? as usize;
    let mut sections = Vec::with_capacity(section_count.min(64));

    for section_index in 0..section_count {
        let section_start = read_u32(data, 4 + section_index * 8, "section offset")? as usize;
        let table_count = read_u32(data, section_start, "table count")? as usize;

        let mut tables = Vec::with_capacity(table_count.min(1024));
        for table_index in 0..table_count {
            let relative = read_u32(data, section_start + 4 + table_index * 8, "table offset")?;
            let table_start = offset_from(section_start, relative, "table offset", data.len())?;
            let row_count = read_u16(data, table_start + 8, "row count")? as usize;
            let rows_start = table_start + ROW_TABLE;

            let mut rows = Vec::with_capacity(row_count);
            for row in 0..row_count {
                let text_relative = read_u32(data, rows_start + row * 4, "row offset")?;
                let text_offset = offset_from(rows_start, text_relative, "row string", data.len())?;
                rows.push(read_cstring_raw(data, text_offset, "row string")?);
            }
            tables.push(rows);
        }
        sections.push(tables);
    }

    Ok(MessageTableSet { sections })
}
