//! Nested string-table records (section → table → row → cell)
//!
//! Layout:
//!
//! ```text
//! record   u32 section_count, then { u32 section_offset, u32 section_size } * section_count
//! section  u32 table_count,   then { u32 table_offset (section-relative), u32 table_size } * table_count
//! table    +8  u16 row_count
//!          +10 u16 row_stride (bytes)
//!          +12 u16 row_body   (table-relative)
//!          +16 u8  null_flag * (row_stride / 4)   // zero = cell present
//! row body i32 cell_offset * (row_stride / 4) per row, -1 = empty string,
//!          otherwise a row-body-relative offset to a null-terminated string
//! ```
//!
//! In the shipped tables each section holds one locale.

use std::ops::Range;

use super::bytes::{offset_from, read_i32, read_u16, read_u32, read_u8};
use super::text::read_cstring;
use crate::error::Result;

/// Which cells of a table's rows are stored
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresenceMask {
    bits: Vec<u64>,
    columns: usize,
}

impl PresenceMask {
    /// Empty mask spanning `columns` cells, all absent
    #[must_use]
    pub fn new(columns: usize) -> Self {
        Self {
            bits: vec![0; columns.div_ceil(64)],
            columns,
        }
    }

    pub fn set_present(&mut self, column: usize) {
        if column < self.columns {
            self.bits[column / 64] |= 1 << (column % 64);
        }
    }

    #[must_use]
    pub fn is_present(&self, column: usize) -> bool {
        column < self.columns && self.bits[column / 64] & (1 << (column % 64)) != 0
    }

    /// Total cells per row, present or not
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn present_count(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Indices of the present cells, ascending
    pub fn present_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.columns).filter(|&c| self.is_present(c))
    }
}

/// One table: its presence mask and each row's span in the string pool
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableLayout {
    presence: PresenceMask,
    rows: Vec<Range<usize>>,
}

impl TableLayout {
    #[must_use]
    pub fn presence(&self) -> &PresenceMask {
        &self.presence
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A decoded nested string-table record
///
/// Strings live in one flat pool; each row is a range into it holding only
/// the present cells, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringTableSet {
    pool: Vec<String>,
    sections: Vec<Vec<TableLayout>>,
}

impl StringTableSet {
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of tables in `section`, zero if the section does not exist
    #[must_use]
    pub fn table_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn table(&self, section: usize, table: usize) -> Option<&TableLayout> {
        self.sections.get(section)?.get(table)
    }

    #[must_use]
    pub fn row_count(&self, section: usize, table: usize) -> usize {
        self.table(section, table).map_or(0, TableLayout::row_count)
    }

    #[must_use]
    pub fn presence(&self, section: usize, table: usize) -> Option<&PresenceMask> {
        self.table(section, table).map(TableLayout::presence)
    }

    /// Present cells of one row
    #[must_use]
    pub fn row(&self, section: usize, table: usize, row: usize) -> Option<&[String]> {
        let span = self.table(section, table)?.rows.get(row)?;
        self.pool.get(span.clone())
    }

    /// Total number of decoded cells across all sections
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.pool.len()
    }
}

/// Parse a nested string-table record
///
/// # Errors
///
/// Returns [`Error::OffsetOutOfRange`] if any header field, cell offset or
/// string points outside the record.
///
/// [`Error::OffsetOutOfRange`]: crate::Error::OffsetOutOfRange
pub fn parse_nested_table_bytes(data: &[u8]) -> Result<StringTableSet> {
    let section_count = read_u32(data, 0, "section count")? as usize;
    let mut set = StringTableSet::default();

    for section_index in 0..section_count {
        let section_start = read_u32(data, 4 + section_index * 8, "section offset")? as usize;
        let table_count = read_u32(data, section_start, "table count")? as usize;

        let mut tables = Vec::with_capacity(table_count.min(1024));
        for table_index in 0..table_count {
            let relative = read_u32(data, section_start + 4 + table_index * 8, "table offset")?;
            let table_start = offset_from(section_start, relative, "table offset", data.len())?;
            tables.push(parse_table(data, table_start, &mut set.pool)?);
        }
        set.sections.push(tables);
    }

    Ok(set)
}

fn parse_table(data: &[u8], table_start: usize, pool: &mut Vec<String>) -> Result<TableLayout> {
    let row_count = read_u16(data, table_start + 8, "row count")? as usize;
    let row_stride = read_u16(data, table_start + 10, "row stride")? as usize;
    let row_body = table_start + read_u16(data, table_start + 12, "row body")? as usize;

    let columns = row_stride / 4;
    let mut presence = PresenceMask::new(columns);
    for column in 0..columns {
        if read_u8(data, table_start + 16 + column, "presence flag")? == 0 {
            presence.set_present(column);
        }
    }

    let mut rows = Vec::with_capacity(row_count);
    for row in 0..row_count {
        let start = pool.len();
        for column in presence.present_columns() {
            let cell_offset = read_i32(data, row_body + row * row_stride + column * 4, "cell offset")?;
            let text = if cell_offset == -1 {
                String::new()
            } else {
                let at = offset_from(row_body, cell_offset as u32, "cell string", data.len())?;
                read_cstring(data, at, "cell string")?
            };
            pool.push(text);
        }
        rows.push(start..pool.len());
    }

    Ok(TableLayout { presence, rows })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds nested-table records for tests.
    ///
    /// Every table is written with the given presence flags; `None` cells are
    /// written as the `-1` empty marker.
    pub(crate) fn build_nested_table(
        sections: &[Vec<(Vec<u8>, Vec<Vec<Option<&str>>>)>],
    ) -> Vec<u8> {
        let header_len = 4 + sections.len() * 8;
        let mut out = vec![0u8; header_len];
        out[0..4].copy_from_slice(&(sections.len() as u32).to_le_bytes());

        for (section_index, tables) in sections.iter().enumerate() {
            let section_start = out.len();
            out[4 + section_index * 8..8 + section_index * 8]
                .copy_from_slice(&(section_start as u32).to_le_bytes());

            let mut section = vec![0u8; 4 + tables.len() * 8];
            section[0..4].copy_from_slice(&(tables.len() as u32).to_le_bytes());

            for (table_index, (flags, rows)) in tables.iter().enumerate() {
                let table_start = section.len();
                section[4 + table_index * 8..8 + table_index * 8]
                    .copy_from_slice(&(table_start as u32).to_le_bytes());

                let columns = flags.len();
                let stride = columns * 4;
                let body = (16 + columns).next_multiple_of(4);

                let mut table = vec![0u8; body + rows.len() * stride];
                table[8..10].copy_from_slice(&(rows.len() as u16).to_le_bytes());
                table[10..12].copy_from_slice(&(stride as u16).to_le_bytes());
                table[12..14].copy_from_slice(&(body as u16).to_le_bytes());
                table[16..16 + columns].copy_from_slice(flags);

                let mut strings = Vec::new();
                let strings_base = rows.len() * stride;
                for (row_index, row) in rows.iter().enumerate() {
                    for (column, cell) in row.iter().enumerate() {
                        let at = body + row_index * stride + column * 4;
                        let value = match cell {
                            Some(text) => {
                                let offset = (strings_base + strings.len()) as i32;
                                strings.extend_from_slice(text.as_bytes());
                                strings.push(0);
                                offset
                            }
                            None => -1,
                        };
                        table[at..at + 4].copy_from_slice(&value.to_le_bytes());
                    }
                }
                table.extend_from_slice(&strings);
                section[8 + table_index * 8..12 + table_index * 8]
                    .copy_from_slice(&(table.len() as u32).to_le_bytes());
                section.extend_from_slice(&table);
            }
            // Shipped records store each section's size next to its offset
            out[8 + section_index * 8..12 + section_index * 8]
                .copy_from_slice(&(section.len() as u32).to_le_bytes());
            out.extend_from_slice(&section);
        }
        out
    }

    #[test]
    fn test_parse_single_column_table() {
        let data = build_nested_table(&[vec![(
            vec![0],
            vec![vec![Some("ネコ3")], vec![Some(" Dog\r ")], vec![None]],
        )]]);

        let set = parse_nested_table_bytes(&data).unwrap();
        assert_eq!(set.section_count(), 1);
        assert_eq!(set.table_count(0), 1);
        assert_eq!(set.row_count(0, 0), 3);
        assert_eq!(set.row(0, 0, 0).unwrap(), ["ネコ3"]);
        assert_eq!(set.row(0, 0, 1).unwrap(), ["Dog"]);
        // -1 decodes to the canonical empty string
        assert_eq!(set.row(0, 0, 2).unwrap(), [""]);
        assert_eq!(set.cell_count(), 3);
    }

    #[test]
    fn test_masked_cells_never_appear() {
        let data = build_nested_table(&[vec![(
            vec![0, 1, 0],
            vec![
                vec![Some("a"), Some("hidden"), Some("c")],
                vec![Some("d"), Some("hidden"), None],
            ],
        )]]);

        let set = parse_nested_table_bytes(&data).unwrap();
        let mask = set.presence(0, 0).unwrap();
        assert_eq!(mask.columns(), 3);
        assert_eq!(mask.present_count(), 2);
        assert!(!mask.is_present(1));
        assert_eq!(set.row(0, 0, 0).unwrap(), ["a", "c"]);
        assert_eq!(set.row(0, 0, 1).unwrap(), ["d", ""]);
        assert!(set.row(0, 0, 2).is_none());
    }

    #[test]
    fn test_multiple_sections_and_tables() {
        let data = build_nested_table(&[
            vec![
                (vec![0], vec![vec![Some("first")]]),
                (vec![0], vec![vec![Some("second")], vec![Some("third")]]),
            ],
            vec![(vec![0], vec![vec![Some("other")]])],
        ]);

        let set = parse_nested_table_bytes(&data).unwrap();
        assert_eq!(set.section_count(), 2);
        assert_eq!(set.table_count(0), 2);
        assert_eq!(set.table_count(1), 1);
        assert_eq!(set.table_count(2), 0);
        assert_eq!(set.row(0, 1, 1).unwrap(), ["third"]);
        assert_eq!(set.row(1, 0, 0).unwrap(), ["other"]);
    }

    #[test]
    fn test_truncated_record_is_rejected() {
        let data = build_nested_table(&[vec![(vec![0], vec![vec![Some("x")]])]]);
        assert!(parse_nested_table_bytes(&data[..data.len() / 2]).is_err());
    }

    #[test]
    fn test_presence_mask_wide() {
        let mut mask = PresenceMask::new(70);
        mask.set_present(0);
        mask.set_present(69);
        mask.set_present(70);
        assert!(mask.is_present(69));
        assert!(!mask.is_present(70));
        assert_eq!(mask.present_columns().collect::<Vec<_>>(), vec![0, 69]);
    }
}
