use log::trace;

use super::{
    error::StorageError,
    header::{
        page::{ROWS_PER_PAGE, TABLE_MAX_ROWS},
        row::ROW_SIZE,
    },
    table::Table,
};

/// Maps a logical row index to its page and its byte offset in that page.
///
/// Inserting and scanning both go through this, so a row is always read back
/// from the slot it was written to.
pub fn locate(row: usize) -> Result<(usize, usize), StorageError> {
    if row >= TABLE_MAX_ROWS {
        return Err(StorageError::RowOutOfBounds { row });
    }
    Ok((row / ROWS_PER_PAGE, (row % ROWS_PER_PAGE) * ROW_SIZE))
}

/// A position in a [`Table`].
///
/// Cursors are short lived: one is created for every insert and every scan
/// and borrows the table for as long as it exists.
#[derive(Debug)]
pub struct Cursor<'a> {
    table: &'a mut Table,
    row: usize,
    end_of_table: bool,
}

impl<'a> Cursor<'a> {
    /// Cursor at the first row of the table.
    pub fn start(table: &'a mut Table) -> Self {
        let end_of_table = table.is_empty();
        Self {
            table,
            row: 0,
            end_of_table,
        }
    }

    /// Cursor one past the last row, where the next row is inserted.
    pub fn end(table: &'a mut Table) -> Self {
        let row = table.len();
        Self {
            table,
            row,
            end_of_table: true,
        }
    }

    #[cfg(test)]
    pub(crate) fn row(&self) -> usize {
        self.row
    }

    pub fn is_end(&self) -> bool {
        self.end_of_table
    }

    pub fn position(&self) -> Result<(usize, usize), StorageError> {
        locate(self.row)
    }

    /// The slot under the cursor, loading its page if needed.
    pub fn value(&mut self) -> Result<&mut [u8], StorageError> {
        let (page, offset) = self.position()?;
        trace!("row {} -> page {page} offset {offset}", self.row);
        Ok(self.table.pager.page(page)?.slot_mut(offset))
    }

    pub fn advance(&mut self) {
        self.row += 1;
        if self.row >= self.table.len() {
            self.end_of_table = true;
        }
    }
}
