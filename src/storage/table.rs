use std::path::Path;

use log::{debug, info, warn};

use super::{
    cursor::Cursor,
    error::StorageError,
    header::{
        page::{PAGE_SIZE, ROWS_PER_PAGE, TABLE_MAX_ROWS},
        row::ROW_SIZE,
    },
    pager::Pager,
    row::Row,
};

/// The single table of the database.
///
/// Rows are appended in memory and written to disk by [`Table::close`];
/// dropping a table without closing it discards everything inserted since
/// it was opened.
#[derive(Debug)]
pub struct Table {
    pub(crate) pager: Pager,
    pub(crate) rows: usize,
}

impl Table {
    /// Opens the table stored at `path`.
    ///
    /// The row count is derived from the file length alone. A file that was
    /// truncated or padded outside of this crate yields a wrong count rather
    /// than an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let pager = Pager::open(path)?;
        let length = pager.length() as usize;
        let rows = (length / PAGE_SIZE) * ROWS_PER_PAGE + (length % PAGE_SIZE) / ROW_SIZE;

        info!("table opened with {rows} rows");
        Ok(Self { pager, rows })
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Appends `row` after the last row.
    ///
    /// # Errors
    ///
    /// [`StorageError::TableFull`] once `TABLE_MAX_ROWS` rows are stored; the
    /// table is left untouched. Any other error is fatal.
    pub fn insert(&mut self, row: &Row) -> Result<(), StorageError> {
        if self.rows >= TABLE_MAX_ROWS {
            warn!("rejecting insert of row {}: table full", row.id());
            return Err(StorageError::TableFull);
        }

        let mut cursor = Cursor::end(self);
        debug!("inserting row {} at {:?}", row.id(), cursor.position()?);
        row.serialize(cursor.value()?)?;

        self.rows += 1;
        Ok(())
    }

    /// Iterates over every row in insertion order.
    pub fn scan(&mut self) -> Scan<'_> {
        Scan {
            cursor: Cursor::start(self),
        }
    }

    /// Writes every page holding rows back to disk and closes the file.
    ///
    /// Full pages are written whole. The last page, if partially filled, is
    /// written only up to its last row so that the file length keeps
    /// encoding the row count.
    pub fn close(mut self) -> Result<(), StorageError> {
        let full_pages = self.rows / ROWS_PER_PAGE;
        let remainder = self.rows % ROWS_PER_PAGE;

        for id in 0..full_pages {
            if !self.pager.is_loaded(id) {
                continue;
            }
            self.pager.flush(id, PAGE_SIZE)?;
        }

        // An unloaded last page was never written to since open.
        if remainder > 0 && self.pager.is_loaded(full_pages) {
            self.pager.flush(full_pages, remainder * ROW_SIZE)?;
        }

        info!("table closed with {} rows", self.rows);
        self.pager.close()
    }
}

/// Lazy scan over a [`Table`], see [`Table::scan`].
///
/// The first error ends the scan.
#[derive(Debug)]
pub struct Scan<'a> {
    cursor: Cursor<'a>,
}

impl Iterator for Scan<'_> {
    type Item = Result<Row, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.is_end() {
            return None;
        }

        match self.cursor.value().and_then(|slot| Row::deserialize(slot)) {
            Ok(row) => {
                self.cursor.advance();
                Some(Ok(row))
            }
            Err(e) => {
                while !self.cursor.is_end() {
                    self.cursor.advance();
                }
                Some(Err(e))
            }
        }
    }
}
