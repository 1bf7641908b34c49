//! Paged flat-file storage engine.
//!
//! A [`Table`] owns a [`Pager`] and the number of rows it holds. Rows are
//! fixed-width records laid out back to back inside 4096 byte pages; a
//! [`Cursor`] maps a logical row index onto a page and a byte offset within
//! it. Pages are loaded lazily from disk and only written back when the
//! table is closed.
//!
//! # On-disk format
//!
//! The file has no header. Page `i` occupies bytes `[i * 4096, i * 4096 + 4096)`
//! and row `j` of a page occupies `[j * 84, j * 84 + 84)` relative to the
//! page start. The last 48 bytes of every page are never addressed.
pub mod cursor;
pub mod page;
pub mod pager;
pub mod row;
pub mod table;

pub use cursor::{Cursor, locate};
pub use error::{PagerError, StorageError};
pub use page::Page;
pub use pager::Pager;
pub use row::Row;
pub use table::{Scan, Table};

pub mod header {
    pub mod row {
        pub const COLUMN_USERNAME_SIZE: usize = 16;
        pub const COLUMN_EMAIL_SIZE: usize = 64;

        pub const ID_SIZE: usize = size_of::<i32>();
        pub const USERNAME_SIZE: usize = size_of::<u8>() * COLUMN_USERNAME_SIZE;
        pub const EMAIL_SIZE: usize = size_of::<u8>() * COLUMN_EMAIL_SIZE;
        pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SIZE + EMAIL_SIZE;

        pub const ID_OFFSET: usize = 0;
        pub const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
        pub const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_SIZE;
    }

    pub mod page {
        use super::row::ROW_SIZE;

        pub const PAGE_SIZE: usize = 4096;
        pub const ROWS_PER_PAGE: usize = PAGE_SIZE / ROW_SIZE;
        pub const PAGE_USED_SIZE: usize = ROWS_PER_PAGE * ROW_SIZE;

        pub const TABLE_MAX_PAGES: usize = 128;
        pub const TABLE_MAX_ROWS: usize = ROWS_PER_PAGE * TABLE_MAX_PAGES;
    }
}

pub mod error {
    use std::io;

    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum PagerError {
        #[error("io error: {0}")]
        Io(#[from] io::Error),

        #[error("page {page} is out of bounds")]
        OutOfBounds { page: usize },

        #[error("tried to flush page {page} which was never loaded")]
        Unloaded { page: usize },
    }

    #[derive(Debug, Error)]
    pub enum StorageError {
        #[error("table full")]
        TableFull,

        #[error("[pager error]: {cause}")]
        Pager { cause: PagerError },

        #[error("[cursor error]: row {row} is out of bounds")]
        RowOutOfBounds { row: usize },

        #[error("[row error][{action}]: {error}")]
        Row { action: String, error: String },
    }

    impl StorageError {
        /// Whether the table can keep serving requests after this error.
        ///
        /// Only [`StorageError::TableFull`] is recoverable; everything else
        /// means the backing file or the in-memory state can no longer be
        /// trusted.
        pub fn is_fatal(&self) -> bool {
            !matches!(self, StorageError::TableFull)
        }
    }

    impl From<PagerError> for StorageError {
        fn from(cause: PagerError) -> Self {
            StorageError::Pager { cause }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::header::{page::*, row::*};

    #[test]
    fn layout_constants() {
        assert_eq!(ROW_SIZE, 84);
        assert_eq!((ID_OFFSET, USERNAME_OFFSET, EMAIL_OFFSET), (0, 4, 20));
        assert_eq!(ROWS_PER_PAGE, 48);
        assert_eq!(PAGE_SIZE - PAGE_USED_SIZE, 48);
        assert_eq!(TABLE_MAX_ROWS, 6144);
    }
}
