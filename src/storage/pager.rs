//! Disk-backed page cache.
//!
//! The [`Pager`] owns the database file and a fixed array of page slots, one
//! per page the table can ever hold. A slot stays empty until the page is
//! first touched; it is then read from disk (or started zero-filled when the
//! file does not reach that far) and stays resident until the pager is
//! closed. Nothing is evicted, so the cache is bounded by
//! `TABLE_MAX_PAGES * PAGE_SIZE` bytes.
//!
//! Pages are only written back through [`Pager::flush`], which writes a
//! prefix of a page. The table decides how much of each page is valid.
//!
//! # Example
//! ```rust
//! use rowdb::storage::pager::Pager;
//!
//! let path = std::env::temp_dir().join(format!("rowdb-pager-{}.tbl", std::process::id()));
//! let _ = std::fs::remove_file(&path);
//!
//! let mut pager = Pager::open(&path).unwrap();
//! pager.page(0).unwrap().as_bytes_mut()[0] = 42;
//! pager.flush(0, 1).unwrap();
//! pager.close().unwrap();
//!
//! assert_eq!(std::fs::read(&path).unwrap(), vec![42]);
//! std::fs::remove_file(&path).unwrap();
//! ```
use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::Path,
};

use log::{debug, trace};

use super::{
    error::{PagerError, StorageError},
    header::page::{PAGE_SIZE, TABLE_MAX_PAGES},
    page::Page,
};

#[derive(Debug)]
pub struct Pager {
    file: File,
    length: u64,
    pages: [Option<Page>; TABLE_MAX_PAGES],
}

impl Pager {
    /// Opens the file at `path`, creating it if needed. No page is loaded.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path.as_ref())
            .map_err(PagerError::Io)?;

        let length = file.seek(SeekFrom::End(0)).map_err(PagerError::Io)?;
        debug!("opened {:?} ({length} bytes)", path.as_ref());

        Ok(Self {
            file,
            length,
            pages: std::array::from_fn(|_| None),
        })
    }

    /// Length of the file in bytes when it was opened.
    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn is_loaded(&self, id: usize) -> bool {
        matches!(self.pages.get(id), Some(Some(_)))
    }

    /// Returns page `id`, reading it from disk on first access.
    ///
    /// # Errors
    ///
    /// Fails if `id` is not below `TABLE_MAX_PAGES` or the read fails.
    pub fn page(&mut self, id: usize) -> Result<&mut Page, StorageError> {
        if id >= TABLE_MAX_PAGES {
            return Err(PagerError::OutOfBounds { page: id }.into());
        }

        let page = match self.pages[id].take() {
            Some(page) => page,
            None => self.read_page(id)?,
        };
        Ok(self.pages[id].insert(page))
    }

    /// Writes the first `bytes` bytes of page `id` to its place in the file.
    ///
    /// # Errors
    ///
    /// Fails if the page was never loaded or the write fails.
    pub fn flush(&mut self, id: usize, bytes: usize) -> Result<(), StorageError> {
        let page = self
            .pages
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(PagerError::Unloaded { page: id })?;
        debug_assert!(bytes <= PAGE_SIZE, "flush of {bytes} bytes overruns page");

        trace!("flushing {bytes} bytes of page {id}");
        self.file
            .seek(SeekFrom::Start((id * PAGE_SIZE) as u64))
            .map_err(PagerError::Io)?;
        self.file
            .write_all(&page.as_bytes()[..bytes])
            .map_err(PagerError::Io)?;

        Ok(())
    }

    /// Syncs and releases the file. Pages that were not flushed are lost.
    pub fn close(self) -> Result<(), StorageError> {
        self.file.sync_all().map_err(PagerError::Io)?;
        Ok(())
    }

    fn read_page(&mut self, id: usize) -> Result<Page, StorageError> {
        let mut page = Page::new();
        self.file
            .seek(SeekFrom::Start((id * PAGE_SIZE) as u64))
            .map_err(PagerError::Io)?;

        // Past the end of the file the page simply stays zero-filled.
        let mut bytes = Vec::with_capacity(PAGE_SIZE);
        Read::take(&mut self.file, PAGE_SIZE as u64)
            .read_to_end(&mut bytes)
            .map_err(PagerError::Io)?;
        page.as_bytes_mut()[..bytes.len()].copy_from_slice(&bytes);

        trace!("loaded page {id} ({} bytes from disk)", bytes.len());
        Ok(page)
    }
}
