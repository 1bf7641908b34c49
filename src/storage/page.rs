use super::header::{
    page::{PAGE_SIZE, PAGE_USED_SIZE},
    row::ROW_SIZE,
};

/// A fixed-size block of row slots, mirrored byte for byte on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    data: Box<[u8; PAGE_SIZE]>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// A zero-filled page.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; PAGE_SIZE]),
        }
    }

    pub fn as_bytes(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8; PAGE_SIZE] {
        &mut self.data
    }

    /// The row slot starting at `offset`.
    ///
    /// # Panics
    ///
    /// If the slot would reach into the unused trailer of the page.
    pub fn slot(&self, offset: usize) -> &[u8] {
        assert!(offset + ROW_SIZE <= PAGE_USED_SIZE, "slot out of bounds");
        &self.data[offset..offset + ROW_SIZE]
    }

    /// Mutable access to the row slot starting at `offset`.
    ///
    /// # Panics
    ///
    /// If the slot would reach into the unused trailer of the page.
    pub fn slot_mut(&mut self, offset: usize) -> &mut [u8] {
        assert!(offset + ROW_SIZE <= PAGE_USED_SIZE, "slot out of bounds");
        &mut self.data[offset..offset + ROW_SIZE]
    }
}
