use std::fmt;

use bincode::{
    Decode, Encode,
    config::{BigEndian, Configuration, Fixint},
    decode_from_slice, encode_into_slice,
};

use super::{
    error::StorageError,
    header::row::{EMAIL_SIZE, ROW_SIZE, USERNAME_SIZE},
};

/// One record of the table.
///
/// Both text columns are fixed-width byte arrays; values shorter than the
/// column are left-aligned and the rest of the array is filler that is kept
/// as-is through encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Row {
    id: i32,
    username: [u8; USERNAME_SIZE],
    email: [u8; EMAIL_SIZE],
}

/// Big-endian, fixed width integers. Arrays carry no length prefix so the
/// encoded row is exactly `ROW_SIZE` bytes.
fn config() -> Configuration<BigEndian, Fixint> {
    bincode::config::standard()
        .with_big_endian()
        .with_fixed_int_encoding()
}

impl Row {
    pub fn new(id: i32, username: [u8; USERNAME_SIZE], email: [u8; EMAIL_SIZE]) -> Self {
        Self {
            id,
            username,
            email,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn username(&self) -> &[u8; USERNAME_SIZE] {
        &self.username
    }

    pub fn email(&self) -> &[u8; EMAIL_SIZE] {
        &self.email
    }

    /// Encodes the row into `dst`, which must be a single row slot.
    pub fn serialize(&self, dst: &mut [u8]) -> Result<(), StorageError> {
        if dst.len() != ROW_SIZE {
            return Err(StorageError::Row {
                action: "serialize".into(),
                error: format!("unexpected slot size '{}'", dst.len()),
            });
        }

        encode_into_slice(self, dst, config()).map_err(|e| StorageError::Row {
            action: "serialize".into(),
            error: e.to_string(),
        })?;
        Ok(())
    }

    /// Decodes a row from a single row slot.
    pub fn deserialize(src: &[u8]) -> Result<Self, StorageError> {
        if src.len() != ROW_SIZE {
            return Err(StorageError::Row {
                action: "deserialize".into(),
                error: format!("unexpected slot size '{}'", src.len()),
            });
        }

        let (row, _) = decode_from_slice(src, config()).map_err(|e| StorageError::Row {
            action: "deserialize".into(),
            error: e.to_string(),
        })?;
        Ok(row)
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> Result<[u8; ROW_SIZE], StorageError> {
        let mut buf = [0; ROW_SIZE];
        self.serialize(&mut buf)?;
        Ok(buf)
    }
}

/// Text up to the first NUL byte of a fixed-width column.
fn column_text(column: &[u8]) -> String {
    let end = column.iter().position(|b| *b == 0).unwrap_or(column.len());
    String::from_utf8_lossy(&column[..end]).into_owned()
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} {} {})",
            self.id,
            column_text(&self.username),
            column_text(&self.email)
        )
    }
}
