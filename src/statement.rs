use std::io::Write;

use thiserror::Error;

use crate::storage::{
    Row, StorageError, Table,
    header::row::{EMAIL_SIZE, USERNAME_SIZE},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    #[error("empty statement")]
    EmptyStatement,

    #[error("unknown statement type: {0}")]
    Unsupported(String),

    #[error("mismatched number of fields to be inserted: expected 3 but got {0}")]
    FieldCount(usize),

    #[error("parsing id error: '{0}' is not an integer")]
    InvalidId(String),

    #[error("id must be larger or equal than zero")]
    NegativeId,

    #[error("id is too large: {0} > {max}", max = i32::MAX)]
    IdTooLarge(i64),

    #[error("{field} is too long: expected char({max}) but got char({got})")]
    TooLong {
        field: &'static str,
        max: usize,
        got: usize,
    },
}

/// Copies `value` into a zero-filled fixed-width column.
///
/// Returns `None` if `value` does not fit.
pub fn fixed_column<const N: usize>(value: &str) -> Option<[u8; N]> {
    let bytes = value.as_bytes();
    if bytes.len() > N {
        return None;
    }

    let mut out = [0; N];
    out[..bytes.len()].copy_from_slice(bytes);
    Some(out)
}

fn column<const N: usize>(field: &'static str, value: &str) -> Result<[u8; N], StatementError> {
    fixed_column::<N>(value).ok_or(StatementError::TooLong {
        field,
        max: N,
        got: value.len(),
    })
}

impl TryFrom<&str> for Statement {
    type Error = StatementError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let parts = value.split_whitespace().collect::<Vec<&str>>();
        let Some(keyword) = parts.first() else {
            return Err(StatementError::EmptyStatement);
        };

        match keyword.to_lowercase().as_str() {
            "select" => Ok(Statement::Select),
            "insert" => {
                if parts.len() != 4 {
                    return Err(StatementError::FieldCount(parts.len() - 1));
                }

                let id = parts[1]
                    .parse::<i64>()
                    .map_err(|_| StatementError::InvalidId(parts[1].to_string()))?;
                if id < 0 {
                    return Err(StatementError::NegativeId);
                }
                let id = i32::try_from(id).map_err(|_| StatementError::IdTooLarge(id))?;

                let username = column::<USERNAME_SIZE>("username", parts[2])?;
                let email = column::<EMAIL_SIZE>("email", parts[3])?;

                Ok(Statement::Insert(Row::new(id, username, email)))
            }
            kind => Err(StatementError::Unsupported(kind.to_string())),
        }
    }
}

impl Statement {
    /// Runs the statement against `table`. Selected rows are written to
    /// `writer`, one per line.
    pub fn execute<W: Write>(self, table: &mut Table, mut writer: W) -> Result<(), ExecuteError> {
        match self {
            Statement::Insert(row) => table.insert(&row)?,
            Statement::Select => {
                for row in table.scan() {
                    writeln!(writer, "{}", row?)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
