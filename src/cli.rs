//! CLI utilities for rowdb.
//!
//! The utilities present in this module drive a [`Table`] from a line based
//! prompt: `insert <id> <username> <email>`, `select` and the `.exit`
//! meta-command.
use std::io::{self, BufRead, Write};

use log::{debug, error};
use thiserror::Error;

use crate::{
    statement::{ExecuteError, Statement, StatementError},
    storage::{StorageError, Table},
};

pub const PROMPT: &str = "db > ";

/// Possible commands from a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Exit command `.exit`, or end of input.
    Exit,
    /// Parsed `insert`/`select` statement.
    Statement(Statement),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown meta command: {0}")]
    UnrecognizedCommand(String),

    #[error(transparent)]
    Statement(#[from] StatementError),

    #[error("reading input error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("io failure: {0}")]
    Io(#[from] io::Error),
}

impl From<ExecuteError> for CliError {
    fn from(value: ExecuteError) -> Self {
        match value {
            ExecuteError::Storage(e) => CliError::Storage(e),
            ExecuteError::Io(e) => CliError::Io(e),
        }
    }
}

/// Prompt user for a command.
///
/// Returns `Ok(None)` for a blank line. End of input is treated as `.exit`.
pub fn prompt<R, W>(mut reader: R, mut writer: W) -> Result<Option<Command>, CommandError>
where
    R: BufRead,
    W: Write,
{
    let mut s = String::default();
    write!(&mut writer, "{PROMPT}")?;
    writer.flush()?;

    if reader.read_line(&mut s)? == 0 {
        return Ok(Some(Command::Exit));
    }

    match s.trim() {
        "" => Ok(None),
        ".exit" => Ok(Some(Command::Exit)),
        s if s.starts_with('.') => Err(CommandError::UnrecognizedCommand(s.to_string())),
        s => Ok(Some(Command::Statement(s.try_into()?))),
    }
}

/// Runs the prompt loop until `.exit` or end of input, then closes `table`.
///
/// Bad input and a full table are reported on stderr and the loop carries
/// on. Any other storage error is returned and the table is left unclosed.
pub fn run<R, W>(mut table: Table, mut reader: R, mut writer: W) -> Result<(), CliError>
where
    R: BufRead,
    W: Write,
{
    loop {
        let cmd = match prompt(&mut reader, &mut writer) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(CommandError::Io(e)) => return Err(e.into()),
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        let stmt = match cmd {
            Command::Exit => {
                table.close()?;
                writeln!(writer, "Bye.")?;
                return Ok(());
            }
            Command::Statement(stmt) => stmt,
        };

        debug!("executing {stmt:?}");
        match stmt.execute(&mut table, &mut writer) {
            Ok(()) => writeln!(writer, "Executed.")?,
            Err(ExecuteError::Storage(e)) if !e.is_fatal() => eprintln!("Error: Table full."),
            Err(e) => {
                error!("aborting session: {e}");
                return Err(e.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn prompt_prints_correctly() {
        let input = b".exit\n";
        let mut output = Vec::new();

        prompt(&input[..], &mut output).unwrap();

        let output = String::from_utf8(output).expect("not valid UTF-8");
        assert_eq!("db > ", output);
    }

    #[test]
    fn prompt_handles_statements() {
        let input = b"select\n";
        let mut output = Vec::new();

        let res = prompt(&input[..], &mut output).unwrap();
        assert_eq!(Some(Command::Statement(Statement::Select)), res);
    }

    #[test]
    fn prompt_skips_blank_lines() {
        let input = b"   \n";
        let mut output = Vec::new();

        assert_eq!(None, prompt(&input[..], &mut output).unwrap());
    }

    #[test]
    fn prompt_end_of_input_exits() {
        let input = b"";
        let mut output = Vec::new();

        assert_eq!(Some(Command::Exit), prompt(&input[..], &mut output).unwrap());
    }

    #[test]
    #[should_panic(expected = "UnrecognizedCommand")]
    fn prompt_unrecognized_command() {
        let input = b".something_wrong\n";
        let mut output = Vec::new();

        prompt(&input[..], &mut output).unwrap();
    }

    #[test]
    #[should_panic(expected = "NegativeId")]
    fn prompt_invalid_statement() {
        let input = b"insert -1 a b\n";
        let mut output = Vec::new();

        prompt(&input[..], &mut output).unwrap();
    }

    #[test]
    fn run_session() {
        let temp = TempDir::new("cli").unwrap();
        let path = temp.path().join("db.tbl");
        let input = b"insert 1 alice alice@x.com\n\n.nope\ninsert 2 bob bob@x.com\nselect\n.exit\n";
        let mut output = Vec::new();

        run(Table::open(&path).unwrap(), &input[..], &mut output).unwrap();

        let expected = [
            "db > Executed.",
            "db > db > db > Executed.",
            "db > (1 alice alice@x.com)",
            "(2 bob bob@x.com)",
            "Executed.",
            "db > Bye.",
            "",
        ]
        .join("\n");
        assert_eq!(String::from_utf8(output).unwrap(), expected);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 168);
    }

    #[test]
    fn run_closes_on_end_of_input() {
        let temp = TempDir::new("cli").unwrap();
        let path = temp.path().join("db.tbl");
        let mut output = Vec::new();

        run(Table::open(&path).unwrap(), &b"insert 1 a b\n"[..], &mut output).unwrap();
        run(Table::open(&path).unwrap(), &b"select\n"[..], &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.ends_with("db > (1 a b)\nExecuted.\ndb > Bye.\n"));
    }
}
