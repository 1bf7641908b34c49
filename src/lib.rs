pub mod cli;
pub mod statement;
pub mod storage;

pub use cli::{Command, prompt, run};
pub use statement::Statement;
pub use storage::{Row, StorageError, Table};
