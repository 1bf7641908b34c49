use clap::Parser;
use std::{io, path::PathBuf, process};

use log::error;
use rowdb::{cli, storage::Table};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the database file; created if it does not exist
    path: PathBuf,
}

fn main() {
    // Initialize env_logger; For logging to STDERR
    env_logger::init();

    let cli = Cli::parse();
    let table = match Table::open(&cli.path) {
        Ok(table) => table,
        Err(e) => {
            error!("failed to open {:?}: {e}", cli.path);
            eprintln!("open table error: {e}");
            process::exit(1);
        }
    };

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    if let Err(e) = cli::run(table, stdin, stdout) {
        eprintln!("{e}");
        process::exit(1);
    }
}
