use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use rowdb::storage::header::{
    page::TABLE_MAX_ROWS,
    row::{EMAIL_SIZE, ROW_SIZE, USERNAME_SIZE},
};
use tempdir::TempDir;

fn run_commands<T: AsRef<str>>(commands: &[T], db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rowdb").expect("binary should build");
    cmd.arg(db_path);

    let input = commands
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    cmd.write_stdin(input);
    cmd
}

#[test]
fn inserts_and_retrieves_a_row() {
    let temp = TempDir::new("cli").unwrap();
    let mut cmd = run_commands(
        &["insert 1 user1 person1@example.com", "select", ".exit"],
        &temp.path().join("db.tbl"),
    );

    let expected = [
        "db > Executed.",
        "db > (1 user1 person1@example.com)",
        "Executed.",
        "db > Bye.",
        "",
    ]
    .join("\n");

    cmd.assert().success().stdout(expected);
}

#[test]
fn keeps_data_after_closing() {
    let temp = TempDir::new("cli").unwrap();
    let db_path = temp.path().join("db.tbl");

    run_commands(
        &[
            "insert 1 alice alice@x.com",
            "insert 2 bob bob@x.com",
            ".exit",
        ],
        &db_path,
    )
    .assert()
    .success();
    assert_eq!(fs::metadata(&db_path).unwrap().len(), 2 * ROW_SIZE as u64);

    run_commands(&["select", ".exit"], &db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "db > (1 alice alice@x.com)\n(2 bob bob@x.com)\nExecuted.",
        ));
}

#[test]
fn end_of_input_commits() {
    let temp = TempDir::new("cli").unwrap();
    let db_path = temp.path().join("db.tbl");

    run_commands(&["insert 7 eve eve@x.com"], &db_path)
        .assert()
        .success();

    run_commands(&["select"], &db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(7 eve eve@x.com)"));
}

#[test]
fn prints_error_message_when_table_is_full() {
    let temp = TempDir::new("cli").unwrap();
    let mut commands = Vec::new();
    for i in 0..TABLE_MAX_ROWS + 1 {
        commands.push(format!("insert {i} user{i} person{i}@example.com"));
    }
    commands.push(".exit".to_string());

    run_commands(&commands, &temp.path().join("db.tbl"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Error: Table full."));
}

#[test]
fn allows_strings_of_maximum_length() {
    let temp = TempDir::new("cli").unwrap();
    let username = "a".repeat(USERNAME_SIZE);
    let email = "a".repeat(EMAIL_SIZE);

    run_commands(
        &[
            format!("insert 1 {username} {email}"),
            "select".to_string(),
            ".exit".to_string(),
        ],
        &temp.path().join("db.tbl"),
    )
    .assert()
    .success()
    .stdout(predicate::str::contains(format!("(1 {username} {email})")));
}

#[test]
fn rejects_bad_input_and_carries_on() {
    let temp = TempDir::new("cli").unwrap();
    let username = "a".repeat(USERNAME_SIZE + 1);

    let expected = [
        "db > db > db > db > db > Executed.",
        "db > Bye.",
        "",
    ]
    .join("\n");

    run_commands(
        &[
            "insert -1 user1 person1@example.com".to_string(),
            format!("insert 1 {username} a@b"),
            ".tables".to_string(),
            "delete 1".to_string(),
            "select".to_string(),
            ".exit".to_string(),
        ],
        &temp.path().join("db.tbl"),
    )
    .assert()
    .success()
    .stdout(expected)
    .stderr(
        predicate::str::contains("id must be larger or equal than zero")
            .and(predicate::str::contains("username is too long"))
            .and(predicate::str::contains("unknown meta command: .tables"))
            .and(predicate::str::contains("unknown statement type: delete")),
    );
}

#[test]
fn requires_a_database_path() {
    Command::cargo_bin("rowdb")
        .expect("binary should build")
        .assert()
        .failure();
}

#[test]
fn exit_without_touching_existing_rows() {
    let temp = TempDir::new("cli").unwrap();
    let db_path = temp.path().join("db.tbl");

    run_commands(&["insert 1 a b", ".exit"], &db_path)
        .assert()
        .success();

    run_commands(&[".exit"], &db_path)
        .assert()
        .success()
        .stdout("db > Bye.\n");
    assert_eq!(fs::metadata(&db_path).unwrap().len(), ROW_SIZE as u64);

    run_commands(&["select", ".exit"], &db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 a b)"));
}

