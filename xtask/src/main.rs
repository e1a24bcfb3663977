// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project automation
//!
//! `cargo test` runs everything against in-memory `SQLite` and needs no
//! infrastructure. The MySQL/MariaDB backend is exercised only on request:
//!
//! - `cargo xtask test-mariadb` starts a throwaway `MariaDB` container and
//!   runs the ignored `backend_validation_tests` in `lexdesk-persistence`
//! - `cargo xtask verify-migrations` applies both migration sets and fails
//!   if the resulting table layouts differ
//!
//! Containers are removed when the command finishes, including on failure.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::{io, process::Output, thread::sleep, time::Duration};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const PERSISTENCE_PACKAGE: &str = "lexdesk-persistence";

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run the ignored persistence tests against a `MariaDB` container
    TestMariadb,

    /// Check that the `SQLite` and `MySQL` migrations produce the same tables
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint formatting, clippy, and docs
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Run lib and doc tests for the workspace's default packages
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])?;
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// A throwaway `MariaDB` 11 container, removed on drop.
struct MariaDbContainer {
    name: &'static str,
    port: u16,
}

impl MariaDbContainer {
    const DATABASE: &'static str = "lexdesk_test";
    const USER: &'static str = "lexdesk";
    const PASSWORD: &'static str = "test_password";
    const READY_ATTEMPTS: u32 = 30;

    /// Starts the container and waits until it accepts queries.
    fn start(name: &'static str, port: u16) -> Result<Self> {
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        remove_container(name);

        tracing::info!(container = name, port, "Starting MariaDB container");
        cmd!(
            "docker",
            "run",
            "--name",
            name,
            "-e",
            format!("MARIADB_DATABASE={}", Self::DATABASE),
            "-e",
            format!("MARIADB_USER={}", Self::USER),
            "-e",
            format!("MARIADB_PASSWORD={}", Self::PASSWORD),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{port}:3306"),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        let container = Self { name, port };
        container.wait_until_ready()?;
        Ok(container)
    }

    fn wait_until_ready(&self) -> Result<()> {
        for attempt in 1..=Self::READY_ATTEMPTS {
            sleep(Duration::from_secs(1));
            tracing::debug!("Connection attempt {attempt}/{}", Self::READY_ATTEMPTS);

            let probe = cmd!(
                "docker",
                "exec",
                self.name,
                "mariadb",
                "-u",
                Self::USER,
                format!("-p{}", Self::PASSWORD),
                "-e",
                "SELECT 1"
            )
            .stdout_null()
            .stderr_null()
            .run();

            if probe.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }
        Err(eyre!("MariaDB did not become ready within timeout"))
    }

    fn database_url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            Self::USER,
            Self::PASSWORD,
            self.port,
            Self::DATABASE
        )
    }
}

impl Drop for MariaDbContainer {
    fn drop(&mut self) {
        tracing::info!(container = self.name, "Removing MariaDB container");
        remove_container(self.name);
    }
}

fn remove_container(name: &str) {
    let _ = cmd!("docker", "stop", name).stdout_null().stderr_null().run();
    let _ = cmd!("docker", "rm", name).stdout_null().stderr_null().run();
}

/// Run the ignored backend validation tests against `MariaDB`.
///
/// Sets `DATABASE_URL` and `LEXDESK_TEST_BACKEND=mariadb` for the test
/// process. Port 3307 must be free.
fn test_mariadb() -> Result<()> {
    let container = MariaDbContainer::start("lexdesk-test-mariadb", 3307)?;

    tracing::info!("Running MariaDB backend validation tests");
    cmd!(
        "cargo",
        "test",
        "--package",
        PERSISTENCE_PACKAGE,
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", container.database_url())
    .env("LEXDESK_TEST_BACKEND", "mariadb")
    .run_with_trace()
    .wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Apply both migration sets and compare the resulting tables.
///
/// Tables, column names, and column nullability must match. Port 3308
/// must be free.
fn verify_migrations() -> Result<()> {
    let mut sqlite_conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut sqlite_conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;
    sqlite_conn
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;
    tracing::info!("SQLite migrations applied");

    let container = MariaDbContainer::start("lexdesk-verify-migrations", 3308)?;
    let mut mysql_conn = MysqlConnection::establish(&container.database_url())
        .wrap_err("Failed to connect to MariaDB")?;
    mysql_conn
        .run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply MySQL migrations: {e}"))?;
    tracing::info!("MySQL migrations applied");

    let sqlite_layout = sqlite_layout(&mut sqlite_conn)?;
    let mysql_layout = mysql_layout(&mut mysql_conn)?;
    compare_layouts(&sqlite_layout, &mysql_layout)?;

    tracing::info!(
        tables = sqlite_layout.len(),
        "Schema parity verification passed"
    );
    Ok(())
}

/// Table name to `(column, nullable)` pairs.
type Layout = BTreeMap<String, BTreeSet<(String, bool)>>;

#[derive(QueryableByName)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct SqliteColumn {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Integer)]
    notnull: i32,
    #[diesel(sql_type = Integer)]
    pk: i32,
}

#[derive(QueryableByName)]
struct MysqlColumn {
    #[diesel(sql_type = Text)]
    table_name: String,
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    is_nullable: String,
}

fn sqlite_layout(conn: &mut SqliteConnection) -> Result<Layout> {
    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations'",
    )
    .load(conn)
    .wrap_err("Failed to list SQLite tables")?;

    let mut layout = Layout::new();
    for table in tables {
        let columns: Vec<SqliteColumn> =
            diesel::sql_query(format!("PRAGMA table_info('{}')", table.name))
                .load(conn)
                .wrap_err_with(|| format!("Failed to read columns of {}", table.name))?;
        // SQLite reports primary key columns as nullable unless declared NOT NULL.
        let columns = columns
            .into_iter()
            .map(|c| (c.name, c.notnull == 0 && c.pk == 0))
            .collect();
        layout.insert(table.name, columns);
    }
    Ok(layout)
}

fn mysql_layout(conn: &mut MysqlConnection) -> Result<Layout> {
    let columns: Vec<MysqlColumn> = diesel::sql_query(
        "SELECT CAST(TABLE_NAME AS CHAR) AS table_name, \
                CAST(COLUMN_NAME AS CHAR) AS column_name, \
                CAST(IS_NULLABLE AS CHAR) AS is_nullable \
         FROM information_schema.COLUMNS \
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME != '__diesel_schema_migrations'",
    )
    .load(conn)
    .wrap_err("Failed to read MySQL columns")?;

    let mut layout = Layout::new();
    for column in columns {
        layout
            .entry(column.table_name)
            .or_default()
            .insert((column.column_name, column.is_nullable == "YES"));
    }
    Ok(layout)
}

fn compare_layouts(sqlite: &Layout, mysql: &Layout) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    for (table, sqlite_columns) in sqlite {
        let Some(mysql_columns) = mysql.get(table) else {
            errors.push(format!("table '{table}' exists in SQLite but not in MySQL"));
            continue;
        };
        for (column, nullable) in sqlite_columns.symmetric_difference(mysql_columns) {
            let side = if sqlite_columns.contains(&(column.clone(), *nullable)) {
                "SQLite"
            } else {
                "MySQL"
            };
            errors.push(format!(
                "{table}.{column} (nullable: {nullable}) only in {side}"
            ));
        }
    }
    for table in mysql.keys().filter(|t| !sqlite.contains_key(*t)) {
        errors.push(format!("table '{table}' exists in MySQL but not in SQLite"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(eyre!(
            "Schema parity check failed:\n  {}",
            errors.join("\n  ")
        ))
    }
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
