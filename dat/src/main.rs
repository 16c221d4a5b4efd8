//! Inspect and maintain filesystem-backed records.
//!
//! Every record is a directory holding `_spec_.yaml`. Relative paths resolve
//! against the store root (`--root`, then `root` in `dat.toml`, then
//! `DAT_ROOT`, then the current directory).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use dat::core::spec::{CLASS_KEY, PATH_KEY};
use dat::io::codec;
use dat::io::config::load_config;
use dat::registry::CONTAINER_TYPE;
use dat::{Dat, Registry, Spec, SpecSource, Store, logging};

#[derive(Parser)]
#[command(name = "dat", version, about = "Inspect and maintain filesystem-backed records")]
struct Cli {
    /// Root directory for relative record paths (overrides the config file).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Store config file (TOML). A missing file means defaults.
    #[arg(long, global = true, default_value = "dat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create and save a record from `key=literal` assignments; prints its path.
    New {
        /// Path template (defaults to `main.path`, then the configured template).
        #[arg(long)]
        path: Option<String>,
        /// Declare the record a container.
        #[arg(long)]
        container: bool,
        assignments: Vec<String>,
    },
    /// Print a record's spec as YAML.
    Show { path: PathBuf },
    /// Print values at dotted keys as JSON, one per line.
    Get {
        path: PathBuf,
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Apply `key=literal` assignments to a record and save it.
    Set {
        path: PathBuf,
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// List the child records of a container.
    Ls { path: PathBuf },
    /// Delete a record and everything below it.
    Rm { path: PathBuf },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(root) = cli.root {
        config.root = root;
    }
    let store = Store::new(&config, Registry::with_builtins());

    match cli.command {
        Command::New {
            path,
            container,
            assignments,
        } => cmd_new(&store, path, container, &assignments),
        Command::Show { path } => cmd_show(&store, &path),
        Command::Get { path, keys } => cmd_get(&store, &path, &keys),
        Command::Set { path, assignments } => cmd_set(&store, &path, &assignments),
        Command::Ls { path } => cmd_ls(&store, &path),
        Command::Rm { path } => cmd_rm(&store, &path),
    }
}

fn cmd_new(
    store: &Store,
    path: Option<String>,
    container: bool,
    assignments: &[String],
) -> Result<()> {
    let mut spec = Spec::new();
    dat::sets(&mut spec, assignments).context("apply assignments")?;
    if let Some(template) = path {
        dat::set(&mut spec, PATH_KEY, Value::String(template))?;
    }
    if container {
        dat::set(&mut spec, CLASS_KEY, Value::String(CONTAINER_TYPE.to_string()))?;
    }
    let record = store.from_template(spec).context("create record")?;
    println!("{}", record.path_name());
    Ok(())
}

fn cmd_show(store: &Store, path: &Path) -> Result<()> {
    let record = store.load(path)?;
    print!("{}", codec::encode(record.spec(), &record.record().spec_file())?);
    Ok(())
}

fn cmd_get(store: &Store, path: &Path, keys: &[String]) -> Result<()> {
    let record = store.load(path)?;
    for value in dat::gets(&record, keys)? {
        println!("{}", serde_json::to_string(value).context("serialize value")?);
    }
    Ok(())
}

fn cmd_set(store: &Store, path: &Path, assignments: &[String]) -> Result<()> {
    let mut record = store.load(path)?;
    dat::sets(&mut record, assignments).context("apply assignments")?;
    record
        .save()
        .with_context(|| format!("save {}", record.path().display()))?;
    Ok(())
}

fn cmd_ls(store: &Store, path: &Path) -> Result<()> {
    let container = store.load_container(path)?;
    for child in container.dat_paths()? {
        println!("{}", child.display());
    }
    Ok(())
}

fn cmd_rm(store: &Store, path: &Path) -> Result<()> {
    let removed = store.delete(path)?;
    println!("{}", if removed { "removed" } else { "absent" });
    Ok(())
}
