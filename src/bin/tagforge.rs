//! tagforge: import structured data into a tag-based store
//!
//! Usage:
//!   # Preview what a JSON/YAML/CSV import would create
//!   tagforge --file books.json --root-path user/books --preview
//!
//!   # Validate a batch against its first record's shape
//!   tagforge --file books.json --check
//!
//!   # Import a file, keying objects by a record field
//!   tagforge --file books.json --root-path user/books --about title
//!
//!   # Import a directory tree onto a single object
//!   tagforge --dir ./docs --root-path user/files --about docs:v1
//!
//! The bundled backend is the in-memory store; a remote deployment plugs its
//! own client in behind the `TagStore` trait.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Parser;
use tagforge::import::{self, FileRequest, ObjectTarget};
use tagforge::store::MemoryStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tagforge")]
#[command(about = "Import structured data into a tag-based store", long_about = None)]
struct Args {
    /// The file to process (json, yaml or csv)
    #[arg(long, short = 'f', value_name = "FILE", conflicts_with = "dir")]
    file: Option<PathBuf>,

    /// The root directory for a filesystem import
    #[arg(long, short = 'd', value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Absolute namespace path under which namespaces and tags are created
    #[arg(long, value_name = "PATH")]
    root_path: Option<String>,

    /// Name of the dataset (defaults to the input's file name stem)
    #[arg(long, short = 'n')]
    name: Option<String>,

    /// Description of the dataset
    #[arg(long, default_value = "")]
    description: String,

    /// File mode: record field keying the about value.
    /// Directory mode: the about value of the object to tag
    #[arg(long, short = 'a')]
    about: Option<String>,

    /// Directory mode: uuid of the object to tag
    #[arg(long, conflicts_with = "about")]
    uuid: Option<String>,

    /// Show what would be created, import nothing
    #[arg(long, short = 'p')]
    preview: bool,

    /// File mode: validate the batch against its template record, import
    /// nothing
    #[arg(long, short = 'c')]
    check: bool,

    /// Write null/empty leaf values instead of skipping them
    #[arg(long)]
    allow_empty: bool,

    /// Display status messages on the console
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match (&args.file, &args.dir) {
        (Some(file), None) => process_file(file, &args),
        (None, Some(dir)) => process_directory(dir, &args),
        (None, None) => bail!("you must supply either a source file or a root directory"),
        (Some(_), Some(_)) => unreachable!("clap rejects --file with --dir"),
    }
}

fn dataset_name(args: &Args, input: &Path) -> String {
    args.name.clone().unwrap_or_else(|| {
        input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string())
    })
}

fn required_root_path(args: &Args) -> Result<&str> {
    match &args.root_path {
        Some(path) if !path.is_empty() => Ok(path),
        _ => bail!("--root-path is required for this operation"),
    }
}

fn process_file(file: &Path, args: &Args) -> Result<()> {
    if args.check {
        let report = import::check_file(file)?;
        if report.is_clean() {
            println!("Validation passed: all records match the template's shape");
        } else {
            for entry in &report.missing {
                println!("MISSING: {entry}");
            }
            for entry in &report.extras {
                println!("EXTRA: {entry}");
            }
        }
        return Ok(());
    }

    let root_path = required_root_path(args)?;
    if args.preview {
        println!("{}", import::preview_file(file, root_path)?);
        return Ok(());
    }

    let dataset = dataset_name(args, file);
    let mut store = MemoryStore::new();
    let request = FileRequest {
        path: file,
        root_path,
        dataset: &dataset,
        desc: &args.description,
        about_field: args.about.as_deref(),
        allow_empty: args.allow_empty,
    };
    let count = import::import_file(&mut store, &request)?;
    println!("{count} records imported");
    Ok(())
}

fn process_directory(dir: &Path, args: &Args) -> Result<()> {
    if args.check {
        bail!("--check applies to file imports only");
    }
    let root_path = required_root_path(args)?;
    let dataset = dataset_name(args, dir);

    let target = match (&args.uuid, &args.about) {
        (Some(uuid), None) => ObjectTarget::Id(uuid.clone()),
        (None, Some(about)) => ObjectTarget::About(about.clone()),
        (None, None) => ObjectTarget::Anonymous,
        (Some(_), Some(_)) => unreachable!("clap rejects --uuid with --about"),
    };

    if args.preview {
        println!(
            "{}",
            import::preview_directory(dir, root_path, &dataset, &target)?
        );
        return Ok(());
    }

    let mut store = MemoryStore::new();
    let object = import::import_directory(
        &mut store,
        dir,
        root_path,
        &dataset,
        &args.description,
        &target,
    )?;
    println!("Tags added to object with uuid: {}", object.id);
    Ok(())
}
