//! CLI runner shared by the `stuffbin` binary and the integration tests.
//!
//! Every action reads the identifier first so a binary that was never
//! stuffed is reported as such, not as a generic read failure.

use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::archive;
use crate::cli::{self, Action, Args};
use crate::common::FileMetadata;
use crate::error::StuffError;
use crate::footer::{FooterCodec, Identifier};
use crate::stuff::Stuffer;
use crate::unstuff::Unstuffer;
use crate::vfs::FileSystem;

/// Public entry for running CLI logic.
pub fn run_cli_app() -> Result<(), Box<dyn Error>> {
    let args = cli::run()?;
    run_with_args(args)
}

/// Runs one parsed invocation.
pub fn run_with_args(args: Args) -> Result<(), Box<dyn Error>> {
    let codec = FooterCodec::with_tag(&args.tag)?;

    match args.action {
        Action::Id => id(&codec, &args.input, args.json),
        Action::Unstuff => unstuff(&codec, &args.input, output(&args.output)?),
        Action::Strip => strip(&codec, &args.input, output(&args.output)?),
        Action::Stuff => {
            let out = output(&args.output)?;
            if args.files.is_empty() {
                return Err("provide one or more files to embed".into());
            }
            let root = cli::get_root_from_opt_or_env(args.root.clone());
            let (bin_len, zip_len) = Stuffer::new(codec)
                .stuff(&args.input, out, &root, &args.files)
                .map_err(|e| format!("stuffing failed: {}", e))?;
            println!(
                "stuffing complete. binary size is {:.2} KB and stuffed zip size is {:.2} KB.",
                kb(bin_len),
                kb(zip_len)
            );
            Ok(())
        }
    }
}

fn output(out: &Option<PathBuf>) -> Result<&Path, Box<dyn Error>> {
    out.as_deref().ok_or_else(|| "provide an output path".into())
}

#[derive(Serialize)]
struct Listing<'a> {
    path: &'a Path,
    identifier: Identifier,
    files: Vec<ListedFile>,
    total_size: u64,
}

#[derive(Serialize)]
struct ListedFile {
    path: String,
    #[serde(flatten)]
    metadata: FileMetadata,
}

/// Shows the identifier and stuffed files of a binary.
fn id(codec: &FooterCodec, path: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    let unstuffer = Unstuffer::new(*codec);
    let id = read_identifier(&unstuffer, path)?;
    let fs = archive::unzip(&unstuffer.get_stuff(path)?)?;

    let mut files = Vec::with_capacity(fs.len());
    for p in fs.list() {
        let f = fs.get(&p)?;
        files.push(ListedFile {
            path: p,
            metadata: f.metadata().clone(),
        });
    }

    if json {
        let listing = Listing {
            path,
            identifier: id,
            files,
            total_size: fs.size(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!(
        "{}: {} ({:.2} KB binary, {:.2} KB stuff)\n",
        path.display(),
        id.name(),
        kb(id.bin_size),
        kb(id.zip_size)
    );
    println!("{} files totalling {:.2} KB", fs.len(), kb(fs.size()));
    for f in &files {
        println!("{:.2} KB \t\t {}", kb(f.metadata.size), f.path);
    }
    Ok(())
}

/// Extracts the raw ZIP from a stuffed binary.
fn unstuff(codec: &FooterCodec, input: &Path, out: &Path) -> Result<(), Box<dyn Error>> {
    let unstuffer = Unstuffer::new(*codec);
    let id = read_identifier(&unstuffer, input)?;
    println!(
        "{}: {} ({} bytes original binary, {} bytes zipped stuff)\n",
        input.display(),
        id.name(),
        id.bin_size,
        id.zip_size
    );

    let b = unstuffer.get_stuff(input)?;
    let mut to = File::create(out).map_err(|e| StuffError::io(out, e))?;
    archive::write_raw(&mut to, &b).map_err(|e| StuffError::io(out, e))?;
    println!("wrote to {}", out.display());
    Ok(())
}

/// Writes a copy of the binary stripped of its stuffed files.
fn strip(codec: &FooterCodec, input: &Path, out: &Path) -> Result<(), Box<dyn Error>> {
    let id = read_identifier(&Unstuffer::new(*codec), input)?;
    println!(
        "{}: {} ({} bytes original binary, {} bytes zipped stuff)\n",
        input.display(),
        id.name(),
        id.bin_size,
        id.zip_size
    );

    Stuffer::new(*codec)
        .strip(input, out)
        .map_err(|e| format!("error stripping binary: {}", e))?;
    println!("wrote stripped binary '{}'", out.display());
    Ok(())
}

fn read_identifier(unstuffer: &Unstuffer, path: &Path) -> Result<Identifier, Box<dyn Error>> {
    match unstuffer.identifier(path) {
        Ok(id) => Ok(id),
        Err(StuffError::NoIdentifier) => Err(format!("{}: {}", path.display(), StuffError::NoIdentifier).into()),
        Err(e) => Err(format!("error reading file: {}", e).into()),
    }
}

fn kb(n: u64) -> f64 {
    n as f64 / 1024.0
}

