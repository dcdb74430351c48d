use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

const LONG_ABOUT: &str = "\
Compress and embed static assets into binaries.

The file paths to embed can be suffixed by a colon and a target (alias)
path, for instance /original/local/path:/virtual/path. When compressed and
stuffed, the original path is replaced with the alias, which in turn is used
to access the file from within the application.";

/// Environment variable consulted when `--root` is not given.
pub const ROOT_ENV: &str = "STUFFBIN_ROOT";

#[derive(Parser, Debug)]
#[command(name = "stuffbin", author, version, about, long_about = LONG_ABOUT)]
pub struct Args {
    /// The action to perform.
    #[arg(short = 'a', long = "action", value_enum)]
    pub action: Action,

    /// Path to the input binary.
    #[arg(short = 'i', long = "in")]
    pub input: PathBuf,

    /// Path to the output binary (stuff, strip) or zip file (unstuff).
    #[arg(short = 'o', long = "out")]
    pub output: Option<PathBuf>,

    /// Root path to bind all files to. Falls back to STUFFBIN_ROOT, then "/".
    #[arg(short = 'r', long = "root")]
    pub root: Option<String>,

    /// `[ADVANCED]` 8-byte tag identifying stuffed binaries.
    #[arg(long, default_value = "stuffbin", hide = true)]
    pub tag: String,

    /// Print the identifier and file listing as JSON (id only).
    #[arg(long)]
    pub json: bool,

    /// Files and directories to embed, each optionally suffixed with `:alias`.
    pub files: Vec<String>,
}

/// What to do with the input binary.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Show the identifier and the stuffed files.
    Id,
    /// Stuff files onto a copy of the binary.
    Stuff,
    /// Extract the raw stuffed ZIP.
    Unstuff,
    /// Write a copy of the binary without its stuffed files.
    Strip,
}

/// Gets the root path from the command-line option or the `STUFFBIN_ROOT`
/// environment variable, defaulting to `/`.
pub fn get_root_from_opt_or_env(root_opt: Option<String>) -> String {
    if let Some(root) = root_opt {
        return root;
    }
    if let Ok(root) = std::env::var(ROOT_ENV) {
        if !root.is_empty() {
            return root;
        }
    }
    "/".to_string()
}

/// Long flags also accepted with a single dash, e.g. `-in app -out app.stuffed`.
const SINGLE_DASH_LONG: [&str; 5] = ["in", "out", "root", "tag", "json"];

/// Rewrites `-in`, `-out=x` and friends to their `--` form so clap does not
/// read them as bundled short flags (`-in` would otherwise be `-i n`).
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut positional = false;
    for arg in args {
        let arg = arg.into();
        if positional {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            positional = true;
            out.push(arg);
            continue;
        }
        let rewritten = arg.to_str().and_then(|s| {
            let flag = s.strip_prefix('-').filter(|f| !f.starts_with('-'))?;
            let name = flag.split('=').next().unwrap_or(flag);
            SINGLE_DASH_LONG.contains(&name).then(|| OsString::from(format!("-{}", s)))
        });
        out.push(rewritten.unwrap_or(arg));
    }
    out
}

/// Parses command-line arguments using `clap`.
pub fn run() -> Result<Args, Box<dyn std::error::Error>> {
    Ok(Args::parse_from(normalize_args(std::env::args_os())))
}
