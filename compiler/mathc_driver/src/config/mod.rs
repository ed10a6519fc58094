//! Command-line and environment configuration.
//!
//! Every setting resolves as: command-line flag, then environment
//! variable, then built-in default.

use std::path::{Path, PathBuf};

use crate::DriverError;

/// Environment variable naming the output directory.
pub const OUTPUT_DIR_VAR: &str = "MATHC_OUTPUT_DIR";
/// Environment variable naming the C compiler.
pub const CC_VAR: &str = "CC";

const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_CC: &str = "cc";
const DEFAULT_STEM: &str = "program";

/// What the command line asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Lower a tree file to C.
    Build { input: PathBuf },
    Help,
}

/// Settings for one build.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Directory receiving `<stem>.c` and the binary.
    pub out_dir: PathBuf,
    /// File name of the outputs, without extension.
    pub stem: String,
    /// Compile the generated C after writing it.
    pub run_cc: bool,
    /// C compiler invoked when `run_cc` is set.
    pub cc: String,
    /// Print the program tree before lowering.
    pub dump_tree: bool,
    /// Print the node count before lowering.
    pub census: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            stem: DEFAULT_STEM.to_string(),
            run_cc: false,
            cc: DEFAULT_CC.to_string(),
            dump_tree: false,
            census: false,
        }
    }
}

impl Config {
    /// Path of the generated C file.
    pub fn c_file(&self) -> PathBuf {
        self.out_dir.join(format!("{}.c", self.stem))
    }

    /// Path of the compiled binary.
    pub fn binary(&self) -> PathBuf {
        self.out_dir.join(&self.stem)
    }
}

/// Parse the command line (without the program name), reading fallbacks
/// from the process environment.
pub fn parse_args(args: &[String]) -> Result<(Command, Config), DriverError> {
    parse_args_with_env(args, |key| std::env::var(key).ok())
}

/// `parse_args` with an explicit environment lookup.
pub fn parse_args_with_env(
    args: &[String],
    env: impl Fn(&str) -> Option<String>,
) -> Result<(Command, Config), DriverError> {
    let Some((command, rest)) = args.split_first() else {
        return Ok((Command::Help, Config::default()));
    };

    match command.as_str() {
        "help" | "--help" | "-h" => Ok((Command::Help, Config::default())),
        "build" => parse_build(rest, &env),
        other => Err(DriverError::Usage(format!(
            "unknown command '{other}' (expected 'build' or 'help')"
        ))),
    }
}

fn parse_build(
    args: &[String],
    env: &impl Fn(&str) -> Option<String>,
) -> Result<(Command, Config), DriverError> {
    let mut input: Option<PathBuf> = None;
    let mut out_dir: Option<PathBuf> = None;
    let mut stem: Option<String> = None;
    let mut cc: Option<String> = None;
    let mut config = Config::default();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if arg == "-o" {
            // -o takes the next argument
            let Some(name) = args.get(i + 1) else {
                return Err(DriverError::Usage("-o needs a file name".to_string()));
            };
            stem = Some(name.clone());
            i += 2;
            continue;
        }

        if let Some(name) = arg.strip_prefix("-o=") {
            stem = Some(name.to_string());
        } else if let Some(dir) = arg.strip_prefix("--out-dir=") {
            out_dir = Some(PathBuf::from(dir));
        } else if let Some(path) = arg.strip_prefix("--cc=") {
            cc = Some(path.to_string());
            config.run_cc = true;
        } else if arg == "--cc" {
            config.run_cc = true;
        } else if arg == "--dump-tree" {
            config.dump_tree = true;
        } else if arg == "--census" {
            config.census = true;
        } else if arg.starts_with('-') {
            return Err(DriverError::Usage(format!("unknown option '{arg}'")));
        } else if input.is_none() {
            input = Some(PathBuf::from(arg));
        } else {
            return Err(DriverError::Usage(format!("unexpected argument '{arg}'")));
        }
        i += 1;
    }

    let Some(input) = input else {
        return Err(DriverError::Usage("missing tree file".to_string()));
    };

    if let Some(dir) = out_dir.or_else(|| env(OUTPUT_DIR_VAR).map(PathBuf::from)) {
        config.out_dir = dir;
    }
    if let Some(cc) = cc.or_else(|| env(CC_VAR).filter(|cc| !cc.is_empty())) {
        config.cc = cc;
    }
    if let Some(stem) = stem.or_else(|| default_stem(&input)) {
        config.stem = stem;
    }

    Ok((Command::Build { input }, config))
}

/// `tree.bin` builds `tree`.
fn default_stem(input: &Path) -> Option<String> {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// Text printed by `mathc help`.
pub const USAGE: &str = "\
Usage: mathc build <tree.bin> [options]

Options:
  --out-dir=<dir>   Output directory (default: $MATHC_OUTPUT_DIR, then 'output')
  -o <name>         Output file name without extension (default: input file stem)
  --cc              Compile the generated C with $CC (default: cc)
  --cc=<path>       Compile the generated C with <path>
  --dump-tree       Print the program tree
  --census          Print the program's node count

Set RUST_LOG=debug (or trace) for compiler logs.";

#[cfg(test)]
mod tests;
