//! The `build` command: tree file in, C file (and optionally a binary) out.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use mathc_codegen::CodegenResult;
use mathc_ir::census::count_program;
use mathc_ir::dump::dump_program;
use mathc_ir::{Program, StringInterner, TreeFile};
use mathc_resolve::{resolve_program, ResolveError};
use tracing::{debug, info, warn};

use crate::{Config, DriverError};

/// What a build produced.
#[derive(Debug)]
pub struct BuildOutcome {
    /// The generated C file.
    pub c_file: PathBuf,
    /// The compiled binary, when the C compiler was run.
    pub binary: Option<PathBuf>,
    /// Name resolution problems. Lowering still ran.
    pub resolve_errors: Vec<ResolveError>,
    /// Generated code and lowering diagnostics.
    pub codegen: CodegenResult,
    /// Node count, with `--census`.
    pub census: Option<usize>,
    /// Rendered tree, with `--dump-tree`.
    pub tree_dump: Option<String>,
}

/// Read a bincode tree file and restore its interner.
pub fn load_tree(path: &Path) -> Result<(StringInterner, Program), DriverError> {
    let bytes = fs::read(path).map_err(|source| DriverError::io(path, source))?;
    let tree: TreeFile = bincode::deserialize(&bytes).map_err(|source| DriverError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    tree.into_parts().map_err(|source| DriverError::Names {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve, lower and write `program`, then run the C compiler if asked.
pub fn compile(
    program: &mut Program,
    interner: &StringInterner,
    config: &Config,
) -> Result<BuildOutcome, DriverError> {
    let census = config.census.then(|| count_program(program));
    let tree_dump = config.dump_tree.then(|| dump_program(program, interner));

    let resolve_errors = resolve_program(program, interner);
    for error in &resolve_errors {
        warn!(%error, "name resolution");
    }

    let codegen = mathc_codegen::generate(program, interner);
    debug!(
        bytes = codegen.code.len(),
        diagnostics = codegen.diagnostics.len(),
        "generated C"
    );

    fs::create_dir_all(&config.out_dir).map_err(|source| DriverError::io(&config.out_dir, source))?;
    let c_file = config.c_file();
    fs::write(&c_file, &codegen.code).map_err(|source| DriverError::io(&c_file, source))?;
    info!(path = %c_file.display(), "wrote C source");

    let binary = if config.run_cc {
        Some(run_cc(&config.cc, &c_file, &config.binary())?)
    } else {
        None
    };

    Ok(BuildOutcome {
        c_file,
        binary,
        resolve_errors,
        codegen,
        census,
        tree_dump,
    })
}

/// `cc <file>.c -o <binary> -lm`
fn run_cc(cc: &str, c_file: &Path, binary: &Path) -> Result<PathBuf, DriverError> {
    let mut cmd = Command::new(cc);
    cmd.arg(c_file).arg("-o").arg(binary).arg("-lm");
    debug!(command = ?cmd, "running C compiler");

    let output = cmd.output().map_err(|e| DriverError::Toolchain {
        cc: cc.to_string(),
        message: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let status = output
            .status
            .code()
            .map_or_else(|| "terminated by signal".to_string(), |code| format!("exit code {code}"));
        return Err(DriverError::Toolchain {
            cc: cc.to_string(),
            message: format!("{status}\n{}", stderr.trim_end()),
        });
    }

    info!(path = %binary.display(), "compiled");
    Ok(binary.to_path_buf())
}
