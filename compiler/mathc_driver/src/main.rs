//! mathc CLI
//!
//! Lowers a program tree file to C.

use mathc_driver::{compile, init_tracing, load_tree, parse_args, BuildOutcome, Command, USAGE};
use mathc_ir::teardown;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, config) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!();
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let input = match command {
        Command::Help => {
            println!("{USAGE}");
            return;
        }
        Command::Build { input } => input,
    };

    let (interner, mut program) = match load_tree(&input) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let result = compile(&mut program, &interner, &config);
    teardown(&mut Some(program));

    match result {
        Ok(outcome) => {
            if report(&outcome) {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Print the outcome of a build. Returns true if lowering hit a structural
/// error.
fn report(outcome: &BuildOutcome) -> bool {
    if let Some(count) = outcome.census {
        println!("Total nodes in the program tree: {count}");
    }
    if let Some(dump) = &outcome.tree_dump {
        println!("{dump}");
    }

    for error in &outcome.resolve_errors {
        eprintln!("warning: {error}");
    }
    for diagnostic in &outcome.codegen.diagnostics {
        eprintln!("{diagnostic}");
    }

    println!("wrote {}", outcome.c_file.display());
    if let Some(binary) = &outcome.binary {
        println!("compiled {}", binary.display());
    }

    outcome.codegen.has_structural_errors()
}
