use std::path::PathBuf;

use pretty_assertions::assert_eq;

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_with(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    }
}

fn build(list: &[&str], env: impl Fn(&str) -> Option<String>) -> Config {
    match parse_args_with_env(&args(list), env) {
        Ok((Command::Build { .. }, config)) => config,
        other => panic!("expected a build command, got {other:?}"),
    }
}

#[test]
fn test_no_arguments_is_help() {
    let (command, config) = parse_args_with_env(&[], no_env).unwrap();
    assert_eq!(command, Command::Help);
    assert_eq!(config, Config::default());
    assert_eq!(
        parse_args_with_env(&args(&["--help"]), no_env).unwrap().0,
        Command::Help
    );
}

#[test]
fn test_build_defaults() {
    let (command, config) = parse_args_with_env(&args(&["build", "trees/prog.bin"]), no_env).unwrap();
    assert_eq!(
        command,
        Command::Build {
            input: PathBuf::from("trees/prog.bin")
        }
    );
    assert_eq!(
        config,
        Config {
            out_dir: PathBuf::from("output"),
            stem: "prog".to_string(),
            run_cc: false,
            cc: "cc".to_string(),
            dump_tree: false,
            census: false,
        }
    );
    assert_eq!(config.c_file(), PathBuf::from("output/prog.c"));
    assert_eq!(config.binary(), PathBuf::from("output/prog"));
}

#[test]
fn test_out_dir_precedence() {
    static ENV: &[(&str, &str)] = &[("MATHC_OUTPUT_DIR", "from-env")];

    let config = build(&["build", "a.bin"], no_env);
    assert_eq!(config.out_dir, PathBuf::from("output"));

    let config = build(&["build", "a.bin"], env_with(ENV));
    assert_eq!(config.out_dir, PathBuf::from("from-env"));

    let config = build(&["build", "a.bin", "--out-dir=from-flag"], env_with(ENV));
    assert_eq!(config.out_dir, PathBuf::from("from-flag"));
}

#[test]
fn test_cc_precedence() {
    static ENV: &[(&str, &str)] = &[("CC", "clang")];
    static EMPTY: &[(&str, &str)] = &[("CC", "")];

    let config = build(&["build", "a.bin", "--cc"], no_env);
    assert!(config.run_cc);
    assert_eq!(config.cc, "cc");

    let config = build(&["build", "a.bin", "--cc"], env_with(ENV));
    assert_eq!(config.cc, "clang");

    let config = build(&["build", "a.bin", "--cc=/opt/gcc"], env_with(ENV));
    assert!(config.run_cc);
    assert_eq!(config.cc, "/opt/gcc");

    let config = build(&["build", "a.bin"], env_with(EMPTY));
    assert!(!config.run_cc);
    assert_eq!(config.cc, "cc");
}

#[test]
fn test_output_name_and_flags() {
    let config = build(
        &["build", "--census", "-o", "demo", "a.bin", "--dump-tree"],
        no_env,
    );
    assert_eq!(config.stem, "demo");
    assert!(config.census);
    assert!(config.dump_tree);

    let config = build(&["build", "a.bin", "-o=other"], no_env);
    assert_eq!(config.stem, "other");
}

#[test]
fn test_usage_errors() {
    for list in [
        &["build"][..],
        &["build", "a.bin", "-o"],
        &["build", "a.bin", "--fast"],
        &["build", "a.bin", "b.bin"],
        &["run", "a.bin"],
    ] {
        match parse_args_with_env(&args(list), no_env) {
            Err(DriverError::Usage(message)) => assert!(!message.is_empty()),
            other => panic!("{list:?}: expected a usage error, got {other:?}"),
        }
    }
}
