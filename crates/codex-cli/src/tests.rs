//! Tests for CLI utilities

use super::Settings;
use super::link::collect_unit_paths;
use super::repl::{Command, Repl};
use super::utils::*;
use codex_core::Value;
use codex_core::parser::LexMode;
use std::fs;

fn settings() -> Settings {
    Settings {
        max_call_depth: 50,
        strict: false,
    }
}

#[test]
fn test_read_source_from_file() {
    let temp_path = std::env::temp_dir().join("codex_cli_test_read.cdx");
    let content = "let x = 42";
    fs::write(&temp_path, content).unwrap();

    let result = read_source(temp_path.to_str().unwrap());
    assert_eq!(result.unwrap(), content);

    let _ = fs::remove_file(temp_path);
}

#[test]
fn test_read_source_nonexistent_file() {
    assert!(read_source("/nonexistent/file/path.cdx").is_err());
}

#[test]
fn test_settings_map_to_core_config() {
    let strict = Settings {
        max_call_depth: 7,
        strict: true,
    };
    assert_eq!(strict.lex_mode(), LexMode::Strict);
    assert_eq!(strict.interpreter_config().max_call_depth, 7);
    assert_eq!(settings().lex_mode(), LexMode::Lenient);
}

#[test]
fn test_repl_commands() {
    assert_eq!(Command::parse("   "), Command::Skip);
    assert_eq!(Command::parse("QUIT"), Command::Exit);
    assert_eq!(Command::parse("exit"), Command::Exit);
    assert_eq!(Command::parse(" help "), Command::Help);
    assert_eq!(Command::parse(" print(1) "), Command::Eval("print(1)".into()));
}

#[test]
fn test_repl_keeps_globals_between_lines() {
    let mut repl = Repl::new(Vec::new(), settings());
    assert_eq!(repl.eval("let x = 4").unwrap(), Value::Number(4.0));
    assert_eq!(repl.eval("func double(n) { return n * 2 }").unwrap(), Value::None);
    assert_eq!(repl.eval("double(x)").unwrap(), Value::Number(8.0));
    repl.eval("print(x + 1)").unwrap();
    assert_eq!(String::from_utf8_lossy(repl.output()), "5.0\n");
}

#[test]
fn test_repl_error_does_not_end_session() {
    let mut repl = Repl::new(Vec::new(), settings());
    assert!(repl.eval("print(nope)").is_err());
    assert!(repl.eval("let = 1").is_err());
    assert_eq!(repl.eval("1 + 1").unwrap(), Value::Number(2.0));
}

#[test]
fn test_collect_unit_paths_walks_directories() {
    let dir = std::env::temp_dir().join("codex_cli_test_units");
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("b.cdxo"), "").unwrap();
    fs::write(dir.join("nested").join("a.cdxo"), "").unwrap();
    fs::write(dir.join("notes.txt"), "").unwrap();

    let explicit = dir.join("notes.txt").to_string_lossy().to_string();
    let paths = collect_unit_paths(&[explicit.clone(), dir.to_string_lossy().to_string()]).unwrap();
    assert_eq!(
        paths,
        vec![
            dir.join("notes.txt"),
            dir.join("b.cdxo"),
            dir.join("nested").join("a.cdxo"),
        ]
    );

    let _ = fs::remove_dir_all(&dir);
}
