// Common test utilities and fixture loading
#![allow(dead_code)]

use codex_core::pipeline::{Pipeline, PipelineError};
use codex_core::{BytecodeUnit, Value};
use std::fs;
use std::path::PathBuf;

/// Load a test fixture file by name
pub fn load_fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.cdx", name));

    fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", path.display()))
}

/// Interpret `source`, capturing everything it prints
pub fn run_capture(source: &str) -> (Result<Value, PipelineError>, String) {
    let pipeline = Pipeline::new(source, "test.cdx");
    let mut out = Vec::new();
    let result = pipeline
        .parse()
        .and_then(|program| pipeline.interpret_with(&program, &mut out));
    (result, String::from_utf8(out).expect("output is utf-8"))
}

/// Assert that `source` runs successfully and prints exactly `expected`
pub fn assert_prints(source: &str, expected: &str) {
    let (result, out) = run_capture(source);
    if let Err(e) = result {
        panic!("Program execution failed.\nSource: {source}\nError: {e}");
    }
    assert_eq!(out, expected, "Output mismatch.\nSource: {source}");
}

/// Assert that `source` fails with an error whose message contains `needle`
pub fn assert_fails(source: &str, needle: &str) {
    match run_capture(source).0 {
        Ok(value) => panic!("Program should have failed but returned: {value}\nSource: {source}"),
        Err(e) => assert!(
            e.to_string().contains(needle),
            "Error should contain '{needle}' but got: {e}"
        ),
    }
}

pub fn compile_unit(name: &str, source: &str) -> BytecodeUnit {
    Pipeline::new(source, format!("{name}.cdx"))
        .compile_all()
        .unwrap_or_else(|e| panic!("failed to compile {name}: {e}"))
}
