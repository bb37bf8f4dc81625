//! Shared CLI utilities for reading input, logging and reporting errors

use codex_core::pipeline::PipelineError;
use std::fs;
use std::io::{self, Read};
use std::process;

/// Environment variable holding the `env_logger` filter
pub const LOG_ENV: &str = "CODEX_LOG";

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn"))
        .format_timestamp(None)
        .init();
}

/// Read source code from a file or stdin.
/// If `file` is "-", reads from stdin. Otherwise reads from the specified file.
pub fn read_source(file: &str) -> io::Result<String> {
    if file == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(file)
    }
}

/// Read `file` or exit with an error message
pub fn read_source_or_exit(file: &str) -> String {
    match read_source(file) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Error reading file '{file}': {err}");
            process::exit(1);
        }
    }
}

/// Print `err` with a snippet of `source` and exit with status 1
pub fn exit_with_error(err: &PipelineError, source: &str, file: &str) -> ! {
    eprintln!("{}", err.format_with_source(source, file));
    process::exit(1);
}

pub fn write_output(path: &str, contents: &str) {
    if let Err(e) = fs::write(path, contents) {
        eprintln!("Error writing to '{path}': {e}");
        process::exit(1);
    }
}
