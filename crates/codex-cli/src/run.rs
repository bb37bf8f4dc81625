//! `run` subcommand handler

use crate::Settings;
use crate::utils::{exit_with_error, read_source_or_exit};
use codex_core::pipeline::Pipeline;

/// Execute a Codex script file with the tree-walking interpreter
pub fn handle_run(file: &str, settings: Settings) {
    let source = read_source_or_exit(file);
    let pipeline = Pipeline::new(source, file)
        .with_lex_mode(settings.lex_mode())
        .with_config(settings.interpreter_config());

    if let Err(e) = pipeline.run_all() {
        exit_with_error(&e, pipeline.source(), file);
    }
}
