//! Debug subcommands: `tokens` and `ast`

use crate::Settings;
use crate::utils::{exit_with_error, read_source_or_exit};
use codex_core::pipeline::Pipeline;

/// Print one token per line with its position
pub fn handle_tokens(file: &str, settings: Settings) {
    let source = read_source_or_exit(file);
    let pipeline = Pipeline::new(source, file).with_lex_mode(settings.lex_mode());

    let tokens = match pipeline.tokenize() {
        Ok(tokens) => tokens,
        Err(e) => exit_with_error(&e, pipeline.source(), file),
    };
    for token in tokens {
        println!(
            "{:>4}:{:<4} {:<12} {}",
            token.line,
            token.column,
            token.kind.as_str(),
            token.lexeme
        );
    }
}

/// Print the parsed AST for debugging
pub fn handle_ast(file: &str, settings: Settings) {
    let source = read_source_or_exit(file);
    let pipeline = Pipeline::new(source, file).with_lex_mode(settings.lex_mode());

    let ast = match pipeline.parse() {
        Ok(ast) => ast,
        Err(e) => exit_with_error(&e, pipeline.source(), file),
    };
    println!("{ast:#?}");
}
