use clap::{Args, CommandFactory, Parser, Subcommand};
use codex_core::interpreter::DEFAULT_MAX_CALL_DEPTH;
use codex_core::parser::LexMode;
use codex_core::{InterpreterConfig, LinkOptions};

mod compile;
mod debug;
mod link;
mod repl;
mod run;
mod utils;

#[cfg(test)]
mod tests;

use compile::{CompileOptions, handle_compile};
use debug::{handle_ast, handle_tokens};
use link::handle_link;
use repl::handle_repl;
use run::handle_run;

/// Get the version string including git revision
fn version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (git:", env!("GIT_HASH"), ")")
}

#[derive(Parser)]
#[command(
    author,
    version = version(),
    about = "Codex programming language",
    long_about = None,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// The file to run (default if no subcommand)
    file: Option<String>,
    #[command(flatten)]
    settings: Settings,
}

/// Flags shared by every subcommand
#[derive(Args, Clone, Copy)]
pub struct Settings {
    /// Maximum nesting of function calls before the interpreter gives up
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,
    /// Reject characters the lexer does not recognise instead of skipping them
    #[arg(long, global = true)]
    strict: bool,
}

impl Settings {
    pub fn lex_mode(&self) -> LexMode {
        if self.strict {
            LexMode::Strict
        } else {
            LexMode::Lenient
        }
    }

    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig {
            max_call_depth: self.max_call_depth,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a file with the interpreter
    Run {
        /// The file to execute
        file: String,
    },
    /// Start a REPL session
    Repl,
    /// Compile a Codex script to object code
    Compile {
        /// The file to compile
        file: String,
        /// Write the object-code listing here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
        /// Also write the serialized unit (.cdxo) for the linker
        #[arg(long)]
        unit: Option<String>,
        /// Symbol exported by this unit (repeatable)
        #[arg(long = "export", value_name = "NAME")]
        exports: Vec<String>,
        /// Symbol this unit imports from another unit (repeatable)
        #[arg(long = "import", value_name = "NAME")]
        imports: Vec<String>,
        /// Write a JSON compile report here
        #[arg(long)]
        report: Option<String>,
    },
    /// Link compiled units (.cdxo files or directories of them) into an executable
    Link {
        /// Unit files or directories, linked in the given order
        #[arg(required = true)]
        inputs: Vec<String>,
        /// Write the executable listing here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
        /// Offset jump targets by each unit's position in the merged stream
        #[arg(long)]
        rebase_jumps: bool,
        /// Merge function constant pools instead of reusing the unit's main pool
        #[arg(long)]
        merge_function_constants: bool,
    },
    /// Print the token stream (debug)
    #[command(hide = true)]
    Tokens {
        /// The file to tokenize
        file: String,
    },
    /// Print the parsed AST (debug)
    #[command(hide = true)]
    Ast {
        /// The file to parse
        file: String,
    },
}

fn main() {
    utils::init_logging();
    let cli = Cli::parse();
    let settings = cli.settings;

    match cli.command {
        Some(Commands::Run { file }) => {
            handle_run(&file, settings);
        }
        Some(Commands::Repl) => {
            handle_repl(settings);
        }
        Some(Commands::Compile {
            file,
            output,
            unit,
            exports,
            imports,
            report,
        }) => {
            let options = CompileOptions {
                output,
                unit,
                exports,
                imports,
                report,
            };
            handle_compile(&file, &options, settings);
        }
        Some(Commands::Link {
            inputs,
            output,
            rebase_jumps,
            merge_function_constants,
        }) => {
            let options = LinkOptions {
                rebase_jumps,
                merge_function_constants,
            };
            handle_link(&inputs, output.as_deref(), options);
        }
        Some(Commands::Tokens { file }) => {
            handle_tokens(&file, settings);
        }
        Some(Commands::Ast { file }) => {
            handle_ast(&file, settings);
        }
        None => {
            // Default: run the file if provided, otherwise print help
            let Some(file) = cli.file else {
                let _ = Cli::command().print_help();
                println!();
                std::process::exit(0);
            };
            handle_run(&file, settings);
        }
    }
}
