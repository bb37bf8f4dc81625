//! `repl` subcommand handler

use crate::Settings;
use codex_core::interpreter::{Interpreter, Value};
use codex_core::parser::{self, LexMode, lexer};
use codex_core::pipeline::PipelineError;
use std::io::{self, BufRead, Write};

pub const HELP: &str = "\
Codex language syntax:
  let x = 10              # variable declaration
  let name = \"text\"       # string variable
  print(x)                # print statement

  func add(a, b) {        # function definition
      return a + b
  }

  if (x > 5) { ... } else { ... }
  while (x < 10) { ... }
";

/// What the REPL should do with one line of input
#[derive(Debug, PartialEq)]
pub enum Command {
    Skip,
    Exit,
    Help,
    Eval(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "" => Command::Skip,
            "exit" | "quit" => Command::Exit,
            "help" => Command::Help,
            _ => Command::Eval(line.to_string()),
        }
    }
}

/// Line-at-a-time evaluator. Globals survive between lines.
pub struct Repl<W: Write> {
    interpreter: Interpreter<W>,
    lex_mode: LexMode,
}

impl<W: Write> Repl<W> {
    pub fn new(out: W, settings: Settings) -> Self {
        Repl {
            interpreter: Interpreter::with_output(out).with_config(settings.interpreter_config()),
            lex_mode: settings.lex_mode(),
        }
    }

    pub fn eval(&mut self, line: &str) -> Result<Value, PipelineError> {
        let tokens = lexer::tokenize(line, self.lex_mode)?;
        let program = parser::parse(tokens)?;
        Ok(self.interpreter.interpret(&program)?)
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        self.interpreter.output()
    }
}

/// Run the interactive REPL session
pub fn handle_repl(settings: Settings) {
    println!("Codex REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or 'quit' to exit, 'help' for language syntax.");
    println!();

    let mut repl = Repl::new(io::stdout(), settings);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!(">>> ");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
            None => {
                // EOF reached
                println!();
                break;
            }
        };

        match Command::parse(&line) {
            Command::Skip => {}
            Command::Exit => {
                println!("Goodbye!");
                break;
            }
            Command::Help => println!("{HELP}"),
            Command::Eval(input) => match repl.eval(&input) {
                Ok(Value::None) => {}
                Ok(value) => println!("{value}"),
                Err(e) => eprintln!("{}", e.format_with_source(&input, "<repl>")),
            },
        }
    }
}
