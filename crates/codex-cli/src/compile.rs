//! `compile` subcommand handler

use crate::Settings;
use crate::utils::{exit_with_error, read_source_or_exit, write_output};
use codex_core::pipeline::{CompileReport, Pipeline};
use std::process;

#[derive(Debug, Default)]
pub struct CompileOptions {
    pub output: Option<String>,
    pub unit: Option<String>,
    pub exports: Vec<String>,
    pub imports: Vec<String>,
    pub report: Option<String>,
}

/// Compile a Codex script to object code
pub fn handle_compile(file: &str, options: &CompileOptions, settings: Settings) {
    let source = read_source_or_exit(file);
    let pipeline = Pipeline::new(source, file).with_lex_mode(settings.lex_mode());

    let unit = match pipeline.compile_all() {
        Ok(unit) => unit
            .with_exports(options.exports.iter().cloned())
            .with_imports(options.imports.iter().cloned()),
        Err(e) => {
            if let Some(path) = &options.report {
                write_report(path, &CompileReport::failure(pipeline.source(), &e));
            }
            exit_with_error(&e, pipeline.source(), file);
        }
    };

    let object_code = unit.to_object_code();

    if let Some(path) = &options.unit {
        match unit.to_ron() {
            Ok(serialized) => write_output(path, &serialized),
            Err(e) => {
                eprintln!("Error serializing unit: {e}");
                process::exit(1);
            }
        }
        println!("Unit written to {path}");
    }

    if let Some(path) = &options.report {
        write_report(path, &CompileReport::success(pipeline.source(), object_code.as_str()));
    }

    match &options.output {
        Some(path) => {
            write_output(path, &object_code);
            println!("Object code written to {path}");
        }
        None => println!("{object_code}"),
    }
}

fn write_report(path: &str, report: &CompileReport) {
    match report.to_json() {
        Ok(json) => write_output(path, &json),
        Err(e) => {
            eprintln!("Error serializing report: {e}");
            process::exit(1);
        }
    }
}
