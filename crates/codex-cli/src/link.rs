//! `link` subcommand handler

use crate::utils::write_output;
use codex_core::bytecode::BytecodeUnit;
use codex_core::linker::{LinkOptions, Linker};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use walkdir::WalkDir;

/// File extension of serialized units
pub const UNIT_EXTENSION: &str = "cdxo";

/// Link serialized units into one executable listing
pub fn handle_link(inputs: &[String], output: Option<&str>, options: LinkOptions) {
    let paths = match collect_unit_paths(inputs) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error collecting units: {e}");
            process::exit(1);
        }
    };
    if paths.is_empty() {
        eprintln!("Error: no .{UNIT_EXTENSION} units found");
        process::exit(1);
    }

    let mut linker = Linker::new().with_options(options);
    for path in &paths {
        let unit = match load_unit(path) {
            Ok(unit) => unit,
            Err(e) => {
                eprintln!("Error loading '{}': {e}", path.display());
                process::exit(1);
            }
        };
        log::info!("adding unit '{}' from {}", unit.name, path.display());
        if let Err(e) = linker.add_unit(unit) {
            eprintln!("{e}");
            process::exit(1);
        }
    }

    let program = match linker.link() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let executable = program.to_executable();
    match output {
        Some(path) => {
            write_output(path, &executable);
            println!("Executable written to {path}");
        }
        None => println!("{executable}"),
    }
}

/// Expand directories into their unit files, sorted by path. Plain files are
/// kept in the order given.
pub fn collect_unit_paths(inputs: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        let path = Path::new(input);
        if !path.is_dir() {
            paths.push(path.to_path_buf());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry.map_err(io::Error::other)?;
            let is_unit = entry.path().extension().is_some_and(|ext| ext == UNIT_EXTENSION);
            if entry.file_type().is_file() && is_unit {
                found.push(entry.into_path());
            }
        }
        found.sort();
        paths.extend(found);
    }
    Ok(paths)
}

fn load_unit(path: &Path) -> Result<BytecodeUnit, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(BytecodeUnit::from_ron(&text)?)
}
