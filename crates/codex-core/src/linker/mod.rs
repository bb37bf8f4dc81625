//! Linker: merges independently compiled [`BytecodeUnit`]s into one
//! [`LinkedProgram`].
//!
//! Linking runs in a fixed order. Exports go into a global symbol table as
//! units are added, imports are resolved against it, then constant pools are
//! merged unit by unit (deduplicated by value) while instructions and
//! function bodies are appended with their `LOAD_CONST` operands remapped.
//!
//! Jump operands are absolute indices into the unit that produced them and
//! are copied unchanged unless [`LinkOptions::rebase_jumps`] is set.

mod errors;

pub use errors::LinkError;

use crate::bytecode::{BytecodeUnit, Constant, FunctionTable, Instruction, LinkedProgram};
use std::collections::{HashMap, HashSet};

pub type LinkResult<T> = Result<T, LinkError>;

/// Name reported for a unit's top-level code in link errors
pub const MAIN_STREAM: &str = "<main>";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Add each unit's base offset to its jump targets
    pub rebase_jumps: bool,
    /// Remap function constants through the function's own pool instead of
    /// the unit's main pool
    pub merge_function_constants: bool,
}

#[derive(Debug, Default)]
pub struct Linker {
    units: Vec<BytecodeUnit>,
    /// exported symbol -> name of the exporting unit
    symbols: HashMap<String, String>,
    options: LinkOptions,
}

impl Linker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: LinkOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a unit and its exports. Nothing is recorded if one of the
    /// exports is already taken.
    pub fn add_unit(&mut self, unit: BytecodeUnit) -> LinkResult<()> {
        let mut seen = HashSet::new();
        for symbol in &unit.exports {
            if let Some(first) = self.symbols.get(symbol) {
                return Err(LinkError::DuplicateSymbol {
                    symbol: symbol.clone(),
                    first: first.clone(),
                    second: unit.name.clone(),
                });
            }
            if !seen.insert(symbol.as_str()) {
                return Err(LinkError::DuplicateSymbol {
                    symbol: symbol.clone(),
                    first: unit.name.clone(),
                    second: unit.name.clone(),
                });
            }
        }
        for symbol in &unit.exports {
            self.symbols.insert(symbol.clone(), unit.name.clone());
        }
        self.units.push(unit);
        Ok(())
    }

    pub fn units(&self) -> &[BytecodeUnit] {
        &self.units
    }

    /// Check that every import names an exported symbol
    pub fn resolve_imports(&self) -> LinkResult<()> {
        for unit in &self.units {
            for symbol in &unit.imports {
                if !self.symbols.contains_key(symbol) {
                    return Err(LinkError::UndefinedSymbol {
                        symbol: symbol.clone(),
                        unit: unit.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn link(self) -> LinkResult<LinkedProgram> {
        self.resolve_imports()?;

        let mut pool = ConstantPool::default();
        let mut instructions = Vec::new();
        let mut functions = FunctionTable::new();

        for (position, unit) in self.units.iter().enumerate() {
            let remap = pool.merge(&unit.constants);
            let base = instructions.len();

            let has_jumps = unit.instructions.iter().any(Instruction::is_jump);
            if position > 0 && has_jumps && !self.options.rebase_jumps {
                log::warn!(
                    "unit '{}' is linked at offset {} but its jump targets are not rebased",
                    unit.name,
                    base
                );
            }

            let main = Relocation {
                unit: &unit.name,
                function: MAIN_STREAM,
                remap: &remap,
                offset: if self.options.rebase_jumps { base } else { 0 },
            };
            for instr in &unit.instructions {
                instructions.push(main.apply(instr)?);
            }

            for (name, function) in unit.functions.iter() {
                if functions.contains(name) {
                    return Err(LinkError::DuplicateFunction {
                        name: name.to_string(),
                    });
                }
                let function_remap;
                let remap = if self.options.merge_function_constants {
                    function_remap = pool.merge(&function.constants);
                    &function_remap
                } else {
                    &remap
                };
                let relocation = Relocation {
                    unit: &unit.name,
                    function: name,
                    remap,
                    offset: 0,
                };
                let body = function
                    .instructions
                    .iter()
                    .map(|instr| relocation.apply(instr))
                    .collect::<LinkResult<Vec<_>>>()?;
                functions.insert(name, body);
            }

            log::debug!(
                "linked unit '{}' at offset {} ({} instructions, {} functions)",
                unit.name,
                base,
                unit.instructions.len(),
                unit.functions.len()
            );
        }

        Ok(LinkedProgram {
            constants: pool.constants,
            instructions,
            functions,
            entry_point: 0,
        })
    }
}

/// Link `units` in order with default options
pub fn link(units: impl IntoIterator<Item = BytecodeUnit>) -> LinkResult<LinkedProgram> {
    link_with(units, LinkOptions::default())
}

pub fn link_with(
    units: impl IntoIterator<Item = BytecodeUnit>,
    options: LinkOptions,
) -> LinkResult<LinkedProgram> {
    let mut linker = Linker::new().with_options(options);
    for unit in units {
        linker.add_unit(unit)?;
    }
    linker.link()
}

#[derive(Default)]
struct ConstantPool {
    constants: Vec<Constant>,
}

impl ConstantPool {
    /// Add `constants`, returning the old index -> new index mapping
    fn merge(&mut self, constants: &[Constant]) -> Vec<usize> {
        constants
            .iter()
            .map(|c| match self.constants.iter().position(|e| e == c) {
                Some(idx) => idx,
                None => {
                    self.constants.push(c.clone());
                    self.constants.len() - 1
                }
            })
            .collect()
    }
}

/// Moves one instruction stream into the linked program
struct Relocation<'a> {
    unit: &'a str,
    function: &'a str,
    /// old constant index -> merged pool index
    remap: &'a [usize],
    /// added to jump targets
    offset: usize,
}

impl Relocation<'_> {
    fn apply(&self, instr: &Instruction) -> LinkResult<Instruction> {
        Ok(match instr {
            Instruction::LoadConst(idx) => Instruction::LoadConst(self.constant(*idx)?),
            Instruction::Jump(target) => Instruction::Jump(self.jump(*target)?),
            Instruction::JumpIfFalse(target) => Instruction::JumpIfFalse(self.jump(*target)?),
            other => other.clone(),
        })
    }

    fn constant(&self, index: usize) -> LinkResult<usize> {
        self.remap
            .get(index)
            .copied()
            .ok_or_else(|| LinkError::ConstantOutOfRange {
                unit: self.unit.to_string(),
                function: self.function.to_string(),
                index,
            })
    }

    fn jump(&self, target: usize) -> LinkResult<usize> {
        target
            .checked_add(self.offset)
            .ok_or_else(|| LinkError::JumpOutOfRange {
                unit: self.unit.to_string(),
                function: self.function.to_string(),
                target,
                offset: self.offset,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{CompiledFunction, compile_unit};
    use crate::parser::{self, LexMode, lexer};

    fn unit(name: &str, source: &str) -> BytecodeUnit {
        let tokens = lexer::tokenize(source, LexMode::Lenient).unwrap();
        compile_unit(&parser::parse(tokens).unwrap(), name)
    }

    #[test]
    fn test_single_unit_links_to_itself() {
        let u = unit("main", "let x = 1\nlet y = \"a\"\nprint(x)");
        let linked = link([u.clone()]).unwrap();
        assert_eq!(linked.instructions, u.instructions);
        assert_eq!(linked.constants, u.constants);
        assert_eq!(linked.entry_point, 0);
    }

    #[test]
    fn test_duplicate_export() {
        let a = unit("a", "print(1)").with_exports(["main"]);
        let b = unit("b", "print(2)").with_exports(["main"]);
        assert_eq!(
            link([a, b]).unwrap_err(),
            LinkError::DuplicateSymbol {
                symbol: "main".into(),
                first: "a".into(),
                second: "b".into()
            }
        );
    }

    #[test]
    fn test_failed_add_leaves_symbols_untouched() {
        let mut linker = Linker::new();
        linker
            .add_unit(unit("a", "").with_exports(["f"]))
            .unwrap();
        let err = linker.add_unit(unit("b", "").with_exports(["g", "f"]));
        assert!(err.is_err());
        assert_eq!(linker.units().len(), 1);
        linker
            .add_unit(unit("c", "").with_exports(["g"]))
            .unwrap();
    }

    #[test]
    fn test_undefined_import() {
        let a = unit("a", "print(1)").with_imports(["helper"]);
        assert_eq!(
            link([a]).unwrap_err(),
            LinkError::UndefinedSymbol {
                symbol: "helper".into(),
                unit: "a".into()
            }
        );
    }

    #[test]
    fn test_imports_resolve_across_units() {
        let a = unit("a", "print(helper())").with_imports(["helper"]);
        let b = unit("b", "let one = 1\nfunc helper() { return 1 }").with_exports(["helper"]);
        let linked = link([a, b]).unwrap();
        assert!(linked.functions.contains("helper"));
    }

    #[test]
    fn test_duplicate_function() {
        let a = unit("a", "func f() { return }");
        let b = unit("b", "func f() { return }");
        let options = LinkOptions {
            merge_function_constants: true,
            ..Default::default()
        };
        assert_eq!(
            link_with([a, b], options).unwrap_err(),
            LinkError::DuplicateFunction { name: "f".into() }
        );
    }

    #[test]
    fn test_constants_are_merged_and_remapped() {
        let a = unit("a", "print(\"x\")\nprint(2)");
        let b = unit("b", "print(2)\nprint(3)");
        let linked = link([a, b]).unwrap();
        assert_eq!(
            linked.constants,
            vec![
                Constant::String("x".into()),
                Constant::Number(2.0),
                Constant::Number(3.0)
            ]
        );
        assert_eq!(
            &linked.instructions[4..],
            &[
                Instruction::LoadConst(1),
                Instruction::Print,
                Instruction::LoadConst(2),
                Instruction::Print
            ]
        );
    }

    #[test]
    fn test_jumps_are_not_rebased_by_default() {
        let a = unit("a", "print(1)");
        let b = unit("b", "if (x) { print(x) }");
        let linked = link([a, b]).unwrap();
        assert_eq!(linked.instructions[3], Instruction::JumpIfFalse(5));
        assert_eq!(linked.instructions[6], Instruction::Jump(5));
    }

    #[test]
    fn test_rebase_jumps_option() {
        let a = unit("a", "print(1)");
        let b = unit("b", "if (x) { print(x) }");
        let options = LinkOptions {
            rebase_jumps: true,
            ..Default::default()
        };
        let linked = link_with([a, b], options).unwrap();
        assert_eq!(linked.instructions[3], Instruction::JumpIfFalse(7));
        assert_eq!(linked.instructions[6], Instruction::Jump(7));
    }

    #[test]
    fn test_function_constants_use_the_unit_remap() {
        // "f" loads its own constant 0, which is the unit's constant 0 ("x")
        let a = unit("a", "print(\"x\")\nfunc f() { return 7 }");
        let linked = link([a]).unwrap();
        assert_eq!(
            linked.functions.get("f").unwrap(),
            &vec![Instruction::LoadConst(0), Instruction::Return]
        );
    }

    #[test]
    fn test_function_constant_outside_unit_pool() {
        let a = unit("a", "func f() { return 7 }");
        assert_eq!(
            link([a]).unwrap_err(),
            LinkError::ConstantOutOfRange {
                unit: "a".into(),
                function: "f".into(),
                index: 0
            }
        );
    }

    #[test]
    fn test_merge_function_constants_option() {
        let a = unit("a", "print(\"x\")\nfunc f() { return 7 }");
        let options = LinkOptions {
            merge_function_constants: true,
            ..Default::default()
        };
        let linked = link_with([a], options).unwrap();
        assert_eq!(
            linked.constants,
            vec![Constant::String("x".into()), Constant::Number(7.0)]
        );
        assert_eq!(
            linked.functions.get("f").unwrap(),
            &vec![Instruction::LoadConst(1), Instruction::Return]
        );
    }

    #[test]
    fn test_exporting_twice_from_one_unit() {
        let a = unit("a", "").with_exports(["f", "f"]);
        assert!(matches!(
            link([a]),
            Err(LinkError::DuplicateSymbol { .. })
        ));
    }

    #[test]
    fn test_corrupt_main_stream_constant() {
        let mut a = unit("a", "print(1)");
        a.instructions.push(Instruction::LoadConst(9));
        assert_eq!(
            link([a]).unwrap_err(),
            LinkError::ConstantOutOfRange {
                unit: "a".into(),
                function: MAIN_STREAM.into(),
                index: 9
            }
        );
    }

    #[test]
    fn test_rebased_jump_overflow_is_an_error() {
        let a = unit("a", "print(1)");
        let mut b = unit("b", "print(2)");
        b.instructions.push(Instruction::Jump(usize::MAX));
        let options = LinkOptions {
            rebase_jumps: true,
            ..Default::default()
        };
        assert_eq!(
            link_with([a, b], options).unwrap_err(),
            LinkError::JumpOutOfRange {
                unit: "b".into(),
                function: MAIN_STREAM.into(),
                target: usize::MAX,
                offset: 2
            }
        );
    }

    #[test]
    fn test_executable_listing() {
        let mut u = unit("main", "print(1)");
        u.functions.insert(
            "g",
            CompiledFunction {
                instructions: vec![Instruction::LoadConst(0), Instruction::Return],
                constants: vec![Constant::Number(1.0)],
            },
        );
        let text = link([u]).unwrap().to_executable();
        assert_eq!(
            text,
            "# Codex Executable\n\nCONSTANTS:\n  0: 1.0\n\nCODE:\n     0: LOAD_CONST 0\n     1: PRINT\n\nFUNCTIONS:\n  g:\n       0: LOAD_CONST 0\n       1: RETURN\n\nENTRY_POINT: 0"
        );
    }
}
