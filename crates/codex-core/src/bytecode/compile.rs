//! Bytecode compiler for Codex.
//!
//! Lowers a [`Program`] into a [`BytecodeUnit`] for a stack machine.
//! Expressions are emitted post-order, operands before their operator.
//! Expression statements leave their value on the stack.
//!
//! Control flow is backpatched: a jump goes out with a placeholder target,
//! the body it skips is emitted, then the placeholder is overwritten with the
//! now-known absolute index.
//!
//! Every function definition is compiled by a fresh [`Compiler`], so each
//! function owns a separately numbered constant pool. Definitions nested in a
//! function body are hoisted into the unit's function table.

use super::ir::{BytecodeUnit, CompiledFunction, Constant, FunctionTable, Instruction};
use crate::ast::{BinaryOp, FunctionDef, Node, Program, UnaryOp};

pub fn compile_program(program: &Program) -> BytecodeUnit {
    compile_unit(program, "<program>")
}

/// Compile `program` into a unit called `name`, with empty export/import lists
pub fn compile_unit(program: &Program, name: &str) -> BytecodeUnit {
    let mut c = Compiler::new();
    for stmt in &program.statements {
        c.emit_node(stmt);
    }
    log::debug!(
        "compiled unit '{}': {} instructions, {} constants, {} functions",
        name,
        c.instructions.len(),
        c.constants.len(),
        c.functions.len()
    );
    BytecodeUnit {
        name: name.to_string(),
        instructions: c.instructions,
        constants: c.constants,
        functions: c.functions,
        exports: Vec::new(),
        imports: Vec::new(),
    }
}

pub(super) struct Compiler {
    pub(super) instructions: Vec<Instruction>,
    pub(super) constants: Vec<Constant>,
    functions: FunctionTable<CompiledFunction>,
}

impl Compiler {
    fn new() -> Self {
        Compiler {
            instructions: Vec::new(),
            constants: Vec::new(),
            functions: FunctionTable::new(),
        }
    }

    fn emit_block(&mut self, body: &[Node]) {
        for stmt in body {
            self.emit_node(stmt);
        }
    }

    fn emit_node(&mut self, node: &Node) {
        match node {
            Node::Number(n) => self.emit_constant(Constant::Number(*n)),
            Node::String(s) => self.emit_constant(Constant::String(s.clone())),
            Node::Identifier(name) => self.emit(Instruction::LoadVar(name.clone())),
            Node::BinaryOp { left, op, right } => {
                self.emit_node(left);
                self.emit_node(right);
                self.emit(binary_instruction(*op));
            }
            Node::UnaryOp { op, operand } => {
                self.emit_node(operand);
                self.emit(match op {
                    UnaryOp::Plus => Instruction::UnaryPlus,
                    UnaryOp::Minus => Instruction::UnaryMinus,
                });
            }
            Node::Assignment { name, value } => {
                self.emit_node(value);
                self.emit(Instruction::StoreVar(name.clone()));
            }
            Node::Call { name, arguments } => {
                for arg in arguments {
                    self.emit_node(arg);
                }
                self.emit(Instruction::CallFunc {
                    name: name.clone(),
                    arity: arguments.len(),
                });
            }
            Node::FunctionDef(def) => self.emit_function(def),
            Node::If {
                condition,
                then_body,
                else_body,
            } => {
                self.emit_node(condition);
                let jf_else = self.emit_jump_if_false();
                self.emit_block(then_body);
                // Emitted even without an else branch
                let j_end = self.emit_jump();
                let else_start = self.current_ip();
                self.patch_jump(jf_else, else_start);
                if let Some(else_body) = else_body {
                    self.emit_block(else_body);
                }
                let end = self.current_ip();
                self.patch_jump(j_end, end);
            }
            Node::While { condition, body } => {
                let loop_start = self.current_ip();
                self.emit_node(condition);
                let jf_end = self.emit_jump_if_false();
                self.emit_block(body);
                self.emit(Instruction::Jump(loop_start));
                let end = self.current_ip();
                self.patch_jump(jf_end, end);
            }
            Node::Return(value) => {
                match value {
                    Some(expr) => self.emit_node(expr),
                    None => self.emit_constant(Constant::None),
                }
                self.emit(Instruction::Return);
            }
            Node::Print(value) => {
                self.emit_node(value);
                self.emit(Instruction::Print);
            }
        }
    }

    /// Compile `def` with its own compiler; nothing goes into the current stream
    fn emit_function(&mut self, def: &FunctionDef) {
        let mut fc = Compiler::new();
        fc.emit_block(&def.body);
        self.functions.insert(
            def.name.clone(),
            CompiledFunction {
                instructions: fc.instructions,
                constants: fc.constants,
            },
        );
        for (name, nested) in fc.functions {
            log::debug!("hoisting nested function '{}' out of '{}'", name, def.name);
            self.functions.insert(name, nested);
        }
    }
}

fn binary_instruction(op: BinaryOp) -> Instruction {
    match op {
        BinaryOp::Add => Instruction::BinaryAdd,
        BinaryOp::Sub => Instruction::BinarySub,
        BinaryOp::Mul => Instruction::BinaryMul,
        BinaryOp::Div => Instruction::BinaryDiv,
        BinaryOp::Eq => Instruction::BinaryEq,
        BinaryOp::NotEq => Instruction::BinaryNeq,
        BinaryOp::Less => Instruction::BinaryLt,
        BinaryOp::Greater => Instruction::BinaryGt,
    }
}
