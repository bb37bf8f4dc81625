use super::compile::Compiler;
use super::ir::{Constant, Instruction};

impl Compiler {
    /// Index of `c` in the pool, appending it if no equal constant exists
    pub(super) fn add_constant(&mut self, c: Constant) -> usize {
        match self.constants.iter().position(|existing| *existing == c) {
            Some(idx) => idx,
            None => {
                self.constants.push(c);
                self.constants.len() - 1
            }
        }
    }

    pub(super) fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub(super) fn emit_constant(&mut self, c: Constant) {
        let idx = self.add_constant(c);
        self.emit(Instruction::LoadConst(idx));
    }

    /// Jumps are emitted with a placeholder target and patched later
    pub(super) fn emit_jump_if_false(&mut self) -> usize {
        let pos = self.current_ip();
        self.emit(Instruction::JumpIfFalse(usize::MAX));
        pos
    }

    pub(super) fn emit_jump(&mut self) -> usize {
        let pos = self.current_ip();
        self.emit(Instruction::Jump(usize::MAX));
        pos
    }

    pub(super) fn patch_jump(&mut self, at: usize, target: usize) {
        match self.instructions.get_mut(at) {
            Some(Instruction::JumpIfFalse(addr) | Instruction::Jump(addr)) => *addr = target,
            other => unreachable!("patch_jump at {at} does not point at a jump: {other:?}"),
        }
    }

    pub(super) fn current_ip(&self) -> usize {
        self.instructions.len()
    }
}
