//! Flat instruction form handed to execution backends.

use std::fmt;

use crate::ast::{Location, Node, Unit, UnitKind};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Opcode {
    AddPtr,
    Assign,
    AddAssign,
    MultAddAssign,
    Put,
    Read,
    /// Jump to `value` when `tape[src]` is nonzero.
    BrTrue,
    /// Jump to `value` when `tape[src]` is zero.
    BrFalse,
}

/// One fixed-shape instruction. Offsets are relative to the tape pointer;
/// branch targets in `value` are absolute instruction indices.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Inst {
    pub op: Opcode,
    pub dest: i32,
    pub src: i32,
    pub value: i64,
}

impl Inst {
    pub const fn new(op: Opcode, dest: i32, src: i32, value: i64) -> Self {
        Inst {
            op,
            dest,
            src,
            value,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.op, Opcode::BrTrue | Opcode::BrFalse)
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Inst {
            op,
            dest,
            src,
            value,
        } = *self;
        match op {
            Opcode::AddPtr => write!(f, "addptr  {value:+}"),
            Opcode::Assign => write!(f, "assign  [{dest:+}] = {value}"),
            Opcode::AddAssign => write!(f, "add     [{dest:+}] += {value}"),
            Opcode::MultAddAssign => write!(f, "muladd  [{dest:+}] += [{src:+}] * {value}"),
            Opcode::Put => write!(f, "put     [{src:+}]"),
            Opcode::Read => write!(f, "read    [{dest:+}]"),
            Opcode::BrTrue => write!(f, "brtrue  [{src:+}] -> {value}"),
            Opcode::BrFalse => write!(f, "brfalse [{src:+}] -> {value}"),
        }
    }
}

/// Numbered listing of a program, one instruction per line.
pub fn listing(program: &[Inst]) -> String {
    let width = program.len().max(1).to_string().len();
    program
        .iter()
        .enumerate()
        .map(|(idx, inst)| format!("{idx:>width$}  {inst}\n"))
        .collect()
}

/// Flatten a tree into instructions with resolved branch targets.
#[tracing::instrument(level = "debug", skip_all)]
pub fn lower(root: &Node) -> Vec<Inst> {
    let mut lowerer = Lowerer { code: Vec::new() };
    lowerer.node(root);
    tracing::debug!(instructions = lowerer.code.len(), "lowered");
    lowerer.code
}

/// Register allocation hook.
///
/// Instructions address cells through tape offsets only, so there is nothing
/// to allocate yet; the program is returned unchanged.
pub fn allocate_registers(program: Vec<Inst>) -> Vec<Inst> {
    program
}

struct Lowerer {
    code: Vec<Inst>,
}

impl Lowerer {
    fn push(&mut self, op: Opcode, dest: Location, src: Location, value: i64) {
        self.code
            .push(Inst::new(op, dest.offset(), src.offset(), value));
    }

    fn node(&mut self, node: &Node) {
        let origin = Location::ORIGIN;
        match node {
            Node::Assign { dest, value } => self.push(Opcode::Assign, *dest, origin, *value),
            Node::AddAssign { dest, delta } => self.push(Opcode::AddAssign, *dest, origin, *delta),
            Node::MultAddAssign { dest, src, factor } => {
                self.push(Opcode::MultAddAssign, *dest, *src, *factor)
            }
            Node::Put { src } => self.push(Opcode::Put, origin, *src, 0),
            Node::Read { dest } => self.push(Opcode::Read, *dest, origin, 0),
            Node::Unit(unit) => self.unit(unit),
        }
    }

    fn body(&mut self, unit: &Unit) {
        for child in &unit.body {
            self.node(child);
        }
        if unit.ptr_change != 0 {
            self.push(
                Opcode::AddPtr,
                Location::ORIGIN,
                Location::ORIGIN,
                unit.ptr_change as i64,
            );
        }
    }

    fn placeholder(&mut self) -> usize {
        self.code.push(Inst::new(Opcode::BrFalse, 0, 0, -1));
        self.code.len() - 1
    }

    fn patch(&mut self, at: usize, src: Location) {
        self.code[at] = Inst::new(Opcode::BrFalse, 0, src.offset(), self.code.len() as i64);
    }

    fn unit(&mut self, unit: &Unit) {
        match unit.kind {
            UnitKind::Block => self.body(unit),
            UnitKind::IfTrue => {
                let at = self.placeholder();
                self.body(unit);
                self.patch(at, unit.src);
            }
            UnitKind::Roop => {
                let at = self.placeholder();
                self.body(unit);
                self.push(
                    Opcode::BrTrue,
                    Location::ORIGIN,
                    unit.src,
                    (at + 1) as i64,
                );
                self.patch(at, unit.src);
            }
        }
    }
}
