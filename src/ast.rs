//! Tree form of a program.
//!
//! Pointer moves never appear as nodes. Every location inside a unit is an
//! offset from the tape pointer at the moment the unit starts a pass over its
//! body, and the unit records the displacement still owed after that pass in
//! `ptr_change`.

use std::fmt;

/// A tape offset relative to the enclosing unit's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location(i32);

impl Location {
    pub const ORIGIN: Location = Location(0);

    pub const fn new(offset: i32) -> Self {
        Location(offset)
    }

    pub const fn offset(self) -> i32 {
        self.0
    }

    pub const fn shifted(self, by: i32) -> Self {
        Location(self.0 + by)
    }

    /// Absolute distance between this location and a cursor offset.
    pub const fn distance(self, cursor: i32) -> u32 {
        self.0.abs_diff(cursor)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Block,
    /// Runs the body once when `src` is nonzero.
    IfTrue,
    /// Runs the body while `src` is nonzero.
    Roop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub kind: UnitKind,
    /// Cell tested by `IfTrue` and `Roop`. Unused by `Block`.
    pub src: Location,
    pub body: Vec<Node>,
    pub ptr_change: i32,
}

impl Unit {
    pub fn block(body: Vec<Node>, ptr_change: i32) -> Self {
        Unit {
            kind: UnitKind::Block,
            src: Location::ORIGIN,
            body,
            ptr_change,
        }
    }

    pub fn if_true(src: Location, body: Vec<Node>) -> Self {
        Unit {
            kind: UnitKind::IfTrue,
            src,
            body,
            ptr_change: 0,
        }
    }

    pub fn roop(src: Location, body: Vec<Node>, ptr_change: i32) -> Self {
        Unit {
            kind: UnitKind::Roop,
            src,
            body,
            ptr_change,
        }
    }

    pub fn is_control(&self) -> bool {
        matches!(self.kind, UnitKind::IfTrue | UnitKind::Roop)
    }

    /// Re-express the test cell and the whole body `by` cells over.
    pub fn shifted(self, by: i32) -> Unit {
        if by == 0 {
            return self;
        }
        Unit {
            src: if self.is_control() {
                self.src.shifted(by)
            } else {
                self.src
            },
            body: self.body.into_iter().map(|n| n.shifted(by)).collect(),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `tape[dest] = value`
    Assign { dest: Location, value: i64 },
    /// `tape[dest] += delta`
    AddAssign { dest: Location, delta: i64 },
    /// `tape[dest] += tape[src] * factor`
    MultAddAssign {
        dest: Location,
        src: Location,
        factor: i64,
    },
    Put { src: Location },
    Read { dest: Location },
    Unit(Unit),
}

impl Node {
    /// The cell this node writes, if it is a plain write.
    pub fn dest(&self) -> Option<Location> {
        match self {
            Node::Assign { dest, .. }
            | Node::AddAssign { dest, .. }
            | Node::MultAddAssign { dest, .. }
            | Node::Read { dest } => Some(*dest),
            Node::Put { .. } | Node::Unit(_) => None,
        }
    }

    /// The cell this node reads, if it is a plain read.
    pub fn src(&self) -> Option<Location> {
        match self {
            Node::Put { src } | Node::MultAddAssign { src, .. } => Some(*src),
            _ => None,
        }
    }

    /// Every cell a non-unit node touches.
    pub fn accessed(&self) -> impl Iterator<Item = Location> {
        self.dest().into_iter().chain(self.src())
    }

    /// The cell a pointer move should land on before this node runs.
    pub fn anchor(&self) -> Option<Location> {
        match self {
            Node::Unit(unit) if unit.is_control() => Some(unit.src),
            Node::Unit(_) => None,
            Node::MultAddAssign { src, .. } => Some(*src),
            other => other.dest().or(other.src()),
        }
    }

    /// Writes that leave the tape unchanged.
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            Node::AddAssign { delta: 0, .. } | Node::MultAddAssign { factor: 0, .. }
        )
    }

    /// Re-express this node (and any nested body) in a frame whose origin
    /// sits `-by` cells away.
    pub fn shifted(self, by: i32) -> Node {
        match self {
            Node::Assign { dest, value } => Node::Assign {
                dest: dest.shifted(by),
                value,
            },
            Node::AddAssign { dest, delta } => Node::AddAssign {
                dest: dest.shifted(by),
                delta,
            },
            Node::MultAddAssign { dest, src, factor } => Node::MultAddAssign {
                dest: dest.shifted(by),
                src: src.shifted(by),
                factor,
            },
            Node::Put { src } => Node::Put {
                src: src.shifted(by),
            },
            Node::Read { dest } => Node::Read {
                dest: dest.shifted(by),
            },
            Node::Unit(unit) => Node::Unit(unit.shifted(by)),
        }
    }

    /// Number of nodes in this subtree, itself included.
    pub fn size(&self) -> usize {
        match self {
            Node::Unit(unit) => 1 + unit.body.iter().map(Node::size).sum::<usize>(),
            _ => 1,
        }
    }
}

impl From<Unit> for Node {
    fn from(unit: Unit) -> Self {
        Node::Unit(unit)
    }
}
