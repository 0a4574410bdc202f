use std::mem;

use crate::ast::{Node, Unit};

/// Accesses within this many cells of the pointer do not move it.
pub const NEAR: u32 = 2;

/// Cluster nearby accesses so each cluster costs a single pointer move.
///
/// Existing `Block`s are flattened into the walk, which makes the pass a
/// fixed point on its own output.
pub fn rebase(node: Node) -> Node {
    match node {
        Node::Unit(unit) => Node::Unit(rebase_unit(unit)),
        other => other,
    }
}

fn rebase_unit(unit: Unit) -> Unit {
    let mut walk = Rebaser::default();
    walk.visit(unit.body);
    let (body, cursor) = walk.finish();
    Unit {
        body,
        ptr_change: unit.ptr_change - cursor,
        ..unit
    }
}

#[derive(Default)]
struct Rebaser {
    /// How far the emitted code has moved the pointer past the input frame.
    cursor: i32,
    pending: Vec<Node>,
    emitted: Vec<Node>,
}

impl Rebaser {
    fn visit(&mut self, body: Vec<Node>) {
        for node in body {
            match node {
                Node::Unit(unit) if !unit.is_control() => {
                    self.visit(unit.body);
                    self.cursor -= unit.ptr_change;
                }
                Node::Unit(unit) => {
                    self.move_to(unit.src.offset());
                    let unit = rebase_unit(unit.shifted(-self.cursor));
                    self.pending.push(Node::Unit(unit));
                }
                op => {
                    let near = op.accessed().any(|loc| loc.distance(self.cursor) <= NEAR);
                    if !near {
                        if let Some(anchor) = op.anchor() {
                            self.move_to(anchor.offset());
                        }
                    }
                    self.pending.push(op.shifted(-self.cursor));
                }
            }
        }
    }

    fn move_to(&mut self, target: i32) {
        let step = target - self.cursor;
        let ops = mem::take(&mut self.pending);
        if step == 0 {
            self.emitted.extend(ops);
        } else {
            self.emitted.push(Node::Unit(Unit::block(ops, step)));
        }
        self.cursor = target;
    }

    fn finish(mut self) -> (Vec<Node>, i32) {
        self.emitted.append(&mut self.pending);
        (self.emitted, self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Location;
    use pretty_assertions::assert_eq;

    fn loc(offset: i32) -> Location {
        Location::new(offset)
    }

    fn add(offset: i32, delta: i64) -> Node {
        Node::AddAssign {
            dest: loc(offset),
            delta,
        }
    }

    fn root(nodes: Vec<Node>, ptr_change: i32) -> Node {
        Node::Unit(Unit::block(nodes, ptr_change))
    }

    #[test]
    fn near_accesses_stay_put() {
        let input = root(vec![add(0, 1), add(2, 1), add(-1, 1)], 0);
        assert_eq!(rebase(input.clone()), input);
    }

    #[test]
    fn far_access_moves_the_pointer() {
        let rebased = rebase(root(vec![add(0, 1), add(10, 2), add(11, 3)], 12));
        assert_eq!(
            rebased,
            root(
                vec![
                    Node::Unit(Unit::block(vec![add(0, 1)], 10)),
                    add(0, 2),
                    add(1, 3),
                ],
                2,
            )
        );
    }

    #[test]
    fn loops_are_moved_onto_their_test_cell() {
        let seek = Node::Unit(Unit::roop(loc(5), vec![add(5, 1)], 1));
        let rebased = rebase(root(vec![seek, add(5, 1)], 0));
        assert_eq!(
            rebased,
            root(
                vec![
                    Node::Unit(Unit::block(vec![], 5)),
                    Node::Unit(Unit::roop(loc(0), vec![add(0, 1)], 1)),
                    add(0, 1),
                ],
                -5,
            )
        );
    }

    #[test]
    fn loop_bodies_are_rebased() {
        let body = vec![add(0, -1), add(8, 1), add(9, 1)];
        let rebased = rebase(root(vec![Node::Unit(Unit::roop(loc(0), body, 0))], 0));
        assert_eq!(
            rebased,
            root(
                vec![Node::Unit(Unit::roop(
                    loc(0),
                    vec![
                        Node::Unit(Unit::block(vec![add(0, -1)], 8)),
                        add(0, 1),
                        add(1, 1),
                    ],
                    -8,
                ))],
                0,
            )
        );
    }

    #[test]
    fn rebasing_twice_changes_nothing() {
        let seek = Node::Unit(Unit::roop(loc(3), vec![add(3, -1), add(9, 1)], 2));
        let input = root(vec![add(0, 1), seek, add(4, 1), add(20, 1)], 7);
        let once = rebase(input);
        assert_eq!(rebase(once.clone()), once);
    }
}
