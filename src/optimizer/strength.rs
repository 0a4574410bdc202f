use std::collections::BTreeMap;

use crate::ast::{Location, Node, Unit, UnitKind};

/// Rewrite counted decrement loops into multiply-accumulate arithmetic.
///
/// A loop qualifies when its body returns the pointer to where it started,
/// consists only of `AddAssign`s, and decrements its own test cell by exactly
/// one per iteration. Every other loop is kept and its body is visited.
pub fn reduce_loops(node: Node) -> Node {
    match node {
        Node::Unit(unit) => Node::Unit(Unit {
            body: reduce_block(unit.body),
            ..unit
        }),
        other => other,
    }
}

fn reduce_block(block: Vec<Node>) -> Vec<Node> {
    let mut reduced = Vec::with_capacity(block.len());
    for node in block {
        match node {
            Node::Unit(unit) => {
                let unit = Unit {
                    body: reduce_block(unit.body),
                    ..unit
                };
                match counted_loop(&unit) {
                    Some(seq) => reduced.extend(seq),
                    None => reduced.push(Node::Unit(unit)),
                }
            }
            other => reduced.push(other),
        }
    }
    reduced
}

fn counted_loop(unit: &Unit) -> Option<Vec<Node>> {
    if unit.kind != UnitKind::Roop || unit.ptr_change != 0 {
        return None;
    }
    let origin = unit.src;
    let mut changes: BTreeMap<Location, i64> = BTreeMap::new();
    for node in &unit.body {
        match node {
            Node::AddAssign { dest, delta } => {
                let entry = changes.entry(*dest).or_insert(0);
                *entry = entry.wrapping_add(*delta);
            }
            _ => return None,
        }
    }
    if changes.get(&origin) != Some(&-1) {
        return None;
    }

    let mut seq: Vec<Node> = changes
        .into_iter()
        .filter(|&(dest, factor)| dest != origin && factor != 0)
        .map(|(dest, factor)| Node::MultAddAssign {
            dest,
            src: origin,
            factor,
        })
        .collect();
    let reaches_back = seq
        .iter()
        .any(|node| node.dest().is_some_and(|dest| dest < origin));
    seq.push(Node::Assign {
        dest: origin,
        value: 0,
    });
    if reaches_back {
        Some(vec![Node::Unit(Unit::if_true(origin, seq))])
    } else {
        Some(seq)
    }
}
