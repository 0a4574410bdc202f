use std::collections::HashMap;

use crate::ast::{Location, Node, Unit};

/// Merge consecutive writes to the same cell inside each straight-line run.
///
/// A write stays a merge candidate until something reads its cell or a unit
/// node intervenes. Zero-effect writes are dropped afterwards, and the scan
/// repeats until it stops shrinking the sequence.
pub fn reduce_writes(node: Node) -> Node {
    match node {
        Node::Unit(unit) => Node::Unit(Unit {
            body: reduce_sequence(unit.body),
            ..unit
        }),
        other => other,
    }
}

fn reduce_sequence(mut block: Vec<Node>) -> Vec<Node> {
    // A dropped write may have been the only reader that split two merges.
    // Every effective scan removes a node, so this terminates.
    loop {
        let before = sequence_size(&block);
        block = scan(block);
        if sequence_size(&block) == before {
            return block;
        }
    }
}

fn sequence_size(block: &[Node]) -> usize {
    block.iter().map(Node::size).sum()
}

fn scan(block: Vec<Node>) -> Vec<Node> {
    // Merged-away writes leave `None` behind so candidate indices stay valid.
    let mut slots: Vec<Option<Node>> = Vec::with_capacity(block.len());
    let mut candidates: HashMap<Location, usize> = HashMap::new();

    for node in block {
        let mut node = match node {
            Node::Unit(unit) => {
                slots.push(Some(Node::Unit(Unit {
                    body: reduce_sequence(unit.body),
                    ..unit
                })));
                candidates.clear();
                continue;
            }
            other => other,
        };

        if let Some(dest) = node.dest() {
            if let Some(&idx) = candidates.get(&dest) {
                if let Some(merged) = slots[idx].as_ref().and_then(|prior| merge(prior, &node)) {
                    slots[idx] = None;
                    node = merged;
                }
            }
            candidates.insert(dest, slots.len());
        }
        if let Some(src) = node.src() {
            candidates.remove(&src);
        }
        slots.push(Some(node));
    }

    slots
        .into_iter()
        .flatten()
        .filter(|node| !node.is_noop())
        .collect()
}

fn merge(prior: &Node, next: &Node) -> Option<Node> {
    match (prior, next) {
        (Node::AddAssign { dest, delta: a }, Node::AddAssign { delta: b, .. }) => {
            Some(Node::AddAssign {
                dest: *dest,
                delta: a.wrapping_add(*b),
            })
        }
        (Node::Assign { dest, value }, Node::AddAssign { delta, .. }) => Some(Node::Assign {
            dest: *dest,
            value: value.wrapping_add(*delta),
        }),
        // Input has a side effect even when its value is overwritten.
        (Node::Read { .. }, Node::Assign { .. }) => None,
        (_, Node::Assign { .. }) => Some(next.clone()),
        _ => None,
    }
}
