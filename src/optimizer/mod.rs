//! Tree-to-tree optimization passes.
//!
//! Each pass takes ownership of a tree and returns a rebuilt one; none of
//! them keeps state between calls.

mod rebase;
mod strength;
mod writes;

pub use rebase::{NEAR, rebase};
pub use strength::reduce_loops;
pub use writes::reduce_writes;

use crate::ast::Node;

/// Run the three passes in order: loop strength reduction, local write
/// reduction, pointer-offset rebasing.
#[tracing::instrument(level = "debug", skip_all)]
pub fn optimize(root: Node) -> Node {
    let before = root.size();
    let root = reduce_loops(root);
    tracing::debug!(nodes = root.size(), "loops reduced");
    let root = reduce_writes(root);
    tracing::debug!(nodes = root.size(), "writes reduced");
    let root = rebase(root);
    tracing::debug!(before, after = root.size(), "optimized");
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Location, Unit};
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn clear_then_set() {
        let root = optimize(parse("[-]+++++").unwrap());
        assert_eq!(
            root,
            Node::Unit(Unit::block(
                vec![Node::Assign {
                    dest: Location::ORIGIN,
                    value: 5
                }],
                0,
            ))
        );
    }

    #[test]
    fn optimizing_twice_is_stable() {
        let once = optimize(parse(">++++[<+++>-]<[>>>>+<<<<-]>>>>[.>]").unwrap());
        assert_eq!(optimize(once.clone()), once);
    }

    #[test]
    fn copy_then_clear_inside_a_loop_is_stable() {
        for code in ["[+[->+<]>[-]]", ">>>>>>>>[+[->+<]>[-]]"] {
            let once = optimize(parse(code).unwrap());
            assert_eq!(optimize(once.clone()), once, "{code}");
        }
    }
}
