use crate::ast::{Location, Node, Unit};
use crate::error::ParseError;

/// Parse source text into a root `Block`.
///
/// Characters outside the eight commands are skipped and reported as trace
/// events; unbalanced brackets are errors.
#[tracing::instrument(level = "debug", skip_all, fields(len = code.len()))]
pub fn parse(code: &str) -> Result<Node, ParseError> {
    struct Scan<I> {
        iter: I,
        ignored: usize,
    }

    fn parse_block<I: Iterator<Item = (usize, char)>>(
        scan: &mut Scan<I>,
        start: i32,
        open: Option<usize>,
    ) -> Result<(Vec<Node>, i32), ParseError> {
        let mut body = Vec::new();
        let mut offset = start;
        while let Some((position, ch)) = scan.iter.next() {
            let here = Location::new(offset);
            match ch {
                '+' => body.push(Node::AddAssign {
                    dest: here,
                    delta: 1,
                }),
                '-' => body.push(Node::AddAssign {
                    dest: here,
                    delta: -1,
                }),
                '>' => offset += 1,
                '<' => offset -= 1,
                '.' => body.push(Node::Put { src: here }),
                ',' => body.push(Node::Read { dest: here }),
                '[' => {
                    let (inner, end) = parse_block(scan, offset, Some(position))?;
                    body.push(Node::Unit(Unit::roop(here, inner, end - offset)));
                }
                ']' => {
                    return match open {
                        Some(_) => Ok((body, offset)),
                        None => Err(ParseError::UnmatchedClose { position }),
                    };
                }
                other => {
                    scan.ignored += 1;
                    tracing::trace!(position, ch = ?other, "ignoring non-command character");
                }
            }
        }
        match open {
            Some(position) => Err(ParseError::UnmatchedOpen { position }),
            None => Ok((body, offset)),
        }
    }

    let mut scan = Scan {
        iter: code.char_indices(),
        ignored: 0,
    };
    let (body, end) = parse_block(&mut scan, 0, None)?;
    let root = Node::Unit(Unit::block(body, end));
    tracing::debug!(nodes = root.size(), ignored = scan.ignored, "parsed");
    Ok(root)
}
