//! Assembly-sequence text: a nested list of plate ids such as
//! `"[0,1,[2,3],4]"`. Nesting groups plates into modules assembled before
//! being merged into their parent. Every plate id in `[0, count)` must
//! appear exactly once.

use serde::{Deserialize, Serialize};

use crate::types::SequenceError;

/// One element of a sequence group: a plate leaf or a nested module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeqNode {
    Plate(usize),
    Group(Vec<SeqNode>),
}

impl SeqNode {
    /// Plate ids in this subtree, in sequence order.
    pub fn leaves(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<usize>) {
        match self {
            SeqNode::Plate(id) => out.push(*id),
            SeqNode::Group(children) => {
                for c in children {
                    c.collect_leaves(out);
                }
            }
        }
    }

    pub fn contains_plate(&self, id: usize) -> bool {
        match self {
            SeqNode::Plate(p) => *p == id,
            SeqNode::Group(children) => children.iter().any(|c| c.contains_plate(id)),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Comma,
    Int(usize),
}

fn tokenize(text: &str) -> Result<Vec<Token>, SequenceError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '[' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ']' => {
                chars.next();
                tokens.push(Token::Close);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            c if c.is_ascii_whitespace() => {
                chars.next();
            }
            c if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let id = digits
                    .parse::<usize>()
                    .map_err(|_| SequenceError::UnexpectedToken { token: digits.clone() })?;
                tokens.push(Token::Int(id));
            }
            other => {
                return Err(SequenceError::UnexpectedToken {
                    token: other.to_string(),
                })
            }
        }
    }
    Ok(tokens)
}

/// Parse sequence text into a tree, validating bracket balance, separators
/// and that every plate id in `[0, plate_count)` appears exactly once.
pub fn seq_to_tree(text: &str, plate_count: usize) -> Result<Vec<SeqNode>, SequenceError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(SequenceError::Empty);
    }
    let mut pos = 0;
    if tokens[pos] != Token::Open {
        return Err(SequenceError::UnexpectedToken {
            token: describe(&tokens[pos]),
        });
    }
    pos += 1;
    let nodes = parse_group(&tokens, &mut pos)?;
    if pos != tokens.len() {
        return Err(SequenceError::UnbalancedBrackets);
    }

    let mut seen = vec![false; plate_count];
    let mut got = 0usize;
    for node in &nodes {
        for id in node.leaves() {
            if id >= plate_count {
                return Err(SequenceError::OutOfRange {
                    id,
                    count: plate_count,
                });
            }
            if seen[id] {
                return Err(SequenceError::DuplicateId { id });
            }
            seen[id] = true;
            got += 1;
        }
    }
    if got != plate_count {
        return Err(SequenceError::IncompleteCoverage {
            got,
            count: plate_count,
        });
    }
    Ok(nodes)
}

/// Parse elements after an opening bracket, consuming the matching close.
fn parse_group(tokens: &[Token], pos: &mut usize) -> Result<Vec<SeqNode>, SequenceError> {
    let mut nodes = Vec::new();
    let mut expect_element = true;
    loop {
        let tok = tokens.get(*pos).ok_or(SequenceError::UnbalancedBrackets)?;
        match tok {
            Token::Close => {
                *pos += 1;
                return Ok(nodes);
            }
            Token::Comma => {
                if expect_element {
                    return Err(SequenceError::UnexpectedToken {
                        token: ",".into(),
                    });
                }
                *pos += 1;
                expect_element = true;
            }
            Token::Int(id) => {
                if !expect_element {
                    return Err(SequenceError::MissingSeparator {
                        at: id.to_string(),
                    });
                }
                nodes.push(SeqNode::Plate(*id));
                *pos += 1;
                expect_element = false;
            }
            Token::Open => {
                if !expect_element {
                    return Err(SequenceError::MissingSeparator { at: "[".into() });
                }
                *pos += 1;
                nodes.push(SeqNode::Group(parse_group(tokens, pos)?));
                expect_element = false;
            }
        }
    }
}

fn describe(tok: &Token) -> String {
    match tok {
        Token::Open => "[".into(),
        Token::Close => "]".into(),
        Token::Comma => ",".into(),
        Token::Int(id) => id.to_string(),
    }
}

/// Render a sequence tree back to its text form.
pub fn tree_to_seq(nodes: &[SeqNode]) -> String {
    let mut out = String::from("[");
    render(nodes, &mut out);
    out.push(']');
    out
}

fn render(nodes: &[SeqNode], out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        match node {
            SeqNode::Plate(id) => out.push_str(&id.to_string()),
            SeqNode::Group(children) => {
                out.push('[');
                render(children, out);
                out.push(']');
            }
        }
    }
}
