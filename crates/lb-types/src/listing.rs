//! Line-level source listings.
//!
//! A listing is what a player edits: instructions interleaved with label
//! definitions, comments, and blank lines. The diff engine only looks at the
//! [`Program`](crate::Program) derived from it, but reconstruction needs the
//! lines themselves.

use std::fmt;

use crate::error::TypeError;
use crate::instruction::{is_identifier, Instruction};

/// One line of a listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Instruction(Instruction),
    Label(String),
    /// Comment text, without the leading `;`.
    Comment(String),
    Blank,
}

impl Line {
    pub fn is_label(&self) -> bool {
        matches!(self, Self::Label(_))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instruction(instruction) => write!(f, "    {instruction}"),
            Self::Label(name) => write!(f, "{name}:"),
            Self::Comment(text) => write!(f, ";{text}"),
            Self::Blank => Ok(()),
        }
    }
}

/// Parse listing text into lines.
///
/// `name:` defines a label and may be followed by an instruction on the same
/// line. `;` starts a comment; a trailing comment becomes its own
/// [`Line::Comment`] after the code on that line.
pub fn parse_listing(text: &str) -> Result<Vec<Line>, TypeError> {
    let mut lines = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let (code, comment) = match raw.split_once(';') {
            Some((code, comment)) => (code.trim(), Some(comment)),
            None => (raw.trim(), None),
        };

        if code.is_empty() && comment.is_none() {
            lines.push(Line::Blank);
            continue;
        }

        let code = match code.split_once(':') {
            Some((name, rest)) => {
                let name = name.trim();
                if !is_identifier(name) {
                    return Err(TypeError::parse(line_no, format!("invalid label name '{name}'")));
                }
                lines.push(Line::Label(name.to_string()));
                rest.trim()
            }
            None => code,
        };

        if !code.is_empty() {
            let instruction = code
                .parse::<Instruction>()
                .map_err(|message| TypeError::parse(line_no, message))?;
            lines.push(Line::Instruction(instruction));
        }

        if let Some(comment) = comment {
            lines.push(Line::Comment(comment.to_string()));
        }
    }

    Ok(lines)
}

/// Render lines back to listing text, one per line.
pub fn render_listing(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}
