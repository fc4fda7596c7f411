//! Line tokenizer for the description notation.
//!
//! A statement is `keyword(field, field, ...).` on a single line:
//!
//! | keyword   | fields                        |
//! |-----------|-------------------------------|
//! | `arg`     | `id` or `id,weight`           |
//! | `att`     | `src,dst` or `src,dst,weight` |
//! | `support` | `src,dst` or `src,dst,weight` |
//!
//! Fields are returned trimmed but otherwise raw; validation happens in the parser.

use crate::properties::RelationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement<'a> {
    ArgumentDecl {
        id: &'a str,
        weight: Option<&'a str>,
    },
    AttackDecl {
        source: &'a str,
        target: &'a str,
        weight: Option<&'a str>,
    },
    SupportDecl {
        source: &'a str,
        target: &'a str,
        weight: Option<&'a str>,
    },
    Unrecognized,
}

impl<'a> Statement<'a> {
    /// Relation statements as `(kind, source, target, weight)`.
    pub fn as_relation(&self) -> Option<(RelationKind, &'a str, &'a str, Option<&'a str>)> {
        match *self {
            Statement::AttackDecl {
                source,
                target,
                weight,
            } => Some((RelationKind::Attack, source, target, weight)),
            Statement::SupportDecl {
                source,
                target,
                weight,
            } => Some((RelationKind::Support, source, target, weight)),
            _ => None,
        }
    }
}

pub fn tokenize(line: &str) -> Statement<'_> {
    let Some((keyword, fields)) = split_call(line.trim()) else {
        return Statement::Unrecognized;
    };
    let fields: Vec<&str> = fields.split(',').map(str::trim).collect();
    match (keyword, fields.as_slice()) {
        ("arg", [id]) => Statement::ArgumentDecl { id, weight: None },
        ("arg", [id, weight]) => Statement::ArgumentDecl {
            id,
            weight: Some(weight),
        },
        ("att", [source, target]) => Statement::AttackDecl {
            source,
            target,
            weight: None,
        },
        ("att", [source, target, weight]) => Statement::AttackDecl {
            source,
            target,
            weight: Some(weight),
        },
        ("support", [source, target]) => Statement::SupportDecl {
            source,
            target,
            weight: None,
        },
        ("support", [source, target, weight]) => Statement::SupportDecl {
            source,
            target,
            weight: Some(weight),
        },
        _ => Statement::Unrecognized,
    }
}

/// Split `keyword(fields).` into its keyword and the text between the parentheses.
fn split_call(line: &str) -> Option<(&str, &str)> {
    let body = line.strip_suffix('.')?.trim_end();
    let body = body.strip_suffix(')')?;
    let (keyword, fields) = body.split_once('(')?;
    if keyword.is_empty() || !keyword.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if fields.contains(['(', ')']) {
        return None;
    }
    Some((keyword, fields))
}
