//! Relationship path parser.
//!
//! A path string alternates arrow halves and identifiers:
//!
//! ```text
//! =FOLLOWED=>User=AUTHORED=>
//! ^ ^^^^^^^^ ^^ ^^^^
//! | label    |  intermediate type
//! left half  right half
//! ```
//!
//! The two halves around a label combine into one of four arrows:
//! `-->` (singular, out), `<--` (singular, in), `==>` (plural, out) and
//! `<==` (plural, in). The first segment starts at the field's owner type and
//! the last one ends at the field's declared type.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    combinator::{all_consuming, map},
    multi::many1,
    IResult, Parser,
};

use crate::graph_catalog::errors::SchemaError;
use ast::{Cardinality, Direction, Relationship, Segment};

pub mod ast;

#[derive(Debug, PartialEq, Clone, Copy)]
enum PathToken<'a> {
    Arrow(&'a str),
    Name(&'a str),
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn parse_name(input: &str) -> IResult<&str, PathToken<'_>> {
    map(take_while1(is_name_char), PathToken::Name).parse(input)
}

fn parse_arrow_half(input: &str) -> IResult<&str, PathToken<'_>> {
    map(take_while1(|c: char| !is_name_char(c)), |half: &str| {
        PathToken::Arrow(half.trim())
    })
    .parse(input)
}

fn tokenize(input: &str) -> IResult<&str, Vec<PathToken<'_>>> {
    all_consuming(many1(alt((parse_name, parse_arrow_half)))).parse(input)
}

fn arrow_kind(left: &str, right: &str) -> Option<(Cardinality, Direction)> {
    match (left, right) {
        ("-", "->") => Some((Cardinality::Singular, Direction::Out)),
        ("<-", "-") => Some((Cardinality::Singular, Direction::In)),
        ("=", "=>") => Some((Cardinality::Plural, Direction::Out)),
        ("<=", "=") => Some((Cardinality::Plural, Direction::In)),
        _ => None,
    }
}

/// Parse the path declared on `initial_type.field_name` (of type `final_type`).
///
/// # Example
/// ```ignore
/// let rel = parse_path("feed", "User", "Post", false, "=FOLLOWED=>User=AUTHORED=>")?;
/// assert_eq!(rel.path.len(), 2);
/// ```
pub fn parse_path(
    field_name: &str,
    initial_type: &str,
    final_type: &str,
    non_null: bool,
    path: &str,
) -> Result<Relationship, SchemaError> {
    let (_, tokens) = tokenize(path).map_err(|_| {
        SchemaError::malformed_path(field_name, path, "path must not be empty")
    })?;

    if !matches!(tokens.first(), Some(PathToken::Arrow(_))) {
        return Err(SchemaError::malformed_path(
            field_name,
            path,
            "path must start with an arrow",
        ));
    }
    if tokens.len() < 3 || (tokens.len() - 3) % 4 != 0 {
        return Err(SchemaError::malformed_path(
            field_name,
            path,
            "expected ARROW LABEL ARROW [Type ARROW LABEL ARROW]*",
        ));
    }

    let mut segments = Vec::with_capacity(tokens.len() / 4 + 1);
    let mut from_type = initial_type.to_string();
    let mut rest = tokens.as_slice();

    while !rest.is_empty() {
        let (left, label, right) = match rest {
            [PathToken::Arrow(l), PathToken::Name(label), PathToken::Arrow(r), ..] => {
                (*l, *label, *r)
            }
            _ => {
                return Err(SchemaError::malformed_path(
                    field_name,
                    path,
                    "expected a label between two arrow halves",
                ))
            }
        };

        let to_type = if rest.len() > 3 {
            match rest[3] {
                PathToken::Name(name) => name.to_string(),
                PathToken::Arrow(_) => {
                    return Err(SchemaError::malformed_path(
                        field_name,
                        path,
                        "expected a type name between segments",
                    ))
                }
            }
        } else {
            final_type.to_string()
        };

        let (cardinality, direction) =
            arrow_kind(left, right).ok_or_else(|| SchemaError::UnrecognizedArrow {
                field: field_name.to_string(),
                token: format!("{}{}", left, right),
            })?;

        segments.push(Segment {
            from_type: std::mem::replace(&mut from_type, to_type.clone()),
            to_type,
            label: label.to_string(),
            direction,
            cardinality,
            non_null,
        });

        rest = &rest[rest.len().min(4)..];
    }

    if non_null && !(segments.len() == 1 && segments[0].cardinality == Cardinality::Singular) {
        return Err(SchemaError::InvalidNonNullPath {
            field: field_name.to_string(),
        });
    }

    let cardinality = if segments.iter().any(|s| s.cardinality.is_plural()) {
        Cardinality::Plural
    } else {
        Cardinality::Singular
    };

    Ok(Relationship {
        owner_type: initial_type.to_string(),
        field_name: field_name.to_string(),
        target_type: final_type.to_string(),
        non_null,
        cardinality,
        path: segments,
    })
}

/// Inverse of [`parse_path`]: render segments back into a path string.
pub fn format_path(segments: &[Segment]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push_str(&segment.from_type);
        }
        let (left, right) = segment.arrow_halves();
        out.push_str(left);
        out.push_str(&segment.label);
        out.push_str(right);
    }
    out
}
