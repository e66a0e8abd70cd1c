use std::fmt;

use serde::{Deserialize, Serialize};

/// Which end of an edge a segment is declared from.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,  // `<--` / `<==`
    Out, // `-->` / `==>`
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Singular, // `-`
    Plural,   // `=`
}

impl Cardinality {
    pub fn is_plural(&self) -> bool {
        matches!(self, Cardinality::Plural)
    }
}

/// One directed, typed edge of a relationship path.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub from_type: String,
    pub to_type: String,
    pub label: String,
    pub direction: Direction,
    pub cardinality: Cardinality,
    pub non_null: bool,
}

impl Segment {
    /// `from|to|label|direction` - two declarations of the same edge end share it.
    pub fn identity_signature(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.from_type, self.to_type, self.label, self.direction
        )
    }

    /// Type on the `out` end of the physical edge.
    pub fn left_type(&self) -> &str {
        match self.direction {
            Direction::Out => &self.from_type,
            Direction::In => &self.to_type,
        }
    }

    /// Type on the `in` end of the physical edge.
    pub fn right_type(&self) -> &str {
        match self.direction {
            Direction::Out => &self.to_type,
            Direction::In => &self.from_type,
        }
    }

    /// Direction-independent `left|label|right`, shared by both ends of one edge.
    pub fn pairing_signature(&self) -> String {
        pairing_signature(self.left_type(), &self.label, self.right_type())
    }

    /// The arrow token this segment was declared with, e.g. `==>`.
    pub fn arrow(&self) -> &'static str {
        match (self.cardinality, self.direction) {
            (Cardinality::Singular, Direction::Out) => "-->",
            (Cardinality::Singular, Direction::In) => "<--",
            (Cardinality::Plural, Direction::Out) => "==>",
            (Cardinality::Plural, Direction::In) => "<==",
        }
    }

    /// The arrow split around the label, e.g. `("<-", "-")` for `<-LABEL-`.
    pub fn arrow_halves(&self) -> (&'static str, &'static str) {
        let arrow = self.arrow();
        match self.direction {
            Direction::In => (&arrow[..2], &arrow[2..]),
            Direction::Out => (&arrow[..1], &arrow[1..]),
        }
    }
}

pub fn pairing_signature(left: &str, label: &str, right: &str) -> String {
    format!("{}|{}|{}", left, label, right)
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, right) = self.arrow_halves();
        write!(
            f,
            "{}{}{}{}{}",
            self.from_type, left, self.label, right, self.to_type
        )
    }
}

/// A declared relationship field: `owner_type.field_name` resolved through `path`.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub owner_type: String,
    pub field_name: String,
    pub target_type: String,
    pub non_null: bool,
    pub cardinality: Cardinality,
    pub path: Vec<Segment>,
}

impl Relationship {
    pub fn initial_segment(&self) -> &Segment {
        // parse_path never produces an empty path
        &self.path[0]
    }

    pub fn final_segment(&self) -> &Segment {
        &self.path[self.path.len() - 1]
    }

    pub fn is_plural(&self) -> bool {
        self.cardinality.is_plural()
    }

    /// `Type.field`, used in log lines and error messages.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.owner_type, self.field_name)
    }
}
