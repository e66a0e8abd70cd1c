use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph_catalog::errors::SchemaError;
use crate::path_parser::ast::{Direction, Segment};

/// Both declared ends of one logical edge. Either end may be missing when the
/// schema only declares one direction.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct SegmentPair {
    #[serde(rename = "in")]
    pub in_segment: Option<Segment>,
    #[serde(rename = "out")]
    pub out_segment: Option<Segment>,
    pub left: String,
    pub right: String,
    pub label: String,
    pub signature: String,
}

impl SegmentPair {
    pub fn new(
        in_segment: Option<Segment>,
        out_segment: Option<Segment>,
    ) -> Result<Self, SchemaError> {
        let any = in_segment
            .as_ref()
            .or(out_segment.as_ref())
            .ok_or(SchemaError::EmptySegmentPair)?;
        let signature = any.pairing_signature();

        if let (Some(i), Some(o)) = (&in_segment, &out_segment) {
            if i.label != o.label {
                return Err(SchemaError::PairLabelMismatch {
                    signature,
                    in_label: i.label.clone(),
                    out_label: o.label.clone(),
                });
            }
        }

        Ok(SegmentPair {
            left: any.left_type().to_string(),
            right: any.right_type().to_string(),
            label: any.label.clone(),
            signature,
            in_segment,
            out_segment,
        })
    }
}

/// Group segments describing the same physical edge into pairs.
pub fn pair_segments(segments: &[Segment]) -> Result<Vec<SegmentPair>, SchemaError> {
    let mut order: Vec<String> = Vec::new();
    let mut sides: HashMap<String, (Option<Segment>, Option<Segment>)> = HashMap::new();

    for segment in segments {
        let signature = segment.pairing_signature();
        let entry = sides.entry(signature.clone()).or_insert_with(|| {
            order.push(signature);
            (None, None)
        });
        match segment.direction {
            Direction::In => entry.0 = Some(segment.clone()),
            Direction::Out => entry.1 = Some(segment.clone()),
        }
    }

    order
        .into_iter()
        .filter_map(|signature| sides.remove(&signature))
        .map(|(in_segment, out_segment)| SegmentPair::new(in_segment, out_segment))
        .collect()
}
