use std::collections::HashMap;

use crate::path_parser::ast::{Relationship, Segment};

/// Collect the unique segment universe declared by `relationships`.
///
/// Two declarations with the same identity signature describe the same edge
/// end; the non-null one wins, otherwise the first declaration is kept.
/// Output is in first-declaration order.
pub fn extract_segments(relationships: &[Relationship]) -> Vec<Segment> {
    let mut index_by_signature: HashMap<String, usize> = HashMap::new();
    let mut segments: Vec<Segment> = Vec::new();

    for segment in relationships.iter().flat_map(|r| r.path.iter()) {
        let signature = segment.identity_signature();
        match index_by_signature.get(&signature) {
            Some(&idx) => {
                if segment.non_null && !segments[idx].non_null {
                    segments[idx] = segment.clone();
                }
            }
            None => {
                index_by_signature.insert(signature, segments.len());
                segments.push(segment.clone());
            }
        }
    }

    segments
}
