//! Storage planning.
//!
//! Runs once when a schema loads: every declared relationship path is split into
//! segments, segments describing the same physical edge are paired, concrete
//! pairs subsumed by a polymorphic pair are collapsed into it, and each surviving
//! pair gets a foreign-key or join-table description.
//!
//! The resulting [`StoragePlan`] is immutable and is shared by every request.

use std::collections::{BTreeSet, HashMap};

use crate::graph_catalog::errors::SchemaError;
use crate::path_parser::ast::{Relationship, Segment};

pub mod collapse;
pub mod layout;
pub mod pairing;
pub mod planner;
pub mod segments;

pub use layout::{ForeignKeyColumn, JoinTable, PolymorphicView, StorageLayout};
pub use pairing::SegmentPair;
pub use planner::{ForeignKeyStorage, JoinStorage, SegmentDescription, Storage};

/// Union / interface type name -> ordered concrete member type names.
pub type PolymorphicTypeMap = HashMap<String, Vec<String>>;

#[derive(Debug, Clone)]
pub struct StoragePlan {
    /// Descriptions for pairs that need their own storage, in declaration order.
    descriptions: Vec<SegmentDescription>,
    index: HashMap<String, usize>,
    /// Collapsed pair signature -> pair it was folded into.
    mapping: HashMap<String, SegmentPair>,
    polymorphic_types: PolymorphicTypeMap,
    /// Types whose table a compiled query selects from or joins.
    queried_types: BTreeSet<String>,
}

impl StoragePlan {
    pub fn build(
        relationships: &[Relationship],
        polymorphic_types: &PolymorphicTypeMap,
    ) -> Result<Self, SchemaError> {
        let segments = segments::extract_segments(relationships);
        let pairs = pairing::pair_segments(&segments)?;
        let collapsed = collapse::collapse(&pairs, polymorphic_types);

        let descriptions = collapsed
            .pairs
            .iter()
            .map(planner::plan_storage)
            .collect::<Result<Vec<_>, _>>()?;

        let index = descriptions
            .iter()
            .enumerate()
            .map(|(idx, d)| (d.pair.signature.clone(), idx))
            .collect();

        log::info!(
            "Storage plan: {} segments, {} pairs, {} collapsed, {} stored ({} join tables)",
            segments.len(),
            pairs.len(),
            collapsed.mapping.len(),
            descriptions.len(),
            descriptions
                .iter()
                .filter(|d| matches!(d.storage, Storage::Join(_)))
                .count()
        );

        Ok(StoragePlan {
            descriptions,
            index,
            mapping: collapsed.mapping,
            polymorphic_types: polymorphic_types.clone(),
            queried_types: queried_types(relationships),
        })
    }

    /// Storage description for `segment`, following collapse redirects.
    pub fn description_for(&self, segment: &Segment) -> Result<&SegmentDescription, SchemaError> {
        self.description_by_signature(&segment.pairing_signature())
    }

    pub fn description_by_signature(
        &self,
        signature: &str,
    ) -> Result<&SegmentDescription, SchemaError> {
        let mut current = signature;
        // Each redirect removes a pair from the collapse set, so a chain is never
        // longer than the mapping itself.
        for _ in 0..=self.mapping.len() {
            if let Some(&idx) = self.index.get(current) {
                return Ok(&self.descriptions[idx]);
            }
            match self.mapping.get(current) {
                Some(pair) => current = &pair.signature,
                None => break,
            }
        }

        Err(SchemaError::MissingDescription {
            signature: signature.to_string(),
        })
    }

    pub fn descriptions(&self) -> &[SegmentDescription] {
        &self.descriptions
    }

    /// Signature of the pair `signature` was collapsed into, if any.
    pub fn collapsed_into(&self, signature: &str) -> Option<&str> {
        self.mapping.get(signature).map(|pair| pair.signature.as_str())
    }

    pub fn polymorphic_types(&self) -> &PolymorphicTypeMap {
        &self.polymorphic_types
    }

    pub fn queried_types(&self) -> impl Iterator<Item = &str> {
        self.queried_types.iter().map(String::as_str)
    }

    /// Concrete types a (possibly polymorphic) type stands for.
    pub fn concrete_types<'a>(&'a self, type_name: &'a str) -> Vec<&'a str> {
        match self.polymorphic_types.get(type_name) {
            Some(members) => members.iter().map(String::as_str).collect(),
            None => vec![type_name],
        }
    }
}

/// The final target of every path plus each intermediate type a join walks
/// through. The owner of the first segment is only ever read as a key.
fn queried_types(relationships: &[Relationship]) -> BTreeSet<String> {
    relationships
        .iter()
        .flat_map(|relationship| {
            std::iter::once(&relationship.final_segment().to_type)
                .chain(relationship.path[1..].iter().map(|segment| &segment.from_type))
        })
        .cloned()
        .collect()
}
