//! Polymorphic collapsing.
//!
//! If a schema declares `User-AUTHORED->Post`, `User-AUTHORED->Comment` and
//! `User-AUTHORED->Content` with `Content = Post | Comment`, only the `Content`
//! edge needs its own storage: the concrete edges read through it.
//!
//! Collapsing runs in passes alternating the grouping axis. Each pass is a pure
//! function of the previous pair set; the loop stops once both axes have had a
//! pass that collapsed nothing, back to back.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::pairing::SegmentPair;
use super::PolymorphicTypeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupingAxis {
    /// Group by `(label, right)`, compare the left types.
    Right,
    /// Group by `(label, left)`, compare the right types.
    Left,
}

impl GroupingAxis {
    fn flip(self) -> Self {
        match self {
            GroupingAxis::Right => GroupingAxis::Left,
            GroupingAxis::Left => GroupingAxis::Right,
        }
    }

    fn fixed(self, pair: &SegmentPair) -> &str {
        match self {
            GroupingAxis::Right => &pair.right,
            GroupingAxis::Left => &pair.left,
        }
    }

    fn varying(self, pair: &SegmentPair) -> &str {
        match self {
            GroupingAxis::Right => &pair.left,
            GroupingAxis::Left => &pair.right,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Collapsed {
    /// Pairs that still need their own storage.
    pub pairs: Vec<SegmentPair>,
    /// Collapsed pair signature -> the polymorphic pair it was folded into.
    pub mapping: HashMap<String, SegmentPair>,
}

struct PassOutcome {
    pairs: Vec<SegmentPair>,
    collapsed: Vec<(String, SegmentPair)>,
}

fn collapse_pass(
    pairs: &[SegmentPair],
    axis: GroupingAxis,
    polymorphic_types: &PolymorphicTypeMap,
) -> PassOutcome {
    let mut groups: BTreeMap<(&str, &str), Vec<usize>> = BTreeMap::new();
    for (idx, pair) in pairs.iter().enumerate() {
        groups
            .entry((pair.label.as_str(), axis.fixed(pair)))
            .or_default()
            .push(idx);
    }

    let mut collapsed = Vec::new();
    let mut removed: HashSet<usize> = HashSet::new();

    for members in groups.values() {
        let (polymorphic, homomorphic): (Vec<usize>, Vec<usize>) = members
            .iter()
            .copied()
            .partition(|&idx| polymorphic_types.contains_key(axis.varying(&pairs[idx])));

        if polymorphic.is_empty() {
            continue;
        }

        for idx in homomorphic {
            let concrete = axis.varying(&pairs[idx]);
            let target = polymorphic.iter().copied().find(|&poly_idx| {
                polymorphic_types
                    .get(axis.varying(&pairs[poly_idx]))
                    .is_some_and(|members| members.iter().any(|m| m == concrete))
            });

            if let Some(poly_idx) = target {
                collapsed.push((pairs[idx].signature.clone(), pairs[poly_idx].clone()));
                removed.insert(idx);
            }
        }
    }

    PassOutcome {
        pairs: pairs
            .iter()
            .enumerate()
            .filter(|(idx, _)| !removed.contains(idx))
            .map(|(_, pair)| pair.clone())
            .collect(),
        collapsed,
    }
}

pub fn collapse(pairs: &[SegmentPair], polymorphic_types: &PolymorphicTypeMap) -> Collapsed {
    let mut current = pairs.to_vec();
    let mut mapping = HashMap::new();
    let mut axis = GroupingAxis::Right;
    let mut previous_collapsed_any = true;
    let mut pass = 0;

    loop {
        pass += 1;
        let outcome = collapse_pass(&current, axis, polymorphic_types);
        let collapsed_any = !outcome.collapsed.is_empty();

        log::debug!(
            "collapse pass {} ({:?}): {} pairs in, {} collapsed",
            pass,
            axis,
            current.len(),
            outcome.collapsed.len()
        );

        mapping.extend(outcome.collapsed);
        current = outcome.pairs;

        if !collapsed_any && !previous_collapsed_any {
            break;
        }
        previous_collapsed_any = collapsed_any;
        axis = axis.flip();
    }

    Collapsed {
        pairs: current,
        mapping,
    }
}
