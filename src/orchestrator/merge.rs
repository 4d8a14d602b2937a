//! Confidence-keyed merge of strategy outputs.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::model::{InferenceResult, InferredCode};

/// Merges the codes of `outputs` into one list keyed by `(code_system, code)`.
///
/// The highest confidence wins. On an exact tie the later output wins, so the
/// caller's ordering is the tie-break. The returned list is sorted ascending
/// by `(code_system, code)` regardless of input order.
pub fn merge_results<'a, I>(outputs: I) -> Vec<InferredCode>
where
    I: IntoIterator<Item = &'a InferenceResult>,
{
    let mut best: BTreeMap<(&'static str, String), InferredCode> = BTreeMap::new();

    for code in outputs.into_iter().flat_map(|r| r.inferred_codes.iter()) {
        let (system, value) = code.merge_key();
        match best.entry((system, value.to_string())) {
            Entry::Vacant(slot) => {
                slot.insert(code.clone());
            }
            Entry::Occupied(mut slot) => {
                if code.confidence >= slot.get().confidence {
                    slot.insert(code.clone());
                }
            }
        }
    }

    best.into_values().collect()
}
