//! # Definition Merging
//!
//! Folds a fragment's named sub-definitions into the global table. A name
//! already present is never overwritten: the first writer wins and later
//! same-named definitions are discarded.
//!
//! The outcome therefore depends on merge order whenever two fragments
//! define one name with different shapes. [`conflicting_definitions`]
//! finds every such name so the composer can report it.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::document::{Definition, Definitions};
use crate::reflect::Fragment;

/// Names affected by one [`merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Names copied into the table.
    pub added: Vec<String>,
    /// Names already present, whose incoming definition was dropped.
    pub discarded: Vec<String>,
}

/// Copy every definition of `incoming` whose name is absent from `target`.
pub fn merge(target: &mut Definitions, incoming: Definitions) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    for (name, definition) in incoming {
        match target.entry(name) {
            Entry::Vacant(slot) => {
                outcome.added.push(slot.key().clone());
                slot.insert(definition);
            }
            Entry::Occupied(existing) => outcome.discarded.push(existing.key().clone()),
        }
    }
    outcome
}

/// Names defined with more than one distinct shape across `fragments`.
///
/// Fragments are compared as reflected, before any composition stage edits
/// them. Returned names are sorted.
pub fn conflicting_definitions<'a>(
    fragments: impl IntoIterator<Item = &'a Fragment>,
) -> Vec<String> {
    let mut first_seen: BTreeMap<&'a str, &'a Definition> = BTreeMap::new();
    let mut conflicts = BTreeSet::new();
    for fragment in fragments {
        for (name, definition) in &fragment.definitions {
            match first_seen.get(name.as_str()) {
                Some(seen) if *seen != definition => {
                    conflicts.insert(name.clone());
                }
                Some(_) => {}
                None => {
                    first_seen.insert(name, definition);
                }
            }
        }
    }
    conflicts.into_iter().collect()
}
