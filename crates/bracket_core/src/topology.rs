//! Slot topology: which seeds can possibly occupy each slot.
//!
//! Slots are resolved breadth-first by round. A slot of round `r` may only
//! reference genuine seeds or slots of rounds `< r`; the slots of round `r`
//! become visible as inputs once the whole round has been resolved, so a
//! cycle or forward reference surfaces as an error instead of looping.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::error::{BracketError, Result};
use crate::types::{Round, SeedLabel, Slot};

/// A slot together with every seed that could reach it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSlot {
    pub slot: Slot,
    pub occupants: BTreeSet<SeedLabel>,
}

impl ResolvedSlot {
    pub fn round(&self) -> Round {
        self.slot.round
    }

    pub fn label(&self) -> &SeedLabel {
        &self.slot.label
    }

    pub fn contains(&self, seed: &SeedLabel) -> bool {
        self.occupants.contains(seed)
    }
}

/// Resolved bracket for one season
#[derive(Debug, Clone, PartialEq)]
pub struct SlotTopology {
    /// Sorted by (round, label)
    slots: Vec<ResolvedSlot>,
    by_label: HashMap<SeedLabel, usize>,
    /// Round of the slot each genuine seed feeds into directly
    entry_rounds: HashMap<SeedLabel, Round>,
}

/// Compute the possible-occupant set of every slot.
///
/// `seeds` is the set of genuine seed labels for the season. Any slot input
/// that is neither one of them nor a slot resolved in an earlier round is a
/// malformed-topology error.
pub fn resolve_possible_occupants(
    slots: &[Slot],
    seeds: &BTreeSet<SeedLabel>,
) -> Result<SlotTopology> {
    if slots.is_empty() {
        return Err(BracketError::EmptyBracket);
    }

    let mut slot_labels = HashSet::with_capacity(slots.len());
    for slot in slots {
        if !slot_labels.insert(&slot.label) {
            return Err(BracketError::DuplicateSlot(slot.label.clone()));
        }
        if seeds.contains(&slot.label) {
            return Err(BracketError::SlotSeedCollision(slot.label.clone()));
        }
        if slot.round == Round::MAX {
            return Err(BracketError::RoundTooLarge {
                slot: slot.label.clone(),
                round: slot.round,
                max: Round::MAX - 1,
            });
        }
    }

    let mut by_round: BTreeMap<Round, Vec<&Slot>> = BTreeMap::new();
    for slot in slots {
        by_round.entry(slot.round).or_default().push(slot);
    }

    let mut resolved: HashMap<SeedLabel, BTreeSet<SeedLabel>> = HashMap::with_capacity(slots.len());
    let mut entry_rounds = HashMap::new();
    let mut ordered = Vec::with_capacity(slots.len());

    for (round, mut round_slots) in by_round {
        round_slots.sort_by(|a, b| a.label.cmp(&b.label));

        let mut finished = Vec::with_capacity(round_slots.len());
        for slot in round_slots {
            let mut occupants = BTreeSet::new();
            for input in slot.inputs() {
                if let Some(earlier) = resolved.get(input) {
                    occupants.extend(earlier.iter().cloned());
                } else if slot_labels.contains(input) {
                    return Err(BracketError::ForwardReference {
                        slot: slot.label.clone(),
                        round,
                        label: input.clone(),
                    });
                } else if seeds.contains(input) {
                    occupants.insert(input.clone());
                    entry_rounds.entry(input.clone()).or_insert(round);
                } else {
                    return Err(BracketError::UnknownLabel {
                        slot: slot.label.clone(),
                        label: input.clone(),
                    });
                }
            }
            finished.push(ResolvedSlot {
                slot: slot.clone(),
                occupants,
            });
        }

        debug!(round, slots = finished.len(), "resolved round");
        for done in finished {
            resolved.insert(done.slot.label.clone(), done.occupants.clone());
            ordered.push(done);
        }
    }

    let by_label = ordered
        .iter()
        .enumerate()
        .map(|(i, s)| (s.slot.label.clone(), i))
        .collect();

    Ok(SlotTopology {
        slots: ordered,
        by_label,
        entry_rounds,
    })
}

impl SlotTopology {
    pub fn slots(&self) -> &[ResolvedSlot] {
        &self.slots
    }

    pub fn slot(&self, label: &SeedLabel) -> Option<&ResolvedSlot> {
        self.by_label.get(label).map(|&i| &self.slots[i])
    }

    pub fn first_round(&self) -> Round {
        self.slots.first().map(|s| s.round()).unwrap_or(0)
    }

    /// Round of the last game (the championship)
    pub fn final_round(&self) -> Round {
        self.slots.last().map(|s| s.round()).unwrap_or(0)
    }

    /// The champion is credited one round beyond the championship game.
    ///
    /// Cannot overflow: the resolver rejects slots in round `Round::MAX`.
    pub fn champion_round(&self) -> Round {
        self.final_round() + 1
    }

    /// Round of the slot a genuine seed feeds into directly
    pub fn entry_round(&self, seed: &SeedLabel) -> Option<Round> {
        self.entry_rounds.get(seed).copied()
    }

    pub fn contains_seed(&self, seed: &SeedLabel) -> bool {
        self.entry_rounds.contains_key(seed)
    }

    /// Genuine seeds that appear somewhere in the bracket, sorted
    pub fn seeds(&self) -> BTreeSet<&SeedLabel> {
        self.entry_rounds.keys().collect()
    }
}

#[cfg(test)]
#[path = "topology_tests.rs"]
mod topology_tests;
