//! Placement decisions and excess-supply detection.
//!
//! Both work on the level's `SlotIndex` and the current placements only, so
//! they can be exercised without a session.

use super::types::{Placements, RejectReason};
use crate::catalog::{Slot, SlotIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

/// Decides whether `label` may go into `slot`.
///
/// The label must be accepted by the slot, and no other slot of the same
/// group may currently hold it.
pub fn judge(slots: &SlotIndex, placements: &Placements, slot: &Slot, label: &str) -> Verdict {
    if !slot.accepts(label) {
        return Verdict::Reject(RejectReason::LabelNotAccepted);
    }
    if blocked_by_group(slots, placements, slot, label) {
        return Verdict::Reject(RejectReason::DuplicateInGroup);
    }
    Verdict::Accept
}

/// True when a group-mate of `slot` already shows `label`.
pub fn blocked_by_group(
    slots: &SlotIndex,
    placements: &Placements,
    slot: &Slot,
    label: &str,
) -> bool {
    slots
        .group_mates(slot)
        .any(|mate| placements.get(&mate.id).is_some_and(|l| l == label))
}

/// Unfilled slots, other than `filled_id`, that could still legally take `label`.
///
/// `placements` must already contain the placement into `filled_id`, so a
/// group-mate of the just-filled slot is not counted.
pub fn remaining_demand(
    slots: &SlotIndex,
    placements: &Placements,
    filled_id: &str,
    label: &str,
) -> usize {
    slots
        .required()
        .filter(|s| s.id != filled_id)
        .filter(|s| !placements.contains_key(&s.id))
        .filter(|s| s.accepts(label))
        .filter(|s| !blocked_by_group(slots, placements, s, label))
        .count()
}

/// Strictly more copies left than places that can still use them.
pub fn is_excess(remaining_supply: usize, remaining_demand: usize) -> bool {
    remaining_supply > remaining_demand
}
