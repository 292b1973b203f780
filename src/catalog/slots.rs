use super::{Level, LayoutKind};
use crate::error::{LedgerError, LfResult};
use std::collections::HashMap;

/// One fillable (or spacer) location of a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub id: String,
    pub accepted_labels: Vec<String>,
    pub group: Option<String>,
    pub has_placeholder: bool,
    /// Formula mode: index of the question (row) this slot belongs to.
    pub question: Option<usize>,
}

impl Slot {
    /// Spacers and static placeholders never take part in validation.
    pub fn is_required(&self) -> bool {
        !self.accepted_labels.is_empty()
    }

    pub fn accepts(&self, label: &str) -> bool {
        self.accepted_labels.iter().any(|l| l == label)
    }
}

/// Flat, id-indexed view over every slot of a level.
#[derive(Debug, Clone, Default)]
pub struct SlotIndex {
    slots: Vec<Slot>,
    by_id: HashMap<String, usize>,
    groups: HashMap<String, Vec<usize>>,
}

impl SlotIndex {
    pub fn from_slots(slots: Vec<Slot>) -> LfResult<Self> {
        let mut by_id = HashMap::with_capacity(slots.len());
        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();

        for (i, slot) in slots.iter().enumerate() {
            if by_id.insert(slot.id.clone(), i).is_some() {
                return Err(LedgerError::Catalog(format!(
                    "duplicate slot id '{}'",
                    slot.id
                )));
            }
            if let Some(g) = &slot.group {
                groups.entry(g.clone()).or_default().push(i);
            }
        }

        Ok(Self {
            slots,
            by_id,
            groups,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Slot> {
        self.by_id.get(id).map(|&i| &self.slots[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn required(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.is_required())
    }

    pub fn required_count(&self) -> usize {
        self.required().count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Other members of `slot`'s group. Empty when the slot is ungrouped.
    pub fn group_mates<'a>(&'a self, slot: &'a Slot) -> impl Iterator<Item = &'a Slot> + 'a {
        slot.group
            .as_ref()
            .and_then(|g| self.groups.get(g))
            .into_iter()
            .flatten()
            .map(move |&i| &self.slots[i])
            .filter(move |s| s.id != slot.id)
    }
}

/// Everything the engine needs about one level, computed once on load.
#[derive(Debug, Clone)]
pub struct LevelPlan {
    /// 0-based catalog position.
    pub index: usize,
    pub title: String,
    pub kind: LayoutKind,
    pub labels: Vec<String>,
    pub slots: SlotIndex,
    /// Formula mode: required slot ids of each question, in row order.
    pub questions: Vec<Vec<String>>,
}

impl LevelPlan {
    pub fn build(index: usize, level: &Level) -> LfResult<Self> {
        let mut slots = Vec::new();
        let mut questions = Vec::new();

        if level.layout_type == LayoutKind::Formula {
            for (q, row) in level.structure.iter().enumerate() {
                let mut required = Vec::new();
                for zone in row.zones.iter().chain(row.column_zones.values()) {
                    if !zone.accepted_labels.is_empty() {
                        required.push(zone.id.clone());
                    }
                    slots.push(to_slot(zone, Some(q)));
                }
                if required.is_empty() {
                    return Err(LedgerError::Catalog(format!(
                        "formula question '{}' has no fillable slot",
                        row.id
                    )));
                }
                questions.push(required);
            }
        } else {
            slots.extend(level.zones().into_iter().map(|z| to_slot(z, None)));
        }

        let slots = SlotIndex::from_slots(slots)?;
        if slots.required_count() == 0 {
            return Err(LedgerError::Catalog(format!(
                "level '{}' has no fillable slot",
                level.title
            )));
        }

        Ok(Self {
            index,
            title: level.title.clone(),
            kind: level.layout_type,
            labels: level.labels.clone(),
            slots,
            questions,
        })
    }

    pub fn is_formula(&self) -> bool {
        self.kind == LayoutKind::Formula
    }
}

fn to_slot(zone: &super::Zone, question: Option<usize>) -> Slot {
    // acceptedLabels is an ordered set; authoring tools sometimes repeat entries
    let mut accepted: Vec<String> = Vec::with_capacity(zone.accepted_labels.len());
    for label in &zone.accepted_labels {
        if !accepted.contains(label) {
            accepted.push(label.clone());
        }
    }
    Slot {
        id: zone.id.clone(),
        accepted_labels: accepted,
        group: zone.group.clone(),
        has_placeholder: zone.placeholder.is_some(),
        question,
    }
}
