//! Level catalog: the externally authored list of levels.
//!
//! The JSON shape follows the lesson authoring format
//! (camelCase keys, `expectedLabels` on zones). Nothing here carries game state;
//! `slots` turns one level into the flat index the engine works from.

pub mod slots;

use crate::error::{LedgerError, LfResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::Read;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::debug;

pub use self::slots::{LevelPlan, Slot, SlotIndex};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LayoutKind {
    Statement,
    Ledger,
    Graph,
    Formula,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    #[serde(default, alias = "expectedLabels")]
    pub accepted_labels: Vec<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSide {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub zone: Option<Zone>,
    #[serde(default)]
    pub static_label: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: String,
    #[serde(default)]
    pub zones: Vec<Zone>,
    /// Zones rendered in a specific amount column, keyed by column index.
    #[serde(default)]
    pub column_zones: BTreeMap<u8, Zone>,
    #[serde(default)]
    pub ledger_left: Option<LedgerSide>,
    #[serde(default)]
    pub ledger_right: Option<LedgerSide>,
    #[serde(default)]
    pub formula_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub layout_type: LayoutKind,
    pub labels: Vec<String>,
    #[serde(default)]
    pub structure: Vec<Row>,
    #[serde(default)]
    pub graph_zones: Vec<Zone>,
}

impl Level {
    /// Every zone of the layout, in document order.
    ///
    /// Statement and formula layouts contribute row zones followed by the
    /// row's column zones; ledgers contribute the left then right side zone
    /// of each row; graphs contribute their free-standing zones.
    pub fn zones(&self) -> Vec<&Zone> {
        let mut out = Vec::new();
        match self.layout_type {
            LayoutKind::Statement | LayoutKind::Formula => {
                for row in &self.structure {
                    out.extend(row.zones.iter());
                    out.extend(row.column_zones.values());
                }
            }
            LayoutKind::Ledger => {
                for row in &self.structure {
                    for side in [&row.ledger_left, &row.ledger_right].into_iter().flatten() {
                        if let Some(zone) = &side.zone {
                            out.push(zone);
                        }
                    }
                }
            }
            LayoutKind::Graph => out.extend(self.graph_zones.iter()),
        }
        out
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub levels: Vec<Level>,
}

/// Findings of `Catalog::validate`. Errors make a level unplayable.
#[derive(Debug, Clone, Default)]
pub struct CatalogReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CatalogReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Catalog {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LfResult<Self> {
        let path = path.as_ref();
        debug!("Loading catalog from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            LedgerError::Catalog(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> LfResult<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> LfResult<Self> {
        let catalog: Catalog = serde_json::from_str(content)?;
        if catalog.levels.is_empty() {
            return Err(LedgerError::Catalog("catalog contains no levels".to_string()));
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level(&self, index: usize) -> LfResult<&Level> {
        self.levels.get(index).ok_or_else(|| {
            LedgerError::Catalog(format!(
                "level {} does not exist (catalog has {})",
                index + 1,
                self.levels.len()
            ))
        })
    }

    /// Builds the plan for one level (0-based index).
    pub fn plan(&self, index: usize) -> LfResult<LevelPlan> {
        LevelPlan::build(index, self.level(index)?)
    }

    pub fn validate(&self) -> CatalogReport {
        let mut report = CatalogReport::default();

        for (idx, level) in self.levels.iter().enumerate() {
            let plan = match LevelPlan::build(idx, level) {
                Ok(p) => p,
                Err(e) => {
                    report.errors.push(format!("Level {}: {}", idx + 1, e));
                    continue;
                }
            };

            let supplied: HashSet<&str> = level.labels.iter().map(String::as_str).collect();

            for slot in plan.slots.required() {
                if !slot.accepted_labels.iter().any(|l| supplied.contains(l.as_str())) {
                    report.warnings.push(format!(
                        "Level {}: slot '{}' accepts no label supplied by the pool",
                        idx + 1,
                        slot.id
                    ));
                }
            }

            let mut unused: Vec<&str> = supplied
                .iter()
                .copied()
                .filter(|label| !plan.slots.required().any(|s| s.accepts(label)))
                .collect();
            unused.sort_unstable();
            for label in unused {
                report.warnings.push(format!(
                    "Level {}: label '{}' is accepted by no slot",
                    idx + 1,
                    label
                ));
            }
        }

        report
    }
}
