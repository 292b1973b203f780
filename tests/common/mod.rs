#![allow(dead_code)]

use ledgerforge::catalog::{LayoutKind, LedgerSide, Level, LevelPlan, Row, Zone};
use ledgerforge::config::Config;
use ledgerforge::engine::{Session, SessionId};
use std::sync::Arc;
use std::time::Duration;

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

pub fn zone(id: &str, labels: &[&str]) -> Zone {
    Zone {
        id: id.to_string(),
        accepted_labels: labels.iter().map(|s| s.to_string()).collect(),
        group: None,
        placeholder: None,
    }
}

pub fn grouped(id: &str, labels: &[&str], group: &str) -> Zone {
    Zone {
        group: Some(group.to_string()),
        ..zone(id, labels)
    }
}

pub fn spacer(id: &str) -> Zone {
    Zone {
        placeholder: Some(String::new()),
        ..zone(id, &[])
    }
}

/// Builder for levels; each `row` call adds one row of zones.
pub struct LevelBuilder {
    level: Level,
}

impl LevelBuilder {
    pub fn new(kind: LayoutKind) -> Self {
        Self {
            level: Level {
                title: "Test Level".to_string(),
                subtitle: String::new(),
                layout_type: kind,
                labels: Vec::new(),
                structure: Vec::new(),
                graph_zones: Vec::new(),
            },
        }
    }

    pub fn statement() -> Self {
        Self::new(LayoutKind::Statement)
    }

    pub fn formula() -> Self {
        Self::new(LayoutKind::Formula)
    }

    pub fn ledger() -> Self {
        Self::new(LayoutKind::Ledger)
    }

    pub fn graph() -> Self {
        Self::new(LayoutKind::Graph)
    }

    /// Ledger row; a missing side gets an empty static cell.
    pub fn ledger_row(mut self, left: Option<Zone>, right: Option<Zone>) -> Self {
        let side = |zone: Option<Zone>| LedgerSide {
            date: String::new(),
            static_label: zone.is_none().then(String::new),
            zone,
        };
        let id = format!("row_{}", self.level.structure.len());
        self.level.structure.push(Row {
            id,
            ledger_left: Some(side(left)),
            ledger_right: Some(side(right)),
            ..Default::default()
        });
        self
    }

    pub fn graph_zone(mut self, zone: Zone) -> Self {
        self.level.graph_zones.push(zone);
        self
    }

    pub fn labels(mut self, labels: &[&str]) -> Self {
        self.level.labels = labels.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn row(mut self, zones: Vec<Zone>) -> Self {
        let id = format!("row_{}", self.level.structure.len());
        self.level.structure.push(Row {
            id,
            zones,
            ..Default::default()
        });
        self
    }

    pub fn build(self) -> Level {
        self.level
    }

    pub fn plan(self) -> LevelPlan {
        LevelPlan::build(0, &self.level).expect("valid test level")
    }

    pub fn session(self) -> Session {
        session_for(self.plan())
    }
}

pub fn session_for(plan: LevelPlan) -> Session {
    Session::new(SessionId(1), Arc::new(plan), &Config::default(), 7, Duration::ZERO)
}

/// First pool token carrying `label` (originals before clones).
pub fn token_for(session: &Session, label: &str) -> String {
    let pool = session.pool();
    pool.iter()
        .filter(|t| t.label == label)
        .min_by_key(|t| t.is_clone)
        .map(|t| t.id.clone())
        .unwrap_or_else(|| panic!("no token labelled '{}' in pool", label))
}

pub fn count_label(session: &Session, label: &str) -> usize {
    session.pool().iter().filter(|t| t.label == label).count()
}
