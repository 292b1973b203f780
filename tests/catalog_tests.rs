use ledgerforge::catalog::{Catalog, LayoutKind};
use ledgerforge::error::LedgerError;
use rstest::rstest;
use std::io::Write;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tempfile::NamedTempFile;

fn bundled_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/levels.json")
}

const MIXED: &str = r#"{
  "levels": [
    {
      "title": "Statement",
      "layoutType": "statement",
      "labels": ["Jualan", "Belian"],
      "structure": [
        { "id": "r1", "zones": [
            { "id": "s1", "expectedLabels": ["Jualan"] },
            { "id": "spacer", "placeholder": "" }
        ] },
        { "id": "r2", "columnZones": { "2": { "id": "s2", "acceptedLabels": ["Belian", "Belian"] } } }
      ]
    },
    {
      "title": "Ledger",
      "layoutType": "ledger",
      "labels": ["Modal", "Baki b/b"],
      "structure": [
        { "id": "r1",
          "ledgerLeft": { "date": "31/12", "zone": { "id": "dr1", "expectedLabels": ["Baki b/b"] } },
          "ledgerRight": { "date": "1/1", "staticLabel": "Baki b/b" } },
        { "id": "r2",
          "ledgerRight": { "zone": { "id": "cr1", "expectedLabels": ["Modal"], "group": "cr" } } }
      ]
    },
    {
      "title": "Graph",
      "layoutType": "graph",
      "labels": ["Kos Tetap"],
      "graphZones": [ { "id": "g_fc", "expectedLabels": ["Kos Tetap"] } ]
    },
    {
      "title": "Formula",
      "layoutType": "formula",
      "labels": ["Aset Semasa", "Liabiliti Semasa"],
      "structure": [
        { "id": "q1", "formulaTitle": "Nisbah Semasa", "zones": [
            { "id": "f1", "expectedLabels": ["Aset Semasa"] },
            { "id": "f2", "expectedLabels": ["Liabiliti Semasa"] }
        ] },
        { "id": "q2", "zones": [ { "id": "f3", "expectedLabels": ["Aset Semasa"] } ] }
      ]
    }
  ]
}"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_temp(MIXED);
    let catalog = Catalog::load_from_file(file.path()).unwrap();
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.levels[3].layout_type, LayoutKind::Formula);
}

#[test]
fn test_missing_file_is_catalog_error() {
    let err = Catalog::load_from_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, LedgerError::Catalog(_)));
}

#[test]
fn test_malformed_json_rejected() {
    let err = Catalog::from_json("{ \"levels\": [ {").unwrap_err();
    assert!(matches!(err, LedgerError::Json(_)));
}

#[test]
fn test_empty_catalog_rejected() {
    assert!(Catalog::from_json(r#"{ "levels": [] }"#).is_err());
}

#[test]
fn test_from_reader() {
    let catalog = Catalog::from_reader(MIXED.as_bytes()).unwrap();
    assert_eq!(catalog.len(), 4);
}

#[rstest]
#[case(0, &["s1", "spacer", "s2"], 2)]
#[case(1, &["dr1", "cr1"], 2)]
#[case(2, &["g_fc"], 1)]
#[case(3, &["f1", "f2", "f3"], 3)]
fn test_slot_aggregation(
    #[case] level: usize,
    #[case] ids: &[&str],
    #[case] required: usize,
) {
    let catalog = Catalog::from_json(MIXED).unwrap();
    let plan = catalog.plan(level).unwrap();
    let got: Vec<&str> = plan.slots.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(got, ids);
    assert_eq!(plan.slots.required_count(), required);
}

#[test]
fn test_accepted_labels_deduplicated() {
    let catalog = Catalog::from_json(MIXED).unwrap();
    let plan = catalog.plan(0).unwrap();
    assert_eq!(plan.slots.get("s2").unwrap().accepted_labels, vec!["Belian"]);
    assert!(plan.slots.get("spacer").unwrap().has_placeholder);
    assert!(!plan.slots.get("spacer").unwrap().is_required());
}

#[test]
fn test_formula_questions() {
    let catalog = Catalog::from_json(MIXED).unwrap();
    let plan = catalog.plan(3).unwrap();
    assert!(plan.is_formula());
    assert_eq!(plan.questions, vec![vec!["f1", "f2"], vec!["f3"]]);
    assert_eq!(plan.slots.get("f3").unwrap().question, Some(1));
}

#[test]
fn test_level_out_of_range() {
    let catalog = Catalog::from_json(MIXED).unwrap();
    assert!(catalog.level(4).is_err());
    assert!(catalog.plan(99).is_err());
}

#[test]
fn test_validate_reports_duplicates_and_unused() {
    let json = r#"{ "levels": [
      { "title": "Broken", "layoutType": "statement", "labels": ["A"],
        "structure": [ { "id": "r", "zones": [
            { "id": "x", "expectedLabels": ["A"] },
            { "id": "x", "expectedLabels": ["A"] } ] } ] },
      { "title": "Loose", "layoutType": "statement", "labels": ["A", "Z"],
        "structure": [ { "id": "r", "zones": [
            { "id": "a", "expectedLabels": ["A"] },
            { "id": "b", "expectedLabels": ["B"] } ] } ] },
      { "title": "Empty", "layoutType": "graph", "labels": ["A"], "graphZones": [] }
    ] }"#;
    let catalog = Catalog::from_json(json).unwrap();
    let report = catalog.validate();

    assert!(!report.is_ok());
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors[0].contains("duplicate slot id 'x'"));
    assert!(report.errors[1].starts_with("Level 3"));
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings.iter().any(|w| w.contains("slot 'b'")));
    assert!(report.warnings.iter().any(|w| w.contains("label 'Z'")));
}

#[test]
fn test_formula_question_without_slots_is_error() {
    let json = r#"{ "levels": [
      { "title": "F", "layoutType": "formula", "labels": ["A"],
        "structure": [
          { "id": "q1", "zones": [ { "id": "f1", "expectedLabels": ["A"] } ] },
          { "id": "q2", "zones": [ { "id": "f2", "placeholder": "2" } ] } ] }
    ] }"#;
    let catalog = Catalog::from_json(json).unwrap();
    assert!(catalog.plan(0).is_err());
}

#[test]
fn test_bundled_catalog_is_valid() {
    let catalog = Catalog::load_from_file(bundled_path()).unwrap();
    let report = catalog.validate();
    assert!(report.is_ok(), "errors: {:?}", report.errors);

    // every layout kind is represented
    for kind in LayoutKind::iter() {
        assert!(
            catalog.levels.iter().any(|l| l.layout_type == kind),
            "no {} level bundled",
            kind
        );
    }
    for idx in 0..catalog.len() {
        assert!(catalog.plan(idx).unwrap().slots.required_count() > 0);
    }
}

#[test]
fn test_layout_kind_parses_from_str() {
    assert_eq!("ledger".parse::<LayoutKind>().unwrap(), LayoutKind::Ledger);
    assert_eq!(LayoutKind::Formula.to_string(), "formula");
}
