use crate::reports;
use ledgerforge::catalog::Catalog;
use tracing::warn;

/// Prints the audit. Returns false when any level is unplayable.
pub fn run(catalog: &Catalog) -> bool {
    println!("\n🔎 === CATALOG AUDIT === 🔎");
    let report = catalog.validate();
    reports::print_validation_report(&report);

    if !report.warnings.is_empty() {
        warn!("{} catalog warnings", report.warnings.len());
    }

    if report.is_ok() {
        println!("✅ {} levels OK", catalog.len());
        true
    } else {
        println!("❌ {} errors", report.errors.len());
        false
    }
}
