use crate::reports;
use ledgerforge::catalog::Catalog;

pub fn run(catalog: &Catalog) {
    println!("\n📚 {} levels available", catalog.len());
    reports::print_level_table(catalog);
}
