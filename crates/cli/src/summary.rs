use lsif_bundle_core::BundleSummary;
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub(crate) struct SummaryRow {
    #[tabled(rename = "Table")]
    table: &'static str,
    #[tabled(rename = "Entries")]
    entries: usize,
}

pub(crate) fn summary_rows(summary: &BundleSummary) -> Vec<SummaryRow> {
    let row = |table, entries| SummaryRow { table, entries };
    vec![
        row("documents", summary.documents),
        row("result chunks", summary.result_chunks),
        row("definitions", summary.definitions),
        row("references", summary.references),
        row("packages", summary.packages),
        row("package references", summary.package_references),
    ]
}

pub(crate) fn print_summary(summary: &BundleSummary) {
    println!("Result chunks allotted: {}", summary.num_result_chunks);
    println!("{}", Table::new(summary_rows(summary)));
}
