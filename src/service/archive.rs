use crate::models::{ArchiveRow, ArchivedRecord, ExtractedTable, KeyColumns};
use indexmap::IndexSet;

/// 生成需要归档的数据
///
/// 跳过历史归档中已存在的单号；每个单号取源数据中第一行的定金金额。
/// 归档表不变时重复执行得到空结果。
pub fn plan_archive(
    table: &ExtractedTable,
    columns: KeyColumns,
    keys: &[String],
    archived: &[ArchivedRecord],
) -> Vec<ArchiveRow> {
    let archived: IndexSet<&str> = archived.iter().map(|r| r.doc_no.trim()).collect();

    let mut rows = Vec::new();
    for key in keys {
        if archived.contains(key.as_str()) {
            tracing::info!("跳过历史归档中已存在的单据: {}", key);
            continue;
        }
        if let Some(row) = columns.find_row(table, key) {
            rows.push(ArchiveRow {
                order_key: key.clone(),
                amount: columns.amount_of(row).to_string(),
            });
        }
    }
    rows
}
