use crate::config::AppConfig;
use crate::db::{create_pool, queries};
use crate::error::CheckResult;
use crate::models::{ExtractedTable, KeyColumns, Report};
use crate::service::archive::plan_archive;
use crate::service::dedup::dedupe;
use crate::service::reconcile::{ReconciliationEngine, SourceRecords};
use bigdecimal::BigDecimal;
use sqlx::PgPool;

/// 三个数据库连接池
pub struct Databases {
    pub store: PgPool,
    pub erp: PgPool,
    pub archive: PgPool,
}

impl Databases {
    /// 依次连接, 任一失败即返回
    pub async fn connect(config: &AppConfig) -> CheckResult<Self> {
        tracing::info!("初始化数据库连接 ...");
        let store = create_pool(&config.databases.store, &config.pool).await?;
        let erp = create_pool(&config.databases.erp, &config.pool).await?;
        let archive = create_pool(&config.databases.archive, &config.pool).await?;
        Ok(Self {
            store,
            erp,
            archive,
        })
    }
}

/// 一次核对的结果
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub report: Report,
    /// 应收总金额
    pub total: BigDecimal,
    /// 归档写入的行数; 未归档或写入失败时为 None
    pub archived_rows: Option<u64>,
}

/// 订单号去重；有重复时写入报告并返回去重后的列表
pub fn prepare_keys(table: &ExtractedTable, columns: KeyColumns, report: &mut Report) -> Vec<String> {
    tracing::info!("检查重复项 ...");
    let keys: Vec<String> = table
        .rows
        .iter()
        .map(|r| columns.key_of(r).to_string())
        .collect();

    let dedup = dedupe(&keys);
    if dedup.has_duplicates() {
        dedup.report_into(report);
        dedup.unique
    } else {
        keys
    }
}

/// 订单号 -> 应收单号
pub fn ar_doc_numbers(keys: &[String], prefix: &str) -> Vec<String> {
    keys.iter().map(|k| format!("{prefix}{k}")).collect()
}

/// 定金退还数据核对服务
///
/// 所有查询按顺序执行，任一查询失败即终止。
pub struct DepositChecker {
    dbs: Databases,
    columns: KeyColumns,
    ar_doc_prefix: String,
}

impl DepositChecker {
    pub fn new(dbs: Databases, columns: KeyColumns, ar_doc_prefix: impl Into<String>) -> Self {
        Self {
            dbs,
            columns,
            ar_doc_prefix: ar_doc_prefix.into(),
        }
    }

    pub async fn run(&self, table: &ExtractedTable, archive: bool) -> CheckResult<CheckOutcome> {
        let mut report = Report::new();
        let keys = prepare_keys(table, self.columns, &mut report);
        let engine = ReconciliationEngine::new(table, self.columns, &keys);

        tracing::info!("查询需要核对的订单信息 ...");
        let orders = queries::list_orders(&self.dbs.store, &keys).await?;
        tracing::info!("找到源单据条数: {}", orders.len());

        let lot_codes = engine.lot_codes(&orders);
        let lots = if lot_codes.is_empty() {
            Vec::new()
        } else {
            let codes: Vec<String> = lot_codes.iter().map(|l| l.lot_code.clone()).collect();
            tracing::info!("在ERP系统查询总编号是否存在: {:?}", codes);
            queries::list_lots(&self.dbs.erp, &codes).await?
        };

        tracing::info!("在ERP系统查询应收单 ...");
        let doc_nos = ar_doc_numbers(&keys, &self.ar_doc_prefix);
        let ar = queries::sum_ar_bills(&self.dbs.erp, &doc_nos).await?;

        tracing::info!("检查历史归档中是否存在源数据 ...");
        let archived = queries::list_archived(&self.dbs.archive, &keys).await?;

        let sources = SourceRecords {
            orders,
            lots,
            ar,
            archived,
        };
        let result = engine.run(&sources, report);

        let archived_rows = if archive {
            self.archive(table, &keys, &sources).await
        } else {
            tracing::info!("不需要归档，处理结束");
            None
        };

        Ok(CheckOutcome {
            report: result.report,
            total: result.total,
            archived_rows,
        })
    }

    /// 写入归档; 失败只记录日志
    async fn archive(&self, table: &ExtractedTable, keys: &[String], sources: &SourceRecords) -> Option<u64> {
        tracing::info!("归档当前源数据 ...");
        let rows = plan_archive(table, self.columns, keys, &sources.archived);
        if rows.is_empty() {
            tracing::info!("历史归档中已存在所有数据，没有需要归档的数据");
            return Some(0);
        }

        match queries::insert_archive(&self.dbs.archive, &rows).await {
            Ok(affected) => {
                tracing::info!("已归档数据条数: {}", affected);
                Some(affected)
            }
            Err(e) => {
                tracing::error!("写入归档库时出错: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Finding, HeaderSpec};

    fn table(keys: &[&str]) -> ExtractedTable {
        ExtractedTable {
            header: HeaderSpec::new(vec!["money".into(), "order".into()], "END").unwrap(),
            rows: keys.iter().map(|k| vec!["1".to_string(), k.to_string()]).collect(),
        }
    }

    #[test]
    fn duplicates_replace_key_list_and_are_reported() {
        let t = table(&["1001", "1002", "1001"]);
        let mut report = Report::new();
        let keys = prepare_keys(&t, KeyColumns { key: 1, amount: 0 }, &mut report);

        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"1001".to_string()) && keys.contains(&"1002".to_string()));
        assert_eq!(
            report.findings(),
            &[Finding::DuplicateKey {
                key: "1001".into(),
                count: 2
            }]
        );
    }

    #[test]
    fn unique_keys_are_kept_as_is() {
        let t = table(&["1002", "1001"]);
        let mut report = Report::new();
        let keys = prepare_keys(&t, KeyColumns { key: 1, amount: 0 }, &mut report);
        assert_eq!(keys, vec!["1002", "1001"]);
        assert!(report.is_empty());
    }

    #[test]
    fn ar_doc_numbers_are_prefixed() {
        let keys = vec!["1001".to_string(), "1002".to_string()];
        assert_eq!(ar_doc_numbers(&keys, "SHAR-"), vec!["SHAR-1001", "SHAR-1002"]);
    }
}
