use crate::models::{
    ArRecord, ArchivedRecord, ExtractedTable, Finding, KeyColumns, LotCode, LotRecord,
    OrderRecord, Report,
};
use bigdecimal::{BigDecimal, ParseBigDecimalError, Zero};
use std::str::FromStr;

/// 四个外部数据源的查询结果
#[derive(Debug, Clone, Default)]
pub struct SourceRecords {
    pub orders: Vec<OrderRecord>,
    pub lots: Vec<LotRecord>,
    pub ar: Vec<ArRecord>,
    pub archived: Vec<ArchivedRecord>,
}

/// 核对结果
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub report: Report,
    /// 应收总金额 (无法解析的金额不计入)
    pub total: BigDecimal,
}

/// 解析金额 (精确十进制)
pub fn parse_amount(raw: &str) -> Result<BigDecimal, ParseBigDecimalError> {
    BigDecimal::from_str(raw.trim())
}

/// 多数据源核对
///
/// 各阶段互不短路，发现的问题依次追加到报告中。
pub struct ReconciliationEngine<'a> {
    table: &'a ExtractedTable,
    columns: KeyColumns,
    keys: &'a [String],
}

impl<'a> ReconciliationEngine<'a> {
    /// `keys` 为去重后的订单号
    pub fn new(table: &'a ExtractedTable, columns: KeyColumns, keys: &'a [String]) -> Self {
        Self {
            table,
            columns,
            keys,
        }
    }

    pub fn run(&self, sources: &SourceRecords, mut report: Report) -> Reconciliation {
        self.check_count(&sources.orders, &mut report);

        let lots = self.check_termination(&sources.orders, &mut report);
        if lots.is_empty() {
            tracing::info!("没有关联的总编号");
        } else {
            self.check_lots(&lots, &sources.lots, &mut report);
        }

        let total = self.aggregate_ar(&sources.ar, &mut report);
        check_archive(&sources.archived, &mut report);

        Reconciliation { report, total }
    }

    /// 找到的单据数与源数据行数比较
    pub fn check_count(&self, orders: &[OrderRecord], report: &mut Report) {
        if orders.len() != self.table.len() {
            report.push(Finding::CountMismatch {
                found: orders.len(),
                extracted: self.table.len(),
            });
        }
    }

    /// 源数据中每个订单号对应的订单记录
    fn matching_orders<'o>(
        &self,
        orders: &'o [OrderRecord],
    ) -> impl Iterator<Item = (&'a str, &'o OrderRecord)> + 'o
    where
        'a: 'o,
    {
        let keys: &'a [String] = self.keys;
        keys.iter().flat_map(move |key| {
            orders
                .iter()
                .filter(move |r| r.order_number == *key)
                .map(move |r| (key.as_str(), r))
        })
    }

    /// 需要到 ERP 查询的批号
    pub fn lot_codes(&self, orders: &[OrderRecord]) -> Vec<LotCode> {
        self.matching_orders(orders)
            .filter_map(|(_, r)| {
                r.lot_code().map(|lot| LotCode {
                    order_key: r.order_number.clone(),
                    lot_code: lot.to_string(),
                })
            })
            .collect()
    }

    /// 检查未终止的订单，同时收集批号
    pub fn check_termination(&self, orders: &[OrderRecord], report: &mut Report) -> Vec<LotCode> {
        tracing::info!("搜索未终止的订单 ...");
        for (key, r) in self.matching_orders(orders) {
            if !r.is_closed() {
                report.push(Finding::UnterminatedOrder {
                    key: key.to_string(),
                });
            }
        }
        self.lot_codes(orders)
    }

    /// ERP 中已存在的批号，尽量关联到所属订单
    pub fn check_lots(&self, lots: &[LotCode], found: &[LotRecord], report: &mut Report) {
        for record in found {
            let owner = lots
                .iter()
                .find(|l| l.lot_code == record.lot_code.trim())
                .map(|l| l.order_key.clone());
            report.push(Finding::LotFound {
                lot_code: record.lot_code.clone(),
                owner,
            });
        }
    }

    /// 汇总应收金额并逐单核对源数据金额
    ///
    /// 应收单号包含源订单号即视为对应 (应收单号带前缀)。
    /// 金额精确比较, 不设容差。
    pub fn aggregate_ar(&self, records: &[ArRecord], report: &mut Report) -> BigDecimal {
        tracing::info!("核对各单应收明细金额，并计算总金额 ...");
        let mut total = BigDecimal::zero();

        for ar in records {
            let raw = ar.total_money.as_deref().unwrap_or_default();
            let ar_amount = match parse_amount(raw) {
                Ok(m) => {
                    total += &m;
                    Some(m)
                }
                Err(e) => {
                    report.push(Finding::ArAmountFormat {
                        doc_no: ar.doc_no.clone(),
                        raw: raw.to_string(),
                        error: e.to_string(),
                    });
                    None
                }
            };

            let mut found = false;
            for row in &self.table.rows {
                let key = self.columns.key_of(row);
                if key.is_empty() || !ar.doc_no.contains(key) {
                    continue;
                }
                found = true;

                let Some(ar_amount) = &ar_amount else {
                    continue;
                };
                let source_raw = self.columns.amount_of(row);
                match parse_amount(source_raw) {
                    Ok(source_amount) if source_amount != *ar_amount => {
                        report.push(Finding::AmountMismatch {
                            doc_no: ar.doc_no.clone(),
                            ar_amount: ar_amount.clone(),
                            key: key.to_string(),
                            source_amount,
                        });
                    }
                    Ok(_) => {}
                    Err(e) => report.push(Finding::SourceAmountFormat {
                        key: key.to_string(),
                        raw: source_raw.to_string(),
                        error: e.to_string(),
                    }),
                }
            }

            if !found {
                report.push(Finding::OrphanAr {
                    doc_no: ar.doc_no.clone(),
                });
            }
        }

        report.push(Finding::GrandTotal {
            total: total.clone(),
        });
        total
    }
}

/// 历史归档中已存在的单据，只报告数量
pub fn check_archive(archived: &[ArchivedRecord], report: &mut Report) {
    if archived.is_empty() {
        tracing::info!("在历史归档中没有发现当前源数据");
        return;
    }

    report.push(Finding::AlreadyArchived {
        count: archived.len(),
    });
    for row in archived {
        tracing::info!(
            "\t{}\t({})",
            row.doc_no,
            row.total_money.as_deref().unwrap_or_default()
        );
    }
}
