use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 门店系统中的销售订单 (定金单)
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_number: String,
    pub total_number: Option<String>,  // 总编号 (批号)
    pub ar_bill_code: Option<String>,
    pub closed_by: Option<String>,     // 终止人, 为空表示未终止
    pub closed_by_name: Option<String>,
    pub shop_name: Option<String>,
}

impl OrderRecord {
    pub fn is_closed(&self) -> bool {
        self.closed_by.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    pub fn lot_code(&self) -> Option<&str> {
        self.total_number.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// ERP 中已存在的批号
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct LotRecord {
    pub lot_code: String,
}

/// ERP 应收单汇总 (按单号合计金额)
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct ArRecord {
    pub doc_no: String,
    pub total_money: Option<String>,
}

/// 历史归档表中的记录
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct ArchivedRecord {
    pub doc_no: String,
    pub total_money: Option<String>,
}

/// (订单号, 批号)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotCode {
    pub order_key: String,
    pub lot_code: String,
}

/// 待归档的一行: (订单号, 定金金额)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRow {
    pub order_key: String,
    pub amount: String,
}
