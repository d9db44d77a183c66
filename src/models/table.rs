use crate::models::HeaderSpec;

/// 从表格中截取出的数据区
///
/// 每行恰好 `header.len()` 个已去除首尾空白的单元格。
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTable {
    pub header: HeaderSpec,
    pub rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    pub fn new(header: HeaderSpec) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 按列序号取整列
    pub fn column(&self, index: usize) -> Option<Vec<String>> {
        if index >= self.header.len() {
            return None;
        }
        Some(self.rows.iter().map(|r| r[index].clone()).collect())
    }

    /// 按列名取整列
    pub fn column_by_name(&self, name: &str) -> Option<Vec<String>> {
        self.header.position(name).and_then(|idx| self.column(idx))
    }
}

/// 订单号列与金额列的位置
///
/// 序号超出行宽时按空单元格处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyColumns {
    pub key: usize,
    pub amount: usize,
}

impl KeyColumns {
    /// 订单号等于 `key` 的第一行
    pub fn find_row<'a>(&self, table: &'a ExtractedTable, key: &str) -> Option<&'a [String]> {
        table
            .rows
            .iter()
            .find(|r| self.key_of(r) == key)
            .map(|r| r.as_slice())
    }

    pub fn key_of<'a>(&self, row: &'a [String]) -> &'a str {
        row.get(self.key).map(String::as_str).unwrap_or_default()
    }

    pub fn amount_of<'a>(&self, row: &'a [String]) -> &'a str {
        row.get(self.amount).map(String::as_str).unwrap_or_default()
    }
}
