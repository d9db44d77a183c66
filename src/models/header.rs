use crate::error::{CheckError, CheckResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 表头定义：期望的列名序列 + 数据结束标记
///
/// 文本格式为 `列1, 列2, ..., 列N : 结束标记`，例如
/// `定金（元）, 销售订单号, 来源采购订单 : 合计`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSpec {
    pub columns: Vec<String>,
    pub end_marker: String,
}

impl HeaderSpec {
    pub fn new(columns: Vec<String>, end_marker: impl Into<String>) -> CheckResult<Self> {
        let end_marker = end_marker.into();
        let spec = Self { columns, end_marker };
        spec.validate()?;
        Ok(spec)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// 按列名查找列序号
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn validate(&self) -> CheckResult<()> {
        let invalid = |message: &str| CheckError::HeaderSpec {
            spec: self.to_string(),
            message: message.to_string(),
        };
        if self.columns.is_empty() {
            return Err(invalid("no columns defined"));
        }
        if self.columns.iter().any(|c| c.is_empty()) {
            return Err(invalid("empty column name"));
        }
        if self.end_marker.is_empty() {
            return Err(invalid("empty end-of-data marker"));
        }
        Ok(())
    }
}

impl FromStr for HeaderSpec {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let columns = parts.next().unwrap_or_default();
        let Some(end_marker) = parts.next() else {
            return Err(CheckError::HeaderSpec {
                spec: s.to_string(),
                message: "missing ':' before the end-of-data marker".to_string(),
            });
        };

        let columns = columns
            .split(',')
            .map(|c| c.trim().to_string())
            .collect::<Vec<_>>();
        Self::new(columns, end_marker.trim())
    }
}

impl fmt::Display for HeaderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.columns.join(", "), self.end_marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_columns_and_end_marker() {
        let spec: HeaderSpec = " 定金（元）, 销售订单号 ,专卖店 : 合计 ".parse().unwrap();
        assert_eq!(spec.columns, vec!["定金（元）", "销售订单号", "专卖店"]);
        assert_eq!(spec.end_marker, "合计");
        assert_eq!(spec.position("专卖店"), Some(2));
    }

    #[test]
    fn missing_colon_is_rejected() {
        let err = "A, B, C".parse::<HeaderSpec>().unwrap_err();
        assert!(matches!(err, CheckError::HeaderSpec { .. }));
    }

    #[test]
    fn empty_column_or_marker_is_rejected() {
        assert!("A, , C : END".parse::<HeaderSpec>().is_err());
        assert!("A, B :  ".parse::<HeaderSpec>().is_err());
        assert!(" : END".parse::<HeaderSpec>().is_err());
    }
}
