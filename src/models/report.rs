use crate::error::CheckResult;
use bigdecimal::BigDecimal;
use std::fmt;
use std::path::Path;

/// 报告中的一条核对发现
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// 源数据中订单号重复
    DuplicateKey { key: String, count: usize },
    /// 数据库中找到的单据数与源数据行数不一致
    CountMismatch { found: usize, extracted: usize },
    /// 订单未终止
    UnterminatedOrder { key: String },
    /// 批号在 ERP 中已存在, owner 为 None 表示无法关联到订单
    LotFound { lot_code: String, owner: Option<String> },
    /// 应收金额无法解析
    ArAmountFormat { doc_no: String, raw: String, error: String },
    /// 源数据定金金额无法解析
    SourceAmountFormat { key: String, raw: String, error: String },
    /// 应收金额与源数据金额不一致 (精确比较)
    AmountMismatch {
        doc_no: String,
        ar_amount: BigDecimal,
        key: String,
        source_amount: BigDecimal,
    },
    /// 应收单找不到对应的源订单
    OrphanAr { doc_no: String },
    /// 应收总金额
    GrandTotal { total: BigDecimal },
    /// 历史归档中已存在的单据数
    AlreadyArchived { count: usize },
}

impl Finding {
    /// 导出用的类别名
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::CountMismatch { .. } => "count_mismatch",
            Self::UnterminatedOrder { .. } => "unterminated_order",
            Self::LotFound { .. } => "lot_found",
            Self::ArAmountFormat { .. } => "ar_amount_format",
            Self::SourceAmountFormat { .. } => "source_amount_format",
            Self::AmountMismatch { .. } => "amount_mismatch",
            Self::OrphanAr { .. } => "orphan_ar",
            Self::GrandTotal { .. } => "grand_total",
            Self::AlreadyArchived { .. } => "already_archived",
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey { key, count } => write!(f, "发现重复项: {key}, 数量: {count}"),
            Self::CountMismatch { found, extracted } => {
                write!(f, "找到的单据数和源数据不匹配: db({found}), src({extracted})")
            }
            Self::UnterminatedOrder { key } => write!(f, "发现未终止的订单: {key}"),
            Self::LotFound { lot_code, owner } => write!(
                f,
                "在ERP系统中找到总编号: {lot_code}, 所属订单号: {}",
                owner.as_deref().unwrap_or("<未知>")
            ),
            Self::ArAmountFormat { doc_no, raw, error } => {
                write!(f, "应收金额格式错误: {doc_no} ('{raw}'): {error}")
            }
            Self::SourceAmountFormat { key, raw, error } => {
                write!(f, "来源金额格式不正确: {key} ('{raw}'): {error}")
            }
            Self::AmountMismatch {
                doc_no,
                ar_amount,
                key,
                source_amount,
            } => write!(
                f,
                "定金应收金额与源数据金额不一致(精确比较): {doc_no}\t({ar_amount}),\t{key}\t({source_amount})"
            ),
            Self::OrphanAr { doc_no } => write!(f, "没有找到应收单对应的来源订单号: {doc_no}"),
            Self::GrandTotal { total } => write!(f, "应收总金额为: {total}"),
            Self::AlreadyArchived { count } => write!(f, "发现已归档过的单据 {count} 个"),
        }
    }
}

/// 只追加的核对报告，在各阶段之间显式传递
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条发现并记录日志
    pub fn push(&mut self, finding: Finding) {
        match &finding {
            Finding::GrandTotal { .. } | Finding::AlreadyArchived { .. } | Finding::LotFound { .. } => {
                tracing::info!("{}", finding)
            }
            _ => tracing::warn!("{}", finding),
        }
        self.findings.push(finding);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// 满足条件的发现数量
    pub fn count(&self, pred: impl Fn(&Finding) -> bool) -> usize {
        self.findings.iter().filter(|f| pred(*f)).count()
    }

    /// 导出为 CSV: index, kind, message
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> CheckResult<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(["index", "kind", "message"])?;
        for (i, finding) in self.findings.iter().enumerate() {
            writer.write_record(&[(i + 1).to_string(), finding.kind().to_string(), finding.to_string()])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// 导出到文件
    pub fn export_csv(&self, path: impl AsRef<Path>) -> CheckResult<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "数据检查报告")?;
        writeln!(f, "{}", "-".repeat(87))?;
        for (i, finding) in self.findings.iter().enumerate() {
            writeln!(f, "\t{}\t{}", i + 1, finding)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_numbered_list_in_append_order() {
        let mut report = Report::new();
        report.push(Finding::UnterminatedOrder { key: "1001".into() });
        report.push(Finding::OrphanAr { doc_no: "SHAR-9".into() });

        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("\t1\t") && lines[2].contains("1001"));
        assert!(lines[3].starts_with("\t2\t") && lines[3].contains("SHAR-9"));
    }

    #[test]
    fn unknown_lot_owner_is_tagged() {
        let f = Finding::LotFound {
            lot_code: "L-7".into(),
            owner: None,
        };
        assert!(f.to_string().contains("<未知>"));
    }

    #[test]
    fn csv_export_has_header_and_one_line_per_finding() {
        let mut report = Report::new();
        report.push(Finding::CountMismatch { found: 2, extracted: 3 });
        report.push(Finding::AlreadyArchived { count: 1 });

        let mut buf = Vec::new();
        report.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "index,kind,message");
        assert!(lines[1].starts_with("1,count_mismatch,"));
        assert!(lines[2].starts_with("2,already_archived,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn export_to_file_and_unwritable_path() {
        let mut report = Report::new();
        report.push(Finding::OrphanAr { doc_no: "SHAR-1".into() });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        report.export_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("index,kind,message"));
        assert!(text.contains("orphan_ar"));

        let err = report.export_csv(dir.path().join("missing").join("report.csv")).unwrap_err();
        assert!(matches!(err, crate::error::CheckError::Io(_)));
    }
}
