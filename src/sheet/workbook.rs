use crate::error::CheckResult;
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 一个表单的所有行
///
/// 行列号均从表单已用区域的左上角开始，从 0 计数。
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<Data>>,
    width: usize,
    origin: (u32, u32),
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Data>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            name: name.into(),
            rows,
            width,
            origin: (0, 0),
        }
    }

    pub fn from_range(name: impl Into<String>, range: &Range<Data>) -> Self {
        let rows = range.rows().map(|r| r.to_vec()).collect();
        let mut sheet = Self::new(name, rows);
        sheet.width = sheet.width.max(range.width());
        sheet.origin = range.start().unwrap_or((0, 0));
        sheet
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Data]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// 列范围
    pub fn width(&self) -> usize {
        self.width
    }

    /// 行号转为 Excel 中的行号 (从 1 开始)
    pub fn excel_row(&self, i: usize) -> usize {
        self.origin.0 as usize + i + 1
    }

    pub fn excel_col(&self, k: usize) -> usize {
        self.origin.1 as usize + k + 1
    }
}

/// 已打开的工作簿, 按需读取表单
pub struct Workbook {
    inner: Sheets<BufReader<File>>,
    names: Vec<String>,
}

impl Workbook {
    pub fn open(path: impl AsRef<Path>) -> CheckResult<Self> {
        let path = path.as_ref();
        tracing::info!("加载数据文件: {}", path.display());
        let inner = open_workbook_auto(path)?;
        let names = inner.sheet_names().to_vec();
        Ok(Self { inner, names })
    }

    pub fn sheet(&mut self, name: &str) -> CheckResult<Sheet> {
        let range = self.inner.worksheet_range(name)?;
        Ok(Sheet::from_range(name, &range))
    }

    /// 按工作簿顺序逐个读取表单
    pub fn sheets(&mut self) -> impl Iterator<Item = CheckResult<Sheet>> + '_ {
        let names = self.names.clone();
        names.into_iter().map(move |name| self.sheet(&name))
    }
}
