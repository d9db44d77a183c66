use crate::error::{CheckError, CheckResult};
use crate::models::{ExtractedTable, HeaderSpec};
use crate::sheet::cell::coerce_cell;
use crate::sheet::header::{cell_at, locate_header};
use crate::sheet::workbook::{Sheet, Workbook};
use std::convert::Infallible;
use std::path::Path;

/// 单个表单的扫描状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// 寻找表头
    SeekHeader,
    /// 读取数据
    CaptureData,
    /// 已找到数据结束标记
    Done,
}

/// 单个表单的扫描结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetScan {
    pub sheet: String,
    pub state: ScanState,
    /// 表头所在的 (行, 列)
    pub header_at: Option<(usize, usize)>,
    /// 本表单读取的数据行数
    pub rows: usize,
}

/// 提取结果
#[derive(Debug, Clone)]
pub struct Extraction {
    pub table: ExtractedTable,
    /// 已扫描的表单, 按工作簿顺序
    pub scans: Vec<SheetScan>,
}

impl Extraction {
    /// 最后一个被扫描表单的状态
    pub fn final_state(&self) -> Option<ScanState> {
        self.scans.last().map(|s| s.state)
    }

    /// 有数据行来自没有找到结束标记的表单
    pub fn is_unterminated(&self) -> bool {
        self.scans
            .iter()
            .any(|s| s.state == ScanState::CaptureData && s.rows > 0)
    }
}

/// 表格数据区提取器
///
/// 每个表单都从 [`ScanState::SeekHeader`] 开始；某个表单到达
/// [`ScanState::Done`] 后，其余表单不再读取。
#[derive(Debug, Clone)]
pub struct RegionExtractor {
    header: HeaderSpec,
    print_rows: bool,
}

impl RegionExtractor {
    pub fn new(header: HeaderSpec) -> Self {
        Self {
            header,
            print_rows: false,
        }
    }

    /// 逐行输出读取到的源数据
    pub fn print_rows(mut self, print_rows: bool) -> Self {
        self.print_rows = print_rows;
        self
    }

    /// 打开工作簿并提取数据区
    ///
    /// 没有提取到任何数据行时返回 [`CheckError::NoMatchingData`]。
    pub fn extract_workbook(&self, path: impl AsRef<Path>) -> CheckResult<Extraction> {
        let mut workbook = Workbook::open(path)?;
        let extraction = self.try_extract(workbook.sheets())?;

        if extraction.table.is_empty() {
            return Err(CheckError::NoMatchingData {
                header: self.header.columns.clone(),
            });
        }
        if extraction.is_unterminated() {
            tracing::warn!("部分数据读取到表单末尾仍未发现结束标记: {}", self.header.end_marker);
        }
        tracing::info!("已加载数据行数: {}", extraction.table.len());
        Ok(extraction)
    }

    pub fn extract<I>(&self, sheets: I) -> Extraction
    where
        I: IntoIterator<Item = Sheet>,
    {
        match self.try_extract(sheets.into_iter().map(Ok::<_, Infallible>)) {
            Ok(extraction) => extraction,
            Err(never) => match never {},
        }
    }

    /// 依次扫描表单, 直到某个表单扫描完成
    ///
    /// 表单按需读取，读取失败立即返回。
    pub fn try_extract<I, E>(&self, sheets: I) -> Result<Extraction, E>
    where
        I: IntoIterator<Item = Result<Sheet, E>>,
    {
        let mut table = ExtractedTable::new(self.header.clone());
        let mut scans = Vec::new();

        for (i, sheet) in sheets.into_iter().enumerate() {
            let sheet = sheet?;
            tracing::info!(
                "开始处理第 {} 个表单: {}, 行数: {}, 列数: {}",
                i + 1,
                sheet.name,
                sheet.height(),
                sheet.width()
            );

            let scan = self.scan_sheet(&sheet, &mut table.rows);
            let done = scan.state == ScanState::Done;
            match scan.state {
                ScanState::SeekHeader => tracing::warn!("表单 {} 没找到匹配的表头", sheet.name),
                ScanState::CaptureData => tracing::warn!("表单 {} 没有发现结束行", sheet.name),
                ScanState::Done => {
                    tracing::info!("已从表单 {} 加载数据完毕，忽略其它表单", sheet.name)
                }
            }
            scans.push(scan);
            if done {
                break;
            }
        }

        Ok(Extraction { table, scans })
    }

    /// 扫描单个表单，数据行追加到 `rows`
    pub fn scan_sheet(&self, sheet: &Sheet, rows: &mut Vec<Vec<String>>) -> SheetScan {
        let mut state = ScanState::SeekHeader;
        let mut header_at = None;
        let mut start_col = 0;
        let before = rows.len();

        for (j, row) in sheet.rows().enumerate() {
            match state {
                ScanState::SeekHeader => {
                    if let Some(col) = locate_header(row, sheet.width(), &self.header.columns) {
                        header_at = Some((j, col));
                        start_col = col;
                        state = ScanState::CaptureData;
                        tracing::info!(
                            "在第 {} 行匹配到表头，数据开始行号: {}，开始列号: {}",
                            sheet.excel_row(j),
                            sheet.excel_row(j + 1),
                            sheet.excel_col(col)
                        );
                    }
                }
                ScanState::CaptureData => {
                    let first = coerce_cell(cell_at(row, start_col));
                    if first.contains(&self.header.end_marker) {
                        tracing::info!("发现数据结束标记: {}", first);
                        state = ScanState::Done;
                        break;
                    }

                    let data: Vec<String> = (start_col..start_col + self.header.len())
                        .map(|k| coerce_cell(cell_at(row, k)))
                        .collect();
                    if self.print_rows {
                        tracing::info!("第 {} 行: {:?}", rows.len() - before + 1, data);
                    }
                    rows.push(data);
                }
                ScanState::Done => break,
            }
        }

        SheetScan {
            sheet: sheet.name.clone(),
            state,
            header_at,
            rows: rows.len() - before,
        }
    }
}
