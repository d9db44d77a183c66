use crate::sheet::cell::raw_text;
use calamine::Data;

static EMPTY: Data = Data::Empty;

/// 按列号取单元格，越界视为空
pub fn cell_at(row: &[Data], col: usize) -> &Data {
    row.get(col).unwrap_or(&EMPTY)
}

/// 在一行中查找表头
///
/// 在 `width` 列范围内从左向右扫描，第一个非空单元格为起始列，
/// 从起始列开始逐个与 `expected` 精确比较；表头之后的列忽略。
/// 匹配成功返回起始列号。
pub fn locate_header(row: &[Data], width: usize, expected: &[String]) -> Option<usize> {
    if expected.is_empty() {
        return None;
    }

    let start = (0..width).find(|&k| !raw_text(cell_at(row, k)).is_empty())?;

    let matched = expected.iter().enumerate().all(|(i, want)| {
        let k = start + i;
        k < width && raw_text(cell_at(row, k)) == *want
    });

    matched.then_some(start)
}
