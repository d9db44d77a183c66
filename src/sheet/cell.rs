use calamine::{Data, DataType};
use chrono::NaiveDateTime;

/// 日期时间单元格的输出格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 单元格原始文本 (去除首尾空白)
pub fn raw_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// 单元格转字符串
///
/// 日期时间按工作簿自身的序列日期基准解释 (不带时区)，格式化为
/// `YYYY-MM-DD HH:MM:SS`；无法转换时退回原始文本。
pub fn coerce_cell(cell: &Data) -> String {
    if cell.is_datetime() || cell.is_datetime_iso() {
        let dt: Option<NaiveDateTime> = cell.as_datetime();
        if let Some(dt) = dt {
            return dt.format(DATETIME_FORMAT).to_string();
        }
    }
    raw_text(cell)
}
