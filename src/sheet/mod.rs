//! 表格数据区定位与提取

pub mod cell;
pub mod extractor;
pub mod header;
pub mod workbook;

pub use cell::coerce_cell;
pub use extractor::{Extraction, RegionExtractor, ScanState, SheetScan};
pub use header::locate_header;
pub use workbook::{Sheet, Workbook};
