pub mod header;
pub mod records;
pub mod report;
pub mod table;

pub use header::HeaderSpec;
pub use records::{ArRecord, ArchiveRow, ArchivedRecord, LotCode, LotRecord, OrderRecord};
pub use report::{Finding, Report};
pub use table::{ExtractedTable, KeyColumns};
