pub mod archive;
pub mod checker;
pub mod dedup;
pub mod reconcile;

pub use archive::plan_archive;
pub use checker::{CheckOutcome, Databases, DepositChecker};
pub use dedup::{dedupe, Dedup};
pub use reconcile::{Reconciliation, ReconciliationEngine, SourceRecords};
