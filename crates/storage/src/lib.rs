//! In-process ledgers backing the cabinet: stock levels, the bounded audit
//! ring and per-day dispensed units. Nothing here survives a restart.

mod audit;
mod inventory;
pub mod seed;
mod usage;

pub use audit::{AuditLog, AuditReceipt, NewDispense, DEFAULT_AUDIT_RING_SIZE};
pub use inventory::{DebitReceipt, InventoryLedger, LedgerError};
pub use usage::{UsageLedger, UsageReceipt};
