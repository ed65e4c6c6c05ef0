//! Balance verification for the coin ledger.
//!
//! Two checks run over the entry log:
//!
//! 1. **Chain**: each entry's `balance_after` equals the previous balance
//!    plus (earn) or minus (spend) its amount.
//! 2. **Total**: `starting_balance + sum(earn) - sum(spend)` equals the
//!    balance the ledger reports.
//!
//! Entries produced by [`Ledger`](crate::Ledger) pass both by construction.
//! The audit matters for ledgers restored from a snapshot.

use crate::LedgerAnomaly;
use crate::ledger::{EntryKind, LedgerEntry};

/// The result of a ledger audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditResult {
    /// The log and the balance agree.
    Balanced,
    /// The log and the balance disagree.
    Anomaly(LedgerAnomaly),
}

impl AuditResult {
    /// Whether the audit passed.
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

/// Verify the chain and total checks over `entries`.
pub fn verify_balance(starting_balance: u64, entries: &[LedgerEntry], balance: u64) -> AuditResult {
    let mut running = i128::from(starting_balance);
    let mut first_bad_entry = None;

    for (index, entry) in entries.iter().enumerate() {
        let amount = i128::from(entry.amount);
        running = match entry.kind {
            EntryKind::Earn => running.saturating_add(amount),
            EntryKind::Spend => running.saturating_sub(amount),
        };

        if entry.amount == 0 || running != i128::from(entry.balance_after) {
            first_bad_entry = Some(index);
            break;
        }
    }

    if first_bad_entry.is_none() && running == i128::from(balance) {
        return AuditResult::Balanced;
    }

    let message = first_bad_entry.map_or_else(
        || format!("LEDGER_ANOMALY: entries sum to {running} but balance is {balance}"),
        |index| format!("LEDGER_ANOMALY: entry {index} does not chain from the previous balance"),
    );

    AuditResult::Anomaly(LedgerAnomaly {
        expected_balance: running,
        actual_balance: balance,
        first_bad_entry,
        message,
    })
}
