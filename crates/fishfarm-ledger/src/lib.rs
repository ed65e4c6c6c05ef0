//! Coin ledger for the fish farm simulation.
//!
//! Every coin that enters the farm (fish sales) or leaves it (fish, food,
//! and upgrade purchases) passes through this ledger. The simulation core
//! never touches a balance directly; it only calls [`CoinLedger::earn`] and
//! [`CoinLedger::spend`].
//!
//! # Architecture
//!
//! - [`ledger`] -- The [`Ledger`] struct: append-only log plus running balance.
//! - [`audit`] -- Balance verification and anomaly reporting.
//!
//! # Balance Law
//!
//! ```text
//! starting_balance + sum(earn) - sum(spend) == balance
//! ```
//!
//! Every entry also records the balance after it was applied, so a
//! corrupted or hand-edited log is caught entry by entry.
//!
//! # Usage
//!
//! ```
//! use fishfarm_ledger::{AuditResult, CoinLedger, Ledger};
//!
//! let mut ledger = Ledger::new(100);
//! ledger.record_sale(40, "Carpa").ok();
//! ledger.record_purchase(25, "Dorada").ok();
//!
//! assert_eq!(ledger.balance(), 115);
//! assert_eq!(ledger.audit(), AuditResult::Balanced);
//! ```

pub mod audit;
pub mod ledger;

// Re-export primary types at crate root.
pub use audit::AuditResult;
pub use ledger::{EntryKind, Ledger, LedgerEntry};

// ---------------------------------------------------------------------------
// Coin contract
// ---------------------------------------------------------------------------

/// The earn/spend contract the simulation core depends on.
///
/// Implementations own the balance. Both operations either apply fully and
/// return the new balance, or fail without changing anything.
pub trait CoinLedger {
    /// Credit `amount` coins.
    fn earn(&mut self, amount: u64, reason: &str) -> Result<u64, LedgerError>;

    /// Debit `amount` coins. Fails if the balance does not cover it.
    fn spend(&mut self, amount: u64, reason: &str) -> Result<u64, LedgerError>;

    /// Current balance.
    fn balance(&self) -> u64;

    /// Credit the sale of harvested fish, tagged `SALE <species>`.
    fn record_sale(&mut self, amount: u64, species: &str) -> Result<u64, LedgerError> {
        self.earn(amount, &format!("SALE {species}"))
    }

    /// Debit a purchase, tagged `BUY <what>`.
    fn record_purchase(&mut self, amount: u64, what: &str) -> Result<u64, LedgerError> {
        self.spend(amount, &format!("BUY {what}"))
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording coin movements.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Amount must be strictly positive.
    #[error("ledger amount must be non-zero")]
    ZeroAmount,

    /// The balance does not cover the requested spend.
    #[error("insufficient funds: wanted {requested} coins but only have {available}")]
    InsufficientFunds {
        /// The amount the caller attempted to spend.
        requested: u64,
        /// The balance at the time of the attempt.
        available: u64,
    },

    /// Crediting the amount would overflow the balance.
    #[error("ledger balance overflow")]
    Overflow,
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A balance law violation detected by [`Ledger::audit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// Balance the entries say the ledger should hold.
    pub expected_balance: i128,
    /// Balance the ledger actually holds.
    pub actual_balance: u64,
    /// Index of the first entry whose `balance_after` does not chain, if any.
    pub first_bad_entry: Option<usize>,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
