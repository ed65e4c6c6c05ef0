//! The coin ledger: an append-only log of earnings and expenses.
//!
//! # Design
//!
//! - **Append-only**: entries are never modified or deleted.
//! - **All-or-nothing**: a rejected earn or spend leaves no trace.
//! - **Integer coins**: balances are `u64`; a balance can never go negative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use fishfarm_types::LedgerEntryId;

use crate::audit::{self, AuditResult};
use crate::{CoinLedger, LedgerError};

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Direction of a coin movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Coins entered the farm.
    Earn,
    /// Coins left the farm.
    Spend,
}

/// A single recorded coin movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry identifier.
    pub id: LedgerEntryId,
    /// Simulation day the movement happened on.
    pub day: u64,
    /// Earn or spend.
    pub kind: EntryKind,
    /// Coins moved. Always positive.
    pub amount: u64,
    /// Short reason tag (e.g. `SALE Carpa`, `BUY animal food`).
    pub reason: String,
    /// Balance immediately after this entry was applied.
    pub balance_after: u64,
    /// Wall-clock time the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// The farm's coin ledger.
///
/// Holds the running balance and every entry that produced it. The current
/// simulation day is stamped onto new entries; the driver moves it forward
/// with [`Ledger::set_day`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Balance before the first entry.
    starting_balance: u64,
    /// Current balance.
    balance: u64,
    /// Day stamped on new entries.
    day: u64,
    /// All entries, in insertion order.
    entries: Vec<LedgerEntry>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Ledger {
    /// Create an empty ledger holding `starting_balance` coins.
    pub const fn new(starting_balance: u64) -> Self {
        Self {
            starting_balance,
            balance: starting_balance,
            day: 0,
            entries: Vec::new(),
        }
    }

    /// Return the number of entries in the ledger.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the ledger has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Balance the ledger started with.
    pub const fn starting_balance(&self) -> u64 {
        self.starting_balance
    }

    /// Day stamped on new entries.
    pub const fn day(&self) -> u64 {
        self.day
    }

    /// Set the day stamped on new entries.
    pub const fn set_day(&mut self, day: u64) {
        self.day = day;
    }

    /// Validate and apply one movement, appending its entry.
    fn apply(&mut self, kind: EntryKind, amount: u64, reason: String) -> Result<u64, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let balance_after = match kind {
            EntryKind::Earn => self
                .balance
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?,
            EntryKind::Spend => {
                self.balance
                    .checked_sub(amount)
                    .ok_or(LedgerError::InsufficientFunds {
                        requested: amount,
                        available: self.balance,
                    })?
            }
        };

        debug!(day = self.day, ?kind, amount, balance_after, reason = %reason, "Ledger entry");

        self.entries.push(LedgerEntry {
            id: LedgerEntryId::new(),
            day: self.day,
            kind,
            amount,
            reason,
            balance_after,
            recorded_at: Utc::now(),
        });
        self.balance = balance_after;
        Ok(balance_after)
    }

    /// Return all entries for a given day.
    pub fn entries_for_day(&self, day: u64) -> Vec<&LedgerEntry> {
        self.entries.iter().filter(|e| e.day == day).collect()
    }

    /// Return all entries, in insertion order.
    pub fn all_entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Sum of all earnings.
    pub fn total_earned(&self) -> u64 {
        self.total_of(EntryKind::Earn)
    }

    /// Sum of all expenses.
    pub fn total_spent(&self) -> u64 {
        self.total_of(EntryKind::Spend)
    }

    fn total_of(&self, kind: EntryKind) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .fold(0_u64, |acc, e| acc.saturating_add(e.amount))
    }

    /// Verify the balance law over the whole log.
    pub fn audit(&self) -> AuditResult {
        audit::verify_balance(self.starting_balance, &self.entries, self.balance)
    }
}

impl CoinLedger for Ledger {
    fn earn(&mut self, amount: u64, reason: &str) -> Result<u64, LedgerError> {
        self.apply(EntryKind::Earn, amount, reason.to_owned())
    }

    fn spend(&mut self, amount: u64, reason: &str) -> Result<u64, LedgerError> {
        self.apply(EntryKind::Spend, amount, reason.to_owned())
    }

    fn balance(&self) -> u64 {
        self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ledger_is_empty() {
        let ledger = Ledger::new(50);
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
        assert_eq!(ledger.balance(), 50);
    }

    #[test]
    fn earn_increases_balance() {
        let mut ledger = Ledger::new(0);
        assert_eq!(ledger.earn(40, "SALE Carpa"), Ok(40));
        assert_eq!(ledger.balance(), 40);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn spend_decreases_balance() {
        let mut ledger = Ledger::new(100);
        assert_eq!(ledger.spend(30, "BUY food"), Ok(70));
        assert_eq!(ledger.balance(), 70);
    }

    #[test]
    fn overspend_rejected_without_mutation() {
        let mut ledger = Ledger::new(10);
        let result = ledger.spend(11, "BUY Rodaballo");
        assert_eq!(
            result,
            Err(LedgerError::InsufficientFunds {
                requested: 11,
                available: 10,
            })
        );
        assert_eq!(ledger.balance(), 10);
        assert!(ledger.is_empty());
    }

    #[test]
    fn zero_amount_rejected() {
        let mut ledger = Ledger::new(10);
        assert_eq!(ledger.earn(0, "SALE"), Err(LedgerError::ZeroAmount));
        assert_eq!(ledger.spend(0, "BUY"), Err(LedgerError::ZeroAmount));
        assert!(ledger.is_empty());
    }

    #[test]
    fn earn_overflow_rejected() {
        let mut ledger = Ledger::new(u64::MAX);
        assert_eq!(ledger.earn(1, "SALE"), Err(LedgerError::Overflow));
        assert_eq!(ledger.balance(), u64::MAX);
    }

    #[test]
    fn entries_are_stamped_with_day() {
        let mut ledger = Ledger::new(0);
        ledger.set_day(1);
        let _ = ledger.record_sale(40, "Carpa");
        ledger.set_day(2);
        let _ = ledger.record_sale(55, "Carpa plateada");
        let _ = ledger.record_purchase(20, "Carpa");

        assert_eq!(ledger.entries_for_day(1).len(), 1);
        assert_eq!(ledger.entries_for_day(2).len(), 2);
        assert_eq!(ledger.entries_for_day(3).len(), 0);
        assert!(ledger.entries_for_day(2).iter().all(|e| e.day == 2));
    }

    #[test]
    fn totals_split_by_kind() {
        let mut ledger = Ledger::new(100);
        let _ = ledger.record_sale(40, "Carpa");
        let _ = ledger.record_sale(60, "Dorada");
        let _ = ledger.record_purchase(30, "food");
        assert_eq!(ledger.total_earned(), 100);
        assert_eq!(ledger.total_spent(), 30);
        assert_eq!(ledger.balance(), 170);
    }

    #[test]
    fn reasons_are_tagged() {
        let mut ledger = Ledger::new(100);
        let _ = ledger.record_sale(40, "Carpa");
        let _ = ledger.record_purchase(20, "Dorada");
        let reasons: Vec<&str> = ledger.all_entries().iter().map(|e| e.reason.as_str()).collect();
        assert_eq!(reasons, vec!["SALE Carpa", "BUY Dorada"]);
    }

    #[test]
    fn tagged_helpers_work_through_trait_object() {
        let mut ledger = Ledger::new(50);
        {
            let coins: &mut dyn CoinLedger = &mut ledger;
            assert_eq!(coins.record_purchase(20, "Carpa"), Ok(30));
            assert_eq!(coins.record_sale(40, "Carpa"), Ok(70));
            assert_eq!(
                coins.record_purchase(100, "Rodaballo"),
                Err(LedgerError::InsufficientFunds {
                    requested: 100,
                    available: 70,
                })
            );
        }
        let reasons: Vec<&str> = ledger.all_entries().iter().map(|e| e.reason.as_str()).collect();
        assert_eq!(reasons, vec!["BUY Carpa", "SALE Carpa"]);
    }

    #[test]
    fn ledger_roundtrips_through_json() {
        let mut ledger = Ledger::new(10);
        let _ = ledger.record_sale(40, "Carpa");
        let json = serde_json::to_string(&ledger).ok();
        let restored: Option<Ledger> = json.and_then(|j| serde_json::from_str(&j).ok());
        assert_eq!(restored, Some(ledger));
    }
}
