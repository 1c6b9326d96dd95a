//! In-process authoritative ledger
//!
//! Holds total supply, per-holder balances and the curve's reserve behind a
//! single ledger-wide lock. Reads take the lock briefly. Writes go through a
//! [`LedgerTxn`] that holds the lock for the whole trade, stages every
//! sub-mutation, and publishes them together on [`LedgerTxn::apply`]. Dropping
//! a transaction without applying it discards everything it staged.

use async_trait::async_trait;
use bonding_core::{Amount, CurveError, HolderId};
use bonding_ports::{LedgerReader, LedgerSnapshot, SnapshotSource, SourceResult};
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;

use crate::error::{MarketError, Result};

#[derive(Debug, Default)]
struct LedgerInner {
    supply: Amount,
    reserve: Amount,
    balances: HashMap<HolderId, Amount>,
}

/// Authoritative supply, balances and reserve
#[derive(Debug, Default)]
pub struct LedgerState {
    inner: Mutex<LedgerInner>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_supply(&self) -> Amount {
        self.inner.lock().supply
    }

    pub fn balance_of(&self, holder: &HolderId) -> Amount {
        self.inner
            .lock()
            .balances
            .get(holder)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    pub fn reserve_balance(&self) -> Amount {
        self.inner.lock().reserve
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let inner = self.inner.lock();
        LedgerSnapshot {
            supply: inner.supply,
            reserve: inner.reserve,
            holders: inner.balances.len(),
        }
    }

    /// All holders with a non-zero balance, sorted by id
    pub fn holders(&self) -> Vec<(HolderId, Amount)> {
        let inner = self.inner.lock();
        let mut holders: Vec<_> = inner
            .balances
            .iter()
            .map(|(h, b)| (h.clone(), *b))
            .collect();
        holders.sort();
        holders
    }

    /// Open a transaction, blocking until no other trade is in flight
    pub(crate) fn begin(&self) -> LedgerTxn<'_> {
        let guard = self.inner.lock();
        LedgerTxn {
            supply: guard.supply,
            reserve: guard.reserve,
            staged: HashMap::new(),
            guard,
        }
    }
}

impl LedgerReader for LedgerState {
    fn snapshot(&self) -> LedgerSnapshot {
        LedgerState::snapshot(self)
    }

    fn balance_of(&self, holder: &HolderId) -> Amount {
        LedgerState::balance_of(self, holder)
    }
}

#[async_trait]
impl SnapshotSource for LedgerState {
    async fn fetch_snapshot(&self) -> SourceResult<LedgerSnapshot> {
        Ok(self.snapshot())
    }

    fn name(&self) -> &str {
        "LedgerState"
    }
}

/// Exclusive, staged view of the ledger for one trade
pub(crate) struct LedgerTxn<'a> {
    guard: MutexGuard<'a, LedgerInner>,
    supply: Amount,
    reserve: Amount,
    staged: HashMap<HolderId, Amount>,
}

impl LedgerTxn<'_> {
    pub(crate) fn current_supply(&self) -> Amount {
        self.supply
    }

    pub(crate) fn reserve_balance(&self) -> Amount {
        self.reserve
    }

    pub(crate) fn balance_of(&self, holder: &HolderId) -> Amount {
        self.staged
            .get(holder)
            .or_else(|| self.guard.balances.get(holder))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    pub(crate) fn credit(&mut self, holder: &HolderId, amount: Amount) -> Result<()> {
        let balance = self
            .balance_of(holder)
            .checked_add(amount)
            .ok_or(CurveError::ArithmeticOverflow("credit"))?;
        self.staged.insert(holder.clone(), balance);
        Ok(())
    }

    pub(crate) fn debit(&mut self, holder: &HolderId, amount: Amount) -> Result<()> {
        let available = self.balance_of(holder);
        let balance = available
            .checked_sub(amount)
            .ok_or(CurveError::InsufficientBalance {
                requested: amount,
                available,
            })?;
        self.staged.insert(holder.clone(), balance);
        Ok(())
    }

    pub(crate) fn mint_supply(&mut self, amount: Amount) -> Result<()> {
        self.supply = self
            .supply
            .checked_add(amount)
            .ok_or(CurveError::ArithmeticOverflow("mint supply"))?;
        Ok(())
    }

    pub(crate) fn burn_supply(&mut self, amount: Amount) -> Result<()> {
        self.supply = self
            .supply
            .checked_sub(amount)
            .ok_or(CurveError::InsufficientSupply {
                requested: amount,
                available: self.supply,
            })?;
        Ok(())
    }

    pub(crate) fn add_reserve(&mut self, amount: Amount) -> Result<()> {
        self.reserve = self
            .reserve
            .checked_add(amount)
            .ok_or(CurveError::ArithmeticOverflow("add reserve"))?;
        Ok(())
    }

    pub(crate) fn remove_reserve(&mut self, amount: Amount) -> Result<()> {
        self.reserve = self
            .reserve
            .checked_sub(amount)
            .ok_or(CurveError::InsufficientReserve {
                requested: amount,
                available: self.reserve,
            })?;
        Ok(())
    }

    /// Check that staged balances still sum to staged supply
    pub(crate) fn verify_conservation(&self) -> Result<()> {
        let mut total = Amount::ZERO;
        let untouched = self
            .guard
            .balances
            .iter()
            .filter(|(holder, _)| !self.staged.contains_key(*holder))
            .map(|(_, balance)| *balance);

        for balance in untouched.chain(self.staged.values().copied()) {
            total = total
                .checked_add(balance)
                .ok_or(MarketError::InvariantViolation {
                    supply: self.supply,
                    balances: Amount::from_raw(u128::MAX),
                })?;
        }

        if total != self.supply {
            return Err(MarketError::InvariantViolation {
                supply: self.supply,
                balances: total,
            });
        }
        Ok(())
    }

    /// Publish every staged mutation at once and release the lock
    pub(crate) fn apply(mut self) {
        let inner = &mut *self.guard;
        inner.supply = self.supply;
        inner.reserve = self.reserve;
        for (holder, balance) in self.staged.drain() {
            if balance.is_zero() {
                inner.balances.remove(&holder);
            } else {
                inner.balances.insert(holder, balance);
            }
        }
    }
}
