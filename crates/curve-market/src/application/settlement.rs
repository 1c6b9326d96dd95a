//! Trade settlement against the curve
//!
//! Each trade runs inside one ledger transaction: the supply read, the curve
//! computation, the four sub-mutations and the journal append all happen
//! under the ledger-wide lock, so concurrent trades serialize on supply.

use bonding_core::{
    Amount, CurveError, CurveMath, HolderId, QuoteResult, SlippageWarning, TradeKind, TradeReceipt,
};
use bonding_ports::{Clock, LedgerMutation, TradeJournal};
use std::sync::Arc;

use crate::error::Result;
use crate::infrastructure::{LedgerState, LedgerTxn};

/// Validates and applies buys and sells
pub struct SettlementEngine<C, J>
where
    C: Clock,
    J: TradeJournal,
{
    math: CurveMath,
    ledger: Arc<LedgerState>,
    clock: Arc<C>,
    journal: Arc<J>,
}

impl<C, J> SettlementEngine<C, J>
where
    C: Clock,
    J: TradeJournal,
{
    pub fn new(math: CurveMath, ledger: Arc<LedgerState>, clock: Arc<C>, journal: Arc<J>) -> Self {
        Self {
            math,
            ledger,
            clock,
            journal,
        }
    }

    pub fn math(&self) -> &CurveMath {
        &self.math
    }

    pub fn ledger(&self) -> &Arc<LedgerState> {
        &self.ledger
    }

    /// Spend `base_amount` on newly minted tokens
    pub fn execute_buy(&self, holder: &HolderId, base_amount: Amount) -> Result<TradeReceipt> {
        require_positive(base_amount, "buy")?;

        let mut txn = self.ledger.begin();
        let supply_before = txn.current_supply();

        let tokens_out = self.math.integral_buy_cost(supply_before, base_amount)?;
        if tokens_out.is_zero() {
            log::debug!(
                "Rejected buy by {}: {} base yields no tokens at supply {}",
                holder,
                base_amount,
                supply_before
            );
            return Err(CurveError::QuoteTooSmall {
                amount: base_amount,
            }
            .into());
        }

        txn.mint_supply(tokens_out)?;
        txn.credit(holder, tokens_out)?;
        txn.add_reserve(base_amount)?;

        self.commit(
            txn,
            TradeKind::Buy,
            holder,
            base_amount,
            tokens_out,
            supply_before,
        )
    }

    /// Redeem `token_amount` tokens for base currency
    pub fn execute_sell(&self, holder: &HolderId, token_amount: Amount) -> Result<TradeReceipt> {
        require_positive(token_amount, "sell")?;

        let mut txn = self.ledger.begin();
        let supply_before = txn.current_supply();
        let available = txn.balance_of(holder);
        if token_amount > available {
            log::debug!(
                "Rejected sell by {}: {} requested, {} held",
                holder,
                token_amount,
                available
            );
            return Err(CurveError::InsufficientBalance {
                requested: token_amount,
                available,
            }
            .into());
        }

        let base_out = self.math.integral_sell_proceeds(supply_before, token_amount)?;
        if base_out.is_zero() {
            log::debug!(
                "Rejected sell by {}: {} tokens yield no base at supply {}",
                holder,
                token_amount,
                supply_before
            );
            return Err(CurveError::QuoteTooSmall {
                amount: token_amount,
            }
            .into());
        }
        let reserve = txn.reserve_balance();
        if base_out > reserve {
            log::warn!(
                "Sell by {} would pay {} from a reserve of {}",
                holder,
                base_out,
                reserve
            );
            return Err(CurveError::InsufficientReserve {
                requested: base_out,
                available: reserve,
            }
            .into());
        }

        txn.burn_supply(token_amount)?;
        txn.debit(holder, token_amount)?;
        txn.remove_reserve(base_out)?;

        self.commit(
            txn,
            TradeKind::Sell,
            holder,
            token_amount,
            base_out,
            supply_before,
        )
    }

    /// Buy, then report how the fill compares with an earlier quote
    pub fn execute_buy_quoted(
        &self,
        holder: &HolderId,
        quote: &QuoteResult,
    ) -> Result<(TradeReceipt, Option<SlippageWarning>)> {
        let receipt = self.execute_buy(holder, quote.input_amount)?;
        Ok(with_slippage(quote, receipt))
    }

    /// Sell, then report how the fill compares with an earlier quote
    pub fn execute_sell_quoted(
        &self,
        holder: &HolderId,
        quote: &QuoteResult,
    ) -> Result<(TradeReceipt, Option<SlippageWarning>)> {
        let receipt = self.execute_sell(holder, quote.input_amount)?;
        Ok(with_slippage(quote, receipt))
    }

    fn commit(
        &self,
        txn: LedgerTxn<'_>,
        kind: TradeKind,
        holder: &HolderId,
        input_amount: Amount,
        output_amount: Amount,
        supply_before: Amount,
    ) -> Result<TradeReceipt> {
        if let Err(e) = txn.verify_conservation() {
            log::error!("Aborting {} by {}: {}", kind, holder, e);
            return Err(e);
        }

        let receipt = TradeReceipt::new(
            kind,
            holder.clone(),
            input_amount,
            output_amount,
            supply_before,
            txn.current_supply(),
            self.clock.now(),
        );

        let sequence = self.journal.append(LedgerMutation {
            trade_id: receipt.id,
            kind,
            holder: holder.clone(),
            tokens: receipt.token_amount(),
            base: receipt.base_amount(),
            supply_after: receipt.supply_after,
            reserve_after: txn.reserve_balance(),
            timestamp: receipt.timestamp,
        });
        txn.apply();

        log::info!(
            "#{} {} {} in={} out={} supply {} -> {}",
            sequence,
            kind,
            holder,
            input_amount,
            output_amount,
            supply_before,
            receipt.supply_after
        );
        Ok(receipt)
    }
}

fn require_positive(amount: Amount, op: &str) -> Result<()> {
    if amount.is_zero() {
        return Err(CurveError::InvalidAmount(format!("{} amount must be positive", op)).into());
    }
    Ok(())
}

fn with_slippage(
    quote: &QuoteResult,
    receipt: TradeReceipt,
) -> (TradeReceipt, Option<SlippageWarning>) {
    let warning = SlippageWarning::between(quote, &receipt);
    if let Some(w) = &warning {
        log::warn!("{}", w);
    }
    (receipt, warning)
}
