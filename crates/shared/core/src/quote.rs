//! Quote engine
//!
//! Advisory estimates computed from an explicit supply snapshot. Quotes never
//! read live state, so they are reproducible; the price actually realised at
//! settlement may differ (slippage).

use serde::{Deserialize, Serialize};

use crate::curve::CurveMath;
use crate::curve::wide::{U256, mul, narrow, wide};
use crate::error::CurveError;
use crate::values::{Amount, WAD};

/// Why a quote came back empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteDiagnostic {
    /// Requested amount was zero
    ZeroInput,
    /// Sell requested against an empty supply
    EmptySupply,
    /// Input too small to move the curve; settlement would reject it
    BelowDust,
}

/// Result of a buy or sell quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Supply the quote was computed against
    pub supply_snapshot: Amount,
    /// Amount the caller offers (base for buys, tokens for sells)
    pub input_amount: Amount,
    /// Tokens received for buys, base currency received for sells
    pub output_amount: Amount,
    /// Base currency per token
    pub effective_price: Amount,
    pub diagnostic: Option<QuoteDiagnostic>,
}

impl QuoteResult {
    fn empty(supply_snapshot: Amount, input_amount: Amount, diagnostic: QuoteDiagnostic) -> Self {
        Self {
            supply_snapshot,
            input_amount,
            output_amount: Amount::ZERO,
            effective_price: Amount::ZERO,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn is_executable(&self) -> bool {
        self.diagnostic.is_none()
    }
}

/// Read-only pricing against a supply snapshot
#[derive(Debug, Clone, Copy)]
pub struct QuoteEngine {
    math: CurveMath,
}

impl QuoteEngine {
    pub fn new(math: CurveMath) -> Self {
        Self { math }
    }

    pub fn math(&self) -> &CurveMath {
        &self.math
    }

    /// Tokens obtainable for `base_amount` at `supply_snapshot`
    pub fn quote_buy(
        &self,
        supply_snapshot: Amount,
        base_amount: Amount,
    ) -> Result<QuoteResult, CurveError> {
        if base_amount.is_zero() {
            return Ok(QuoteResult::empty(
                supply_snapshot,
                base_amount,
                QuoteDiagnostic::ZeroInput,
            ));
        }

        let tokens_out = self.math.integral_buy_cost(supply_snapshot, base_amount)?;
        if tokens_out.is_zero() {
            return Ok(QuoteResult::empty(
                supply_snapshot,
                base_amount,
                QuoteDiagnostic::BelowDust,
            ));
        }

        Ok(QuoteResult {
            supply_snapshot,
            input_amount: base_amount,
            output_amount: tokens_out,
            effective_price: price_per_token(base_amount, tokens_out)?,
            diagnostic: None,
        })
    }

    /// Base currency obtainable for `token_amount` at `supply_snapshot`
    pub fn quote_sell(
        &self,
        supply_snapshot: Amount,
        token_amount: Amount,
    ) -> Result<QuoteResult, CurveError> {
        if token_amount.is_zero() {
            return Ok(QuoteResult::empty(
                supply_snapshot,
                token_amount,
                QuoteDiagnostic::ZeroInput,
            ));
        }
        if supply_snapshot.is_zero() {
            return Ok(QuoteResult::empty(
                supply_snapshot,
                token_amount,
                QuoteDiagnostic::EmptySupply,
            ));
        }

        let base_out = self
            .math
            .integral_sell_proceeds(supply_snapshot, token_amount)?;
        if base_out.is_zero() {
            return Ok(QuoteResult::empty(
                supply_snapshot,
                token_amount,
                QuoteDiagnostic::BelowDust,
            ));
        }

        Ok(QuoteResult {
            supply_snapshot,
            input_amount: token_amount,
            output_amount: base_out,
            effective_price: price_per_token(base_out, token_amount)?,
            diagnostic: None,
        })
    }

    /// Price of one token implied by buying with one unit of base currency
    ///
    /// `None` when the supply is empty or the quote yields nothing.
    pub fn implied_unit_price(&self, supply_snapshot: Amount) -> Result<Option<Amount>, CurveError> {
        if supply_snapshot.is_zero() {
            return Ok(None);
        }
        let quote = self.quote_buy(supply_snapshot, Amount::ONE)?;
        if !quote.is_executable() {
            return Ok(None);
        }
        Ok(Some(quote.effective_price))
    }
}

/// base / tokens, scaled to 18 decimals
fn price_per_token(base: Amount, tokens: Amount) -> Result<Amount, CurveError> {
    let scaled = mul(wide(base), U256::from(WAD), "effective price")?;
    narrow(scaled / wide(tokens), "effective price")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveParameters;
    use rust_decimal_macros::dec;

    fn engine() -> QuoteEngine {
        QuoteEngine::new(CurveMath::new(
            CurveParameters::new(dec!(0.01), dec!(1000)).unwrap(),
        ))
    }

    #[test]
    fn test_quote_buy_matches_curve() {
        let engine = engine();
        let quote = engine.quote_buy(Amount::ZERO, Amount::ONE).unwrap();

        assert!(quote.is_executable());
        assert_eq!(
            quote.output_amount,
            engine.math().integral_buy_cost(Amount::ZERO, Amount::ONE).unwrap()
        );
        // 1 / 35.8257... base per token
        assert!(quote.effective_price > Amount::from_decimal(dec!(0.0279)).unwrap());
        assert!(quote.effective_price < Amount::from_decimal(dec!(0.0280)).unwrap());
    }

    #[test]
    fn test_zero_input_quotes_zero() {
        let engine = engine();
        for supply in [Amount::ZERO, Amount::from_whole(1), Amount::from_whole(1_000_000)] {
            let buy = engine.quote_buy(supply, Amount::ZERO).unwrap();
            let sell = engine.quote_sell(supply, Amount::ZERO).unwrap();
            assert_eq!(buy.output_amount, Amount::ZERO);
            assert_eq!(sell.output_amount, Amount::ZERO);
            assert_eq!(buy.diagnostic, Some(QuoteDiagnostic::ZeroInput));
        }
    }

    #[test]
    fn test_sell_against_empty_supply() {
        let engine = engine();
        let quote = engine.quote_sell(Amount::ZERO, Amount::ONE).unwrap();
        assert_eq!(quote.output_amount, Amount::ZERO);
        assert_eq!(quote.diagnostic, Some(QuoteDiagnostic::EmptySupply));
    }

    #[test]
    fn test_dust_buy_is_flagged() {
        let engine = engine();
        let quote = engine
            .quote_buy(Amount::from_whole(1_000_000), Amount::from_raw(1))
            .unwrap();
        assert_eq!(quote.output_amount, Amount::ZERO);
        assert_eq!(quote.diagnostic, Some(QuoteDiagnostic::BelowDust));
    }

    #[test]
    fn test_quote_sell() {
        let engine = engine();
        let quote = engine
            .quote_sell(Amount::from_whole(50), Amount::ONE)
            .unwrap();
        assert_eq!(quote.output_amount.to_string(), "0.0595");
        assert_eq!(quote.effective_price.to_string(), "0.0595");
    }

    #[test]
    fn test_implied_unit_price() {
        let engine = engine();
        assert_eq!(engine.implied_unit_price(Amount::ZERO).unwrap(), None);

        let low = engine
            .implied_unit_price(Amount::from_whole(10))
            .unwrap()
            .unwrap();
        let high = engine
            .implied_unit_price(Amount::from_whole(10_000))
            .unwrap()
            .unwrap();
        assert!(high > low);
    }
}
