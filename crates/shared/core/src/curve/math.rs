use super::params::CurveParameters;
use super::wide::{self, U256, add, div_ceil, isqrt, mul, narrow};
use crate::error::CurveError;
use crate::values::{Amount, WAD};

/// Pure pricing functions over a fixed [`CurveParameters`]
///
/// All values are 18-decimal raw integers. Every truncation rounds in favour
/// of the reserve: buys mint no more than the exact integral allows and sells
/// pay out no more than the exact integral owes.
#[derive(Debug, Clone, Copy)]
pub struct CurveMath {
    params: CurveParameters,
    /// ceil(K * P0) in raw token units: the supply offset at which the
    /// linear price would reach zero, measured backwards from supply 0
    offset: U256,
}

impl CurveMath {
    pub fn new(params: CurveParameters) -> Self {
        // A product of two u128 values always fits in 256 bits
        let product =
            wide::wide(params.scaling_factor()) * wide::wide(params.initial_reserve_price());
        let offset = div_ceil(product, U256::from(WAD));
        Self { params, offset }
    }

    pub fn params(&self) -> &CurveParameters {
        &self.params
    }

    /// Marginal price at `supply`: `P0 + supply / K`, truncated
    pub fn spot_price(&self, supply: Amount) -> Result<Amount, CurveError> {
        let slope = mul(wide::wide(supply), U256::from(WAD), "spot price")?
            / wide::wide(self.params.scaling_factor());
        let price = add(
            wide::wide(self.params.initial_reserve_price()),
            slope,
            "spot price",
        )?;
        narrow(price, "spot price")
    }

    /// Tokens minted for `amount_in` base currency starting at `supply_from`
    ///
    /// Solves `P0·t + (2·s·t + t²) / 2K = A` for `t`:
    /// `t = isqrt(X² + 2·A·K) − X` with `X = ceil(K·P0) + s`.
    /// Rounding `X` up and the root down both shrink `t`.
    pub fn integral_buy_cost(
        &self,
        supply_from: Amount,
        amount_in: Amount,
    ) -> Result<Amount, CurveError> {
        if amount_in.is_zero() {
            return Ok(Amount::ZERO);
        }

        let x = add(self.offset, wide::wide(supply_from), "buy cost")?;
        let x_sq = mul(x, x, "buy cost")?;
        let two_ak = mul(
            wide::wide(amount_in) << 1,
            wide::wide(self.params.scaling_factor()),
            "buy cost",
        )?;
        let root = isqrt(add(x_sq, two_ak, "buy cost")?);

        // root >= x since the radicand is at least x²
        let tokens_out = narrow(root - x, "buy cost")?;

        // Minting must not push supply past the representable range
        supply_from
            .checked_add(tokens_out)
            .ok_or(CurveError::ArithmeticOverflow("buy cost"))?;

        Ok(tokens_out)
    }

    /// Base currency paid out for burning `tokens_in` starting at `supply_from`
    ///
    /// Integral over `[s − t, s]`: `P0·t + t·(2s − t) / 2K`, each term
    /// truncated.
    pub fn integral_sell_proceeds(
        &self,
        supply_from: Amount,
        tokens_in: Amount,
    ) -> Result<Amount, CurveError> {
        if tokens_in.is_zero() {
            return Ok(Amount::ZERO);
        }
        if tokens_in > supply_from {
            return Err(CurveError::InsufficientSupply {
                requested: tokens_in,
                available: supply_from,
            });
        }

        let t = wide::wide(tokens_in);
        let s = wide::wide(supply_from);

        let linear = mul(
            wide::wide(self.params.initial_reserve_price()),
            t,
            "sell proceeds",
        )? / U256::from(WAD);

        // 2s − t >= s >= 0 because t <= s
        let span = (s << 1) - t;
        let quadratic = mul(t, span, "sell proceeds")?
            / (wide::wide(self.params.scaling_factor()) << 1);

        narrow(add(linear, quadratic, "sell proceeds")?, "sell proceeds")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scenario_curve() -> CurveMath {
        CurveMath::new(CurveParameters::new(dec!(0.01), dec!(1000)).unwrap())
    }

    #[test]
    fn test_buy_from_zero_supply() {
        let curve = scenario_curve();
        let tokens = curve
            .integral_buy_cost(Amount::ZERO, Amount::ONE)
            .unwrap();
        assert_eq!(tokens, Amount::from_raw(35_825_756_949_558_400_065));
        // Deterministic
        assert_eq!(
            curve.integral_buy_cost(Amount::ZERO, Amount::ONE).unwrap(),
            tokens
        );
    }

    #[test]
    fn test_buy_at_higher_supply_yields_fewer_tokens() {
        let curve = scenario_curve();
        let first = curve.integral_buy_cost(Amount::ZERO, Amount::ONE).unwrap();
        let second = curve.integral_buy_cost(first, Amount::ONE).unwrap();
        assert_eq!(second, Amount::from_raw(18_205_485_424_770_086_799));
        assert!(second < first);
    }

    #[test]
    fn test_sell_proceeds() {
        let curve = scenario_curve();
        let proceeds = curve
            .integral_sell_proceeds(Amount::from_whole(50), Amount::ONE)
            .unwrap();
        assert_eq!(proceeds.to_string(), "0.0595");
    }

    #[test]
    fn test_round_trip_favours_reserve() {
        let curve = scenario_curve();
        let tokens = curve.integral_buy_cost(Amount::ZERO, Amount::ONE).unwrap();
        let back = curve.integral_sell_proceeds(tokens, tokens).unwrap();
        assert_eq!(back, Amount::from_raw(999_999_999_999_999_999));
        assert!(back <= Amount::ONE);
    }

    #[test]
    fn test_zero_amounts() {
        let curve = scenario_curve();
        assert_eq!(
            curve.integral_buy_cost(Amount::from_whole(7), Amount::ZERO).unwrap(),
            Amount::ZERO
        );
        assert_eq!(
            curve.integral_sell_proceeds(Amount::ZERO, Amount::ZERO).unwrap(),
            Amount::ZERO
        );
    }

    #[test]
    fn test_sell_more_than_supply() {
        let curve = scenario_curve();
        let err = curve
            .integral_sell_proceeds(Amount::from_whole(10), Amount::from_whole(11))
            .unwrap_err();
        assert_eq!(
            err,
            CurveError::InsufficientSupply {
                requested: Amount::from_whole(11),
                available: Amount::from_whole(10),
            }
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let curve = scenario_curve();
        let huge = Amount::from_raw(u128::MAX);
        assert!(matches!(
            curve.integral_buy_cost(huge, huge),
            Err(CurveError::ArithmeticOverflow(_))
        ));
    }

    #[test]
    fn test_spot_price() {
        let curve = scenario_curve();
        assert_eq!(curve.spot_price(Amount::ZERO).unwrap().to_string(), "0.01");
        assert_eq!(
            curve.spot_price(Amount::from_whole(1000)).unwrap().to_string(),
            "1.01"
        );
    }
}
