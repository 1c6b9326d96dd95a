//! Market facade
//!
//! Wires quoting, settlement, the ledger, the journal and the supply cache
//! for one token. Quotes read the cached supply; trades go straight to the
//! ledger and invalidate the cache afterwards.

use bonding_core::{
    Amount, CurveMath, CurveParameters, HolderId, QuoteEngine, QuoteResult, SlippageWarning,
    TradeReceipt,
};
use bonding_ports::{Clock, LedgerReader};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::settlement::SettlementEngine;
use super::sync_cache::{RefreshHandle, SyncCache};
use crate::error::Result;
use crate::infrastructure::{InMemoryJournal, LedgerState, MarketConfig, SyncConfig};

/// Name and ticker fixed at deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
}

pub struct BondingMarket<C: Clock> {
    metadata: TokenMetadata,
    quotes: QuoteEngine,
    ledger: Arc<LedgerState>,
    journal: Arc<InMemoryJournal>,
    settlement: SettlementEngine<C, InMemoryJournal>,
    cache: Arc<SyncCache<LedgerState, C>>,
}

impl<C: Clock> BondingMarket<C> {
    pub fn new(
        metadata: TokenMetadata,
        params: CurveParameters,
        clock: Arc<C>,
        sync: &SyncConfig,
    ) -> Result<Self> {
        sync.validate()?;
        let math = CurveMath::new(params);
        let ledger = Arc::new(LedgerState::new());
        let journal = Arc::new(InMemoryJournal::new());
        let settlement =
            SettlementEngine::new(math, ledger.clone(), clock.clone(), journal.clone());
        let cache = Arc::new(
            SyncCache::new(ledger.clone(), clock, sync.refresh_interval())?
                .with_fetch_timeout(sync.fetch_timeout()),
        );

        Ok(Self {
            metadata,
            quotes: QuoteEngine::new(math),
            ledger,
            journal,
            settlement,
            cache,
        })
    }

    /// Build the market and run the configured seed buys
    pub fn from_config(config: &MarketConfig, clock: Arc<C>) -> Result<Self> {
        config.validate()?;
        let params = config.to_curve_parameters()?;
        let metadata = TokenMetadata {
            name: config.name.clone(),
            symbol: config.symbol.clone(),
        };
        let market = Self::new(metadata, params, clock, &config.sync)?;

        for seed in &config.seed_holders {
            let (holder, base_amount) = seed.to_seed_buy()?;
            let receipt = market.buy(&holder, base_amount)?;
            log::info!(
                "Seeded {} with {} {}",
                holder,
                receipt.output_amount,
                market.metadata.symbol
            );
        }

        log::info!(
            "Market {} ({}) ready: supply {}, reserve {}",
            market.metadata.name,
            market.metadata.symbol,
            market.ledger.current_supply(),
            market.ledger.reserve_balance()
        );
        Ok(market)
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn parameters(&self) -> &CurveParameters {
        self.quotes.math().params()
    }

    pub fn ledger(&self) -> &Arc<LedgerState> {
        &self.ledger
    }

    pub fn journal(&self) -> &Arc<InMemoryJournal> {
        &self.journal
    }

    pub fn cache(&self) -> &Arc<SyncCache<LedgerState, C>> {
        &self.cache
    }

    /// Read-only view of the live ledger
    pub fn reader(&self) -> &dyn LedgerReader {
        self.ledger.as_ref()
    }

    /// Supply used for quoting: cached if available, else live
    pub async fn quote_supply(&self) -> Amount {
        match self.cache.get_cached_supply().await {
            Some((supply, _)) => supply,
            None => self.ledger.current_supply(),
        }
    }

    pub async fn quote_buy(&self, base_amount: Amount) -> Result<QuoteResult> {
        let supply = self.quote_supply().await;
        Ok(self.quotes.quote_buy(supply, base_amount)?)
    }

    pub async fn quote_sell(&self, token_amount: Amount) -> Result<QuoteResult> {
        let supply = self.quote_supply().await;
        Ok(self.quotes.quote_sell(supply, token_amount)?)
    }

    /// Base currency per token when buying with one base unit
    pub async fn implied_unit_price(&self) -> Result<Option<Amount>> {
        let supply = self.quote_supply().await;
        Ok(self.quotes.implied_unit_price(supply)?)
    }

    /// Marginal price at the live supply
    pub fn spot_price(&self) -> Result<Amount> {
        Ok(self
            .quotes
            .math()
            .spot_price(self.ledger.current_supply())?)
    }

    pub fn balance_of(&self, holder: &HolderId) -> Amount {
        self.reader().balance_of(holder)
    }

    pub fn buy(&self, holder: &HolderId, base_amount: Amount) -> Result<TradeReceipt> {
        let result = self.settlement.execute_buy(holder, base_amount);
        self.cache.invalidate();
        result
    }

    pub fn sell(&self, holder: &HolderId, token_amount: Amount) -> Result<TradeReceipt> {
        let result = self.settlement.execute_sell(holder, token_amount);
        self.cache.invalidate();
        result
    }

    pub fn buy_quoted(
        &self,
        holder: &HolderId,
        quote: &QuoteResult,
    ) -> Result<(TradeReceipt, Option<SlippageWarning>)> {
        let result = self.settlement.execute_buy_quoted(holder, quote);
        self.cache.invalidate();
        result
    }

    pub fn sell_quoted(
        &self,
        holder: &HolderId,
        quote: &QuoteResult,
    ) -> Result<(TradeReceipt, Option<SlippageWarning>)> {
        let result = self.settlement.execute_sell_quoted(holder, quote);
        self.cache.invalidate();
        result
    }
}

impl<C: Clock + 'static> BondingMarket<C> {
    /// Start refreshing the supply cache in the background
    pub fn start_sync(&self) -> RefreshHandle {
        self.cache.spawn_refresher()
    }
}
