//! Token qualification pipeline
//!
//! For each monitored address, in order:
//!
//! ```text
//! fetch pair ──fail──> warn, next address
//!     ↓
//! filter ──fail──> next address
//!     ↓
//! bundled-supply check ──bundled──> blacklist token + developer
//!     ↓
//! audit status (non-success => "Unknown")
//!     ↓
//! not blacklisted AND audit == "Good" ──> insert observation, then buy
//! ```
//!
//! After the last address, the full table is reloaded and analyzed.
//!
//! Addresses are processed strictly one after another; every call is awaited
//! before the next begins. Upstream failures only affect the current
//! address. A storage failure (database or blacklist file) stops the run at
//! that address; the report keeps every outcome recorded before it and
//! carries the abort reason.

use crate::analysis::{analyze, AnalysisReport};
use crate::blacklist::BlacklistStore;
use crate::config::BotConfig;
use crate::db::{TokenObservation, TokenRepository};
use crate::error::Result;
use crate::filters::FilterEngine;
use crate::market_data::{DexScreenerClient, MarketDataSource};
use crate::notify::TelegramNotifier;
use crate::risk::{is_bundled, AuditProvider, RugCheckClient, AUDIT_GOOD, AUDIT_UNKNOWN};
use crate::trade::{BonkBotClient, TradeAction, TradeExecutor};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Success,
    Warn,
    Error,
}

/// Operator-facing message produced during a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunEvent {
    pub level: EventLevel,
    pub message: String,
}

/// What happened to one monitored address
#[derive(Debug, Clone, PartialEq)]
pub enum TokenOutcome {
    FetchFailed { reason: String },
    FilteredOut,
    /// Blacklisted before the insertion gate; `bundled` marks a listing made in this pass
    Blacklisted { bundled: bool },
    AuditRejected { status: String },
    Inserted { id: i64, trade: TradeResult },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TradeResult {
    Executed,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenReport {
    pub address: String,
    pub outcome: TokenOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub tokens: Vec<TokenReport>,
    pub events: Vec<RunEvent>,
    /// `None` when the stored rows could not be loaded
    pub analysis: Option<AnalysisReport>,
    /// Set when a storage failure stopped the run early
    pub aborted: Option<String>,
}

impl RunReport {
    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    pub fn inserted_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| matches!(t.outcome, TokenOutcome::Inserted { .. }))
            .count()
    }
}

pub struct Pipeline {
    market: Arc<dyn MarketDataSource>,
    audit: Arc<dyn AuditProvider>,
    trader: Arc<dyn TradeExecutor>,
    repository: Arc<dyn TokenRepository>,
    notifier: TelegramNotifier,
    filters: FilterEngine,
    pump_price_threshold: f64,
}

impl Pipeline {
    /// Build the pipeline with the real HTTP collaborators described by `config`
    pub fn from_config(config: &BotConfig, repository: Arc<dyn TokenRepository>) -> Result<Self> {
        let notifier = TelegramNotifier::from_config(config)?;
        if notifier.is_enabled() {
            log::info!("Telegram notifications enabled");
        }

        Ok(Self::with_components(
            Arc::new(DexScreenerClient::from_config(config)?),
            Arc::new(RugCheckClient::from_config(config)?),
            Arc::new(BonkBotClient::from_config(config)?),
            repository,
            notifier,
            FilterEngine::new(config.filters),
            config.pump_price_threshold,
        ))
    }

    pub fn with_components(
        market: Arc<dyn MarketDataSource>,
        audit: Arc<dyn AuditProvider>,
        trader: Arc<dyn TradeExecutor>,
        repository: Arc<dyn TokenRepository>,
        notifier: TelegramNotifier,
        filters: FilterEngine,
        pump_price_threshold: f64,
    ) -> Self {
        Self {
            market,
            audit,
            trader,
            repository,
            notifier,
            filters,
            pump_price_threshold,
        }
    }

    /// Process every address once, then analyze the full table
    ///
    /// Never fails as a whole: a storage error ends the loop and is reported
    /// in `RunReport::aborted` next to the outcomes that came before it.
    pub async fn run_once(&self, addresses: &[String], blacklist: &mut BlacklistStore) -> RunReport {
        log::info!("Pipeline run started: {} addresses", addresses.len());

        let mut events = Vec::new();
        let mut tokens = Vec::with_capacity(addresses.len());
        let mut aborted = None;

        if addresses.is_empty() {
            push_event(&mut events, EventLevel::Warn, "No monitored tokens configured".to_string());
        }

        for address in addresses {
            match self.process_token(address, blacklist, &mut events).await {
                Ok(outcome) => {
                    log::debug!("{} -> {:?}", address, outcome);
                    tokens.push(TokenReport {
                        address: address.clone(),
                        outcome,
                    });
                }
                Err(e) => {
                    let reason = format!("Run aborted at {}: {}", address, e);
                    push_event(&mut events, EventLevel::Error, reason.clone());
                    aborted = Some(reason);
                    break;
                }
            }
        }

        let analysis = match self.analysis().await {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                let reason = format!("Analysis failed: {}", e);
                push_event(&mut events, EventLevel::Error, reason.clone());
                aborted.get_or_insert(reason);
                None
            }
        };

        let report = RunReport {
            tokens,
            events,
            analysis,
            aborted,
        };

        log::info!(
            "Pipeline run finished: {} of {} processed, {} inserted{}",
            report.tokens.len(),
            addresses.len(),
            report.inserted_count(),
            if report.is_aborted() { " (aborted)" } else { "" }
        );
        report
    }

    /// Load the repository and compute the three analysis views
    pub async fn analysis(&self) -> Result<AnalysisReport> {
        Ok(analyze(self.repository.load_all().await?))
    }

    async fn process_token(
        &self,
        address: &str,
        blacklist: &mut BlacklistStore,
        events: &mut Vec<RunEvent>,
    ) -> Result<TokenOutcome> {
        let pair = match self.market.fetch_pair(address).await {
            Ok(pair) => pair,
            Err(e) => {
                push_event(
                    events,
                    EventLevel::Error,
                    format!("Failed to fetch data for token: {} ({})", address, e),
                );
                return Ok(TokenOutcome::FetchFailed {
                    reason: e.to_string(),
                });
            }
        };

        if !self.filters.passes(&pair) {
            return Ok(TokenOutcome::FilteredOut);
        }

        let dev_address = pair.base_address().to_string();
        let bundled = is_bundled(&pair);

        if bundled {
            blacklist.add(address, &dev_address)?;
            let message = format!(
                "Bundled supply detected for {} ({}); token and developer {} blacklisted",
                pair.symbol(),
                address,
                dev_address
            );
            push_event(events, EventLevel::Warn, message.clone());
            self.notifier.notify(&message).await;
        }

        let audit_status = match self.audit.check(address).await {
            Ok(status) => status,
            Err(e) => {
                push_event(
                    events,
                    EventLevel::Error,
                    format!("Failed to check RugCheck status for token: {} ({})", address, e),
                );
                AUDIT_UNKNOWN.to_string()
            }
        };

        if blacklist.is_blacklisted(address, &dev_address) {
            return Ok(TokenOutcome::Blacklisted { bundled });
        }
        if audit_status != AUDIT_GOOD {
            log::info!("Skipping {}: audit status {}", address, audit_status);
            return Ok(TokenOutcome::AuditRejected {
                status: audit_status,
            });
        }

        let observation =
            TokenObservation::from_pair(&pair, bundled, audit_status, self.pump_price_threshold);
        let id = self.repository.insert(&observation).await?;
        push_event(
            events,
            EventLevel::Info,
            format!("Saved {} ({}) as row {}", observation.symbol, address, id),
        );

        let trade = match self.trader.execute(address, TradeAction::Buy).await {
            Ok(()) => {
                let message = format!("Buy executed for token: {}", address);
                push_event(events, EventLevel::Success, message.clone());
                self.notifier.notify(&message).await;
                TradeResult::Executed
            }
            Err(e) => {
                let message = format!("Failed to execute buy for token: {} ({})", address, e);
                push_event(events, EventLevel::Error, message.clone());
                self.notifier.notify(&message).await;
                TradeResult::Failed {
                    reason: e.to_string(),
                }
            }
        };

        Ok(TokenOutcome::Inserted { id, trade })
    }
}

fn push_event(events: &mut Vec<RunEvent>, level: EventLevel, message: String) {
    match level {
        EventLevel::Error => log::error!("{}", message),
        EventLevel::Warn => log::warn!("{}", message),
        EventLevel::Info | EventLevel::Success => log::info!("{}", message),
    }
    events.push(RunEvent { level, message });
}
