//! # Invocation Pipeline
//!
//! One invocation is the strictly linear chain
//! gate -> (if open) fetch -> dispatch. The gate check always precedes the
//! fetch, the fetch always precedes the dispatch, and each invocation
//! performs at most one network call and one mail call. No state survives
//! between invocations, so repeated threshold breaches within one open
//! window produce repeated alerts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::alerting::dispatcher::{AlertDispatcher, DispatchOutcome};
use crate::alerting::mailer::Mailer;
use crate::configs::config_alerter::AlerterConfig;
use crate::markets::nyse::calendar::MarketCalendarGate;
use crate::markets::rsifeed::indicator::RsiFeed;

/// How one invocation ended, when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// Gate closed; neither the fetch nor the dispatch ran.
    MarketClosed,
    /// Threshold breached; one alert email went out.
    AlertSent,
    /// Market open, reading numeric, no breach.
    AboveThreshold,
    /// Market open but the payload carried no numeric RSI.
    MissingData,
}

impl From<DispatchOutcome> for InvocationOutcome {
    fn from(outcome: DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::Sent => Self::AlertSent,
            DispatchOutcome::AboveThreshold => Self::AboveThreshold,
            DispatchOutcome::MissingData => Self::MissingData,
        }
    }
}

/// The wired gate -> fetch -> dispatch pipeline.
pub struct Invocation {
    gate: MarketCalendarGate,
    feed: RsiFeed,
    dispatcher: AlertDispatcher,
}

impl Invocation {
    pub fn new(gate: MarketCalendarGate, feed: RsiFeed, dispatcher: AlertDispatcher) -> Self {
        Self {
            gate,
            feed,
            dispatcher,
        }
    }

    /// Wires the pipeline from configuration, with the mail transport
    /// injected behind its seam.
    pub fn from_config(config: &AlerterConfig, mailer: Arc<dyn Mailer>) -> anyhow::Result<Self> {
        Ok(Self::new(
            MarketCalendarGate::from_config(config)?,
            RsiFeed::new(config)?,
            AlertDispatcher::new(mailer, config),
        ))
    }

    /// Runs one invocation against the current wall clock.
    ///
    /// Fetch and mail failures propagate as errors; the invocation is then
    /// considered failed by the caller (scheduler tick or process exit
    /// code). Nothing is retried here.
    pub async fn run_once(&self) -> anyhow::Result<InvocationOutcome> {
        self.run_at(Utc::now()).await
    }

    /// Runs one invocation with the gate evaluated at `instant`.
    pub async fn run_at(&self, instant: DateTime<Utc>) -> anyhow::Result<InvocationOutcome> {
        if !self.gate.is_open_at(instant) {
            info!("Market is closed (weekend or holiday or out of time window). No alert sent.");
            return Ok(InvocationOutcome::MarketClosed);
        }

        let reading = self.feed.fetch_reading().await?;
        let outcome = self.dispatcher.dispatch(&reading).await?;
        Ok(outcome.into())
    }
}
