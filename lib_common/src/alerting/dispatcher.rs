//! # Alert Dispatcher
//!
//! Compares a fetched reading against the configured threshold and sends at
//! most one email per invocation. Every branch logs a status line: sent,
//! above threshold, or payload missing its RSI. The missing-RSI branch is
//! not an error: an absent value fails the threshold comparison, so a
//! malformed upstream payload ends as "no alert sent" rather than a failed
//! invocation. The distinct outcome and WARN line keep that case separable
//! from a genuinely calm market in the logs.

use std::sync::Arc;

use tracing::{info, warn};

use crate::alerting::mailer::{AlertEmail, Mailer, MailerError};
use crate::configs::config_alerter::AlerterConfig;
use crate::markets::rsifeed::indicator::RsiReading;

/// Which branch an invocation's dispatch step took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Threshold breached; one alert email went out.
    Sent,
    /// Numeric RSI at or above the threshold; no side effect.
    AboveThreshold,
    /// The payload carried no numeric RSI; no side effect, no error.
    MissingData,
}

/// Service turning readings into (at most) one outbound alert.
pub struct AlertDispatcher {
    mailer: Arc<dyn Mailer>,
    threshold: f64,
    address: String,
    subject: String,
}

impl AlertDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, config: &AlerterConfig) -> Self {
        Self {
            mailer,
            threshold: config.rsi_threshold,
            address: config.alert_email.clone(),
            subject: config.alert_subject.clone(),
        }
    }

    /// Composes the alert for a reading.
    ///
    /// Absent upstream fields render as the literal text `undefined`, so
    /// the body always carries both lines.
    fn compose(&self, reading: &RsiReading) -> AlertEmail {
        let date = reading.date.as_deref().unwrap_or("undefined");
        let rsi = reading
            .rsi
            .map(|value| value.to_string())
            .unwrap_or_else(|| "undefined".to_string());

        AlertEmail {
            sender: self.address.clone(),
            recipient: self.address.clone(),
            subject: self.subject.clone(),
            body: format!(
                "ALERT: SPY RSI is below {}.\n\nDate: {}\nRSI: {}",
                self.threshold, date, rsi
            ),
        }
    }

    /// Applies the threshold rule and dispatches accordingly.
    ///
    /// Send failures propagate; both no-send branches are `Ok`.
    pub async fn dispatch(&self, reading: &RsiReading) -> Result<DispatchOutcome, MailerError> {
        let Some(rsi) = reading.rsi else {
            warn!(
                date = reading.date.as_deref().unwrap_or("undefined"),
                "Payload carried no numeric RSI. No alert sent."
            );
            return Ok(DispatchOutcome::MissingData);
        };

        if rsi < self.threshold {
            let email = self.compose(reading);
            self.mailer.send(&email).await?;
            info!(
                rsi,
                date = reading.date.as_deref().unwrap_or("undefined"),
                recipient = %email.recipient,
                "Email sent successfully"
            );
            Ok(DispatchOutcome::Sent)
        } else {
            info!(rsi, threshold = self.threshold, "RSI is above threshold. No alert sent.");
            Ok(DispatchOutcome::AboveThreshold)
        }
    }
}
