// Declare the modules to re-export
pub mod alerting;
pub mod configs;
pub mod core;
pub mod markets;
pub mod retrieve;

// Re-export the commonly used entry points
pub use crate::alerting::dispatcher::{AlertDispatcher, DispatchOutcome};
pub use crate::alerting::mailer::{AlertEmail, Mailer, MailerError, SmtpMailer};
pub use crate::configs::config_alerter::{AlerterConfig, ConfigError, SmtpConfig};
pub use crate::core::invocation::{Invocation, InvocationOutcome};
pub use crate::markets::nyse::calendar::{HolidayCalendar, MarketCalendarGate};
pub use crate::markets::rsifeed::apicall::FeedError;
pub use crate::markets::rsifeed::indicator::{RsiFeed, RsiReading};
