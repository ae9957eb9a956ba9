pub mod config_alerter;
