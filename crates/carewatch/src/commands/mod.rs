//! Command handlers, one module per command group.

pub mod alarms;
pub mod cards;
pub mod config_cmd;
pub mod monitor;
