//! Foreground alarm monitor.
//!
//! Connects, starts the notification monitor with a console sounder,
//! and runs until Ctrl-C. Platform-operations roles exit immediately
//! with a notice -- they have no monitoring surface.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use owo_colors::OwoColorize;

use carewatch_core::{AlarmSounder, CareSession, CoreError};

use crate::cli::{GlobalOpts, MonitorArgs};
use crate::config::build_backend_config;
use crate::error::CliError;

// ── Console sounder ─────────────────────────────────────────────────

/// Terminal stand-in for the audible-alert device: rings the terminal
/// bell and prints the alert level. One "stream" at a time, like the
/// real thing.
struct ConsoleSounder;

impl ConsoleSounder {
    fn announce(line: &str) {
        // BEL plus a visible line; the bell is the audible part.
        eprintln!("\x07{line}");
    }
}

impl AlarmSounder for ConsoleSounder {
    fn play_l1(&self) -> BoxFuture<'_, Result<(), CoreError>> {
        Box::pin(async move {
            Self::announce(&format!("{}", "ALARM L1 -- emergency alert sounding".red().bold()));
            Ok(())
        })
    }

    fn play_l2(&self) -> BoxFuture<'_, Result<(), CoreError>> {
        Box::pin(async move {
            Self::announce(&format!("{}", "ALARM L2 -- alert sounding".red()));
            Ok(())
        })
    }

    fn halt(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            eprintln!("{}", "alert sound stopped".dimmed());
        })
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: MonitorArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = build_backend_config(global)?;
    if let Some(interval) = args.interval {
        config.poll_interval_secs = interval;
    }

    let session = CareSession::new(config);
    session.connect().await?;

    let started = session
        .start_monitor(Arc::new(ConsoleSounder))
        .await
        .map_err(CliError::from)?;

    if !started {
        if !global.quiet {
            eprintln!(
                "Role {} has no monitoring surface; nothing to do.",
                session
                    .role()
                    .await
                    .map_or_else(|| "<unknown>".into(), |r| r.to_string())
            );
        }
        session.disconnect().await;
        return Ok(());
    }

    if !global.quiet {
        eprintln!(
            "Monitoring {} cards every {}s -- Ctrl-C to stop",
            session.store().len(),
            session.config().poll_interval_secs
        );
    }

    tokio::signal::ctrl_c().await?;

    session.stop_monitor().await;
    session.disconnect().await;

    if !global.quiet {
        eprintln!("Monitor stopped");
    }
    Ok(())
}
