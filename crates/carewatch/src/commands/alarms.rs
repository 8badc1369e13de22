//! Alarm event listing and acknowledgment.

use serde::Serialize;
use tabled::Tabled;

use carewatch_core::{AlarmEvent, CareSession, Role, policy};

use crate::cli::{AckArgs, AlarmsArgs, GlobalOpts};
use crate::config::build_backend_config;
use crate::error::CliError;
use crate::output;

// ── Flattened alarm view ────────────────────────────────────────────

/// One alarm event joined with its owning card and the session's
/// handling verdict.
#[derive(Serialize)]
struct AlarmEntry {
    card_id: String,
    card_name: String,
    event: AlarmEvent,
    can_handle: bool,
    denial_reason: Option<&'static str>,
}

#[derive(Tabled)]
struct AlarmRow {
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Card")]
    card: String,
    #[tabled(rename = "Type")]
    event_type: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Handleable")]
    handleable: String,
}

impl From<&AlarmEntry> for AlarmRow {
    fn from(entry: &AlarmEntry) -> Self {
        let status = match &entry.event.status {
            carewatch_core::AlarmStatus::Active => "active".into(),
            carewatch_core::AlarmStatus::Acknowledged => "acknowledged".into(),
            carewatch_core::AlarmStatus::Other(s) => s.clone(),
        };

        Self {
            event: entry.event.id.clone(),
            card: entry.card_name.clone(),
            event_type: entry.event.event_type.clone(),
            tier: output::tier_label(entry.event.tier),
            status,
            time: entry
                .event
                .triggered_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".into()),
            handleable: if entry.can_handle {
                "yes".into()
            } else {
                entry.denial_reason.unwrap_or("no").into()
            },
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(args: AlarmsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = build_backend_config(global)?;

    let entries = CareSession::oneshot(config, |session| async move {
        let role = session
            .role()
            .await
            .ok_or(carewatch_core::CoreError::SessionDisconnected)?;
        Ok(collect_entries(&session, role, args.all))
    })
    .await?;

    let out = output::render_list(
        &global.output,
        &entries,
        |e| AlarmRow::from(e),
        |e| e.event.id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn collect_entries(session: &CareSession, role: Role, include_all: bool) -> Vec<AlarmEntry> {
    let store = session.store();
    let mut entries: Vec<AlarmEntry> = Vec::new();

    for card in store.cards_snapshot().iter() {
        for event in &card.alarms {
            if !include_all && !event.is_contributing() {
                continue;
            }
            let can_handle = policy::can_handle_alarm(event, store, role);
            entries.push(AlarmEntry {
                card_id: card.id.clone(),
                card_name: card.name.clone(),
                event: event.clone(),
                can_handle,
                denial_reason: policy::denial_reason(event, store, role),
            });
        }
    }

    // Most urgent first; ties keep card order.
    entries.sort_by_key(|e| e.event.tier);
    entries
}

pub async fn handle_ack(args: AckArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = build_backend_config(global)?;
    let event_id = args.event_id;

    CareSession::oneshot(config, |session| {
        let event_id = event_id.clone();
        async move { session.acknowledge_alarm(&event_id).await }
    })
    .await?;

    if !global.quiet {
        eprintln!("Alarm acknowledged");
    }
    Ok(())
}
