//! Card listing.

use tabled::Tabled;

use carewatch_core::{Card, CareSession};

use crate::cli::{CardsArgs, GlobalOpts};
use crate::config::build_backend_config;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "Card")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Devices")]
    devices: usize,
    #[tabled(rename = "Active alarms")]
    active_alarms: usize,
    #[tabled(rename = "Top tier")]
    top_tier: String,
}

impl From<&Card> for CardRow {
    fn from(c: &Card) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            kind: c.kind.to_string(),
            unit: c.unit.to_string(),
            devices: c.devices.len(),
            active_alarms: c.alarms.iter().filter(|e| e.is_contributing()).count(),
            top_tier: c
                .top_active_tier()
                .map_or_else(|| "-".into(), output::tier_label),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: CardsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = build_backend_config(global)?;

    let cards = CareSession::oneshot(config, |session| async move {
        Ok(session.cards_snapshot())
    })
    .await?;

    let visible: Vec<&Card> = cards
        .iter()
        .map(std::convert::AsRef::as_ref)
        .filter(|c| !args.alarming || c.has_active_alarm())
        .collect();

    let out = output::render_list(
        &global.output,
        &visible,
        |c| CardRow::from(*c),
        |c| c.id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
