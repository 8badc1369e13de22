// Card-fetch endpoint
//
// The monitoring dashboard's card list: every bed and location visible
// to the session, with bound devices and current alarm events.

use tracing::debug;

use crate::client::CareClient;
use crate::error::Error;
use crate::models::{CardPage, RawCard};

impl CareClient {
    /// List all monitorable cards with their current alarm state.
    ///
    /// `GET /api/monitors/vital-focus/cards`
    ///
    /// Returns the unwrapped `items` array; pagination metadata is
    /// dropped (the backend serves the full visible set in one page
    /// for monitoring consumers).
    pub async fn list_cards(&self) -> Result<Vec<RawCard>, Error> {
        let url = self.api_url("/api/monitors/vital-focus/cards")?;
        debug!("listing cards");
        let page: CardPage = self.get(url).await?;
        debug!(count = page.items.len(), "card list received");
        Ok(page.items)
    }
}
