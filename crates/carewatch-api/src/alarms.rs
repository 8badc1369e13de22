// Alarm event endpoints
//
// Acknowledging (handling) an alarm event. Role/unit gating happens in
// the core policy layer before these are called; the backend remains
// the final authority and may still reject.

use serde_json::json;
use tracing::debug;

use crate::client::CareClient;
use crate::error::Error;

impl CareClient {
    /// Acknowledge (handle) a specific alarm event by its id.
    ///
    /// `POST /api/alarm/events/{event_id}/acknowledge`
    pub async fn acknowledge_alarm(&self, event_id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("/api/alarm/events/{event_id}/acknowledge"))?;
        debug!(event_id, "acknowledging alarm");
        let _: serde_json::Value = self.post(url, &json!({})).await?;
        Ok(())
    }
}
