use std::sync::Arc;

use crate::features::notifications::models::OutgoingMail;
use crate::features::notifications::services::MailOutbox;
use crate::features::sightings::models::Sighting;

/// Announces new sightings to a configured recipient
pub struct NotificationService {
    recipient: Option<String>,
    outbox: Arc<dyn MailOutbox>,
}

impl NotificationService {
    pub fn new(recipient: Option<String>, outbox: Arc<dyn MailOutbox>) -> Self {
        Self { recipient, outbox }
    }

    /// Queue a mail about `sighting`. Never fails; errors are logged.
    pub async fn sighting_created(&self, sighting: &Sighting) {
        let Some(recipient) = self.recipient.as_deref() else {
            return;
        };

        let mail = OutgoingMail::new_sighting(recipient, sighting);
        if let Err(e) = self.outbox.enqueue(mail).await {
            tracing::error!(
                "Failed to enqueue notification for sighting {}: {}",
                sighting.id,
                e
            );
        }
    }
}
