//! Contact slice: fire-and-forget message submission
//!
//! Success/failure notices are emitted by the operation itself, keeping
//! notification timing consistent regardless of which view triggers the send.

use shared::models::ContactMessage;

use super::{Store, rejection_message};
use crate::error::ClientResult;

/// Contact slice state
#[derive(Debug, Clone, Default)]
pub struct ContactState {
    pub form: ContactMessage,
    pub loading: bool,
    pub error: Option<String>,
}

impl Store {
    /// Submit the contact form.
    pub async fn send_contact_message(&self, data: ContactMessage) -> ClientResult<()> {
        {
            let mut state = self.contact.write().await;
            state.loading = true;
            state.error = None;
        }
        let result = self.api.send_contact_message(&data).await;
        let mut state = self.contact.write().await;
        state.loading = false;
        match result {
            Ok(_) => {
                state.error = None;
                self.events
                    .success("Message sent successfully! We'll get back to you soon.");
                Ok(())
            }
            Err(err) => {
                state.error = Some(rejection_message(&err, "Failed to send contact message"));
                self.events.error("Failed to send message. Please try again.");
                Err(err)
            }
        }
    }

    /// Keep the draft form in slice state (view field binding).
    pub async fn update_contact_form(&self, form: ContactMessage) {
        self.contact.write().await.form = form;
    }
}
