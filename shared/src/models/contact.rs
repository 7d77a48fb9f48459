//! Contact Model

use serde::{Deserialize, Serialize};

/// Contact form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
