use serde::{Deserialize, Serialize};

/// One cycle's extracted (title, price, url) tuple. Re-derived every cycle,
/// persisted, then discarded; nothing is retained in memory across cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub title: String,
    pub price: f64,
    pub url: String,
}

/// A composed alert. Lives only long enough to be handed to the mail
/// transport.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

impl AlertMessage {
    pub fn price_drop(snapshot: &ProductSnapshot) -> Self {
        Self {
            subject: format!("Price Drop Alert for {}", snapshot.title),
            body: format!(
                "The price of '{}' has dropped to ${:.2}.\n\nYou can buy it here: {}",
                snapshot.title, snapshot.price, snapshot.url
            ),
        }
    }
}
