//! Desk Records
//!
//! What the lookup tools hand back to the supervisor. Serialized as-is into
//! tool results.

use serde::{Deserialize, Serialize};

/// Internal policy or guidance document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub id: String,
    pub title: String,
    pub topic: String,
    pub content: String,
}

impl PolicyDocument {
    /// Whether any keyword of `query` appears in the document
    ///
    /// Words shorter than three characters are ignored; a query with no
    /// usable words matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let haystack = format!("{} {} {}", self.title, self.topic, self.content).to_lowercase();
        let mut keywords = query
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() >= 3)
            .map(str::to_lowercase)
            .peekable();

        if keywords.peek().is_none() {
            return true;
        }
        keywords.any(|w| haystack.contains(&w))
    }
}

/// Shipment attached to an account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub tracking_number: String,
    pub route: String,
    pub mode: String,
    pub status: String,
    pub eta: String,
}

/// Customer account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub balance_due: String,
    pub preferred_language: String,
    pub shipments: Vec<Shipment>,
}

impl Account {
    /// Phone number reduced to digits
    pub fn phone_digits(&self) -> String {
        digits(&self.phone)
    }
}

/// Warehouse or pickup point
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub name: String,
    pub city: String,
    pub address: String,
    pub zip_code: String,
    pub phone: String,
    pub hours: String,
}

impl Warehouse {
    /// Numeric distance between postal codes, a stand-in for geography
    pub fn zip_distance(&self, zip: u32) -> Option<u32> {
        digits(&self.zip_code).parse::<u32>().ok().map(|own| own.abs_diff(zip))
    }
}

/// Keep only ASCII digits
pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
