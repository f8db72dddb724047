use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest special request the booking form accepts
pub const MAX_SPECIAL_REQUEST_CHARS: usize = 500;

/// Venue style of an event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    Indoor,
    Outdoor,
    Pool,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventType::Indoor => "Indoor",
            EventType::Outdoor => "Outdoor",
            EventType::Pool => "Pool",
        };
        f.write_str(label)
    }
}

/// Fixed pricing level of an event package
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PackageTier {
    Basic,
    Premium,
    Luxury,
}

impl PackageTier {
    pub const ALL: [PackageTier; 3] = [PackageTier::Basic, PackageTier::Premium, PackageTier::Luxury];

    /// List price in minor units (Rs. 30,000 / 50,000 / 80,000)
    pub fn list_price_minor(&self) -> i64 {
        match self {
            PackageTier::Basic => 3_000_000,
            PackageTier::Premium => 5_000_000,
            PackageTier::Luxury => 8_000_000,
        }
    }
}

impl fmt::Display for PackageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PackageTier::Basic => "Basic",
            PackageTier::Premium => "Premium",
            PackageTier::Luxury => "Luxury",
        };
        f.write_str(label)
    }
}

/// Booking form output before it has been checked.
///
/// This is the shape carried across navigation; `BookingSelection::new` is the
/// only way to turn it into something the checkout screen accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub event_name: String,
    pub event_theme: String,
    pub event_date: NaiveDate,
    pub event_type: EventType,
    #[serde(rename = "noOfGuest")]
    pub guest_count: i64,
    #[serde(default)]
    pub special_request: String,
    #[serde(rename = "eventPackage")]
    pub package_tier: PackageTier,
    /// Explicit upstream price; `None` means the tier's list price
    #[serde(default)]
    pub price_override_minor: Option<i64>,
}

/// The event package a customer picked, frozen for checkout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingSelection {
    event_name: String,
    event_theme: String,
    event_date: NaiveDate,
    event_type: EventType,
    guest_count: u32,
    special_request: String,
    package_tier: PackageTier,
    package_price_minor: i64,
}

impl BookingSelection {
    pub fn new(draft: BookingDraft) -> Result<Self, BookingError> {
        if draft.event_name.trim().is_empty() {
            return Err(BookingError::MissingField("eventName"));
        }

        let guest_count = u32::try_from(draft.guest_count)
            .map_err(|_| BookingError::InvalidGuestCount(draft.guest_count))?;

        let request_len = draft.special_request.chars().count();
        if request_len > MAX_SPECIAL_REQUEST_CHARS {
            return Err(BookingError::SpecialRequestTooLong(request_len));
        }

        let package_price_minor = match draft.price_override_minor {
            Some(price) if price < 0 => return Err(BookingError::NegativePrice(price)),
            Some(price) => price,
            None => draft.package_tier.list_price_minor(),
        };

        Ok(Self {
            event_name: draft.event_name,
            event_theme: draft.event_theme,
            event_date: draft.event_date,
            event_type: draft.event_type,
            guest_count,
            special_request: draft.special_request,
            package_tier: draft.package_tier,
            package_price_minor,
        })
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn event_theme(&self) -> &str {
        &self.event_theme
    }

    pub fn event_date(&self) -> NaiveDate {
        self.event_date
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn guest_count(&self) -> u32 {
        self.guest_count
    }

    pub fn special_request(&self) -> &str {
        &self.special_request
    }

    pub fn package_tier(&self) -> PackageTier {
        self.package_tier
    }

    pub fn package_price_minor(&self) -> i64 {
        self.package_price_minor
    }

    /// Human readable one-liner sent as the payment's order summary
    pub fn order_summary(&self) -> String {
        format!(
            "Event: {}, Theme: {}, Package: {}",
            self.event_name, self.event_theme, self.package_tier
        )
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Booking field is required: {0}")]
    MissingField(&'static str),

    #[error("Guest count must be zero or more, got {0}")]
    InvalidGuestCount(i64),

    #[error("Special request is {0} characters, limit is 500")]
    SpecialRequestTooLong(usize),

    #[error("Package price cannot be negative: {0}")]
    NegativePrice(i64),
}
