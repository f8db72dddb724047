use async_trait::async_trait;
use festivo_shared::{BookingSelection, Masked, Money};
use serde::{Deserialize, Serialize};

pub const GENERIC_FAILURE_MESSAGE: &str = "Payment processing failed. Please try again.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Success,
    Failure,
}

/// Outcome of one submit attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSubmissionResult {
    pub transaction_id: Option<String>,
    pub amount: Money,
    pub status: PaymentStatus,
    pub error_message: Option<String>,
}

impl PaymentSubmissionResult {
    pub fn success(transaction_id: String, amount: Money) -> Self {
        Self {
            transaction_id: Some(transaction_id),
            amount,
            status: PaymentStatus::Success,
            error_message: None,
        }
    }

    pub fn failure(amount: Money, message: impl Into<String>) -> Self {
        Self {
            transaction_id: None,
            amount,
            status: PaymentStatus::Failure,
            error_message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PaymentStatus::Success
    }
}

/// Booking details nested in the payment payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub event_name: String,
    pub event_theme: String,
    /// YYYY-MM-DD
    pub event_date: String,
    pub event_type: String,
    pub no_of_guest: u32,
    pub special_request: String,
    pub event_package: String,
    /// Minor units
    pub package_price: i64,
}

impl From<&BookingSelection> for EventDetails {
    fn from(booking: &BookingSelection) -> Self {
        Self {
            event_name: booking.event_name().to_string(),
            event_theme: booking.event_theme().to_string(),
            event_date: booking.event_date().format("%Y-%m-%d").to_string(),
            event_type: booking.event_type().to_string(),
            no_of_guest: booking.guest_count(),
            special_request: booking.special_request().to_string(),
            event_package: booking.package_tier().to_string(),
            package_price: booking.package_price_minor(),
        }
    }
}

/// JSON body posted to the payments endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    /// Digits only
    pub card_number: Masked<String>,
    pub card_type: String,
    /// MM/YY
    pub exp_date: String,
    pub cvv: Masked<String>,
    pub order_summary: String,
    /// Total payable, minor units
    pub amount: i64,
    pub event_details: EventDetails,
}

/// What the collaborator answered on a 2xx with a body
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentAck {
    pub transaction_id: Option<String>,
    pub body: serde_json::Value,
}

impl PaymentAck {
    /// Read `transactionId` out of a response body; `Null` counts as no body
    pub fn from_body(body: serde_json::Value) -> Result<Self, PaymentError> {
        if body.is_null() {
            return Err(PaymentError::EmptyBody);
        }
        let transaction_id = body
            .get("transactionId")
            .and_then(|v| match v {
                serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
        Ok(Self { transaction_id, body })
    }
}

/// Ways a payment attempt can fail. Display is the banner text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    /// The server explained itself in a `message` field
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Server error: {status} - {status_text}")]
    Status { status: u16, status_text: String },

    #[error("No response received from server. Please check your connection.")]
    NoResponse(String),

    #[error("No response data received")]
    EmptyBody,

    #[error("Request error: {0}")]
    Request(String),

    #[error("Payment processing failed. Please try again.")]
    Other(String),
}

impl PaymentError {
    /// Classify a non-2xx answer: a non-empty `message` in the JSON body wins over the status line
    pub fn from_response(status: u16, status_text: &str, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .filter(|m| !m.trim().is_empty());

        match message {
            Some(message) => PaymentError::Rejected { status, message },
            None => PaymentError::Status {
                status,
                status_text: status_text.to_string(),
            },
        }
    }

    /// Text for the error banner
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// The backend endpoint that records a payment
#[async_trait]
pub trait PaymentCollaborator: Send + Sync {
    /// Post one payment. `token` becomes a bearer header when present.
    async fn submit_payment(
        &self,
        request: &PaymentRequest,
        token: Option<&str>,
    ) -> Result<PaymentAck, PaymentError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use festivo_shared::{BookingDraft, EventType, PackageTier};

    #[test]
    fn test_message_field_has_priority() {
        let err = PaymentError::from_response(400, "Bad Request", r#"{"message":"Card declined"}"#);
        assert_eq!(err.user_message(), "Card declined");

        let err = PaymentError::from_response(500, "Internal Server Error", "<html>oops</html>");
        assert_eq!(err.user_message(), "Server error: 500 - Internal Server Error");

        let err = PaymentError::from_response(502, "Bad Gateway", r#"{"message":"  "}"#);
        assert!(matches!(err, PaymentError::Status { status: 502, .. }));
    }

    #[test]
    fn test_fallback_messages() {
        assert_eq!(
            PaymentError::NoResponse("connection refused".into()).user_message(),
            "No response received from server. Please check your connection."
        );
        assert_eq!(PaymentError::Other("boom".into()).user_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(PaymentError::EmptyBody.user_message(), "No response data received");
    }

    #[test]
    fn test_ack_reads_transaction_id() {
        let ack = PaymentAck::from_body(serde_json::json!({"transactionId": "TXN1"})).unwrap();
        assert_eq!(ack.transaction_id.as_deref(), Some("TXN1"));

        let ack = PaymentAck::from_body(serde_json::json!({"id": "abc"})).unwrap();
        assert_eq!(ack.transaction_id, None);

        assert_eq!(PaymentAck::from_body(serde_json::Value::Null), Err(PaymentError::EmptyBody));
    }

    #[test]
    fn test_request_serializes_wire_names() {
        let booking = BookingSelection::new(BookingDraft {
            event_name: "Birthday Party".into(),
            event_theme: "Fairy Tale Magic".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 12, 5).unwrap(),
            event_type: EventType::Outdoor,
            guest_count: 40,
            special_request: String::new(),
            package_tier: PackageTier::Basic,
            price_override_minor: None,
        })
        .unwrap();

        let request = PaymentRequest {
            name: "Nimal Perera".into(),
            email: "nimal@example.com".into(),
            phone_number: "0771234567".into(),
            address: "12 Galle Road, Colombo".into(),
            card_number: Masked("4111111111111111".into()),
            card_type: "Visa".into(),
            exp_date: "12/27".into(),
            cvv: Masked("123".into()),
            order_summary: booking.order_summary(),
            amount: 3_450_000,
            event_details: EventDetails::from(&booking),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["cardNumber"], "4111111111111111");
        assert_eq!(json["phoneNumber"], "0771234567");
        assert_eq!(json["eventDetails"]["noOfGuest"], 40);
        assert_eq!(json["eventDetails"]["eventPackage"], "Basic");
        assert_eq!(json["eventDetails"]["eventDate"], "2026-12-05");
        assert_eq!(json["eventDetails"]["packagePrice"], 3_000_000);
        assert!(!format!("{:?}", request).contains("4111111111111111"));
    }
}
