use festivo_shared::Money;
use serde::{Deserialize, Deserializer, Serialize};

/// A stored payment as the backend lists it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub card_type: String,
    #[serde(default)]
    pub exp_date: String,
    /// The backend spells it `orderSummery`
    #[serde(default, alias = "orderSummery")]
    pub order_summary: String,
    /// Minor units
    #[serde(default)]
    pub amount: i64,
}

impl PaymentRecord {
    pub fn amount(&self) -> Money {
        Money::from_minor(self.amount)
    }

    /// Case-insensitive match on name or email, or a phone substring
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        let lower = term.to_lowercase();
        self.name.to_lowercase().contains(&lower)
            || self.email.to_lowercase().contains(&lower)
            || self.phone_number.as_deref().is_some_and(|p| p.contains(term))
    }
}

/// The list endpoint answers with either a bare array or an object wrapping one
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PaymentListResponse {
    List(Vec<PaymentRecord>),
    Wrapped {
        #[serde(alias = "payments", alias = "content", alias = "items")]
        data: Vec<PaymentRecord>,
    },
}

impl PaymentListResponse {
    pub fn into_records(self) -> Vec<PaymentRecord> {
        match self {
            PaymentListResponse::List(records) => records,
            PaymentListResponse::Wrapped { data } => data,
        }
    }
}

/// Filter records the way the admin payment listing does
pub fn search<'a>(records: &'a [PaymentRecord], term: &str) -> Vec<&'a PaymentRecord> {
    records.iter().filter(|r| r.matches(term)).collect()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records_json() -> serde_json::Value {
        serde_json::json!([
            {
                "id": "66a1",
                "name": "Nimal Perera",
                "email": "nimal@example.com",
                "phoneNumber": 771234567,
                "cardNumber": 4111111111111111u64,
                "cardType": "Visa",
                "expDate": "12/27",
                "cvv": 123,
                "orderSummery": "Event: Birthday Party, Package: Premium",
                "amount": 5750000
            },
            {
                "id": "66a2",
                "name": "Ayesha Fernando",
                "email": "ayesha@example.com",
                "phoneNumber": "0719876543",
                "amount": 3450000
            }
        ])
    }

    #[test]
    fn test_bare_array_and_wrapped_normalize_the_same() {
        let bare: PaymentListResponse = serde_json::from_value(records_json()).unwrap();
        let wrapped: PaymentListResponse =
            serde_json::from_value(serde_json::json!({ "data": records_json() })).unwrap();
        let aliased: PaymentListResponse =
            serde_json::from_value(serde_json::json!({ "payments": records_json() })).unwrap();

        let bare = bare.into_records();
        assert_eq!(bare.len(), 2);
        assert_eq!(bare, wrapped.into_records());
        assert_eq!(bare, aliased.into_records());
        assert_eq!(bare[0].order_summary, "Event: Birthday Party, Package: Premium");
        assert_eq!(bare[0].phone_number.as_deref(), Some("771234567"));
        assert_eq!(bare[0].amount().to_string(), "Rs. 57,500.00");
    }

    #[test]
    fn test_search_by_name_email_or_phone() {
        let records: Vec<PaymentRecord> = serde_json::from_value(records_json()).unwrap();
        assert_eq!(search(&records, "NIMAL").len(), 1);
        assert_eq!(search(&records, "ayesha@").len(), 1);
        assert_eq!(search(&records, "0719").len(), 1);
        assert_eq!(search(&records, "example.com").len(), 2);
        assert_eq!(search(&records, "").len(), 2);
        assert!(search(&records, "nobody").is_empty());
    }
}
