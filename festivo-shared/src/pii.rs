use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A wrapper for sensitive data that masks its value in Debug and Display output.
///
/// Serialization still writes the real value so payloads stay intact.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Show only the last four digits of a card number, e.g. `•••• 1111`
pub fn mask_card_number(card_number: &str) -> String {
    let digits: Vec<char> = card_number.chars().filter(|c| c.is_ascii_digit()).collect();
    let last4: String = digits.iter().skip(digits.len().saturating_sub(4)).collect();
    format!("•••• {}", last4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_hides_value_in_logs() {
        let cvv = Masked("123".to_string());
        assert_eq!(format!("{:?}", cvv), "********");
        assert_eq!(cvv.to_string(), "********");
        assert_eq!(serde_json::to_string(&cvv).unwrap(), "\"123\"");
    }

    #[test]
    fn test_mask_card_number_keeps_last_four() {
        assert_eq!(mask_card_number("4111 1111 1111 1234"), "•••• 1234");
        assert_eq!(mask_card_number("12"), "•••• 12");
    }
}
