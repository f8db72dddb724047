use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of rupees held as integer paise
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub fn from_major(major: i64) -> Self {
        Self(major.saturating_mul(100))
    }

    pub fn minor(&self) -> i64 {
        self.0
    }
}

/// Indian digit grouping: last three digits, then pairs (12,34,567)
fn group_en_in(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}Rs. {}.{:02}", sign, group_en_in(abs / 100), abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_indian_grouping() {
        assert_eq!(Money::from_major(57_500).to_string(), "Rs. 57,500.00");
        assert_eq!(Money::from_major(1_234_567).to_string(), "Rs. 12,34,567.00");
        assert_eq!(Money::from_minor(575).to_string(), "Rs. 5.75");
        assert_eq!(Money::from_minor(-1_050).to_string(), "-Rs. 10.50");
        assert_eq!(Money::ZERO.to_string(), "Rs. 0.00");
    }
}
