use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_NAME_CHARS: usize = 3;
pub const MIN_ADDRESS_CHARS: usize = 10;
pub const PHONE_DIGITS: usize = 10;
pub const CARD_DIGITS: usize = 16;
pub const CVV_DIGITS: usize = 3;

lazy_static! {
    /// local@domain.tld, no whitespace, a single `@`
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern");

    static ref PHONE_REGEX: Regex =
        Regex::new(r"^[0-9]{10}$").expect("Invalid regex pattern");

    /// MM/YY with MM in 01-12
    static ref EXPIRY_REGEX: Regex =
        Regex::new(r"^(0[1-9]|1[0-2])/([0-9]{2})$").expect("Invalid regex pattern");

    static ref CVV_REGEX: Regex =
        Regex::new(r"^[0-9]{3}$").expect("Invalid regex pattern");
}

/// Editable fields of the checkout form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    PhoneNumber,
    Address,
    CardNumber,
    CardType,
    ExpDate,
    Cvv,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Email,
        Field::PhoneNumber,
        Field::Address,
        Field::CardNumber,
        Field::CardType,
        Field::ExpDate,
        Field::Cvv,
    ];

    /// Wire / form key, e.g. `phoneNumber`
    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::PhoneNumber => "phoneNumber",
            Field::Address => "address",
            Field::CardNumber => "cardNumber",
            Field::CardType => "cardType",
            Field::ExpDate => "expDate",
            Field::Cvv => "cvv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::PhoneNumber => "Phone number",
            Field::Address => "Address",
            Field::CardNumber => "Card number",
            Field::CardType => "Card type",
            Field::ExpDate => "Expiration date",
            Field::Cvv => "CVV",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Why a single field value was rejected. Display is the message shown under the field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{} is required", .0.label())]
    Required(Field),

    #[error("{} must be at least {min} characters", .field.label())]
    TooShort { field: Field, min: usize },

    #[error("{} can only contain letters and spaces", .0.label())]
    InvalidCharacters(Field),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("{} can only contain digits", .0.label())]
    DigitsOnly(Field),

    #[error("{} must be {expected} digits", .field.label())]
    WrongLength { field: Field, expected: usize },

    #[error("Invalid format (MM/YY)")]
    InvalidExpiryFormat,

    #[error("Card has expired")]
    Expired,
}

pub type FieldResult = Result<(), ValidationError>;

/// Run the validator that belongs to `field`.
///
/// `today` only matters for the expiry check.
pub fn validate(field: Field, value: &str, today: NaiveDate) -> FieldResult {
    match field {
        Field::Name => validate_name(value),
        Field::Email => validate_email(value),
        Field::PhoneNumber => validate_phone(value),
        Field::Address => validate_address(value),
        Field::CardNumber => validate_card_number(value),
        Field::CardType => validate_card_type(value),
        Field::ExpDate => validate_exp_date(value, today),
        Field::Cvv => validate_cvv(value),
    }
}

pub fn validate_name(name: &str) -> FieldResult {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(Field::Name));
    }
    if trimmed.chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::TooShort { field: Field::Name, min: MIN_NAME_CHARS });
    }
    if !name.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
        return Err(ValidationError::InvalidCharacters(Field::Name));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> FieldResult {
    if email.is_empty() {
        return Err(ValidationError::Required(Field::Email));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> FieldResult {
    if phone.is_empty() {
        return Err(ValidationError::Required(Field::PhoneNumber));
    }
    if !PHONE_REGEX.is_match(phone) {
        return Err(ValidationError::WrongLength {
            field: Field::PhoneNumber,
            expected: PHONE_DIGITS,
        });
    }
    Ok(())
}

pub fn validate_address(address: &str) -> FieldResult {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(Field::Address));
    }
    if trimmed.chars().count() < MIN_ADDRESS_CHARS {
        return Err(ValidationError::TooShort { field: Field::Address, min: MIN_ADDRESS_CHARS });
    }
    Ok(())
}

/// Card number with display spacing removed
pub fn strip_card_spacing(card_number: &str) -> String {
    card_number.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn validate_card_number(card_number: &str) -> FieldResult {
    let cleaned = strip_card_spacing(card_number);
    if cleaned.is_empty() {
        return Err(ValidationError::Required(Field::CardNumber));
    }
    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::DigitsOnly(Field::CardNumber));
    }
    if cleaned.len() != CARD_DIGITS {
        return Err(ValidationError::WrongLength {
            field: Field::CardNumber,
            expected: CARD_DIGITS,
        });
    }
    Ok(())
}

pub fn validate_card_type(card_type: &str) -> FieldResult {
    if card_type.trim().is_empty() {
        return Err(ValidationError::Required(Field::CardType));
    }
    Ok(())
}

pub fn validate_exp_date(exp_date: &str, today: NaiveDate) -> FieldResult {
    if exp_date.is_empty() {
        return Err(ValidationError::Required(Field::ExpDate));
    }

    let caps = EXPIRY_REGEX
        .captures(exp_date)
        .ok_or(ValidationError::InvalidExpiryFormat)?;
    let month: u32 = caps[1].parse().map_err(|_| ValidationError::InvalidExpiryFormat)?;
    let year: i32 = caps[2].parse().map_err(|_| ValidationError::InvalidExpiryFormat)?;

    let current_year = today.year().rem_euclid(100);
    let current_month = today.month();
    if year < current_year || (year == current_year && month < current_month) {
        return Err(ValidationError::Expired);
    }
    Ok(())
}

pub fn validate_cvv(cvv: &str) -> FieldResult {
    if cvv.is_empty() {
        return Err(ValidationError::Required(Field::Cvv));
    }
    if !CVV_REGEX.is_match(cvv) {
        return Err(ValidationError::WrongLength { field: Field::Cvv, expected: CVV_DIGITS });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name("   "), Err(ValidationError::Required(Field::Name)));
        assert_eq!(
            validate_name(" Al "),
            Err(ValidationError::TooShort { field: Field::Name, min: 3 })
        );
        assert_eq!(validate_name("R2D2 Unit"), Err(ValidationError::InvalidCharacters(Field::Name)));
        assert_eq!(validate_name("Nimal Perera"), Ok(()));
    }

    #[test]
    fn test_email_rules() {
        assert_eq!(validate_email(""), Err(ValidationError::Required(Field::Email)));
        assert_eq!(validate_email("not-an-email"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a b@c.co"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a@b"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a@b.co"), Ok(()));
        assert_eq!(validate_email("first.last@mail.example.org"), Ok(()));
        assert_eq!(
            validate_email("not-an-email").unwrap_err().to_string(),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn test_phone_rules() {
        assert_eq!(validate_phone(""), Err(ValidationError::Required(Field::PhoneNumber)));
        assert_eq!(
            validate_phone("12345"),
            Err(ValidationError::WrongLength { field: Field::PhoneNumber, expected: 10 })
        );
        assert!(validate_phone("07712345a9").is_err());
        assert_eq!(validate_phone("0771234567"), Ok(()));
        assert_eq!(
            validate_phone("12345").unwrap_err().to_string(),
            "Phone number must be 10 digits"
        );
    }

    #[test]
    fn test_address_rules() {
        assert_eq!(validate_address(""), Err(ValidationError::Required(Field::Address)));
        assert_eq!(
            validate_address("  Colombo  "),
            Err(ValidationError::TooShort { field: Field::Address, min: 10 })
        );
        assert_eq!(validate_address("12 Galle Road, Colombo"), Ok(()));
    }

    #[test]
    fn test_card_number_accepts_exactly_sixteen_digits() {
        assert_eq!(validate_card_number("4111111111111111"), Ok(()));
        assert_eq!(validate_card_number("4111 1111 1111 1111"), Ok(()));
        assert_eq!(validate_card_number("   "), Err(ValidationError::Required(Field::CardNumber)));
        assert_eq!(
            validate_card_number("4111-1111-1111-1111"),
            Err(ValidationError::DigitsOnly(Field::CardNumber))
        );
        for len in [1usize, 13, 15, 17, 19] {
            let digits = "4".repeat(len);
            assert_eq!(
                validate_card_number(&digits),
                Err(ValidationError::WrongLength { field: Field::CardNumber, expected: 16 }),
                "length {}",
                len
            );
        }
    }

    #[test]
    fn test_card_type_required() {
        assert_eq!(validate_card_type(""), Err(ValidationError::Required(Field::CardType)));
        assert_eq!(validate_card_type("Visa"), Ok(()));
    }

    #[test]
    fn test_expiry_rules() {
        assert_eq!(validate_exp_date("", today()), Err(ValidationError::Required(Field::ExpDate)));
        assert_eq!(validate_exp_date("13/27", today()), Err(ValidationError::InvalidExpiryFormat));
        assert_eq!(validate_exp_date("00/27", today()), Err(ValidationError::InvalidExpiryFormat));
        assert_eq!(validate_exp_date("1027", today()), Err(ValidationError::InvalidExpiryFormat));
        assert_eq!(validate_exp_date("9/27", today()), Err(ValidationError::InvalidExpiryFormat));

        // strictly before the current month
        assert_eq!(validate_exp_date("09/26", today()), Err(ValidationError::Expired));
        assert_eq!(validate_exp_date("12/25", today()), Err(ValidationError::Expired));

        // current month or later
        assert_eq!(validate_exp_date("10/26", today()), Ok(()));
        assert_eq!(validate_exp_date("11/26", today()), Ok(()));
        assert_eq!(validate_exp_date("01/27", today()), Ok(()));
    }

    #[test]
    fn test_expiry_compares_two_digit_years() {
        let turn_of_century = NaiveDate::from_ymd_opt(2100, 3, 1).unwrap();
        assert_eq!(validate_exp_date("04/00", turn_of_century), Ok(()));
        assert_eq!(validate_exp_date("02/00", turn_of_century), Err(ValidationError::Expired));
    }

    #[test]
    fn test_cvv_rules() {
        assert_eq!(validate_cvv(""), Err(ValidationError::Required(Field::Cvv)));
        assert_eq!(
            validate_cvv("12"),
            Err(ValidationError::WrongLength { field: Field::Cvv, expected: 3 })
        );
        assert!(validate_cvv("1234").is_err());
        assert!(validate_cvv("12a").is_err());
        assert_eq!(validate_cvv("123"), Ok(()));
    }

    #[test]
    fn test_validate_dispatches_by_field() {
        assert_eq!(
            validate(Field::Email, "not-an-email", today()),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(validate(Field::ExpDate, "10/26", today()), Ok(()));
        assert_eq!(Field::PhoneNumber.key(), "phoneNumber");
    }
}
