use festivo_core::session::Prefill;
use festivo_core::validation::{self, Field, ValidationError, CARD_DIGITS, CVV_DIGITS};
use festivo_core::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{FieldState, FormVerdict};

pub const DEFAULT_CARD_TYPE: &str = "Visa";

#[derive(Debug, Clone, Default)]
struct FieldEntry {
    value: String,
    touched: bool,
    error: Option<ValidationError>,
}

/// The in-progress payment form: raw values, touched flags and derived errors
pub struct CheckoutForm {
    fields: BTreeMap<Field, FieldEntry>,
    clock: Arc<dyn Clock>,
}

impl CheckoutForm {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_prefill(&Prefill::default(), clock)
    }

    pub fn with_prefill(prefill: &Prefill, clock: Arc<dyn Clock>) -> Self {
        let mut form = Self {
            fields: BTreeMap::new(),
            clock,
        };
        form.fill(prefill);
        form
    }

    fn fill(&mut self, prefill: &Prefill) {
        self.fields = Field::ALL
            .iter()
            .map(|field| {
                let value = match field {
                    Field::Name => prefill.name.clone(),
                    Field::Email => prefill.email.clone(),
                    Field::PhoneNumber => prefill.phone_number.clone(),
                    Field::Address => prefill.address.clone(),
                    Field::CardType => DEFAULT_CARD_TYPE.to_string(),
                    _ => String::new(),
                };
                (*field, FieldEntry { value, ..FieldEntry::default() })
            })
            .collect();
    }

    /// Back to untouched fields, e.g. for a new booking
    pub fn reset(&mut self, prefill: &Prefill) {
        self.fill(prefill);
    }

    fn entry(&self, field: Field) -> &FieldEntry {
        // every Field is inserted by fill()
        &self.fields[&field]
    }

    fn entry_mut(&mut self, field: Field) -> &mut FieldEntry {
        self.fields.entry(field).or_default()
    }

    fn run_validator(&self, field: Field, value: &str) -> Option<ValidationError> {
        validation::validate(field, value, self.clock.today()).err()
    }

    pub fn value(&self, field: Field) -> &str {
        &self.entry(field).value
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.entry(field).touched
    }

    pub fn error(&self, field: Field) -> Option<&ValidationError> {
        self.entry(field).error.as_ref()
    }

    pub fn field_state(&self, field: Field) -> FieldState {
        let entry = self.entry(field);
        match (entry.touched, &entry.error) {
            (false, _) => FieldState::Untouched,
            (true, None) => FieldState::TouchedValid,
            (true, Some(_)) => FieldState::TouchedInvalid,
        }
    }

    /// Store a keystroke, formatting card fields; re-validate if already touched
    pub fn on_change(&mut self, field: Field, raw: &str) {
        let value = match field {
            Field::CardNumber => format_card_number(raw),
            Field::ExpDate => format_exp_date(raw),
            Field::Cvv => format_cvv(raw),
            _ => raw.to_string(),
        };

        let error = if self.is_touched(field) {
            self.run_validator(field, &value)
        } else {
            self.entry(field).error.clone()
        };

        let entry = self.entry_mut(field);
        entry.value = value;
        entry.error = error;
    }

    pub fn on_blur(&mut self, field: Field) {
        let error = self.run_validator(field, self.value(field));
        let entry = self.entry_mut(field);
        entry.touched = true;
        entry.error = error;
    }

    /// Touch and validate every field, then report readiness
    pub fn on_submit_attempt(&mut self) -> FormVerdict {
        for field in Field::ALL {
            self.on_blur(field);
        }
        self.verdict()
    }

    pub fn verdict(&self) -> FormVerdict {
        let ready = self.fields.values().all(|e| e.touched && e.error.is_none());
        if ready {
            FormVerdict::Ready
        } else {
            FormVerdict::Incomplete
        }
    }

    /// Errors currently shown, in field order
    pub fn errors(&self) -> Vec<(Field, &ValidationError)> {
        self.fields
            .iter()
            .filter(|(_, e)| e.touched)
            .filter_map(|(f, e)| e.error.as_ref().map(|err| (*f, err)))
            .collect()
    }

    /// Card number as submitted: spacing removed
    pub fn card_number_digits(&self) -> String {
        validation::strip_card_spacing(self.value(Field::CardNumber))
    }
}

impl std::fmt::Debug for CheckoutForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutForm")
            .field("verdict", &self.verdict())
            .field("errors", &self.errors())
            .finish_non_exhaustive()
    }
}

/// Digits only, at most 16, grouped in fours: `4111 1111 1111 1111`
pub fn format_card_number(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).take(CARD_DIGITS).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Digits only with a `/` after the month, at most `MM/YY`
pub fn format_exp_date(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 2 {
        return digits;
    }
    let (month, year) = digits.split_at(2);
    format!("{}/{}", month, year).chars().take(5).collect()
}

pub fn format_cvv(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).take(CVV_DIGITS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use festivo_core::FixedClock;

    fn form() -> CheckoutForm {
        CheckoutForm::new(Arc::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())))
    }

    fn fill_valid(form: &mut CheckoutForm) {
        form.on_change(Field::Name, "Nimal Perera");
        form.on_change(Field::Email, "nimal@example.com");
        form.on_change(Field::PhoneNumber, "0771234567");
        form.on_change(Field::Address, "12 Galle Road, Colombo 03");
        form.on_change(Field::CardNumber, "4111111111111111");
        form.on_change(Field::ExpDate, "1227");
        form.on_change(Field::Cvv, "123");
    }

    #[test]
    fn test_card_number_formatting() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("4111-1111-11"), "4111 1111 11");
        assert_eq!(format_card_number("41111111111111119999"), "4111 1111 1111 1111");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_card_number_round_trip() {
        for digits in ["4111111111111111", "0000000000000000", "1234567812345678"] {
            let formatted = format_card_number(digits);
            assert_eq!(validation::strip_card_spacing(&formatted), digits);
            assert_eq!(format_card_number(&formatted), formatted);
        }
    }

    #[test]
    fn test_exp_date_and_cvv_formatting() {
        assert_eq!(format_exp_date("1"), "1");
        assert_eq!(format_exp_date("12"), "12/");
        assert_eq!(format_exp_date("122"), "12/2");
        assert_eq!(format_exp_date("1227"), "12/27");
        assert_eq!(format_exp_date("12/27"), "12/27");
        assert_eq!(format_exp_date("122799"), "12/27");
        assert_eq!(format_cvv("12a34"), "123");
    }

    #[test]
    fn test_fresh_form_is_untouched_and_incomplete() {
        let form = form();
        for field in Field::ALL {
            assert_eq!(form.field_state(field), FieldState::Untouched);
        }
        assert_eq!(form.value(Field::CardType), "Visa");
        assert_eq!(form.verdict(), FormVerdict::Incomplete);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_change_does_not_validate_untouched_field() {
        let mut form = form();
        form.on_change(Field::Email, "not-an-email");
        assert_eq!(form.error(Field::Email), None);
        assert_eq!(form.field_state(Field::Email), FieldState::Untouched);
    }

    #[test]
    fn test_blur_then_change_revalidates() {
        let mut form = form();
        form.on_change(Field::Email, "not-an-email");
        form.on_blur(Field::Email);
        assert_eq!(form.error(Field::Email), Some(&ValidationError::InvalidEmail));
        assert_eq!(form.field_state(Field::Email), FieldState::TouchedInvalid);

        form.on_change(Field::Email, "a@b.co");
        assert_eq!(form.error(Field::Email), None);
        assert_eq!(form.field_state(Field::Email), FieldState::TouchedValid);
    }

    #[test]
    fn test_blur_is_idempotent() {
        let mut form = form();
        form.on_change(Field::PhoneNumber, "12345");
        form.on_blur(Field::PhoneNumber);
        let first = form.error(Field::PhoneNumber).cloned();
        form.on_blur(Field::PhoneNumber);
        assert_eq!(form.error(Field::PhoneNumber).cloned(), first);
        assert!(first.is_some());
    }

    #[test]
    fn test_touched_flag_is_never_cleared_by_edits() {
        let mut form = form();
        form.on_blur(Field::Name);
        form.on_change(Field::Name, "");
        form.on_change(Field::Name, "Nimal Perera");
        assert!(form.is_touched(Field::Name));
    }

    #[test]
    fn test_card_input_is_formatted_on_change() {
        let mut form = form();
        form.on_change(Field::CardNumber, "4111111111111111");
        assert_eq!(form.value(Field::CardNumber), "4111 1111 1111 1111");
        assert_eq!(form.card_number_digits(), "4111111111111111");
    }

    #[test]
    fn test_submit_attempt_touches_everything() {
        let mut form = form();
        fill_valid(&mut form);
        form.on_change(Field::PhoneNumber, "12345");

        assert_eq!(form.on_submit_attempt(), FormVerdict::Incomplete);
        for field in Field::ALL {
            assert!(form.is_touched(field));
        }
        let errors = form.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, Field::PhoneNumber);
    }

    #[test]
    fn test_valid_form_is_ready() {
        let mut form = form();
        fill_valid(&mut form);
        assert_eq!(form.verdict(), FormVerdict::Incomplete);
        assert_eq!(form.on_submit_attempt(), FormVerdict::Ready);
    }

    #[test]
    fn test_reset_clears_touched_flags() {
        let mut form = form();
        fill_valid(&mut form);
        form.on_submit_attempt();

        let prefill = Prefill { name: "Kamal Silva".into(), ..Prefill::default() };
        form.reset(&prefill);
        assert_eq!(form.value(Field::Name), "Kamal Silva");
        assert_eq!(form.value(Field::CardNumber), "");
        assert!(Field::ALL.iter().all(|f| !form.is_touched(*f)));
    }

    #[test]
    fn test_debug_does_not_print_card_values() {
        let mut form = form();
        fill_valid(&mut form);
        assert!(!format!("{:?}", form).contains("4111"));
    }
}
