use festivo_core::payment::PaymentSubmissionResult;
use festivo_shared::BookingSelection;
use serde::{Deserialize, Serialize};

use crate::receipt::Receipt;

/// Per-field interaction state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldState {
    Untouched,
    TouchedValid,
    TouchedInvalid,
}

/// Whole-form readiness; only `Ready` may be submitted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormVerdict {
    Incomplete,
    Ready,
}

/// State carried to the confirmation route after a successful payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub payment: PaymentSubmissionResult,
    pub booking: BookingSelection,
    pub receipt: Receipt,
}
