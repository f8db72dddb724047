use async_trait::async_trait;
use chrono::Utc;
use festivo_catalog::{PriceBreakdown, PricingEngine};
use festivo_core::payment::{
    EventDetails, PaymentAck, PaymentCollaborator, PaymentError, PaymentRequest,
    PaymentSubmissionResult,
};
use festivo_core::session::SessionContext;
use festivo_core::validation::Field;
use festivo_shared::{mask_card_number, BookingSelection, Masked, Money};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use crate::form::CheckoutForm;
use crate::models::{FormVerdict, PaymentConfirmation};
use crate::receipt::{Receipt, ReceiptCustomer};

pub const FIX_ERRORS_MESSAGE: &str = "Please fix the errors in the form";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please fix the errors in the form")]
    InvalidForm(Vec<Field>),

    #[error("A payment is already being processed")]
    InFlight,

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

impl SubmitError {
    /// Banner text shown above the form
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn into_result(self, amount: Money) -> PaymentSubmissionResult {
        PaymentSubmissionResult::failure(amount, self.user_message())
    }
}

/// Clears the in-flight flag however the attempt ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs one payment attempt: validate, post once, build the receipt
pub struct SubmissionController {
    collaborator: Arc<dyn PaymentCollaborator>,
    pricing: PricingEngine,
    session: SessionContext,
    in_flight: AtomicBool,
}

impl SubmissionController {
    pub fn new(
        collaborator: Arc<dyn PaymentCollaborator>,
        pricing: PricingEngine,
        session: SessionContext,
    ) -> Self {
        Self {
            collaborator,
            pricing,
            session,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn breakdown(&self, booking: &BookingSelection) -> PriceBreakdown {
        self.pricing.compute_totals(Some(booking.package_price_minor()))
    }

    /// True while a request is awaiting the backend; the trigger stays disabled
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn build_request(form: &CheckoutForm, booking: &BookingSelection, amount: Money) -> PaymentRequest {
        PaymentRequest {
            name: form.value(Field::Name).to_string(),
            email: form.value(Field::Email).to_string(),
            phone_number: form.value(Field::PhoneNumber).to_string(),
            address: form.value(Field::Address).to_string(),
            card_number: Masked(form.card_number_digits()),
            card_type: form.value(Field::CardType).to_string(),
            exp_date: form.value(Field::ExpDate).to_string(),
            cvv: Masked(form.value(Field::Cvv).to_string()),
            order_summary: booking.order_summary(),
            amount: amount.minor(),
            event_details: EventDetails::from(booking),
        }
    }

    /// Submit the form for `booking`. Never retries; the form keeps its values on failure.
    pub async fn submit(
        &self,
        form: &mut CheckoutForm,
        booking: &BookingSelection,
    ) -> Result<PaymentConfirmation, SubmitError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Ignoring submit while a payment is in flight");
            return Err(SubmitError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        if form.on_submit_attempt() != FormVerdict::Ready {
            let fields: Vec<Field> = form.errors().into_iter().map(|(f, _)| f).collect();
            info!("Payment form incomplete, {} field(s) invalid", fields.len());
            return Err(SubmitError::InvalidForm(fields));
        }

        let breakdown = self.breakdown(booking);
        let total = breakdown.total_amount;
        let request = Self::build_request(form, booking, total);
        let token = self.session.token();

        info!(
            "Submitting payment for {} ({}, card {})",
            booking.event_name(),
            total,
            mask_card_number(&request.card_number.0)
        );

        let ack = match self.collaborator.submit_payment(&request, token.as_deref()).await {
            Ok(ack) => ack,
            Err(e) => {
                error!("Payment failed: {}", e);
                return Err(e.into());
            }
        };

        let transaction_id = ack
            .transaction_id
            .unwrap_or_else(|| Utc::now().timestamp_millis().to_string());
        info!("Payment confirmed, transaction {}", transaction_id);

        let receipt = Receipt::new(
            transaction_id.clone(),
            ReceiptCustomer::from_form(form),
            booking.clone(),
            breakdown,
        );

        Ok(PaymentConfirmation {
            payment: PaymentSubmissionResult::success(transaction_id, total),
            booking: booking.clone(),
            receipt,
        })
    }
}

/// Collaborator that answers from a script and records what it was sent
pub struct MockPaymentCollaborator {
    outcome: Result<PaymentAck, PaymentError>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(PaymentRequest, Option<String>)>>,
    delay: Option<std::time::Duration>,
}

impl MockPaymentCollaborator {
    pub fn succeeding(transaction_id: Option<&str>) -> Self {
        let body = match transaction_id {
            Some(id) => serde_json::json!({ "transactionId": id }),
            None => serde_json::json!({}),
        };
        Self::with_outcome(Ok(PaymentAck {
            transaction_id: transaction_id.map(str::to_string),
            body,
        }))
    }

    pub fn failing(error: PaymentError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<PaymentAck, PaymentError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Hold every answer for `delay` to simulate a slow backend
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(PaymentRequest, Option<String>)> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PaymentCollaborator for MockPaymentCollaborator {
    async fn submit_payment(
        &self,
        request: &PaymentRequest,
        token: Option<&str>,
    ) -> Result<PaymentAck, PaymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((request.clone(), token.map(str::to_string)));
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}
