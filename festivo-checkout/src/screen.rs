use festivo_catalog::{PriceBreakdown, PricingEngine};
use festivo_core::payment::{PaymentCollaborator, PaymentSubmissionResult};
use festivo_core::session::SessionContext;
use festivo_core::validation::Field;
use festivo_core::{Clock, CoreResult};
use festivo_shared::{BookingDraft, BookingSelection};
use festivo_store::app_config::CheckoutConfig;
use festivo_store::Config;
use std::sync::Arc;
use tracing::{info, warn};

use crate::countdown::{Navigator, RedirectCountdown};
use crate::form::CheckoutForm;
use crate::models::PaymentConfirmation;
use crate::orchestrator::SubmissionController;

/// One mounted checkout page: the booking being paid for, its form, and the
/// redirect timer once payment succeeds
pub struct CheckoutScreen {
    booking: BookingSelection,
    form: CheckoutForm,
    controller: SubmissionController,
    session: SessionContext,
    navigator: Arc<dyn Navigator>,
    checkout: CheckoutConfig,
    error_banner: Option<String>,
    last_result: Option<PaymentSubmissionResult>,
    confirmation: Option<PaymentConfirmation>,
    countdown: Option<RedirectCountdown>,
}

impl CheckoutScreen {
    /// Validate the incoming booking and pre-fill the form from the session
    pub fn mount(
        draft: BookingDraft,
        session: SessionContext,
        collaborator: Arc<dyn PaymentCollaborator>,
        navigator: Arc<dyn Navigator>,
        config: &Config,
        clock: Arc<dyn Clock>,
    ) -> CoreResult<Self> {
        let booking = BookingSelection::new(draft)?;
        let form = CheckoutForm::with_prefill(&session.prefill(), clock);
        let controller = SubmissionController::new(
            collaborator,
            PricingEngine::new(config.pricing),
            session.clone(),
        );

        info!("Checkout mounted for {} ({})", booking.event_name(), booking.package_tier());

        Ok(Self {
            booking,
            form,
            controller,
            session,
            navigator,
            checkout: config.checkout.clone(),
            error_banner: None,
            last_result: None,
            confirmation: None,
            countdown: None,
        })
    }

    pub fn booking(&self) -> &BookingSelection {
        &self.booking
    }

    pub fn breakdown(&self) -> PriceBreakdown {
        self.controller.breakdown(&self.booking)
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    pub fn on_change(&mut self, field: Field, value: &str) {
        self.form.on_change(field, value);
    }

    pub fn on_blur(&mut self, field: Field) {
        self.form.on_blur(field);
    }

    /// The pay button is disabled while this is true
    pub fn is_submitting(&self) -> bool {
        self.controller.is_in_flight()
    }

    pub fn error_banner(&self) -> Option<&str> {
        self.error_banner.as_deref()
    }

    pub fn last_result(&self) -> Option<&PaymentSubmissionResult> {
        self.last_result.as_ref()
    }

    pub fn confirmation(&self) -> Option<&PaymentConfirmation> {
        self.confirmation.as_ref()
    }

    /// `Visa •••• 1111` once paid
    pub fn card_display(&self) -> Option<String> {
        self.confirmation
            .as_ref()
            .map(|c| format!("{} {}", c.receipt.customer.card_type, c.receipt.customer.card_masked))
    }

    /// Pay for the booking. On success the redirect countdown starts.
    pub async fn submit(&mut self) -> PaymentSubmissionResult {
        if let (Some(result), Some(_)) = (&self.last_result, &self.confirmation) {
            warn!("Booking already paid, ignoring submit");
            return result.clone();
        }

        let total = self.breakdown().total_amount;
        let result = match self.controller.submit(&mut self.form, &self.booking).await {
            Ok(confirmation) => {
                self.error_banner = None;
                self.countdown = Some(RedirectCountdown::start(
                    self.checkout.redirect_seconds,
                    self.checkout.success_route.clone(),
                    confirmation.clone(),
                    self.navigator.clone(),
                ));
                let result = confirmation.payment.clone();
                self.confirmation = Some(confirmation);
                result
            }
            Err(e) => {
                self.error_banner = Some(e.user_message());
                e.into_result(total)
            }
        };

        self.last_result = Some(result.clone());
        result
    }

    pub fn countdown_remaining(&self) -> Option<u32> {
        self.countdown.as_ref().map(RedirectCountdown::remaining)
    }

    /// "Go now": redirect without waiting for the countdown
    pub fn go_now(&mut self) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.go_now();
        }
    }

    pub fn has_redirected(&self) -> bool {
        self.countdown.as_ref().is_some_and(RedirectCountdown::has_redirected)
    }

    /// Resolve once the pending redirect has happened or been cancelled
    pub async fn wait_for_redirect(&mut self) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.finished().await;
        }
    }

    /// Unmount: stop any pending redirect
    pub fn teardown(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            countdown.cancel();
        }
    }

    /// Start over for a new booking with an untouched, re-filled form
    pub fn reset(&mut self, draft: BookingDraft) -> CoreResult<()> {
        let booking = BookingSelection::new(draft)?;
        self.teardown();
        self.form.reset(&self.session.prefill());
        self.booking = booking;
        self.error_banner = None;
        self.last_result = None;
        self.confirmation = None;
        info!("Checkout reset for {}", self.booking.event_name());
        Ok(())
    }
}

impl Drop for CheckoutScreen {
    fn drop(&mut self) {
        self.teardown();
    }
}
