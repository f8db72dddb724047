pub mod countdown;
pub mod form;
pub mod models;
pub mod orchestrator;
pub mod receipt;
pub mod screen;

pub use countdown::{Navigator, RecordingNavigator, RedirectCountdown};
pub use form::CheckoutForm;
pub use models::{FieldState, FormVerdict, PaymentConfirmation};
pub use orchestrator::{MockPaymentCollaborator, SubmissionController, SubmitError};
pub use receipt::Receipt;
pub use screen::CheckoutScreen;
