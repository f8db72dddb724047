pub mod clock;
pub mod payment;
pub mod session;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use validation::{Field, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(#[from] ValidationError),
    #[error("Booking rejected: {0}")]
    BookingError(#[from] festivo_shared::BookingError),
    #[error("Payment failed: {0}")]
    PaymentError(#[from] payment::PaymentError),
    #[error("Session store failed: {0}")]
    SessionError(#[from] session::SessionStoreError),
}

pub type CoreResult<T> = Result<T, CoreError>;
