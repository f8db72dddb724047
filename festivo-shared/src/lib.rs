pub mod models;
pub mod money;
pub mod pii;

pub use models::{BookingDraft, BookingError, BookingSelection, EventType, PackageTier};
pub use money::Money;
pub use pii::{mask_card_number, Masked};
