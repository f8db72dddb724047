pub mod booking;

pub use booking::{BookingDraft, BookingError, BookingSelection, EventType, PackageTier};
