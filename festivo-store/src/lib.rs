pub mod app_config;
pub mod payment_client;
pub mod records;
pub mod session_store;

pub use app_config::Config;
pub use payment_client::HttpPaymentCollaborator;
pub use records::{PaymentListResponse, PaymentRecord};
pub use session_store::{open_session, FileSessionStore};
