pub mod package;
pub mod pricing;

pub use package::{Package, PackageCatalog};
pub use pricing::{PriceBreakdown, PricingConfig, PricingEngine};
