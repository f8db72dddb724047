use festivo_catalog::PricingConfig;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub payments: PaymentsConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PaymentsConfig {
    pub base_url: String,
    pub add_path: String,
    pub list_path: String,
    pub by_id_path: String,
    /// No timeout unless set
    pub timeout_seconds: Option<u64>,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            add_path: "/public/addPayment".to_string(),
            list_path: "/public/getAllPayment".to_string(),
            by_id_path: "/public/paymentById".to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CheckoutConfig {
    pub redirect_seconds: u32,
    pub success_route: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            redirect_seconds: 5,
            success_route: "/payment-success".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// JSON file backing the persisted session; in-memory when absent
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Layer `<dir>/default`, `<dir>/<RUN_MODE>`, `<dir>/local` and `FESTIVO__*` variables
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // FESTIVO__PAYMENTS__BASE_URL=... sets payments.base_url
            .add_source(
                config::Environment::with_prefix("FESTIVO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = s.try_deserialize()?;
        tracing::info!(
            "Loaded config (run mode {}): payments at {}",
            run_mode,
            config.payments.base_url
        );
        Ok(config)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.payments.base_url, "http://localhost:8080");
        assert_eq!(config.payments.add_path, "/public/addPayment");
        assert_eq!(config.payments.timeout_seconds, None);
        assert_eq!(config.pricing, PricingConfig::default());
        assert_eq!(config.checkout.redirect_seconds, 5);
        assert_eq!(config.checkout.success_route, "/payment-success");
        assert!(config.session.path.is_none());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml_str(
            r#"
            [payments]
            base_url = "https://api.festivo.lk"
            timeout_seconds = 20

            [pricing]
            tax_bps = 800

            [checkout]
            redirect_seconds = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.payments.base_url, "https://api.festivo.lk");
        assert_eq!(config.payments.list_path, "/public/getAllPayment");
        assert_eq!(config.payments.timeout_seconds, Some(20));
        assert_eq!(config.pricing.service_charge_bps, 1_000);
        assert_eq!(config.pricing.tax_bps, 800);
        assert_eq!(config.checkout.redirect_seconds, 3);
    }

    #[test]
    fn test_checked_in_defaults_parse() {
        let toml = include_str!("../../config/default.toml");
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.payments.by_id_path, "/public/paymentById");
        assert_eq!(config.pricing.service_charge_bps, 1_000);
    }
}
