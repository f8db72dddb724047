use festivo_shared::{Money, PackageTier};
use serde::{Deserialize, Serialize};

/// A bookable event package
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub tier: PackageTier,
    pub price: Money,
    pub inclusions: Vec<String>,
}

/// The three packages offered on the booking form
#[derive(Debug, Clone)]
pub struct PackageCatalog {
    packages: Vec<Package>,
}

impl PackageCatalog {
    pub fn new() -> Self {
        let packages = PackageTier::ALL
            .iter()
            .map(|tier| Package {
                tier: *tier,
                price: Money::from_minor(tier.list_price_minor()),
                inclusions: inclusions(*tier).iter().map(|s| s.to_string()).collect(),
            })
            .collect();
        Self { packages }
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn get(&self, tier: PackageTier) -> Option<&Package> {
        self.packages.iter().find(|p| p.tier == tier)
    }
}

impl Default for PackageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn inclusions(tier: PackageTier) -> &'static [&'static str] {
    match tier {
        PackageTier::Basic => &["Simple decor", "Basic Photography", "Standard Catering"],
        PackageTier::Premium => &["Custom decor", "Pro Photography", "Themed Catering", "Live streaming"],
        PackageTier::Luxury => &["Highend decor", "Cinematic coverage", "Premium Catering", "Live entertainment"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lists_tiers_in_price_order() {
        let catalog = PackageCatalog::new();
        let prices: Vec<String> = catalog.packages().iter().map(|p| p.price.to_string()).collect();
        assert_eq!(prices, vec!["Rs. 30,000.00", "Rs. 50,000.00", "Rs. 80,000.00"]);
        assert_eq!(catalog.get(PackageTier::Premium).unwrap().inclusions.len(), 4);
    }
}
