//! Distributor Registry
//!
//! Bookkeeping for the distributors a query pass may target and the
//! backends able to answer for them. Built once at startup, read-only
//! during a query pass; nothing in here touches the network.

use regex::Regex;
use std::collections::BTreeMap;

use bomprice_utils::{AppConfig, DistributorConfig, PricingError, PricingResult};

/// How a distributor's data is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributorKind {
    /// Priced through a web API or scraper.
    Web,
    /// Priced from user-supplied local data only.
    Local,
}

#[derive(Debug, Clone)]
pub struct DistributorInfo {
    pub name: String,
    pub label: String,
    pub kind: DistributorKind,
    /// Stock codes matching this are never chosen as the canonical SKU.
    pub ignore_stock_code: Option<Regex>,
    pub enabled: bool,
}

impl DistributorInfo {
    pub fn from_config(config: &DistributorConfig) -> PricingResult<Self> {
        let ignore_stock_code = config
            .ignore_stock_code
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| {
                PricingError::configuration(format!(
                    "invalid stock code ignore pattern for {}: {}",
                    config.name, e
                ))
            })?;

        Ok(Self {
            name: config.name.clone(),
            label: config.label.clone().unwrap_or_else(|| config.name.clone()),
            kind: if config.web {
                DistributorKind::Web
            } else {
                DistributorKind::Local
            },
            ignore_stock_code,
            enabled: config.enabled,
        })
    }

    pub fn is_web(&self) -> bool {
        self.kind == DistributorKind::Web
    }

    pub fn ignores(&self, stock_code: &str) -> bool {
        self.ignore_stock_code
            .as_ref()
            .is_some_and(|re| re.is_match(stock_code))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Api,
    Scrape,
}

/// A pluggable pricing backend and the distributors it can answer for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInfo {
    pub name: String,
    /// Lower runs first when several backends cover one distributor.
    pub priority: u32,
    pub kind: BackendKind,
    pub enabled: bool,
    pub distributors: Vec<String>,
}

impl BackendInfo {
    pub fn covers(&self, distributor: &str) -> bool {
        self.distributors.iter().any(|d| d == distributor)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DistributorRegistry {
    distributors: BTreeMap<String, DistributorInfo>,
    backends: Vec<BackendInfo>,
}

impl DistributorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the configured distributors and the configured API backend.
    pub fn from_config(config: &AppConfig) -> PricingResult<Self> {
        let mut registry = Self::new();
        for distributor in &config.distributors {
            registry.register_distributor(DistributorInfo::from_config(distributor)?)?;
        }

        registry.register_backend(BackendInfo {
            name: config.provider.name.clone(),
            priority: config.provider.priority,
            kind: BackendKind::Api,
            enabled: true,
            distributors: config.provider.distributors.keys().cloned().collect(),
        })?;

        Ok(registry)
    }

    pub fn register_distributor(&mut self, info: DistributorInfo) -> PricingResult<()> {
        if self.distributors.contains_key(&info.name) {
            return Err(PricingError::configuration(format!(
                "distributor {} registered twice",
                info.name
            )));
        }
        self.distributors.insert(info.name.clone(), info);
        Ok(())
    }

    pub fn register_backend(&mut self, backend: BackendInfo) -> PricingResult<()> {
        if self.backend(&backend.name).is_some() {
            return Err(PricingError::configuration(format!(
                "backend {} registered twice",
                backend.name
            )));
        }
        self.backends.push(backend);
        self.backends
            .sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(&b.name)));
        Ok(())
    }

    pub fn distributor(&self, name: &str) -> Option<&DistributorInfo> {
        self.distributors.get(name)
    }

    pub fn distributors(&self) -> impl Iterator<Item = &DistributorInfo> {
        self.distributors.values()
    }

    /// Names of the enabled web distributors, sorted.
    pub fn enabled_web_distributors(&self) -> Vec<&str> {
        self.distributors
            .values()
            .filter(|d| d.enabled && d.is_web())
            .map(|d| d.name.as_str())
            .collect()
    }

    /// Backends in ascending priority.
    pub fn backends(&self) -> &[BackendInfo] {
        &self.backends
    }

    pub fn backend(&self, name: &str) -> Option<&BackendInfo> {
        self.backends.iter().find(|b| b.name == name)
    }

    /// The enabled backend with the lowest priority covering `distributor`.
    pub fn owning_backend(&self, distributor: &str) -> Option<&BackendInfo> {
        self.backends
            .iter()
            .find(|b| b.enabled && b.covers(distributor))
    }

    pub fn is_ignored_stock_code(&self, distributor: &str, stock_code: &str) -> bool {
        self.distributor(distributor)
            .is_some_and(|d| d.ignores(stock_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(name: &str, priority: u32, distributors: &[&str]) -> BackendInfo {
        BackendInfo {
            name: name.to_string(),
            priority,
            kind: BackendKind::Api,
            enabled: true,
            distributors: distributors.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn test_from_default_config() {
        let registry = DistributorRegistry::from_config(&AppConfig::default()).unwrap();

        assert_eq!(registry.enabled_web_distributors().len(), 8);
        assert_eq!(registry.backends().len(), 1);
        assert_eq!(registry.owning_backend("mouser").map(|b| b.name.as_str()), Some("kitspace"));
        assert!(registry.is_ignored_stock_code("digikey", "296-1234-6-ND"));
        assert!(!registry.is_ignored_stock_code("digikey", "296-1234-1-ND"));
        assert!(!registry.is_ignored_stock_code("mouser", "296-1234-6-ND"));
    }

    #[test]
    fn test_disabled_and_local_distributors_filtered() {
        let mut config = AppConfig::default();
        config.distributors = vec![
            DistributorConfig::web("mouser", "Mouser"),
            DistributorConfig {
                enabled: false,
                ..DistributorConfig::web("farnell", "Farnell")
            },
            DistributorConfig {
                web: false,
                ..DistributorConfig::web("stockroom", "Stock room")
            },
        ];
        let registry = DistributorRegistry::from_config(&config).unwrap();

        assert_eq!(registry.enabled_web_distributors(), vec!["mouser"]);
        assert_eq!(registry.distributor("stockroom").map(|d| d.kind), Some(DistributorKind::Local));
    }

    #[test]
    fn test_lowest_priority_backend_owns_distributor() {
        let mut registry = DistributorRegistry::new();
        registry.register_backend(backend("scraper", 100, &["digikey", "tme"])).unwrap();
        registry.register_backend(backend("api", 50, &["digikey"])).unwrap();

        assert_eq!(registry.backends()[0].name, "api");
        assert_eq!(registry.owning_backend("digikey").map(|b| b.name.as_str()), Some("api"));
        assert_eq!(registry.owning_backend("tme").map(|b| b.name.as_str()), Some("scraper"));
        assert!(registry.owning_backend("lcsc").is_none());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = DistributorRegistry::new();
        registry.register_backend(backend("api", 50, &[])).unwrap();

        assert!(matches!(
            registry.register_backend(backend("api", 10, &[])),
            Err(PricingError::Configuration { .. })
        ));
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        let config = DistributorConfig {
            ignore_stock_code: Some("(".to_string()),
            ..DistributorConfig::web("digikey", "Digi-Key")
        };

        assert!(matches!(
            DistributorInfo::from_config(&config),
            Err(PricingError::Configuration { .. })
        ));
    }
}
