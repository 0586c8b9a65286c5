use hearth_core::{Fee, FeeSchedule};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fees: FeesConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// The deployment's fee schedule. Substitutable per jurisdiction or tenant
/// without touching the fee engine; absent configuration falls back to the
/// canonical four-item schedule.
#[derive(Debug, Deserialize, Clone)]
pub struct FeesConfig {
    #[serde(default = "default_fee_items")]
    pub schedule: Vec<FeeItem>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeeItem {
    pub name: String,
    pub amount: i64,
    pub description: Option<String>,
}

fn default_fee_items() -> Vec<FeeItem> {
    FeeSchedule::default()
        .fees
        .into_iter()
        .map(|f| FeeItem {
            name: f.name,
            amount: f.amount,
            description: f.description,
        })
        .collect()
}

impl Default for FeesConfig {
    fn default() -> Self {
        Self {
            schedule: default_fee_items(),
        }
    }
}

impl FeesConfig {
    pub fn to_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            fees: self
                .schedule
                .iter()
                .map(|item| Fee {
                    name: item.name.clone(),
                    amount: item.amount,
                    description: item.description.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventsConfig {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    100
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // All config files are optional; serde defaults cover a bare run
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `HEARTH_SERVER__PORT=9000` overrides the port
            .add_source(config::Environment::with_prefix("HEARTH").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fee_schedule_totals_5000() {
        let config = FeesConfig::default();
        let schedule = config.to_schedule();
        assert_eq!(schedule.fees.len(), 4);
        assert_eq!(schedule.total(), 5000);
    }

    #[test]
    fn test_custom_schedule_converts() {
        let config = FeesConfig {
            schedule: vec![FeeItem {
                name: "Flat Fee".to_string(),
                amount: 750,
                description: None,
            }],
        };
        let schedule = config.to_schedule();
        assert_eq!(schedule.total(), 750);
    }
}
