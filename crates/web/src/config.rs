use anyhow::{Context, Result, bail};
use storage::services::consensus::{DEFAULT_WINDOW_SIZE, TrafficWindow};

const DEFAULT_RECENT_REPORTS_LIMIT: usize = 5;
const DEFAULT_NEARBY_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub admin_emails: String,
    pub traffic_window: TrafficWindow,
    pub recent_reports_limit: usize,
    pub nearby_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let window_size = optional_number(&lookup, "TRAFFIC_WINDOW_SIZE", DEFAULT_WINDOW_SIZE)?;

        Ok(Self {
            host: lookup("HOST").context("Cannot load HOST env variable")?,
            port: lookup("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: lookup("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            admin_emails: lookup("ADMIN_EMAILS").unwrap_or_default(),
            traffic_window: TrafficWindow::new(window_size)
                .context("TRAFFIC_WINDOW_SIZE must be at least 1")?,
            recent_reports_limit: positive(
                "RECENT_REPORTS_LIMIT",
                optional_number(&lookup, "RECENT_REPORTS_LIMIT", DEFAULT_RECENT_REPORTS_LIMIT)?,
            )?,
            nearby_limit: positive(
                "NEARBY_LIMIT",
                optional_number(&lookup, "NEARBY_LIMIT", DEFAULT_NEARBY_LIMIT)?,
            )?,
        })
    }
}

fn optional_number(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: usize,
) -> Result<usize> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number", key)),
        _ => Ok(default),
    }
}

fn positive(key: &str, value: usize) -> Result<usize> {
    if value == 0 {
        bail!("{} must be at least 1", key);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("HOST", "127.0.0.1"),
        ("PORT", "8080"),
        ("DATABASE_URL", "postgres://localhost/pitchside"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.traffic_window.size(), 10);
        assert_eq!(config.recent_reports_limit, 5);
        assert_eq!(config.nearby_limit, 10);
        assert!(config.admin_emails.is_empty());
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("TRAFFIC_WINDOW_SIZE", "20"));
        vars.push(("NEARBY_LIMIT", " 3 "));
        vars.push(("ADMIN_EMAILS", "ops@example.com"));

        let config = load(&vars).unwrap();
        assert_eq!(config.traffic_window.size(), 20);
        assert_eq!(config.nearby_limit, 3);
        assert_eq!(config.admin_emails, "ops@example.com");
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("TRAFFIC_WINDOW_SIZE", "0"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_missing_required_variable() {
        assert!(load(&REQUIRED[..2]).is_err());
    }

    #[test]
    fn test_non_numeric_port() {
        let mut vars = REQUIRED.to_vec();
        vars[1] = ("PORT", "http");
        assert!(load(&vars).is_err());
    }
}
