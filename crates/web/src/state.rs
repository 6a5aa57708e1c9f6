use axum::extract::FromRef;
use storage::Database;
use storage::services::consensus::TrafficWindow;

use crate::config::Config;
use crate::middleware::auth::AdminPolicy;

/// Knobs every traffic-bearing view shares so list, detail and map agree
#[derive(Debug, Clone, Copy)]
pub struct TrafficSettings {
    pub window: TrafficWindow,
    pub recent_reports_limit: usize,
    pub nearby_limit: usize,
}

impl From<&Config> for TrafficSettings {
    fn from(config: &Config) -> Self {
        Self {
            window: config.traffic_window,
            recent_reports_limit: config.recent_reports_limit,
            nearby_limit: config.nearby_limit,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub admins: AdminPolicy,
    pub traffic: TrafficSettings,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for AdminPolicy {
    fn from_ref(state: &AppState) -> Self {
        state.admins.clone()
    }
}

impl FromRef<AppState> for TrafficSettings {
    fn from_ref(state: &AppState) -> Self {
        state.traffic
    }
}
