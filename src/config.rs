use crate::kpis::KpiOrderScope;
use crate::session::SessionSettings;
use std::env;
use tracing::warn;

pub fn resolve_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080)
}

pub fn resolve_session_settings() -> SessionSettings {
    session_settings_from(
        env::var("KPI_ORDER_SCOPE").ok().as_deref(),
        env::var("KPI_EDITABLE").ok().as_deref(),
    )
}

fn session_settings_from(scope: Option<&str>, editable: Option<&str>) -> SessionSettings {
    let defaults = SessionSettings::default();
    let order_scope = match scope.map(str::parse::<KpiOrderScope>) {
        Some(Ok(scope)) => scope,
        Some(Err(err)) => {
            warn!("{err}, using global");
            defaults.order_scope
        }
        None => defaults.order_scope,
    };
    let editable = match editable.map(|value| value.trim().to_ascii_lowercase()) {
        Some(value) if matches!(value.as_str(), "0" | "false" | "no" | "off") => false,
        _ => defaults.editable,
    };
    SessionSettings {
        order_scope,
        editable,
    }
}
