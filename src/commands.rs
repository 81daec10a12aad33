use std::io::Write;
use std::sync::Arc;

use cartera_core::charts::{ChartError, ChartKind, ChartSpec, render_into};
use cartera_core::context::AppConfigExt;
use cartera_core::dashboard::RefreshOutcome;
use cartera_core::filters::FilterGroup;
use cartera_core::normalize::normalize_payload;
use cartera_types::{AppConfig, Endpoint};
use tokio::sync::RwLock;

use crate::app_state::AppState;

pub const TREND_SLOT: &str = "trend";
pub const MOVEMENT_SLOT: &str = "moroso";

fn parse_group(group: &str) -> Result<FilterGroup, String> {
    group.parse::<FilterGroup>().map_err(|e| e.to_string())
}

fn parse_endpoint(endpoint: &str) -> Result<Endpoint, String> {
    endpoint.parse::<Endpoint>()
}

// ─────────────────────────────────────────────────────────────────────────────
// Filters
// ─────────────────────────────────────────────────────────────────────────────

pub async fn filter_add(
    group: &str,
    values: &[String],
    state: Arc<RwLock<AppState>>,
) -> Result<(), String> {
    let group = parse_group(group)?;
    let mut s = state.write().await;
    for value in values {
        s.dashboard.selection_mut().insert(group, value.as_str());
    }
    Ok(())
}

pub async fn filter_remove(
    group: &str,
    values: &[String],
    state: Arc<RwLock<AppState>>,
) -> Result<(), String> {
    let group = parse_group(group)?;
    let mut s = state.write().await;
    for value in values {
        if !s.dashboard.selection_mut().remove(group, value) {
            println!("{group}: '{value}' was not selected");
        }
    }
    Ok(())
}

pub async fn filter_toggle(
    group: &str,
    value: &str,
    state: Arc<RwLock<AppState>>,
) -> Result<(), String> {
    let group = parse_group(group)?;
    let selected = state.write().await.dashboard.selection_mut().toggle(group, value);
    println!(
        "{group}: '{value}' {}",
        if selected { "selected" } else { "deselected" }
    );
    Ok(())
}

pub async fn filter_clear(group: Option<&str>, state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let group = group.map(parse_group).transpose()?;
    let mut s = state.write().await;
    match group {
        Some(group) => s.dashboard.selection_mut().clear_group(group),
        None => s.dashboard.selection_mut().clear(),
    }
    Ok(())
}

pub async fn show(state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    let selection = s.dashboard.selection();

    println!("{:<18} {:<16} Values", "Group", "Param");
    println!("{}", "-".repeat(60));
    for group in FilterGroup::ALL {
        let values = selection.sorted_values(group);
        let shown = if values.is_empty() {
            "(all)".to_string()
        } else {
            values.join(", ")
        };
        println!("{:<18} {:<16} {}", group.label(), group.param_name(), shown);
    }

    let status = if s.dashboard.needs_refresh() {
        "stale (run `refresh`)"
    } else {
        "up to date"
    };
    println!("\nResults: {status}");
    if let Some(debug) = s.dashboard.debug() {
        println!("Debug: {debug}");
    }
}

pub async fn print_signature(state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    println!("{}", s.dashboard.signature());
}

pub async fn print_query(endpoint: Option<&str>, state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let s = state.read().await;
    let query = s.dashboard.query();
    match endpoint.map(parse_endpoint).transpose()? {
        Some(endpoint) => println!("{}", s.client.endpoint_url(endpoint, &query)),
        None => println!("{}", query.to_query_string()),
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Fetching
// ─────────────────────────────────────────────────────────────────────────────

/// Fetch one endpoint and print its body. With `chart`, the body is
/// normalized and drawn into a slot named after the endpoint.
pub async fn fetch(endpoint: &str, chart: bool, state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let endpoint = parse_endpoint(endpoint)?;
    let mut guard = state.write().await;
    let s = &mut *guard;

    let body = s
        .client
        .fetch(endpoint, &s.dashboard.query())
        .await
        .map_err(|e| e.message())?;

    if !chart {
        println!("{}", pretty(&body));
        return Ok(());
    }

    let data = normalize_payload(&body, s.dashboard.policy());
    let spec = ChartSpec::from_normalized(endpoint.path(), &data);
    draw(s, endpoint.name(), &spec)
}

pub async fn refresh(force: bool, state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let mut guard = state.write().await;
    let s = &mut *guard;

    let outcome = s
        .dashboard
        .refresh(&s.client, force)
        .await
        .map_err(|e| e.message())?;

    match outcome {
        // refresh holds the session for both requests, so Stale only comes
        // from callers driving commit themselves
        RefreshOutcome::Skipped | RefreshOutcome::Stale => {
            println!("filters unchanged, nothing to refresh")
        }
        RefreshOutcome::Committed => {
            if let Some(summary) = s.dashboard.summary() {
                println!("{}", pretty(summary));
            }
            let spec = s
                .dashboard
                .trend()
                .map(|trend| ChartSpec::from_normalized("Portfolio trend", trend).with_kind(ChartKind::Line));
            if let Some(spec) = spec {
                draw(s, TREND_SLOT, &spec)?;
            }
        }
    }
    Ok(())
}

pub async fn movement_trend(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let mut guard = state.write().await;
    let s = &mut *guard;

    let trend = s.dashboard.movement(&s.client).await.map_err(|e| e.message())?;
    let spec = ChartSpec::from_movement("Moroso movement", trend);
    println!("{}", trend.note);
    draw(s, MOVEMENT_SLOT, &spec)
}

/// Render into `slot`; an empty chart clears the slot instead of failing.
fn draw(s: &mut AppState, slot: &str, spec: &ChartSpec) -> Result<(), String> {
    match render_into(&mut s.charts, &mut s.engine, slot, spec) {
        Ok(_) => Ok(()),
        Err(ChartError::Empty { .. }) => {
            println!("no data to chart for the current filters");
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    }
}

pub async fn list_charts(state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    if s.charts.is_empty() {
        println!("No charts rendered");
        return;
    }
    for slot in s.charts.slots() {
        if let Some(chart) = s.charts.get(slot) {
            println!(
                "{:<16} {} labels placed, {} skipped",
                slot,
                chart.placed_labels(),
                chart.skipped_labels()
            );
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

pub async fn show_config(state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    if let Some(path) = AppConfig::config_path() {
        println!("# {}", path.display());
    }
    println!("{}", pretty(&s.config));
}

/// Set one config field, persist it and apply it to the session
pub async fn set_config(key: &str, value: &str, state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let mut s = state.write().await;
    let mut config = s.config.clone();
    config.set_field(key, value).map_err(|e| e.to_string())?;
    s.reconfigure(config).map_err(|e| e.message())?;
    s.config.save().map_err(|e| e.to_string())
}

pub async fn set_debug(value: Option<String>, state: Arc<RwLock<AppState>>) {
    let mut s = state.write().await;
    s.dashboard.set_debug(value);
    match s.dashboard.debug() {
        Some(debug) => println!("debug={debug} will be sent with every request"),
        None => println!("debug parameter cleared"),
    }
}

pub async fn exit(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    state.write().await.charts.release_all();
    write!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unprintable: {e}>"))
}
