//! WASM bindings for the frontend session flow

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::catalog;
use crate::config::GameConfig;
use crate::round::RoundInput;
use crate::session::Session;
use crate::validate::validate_round;

fn parse_session(json: &str) -> Result<Session, JsError> {
    Session::from_json(json).map_err(|e| JsError::new(&format!("Invalid session: {}", e)))
}

fn parse_config(json: &str) -> Result<GameConfig, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&format!("Invalid config: {}", e)))
}

fn parse_input(json: &str) -> Result<RoundInput, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&format!("Invalid round input: {}", e)))
}

fn parse_names(json: &str) -> Result<Vec<String>, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&format!("Invalid player list: {}", e)))
}

fn session_json(session: &Session) -> Result<String, JsError> {
    session
        .to_json()
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Open a session from a player list and a config.
///
/// # Arguments
/// * `names_json` - JSON array of player names, e.g. `["An","Bình"]`
/// * `config_json` - JSON `GameConfig`, e.g. `{"mode":"single","unit_price":1000}`
///
/// # Returns
/// JSON serialized session state, to be threaded through the other calls.
#[wasm_bindgen]
pub fn new_session(names_json: &str, config_json: &str) -> Result<String, JsError> {
    let names = parse_names(names_json)?;
    let config = parse_config(config_json)?;
    let session =
        Session::new(&names, config).map_err(|e| JsError::new(&format!("{}", e)))?;
    session_json(&session)
}

/// Open a session from a catalog slug with its starter config.
#[wasm_bindgen]
pub fn new_keo_session(slug: &str, names_json: &str) -> Result<String, JsError> {
    let entry = catalog::find(slug)
        .ok_or_else(|| JsError::new(&format!("Unknown keo: {}", slug)))?;
    let names = parse_names(names_json)?;
    let session = entry
        .start_session(&names)
        .map_err(|e| JsError::new(&format!("{}", e)))?;
    session_json(&session)
}

/// Validate and append one round, returning the updated session state.
#[wasm_bindgen]
pub fn record_round(state_json: &str, input_json: &str) -> Result<String, JsError> {
    let mut session = parse_session(state_json)?;
    let input = parse_input(input_json)?;
    session
        .record_round(&input)
        .map_err(|e| JsError::new(&format!("{}", e)))?;
    session_json(&session)
}

/// Delete one recorded round by index, returning the updated session state.
#[wasm_bindgen]
pub fn remove_round(state_json: &str, index: usize) -> Result<String, JsError> {
    let mut session = parse_session(state_json)?;
    session
        .remove_round(index)
        .map_err(|e| JsError::new(&format!("{}", e)))?;
    session_json(&session)
}

/// Clear the round history for a rematch, keeping players and config.
#[wasm_bindgen]
pub fn clear_rounds(state_json: &str) -> Result<String, JsError> {
    let mut session = parse_session(state_json)?;
    session.clear_rounds();
    session_json(&session)
}

/// Swap in a new config (stake edits mid-game, mode change only on an
/// empty history).
#[wasm_bindgen]
pub fn replace_config(state_json: &str, config_json: &str) -> Result<String, JsError> {
    let mut session = parse_session(state_json)?;
    let config = parse_config(config_json)?;
    session
        .replace_config(config)
        .map_err(|e| JsError::new(&format!("{}", e)))?;
    session_json(&session)
}

/// Register one more player. Only while the history is empty.
#[wasm_bindgen]
pub fn add_player(state_json: &str, name: &str) -> Result<String, JsError> {
    let mut session = parse_session(state_json)?;
    session
        .add_player(name)
        .map_err(|e| JsError::new(&format!("{}", e)))?;
    session_json(&session)
}

/// Rename a player. Only while the history is empty.
#[wasm_bindgen]
pub fn rename_player(state_json: &str, index: usize, name: &str) -> Result<String, JsError> {
    let mut session = parse_session(state_json)?;
    session
        .rename_player(index, name)
        .map_err(|e| JsError::new(&format!("{}", e)))?;
    session_json(&session)
}

/// Drop a player. Only while the history is empty.
#[wasm_bindgen]
pub fn remove_player(state_json: &str, index: usize) -> Result<String, JsError> {
    let mut session = parse_session(state_json)?;
    session
        .remove_player(index)
        .map_err(|e| JsError::new(&format!("{}", e)))?;
    session_json(&session)
}

/// Recompute the settlement report for display.
///
/// The shape is tagged by mode: unit ledgers carry per-round deltas and
/// money totals, streaks carry per-round stakes, the countdown carries
/// remaining balls and ranking, and so on.
#[wasm_bindgen]
pub fn get_report(state_json: &str) -> Result<JsValue, JsError> {
    let session = parse_session(state_json)?;
    serde_wasm_bindgen::to_value(&session.report())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

#[derive(serde::Serialize)]
struct ValidationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn try_check_round(state_json: &str, input_json: &str) -> Result<(), String> {
    let session = Session::from_json(state_json).map_err(|e| e.to_string())?;
    let input: RoundInput =
        serde_json::from_str(input_json).map_err(|e| format!("Invalid round input: {}", e))?;
    validate_round(session.config(), session.player_count(), &input).map_err(|e| e.to_string())?;
    Ok(())
}

/// Validate a raw round input against the current session.
///
/// Returns `{valid: true}` or `{valid: false, error: "..."}`.
/// Never throws — validation errors are returned as structured data.
#[wasm_bindgen]
pub fn check_round(state_json: &str, input_json: &str) -> JsValue {
    let result = match try_check_round(state_json, input_json) {
        Ok(()) => ValidationResult { valid: true, error: None },
        Err(e) => ValidationResult { valid: false, error: Some(e) },
    };
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// The full game catalog, grouped by category in menu order.
#[wasm_bindgen]
pub fn get_catalog() -> Result<JsValue, JsError> {
    let groups: Vec<CatalogGroup> = catalog::grouped()
        .into_iter()
        .map(|(category, entries)| CatalogGroup {
            category,
            label: category.label(),
            entries,
        })
        .collect();
    serde_wasm_bindgen::to_value(&groups)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

#[derive(serde::Serialize)]
struct CatalogGroup {
    category: catalog::Category,
    label: &'static str,
    entries: Vec<&'static catalog::CatalogEntry>,
}

/// Look one catalog entry up by slug.
#[wasm_bindgen]
pub fn get_keo(slug: &str) -> Result<JsValue, JsError> {
    let entry = catalog::find(slug)
        .ok_or_else(|| JsError::new(&format!("Unknown keo: {}", slug)))?;
    serde_wasm_bindgen::to_value(entry)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Suggested starting config for a catalog entry and player count.
#[wasm_bindgen]
pub fn get_starter_config(slug: &str, player_count: usize) -> Result<JsValue, JsError> {
    let entry = catalog::find(slug)
        .ok_or_else(|| JsError::new(&format!("Unknown keo: {}", slug)))?;
    serde_wasm_bindgen::to_value(&entry.starter_config(player_count))
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
