//! Schema migration and shape normalization for stored preferences.
//!
//! Migration rewrites legacy values in the raw JSON payload step by step.
//! Normalization then reads each field on its own, so a single bad field
//! falls back to its default without discarding the rest of the record.

use kestrel_core::{
    AccentColor, AccentPreset, ColorHistory, GroupingCriterion, UiPreferences, WidgetSlot,
};
use serde_json::{Map, Value};

use crate::api::{LoadedPreferences, PersistedRecord, CURRENT_SCHEMA};

const ACCENT_COLOR: &str = "accentColor";
const BORDER_RADIUS: &str = "borderRadius";
const WIDGET_CONFIG: &str = "widgetConfig";
const GROUPING: &str = "profileGroupingCriterion";
const COLOR_HISTORY: &str = "customColorHistory";

/// Brings a stored record up to [`CURRENT_SCHEMA`] and returns the typed
/// preferences.
pub fn migrate_record(record: PersistedRecord) -> LoadedPreferences {
    let found_schema = record.schema_version;
    let mut payload = record.payload;

    if found_schema < 2 {
        v1_to_v2(&mut payload);
    }
    if found_schema > CURRENT_SCHEMA {
        tracing::warn!(
            found = found_schema,
            supported = CURRENT_SCHEMA,
            "preferences were written by a newer version, reading best-effort"
        );
    }

    LoadedPreferences {
        preferences: normalize_payload(&payload),
        found_schema,
    }
}

fn v1_to_v2(payload: &mut Map<String, Value>) {
    if payload.get(GROUPING).and_then(Value::as_str) == Some("none") {
        tracing::debug!("rewriting retired grouping criterion 'none' to 'group'");
        payload.insert(GROUPING.into(), Value::String("group".into()));
    }

    if let Some(Value::String(base)) = payload.get(ACCENT_COLOR) {
        let mut wrapped = Map::new();
        wrapped.insert("base".into(), Value::String(base.clone()));
        payload.insert(ACCENT_COLOR.into(), Value::Object(wrapped));
    }
}

/// Reads a current-schema payload field by field, defaulting anything absent
/// or of the wrong shape.
pub fn normalize_payload(payload: &Map<String, Value>) -> UiPreferences {
    let defaults = UiPreferences::default();

    UiPreferences {
        accent_color: payload
            .get(ACCENT_COLOR)
            .and_then(accent_from_value)
            .unwrap_or(defaults.accent_color),
        border_radius: payload
            .get(BORDER_RADIUS)
            .and_then(Value::as_u64)
            .map(|v| kestrel_config::clamp_border_radius(u32::try_from(v).unwrap_or(u32::MAX)))
            .unwrap_or(defaults.border_radius),
        widget_config: payload
            .get(WIDGET_CONFIG)
            .and_then(Value::as_array)
            .map(|items| widgets_from_values(items))
            .unwrap_or_default(),
        profile_grouping_criterion: payload
            .get(GROUPING)
            .and_then(Value::as_str)
            .and_then(|raw| {
                let parsed = GroupingCriterion::parse(raw);
                if parsed.is_none() {
                    tracing::warn!(value = raw, "unknown grouping criterion, using default");
                }
                parsed
            })
            .unwrap_or(defaults.profile_grouping_criterion),
        custom_color_history: payload
            .get(COLOR_HISTORY)
            .and_then(Value::as_array)
            .map(|items| ColorHistory::from_values(items.iter().filter_map(Value::as_str)))
            .unwrap_or_default(),
    }
}

fn accent_from_value(value: &Value) -> Option<AccentColor> {
    let obj = value.as_object()?;
    let base = obj.get("base").and_then(Value::as_str)?;
    kestrel_core::Rgb::parse_hex(base)?;

    let is_custom = obj
        .get("isCustom")
        .and_then(Value::as_bool)
        .unwrap_or_else(|| AccentPreset::matching(base).is_none());

    Some(
        AccentColor {
            base: base.to_string(),
            hover: String::new(),
            shadow: String::new(),
            light: String::new(),
            dark: String::new(),
            is_custom,
        }
        .rederived(),
    )
}

fn widgets_from_values(items: &[Value]) -> Vec<WidgetSlot> {
    let mut out: Vec<WidgetSlot> = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<WidgetSlot>(item.clone()) {
            Ok(slot) if !out.iter().any(|w| w.id == slot.id) => out.push(slot),
            Ok(slot) => tracing::debug!(id = %slot.id, "dropping duplicate widget slot"),
            Err(e) => tracing::debug!("dropping malformed widget slot: {e}"),
        }
    }
    out
}
