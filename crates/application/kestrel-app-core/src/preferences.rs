use kestrel_core::validate::validate_hex_color;
use kestrel_core::{
    derive_accent, AccentColor, AccentPreset, GroupingCriterion, UiPreferences, ValidationError,
    WidgetSlot,
};

use crate::ports::PreferencesRepo;

/// In-memory UI preferences, hydrated once and written back after every
/// change.
///
/// The in-memory value is authoritative for the session: a failed write is
/// logged and otherwise ignored.
pub struct PreferencesState<R> {
    repo: R,
    prefs: UiPreferences,
}

impl<R: PreferencesRepo> PreferencesState<R> {
    /// Loads stored preferences, falling back to defaults when nothing is
    /// stored or the store cannot be read.
    pub fn hydrate(repo: R) -> Self {
        let prefs = match repo.load() {
            Ok(Some(prefs)) => prefs,
            Ok(None) => {
                tracing::debug!("no stored preferences, using defaults");
                UiPreferences::default()
            }
            Err(e) => {
                tracing::warn!("could not load preferences, using defaults: {e:#}");
                UiPreferences::default()
            }
        };
        Self { repo, prefs }
    }

    pub fn snapshot(&self) -> &UiPreferences {
        &self.prefs
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Derives an accent from `hex`, makes it current and records it in the
    /// color history.
    pub fn set_custom_accent(&mut self, hex: &str) -> Result<&AccentColor, ValidationError> {
        let rgb = validate_hex_color(hex)?;
        let base = rgb.to_hex();
        self.prefs.accent_color = derive_accent(&base);
        self.prefs.custom_color_history.push(&base);
        self.persist();
        Ok(&self.prefs.accent_color)
    }

    pub fn select_preset(&mut self, preset: AccentPreset) -> &AccentColor {
        self.prefs.accent_color = preset.accent();
        self.persist();
        &self.prefs.accent_color
    }

    pub fn set_border_radius(&mut self, radius: u32) -> u32 {
        self.prefs.border_radius = kestrel_config::clamp_border_radius(radius);
        self.persist();
        self.prefs.border_radius
    }

    pub fn set_grouping(&mut self, criterion: GroupingCriterion) {
        self.prefs.profile_grouping_criterion = criterion;
        self.persist();
    }

    /// Replaces the widget layout. Later slots reusing an id are dropped.
    pub fn set_widget_config(&mut self, widgets: Vec<WidgetSlot>) {
        let mut seen = std::collections::HashSet::new();
        self.prefs.widget_config = widgets
            .into_iter()
            .filter(|w| seen.insert(w.id.clone()))
            .collect();
        self.persist();
    }

    /// Returns `false` if a widget with the same id is already placed.
    pub fn add_widget(&mut self, widget: WidgetSlot) -> bool {
        if self.prefs.widget_config.iter().any(|w| w.id == widget.id) {
            return false;
        }
        self.prefs.widget_config.push(widget);
        self.persist();
        true
    }

    pub fn remove_widget(&mut self, id: &str) -> bool {
        let before = self.prefs.widget_config.len();
        self.prefs.widget_config.retain(|w| w.id != id);
        let removed = self.prefs.widget_config.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn remove_history_color(&mut self, hex: &str) {
        self.prefs.custom_color_history.remove(hex);
        self.persist();
    }

    pub fn clear_history(&mut self) {
        self.prefs.custom_color_history.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.repo.save(&self.prefs) {
            tracing::warn!("failed to save preferences: {e:#}");
        }
    }
}
