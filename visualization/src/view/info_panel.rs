//! Selection readout
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use spirals_core::{ExplorationSession, SelectionSummary};

use crate::view::View;

/// Amplitude range reported before any field has been shown
pub const NO_FIELD_RANGE: (f64, f64) = (-1.0, -1.0);

/// Text label describing the current selection
#[derive(Debug, Clone, Default)]
pub struct InfoPanel {
    summary: Option<SelectionSummary>,
    text: String,
    generation: u64,
}

impl InfoPanel {
    pub fn summary(&self) -> Option<&SelectionSummary> {
        self.summary.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `(min, max)` amplitude of the shown field, or `(-1, -1)`
    pub fn amplitude_range(&self) -> (f64, f64) {
        self.summary
            .as_ref()
            .map_or(NO_FIELD_RANGE, |s| (s.field_amplitude_min, s.field_amplitude_max))
    }
}

/// Two-line label: parameters, then amplitude range.
pub fn format_summary(summary: &SelectionSummary) -> String {
    format!(
        "alpha = {}, vx = {}\nmin = {}, max = {}",
        summary.parameter1, summary.parameter2, summary.field_amplitude_min, summary.field_amplitude_max
    )
}

impl View for InfoPanel {
    fn name(&self) -> &str {
        "info"
    }

    fn refresh(&mut self, session: &ExplorationSession) {
        let summary = session.current_selection_summary();
        if self.summary.as_ref() == Some(&summary) {
            return;
        }
        self.text = format_summary(&summary);
        self.summary = Some(summary);
        self.generation += 1;
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_format() {
        let summary = SelectionSummary {
            curve_id: 0,
            parameter1: 0.5,
            parameter2: -0.25,
            response: 1.0,
            field_amplitude_min: 0.0,
            field_amplitude_max: 0.75,
        };
        assert_eq!(format_summary(&summary), "alpha = 0.5, vx = -0.25\nmin = 0, max = 0.75");
    }

    #[test]
    fn test_empty_panel_reports_sentinel_range() {
        let panel = InfoPanel::default();
        assert_eq!(panel.amplitude_range(), (-1.0, -1.0));
        assert!(panel.text().is_empty());
    }
}
