//! Control state for the three view widgets.
//!
//! The session thread owns a [`ControlsState`]; HTTP handlers only see
//! snapshots ([`ControlsView`]) published with each rendered view.

use serde::Serialize;

/// A control change requested over HTTP, applied by the session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    Variable(String),
    Year(i32),
    Colormap(String),
}

/// Current values of the three controls plus the year slider bounds.
#[derive(Debug, Clone)]
pub struct ControlsState {
    pub variable_options: Vec<String>,
    pub variable: String,
    pub year_bounds: (i32, i32),
    pub year: i32,
    pub colormap_options: Vec<String>,
    pub colormap: String,
}

impl ControlsState {
    /// Initial state: first catalog variable, `viridis`, year at the
    /// upper bound of the dataset's time extent.
    pub fn new(variable_options: Vec<String>, year_bounds: (i32, i32)) -> Self {
        let variable = variable_options.first().cloned().unwrap_or_default();
        Self {
            variable_options,
            variable,
            year_bounds,
            year: year_bounds.1,
            colormap_options: renderer::colormap_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            colormap: "viridis".to_string(),
        }
    }

    pub fn apply(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Variable(v) => self.variable = v,
            ControlEvent::Year(y) => self.year = y,
            ControlEvent::Colormap(c) => self.colormap = c,
        }
    }

    /// Applies the year bounds a render resolved from the data.
    pub fn apply_bounds(&mut self, bounds: (i32, i32)) {
        self.year_bounds = bounds;
    }

    pub fn view(&self, view_seq: u64) -> ControlsView {
        ControlsView {
            variable_options: self.variable_options.clone(),
            variable: self.variable.clone(),
            year_min: self.year_bounds.0,
            year_max: self.year_bounds.1,
            year: self.year,
            colormap_options: self.colormap_options.clone(),
            colormap: self.colormap.clone(),
            view_seq,
        }
    }
}

/// Snapshot served by `GET /api/controls`.
#[derive(Debug, Clone, Serialize)]
pub struct ControlsView {
    pub variable_options: Vec<String>,
    pub variable: String,
    pub year_min: i32,
    pub year_max: i32,
    pub year: i32,
    pub colormap_options: Vec<String>,
    pub colormap: String,
    /// Monotonically increasing count of completed renders.
    pub view_seq: u64,
}

impl ControlsView {
    /// Placeholder published before the first render completes.
    pub fn empty() -> Self {
        Self {
            variable_options: Vec::new(),
            variable: String::new(),
            year_min: 0,
            year_max: 0,
            year: 0,
            colormap_options: Vec::new(),
            colormap: String::new(),
            view_seq: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_defaults() {
        let state = ControlsState::new(
            vec!["VAR_2T".to_string(), "SST".to_string()],
            (1940, 2023),
        );
        assert_eq!(state.variable, "VAR_2T");
        assert_eq!(state.year, 2023);
        assert_eq!(state.colormap, "viridis");
        assert_eq!(state.colormap_options.len(), 8);
        assert_eq!(state.colormap_options[0], "viridis");
    }

    #[test]
    fn test_events_update_only_their_control() {
        let mut state = ControlsState::new(vec!["t2m".to_string()], (1940, 2023));
        state.apply(ControlEvent::Year(1979));
        assert_eq!(state.year, 1979);
        assert_eq!(state.variable, "t2m");

        state.apply(ControlEvent::Colormap("coolwarm".to_string()));
        assert_eq!(state.colormap, "coolwarm");
        assert_eq!(state.year, 1979);
    }

    #[test]
    fn test_view_snapshot_carries_bounds_and_sequence() {
        let mut state = ControlsState::new(vec!["t2m".to_string()], (0, 0));
        state.apply_bounds((1940, 2023));
        let view = state.view(7);
        assert_eq!((view.year_min, view.year_max), (1940, 2023));
        assert_eq!(view.view_seq, 7);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["variable"], "t2m");
        assert_eq!(json["year_max"], 2023);
    }
}
