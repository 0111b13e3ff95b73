//! Trạng thái giao diện thuần (tab, lựa chọn, khoảng thời gian, zoom, hiển thị biểu đồ).

use serde::{Deserialize, Serialize};

use crate::brush::{BrushTarget, BrushWindow};
use crate::zoom::ZoomState;

/// Tab đang mở.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Overview,
    Patient,
    Medications,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Patient, Tab::Medications];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Patient => "Patient Vitals",
            Tab::Medications => "Medications",
        }
    }
}

/// Khoảng thời gian của biểu đồ chỉ số sống.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[serde(rename = "6h")]
    Last6h,
    #[serde(rename = "12h")]
    Last12h,
    #[default]
    #[serde(rename = "24h")]
    Last24h,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Last6h, TimeRange::Last12h, TimeRange::Last24h];

    /// Đọc nhãn từ ô chọn. Nhãn không nhận ra thì coi như 24h (lấy toàn bộ mẫu).
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "6h" => TimeRange::Last6h,
            "12h" => TimeRange::Last12h,
            _ => TimeRange::Last24h,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Last6h => "6h",
            TimeRange::Last12h => "12h",
            TimeRange::Last24h => "24h",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Last6h => "Last 6 Hours",
            TimeRange::Last12h => "Last 12 Hours",
            TimeRange::Last24h => "Last 24 Hours",
        }
    }

    /// Giới hạn giờ (không bao gồm); `None` nghĩa là lấy toàn bộ.
    pub fn hour_limit(self) -> Option<f64> {
        match self {
            TimeRange::Last6h => Some(6.0),
            TimeRange::Last12h => Some(12.0),
            TimeRange::Last24h => None,
        }
    }
}

/// Định danh năm biểu đồ có thể ẩn/hiện.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ChartId {
    Outcomes,
    Diagnoses,
    StayDuration,
    VitalSigns,
    Medications,
}

impl ChartId {
    pub const ALL: [ChartId; 5] = [
        ChartId::Outcomes,
        ChartId::Diagnoses,
        ChartId::StayDuration,
        ChartId::VitalSigns,
        ChartId::Medications,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartId::Outcomes => "Patient Outcomes",
            ChartId::Diagnoses => "Diagnoses",
            ChartId::StayDuration => "Length of Stay",
            ChartId::VitalSigns => "Vital Signs",
            ChartId::Medications => "Medications",
        }
    }
}

/// Cờ hiển thị cho từng biểu đồ. Mặc định hiện tất cả.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChartVisibility {
    pub outcomes: bool,
    pub diagnoses: bool,
    pub stay_duration: bool,
    pub vital_signs: bool,
    pub medications: bool,
}

impl Default for ChartVisibility {
    fn default() -> Self {
        Self {
            outcomes: true,
            diagnoses: true,
            stay_duration: true,
            vital_signs: true,
            medications: true,
        }
    }
}

impl ChartVisibility {
    pub fn is_visible(&self, chart: ChartId) -> bool {
        match chart {
            ChartId::Outcomes => self.outcomes,
            ChartId::Diagnoses => self.diagnoses,
            ChartId::StayDuration => self.stay_duration,
            ChartId::VitalSigns => self.vital_signs,
            ChartId::Medications => self.medications,
        }
    }

    pub fn toggle(mut self, chart: ChartId) -> Self {
        let flag = match chart {
            ChartId::Outcomes => &mut self.outcomes,
            ChartId::Diagnoses => &mut self.diagnoses,
            ChartId::StayDuration => &mut self.stay_duration,
            ChartId::VitalSigns => &mut self.vital_signs,
            ChartId::Medications => &mut self.medications,
        };
        *flag = !*flag;
        self
    }
}

/// Hành động người dùng làm thay đổi trạng thái giao diện.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ViewAction {
    SelectTab(Tab),
    ToggleAgeGroup(String),
    ClearAgeGroup,
    ToggleDiagnosis(String),
    ClearDiagnosis,
    SetTimeRange(TimeRange),
    ToggleCustomizing,
    PointerDown(String),
    PointerMove(String),
    PointerUp,
    /// Chuột rời biểu đồ khi đang kéo; chốt như thả chuột.
    PointerLeave,
    ZoomOut,
    ToggleChart(ChartId),
    SetBrush {
        target: BrushTarget,
        window: BrushWindow,
    },
}

/// Toàn bộ trạng thái giao diện, chỉ thay đổi qua [`ViewState::reduce`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ViewState {
    pub active_tab: Tab,
    pub selected_age_group: Option<String>,
    pub selected_diagnosis: Option<String>,
    pub time_range: TimeRange,
    pub zoom: ZoomState,
    pub visible_charts: ChartVisibility,
    #[serde(default)]
    pub stay_brush: BrushWindow,
    #[serde(default)]
    pub usage_brush: BrushWindow,
}

impl ViewState {
    pub fn with_time_range(time_range: TimeRange) -> Self {
        Self {
            time_range,
            ..Self::default()
        }
    }

    pub fn reduce(self, action: ViewAction) -> Self {
        match action {
            ViewAction::SelectTab(active_tab) => Self { active_tab, ..self },
            ViewAction::ToggleAgeGroup(key) => Self {
                selected_age_group: toggle_selection(self.selected_age_group.as_deref(), key),
                ..self
            },
            ViewAction::ClearAgeGroup => Self {
                selected_age_group: None,
                ..self
            },
            ViewAction::ToggleDiagnosis(key) => Self {
                selected_diagnosis: toggle_selection(self.selected_diagnosis.as_deref(), key),
                ..self
            },
            ViewAction::ClearDiagnosis => Self {
                selected_diagnosis: None,
                ..self
            },
            ViewAction::SetTimeRange(time_range) => Self { time_range, ..self },
            ViewAction::ToggleCustomizing => Self {
                zoom: self.zoom.toggle_customizing(),
                ..self
            },
            ViewAction::PointerDown(label) => Self {
                zoom: self.zoom.pointer_down(label),
                ..self
            },
            ViewAction::PointerMove(label) => Self {
                zoom: self.zoom.pointer_move(label),
                ..self
            },
            ViewAction::PointerUp | ViewAction::PointerLeave => Self {
                zoom: self.zoom.pointer_up(),
                ..self
            },
            ViewAction::ZoomOut => Self {
                zoom: self.zoom.zoom_out(),
                ..self
            },
            ViewAction::ToggleChart(chart) => Self {
                visible_charts: self.visible_charts.toggle(chart),
                ..self
            },
            ViewAction::SetBrush { target, window } => match target {
                BrushTarget::StayDuration => Self {
                    stay_brush: window,
                    ..self
                },
                BrushTarget::MedicationUsage => Self {
                    usage_brush: window,
                    ..self
                },
            },
        }
    }

    pub fn brush(&self, target: BrushTarget) -> BrushWindow {
        match target {
            BrushTarget::StayDuration => self.stay_brush,
            BrushTarget::MedicationUsage => self.usage_brush,
        }
    }
}

fn toggle_selection(current: Option<&str>, key: String) -> Option<String> {
    if current == Some(key.as_str()) {
        None
    } else {
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_same_age_group_twice_is_identity() {
        let start = ViewState::default();
        let once = start
            .clone()
            .reduce(ViewAction::ToggleAgeGroup("31-50".into()));
        assert_eq!(once.selected_age_group.as_deref(), Some("31-50"));

        let twice = once.reduce(ViewAction::ToggleAgeGroup("31-50".into()));
        assert_eq!(twice, start);
    }

    #[test]
    fn selecting_another_key_replaces_selection() {
        let state = ViewState::default()
            .reduce(ViewAction::ToggleDiagnosis("Sepsis".into()))
            .reduce(ViewAction::ToggleDiagnosis("Pneumonia".into()));
        assert_eq!(state.selected_diagnosis.as_deref(), Some("Pneumonia"));

        let cleared = state.reduce(ViewAction::ClearDiagnosis);
        assert_eq!(cleared.selected_diagnosis, None);
    }

    #[test]
    fn unknown_time_range_label_falls_back_to_full_day() {
        assert_eq!(TimeRange::parse("6h"), TimeRange::Last6h);
        assert_eq!(TimeRange::parse("12h"), TimeRange::Last12h);
        assert_eq!(TimeRange::parse("48h"), TimeRange::Last24h);
        assert_eq!(TimeRange::parse(""), TimeRange::Last24h);
    }

    #[test]
    fn visibility_toggle_leaves_selection_untouched() {
        let state = ViewState::default()
            .reduce(ViewAction::ToggleAgeGroup("65+".into()))
            .reduce(ViewAction::ToggleChart(ChartId::Outcomes));

        assert!(!state.visible_charts.is_visible(ChartId::Outcomes));
        assert!(state.visible_charts.is_visible(ChartId::Diagnoses));
        assert_eq!(state.selected_age_group.as_deref(), Some("65+"));

        let restored = state.reduce(ViewAction::ToggleChart(ChartId::Outcomes));
        assert_eq!(restored.visible_charts, ChartVisibility::default());
    }

    #[test]
    fn visibility_serializes_as_camel_case_map() {
        let value = serde_json::to_value(ChartVisibility::default()).expect("serialize");
        assert_eq!(value["stayDuration"], serde_json::Value::Bool(true));
        assert_eq!(value["vitalSigns"], serde_json::Value::Bool(true));
    }

    #[test]
    fn customizing_toggle_mid_drag_clears_endpoints_without_zoom() {
        let state = ViewState::default()
            .reduce(ViewAction::SelectTab(Tab::Patient))
            .reduce(ViewAction::ToggleCustomizing)
            .reduce(ViewAction::PointerDown("2".into()))
            .reduce(ViewAction::PointerMove("7".into()))
            .reduce(ViewAction::ToggleCustomizing);

        assert_eq!(state.zoom, ZoomState::Idle);
        assert_eq!(state.zoom.domain(), None);
    }

    #[test]
    fn leaving_chart_mid_drag_commits_instead_of_hanging() {
        let state = ViewState::default()
            .reduce(ViewAction::ToggleCustomizing)
            .reduce(ViewAction::PointerDown("3".into()))
            .reduce(ViewAction::PointerMove("9".into()))
            .reduce(ViewAction::PointerLeave);

        assert!(!matches!(state.zoom, ZoomState::Dragging { .. }));
        let domain = state.zoom.domain().expect("committed domain");
        assert_eq!((domain.low(), domain.high()), ("3", "9"));
    }

    #[test]
    fn leaving_chart_without_drag_changes_nothing() {
        let armed = ViewState::default().reduce(ViewAction::ToggleCustomizing);
        assert_eq!(armed.clone().reduce(ViewAction::PointerLeave), armed);
    }

    #[test]
    fn brush_windows_are_kept_per_chart() {
        let state = ViewState::default().reduce(ViewAction::SetBrush {
            target: BrushTarget::StayDuration,
            window: BrushWindow::new(1, 3),
        });
        assert_eq!(state.brush(BrushTarget::StayDuration), BrushWindow::new(1, 3));
        assert_eq!(state.brush(BrushTarget::MedicationUsage), BrushWindow::default());
        assert_eq!(state.selected_age_group, None);
    }

    #[test]
    fn brush_action_reads_tagged_json() {
        let action: ViewAction = serde_json::from_str(
            r#"{"type":"set_brush","value":{"target":"medication_usage","window":{"start":2,"end":5}}}"#,
        )
        .expect("JSON");
        assert_eq!(
            action,
            ViewAction::SetBrush {
                target: BrushTarget::MedicationUsage,
                window: BrushWindow::new(2, 5),
            }
        );
    }

    #[test]
    fn action_reads_tagged_json() {
        let action: ViewAction =
            serde_json::from_str(r#"{"type":"set_time_range","value":"12h"}"#).expect("JSON");
        assert_eq!(action, ViewAction::SetTimeRange(TimeRange::Last12h));

        let action: ViewAction =
            serde_json::from_str(r#"{"type":"zoom_out"}"#).expect("JSON");
        assert_eq!(action, ViewAction::ZoomOut);
    }
}
