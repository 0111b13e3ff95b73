//! Mô hình dashboard: dữ liệu đã tải + trạng thái giao diện, cập nhật qua một reducer.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::brush::{brush_slice, BrushTarget};
use crate::filters::{filtered_diagnoses, filtered_outcomes, vital_signs_by_range, vitals_in_domain};
use crate::view::{ChartId, Tab, ViewAction, ViewState};
use crate::{
    medication_usage_series, DashboardConfig, Datasets, DiagnosisRecord, MedicationUsagePoint,
    OutcomeRecord, StayRecord, VitalSample,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
}

/// Khung biểu đồ được vẽ trong tab hiện tại.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    OutcomesBar,
    DiagnosisPie,
    StayBar,
    VitalSignsLine,
    VitalsScatter,
    MedicationBar,
    MedicationUsageLine,
}

impl Panel {
    /// Cờ hiển thị điều khiển khung này; `None` là luôn hiện.
    pub fn gate(self) -> Option<ChartId> {
        match self {
            Panel::OutcomesBar => Some(ChartId::Outcomes),
            Panel::DiagnosisPie => Some(ChartId::Diagnoses),
            Panel::StayBar => Some(ChartId::StayDuration),
            Panel::VitalSignsLine => Some(ChartId::VitalSigns),
            Panel::MedicationBar => Some(ChartId::Medications),
            Panel::VitalsScatter | Panel::MedicationUsageLine => None,
        }
    }

    fn for_tab(tab: Tab) -> &'static [Panel] {
        match tab {
            Tab::Overview => &[Panel::OutcomesBar, Panel::DiagnosisPie, Panel::StayBar],
            Tab::Patient => &[Panel::VitalSignsLine, Panel::VitalsScatter],
            Tab::Medications => &[Panel::MedicationBar, Panel::MedicationUsageLine],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    /// Kết quả tải dữ liệu, áp dụng một lần cho cả năm tập.
    Loaded {
        datasets: Datasets,
        at: DateTime<Utc>,
    },
    View(ViewAction),
}

impl From<ViewAction> for DashboardAction {
    fn from(action: ViewAction) -> Self {
        DashboardAction::View(action)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dashboard {
    pub load_state: LoadState,
    pub datasets: Datasets,
    pub loaded_at: Option<DateTime<Utc>>,
    pub view: ViewState,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            view: ViewState::with_time_range(config.default_time_range),
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn reduce(self, action: DashboardAction) -> Self {
        match action {
            DashboardAction::Loaded { datasets, at } => Self {
                load_state: LoadState::Ready,
                datasets,
                loaded_at: Some(at),
                ..self
            },
            DashboardAction::View(action) => {
                if !self.accepts(&action) {
                    debug!("Bỏ qua lựa chọn không có trong dữ liệu: {action:?}");
                    return self;
                }
                Self {
                    view: self.view.reduce(action),
                    ..self
                }
            }
        }
    }

    /// Lựa chọn chỉ được đặt khi khóa tồn tại trong dữ liệu hoặc đang được chọn (để bỏ chọn).
    fn accepts(&self, action: &ViewAction) -> bool {
        match action {
            ViewAction::ToggleAgeGroup(key) => {
                self.view.selected_age_group.as_ref() == Some(key)
                    || self
                        .datasets
                        .outcomes
                        .iter()
                        .any(|record| &record.age_group == key)
            }
            ViewAction::ToggleDiagnosis(key) => {
                self.view.selected_diagnosis.as_ref() == Some(key)
                    || self
                        .datasets
                        .diagnoses
                        .iter()
                        .any(|record| &record.name == key)
            }
            _ => true,
        }
    }

    /// Các khung cần vẽ cho tab hiện tại, theo thứ tự.
    pub fn panels(&self) -> Vec<Panel> {
        Panel::for_tab(self.view.active_tab)
            .iter()
            .copied()
            .filter(|panel| {
                panel
                    .gate()
                    .map_or(true, |chart| self.view.visible_charts.is_visible(chart))
            })
            .collect()
    }

    pub fn outcomes(&self) -> Vec<OutcomeRecord> {
        filtered_outcomes(
            &self.datasets.outcomes,
            self.view.selected_age_group.as_deref(),
        )
    }

    pub fn diagnoses(&self) -> Vec<DiagnosisRecord> {
        filtered_diagnoses(
            &self.datasets.diagnoses,
            self.view.selected_diagnosis.as_deref(),
        )
    }

    /// Chỉ số sống theo khoảng thời gian (dùng cho cả biểu đồ đường và biểu đồ tán xạ).
    pub fn vitals(&self) -> Vec<VitalSample> {
        vital_signs_by_range(&self.datasets.vitals, self.view.time_range)
    }

    /// Chỉ số sống cho biểu đồ đường, đã áp khoảng zoom nếu có.
    pub fn zoomed_vitals(&self) -> Vec<VitalSample> {
        let vitals = self.vitals();
        match self.view.zoom.domain() {
            Some(domain) => vitals_in_domain(&vitals, domain),
            None => vitals,
        }
    }

    /// Thời gian nằm viện trong cửa sổ brush.
    pub fn brushed_stays(&self) -> Vec<StayRecord> {
        brush_slice(&self.datasets.stays, self.view.brush(BrushTarget::StayDuration)).to_vec()
    }

    /// Chuỗi sử dụng thuốc theo ngày trong cửa sổ brush.
    pub fn brushed_usage(&self) -> Vec<MedicationUsagePoint> {
        brush_slice(
            &medication_usage_series(),
            self.view.brush(BrushTarget::MedicationUsage),
        )
        .to_vec()
    }

    /// Vị trí màu của chẩn đoán trong bảng màu, theo thứ tự dữ liệu gốc.
    pub fn diagnosis_color_index(&self, name: &str) -> usize {
        self.datasets
            .diagnoses
            .iter()
            .position(|record| record.name == name)
            .unwrap_or(0)
    }

    pub fn shows_time_controls(&self) -> bool {
        self.view.active_tab == Tab::Patient
    }

    pub fn shows_zoom_reset(&self) -> bool {
        self.shows_time_controls() && self.view.zoom.domain().is_some()
    }
}
