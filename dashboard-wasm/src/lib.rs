//! Bridge WASM <-> JavaScript trung lập framework cho bộ lọc và reducer của dashboard.

use dashboard_core::{
    DashboardConfig, DiagnosisRecord, LoadPolicy, MedicationRecord, OutcomeRecord, StayRecord,
    TimeRange, ViewAction, ViewState, VitalSample,
};
use dashboard_data::{decode_records, Resource};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsDashboardConfig {
    #[serde(default)]
    data_base_url: Option<String>,
    #[serde(default)]
    default_time_range: Option<String>,
    #[serde(default)]
    load_policy: Option<LoadPolicy>,
}

impl From<JsDashboardConfig> for DashboardConfig {
    fn from(cfg: JsDashboardConfig) -> Self {
        let mut base = DashboardConfig::default();
        if let Some(url) = cfg.data_base_url {
            base.data_base_url = url;
        }
        if let Some(label) = cfg.default_time_range {
            base.default_time_range = TimeRange::parse(&label);
        }
        if let Some(policy) = cfg.load_policy {
            base.load_policy = policy;
        }
        base
    }
}

fn read_config(config: Option<JsValue>) -> Result<DashboardConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsDashboardConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            Ok(DashboardConfig::from(cfg))
        }
        _ => Ok(DashboardConfig::default()),
    }
}

fn read<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    from_value(value).map_err(|err| JsValue::from_str(&format!("Không đọc được {what}: {err}")))
}

fn write<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

/// Trạng thái giao diện ban đầu theo config.
#[wasm_bindgen]
pub fn initial_view_state(config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = read_config(config)?;
    write(&ViewState::with_time_range(cfg.default_time_range))
}

/// Áp một hành động (`{ type, value }`) lên trạng thái giao diện, trả về trạng thái mới.
#[wasm_bindgen]
pub fn reduce_view_state(state: JsValue, action: JsValue) -> Result<JsValue, JsValue> {
    let state: ViewState = read(state, "view state")?;
    let action: ViewAction = read(action, "action")?;
    write(&state.reduce(action))
}

#[wasm_bindgen]
pub fn filter_outcomes(records: JsValue, selected: Option<String>) -> Result<JsValue, JsValue> {
    let records: Vec<OutcomeRecord> = read(records, "outcomes")?;
    write(&dashboard_core::filtered_outcomes(
        &records,
        selected.as_deref(),
    ))
}

#[wasm_bindgen]
pub fn filter_diagnoses(records: JsValue, selected: Option<String>) -> Result<JsValue, JsValue> {
    let records: Vec<DiagnosisRecord> = read(records, "diagnoses")?;
    write(&dashboard_core::filtered_diagnoses(
        &records,
        selected.as_deref(),
    ))
}

/// `range` là nhãn "6h" | "12h" | "24h"; nhãn khác trả về toàn bộ mẫu.
#[wasm_bindgen]
pub fn vital_signs_by_range(samples: JsValue, range: &str) -> Result<JsValue, JsValue> {
    let samples: Vec<VitalSample> = read(samples, "vital signs")?;
    write(&dashboard_core::vital_signs_by_range(
        &samples,
        TimeRange::parse(range),
    ))
}

/// Giải mã nội dung một trong năm file dữ liệu theo tên file.
#[wasm_bindgen]
pub fn decode_resource(file_name: &str, text: &str) -> Result<JsValue, JsValue> {
    let resource = Resource::from_file_name(file_name)
        .ok_or_else(|| JsValue::from_str(&format!("File dữ liệu không xác định: {file_name}")))?;

    match resource {
        Resource::PatientOutcomes => write(&decode::<OutcomeRecord>(resource, text)?),
        Resource::DiagnosisDistribution => write(&decode::<DiagnosisRecord>(resource, text)?),
        Resource::StayDuration => write(&decode::<StayRecord>(resource, text)?),
        Resource::MedicationFrequency => write(&decode::<MedicationRecord>(resource, text)?),
        Resource::LabValueTrends => write(&decode::<VitalSample>(resource, text)?),
    }
}

fn decode<T: DeserializeOwned>(resource: Resource, text: &str) -> Result<Vec<T>, JsValue> {
    decode_records(resource, text).map_err(|err| JsValue::from_str(&format!("Dashboard error: {err}")))
}
