//! Logic lõi của dashboard lâm sàng MIMIC-III: mô hình dữ liệu, trạng thái giao diện và bộ lọc.

use serde::{Deserialize, Serialize};

mod brush;
pub mod chart;
mod dashboard;
mod filters;
mod view;
mod zoom;

pub use brush::{brush_slice, BrushHandle, BrushTarget, BrushWindow};
pub use dashboard::{Dashboard, DashboardAction, LoadState, Panel};
pub use filters::{filtered_diagnoses, filtered_outcomes, vital_signs_by_range, vitals_in_domain};
pub use view::{ChartId, ChartVisibility, Tab, TimeRange, ViewAction, ViewState};
pub use zoom::{ZoomDomain, ZoomState};

/// Cách áp dụng kết quả khi tải song song năm tập dữ liệu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Một yêu cầu lỗi thì bỏ toàn bộ, mọi biểu đồ hiển thị rỗng.
    #[default]
    AllOrNothing,
    /// Mỗi tập dữ liệu được áp dụng độc lập, chỉ tập lỗi bị để rỗng.
    Independent,
}

/// Cấu hình dashboard. Trường thiếu khi đọc từ JSON lấy giá trị mặc định.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Thư mục (URL tương đối hoặc đường dẫn) chứa năm file JSON đã tiền xử lý.
    pub data_base_url: String,
    /// Khoảng thời gian mặc định của biểu đồ chỉ số sống.
    pub default_time_range: TimeRange,
    pub load_policy: LoadPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_base_url: "./processed_data".to_string(),
            default_time_range: TimeRange::Last24h,
            load_policy: LoadPolicy::AllOrNothing,
        }
    }
}

/// Kết cục điều trị theo nhóm tuổi.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRecord {
    pub age_group: String,
    pub survived: f64,
    pub deceased: f64,
}

/// Một lát trong phân bố chẩn đoán.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosisRecord {
    pub name: String,
    pub value: f64,
}

/// Thời gian nằm viện trung bình theo khoa.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StayRecord {
    pub service: String,
    pub days: f64,
}

/// Tần suất kê đơn của một thuốc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationRecord {
    pub name: String,
    pub count: f64,
}

/// Một mẫu chỉ số sống theo giờ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VitalSample {
    pub hour: f64,
    pub heart_rate: f64,
    pub o2_saturation: f64,
    pub blood_pressure: f64,
    pub glucose: f64,
}

impl VitalSample {
    /// Nhãn trục x tương ứng (giờ), dùng cho kéo-thả zoom.
    pub fn hour_label(&self) -> String {
        format_number(self.hour)
    }
}

/// Lượng thuốc sử dụng theo ngày nằm ICU (dữ liệu mô phỏng tĩnh).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MedicationUsagePoint {
    pub day: u32,
    pub antibiotics: f64,
    pub vasopressors: f64,
    pub analgesics: f64,
    pub sedatives: f64,
}

/// Chuỗi bảy ngày hiển thị ở tab thuốc.
pub fn medication_usage_series() -> Vec<MedicationUsagePoint> {
    const ROWS: [(u32, f64, f64, f64, f64); 7] = [
        (1, 240.0, 120.0, 180.0, 90.0),
        (2, 230.0, 110.0, 200.0, 80.0),
        (3, 220.0, 90.0, 190.0, 85.0),
        (4, 210.0, 80.0, 170.0, 75.0),
        (5, 190.0, 70.0, 160.0, 65.0),
        (6, 180.0, 60.0, 150.0, 60.0),
        (7, 170.0, 50.0, 140.0, 50.0),
    ];

    ROWS.iter()
        .map(
            |&(day, antibiotics, vasopressors, analgesics, sedatives)| MedicationUsagePoint {
                day,
                antibiotics,
                vasopressors,
                analgesics,
                sedatives,
            },
        )
        .collect()
}

/// Năm tập dữ liệu đã tải. Không thay đổi sau khi tải.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Datasets {
    pub outcomes: Vec<OutcomeRecord>,
    pub diagnoses: Vec<DiagnosisRecord>,
    pub stays: Vec<StayRecord>,
    pub medications: Vec<MedicationRecord>,
    pub vitals: Vec<VitalSample>,
}

impl Datasets {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
            && self.diagnoses.is_empty()
            && self.stays.is_empty()
            && self.medications.is_empty()
            && self.vitals.is_empty()
    }
}

/// Lỗi chung của dashboard. Chỉ có một loại lỗi thực sự được xử lý: tải dữ liệu thất bại.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Không tải được {resource}: {message}")]
    Fetch { resource: String, message: String },
    #[error("Không đọc được {resource}: {message}")]
    Parse { resource: String, message: String },
}

/// Định dạng số cho nhãn trục: bỏ phần thập phân khi là số nguyên.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_record_reads_camel_case_json() {
        let record: OutcomeRecord =
            serde_json::from_str(r#"{"ageGroup":"18-30","survived":120,"deceased":4}"#)
                .expect("JSON hợp lệ");
        assert_eq!(record.age_group, "18-30");
        assert_eq!(record.survived, 120.0);
    }

    #[test]
    fn vital_sample_reads_camel_case_json() {
        let sample: VitalSample = serde_json::from_str(
            r#"{"hour":3,"heartRate":88,"o2Saturation":97,"bloodPressure":121,"glucose":140}"#,
        )
        .expect("JSON hợp lệ");
        assert_eq!(sample.o2_saturation, 97.0);
        assert_eq!(sample.hour_label(), "3");
    }

    #[test]
    fn medication_usage_series_covers_one_week() {
        let series = medication_usage_series();
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].antibiotics, 240.0);
        assert_eq!(series[6].day, 7);
    }

    #[test]
    fn default_config_points_at_processed_data() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_base_url, "./processed_data");
        assert_eq!(config.load_policy, LoadPolicy::AllOrNothing);
        assert_eq!(config.default_time_range, TimeRange::Last24h);
    }

    #[test]
    fn partial_config_json_keeps_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"load_policy":"independent"}"#).expect("JSON");
        assert_eq!(config.load_policy, LoadPolicy::Independent);
        assert_eq!(config.data_base_url, "./processed_data");
    }

    #[test]
    fn format_number_drops_integer_fraction() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(2.5), "2.5");
    }
}
