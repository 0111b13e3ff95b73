//! Hàm lọc thuần: dữ liệu gốc + lựa chọn hiện tại -> dữ liệu hiển thị.

use crate::view::TimeRange;
use crate::zoom::ZoomDomain;
use crate::{DiagnosisRecord, OutcomeRecord, VitalSample};

/// Kết cục theo nhóm tuổi đang chọn; không chọn thì giữ nguyên.
pub fn filtered_outcomes(records: &[OutcomeRecord], selected: Option<&str>) -> Vec<OutcomeRecord> {
    match selected {
        None => records.to_vec(),
        Some(group) => records
            .iter()
            .filter(|record| record.age_group == group)
            .cloned()
            .collect(),
    }
}

/// Chọn một chẩn đoán thì biểu đồ tròn chỉ còn đúng lát đó.
pub fn filtered_diagnoses(
    records: &[DiagnosisRecord],
    selected: Option<&str>,
) -> Vec<DiagnosisRecord> {
    match selected {
        None => records.to_vec(),
        Some(name) => records
            .iter()
            .filter(|record| record.name == name)
            .cloned()
            .collect(),
    }
}

pub fn vital_signs_by_range(samples: &[VitalSample], range: TimeRange) -> Vec<VitalSample> {
    match range.hour_limit() {
        None => samples.to_vec(),
        Some(limit) => samples
            .iter()
            .filter(|sample| sample.hour < limit)
            .cloned()
            .collect(),
    }
}

/// Giữ các mẫu nằm trong khoảng zoom (bao gồm hai đầu).
///
/// Nhãn không phải số thì so theo nhãn giờ đã định dạng.
pub fn vitals_in_domain(samples: &[VitalSample], domain: &ZoomDomain) -> Vec<VitalSample> {
    match domain.numeric_bounds() {
        Some((low, high)) => samples
            .iter()
            .filter(|sample| sample.hour >= low && sample.hour <= high)
            .cloned()
            .collect(),
        None => samples
            .iter()
            .filter(|sample| {
                let label = sample.hour_label();
                label.as_str() >= domain.low() && label.as_str() <= domain.high()
            })
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(group: &str) -> OutcomeRecord {
        OutcomeRecord {
            age_group: group.to_string(),
            survived: 10.0,
            deceased: 2.0,
        }
    }

    fn vital(hour: f64) -> VitalSample {
        VitalSample {
            hour,
            heart_rate: 80.0 + hour,
            o2_saturation: 96.0,
            blood_pressure: 120.0,
            glucose: 110.0,
        }
    }

    fn day_of_vitals() -> Vec<VitalSample> {
        (0..24).map(|hour| vital(hour as f64)).collect()
    }

    fn is_subsequence(small: &[VitalSample], large: &[VitalSample]) -> bool {
        let mut rest = large.iter();
        small.iter().all(|item| rest.any(|candidate| candidate == item))
    }

    #[test]
    fn outcomes_without_selection_are_unchanged() {
        let data = vec![outcome("18-30"), outcome("31-50"), outcome("65+")];
        assert_eq!(filtered_outcomes(&data, None), data);
    }

    #[test]
    fn outcomes_keep_exactly_matching_groups() {
        let data = vec![
            outcome("18-30"),
            outcome("31-50"),
            outcome("18-30"),
            outcome("65+"),
        ];
        let filtered = filtered_outcomes(&data, Some("18-30"));
        assert_eq!(filtered, vec![outcome("18-30"), outcome("18-30")]);
        assert!(filtered_outcomes(&data, Some("0-17")).is_empty());
    }

    #[test]
    fn selected_diagnosis_reduces_pie_to_one_slice() {
        let data = vec![
            DiagnosisRecord {
                name: "Sepsis".into(),
                value: 30.0,
            },
            DiagnosisRecord {
                name: "Pneumonia".into(),
                value: 20.0,
            },
        ];
        let filtered = filtered_diagnoses(&data, Some("Pneumonia"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Pneumonia");
        assert_eq!(filtered_diagnoses(&data, None).len(), 2);
    }

    #[test]
    fn time_ranges_cut_by_hour() {
        let data = day_of_vitals();
        assert_eq!(vital_signs_by_range(&data, TimeRange::Last24h).len(), 24);
        assert_eq!(vital_signs_by_range(&data, TimeRange::Last12h).len(), 12);
        let six = vital_signs_by_range(&data, TimeRange::Last6h);
        assert_eq!(six.len(), 6);
        assert!(six.iter().all(|sample| sample.hour < 6.0));
    }

    #[test]
    fn time_ranges_are_nested() {
        let data = day_of_vitals();
        let six = vital_signs_by_range(&data, TimeRange::Last6h);
        let twelve = vital_signs_by_range(&data, TimeRange::Last12h);
        let full = vital_signs_by_range(&data, TimeRange::Last24h);
        assert!(is_subsequence(&six, &twelve));
        assert!(is_subsequence(&twelve, &full));
    }

    #[test]
    fn empty_data_filters_to_empty() {
        assert!(filtered_outcomes(&[], Some("65+")).is_empty());
        assert!(filtered_diagnoses(&[], None).is_empty());
        assert!(vital_signs_by_range(&[], TimeRange::Last6h).is_empty());
    }

    #[test]
    fn zoom_domain_is_inclusive() {
        let data = day_of_vitals();
        let zoomed = vitals_in_domain(&data, &ZoomDomain::ordered("8", "2"));
        let hours: Vec<f64> = zoomed.iter().map(|sample| sample.hour).collect();
        assert_eq!(hours, vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        let single = vitals_in_domain(&data, &ZoomDomain::ordered("5", "5"));
        assert_eq!(single.len(), 1);
    }
}
