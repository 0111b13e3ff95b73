//! Nạp năm file JSON đã tiền xử lý từ MIMIC-III thành các tập dữ liệu của dashboard.

use std::fmt;
use std::path::{Path, PathBuf};

use dashboard_core::{
    DashboardError, Datasets, DiagnosisRecord, LoadPolicy, MedicationRecord, OutcomeRecord,
    StayRecord, VitalSample,
};
use log::{error, info};
use serde::de::DeserializeOwned;

/// Năm file dữ liệu mà bước tiền xử lý bên ngoài cung cấp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    PatientOutcomes,
    DiagnosisDistribution,
    StayDuration,
    MedicationFrequency,
    LabValueTrends,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::PatientOutcomes,
        Resource::DiagnosisDistribution,
        Resource::StayDuration,
        Resource::MedicationFrequency,
        Resource::LabValueTrends,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Resource::PatientOutcomes => "patient_outcomes.json",
            Resource::DiagnosisDistribution => "diagnosis_distribution.json",
            Resource::StayDuration => "stay_duration.json",
            Resource::MedicationFrequency => "medication_frequency.json",
            Resource::LabValueTrends => "lab_value_trends.json",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|resource| resource.file_name() == name)
    }

    /// Ghép đường dẫn/URL gốc với tên file.
    pub fn location(self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        if base.is_empty() {
            self.file_name().to_string()
        } else {
            format!("{base}/{}", self.file_name())
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Nguồn cung cấp nội dung file. Mỗi môi trường (trình duyệt, thư mục cục bộ, test) có một cài đặt.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    async fn fetch_text(&self, resource: Resource) -> Result<String, DashboardError>;
}

/// Đọc trực tiếp từ một thư mục trên đĩa.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DataSource for DirectorySource {
    async fn fetch_text(&self, resource: Resource) -> Result<String, DashboardError> {
        let path = self.root.join(resource.file_name());
        std::fs::read_to_string(&path).map_err(|err| DashboardError::Fetch {
            resource: resource.to_string(),
            message: format!("{}: {err}", path.display()),
        })
    }
}

/// Giải mã một file JSON thành mảng bản ghi đồng nhất.
pub fn decode_records<T: DeserializeOwned>(
    resource: Resource,
    text: &str,
) -> Result<Vec<T>, DashboardError> {
    serde_json::from_str(text).map_err(|err| DashboardError::Parse {
        resource: resource.to_string(),
        message: err.to_string(),
    })
}

async fn fetch_records<S, T>(source: &S, resource: Resource) -> Result<Vec<T>, DashboardError>
where
    S: DataSource,
    T: DeserializeOwned,
{
    let text = source.fetch_text(resource).await?;
    decode_records(resource, &text)
}

/// Tải song song năm tập dữ liệu. Không bao giờ thất bại: lỗi được ghi log và tập lỗi để rỗng.
///
/// Với [`LoadPolicy::AllOrNothing`] chỉ cần một yêu cầu lỗi là cả năm tập đều rỗng.
pub async fn load_datasets<S: DataSource>(source: &S, policy: LoadPolicy) -> Datasets {
    let datasets = match policy {
        LoadPolicy::AllOrNothing => load_all_or_nothing(source).await,
        LoadPolicy::Independent => load_independent(source).await,
    };

    info!(
        "Đã nạp dữ liệu: {} nhóm tuổi, {} chẩn đoán, {} khoa, {} thuốc, {} mẫu chỉ số sống",
        datasets.outcomes.len(),
        datasets.diagnoses.len(),
        datasets.stays.len(),
        datasets.medications.len(),
        datasets.vitals.len()
    );
    datasets
}

async fn load_all_or_nothing<S: DataSource>(source: &S) -> Datasets {
    let joined = futures::try_join!(
        fetch_records::<S, OutcomeRecord>(source, Resource::PatientOutcomes),
        fetch_records::<S, DiagnosisRecord>(source, Resource::DiagnosisDistribution),
        fetch_records::<S, StayRecord>(source, Resource::StayDuration),
        fetch_records::<S, MedicationRecord>(source, Resource::MedicationFrequency),
        fetch_records::<S, VitalSample>(source, Resource::LabValueTrends),
    );

    match joined {
        Ok((outcomes, diagnoses, stays, medications, vitals)) => Datasets {
            outcomes,
            diagnoses,
            stays,
            medications,
            vitals,
        },
        Err(err) => {
            error!("Error loading data: {err}");
            Datasets::default()
        }
    }
}

async fn load_independent<S: DataSource>(source: &S) -> Datasets {
    let (outcomes, diagnoses, stays, medications, vitals) = futures::join!(
        fetch_records::<S, OutcomeRecord>(source, Resource::PatientOutcomes),
        fetch_records::<S, DiagnosisRecord>(source, Resource::DiagnosisDistribution),
        fetch_records::<S, StayRecord>(source, Resource::StayDuration),
        fetch_records::<S, MedicationRecord>(source, Resource::MedicationFrequency),
        fetch_records::<S, VitalSample>(source, Resource::LabValueTrends),
    );

    Datasets {
        outcomes: or_empty(outcomes),
        diagnoses: or_empty(diagnoses),
        stays: or_empty(stays),
        medications: or_empty(medications),
        vitals: or_empty(vitals),
    }
}

fn or_empty<T>(result: Result<Vec<T>, DashboardError>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        error!("Error loading data: {err}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use futures::executor::block_on;

    use super::*;

    /// Nguồn trong bộ nhớ; file không có trong bảng thì trả lỗi.
    struct MemorySource {
        files: HashMap<Resource, String>,
        requested: RefCell<Vec<Resource>>,
    }

    impl MemorySource {
        fn complete() -> Self {
            let files = HashMap::from([
                (
                    Resource::PatientOutcomes,
                    r#"[{"ageGroup":"18-30","survived":120,"deceased":5},{"ageGroup":"65+","survived":80,"deceased":30}]"#.to_string(),
                ),
                (
                    Resource::DiagnosisDistribution,
                    r#"[{"name":"Sepsis","value":40},{"name":"Pneumonia","value":22}]"#.to_string(),
                ),
                (
                    Resource::StayDuration,
                    r#"[{"service":"MICU","days":4.2}]"#.to_string(),
                ),
                (
                    Resource::MedicationFrequency,
                    r#"[{"name":"Heparin","count":310}]"#.to_string(),
                ),
                (
                    Resource::LabValueTrends,
                    r#"[{"hour":0,"heartRate":88,"o2Saturation":97,"bloodPressure":121,"glucose":140},
                        {"hour":1,"heartRate":90,"o2Saturation":96,"bloodPressure":119,"glucose":138}]"#
                        .to_string(),
                ),
            ]);
            Self {
                files,
                requested: RefCell::new(Vec::new()),
            }
        }

        fn without(mut self, resource: Resource) -> Self {
            self.files.remove(&resource);
            self
        }

        fn with(mut self, resource: Resource, text: &str) -> Self {
            self.files.insert(resource, text.to_string());
            self
        }
    }

    impl DataSource for MemorySource {
        async fn fetch_text(&self, resource: Resource) -> Result<String, DashboardError> {
            self.requested.borrow_mut().push(resource);
            self.files
                .get(&resource)
                .cloned()
                .ok_or_else(|| DashboardError::Fetch {
                    resource: resource.to_string(),
                    message: "404 Not Found".to_string(),
                })
        }
    }

    #[test]
    fn loads_all_five_datasets() {
        let source = MemorySource::complete();
        let datasets = block_on(load_datasets(&source, LoadPolicy::AllOrNothing));

        assert_eq!(datasets.outcomes.len(), 2);
        assert_eq!(datasets.diagnoses[0].name, "Sepsis");
        assert_eq!(datasets.stays[0].days, 4.2);
        assert_eq!(datasets.medications[0].count, 310.0);
        assert_eq!(datasets.vitals[1].heart_rate, 90.0);
    }

    #[test]
    fn one_failed_fetch_empties_every_dataset() {
        let source = MemorySource::complete().without(Resource::StayDuration);
        let datasets = block_on(load_datasets(&source, LoadPolicy::AllOrNothing));

        assert!(datasets.outcomes.is_empty());
        assert!(datasets.diagnoses.is_empty());
        assert!(datasets.stays.is_empty());
        assert!(datasets.medications.is_empty());
        assert!(datasets.vitals.is_empty());
        assert_eq!(datasets, Datasets::default());
    }

    #[test]
    fn malformed_json_counts_as_failure() {
        let source = MemorySource::complete().with(Resource::MedicationFrequency, "{not json");
        let datasets = block_on(load_datasets(&source, LoadPolicy::AllOrNothing));
        assert!(datasets.is_empty());
    }

    #[test]
    fn independent_policy_keeps_successful_datasets() {
        let source = MemorySource::complete().without(Resource::LabValueTrends);
        let datasets = block_on(load_datasets(&source, LoadPolicy::Independent));

        assert_eq!(datasets.outcomes.len(), 2);
        assert_eq!(datasets.medications.len(), 1);
        assert!(datasets.vitals.is_empty());
    }

    #[test]
    fn independent_policy_requests_every_resource() {
        let source = MemorySource::complete().without(Resource::PatientOutcomes);
        block_on(load_datasets(&source, LoadPolicy::Independent));

        let mut requested = source.requested.borrow().clone();
        requested.sort_by_key(|resource| resource.file_name());
        let mut expected = Resource::ALL.to_vec();
        expected.sort_by_key(|resource| resource.file_name());
        assert_eq!(requested, expected);
    }

    #[test]
    fn decode_error_names_the_resource() {
        let err = decode_records::<StayRecord>(Resource::StayDuration, "[{\"service\":1}]")
            .expect_err("kiểu sai phải lỗi");
        assert!(err.to_string().contains("stay_duration.json"));
    }

    #[test]
    fn resource_locations_join_base() {
        assert_eq!(
            Resource::PatientOutcomes.location("./processed_data/"),
            "./processed_data/patient_outcomes.json"
        );
        assert_eq!(Resource::LabValueTrends.location(""), "lab_value_trends.json");
        assert_eq!(
            Resource::from_file_name("medication_frequency.json"),
            Some(Resource::MedicationFrequency)
        );
        assert_eq!(Resource::from_file_name("other.json"), None);
    }

    #[test]
    fn directory_source_reports_missing_file() {
        let source = DirectorySource::new("/nonexistent/dashboard-data");
        let err = block_on(source.fetch_text(Resource::StayDuration)).expect_err("không có file");
        assert!(matches!(err, DashboardError::Fetch { .. }));
    }
}
