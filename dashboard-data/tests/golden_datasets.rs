use chrono::Utc;
use dashboard_core::{
    BrushTarget, BrushWindow, ChartId, Dashboard, DashboardAction, DashboardConfig, DashboardError, LoadPolicy, Panel, Tab,
    TimeRange, ViewAction,
};
use dashboard_data::{load_datasets, DataSource, DirectorySource, Resource};
use futures::executor::block_on;

fn fixture_dir() -> String {
    format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"))
}

/// Thư mục mẫu nhưng một file luôn lỗi mạng.
struct FlakySource {
    inner: DirectorySource,
    failing: Resource,
}

impl DataSource for FlakySource {
    async fn fetch_text(&self, resource: Resource) -> Result<String, DashboardError> {
        if resource == self.failing {
            return Err(DashboardError::Fetch {
                resource: resource.to_string(),
                message: "connection reset".to_string(),
            });
        }
        self.inner.fetch_text(resource).await
    }
}

fn ready_dashboard(policy: LoadPolicy, source: &impl DataSource) -> Dashboard {
    let datasets = block_on(load_datasets(source, policy));
    Dashboard::new(&DashboardConfig::default()).reduce(DashboardAction::Loaded {
        datasets,
        at: Utc::now(),
    })
}

#[test]
fn fixture_directory_loads_every_dataset() {
    let dashboard = ready_dashboard(
        LoadPolicy::AllOrNothing,
        &DirectorySource::new(fixture_dir()),
    );

    assert!(!dashboard.is_loading());
    assert_eq!(dashboard.datasets.outcomes.len(), 5);
    assert_eq!(dashboard.datasets.diagnoses.len(), 5);
    assert_eq!(dashboard.datasets.stays.len(), 5);
    assert_eq!(dashboard.datasets.medications[0].name, "Heparin");
    assert_eq!(dashboard.datasets.vitals.len(), 24);
}

#[test]
fn directory_source_reports_its_root() {
    let dir = fixture_dir();
    let source = DirectorySource::new(&dir);
    assert_eq!(source.root(), std::path::Path::new(&dir));
}

#[test]
fn stay_brush_narrows_fixture_services() {
    let dashboard = ready_dashboard(
        LoadPolicy::AllOrNothing,
        &DirectorySource::new(fixture_dir()),
    )
    .reduce(
        ViewAction::SetBrush {
            target: BrushTarget::StayDuration,
            window: BrushWindow::new(1, 3),
        }
        .into(),
    );

    let services: Vec<String> = dashboard
        .brushed_stays()
        .into_iter()
        .map(|record| record.service)
        .collect();
    assert_eq!(services, ["SICU", "CCU", "CSRU"]);
    assert_eq!(dashboard.panels(), vec![Panel::OutcomesBar, Panel::DiagnosisPie, Panel::StayBar]);
}

#[test]
fn fixture_selections_flow_through_filters() {
    let dashboard = [
        ViewAction::ToggleAgeGroup("51-70".into()),
        ViewAction::ToggleDiagnosis("Pneumonia".into()),
        ViewAction::SetTimeRange(TimeRange::Last12h),
    ]
    .into_iter()
    .fold(
        ready_dashboard(
            LoadPolicy::AllOrNothing,
            &DirectorySource::new(fixture_dir()),
        ),
        |dashboard, action| dashboard.reduce(action.into()),
    );

    let outcomes = dashboard.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].deceased, 247.0);
    assert_eq!(dashboard.diagnoses().len(), 1);
    assert_eq!(dashboard.vitals().len(), 12);
}

#[test]
fn single_failure_renders_all_series_empty() {
    let source = FlakySource {
        inner: DirectorySource::new(fixture_dir()),
        failing: Resource::DiagnosisDistribution,
    };
    let dashboard = ready_dashboard(LoadPolicy::AllOrNothing, &source);

    assert!(!dashboard.is_loading());
    assert!(dashboard.datasets.is_empty());
    assert!(dashboard.outcomes().is_empty());
    assert!(dashboard.diagnoses().is_empty());
    assert!(dashboard.vitals().is_empty());
    assert_eq!(
        dashboard.panels(),
        vec![Panel::OutcomesBar, Panel::DiagnosisPie, Panel::StayBar]
    );
}

#[test]
fn single_failure_with_independent_policy_keeps_the_rest() {
    let source = FlakySource {
        inner: DirectorySource::new(fixture_dir()),
        failing: Resource::DiagnosisDistribution,
    };
    let dashboard = ready_dashboard(LoadPolicy::Independent, &source);

    assert!(dashboard.diagnoses().is_empty());
    assert_eq!(dashboard.outcomes().len(), 5);
    assert_eq!(dashboard.vitals().len(), 24);
}

#[test]
fn hidden_medication_chart_keeps_usage_panel() {
    let dashboard = ready_dashboard(
        LoadPolicy::AllOrNothing,
        &DirectorySource::new(fixture_dir()),
    )
    .reduce(ViewAction::SelectTab(Tab::Medications).into())
    .reduce(ViewAction::ToggleChart(ChartId::Medications).into());

    assert_eq!(dashboard.panels(), vec![Panel::MedicationUsageLine]);
    assert_eq!(dashboard.datasets.medications.len(), 5);
}
