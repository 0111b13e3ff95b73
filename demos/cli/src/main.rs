use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use dashboard_core::{
    format_number, Dashboard, DashboardAction, DashboardConfig,
    LoadPolicy, Panel, Tab, TimeRange, ViewAction,
};
use dashboard_data::{load_datasets, DirectorySource};
use log::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    AllOrNothing,
    Independent,
}

impl From<PolicyArg> for LoadPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::AllOrNothing => LoadPolicy::AllOrNothing,
            PolicyArg::Independent => LoadPolicy::Independent,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "dashboard-cli",
    about = "Xem trước dashboard MIMIC-III từ thư mục năm file JSON đã tiền xử lý."
)]
struct Args {
    /// Thư mục chứa patient_outcomes.json, diagnosis_distribution.json, ...
    #[arg(short, long)]
    data_dir: PathBuf,

    /// Khoảng thời gian chỉ số sống: 6h, 12h hoặc 24h.
    #[arg(short, long, default_value = "24h")]
    time_range: String,

    /// Lọc theo nhóm tuổi.
    #[arg(long)]
    age_group: Option<String>,

    /// Lọc theo chẩn đoán.
    #[arg(long)]
    diagnosis: Option<String>,

    /// Zoom biểu đồ chỉ số sống theo giờ, dạng BẮT_ĐẦU..KẾT_THÚC (ví dụ 4..9).
    #[arg(long, value_parser = parse_zoom)]
    zoom: Option<(String, String)>,

    #[arg(long, value_enum, default_value_t = PolicyArg::AllOrNothing)]
    policy: PolicyArg,

    /// Log chi tiết.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if !args.data_dir.is_dir() {
        bail!("Không tìm thấy thư mục dữ liệu {:?}", args.data_dir);
    }

    let config = DashboardConfig {
        data_base_url: args.data_dir.display().to_string(),
        default_time_range: TimeRange::parse(&args.time_range),
        load_policy: args.policy.into(),
    };
    let source = DirectorySource::new(&args.data_dir);
    info!("Đọc dữ liệu từ {:?}", source.root());
    let datasets = futures::executor::block_on(load_datasets(&source, config.load_policy));

    let mut dashboard = Dashboard::new(&config).reduce(DashboardAction::Loaded {
        datasets,
        at: Utc::now(),
    });
    for action in selection_actions(&args) {
        dashboard = dashboard.reduce(action.into());
    }

    if let Some(group) = &args.age_group {
        if dashboard.view.selected_age_group.as_ref() != Some(group) {
            bail!("Nhóm tuổi {group:?} không có trong patient_outcomes.json");
        }
    }
    if let Some(name) = &args.diagnosis {
        if dashboard.view.selected_diagnosis.as_ref() != Some(name) {
            bail!("Chẩn đoán {name:?} không có trong diagnosis_distribution.json");
        }
    }

    if let Some(domain) = dashboard.view.zoom.domain() {
        if domain.is_zero_width() {
            warn!(
                "Khoảng zoom {}..{} rộng 0 giờ, biểu đồ chỉ còn một mốc",
                domain.low(),
                domain.high()
            );
        }
    }

    for tab in Tab::ALL {
        dashboard = dashboard.reduce(ViewAction::SelectTab(tab).into());
        print_tab(&dashboard).with_context(|| format!("Không in được tab {}", tab.label()))?;
    }

    Ok(())
}

fn parse_zoom(value: &str) -> Result<(String, String), String> {
    let (start, end) = value
        .split_once("..")
        .ok_or_else(|| format!("cần dạng BẮT_ĐẦU..KẾT_THÚC, nhận {value:?}"))?;
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() {
        return Err(format!("thiếu đầu mút trong {value:?}"));
    }
    Ok((start.to_string(), end.to_string()))
}

/// Chuỗi hành động tương đương thao tác trên giao diện: lọc rồi kéo zoom và kết thúc.
fn selection_actions(args: &Args) -> Vec<ViewAction> {
    let mut actions = Vec::new();
    if let Some(group) = &args.age_group {
        actions.push(ViewAction::ToggleAgeGroup(group.clone()));
    }
    if let Some(name) = &args.diagnosis {
        actions.push(ViewAction::ToggleDiagnosis(name.clone()));
    }
    if let Some((start, end)) = &args.zoom {
        actions.extend([
            ViewAction::ToggleCustomizing,
            ViewAction::PointerDown(start.clone()),
            ViewAction::PointerMove(end.clone()),
            ViewAction::PointerUp,
            ViewAction::ToggleCustomizing,
        ]);
    }
    actions
}

fn print_tab(dashboard: &Dashboard) -> anyhow::Result<()> {
    println!("== {}", dashboard.view.active_tab.label());
    for panel in dashboard.panels() {
        match panel {
            Panel::OutcomesBar => {
                println!("-- Patient Outcomes by Age Group");
                for record in dashboard.outcomes() {
                    println!(
                        "   {:<12} survived {:>8}  deceased {:>8}",
                        record.age_group,
                        format_number(record.survived),
                        format_number(record.deceased)
                    );
                }
            }
            Panel::DiagnosisPie => {
                println!("-- Diagnosis Distribution");
                let diagnoses = dashboard.diagnoses();
                let total: f64 = diagnoses.iter().map(|record| record.value).sum();
                for record in diagnoses {
                    let percent = if total > 0.0 {
                        record.value / total * 100.0
                    } else {
                        0.0
                    };
                    println!("   {:<28} {:>8}  {:>3.0}%", record.name, format_number(record.value), percent);
                }
            }
            Panel::StayBar => {
                println!("-- Length of Stay by Service");
                for record in dashboard.brushed_stays() {
                    println!("   {:<12} {:>6} days", record.service, format_number(record.days));
                }
            }
            Panel::VitalSignsLine => {
                let vitals = dashboard.zoomed_vitals();
                println!(
                    "-- Patient Vital Signs ({}): {} samples",
                    dashboard.view.time_range.as_str(),
                    vitals.len()
                );
                for sample in vitals {
                    println!(
                        "   h{:<4} HR {:>5}  O2 {:>5}  BP {:>5}  Glu {:>5}",
                        sample.hour_label(),
                        format_number(sample.heart_rate),
                        format_number(sample.o2_saturation),
                        format_number(sample.blood_pressure),
                        format_number(sample.glucose)
                    );
                }
            }
            Panel::VitalsScatter => {
                println!("-- Vital Signs Correlation: {} points", dashboard.vitals().len());
            }
            Panel::MedicationBar => {
                println!("-- Most Frequent Medications");
                for record in &dashboard.datasets.medications {
                    println!("   {:<20} {:>8}", record.name, format_number(record.count));
                }
            }
            Panel::MedicationUsageLine => {
                println!("-- Medication Usage Over Time (Simulated)");
                for point in dashboard.brushed_usage() {
                    println!(
                        "   day {}  antibiotics {:>4}  vasopressors {:>4}  analgesics {:>4}  sedatives {:>4}",
                        point.day,
                        format_number(point.antibiotics),
                        format_number(point.vasopressors),
                        format_number(point.analgesics),
                        format_number(point.sedatives)
                    );
                }
            }
        }
    }
    Ok(())
}
