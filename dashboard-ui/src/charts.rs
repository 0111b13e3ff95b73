#![cfg(target_arch = "wasm32")]

//! Vẽ các biểu đồ bằng SVG từ hình học trong `dashboard_core::chart`.

use std::rc::Rc;

use dashboard_core::chart::{
    extent, grouped_bars, horizontal_bars, nearest_index, palette_color, pie_slices,
    polyline_points, reference_band, scatter_points, BandScale, Frame, LinearScale,
};
use dashboard_core::{
    format_number, BrushHandle, BrushTarget, BrushWindow, Dashboard, MedicationRecord,
    MedicationUsagePoint, OutcomeRecord, StayRecord, ViewAction, VitalSample, ZoomDomain,
    ZoomState,
};
use web_sys::Element;
use yew::prelude::*;

const VIEW_WIDTH: f64 = 640.0;
const SURVIVED_COLOR: &str = "#82ca9d";
const DECEASED_COLOR: &str = "#ff7f7f";
const BAR_COLOR: &str = "#8884d8";
const BRUSH_HEIGHT: f64 = 40.0;
const BRUSH_PADDING: f64 = 6.0;
const BRUSH_HANDLE: f64 = 8.0;

type Series<T> = (&'static str, &'static str, fn(&T) -> f64);

static VITAL_SERIES: [Series<VitalSample>; 4] = [
    ("Heart Rate", "#ff7f7f", heart_rate),
    ("O₂ Saturation", "#82ca9d", o2_saturation),
    ("Blood Pressure", "#8884d8", blood_pressure),
    ("Glucose", "#ffc658", glucose),
];

static USAGE_SERIES: [Series<MedicationUsagePoint>; 4] = [
    ("Antibiotics", "#8884d8", antibiotics),
    ("Vasopressors", "#82ca9d", vasopressors),
    ("Analgesics", "#ffc658", analgesics),
    ("Sedatives", "#ff7f7f", sedatives),
];

fn heart_rate(sample: &VitalSample) -> f64 {
    sample.heart_rate
}

fn o2_saturation(sample: &VitalSample) -> f64 {
    sample.o2_saturation
}

fn blood_pressure(sample: &VitalSample) -> f64 {
    sample.blood_pressure
}

fn glucose(sample: &VitalSample) -> f64 {
    sample.glucose
}

fn antibiotics(point: &MedicationUsagePoint) -> f64 {
    point.antibiotics
}

fn vasopressors(point: &MedicationUsagePoint) -> f64 {
    point.vasopressors
}

fn analgesics(point: &MedicationUsagePoint) -> f64 {
    point.analgesics
}

fn sedatives(point: &MedicationUsagePoint) -> f64 {
    point.sedatives
}

fn px(value: f64) -> String {
    format!("{value:.2}")
}

fn view_box(frame: &Frame) -> String {
    format!("0 0 {} {}", frame.width, frame.height)
}

/// Nới domain 5% mỗi bên để điểm không dính mép.
fn padded(domain: (f64, f64)) -> (f64, f64) {
    let pad = (domain.1 - domain.0).abs() * 0.05;
    (domain.0 - pad, domain.1 + pad)
}

fn empty_chart() -> Html {
    html! { <div class="chart-empty">{"No data available"}</div> }
}

fn legend(items: &[(&'static str, &'static str)]) -> Html {
    html! {
        <div class="chart-legend">
            {
                for items.iter().map(|(label, color)| html! {
                    <span style={format!("--legend-color: {color}")}>{ *label }</span>
                })
            }
        </div>
    }
}

fn value_axis(frame: &Frame, y: &LinearScale) -> Html {
    html! {
        <g class="value-axis">
            {
                for y.ticks(5).into_iter().map(|tick| {
                    let py = y.map(tick);
                    html! {
                        <g>
                            <line class="grid-line" x1={px(frame.left())} x2={px(frame.right())} y1={px(py)} y2={px(py)} />
                            <text x={px(frame.left() - 6.0)} y={px(py + 4.0)} text-anchor="end">{ format_number(tick) }</text>
                        </g>
                    }
                })
            }
            <line class="axis-line" x1={px(frame.left())} x2={px(frame.right())} y1={px(frame.bottom())} y2={px(frame.bottom())} />
        </g>
    }
}

fn linear_x_axis(frame: &Frame, x: &LinearScale, title: &str) -> Html {
    html! {
        <g class="x-axis">
            {
                for x.ticks(8).into_iter().map(|tick| html! {
                    <text x={px(x.map(tick))} y={px(frame.bottom() + 16.0)} text-anchor="middle">{ format_number(tick) }</text>
                })
            }
            <text x={px(frame.left() + frame.plot_width() / 2.0)} y={px(frame.height - 2.0)} text-anchor="middle">{ title.to_string() }</text>
        </g>
    }
}

fn category_axis<'a>(frame: &Frame, labels: impl Iterator<Item = &'a str>, count: usize) -> Html {
    let band = BandScale::new(count, (frame.left(), frame.right()));
    html! {
        <g class="x-axis">
            {
                for labels.enumerate().map(|(index, label)| html! {
                    <text x={px(band.center(index))} y={px(frame.bottom() + 16.0)} text-anchor="middle">{ label.to_string() }</text>
                })
            }
        </g>
    }
}

fn series_lines<T>(
    rows: &[T],
    x_of: fn(&T) -> f64,
    series: &[Series<T>],
    x: &LinearScale,
    y: &LinearScale,
) -> Html {
    html! {
        for series.iter().map(|(name, color, value_of)| {
            let points = polyline_points(rows.iter().map(|row| (x_of(row), value_of(row))), x, y);
            html! {
                <polyline class="series-line" points={points} stroke={*color}>
                    <title>{ *name }</title>
                </polyline>
            }
        })
    }
}

pub fn outcomes_chart(records: &[OutcomeRecord], on_action: &Callback<ViewAction>) -> Html {
    if records.is_empty() {
        return empty_chart();
    }

    let frame = Frame::new(VIEW_WIDTH, 300.0);
    let max = records
        .iter()
        .map(|record| record.survived.max(record.deceased))
        .fold(0.0, f64::max);
    let y = LinearScale::zero_based(max, (frame.bottom(), frame.top()), 5);
    let series: Vec<Vec<f64>> = vec![
        records.iter().map(|record| record.survived).collect(),
        records.iter().map(|record| record.deceased).collect(),
    ];
    let colors = [SURVIVED_COLOR, DECEASED_COLOR];

    html! {
        <>
            <svg class="chart-svg" viewBox={view_box(&frame)} role="img" aria-label="Patient outcomes by age group">
                { value_axis(&frame, &y) }
                {
                    for grouped_bars(&frame, &series, &y).into_iter().map(|bar| {
                        let record = &records[bar.category];
                        let group = record.age_group.clone();
                        let onclick = on_action.reform(move |_: MouseEvent| ViewAction::ToggleAgeGroup(group.clone()));
                        let value = series[bar.series][bar.category];
                        html! {
                            <rect
                                class="clickable"
                                x={px(bar.rect.x)}
                                y={px(bar.rect.y)}
                                width={px(bar.rect.width)}
                                height={px(bar.rect.height)}
                                fill={colors[bar.series]}
                                {onclick}
                            >
                                <title>{ format!("{}: {}", record.age_group, format_number(value)) }</title>
                            </rect>
                        }
                    })
                }
                { category_axis(&frame, records.iter().map(|record| record.age_group.as_str()), records.len()) }
            </svg>
            { legend(&[("Survived", SURVIVED_COLOR), ("Deceased", DECEASED_COLOR)]) }
        </>
    }
}

pub fn diagnosis_chart(dashboard: &Dashboard, on_action: &Callback<ViewAction>) -> Html {
    let records = dashboard.diagnoses();
    let values: Vec<f64> = records.iter().map(|record| record.value).collect();
    let frame = Frame::new(VIEW_WIDTH, 300.0);
    let (cx, cy) = (frame.width / 2.0, frame.height / 2.0);
    let slices = pie_slices(&values, cx, cy, 80.0);
    if slices.is_empty() {
        return empty_chart();
    }

    html! {
        <svg class="chart-svg" viewBox={view_box(&frame)} role="img" aria-label="Diagnosis distribution">
            {
                for slices.into_iter().map(|slice| {
                    let record = &records[slice.index];
                    let name = record.name.clone();
                    let onclick = on_action.reform(move |_: MouseEvent| ViewAction::ToggleDiagnosis(name.clone()));
                    let color = palette_color(dashboard.diagnosis_color_index(&record.name));
                    let anchor = if slice.label_x >= cx { "start" } else { "end" };
                    html! {
                        <g>
                            <path class="clickable" d={slice.path.clone()} fill={color} stroke="#ffffff" {onclick}>
                                <title>{ format!("{}: {}", record.name, format_number(record.value)) }</title>
                            </path>
                            <text x={px(slice.label_x)} y={px(slice.label_y)} text-anchor={anchor}>{ slice.label(&record.name) }</text>
                        </g>
                    }
                })
            }
        </svg>
    }
}

pub fn stay_chart(records: &[StayRecord]) -> Html {
    if records.is_empty() {
        return empty_chart();
    }

    let frame = Frame::new(VIEW_WIDTH, 300.0);
    let max = records.iter().map(|record| record.days).fold(0.0, f64::max);
    let y = LinearScale::zero_based(max, (frame.bottom(), frame.top()), 5);
    let series: Vec<Vec<f64>> = vec![records.iter().map(|record| record.days).collect()];

    html! {
        <svg class="chart-svg" viewBox={view_box(&frame)} role="img" aria-label="Length of stay by service">
            { value_axis(&frame, &y) }
            {
                for grouped_bars(&frame, &series, &y).into_iter().map(|bar| {
                    let record = &records[bar.category];
                    html! {
                        <rect x={px(bar.rect.x)} y={px(bar.rect.y)} width={px(bar.rect.width)} height={px(bar.rect.height)} fill={BAR_COLOR}>
                            <title>{ format!("{}: {} days", record.service, format_number(record.days)) }</title>
                        </rect>
                    }
                })
            }
            { category_axis(&frame, records.iter().map(|record| record.service.as_str()), records.len()) }
        </svg>
    }
}

pub fn medication_chart(records: &[MedicationRecord]) -> Html {
    if records.is_empty() {
        return empty_chart();
    }

    let frame = Frame::new(VIEW_WIDTH, 400.0).with_left_margin(130.0);
    let max = records.iter().map(|record| record.count).fold(0.0, f64::max);
    let x = LinearScale::zero_based(max, (frame.left(), frame.right()), 5);
    let values: Vec<f64> = records.iter().map(|record| record.count).collect();
    let band = BandScale::new(records.len(), (frame.top(), frame.bottom()));

    html! {
        <svg class="chart-svg" viewBox={view_box(&frame)} role="img" aria-label="Most frequent medications">
            {
                for x.ticks(5).into_iter().map(|tick| {
                    let tx = x.map(tick);
                    html! {
                        <g>
                            <line class="grid-line" x1={px(tx)} x2={px(tx)} y1={px(frame.top())} y2={px(frame.bottom())} />
                            <text x={px(tx)} y={px(frame.bottom() + 16.0)} text-anchor="middle">{ format_number(tick) }</text>
                        </g>
                    }
                })
            }
            {
                for horizontal_bars(&frame, &values, &x).into_iter().zip(records).enumerate().map(|(index, (rect, record))| html! {
                    <g>
                        <rect x={px(rect.x)} y={px(rect.y)} width={px(rect.width)} height={px(rect.height)} fill={BAR_COLOR}>
                            <title>{ format!("{}: {}", record.name, format_number(record.count)) }</title>
                        </rect>
                        <text x={px(frame.left() - 6.0)} y={px(band.center(index) + 4.0)} text-anchor="end">{ record.name.clone() }</text>
                    </g>
                })
            }
        </svg>
    }
}

pub fn medication_usage_chart(series: &[MedicationUsagePoint]) -> Html {
    let frame = Frame::new(VIEW_WIDTH, 400.0);
    let days = extent(series.iter().map(|point| f64::from(point.day))).unwrap_or((1.0, 7.0));
    let x = LinearScale::new(days, (frame.left(), frame.right()));
    let max = series
        .iter()
        .flat_map(|point| USAGE_SERIES.iter().map(move |(_, _, value_of)| value_of(point)))
        .fold(0.0, f64::max);
    let y = LinearScale::zero_based(max, (frame.bottom(), frame.top()), 5);

    html! {
        <>
            <svg class="chart-svg" viewBox={view_box(&frame)} role="img" aria-label="Medication usage over time">
                { value_axis(&frame, &y) }
                <text x="12" y={px(frame.top() + frame.plot_height() / 2.0)} text-anchor="middle"
                    transform={format!("rotate(-90 12 {})", px(frame.top() + frame.plot_height() / 2.0))}>
                    {"Number of Doses"}
                </text>
                { series_lines(series, |point| f64::from(point.day), &USAGE_SERIES, &x, &y) }
                { linear_x_axis(&frame, &x, "Day of ICU Stay") }
            </svg>
            { legend(&USAGE_SERIES.map(|(name, color, _)| (name, color))) }
        </>
    }
}

pub fn vitals_scatter(samples: &[VitalSample]) -> Html {
    let (Some(hr), Some(bp)) = (
        extent(samples.iter().map(|sample| sample.heart_rate)),
        extent(samples.iter().map(|sample| sample.blood_pressure)),
    ) else {
        return empty_chart();
    };

    let frame = Frame::new(VIEW_WIDTH, 400.0);
    let x = LinearScale::new(padded(hr), (frame.left(), frame.right()));
    let y = LinearScale::new(padded(bp), (frame.bottom(), frame.top()));
    let triples: Vec<(f64, f64, f64)> = samples
        .iter()
        .map(|sample| (sample.heart_rate, sample.blood_pressure, sample.o2_saturation))
        .collect();

    html! {
        <>
            <svg class="chart-svg" viewBox={view_box(&frame)} role="img" aria-label="Vital signs correlation">
                { value_axis(&frame, &y) }
                {
                    for scatter_points(&triples, &x, &y, (50.0, 400.0)).into_iter().zip(samples).map(|(point, sample)| html! {
                        <circle cx={px(point.cx)} cy={px(point.cy)} r={px(point.r)} fill={BAR_COLOR} fill-opacity="0.6">
                            <title>{ format!(
                                "Heart Rate: {} bpm, Blood Pressure: {} mmHg, O₂ Saturation: {}",
                                format_number(sample.heart_rate),
                                format_number(sample.blood_pressure),
                                format_number(sample.o2_saturation)
                            ) }</title>
                        </circle>
                    })
                }
                { linear_x_axis(&frame, &x, "Heart Rate (bpm)") }
            </svg>
            { legend(&[("Vital Signs", BAR_COLOR)]) }
        </>
    }
}

#[derive(Properties, PartialEq)]
pub struct VitalSignsChartProps {
    pub samples: Vec<VitalSample>,
    pub zoom: ZoomState,
    pub on_action: Callback<ViewAction>,
}

/// Biểu đồ đường chỉ số sống, hỗ trợ kéo-thả để zoom khi bật chế độ tùy chỉnh.
#[function_component(VitalSignsChart)]
pub fn vital_signs_chart(props: &VitalSignsChartProps) -> Html {
    let svg_ref = use_node_ref();
    let samples = &props.samples;
    if samples.is_empty() {
        return empty_chart();
    }

    let frame = Frame::new(VIEW_WIDTH, 400.0);
    let hours: Vec<f64> = samples.iter().map(|sample| sample.hour).collect();
    let x_domain = props
        .zoom
        .domain()
        .and_then(ZoomDomain::numeric_bounds)
        .or_else(|| extent(hours.iter().copied()))
        .unwrap_or((0.0, 1.0));
    let x = LinearScale::new(x_domain, (frame.left(), frame.right()));
    let y_max = samples
        .iter()
        .flat_map(|sample| VITAL_SERIES.iter().map(move |(_, _, value_of)| value_of(sample)))
        .fold(0.0, f64::max);
    let y = LinearScale::zero_based(y_max, (frame.bottom(), frame.top()), 5);

    let label_at: Rc<dyn Fn(&MouseEvent) -> Option<String>> = {
        let svg_ref = svg_ref.clone();
        let hours = hours.clone();
        Rc::new(move |event: &MouseEvent| {
            let svg = svg_ref.cast::<Element>()?;
            let rect = svg.get_bounding_client_rect();
            if rect.width() <= 0.0 {
                return None;
            }
            let view_x = (f64::from(event.client_x()) - rect.left()) * frame.width / rect.width();
            nearest_index(&hours, view_x, &x).map(|index| format_number(hours[index]))
        })
    };

    let customizing = props.zoom.is_customizing();
    let dragging = matches!(props.zoom, ZoomState::Dragging { .. });

    let onmousedown = customizing.then(|| {
        let label_at = label_at.clone();
        let on_action = props.on_action.clone();
        Callback::from(move |event: MouseEvent| {
            if let Some(label) = label_at(&event) {
                on_action.emit(ViewAction::PointerDown(label));
            }
        })
    });
    let onmousemove = dragging.then(|| {
        let label_at = label_at.clone();
        let on_action = props.on_action.clone();
        Callback::from(move |event: MouseEvent| {
            if let Some(label) = label_at(&event) {
                on_action.emit(ViewAction::PointerMove(label));
            }
        })
    });
    let onmouseup = dragging.then(|| props.on_action.reform(|_: MouseEvent| ViewAction::PointerUp));
    let onmouseleave =
        dragging.then(|| props.on_action.reform(|_: MouseEvent| ViewAction::PointerLeave));

    let reference = props.zoom.drag_preview().and_then(|(start, end)| {
        let (a, b) = (start.parse::<f64>().ok()?, end.parse::<f64>().ok()?);
        Some(reference_band(a, b, &x))
    });

    html! {
        <>
            <svg
                ref={svg_ref}
                class={classes!("chart-svg", customizing.then_some("is-zooming"))}
                viewBox={view_box(&frame)}
                role="img"
                aria-label="Patient vital signs"
                {onmousedown}
                {onmousemove}
                {onmouseup}
                {onmouseleave}
            >
                { value_axis(&frame, &y) }
                <g class="plot">
                    { series_lines(samples, |sample| sample.hour, &VITAL_SERIES, &x, &y) }
                    {
                        reference.map(|(rx, width)| html! {
                            <rect class="reference-area" x={px(rx)} y={px(frame.top())} width={px(width)} height={px(frame.plot_height())} />
                        }).unwrap_or_default()
                    }
                </g>
                { linear_x_axis(&frame, &x, "Hours") }
            </svg>
            { legend(&VITAL_SERIES.map(|(name, color, _)| (name, color))) }
        </>
    }
}

#[derive(Properties, PartialEq)]
pub struct BrushStripProps {
    pub target: BrushTarget,
    /// Nhãn toàn bộ danh mục, chưa cắt theo cửa sổ.
    pub labels: Vec<String>,
    pub window: BrushWindow,
    pub on_action: Callback<ViewAction>,
}

/// Thanh brush dưới biểu đồ danh mục: kéo hai tay nắm để thu hẹp các cột được vẽ.
#[function_component(BrushStrip)]
pub fn brush_strip(props: &BrushStripProps) -> Html {
    let svg_ref = use_node_ref();
    let active = use_state(|| None::<BrushHandle>);
    let count = props.labels.len();
    let Some((start, end)) = props.window.bounds(count) else {
        return Html::default();
    };

    let frame = Frame::new(VIEW_WIDTH, BRUSH_HEIGHT);
    let band = BandScale::new(count, (frame.left(), frame.right()));

    let index_at: Rc<dyn Fn(&MouseEvent) -> Option<usize>> = {
        let svg_ref = svg_ref.clone();
        Rc::new(move |event: &MouseEvent| {
            let svg = svg_ref.cast::<Element>()?;
            let rect = svg.get_bounding_client_rect();
            if rect.width() <= 0.0 {
                return None;
            }
            band.index_at((f64::from(event.client_x()) - rect.left()) * frame.width / rect.width())
        })
    };

    let emit = {
        let on_action = props.on_action.clone();
        let (target, window) = (props.target, props.window);
        move |handle: BrushHandle, index: usize| {
            on_action.emit(ViewAction::SetBrush {
                target,
                window: window.move_handle(handle, index, count),
            })
        }
    };

    let onmousedown = {
        let index_at = index_at.clone();
        let active = active.clone();
        let emit = emit.clone();
        let window = props.window;
        Callback::from(move |event: MouseEvent| {
            if let Some(index) = index_at(&event) {
                let handle = window.nearest_handle(index, count);
                active.set(Some(handle));
                emit(handle, index);
            }
        })
    };
    let onmousemove = (*active).map(|handle| {
        let index_at = index_at.clone();
        Callback::from(move |event: MouseEvent| {
            if let Some(index) = index_at(&event) {
                emit(handle, index);
            }
        })
    });
    let release = {
        let active = active.clone();
        Callback::from(move |_: MouseEvent| active.set(None))
    };

    let x = frame.left() + band.step() * start as f64;
    let width = band.step() * (end - start + 1) as f64;
    let track_y = BRUSH_PADDING;
    let track_height = BRUSH_HEIGHT - BRUSH_PADDING * 2.0;
    let handle = |hx: f64| {
        html! {
            <rect class="brush-handle" x={px(hx - BRUSH_HANDLE / 2.0)} y={px(track_y)} width={px(BRUSH_HANDLE)} height={px(track_height)} />
        }
    };

    html! {
        <svg
            ref={svg_ref}
            class="brush-strip"
            viewBox={format!("0 0 {} {}", frame.width, BRUSH_HEIGHT)}
            role="slider"
            aria-label="Visible range"
            {onmousedown}
            {onmousemove}
            onmouseup={release.clone()}
            onmouseleave={release}
        >
            <rect class="brush-track" x={px(frame.left())} y={px(track_y)} width={px(frame.plot_width())} height={px(track_height)} />
            <rect class="brush-window" x={px(x)} y={px(track_y)} width={px(width)} height={px(track_height)} />
            { handle(x) }
            { handle(x + width) }
            <text x={px(x - BRUSH_HANDLE)} y={px(track_y + track_height / 2.0 + 4.0)} text-anchor="end">{ props.labels[start].clone() }</text>
            <text x={px(x + width + BRUSH_HANDLE)} y={px(track_y + track_height / 2.0 + 4.0)} text-anchor="start">{ props.labels[end].clone() }</text>
        </svg>
    }
}
