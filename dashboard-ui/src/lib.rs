//! Giao diện dashboard lâm sàng MIMIC-III cho môi trường WebAssembly.

#[cfg(target_arch = "wasm32")]
mod charts;
#[cfg(target_arch = "wasm32")]
mod logger;
#[cfg(target_arch = "wasm32")]
mod source;
#[cfg(any(target_arch = "wasm32", test))]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::rc::Rc;

    use crate::charts::{self, BrushStrip, VitalSignsChart};
    use crate::source::HttpSource;
    use crate::{logger, styles};
    use chrono::{DateTime, Utc};
    use dashboard_core::{
        medication_usage_series, BrushTarget, ChartId, Dashboard, DashboardAction, DashboardConfig,
        Panel, Tab, TimeRange, ViewAction,
    };
    use dashboard_data::load_datasets;
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{console, Document, Element, HtmlSelectElement, Window};
    use yew::prelude::*;
    use yew::TargetCast;

    #[derive(Clone, PartialEq)]
    struct DashboardModel(Dashboard);

    impl Reducible for DashboardModel {
        type Action = DashboardAction;

        fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
            Rc::new(DashboardModel(self.0.clone().reduce(action)))
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct DashboardViewProps {
        pub config: DashboardConfig,
    }

    #[function_component(DashboardView)]
    fn dashboard_view(props: &DashboardViewProps) -> Html {
        let model = {
            let config = props.config.clone();
            use_reducer_eq(move || DashboardModel(Dashboard::new(&config)))
        };

        {
            let dispatcher = model.dispatcher();
            let config = props.config.clone();
            use_effect_with((), move |_| {
                if let Some(window) = web_sys::window() {
                    if let Some(document) = window.document() {
                        if let Err(err) = styles::ensure_styles(&document) {
                            console::error_1(&err);
                        }
                    }
                }

                spawn_local(async move {
                    let source = HttpSource::new(config.data_base_url.clone());
                    let datasets = load_datasets(&source, config.load_policy).await;
                    dispatcher.dispatch(DashboardAction::Loaded {
                        datasets,
                        at: Utc::now(),
                    });
                });
                || ()
            });
        }

        let dashboard = &model.0;
        if dashboard.is_loading() {
            return html! {
                <div class="loading">
                    <div class="spinner"></div>
                    <p>{"Loading MIMIC-III data..."}</p>
                </div>
            };
        }

        let on_action = {
            let model = model.clone();
            Callback::from(move |action: ViewAction| model.dispatch(action.into()))
        };

        html! {
            <div class="dashboard">
                <header>
                    <h1>{"MIMIC-III Clinical Dashboard"}</h1>
                    { render_tabs(dashboard.view.active_tab, &on_action) }
                </header>
                <div class="controls">
                    { render_visibility_toggles(dashboard, &on_action) }
                    { render_time_controls(dashboard, &on_action) }
                    {
                        dashboard.view.selected_age_group.as_ref().map(|group| render_selection(
                            "Selected Age Group",
                            group,
                            on_action.reform(|_: MouseEvent| ViewAction::ClearAgeGroup),
                        )).unwrap_or_default()
                    }
                    {
                        dashboard.view.selected_diagnosis.as_ref().map(|name| render_selection(
                            "Selected Diagnosis",
                            name,
                            on_action.reform(|_: MouseEvent| ViewAction::ClearDiagnosis),
                        )).unwrap_or_default()
                    }
                </div>
                <div class="charts">
                    { for dashboard.panels().into_iter().map(|panel| render_panel(panel, dashboard, &on_action)) }
                </div>
                <footer>
                    <p>{"ICU Clinical Dashboard - Based on MIMIC-III Data"}</p>
                    <p class="small">{"Interactive dashboard for clinical data exploration. Data has been processed from MIMIC-III."}</p>
                    <p class="small">{ format!("Data loaded: {}", format_timestamp(dashboard.loaded_at)) }</p>
                </footer>
            </div>
        }
    }

    fn render_tabs(active: Tab, on_action: &Callback<ViewAction>) -> Html {
        html! {
            <div class="tab-navigation">
                {
                    for Tab::ALL.into_iter().map(|tab| {
                        let onclick = on_action.reform(move |_: MouseEvent| ViewAction::SelectTab(tab));
                        html! {
                            <button type="button" class={classes!((tab == active).then_some("active"))} {onclick}>
                                { tab.label() }
                            </button>
                        }
                    })
                }
            </div>
        }
    }

    fn render_visibility_toggles(dashboard: &Dashboard, on_action: &Callback<ViewAction>) -> Html {
        let visible = dashboard.view.visible_charts;
        html! {
            <div class="control-group">
                <label>{"Customize Dashboard:"}</label>
                <div class="toggle-buttons">
                    {
                        for ChartId::ALL.into_iter().map(|chart| {
                            let onchange = on_action.reform(move |_: Event| ViewAction::ToggleChart(chart));
                            html! {
                                <label>
                                    <input type="checkbox" checked={visible.is_visible(chart)} {onchange} />
                                    { chart.label() }
                                </label>
                            }
                        })
                    }
                </div>
            </div>
        }
    }

    fn render_time_controls(dashboard: &Dashboard, on_action: &Callback<ViewAction>) -> Html {
        if !dashboard.shows_time_controls() {
            return Html::default();
        }

        let current = dashboard.view.time_range;
        let customizing = dashboard.view.zoom.is_customizing();
        let zoom_label = if customizing {
            "Finish Zooming"
        } else {
            "Enable Zoom"
        };
        let reset_button = if dashboard.shows_zoom_reset() {
            html! {
                <button type="button" onclick={on_action.reform(|_: MouseEvent| ViewAction::ZoomOut)}>
                    {"Reset Zoom"}
                </button>
            }
        } else {
            Html::default()
        };
        let onchange = on_action.reform(|event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            ViewAction::SetTimeRange(TimeRange::parse(&select.value()))
        });

        html! {
            <div class="control-group">
                <label>{"Time Range:"}</label>
                <select {onchange}>
                    {
                        for TimeRange::ALL.into_iter().map(|range| html! {
                            <option value={range.as_str()} selected={range == current}>{ range.label() }</option>
                        })
                    }
                </select>
                <button
                    type="button"
                    class={classes!(customizing.then_some("active"))}
                    onclick={on_action.reform(|_: MouseEvent| ViewAction::ToggleCustomizing)}
                >
                    { zoom_label }
                </button>
                { reset_button }
            </div>
        }
    }

    fn render_selection(title: &str, value: &str, on_clear: Callback<MouseEvent>) -> Html {
        html! {
            <div class="selection-indicator">
                <span>{ format!("{title}: {value}") }</span>
                <button type="button" onclick={on_clear}>{"Clear"}</button>
            </div>
        }
    }

    fn render_panel(panel: Panel, dashboard: &Dashboard, on_action: &Callback<ViewAction>) -> Html {
        match panel {
            Panel::OutcomesBar => chart_container(
                "Patient Outcomes by Age Group",
                Some("Click on a bar to filter data"),
                false,
                charts::outcomes_chart(&dashboard.outcomes(), on_action),
            ),
            Panel::DiagnosisPie => chart_container(
                "Diagnosis Distribution",
                Some("Click on a segment to filter"),
                false,
                charts::diagnosis_chart(dashboard, on_action),
            ),
            Panel::StayBar => chart_container(
                "Length of Stay by Service",
                None,
                false,
                html! {
                    <>
                        { charts::stay_chart(&dashboard.brushed_stays()) }
                        <BrushStrip
                            target={BrushTarget::StayDuration}
                            labels={dashboard.datasets.stays.iter().map(|record| record.service.clone()).collect::<Vec<_>>()}
                            window={dashboard.view.stay_brush}
                            on_action={on_action.clone()}
                        />
                    </>
                },
            ),
            Panel::VitalSignsLine => {
                let title = format!("Patient Vital Signs ({})", dashboard.view.time_range.as_str());
                let hint = dashboard
                    .view
                    .zoom
                    .is_customizing()
                    .then_some("Click and drag to zoom into a specific time period");
                chart_container(
                    &title,
                    hint,
                    true,
                    html! {
                        <VitalSignsChart
                            samples={dashboard.zoomed_vitals()}
                            zoom={dashboard.view.zoom.clone()}
                            on_action={on_action.clone()}
                        />
                    },
                )
            }
            Panel::VitalsScatter => chart_container(
                "Vital Signs Correlation",
                None,
                true,
                charts::vitals_scatter(&dashboard.vitals()),
            ),
            Panel::MedicationBar => chart_container(
                "Most Frequent Medications",
                None,
                true,
                charts::medication_chart(&dashboard.datasets.medications),
            ),
            Panel::MedicationUsageLine => chart_container(
                "Medication Usage Over Time (Simulated)",
                None,
                true,
                html! {
                    <>
                        { charts::medication_usage_chart(&dashboard.brushed_usage()) }
                        <BrushStrip
                            target={BrushTarget::MedicationUsage}
                            labels={medication_usage_series().iter().map(|point| point.day.to_string()).collect::<Vec<_>>()}
                            window={dashboard.view.usage_brush}
                            on_action={on_action.clone()}
                        />
                    </>
                },
            ),
        }
    }

    fn chart_container(title: &str, hint: Option<&str>, full_width: bool, body: Html) -> Html {
        html! {
            <div class={classes!("chart-container", full_width.then_some("full-width"))}>
                <h2>{ title.to_string() }</h2>
                { hint.map(|text| html! { <p class="interaction-hint">{ text.to_string() }</p> }).unwrap_or_default() }
                { body }
            </div>
        }
    }

    fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
        timestamp
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "--".to_string())
    }

    #[wasm_bindgen]
    pub fn mount_dashboard_view(selector: &str, config: Option<JsValue>) -> Result<(), JsValue> {
        logger::init(log::LevelFilter::Info);

        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))?;

        let config: DashboardConfig = match config {
            Some(value) if !value.is_undefined() && !value.is_null() => from_value(value)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?,
            _ => DashboardConfig::default(),
        };

        yew::Renderer::<DashboardView>::with_root_and_props(target, DashboardViewProps { config })
            .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_dashboard_view;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_dashboard_view(
    _: &str,
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "dashboard-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
