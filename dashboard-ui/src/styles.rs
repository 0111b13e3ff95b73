#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use web_sys::Document;

const STYLE_MARKER: &str = "data-dashboard-ui";
const STYLE_TAG_SELECTOR: &str = "style[data-dashboard-ui]";

/// Default CSS for the dashboard along with easy-to-override design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --dashboard-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --dashboard-bg: #f8fafc;
  --dashboard-card-bg: #ffffff;
  --dashboard-card-border: rgba(148, 163, 184, 0.28);
  --dashboard-radius: 16px;
  --dashboard-text: #1f2933;
  --dashboard-muted: #52606d;
  --dashboard-heading: #11181c;
  --dashboard-accent: #8884d8;
  --dashboard-accent-soft: rgba(136, 132, 216, 0.16);
  --dashboard-grid: rgba(148, 163, 184, 0.35);
  --dashboard-survived: #82ca9d;
  --dashboard-deceased: #ff7f7f;
}

.dashboard {
  font-family: var(--dashboard-font-family);
  background: var(--dashboard-bg);
  color: var(--dashboard-text);
  display: flex;
  flex-direction: column;
  gap: 20px;
  padding: 24px;
}

.dashboard header {
  display: flex;
  flex-wrap: wrap;
  align-items: center;
  justify-content: space-between;
  gap: 16px;
}

.dashboard h1 {
  margin: 0;
  font-size: 1.6rem;
  color: var(--dashboard-heading);
}

.tab-navigation {
  display: flex;
  gap: 8px;
}

.dashboard button {
  font: inherit;
  border: 1px solid var(--dashboard-card-border);
  background: var(--dashboard-card-bg);
  color: var(--dashboard-text);
  border-radius: 999px;
  padding: 6px 14px;
  cursor: pointer;
}

.dashboard button.active {
  background: var(--dashboard-accent);
  border-color: var(--dashboard-accent);
  color: #ffffff;
}

.controls {
  display: flex;
  flex-wrap: wrap;
  gap: 16px;
  align-items: center;
}

.control-group {
  display: flex;
  flex-wrap: wrap;
  align-items: center;
  gap: 10px;
  background: var(--dashboard-card-bg);
  border: 1px solid var(--dashboard-card-border);
  border-radius: var(--dashboard-radius);
  padding: 10px 14px;
}

.control-group > label {
  font-weight: 600;
  color: var(--dashboard-muted);
}

.toggle-buttons {
  display: flex;
  flex-wrap: wrap;
  gap: 12px;
}

.toggle-buttons label {
  display: inline-flex;
  align-items: center;
  gap: 6px;
  font-size: 0.9rem;
}

.selection-indicator {
  display: inline-flex;
  align-items: center;
  gap: 10px;
  background: var(--dashboard-accent-soft);
  border-radius: 999px;
  padding: 6px 8px 6px 14px;
  font-size: 0.9rem;
}

.charts {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(380px, 1fr));
  gap: 20px;
}

.chart-container {
  background: var(--dashboard-card-bg);
  border: 1px solid var(--dashboard-card-border);
  border-radius: var(--dashboard-radius);
  padding: 16px 18px;
  box-shadow: 0 12px 24px rgba(15, 23, 42, 0.06);
}

.chart-container.full-width {
  grid-column: 1 / -1;
}

.chart-container h2 {
  margin: 0 0 6px;
  font-size: 1.05rem;
  color: var(--dashboard-heading);
}

.interaction-hint {
  margin: 0 0 8px;
  font-size: 0.8rem;
  color: var(--dashboard-muted);
}

.chart-svg {
  width: 100%;
  height: auto;
  user-select: none;
}

.chart-svg .grid-line {
  stroke: var(--dashboard-grid);
  stroke-dasharray: 3 3;
}

.chart-svg .axis-line {
  stroke: var(--dashboard-muted);
}

.chart-svg text {
  font-size: 11px;
  fill: var(--dashboard-muted);
}

.chart-svg .clickable {
  cursor: pointer;
}

.chart-svg .series-line {
  fill: none;
  stroke-width: 2;
  stroke-linejoin: round;
  stroke-linecap: round;
}

.chart-svg .reference-area {
  fill: var(--dashboard-accent);
  fill-opacity: 0.15;
  stroke: var(--dashboard-accent);
  stroke-opacity: 0.3;
}

.chart-svg.is-zooming {
  cursor: crosshair;
}

.brush-strip {
  width: 100%;
  height: auto;
  margin-top: 6px;
  cursor: ew-resize;
  user-select: none;
}

.brush-strip .brush-track {
  fill: var(--dashboard-bg);
  stroke: var(--dashboard-card-border);
}

.brush-strip .brush-window {
  fill: var(--dashboard-accent-soft);
  stroke: var(--dashboard-accent);
}

.brush-strip .brush-handle {
  fill: var(--dashboard-accent);
  rx: 2px;
}

.brush-strip text {
  fill: var(--dashboard-muted);
  font-size: 11px;
}

.chart-empty {
  padding: 48px 0;
  text-align: center;
  color: var(--dashboard-muted);
}

.chart-legend {
  display: flex;
  flex-wrap: wrap;
  justify-content: center;
  gap: 14px;
  font-size: 0.82rem;
}

.chart-legend span::before {
  content: "";
  display: inline-block;
  width: 10px;
  height: 10px;
  margin-right: 6px;
  border-radius: 2px;
  background: var(--legend-color);
}

.loading {
  display: flex;
  flex-direction: column;
  align-items: center;
  justify-content: center;
  gap: 12px;
  min-height: 320px;
  font-family: var(--dashboard-font-family);
  color: var(--dashboard-muted);
}

.spinner {
  width: 42px;
  height: 42px;
  border-radius: 50%;
  border: 4px solid var(--dashboard-accent-soft);
  border-top-color: var(--dashboard-accent);
  animation: dashboard-spin 0.9s linear infinite;
}

@keyframes dashboard-spin {
  to {
    transform: rotate(360deg);
  }
}

.dashboard footer {
  text-align: center;
  color: var(--dashboard-muted);
  font-size: 0.9rem;
}

.dashboard footer .small {
  font-size: 0.78rem;
}

@media (max-width: 720px) {
  .dashboard {
    padding: 14px;
  }

  .charts {
    grid-template-columns: 1fr;
  }

  .tab-navigation {
    width: 100%;
    justify-content: space-between;
  }
}
"#;

/// Chèn CSS mặc định một lần; thẻ `<style>` mang phiên bản crate để dễ soát khi nâng cấp.
/// Trang không có `<head>` (nhúng trong khung lạ) thì gắn vào phần tử gốc.
#[cfg(target_arch = "wasm32")]
pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let style = document.create_element("style")?;
    style.set_attribute(STYLE_MARKER, env!("CARGO_PKG_VERSION"))?;
    style.set_text_content(Some(DEFAULT_STYLES));

    match document.head() {
        Some(head) => head.append_child(&style)?,
        None => document
            .document_element()
            .ok_or_else(|| JsValue::from_str("Dashboard không tìm thấy chỗ gắn CSS mặc định"))?
            .append_child(&style)?,
    };
    Ok(())
}
