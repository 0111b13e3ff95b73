#![cfg(target_arch = "wasm32")]

use dashboard_core::DashboardError;
use dashboard_data::{DataSource, Resource};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// Tải file dữ liệu tĩnh qua `fetch` của trình duyệt. Không timeout, không thử lại.
pub struct HttpSource {
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

fn fetch_error(resource: Resource, message: impl Into<String>) -> DashboardError {
    DashboardError::Fetch {
        resource: resource.to_string(),
        message: message.into(),
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl DataSource for HttpSource {
    async fn fetch_text(&self, resource: Resource) -> Result<String, DashboardError> {
        let url = resource.location(&self.base_url);
        let window = web_sys::window().ok_or_else(|| fetch_error(resource, "Không có window"))?;

        let response: Response = JsFuture::from(window.fetch_with_str(&url))
            .await
            .map_err(|err| fetch_error(resource, describe(&err)))?
            .dyn_into()
            .map_err(|_| fetch_error(resource, "fetch không trả về Response"))?;

        if !response.ok() {
            return Err(fetch_error(
                resource,
                format!("HTTP {} khi tải {url}", response.status()),
            ));
        }

        let body = response
            .text()
            .map_err(|err| fetch_error(resource, describe(&err)))?;
        JsFuture::from(body)
            .await
            .map_err(|err| fetch_error(resource, describe(&err)))?
            .as_string()
            .ok_or_else(|| fetch_error(resource, "Nội dung phản hồi không phải văn bản"))
    }
}
