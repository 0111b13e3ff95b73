//! Máy trạng thái kéo-thả để zoom biểu đồ chỉ số sống.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Khoảng zoom đã chốt trên trục x. Luôn có `low <= high`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawZoomDomain")]
pub struct ZoomDomain {
    low: String,
    high: String,
}

#[derive(Deserialize)]
struct RawZoomDomain {
    low: String,
    high: String,
}

impl From<RawZoomDomain> for ZoomDomain {
    fn from(raw: RawZoomDomain) -> Self {
        ZoomDomain::ordered(raw.low, raw.high)
    }
}

impl ZoomDomain {
    /// Dựng khoảng từ hai nhãn theo thứ tự bất kỳ.
    ///
    /// Hai nhãn đều là số thì so sánh theo giá trị số (nhãn giờ "8" < "10"),
    /// ngược lại so sánh chuỗi.
    pub fn ordered(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if compare_labels(&a, &b) == Ordering::Greater {
            Self { low: b, high: a }
        } else {
            Self { low: a, high: b }
        }
    }

    pub fn low(&self) -> &str {
        &self.low
    }

    pub fn high(&self) -> &str {
        &self.high
    }

    /// Giá trị số của hai đầu khoảng, nếu cả hai là số.
    pub fn numeric_bounds(&self) -> Option<(f64, f64)> {
        Some((parse_label(&self.low)?, parse_label(&self.high)?))
    }

    pub fn is_zero_width(&self) -> bool {
        compare_labels(&self.low, &self.high) == Ordering::Equal
    }
}

fn parse_label(label: &str) -> Option<f64> {
    label.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    match (parse_label(a), parse_label(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// Trạng thái zoom của biểu đồ chỉ số sống.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ZoomState {
    /// Không ở chế độ tùy chỉnh, chưa zoom.
    #[default]
    Idle,
    /// Đã bật chế độ tùy chỉnh, chờ người dùng kéo.
    Armed,
    /// Đang kéo: đã có điểm đầu, điểm cuối cập nhật theo chuột.
    Dragging {
        start: String,
        end: Option<String>,
        /// Khoảng đã chốt trước lần kéo này, khôi phục nếu lần kéo bị hủy.
        previous: Option<ZoomDomain>,
    },
    /// Đã chốt khoảng zoom.
    Zoomed {
        domain: ZoomDomain,
        customizing: bool,
    },
}

impl ZoomState {
    pub fn is_customizing(&self) -> bool {
        match self {
            ZoomState::Idle => false,
            ZoomState::Armed | ZoomState::Dragging { .. } => true,
            ZoomState::Zoomed { customizing, .. } => *customizing,
        }
    }

    /// Khoảng zoom đang áp dụng cho trục x.
    pub fn domain(&self) -> Option<&ZoomDomain> {
        match self {
            ZoomState::Zoomed { domain, .. } => Some(domain),
            ZoomState::Dragging { previous, .. } => previous.as_ref(),
            ZoomState::Idle | ZoomState::Armed => None,
        }
    }

    /// Vùng đang kéo (chưa chốt) để vẽ dải tham chiếu.
    pub fn drag_preview(&self) -> Option<(&str, &str)> {
        match self {
            ZoomState::Dragging {
                start,
                end: Some(end),
                ..
            } => Some((start.as_str(), end.as_str())),
            _ => None,
        }
    }

    /// Bật/tắt chế độ tùy chỉnh. Tắt khi đang kéo thì bỏ hai điểm kéo, không chốt gì.
    pub fn toggle_customizing(self) -> Self {
        match self {
            ZoomState::Idle => ZoomState::Armed,
            ZoomState::Armed => ZoomState::Idle,
            ZoomState::Dragging { previous, .. } => match previous {
                Some(domain) => ZoomState::Zoomed {
                    domain,
                    customizing: false,
                },
                None => ZoomState::Idle,
            },
            ZoomState::Zoomed {
                domain,
                customizing,
            } => ZoomState::Zoomed {
                domain,
                customizing: !customizing,
            },
        }
    }

    pub fn pointer_down(self, label: impl Into<String>) -> Self {
        let previous = match self {
            ZoomState::Armed => None,
            ZoomState::Dragging { previous, .. } => previous,
            ZoomState::Zoomed {
                domain,
                customizing: true,
            } => Some(domain),
            other => return other,
        };

        ZoomState::Dragging {
            start: label.into(),
            end: None,
            previous,
        }
    }

    pub fn pointer_move(self, label: impl Into<String>) -> Self {
        match self {
            ZoomState::Dragging {
                start, previous, ..
            } => ZoomState::Dragging {
                start,
                end: Some(label.into()),
                previous,
            },
            other => other,
        }
    }

    pub fn pointer_up(self) -> Self {
        match self {
            ZoomState::Dragging {
                start,
                end: Some(end),
                ..
            } => ZoomState::Zoomed {
                domain: ZoomDomain::ordered(start, end),
                customizing: true,
            },
            ZoomState::Dragging {
                end: None,
                previous,
                ..
            } => match previous {
                Some(domain) => ZoomState::Zoomed {
                    domain,
                    customizing: true,
                },
                None => ZoomState::Armed,
            },
            other => other,
        }
    }

    /// Bỏ khoảng zoom ở mọi trạng thái, giữ nguyên chế độ tùy chỉnh.
    pub fn zoom_out(self) -> Self {
        match self {
            ZoomState::Zoomed {
                customizing: true, ..
            } => ZoomState::Armed,
            ZoomState::Zoomed {
                customizing: false,
                ..
            } => ZoomState::Idle,
            ZoomState::Dragging { start, end, .. } => ZoomState::Dragging {
                start,
                end,
                previous: None,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(start: &str, end: &str) -> ZoomState {
        ZoomState::Idle
            .toggle_customizing()
            .pointer_down(start)
            .pointer_move(end)
            .pointer_up()
    }

    #[test]
    fn commit_is_order_independent() {
        let forward = drag("2", "8");
        let backward = drag("8", "2");

        let expected = ZoomDomain::ordered("2", "8");
        assert_eq!(forward.domain(), Some(&expected));
        assert_eq!(backward.domain(), Some(&expected));
        assert_eq!(expected.low(), "2");
        assert_eq!(expected.high(), "8");
    }

    #[test]
    fn numeric_labels_order_by_value() {
        let domain = ZoomDomain::ordered("10", "8");
        assert_eq!(domain.low(), "8");
        assert_eq!(domain.high(), "10");
        assert_eq!(domain.numeric_bounds(), Some((8.0, 10.0)));
    }

    #[test]
    fn text_labels_order_lexically() {
        let domain = ZoomDomain::ordered("night", "day");
        assert_eq!(domain.low(), "day");
        assert_eq!(domain.numeric_bounds(), None);
    }

    #[test]
    fn toggling_off_mid_drag_discards_endpoints() {
        let state = ZoomState::Idle
            .toggle_customizing()
            .pointer_down("2")
            .pointer_move("5")
            .toggle_customizing();

        assert_eq!(state, ZoomState::Idle);
        assert_eq!(state.domain(), None);
        assert_eq!(state.drag_preview(), None);
    }

    #[test]
    fn pointer_ignored_when_not_customizing() {
        let state = ZoomState::Idle.pointer_down("2").pointer_move("4").pointer_up();
        assert_eq!(state, ZoomState::Idle);
    }

    #[test]
    fn pointer_up_without_end_aborts_to_armed() {
        let state = ZoomState::Armed.pointer_down("3").pointer_up();
        assert_eq!(state, ZoomState::Armed);
    }

    #[test]
    fn move_overwrites_previous_end() {
        let state = ZoomState::Armed
            .pointer_down("1")
            .pointer_move("4")
            .pointer_move("6");
        assert_eq!(state.drag_preview(), Some(("1", "6")));
    }

    #[test]
    fn same_label_commits_zero_width_domain() {
        let state = drag("5", "5");
        let domain = state.domain().expect("đã chốt zoom");
        assert!(domain.is_zero_width());
    }

    #[test]
    fn zoom_out_returns_to_customizing_state() {
        let zoomed = drag("2", "8");
        assert_eq!(zoomed.clone().zoom_out(), ZoomState::Armed);

        let finished = zoomed.toggle_customizing();
        assert!(!finished.is_customizing());
        assert!(finished.domain().is_some());
        assert_eq!(finished.zoom_out(), ZoomState::Idle);
    }

    #[test]
    fn aborted_redrag_keeps_previous_domain() {
        let zoomed = drag("2", "8");
        let state = zoomed.clone().pointer_down("4").pointer_up();
        assert_eq!(state, zoomed);
    }

    #[test]
    fn redrag_replaces_committed_domain() {
        let state = drag("2", "8").pointer_down("10").pointer_move("12").pointer_up();
        assert_eq!(state.domain(), Some(&ZoomDomain::ordered("10", "12")));
    }

    #[test]
    fn zoom_out_while_dragging_drops_previous() {
        let state = drag("2", "8").pointer_down("4").zoom_out();
        assert_eq!(state.domain(), None);
        assert!(matches!(state, ZoomState::Dragging { .. }));
    }
}
