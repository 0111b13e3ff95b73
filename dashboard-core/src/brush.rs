//! Thanh brush dưới biểu đồ danh mục: cửa sổ chỉ số thu hẹp các cột được vẽ.

use serde::{Deserialize, Serialize};

/// Biểu đồ có thanh brush.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BrushTarget {
    StayDuration,
    MedicationUsage,
}

/// Tay nắm ở mỗi đầu cửa sổ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BrushHandle {
    Start,
    End,
}

/// Cửa sổ chỉ số, bao gồm cả hai đầu. `end = None` nghĩa là tới phần tử cuối.
///
/// Hai đầu được kẹp theo độ dài dữ liệu khi dùng, nên cửa sổ cũ vẫn hợp lệ sau
/// khi dữ liệu đổi. Kéo tay nắm qua nhau thì hai đầu đổi vai.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BrushWindow {
    pub start: usize,
    pub end: Option<usize>,
}

impl BrushWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Chỉ số đầu/cuối (tăng dần) sau khi kẹp vào `0..len`; `None` khi không có dữ liệu.
    pub fn bounds(self, len: usize) -> Option<(usize, usize)> {
        let (start, end) = self.raw_bounds(len)?;
        Some((start.min(end), start.max(end)))
    }

    pub fn is_full(self, len: usize) -> bool {
        len == 0 || self.bounds(len) == Some((0, len - 1))
    }

    /// Tay nắm gần chỉ số `index` hơn; cách đều thì chọn đầu.
    pub fn nearest_handle(self, index: usize, len: usize) -> BrushHandle {
        match self.raw_bounds(len) {
            Some((start, end)) if index.abs_diff(end) < index.abs_diff(start) => BrushHandle::End,
            _ => BrushHandle::Start,
        }
    }

    /// Dời một tay nắm tới `index`, giữ nguyên tay nắm còn lại.
    pub fn move_handle(self, handle: BrushHandle, index: usize, len: usize) -> Self {
        let Some((start, end)) = self.raw_bounds(len) else {
            return self;
        };
        let index = index.min(len - 1);
        match handle {
            BrushHandle::Start => Self::new(index, end),
            BrushHandle::End => Self::new(start, index),
        }
    }

    fn raw_bounds(self, len: usize) -> Option<(usize, usize)> {
        let last = len.checked_sub(1)?;
        Some((self.start.min(last), self.end.unwrap_or(last).min(last)))
    }
}

/// Phần dữ liệu nằm trong cửa sổ brush.
pub fn brush_slice<T>(items: &[T], window: BrushWindow) -> &[T] {
    match window.bounds(items.len()) {
        Some((start, end)) => &items[start..=end],
        None => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_covers_everything() {
        let items = [1, 2, 3, 4];
        assert_eq!(brush_slice(&items, BrushWindow::default()), &items);
        assert!(BrushWindow::default().is_full(items.len()));
    }

    #[test]
    fn empty_data_gives_empty_slice() {
        let items: [u32; 0] = [];
        assert!(brush_slice(&items, BrushWindow::new(2, 5)).is_empty());
        assert_eq!(BrushWindow::new(2, 5).bounds(0), None);
        assert_eq!(
            BrushWindow::new(2, 5).move_handle(BrushHandle::End, 1, 0),
            BrushWindow::new(2, 5)
        );
    }

    #[test]
    fn single_item_is_always_kept() {
        let items = ["MICU"];
        assert_eq!(brush_slice(&items, BrushWindow::new(3, 9)), &["MICU"]);
        assert!(BrushWindow::new(3, 9).is_full(1));
    }

    #[test]
    fn reversed_window_is_reordered() {
        let items = ["a", "b", "c", "d", "e"];
        assert_eq!(brush_slice(&items, BrushWindow::new(3, 1)), &["b", "c", "d"]);
        assert_eq!(BrushWindow::new(3, 1).bounds(items.len()), Some((1, 3)));
    }

    #[test]
    fn out_of_range_end_is_clamped() {
        let items = [10, 20, 30];
        assert_eq!(brush_slice(&items, BrushWindow::new(1, 40)), &[20, 30]);
    }

    #[test]
    fn handles_move_independently_and_may_cross() {
        let window = BrushWindow::default();
        let narrowed = window
            .move_handle(BrushHandle::Start, 2, 7)
            .move_handle(BrushHandle::End, 4, 7);
        assert_eq!(narrowed, BrushWindow::new(2, 4));

        let crossed = narrowed.move_handle(BrushHandle::Start, 6, 7);
        assert_eq!(crossed.bounds(7), Some((4, 6)));
    }

    #[test]
    fn nearest_handle_follows_pointer_index() {
        let window = BrushWindow::new(1, 5);
        assert_eq!(window.nearest_handle(0, 7), BrushHandle::Start);
        assert_eq!(window.nearest_handle(4, 7), BrushHandle::End);
        assert_eq!(window.nearest_handle(3, 7), BrushHandle::Start);
    }
}
