//! Hình học biểu đồ SVG: thang đo, cột, lát tròn, đường và điểm tán xạ.
//!
//! Tách khỏi tầng giao diện để kiểm thử được trên mọi target.

use std::f64::consts::{FRAC_PI_2, PI};

/// Bảng màu dùng chung cho các lát và đường.
pub const PALETTE: [&str; 7] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884d8", "#82ca9d", "#ffc658",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Vùng vẽ kèm lề cho trục.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
}

impl Frame {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin_top: 16.0,
            margin_right: 24.0,
            margin_bottom: 36.0,
            margin_left: 48.0,
        }
    }

    pub fn with_left_margin(self, margin_left: f64) -> Self {
        Self {
            margin_left,
            ..self
        }
    }

    pub fn left(&self) -> f64 {
        self.margin_left
    }

    pub fn right(&self) -> f64 {
        (self.width - self.margin_right).max(self.left())
    }

    pub fn top(&self) -> f64 {
        self.margin_top
    }

    pub fn bottom(&self) -> f64 {
        (self.height - self.margin_bottom).max(self.top())
    }

    pub fn plot_width(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn plot_height(&self) -> f64 {
        self.bottom() - self.top()
    }
}

/// Hình chữ nhật của một cột.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Thang đo tuyến tính domain -> pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Khoảng domain rỗng (min == max) được nới ra 0.5 mỗi bên để vẫn vẽ được.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (mut low, mut high) = domain;
        if high < low {
            std::mem::swap(&mut low, &mut high);
        }
        if (high - low).abs() < f64::EPSILON {
            low -= 0.5;
            high += 0.5;
        }
        Self {
            domain: (low, high),
            range,
        }
    }

    /// Thang bắt đầu từ 0, đỉnh làm tròn lên theo bước tick.
    pub fn zero_based(max: f64, range: (f64, f64), tick_count: usize) -> Self {
        let max = if max.is_finite() && max > 0.0 { max } else { 1.0 };
        let step = nice_step(max, tick_count);
        Self::new((0.0, (max / step).ceil() * step), range)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (r1 - r0).abs() < f64::EPSILON {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Các mốc tick "đẹp" (bội của 1, 2, 5) nằm trong domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (low, high) = self.domain;
        let step = nice_step(high - low, count);
        let first = (low / step).ceil() as i64;
        let last = (high / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

fn nice_step(span: f64, count: usize) -> f64 {
    let raw = span.abs() / count.max(1) as f64;
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Giá trị nhỏ nhất và lớn nhất, bỏ qua NaN.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((low, high)) => Some((low.min(value), high.max(value))),
        })
}

/// Thang phân nhóm đều cho trục danh mục.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    start: f64,
    end: f64,
    padding: f64,
}

impl BandScale {
    pub fn new(count: usize, range: (f64, f64)) -> Self {
        Self {
            count,
            start: range.0,
            end: range.1,
            padding: 0.2,
        }
    }

    pub fn step(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.end - self.start) / self.count as f64
        }
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    pub fn band_start(&self, index: usize) -> f64 {
        self.start + self.step() * index as f64 + self.step() * self.padding / 2.0
    }

    pub fn center(&self, index: usize) -> f64 {
        self.start + self.step() * (index as f64 + 0.5)
    }

    /// Nhóm chứa vị trí pixel, kẹp vào hai nhóm ngoài cùng.
    pub fn index_at(&self, pixel: f64) -> Option<usize> {
        let step = self.step();
        if self.count == 0 || step == 0.0 || !pixel.is_finite() {
            return None;
        }
        let raw = ((pixel - self.start) / step).floor();
        Some(raw.clamp(0.0, (self.count - 1) as f64) as usize)
    }
}

/// Cột của một chuỗi tại một danh mục.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub category: usize,
    pub series: usize,
    pub rect: Rect,
}

/// Cột đứng theo nhóm: mỗi danh mục chia đều cho các chuỗi.
pub fn grouped_bars(frame: &Frame, series: &[Vec<f64>], y: &LinearScale) -> Vec<BarRect> {
    let categories = series.iter().map(Vec::len).max().unwrap_or(0);
    if categories == 0 || series.is_empty() {
        return Vec::new();
    }

    let band = BandScale::new(categories, (frame.left(), frame.right()));
    let bar_width = band.bandwidth() / series.len() as f64;
    let baseline = y.map(0.0);

    let mut bars = Vec::new();
    for category in 0..categories {
        for (index, values) in series.iter().enumerate() {
            let Some(&value) = values.get(category) else {
                continue;
            };
            let top = y.map(value.max(0.0));
            bars.push(BarRect {
                category,
                series: index,
                rect: Rect {
                    x: band.band_start(category) + bar_width * index as f64,
                    y: top,
                    width: bar_width,
                    height: (baseline - top).max(0.0),
                },
            });
        }
    }
    bars
}

/// Cột ngang, một cột cho mỗi giá trị, trục giá trị bắt đầu từ mép trái vùng vẽ.
pub fn horizontal_bars(frame: &Frame, values: &[f64], x: &LinearScale) -> Vec<Rect> {
    let band = BandScale::new(values.len(), (frame.top(), frame.bottom()));
    let origin = x.map(0.0);
    values
        .iter()
        .enumerate()
        .map(|(index, value)| Rect {
            x: origin,
            y: band.band_start(index),
            width: (x.map(value.max(0.0)) - origin).max(0.0),
            height: band.bandwidth(),
        })
        .collect()
}

/// Một lát của biểu đồ tròn.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub index: usize,
    pub path: String,
    pub percent: f64,
    pub label_x: f64,
    pub label_y: f64,
}

impl PieSlice {
    /// Nhãn dạng "Tên: 42%".
    pub fn label(&self, name: &str) -> String {
        format!("{name}: {:.0}%", self.percent * 100.0)
    }
}

/// Chia vòng tròn theo tỉ lệ giá trị, bắt đầu từ góc 12 giờ theo chiều kim đồng hồ.
pub fn pie_slices(values: &[f64], cx: f64, cy: f64, radius: f64) -> Vec<PieSlice> {
    let total: f64 = values.iter().filter(|value| **value > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut angle = -FRAC_PI_2;
    let mut slices = Vec::new();
    for (index, value) in values.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let percent = value / total;
        let sweep = percent * 2.0 * PI;
        let end = angle + sweep;
        let middle = angle + sweep / 2.0;
        let label_radius = radius * 1.25;

        slices.push(PieSlice {
            index,
            path: arc_path(cx, cy, radius, angle, end),
            percent,
            label_x: cx + label_radius * middle.cos(),
            label_y: cy + label_radius * middle.sin(),
        });
        angle = end;
    }
    slices
}

fn arc_path(cx: f64, cy: f64, radius: f64, start: f64, end: f64) -> String {
    let sweep = end - start;
    if sweep >= 2.0 * PI - 1e-9 {
        // Cung trọn vòng không vẽ được bằng một lệnh A, tách làm hai nửa.
        return format!(
            "M {:.2} {:.2} A {r:.2} {r:.2} 0 1 1 {:.2} {:.2} A {r:.2} {r:.2} 0 1 1 {:.2} {:.2} Z",
            cx,
            cy - radius,
            cx,
            cy + radius,
            cx,
            cy - radius,
            r = radius
        );
    }

    let large_arc = if sweep > PI { 1 } else { 0 };
    format!(
        "M {:.2} {:.2} L {:.2} {:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {:.2} {:.2} Z",
        cx,
        cy,
        cx + radius * start.cos(),
        cy + radius * start.sin(),
        cx + radius * end.cos(),
        cy + radius * end.sin(),
        r = radius
    )
}

/// Chuỗi `points` cho `<polyline>`.
pub fn polyline_points(
    points: impl IntoIterator<Item = (f64, f64)>,
    x: &LinearScale,
    y: &LinearScale,
) -> String {
    points
        .into_iter()
        .filter(|(px, py)| px.is_finite() && py.is_finite())
        .map(|(px, py)| format!("{:.2},{:.2}", x.map(px), y.map(py)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Điểm tán xạ, bán kính suy từ giá trị thứ ba theo diện tích.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

/// `area_range` là diện tích (px²) ứng với giá trị nhỏ nhất và lớn nhất của trục z.
pub fn scatter_points(
    points: &[(f64, f64, f64)],
    x: &LinearScale,
    y: &LinearScale,
    area_range: (f64, f64),
) -> Vec<ScatterPoint> {
    let z_scale = extent(points.iter().map(|(_, _, z)| *z))
        .map(|domain| LinearScale::new(domain, area_range));

    points
        .iter()
        .map(|&(px, py, pz)| {
            let area = z_scale
                .map(|scale| scale.map(pz))
                .unwrap_or(area_range.0)
                .max(1.0);
            ScatterPoint {
                cx: x.map(px),
                cy: y.map(py),
                r: (area / PI).sqrt(),
            }
        })
        .collect()
}

/// Chỉ số phần tử có giá trị x gần vị trí pixel nhất.
pub fn nearest_index(xs: &[f64], pixel: f64, x: &LinearScale) -> Option<usize> {
    let target = x.invert(pixel);
    xs.iter()
        .enumerate()
        .filter(|(_, value)| value.is_finite())
        .min_by(|(_, a), (_, b)| {
            (*a - target)
                .abs()
                .partial_cmp(&(*b - target).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(index, _)| index)
}

/// Dải tham chiếu (x, width) giữa hai giá trị trục x, theo thứ tự bất kỳ.
pub fn reference_band(a: f64, b: f64, x: &LinearScale) -> (f64, f64) {
    let (xa, xb) = (x.map(a), x.map(b));
    (xa.min(xb), (xa - xb).abs())
}
