//! SVG path generation for the dashboard sparklines and area charts.
//!
//! Samples are normalized into a vertical band of the canvas (so the line
//! never touches the top or bottom edge), spread evenly across the width,
//! and emitted as SVG path data.

/// Drawing area and the vertical band samples are mapped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    /// Lowest normalized height (the minimum sample lands here).
    pub band_low: f64,
    /// Height of the band; the maximum sample lands at `band_low + band_span`.
    pub band_span: f64,
}

/// Small metric-card sparkline.
pub const SPARKLINE: Canvas = Canvas {
    width: 120.0,
    height: 40.0,
    band_low: 5.0,
    band_span: 30.0,
};

/// Large filled area chart.
pub const AREA: Canvas = Canvas {
    width: 300.0,
    height: 120.0,
    band_low: 20.0,
    band_span: 60.0,
};

impl Canvas {
    fn midpoint(&self) -> f64 {
        self.band_low + self.band_span / 2.0
    }
}

/// Map samples to heights within the canvas band.
///
/// When every sample is equal the range is zero and all heights sit at the
/// middle of the band.
pub fn normalize(samples: &[f64], canvas: &Canvas) -> Vec<f64> {
    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    samples
        .iter()
        .map(|&v| {
            if range == 0.0 || !range.is_finite() {
                canvas.midpoint()
            } else {
                (v - min) / range * canvas.band_span + canvas.band_low
            }
        })
        .collect()
}

/// Screen coordinates (y grows downwards) for each sample.
pub fn points(samples: &[f64], canvas: &Canvas) -> Vec<(f64, f64)> {
    let heights = normalize(samples, canvas);
    let step = x_step(heights.len(), canvas);
    heights
        .iter()
        .enumerate()
        .map(|(i, h)| (i as f64 * step, canvas.height - h))
        .collect()
}

/// Straight-segment polyline: `M x,y L x,y ...`.
pub fn line_path(samples: &[f64], canvas: &Canvas) -> String {
    let pts = points(samples, canvas);
    let Some((&(x0, y0), rest)) = pts.split_first() else {
        return String::new();
    };

    let mut path = format!("M {},{}", num(x0), num(y0));
    for &(x, y) in rest {
        path.push_str(&format!(" L {},{}", num(x), num(y)));
    }
    path
}

/// Smoothed stroke using one quadratic Bezier per segment.
///
/// The control point sits halfway along the segment horizontally at the
/// previous point's height.
pub fn smooth_path(samples: &[f64], canvas: &Canvas) -> String {
    let pts = points(samples, canvas);
    let Some(&(x0, y0)) = pts.first() else {
        return String::new();
    };
    let step = x_step(pts.len(), canvas);

    let mut path = format!("M {},{}", num(x0), num(y0));
    for pair in pts.windows(2) {
        let (prev_x, prev_y) = pair[0];
        let (x, y) = pair[1];
        path.push_str(&format!(
            " Q {},{} {},{}",
            num(prev_x + step / 2.0),
            num(prev_y),
            num(x),
            num(y)
        ));
    }
    path
}

/// The smoothed path closed along the bottom edge, for filled areas.
pub fn area_path(samples: &[f64], canvas: &Canvas) -> String {
    let stroke = smooth_path(samples, canvas);
    if stroke.is_empty() {
        return stroke;
    }
    format!(
        "{stroke} L {w},{h} L 0,{h} Z",
        w = num(canvas.width),
        h = num(canvas.height)
    )
}

/// Position of the newest sample, used for the end-of-line marker.
pub fn last_point(samples: &[f64], canvas: &Canvas) -> Option<(f64, f64)> {
    points(samples, canvas).last().copied()
}

fn x_step(len: usize, canvas: &Canvas) -> f64 {
    if len < 2 {
        0.0
    } else {
        canvas.width / (len - 1) as f64
    }
}

/// Compact number for path data: at most two decimals, no trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_spans_band() {
        let h = normalize(&[0.0, 5.0, 10.0], &SPARKLINE);
        assert_eq!(h, vec![5.0, 20.0, 35.0]);
    }

    #[test]
    fn flat_series_sits_mid_band() {
        assert_eq!(normalize(&[3.0, 3.0, 3.0], &SPARKLINE), vec![20.0; 3]);
        assert_eq!(normalize(&[9.0, 9.0], &AREA), vec![50.0; 2]);
    }

    #[test]
    fn line_path_matches_expected() {
        let path = line_path(&[0.0, 10.0, 5.0], &SPARKLINE);
        assert_eq!(path, "M 0,35 L 60,5 L 120,20");
    }

    #[test]
    fn smooth_path_uses_quadratic_segments() {
        let path = smooth_path(&[0.0, 10.0], &AREA);
        assert_eq!(path, "M 0,100 Q 150,100 300,40");
    }

    #[test]
    fn area_path_is_closed() {
        let path = area_path(&[1.0, 2.0, 3.0], &AREA);
        assert!(path.starts_with("M 0,100"));
        assert!(path.ends_with(" L 300,120 L 0,120 Z"));
        assert_eq!(path.matches(" Q ").count(), 2);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(line_path(&[], &SPARKLINE), "");
        assert_eq!(area_path(&[], &AREA), "");
        assert_eq!(smooth_path(&[4.0], &AREA), "M 0,70");
        assert_eq!(last_point(&[4.0], &SPARKLINE), Some((0.0, 20.0)));
    }

    #[test]
    fn path_grows_with_input() {
        let short = smooth_path(&[1.0, 2.0, 3.0], &AREA);
        let long = smooth_path(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &AREA);
        assert!(long.len() > short.len());
    }

    #[test]
    fn num_trims_zeros() {
        assert_eq!(num(5.0), "5");
        assert_eq!(num(5.217391), "5.22");
        assert_eq!(num(2.5), "2.5");
        assert_eq!(num(-0.001), "0");
    }
}
