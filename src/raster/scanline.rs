//! Even-odd scanline fill of a single ring.
//!
//! Pixel `(row, col)` is sampled at the point `(x = col, y = row)`. For each
//! row the ring's edge crossings are collected with the half-open rule
//! `min(y0, y1) <= y < max(y0, y1)`, sorted, and filled pairwise over the
//! columns `ceil(x_a) <= col < ceil(x_b)`. A 10x10 axis-aligned square from
//! `(0, 0)` to `(10, 10)` therefore covers exactly 100 pixels.
//!
//! Spans that land outside the slice are clamped onto the nearest edge
//! pixel rather than dropped. Rows above or below the slice all collapse
//! onto the first or last row. When there are many of them, only the rows
//! where some span can change after clamping are scanned, so the cost
//! depends on the slice and the ring, not on how far a vertex strays.

use std::collections::BTreeSet;
use std::ops::Range;

use super::mask::PixelMask;
use crate::model::{Coord, Volume};

/// Off-slice row ranges up to this length are scanned row by row.
const DIRECT_SCAN_ROWS: i64 = 4096;

/// Rows scanned inside each gap between breakpoint rows. Gaps only hide
/// sub-pixel slivers lying wholly beside the slice.
const GAP_SAMPLE_ROWS: usize = 64;

/// Fills the interior of `ring` into `mask`.
///
/// Rings with fewer than three vertices cover nothing. Existing pixels in the
/// mask are kept, so calling this for several rings produces their union.
pub fn fill_ring(ring: &[Coord<Volume>], mask: &mut PixelMask) {
    if ring.len() < 3 || mask.width() == 0 || mask.height() == 0 {
        return;
    }

    let (y_lo, y_hi) = ring
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    let first_row = y_lo.ceil() as i64;
    let end_row = y_hi.ceil() as i64;
    let height = mask.height() as i64;

    let mut scanner = RowScanner::new(ring, mask.width());

    for row in first_row.max(0)..end_row.min(height) {
        for &(c0, c1) in scanner.spans(row) {
            mask.insert_span(row as usize, c0, c1);
        }
    }

    let off_slice = [
        (first_row..end_row.min(0), 0),
        (first_row.max(height)..end_row, height - 1),
    ];
    for (rows, target) in off_slice {
        for row in scanner.breakpoint_rows(rows) {
            for &(c0, c1) in scanner.spans(row) {
                mask.insert_span(target as usize, c0, c1);
            }
        }
    }
}

/// Rasterizes one ring into a fresh mask.
pub fn ring_pixels(ring: &[Coord<Volume>], width: usize, height: usize) -> PixelMask {
    let mut mask = PixelMask::new(width, height);
    fill_ring(ring, &mut mask);
    mask
}

/// Consecutive vertex pairs of a closed ring.
fn edges<'a>(
    ring: &'a [Coord<Volume>],
) -> impl Iterator<Item = (&'a Coord<Volume>, &'a Coord<Volume>)> + 'a {
    ring.iter()
        .enumerate()
        .map(move |(i, a)| (a, &ring[(i + 1) % ring.len()]))
}

/// The line through a slanted edge, as `x = intercept + slope * y`.
struct Line {
    intercept: f64,
    slope: f64,
    y_min: f64,
    y_max: f64,
}

impl Line {
    fn through(a: &Coord<Volume>, b: &Coord<Volume>) -> Self {
        let slope = (b.x - a.x) / (b.y - a.y);
        Self {
            intercept: a.x - a.y * slope,
            slope,
            y_min: a.y.min(b.y),
            y_max: a.y.max(b.y),
        }
    }
}

/// Even-odd spans of one ring, row by row, clamped to the slice columns.
struct RowScanner<'a> {
    ring: &'a [Coord<Volume>],
    max_col: i64,
    crossings: Vec<f64>,
    spans: Vec<(usize, usize)>,
}

impl<'a> RowScanner<'a> {
    fn new(ring: &'a [Coord<Volume>], width: usize) -> Self {
        Self {
            ring,
            max_col: width as i64 - 1,
            crossings: Vec::with_capacity(ring.len()),
            spans: Vec::new(),
        }
    }

    /// Inclusive column spans on `row`, each clamped into the slice.
    fn spans(&mut self, row: i64) -> &[(usize, usize)] {
        let y = row as f64;
        self.crossings.clear();
        for (a, b) in edges(self.ring) {
            if (a.y <= y && y < b.y) || (b.y <= y && y < a.y) {
                self.crossings.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
            }
        }
        self.crossings.sort_by(f64::total_cmp);

        self.spans.clear();
        for pair in self.crossings.chunks_exact(2) {
            let c0 = pair[0].ceil() as i64;
            let c1 = pair[1].ceil() as i64 - 1;
            if c1 < c0 {
                continue;
            }
            self.spans.push((
                c0.clamp(0, self.max_col) as usize,
                c1.clamp(0, self.max_col) as usize,
            ));
        }
        &self.spans
    }

    /// Rows of `rows` whose clamped spans, taken together, equal the spans
    /// of every row in the range.
    ///
    /// Between two consecutive breakpoints nothing that decides a clamped
    /// span changes, so one row stands for all of them. Breakpoints sit at:
    ///
    /// - vertex rows
    /// - rows where two edges cross or come within one pixel of each other
    /// - rows where an edge passes a column boundary near the slice
    fn breakpoint_rows(&self, rows: Range<i64>) -> Vec<i64> {
        if rows.is_empty() {
            return Vec::new();
        }
        if rows.end.saturating_sub(rows.start) <= DIRECT_SCAN_ROWS {
            return rows.collect();
        }

        let (lo, hi) = (rows.start as f64, rows.end as f64);
        let slanted: Vec<Line> = edges(self.ring)
            .filter(|(a, b)| a.y != b.y && a.y.max(b.y) >= lo && a.y.min(b.y) <= hi)
            .map(|(a, b)| Line::through(a, b))
            .collect();

        let mut events: Vec<f64> = Vec::new();
        for (a, b) in edges(self.ring) {
            events.push(a.y);
            events.push(b.y);
        }
        for line in &slanted {
            if line.slope == 0.0 {
                continue;
            }
            for k in -1..=self.max_col + 2 {
                events.push((k as f64 - line.intercept) / line.slope);
            }
        }
        for (i, first) in slanted.iter().enumerate() {
            for second in &slanted[i + 1..] {
                if first.y_max < second.y_min || second.y_max < first.y_min {
                    continue;
                }
                let dq = first.slope - second.slope;
                if dq == 0.0 {
                    continue;
                }
                for gap in [-1.0, 0.0, 1.0] {
                    events.push((gap - (first.intercept - second.intercept)) / dq);
                }
            }
        }

        // Breakpoints around every event would outnumber the rows themselves.
        if events.len().saturating_mul(5) as u64 >= rows.end.abs_diff(rows.start) {
            return rows.collect();
        }

        let mut candidates = BTreeSet::from([
            rows.start,
            rows.start + 1,
            rows.end - 2,
            rows.end - 1,
        ]);
        for event in events.into_iter().filter(|e| e.is_finite()) {
            let row = event.floor() as i64;
            candidates.extend(
                (row.saturating_sub(2)..=row.saturating_add(2)).filter(|r| rows.contains(r)),
            );
        }

        let breakpoints: Vec<i64> = candidates.into_iter().collect();
        let mut out = breakpoints.clone();
        for pair in breakpoints.windows(2) {
            out.extend((pair[0] + 1..pair[1]).take(GAP_SAMPLE_ROWS));
        }
        out
    }
}
