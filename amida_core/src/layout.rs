//! Diagram layout - pixel geometry for a ghost-leg draw.
//!
//! ```text
//!  padding
//!  ┌──────────────────────────────┐
//!  │  A        B        C         │  participant labels (label_height)
//!  │  |--------|        |         │  ─┐
//!  │  |        |--------|         │   │ height levels, spacing_y each
//!  │  |        |        |         │  ─┘
//!  │  X        Y        Z         │  result labels (label_height)
//!  └──────────────────────────────┘
//! ```
//!
//! Horizontal spacing is `(width - 2 * padding) / (N - 1)`; vertical spacing
//! is `(height - 2 * padding - 2 * label_height) / levels`. A connector sits
//! at the vertical centre of its level band.

use crate::grid::LineRecord;
use crate::lottery::Draw;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub label_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            padding: 20.0,
            label_height: 20.0,
        }
    }
}

/// A straight line between two canvas points.
///
/// Serializes as `{"start": [x, y], "end": [x, y]}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Segment {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        nalgebra::distance(&self.start, &self.end)
    }
}

/// Resolved geometry for a grid of `tracks` x `levels`.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramLayout {
    config: LayoutConfig,
    tracks: usize,
    levels: usize,
    spacing_x: f64,
    spacing_y: f64,
}

impl DiagramLayout {
    pub fn new(config: LayoutConfig, tracks: usize, levels: usize) -> Self {
        let spacing_x = if tracks > 1 {
            ((config.width - 2.0 * config.padding) / (tracks - 1) as f64).max(0.0)
        } else {
            0.0
        };
        let spacing_y = if levels > 0 {
            ((config.height - 2.0 * config.padding - 2.0 * config.label_height) / levels as f64)
                .max(0.0)
        } else {
            0.0
        };

        Self {
            config,
            tracks,
            levels,
            spacing_x,
            spacing_y,
        }
    }

    /// Layout sized for a finished draw.
    pub fn for_draw(config: LayoutConfig, draw: &Draw) -> Self {
        Self::new(config, draw.tracks, draw.height)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn tracks(&self) -> usize {
        self.tracks
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Pixel distance between neighbouring tracks.
    pub fn spacing_x(&self) -> f64 {
        self.spacing_x
    }

    /// Pixel height of one level band.
    pub fn spacing_y(&self) -> f64 {
        self.spacing_y
    }

    /// x-coordinate of a track. A lone track is centred.
    pub fn track_x(&self, track: usize) -> f64 {
        if self.tracks <= 1 {
            self.config.width / 2.0
        } else {
            self.config.padding + track as f64 * self.spacing_x
        }
    }

    /// y-coordinate where tracks begin (below the participant labels).
    pub fn track_top(&self) -> f64 {
        self.config.padding + self.config.label_height
    }

    /// y-coordinate where tracks end (above the result labels).
    pub fn track_bottom(&self) -> f64 {
        self.config.height - self.config.padding - self.config.label_height
    }

    /// Vertical centre of a level band.
    pub fn level_y(&self, level: usize) -> f64 {
        self.track_top() + (level as f64 + 0.5) * self.spacing_y
    }

    pub fn track_segment(&self, track: usize) -> Segment {
        let x = self.track_x(track);
        Segment::new(Point2::new(x, self.track_top()), Point2::new(x, self.track_bottom()))
    }

    /// Horizontal segment for a connector between its two tracks.
    pub fn connector_segment(&self, line: &LineRecord) -> Segment {
        let y = self.level_y(line.level);
        Segment::new(
            Point2::new(self.track_x(line.column), y),
            Point2::new(self.track_x(line.column + 1), y),
        )
    }

    /// Anchor for the participant label above a track (text baseline centre).
    pub fn participant_anchor(&self, track: usize) -> Point2<f64> {
        Point2::new(self.track_x(track), self.config.padding + self.config.label_height * 0.75)
    }

    /// Anchor for the result label below a track.
    pub fn result_anchor(&self, track: usize) -> Point2<f64> {
        Point2::new(
            self.track_x(track),
            self.track_bottom() + self.config.label_height * 0.75,
        )
    }

    /// Every track segment followed by every connector segment of `draw`.
    pub fn segments(&self, draw: &Draw) -> Vec<Segment> {
        (0..self.tracks)
            .map(|t| self.track_segment(t))
            .chain(draw.lines.iter().map(|line| self.connector_segment(line)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn layout(tracks: usize, levels: usize) -> DiagramLayout {
        DiagramLayout::new(LayoutConfig::default(), tracks, levels)
    }

    #[test]
    fn test_spacing_formulas() {
        let l = layout(5, 10);
        // (600 - 40) / 4
        assert_relative_eq!(l.spacing_x(), 140.0);
        // (400 - 40 - 40) / 10
        assert_relative_eq!(l.spacing_y(), 32.0);
        assert_relative_eq!(l.track_x(0), 20.0);
        assert_relative_eq!(l.track_x(4), 580.0);
    }

    #[test]
    fn test_connector_segment_is_centred_in_band() {
        let l = layout(3, 4);
        let seg = l.connector_segment(&LineRecord::new(2, 1));

        // top = 40, spacing_y = 80, centre of band 2 = 40 + 2.5 * 80
        assert_relative_eq!(seg.start.y, 240.0);
        assert_relative_eq!(seg.end.y, 240.0);
        assert_relative_eq!(seg.start.x, l.track_x(1));
        assert_relative_eq!(seg.end.x, l.track_x(2));
        assert_relative_eq!(seg.length(), l.spacing_x());
    }

    #[test]
    fn test_track_segment_spans_label_gap() {
        let l = layout(2, 10);
        let seg = l.track_segment(1);
        assert_relative_eq!(seg.start.y, 40.0);
        assert_relative_eq!(seg.end.y, 360.0);
        assert_relative_eq!(seg.start.x, 580.0);
    }

    #[test]
    fn test_single_track_is_centred() {
        let l = layout(1, 10);
        assert_eq!(l.spacing_x(), 0.0);
        assert_relative_eq!(l.track_x(0), 300.0);
    }

    #[test]
    fn test_zero_levels() {
        let l = layout(3, 0);
        assert_eq!(l.spacing_y(), 0.0);
        assert_relative_eq!(l.level_y(0), l.track_top());
    }

    #[test]
    fn test_tiny_canvas_does_not_go_negative() {
        let config = LayoutConfig {
            width: 10.0,
            height: 10.0,
            ..Default::default()
        };
        let l = DiagramLayout::new(config, 4, 4);
        assert_eq!(l.spacing_x(), 0.0);
        assert_eq!(l.spacing_y(), 0.0);
    }

    #[test]
    fn test_segment_serializes_as_coordinate_pairs() {
        let seg = layout(2, 1).connector_segment(&LineRecord::new(0, 0));
        let json = serde_json::to_value(seg).unwrap();

        assert_eq!(json["start"][0].as_f64(), Some(20.0));
        assert_eq!(json["end"][0].as_f64(), Some(580.0));
        assert_eq!(json["start"][1], json["end"][1]);

        let back: Segment = serde_json::from_value(json).unwrap();
        assert_eq!(back, seg);
    }

    #[test]
    fn test_segments_cover_tracks_and_lines() {
        let draw = crate::lottery::replay(
            &["A", "B", "C"],
            &["X", "Y", "Z"],
            2,
            &[LineRecord::new(0, 0), LineRecord::new(1, 1)],
        )
        .unwrap();
        let l = DiagramLayout::for_draw(LayoutConfig::default(), &draw);
        assert_eq!(l.segments(&draw).len(), 5);
    }
}
