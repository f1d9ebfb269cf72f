//! Renderers for finished draws.
//!
//! Both renderers are pure consumers of a [`Draw`]: they read the line list
//! and the mapping, and never feed anything back into generation.
//!
//! - [`TextRenderer`] - monospace diagram for terminals
//! - [`SvgRenderer`] - vector diagram laid out by [`DiagramLayout`]

use crate::grid::LineRecord;
use crate::layout::{DiagramLayout, LayoutConfig};
use crate::lottery::Draw;
use std::collections::HashSet;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Participant labels by start track, result labels by destination track.
fn track_labels(draw: &Draw) -> (Vec<&str>, Vec<&str>) {
    let mut top = vec![""; draw.tracks];
    let mut bottom = vec![""; draw.tracks];
    for m in &draw.mapping {
        if let Some(slot) = top.get_mut(m.start) {
            *slot = m.participant.as_str();
        }
        if let Some(slot) = bottom.get_mut(m.destination) {
            *slot = m.result.as_str();
        }
    }
    (top, bottom)
}

// =============================================================================
// TEXT
// =============================================================================

/// Draws the grid with `|` tracks and `-` connectors.
///
/// ```text
/// A       B       C
/// |       |       |
/// |-------|       |
/// |       |-------|
/// |       |       |
/// Y       C       X
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRenderer {
    /// Columns between neighbouring tracks (minimum 2)
    pub cell_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { cell_width: 8 }
    }
}

impl TextRenderer {
    pub fn with_cell_width(cell_width: usize) -> Self {
        Self { cell_width }
    }

    pub fn render(&self, draw: &Draw) -> String {
        if draw.tracks == 0 {
            return String::new();
        }
        let cell = self.cell_width.max(2);
        let connectors: HashSet<LineRecord> = draw.lines.iter().copied().collect();
        let (top, bottom) = track_labels(draw);

        let mut out = String::new();
        out.push_str(&label_row(&top, cell));
        out.push('\n');
        out.push_str(&track_row(draw.tracks, cell, |_| false));
        out.push('\n');
        for level in 0..draw.height {
            out.push_str(&track_row(draw.tracks, cell, |column| {
                connectors.contains(&LineRecord::new(level, column))
            }));
            out.push('\n');
        }
        out.push_str(&track_row(draw.tracks, cell, |_| false));
        out.push('\n');
        out.push_str(&label_row(&bottom, cell));
        out.push('\n');
        out
    }
}

fn track_row(tracks: usize, cell: usize, joined: impl Fn(usize) -> bool) -> String {
    let mut row = String::with_capacity((tracks - 1) * cell + 1);
    for track in 0..tracks {
        row.push('|');
        if track + 1 < tracks {
            let fill = if joined(track) { '-' } else { ' ' };
            row.extend(std::iter::repeat(fill).take(cell - 1));
        }
    }
    row
}

fn label_row(labels: &[&str], cell: usize) -> String {
    let row: String = labels.iter().map(|label| fit(label, cell)).collect();
    row.trim_end().to_string()
}

/// Truncates to `cell - 1` display columns and pads to exactly `cell`.
fn fit(label: &str, cell: usize) -> String {
    let budget = cell - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    debug_assert_eq!(used, out.width());
    out.extend(std::iter::repeat(' ').take(cell - used));
    out
}

// =============================================================================
// SVG
// =============================================================================

/// Emits a standalone SVG document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgRenderer {
    pub layout: LayoutConfig,
    pub stroke_width: f64,
    pub font_size: f64,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            stroke_width: 2.0,
            font_size: 14.0,
        }
    }
}

impl SvgRenderer {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    pub fn render(&self, draw: &Draw) -> String {
        let layout = DiagramLayout::for_draw(self.layout, draw);
        let cfg = layout.config();
        let (top, bottom) = track_labels(draw);

        let mut out = String::new();
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = cfg.width,
            h = cfg.height
        ));
        out.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

        out.push_str(&format!(
            "  <g stroke=\"black\" stroke-width=\"{}\" stroke-linecap=\"round\">\n",
            self.stroke_width
        ));
        for segment in layout.segments(draw) {
            out.push_str(&format!(
                "    <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\"/>\n",
                segment.start.x, segment.start.y, segment.end.x, segment.end.y
            ));
        }
        out.push_str("  </g>\n");

        out.push_str(&format!(
            "  <g font-family=\"sans-serif\" font-size=\"{}\" text-anchor=\"middle\">\n",
            self.font_size
        ));
        for track in 0..draw.tracks {
            let anchor = layout.participant_anchor(track);
            out.push_str(&format!(
                "    <text x=\"{:.1}\" y=\"{:.1}\">{}</text>\n",
                anchor.x,
                anchor.y,
                escape(top[track])
            ));
            let anchor = layout.result_anchor(track);
            out.push_str(&format!(
                "    <text x=\"{:.1}\" y=\"{:.1}\">{}</text>\n",
                anchor.x,
                anchor.y,
                escape(bottom[track])
            ));
        }
        out.push_str("  </g>\n");
        out.push_str("</svg>\n");
        out
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lottery::replay;

    fn swap_draw() -> Draw {
        replay(&["A", "B"], &["X", "Y"], 1, &[LineRecord::new(0, 0)]).unwrap()
    }

    #[test]
    fn test_text_two_tracks() {
        let text = TextRenderer::default().render(&swap_draw());
        let expected = "\
A       B
|       |
|-------|
|       |
X       Y
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_text_results_follow_destinations() {
        let draw = replay(
            &["A", "B", "C"],
            &["1", "2", "3"],
            2,
            &[LineRecord::new(0, 0), LineRecord::new(1, 1)],
        )
        .unwrap();
        let text = TextRenderer::with_cell_width(4).render(&draw);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "A   B   C");
        assert_eq!(lines[2], "|---|   |");
        assert_eq!(lines[3], "|   |---|");
        // The footer lists results in track order
        assert_eq!(lines[5], "1   2   3");
    }

    #[test]
    fn test_text_truncates_wide_labels() {
        let draw = replay(&["田中太郎", "B"], &["X", "Y"], 0, &[]).unwrap();
        let text = TextRenderer::with_cell_width(6).render(&draw);
        // Five display columns fit two double-width characters
        assert_eq!(text.lines().next(), Some("田中  B"));
    }

    #[test]
    fn test_text_empty_draw() {
        let draw = replay::<&str, &str>(&[], &[], 3, &[]).unwrap();
        assert_eq!(TextRenderer::default().render(&draw), "");
    }

    #[test]
    fn test_svg_contains_every_segment_and_label() {
        let svg = SvgRenderer::default().render(&swap_draw());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        // Two tracks plus one connector
        assert_eq!(svg.matches("<line ").count(), 3);
        assert_eq!(svg.matches("<text ").count(), 4);
        assert!(svg.contains(">Y</text>"));
    }

    #[test]
    fn test_svg_uses_custom_canvas() {
        let canvas = LayoutConfig {
            width: 300.0,
            height: 200.0,
            ..Default::default()
        };
        let svg = SvgRenderer::new(canvas).render(&swap_draw());

        assert!(svg.contains("width=\"300\" height=\"200\" viewBox=\"0 0 300 200\""));
        // Right track sits at width - padding
        assert!(svg.contains("x1=\"280.0\""));
    }

    #[test]
    fn test_svg_escapes_labels() {
        let draw = replay(&["<A&B>"], &["\"quoted\""], 1, &[]).unwrap();
        let svg = SvgRenderer::default().render(&draw);
        assert!(svg.contains("&lt;A&amp;B&gt;"));
        assert!(svg.contains("&quot;quoted&quot;"));
    }
}
