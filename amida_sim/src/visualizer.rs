//! Rerun visualization for lottery draws.
//!
//! This module streams a finished draw to the Rerun viewer.
//! Visualization is optional and only available with the `visualization` feature.
//!
//! # What Gets Logged
//!
//! - Vertical tracks as grey line strips
//! - Connectors as red line strips, one entity per level
//! - Participant and result labels as labelled points
//! - Advisories as text log entries

#[cfg(feature = "visualization")]
use rerun::{Color, LineStrips2D, Points2D, RecordingStream};
use amida_core::{DiagramLayout, Draw};

/// Rerun logger for draw visualization.
pub struct RerunLogger {
    #[cfg(feature = "visualization")]
    rec: Option<RecordingStream>,

    /// Whether visualization is enabled
    enabled: bool,
}

impl RerunLogger {
    /// Creates a new logger with visualization disabled.
    pub fn disabled() -> Self {
        Self {
            #[cfg(feature = "visualization")]
            rec: None,
            enabled: false,
        }
    }

    /// Creates a new logger with visualization enabled.
    #[cfg(feature = "visualization")]
    pub fn new(name: &str) -> Self {
        match rerun::RecordingStreamBuilder::new(name).spawn() {
            Ok(rec) => {
                tracing::info!("Rerun visualization enabled - open Rerun Viewer to see the draw");
                Self {
                    rec: Some(rec),
                    enabled: true,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to initialize Rerun: {:?}", e);
                Self {
                    rec: None,
                    enabled: false,
                }
            }
        }
    }

    /// Creates a logger - returns disabled if visualization feature not enabled.
    #[cfg(not(feature = "visualization"))]
    pub fn new(_name: &str) -> Self {
        tracing::info!("Rerun visualization not available (compile with --features visualization)");
        Self::disabled()
    }

    /// Returns whether visualization is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs tracks, connectors and labels of a draw.
    #[cfg(feature = "visualization")]
    pub fn log_draw(&self, draw: &Draw, layout: &DiagramLayout) {
        let Some(ref rec) = self.rec else {
            return;
        };

        let strip = |segment: amida_core::Segment| -> [[f32; 2]; 2] {
            [
                [segment.start.x as f32, segment.start.y as f32],
                [segment.end.x as f32, segment.end.y as f32],
            ]
        };

        let tracks: Vec<[[f32; 2]; 2]> = (0..draw.tracks)
            .map(|t| strip(layout.track_segment(t)))
            .collect();
        let _ = rec.log(
            "lottery/tracks",
            &LineStrips2D::new(tracks).with_colors([Color::from_rgb(160, 160, 160)]),
        );

        for level in 0..draw.height {
            let rungs: Vec<[[f32; 2]; 2]> = draw
                .lines
                .iter()
                .filter(|line| line.level == level)
                .map(|line| strip(layout.connector_segment(line)))
                .collect();
            let _ = rec.log(
                format!("lottery/connectors/level_{}", level),
                &LineStrips2D::new(rungs).with_colors([Color::from_rgb(220, 60, 60)]),
            );
        }

        let mut anchors = Vec::new();
        let mut labels = Vec::new();
        for m in &draw.mapping {
            let top = layout.participant_anchor(m.start);
            anchors.push([top.x as f32, top.y as f32]);
            labels.push(m.participant.clone());
            let bottom = layout.result_anchor(m.destination);
            anchors.push([bottom.x as f32, bottom.y as f32]);
            labels.push(m.result.clone());
        }
        let _ = rec.log("lottery/labels", &Points2D::new(anchors).with_labels(labels));
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_draw(&self, _draw: &Draw, _layout: &DiagramLayout) {}

    /// Logs a text annotation (e.g., a length-mismatch advisory).
    #[cfg(feature = "visualization")]
    pub fn log_event(&self, path: &str, message: &str) {
        if let Some(ref rec) = self.rec {
            let _ = rec.log(path, &rerun::TextLog::new(message));
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_event(&self, _path: &str, _message: &str) {}
}
