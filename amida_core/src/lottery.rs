//! The lottery draw: grid generation plus traversal, packaged as an
//! immutable value for renderers and exporters.
//!
//! # Edge policy
//!
//! `generate` is total. Degenerate inputs resolve to documented fallbacks:
//!
//! | input                         | outcome                                         |
//! |-------------------------------|-------------------------------------------------|
//! | no participants               | empty lines, empty mapping                      |
//! | one participant               | `results[0]` or `"undefined result"`, no lines  |
//! | fewer results than tracks     | `"Result<k>(out of range)"` for missing slots   |
//! | height above `MAX_HEIGHT`     | clamped to `MAX_HEIGHT` levels                  |
//!
//! Anything the caller might want to warn about is returned as an
//! [`Advisory`] instead of an error.

use crate::config::LotteryConfig;
use crate::grid::{ConnectorGrid, GridError, LineRecord};
use amida_env::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used when a lone participant has no result to draw.
pub const UNDEFINED_RESULT: &str = "undefined result";

/// Label substituted when the destination track has no result entry.
///
/// `track` is zero-based; the label carries the one-based number.
pub fn out_of_range_label(track: usize) -> String {
    format!("Result{}(out of range)", track + 1)
}

/// One participant paired with one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMapping {
    pub participant: String,
    pub result: String,
    /// Track the participant started on
    pub start: usize,
    /// Track the participant ended on
    pub destination: usize,
}

impl fmt::Display for ResultMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.participant, self.result)
    }
}

/// Non-fatal notices produced while drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Participant and result lists differ in length
    LengthMismatch { participants: usize, results: usize },

    /// A participant landed on a track with no result entry
    OutOfRange { participant: String, track: usize },

    /// The single participant had no result at all
    MissingResult { participant: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::LengthMismatch { participants, results } => write!(
                f,
                "{} participants but {} results; unmatched tracks get placeholder labels",
                participants, results
            ),
            Advisory::OutOfRange { participant, track } => write!(
                f,
                "{} landed on track {} which has no result",
                participant,
                track + 1
            ),
            Advisory::MissingResult { participant } => {
                write!(f, "{} has no result to draw", participant)
            }
        }
    }
}

/// The complete outcome of one lottery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    /// Number of vertical tracks (= participants)
    pub tracks: usize,

    /// Number of levels the grid was generated with
    pub height: usize,

    /// Realized connectors, level-major
    pub lines: Vec<LineRecord>,

    /// One entry per participant, in participant order
    pub mapping: Vec<ResultMapping>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,
}

impl Draw {
    fn empty(height: usize) -> Self {
        Self {
            tracks: 0,
            height,
            lines: Vec::new(),
            mapping: Vec::new(),
            advisories: Vec::new(),
        }
    }

    /// Rebuilds the connector grid from the recorded lines.
    pub fn grid(&self) -> Result<ConnectorGrid, GridError> {
        ConnectorGrid::from_lines(self.tracks, self.height, &self.lines)
    }

    /// Looks up the result a participant received.
    pub fn result_for(&self, participant: &str) -> Option<&str> {
        self.mapping
            .iter()
            .find(|m| m.participant == participant)
            .map(|m| m.result.as_str())
    }

    /// Pairing lines in the classic `"name -> result"` form.
    pub fn summary(&self) -> Vec<String> {
        self.mapping.iter().map(ToString::to_string).collect()
    }
}

/// Runs one lottery.
///
/// Builds a fresh connector grid with `config.effective_height()` levels, walks every
/// participant down it, and pairs each with the result at its destination
/// track. Inputs are only read; the draw owns copies of every label.
pub fn generate<P, Q, R>(
    participants: &[P],
    results: &[Q],
    config: &LotteryConfig,
    rng: &mut R,
) -> Draw
where
    P: AsRef<str>,
    Q: AsRef<str>,
    R: RandomSource + ?Sized,
{
    let tracks = participants.len();
    let mut draw = Draw::empty(config.effective_height());

    if tracks == 0 {
        return draw;
    }
    draw.tracks = tracks;

    if tracks != results.len() {
        draw.advisories.push(Advisory::LengthMismatch {
            participants: tracks,
            results: results.len(),
        });
    }

    if tracks == 1 {
        // A lone track cannot move; skip generation and traversal entirely
        let participant = participants[0].as_ref().to_string();
        let result = match results.first() {
            Some(result) => result.as_ref().to_string(),
            None => {
                draw.advisories.push(Advisory::MissingResult {
                    participant: participant.clone(),
                });
                UNDEFINED_RESULT.to_string()
            }
        };
        draw.mapping = vec![ResultMapping {
            participant,
            result,
            start: 0,
            destination: 0,
        }];
        return draw;
    }

    let grid = ConnectorGrid::generate(tracks, draw.height, config.effective_density(), rng);
    draw.height = grid.height();
    draw.lines = grid.lines();
    draw.mapping = pair(participants, results, &grid, &mut draw.advisories);
    draw
}

/// Pairs every participant with the result under its destination track.
pub(crate) fn pair<P: AsRef<str>, Q: AsRef<str>>(
    participants: &[P],
    results: &[Q],
    grid: &ConnectorGrid,
    advisories: &mut Vec<Advisory>,
) -> Vec<ResultMapping> {
    participants
        .iter()
        .enumerate()
        .map(|(start, participant)| {
            let participant = participant.as_ref().to_string();
            let destination = grid.descend(start);
            let result = match results.get(destination) {
                Some(result) => result.as_ref().to_string(),
                None if grid.tracks() == 1 => {
                    advisories.push(Advisory::MissingResult {
                        participant: participant.clone(),
                    });
                    UNDEFINED_RESULT.to_string()
                }
                None => {
                    advisories.push(Advisory::OutOfRange {
                        participant: participant.clone(),
                        track: destination,
                    });
                    out_of_range_label(destination)
                }
            };
            ResultMapping {
                participant,
                result,
                start,
                destination,
            }
        })
        .collect()
}

/// Recomputes a draw's mapping from an explicit set of lines.
///
/// Used to replay exported runs and to force specific grids in tests.
pub fn replay<P: AsRef<str>, Q: AsRef<str>>(
    participants: &[P],
    results: &[Q],
    height: usize,
    lines: &[LineRecord],
) -> Result<Draw, GridError> {
    let tracks = participants.len();
    let grid = ConnectorGrid::from_lines(tracks, height, lines)?;
    let mut advisories = Vec::new();
    if tracks > 0 && tracks != results.len() {
        advisories.push(Advisory::LengthMismatch {
            participants: tracks,
            results: results.len(),
        });
    }
    let mapping = pair(participants, results, &grid, &mut advisories);
    Ok(Draw {
        tracks,
        height: grid.height(),
        lines: grid.lines(),
        mapping,
        advisories,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_HEIGHT;

    struct Constant(f64);

    impl RandomSource for Constant {
        fn next_uniform(&mut self) -> f64 {
            self.0
        }
    }

    struct Counting {
        calls: usize,
    }

    impl RandomSource for Counting {
        fn next_uniform(&mut self) -> f64 {
            self.calls += 1;
            0.0
        }
    }

    fn pairs(draw: &Draw) -> Vec<(&str, &str)> {
        draw.mapping
            .iter()
            .map(|m| (m.participant.as_str(), m.result.as_str()))
            .collect()
    }

    #[test]
    fn test_two_tracks_with_connector_swap() {
        let config = LotteryConfig::default().with_height(1);
        let draw = generate(&["A", "B"], &["X", "Y"], &config, &mut Constant(0.0));

        assert_eq!(draw.lines, vec![LineRecord::new(0, 0)]);
        assert_eq!(pairs(&draw), vec![("A", "Y"), ("B", "X")]);
        assert!(draw.advisories.is_empty());
    }

    #[test]
    fn test_two_tracks_without_connector_keep_order() {
        let config = LotteryConfig::default().with_height(1);
        let draw = generate(&["A", "B"], &["X", "Y"], &config, &mut Constant(0.99));

        assert!(draw.lines.is_empty());
        assert_eq!(pairs(&draw), vec![("A", "X"), ("B", "Y")]);
    }

    #[test]
    fn test_empty_participants() {
        let draw = generate::<&str, &str, _>(&[], &["X"], &LotteryConfig::default(), &mut Constant(0.0));
        assert_eq!(draw.tracks, 0);
        assert!(draw.lines.is_empty());
        assert!(draw.mapping.is_empty());
    }

    #[test]
    fn test_single_participant_skips_simulation() {
        let mut rng = Counting { calls: 0 };
        let config = LotteryConfig::default().with_height(50).with_density(1.0);
        let draw = generate(&["A"], &["X", "Y"], &config, &mut rng);

        assert_eq!(rng.calls, 0);
        assert!(draw.lines.is_empty());
        assert_eq!(pairs(&draw), vec![("A", "X")]);
        assert_eq!(
            draw.advisories,
            vec![Advisory::LengthMismatch { participants: 1, results: 2 }]
        );
    }

    #[test]
    fn test_single_participant_ignores_unbounded_height() {
        let mut rng = Counting { calls: 0 };
        let config = LotteryConfig::default().with_height(usize::MAX).with_density(1.0);
        let draw = generate(&["A"], &["X"], &config, &mut rng);

        assert_eq!(rng.calls, 0);
        assert_eq!(pairs(&draw), vec![("A", "X")]);
        assert_eq!((draw.mapping[0].start, draw.mapping[0].destination), (0, 0));
        assert!(draw.advisories.is_empty());
    }

    #[test]
    fn test_oversized_height_is_clamped() {
        let config = LotteryConfig::default().with_height(usize::MAX).with_density(0.0);
        let draw = generate(&["A", "B", "C"], &["X", "Y", "Z"], &config, &mut Constant(0.99));

        assert_eq!(draw.height, MAX_HEIGHT);
        assert!(draw.lines.is_empty());
        assert_eq!(pairs(&draw), vec![("A", "X"), ("B", "Y"), ("C", "Z")]);
        assert_eq!(replay(&["A", "B", "C"], &["X", "Y", "Z"], usize::MAX, &[]).unwrap().height, MAX_HEIGHT);
    }

    #[test]
    fn test_single_participant_without_result() {
        let draw = generate::<_, &str, _>(&["A"], &[], &LotteryConfig::default(), &mut Constant(0.0));
        assert_eq!(pairs(&draw), vec![("A", UNDEFINED_RESULT)]);
        assert!(draw
            .advisories
            .contains(&Advisory::MissingResult { participant: "A".to_string() }));
    }

    #[test]
    fn test_height_zero_is_identity() {
        let config = LotteryConfig::default().with_height(0);
        let draw = generate(&["A", "B", "C"], &["X", "Y", "Z"], &config, &mut Constant(0.0));
        assert_eq!(pairs(&draw), vec![("A", "X"), ("B", "Y"), ("C", "Z")]);
    }

    #[test]
    fn test_mismatched_lengths_are_tolerated() {
        // One level, always draw: connector at (0,0) only, so C stays on track 2
        let config = LotteryConfig::default().with_height(1);
        let draw = generate(&["A", "B", "C"], &["X", "Y"], &config, &mut Constant(0.0));

        assert_eq!(pairs(&draw), vec![("A", "Y"), ("B", "X"), ("C", "Result3(out of range)")]);
        assert!(draw.result_for("C").unwrap().contains('3'));
        assert_eq!(
            draw.advisories,
            vec![
                Advisory::LengthMismatch { participants: 3, results: 2 },
                Advisory::OutOfRange { participant: "C".to_string(), track: 2 },
            ]
        );
    }

    #[test]
    fn test_mapping_is_a_permutation() {
        let names: Vec<String> = (0..7).map(|i| format!("P{}", i)).collect();
        let prizes: Vec<String> = (0..7).map(|i| format!("R{}", i)).collect();
        let draw = generate(&names, &prizes, &LotteryConfig::default(), &mut Constant(0.1));

        let mut destinations: Vec<usize> = draw.mapping.iter().map(|m| m.destination).collect();
        destinations.sort_unstable();
        assert_eq!(destinations, (0..7).collect::<Vec<_>>());
        for m in &draw.mapping {
            assert_eq!(m.result, prizes[m.destination]);
        }
    }

    #[test]
    fn test_does_not_mutate_inputs() {
        let names = vec!["A".to_string(), "B".to_string()];
        let prizes = vec!["X".to_string(), "Y".to_string()];
        let before = (names.clone(), prizes.clone());
        let _ = generate(&names, &prizes, &LotteryConfig::default(), &mut Constant(0.0));
        assert_eq!((names, prizes), before);
    }

    #[test]
    fn test_replay_matches_generated() {
        let config = LotteryConfig::default().with_height(6);
        let names = ["A", "B", "C", "D"];
        let prizes = ["1", "2", "3", "4"];
        let draw = generate(&names, &prizes, &config, &mut Constant(0.2));

        let again = replay(&names, &prizes, config.height, &draw.lines).unwrap();
        assert_eq!(again.mapping, draw.mapping);
        assert_eq!(draw.grid().unwrap().lines(), draw.lines);
    }

    #[test]
    fn test_summary_format() {
        let config = LotteryConfig::default().with_height(0);
        let draw = generate(&["Alice"], &["Tea"], &config, &mut Constant(0.0));
        assert_eq!(draw.summary(), vec!["Alice -> Tea".to_string()]);
    }

    #[test]
    fn test_advisories_serialize_tagged() {
        let advisory = Advisory::LengthMismatch { participants: 3, results: 2 };
        let json = serde_json::to_value(&advisory).unwrap();
        assert_eq!(json["kind"], "length_mismatch");
        assert_eq!(json["participants"], 3);
    }
}
