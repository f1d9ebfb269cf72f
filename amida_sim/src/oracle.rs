//! Reference oracle for the lottery permutation.
//!
//! The Oracle computes each grid's permutation a second, independent way:
//! instead of walking every participant down the tracks, it keeps a row of
//! "who is standing on track t" and applies each level's connectors as
//! adjacent swaps. For a well-formed grid both views must agree, and the
//! result must be a bijection on `[0, N)`.

use amida_core::grid::ConnectorGrid;
use amida_core::lottery::Draw;

/// A disagreement between the generator and the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// The grid breaks the adjacency-exclusion rule
    Malformed,
    
    /// Two starts reached the same destination
    NotBijective { destination: usize },
    
    /// Traversal and transposition composition disagree
    Diverged { start: usize, traversal: usize, reference: usize },
    
    /// A draw's mapping does not match its own lines
    MappingMismatch { start: usize },
}

impl std::fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Discrepancy::Malformed => write!(f, "grid has adjacent connectors on one level"),
            Discrepancy::NotBijective { destination } => {
                write!(f, "destination {} reached more than once", destination)
            }
            Discrepancy::Diverged { start, traversal, reference } => write!(
                f,
                "start {} descends to {} but reference says {}",
                start, traversal, reference
            ),
            Discrepancy::MappingMismatch { start } => {
                write!(f, "mapping entry for start {} disagrees with its grid", start)
            }
        }
    }
}

/// The Oracle - independent permutation reference.
pub struct Oracle;

impl Oracle {
    /// Destination per start track, by composing adjacent transpositions.
    pub fn permutation(grid: &ConnectorGrid) -> Vec<usize> {
        // occupant[t] = start track currently standing on track t
        let mut occupant: Vec<usize> = (0..grid.tracks()).collect();
        for level in 0..grid.height() {
            for column in 0..grid.columns() {
                if grid.has_connector(level, column) {
                    occupant.swap(column, column + 1);
                }
            }
        }
        
        let mut destination = vec![0; grid.tracks()];
        for (track, &start) in occupant.iter().enumerate() {
            destination[start] = track;
        }
        destination
    }
    
    /// Checks a grid's traversal against the reference.
    pub fn check_grid(grid: &ConnectorGrid) -> Result<Vec<usize>, Discrepancy> {
        if !grid.is_well_formed() {
            return Err(Discrepancy::Malformed);
        }
        
        let traversal = grid.permutation();
        let reference = Self::permutation(grid);
        
        let mut seen = vec![false; grid.tracks()];
        for &destination in &traversal {
            if destination >= seen.len() || seen[destination] {
                return Err(Discrepancy::NotBijective { destination });
            }
            seen[destination] = true;
        }
        
        for (start, (&t, &r)) in traversal.iter().zip(reference.iter()).enumerate() {
            if t != r {
                return Err(Discrepancy::Diverged { start, traversal: t, reference: r });
            }
        }
        
        Ok(traversal)
    }
    
    /// Checks a finished draw: its lines form a valid grid, and every
    /// mapping entry lands where the reference says.
    pub fn check_draw(draw: &Draw) -> Result<(), Discrepancy> {
        let grid = draw.grid().map_err(|_| Discrepancy::Malformed)?;
        let destinations = Self::check_grid(&grid)?;
        for m in &draw.mapping {
            if destinations.get(m.start) != Some(&m.destination) {
                return Err(Discrepancy::MappingMismatch { start: m.start });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amida_core::grid::LineRecord;
    
    #[test]
    fn test_oracle_identity() {
        let grid = ConnectorGrid::new(5, 10);
        assert_eq!(Oracle::permutation(&grid), vec![0, 1, 2, 3, 4]);
    }
    
    #[test]
    fn test_oracle_matches_traversal() {
        let grid = ConnectorGrid::from_lines(
            4,
            3,
            &[
                LineRecord::new(0, 0),
                LineRecord::new(0, 2),
                LineRecord::new(1, 1),
                LineRecord::new(2, 0),
            ],
        )
        .unwrap();
        
        assert_eq!(Oracle::permutation(&grid), grid.permutation());
        assert!(Oracle::check_grid(&grid).is_ok());
    }
    
    #[test]
    fn test_oracle_flags_tampered_mapping() {
        let mut draw = amida_core::replay(&["A", "B"], &["X", "Y"], 1, &[LineRecord::new(0, 0)]).unwrap();
        assert!(Oracle::check_draw(&draw).is_ok());
        
        draw.mapping[0].destination = 0;
        assert_eq!(
            Oracle::check_draw(&draw),
            Err(Discrepancy::MappingMismatch { start: 0 })
        );
    }
    
    #[test]
    fn test_oracle_flags_malformed_lines() {
        let mut draw = amida_core::replay(&["A", "B", "C"], &["X", "Y", "Z"], 1, &[]).unwrap();
        draw.lines = vec![LineRecord::new(0, 0), LineRecord::new(0, 1)];
        assert_eq!(Oracle::check_draw(&draw), Err(Discrepancy::Malformed));
    }
}
