//! The [`CellKind`] type: what occupies a single warehouse cell.

use std::fmt;

/// The content of one warehouse grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CellKind {
    #[default]
    Empty,
    /// Storage shelf. Impassable for transit, but a leg may end on it.
    Shelf,
    /// Where the robot begins every route. Exactly one per valid layout.
    RobotStart,
    /// Drop-off where every route ends. Exactly one per valid layout.
    PackingStation,
    Obstacle,
    /// A cell marked as part of a travelled path (display overlay).
    #[cfg_attr(feature = "serde", serde(rename = "robot-path"))]
    Path,
}

impl CellKind {
    /// Every kind, in declaration order.
    pub const ALL: [CellKind; 6] = [
        CellKind::Empty,
        CellKind::Shelf,
        CellKind::RobotStart,
        CellKind::PackingStation,
        CellKind::Obstacle,
        CellKind::Path,
    ];

    /// Whether the robot may not pass through this cell on its way
    /// somewhere else.
    #[inline]
    pub const fn blocks_transit(self) -> bool {
        match self {
            CellKind::Shelf | CellKind::Obstacle => true,
            CellKind::Empty | CellKind::RobotStart | CellKind::PackingStation | CellKind::Path => {
                false
            }
        }
    }

    /// Whether this is one of the two mandatory anchor kinds.
    #[inline]
    pub const fn is_anchor(self) -> bool {
        match self {
            CellKind::RobotStart | CellKind::PackingStation => true,
            CellKind::Empty | CellKind::Shelf | CellKind::Obstacle | CellKind::Path => false,
        }
    }

    /// The character used for this kind in the text layout format.
    pub const fn glyph(self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Shelf => 'S',
            CellKind::RobotStart => 'R',
            CellKind::PackingStation => 'P',
            CellKind::Obstacle => '#',
            CellKind::Path => '*',
        }
    }

    /// Inverse of [`glyph`](Self::glyph).
    pub const fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(CellKind::Empty),
            'S' => Some(CellKind::Shelf),
            'R' => Some(CellKind::RobotStart),
            'P' => Some(CellKind::PackingStation),
            '#' => Some(CellKind::Obstacle),
            '*' => Some(CellKind::Path),
            _ => None,
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellKind::Empty => "empty",
            CellKind::Shelf => "shelf",
            CellKind::RobotStart => "robot-start",
            CellKind::PackingStation => "packing-station",
            CellKind::Obstacle => "obstacle",
            CellKind::Path => "robot-path",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_shelves_and_obstacles_block() {
        let blocking: Vec<_> = CellKind::ALL
            .into_iter()
            .filter(|k| k.blocks_transit())
            .collect();
        assert_eq!(blocking, vec![CellKind::Shelf, CellKind::Obstacle]);
    }

    #[test]
    fn glyphs_are_distinct_and_invertible() {
        for kind in CellKind::ALL {
            assert_eq!(CellKind::from_glyph(kind.glyph()), Some(kind));
        }
        assert_eq!(CellKind::from_glyph('?'), None);
    }

    #[test]
    fn anchors() {
        assert!(CellKind::RobotStart.is_anchor());
        assert!(CellKind::PackingStation.is_anchor());
        assert!(!CellKind::Shelf.is_anchor());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn kebab_case_names() {
        let json = serde_json::to_string(&CellKind::PackingStation).unwrap();
        assert_eq!(json, "\"packing-station\"");
        let back: CellKind = serde_json::from_str("\"robot-start\"").unwrap();
        assert_eq!(back, CellKind::RobotStart);
    }

    #[test]
    fn serde_names_match_display() {
        for kind in CellKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
        let back: CellKind = serde_json::from_str("\"robot-path\"").unwrap();
        assert_eq!(back, CellKind::Path);
    }
}
