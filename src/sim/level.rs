/// Level table: per-level tick interval and obstacle layout.
///
/// ## Sources (priority order):
///   1. `[[levels]]` entries in `config.toml`
///   2. Built-in embedded levels
///
/// ## Embedded map legend (one char per cell, 20×20):
///   '#' = Obstacle     '.' = Empty
///
/// Levels are numbered from 1. Past the last defined level the table
/// clamps: the final entry's speed and layout stay in force.

use crate::config::ConfigError;
use crate::domain::grid::{Grid, Position};

/// Slowest-to-fastest step between embedded levels.
const SPEED_STEP_MS: u64 = 20;
/// Floor for generated speeds.
const MIN_SPEED_MS: u64 = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    pub speed_ms: u64,
    pub obstacles: Vec<Position>,
}

/// Validated, non-empty list of levels.
#[derive(Clone, Debug)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

impl LevelTable {
    /// Build a table, rejecting anything the resolver could not run with.
    pub fn new(levels: Vec<LevelConfig>, grid: &Grid) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::EmptyLevelTable);
        }
        for (i, lvl) in levels.iter().enumerate() {
            let level = i as u32 + 1;
            if lvl.speed_ms == 0 {
                return Err(ConfigError::ZeroSpeed { level });
            }
            for &p in &lvl.obstacles {
                if !grid.is_aligned(p) {
                    return Err(ConfigError::ObstacleMisaligned { level, x: p.x, y: p.y });
                }
                if !grid.contains(p) {
                    return Err(ConfigError::ObstacleOutOfBounds { level, x: p.x, y: p.y });
                }
            }
        }
        Ok(LevelTable { levels })
    }

    /// The embedded five-level progression.
    /// Level n runs at `base_speed_ms - 20 * (n - 1)`, never below 20 ms.
    pub fn standard(grid: &Grid, base_speed_ms: u64) -> Result<Self, ConfigError> {
        let levels = embedded_maps()
            .iter()
            .enumerate()
            .map(|(i, map)| LevelConfig {
                speed_ms: base_speed_ms
                    .saturating_sub(SPEED_STEP_MS * i as u64)
                    .max(MIN_SPEED_MS.min(base_speed_ms)),
                obstacles: parse_map(map, grid.cell_size),
            })
            .collect();
        Self::new(levels, grid)
    }

    /// Lookup with clamping: levels below 1 read level 1, levels past
    /// the end read the last entry.
    pub fn config_for(&self, level: u32) -> &LevelConfig {
        let idx = (level.max(1) as usize - 1).min(self.levels.len() - 1);
        &self.levels[idx]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }
}

// ══════════════════════════════════════════════════════════════
// Embedded levels
// ══════════════════════════════════════════════════════════════

/// Obstacle cells of an ASCII map, in pixels.
fn parse_map(rows: &[&str], cell_size: i32) -> Vec<Position> {
    let mut out = vec![];
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if ch == '#' {
                out.push(Position::new(x as i32 * cell_size, y as i32 * cell_size));
            }
        }
    }
    out
}

fn embedded_maps() -> [&'static [&'static str]; 5] {
    [
        // 1 - Open Orchard
        &[],
        // 2 - Four Posts
        &[
            "....................",
            "....................",
            "..###..........###..",
            "..#..............#..",
            "..#..............#..",
            "....................",
            "....................",
            "....................",
            "....................",
            "....................",
            "....................",
            "....................",
            "....................",
            "....................",
            "....................",
            "..#..............#..",
            "..#..............#..",
            "..###..........###..",
            "....................",
            "....................",
        ],
        // 3 - Hedgerows
        &[
            "....................",
            "....................",
            "....................",
            "....................",
            "....................",
            "...##############...",
            "....................",
            "....................",
            "....................",
            "....................",
            "....................",
            "....................",
            "....................",
            "....................",
            "...##############...",
            "....................",
            "....................",
            "....................",
            "....................",
            "....................",
        ],
        // 4 - Crossroads
        &[
            "....................",
            "....................",
            ".........##.........",
            ".........##.........",
            ".........##.........",
            ".........##.........",
            "....................",
            "....................",
            "..######....######..",
            "..#..............#..",
            "..#..............#..",
            "..######....######..",
            "....................",
            "....................",
            ".........##.........",
            ".........##.........",
            ".........##.........",
            ".........##.........",
            "....................",
            "....................",
        ],
        // 5 - Walled Garden
        &[
            "....................",
            ".#######....#######.",
            ".#................#.",
            ".#................#.",
            ".#....########....#.",
            "......#......#......",
            "......#......#......",
            ".#....#......#....#.",
            ".#................#.",
            ".#................#.",
            ".#................#.",
            ".#................#.",
            ".#....#......#....#.",
            "......#......#......",
            "......#......#......",
            ".#....########....#.",
            ".#................#.",
            ".#................#.",
            ".#######....#######.",
            "....................",
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: Grid = Grid { board_size: 400, cell_size: 20 };

    #[test]
    fn embedded_maps_are_20_by_20() {
        for (i, map) in embedded_maps().iter().enumerate().skip(1) {
            assert_eq!(map.len(), 20, "level {} rows", i + 1);
            for row in map.iter() {
                assert_eq!(row.len(), 20, "level {} row {:?}", i + 1, row);
            }
        }
    }

    #[test]
    fn standard_speeds() {
        let t = LevelTable::standard(&G, 100).unwrap();
        let speeds: Vec<u64> = (1..=5).map(|l| t.config_for(l).speed_ms).collect();
        assert_eq!(speeds, vec![100, 80, 60, 40, 20]);
    }

    #[test]
    fn standard_speed_floor() {
        let t = LevelTable::standard(&G, 50).unwrap();
        let speeds: Vec<u64> = (1..=5).map(|l| t.config_for(l).speed_ms).collect();
        assert_eq!(speeds, vec![50, 30, 20, 20, 20]);
    }

    #[test]
    fn level_one_is_open_and_later_levels_have_obstacles() {
        let t = LevelTable::standard(&G, 100).unwrap();
        assert!(t.config_for(1).obstacles.is_empty());
        for l in 2..=5 {
            assert!(!t.config_for(l).obstacles.is_empty(), "level {l}");
        }
    }

    #[test]
    fn lookup_clamps_past_last_level() {
        let t = LevelTable::standard(&G, 100).unwrap();
        assert_eq!(t.config_for(6), t.config_for(5));
        assert_eq!(t.config_for(42), t.config_for(5));
        assert_eq!(t.config_for(0), t.config_for(1));
    }

    #[test]
    fn parse_map_scales_by_cell_size() {
        let obstacles = parse_map(&["..#", "#.."], 20);
        assert_eq!(obstacles, vec![Position::new(40, 0), Position::new(0, 20)]);
    }

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(LevelTable::new(vec![], &G), Err(ConfigError::EmptyLevelTable)));
    }

    #[test]
    fn rejects_misaligned_obstacle() {
        let levels = vec![LevelConfig { speed_ms: 100, obstacles: vec![Position::new(10, 0)] }];
        assert!(matches!(
            LevelTable::new(levels, &G),
            Err(ConfigError::ObstacleMisaligned { level: 1, x: 10, y: 0 })
        ));
    }
}
