/// GameState: the complete snapshot of a running session.
///
/// The resolver in `sim::step` is the only writer. Renderer and HUD
/// take `&GameState` and read the public fields.

use crate::config::GameConfig;
use crate::domain::entity::{Direction, Heart, Snake};
use crate::domain::grid::{Grid, Position};
use crate::domain::rng::RandomSource;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Title screen, waiting for the first key.
    Menu,
    /// Game in progress. There is no way back out short of a new game.
    Running,
}

pub struct GameState {
    pub grid: Grid,
    pub phase: Phase,

    // ── Entities ──
    pub snake: Snake,
    pub apples: Vec<Position>,
    pub heart: Heart,
    /// Decorative in this ruleset: never collision-checked.
    pub obstacles: Vec<Position>,

    // ── Progress ──
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    /// Current logic tick interval.
    pub speed_ms: u64,
    pub tick: u64,

    // ── Input ──
    /// Latest proposed heading, consumed by the next step.
    pub pending: Option<Direction>,

    rng: Box<dyn RandomSource>,
}

impl GameState {
    /// Fresh session in `Menu` at level 1.
    pub fn new(config: &GameConfig, mut rng: Box<dyn RandomSource>) -> Self {
        let grid = config.grid;
        let level = config.levels.config_for(1);

        let head = grid.random_position(rng.as_mut());
        let direction = Direction::random(rng.as_mut());
        let apples = (0..config.gameplay.apple_count)
            .map(|_| grid.random_position(rng.as_mut()))
            .collect();
        let heart = Heart::hidden_at(grid.random_position(rng.as_mut()));

        GameState {
            grid,
            phase: Phase::Menu,
            snake: Snake::new(head, direction),
            apples,
            heart,
            obstacles: level.obstacles.clone(),
            score: 0,
            lives: config.gameplay.starting_lives,
            level: 1,
            speed_ms: level.speed_ms,
            tick: 0,
            pending: None,
            rng,
        }
    }

    /// A random on-board cell from the session's random source.
    pub fn random_position(&mut self) -> Position {
        self.grid.random_position(self.rng.as_mut())
    }
}
