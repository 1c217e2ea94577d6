/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing or unparsable; values
/// that parse but make no sense (zero cell size, off-board obstacles)
/// are rejected with a `ConfigError`.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::grid::{Grid, Position};
use crate::sim::level::{LevelConfig, LevelTable};

// ── Errors ──

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board size {board_size} must be a positive multiple of cell size {cell_size}")]
    InvalidGrid { board_size: i32, cell_size: i32 },
    #[error("level table must contain at least one level")]
    EmptyLevelTable,
    #[error("level {level} has a zero tick interval")]
    ZeroSpeed { level: u32 },
    #[error("level {level} obstacle ({x}, {y}) lies outside the board")]
    ObstacleOutOfBounds { level: u32, x: i32, y: i32 },
    #[error("level {level} obstacle ({x}, {y}) is not aligned to the cell grid")]
    ObstacleMisaligned { level: u32, x: i32, y: i32 },
    #[error("render tick must be at least 1 ms")]
    ZeroRenderTick,
    #[error("apple count must be at least 1")]
    NoApples,
    #[error("config.toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub grid: Grid,
    pub speed: SpeedConfig,
    pub gameplay: GameplayConfig,
    pub gamepad: GamepadConfig,
    pub levels: LevelTable,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    /// Logic tick interval at level 1.
    pub base_speed_ms: u64,
    pub render_tick_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GameplayConfig {
    pub starting_lives: u32,
    pub apple_count: usize,
    /// Legacy behavior: a direction key also steps the game immediately.
    pub move_on_keypress: bool,
    /// Fixed RNG seed; `None` draws a fresh one per session.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gameplay: TomlGameplay,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    levels: Vec<TomlLevel>,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_board_size")]
    board_size: i32,
    #[serde(default = "default_cell_size")]
    cell_size: i32,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    /// Only drives the standard table; `None` means not set in the file.
    #[serde(default)]
    base_speed_ms: Option<u64>,
    #[serde(default = "default_render_tick")]
    render_tick_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGameplay {
    #[serde(default = "default_lives")]
    starting_lives: u32,
    #[serde(default = "default_apples")]
    apple_count: usize,
    #[serde(default)]
    move_on_keypress: bool,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

/// One `[[levels]]` entry. Obstacles are `[x, y]` pixel pairs.
#[derive(Deserialize, Debug)]
struct TomlLevel {
    speed_ms: u64,
    #[serde(default)]
    obstacles: Vec<[i32; 2]>,
}

// ── Defaults ──

fn default_board_size() -> i32 { 400 }
fn default_cell_size() -> i32 { 20 }
fn default_base_speed() -> u64 { 100 }
fn default_render_tick() -> u64 { 20 }
fn default_lives() -> u32 { 3 }
fn default_apples() -> usize { 2 }

fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            board_size: default_board_size(),
            cell_size: default_cell_size(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            base_speed_ms: None,
            render_tick_ms: default_render_tick(),
        }
    }
}

impl Default for TomlGameplay {
    fn default() -> Self {
        TomlGameplay {
            starting_lives: default_lives(),
            apple_count: default_apples(),
            move_on_keypress: false,
            seed: None,
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys fall back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let toml_cfg = load_toml(&candidate_dirs());
        Self::from_toml(toml_cfg)
    }

    /// Parse and validate a config document. Unlike `load()`, syntax
    /// errors are reported instead of replaced by defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Self::from_toml(toml_cfg)
    }

    fn from_toml(cfg: TomlConfig) -> Result<Self, ConfigError> {
        let TomlBoard { board_size, cell_size } = cfg.board;
        if cell_size <= 0 || board_size <= 0 || board_size % cell_size != 0 {
            return Err(ConfigError::InvalidGrid { board_size, cell_size });
        }
        let grid = Grid::new(board_size, cell_size);

        if cfg.speed.render_tick_ms == 0 {
            return Err(ConfigError::ZeroRenderTick);
        }
        if cfg.gameplay.apple_count == 0 {
            return Err(ConfigError::NoApples);
        }

        let levels = if cfg.levels.is_empty() {
            let base = cfg.speed.base_speed_ms.unwrap_or_else(default_base_speed);
            LevelTable::standard(&grid, base)?
        } else {
            let entries = cfg.levels.into_iter()
                .map(|l| LevelConfig {
                    speed_ms: l.speed_ms,
                    obstacles: l.obstacles.iter().map(|&[x, y]| Position::new(x, y)).collect(),
                })
                .collect();
            let table = LevelTable::new(entries, &grid)?;
            if let Some(base) = ignored_base_speed(cfg.speed.base_speed_ms, &table) {
                log::warn!(
                    "[speed] base_speed_ms = {base} ignored: [[levels]] sets level 1 to {} ms",
                    table.config_for(1).speed_ms,
                );
            }
            table
        };
        log::debug!("{} levels on a {}px board", levels.len(), board_size);

        Ok(GameConfig {
            grid,
            speed: SpeedConfig {
                base_speed_ms: levels.config_for(1).speed_ms,
                render_tick_ms: cfg.speed.render_tick_ms,
            },
            gameplay: GameplayConfig {
                starting_lives: cfg.gameplay.starting_lives,
                apple_count: cfg.gameplay.apple_count,
                move_on_keypress: cfg.gameplay.move_on_keypress,
                seed: cfg.gameplay.seed,
            },
            gamepad: GamepadConfig {
                confirm: cfg.gamepad.confirm,
                cancel: cfg.gamepad.cancel,
            },
            levels,
        })
    }
}

/// A configured base speed that a custom level table overrides.
fn ignored_base_speed(configured: Option<u64>, table: &LevelTable) -> Option<u64> {
    configured.filter(|&base| base != table.config_for(1).speed_ms)
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        log::info!("Loaded {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        log::warn!("config.toml parse error: {e}");
                        log::warn!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    log::warn!("Could not read {}: {e}", path.display());
                }
            }
        }
    }
    log::info!("No config.toml found, using defaults");
    TomlConfig::default()
}
