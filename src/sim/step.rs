/// The step function: advances the world by one logic tick.
///
/// Processing order:
///   1. Wrap the head back onto the board
///   2. Apple consumption (score, heart trigger, level-up, growth)
///   3. Heart consumption
///   4. Turn (buffered heading) and head move
///   5. Body follows
///
/// Wrap runs first so a head that left the board last tick eats on the
/// cell it re-entered. Growth is applied before the move, so the new
/// segment lands on the old head cell.

use crate::domain::entity::Direction;
use crate::domain::rules;
use super::event::GameEvent;
use super::level::LevelTable;
use super::world::{GameState, Phase};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut GameState, levels: &LevelTable) -> Vec<GameEvent> {
    if world.phase != Phase::Running { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    resolve_wrap(world);
    resolve_apples(world, levels, &mut events);
    resolve_heart(world, &mut events);
    resolve_turn(world, &mut events);
    resolve_movement(world);

    events
}

/// Record a proposed heading. The latest proposal before a step wins.
/// In `Menu` the first proposal also starts the game.
pub fn propose(world: &mut GameState, dir: Direction) {
    start(world);
    world.pending = Some(dir);
}

/// `Menu → Running`. Returns true on the transition, false if already running.
pub fn start(world: &mut GameState) -> bool {
    if world.phase == Phase::Menu {
        world.phase = Phase::Running;
        true
    } else {
        false
    }
}

/// Key-press-moves mode: a press that would turn the snake runs one
/// extra step immediately. Repeats of the heading and rejected reversals
/// do nothing beyond starting the game from `Menu`.
pub fn press(world: &mut GameState, dir: Direction, levels: &LevelTable) -> Vec<GameEvent> {
    start(world);
    if !rules::accept_turn(world.snake.direction, dir, world.snake.has_moved) {
        return vec![];
    }
    world.pending = Some(dir);
    step(world, levels)
}

// ══════════════════════════════════════════════════════════════
// Stages
// ══════════════════════════════════════════════════════════════

fn resolve_wrap(world: &mut GameState) {
    let head = world.grid.wrap(world.snake.head());
    world.snake.set_head(head);
}

fn resolve_apples(world: &mut GameState, levels: &LevelTable, events: &mut Vec<GameEvent>) {
    // Every apple is checked; two apples on the head cell both count.
    for i in 0..world.apples.len() {
        if world.apples[i] != world.snake.head() { continue; }

        world.score += 1;
        if rules::heart_due(world.score) && world.heart.show() {
            events.push(GameEvent::HeartShown);
        }
        if rules::level_up_due(world.score) {
            level_up(world, levels, events);
        }
        events.push(GameEvent::Eat);

        world.apples[i] = world.random_position();
        world.snake.grow();
    }
}

fn resolve_heart(world: &mut GameState, events: &mut Vec<GameEvent>) {
    if !world.heart.visible || world.heart.position != world.snake.head() { return; }

    world.lives += 1;
    world.heart.visible = false;
    events.push(GameEvent::LifeGained);
    world.heart.position = world.random_position();
}

fn resolve_turn(world: &mut GameState, events: &mut Vec<GameEvent>) {
    let proposed = match world.pending.take() { Some(d) => d, None => return };
    let snake = &mut world.snake;
    if rules::accept_turn(snake.direction, proposed, snake.has_moved) {
        snake.direction = proposed;
        log::debug!("turn {:?}", proposed);
        events.push(GameEvent::Turned(proposed));
    }
}

fn resolve_movement(world: &mut GameState) {
    world.snake.advance(world.grid.cell_size);
}

// ══════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════

fn level_up(world: &mut GameState, levels: &LevelTable, events: &mut Vec<GameEvent>) {
    world.level += 1;
    let cfg = levels.config_for(world.level);
    world.speed_ms = cfg.speed_ms;
    world.obstacles = cfg.obstacles.clone();
    log::info!("Level {} ({} ms/tick) at tick {}", world.level, world.speed_ms, world.tick);
    events.push(GameEvent::LevelUp { level: world.level, speed_ms: world.speed_ms });
}
