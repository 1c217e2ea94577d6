/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::entity::Direction;
use domain::rng;
use sim::event::GameEvent;
use sim::scheduler::Scheduler;
use sim::step;
use sim::world::{GameState, Phase};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    env_logger::init();

    let config = match GameConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let seed = config.gameplay.seed.unwrap_or_else(rand::random);
    log::info!("session seed {seed}, base speed {} ms", config.speed.base_speed_ms);
    let mut world = GameState::new(&config, Box::new(rng::seeded(seed)));

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Orchard Snake!");
    println!("Final Score: {}  Level: {}", world.score, world.level);
}

fn game_loop(
    world: &mut GameState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let epoch = Instant::now();
    let now_ms = || epoch.elapsed().as_millis() as u64;
    let mut scheduler = Scheduler::new(config.speed.render_tick_ms, now_ms());

    renderer.render(world)?;

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.cancel_pressed() {
            break;
        }

        let intents = collect_intents(&kb, &gp);

        if world.phase == Phase::Menu {
            let any_key = !kb.pressed().is_empty() || gp.confirm_pressed();
            if (any_key || !intents.is_empty()) && step::start(world) {
                scheduler.start_logic(world.speed_ms, now_ms());
                log::info!(
                    "game started, logic timer {:?} every {:?} ms",
                    scheduler.logic_handle(),
                    scheduler.logic_period_ms(),
                );
            }
        }

        for dir in intents {
            if config.gameplay.move_on_keypress {
                let events = step::press(world, dir, &config.levels);
                process_events(&events, &mut scheduler, sound, now_ms());
            } else {
                step::propose(world, dir);
            }
        }

        let due = scheduler.poll(now_ms());
        if due.logic {
            let events = step::step(world, &config.levels);
            process_events(&events, &mut scheduler, sound, now_ms());
        }
        if due.render {
            renderer.render(world)?;
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Reschedule on level-up and play the matching sound effects.
fn process_events(
    events: &[GameEvent],
    scheduler: &mut Scheduler,
    sound: Option<&SoundEngine>,
    now_ms: u64,
) {
    for event in events {
        if let GameEvent::LevelUp { level, speed_ms } = *event {
            let handle = scheduler.restart_logic(speed_ms, now_ms);
            log::debug!("level {level} now driven by {handle:?}");
        }
        let Some(sfx) = sound else { continue };
        match *event {
            GameEvent::Eat => sfx.play_eat(),
            GameEvent::LifeGained => sfx.play_life(),
            GameEvent::LevelUp { .. } => sfx.play_level_up(),
            GameEvent::Turned(dir) => sfx.play_turn(dir),
            GameEvent::HeartShown => {}
        }
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

fn key_direction(code: KeyCode) -> Option<Direction> {
    if KEYS_LEFT.contains(&code) {
        Some(Direction::Left)
    } else if KEYS_RIGHT.contains(&code) {
        Some(Direction::Right)
    } else if KEYS_UP.contains(&code) {
        Some(Direction::Up)
    } else if KEYS_DOWN.contains(&code) {
        Some(Direction::Down)
    } else {
        None
    }
}

/// Direction presses this frame, keyboard first, each source oldest first.
fn collect_intents(kb: &InputState, gp: &GamepadState) -> Vec<Direction> {
    kb.pressed()
        .iter()
        .filter_map(|&code| key_direction(code))
        .chain(gp.steer().iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(key_direction(KeyCode::Left), Some(Direction::Left));
        assert_eq!(key_direction(KeyCode::Char('d')), Some(Direction::Right));
        assert_eq!(key_direction(KeyCode::Char('W')), Some(Direction::Up));
        assert_eq!(key_direction(KeyCode::Down), Some(Direction::Down));
        assert_eq!(key_direction(KeyCode::Enter), None);
        assert_eq!(key_direction(KeyCode::Char('q')), None);
    }

    #[test]
    fn level_up_reschedules_logic_timer() {
        let mut sched = Scheduler::new(20, 0);
        let first = sched.start_logic(100, 0);
        assert!(sched.poll(100).logic);

        process_events(&[GameEvent::Eat, GameEvent::LevelUp { level: 2, speed_ms: 80 }], &mut sched, None, 150);

        assert_ne!(sched.logic_handle(), Some(first));
        assert_eq!(sched.logic_period_ms(), Some(80));
        // 200 was the old timer's next tick.
        assert!(!sched.poll(200).logic);
        assert!(sched.poll(230).logic);
    }

    #[test]
    fn other_events_leave_timer_alone() {
        let mut sched = Scheduler::new(20, 0);
        let handle = sched.start_logic(100, 0);
        process_events(&[GameEvent::Eat, GameEvent::Turned(Direction::Up)], &mut sched, None, 50);
        assert_eq!(sched.logic_handle(), Some(handle));
        assert!(sched.poll(100).logic);
    }
}
