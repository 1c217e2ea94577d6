/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound; the entry loop
/// also watches `LevelUp` to reschedule the logic tick.

use crate::domain::entity::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Eat,
    LifeGained,
    LevelUp { level: u32, speed_ms: u64 },
    Turned(Direction),
    HeartShown,
}
