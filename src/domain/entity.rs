/// Entities: Snake (head + body), Heart, and the Direction they move in.
/// Apples, obstacles and the lives counter are plain data on `GameState`.

use std::collections::VecDeque;

use super::grid::Position;
use super::rng::RandomSource;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Unit step in cell units. Screen coordinates: y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub fn random(rng: &mut dyn RandomSource) -> Direction {
        Direction::ALL[rng.below(4) as usize]
    }
}

/// The player's snake.
///
/// `segments[0]` is the head. Growth pushes a copy of the head onto the
/// tail; `advance()` pushes the new head and pops the oldest tail entry,
/// so the deque length only changes through `grow()`.
#[derive(Clone, Debug)]
pub struct Snake {
    segments: VecDeque<Position>,
    pub direction: Direction,
    /// False until the head has moved once. Reversal is allowed before that.
    pub has_moved: bool,
}

impl Snake {
    pub fn new(head: Position, direction: Direction) -> Self {
        let mut segments = VecDeque::with_capacity(16);
        segments.push_back(head);
        Snake { segments, direction, has_moved: false }
    }

    #[inline]
    pub fn head(&self) -> Position {
        self.segments[0]
    }

    pub fn set_head(&mut self, p: Position) {
        self.segments[0] = p;
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments.iter().copied()
    }

    /// Append a tail segment at the current head position.
    pub fn grow(&mut self) {
        let head = self.head();
        self.segments.push_back(head);
    }

    /// Move the head one cell along `direction`; the body follows the leader.
    pub fn advance(&mut self, cell_size: i32) {
        let next = self.head().step(self.direction, cell_size);
        self.segments.push_front(next);
        self.segments.pop_back();
        self.has_moved = true;
    }
}

/// Bonus life pickup. Appears on prime scores, at most one at a time.
#[derive(Clone, Copy, Debug)]
pub struct Heart {
    pub position: Position,
    pub visible: bool,
}

impl Heart {
    pub fn hidden_at(position: Position) -> Self {
        Heart { position, visible: false }
    }

    /// Returns true if the heart was hidden and is now shown.
    pub fn show(&mut self) -> bool {
        let was_hidden = !self.visible;
        self.visible = true;
        was_hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for d in Direction::ALL {
            assert_ne!(d, d.opposite());
            assert_eq!(d, d.opposite().opposite());
        }
    }

    #[test]
    fn advance_follows_the_leader() {
        let mut s = Snake::new(Position::new(100, 100), Direction::Right);
        s.grow();
        s.advance(20);
        s.grow();
        s.advance(20);
        let segs: Vec<_> = s.segments().collect();
        assert_eq!(segs, vec![
            Position::new(140, 100),
            Position::new(120, 100),
            Position::new(100, 100),
        ]);
    }

    #[test]
    fn grow_then_advance_keeps_new_length() {
        let mut s = Snake::new(Position::new(0, 0), Direction::Down);
        assert!(!s.has_moved);
        s.grow();
        assert_eq!(s.len(), 2);
        s.advance(20);
        assert_eq!(s.len(), 2);
        assert!(s.has_moved);
        assert_eq!(s.head(), Position::new(0, 20));
    }

    #[test]
    fn heart_show_reports_transition() {
        let mut h = Heart::hidden_at(Position::new(40, 40));
        assert!(h.show());
        assert!(!h.show());
        assert!(h.visible);
    }
}
