/// Board geometry: pixel positions quantized to cells, toroidal edges.
///
/// All positions are in pixels and are multiples of `cell_size`.
/// The head may sit one cell outside the board between ticks;
/// `wrap()` brings it back at the start of the next tick.

use super::entity::Direction;
use super::rng::RandomSource;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// One axis-aligned cell move.
    pub fn step(self, dir: Direction, cell_size: i32) -> Self {
        let (dx, dy) = dir.delta();
        Position {
            x: self.x + dx * cell_size,
            y: self.y + dy * cell_size,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Grid {
    pub board_size: i32,
    pub cell_size: i32,
}

impl Grid {
    pub fn new(board_size: i32, cell_size: i32) -> Self {
        Grid { board_size, cell_size }
    }

    /// Number of cells along one side of the (square) board.
    pub fn cells_per_side(&self) -> i32 {
        self.board_size / self.cell_size
    }

    /// Teleport a position that left the board to the opposite edge.
    ///
    /// Axes are tested in the fixed order x<0, x>=size, y<0, y>=size and
    /// only the first match is corrected.
    pub fn wrap(&self, p: Position) -> Position {
        let mut out = p;
        if p.x < 0 {
            out.x = self.board_size - self.cell_size;
        } else if p.x >= self.board_size {
            out.x = 0;
        } else if p.y < 0 {
            out.y = self.board_size - self.cell_size;
        } else if p.y >= self.board_size {
            out.y = 0;
        }
        out
    }

    pub fn contains(&self, p: Position) -> bool {
        (0..self.board_size).contains(&p.x) && (0..self.board_size).contains(&p.y)
    }

    pub fn is_aligned(&self, p: Position) -> bool {
        p.x % self.cell_size == 0 && p.y % self.cell_size == 0
    }

    /// Uniformly random cell on the board. X is drawn before Y.
    pub fn random_position(&self, rng: &mut dyn RandomSource) -> Position {
        let cells = self.cells_per_side() as u32;
        let x = rng.below(cells) as i32 * self.cell_size;
        let y = rng.below(cells) as i32 * self.cell_size;
        Position { x, y }
    }

    /// Cell coordinates (column, row) of an on-board position.
    pub fn cell_of(&self, p: Position) -> (usize, usize) {
        ((p.x / self.cell_size) as usize, (p.y / self.cell_size) as usize)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid { board_size: 400, cell_size: 20 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const G: Grid = Grid { board_size: 400, cell_size: 20 };

    #[test]
    fn wrap_left_edge() {
        let p = Position::new(0, 0).step(Direction::Left, 20);
        assert_eq!(p, Position::new(-20, 0));
        assert_eq!(G.wrap(p), Position::new(380, 0));
    }

    #[test]
    fn wrap_right_bottom_top() {
        assert_eq!(G.wrap(Position::new(400, 60)), Position::new(0, 60));
        assert_eq!(G.wrap(Position::new(60, 400)), Position::new(60, 0));
        assert_eq!(G.wrap(Position::new(60, -20)), Position::new(60, 380));
    }

    #[test]
    fn wrap_leaves_inside_untouched() {
        let p = Position::new(120, 340);
        assert_eq!(G.wrap(p), p);
    }

    #[test]
    fn wrap_corrects_only_first_axis() {
        // Both axes overflow: only x is fixed in this pass.
        assert_eq!(G.wrap(Position::new(-20, -20)), Position::new(380, -20));
        assert_eq!(G.wrap(Position::new(400, 400)), Position::new(0, 400));
        // A second pass finishes the job.
        assert_eq!(G.wrap(G.wrap(Position::new(400, 400))), Position::new(0, 0));
    }

    #[test]
    fn random_position_is_on_board_and_aligned() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let p = G.random_position(&mut rng);
            assert!(G.contains(p));
            assert!(G.is_aligned(p));
        }
    }

    #[test]
    fn cell_of_maps_pixels_to_cells() {
        assert_eq!(G.cell_of(Position::new(0, 0)), (0, 0));
        assert_eq!(G.cell_of(Position::new(380, 40)), (19, 2));
    }

    proptest! {
        #[test]
        fn wrap_lands_on_board_for_single_axis_overflow(
            over in 1i32..50,
            on_cell in 0i32..20,
            axis in 0u8..4,
        ) {
            let on = on_cell * 20;
            let p = match axis {
                0 => Position::new(-over * 20, on),
                1 => Position::new(400 + (over - 1) * 20, on),
                2 => Position::new(on, -over * 20),
                _ => Position::new(on, 400 + (over - 1) * 20),
            };
            let w = G.wrap(p);
            prop_assert!(G.contains(w));
            prop_assert!(G.is_aligned(w));
            match axis {
                0 | 1 => prop_assert_eq!(w.y, p.y),
                _ => prop_assert_eq!(w.x, p.x),
            }
        }
    }
}
