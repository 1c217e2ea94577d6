/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Compose the next frame into the `front` buffer
///   2. Compare each cell with the `back` buffer (previous frame)
///   3. Emit terminal commands only for cells that changed, batched with `queue!`
///   4. Swap front/back
///
/// One board cell is `CELL_W` terminal columns wide so the board looks
/// square in a typical terminal font.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::{Grid, Position};
use crate::sim::world::{GameState, Phase};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every empty cell. Using the same RGB for
    /// `Clear` and cells keeps inter-row gaps from showing on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never produced by composition, so it forces a repaint of every cell.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = if bg == Color::Reset { Self::BASE_BG } else { bg };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let len = s.chars().count();
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, Color::Reset);
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

// ── Layout ──

const CELL_W: usize = 2;
const HUD_ROW: usize = 0;
/// Top border of the board.
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const BOARD_BG: Color = Color::Rgb { r: 16, g: 40, b: 20 };
const BORDER_FG: Color = Color::Rgb { r: 90, g: 140, b: 90 };
const SNAKE_FG: Color = Color::Rgb { r: 230, g: 120, b: 20 };
const HEAD_FG: Color = Color::Rgb { r: 255, g: 170, b: 60 };
const APPLE_FG: Color = Color::Rgb { r: 220, g: 30, b: 30 };
const HEART_FG: Color = Color::Rgb { r: 255, g: 80, b: 160 };
const OBSTACLE_FG: Color = Color::Rgb { r: 120, g: 110, b: 100 };

/// Terminal size needed to show the whole board with HUD and border.
fn required_size(grid: &Grid) -> (usize, usize) {
    let n = grid.cells_per_side() as usize;
    (n * CELL_W + 2, MAP_ROW + n + 2)
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &GameState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let resized = tw as usize != self.term_w || th as usize != self.term_h;
        if resized {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
        }

        // Phase change or resize: clean slate.
        if resized || self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        compose_frame(&mut self.front, world);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        // Explicit base colors; ResetColor would fall back to the
        // terminal default and show seams.
        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

// ═══════════════════════════════════════════════════════════
// Composition
// ═══════════════════════════════════════════════════════════

fn compose_frame(buf: &mut FrameBuffer, w: &GameState) {
    let (need_w, need_h) = required_size(&w.grid);
    if buf.width < need_w || buf.height < need_h {
        compose_too_small(buf, need_w, need_h);
        return;
    }
    match w.phase {
        Phase::Menu => compose_menu(buf, w),
        Phase::Running => compose_game(buf, w),
    }
}

fn compose_too_small(buf: &mut FrameBuffer, need_w: usize, need_h: usize) {
    let mid = buf.height / 2;
    buf.put_centered(mid.saturating_sub(1), "Terminal too small", Color::Yellow);
    let need = format!("need {}x{}, have {}x{}", need_w, need_h, buf.width, buf.height);
    buf.put_centered(mid, &need, Color::DarkGrey);
}

fn compose_menu(buf: &mut FrameBuffer, w: &GameState) {
    compose_border(buf, &w.grid);
    let n = w.grid.cells_per_side() as usize;
    let mid = MAP_ROW + 1 + n / 2;
    let board_w = n * CELL_W + 2;

    let centered = |s: &str| board_w.saturating_sub(s.chars().count()) / 2;
    let title = "START GAME";
    buf.put_str(centered(title), mid - 1, title, HEAD_FG, Color::Reset);
    let prompt = "-- Press any key to continue --";
    buf.put_str(centered(prompt), mid + 1, prompt, Color::Grey, Color::Reset);
}

fn compose_game(buf: &mut FrameBuffer, w: &GameState) {
    // ── HUD row ──
    let hud = format!(
        " SCORE {:<5} SPEED {}ms  LEVEL {:<3} LIVES {}",
        w.score, w.speed_ms, w.level, w.lives,
    );
    buf.fill_row(HUD_ROW, HUD_BG);
    buf.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

    compose_border(buf, &w.grid);

    // Later draws win when entities share a cell.
    for &p in &w.obstacles {
        put_board(buf, &w.grid, p, ['▓', '▓'], OBSTACLE_FG);
    }
    for (i, p) in w.snake.segments().enumerate() {
        if i == 0 {
            // Between ticks the head may sit one cell off the board.
            put_board(buf, &w.grid, w.grid.wrap(p), ['█', '█'], HEAD_FG);
        } else {
            put_board(buf, &w.grid, p, ['█', '█'], SNAKE_FG);
        }
    }
    for &p in &w.apples {
        put_board(buf, &w.grid, p, ['(', ')'], APPLE_FG);
    }
    if w.heart.visible {
        put_board(buf, &w.grid, w.heart.position, ['<', '3'], HEART_FG);
    }

    let (_, need_h) = required_size(&w.grid);
    if need_h < buf.height {
        buf.put_str(0, need_h, " Arrows/WASD: steer   Esc/Q: quit", Color::DarkGrey, Color::Reset);
    }
}

/// Frame plus empty board background.
fn compose_border(buf: &mut FrameBuffer, grid: &Grid) {
    let n = grid.cells_per_side() as usize;
    let right = n * CELL_W + 1;
    let bottom = MAP_ROW + n + 1;

    for x in 1..right {
        buf.set(x, MAP_ROW, Cell::new('─', BORDER_FG, Color::Reset));
        buf.set(x, bottom, Cell::new('─', BORDER_FG, Color::Reset));
    }
    for y in MAP_ROW + 1..bottom {
        buf.set(0, y, Cell::new('│', BORDER_FG, Color::Reset));
        buf.set(right, y, Cell::new('│', BORDER_FG, Color::Reset));
        for x in 1..right {
            buf.set(x, y, Cell::new(' ', Color::White, BOARD_BG));
        }
    }
    buf.set(0, MAP_ROW, Cell::new('┌', BORDER_FG, Color::Reset));
    buf.set(right, MAP_ROW, Cell::new('┐', BORDER_FG, Color::Reset));
    buf.set(0, bottom, Cell::new('└', BORDER_FG, Color::Reset));
    buf.set(right, bottom, Cell::new('┘', BORDER_FG, Color::Reset));
}

fn put_board(buf: &mut FrameBuffer, grid: &Grid, p: Position, glyph: [char; 2], fg: Color) {
    if !grid.contains(p) {
        return;
    }
    let (col, row) = grid.cell_of(p);
    let x = 1 + col * CELL_W;
    let y = MAP_ROW + 1 + row;
    for (i, &ch) in glyph.iter().enumerate() {
        buf.set(x + i, y, Cell::new(ch, fg, BOARD_BG));
    }
}
