use crate::config::WanderConfig;
use crate::model::PetState;
use crate::sink::{RenderSink, SpriteKind};
use crate::sprite::SpriteSet;
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Reset,
        }
    }
}

pub struct CellBuffer {
    pub w: u16,
    pub h: u16,
    pub cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }

    pub fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }

    pub fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }

    pub fn clear(&mut self) {
        for c in &mut self.cells {
            *c = Cell::default();
        }
    }
}

/// Latest commands from the controller, read back when drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PetView {
    pub sprite: SpriteKind,
    pub x: f64,
}

impl Default for PetView {
    fn default() -> Self {
        Self {
            sprite: SpriteKind::Sitting,
            x: 0.0,
        }
    }
}

impl RenderSink for PetView {
    fn set_sprite(&mut self, sprite: SpriteKind) {
        self.sprite = sprite;
    }

    fn set_position(&mut self, x: f64) {
        self.x = x;
    }
}

/// Status line shown above the strip.
pub struct Hud<'a> {
    pub character: &'a str,
    pub state: PetState,
    pub remaining: Option<Duration>,
}

pub struct Terminal {
    out: io::Stdout,
    pub cols: u16,
    pub rows: u16,
    prev: CellBuffer,
    pub cur: CellBuffer,
    active: bool,
}

impl Terminal {
    pub fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            active: true,
        })
    }

    pub fn end(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Write cells that changed since the last present.
    pub fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }
                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.end();
    }
}

pub fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(
            xx,
            y,
            Cell {
                ch,
                fg,
                bg: Color::Reset,
            },
        );
    }
}

/// Column of a strip position when the strip spans `cols` columns.
pub fn to_column(x: f64, cfg: &WanderConfig, cols: u16) -> i32 {
    if cfg.strip_width <= 0.0 {
        return 0;
    }
    (x / cfg.strip_width * cols as f64).round() as i32
}

/// Pet on the bottom rows, ground line under it, status above.
pub fn draw_scene(
    buf: &mut CellBuffer,
    view: &PetView,
    sprites: &SpriteSet,
    cfg: &WanderConfig,
    hud: Option<&Hud>,
) {
    if buf.h == 0 || buf.w == 0 {
        return;
    }
    let ground = buf.h - 1;
    for x in 0..buf.w {
        buf.set(
            x,
            ground,
            Cell {
                ch: '▔',
                fg: Color::DarkGrey,
                bg: Color::Reset,
            },
        );
    }

    let frame = sprites.frame(view.sprite);
    let x0 = to_column(view.x, cfg, buf.w);
    let top = ground as i32 - frame.height() as i32;
    for (row, line) in frame.lines().iter().enumerate() {
        let y = top + row as i32;
        if y < 0 || y >= ground as i32 {
            continue;
        }
        for (col, ch) in line.chars().enumerate() {
            let x = x0 + col as i32;
            if ch == ' ' || x < 0 || x >= buf.w as i32 {
                continue;
            }
            buf.set(
                x as u16,
                y as u16,
                Cell {
                    ch,
                    fg: frame.color,
                    bg: Color::Reset,
                },
            );
        }
    }

    if let Some(hud) = hud {
        // anchored to the tallest frame so it holds still across sprite swaps
        let y = ground as i32 - sprites.height() as i32 - 2;
        if y >= 0 {
            let state = match hud.state {
                PetState::Walking => "walking",
                PetState::Sitting => "sitting",
            };
            let text = match hud.remaining {
                Some(left) => format!(
                    "{} is {state} ({:.1}s)  q quits",
                    hud.character,
                    left.as_secs_f64()
                ),
                None => format!("{} is {state}  q quits", hud.character),
            };
            draw_text(buf, 1, y as u16, &text, Color::DarkGrey);
        }
    }
}
