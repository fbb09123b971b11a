//! Text frames for the terminal host.
//!
//! A character is a folder holding `sit.txt` and `walk.txt`. The walking
//! frame faces right; the left-facing one is mirrored from it. Missing
//! frames fall back to labelled placeholder boxes.

use crate::sink::SpriteKind;
use crossterm::style::Color;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

pub const SIT_FILE: &str = "sit.txt";
pub const WALK_FILE: &str = "walk.txt";

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    lines: Vec<String>,
    width: usize,
    pub color: Color,
}

impl Frame {
    /// Trailing blank lines are dropped; `None` when nothing is left.
    pub fn from_text(text: &str, color: Color) -> Option<Self> {
        let mut lines: Vec<String> = text
            .lines()
            .map(|l| l.trim_end().replace('\t', "    "))
            .collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        while lines.first().is_some_and(|l| l.is_empty()) {
            lines.remove(0);
        }
        if lines.is_empty() {
            return None;
        }
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Some(Self {
            lines,
            width,
            color,
        })
    }

    pub fn placeholder(label: &str, color: Color) -> Self {
        let inner = label.chars().count() + 2;
        let lines = vec![
            format!("┌{}┐", "─".repeat(inner)),
            format!("│ {} │", label),
            format!("└{}┘", "─".repeat(inner)),
        ];
        Self {
            lines,
            width: inner + 2,
            color,
        }
    }

    /// Left-right mirror image, swapping glyphs that have a direction.
    pub fn mirrored(&self) -> Self {
        let lines = self
            .lines
            .iter()
            .map(|l| {
                let pad = self.width - l.chars().count();
                let mut padded: Vec<char> = l.chars().collect();
                padded.extend(std::iter::repeat(' ').take(pad));
                padded
                    .into_iter()
                    .rev()
                    .map(mirror_char)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect();
        Self {
            lines,
            width: self.width,
            color: self.color,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

fn mirror_char(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        '/' => '\\',
        '\\' => '/',
        'b' => 'd',
        'd' => 'b',
        'p' => 'q',
        'q' => 'p',
        '«' => '»',
        '»' => '«',
        '←' => '→',
        '→' => '←',
        '┌' => '┐',
        '┐' => '┌',
        '└' => '┘',
        '┘' => '└',
        '╭' => '╮',
        '╮' => '╭',
        '╰' => '╯',
        '╯' => '╰',
        '├' => '┤',
        '┤' => '├',
        '▌' => '▐',
        '▐' => '▌',
        other => other,
    }
}

#[derive(Clone, Debug)]
pub struct SpriteSet {
    pub sitting: Frame,
    pub walking_right: Frame,
    pub walking_left: Frame,
}

impl SpriteSet {
    pub fn placeholders() -> Self {
        Self {
            sitting: Frame::placeholder("SIT", Color::Green),
            walking_right: Frame::placeholder("WALK", Color::Blue),
            walking_left: Frame::placeholder("WALK<", Color::Red),
        }
    }

    /// Load `name` from the first search root that has each file.
    pub fn load(roots: &[PathBuf], name: &str) -> Self {
        let mut set = Self::placeholders();

        match read_frame(roots, name, SIT_FILE) {
            Some(f) => set.sitting = f,
            None => debug!(character = name, "using placeholder for sitting"),
        }
        match read_frame(roots, name, WALK_FILE) {
            Some(f) => {
                set.walking_left = f.mirrored();
                set.walking_right = f;
            }
            None => debug!(character = name, "using placeholders for walking"),
        }
        set
    }

    pub fn frame(&self, kind: SpriteKind) -> &Frame {
        match kind {
            SpriteKind::Sitting => &self.sitting,
            SpriteKind::WalkingRight => &self.walking_right,
            SpriteKind::WalkingLeft => &self.walking_left,
        }
    }

    pub fn height(&self) -> usize {
        self.sitting
            .height()
            .max(self.walking_right.height())
            .max(self.walking_left.height())
    }
}

/// Where character folders are looked up, most specific first.
pub fn search_roots(explicit: Option<&Path>, data_dir: &Path) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(dir) = explicit {
        roots.push(dir.to_path_buf());
    }
    roots.push(PathBuf::from("assets"));
    roots.push(data_dir.to_path_buf());
    roots
}

fn read_frame(roots: &[PathBuf], name: &str, file: &str) -> Option<Frame> {
    for root in roots {
        let path = root.join(name).join(file);
        if !path.is_file() {
            debug!(path = %path.display(), "frame not found");
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(text) => match Frame::from_text(&text, Color::White) {
                Some(frame) => {
                    debug!(path = %path.display(), "loaded frame");
                    return Some(frame);
                }
                None => warn!(path = %path.display(), "frame file is blank"),
            },
            Err(err) => warn!(path = %path.display(), %err, "could not read frame"),
        }
    }
    None
}
