use crate::error::{ConfigError, Result as ConfigResult};
use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    ops::RangeInclusive,
    path::{Path, PathBuf},
    time::Duration,
};

/// Repeating tick rate of the wander controller.
pub const TICKS_PER_SECOND: f64 = 60.0;

/// Seconds a walking phase lasts.
pub const WALK_SECS: RangeInclusive<f64> = 5.0..=8.0;

/// Seconds a sitting phase lasts.
pub const SIT_SECS: RangeInclusive<f64> = 3.0..=10.0;

/// Distance (position units) under which the pet counts as "at" its target.
pub const ARRIVAL_DISTANCE: f64 = 2.0;

/// Speed (units per tick) under which the pet counts as settled.
pub const ARRIVAL_SPEED: f64 = 0.1;

pub fn tick_period() -> Duration {
    Duration::from_secs_f64(1.0 / TICKS_PER_SECOND)
}

/// Geometry and tuning of the wander engine.
///
/// All lengths share one unit (the host decides what a unit is on screen).
/// Random walk targets keep `margin_target` from the edges; the position
/// clamp only keeps `margin_position`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    pub strip_width: f64,
    pub sprite_width: f64,
    pub margin_target: f64,
    pub margin_position: f64,
    pub max_velocity: f64,
    pub spring_strength: f64,
    pub damping: f64,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            strip_width: 300.0,
            sprite_width: 100.0,
            margin_target: 20.0,
            margin_position: 10.0,
            max_velocity: 2.0,
            spring_strength: 0.08,
            damping: 0.85,
        }
    }
}

impl WanderConfig {
    /// Default tuning for a strip of the given size.
    pub fn new(strip_width: f64, sprite_width: f64) -> Self {
        Self {
            strip_width,
            sprite_width,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("strip_width", self.strip_width),
            ("sprite_width", self.sprite_width),
            ("margin_target", self.margin_target),
            ("margin_position", self.margin_position),
            ("max_velocity", self.max_velocity),
            ("spring_strength", self.spring_strength),
            ("damping", self.damping),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        for (field, value) in [
            ("strip_width", self.strip_width),
            ("sprite_width", self.sprite_width),
            ("max_velocity", self.max_velocity),
            ("spring_strength", self.spring_strength),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.sprite_width >= self.strip_width {
            return Err(ConfigError::SpriteTooWide {
                strip_width: self.strip_width,
                sprite_width: self.sprite_width,
            });
        }

        for (field, value) in [
            ("margin_target", self.margin_target),
            ("margin_position", self.margin_position),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeMargin { field, value });
            }
        }

        let needed = 2.0 * self.margin_target.max(self.margin_position);
        if self.walk_span() <= needed {
            return Err(ConfigError::StripTooNarrow {
                span: self.walk_span(),
                needed,
            });
        }

        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::DampingOutOfRange(self.damping));
        }

        Ok(())
    }

    /// Room left for the sprite's left edge to travel.
    pub fn walk_span(&self) -> f64 {
        self.strip_width - self.sprite_width
    }

    pub fn min_position(&self) -> f64 {
        self.margin_position
    }

    pub fn max_position(&self) -> f64 {
        self.walk_span() - self.margin_position
    }

    pub fn min_target(&self) -> f64 {
        self.margin_target
    }

    pub fn max_target(&self) -> f64 {
        self.walk_span() - self.margin_target
    }

    /// The side test used when an arrival flips the walk direction.
    pub fn midpoint(&self) -> f64 {
        self.strip_width / 2.0
    }
}

#[derive(Parser, Debug, Default)]
#[command(
    name = "desk-pet",
    version,
    about = "A small pet that wanders along the bottom of your terminal"
)]
pub struct Args {
    /// character folder to load frames from (sit.txt, walk.txt)
    pub character: Option<String>,

    /// directory holding character folders
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// fixed RNG seed for a reproducible wander
    #[arg(long)]
    pub seed: Option<u64>,

    /// redraw cap in frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// width of the walkable strip in position units
    #[arg(long)]
    pub strip_width: Option<f64>,

    /// width of the sprite in position units
    #[arg(long)]
    pub sprite_width: Option<f64>,

    /// write logs here instead of the data directory
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// persist the effective settings on exit
    #[arg(long, default_value_t = false)]
    pub save_settings: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub character: String,
    pub assets_dir: Option<PathBuf>,
    pub fps_cap: u32,
    pub seed: Option<u64>,
    pub wander: WanderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            character: "pet".to_string(),
            assets_dir: None,
            fps_cap: 60,
            seed: None,
            wander: WanderConfig::default(),
        }
    }
}

impl Settings {
    /// Command-line values win over the settings file.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(name) = &args.character {
            self.character = name.clone();
        }
        if let Some(dir) = &args.assets {
            self.assets_dir = Some(dir.clone());
        }
        if let Some(seed) = args.seed {
            self.seed = Some(seed);
        }
        if let Some(fps) = args.fps {
            self.fps_cap = fps;
        }
        if let Some(w) = args.strip_width {
            self.wander.strip_width = w;
        }
        if let Some(w) = args.sprite_width {
            self.wander.sprite_width = w;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps_cap.clamp(10, 240)
    }
}

pub struct Paths {
    pub settings_path: PathBuf,
    pub log_path: PathBuf,
    pub characters_dir: PathBuf,
}

pub fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "desk-pet", "DeskPet")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("desk-pet.log"),
        characters_dir: dir.join("characters"),
    })
}

pub fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        match serde_json::from_str::<Settings>(&s) {
            Ok(v) => return v,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring unreadable settings file")
            }
        }
    }
    Settings::default()
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // Rename over an existing file is not atomic on every platform.
    if to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}
