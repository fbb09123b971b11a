use crate::config::{load_settings, project_paths, save_settings_atomic, Args, Paths, Settings};
use crate::input::{collect_input_nonblocking, is_quit};
use crate::logging;
use crate::render::{draw_scene, Hud, PetView, Terminal};
use crate::rng::make_rng;
use crate::runtime::PetRuntime;
use crate::sprite::{search_roots, SpriteSet};
use anyhow::Context;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};
use tracing::info;

pub struct App {
    settings: Settings,
    paths: Paths,
    save_settings: bool,
    sprites: SpriteSet,
    runtime: PetRuntime<StdRng, PetView>,
    term: Terminal,
    started: Instant,
    should_quit: bool,
}

impl App {
    fn init(args: Args) -> anyhow::Result<Self> {
        let paths = project_paths()?;
        let log_path = args.log_file.clone().unwrap_or_else(|| paths.log_path.clone());
        logging::init(&log_path)?;

        let mut settings = load_settings(&paths.settings_path);
        settings.apply_args(&args);
        info!(character = %settings.character, seed = ?settings.seed, "desk-pet starting");

        // Reject bad geometry before touching the terminal.
        let runtime = PetRuntime::new(
            settings.wander,
            make_rng(settings.seed),
            PetView::default(),
        )
        .context("invalid pet configuration")?;

        let roots = search_roots(settings.assets_dir.as_deref(), &paths.characters_dir);
        let sprites = SpriteSet::load(&roots, &settings.character);

        let term = Terminal::begin()?;

        Ok(Self {
            settings,
            paths,
            save_settings: args.save_settings,
            sprites,
            runtime,
            term,
            started: Instant::now(),
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_secs_f64(1.0 / self.settings.fps() as f64);

        self.started = Instant::now();
        self.runtime.start();

        while !self.should_quit {
            self.term.resize_if_needed()?;

            for ev in collect_input_nonblocking(frame_dt)? {
                if is_quit(&ev) {
                    self.should_quit = true;
                }
            }

            self.runtime.advance_to(self.started.elapsed());
            self.render_frame()?;

            spin_sleep(frame_dt, Instant::now());
        }

        self.runtime.shutdown();
        self.term.end()?;
        info!(
            transitions = self.runtime.controller().transitions(),
            "desk-pet exiting"
        );

        if self.save_settings {
            save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        }
        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        self.term.cur.clear();
        let hud = Hud {
            character: &self.settings.character,
            state: self.runtime.controller().state(),
            remaining: self.runtime.phase_remaining(),
        };
        draw_scene(
            &mut self.term.cur,
            self.runtime.sink(),
            &self.sprites,
            &self.settings.wander,
            Some(&hud),
        );
        self.term.present()
    }
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let mut app = App::init(args)?;
    app.run()
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
