//! End-to-end behavior of the wander engine under virtual time.
//!
//! - motion stays inside the strip and under the speed limit
//! - sitting and walking strictly alternate with in-range phase lengths
//! - sprite commands track real direction changes only

use desk_pet::config::{tick_period, WanderConfig};
use desk_pet::model::PetState;
use desk_pet::motion;
use desk_pet::rng::make_rng;
use desk_pet::runtime::PetRuntime;
use desk_pet::sink::{sprites, SinkCommand, SpriteKind};
use proptest::prelude::*;
use rand::rngs::StdRng;
use std::time::Duration;

fn runtime(cfg: WanderConfig, seed: u64) -> PetRuntime<StdRng, Vec<SinkCommand>> {
    let mut rt = PetRuntime::new(cfg, make_rng(Some(seed)), Vec::new()).unwrap();
    rt.start();
    rt
}

fn positions(commands: &[SinkCommand]) -> Vec<f64> {
    commands
        .iter()
        .filter_map(|c| match c {
            SinkCommand::Position(x) => Some(*x),
            SinkCommand::Sprite(_) => None,
        })
        .collect()
}

// ============================================================================
// Motion bounds
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn motion_stays_in_band(
        seed in any::<u64>(),
        strip in 150.0f64..2_000.0,
        sprite_frac in 0.05f64..0.7,
    ) {
        let cfg = WanderConfig::new(strip, strip * sprite_frac);
        let mut rt = runtime(cfg, seed);

        for _ in 0..(60 * 20) {
            rt.advance_by(tick_period());
            let m = *rt.controller().motion();
            prop_assert!(m.velocity.abs() <= cfg.max_velocity);
            prop_assert!(m.target >= cfg.min_position() && m.target <= cfg.max_position());
        }

        // the first report is the starting position, before any step
        for x in positions(rt.sink()).into_iter().skip(1) {
            prop_assert!(x >= cfg.min_position() && x <= cfg.max_position(), "x = {}", x);
        }
    }

    #[test]
    fn integrator_respects_limits_for_any_input(
        position in -500.0f64..500.0,
        target in -500.0f64..500.0,
        velocity in -50.0f64..50.0,
    ) {
        let cfg = WanderConfig::default();
        let s = motion::step(position, target, velocity, &cfg);
        if !s.arrived {
            prop_assert!(s.velocity.abs() <= cfg.max_velocity);
            prop_assert!(s.position >= cfg.min_position() && s.position <= cfg.max_position());
        }
    }

    #[test]
    fn arrival_always_heads_for_the_other_half(position in 10.0f64..190.0) {
        let cfg = WanderConfig::default();
        let target = motion::arrival_target(position, &cfg);
        if position < cfg.midpoint() {
            prop_assert!(target > cfg.midpoint());
        } else {
            prop_assert!(target < cfg.midpoint());
        }
    }
}

// ============================================================================
// State alternation and phase lengths
// ============================================================================

#[test]
fn states_alternate_with_in_range_lengths() {
    let mut rt = runtime(WanderConfig::default(), 2024);
    let tick = tick_period();

    let mut current = rt.controller().state();
    assert_eq!(current, PetState::Walking);
    let mut entered_at = Duration::ZERO;
    let mut seen = vec![current];

    while rt.now() < Duration::from_secs(600) {
        rt.advance_by(tick);
        let state = rt.controller().state();
        if state != current {
            let length = rt.now().saturating_sub(entered_at).as_secs_f64();
            let slack = tick.as_secs_f64();
            let range = match current {
                PetState::Walking => (5.0 - slack)..=(8.0 + slack),
                PetState::Sitting => (3.0 - slack)..=(10.0 + slack),
            };
            assert!(range.contains(&length), "{current:?} lasted {length}");
            current = state;
            entered_at = rt.now();
            seen.push(state);
        }
    }

    assert!(seen.len() > 40);
    for pair in seen.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
    // every state entry was observed, so nothing re-entered the same state
    assert_eq!(seen.len() as u64, rt.controller().transitions());

    let sits = sprites(rt.sink())
        .into_iter()
        .filter(|s| *s == SpriteKind::Sitting)
        .count();
    assert_eq!(sits, seen.iter().filter(|s| **s == PetState::Sitting).count());
}

#[test]
fn same_seed_same_wander() {
    let mut a = runtime(WanderConfig::default(), 7);
    let mut b = runtime(WanderConfig::default(), 7);
    a.advance_to(Duration::from_secs(90));
    b.advance_to(Duration::from_secs(90));
    assert_eq!(a.sink(), b.sink());
}

#[test]
fn catching_up_in_one_call_matches_frame_by_frame() {
    let mut stepped = runtime(WanderConfig::default(), 11);
    let mut jumped = runtime(WanderConfig::default(), 11);
    for frame in 1..=(30 * 45) {
        stepped.advance_to(Duration::from_millis(frame * 1_000 / 30));
    }
    jumped.advance_to(Duration::from_secs(45));
    assert_eq!(stepped.sink(), jumped.sink());
}

#[test]
fn sitting_pet_stays_put() {
    let mut rt = runtime(WanderConfig::default(), 5);
    while rt.controller().state() == PetState::Walking {
        rt.advance_by(tick_period());
    }
    let len = rt.sink().len();
    let at = rt.controller().motion().position;
    // shortest sit is 3 s
    rt.advance_by(Duration::from_millis(2_900));
    assert_eq!(rt.controller().state(), PetState::Sitting);
    assert_eq!(rt.sink().len(), len);
    assert_eq!(rt.controller().motion().position, at);
}

#[test]
fn walking_sprite_matches_travel_direction() {
    let mut rt = runtime(WanderConfig::default(), 99);
    for _ in 0..(60 * 120) {
        let before = *rt.controller().motion();
        let entries = rt.controller().transitions();
        let sent = rt.sink().len();
        rt.advance_by(tick_period());
        let after = *rt.controller().motion();

        // entering a state sets the sprite itself; arrival ticks are kept
        if rt.controller().state() != PetState::Walking
            || rt.controller().transitions() != entries
        {
            continue;
        }
        let new_sprites = sprites(&rt.sink()[sent..]);
        if after.facing_right != before.facing_right {
            assert_eq!(after.facing_right, after.velocity > 0.0);
            assert_eq!(new_sprites, vec![SpriteKind::walking(after.facing_right)]);
        } else {
            assert!(new_sprites.is_empty());
        }
    }
}
