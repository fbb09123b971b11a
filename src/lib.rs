//! Wandering desktop pet.
//!
//! The behavior engine ([`controller`], [`motion`]) only talks to a
//! [`scheduler::Scheduler`], a [`rng::RandomSource`] and a
//! [`sink::RenderSink`]; the terminal host in [`app`] supplies all three.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod motion;
pub mod render;
pub mod rng;
pub mod runtime;
pub mod scheduler;
pub mod sink;
pub mod sprite;
