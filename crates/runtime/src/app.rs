//! # Main Loop
//!
//! [`run`] loads the scene, then repeats: poll input, apply intentions, step
//! the world, report. The timestep is either fixed or measured from the wall
//! clock, with the first real-time frame assumed to last 1/30 s and later
//! frames limited to about 60 per second.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use physics::FrameReport;
use scene::{EventDef, EventOutcome, Scene, World};
use tracing::{error, info, warn};

use crate::input::{Input, Intention};
use crate::watcher;

pub const DEFAULT_HEADLESS_FRAMES: u64 = 600;

const FIRST_FRAME_DT: f64 = 1.0 / 30.0;
const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clock {
    /// Every frame advances by the same number of seconds.
    Fixed(f64),
    /// Each frame advances by the wall-clock time since the previous one.
    RealTime,
}

#[derive(Debug, Clone)]
pub struct Options {
    pub scene: PathBuf,
    /// `None` runs until a quit event.
    pub frames: Option<u64>,
    pub clock: Clock,
    pub watch: bool,
    pub report_every: u64,
}

fn load(path: &Path) -> Result<(World, Vec<EventDef>)> {
    let scene = Scene::from_path(path)?;
    let events = scene.events.clone();
    let world = scene
        .into_world()
        .with_context(|| format!("failed to build scene {}", path.display()))?;
    Ok((world, events))
}

/// Runs the scene described by `options` to completion.
///
/// # Errors
///
/// Fails if the initial scene cannot be loaded or the engine rejects the
/// timestep. A scene that fails to reload only logs an error.
pub fn run(options: &Options) -> Result<()> {
    let (mut world, events) = load(&options.scene)?;

    let (tx, rx) = mpsc::channel();
    let _scene_watcher = if options.watch {
        match watcher::start(&options.scene, tx) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                error!("Failed to start scene watcher: {e:#}");
                None
            }
        }
    } else {
        None
    };
    let mut input = Input::new(&events, options.watch.then_some(rx));

    info!(
        scene = %options.scene.display(),
        frames = ?options.frames,
        clock = ?options.clock,
        events = input.pending(),
        "starting simulation"
    );

    let mut frame: u64 = 0;
    let mut last_tick: Option<Instant> = None;
    loop {
        if options.frames.is_some_and(|limit| frame >= limit) {
            break;
        }
        let tick = Instant::now();

        if apply_intentions(&mut world, &mut input, &options.scene) == EventOutcome::Quit {
            info!(frame, "quit requested by scene");
            break;
        }

        let dt = match options.clock {
            Clock::Fixed(dt) => dt,
            Clock::RealTime => {
                last_tick.map_or(FIRST_FRAME_DT, |last| tick.duration_since(last).as_secs_f64())
            }
        };
        last_tick = Some(tick);

        let report = world.step(dt).with_context(|| format!("frame {frame} failed"))?;
        frame += 1;

        for &handle in &report.unstable_bodies {
            warn!(
                frame,
                body = world.id_of(handle).unwrap_or("?"),
                "body became unstable and was reset"
            );
        }
        if options.report_every > 0 && frame % options.report_every == 0 {
            log_report(&world, &report, frame);
        }

        if options.clock == Clock::RealTime {
            let elapsed = tick.elapsed();
            if elapsed < TARGET_FRAME_TIME {
                thread::sleep(TARGET_FRAME_TIME - elapsed);
            }
        }
    }

    info!(frames = frame, bodies = world.bodies.len(), "simulation finished");
    Ok(())
}

/// Applies everything the input has for the world's current frame. After a
/// reload the new script is polled again, so its frame-0 events run before
/// the new world is first stepped.
fn apply_intentions(world: &mut World, input: &mut Input, scene: &Path) -> EventOutcome {
    loop {
        let frame = world.engine.frame();
        let mut reloaded = false;
        for intention in input.poll(frame) {
            match intention {
                Intention::ReloadScene => match load(scene) {
                    Ok((fresh, events)) => {
                        *world = fresh;
                        input.reset_script(&events);
                        reloaded = true;
                        info!(bodies = world.bodies.len(), "scene reloaded");
                    }
                    Err(e) => error!("Scene reload failed, keeping current world: {e:#}"),
                },
                Intention::Apply(action) => match world.apply(&action) {
                    Ok(EventOutcome::Continue) => {}
                    Ok(EventOutcome::Quit) => return EventOutcome::Quit,
                    Err(e) => warn!(frame, "scripted event failed: {e:#}"),
                },
            }
        }
        if !reloaded {
            return EventOutcome::Continue;
        }
    }
}

fn log_report(world: &World, report: &FrameReport, frame: u64) {
    for id in world.ids() {
        if let Some(body) = world.body(id) {
            info!(
                frame,
                id,
                position = %body.position(),
                velocity = %body.velocity(),
                "body"
            );
        }
    }

    if report.contacts.is_empty() {
        return;
    }
    let mut per_boundary = BTreeMap::new();
    for contact in &report.contacts {
        *per_boundary.entry(format!("{:?}", contact.boundary)).or_insert(0_usize) += 1;
    }
    info!(
        frame,
        contacts = report.contacts.len(),
        candidates = report.candidates,
        max_penetration = report.max_penetration().unwrap_or(0.0),
        boundaries = ?per_boundary,
        "contacts"
    );
}
