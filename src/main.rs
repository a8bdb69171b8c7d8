//! Demo binary for the veil transition engine.

use std::path::Path;

use glam::DVec2;
use veil::animation::{RefreshOutcome, TransitionCoordinator, TransitionKind};
use veil::error::VeilError;
use veil::host::{hide_surface, Animatable, TileId};
use veil::options::{Options, TileFlags};
use veil::scene::{HudIndicator, Scene, Tile};
use veil::util::frame_clock::FrameClock;

const TILE_SIZE: f64 = 100.0;
const TILE_GAP: f64 = 20.0;

/// Upper bound on frames per phase, in case a host never goes idle.
const MAX_FRAMES: u64 = 10_000;

type Coordinator = TransitionCoordinator<HudIndicator>;

/// One tile per transition kind, laid out in a row.
fn build_scene() -> Result<Scene, VeilError> {
    let mut scene = Scene::new();
    for (i, kind) in TransitionKind::ALL.into_iter().enumerate() {
        let tile = Tile::new(kind.name(), DVec2::splat(TILE_SIZE))
            .with_flags(TileFlags::with_kind(kind));
        let id = tile.id().clone();
        let _ = scene.insert(tile);
        scene.place(&id, DVec2::new(i as f64 * (TILE_SIZE + TILE_GAP), 0.0))?;
    }
    Ok(scene)
}

fn refresh_all(
    coordinator: &mut Coordinator,
    scene: &mut Scene,
    ids: &[TileId],
    clock: &FrameClock,
) {
    for id in ids {
        let outcome = coordinator.handle_refresh_at(
            scene,
            id,
            clock.now(),
            Box::new(hide_surface),
        );
        if let RefreshOutcome::Started(direction) = outcome {
            log::debug!("{id}: {direction} started");
        }
    }
}

fn run_until_idle(
    coordinator: &mut Coordinator,
    scene: &mut Scene,
    clock: &mut FrameClock,
) {
    let first = clock.frame_count();
    while coordinator.active_count() > 0 {
        if clock.frame_count() - first >= MAX_FRAMES {
            log::warn!(
                "still {} runs active, giving up",
                coordinator.active_count()
            );
            break;
        }
        let now = clock.advance();
        let _ = coordinator.tick(scene, now);
        log::debug!(
            "frame {}: {} active, {} toggles disabled",
            clock.frame_count(),
            coordinator.active_count(),
            coordinator.busy().disabled_count()
        );
    }
    log::info!(
        "idle after {} frames at {:.0} fps",
        clock.frame_count() - first,
        clock.fps()
    );
}

fn report(scene: &Scene) {
    for tile in scene.tiles() {
        log::info!(
            "{}: hidden={} alpha={:.3} scale={:?} position={:?}",
            tile.id(),
            tile.is_hidden(),
            tile.alpha(),
            tile.scale(),
            tile.position()
        );
    }
}

fn run(options: &Options) -> Result<(), VeilError> {
    let mut scene = build_scene()?;
    let mut coordinator = TransitionCoordinator::with_busy_indicator(
        options.transitions.clone(),
        HudIndicator::new(),
    );
    let mut clock =
        FrameClock::fixed(options.playback.fps, web_time::Instant::now());
    let ids: Vec<TileId> = scene.ids().cloned().collect();

    // The first refresh only records each tile's visibility.
    refresh_all(&mut coordinator, &mut scene, &ids, &clock);

    for phase in ["hide", "show"] {
        log::info!("{phase}: toggling {} tiles", ids.len());
        for id in &ids {
            let _ = scene.toggle_hidden(id)?;
        }
        refresh_all(&mut coordinator, &mut scene, &ids, &clock);
        run_until_idle(&mut coordinator, &mut scene, &mut clock);
        report(&scene);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{path}: {e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    if let Err(e) = run(&options) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
