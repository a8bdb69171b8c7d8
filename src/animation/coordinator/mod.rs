//! Per-tile transition state machine.
//!
//! Every tile is either idle or animating. A refresh that passes the guards
//! and reports a visibility edge starts exactly one run; refreshes arriving
//! while that run is in flight are dropped, not queued. Runs advance on
//! [`TransitionCoordinator::tick`] and always end through a single completion
//! point that clears the in-flight entry and the busy signal exactly once.

pub mod visibility;

use rustc_hash::FxHashMap;
pub use visibility::{VisibilityChange, VisibilityTracker};
use web_time::Instant;

use super::snapshot::AnimationSnapshot;
use super::transition::{Direction, TransitionKind, TransitionPlan};
use super::tween::{Tween, TweenStatus};
use crate::host::{
    hide_surface, Animatable, BusyIndicator, FlagStore, NoBusyIndicator,
    OnHidden, TileId, TileRegistry,
};
use crate::options::{TransitionConfig, TransitionDefaults};

/// What a visibility refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Transitions are switched off or the tile's kind is `none`.
    NoTransition,
    /// The tile is unknown, destroyed, or has no render surface.
    InvalidTarget,
    /// A run is already in flight for this tile; the refresh was dropped.
    AlreadyAnimating,
    /// First time this tile was seen; its visibility was recorded.
    FirstObservation,
    /// Visibility matches the previous refresh.
    Unchanged,
    /// A run started.
    Started(Direction),
    /// A run was due but completed immediately (missing scale container or a
    /// rejected start pose).
    Aborted(Direction),
}

impl RefreshOutcome {
    /// Whether a run is now in flight because of this refresh.
    #[must_use]
    pub fn started(self) -> bool {
        matches!(self, RefreshOutcome::Started(_))
    }
}

/// End-of-run bookkeeping. Consumed on completion, so it runs once.
struct Completion {
    direction: Direction,
    snapshot: AnimationSnapshot,
    on_hidden: Option<OnHidden>,
}

impl Completion {
    fn complete<B: BusyIndicator>(
        self,
        id: &TileId,
        status: TweenStatus,
        mut tile: Option<&mut dyn Animatable>,
        busy: &mut B,
    ) {
        let restore = self.direction == Direction::Exiting
            && matches!(status, TweenStatus::Finished | TweenStatus::Failed);
        if restore {
            if let Some(target) = tile.as_deref_mut().filter(|t| t.is_live()) {
                if let Err(e) = self.snapshot.restore(target) {
                    log::warn!("tile {id}: failed to restore pose: {e}");
                }
            }
        }

        busy.set_busy(id, false);
        log::info!("tile {id}: {} ended ({status:?})", self.direction);

        if let Some(on_hidden) = self.on_hidden {
            on_hidden(id, tile);
        }
    }
}

struct ActiveTransition {
    tween: Tween,
    completion: Completion,
}

/// Owns the visibility record and the in-flight set for one scene.
///
/// Single-threaded: every method is called from the host's frame thread.
pub struct TransitionCoordinator<B = NoBusyIndicator> {
    defaults: TransitionDefaults,
    enabled: bool,
    visibility: VisibilityTracker,
    in_flight: FxHashMap<TileId, ActiveTransition>,
    busy: B,
}

impl TransitionCoordinator {
    /// Coordinator without a busy indicator.
    #[must_use]
    pub fn new(defaults: TransitionDefaults) -> Self {
        Self::with_busy_indicator(defaults, NoBusyIndicator)
    }
}

impl Default for TransitionCoordinator {
    fn default() -> Self {
        Self::new(TransitionDefaults::default())
    }
}

impl<B: BusyIndicator> TransitionCoordinator<B> {
    /// Coordinator that reports runs to `busy`.
    #[must_use]
    pub fn with_busy_indicator(defaults: TransitionDefaults, busy: B) -> Self {
        Self {
            defaults,
            enabled: true,
            visibility: VisibilityTracker::new(),
            in_flight: FxHashMap::default(),
            busy,
        }
    }

    /// Fallbacks for tiles whose flags leave fields unset.
    #[must_use]
    pub fn defaults(&self) -> &TransitionDefaults {
        &self.defaults
    }

    /// Mutable fallbacks. Changes apply from the next refresh.
    pub fn defaults_mut(&mut self) -> &mut TransitionDefaults {
        &mut self.defaults
    }

    /// Enable or disable new transitions. Runs in flight still finish.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether refreshes may start transitions.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.defaults.enabled
    }

    /// The busy indicator.
    #[must_use]
    pub fn busy(&self) -> &B {
        &self.busy
    }

    /// Last recorded visibility per tile.
    #[must_use]
    pub fn visibility(&self) -> &VisibilityTracker {
        &self.visibility
    }

    /// Whether a run is in flight for `id`.
    #[must_use]
    pub fn is_animating(&self, id: &TileId) -> bool {
        self.in_flight.contains_key(id)
    }

    /// Number of runs in flight.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Handle a visibility refresh at the current time, hiding the render
    /// surface once an exit completes.
    pub fn handle_refresh<H>(
        &mut self,
        host: &mut H,
        id: &TileId,
    ) -> RefreshOutcome
    where
        H: TileRegistry + FlagStore + ?Sized,
    {
        self.handle_refresh_at(host, id, Instant::now(), Box::new(hide_surface))
    }

    /// Handle a visibility refresh at `now`.
    ///
    /// Guards run in order: transitions disabled or kind `none`, invalid
    /// target, run already in flight, then visibility detection. The
    /// visibility record is only updated by refreshes that reach the last
    /// guard. `on_hidden` runs when an exit ends and is dropped for
    /// entrances.
    pub fn handle_refresh_at<H>(
        &mut self,
        host: &mut H,
        id: &TileId,
        now: Instant,
        on_hidden: OnHidden,
    ) -> RefreshOutcome
    where
        H: TileRegistry + FlagStore + ?Sized,
    {
        if !self.is_enabled() {
            log::debug!("tile {id}: transitions disabled");
            return RefreshOutcome::NoTransition;
        }

        // Flags are read on every refresh, never cached.
        let config = host.flags(id).unwrap_or_default().resolve(&self.defaults);
        if config.kind == TransitionKind::None {
            log::debug!("tile {id}: no transition configured");
            return RefreshOutcome::NoTransition;
        }

        let Some(tile) = host.tile_mut(id).filter(|t| t.is_live()) else {
            log::warn!("tile {id}: no render surface, transition skipped");
            return RefreshOutcome::InvalidTarget;
        };

        if self.in_flight.contains_key(id) {
            log::debug!("tile {id}: already animating, refresh dropped");
            return RefreshOutcome::AlreadyAnimating;
        }

        let change = self.visibility.observe(id, !tile.is_hidden());
        let Some(direction) = change.direction() else {
            log::debug!("tile {id}: {change:?}, nothing to animate");
            return if change == VisibilityChange::FirstObservation {
                RefreshOutcome::FirstObservation
            } else {
                RefreshOutcome::Unchanged
            };
        };

        self.start(id, tile, &config, direction, now, on_hidden)
    }

    /// Handle destruction of `id`.
    ///
    /// Clears the visibility record, ends any run in flight (its exit
    /// post-action receives `None`) and resets the busy signal. Returns
    /// whether a run was cancelled.
    pub fn handle_destroy(&mut self, id: &TileId) -> bool {
        let _ = self.visibility.forget(id);

        match self.in_flight.remove(id) {
            Some(run) => {
                run.completion.complete(
                    id,
                    TweenStatus::Cancelled,
                    None,
                    &mut self.busy,
                );
                true
            }
            None => {
                self.busy.set_busy(id, false);
                false
            }
        }
    }

    /// Advance every run by one frame.
    ///
    /// Returns `true` while any run is still in flight, i.e. the host should
    /// schedule another frame.
    pub fn tick<R>(&mut self, host: &mut R, now: Instant) -> bool
    where
        R: TileRegistry + ?Sized,
    {
        let ended: Vec<(TileId, TweenStatus)> = self
            .in_flight
            .iter_mut()
            .filter_map(|(id, run)| {
                let status = run.tween.step(host.tile_mut(id), now);
                status.is_terminal().then(|| (id.clone(), status))
            })
            .collect();

        for (id, status) in ended {
            if let Some(run) = self.in_flight.remove(&id) {
                run.completion.complete(
                    &id,
                    status,
                    host.tile_mut(&id),
                    &mut self.busy,
                );
            }
        }

        !self.in_flight.is_empty()
    }

    fn start(
        &mut self,
        id: &TileId,
        tile: &mut dyn Animatable,
        config: &TransitionConfig,
        direction: Direction,
        now: Instant,
        on_hidden: OnHidden,
    ) -> RefreshOutcome {
        self.busy.set_busy(id, true);

        let completion = Completion {
            direction,
            snapshot: AnimationSnapshot::capture(tile),
            on_hidden: (direction == Direction::Exiting).then_some(on_hidden),
        };

        match prepare(id, tile, config, direction, &completion.snapshot, now) {
            Ok(tween) => {
                log::info!(
                    "tile {id}: {direction} '{}' over {:.2}s",
                    config.kind,
                    config.duration.as_secs_f64()
                );
                let _ = self
                    .in_flight
                    .insert(id.clone(), ActiveTransition { tween, completion });
                RefreshOutcome::Started(direction)
            }
            Err(status) => {
                completion.complete(id, status, Some(tile), &mut self.busy);
                RefreshOutcome::Aborted(direction)
            }
        }
    }
}

/// Make the surface drawable, build the tween and write its start pose.
///
/// An `Err` carries the status the run completes with immediately.
fn prepare(
    id: &TileId,
    tile: &mut dyn Animatable,
    config: &TransitionConfig,
    direction: Direction,
    snapshot: &AnimationSnapshot,
    now: Instant,
) -> Result<Tween, TweenStatus> {
    if let Err(e) = tile.set_rendered(true) {
        log::warn!("tile {id}: cannot show surface for {direction}: {e}");
        return Err(TweenStatus::Failed);
    }

    let Some(plan) = TransitionPlan::resolve(config, direction, snapshot) else {
        return Err(TweenStatus::Finished);
    };

    let Some(tween) = Tween::from_plan(&plan, snapshot, now) else {
        log::warn!(
            "tile {id}: '{}' needs a scale container, completing immediately",
            plan.kind
        );
        return Err(TweenStatus::Finished);
    };

    if let Err(e) = tween.pre_set(tile) {
        log::warn!("tile {id}: start pose rejected: {e}");
        return Err(TweenStatus::Failed);
    }

    Ok(tween)
}

impl<B: std::fmt::Debug> std::fmt::Debug for TransitionCoordinator<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionCoordinator")
            .field("enabled", &self.enabled)
            .field("defaults", &self.defaults)
            .field("tracked", &self.visibility.len())
            .field("in_flight", &self.in_flight.len())
            .field("busy", &self.busy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::DVec2;
    use web_time::Duration;

    use super::*;
    use crate::animation::transition::SlideEdge;
    use crate::options::TileFlags;
    use crate::scene::{HudIndicator, Mesh, Scene, Tile};

    const EPS: f64 = 1e-9;

    fn coordinator() -> TransitionCoordinator<HudIndicator> {
        TransitionCoordinator::with_busy_indicator(
            TransitionDefaults::default(),
            HudIndicator::new(),
        )
    }

    fn flags(kind: TransitionKind, timing: &str) -> TileFlags {
        TileFlags {
            transition_type: Some(kind.name().to_owned()),
            transition_duration: Some(1.0),
            movement_intensity: Some(10.0),
            timing_function: Some(timing.to_owned()),
        }
    }

    fn tile(id: &str, kind: TransitionKind, timing: &str) -> Tile {
        let mut tile = Tile::new(id, DVec2::new(100.0, 50.0))
            .at(DVec2::new(300.0, 200.0))
            .with_flags(flags(kind, timing));
        tile.alpha = 0.8;
        if let Some(mesh) = tile.mesh.as_mut() {
            mesh.alpha = 0.8;
        }
        tile
    }

    fn scene_with(tiles: impl IntoIterator<Item = Tile>) -> Scene {
        let mut scene = Scene::new();
        for tile in tiles {
            let _ = scene.insert(tile);
        }
        scene
    }

    fn mesh<'a>(scene: &'a Scene, id: &TileId) -> &'a Mesh {
        scene.get(id).and_then(|t| t.mesh.as_ref()).unwrap()
    }

    fn refresh(
        coord: &mut TransitionCoordinator<HudIndicator>,
        scene: &mut Scene,
        id: &TileId,
        now: Instant,
    ) -> RefreshOutcome {
        coord.handle_refresh_at(scene, id, now, Box::new(hide_surface))
    }

    /// Post-action that records whether it received the tile.
    fn recorder() -> (OnHidden, Rc<RefCell<Vec<bool>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let on_hidden: OnHidden =
            Box::new(move |_: &TileId, tile: Option<&mut dyn Animatable>| {
                sink.borrow_mut().push(tile.is_some());
            });
        (on_hidden, calls)
    }

    fn ignore_hidden(_: &TileId, _: Option<&mut dyn Animatable>) {}

    /// Observe `id` visible, hide it and start the exit.
    fn start_exit(
        coord: &mut TransitionCoordinator<HudIndicator>,
        scene: &mut Scene,
        id: &TileId,
        now: Instant,
        on_hidden: OnHidden,
    ) -> RefreshOutcome {
        let first = refresh(coord, scene, id, now);
        assert_eq!(first, RefreshOutcome::FirstObservation);
        assert!(scene.set_hidden(id, true));
        coord.handle_refresh_at(scene, id, now, on_hidden)
    }

    #[test]
    fn test_first_observation_never_animates() {
        let mut coord = coordinator();
        let mut hidden = tile("a", TransitionKind::Fade, "ease");
        hidden.hidden = true;
        let mut scene =
            scene_with([hidden, tile("b", TransitionKind::Fade, "ease")]);
        let now = Instant::now();

        for id in [TileId::from("a"), TileId::from("b")] {
            assert_eq!(
                refresh(&mut coord, &mut scene, &id, now),
                RefreshOutcome::FirstObservation
            );
            assert!(!coord.is_animating(&id));
            assert!(!coord.busy().is_disabled(&id));
        }
        assert_eq!(
            coord.visibility().last_seen(&TileId::from("a")),
            Some(false)
        );
        assert_eq!(
            coord.visibility().last_seen(&TileId::from("b")),
            Some(true)
        );
    }

    #[test]
    fn test_repeated_visibility_never_starts_twice() {
        let mut coord = coordinator();
        let mut scene = scene_with([tile("a", TransitionKind::Fade, "ease")]);
        let id = TileId::from("a");
        let now = Instant::now();

        let _ = refresh(&mut coord, &mut scene, &id, now);
        assert_eq!(
            refresh(&mut coord, &mut scene, &id, now),
            RefreshOutcome::Unchanged
        );
        assert_eq!(
            refresh(&mut coord, &mut scene, &id, now),
            RefreshOutcome::Unchanged
        );
        assert_eq!(coord.active_count(), 0);
    }

    #[test]
    fn test_zoom_exit_runs_restores_and_hides() {
        let mut coord = coordinator();
        let mut scene =
            scene_with([tile("a", TransitionKind::ZoomIn, "linear")]);
        let id = TileId::from("a");
        let t0 = Instant::now();

        let outcome = start_exit(
            &mut coord,
            &mut scene,
            &id,
            t0,
            Box::new(hide_surface),
        );
        assert_eq!(outcome, RefreshOutcome::Started(Direction::Exiting));
        assert!(coord.is_animating(&id));
        assert!(coord.busy().is_disabled(&id));
        assert!(mesh(&scene, &id).visible);

        assert!(coord.tick(&mut scene, t0 + Duration::from_millis(500)));
        let m = mesh(&scene, &id);
        let scale = m.scale.unwrap();
        assert!((scale.x - 0.95).abs() < EPS);
        assert!((scale.y - 0.95).abs() < EPS);
        // Alpha always eases: ease(0.5) = 0.5
        assert!((m.alpha - 0.4).abs() < EPS);

        assert!(!coord.tick(&mut scene, t0 + Duration::from_secs(1)));
        assert!(!coord.is_animating(&id));
        assert!(!coord.busy().is_disabled(&id));
        let m = mesh(&scene, &id);
        assert_eq!(m.scale, Some(DVec2::ONE));
        assert_eq!(m.alpha, 0.8);
        assert_eq!(m.position, DVec2::new(300.0, 200.0));
        assert!(!m.visible);
    }

    #[test]
    fn test_slide_from_left_entrance() {
        let mut coord = coordinator();
        let mut hidden =
            tile("a", TransitionKind::Slide(SlideEdge::Left), "linear");
        hidden.hidden = true;
        let mut scene = scene_with([hidden]);
        let id = TileId::from("a");
        let t0 = Instant::now();

        let _ = refresh(&mut coord, &mut scene, &id, t0);
        assert!(scene.set_hidden(&id, false));
        assert_eq!(
            refresh(&mut coord, &mut scene, &id, t0),
            RefreshOutcome::Started(Direction::Entering)
        );

        // Start pose is written before the first frame.
        let m = mesh(&scene, &id);
        assert_eq!(m.position.x, 290.0);
        assert_eq!(m.alpha, 0.0);

        assert!(coord.tick(&mut scene, t0 + Duration::from_millis(500)));
        let m = mesh(&scene, &id);
        assert!((m.position.x - 295.0).abs() < EPS);
        assert!((m.alpha - 0.5 * 0.8).abs() < EPS);
        assert_eq!(m.position.y, 200.0);

        assert!(!coord.tick(&mut scene, t0 + Duration::from_secs(1)));
        let m = mesh(&scene, &id);
        assert_eq!(m.position.x, 300.0);
        assert_eq!(m.alpha, 0.8);
        assert!(m.visible);
    }

    #[test]
    fn test_refresh_while_animating_is_dropped_and_not_recorded() {
        let mut coord = coordinator();
        let mut scene = scene_with([tile("a", TransitionKind::Fade, "ease")]);
        let id = TileId::from("a");
        let t0 = Instant::now();

        let _ = start_exit(
            &mut coord,
            &mut scene,
            &id,
            t0,
            Box::new(hide_surface),
        );
        assert!(scene.set_hidden(&id, false));
        assert_eq!(
            refresh(&mut coord, &mut scene, &id, t0),
            RefreshOutcome::AlreadyAnimating
        );
        assert_eq!(coord.visibility().last_seen(&id), Some(false));
        assert_eq!(coord.active_count(), 1);

        let t1 = t0 + Duration::from_secs(1);
        assert!(!coord.tick(&mut scene, t1));
        assert_eq!(
            refresh(&mut coord, &mut scene, &id, t1),
            RefreshOutcome::Started(Direction::Entering)
        );
    }

    #[test]
    fn test_unknown_timing_function_behaves_like_ease() {
        let mut coord = coordinator();
        let kind = TransitionKind::Slide(SlideEdge::Top);
        let mut scene =
            scene_with([tile("a", kind, "wobble"), tile("b", kind, "ease")]);
        let (a, b) = (TileId::from("a"), TileId::from("b"));
        let t0 = Instant::now();

        for id in [&a, &b] {
            let outcome = start_exit(
                &mut coord,
                &mut scene,
                id,
                t0,
                Box::new(hide_surface),
            );
            assert!(outcome.started());
        }
        assert!(coord.tick(&mut scene, t0 + Duration::from_millis(250)));

        let ya = mesh(&scene, &a).position.y;
        let yb = mesh(&scene, &b).position.y;
        assert_eq!(ya, yb);
        // ease(0.25) = 0.125 of the way from 200 to 195
        assert!((ya - (200.0 - 5.0 * 0.125)).abs() < EPS);
    }

    #[test]
    fn test_destroy_mid_animation_clears_everything() {
        let mut coord = coordinator();
        let mut scene =
            scene_with([tile("a", TransitionKind::ZoomOut, "ease")]);
        let id = TileId::from("a");
        let t0 = Instant::now();
        let (on_hidden, calls) = recorder();

        let _ = start_exit(&mut coord, &mut scene, &id, t0, on_hidden);
        assert!(coord.tick(&mut scene, t0 + Duration::from_millis(300)));

        assert!(coord.handle_destroy(&id));
        assert!(!coord.is_animating(&id));
        assert!(!coord.busy().is_disabled(&id));
        assert_eq!(coord.visibility().last_seen(&id), None);
        assert_eq!(*calls.borrow(), [false]);

        assert!(!coord.tick(&mut scene, t0 + Duration::from_secs(2)));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_destroy_when_idle_resets_busy_signal() {
        let mut coord = coordinator();
        let mut scene = scene_with([tile("a", TransitionKind::Fade, "ease")]);
        let id = TileId::from("a");
        let _ = refresh(&mut coord, &mut scene, &id, Instant::now());

        assert!(!coord.handle_destroy(&id));
        assert!(coord.visibility().is_empty());
        assert!(!coord.busy().is_disabled(&id));
    }

    #[test]
    fn test_target_destroyed_between_frames_cancels() {
        let mut coord = coordinator();
        let mut scene = scene_with([tile("a", TransitionKind::Fade, "ease")]);
        let id = TileId::from("a");
        let t0 = Instant::now();
        let (on_hidden, calls) = recorder();

        let _ = start_exit(&mut coord, &mut scene, &id, t0, on_hidden);
        assert!(scene.destroy(&id));

        assert!(!coord.tick(&mut scene, t0 + Duration::from_millis(100)));
        assert!(!coord.is_animating(&id));
        assert!(!coord.busy().is_disabled(&id));
        assert_eq!(*calls.borrow(), [true]);
    }

    #[test]
    fn test_target_removed_between_frames_cancels() {
        let mut coord = coordinator();
        let mut scene = scene_with([tile("a", TransitionKind::Fade, "ease")]);
        let id = TileId::from("a");
        let t0 = Instant::now();
        let (on_hidden, calls) = recorder();

        let _ = start_exit(&mut coord, &mut scene, &id, t0, on_hidden);
        assert!(scene.remove(&id).is_some());

        assert!(!coord.tick(&mut scene, t0 + Duration::from_millis(100)));
        assert_eq!(coord.active_count(), 0);
        assert_eq!(*calls.borrow(), [false]);
    }

    #[test]
    fn test_none_never_animates() {
        let mut coord = coordinator();
        let mut scene = scene_with([tile("a", TransitionKind::None, "ease")]);
        let id = TileId::from("a");
        let now = Instant::now();

        for hidden in [false, true, false, true] {
            assert!(scene.set_hidden(&id, hidden));
            assert_eq!(
                refresh(&mut coord, &mut scene, &id, now),
                RefreshOutcome::NoTransition
            );
        }
        assert_eq!(coord.active_count(), 0);
        assert!(coord.visibility().is_empty());
    }

    #[test]
    fn test_tile_without_flags_uses_defaults() {
        let mut coord = coordinator();
        let mut bare = Tile::from("a");
        bare.flags = None;
        let mut scene = scene_with([bare]);
        let id = TileId::from("a");
        let now = Instant::now();

        // Default kind is none.
        assert_eq!(
            refresh(&mut coord, &mut scene, &id, now),
            RefreshOutcome::NoTransition
        );

        coord.defaults_mut().kind = TransitionKind::Fade;
        let _ = refresh(&mut coord, &mut scene, &id, now);
        assert!(scene.set_hidden(&id, true));
        assert!(refresh(&mut coord, &mut scene, &id, now).started());
    }

    #[test]
    fn test_disabled_never_animates() {
        let mut coord = coordinator();
        let mut scene = scene_with([tile("a", TransitionKind::Fade, "ease")]);
        let id = TileId::from("a");
        let now = Instant::now();

        coord.set_enabled(false);
        assert!(!coord.is_enabled());
        assert_eq!(
            refresh(&mut coord, &mut scene, &id, now),
            RefreshOutcome::NoTransition
        );

        coord.set_enabled(true);
        coord.defaults_mut().enabled = false;
        assert!(!coord.is_enabled());
        assert_eq!(
            refresh(&mut coord, &mut scene, &id, now),
            RefreshOutcome::NoTransition
        );
        assert!(coord.visibility().is_empty());
    }

    #[test]
    fn test_invalid_targets_are_skipped() {
        let mut coord = coordinator();
        coord.defaults_mut().kind = TransitionKind::Fade;
        let mut bare = tile("a", TransitionKind::Fade, "ease");
        bare.mesh = None;
        let mut scene = scene_with([bare]);
        let now = Instant::now();

        assert_eq!(
            refresh(&mut coord, &mut scene, &TileId::from("a"), now),
            RefreshOutcome::InvalidTarget
        );
        assert_eq!(
            refresh(&mut coord, &mut scene, &TileId::from("missing"), now),
            RefreshOutcome::InvalidTarget
        );
        assert_eq!(coord.busy().disabled_count(), 0);
        assert!(coord.visibility().is_empty());
    }

    #[test]
    fn test_zoom_without_scale_container_completes_immediately() {
        let mut coord = coordinator();
        let mut flat = tile("a", TransitionKind::ZoomOut, "ease");
        if let Some(mesh) = flat.mesh.as_mut() {
            mesh.scale = None;
        }
        let mut scene = scene_with([flat]);
        let id = TileId::from("a");
        let t0 = Instant::now();
        let (on_hidden, calls) = recorder();

        let outcome = start_exit(&mut coord, &mut scene, &id, t0, on_hidden);
        assert_eq!(outcome, RefreshOutcome::Aborted(Direction::Exiting));
        assert!(!coord.is_animating(&id));
        assert!(!coord.busy().is_disabled(&id));
        assert_eq!(*calls.borrow(), [true]);

        // The entrance back completes immediately too and never hides.
        let (on_hidden, calls) = recorder();
        assert!(scene.set_hidden(&id, false));
        assert_eq!(
            coord.handle_refresh_at(&mut scene, &id, t0, on_hidden),
            RefreshOutcome::Aborted(Direction::Entering)
        );
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_rejected_write_mid_run_fails_and_completes() {
        let mut coord = coordinator();
        let mut scene = scene_with([tile("a", TransitionKind::Fade, "linear")]);
        let id = TileId::from("a");
        let t0 = Instant::now();
        let (on_hidden, calls) = recorder();

        let _ = start_exit(&mut coord, &mut scene, &id, t0, on_hidden);
        assert!(coord.tick(&mut scene, t0 + Duration::from_millis(250)));
        if let Some(mesh) = scene.get_mut(&id).and_then(|t| t.mesh.as_mut()) {
            mesh.frozen = true;
        }

        assert!(!coord.tick(&mut scene, t0 + Duration::from_millis(500)));
        assert!(!coord.is_animating(&id));
        assert!(!coord.busy().is_disabled(&id));
        assert_eq!(*calls.borrow(), [true]);
        // Restore was attempted but rejected; last written frame remains.
        assert!((mesh(&scene, &id).alpha - 0.7).abs() < EPS);
    }

    #[test]
    fn test_rejected_start_pose_aborts() {
        let mut coord = coordinator();
        let mut scene = scene_with([tile("a", TransitionKind::Fade, "ease")]);
        let id = TileId::from("a");
        let t0 = Instant::now();
        if let Some(mesh) = scene.get_mut(&id).and_then(|t| t.mesh.as_mut()) {
            mesh.frozen = true;
        }
        let (on_hidden, calls) = recorder();

        let outcome = start_exit(&mut coord, &mut scene, &id, t0, on_hidden);
        assert_eq!(outcome, RefreshOutcome::Aborted(Direction::Exiting));
        assert_eq!(coord.active_count(), 0);
        assert_eq!(coord.busy().disabled_count(), 0);
        assert_eq!(*calls.borrow(), [true]);
    }

    #[test]
    fn test_every_exit_restores_snapshot_exactly() {
        for kind in TransitionKind::ALL {
            if kind == TransitionKind::None {
                continue;
            }
            let mut coord = coordinator();
            let mut odd = Tile::new("a", DVec2::new(80.0, 40.0))
                .at(DVec2::new(12.5, -7.25))
                .with_flags(flags(kind, "bounce"));
            odd.alpha = 0.65;
            if let Some(mesh) = odd.mesh.as_mut() {
                mesh.scale = Some(DVec2::new(1.5, 0.5));
            }
            let mut scene = scene_with([odd]);
            let id = TileId::from("a");
            let t0 = Instant::now();

            let outcome = start_exit(
                &mut coord,
                &mut scene,
                &id,
                t0,
                Box::new(ignore_hidden),
            );
            assert!(outcome.started(), "{kind}");
            for ms in [300, 700, 1500] {
                let _ = coord.tick(&mut scene, t0 + Duration::from_millis(ms));
            }

            let m = mesh(&scene, &id);
            assert!((m.alpha - 0.65).abs() < EPS, "{kind} alpha");
            let scale = m.scale.unwrap();
            assert!((scale - DVec2::new(1.5, 0.5)).abs().max_element() < EPS);
            let offset = m.position - DVec2::new(12.5, -7.25);
            assert!(offset.abs().max_element() < EPS, "{kind} position");
        }
    }

    #[test]
    fn test_in_flight_until_progress_reaches_one() {
        let mut coord = coordinator();
        let mut scene = scene_with([tile("a", TransitionKind::Fade, "ease")]);
        let id = TileId::from("a");
        let t0 = Instant::now();

        let _ = start_exit(
            &mut coord,
            &mut scene,
            &id,
            t0,
            Box::new(hide_surface),
        );
        assert!(coord.tick(&mut scene, t0 + Duration::from_millis(999)));
        assert!(coord.is_animating(&id));
        assert!(!coord.tick(&mut scene, t0 + Duration::from_millis(1000)));
        assert!(!coord.is_animating(&id));
    }

    #[test]
    fn test_on_hidden_fires_once_and_only_for_exits() {
        let mut coord = coordinator();
        let mut scene = scene_with([tile("a", TransitionKind::Fade, "ease")]);
        let id = TileId::from("a");
        let t0 = Instant::now();
        let (on_hidden, calls) = recorder();

        let _ = start_exit(&mut coord, &mut scene, &id, t0, on_hidden);
        let t1 = t0 + Duration::from_secs(1);
        let _ = coord.tick(&mut scene, t1);
        let _ = coord.tick(&mut scene, t1 + Duration::from_secs(1));
        assert_eq!(*calls.borrow(), [true]);

        let (on_hidden, calls) = recorder();
        assert!(scene.set_hidden(&id, false));
        let outcome = coord.handle_refresh_at(&mut scene, &id, t1, on_hidden);
        assert_eq!(outcome, RefreshOutcome::Started(Direction::Entering));
        let _ = coord.tick(&mut scene, t1 + Duration::from_secs(1));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_flags_are_read_on_every_refresh() {
        let mut coord = coordinator();
        let mut scene = scene_with([tile("a", TransitionKind::Fade, "ease")]);
        let id = TileId::from("a");
        let t0 = Instant::now();

        let _ = start_exit(
            &mut coord,
            &mut scene,
            &id,
            t0,
            Box::new(hide_surface),
        );
        let t1 = t0 + Duration::from_secs(1);
        assert!(!coord.tick(&mut scene, t1));

        if let Some(tile) = scene.get_mut(&id) {
            tile.flags = Some(TileFlags::with_kind(TransitionKind::None));
        }
        assert!(scene.set_hidden(&id, false));
        assert_eq!(
            refresh(&mut coord, &mut scene, &id, t1),
            RefreshOutcome::NoTransition
        );
    }

    #[test]
    fn test_surface_follows_hidden_flag_without_transition() {
        let mut coord = coordinator();
        let mut scene = scene_with([
            tile("a", TransitionKind::Fade, "ease"),
            tile("b", TransitionKind::None, "ease"),
        ]);
        let (a, b) = (TileId::from("a"), TileId::from("b"));
        let t0 = Instant::now();

        // A finished exit hard-hides the surface.
        let _ = start_exit(
            &mut coord,
            &mut scene,
            &a,
            t0,
            Box::new(hide_surface),
        );
        let t1 = t0 + Duration::from_secs(1);
        assert!(!coord.tick(&mut scene, t1));
        assert!(!mesh(&scene, &a).visible);

        // Showing it again without a transition still draws it.
        if let Some(tile) = scene.get_mut(&a) {
            tile.flags = Some(TileFlags::with_kind(TransitionKind::None));
        }
        assert!(scene.set_hidden(&a, false));
        assert_eq!(
            refresh(&mut coord, &mut scene, &a, t1),
            RefreshOutcome::NoTransition
        );
        assert!(mesh(&scene, &a).visible);

        // A tile without a transition stops drawing as soon as it is hidden.
        assert!(scene.set_hidden(&b, true));
        assert_eq!(
            refresh(&mut coord, &mut scene, &b, t1),
            RefreshOutcome::NoTransition
        );
        assert!(!mesh(&scene, &b).visible);
    }

    #[test]
    fn test_tick_reports_remaining_runs() {
        let mut coord = coordinator();
        let mut short = tile("a", TransitionKind::Fade, "ease");
        short.flags = Some(TileFlags {
            transition_duration: Some(0.5),
            ..flags(TransitionKind::Fade, "ease")
        });
        let mut scene =
            scene_with([short, tile("b", TransitionKind::ZoomIn, "ease")]);
        let t0 = Instant::now();

        for id in [TileId::from("a"), TileId::from("b")] {
            let _ = start_exit(
                &mut coord,
                &mut scene,
                &id,
                t0,
                Box::new(hide_surface),
            );
        }
        assert_eq!(coord.active_count(), 2);
        assert_eq!(coord.busy().disabled_count(), 2);

        assert!(coord.tick(&mut scene, t0 + Duration::from_millis(500)));
        assert_eq!(coord.active_count(), 1);
        assert!(!coord.tick(&mut scene, t0 + Duration::from_secs(1)));
        assert_eq!(coord.busy().disabled_count(), 0);
    }

    #[test]
    fn test_default_coordinator_without_busy_indicator() {
        let mut coord: TransitionCoordinator = TransitionCoordinator::default();
        let mut scene = scene_with([tile("a", TransitionKind::Fade, "ease")]);
        let id = TileId::from("a");

        assert_eq!(
            coord.handle_refresh(&mut scene, &id),
            RefreshOutcome::FirstObservation
        );
        assert!(scene.set_hidden(&id, true));
        assert!(coord.handle_refresh(&mut scene, &id).started());
        assert!(coord.is_animating(&id));
    }
}
