//! Frame-driven game loop
//!
//! The host calls back once per display refresh. Each callback runs exactly
//! one simulation tick and one render, then asks the scheduler for the next
//! callback. Leaving `Playing` (or calling [`GameLoop::stop`]) cancels the
//! pending callback, and a callback that arrives after cancellation is
//! ignored, so a stale world is never ticked.

use std::collections::VecDeque;
use std::time::Instant;

use crate::consts::SIM_DT;
use crate::render::{FrameView, Renderer};
use crate::session::{Session, SessionPhase};
use crate::sim::TickInput;

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Handle of a scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Host refresh scheduling (`requestAnimationFrame` and friends)
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

/// Monotonic time source in milliseconds
pub trait Clock {
    fn now_ms(&mut self) -> f64;
}

/// Wall clock for native hosts
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that advances a fixed step every time it is read
#[derive(Debug, Clone)]
pub struct ManualClock {
    pub now_ms: f64,
    pub step_ms: f64,
}

impl ManualClock {
    pub fn new(step_ms: f64) -> Self {
        Self {
            now_ms: 0.0,
            step_ms,
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&mut self) -> f64 {
        self.now_ms += self.step_ms;
        self.now_ms
    }
}

/// Scheduler whose callbacks are delivered by hand, in request order
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    queue: VecDeque<FrameId>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the next due callback
    pub fn next_due(&mut self) -> Option<FrameId> {
        self.queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.queue.push_back(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.queue.retain(|queued| *queued != id);
    }
}

/// What a frame callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Ticked, rendered and scheduled the next frame
    Continued,
    /// Ticked and rendered, but the session left `Playing`
    Stopped(SessionPhase),
    /// Callback was cancelled or superseded; nothing ran
    Ignored,
    /// No callback was due
    Idle,
}

pub struct GameLoop<S: FrameScheduler, C: Clock> {
    scheduler: S,
    clock: C,
    pending: Option<FrameId>,
    dt: f64,
    frames: u64,
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    samples: usize,
    fps: u32,
}

impl<S: FrameScheduler, C: Clock> GameLoop<S, C> {
    pub fn new(scheduler: S, clock: C) -> Self {
        Self {
            scheduler,
            clock,
            pending: None,
            dt: SIM_DT,
            frames: 0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            samples: 0,
            fps: 0,
        }
    }

    /// Schedule the first frame. Does nothing unless the session is playing
    /// and the loop is idle.
    pub fn start(&mut self, session: &Session) -> bool {
        if self.pending.is_some() || !session.is_playing() {
            return false;
        }
        self.pending = Some(self.scheduler.request_frame());
        log::debug!("Game loop started");
        true
    }

    /// Cancel the pending frame, if any
    pub fn stop(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
            log::debug!("Game loop stopped");
        }
    }

    /// Start or stop to match the session phase
    pub fn sync(&mut self, session: &Session) {
        if session.is_playing() {
            self.start(session);
        } else {
            self.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Host refresh callback: one tick, one render, reschedule
    pub fn on_frame(
        &mut self,
        id: FrameId,
        session: &mut Session,
        input: &TickInput,
        renderer: &mut dyn Renderer,
    ) -> FrameOutcome {
        if self.pending != Some(id) {
            log::warn!("Ignoring stale frame {:?}", id);
            return FrameOutcome::Ignored;
        }
        self.pending = None;

        if !session.is_playing() {
            return FrameOutcome::Stopped(session.phase());
        }

        let now = self.clock.now_ms();
        self.track_fps(now);

        let phase = session.tick(input, self.dt);
        if let Some(world) = session.world() {
            renderer.render(&FrameView::new(world));
        }
        self.frames += 1;

        if phase == SessionPhase::Playing {
            self.pending = Some(self.scheduler.request_frame());
            FrameOutcome::Continued
        } else {
            log::info!("Game loop ended after {} frames ({:?})", self.frames, phase);
            FrameOutcome::Stopped(phase)
        }
    }

    /// Frames run since the loop was created
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn track_fps(&mut self, now: f64) {
        self.frame_times[self.frame_index] = now;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.samples += 1;

        // Oldest sample is the next slot to be overwritten
        if self.samples >= FPS_WINDOW {
            let elapsed = now - self.frame_times[self.frame_index];
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }
}

impl<C: Clock> GameLoop<ManualScheduler, C> {
    /// Deliver the next due callback, if there is one
    pub fn pump(
        &mut self,
        session: &mut Session,
        input: &TickInput,
        renderer: &mut dyn Renderer,
    ) -> FrameOutcome {
        match self.scheduler.next_due() {
            Some(id) => self.on_frame(id, session, input, renderer),
            None => FrameOutcome::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetGate;
    use crate::render::HeadlessRenderer;
    use crate::sim::{Enemy, Rect};
    use crate::tuning::Tuning;

    fn playing_session() -> Session {
        let mut session = Session::new(Tuning::default(), AssetGate::ready());
        session.start(11).unwrap();
        session
    }

    fn manual_loop() -> GameLoop<ManualScheduler, ManualClock> {
        GameLoop::new(ManualScheduler::new(), ManualClock::new(1000.0 / 60.0))
    }

    #[test]
    fn test_does_not_start_in_menu() {
        let session = Session::new(Tuning::default(), AssetGate::ready());
        let mut game_loop = manual_loop();
        assert!(!game_loop.start(&session));
        assert!(!game_loop.is_running());
    }

    #[test]
    fn test_one_tick_and_render_per_frame() {
        let mut session = playing_session();
        let mut game_loop = manual_loop();
        let mut renderer = HeadlessRenderer::new(0);
        assert!(game_loop.start(&session));
        // Starting twice keeps a single pending callback
        assert!(!game_loop.start(&session));
        assert_eq!(game_loop.scheduler().pending(), 1);

        for _ in 0..5 {
            let outcome = game_loop.pump(&mut session, &TickInput::default(), &mut renderer);
            assert_eq!(outcome, FrameOutcome::Continued);
            assert_eq!(game_loop.scheduler().pending(), 1);
        }

        assert_eq!(session.world().unwrap().time_ticks, 5);
        assert_eq!(renderer.frames, 5);
        assert_eq!(game_loop.frames(), 5);
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let mut session = playing_session();
        let mut game_loop = manual_loop();
        let mut renderer = HeadlessRenderer::new(0);
        game_loop.start(&session);

        game_loop.stop();
        assert!(!game_loop.is_running());
        assert_eq!(game_loop.scheduler().pending(), 0);
        assert_eq!(
            game_loop.pump(&mut session, &TickInput::default(), &mut renderer),
            FrameOutcome::Idle
        );

        // A callback the host already fired before cancel landed
        let outcome = game_loop.on_frame(FrameId(1), &mut session, &TickInput::default(), &mut renderer);
        assert_eq!(outcome, FrameOutcome::Ignored);
        assert_eq!(session.world().unwrap().time_ticks, 0);
        assert_eq!(renderer.frames, 0);
    }

    #[test]
    fn test_game_over_stops_loop() {
        let mut session = playing_session();
        {
            let world = session.world_mut().unwrap();
            world.score.lives = 1;
            world.enemies.clear();
            world.enemies.push(Enemy {
                rect: Rect::new(50.0, 290.0, 70.0, 70.0),
                speed: 0.0,
                direction: 1.0,
                patrol_start: 0.0,
                patrol_end: 1000.0,
            });
        }

        let mut game_loop = manual_loop();
        let mut renderer = HeadlessRenderer::new(0);
        game_loop.start(&session);

        let outcome = game_loop.pump(&mut session, &TickInput::default(), &mut renderer);
        assert_eq!(outcome, FrameOutcome::Stopped(SessionPhase::GameOver));
        assert!(!game_loop.is_running());
        assert_eq!(game_loop.scheduler().pending(), 0);
        // The final frame is still rendered
        assert_eq!(renderer.frames, 1);
        assert_eq!(renderer.last_hud.unwrap().lives, 0);
    }

    #[test]
    fn test_sync_follows_session() {
        let mut session = playing_session();
        let mut game_loop = manual_loop();
        game_loop.sync(&session);
        assert!(game_loop.is_running());

        session.world_mut().unwrap().phase = crate::sim::GamePhase::GameOver;
        game_loop.sync(&session);
        assert!(!game_loop.is_running());

        session.start(12).unwrap();
        game_loop.sync(&session);
        assert!(game_loop.is_running());
    }

    #[test]
    fn test_fps_tracking() {
        let mut session = playing_session();
        let mut game_loop = manual_loop();
        let mut renderer = HeadlessRenderer::new(0);
        game_loop.start(&session);
        for _ in 0..90 {
            game_loop.pump(&mut session, &TickInput::default(), &mut renderer);
        }
        assert_eq!(game_loop.fps(), 60);
    }
}
