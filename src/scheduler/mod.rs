//! Fixed-step scheduler
//!
//! Two clocks drive the loop:
//! - the simulation clock, a fixed-interval timer at `1 / steps_per_second`
//! - the render clock, the host's display refresh signal
//!
//! Both run on the caller's thread. Every step calls `pre_step` on all
//! steppables, then `step` on all of them, in insertion order: `pre_step`
//! reads last tick's committed state and writes its own update, `step` may
//! read what other participants wrote during `pre_step`.

pub mod clock;
pub mod frame;

pub use clock::{IntervalTimer, RateCounter, Rates};
pub use frame::{Color, Frame, RenderSurface};

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::ConfigError;
use crate::consts::MAX_SUBSTEPS;
use crate::input::{InputSource, KeyState};
use crate::renderer::colors;
use crate::world::WorldContext;

/// Single-threaded shared participant
pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// What a participant sees during a simulation step
pub struct TickContext<'a> {
    pub world: &'a mut WorldContext,
    pub input: &'a dyn InputSource,
    /// Steps completed before this one
    pub tick: u64,
    /// Simulation rate, for converting per-second tunables
    pub steps_per_second: f64,
}

/// Simulation participant
pub trait Steppable {
    /// Read the previous tick's state, write this object's update
    fn pre_step(&mut self, _ctx: &mut TickContext<'_>) {}

    /// Read other participants' already-updated state
    fn step(&mut self, _ctx: &mut TickContext<'_>) {}
}

/// Draw participant
pub trait Renderable {
    fn render(&mut self, world: &WorldContext, frame: &mut Frame<'_>);
}

impl<T: Steppable + ?Sized> Steppable for Rc<RefCell<T>> {
    fn pre_step(&mut self, ctx: &mut TickContext<'_>) {
        self.borrow_mut().pre_step(ctx);
    }

    fn step(&mut self, ctx: &mut TickContext<'_>) {
        self.borrow_mut().step(ctx);
    }
}

impl<T: Renderable + ?Sized> Renderable for Rc<RefCell<T>> {
    fn render(&mut self, world: &WorldContext, frame: &mut Frame<'_>) {
        self.borrow_mut().render(world, frame);
    }
}

/// Cloneable stop switch, usable from inside a step or render
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    running: Rc<Cell<bool>>,
}

impl SchedulerHandle {
    pub fn stop(&self) {
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

pub struct Scheduler<I: InputSource = KeyState> {
    world: WorldContext,
    input: I,
    steppables: Vec<Box<dyn Steppable>>,
    renderables: Vec<Box<dyn Renderable>>,
    running: Rc<Cell<bool>>,
    step_timer: Option<IntervalTimer>,
    steps_per_second: f64,
    rates: RateCounter,
    ticks: u64,
    clear_color: Color,
}

impl<I: InputSource> Scheduler<I> {
    pub fn new(world: WorldContext, input: I) -> Self {
        Self {
            world,
            input,
            steppables: Vec::new(),
            renderables: Vec::new(),
            running: Rc::new(Cell::new(false)),
            step_timer: None,
            steps_per_second: crate::consts::STEPS_PER_SECOND,
            rates: RateCounter::new(Instant::now()),
            ticks: 0,
            clear_color: colors::BACKGROUND,
        }
    }

    /// Append a simulation participant. Only call between runs.
    pub fn add_steppable(&mut self, participant: impl Steppable + 'static) {
        self.steppables.push(Box::new(participant));
    }

    /// Append a draw participant. Only call between runs.
    pub fn add_renderable(&mut self, participant: impl Renderable + 'static) {
        self.renderables.push(Box::new(participant));
    }

    /// Register one shared object in both lists
    pub fn add_object<T: Steppable + Renderable + 'static>(&mut self, object: Shared<T>) {
        self.add_steppable(object.clone());
        self.add_renderable(object);
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            running: self.running.clone(),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn world(&self) -> &WorldContext {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldContext {
        &mut self.world
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Steps executed since construction
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Frames and steps of the last completed second
    pub fn rates(&self) -> Rates {
        self.rates.latest()
    }

    /// Run one simulation step (both phases)
    pub fn step(&mut self) {
        let mut ctx = TickContext {
            world: &mut self.world,
            input: &self.input,
            tick: self.ticks,
            steps_per_second: self.steps_per_second,
        };
        for participant in self.steppables.iter_mut() {
            participant.pre_step(&mut ctx);
        }
        for participant in self.steppables.iter_mut() {
            participant.step(&mut ctx);
        }
        self.ticks += 1;
        self.rates.count_step();
    }

    /// Draw one frame
    ///
    /// Transforms left on the stack by a renderable are unwound before the
    /// frame ends.
    pub fn render(&mut self, surface: &mut dyn RenderSurface) {
        surface.clear(self.clear_color);
        let mut frame = Frame::new(surface);
        for participant in self.renderables.iter_mut() {
            participant.render(&self.world, &mut frame);
        }
        let leaked = frame.unwind_to(0);
        if leaked > 0 {
            log::debug!("unwound {leaked} transform(s) left by renderables");
        }
        self.rates.count_frame();
    }

    /// Start both clocks; any previous run is stopped first
    ///
    /// Performs one step immediately.
    pub fn start(&mut self, steps_per_second: f64, now: Instant) -> Result<(), ConfigError> {
        if !(steps_per_second > 0.0 && steps_per_second.is_finite()) {
            return Err(ConfigError::InvalidStepRate(steps_per_second));
        }
        self.stop();

        self.steps_per_second = steps_per_second;
        self.running.set(true);
        self.rates.reset(now);
        log::info!(
            "scheduler started at {steps_per_second} steps/s ({} steppables, {} renderables)",
            self.steppables.len(),
            self.renderables.len()
        );

        self.step();
        if self.running.get() {
            let interval = Duration::from_secs_f64(1.0 / steps_per_second);
            self.step_timer = Some(IntervalTimer::new(interval, now));
        }
        Ok(())
    }

    /// Cancel both clocks. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if self.step_timer.take().is_some() {
            log::info!("scheduler stopped after {} steps", self.ticks);
        }
        self.running.set(false);
    }

    /// Fire every step due at `now` (simulation clock)
    ///
    /// Returns the number of steps run.
    pub fn advance(&mut self, now: Instant) -> u32 {
        if !self.running.get() {
            self.step_timer = None;
            return 0;
        }
        let Some(timer) = self.step_timer.as_mut() else {
            return 0;
        };

        let due = timer.poll(now, MAX_SUBSTEPS);
        let mut ran = 0;
        for _ in 0..due {
            self.step();
            ran += 1;
            if !self.running.get() {
                self.stop();
                break;
            }
        }

        if let Some(rates) = self.rates.roll(now) {
            log::debug!(
                "{} fps, {} steps/s",
                rates.frames_per_second,
                rates.steps_per_second
            );
        }
        ran
    }

    /// Display refresh callback (render clock)
    ///
    /// Draws only while running; returns whether a frame was drawn.
    pub fn on_display_refresh(&mut self, surface: &mut dyn RenderSurface) -> bool {
        if !self.running.get() {
            self.step_timer = None;
            return false;
        }
        self.render(surface);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::math::Matrix;
    use glam::DVec2;

    fn world() -> WorldContext {
        WorldContext::new(
            DVec2::splat(40_000.0),
            DVec2::splat(2_000.0),
            DVec2::new(800.0, 600.0),
            0.1,
        )
        .unwrap()
    }

    /// Appends "<name>.pre" / "<name>.step" to a shared log
    struct Probe {
        name: &'static str,
        log: Shared<Vec<String>>,
    }

    impl Steppable for Probe {
        fn pre_step(&mut self, _ctx: &mut TickContext<'_>) {
            self.log.borrow_mut().push(format!("{}.pre", self.name));
        }

        fn step(&mut self, _ctx: &mut TickContext<'_>) {
            self.log.borrow_mut().push(format!("{}.step", self.name));
        }
    }

    impl Renderable for Probe {
        fn render(&mut self, _world: &WorldContext, _frame: &mut Frame<'_>) {
            self.log.borrow_mut().push(format!("{}.render", self.name));
        }
    }

    #[derive(Default)]
    struct NullSurface {
        clears: usize,
        last_transform: Option<Matrix>,
    }

    impl RenderSurface for NullSurface {
        fn clear(&mut self, _color: Color) {
            self.clears += 1;
        }
        fn set_transform(&mut self, transform: &Matrix) {
            self.last_transform = Some(transform.clone());
        }
        fn stroke_line(&mut self, _: DVec2, _: DVec2, _: f64, _: Color) {}
        fn fill_polygon(&mut self, _: &[DVec2], _: Color) {}
        fn fill_circle(&mut self, _: DVec2, _: f64, _: Color) {}
    }

    #[test]
    fn test_two_phase_order() {
        let log = shared(Vec::new());
        let mut sched = Scheduler::new(world(), KeyState::default());
        sched.add_steppable(Probe { name: "a", log: log.clone() });
        sched.add_steppable(Probe { name: "b", log: log.clone() });
        sched.step();
        assert_eq!(*log.borrow(), vec!["a.pre", "b.pre", "a.step", "b.step"]);
        assert_eq!(sched.ticks(), 1);
    }

    #[test]
    fn test_add_object_registers_both() {
        let log = shared(Vec::new());
        let mut sched = Scheduler::new(world(), KeyState::default());
        sched.add_object(shared(Probe { name: "o", log: log.clone() }));
        sched.step();
        sched.render(&mut NullSurface::default());
        assert_eq!(*log.borrow(), vec!["o.pre", "o.step", "o.render"]);
    }

    #[test]
    fn test_step_rate_matches_clock() {
        let mut sched = Scheduler::new(world(), KeyState::default());
        let t0 = Instant::now();
        sched.start(60.0, t0).unwrap();
        assert_eq!(sched.ticks(), 1);

        // Pump at a 60 Hz display cadence for two seconds
        let frame = Duration::from_secs_f64(1.0 / 60.0);
        let mut surface = NullSurface::default();
        for i in 1..=120 {
            let now = t0 + frame * i;
            sched.advance(now);
            sched.on_display_refresh(&mut surface);
        }
        let expected = 120i64;
        assert!((sched.ticks() as i64 - expected).abs() <= 1, "ticks = {}", sched.ticks());
        assert_eq!(surface.clears, 120);
    }

    #[test]
    fn test_stop_halts_both_clocks() {
        let mut sched = Scheduler::new(world(), KeyState::default());
        let t0 = Instant::now();
        sched.start(100.0, t0).unwrap();
        sched.advance(t0 + Duration::from_millis(50));
        let ticks = sched.ticks();

        sched.stop();
        sched.stop();
        assert!(!sched.is_running());
        assert_eq!(sched.advance(t0 + Duration::from_secs(1)), 0);
        assert!(!sched.on_display_refresh(&mut NullSurface::default()));
        assert_eq!(sched.ticks(), ticks);
    }

    struct StopAfter {
        remaining: u32,
        handle: Option<SchedulerHandle>,
    }

    impl Steppable for StopAfter {
        fn step(&mut self, _ctx: &mut TickContext<'_>) {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                if let Some(handle) = &self.handle {
                    handle.stop();
                }
            }
        }
    }

    #[test]
    fn test_stop_from_inside_a_step() {
        let mut sched = Scheduler::new(world(), KeyState::default());
        let stopper = shared(StopAfter { remaining: 3, handle: None });
        stopper.borrow_mut().handle = Some(sched.handle());
        sched.add_steppable(stopper);

        let t0 = Instant::now();
        sched.start(10.0, t0).unwrap();
        for i in 1..=20 {
            sched.advance(t0 + Duration::from_millis(100 * i));
        }
        assert_eq!(sched.ticks(), 3);
        assert!(!sched.is_running());
    }

    #[test]
    fn test_start_rejects_bad_rate() {
        let mut sched = Scheduler::new(world(), KeyState::default());
        assert!(matches!(
            sched.start(0.0, Instant::now()),
            Err(ConfigError::InvalidStepRate(_))
        ));
        assert!(!sched.is_running());
    }

    struct LeakyCamera;

    impl Renderable for LeakyCamera {
        fn render(&mut self, _world: &WorldContext, frame: &mut Frame<'_>) {
            frame.push(&Matrix::scale(2.0, 2.0));
        }
    }

    #[test]
    fn test_render_unwinds_leaked_transforms() {
        let mut sched = Scheduler::new(world(), KeyState::default());
        sched.add_renderable(LeakyCamera);
        let mut surface = NullSurface::default();
        sched.render(&mut surface);
        assert_eq!(surface.last_transform, Some(Matrix::identity(3)));
    }

    struct HeldKeys {
        seen: Shared<Vec<bool>>,
    }

    impl Steppable for HeldKeys {
        fn step(&mut self, ctx: &mut TickContext<'_>) {
            self.seen.borrow_mut().push(ctx.input.is_held(Key::Up));
        }
    }

    #[test]
    fn test_steps_see_input() {
        let seen = shared(Vec::new());
        let mut sched = Scheduler::new(world(), KeyState::default());
        sched.add_steppable(HeldKeys { seen: seen.clone() });
        sched.step();
        sched.input_mut().press(Key::Up);
        sched.step();
        assert_eq!(*seen.borrow(), vec![false, true]);
    }
}
