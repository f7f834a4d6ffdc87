//! Frame loop
//!
//! [`GameLoop`] owns the simulation and drives it from whatever the platform
//! uses for scheduling. The platform side plugs in through [`Frontend`]: it
//! attaches input listeners that write into the shared [`InputState`] and
//! presents finished frames. Nothing but [`GameLoop::frame`] ever ticks the
//! simulation.

use std::cell::RefCell;
use std::rc::Rc;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::renderer::{TouchOverlay, Vertex, build_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, InputState, TickInput, TouchLayout, tick};
use crate::tuning::Tuning;

/// Input written by event callbacks, read once per tick by the loop
pub type SharedInput = Rc<RefCell<InputState>>;

/// Platform side of the loop
pub trait Frontend {
    /// Register input listeners that write into `input`
    fn attach(&mut self, input: &SharedInput);
    /// Remove every listener registered by `attach`
    fn detach(&mut self);
    /// Draw a finished frame (arena coordinates)
    fn present(&mut self, frame: &[Vertex]);
}

/// Fixed-timestep driver with start/stop/restart lifecycle
pub struct GameLoop<F: Frontend> {
    frontend: F,
    state: GameState,
    settings: Settings,
    input: SharedInput,
    touch_layout: TouchLayout,
    /// Most recent tick input, for the touch overlay
    last_input: TickInput,
    accumulator: f32,
    running: bool,
}

impl<F: Frontend> GameLoop<F> {
    pub fn new(frontend: F, tuning: Tuning, settings: Settings, seed: u64) -> Self {
        Self {
            frontend,
            state: GameState::new(seed, tuning),
            settings,
            input: Rc::new(RefCell::new(InputState::new())),
            touch_layout: TouchLayout::default(),
            last_input: TickInput::default(),
            accumulator: 0.0,
            running: false,
        }
    }

    /// Begin ticking. Calling it while running does nothing.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.frontend.attach(&self.input);
        self.accumulator = 0.0;
        self.running = true;
        log::info!("Game loop started");
    }

    /// Halt ticking and detach input. Calling it while stopped does nothing.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.frontend.detach();
        self.input.borrow_mut().clear();
        self.last_input = TickInput::default();
        self.running = false;
        log::info!("Game loop stopped");
    }

    /// New match without tearing down the loop or its listeners
    pub fn restart(&mut self) {
        self.state.restart();
        self.input.borrow_mut().clear();
        self.last_input = TickInput::default();
        self.accumulator = 0.0;
        log::info!("Match restarted");
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn input(&self) -> &SharedInput {
        &self.input
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn touch_layout(&self) -> &TouchLayout {
        &self.touch_layout
    }

    pub fn set_touch_controls(&mut self, enabled: bool) {
        if self.settings.touch_controls != enabled {
            self.settings.touch_controls = enabled;
            self.settings.save();
            log::info!("Touch controls {}", if enabled { "on" } else { "off" });
        }
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    /// Advance by a frame's worth of wall time, then present.
    /// Returns the number of simulation ticks run.
    pub fn frame(&mut self, dt: f32) -> u32 {
        if !self.running {
            return 0;
        }

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.borrow_mut().snapshot();
            tick(&mut self.state, &input, SIM_DT);
            self.last_input = input;
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.log_events();
        }
        if substeps == MAX_SUBSTEPS {
            // Too far behind: drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        let overlay = TouchOverlay {
            layout: &self.touch_layout,
            input: &self.last_input,
        };
        let touch = self.settings.touch_controls.then_some(&overlay);
        let frame = build_frame(&self.state, &self.settings, touch);
        self.frontend.present(&frame);

        substeps
    }

    fn log_events(&self) {
        for event in &self.state.events {
            match event {
                GameEvent::ProjectileSpawned { id, owner } => {
                    log::debug!("{owner:?} released projectile {id}");
                }
                GameEvent::Fighter { slot, event } => log::trace!("{slot:?}: {event:?}"),
                GameEvent::CountdownStarted { round } => log::info!("Round {round} countdown"),
                _ => {}
            }
        }
    }
}

impl<F: Frontend> Drop for GameLoop<F> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Frontend with no window: counts listener registrations and frames
#[derive(Debug, Default)]
pub struct HeadlessFrontend {
    /// Listener sets currently attached
    pub attached: usize,
    /// Most listener sets ever attached at once
    pub max_attached: usize,
    pub attach_calls: usize,
    pub frames: usize,
    pub last_frame_len: usize,
    input: Option<SharedInput>,
}

impl HeadlessFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw key event the way a keyboard listener would
    pub fn key(&self, key: &str, down: bool) {
        let Some(input) = &self.input else {
            log::trace!("key {key:?} with no listener attached");
            return;
        };
        if let Err(err) = input.borrow_mut().apply_key(key, down) {
            log::trace!("{err}");
        }
    }
}

impl Frontend for HeadlessFrontend {
    fn attach(&mut self, input: &SharedInput) {
        self.attached += 1;
        self.attach_calls += 1;
        self.max_attached = self.max_attached.max(self.attached);
        self.input = Some(Rc::clone(input));
    }

    fn detach(&mut self) {
        self.attached = self.attached.saturating_sub(1);
        self.input = None;
    }

    fn present(&mut self, frame: &[Vertex]) {
        self.frames += 1;
        self.last_frame_len = frame.len();
    }
}
