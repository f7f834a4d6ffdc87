//! Browser frontend: canvas surface, DOM input listeners and
//! `requestAnimationFrame` scheduling.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlCanvasElement, KeyboardEvent, TouchEvent};

use super::client_to_arena;
use crate::consts::SIM_DT;
use crate::engine::{Frontend, GameLoop, SharedInput};
use crate::error::EngineError;
use crate::renderer::{RenderState, Vertex};
use crate::settings::Settings;
use crate::sim::{TouchLayout, TouchTracker};
use crate::tuning::Tuning;

/// A DOM listener we registered and must remove on detach
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Canvas-backed [`Frontend`]
pub struct WebFrontend {
    canvas: HtmlCanvasElement,
    render: RenderState,
    listeners: Vec<Listener>,
    touch: Rc<RefCell<TouchTracker>>,
}

impl WebFrontend {
    fn new(canvas: HtmlCanvasElement, render: RenderState) -> Self {
        Self {
            canvas,
            render,
            listeners: Vec::new(),
            touch: Rc::new(RefCell::new(TouchTracker::new(TouchLayout::default()))),
        }
    }

    fn listen(&mut self, target: EventTarget, kind: &'static str, callback: Closure<dyn FnMut(Event)>) {
        match target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref()) {
            Ok(()) => self.listeners.push(Listener { target, kind, callback }),
            Err(err) => log::warn!("Could not add {kind} listener: {err:?}"),
        }
    }

    fn key_listener(input: &SharedInput, down: bool) -> Closure<dyn FnMut(Event)> {
        let input = Rc::clone(input);
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            match input.borrow_mut().apply_key(&event.key(), down) {
                // Bound keys must not scroll the page
                Ok(()) => event.prevent_default(),
                Err(err) => log::trace!("{err}"),
            }
        })
    }

    fn touch_listener(&self, input: &SharedInput, lifting: bool) -> Closure<dyn FnMut(Event)> {
        let input = Rc::clone(input);
        let tracker = Rc::clone(&self.touch);
        let canvas = self.canvas.clone();
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(event) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            event.prevent_default();

            let rect = canvas.get_bounding_client_rect();
            let origin = Vec2::new(rect.left() as f32, rect.top() as f32);
            let size = Vec2::new(rect.width() as f32, rect.height() as f32);
            let changed = event.changed_touches();
            let mut tracker = tracker.borrow_mut();
            let mut input = input.borrow_mut();

            for i in 0..changed.length() {
                let Some(touch) = changed.item(i) else {
                    continue;
                };
                let id = touch.identifier();
                if lifting {
                    tracker.lift(id, &mut input);
                } else {
                    let client = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    tracker.touch(id, client_to_arena(client, origin, size), &mut input);
                }
            }
        })
    }

    /// Match the drawing buffer to the canvas's current on-page size
    fn sync_size(&mut self) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = (self.canvas.client_width() as f64 * dpr) as u32;
        let height = (self.canvas.client_height() as f64 * dpr) as u32;
        if width > 0 && height > 0 && (width, height) != self.render.size {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.render.resize(width, height);
        }
    }
}

impl Frontend for WebFrontend {
    fn attach(&mut self, input: &SharedInput) {
        if !self.listeners.is_empty() {
            return;
        }
        let Some(window) = web_sys::window() else {
            log::warn!("No window; input disabled");
            return;
        };
        let window: EventTarget = window.into();
        let canvas: EventTarget = self.canvas.clone().into();

        self.listen(window.clone(), "keydown", Self::key_listener(input, true));
        self.listen(window.clone(), "keyup", Self::key_listener(input, false));

        // Losing focus would otherwise leave keys stuck down
        let blur_input = Rc::clone(input);
        let blur_touch = Rc::clone(&self.touch);
        let on_blur = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            blur_input.borrow_mut().clear();
            blur_touch.borrow_mut().clear();
        });
        self.listen(window, "blur", on_blur);

        let start = self.touch_listener(input, false);
        self.listen(canvas.clone(), "touchstart", start);
        let moved = self.touch_listener(input, false);
        self.listen(canvas.clone(), "touchmove", moved);
        let end = self.touch_listener(input, true);
        self.listen(canvas.clone(), "touchend", end);
        let cancel = self.touch_listener(input, true);
        self.listen(canvas, "touchcancel", cancel);

        log::debug!("Attached {} input listeners", self.listeners.len());
    }

    fn detach(&mut self) {
        for listener in self.listeners.drain(..) {
            if let Err(err) = listener
                .target
                .remove_event_listener_with_callback(listener.kind, listener.callback.as_ref().unchecked_ref())
            {
                log::warn!("Could not remove {} listener: {err:?}", listener.kind);
            }
        }
        self.touch.borrow_mut().clear();
    }

    fn present(&mut self, frame: &[Vertex]) {
        self.sync_size();
        match self.render.render(frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost; reconfiguring");
                let (w, h) = self.render.size;
                self.render.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => log::error!("Out of GPU memory"),
            Err(e) => log::warn!("Render error: {e:?}"),
        }
    }
}

/// Pending animation frame and the callback that re-arms it
#[derive(Default)]
struct Scheduler {
    callback: Option<Closure<dyn FnMut(f64)>>,
    handle: Option<i32>,
    last_time: Option<f64>,
}

fn schedule(scheduler: &Rc<RefCell<Scheduler>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut s = scheduler.borrow_mut();
    let Some(callback) = s.callback.as_ref() else {
        return;
    };
    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        Ok(id) => s.handle = Some(id),
        Err(err) => log::error!("requestAnimationFrame failed: {err:?}"),
    }
}

/// The fighting engine bound to a canvas
pub struct Engine {
    game: Rc<RefCell<GameLoop<WebFrontend>>>,
    scheduler: Rc<RefCell<Scheduler>>,
}

impl Engine {
    /// Bind to `canvas` with default balance
    pub async fn new(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
        Self::with_tuning(canvas, Tuning::default()).await
    }

    pub async fn with_tuning(canvas: HtmlCanvasElement, tuning: Tuning) -> Result<Self, EngineError> {
        tuning.validate()?;
        let window = web_sys::window().ok_or_else(|| EngineError::SurfaceUnavailable("no window".into()))?;

        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| EngineError::SurfaceUnavailable(format!("surface: {e}")))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| EngineError::SurfaceUnavailable(format!("adapter: {e}")))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render = RenderState::new(surface, &adapter, width, height).await?;
        let seed = js_sys::Date::now() as u64;
        let game = GameLoop::new(WebFrontend::new(canvas, render), tuning, Settings::load(), seed);
        log::info!("Engine ready (seed {seed})");

        Ok(Self {
            game: Rc::new(RefCell::new(game)),
            scheduler: Rc::new(RefCell::new(Scheduler::default())),
        })
    }

    /// Attach input and begin the frame loop; no-op while running
    pub fn start(&self) {
        if self.game.borrow().is_running() {
            return;
        }
        self.game.borrow_mut().start();

        let game = Rc::clone(&self.game);
        let scheduler = Rc::clone(&self.scheduler);
        let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let dt = {
                let mut s = scheduler.borrow_mut();
                s.handle = None;
                let dt = s.last_time.map_or(SIM_DT, |last| ((time - last) / 1000.0) as f32);
                s.last_time = Some(time);
                dt
            };
            {
                let mut game = game.borrow_mut();
                if !game.is_running() {
                    return;
                }
                game.frame(dt);
            }
            schedule(&scheduler);
        });

        {
            let mut s = self.scheduler.borrow_mut();
            s.callback = Some(callback);
            s.last_time = None;
        }
        schedule(&self.scheduler);
    }

    /// Cancel the pending frame and detach input; no-op while stopped
    pub fn stop(&self) {
        let pending = self.scheduler.borrow_mut().handle.take();
        if let (Some(id), Some(window)) = (pending, web_sys::window()) {
            if let Err(err) = window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {err:?}");
            }
        }
        // Dropping the callback also breaks its reference back to us
        self.scheduler.borrow_mut().callback = None;
        self.game.borrow_mut().stop();
    }

    /// Fresh match; the loop keeps running if it was
    pub fn restart(&self) {
        self.game.borrow_mut().restart();
    }

    pub fn set_touch_controls(&self, enabled: bool) {
        self.game.borrow_mut().set_touch_controls(enabled);
    }

    pub fn is_running(&self) -> bool {
        self.game.borrow().is_running()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// JavaScript handle for host pages
#[wasm_bindgen]
pub struct FightingEngine {
    inner: Engine,
}

#[wasm_bindgen]
impl FightingEngine {
    /// Bind to a canvas, optionally overriding balance with a JSON sheet
    pub async fn create(canvas: HtmlCanvasElement, tuning_json: Option<String>) -> Result<FightingEngine, JsValue> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Tuning::default(),
        };
        let inner = Engine::with_tuning(canvas, tuning)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn start(&self) {
        self.inner.start();
    }

    pub fn stop(&self) {
        self.inner.stop();
    }

    pub fn restart(&self) {
        self.inner.restart();
    }

    #[wasm_bindgen(js_name = setTouchControls)]
    pub fn set_touch_controls(&self, enabled: bool) {
        self.inner.set_touch_controls(enabled);
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }
}
