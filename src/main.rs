//! Arena Fighter entry point
//!
//! On the web this binds the engine to the page's canvas. Natively there is no
//! window, so it plays a scripted match headlessly and logs how it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use arena_fighter::platform::web::Engine;

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger: {err}").into());
        }

        log::info!("Arena Fighter starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "element #canvas is not a canvas")?;

        let engine = Engine::new(canvas)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let engine = Rc::new(engine);
        engine.start();

        // Enter restarts; R is taken by player one's block
        let restart_engine = Rc::clone(&engine);
        let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            if event.key() == "Enter" && !event.repeat() {
                restart_engine.restart();
            }
        });
        window.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
        on_key.forget();

        // The page owns the engine for its whole lifetime
        std::mem::forget(engine);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(err) = wasm_game::run().await {
        log::error!("Startup failed: {err:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arena Fighter (native) starting...");
    log::info!("No window on native builds; playing a scripted match. Serve the web build to play.");

    scripted_match();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

/// Player one walks in and jabs; player two stands still
#[cfg(not(target_arch = "wasm32"))]
fn scripted_match() {
    use arena_fighter::consts::SIM_DT;
    use arena_fighter::sim::{MatchPhase, PlayerSlot};
    use arena_fighter::{GameLoop, HeadlessFrontend, Settings, Tuning};

    const FRAME_LIMIT: u32 = 60 * 60 * 10;

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut game = GameLoop::new(HeadlessFrontend::new(), Tuning::default(), Settings::default(), seed);
    game.start();

    let mut frames = 0;
    while frames < FRAME_LIMIT && game.state().round.phase != MatchPhase::MatchEnd {
        let (p1, p2) = {
            let state = game.state();
            (state.fighter(PlayerSlot::One).pos.x, state.fighter(PlayerSlot::Two).pos.x)
        };
        game.frontend().key("d", p2 - p1 > 70.0);
        game.frontend().key("g", frames % 30 == 0);
        game.frame(SIM_DT);
        frames += 1;
    }

    let state = game.state();
    let round = &state.round;
    match round.match_winner {
        Some(winner) => log::info!(
            "{winner:?} wins the match {}-{} after {} rounds ({frames} frames)",
            round.wins_for(winner),
            round.wins_for(winner.opponent()),
            round.round_number,
        ),
        None => log::warn!("No winner after {frames} frames"),
    }
    for slot in PlayerSlot::ALL {
        let fighter = state.fighter(slot);
        log::info!("{slot:?}: health {:.0}, energy {:.0}", fighter.health, fighter.energy);
    }
}
