//! Gate Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use gate_runner::audio::AudioManager;
    use gate_runner::game::{Game, Sinks};
    use gate_runner::persistence::LocalStorageSink;
    use gate_runner::platform::{InputEvent, map_key};
    use gate_runner::renderer::CanvasRenderer;
    use gate_runner::sim::default_gates;
    use gate_runner::{Settings, Tuning};

    /// Game plus its browser collaborators
    struct App {
        game: Game,
        renderer: CanvasRenderer,
        audio: AudioManager,
        store: LocalStorageSink,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            self.game.frame(
                time,
                Sinks {
                    renderer: &mut self.renderer,
                    audio: &mut self.audio,
                    persistence: &mut self.store,
                },
            );
        }
    }

    fn js_error(msg: &str) -> JsValue {
        JsValue::from_str(msg)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| js_error(&format!("logger: {}", e)))?;

        log::info!("Gate Runner starting...");

        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_error("no canvas"))?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let mut renderer =
            CanvasRenderer::new(&canvas).map_err(|e| js_error(&e.to_string()))?;
        renderer.set_show_hud(settings.show_hud);
        let audio = AudioManager::new(&settings);

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, Tuning::default(), default_gates(), settings)
            .map_err(|e| js_error(&e.to_string()))?;

        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            audio,
            store: LocalStorageSink,
        }));

        setup_input_handlers(app.clone())?;
        setup_resize_handler(canvas, app.clone())?;
        setup_auto_pause(app.clone())?;

        // Start game loop
        request_animation_frame(app);

        log::info!("Gate Runner running!");
        Ok(())
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let Some(input) = map_key(&event.key()) else {
                return;
            };
            event.prevent_default();
            match input {
                InputEvent::Restart => log::info!("Restart requested"),
                InputEvent::ToggleMute => log::info!("Mute toggle requested"),
                _ => {}
            }
            app.borrow_mut().game.push_input(input);
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Keep the backing store matched to the displayed size
    fn setup_resize_handler(
        canvas: HtmlCanvasElement,
        app: Rc<RefCell<App>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = window_clone.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            app.borrow_mut().renderer.resize(width, height);
            log::debug!("Canvas resized to {}x{}", width, height);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window, game loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                    && app.borrow_mut().game.auto_pause()
                {
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut app = app.borrow_mut();
                if app.game.settings().mute_on_blur && app.game.auto_pause() {
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Gate Runner (native) starting...");
    log::info!("Native mode runs a headless scripted course - use the web build to play");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>()?,
        None => 2024,
    };
    let tuning = match args.next() {
        Some(path) => gate_runner::Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => gate_runner::Tuning::default(),
    };

    headless::run(seed, tuning)?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use gate_runner::audio::SilentAudio;
    use gate_runner::error::{ConfigError, SinkError};
    use gate_runner::game::{Game, Sinks};
    use gate_runner::persistence::MemorySink;
    use gate_runner::platform::InputEvent;
    use gate_runner::renderer::{Frame, RenderSink};
    use gate_runner::sim::default_gates;
    use gate_runner::{Settings, Tuning};

    /// Simulated host frame interval (ms)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 5;

    /// Renderer that only tracks the busiest frame
    #[derive(Default)]
    struct FrameStats {
        frames: u32,
        max_sprites: usize,
    }

    impl RenderSink for FrameStats {
        fn draw(&mut self, frame: &Frame) -> Result<(), SinkError> {
            self.frames += 1;
            self.max_sprites = self.max_sprites.max(frame.sprites.len());
            Ok(())
        }
    }

    pub fn run(seed: u64, tuning: Tuning) -> Result<(), ConfigError> {
        let mut game = Game::new(seed, tuning, default_gates(), Settings::load())?;
        let mut stats = FrameStats::default();
        let mut audio = SilentAudio;
        let mut store = MemorySink::new();

        let mut frame = 0;
        while !game.state().is_completed() && frame < MAX_FRAMES {
            // Weave between the outer lanes, hopping now and then
            let seconds = frame as f64 * FRAME_MS / 1000.0;
            if (seconds as u32 / 15).is_multiple_of(2) {
                game.push_input(InputEvent::MoveLeft);
            } else {
                game.push_input(InputEvent::MoveRight);
            }
            if frame % 90 == 0 {
                game.push_input(InputEvent::Jump);
            }

            game.frame(
                frame as f64 * FRAME_MS,
                Sinks {
                    renderer: &mut stats,
                    audio: &mut audio,
                    persistence: &mut store,
                },
            );
            frame += 1;
        }

        let state = game.state();
        log::info!(
            "{} frames, busiest frame {} sprites",
            stats.frames,
            stats.max_sprites
        );
        println!(
            "seed {}: completed={} level={} distance={:.0} score={} hits={}",
            seed,
            state.is_completed(),
            state.progress.level,
            state.progress.distance,
            state.progress.score,
            state.progress.hits
        );
        for choice in state.narrative.choices() {
            println!(
                "  gate {} -> {} (lane {}{})",
                choice.gate_id,
                choice.option.as_str(),
                choice.lane,
                if choice.fallback { ", fallback" } else { "" }
            );
        }
        println!("  {} session record(s) stored", store.len());
        Ok(())
    }
}
