//! Hex Tunnel entry point
//!
//! Handles platform-specific initialization and owns the frame scheduler:
//! the engine itself is a pure step function, so the loop here is the only
//! place that touches requestAnimationFrame, resize events and the
//! completion signal.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Event, HtmlCanvasElement};

    use hex_tunnel::engine::{EnginePhase, EngineState, FrameInput, advance_frame};
    use hex_tunnel::layout::ViewportSize;
    use hex_tunnel::render::{RenderState, tessellate};
    use hex_tunnel::settings::Settings;

    /// Event the embedding page dispatches on `window` when the match
    /// animation finishes; drives the Running -> Stopped transition
    const COMPLETE_EVENT: &str = "hexgrid:complete";

    /// One attached DOM listener, detachable on session end
    struct ListenerHandle {
        event: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    }

    /// Session state owning the surface, the segment pool and all listeners
    struct App {
        engine: EngineState,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        viewport: ViewportSize,
        completed: bool,
        listeners: Vec<ListenerHandle>,
    }

    impl App {
        /// Detach every listener this session attached. Idempotent; called
        /// on the Stopped transition so no callback outlives the session.
        fn detach_listeners(&mut self) {
            if self.listeners.is_empty() {
                return;
            }
            if let Some(window) = web_sys::window() {
                for handle in self.listeners.drain(..) {
                    let _ = window.remove_event_listener_with_callback(
                        handle.event,
                        handle.closure.as_ref().unchecked_ref(),
                    );
                }
            } else {
                self.listeners.clear();
            }
            log::info!("Session listeners detached");
        }
    }

    /// Resynchronize canvas pixels and the injected viewport size
    fn sync_viewport(app: &mut App) {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as f32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as f32;

        app.viewport = ViewportSize { width, height };

        let dpr = window.device_pixel_ratio();
        let px_w = (width as f64 * dpr) as u32;
        let px_h = (height as f64 * dpr) as u32;
        app.canvas.set_width(px_w);
        app.canvas.set_height(px_h);
        if let Some(ref mut render_state) = app.render_state {
            render_state.resize(px_w, px_h);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Hex Tunnel starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window; tunnel disabled");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document; tunnel disabled");
            return;
        };

        // Fatal precondition: without a drawing surface the frame chain
        // never starts and the background stays empty.
        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("tunnel-canvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("Canvas #tunnel-canvas unavailable; tunnel disabled");
                return;
            }
        };

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let engine = EngineState::new(seed, settings.effective_segment_count());
        log::info!(
            "Engine initialized: seed {}, {} segments",
            seed,
            engine.segments.len()
        );

        let app = Rc::new(RefCell::new(App {
            engine,
            render_state: None,
            canvas: canvas.clone(),
            viewport: ViewportSize {
                width: 0.0,
                height: 0.0,
            },
            completed: false,
            listeners: Vec::new(),
        }));

        sync_viewport(&mut app.borrow_mut());
        let (px_w, px_h) = {
            let a = app.borrow();
            (a.canvas.width(), a.canvas.height())
        };

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {e:?}; tunnel disabled");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("No WebGPU adapter: {e:?}; tunnel disabled");
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, px_w, px_h).await;
        app.borrow_mut().render_state = Some(render_state);

        attach_listeners(app.clone());
        request_frame(app);

        log::info!("Hex Tunnel running");
    }

    /// Attach the resize and completion listeners, keeping their closures
    /// owned by the session so they can be removed later.
    fn attach_listeners(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        let resize = {
            let app = app.clone();
            Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                sync_viewport(&mut app.borrow_mut());
            })
        };
        let _ = window
            .add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());

        let complete = {
            let app = app.clone();
            Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                log::info!("Completion signal received");
                app.borrow_mut().completed = true;
            })
        };
        let _ = window
            .add_event_listener_with_callback(COMPLETE_EVENT, complete.as_ref().unchecked_ref());

        app.borrow_mut().listeners = vec![
            ListenerHandle {
                event: "resize",
                closure: resize,
            },
            ListenerHandle {
                event: COMPLETE_EVENT,
                closure: complete,
            },
        ];
    }

    fn request_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |_time: f64| {
            frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            let input = FrameInput {
                width: a.viewport.width,
                height: a.viewport.height,
                completed: a.completed,
            };
            let cmds = advance_frame(&mut a.engine, &input);

            if a.engine.phase == EnginePhase::Stopped {
                // Terminal: no draw, no reschedule, listeners released
                a.detach_listeners();
                log::info!("Tunnel stopped after {} frames", a.engine.frame_count);
                return;
            }

            let frame_vertices = tessellate(&cmds, input.width, input.height);
            if let Some(ref mut render_state) = a.render_state {
                match render_state.render(&frame_vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        render_state.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        request_frame(app);
    }
}

/// Geometry and layout parameters for one diagram node, serialized as JSON
/// for the embedding page. Invoked once per (shape, size) combination.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn node_geometry(is_hub: bool, size: &str, viewport_width: f32) -> String {
    use hex_tunnel::geometry::{ShapeClass, SizeTier, generate, path_data};
    use hex_tunnel::layout::{classify, hub_content_box};

    let tier = SizeTier::parse_lossy(size);
    let shape = if is_hub {
        ShapeClass::Hub
    } else {
        ShapeClass::Node
    };
    let spec = generate(shape, tier);
    let class = classify(viewport_width);
    let content = hub_content_box(tier.spec().outer, if is_hub { class } else { hex_tunnel::layout::ViewportClass::Regular });

    serde_json::json!({
        "path": path_data(&spec.vertices),
        "vertices": spec.vertices,
        "chords": spec.chords,
        "labelSize": tier.spec().label,
        "labelOffsetY": tier.spec().outer * 1.6,
        "contentBox": content,
    })
    .to_string()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hex_tunnel::consts::SEGMENT_COUNT;
    use hex_tunnel::engine::{EngineState, FrameInput, advance_frame};
    use hex_tunnel::geometry::{ShapeClass, SizeTier, generate, path_data};
    use hex_tunnel::render::tessellate;

    env_logger::init();
    log::info!("Hex Tunnel (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Headless smoke run: advance the engine and tessellate without a surface
    let mut state = EngineState::new(0xC01F_EE, SEGMENT_COUNT);
    let input = FrameInput {
        width: 1280.0,
        height: 720.0,
        completed: false,
    };
    let mut paint_total = 0usize;
    for _ in 0..120 {
        let cmds = advance_frame(&mut state, &input);
        paint_total += tessellate(&cmds, input.width, input.height).paint.len();
    }
    println!(
        "120 frames, {} segments, {} paint vertices total",
        state.segments.len(),
        paint_total
    );

    for (name, shape) in [("hub", ShapeClass::Hub), ("node", ShapeClass::Node)] {
        let spec = generate(shape, SizeTier::Normal);
        println!(
            "{name}: {} vertices, {} chords, path {}",
            spec.vertices.len(),
            spec.chords.len(),
            path_data(&spec.vertices)
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
