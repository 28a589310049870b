use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::anim::{AnimationDriver, AppControl, FrameSink, FrameStatus, Scheduler};
use crate::config::BounceConfig;
use crate::coords::Viewport;
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::render::{BounceRenderer, RenderCtx, RenderTarget};
use crate::sim::RectState;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "blurbox".to_string(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one fixed-size window and animates `scene` until it is closed.
    ///
    /// Startup failures (GPU, shaders, invalid scene) and fatal surface errors
    /// are returned after the event loop exits.
    pub fn run(config: RuntimeConfig, gpu_init: GpuInit, scene: BounceConfig) -> Result<()> {
        // Reject a bad scene before any window appears.
        scene.rect_state().context("invalid initial scene")?;

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, scene);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Everything that lives as long as the window.
struct Session {
    entry: WindowEntry,
    renderer: BounceRenderer,
    driver: AnimationDriver,
}

struct AppState {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    scene: BounceConfig,

    session: Option<Session>,
    failure: Option<anyhow::Error>,
}

impl AppState {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, scene: BounceConfig) -> Self {
        Self {
            config,
            gpu_init,
            scene,
            session: None,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure.get_or_insert(err);
        self.session = None;
        event_loop.exit();
    }

    fn create_session(&self, event_loop: &ActiveEventLoop) -> Result<Session> {
        let viewport = self.scene.viewport;
        let (width, height) = viewport.physical_size();

        // Physical size so that gl_FragCoord pixels equal viewport pixels.
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let renderer = entry
            .with_gpu(|gpu| {
                let size = gpu.size();
                if (size.width, size.height) != (width, height) {
                    log::warn!(
                        "window is {}x{}, scene expects {width}x{height}",
                        size.width,
                        size.height
                    );
                }
                BounceRenderer::new(&RenderCtx::from_gpu(gpu, viewport), &self.scene.palette)
            })
            .context("failed to build renderer")?;

        let driver = AnimationDriver::new(self.scene.rect_state()?, self.scene.frame_clock());
        entry.with_window(|w| driver.start(&mut RedrawScheduler { window: w }));

        log::info!("animation started: {}x{} viewport", width, height);

        Ok(Session {
            entry,
            renderer,
            driver,
        })
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }

        match self.create_session(event_loop) {
            Ok(session) => self.session = Some(session),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Redraws are requested by the animation driver, not here.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let viewport = self.scene.viewport;
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                session.driver.stop_handle().stop();
                log::info!("close requested; stopping animation");
                self.session = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                session.entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }

            WindowEvent::RedrawRequested => {
                let Session {
                    entry,
                    renderer,
                    driver,
                } = session;

                let status = entry.with_mut(|fields| {
                    let mut sink = SurfaceSink {
                        gpu: fields.gpu,
                        window: fields.window,
                        renderer,
                        viewport,
                    };
                    let mut scheduler = RedrawScheduler {
                        window: fields.window,
                    };
                    driver.on_frame(Instant::now(), &mut sink, &mut scheduler)
                });

                if let FrameStatus::Advanced(ft) = status {
                    log::trace!("frame {} dt {:.4}s", ft.frame_index, ft.dt);
                }

                if driver.is_stopped() {
                    self.fail(event_loop, anyhow!("rendering stopped after a fatal surface error"));
                }
            }

            _ => {}
        }
    }
}

/// Arms the next display refresh.
struct RedrawScheduler<'a> {
    window: &'a Window,
}

impl Scheduler for RedrawScheduler<'_> {
    fn schedule_next(&mut self) {
        self.window.request_redraw();
    }
}

/// Draws each advanced frame to the window surface.
struct SurfaceSink<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
    window: &'a Window,
    renderer: &'a mut BounceRenderer,
    viewport: Viewport,
}

impl FrameSink for SurfaceSink<'_, '_> {
    fn draw(&mut self, state: &RectState) -> AppControl {
        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        AppControl::Continue
                    }
                };
            }
        };

        {
            let ctx = RenderCtx::from_gpu(&*self.gpu, self.viewport);
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            self.renderer.draw(&ctx, &mut target, state);
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
