use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use super::surface::WindowSurface;
use crate::config::HostConfig;
use crate::host::Host;
use crate::input::platform::winit::EventTranslator;
use crate::load::{self, AssetSource, FsAssetSource};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "hearth".to_string(),
            initial_size: LogicalSize::new(960.0, 540.0),
        }
    }
}

/// Entry point for the native runtime.
pub struct Runtime;

impl Runtime {
    /// Opens a window, builds the host over it and runs until the window closes.
    ///
    /// `build` receives the window surface and wires the remaining collaborators.
    /// Resources are loaded from `source` before the first frame. A host failure
    /// with no error observer ends the loop and is returned here.
    pub fn run<S, F>(config: RuntimeConfig, source: S, build: F) -> Result<()>
    where
        S: AssetSource,
        F: FnOnce(WindowSurface) -> Result<Host>,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState {
            config,
            source,
            build: Some(build),
            session: None,
            failure: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// [`Runtime::run`] with resources read from `host_config.asset_dir`.
    pub fn run_from_config<F>(config: RuntimeConfig, host_config: HostConfig, build: F) -> Result<()>
    where
        F: FnOnce(WindowSurface, HostConfig) -> Result<Host>,
    {
        let source = FsAssetSource::from_config(&host_config);
        Self::run(config, source, move |surface| build(surface, host_config))
    }
}

struct Session {
    window: Arc<Window>,
    host: Host,
    translator: EventTranslator,
    clock: FrameClock,
    input_attached: Rc<Cell<bool>>,
}

struct RuntimeState<S, F> {
    config: RuntimeConfig,
    source: S,
    build: Option<F>,
    session: Option<Session>,
    failure: Option<anyhow::Error>,
}

impl<S, F> RuntimeState<S, F>
where
    S: AssetSource,
    F: FnOnce(WindowSurface) -> Result<Host>,
{
    fn start(&mut self, event_loop: &ActiveEventLoop, build: F) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let surface = WindowSurface::new(window.clone());
        let input_attached = surface.input_gate();
        let mut host = build(surface).context("failed to build host")?;

        let timeout = host.config().load_timeout();
        log::info!("loading resources");
        pollster::block_on(load::drive(&mut host, &self.source, timeout))?;

        self.session = Some(Session {
            window,
            host,
            translator: EventTranslator::new(),
            clock: FrameClock::new(),
            input_attached,
        });
        Ok(())
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl<S, F> ApplicationHandler for RuntimeState<S, F>
where
    S: AssetSource,
    F: FnOnce(WindowSurface) -> Result<Host>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(build) = self.build.take() else {
            return;
        };
        event_loop.set_control_flow(ControlFlow::Wait);

        if let Err(err) = self.start(event_loop, build) {
            self.abort(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.window.id() != window_id {
            return;
        }

        let result = match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }
            WindowEvent::RedrawRequested => {
                let ft = session.clock.tick();
                session.host.frame(ft.timestamp_ms)
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                session.window.request_redraw();
                Ok(())
            }
            _ => {
                if !session.input_attached.get() {
                    return;
                }
                let scale = session.window.scale_factor();
                match session.translator.translate(scale, &event) {
                    Some(ev) => session.host.handle_event(ev),
                    None => Ok(()),
                }
            }
        };

        if let Err(err) = result {
            self.abort(event_loop, err.into());
        }
    }
}
