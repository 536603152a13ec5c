//! Low-level resources for window creation and rendering.

use std::sync::Arc;

use web_time::Instant;
use winit::{
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::{animation::FrameClock, camera::Camera, pipelines as pl};

//
// user-facing API
//

/// Parameters for the creation of a [`RenderWindow`].
#[derive(Clone, Copy, Debug)]
pub struct WindowParams {
    /// Initial width of the window in pixels. Default: 400.
    pub width: usize,
    /// Initial height of the window in pixels. Default: 400.
    pub height: usize,
    /// Samples used for anti-aliasing. Default: 4.
    pub msaa_samples: u32,
    /// Title shown in the window's title bar.
    /// Default: "Pendulum simulation".
    pub title: &'static str,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            msaa_samples: 4,
            title: "Pendulum simulation",
        }
    }
}

/// Errors that can occur while running an animation.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The event loop failed or was already consumed.
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// The operating system refused to create a window.
    #[error("Failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),
    /// A rendering surface couldn't be created for the window.
    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    /// No graphics adapter compatible with the window was found.
    #[error("No compatible graphics adapter found")]
    NoAdapter,
    /// The graphics adapter refused to provide a device.
    #[error("Failed to get device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    /// A real-time step timing was given a timestep
    /// that isn't finite and positive.
    #[error("Invalid simulation timestep {dt}, must be finite and positive")]
    InvalidTimestep {
        /// The rejected timestep.
        dt: f64,
    },
}

/// A window for drawing real-time graphics.
///
/// See [`run_animation`][Self::run_animation], [`Animation`][crate::Animation],
/// and the demos in the `double-pendulum` crate
/// for how to draw into the window once created.
pub struct RenderWindow {
    // RenderWindow is just a wrapper to run the event loop from,
    // all the actual resources are created on application resume
    // and stored in `ActiveRenderWindow`
    params: WindowParams,
    // event loop in an option because we need to take it out to run it
    event_loop: Option<EventLoop<()>>,
}

impl RenderWindow {
    /// Create a new render window.
    pub fn new(params: WindowParams) -> Result<Self, winit::error::EventLoopError> {
        Ok(Self {
            params,
            event_loop: Some(EventLoop::new()?),
        })
    }

    /// Play an [`Animation`][crate::Animation] in the window.
    ///
    /// # Controls
    /// - `Q`: end the animation and return from this function
    ///
    /// Every key press, including `Q` before the animation ends,
    /// is passed to the animation's `on_key` function.
    ///
    /// The function returns after the animation is ended
    /// by closing the window or pressing Q,
    /// so multiple animations can be run consecutively in one program.
    /// Errors in creating the window or graphics context
    /// end the animation and are returned from here,
    /// as is a [`StepTiming::RealTime`][crate::StepTiming::RealTime]
    /// timestep that isn't finite and positive.
    pub fn run_animation<State, StepFn, DrawFn, OnKeyFn>(
        &mut self,
        anim: super::animation::Animation<State, StepFn, DrawFn, OnKeyFn>,
    ) -> Result<(), RenderError>
    where
        State: crate::AnimationState,
        StepFn: FnMut(&mut State),
        DrawFn: FnMut(&State, &mut crate::Painter),
        OnKeyFn: FnMut(crate::KeyCode, &mut State),
    {
        let camera = Camera::new_2d(anim.params.scene_size);
        let clock = FrameClock::new(anim.params.timing)?;

        let mut event_loop = self
            .event_loop
            .take()
            .ok_or(winit::error::EventLoopError::RecreationAttempt)?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut anim_app = AnimationApp {
            window_params: self.params,
            window: None,
            error: None,
            camera,
            clock,
            frame_start_t: Instant::now(),
            prev_state: anim.state.clone(),
            next_state: anim.state.clone(),
            anim,
        };

        use winit::platform::run_on_demand::EventLoopExtRunOnDemand;
        let res = event_loop.run_app_on_demand(&mut anim_app);
        self.event_loop = Some(event_loop);
        res?;
        match anim_app.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

//
// actual window and wgpu context
//

// An active window (created after the event loop is started)
// and wgpu rendering context.
#[derive(Debug)]
pub(crate) struct ActiveRenderWindow {
    _window: Arc<Window>,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    swapchain_format: wgpu::TextureFormat,
    msaa_samples: u32,
    // msaa texture is only created if multisampling is used
    msaa_tex: Option<wgpu::Texture>,
}

impl ActiveRenderWindow {
    /// Create a window and a wgpu context drawing into it.
    async fn create(
        event_loop: &ActiveEventLoop,
        params: WindowParams,
    ) -> Result<Self, RenderError> {
        let window_attrs = Window::default_attributes()
            .with_title(params.title)
            .with_inner_size(winit::dpi::LogicalSize {
                width: params.width as f64,
                height: params.height as f64,
            });
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    label: None,
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let window_size = window.inner_size();

        let swapchain_capabilities = surface.get_capabilities(&adapter);
        // prefer an sRGB format so that linear colors are displayed correctly
        let swapchain_format = swapchain_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| swapchain_capabilities.formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: swapchain_format,
            width: window_size.width,
            height: window_size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: swapchain_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let msaa_samples = params.msaa_samples.max(1);

        // a minimized window can have a size of 0 here.
        // in that case, postpone surface configuration until we get a resize event
        let window_has_pixels = surface_config.width != 0 && surface_config.height != 0;
        if window_has_pixels {
            surface.configure(&device, &surface_config);
        }
        let msaa_tex = if msaa_samples > 1 && window_has_pixels {
            Some(Self::create_msaa_texture(
                &device,
                swapchain_format,
                msaa_samples,
                window_size,
            ))
        } else {
            None
        };

        log::info!(
            "Created a {}x{} window on {:?} with {} MSAA samples",
            window_size.width,
            window_size.height,
            adapter.get_info().name,
            msaa_samples,
        );

        Ok(Self {
            _window: window,
            device,
            queue,
            surface,
            surface_config,
            swapchain_format,
            msaa_samples,
            msaa_tex,
        })
    }

    /// Create a multisampled texture to render to.
    fn create_msaa_texture(
        device: &wgpu::Device,
        swapchain_format: wgpu::TextureFormat,
        msaa_samples: u32,
        window_size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("screen multisample"),
            size: wgpu::Extent3d {
                width: window_size.width,
                height: window_size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: msaa_samples,
            dimension: wgpu::TextureDimension::D2,
            format: swapchain_format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    /// Reconfigure the swapchain and recreate the MSAA texture when the window size has changed.
    fn resize_swapchain(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size == self.window_size() || new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.reconfigure();
    }

    /// Apply the current surface configuration.
    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
        if self.msaa_samples > 1 {
            self.msaa_tex = Some(Self::create_msaa_texture(
                &self.device,
                self.swapchain_format,
                self.msaa_samples,
                self.window_size(),
            ));
        }
    }

    /// Get the format of the swapchain texture being rendered to.
    #[inline]
    pub(crate) fn swapchain_format(&self) -> wgpu::TextureFormat {
        self.swapchain_format
    }

    /// Get the size of the render window in physical pixels.
    #[inline]
    pub(crate) fn window_size(&self) -> winit::dpi::PhysicalSize<u32> {
        winit::dpi::PhysicalSize::new(self.surface_config.width, self.surface_config.height)
    }

    /// Get the multisample state used by the window.
    #[inline]
    pub(crate) fn multisample_state(&self) -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count: self.msaa_samples,
            mask: !0,
            alpha_to_coverage_enabled: false,
        }
    }

    /// Grab the next swapchain texture and start drawing on it.
    ///
    /// Returns `None` if no texture is available this frame,
    /// in which case the frame should be skipped.
    fn begin_frame(&mut self, clear_color: palette::LinSrgb) -> Option<RenderContext<'_>> {
        let surface_tex = match self.surface.get_current_texture() {
            Ok(tex) => tex,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // the surface needs to be configured again, try again next frame
                self.reconfigure();
                return None;
            }
            Err(err) => {
                log::warn!("Failed to get next swapchain texture: {err}");
                return None;
            }
        };
        let surface_view = surface_tex
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let (target, resolve_target) = if let Some(msaa_tex) = &self.msaa_tex {
            let msaa_view = msaa_tex.create_view(&wgpu::TextureViewDescriptor::default());
            (msaa_view, Some(surface_view))
        } else {
            (surface_view, None)
        };
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());

        Some(RenderContext {
            clear_color: Some(wgpu::Color {
                r: clear_color.red as f64,
                g: clear_color.green as f64,
                b: clear_color.blue as f64,
                a: 1.0,
            }),
            surface_tex,
            target,
            resolve_target,
            encoder,
            device: &self.device,
            queue: &mut self.queue,
            viewport_size: (self.surface_config.width, self.surface_config.height),
        })
    }
}

/// An active surface and other context required to draw a frame.
pub(crate) struct RenderContext<'a> {
    // if this is set, first pass automatically clears the framebuffer
    clear_color: Option<wgpu::Color>,
    surface_tex: wgpu::SurfaceTexture,
    pub target: wgpu::TextureView,
    pub resolve_target: Option<wgpu::TextureView>,
    pub encoder: wgpu::CommandEncoder,
    pub device: &'a wgpu::Device,
    pub queue: &'a mut wgpu::Queue,
    pub viewport_size: (u32, u32),
}

impl<'a> RenderContext<'a> {
    /// Start a render pass with default parameters.
    pub fn pass(&mut self, label: &str) -> wgpu::RenderPass<'_> {
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.target,
                resolve_target: self.resolve_target.as_ref(),
                ops: wgpu::Operations {
                    load: if let Some(c) = self.clear_color.take() {
                        wgpu::LoadOp::Clear(c)
                    } else {
                        wgpu::LoadOp::Load
                    },
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        })
    }

    /// Make sure the frame has been cleared
    /// even if nothing was drawn on it.
    fn ensure_cleared(&mut self) {
        if self.clear_color.is_some() {
            drop(self.pass("clear"));
        }
    }
}

//
// animation control
//

/// A `winit` app controlling the playback of an animation.
struct AnimationApp<State, StepFn, DrawFn, OnKeyFn>
where
    State: crate::AnimationState,
    StepFn: FnMut(&mut State),
    DrawFn: FnMut(&State, &mut crate::Painter),
    OnKeyFn: FnMut(crate::KeyCode, &mut State),
{
    window_params: WindowParams,
    window: Option<(ActiveRenderWindow, pl::Renderer)>,
    // error that ended the animation, returned after the event loop exits
    error: Option<RenderError>,
    anim: crate::Animation<State, StepFn, DrawFn, OnKeyFn>,
    camera: Camera,
    // state for the timing of frames
    clock: FrameClock,
    frame_start_t: Instant,
    // double-buffered simulation state for interpolated drawing
    prev_state: State,
    next_state: State,
}

impl<State, StepFn, DrawFn, OnKeyFn> winit::application::ApplicationHandler
    for AnimationApp<State, StepFn, DrawFn, OnKeyFn>
where
    State: crate::AnimationState,
    StepFn: FnMut(&mut State),
    DrawFn: FnMut(&State, &mut crate::Painter),
    OnKeyFn: FnMut(crate::KeyCode, &mut State),
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match futures::executor::block_on(ActiveRenderWindow::create(
            event_loop,
            self.window_params,
        )) {
            Ok(active_win) => {
                let renderer = pl::Renderer::new(&active_win, &self.anim.params);
                self.window = Some((active_win, renderer));
                self.frame_start_t = Instant::now();
            }
            Err(err) => {
                log::error!("{err}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    /// step and draw in about_to_wait
    /// to keep the loop going without waiting on redraw requests
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let Some((window, renderer)) = self.window.as_mut() else {
            return;
        };
        if window.surface_config.width == 0 || window.surface_config.height == 0 {
            // minimized, nothing to draw on
            return;
        }

        // step as many times as the timing mode asks for

        let since_last_draw = self.frame_start_t.elapsed().as_secs_f64();
        let steps = self.clock.advance(since_last_draw);
        for _ in 0..steps {
            self.prev_state = self.next_state.clone();
            (self.anim.step)(&mut self.next_state);
        }

        // draw

        self.frame_start_t = Instant::now();

        let Some(mut ctx) = window.begin_frame(self.anim.params.background) else {
            return;
        };
        renderer
            .resources
            .upload_frame_uniforms(&self.camera, &mut ctx);

        let mut painter = pl::Painter {
            ctx: &mut ctx,
            rend: renderer,
        };

        if self.clock.interpolates() {
            let interpolated_state = State::interpolate(
                &self.prev_state,
                &self.next_state,
                self.clock.interpolation_factor(),
            );
            (self.anim.draw)(&interpolated_state, &mut painter);
        } else {
            (self.anim.draw)(&self.next_state, &mut painter);
        }

        ctx.ensure_cleared();
        ctx.queue.submit(Some(ctx.encoder.finish()));
        renderer.end_frame();
        ctx.surface_tex.present();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some((window, _)) = self.window.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                window.resize_swapchain(new_size);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let (ElementState::Pressed, PhysicalKey::Code(code)) =
                    (event.state, event.physical_key)
                {
                    (self.anim.on_key)(code, &mut self.next_state);
                    // keep the interpolation source in sync with changes made here,
                    // otherwise a reset would be drawn as a smear between two states
                    self.prev_state = self.next_state.clone();
                    if code == KeyCode::KeyQ {
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }
}
