use std::fmt;

use crate::input::InputEvent;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceState {
    Uninitialized,
    Initialized,
    /// Terminal. Reached through `destroy`.
    Destroyed,
}

/// Why a frame could not be acquired.
#[derive(Debug)]
pub enum FrameError {
    /// Surface has to be reconfigured before the next frame.
    Lost,
    Outdated,
    Timeout,
    Other(anyhow::Error),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Lost => write!(f, "surface lost"),
            FrameError::Outdated => write!(f, "surface outdated"),
            FrameError::Timeout => write!(f, "timed out acquiring the next frame"),
            FrameError::Other(e) => write!(f, "frame acquisition failed: {e:#}"),
        }
    }
}

impl std::error::Error for FrameError {}

/// Per-frame data handed to `Scene::render`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameInfo {
    /// Number of frames presented before this one.
    pub number: u64,
    pub width: u32,
    pub height: u32,
}

impl FrameInfo {
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// The platform window the surface lives in.
pub trait SurfaceHost {
    type Context: RenderContext;

    /// Whether any part of the window is currently visible.
    fn is_exposed(&self) -> bool;
    fn size(&self) -> (u32, u32);
    fn create_context(&mut self) -> anyhow::Result<Self::Context>;
    /// Ask the platform for one update callback, normally at the next vsync.
    fn schedule_update(&mut self);
}

/// A rendering context bound to one surface.
pub trait RenderContext {
    type Frame;

    fn make_current(&mut self);
    fn begin_frame(&mut self) -> Result<Self::Frame, FrameError>;
    fn present(&mut self, frame: Self::Frame);
    fn configure(&mut self, width: u32, height: u32);
}

/// User code drawn into a `RenderSurface`.
pub trait Scene<C: RenderContext> {
    /// Called exactly once, before the first `render`.
    fn initialize(&mut self, ctx: &mut C) -> anyhow::Result<()>;

    fn render(&mut self, ctx: &mut C, frame: &C::Frame, info: &FrameInfo);

    fn resize(&mut self, _ctx: &mut C, _width: u32, _height: u32) {}

    /// Free GPU resources. The context is current while this runs.
    fn release(&mut self, _ctx: &mut C) {}

    /// Returns `true` if the event requires a repaint.
    fn input(&mut self, _event: &InputEvent) -> bool {
        false
    }

    /// Animated scenes get a new frame scheduled after every present.
    fn is_animated(&self) -> bool {
        false
    }
}

impl<C: RenderContext, S: Scene<C> + ?Sized> Scene<C> for Box<S> {
    fn initialize(&mut self, ctx: &mut C) -> anyhow::Result<()> {
        (**self).initialize(ctx)
    }
    fn render(&mut self, ctx: &mut C, frame: &C::Frame, info: &FrameInfo) {
        (**self).render(ctx, frame, info)
    }
    fn resize(&mut self, ctx: &mut C, width: u32, height: u32) {
        (**self).resize(ctx, width, height)
    }
    fn release(&mut self, ctx: &mut C) {
        (**self).release(ctx)
    }
    fn input(&mut self, event: &InputEvent) -> bool {
        (**self).input(event)
    }
    fn is_animated(&self) -> bool {
        (**self).is_animated()
    }
}

/// Creates its context once, initializes the scene once, then renders per frame.
pub struct RenderSurface<H, S>
where
    H: SurfaceHost,
    S: Scene<H::Context>,
{
    host: H,
    scene: S,
    context: Option<H::Context>,
    state: SurfaceState,
    redraw_pending: bool,
    frame_number: u64,
}

impl<H, S> RenderSurface<H, S>
where
    H: SurfaceHost,
    S: Scene<H::Context>,
{
    pub fn new(host: H, scene: S) -> Self {
        Self {
            host,
            scene,
            context: None,
            state: SurfaceState::Uninitialized,
            redraw_pending: false,
            frame_number: 0,
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == SurfaceState::Initialized
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn is_redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn context(&self) -> Option<&H::Context> {
        self.context.as_ref()
    }

    /// Schedules a render for the next update callback. Calls made while one
    /// is already pending are folded into it.
    pub fn request_redraw(&mut self) {
        if self.redraw_pending {
            return;
        }
        self.redraw_pending = true;
        self.host.schedule_update();
    }

    /// The platform's update callback.
    pub fn on_update_request(&mut self) {
        self.redraw_pending = false;
        self.render_now();
    }

    pub fn on_exposed(&mut self) {
        self.render_now();
    }

    /// Sets up on first exposure, then passes every non-empty geometry change
    /// to the context and scene, hidden or not.
    pub fn on_resized(&mut self, width: u32, height: u32) {
        self.ensure_initialized();
        if let Some(ctx) = self.context.as_mut().filter(|_| width > 0 && height > 0) {
            ctx.configure(width, height);
            self.scene.resize(ctx, width, height);
        }
        self.render_now();
    }

    /// Forwards an input event to the scene, scheduling a repaint if it asks for one.
    pub fn handle_input(&mut self, event: &InputEvent) {
        if self.scene.input(event) {
            self.request_redraw();
        }
    }

    /// Renders and presents one frame. Does nothing while the host is hidden.
    pub fn render_now(&mut self) {
        if !self.ensure_initialized() {
            return;
        }
        let Some(ctx) = self.context.as_mut() else {
            return;
        };

        let frame = match ctx.begin_frame() {
            Ok(frame) => frame,
            Err(FrameError::Lost | FrameError::Outdated) => {
                let (width, height) = self.host.size();
                log::debug!("Surface lost or outdated, reconfiguring to {width}x{height}");
                ctx.configure(width, height);
                self.request_redraw();
                return;
            }
            Err(e @ FrameError::Timeout) => {
                log::warn!("Dropping frame {}: {e}", self.frame_number);
                return;
            }
            Err(e) => {
                log::error!("Dropping frame {}: {e}", self.frame_number);
                return;
            }
        };

        let (width, height) = self.host.size();
        let info = FrameInfo {
            number: self.frame_number,
            width,
            height,
        };
        self.scene.render(ctx, &frame, &info);
        ctx.present(frame);
        self.frame_number += 1;

        if self.scene.is_animated() {
            self.request_redraw();
        }
    }

    /// Releases the scene's resources and then the context. Idempotent.
    pub fn destroy(&mut self) {
        if let Some(mut ctx) = self.context.take() {
            log::debug!("Releasing surface after {} frames", self.frame_number);
            ctx.make_current();
            self.scene.release(&mut ctx);
            drop(ctx);
        }
        self.state = SurfaceState::Destroyed;
        self.redraw_pending = false;
    }

    // Returns whether a context exists and the host is visible.
    fn ensure_initialized(&mut self) -> bool {
        if self.state == SurfaceState::Destroyed || !self.host.is_exposed() {
            return false;
        }
        if self.context.is_some() {
            return true;
        }

        let mut ctx = match self.host.create_context() {
            Ok(ctx) => ctx,
            Err(e) => {
                log::error!("Unable to create rendering context: {e:#}");
                return false;
            }
        };
        ctx.make_current();
        if let Err(e) = self.scene.initialize(&mut ctx) {
            log::warn!("Scene initialization failed: {e:#}");
        }
        self.context = Some(ctx);
        self.state = SurfaceState::Initialized;
        log::debug!("Surface initialized");
        true
    }
}

impl<H, S> Drop for RenderSurface<H, S>
where
    H: SurfaceHost,
    S: Scene<H::Context>,
{
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Journal = Rc<RefCell<Vec<&'static str>>>;

    struct FakeHost {
        exposed: bool,
        size: (u32, u32),
        fail_context: bool,
        scheduled: usize,
        journal: Journal,
        frame_results: Rc<RefCell<Vec<FrameError>>>,
    }

    struct FakeContext {
        journal: Journal,
        frame_results: Rc<RefCell<Vec<FrameError>>>,
        configured: Vec<(u32, u32)>,
    }

    impl SurfaceHost for FakeHost {
        type Context = FakeContext;

        fn is_exposed(&self) -> bool {
            self.exposed
        }
        fn size(&self) -> (u32, u32) {
            self.size
        }
        fn create_context(&mut self) -> anyhow::Result<FakeContext> {
            if self.fail_context {
                anyhow::bail!("no adapter");
            }
            self.journal.borrow_mut().push("create_context");
            Ok(FakeContext {
                journal: self.journal.clone(),
                frame_results: self.frame_results.clone(),
                configured: Vec::new(),
            })
        }
        fn schedule_update(&mut self) {
            self.scheduled += 1;
        }
    }

    impl RenderContext for FakeContext {
        type Frame = ();

        fn make_current(&mut self) {
            self.journal.borrow_mut().push("make_current");
        }
        fn begin_frame(&mut self) -> Result<(), FrameError> {
            match self.frame_results.borrow_mut().pop() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
        fn present(&mut self, _frame: ()) {
            self.journal.borrow_mut().push("present");
        }
        fn configure(&mut self, width: u32, height: u32) {
            self.configured.push((width, height));
        }
    }

    impl Drop for FakeContext {
        fn drop(&mut self) {
            self.journal.borrow_mut().push("drop_context");
        }
    }

    #[derive(Default)]
    struct CountingScene {
        journal: Journal,
        frames: Vec<FrameInfo>,
        resized: Vec<(u32, u32)>,
        animated: bool,
        fail_init: bool,
    }

    impl Scene<FakeContext> for CountingScene {
        fn initialize(&mut self, _ctx: &mut FakeContext) -> anyhow::Result<()> {
            self.journal.borrow_mut().push("initialize");
            if self.fail_init {
                anyhow::bail!("shader link failed");
            }
            Ok(())
        }
        fn render(&mut self, _ctx: &mut FakeContext, _frame: &(), info: &FrameInfo) {
            self.journal.borrow_mut().push("render");
            self.frames.push(*info);
        }
        fn resize(&mut self, _ctx: &mut FakeContext, width: u32, height: u32) {
            self.resized.push((width, height));
        }
        fn release(&mut self, _ctx: &mut FakeContext) {
            self.journal.borrow_mut().push("release");
        }
        fn input(&mut self, event: &InputEvent) -> bool {
            matches!(event, InputEvent::Wheel(_))
        }
        fn is_animated(&self) -> bool {
            self.animated
        }
    }

    fn surface() -> (RenderSurface<FakeHost, CountingScene>, Journal) {
        let journal: Journal = Rc::default();
        let host = FakeHost {
            exposed: true,
            size: (640, 480),
            fail_context: false,
            scheduled: 0,
            journal: journal.clone(),
            frame_results: Rc::default(),
        };
        let scene = CountingScene {
            journal: journal.clone(),
            ..Default::default()
        };
        (RenderSurface::new(host, scene), journal)
    }

    fn count(journal: &Journal, entry: &str) -> usize {
        journal.borrow().iter().filter(|e| **e == entry).count()
    }

    #[test]
    fn redraw_requests_are_coalesced() {
        let (mut surface, journal) = surface();
        for _ in 0..5 {
            surface.request_redraw();
        }
        assert_eq!(surface.host().scheduled, 1);
        assert!(surface.is_redraw_pending());

        surface.on_update_request();
        assert_eq!(count(&journal, "render"), 1);
        assert!(!surface.is_redraw_pending());

        surface.request_redraw();
        surface.request_redraw();
        assert_eq!(surface.host().scheduled, 2);
        surface.on_update_request();
        assert_eq!(count(&journal, "render"), 2);
    }

    #[test]
    fn first_exposure_initializes_once() {
        let (mut surface, journal) = surface();
        assert_eq!(surface.state(), SurfaceState::Uninitialized);

        surface.on_exposed();
        surface.on_exposed();
        surface.on_update_request();

        assert_eq!(surface.state(), SurfaceState::Initialized);
        assert_eq!(count(&journal, "create_context"), 1);
        assert_eq!(count(&journal, "initialize"), 1);
        assert_eq!(count(&journal, "render"), 3);
        assert_eq!(
            &journal.borrow()[..4],
            &["create_context", "make_current", "initialize", "render"]
        );
    }

    #[test]
    fn hidden_surface_does_not_render() {
        let (mut surface, journal) = surface();
        surface.host_mut().exposed = false;
        surface.on_exposed();
        surface.on_resized(100, 100);
        assert_eq!(surface.state(), SurfaceState::Uninitialized);
        assert!(journal.borrow().is_empty(), "no context to resize before the first exposure");

        surface.host_mut().exposed = true;
        surface.on_exposed();
        assert!(surface.is_initialized());
        assert_eq!(count(&journal, "render"), 1);
    }

    #[test]
    fn resize_while_hidden_reaches_context_and_scene() {
        let (mut surface, journal) = surface();
        surface.on_exposed();

        surface.host_mut().exposed = false;
        surface.host_mut().size = (800, 600);
        surface.on_resized(800, 600);
        assert_eq!(count(&journal, "render"), 1, "hidden surfaces are not drawn");
        assert_eq!(surface.context().map(|c| c.configured.clone()), Some(vec![(800, 600)]));
        assert_eq!(surface.scene().resized, vec![(800, 600)]);

        surface.host_mut().exposed = true;
        surface.on_exposed();
        let last = surface.scene().frames.last().copied();
        assert_eq!(last.map(|f| (f.width, f.height)), Some((800, 600)));
    }

    #[test]
    fn empty_resize_is_ignored() {
        let (mut surface, _journal) = surface();
        surface.on_exposed();
        surface.on_resized(0, 600);
        assert_eq!(surface.context().map(|c| c.configured.len()), Some(0));
        assert!(surface.scene().resized.is_empty());
    }

    #[test]
    fn resize_sets_up_before_configuring() {
        let (mut surface, journal) = surface();
        surface.on_resized(800, 600);
        assert!(surface.is_initialized());
        assert_eq!(count(&journal, "initialize"), 1);
        assert_eq!(surface.context().map(|c| c.configured.clone()), Some(vec![(800, 600)]));
        assert_eq!(surface.scene().resized, vec![(800, 600)]);
        assert_eq!(count(&journal, "render"), 1);

        surface.on_resized(1024, 768);
        assert_eq!(count(&journal, "initialize"), 1);
        assert_eq!(count(&journal, "render"), 2);
    }

    #[test]
    fn frame_info_counts_presented_frames() {
        let (mut surface, _journal) = surface();
        surface.on_exposed();
        surface.on_exposed();
        surface.on_exposed();
        let numbers: Vec<u64> = surface.scene().frames.iter().map(|f| f.number).collect();
        assert_eq!(numbers, vec![0, 1, 2]);
        assert_eq!(surface.scene().frames[0].width, 640);
        assert_eq!(surface.frame_number(), 3);
    }

    #[test]
    fn failed_context_creation_stays_uninitialized() {
        let (mut surface, journal) = surface();
        surface.host_mut().fail_context = true;
        surface.on_exposed();
        assert_eq!(surface.state(), SurfaceState::Uninitialized);
        assert_eq!(count(&journal, "initialize"), 0);

        surface.host_mut().fail_context = false;
        surface.on_exposed();
        assert!(surface.is_initialized());
    }

    #[test]
    fn failed_initialize_keeps_rendering() {
        let (mut surface, journal) = surface();
        surface.scene_mut().fail_init = true;
        surface.on_exposed();
        assert!(surface.is_initialized());
        assert_eq!(count(&journal, "render"), 1);
    }

    #[test]
    fn lost_frame_reconfigures_and_retries() {
        let (mut surface, journal) = surface();
        surface.on_exposed();
        surface.host().frame_results.borrow_mut().push(FrameError::Lost);

        surface.on_exposed();
        assert_eq!(count(&journal, "render"), 1, "lost frame is dropped");
        assert_eq!(surface.context().map(|c| c.configured.clone()), Some(vec![(640, 480)]));
        assert!(surface.is_redraw_pending());

        surface.on_update_request();
        assert_eq!(count(&journal, "render"), 2);
    }

    #[test]
    fn timeout_drops_the_frame() {
        let (mut surface, journal) = surface();
        surface.on_exposed();
        surface.host().frame_results.borrow_mut().push(FrameError::Timeout);
        surface.on_exposed();
        assert_eq!(count(&journal, "render"), 1);
        assert!(!surface.is_redraw_pending());
        assert_eq!(surface.frame_number(), 1);
    }

    #[test]
    fn outdated_frame_reconfigures_and_retries() {
        let (mut surface, journal) = surface();
        surface.on_exposed();
        surface.host_mut().size = (320, 200);
        surface.host().frame_results.borrow_mut().push(FrameError::Outdated);

        surface.on_exposed();
        assert_eq!(count(&journal, "render"), 1);
        assert_eq!(surface.frame_number(), 1);
        assert_eq!(surface.context().map(|c| c.configured.clone()), Some(vec![(320, 200)]));
        assert!(surface.is_redraw_pending());
    }

    #[test]
    fn other_frame_error_drops_the_frame() {
        let (mut surface, journal) = surface();
        surface.on_exposed();
        surface
            .host()
            .frame_results
            .borrow_mut()
            .push(FrameError::Other(anyhow::anyhow!("device lost")));

        surface.on_exposed();
        assert_eq!(count(&journal, "render"), 1);
        assert_eq!(surface.frame_number(), 1);
        assert!(!surface.is_redraw_pending());
        assert_eq!(surface.context().map(|c| c.configured.len()), Some(0));

        surface.on_exposed();
        assert_eq!(count(&journal, "render"), 2, "next frame renders normally");
    }

    #[test]
    fn animated_scene_schedules_next_frame() {
        let (mut surface, journal) = surface();
        surface.scene_mut().animated = true;
        surface.on_exposed();
        assert!(surface.is_redraw_pending());
        assert_eq!(surface.host().scheduled, 1);

        surface.on_update_request();
        assert_eq!(count(&journal, "render"), 2);
        assert_eq!(surface.host().scheduled, 2);
    }

    #[test]
    fn input_requests_redraw_when_scene_asks() {
        let (mut surface, _journal) = surface();
        surface.handle_input(&InputEvent::KeyDown(crate::input::Key::W));
        assert!(!surface.is_redraw_pending());
        surface.handle_input(&InputEvent::Wheel(crate::input::WheelInput::pixels(1)));
        surface.handle_input(&InputEvent::Wheel(crate::input::WheelInput::pixels(1)));
        assert_eq!(surface.host().scheduled, 1);
    }

    #[test]
    fn destroy_releases_under_current_context() {
        let (mut surface, journal) = surface();
        surface.on_exposed();
        journal.borrow_mut().clear();

        drop(surface);
        assert_eq!(
            *journal.borrow(),
            vec!["make_current", "release", "drop_context"]
        );
    }

    #[test]
    fn destroy_is_idempotent_and_never_renders() {
        let (mut surface, journal) = surface();
        surface.on_exposed();
        surface.request_redraw();
        surface.destroy();
        surface.destroy();
        surface.on_update_request();
        surface.on_exposed();
        assert_eq!(surface.state(), SurfaceState::Destroyed);
        assert_eq!(count(&journal, "release"), 1);
        assert_eq!(count(&journal, "create_context"), 1);
        assert_eq!(count(&journal, "render"), 1);
        assert!(!surface.is_redraw_pending());
    }

    #[test]
    fn destroy_before_initialization_is_a_no_op() {
        let (surface, journal) = surface();
        drop(surface);
        assert!(journal.borrow().is_empty());
    }
}
