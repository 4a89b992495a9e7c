#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use novade_view_core::config::ViewCoreConfig;
use novade_view_core::input::{CursorMode, InputCollaborator, ResizeEdges};
use novade_view_core::layer_shell::{Anchor, Layer, LayerState};
use novade_view_core::provider::{Configure, LayerProvider, Serial, SizeConstraints, SurfaceEvent, SurfaceProvider};
use novade_view_core::types::{OutputId, Point, ProviderId, Rect, SeatHandle, Size, ViewId};
use novade_view_core::view::ViewGeometry;
use novade_view_core::Desktop;

fn next_provider_id() -> ProviderId {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    ProviderId(NEXT.fetch_add(1, Ordering::Relaxed))
}

/// Records everything the core asks of a surface.
#[derive(Debug)]
pub struct FakeSurface {
    id: ProviderId,
    pub size: Cell<Size<u32>>,
    pub offset: Cell<Point<i32>>,
    pub constraints: Cell<SizeConstraints>,
    pub configures: RefCell<Vec<Configure>>,
    pub closed: Cell<bool>,
    pub terminated: Cell<bool>,
    pub unconstrained: RefCell<Vec<Rect>>,
    pub entered: RefCell<Vec<OutputId>>,
    pub left: RefCell<Vec<OutputId>>,
    pub subsurfaces: RefCell<Vec<Rc<FakeSurface>>>,
}

impl FakeSurface {
    pub fn new(width: u32, height: u32) -> Rc<Self> {
        Rc::new(Self {
            id: next_provider_id(),
            size: Cell::new(Size::new(width, height)),
            offset: Cell::new(Point::new(0, 0)),
            constraints: Cell::new(SizeConstraints::default()),
            configures: RefCell::new(Vec::new()),
            closed: Cell::new(false),
            terminated: Cell::new(false),
            unconstrained: RefCell::new(Vec::new()),
            entered: RefCell::new(Vec::new()),
            left: RefCell::new(Vec::new()),
            subsurfaces: RefCell::new(Vec::new()),
        })
    }

    pub fn at(width: u32, height: u32, x: i32, y: i32) -> Rc<Self> {
        let surface = Self::new(width, height);
        surface.offset.set(Point::new(x, y));
        surface
    }

    pub fn provider_id(&self) -> ProviderId {
        self.id
    }

    pub fn last_serial(&self) -> Option<Serial> {
        self.configures.borrow().iter().rev().find_map(|c| c.serial)
    }

    pub fn last_configure(&self) -> Option<Configure> {
        self.configures.borrow().last().copied()
    }
}

impl SurfaceProvider for FakeSurface {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn committed_size(&self) -> Size<u32> {
        self.size.get()
    }

    fn send_configure(&self, configure: &Configure) {
        self.configures.borrow_mut().push(*configure);
    }

    fn send_close(&self) {
        self.closed.set(true);
    }

    fn terminate_client(&self) {
        self.terminated.set(true);
    }

    fn size_constraints(&self) -> SizeConstraints {
        self.constraints.get()
    }

    fn offset(&self) -> Point<i32> {
        self.offset.get()
    }

    fn subsurfaces(&self) -> Vec<Rc<dyn SurfaceProvider>> {
        self.subsurfaces
            .borrow()
            .iter()
            .map(|s| Rc::clone(s) as Rc<dyn SurfaceProvider>)
            .collect()
    }

    fn unconstrain(&self, bounds: Rect) {
        self.unconstrained.borrow_mut().push(bounds);
    }

    fn output_enter(&self, output: OutputId) {
        self.entered.borrow_mut().push(output);
    }

    fn output_leave(&self, output: OutputId) {
        self.left.borrow_mut().push(output);
    }
}

/// A layer-shell client with mutable committed state.
#[derive(Debug)]
pub struct FakeLayer {
    pub surface: Rc<FakeSurface>,
    pub state: Cell<LayerState>,
    pub output: Cell<Option<OutputId>>,
}

impl FakeLayer {
    pub fn new(state: LayerState) -> Rc<Self> {
        Rc::new(Self {
            surface: FakeSurface::new(0, 0),
            state: Cell::new(state),
            output: Cell::new(None),
        })
    }

    /// A panel anchored to the top edge reserving `zone` pixels.
    pub fn top_panel(width: u32, zone: i32) -> Rc<Self> {
        Self::new(LayerState {
            anchor: Anchor::TOP,
            exclusive_zone: zone,
            desired_size: Size::new(width, zone.max(0) as u32),
            ..LayerState::new(Layer::Top)
        })
    }

    pub fn provider_id(&self) -> ProviderId {
        self.surface.provider_id()
    }
}

impl SurfaceProvider for FakeLayer {
    fn id(&self) -> ProviderId {
        self.surface.id()
    }

    fn committed_size(&self) -> Size<u32> {
        self.surface.committed_size()
    }

    fn send_configure(&self, configure: &Configure) {
        self.surface.send_configure(configure);
    }

    fn send_close(&self) {
        self.surface.send_close();
    }

    fn terminate_client(&self) {
        self.surface.terminate_client();
    }
}

impl LayerProvider for FakeLayer {
    fn layer_state(&self) -> LayerState {
        self.state.get()
    }

    fn requested_output(&self) -> Option<OutputId> {
        self.output.get()
    }
}

/// What the core asked of the seat side.
#[derive(Debug)]
pub struct InputLog {
    pub mode: Option<CursorMode>,
    pub moves: Vec<(SeatHandle, ViewId, ViewGeometry)>,
    pub resizes: Vec<(SeatHandle, ViewId, ResizeEdges)>,
    pub focus: Vec<Option<ViewId>>,
}

impl Default for InputLog {
    fn default() -> Self {
        Self {
            mode: Some(CursorMode::Passthrough),
            moves: Vec::new(),
            resizes: Vec::new(),
            focus: Vec::new(),
        }
    }
}

pub struct FakeInput(pub Rc<RefCell<InputLog>>);

impl InputCollaborator for FakeInput {
    fn cursor_mode(&self, _seat: SeatHandle) -> Option<CursorMode> {
        self.0.borrow().mode
    }

    fn begin_move(&mut self, seat: SeatHandle, view: ViewId, geometry: ViewGeometry) {
        self.0.borrow_mut().moves.push((seat, view, geometry));
    }

    fn begin_resize(&mut self, seat: SeatHandle, view: ViewId, _geometry: ViewGeometry, edges: ResizeEdges) {
        self.0.borrow_mut().resizes.push((seat, view, edges));
    }

    fn focus_changed(&mut self, view: Option<ViewId>) {
        self.0.borrow_mut().focus.push(view);
    }
}

/// A desktop that leaves new views where they are.
pub fn desktop() -> (Desktop, Rc<RefCell<InputLog>>) {
    let mut config = ViewCoreConfig::default();
    config.placement.center_new_views = false;
    desktop_with(config)
}

pub fn desktop_with(config: ViewCoreConfig) -> (Desktop, Rc<RefCell<InputLog>>) {
    let log = Rc::new(RefCell::new(InputLog::default()));
    let desktop = Desktop::new(config, Box::new(FakeInput(Rc::clone(&log))));
    (desktop, log)
}

pub fn full_hd(desktop: &mut Desktop) -> OutputId {
    desktop.add_output("eDP-1", Rect::new(0, 0, 1920, 1080))
}

pub fn map(desktop: &mut Desktop, surface: &FakeSurface) {
    desktop.dispatch(surface.provider_id(), SurfaceEvent::Map);
}

/// Commits the surface's current size, acknowledging the latest configure.
pub fn ack_commit(desktop: &mut Desktop, surface: &FakeSurface) {
    desktop.dispatch(
        surface.provider_id(),
        SurfaceEvent::Commit {
            acked_serial: surface.last_serial(),
        },
    );
}
