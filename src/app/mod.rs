use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Context, Event, Id, Rect, UserData, Vec2, ViewportCommand};

use crate::host::{
    HostEvent, JsonLinesSink, LogSink, OutboundMessage, OutboundSink, SettingsPatch,
    spawn_snapshot_loader, spawn_stdin_reader,
};

mod camera;
mod focus;
mod graph;
mod physics;
mod render_utils;
mod screenshot;
mod search;
mod settings;
mod ui;


use camera::Camera;
use focus::FocusState;
use graph::{GraphModel, LayoutNode, PointerMode};
use physics::{FrameScheduler, PhysicsScratch, RepaintScheduler, SimulationLoop, StepMask, step_physics};
use render_utils::CategoryPalette;
use search::{NodeVisibility, SearchState, compute_visibility};
use settings::ViewSettings;

const CAMERA_MEMORY_KEY: &str = "target-graph-camera";

pub struct AppOptions {
    pub graph_path: Option<PathBuf>,
    pub startup_settings: Option<SettingsPatch>,
    pub stdio: bool,
}

pub struct TargetGraphApp {
    graph_path: Option<PathBuf>,
    startup_settings: Option<SettingsPatch>,
    host_tx: Sender<HostEvent>,
    host_rx: Receiver<HostEvent>,
    sink: Box<dyn OutboundSink>,
    view: Option<Box<GraphView>>,
    host_error: Option<String>,
}

struct GraphView {
    model: GraphModel,
    layout: Vec<LayoutNode>,
    camera: Camera,
    settings: ViewSettings,
    palette: CategoryPalette,
    search: SearchState,
    focus: FocusState,
    visibility: NodeVisibility,
    selected: Option<String>,
    pointer: PointerMode,
    sim_loop: SimulationLoop,
    scheduler: Box<dyn FrameScheduler>,
    scratch: PhysicsScratch,
    pinned: Vec<bool>,
    outbox: Vec<OutboundMessage>,
    /// Absolute screen rect of the canvas from the last draw.
    canvas: Rect,
    last_movement: f32,
    drag_paused: bool,
    camera_dirty: bool,
    measure_dirty: bool,
    pending_fit: bool,
    fit_on_first_update: bool,
    screenshot_requested: bool,
}

impl GraphView {
    pub(in crate::app) fn new(scheduler: Box<dyn FrameScheduler>, camera: Option<Camera>) -> Self {
        Self {
            model: GraphModel::default(),
            layout: Vec::new(),
            camera: camera.unwrap_or_default(),
            settings: ViewSettings::default(),
            palette: CategoryPalette::default(),
            search: SearchState::default(),
            focus: FocusState::default(),
            visibility: NodeVisibility::default(),
            selected: None,
            pointer: PointerMode::Idle,
            sim_loop: SimulationLoop::default(),
            scheduler,
            scratch: PhysicsScratch::default(),
            pinned: Vec::new(),
            outbox: Vec::new(),
            canvas: Rect::NOTHING,
            last_movement: 0.0,
            drag_paused: false,
            camera_dirty: false,
            measure_dirty: false,
            pending_fit: false,
            fit_on_first_update: camera.is_none(),
            screenshot_requested: false,
        }
    }

    pub(in crate::app) fn viewport(&self) -> Vec2 {
        if self.canvas.is_positive() {
            self.canvas.size()
        } else {
            Vec2::ZERO
        }
    }

    pub(in crate::app) fn is_simulating(&self) -> bool {
        self.sim_loop.is_running()
    }

    pub(in crate::app) fn refresh_visibility(&mut self) -> bool {
        let reachable = self.focus.is_active().then_some(&self.focus.reachable);
        let next = compute_visibility(&self.model.nodes, &self.search, reachable);
        let changed = next.filtered != self.visibility.filtered;
        self.visibility = next;
        changed
    }

    pub(in crate::app) fn restart_simulation(&mut self) {
        if self.settings.sim_enabled && !self.drag_paused && !self.model.is_empty() {
            self.sim_loop.start(self.scheduler.as_mut());
        }
    }

    pub(in crate::app) fn on_frame(&mut self) {
        if self.sim_loop.claim().is_none() || !self.settings.sim_enabled {
            return;
        }

        let dragged = self.pointer.dragged_id();
        let root = self.focus.root.as_deref();
        self.pinned.clear();
        self.pinned.extend(self.layout.iter().map(|node| {
            let id = Some(node.id.as_str());
            id == dragged || id == root
        }));

        let mask = StepMask {
            filtered: &self.visibility.filtered,
            pinned: &self.pinned,
        };
        let params = self.settings.sim;
        let mut settled = false;
        for _ in 0..params.steps_per_frame {
            let outcome = step_physics(
                &mut self.layout,
                &self.model.edges,
                &mask,
                &params,
                &mut self.scratch,
            );
            self.last_movement = outcome.movement;
            if outcome.movement < params.threshold {
                settled = true;
                break;
            }
        }

        if settled {
            log::debug!("layout settled, movement {:.3}", self.last_movement);
        } else {
            self.sim_loop.start(self.scheduler.as_mut());
        }
    }

    pub(in crate::app) fn drain_outbox(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.outbox)
    }

    pub(in crate::app) fn take_camera_update(&mut self) -> Option<Camera> {
        std::mem::take(&mut self.camera_dirty).then_some(self.camera)
    }

    pub(in crate::app) fn take_screenshot_request(&mut self) -> bool {
        std::mem::take(&mut self.screenshot_requested)
    }

    fn show(&mut self, ctx: &Context, host_error: &mut Option<String>, reload_requested: &mut bool) {
        egui::TopBottomPanel::top("toolbar")
            .resizable(false)
            .show(ctx, |ui| {
                self.draw_toolbar(ui, host_error, reload_requested);
                ui.separator();
                self.draw_filter_row(ui);
                if self.focus.is_active() {
                    ui.separator();
                    self.draw_breadcrumbs(ui);
                }
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        self.draw_settings_window(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }
}

impl TargetGraphApp {
    pub fn new(cc: &eframe::CreationContext<'_>, options: AppOptions) -> Self {
        let (host_tx, host_rx) = mpsc::channel();

        let sink: Box<dyn OutboundSink> = if options.stdio {
            let ctx = cc.egui_ctx.clone();
            spawn_stdin_reader(host_tx.clone(), move || ctx.request_repaint());
            Box::new(JsonLinesSink::new(std::io::stdout()))
        } else {
            Box::new(LogSink)
        };

        Self {
            graph_path: options.graph_path,
            startup_settings: options.startup_settings,
            host_tx,
            host_rx,
            sink,
            view: None,
            host_error: None,
        }
    }

    fn create_view(&mut self, ctx: &Context) -> Box<GraphView> {
        let camera = ctx.data(|data| data.get_temp::<Camera>(Id::new(CAMERA_MEMORY_KEY)));
        let mut view = Box::new(GraphView::new(
            Box::new(RepaintScheduler::new(ctx.clone())),
            camera,
        ));
        if let Some(patch) = &self.startup_settings {
            view.apply_settings(patch);
        }

        self.send(&OutboundMessage::Ready);
        if let Some(path) = &self.graph_path {
            let wake_ctx = ctx.clone();
            spawn_snapshot_loader(path.clone(), self.host_tx.clone(), move || {
                wake_ctx.request_repaint()
            });
        }
        log::info!("graph view ready");
        view
    }

    fn send(&mut self, message: &OutboundMessage) {
        if let Err(error) = self.sink.send(message) {
            log::warn!("failed to deliver outbound message: {error:#}");
            self.host_error = Some(format!("{error:#}"));
        }
    }

    fn pump_host_events(&mut self, view: &mut GraphView) {
        while let Ok(event) = self.host_rx.try_recv() {
            match event {
                Ok(message) => view.handle_inbound(message),
                Err(error) => {
                    log::warn!("host input failed: {error}");
                    self.host_error = Some(error);
                }
            }
        }
    }

    fn handle_screenshots(&mut self, ctx: &Context, view: &mut GraphView) {
        if view.take_screenshot_request() {
            ctx.send_viewport_cmd(ViewportCommand::Screenshot(UserData::default()));
        }

        let images = ctx.input(|input| {
            input
                .raw
                .events
                .iter()
                .filter_map(|event| match event {
                    Event::Screenshot { image, .. } => Some(image.clone()),
                    _ => None,
                })
                .collect::<Vec<_>>()
        });
        for image in images {
            let pixels_per_point = ctx.pixels_per_point();
            let cropped = screenshot::crop_to_canvas(&image, view.canvas, pixels_per_point);
            match screenshot::encode_png_data_uri(&cropped) {
                Ok(data_uri) => self.send(&OutboundMessage::SaveScreenshot { data_uri }),
                Err(error) => {
                    log::warn!("screenshot export failed: {error:#}");
                    self.host_error = Some(format!("{error:#}"));
                }
            }
        }
    }
}

impl eframe::App for TargetGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut view = match self.view.take() {
            Some(view) => view,
            None => self.create_view(ctx),
        };

        self.pump_host_events(&mut view);

        let mut reload_requested = false;
        view.show(ctx, &mut self.host_error, &mut reload_requested);

        self.handle_screenshots(ctx, &mut view);
        for message in view.drain_outbox() {
            self.send(&message);
        }
        if let Some(camera) = view.take_camera_update() {
            ctx.data_mut(|data| data.insert_temp(Id::new(CAMERA_MEMORY_KEY), camera));
        }

        if reload_requested {
            log::info!("reloading graph view");
            self.host_error = None;
            ctx.request_repaint();
        } else {
            self.view = Some(view);
        }
    }
}
