use eframe::egui::Context;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(pub u64);

pub trait FrameScheduler {
    fn request_tick(&mut self) -> TickHandle;
    fn cancel_tick(&mut self, handle: TickHandle);
}

pub struct RepaintScheduler {
    ctx: Context,
    next_handle: u64,
}

impl RepaintScheduler {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            next_handle: 0,
        }
    }
}

impl FrameScheduler for RepaintScheduler {
    fn request_tick(&mut self) -> TickHandle {
        self.next_handle = self.next_handle.wrapping_add(1);
        self.ctx.request_repaint();
        TickHandle(self.next_handle)
    }

    fn cancel_tick(&mut self, _handle: TickHandle) {}
}

/// Self-rescheduling frame callback: at most one tick is ever pending.
#[derive(Debug, Default)]
pub struct SimulationLoop {
    pending: Option<TickHandle>,
}

impl SimulationLoop {
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.pending.is_none() {
            self.pending = Some(scheduler.request_tick());
        }
    }

    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_tick(handle);
        }
    }

    pub fn claim(&mut self) -> Option<TickHandle> {
        self.pending.take()
    }
}
