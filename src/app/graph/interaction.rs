use eframe::egui::{Pos2, Vec2};

use crate::host::OutboundMessage;

use super::super::GraphView;
use super::super::camera::{MINIMAP_ZOOM_STEP, WHEEL_ZOOM_STEP};

/// Pointer travel, in screen px, below which a press and release count as a click.
const CLICK_SLOP: f32 = 3.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub(in crate::app) enum PointerMode {
    #[default]
    Idle,
    Panning {
        origin: Pos2,
        last: Pos2,
        moved: bool,
    },
    DraggingNode {
        id: String,
        grab_offset: Vec2,
        origin: Pos2,
        moved: bool,
    },
    DraggingMinimap,
}

impl PointerMode {
    pub(in crate::app) fn dragged_id(&self) -> Option<&str> {
        match self {
            Self::DraggingNode { id, .. } => Some(id),
            _ => None,
        }
    }

    pub(in crate::app) fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl GraphView {
    pub(in crate::app) fn hit_test(&self, pos: Pos2) -> Option<usize> {
        self.layout
            .iter()
            .enumerate()
            .rev()
            .filter(|(index, _)| !self.visibility.is_filtered(*index))
            .find(|(_, node)| self.camera.world_rect_to_screen(node.world_rect()).contains(pos))
            .map(|(index, _)| index)
    }

    fn in_minimap(&self, pos: Pos2) -> bool {
        self.minimap_transform()
            .is_some_and(|transform| transform.frame().contains(pos))
    }

    pub(in crate::app) fn pointer_down(&mut self, pos: Pos2) {
        if !self.pointer.is_idle() {
            self.pointer_up(pos);
        }

        if self.in_minimap(pos) {
            self.pointer = PointerMode::DraggingMinimap;
            self.recenter_from_minimap(pos);
            return;
        }

        if let Some(index) = self.hit_test(pos) {
            let node = &self.layout[index];
            self.pointer = PointerMode::DraggingNode {
                id: node.id.clone(),
                grab_offset: node.pos - self.camera.screen_to_world(pos),
                origin: pos,
                moved: false,
            };
            if self.settings.auto_pause_drag {
                self.sim_loop.stop(self.scheduler.as_mut());
                self.drag_paused = true;
            }
            return;
        }

        self.pointer = PointerMode::Panning {
            origin: pos,
            last: pos,
            moved: false,
        };
    }

    pub(in crate::app) fn pointer_move(&mut self, pos: Pos2) {
        match &mut self.pointer {
            PointerMode::Idle => {}
            PointerMode::Panning {
                origin,
                last,
                moved,
            } => {
                self.camera.offset += pos - *last;
                *last = pos;
                if pos.distance(*origin) > CLICK_SLOP {
                    *moved = true;
                }
            }
            PointerMode::DraggingNode {
                id,
                grab_offset,
                origin,
                moved,
            } => {
                if !*moved && pos.distance(*origin) <= CLICK_SLOP {
                    return;
                }
                *moved = true;
                let target = self.camera.screen_to_world(pos) + *grab_offset;
                if let Some(index) = self.model.index_of(id) {
                    let node = &mut self.layout[index];
                    node.pos = target;
                    node.vel = Vec2::ZERO;
                }
                self.restart_simulation();
            }
            PointerMode::DraggingMinimap => self.recenter_from_minimap(pos),
        }
    }

    pub(in crate::app) fn pointer_up(&mut self, pos: Pos2) {
        self.pointer_move(pos);

        match std::mem::take(&mut self.pointer) {
            PointerMode::Idle => {}
            PointerMode::Panning { moved, .. } => {
                if moved {
                    self.camera_dirty = true;
                } else {
                    self.deselect();
                }
            }
            PointerMode::DraggingNode { id, moved, .. } => {
                if !moved {
                    self.select(id);
                }
                if self.drag_paused || moved {
                    self.drag_paused = false;
                    self.restart_simulation();
                }
            }
            PointerMode::DraggingMinimap => self.camera_dirty = true,
        }
    }

    pub(in crate::app) fn double_click(&mut self, pos: Pos2) {
        if self.in_minimap(pos) {
            return;
        }

        match self.hit_test(pos) {
            Some(index) => {
                let id = self.layout[index].id.clone();
                if self.focus.is_root(&id) {
                    self.recenter_focus_root();
                } else {
                    self.focus_on_node(&id);
                }
            }
            None => self.fit_to_view(),
        }
    }

    pub(in crate::app) fn wheel(&mut self, pos: Pos2, notches: f32) {
        if notches == 0.0 || !notches.is_finite() {
            return;
        }

        match self.minimap_transform() {
            Some(transform) if transform.frame().contains(pos) => {
                let world = transform.to_world(pos);
                let anchor = self.camera.world_to_screen(world);
                self.camera.zoom_at(anchor, MINIMAP_ZOOM_STEP.powf(notches));
            }
            _ => self.camera.zoom_at(pos, WHEEL_ZOOM_STEP.powf(notches)),
        }
        self.camera_dirty = true;
    }

    pub(in crate::app) fn select(&mut self, id: String) {
        log::debug!("selected {id}");
        self.outbox.push(OutboundMessage::NodeClick {
            target_id: id.clone(),
        });
        self.selected = Some(id);
    }

    pub(in crate::app) fn deselect(&mut self) {
        self.selected = None;
    }
}
