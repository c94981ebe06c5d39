use super::{Config, DispatchMode, Manager};
use crate::display_action::DisplayAction;
use crate::display_servers::DisplayServer;
use crate::models::{ClientHandle, Handle};

impl<H: Handle, C: Config, SERVER: DisplayServer<H>> Manager<H, C, SERVER> {
    /// Pointer motion while a move drag is active. Floating clients track
    /// the pointer live; tiled clients wait for release to swap slots.
    pub fn client_move_handler(&mut self, handle: &ClientHandle<H>, x: i32, y: i32) -> bool {
        if self.state.mode != DispatchMode::Moving(*handle) {
            return false;
        }
        let Some((dx, dy)) = self.drag_delta(x, y) else {
            return false;
        };
        let border = self.state.border_width;
        let Some(client) = self.state.client_mut(handle) else {
            return false;
        };
        let mut rect = client.float_geometry.unwrap_or(client.geometry);
        rect.x += dx;
        rect.y += dy;
        client.float_geometry = Some(rect);
        if client.is_floating() {
            client.geometry = rect;
            let action = DisplayAction::MoveResize(*handle, rect, client.border(border));
            self.state.actions.push_back(action);
        }
        false
    }

    /// Pointer motion while a resize drag is active. Only floating
    /// clients resize; size hints are enforced on release.
    pub fn client_resize_handler(&mut self, handle: &ClientHandle<H>, x: i32, y: i32) -> bool {
        if self.state.mode != DispatchMode::Resizing(*handle) {
            return false;
        }
        let Some((dx, dy)) = self.drag_delta(x, y) else {
            return false;
        };
        let border = self.state.border_width;
        let Some(client) = self.state.client_mut(handle) else {
            return false;
        };
        if !client.is_floating() {
            return false;
        }
        let mut rect = client.float_geometry.unwrap_or(client.geometry);
        rect.width = grow(rect.width, dx);
        rect.height = grow(rect.height, dy);
        client.float_geometry = Some(rect);
        client.geometry = rect;
        let action = DisplayAction::MoveResize(*handle, rect, client.border(border));
        self.state.actions.push_back(action);
        false
    }

    /// The drag (or chain) ended; settle whatever it was doing.
    pub fn normal_mode_handler(&mut self) -> bool {
        self.abort_chain();
        let mode = std::mem::take(&mut self.state.mode);
        let release = self.drag_point.take();
        self.state.actions.push_back(DisplayAction::NormalMode);
        match mode {
            DispatchMode::Moving(handle) => {
                if let Some((x, y)) = release {
                    self.settle_move(&handle, x, y);
                }
                self.state.update_visibility();
                self.state.apply_placement();
                self.state.sort_clients();
                true
            }
            DispatchMode::Resizing(handle) => {
                if let Some(client) = self.state.client_mut(&handle) {
                    if let Some(rect) = client.float_geometry {
                        client.float_geometry = Some(client.hints.constrain(rect));
                    }
                }
                self.state.apply_placement();
                self.state.sort_clients();
                true
            }
            _ => false,
        }
    }

    /// A tiled client dropped over another trades slots with it; a
    /// floating client stays where the drag left it and adopts the
    /// screen it was released on.
    fn settle_move(&mut self, handle: &ClientHandle<H>, x: i32, y: i32) {
        let Some(client) = self.state.client(handle) else {
            return;
        };
        if !client.is_tiled() {
            if let Some(screen) = self.state.screen_for_point(x, y) {
                if let Some(client) = self.state.client_mut(handle) {
                    client.screen = screen;
                }
            }
            return;
        }
        // tiled clients never keep the drag rectangle
        let my_gravity = client.gravity;
        if let Some(client) = self.state.client_mut(handle) {
            client.float_geometry = None;
        }
        let target = self
            .state
            .client_at_point(x, y)
            .filter(|c| c.handle != *handle)
            .map(|c| (c.handle, c.gravity));
        let Some((other, other_gravity)) = target else {
            return;
        };
        if let Some(client) = self.state.client_mut(handle) {
            client.gravity = other_gravity;
        }
        if let Some(client) = self.state.client_mut(&other) {
            client.gravity = my_gravity;
        }
    }

    fn drag_delta(&mut self, x: i32, y: i32) -> Option<(i32, i32)> {
        let (px, py) = self.drag_point.replace((x, y))?;
        Some((x - px, y - py))
    }
}

/// Widen or shrink a dimension without collapsing it.
fn grow(dim: u32, delta: i32) -> u32 {
    let next = i64::from(dim) + i64::from(delta);
    u32::try_from(next.max(1)).unwrap_or(1)
}
