//! The whole model and every mutation of it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::display_action::{DisplayAction, PublishUpdate};
use crate::errors::{Result, SableError};
use crate::models::{
    remove_bit, Client, ClientHandle, ClientMode, DispatchMode, EntityKind, Gravity, Grabs, Handle,
    Rect, Registry, Screen, TagMask, Tags, View, DEFAULT_TAG,
};

#[derive(Serialize, Deserialize, Debug)]
pub struct State<H: Handle> {
    #[serde(bound = "")]
    pub clients: Vec<Client<H>>,
    pub tags: Tags,
    pub views: Vec<View>,
    pub screens: Vec<Screen>,
    pub gravities: Vec<Gravity>,
    pub grabs: Grabs,
    #[serde(bound = "")]
    pub registry: Registry<H>,
    #[serde(bound = "")]
    pub mode: DispatchMode<H>,
    #[serde(bound = "")]
    pub focused: Option<ClientHandle<H>>,
    #[serde(bound = "")]
    pub actions: VecDeque<DisplayAction<H>>,
    pub current_screen: usize,
    pub border_width: u32,
    pub focus_new_clients: bool,
}

impl<H: Handle> State<H> {
    pub(crate) fn new(config: &impl Config) -> Result<Self> {
        let mut tags = Tags::new();
        for tag in config.create_tags() {
            if tags.add_new(tag.clone()).is_none() {
                tracing::warn!("Ignoring tag {:?}: duplicate name or table full", tag.name);
            }
        }

        let views = config.create_views();
        let gravities = config.create_gravities();
        if views.is_empty() || gravities.is_empty() {
            return Err(SableError::IncompleteModel);
        }

        let mut grabs = Grabs::new();
        for grab in config.create_grabs() {
            if let Err(err) = grabs.add_new(grab) {
                tracing::warn!("Ignoring grab: {}", err);
            }
        }

        Ok(Self {
            clients: vec![],
            tags,
            views,
            screens: vec![],
            gravities,
            grabs,
            registry: Registry::new(),
            mode: DispatchMode::Normal,
            focused: None,
            actions: VecDeque::new(),
            current_screen: 0,
            border_width: config.border_width(),
            focus_new_clients: config.focus_new_clients(),
        })
    }

    // -- lookups ---------------------------------------------------------

    #[must_use]
    pub fn client(&self, handle: &ClientHandle<H>) -> Option<&Client<H>> {
        self.clients.get(self.registry.lookup_client(handle)?)
    }

    pub fn client_mut(&mut self, handle: &ClientHandle<H>) -> Option<&mut Client<H>> {
        let index = self.registry.lookup_client(handle)?;
        self.clients.get_mut(index)
    }

    /// Tag mask the screen currently shows.
    #[must_use]
    pub fn screen_tags(&self, screen: usize) -> TagMask {
        self.screens
            .get(screen)
            .and_then(|s| self.views.get(s.view))
            .map_or(0, |v| v.tags)
    }

    #[must_use]
    pub fn screen_for_point(&self, x: i32, y: i32) -> Option<usize> {
        self.screens.iter().position(|s| s.contains_point(x, y))
    }

    /// The first client in store order containing the point. Ties on
    /// shared edges therefore go to the earliest client.
    #[must_use]
    pub fn client_at_point(&self, x: i32, y: i32) -> Option<&Client<H>> {
        self.clients
            .iter()
            .find(|c| !c.is_dead() && c.visible() && c.contains_point(x, y))
    }

    // -- visibility and placement ----------------------------------------

    /// Recompute which screen, if any, shows each client. Runs before any
    /// geometry is pushed so map/unmap always precedes movement.
    pub fn update_visibility(&mut self) {
        let masks: Vec<TagMask> = (0..self.screens.len())
            .map(|i| self.screen_tags(i))
            .collect();
        let screens = &self.screens;
        for client in &mut self.clients {
            if client.is_dead() {
                continue;
            }
            let shown_on = if masks
                .get(client.screen)
                .is_some_and(|m| client.visible_on(*m))
            {
                Some(client.screen)
            } else {
                // of the screens that show it, the one it overlaps most
                masks
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| client.visible_on(**m))
                    .min_by_key(|(i, _)| {
                        let shared = screens[*i].geometry.overlap_area(&client.geometry);
                        (std::cmp::Reverse(shared), *i)
                    })
                    .map(|(i, _)| i)
            };
            match shown_on {
                Some(screen) => {
                    client.screen = screen;
                    if !client.visible() {
                        client.set_visible(true);
                        self.actions
                            .push_back(DisplayAction::SetVisible(client.handle, true));
                    }
                }
                None => {
                    if client.visible() {
                        client.set_visible(false);
                        self.actions
                            .push_back(DisplayAction::SetVisible(client.handle, false));
                    }
                }
            }
        }
    }

    /// Recompute geometry for every visible client and push what changed.
    pub fn apply_placement(&mut self) {
        let mut moves = vec![];
        for client in &mut self.clients {
            if client.is_dead() || !client.visible() {
                continue;
            }
            let Some(screen) = self.screens.get(client.screen) else {
                continue;
            };
            let target = if client.is_full() {
                screen.geometry
            } else if client.is_floating() {
                client.float_geometry.unwrap_or(client.geometry)
            } else {
                let Some(gravity) = self.gravities.get(client.gravity) else {
                    continue;
                };
                let slot = gravity.resolve(screen.usable);
                // tiled slots bend to size hints only when the client
                // opted in; floating geometry is always constrained
                if client.modes.intersects(ClientMode::RESIZE) {
                    client.hints.constrain(slot)
                } else {
                    slot
                }
            };
            if target != client.geometry {
                client.geometry = target;
                moves.push(DisplayAction::MoveResize(
                    client.handle,
                    target,
                    client.border(self.border_width),
                ));
            }
        }
        self.actions.extend(moves);
    }

    /// Restack: fullscreen and urgent on top, then floating and dialogs,
    /// then tiled, desktops at the bottom.
    pub fn sort_clients(&mut self) {
        use crate::models::ClientType;
        let (level1, other): (Vec<&Client<H>>, Vec<&Client<H>>) = self
            .clients
            .iter()
            .filter(|c| !c.is_dead())
            .partition(|c| c.is_full() || c.is_urgent());

        let (level2, other): (Vec<&Client<H>>, Vec<&Client<H>>) = other
            .iter()
            .partition(|c| c.is_floating() || c.r#type == ClientType::Dialog);

        let (level3, other): (Vec<&Client<H>>, Vec<&Client<H>>) = other
            .iter()
            .partition(|c| c.r#type == ClientType::Normal);

        let order: Vec<ClientHandle<H>> = level1
            .iter()
            .chain(level2.iter())
            .chain(level3.iter())
            .chain(other.iter())
            .map(|c| c.handle)
            .collect();
        self.actions
            .push_back(DisplayAction::SetClientOrder(order.clone()));
        self.actions
            .push_back(DisplayAction::Publish(PublishUpdate::Stacking(order)));
    }

    // -- focus -----------------------------------------------------------

    pub fn focus_client(&mut self, handle: &ClientHandle<H>) -> bool {
        let Some(client) = self.client(handle) else {
            return false;
        };
        if client.is_dead() || self.focused == Some(*handle) {
            return false;
        }
        let takes_focus = client.takes_focus;
        self.current_screen = client.screen;
        self.focused = Some(*handle);
        self.actions.push_back(DisplayAction::FocusClient {
            handle: *handle,
            takes_focus,
        });
        self.publish_focus();
        true
    }

    pub(crate) fn drop_focus(&mut self, handle: &ClientHandle<H>) {
        if self.focused == Some(*handle) {
            self.focused = None;
            self.actions.push_back(DisplayAction::Unfocus(Some(*handle)));
            self.publish_focus();
        }
    }

    // -- tagging ---------------------------------------------------------

    /// Re-run the matchers for one client and merge the result with its
    /// manually granted bits. Never destructive: manual tags survive, and
    /// an empty result falls back to the default tag.
    pub fn retag_client(&mut self, index: usize) {
        let Some(client) = self.clients.get(index) else {
            return;
        };
        let mut mask: TagMask = 0;
        let mut modes = ClientMode::empty();
        let mut gravity = None;
        let mut geometry = None;
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 && tag.matches(client) {
                mask |= 1 << i;
                modes |= tag.modes;
                gravity = tag.gravity.or(gravity);
                geometry = tag.geometry.or(geometry);
            }
        }

        let client = &mut self.clients[index];
        client.tags = mask | client.manual_tags;
        if client.tags == 0 {
            client.tags = DEFAULT_TAG;
        }
        if modes.contains(ClientMode::FULL) && !client.is_full() {
            client.saved_geometry = Some(client.geometry);
        }
        client.modes |= modes;
        if let Some(g) = gravity {
            client.gravity = g;
        }
        if let Some(rect) = geometry {
            client.float_geometry = Some(rect);
            client.modes.insert(ClientMode::FLOAT);
        }
        let update = PublishUpdate::ClientTags(client.handle, client.tags);
        self.actions.push_back(DisplayAction::Publish(update));
    }

    pub fn tag_create(&mut self, name: &str) -> Option<usize> {
        let index = self.tags.add_new(crate::models::Tag::new(name))?;
        self.publish_tags();
        Some(index)
    }

    /// Remove a tag and renumber every mask above it, clients and views
    /// in the same step. A client left with no tags falls to the default.
    pub fn tag_kill(&mut self, name: &str) -> bool {
        let Some(index) = self.tags.find_named(name) else {
            tracing::warn!("Cannot kill unknown tag {:?}", name);
            return false;
        };
        if index == 0 {
            tracing::warn!("The default tag cannot be killed");
            return false;
        }
        self.tags.remove(index);
        let mut updates = vec![];
        for client in &mut self.clients {
            client.tags = remove_bit(client.tags, index);
            client.manual_tags = remove_bit(client.manual_tags, index);
            if client.tags == 0 {
                client.tags = DEFAULT_TAG;
            }
            updates.push(PublishUpdate::ClientTags(client.handle, client.tags));
        }
        for view in &mut self.views {
            view.tags = remove_bit(view.tags, index);
        }
        for update in updates {
            self.actions.push_back(DisplayAction::Publish(update));
        }
        self.publish_tags();
        self.publish_views();
        true
    }

    /// Grant or drop one tag on a client by hand.
    pub fn tag_client(&mut self, handle: &ClientHandle<H>, tag: &str, add: bool) -> bool {
        let Some(index) = self.tags.find_named(tag) else {
            tracing::warn!("Cannot tag with unknown tag {:?}", tag);
            return false;
        };
        let Some(client) = self.client_mut(handle) else {
            return false;
        };
        let before = client.tags;
        if add {
            client.tag(index);
        } else {
            client.untag(index);
        }
        if client.tags == before {
            return false;
        }
        let update = PublishUpdate::ClientTags(client.handle, client.tags);
        self.actions.push_back(DisplayAction::Publish(update));
        true
    }

    // -- views -----------------------------------------------------------

    pub fn view_create(&mut self, name: &str, tags: TagMask) {
        self.views.push(View::new(name, tags));
        self.publish_views();
    }

    /// Remove a view. Refused for the last one; a manager with nothing to
    /// show is not a state we allow.
    pub fn view_kill(&mut self, name: &str) -> Result<()> {
        if self.views.len() == 1 {
            return Err(SableError::LastView);
        }
        let index = self
            .views
            .iter()
            .position(|v| v.name == name)
            .ok_or(SableError::NotFound("view"))?;
        self.views.remove(index);
        for screen in &mut self.screens {
            if screen.view == index {
                screen.view = 0;
            } else if screen.view > index {
                screen.view -= 1;
            }
        }
        self.publish_views();
        self.publish_current_views();
        Ok(())
    }

    pub fn tag_view(&mut self, view: usize, tag: &str, add: bool) -> bool {
        let Some(index) = self.tags.find_named(tag) else {
            tracing::warn!("Cannot tag with unknown tag {:?}", tag);
            return false;
        };
        let Some(view) = self.views.get_mut(view) else {
            return false;
        };
        if add {
            view.tag(index);
        } else {
            view.untag(index);
        }
        self.publish_views();
        true
    }

    /// Switch the current screen to another view.
    pub fn view_jump(&mut self, view: usize) -> bool {
        if view >= self.views.len() {
            tracing::warn!("Cannot jump to unknown view {}", view);
            return false;
        }
        let Some(screen) = self.screens.get_mut(self.current_screen) else {
            return false;
        };
        if screen.view == view {
            return false;
        }
        screen.view = view;
        self.publish_current_views();
        true
    }

    pub fn screen_jump(&mut self, screen: usize) -> bool {
        if screen >= self.screens.len() || screen == self.current_screen {
            return false;
        }
        self.current_screen = screen;
        true
    }

    // -- gravities -------------------------------------------------------

    /// Create a gravity, or redefine the template of an existing name.
    pub fn gravity_create(&mut self, name: &str, template: Rect) -> usize {
        let index = match self.gravities.iter().position(|g| g.name == name) {
            Some(index) => {
                self.gravities[index].template = template;
                index
            }
            None => {
                self.gravities.push(Gravity::new(name, template));
                self.gravities.len() - 1
            }
        };
        self.publish_gravities();
        index
    }

    /// Remove a gravity; clients that used it fall back to the first one
    /// and references above it renumber down, like tag masks do.
    pub fn gravity_kill(&mut self, name: &str) -> bool {
        if self.gravities.len() == 1 {
            tracing::warn!("The last gravity cannot be killed");
            return false;
        }
        let Some(index) = self.gravities.iter().position(|g| g.name == name) else {
            tracing::warn!("Cannot kill unknown gravity {:?}", name);
            return false;
        };
        self.gravities.remove(index);
        for client in &mut self.clients {
            if client.gravity == index {
                client.gravity = 0;
            } else if client.gravity > index {
                client.gravity -= 1;
            }
        }
        for tag in self.tags.iter_mut() {
            if let Some(gravity) = tag.gravity.as_mut() {
                if *gravity == index {
                    *gravity = 0;
                } else if *gravity > index {
                    *gravity -= 1;
                }
            }
        }
        self.publish_gravities();
        true
    }

    pub fn set_gravity(&mut self, handle: &ClientHandle<H>, name: &str) -> bool {
        let Some(index) = self.gravities.iter().position(|g| g.name == name) else {
            tracing::warn!("Cannot assign unknown gravity {:?}", name);
            return false;
        };
        let Some(client) = self.client_mut(handle) else {
            return false;
        };
        if client.gravity == index {
            return false;
        }
        client.gravity = index;
        true
    }

    // -- modes -----------------------------------------------------------

    /// Flip a set of modes on a client. Entering fullscreen saves the
    /// prior geometry, leaving restores it.
    pub fn toggle_modes(&mut self, handle: &ClientHandle<H>, modes: ClientMode) -> bool {
        let border_width = self.border_width;
        let usable = self
            .registry
            .lookup_client(handle)
            .and_then(|i| self.clients.get(i))
            .and_then(|c| self.screens.get(c.screen))
            .map(|s| s.usable);
        let Some(client) = self.client_mut(handle) else {
            return false;
        };
        let modes = modes.difference(ClientMode::DEAD);
        if modes.is_empty() {
            return false;
        }
        let entering = modes.difference(client.modes);
        client.modes.toggle(modes);

        let mut restored = None;
        if entering.contains(ClientMode::FULL) {
            client.saved_geometry = Some(client.geometry);
        } else if modes.contains(ClientMode::FULL) {
            if let Some(saved) = client.saved_geometry.take() {
                client.geometry = saved;
                restored = Some(DisplayAction::MoveResize(
                    client.handle,
                    saved,
                    client.border(border_width),
                ));
            }
        }
        if entering.contains(ClientMode::FLOAT) && client.float_geometry.is_none() {
            // seed the float slot from the hints, centered on the screen
            let slot = usable.unwrap_or(client.geometry);
            client.float_geometry = Some(client.hints.constrain(slot));
        }
        if let Some(act) = restored {
            self.actions.push_back(act);
        }
        true
    }

    // -- closing ---------------------------------------------------------

    /// Close a client the way it prefers; fall back to a hard kill when
    /// it never announced the close protocol.
    pub fn close_client(&mut self, handle: &ClientHandle<H>) {
        let Some(client) = self.client(handle) else {
            return;
        };
        let act = if client.honors_close {
            DisplayAction::CloseClient(*handle)
        } else {
            DisplayAction::KillClient(*handle)
        };
        self.actions.push_back(act);
    }

    /// Drop every client marked dead during this dispatch step.
    pub fn flush_dead_clients(&mut self) {
        while let Some(index) = self.clients.iter().position(Client::is_dead) {
            let client = self.clients.remove(index);
            self.registry.unbind(&client.handle);
            self.registry.shift_down(EntityKind::Client, index);
            self.actions
                .push_back(DisplayAction::DestroyedClient(client.handle));
        }
    }

    // -- publishing ------------------------------------------------------

    pub fn publish_clients(&mut self) {
        let list = self
            .clients
            .iter()
            .filter(|c| !c.is_dead())
            .map(|c| c.handle)
            .collect();
        self.actions
            .push_back(DisplayAction::Publish(PublishUpdate::Clients(list)));
    }

    pub fn publish_tags(&mut self) {
        let update = PublishUpdate::TagList(self.tags.names());
        self.actions.push_back(DisplayAction::Publish(update));
    }

    pub fn publish_views(&mut self) {
        let list = self
            .views
            .iter()
            .map(|v| (v.name.clone(), v.tags))
            .collect();
        self.actions
            .push_back(DisplayAction::Publish(PublishUpdate::ViewList(list)));
    }

    pub fn publish_current_views(&mut self) {
        let list = self.screens.iter().map(|s| s.view).collect();
        self.actions
            .push_back(DisplayAction::Publish(PublishUpdate::CurrentViews(list)));
    }

    pub fn publish_gravities(&mut self) {
        let list = self
            .gravities
            .iter()
            .map(|g| (g.name.clone(), g.template))
            .collect();
        self.actions
            .push_back(DisplayAction::Publish(PublishUpdate::GravityList(list)));
    }

    pub fn publish_focus(&mut self) {
        let update = PublishUpdate::FocusedClient(self.focused);
        self.actions.push_back(DisplayAction::Publish(update));
    }

    pub fn publish_all(&mut self) {
        self.publish_clients();
        self.publish_tags();
        self.publish_views();
        self.publish_current_views();
        self.publish_gravities();
        self.publish_focus();
    }

    // -- reload ----------------------------------------------------------

    /// Apply saved state to a freshly built one. Clients carry over whole;
    /// their matcher tags get recomputed against the new tag table while
    /// manual tags and modes survive. Screens keep their view by name
    /// where possible.
    pub fn restore_state(&mut self, old: Self) {
        self.clients = old.clients;
        let tag_cap = match self.tags.len() {
            len if len >= crate::models::MAX_TAGS => TagMask::MAX,
            len => (1 << len) - 1,
        };
        for client in &mut self.clients {
            client.manual_tags &= tag_cap;
            if client.gravity >= self.gravities.len() {
                client.gravity = 0;
            }
        }
        for (index, client) in self.clients.iter().enumerate() {
            self.registry
                .bind(client.handle, EntityKind::Client, index);
        }

        self.screens = old.screens;
        for (index, screen) in self.screens.iter_mut().enumerate() {
            let kept = old
                .views
                .get(screen.view)
                .and_then(|v| self.views.iter().position(|n| n.name == v.name));
            screen.view = kept.unwrap_or(0);
            if index == old.current_screen {
                self.current_screen = index;
            }
        }

        for index in 0..self.clients.len() {
            self.retag_client(index);
        }

        self.focused = old
            .focused
            .filter(|h| self.registry.lookup_client(h).is_some());
        self.publish_all();
        self.actions
            .push_back(DisplayAction::ReloadKeyGrabs(
                self.grabs.iter().map(|g| g.chord).collect(),
            ));
    }
}
