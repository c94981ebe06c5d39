use super::{Client, ClientHandle, ClientMode, Config, DispatchMode, Manager};
use crate::config::HookEvent;
use crate::display_action::DisplayAction;
use crate::display_event::ClientChange;
use crate::display_servers::DisplayServer;
use crate::models::{EntityKind, Handle};

impl<H: Handle, C: Config, SERVER: DisplayServer<H>> Manager<H, C, SERVER> {
    /// Take a newly discovered window under management.
    /// Returns true if changes need to be rendered.
    pub fn client_created_handler(&mut self, mut client: Client<H>) -> bool {
        // don't add a client the manager already knows about
        if self.state.registry.lookup(&client.handle).is_some() {
            return false;
        }
        // reserved roles stay unmanaged
        if !client.is_manageable() {
            return false;
        }

        // transients ride on their parent's tags, floating and urgent
        if let Some(parent) = client.transient {
            if let Some(parent) = self.state.client(&parent) {
                client.manual_tags |= parent.tags;
                client.screen = parent.screen;
            }
            client.modes.insert(ClientMode::FLOAT | ClientMode::URGENT);
        }

        let handle = client.handle;
        let index = self.state.clients.len();
        self.state.registry.bind(handle, EntityKind::Client, index);
        self.state.clients.push(client);
        self.state.retag_client(index);

        self.state.actions.push_back(DisplayAction::AddedClient(handle));
        self.state.publish_clients();
        self.state.update_visibility();
        self.state.apply_placement();
        self.state.sort_clients();

        if self.state.focus_new_clients && self.state.clients[index].visible() {
            self.focus_client(&handle);
        }
        self.config
            .call_hook(HookEvent::ClientCreate, Some(&self.state.clients[index]));
        true
    }

    /// Move focus through the manager so the config hook sees it.
    pub fn focus_client(&mut self, handle: &ClientHandle<H>) -> bool {
        if !self.state.focus_client(handle) {
            return false;
        }
        self.config
            .call_hook(HookEvent::ClientFocus, self.state.client(handle));
        true
    }

    /// A window disappeared; mark it dead, run the hook, then drop it.
    /// Returns true if changes need to be rendered.
    pub fn client_destroyed_handler(&mut self, handle: &ClientHandle<H>) -> bool {
        let Some(index) = self.state.registry.lookup_client(handle) else {
            return false;
        };
        self.state.clients[index].modes.insert(ClientMode::DEAD);
        self.config
            .call_hook(HookEvent::ClientKill, Some(&self.state.clients[index]));
        self.state.drop_focus(handle);

        // a drag on a dying client has nothing left to hold on to
        match self.state.mode {
            DispatchMode::ReadyToMove(h)
            | DispatchMode::ReadyToResize(h)
            | DispatchMode::Moving(h)
            | DispatchMode::Resizing(h)
                if h == *handle =>
            {
                self.state.mode = DispatchMode::Normal;
                self.state.actions.push_back(DisplayAction::NormalMode);
            }
            _ => {}
        }

        self.state.flush_dead_clients();
        self.state.publish_clients();
        self.state.sort_clients();
        true
    }

    /// Fold a property update into the model.
    pub fn client_changed_handler(&mut self, change: ClientChange<H>) -> bool {
        let Some(index) = self.state.registry.lookup_client(&change.handle) else {
            return false;
        };
        let mut retag = false;
        let mut changed = false;
        let mut strut_screen = None;
        {
            let client = &mut self.state.clients[index];
            if let Some(name) = change.name {
                retag |= client.name.as_deref() != Some(name.as_str());
                client.name = Some(name);
            }
            if let Some(instance) = change.instance {
                retag |= client.instance.as_deref() != Some(instance.as_str());
                client.instance = Some(instance);
            }
            if let Some(class) = change.class {
                retag |= client.class.as_deref() != Some(class.as_str());
                client.class = Some(class);
            }
            if let Some(role) = change.role {
                retag |= client.role.as_deref() != Some(role.as_str());
                client.role = Some(role);
            }
            if let Some(hints) = change.hints {
                changed |= client.hints != hints;
                client.hints = hints;
            }
            if let Some(t) = change.r#type {
                changed |= client.r#type != t;
                client.r#type = t;
            }
            if let Some(urgent) = change.urgent {
                changed |= client.is_urgent() != urgent;
                client.modes.set(ClientMode::URGENT, urgent);
            }
            if let Some(transient) = change.transient {
                client.transient = Some(transient);
            }
            if let Some((top, right, bottom, left)) = change.strut {
                strut_screen = Some((client.screen, top, right, bottom, left));
            }
        }
        if let Some((screen, top, right, bottom, left)) = strut_screen {
            if let Some(screen) = self.state.screens.get_mut(screen) {
                screen.set_padding(top, right, bottom, left);
                changed = true;
            }
        }
        if retag {
            self.state.retag_client(index);
            self.state.update_visibility();
        }
        if retag || changed {
            self.state.apply_placement();
            self.state.sort_clients();
        }
        retag || changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MockHandle, Screen};

    fn manager_with_screen() -> Manager<
        MockHandle,
        crate::config::tests::TestConfig,
        crate::display_servers::MockDisplayServer,
    > {
        let mut manager = Manager::new_test(vec![]);
        manager.screen_create_handler(Screen::default());
        manager
    }

    #[test]
    fn duplicate_creates_are_ignored() {
        let mut manager = manager_with_screen();
        let client = Client::new(ClientHandle::<MockHandle>(1), None);
        assert!(manager.client_created_handler(client.clone()));
        assert!(!manager.client_created_handler(client));
        assert_eq!(manager.state.clients.len(), 1);
    }

    #[test]
    fn unmatched_clients_land_on_the_default_tag() {
        let mut manager = manager_with_screen();
        manager.client_created_handler(Client::new(ClientHandle::<MockHandle>(1), None));
        assert_eq!(manager.state.clients[0].tags, crate::models::DEFAULT_TAG);
    }

    #[test]
    fn transients_inherit_tags_and_float() {
        let mut manager = manager_with_screen();
        let mut parent = Client::new(ClientHandle::<MockHandle>(1), None);
        parent.manual_tags = 0b10;
        manager.client_created_handler(parent);
        let mut child = Client::new(ClientHandle::<MockHandle>(2), None);
        child.transient = Some(ClientHandle(1));
        manager.client_created_handler(child);

        let child = manager.state.client(&ClientHandle(2)).unwrap();
        assert!(child.tags & 0b10 != 0);
        assert!(child.is_floating());
        assert!(child.is_urgent());
    }

    #[test]
    fn focus_transfers_reach_the_config_hook() {
        let mut manager = manager_with_screen();
        manager.client_created_handler(Client::new(ClientHandle::<MockHandle>(1), None));
        assert_eq!(manager.state.focused, Some(ClientHandle(1)));
        let seen = manager.config.hooks_seen.lock().unwrap();
        assert!(seen.contains(&HookEvent::ClientFocus));
    }

    #[test]
    fn destroy_unbinds_and_refocuses_nothing() {
        let mut manager = manager_with_screen();
        manager.client_created_handler(Client::new(ClientHandle::<MockHandle>(1), None));
        assert_eq!(manager.state.focused, Some(ClientHandle(1)));
        assert!(manager.client_destroyed_handler(&ClientHandle(1)));
        assert!(manager.state.clients.is_empty());
        assert_eq!(manager.state.registry.lookup(&ClientHandle(1)), None);
        assert_eq!(manager.state.focused, None);
    }

    #[test]
    fn destroy_of_an_unknown_handle_is_a_noop() {
        let mut manager = manager_with_screen();
        assert!(!manager.client_destroyed_handler(&ClientHandle(9)));
    }

    #[test]
    fn class_change_triggers_a_retag() {
        let mut manager = manager_with_screen();
        let mut tag = crate::models::Tag::new("terms");
        tag.matchers.push(crate::models::Matcher::Class(
            crate::models::Pattern::new("^term$").unwrap(),
        ));
        manager.state.tags.add_new(tag).unwrap();

        manager.client_created_handler(Client::new(ClientHandle::<MockHandle>(1), None));
        let mut change = ClientChange::new(ClientHandle(1));
        change.class = Some("term".to_owned());
        assert!(manager.client_changed_handler(change));
        assert!(manager.state.clients[0].has_tag(1));
    }
}
