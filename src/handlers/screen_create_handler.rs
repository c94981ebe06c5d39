use super::{Config, Manager, Screen};
use crate::display_servers::DisplayServer;
use crate::models::Handle;

impl<H: Handle, C: Config, SERVER: DisplayServer<H>> Manager<H, C, SERVER> {
    /// Bring a new screen under management. Screens pick up views in
    /// order; a screen beyond the view list shows the first view.
    pub fn screen_create_handler(&mut self, mut screen: Screen) -> bool {
        let index = self.state.screens.len();
        screen.view = if index < self.state.views.len() {
            index
        } else {
            0
        };
        self.state.screens.push(screen);
        self.state.publish_current_views();
        self.state.update_visibility();
        self.state.apply_placement();
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Manager, Rect, Screen};

    #[test]
    fn screens_take_views_in_order() {
        let mut manager = Manager::new_test(vec!["a".to_string(), "b".to_string()]);
        manager.screen_create_handler(Screen::default());
        manager.screen_create_handler(Screen::new(Rect::new(800, 0, 800, 600)));
        assert_eq!(manager.state.screens[0].view, 0);
        assert_eq!(manager.state.screens[1].view, 1);
    }

    #[test]
    fn extra_screens_fall_back_to_the_first_view() {
        let mut manager = Manager::new_test(vec!["solo".to_string()]);
        manager.screen_create_handler(Screen::default());
        manager.screen_create_handler(Screen::new(Rect::new(800, 0, 800, 600)));
        assert_eq!(manager.state.screens[1].view, 0);
    }
}
