use x11_dl::keysym;

pub type XKeysym = u32;

/// Keysym the first pointer button reports; buttons share the grab table
/// with keys by mapping button `n` to `POINTER_BUTTON1 + n - 1`.
pub const POINTER_BUTTON1: XKeysym = 0xfee9;

#[must_use]
pub fn pointer_button(n: u8) -> XKeysym {
    POINTER_BUTTON1 + u32::from(n.saturating_sub(1))
}

/// Translate a key name from a grab spec into a keysym.
///
/// Printable single characters map directly (Latin-1 keysyms equal their
/// codepoint there), everything else goes through the name table.
#[must_use]
pub fn into_keysym(name: &str) -> Option<XKeysym> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if ('\u{20}'..'\u{7f}').contains(&c) {
            return Some(c as u32);
        }
    }
    let sym = match name {
        "Return" => keysym::XK_Return,
        "Escape" => keysym::XK_Escape,
        "Tab" => keysym::XK_Tab,
        "BackSpace" => keysym::XK_BackSpace,
        "Delete" => keysym::XK_Delete,
        "Insert" => keysym::XK_Insert,
        "Home" => keysym::XK_Home,
        "End" => keysym::XK_End,
        "Prior" => keysym::XK_Prior,
        "Next" => keysym::XK_Next,
        "Left" => keysym::XK_Left,
        "Right" => keysym::XK_Right,
        "Up" => keysym::XK_Up,
        "Down" => keysym::XK_Down,
        "Pause" => keysym::XK_Pause,
        "Print" => keysym::XK_Print,
        "Menu" => keysym::XK_Menu,
        "F1" => keysym::XK_F1,
        "F2" => keysym::XK_F2,
        "F3" => keysym::XK_F3,
        "F4" => keysym::XK_F4,
        "F5" => keysym::XK_F5,
        "F6" => keysym::XK_F6,
        "F7" => keysym::XK_F7,
        "F8" => keysym::XK_F8,
        "F9" => keysym::XK_F9,
        "F10" => keysym::XK_F10,
        "F11" => keysym::XK_F11,
        "F12" => keysym::XK_F12,
        _ => return None,
    };
    Some(sym)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chars_map_to_latin1() {
        assert_eq!(into_keysym("x"), Some('x' as u32));
        assert_eq!(into_keysym("1"), Some('1' as u32));
    }

    #[test]
    fn named_keys_resolve() {
        assert_eq!(into_keysym("Return"), Some(keysym::XK_Return));
        assert_eq!(into_keysym("NoSuchKey"), None);
    }

    #[test]
    fn buttons_occupy_a_contiguous_range() {
        assert_eq!(pointer_button(1), POINTER_BUTTON1);
        assert_eq!(pointer_button(5), POINTER_BUTTON1 + 4);
    }
}
