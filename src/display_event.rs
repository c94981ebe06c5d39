use crate::command::Command;
use crate::models::{Client, ClientHandle, ClientType, Handle, Screen, SizeHints};
use crate::utils::keysym_lookup::XKeysym;
use crate::utils::modmask_lookup::ModMask;

/// Property updates a backend noticed on a window. `None` fields are
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct ClientChange<H: Handle> {
    pub handle: ClientHandle<H>,
    pub name: Option<String>,
    pub instance: Option<String>,
    pub class: Option<String>,
    pub role: Option<String>,
    pub hints: Option<SizeHints>,
    pub r#type: Option<ClientType>,
    pub urgent: Option<bool>,
    pub transient: Option<ClientHandle<H>>,
    /// Reserved strip (top, right, bottom, left) on the client's screen.
    pub strut: Option<(u32, u32, u32, u32)>,
}

impl<H: Handle> ClientChange<H> {
    #[must_use]
    pub fn new(handle: ClientHandle<H>) -> Self {
        Self {
            handle,
            ..Self::default()
        }
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug)]
pub enum DisplayEvent<H: Handle> {
    ScreenCreate(Screen),
    ClientCreate(Client<H>),
    ClientChange(ClientChange<H>),
    ClientDestroy(ClientHandle<H>),
    KeyCombo(ModMask, XKeysym),
    MouseCombo(ModMask, u8, ClientHandle<H>, i32, i32),
    /// Pointer moved while a move drag is active.
    MoveClient(ClientHandle<H>, i32, i32),
    /// Pointer moved while a resize drag is active.
    ResizeClient(ClientHandle<H>, i32, i32),
    /// Button released; whatever drag was active ends here.
    ChangeToNormalMode,
    SendCommand(Command),
}
