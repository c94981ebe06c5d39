use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::errors::{Result, SableError};
use crate::utils::keysym_lookup::{self, XKeysym};
use crate::utils::modmask_lookup::{clean_mask, into_mod, ModMask};

/// What firing a grab does.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum GrabAction {
    /// Run a shell command.
    Spawn(String),
    /// Invoke a named config hook.
    Hook(String),
    /// Run a built-in command.
    Command(Command),
}

/// One key or button press: a keysym plus the modifier state.
/// Pointer buttons live in the keysym space too, see `keysym_lookup`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Chord {
    pub sym: XKeysym,
    pub mods: ModMask,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Grab {
    /// The chord stored in the sorted table.
    pub chord: Chord,
    /// Follow-up chords for chained grabs, empty for plain ones.
    pub chain: Vec<Chord>,
    pub action: GrabAction,
}

impl Grab {
    /// Parse a grab spec like `"W-Return"`, `"A-B1"` or the chain
    /// `"A-x y"`. Chord tokens are whitespace separated; within a token,
    /// `-` separates modifier prefixes from the final key name.
    pub fn parse(spec: &str, action: GrabAction) -> Result<Self> {
        let mut chords = spec
            .split_whitespace()
            .map(parse_chord)
            .collect::<Result<Vec<Chord>>>()?;
        if chords.is_empty() {
            return Err(SableError::EmptyGrab);
        }
        let chord = chords.remove(0);
        Ok(Self {
            chord,
            chain: chords,
            action,
        })
    }

    #[must_use]
    pub fn is_chain(&self) -> bool {
        !self.chain.is_empty()
    }
}

fn parse_chord(token: &str) -> Result<Chord> {
    let mut mods = ModMask::empty();
    let mut parts = token.split('-').peekable();
    let mut key = None;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            key = Some(part);
            break;
        }
        let m = into_mod(part);
        if m.is_empty() {
            return Err(SableError::UnknownModifier(part.to_owned()));
        }
        mods |= m;
    }
    let key = key.filter(|k| !k.is_empty()).ok_or(SableError::EmptyGrab)?;
    let sym = match key.strip_prefix('B').and_then(|n| n.parse::<u8>().ok()) {
        Some(n @ 1..=5) => keysym_lookup::pointer_button(n),
        _ => keysym_lookup::into_keysym(key)
            .ok_or_else(|| SableError::UnknownKey(key.to_owned()))?,
    };
    Ok(Chord { sym, mods })
}

/// The grab table, kept sorted by (keysym, modifiers) so lookups are a
/// binary search.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Grabs {
    list: Vec<Grab>,
}

impl Grabs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a grab at its sorted position. A second grab on the same
    /// chord is an error, chains included; only the head chord counts.
    /// Lock state on the stored chords is stripped so a hand-built grab
    /// matches the same presses a parsed one does.
    pub fn add_new(&mut self, mut grab: Grab) -> Result<usize> {
        grab.chord.mods = clean_mask(grab.chord.mods);
        for link in &mut grab.chain {
            link.mods = clean_mask(link.mods);
        }
        match self.position_of(grab.chord) {
            Ok(_) => Err(SableError::DuplicateGrab(format!(
                "sym {:#x} mods {:?}",
                grab.chord.sym, grab.chord.mods
            ))),
            Err(pos) => {
                self.list.insert(pos, grab);
                Ok(pos)
            }
        }
    }

    /// Find the grab for a pressed chord. Lock state on the incoming
    /// modifiers is ignored.
    #[must_use]
    pub fn resolve(&self, sym: XKeysym, mods: ModMask) -> Option<usize> {
        self.position_of(Chord {
            sym,
            mods: clean_mask(mods),
        })
        .ok()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Grab> {
        self.list.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Grab> {
        self.list.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    fn position_of(&self, chord: Chord) -> std::result::Result<usize, usize> {
        self.list.binary_search_by(|g| g.chord.cmp(&chord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::keysym_lookup::POINTER_BUTTON1;

    fn spawn(cmd: &str) -> GrabAction {
        GrabAction::Spawn(cmd.to_owned())
    }

    #[test]
    fn parses_modifiers_and_key() {
        let grab = Grab::parse("W-C-Return", spawn("st")).expect("parse");
        assert_eq!(grab.chord.mods, ModMask::Mod4 | ModMask::Control);
        assert_eq!(grab.chord.sym, x11_dl::keysym::XK_Return);
        assert!(!grab.is_chain());
    }

    #[test]
    fn parses_pointer_buttons() {
        let grab = Grab::parse("A-B3", spawn("menu")).expect("parse");
        assert_eq!(grab.chord.sym, POINTER_BUTTON1 + 2);
        assert_eq!(grab.chord.mods, ModMask::Mod1);
    }

    #[test]
    fn parses_chains() {
        let grab = Grab::parse("A-x y", spawn("run")).expect("parse");
        assert!(grab.is_chain());
        assert_eq!(grab.chain.len(), 1);
        assert_eq!(grab.chain[0].sym, 'y' as u32);
        assert_eq!(grab.chain[0].mods, ModMask::empty());
    }

    #[test]
    fn unknown_modifier_is_an_error() {
        assert!(matches!(
            Grab::parse("Q-x", spawn("x")),
            Err(SableError::UnknownModifier(_))
        ));
    }

    #[test]
    fn table_stays_sorted_as_grabs_arrive() {
        let mut grabs = Grabs::new();
        grabs.add_new(Grab::parse("W-c", spawn("c")).unwrap()).unwrap();
        grabs.add_new(Grab::parse("W-a", spawn("a")).unwrap()).unwrap();
        grabs.add_new(Grab::parse("W-b", spawn("b")).unwrap()).unwrap();
        let syms: Vec<XKeysym> = grabs.iter().map(|g| g.chord.sym).collect();
        let mut sorted = syms.clone();
        sorted.sort_unstable();
        assert_eq!(syms, sorted);
    }

    #[test]
    fn duplicate_chords_are_rejected() {
        let mut grabs = Grabs::new();
        grabs.add_new(Grab::parse("W-a", spawn("1")).unwrap()).unwrap();
        assert!(matches!(
            grabs.add_new(Grab::parse("W-a", spawn("2")).unwrap()),
            Err(SableError::DuplicateGrab(_))
        ));
        assert_eq!(grabs.len(), 1);
    }

    #[test]
    fn stored_chords_are_normalized_like_lookups() {
        let mut grabs = Grabs::new();
        let mut grab = Grab::parse("W-a b", spawn("1")).unwrap();
        grab.chord.mods |= ModMask::Mod2;
        grab.chain[0].mods |= ModMask::Lock;
        grabs.add_new(grab).unwrap();

        assert_eq!(grabs.resolve('a' as u32, ModMask::Mod4), Some(0));
        assert_eq!(grabs.get(0).unwrap().chain[0].mods, ModMask::empty());
    }

    #[test]
    fn resolve_ignores_lock_modifiers() {
        let mut grabs = Grabs::new();
        grabs.add_new(Grab::parse("W-a", spawn("1")).unwrap()).unwrap();
        let with_locks = ModMask::Mod4 | ModMask::Lock | ModMask::Mod2;
        assert_eq!(grabs.resolve('a' as u32, with_locks), Some(0));
        assert_eq!(grabs.resolve('a' as u32, ModMask::Mod4), Some(0));
        assert_eq!(grabs.resolve('a' as u32, ModMask::Mod1), None);
    }
}
