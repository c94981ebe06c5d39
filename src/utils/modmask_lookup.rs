use bitflags::bitflags;
use serde::{de::Visitor, Deserialize, Serialize};

bitflags! {
    /// Modifier key state, laid out the way the wire protocol reports it.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
    pub struct ModMask: u16 {
        const Shift = 1;
        const Lock = 1 << 1;
        const Control = 1 << 2;
        /// Alt
        const Mod1 = 1 << 3;
        /// NumLock
        const Mod2 = 1 << 4;
        const Mod3 = 1 << 5;
        /// Super
        const Mod4 = 1 << 6;
        const Mod5 = 1 << 7;
    }
}

/// Strip the modifiers that merely reflect keyboard lock state, so a combo
/// resolves the same with and without CapsLock/NumLock engaged.
#[must_use]
pub fn clean_mask(mask: ModMask) -> ModMask {
    mask.difference(ModMask::Lock | ModMask::Mod2)
}

/// One modifier token of a grab spec.
#[must_use]
pub fn into_mod(key: &str) -> ModMask {
    match key {
        "S" | "Shift" => ModMask::Shift,
        "C" | "Control" => ModMask::Control,
        "A" | "Mod1" | "Alt" => ModMask::Mod1,
        "M" | "Mod3" => ModMask::Mod3,
        "W" | "Mod4" | "Super" => ModMask::Mod4,
        "Mod5" => ModMask::Mod5,
        _ => ModMask::empty(),
    }
}

// serde impls (derive is not working with the bitflags macro)

impl Serialize for ModMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.bits())
    }
}

impl<'de> Deserialize<'de> for ModMask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ModmaskVisitor;

        impl<'de> Visitor<'de> for ModmaskVisitor {
            type Value = ModMask;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a bitfield on 16 bits")
            }

            fn visit_u16<E>(self, v: u16) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ModMask::from_bits_retain(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ModMask::from_bits_retain(v as u16))
            }
        }

        deserializer.deserialize_u16(ModmaskVisitor)
    }
}
