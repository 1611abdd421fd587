//! Locale bitmask attached to every root record.
//!
//! Sub-root manifest keys name the locale their records belong to
//! (`"enUS"`, `"deDE"`, ...). Keys that are not a locale tag — most
//! notably the special `"Base"` manifest — carry
//! [`LocaleFlags::any_locale`], so their records stay visible under every
//! filter.

use modular_bitfield::{bitfield, prelude::*};
use std::ops::{BitAnd, BitOr};

/// Bitmask of locales a root record applies to.
#[bitfield(bytes = 4)]
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
#[repr(u32)]
pub struct LocaleFlags {
    #[skip]
    __: B1,
    pub en_us: bool, // 0x2
    pub ko_kr: bool, // 0x4
    #[skip]
    __: B1,

    pub fr_fr: bool, // 0x10
    pub de_de: bool, // 0x20
    pub zh_cn: bool, // 0x40
    pub es_es: bool, // 0x80

    pub zh_tw: bool, // 0x100
    pub en_gb: bool, // 0x200
    pub en_cn: bool, // 0x400
    pub en_tw: bool, // 0x800

    pub es_mx: bool, // 0x1000
    pub ru_ru: bool, // 0x2000
    pub pt_br: bool, // 0x4000
    pub it_it: bool, // 0x8000

    pub pt_pt: bool, // 0x10000
    #[skip]
    __: B15,
}

impl LocaleFlags {
    /// `LocaleFlags` which sets all locales to `true`.
    pub fn any_locale() -> Self {
        Self::from(0xffff_ffff)
    }

    /// `true` if the flags indicate all locales.
    pub fn all(&self) -> bool {
        self == &Self::any_locale()
    }

    /// `true` if there is at least one locale flag set.
    pub fn any(&self) -> bool {
        u32::from(*self) != 0
    }

    /// Parses a sub-root manifest key as a locale tag.
    ///
    /// Returns `None` for anything that is not one of the game's locale
    /// tags; callers are expected to fall back to [`Self::any_locale`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        let f = Self::new();
        Some(match tag {
            "enUS" => f.with_en_us(true),
            "koKR" => f.with_ko_kr(true),
            "frFR" => f.with_fr_fr(true),
            "deDE" => f.with_de_de(true),
            "zhCN" => f.with_zh_cn(true),
            "esES" => f.with_es_es(true),
            "zhTW" => f.with_zh_tw(true),
            "enGB" => f.with_en_gb(true),
            "enCN" => f.with_en_cn(true),
            "enTW" => f.with_en_tw(true),
            "esMX" => f.with_es_mx(true),
            "ruRU" => f.with_ru_ru(true),
            "ptBR" => f.with_pt_br(true),
            "itIT" => f.with_it_it(true),
            "ptPT" => f.with_pt_pt(true),
            _ => return None,
        })
    }
}

impl BitAnd for LocaleFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from(u32::from(self) & u32::from(rhs))
    }
}

impl BitOr for LocaleFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from(u32::from(self) | u32::from(rhs))
    }
}
