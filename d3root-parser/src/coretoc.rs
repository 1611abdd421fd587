//! Decoder for `CoreTOC.dat`, the catalog mapping SNO ids to their group
//! and asset name.
//!
//! The blob starts with three parallel fixed-length arrays (one slot per
//! SNO group): entry counts, entry byte offsets relative to the end of the
//! header, and a reserved count array, followed by one trailing reserved
//! value. Each populated group is a run of fixed-size records followed by
//! that group's name-string blob; record name pointers are relative to the
//! start of that blob.

use crate::ioutils::{ReadInt, read_cstring};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::io::{Cursor, Seek, SeekFrom};
use tracing::debug;

/// Number of SNO group slots in the header arrays.
const NUM_SNO_GROUPS: usize = 70;

/// Three parallel `i32` arrays plus one trailing reserved `i32`.
const HEADER_SIZE: u64 = (NUM_SNO_GROUPS as u64 * 3 + 1) * 4;

/// `{ group: i32, sno_id: i32, name_ptr: i32 }`.
const ENTRY_SIZE: u64 = 12;

macro_rules! sno_groups {
    ($($variant:ident = $code:literal => $label:literal,)+) => {
        /// SNO asset group, a closed enumeration shared with the game.
        ///
        /// Codes the catalog does not know about are preserved as
        /// [`SnoGroup::Unknown`] and display as their raw decimal value.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SnoGroup {
            $($variant,)+
            Unknown(i32),
        }

        impl SnoGroup {
            pub fn from_code(code: i32) -> Self {
                match code {
                    $($code => Self::$variant,)+
                    other => Self::Unknown(other),
                }
            }

            pub fn code(self) -> i32 {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Unknown(code) => code,
                }
            }
        }

        impl fmt::Display for SnoGroup {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($label),)+
                    Self::Unknown(code) => write!(f, "{code}"),
                }
            }
        }
    };
}

sno_groups! {
    Code = -2 => "Code",
    None = -1 => "None",
    Actor = 1 => "Actor",
    Adventure = 2 => "Adventure",
    AiBehavior = 3 => "AiBehavior",
    AiState = 4 => "AiState",
    AmbientSound = 5 => "AmbientSound",
    Animation = 6 => "Animation",
    Animation2D = 7 => "Animation2D",
    AnimSet = 8 => "AnimSet",
    Appearance = 9 => "Appearance",
    Hero = 10 => "Hero",
    Cloth = 11 => "Cloth",
    Conversation = 12 => "Conversation",
    ConversationList = 13 => "ConversationList",
    EffectGroup = 14 => "EffectGroup",
    Encounter = 15 => "Encounter",
    Explosion = 17 => "Explosion",
    FlagSet = 18 => "FlagSet",
    Font = 19 => "Font",
    GameBalance = 20 => "GameBalance",
    Global = 21 => "Global",
    LevelArea = 22 => "LevelArea",
    Light = 23 => "Light",
    MarkerSet = 24 => "MarkerSet",
    Monster = 25 => "Monster",
    Observer = 26 => "Observer",
    Particle = 27 => "Particle",
    Physics = 28 => "Physics",
    Power = 29 => "Power",
    Quest = 31 => "Quest",
    Rope = 32 => "Rope",
    Scene = 33 => "Scene",
    SceneGroup = 34 => "SceneGroup",
    Script = 35 => "Script",
    ShaderMap = 36 => "ShaderMap",
    Shader = 37 => "Shader",
    Shake = 38 => "Shake",
    SkillKit = 39 => "SkillKit",
    Sound = 40 => "Sound",
    SoundBank = 41 => "SoundBank",
    StringList = 42 => "StringList",
    Surface = 43 => "Surface",
    Texture = 44 => "Texture",
    Trail = 45 => "Trail",
    Ui = 46 => "UI",
    Weather = 47 => "Weather",
    World = 48 => "World",
    Recipe = 49 => "Recipe",
    Condition = 51 => "Condition",
    TreasureClass = 52 => "TreasureClass",
    Account = 53 => "Account",
    Conductor = 54 => "Conductor",
    TimedEvent = 55 => "TimedEvent",
    Act = 56 => "Act",
    Material = 57 => "Material",
    QuestRange = 58 => "QuestRange",
    Lore = 59 => "Lore",
    Reverb = 60 => "Reverb",
    PhysMesh = 61 => "PhysMesh",
    Music = 62 => "Music",
    Tutorial = 63 => "Tutorial",
    BossEncounter = 64 => "BossEncounter",
    ControlScheme = 65 => "ControlScheme",
    Accolade = 66 => "Accolade",
    AnimTree = 67 => "AnimTree",
    Vibration = 68 => "Vibration",
    DungeonFinder = 69 => "DungeonFinder",
}

/// One resolved catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnoInfo {
    pub group: SnoGroup,
    pub name: String,
}

/// The decoded `CoreTOC.dat` catalog.
///
/// Built once per load and read-only afterwards; the sub-root decoder
/// borrows it for its single decode pass.
#[derive(Debug, Default)]
pub struct CoreToc {
    entries: HashMap<i32, SnoInfo>,
}

impl CoreToc {
    /// Decode a complete in-memory `CoreTOC.dat` blob.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if (data.len() as u64) < HEADER_SIZE {
            return Err(Error::IOError(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "CoreTOC blob is shorter than its header",
            )));
        }

        let mut f = Cursor::new(data);
        let mut counts = [0i32; NUM_SNO_GROUPS];
        let mut offsets = [0i32; NUM_SNO_GROUPS];
        for count in &mut counts {
            *count = f.read_i32le()?;
        }
        for offset in &mut offsets {
            *offset = f.read_i32le()?;
        }
        // The reserved count array and the trailing reserved value are not
        // interpreted.

        let mut entries: HashMap<i32, SnoInfo> = HashMap::new();
        for slot in 0..NUM_SNO_GROUPS {
            // Slots without entries are never seeked; their offsets may be
            // garbage.
            if counts[slot] <= 0 {
                continue;
            }
            let count = counts[slot] as u64;

            let offset = u64::try_from(offsets[slot])
                .map_err(|_| Error::OffsetOutOfRange(i64::from(offsets[slot])))?;
            let group_start = HEADER_SIZE + offset;
            // Name strings for this group sit immediately after its records
            let names_start = group_start + ENTRY_SIZE * count;
            if names_start > data.len() as u64 {
                return Err(Error::OffsetOutOfRange(group_start as i64));
            }

            f.seek(SeekFrom::Start(group_start))?;
            for _ in 0..count {
                let group = f.read_i32le()?;
                let sno_id = f.read_i32le()?;
                let name_ptr = f.read_i32le()?;

                let name_pos = names_start as i64 + i64::from(name_ptr);
                if name_ptr < 0 || name_pos >= data.len() as i64 {
                    return Err(Error::NamePointerOutOfRange(name_pos));
                }

                // Decoding is otherwise sequential; resolve the name with a
                // temporary seek and restore the record position after.
                let record_end = f.stream_position()?;
                f.seek(SeekFrom::Start(name_pos as u64))?;
                let name = read_cstring(&mut f)?;
                f.seek(SeekFrom::Start(record_end))?;

                let info = SnoInfo {
                    group: SnoGroup::from_code(group),
                    name,
                };
                if entries.insert(sno_id, info).is_some() {
                    return Err(Error::DuplicateSnoId(sno_id));
                }
            }
        }

        debug!("CoreTOC decoded: {} SNO entries", entries.len());
        Ok(Self { entries })
    }

    /// Look up a SNO id. Id 0 and unknown ids are expected misses and
    /// non-fatal at the call site.
    pub fn get(&self, sno_id: i32) -> Option<&SnoInfo> {
        self.entries.get(&sno_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
