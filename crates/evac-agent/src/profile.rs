//! Mobility profiles and their JSON loader.
//!
//! # JSON format
//!
//! One object per agent class, keyed by class name:
//!
//! ```json
//! {
//!   "adult": {
//!     "speed": 1.2, "vision": 5, "type": "adult",
//!     "reaction_time": 2, "tolerance": 0.7, "move_delay": 1
//!   },
//!   "wheelchair": {
//!     "speed": 0.6, "vision": 4, "type": "wheelchair",
//!     "reaction_time": 3, "tolerance": 0.5, "move_delay": 2,
//!     "can_use_stairs": false, "avoid_terrain": ["stairs", "danger"]
//!   }
//! }
//! ```
//!
//! The six listed fields are required for every class; loading fails with an
//! error naming the class and the missing field otherwise.  Optional fields
//! and their defaults:
//!
//! | Field            | Default | Meaning                                  |
//! |------------------|---------|------------------------------------------|
//! | `can_use_stairs` | `true`  | Stairs are physically usable             |
//! | `avoid_terrain`  | `[]`    | Terrain labels refused even when usable  |
//!
//! Durations (`reaction_time`, `move_delay`) are in simulation ticks.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use evac_core::{Terrain, TerrainAccess, TerrainSet};

use crate::ProfileError;

// ── MobilityProfile ───────────────────────────────────────────────────────────

/// Immutable per-class mobility record, shared read-only by every agent of
/// the class.  All optional JSON fields are resolved to concrete values at
/// load time; nothing is re-checked per query.
#[derive(Clone, Debug, PartialEq)]
pub struct MobilityProfile {
    /// The class name this profile was registered under.
    pub class_name: String,
    /// Nominal walking speed (informational — movement is one cell per
    /// eligible tick; `move_delay_ticks` expresses slower classes).
    pub speed: f32,
    /// Vision radius in cells, surfaced to telemetry consumers.
    pub vision: u32,
    /// Free-form category tag (`"adult"`, `"child"`, `"wheelchair"`, …).
    pub kind: String,
    /// Ticks between first observing an alarm and starting to evacuate.
    pub reaction_ticks: u64,
    /// Crowd-tolerance threshold in `[0, 1]`; congestion above it makes the
    /// agent wait instead of pushing through.
    pub tolerance: f32,
    /// Minimum ticks between two committed moves.
    pub move_delay_ticks: u64,
    /// Resolved terrain access (stair capability + avoided kinds).
    pub access: TerrainAccess,
}

// ── ProfileSet ────────────────────────────────────────────────────────────────

/// All loaded profiles, keyed by class name.
///
/// `BTreeMap` keeps iteration order deterministic for summaries and tests.
#[derive(Clone, Debug, Default)]
pub struct ProfileSet {
    inner: BTreeMap<String, Arc<MobilityProfile>>,
}

impl ProfileSet {
    /// Load profiles from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Like [`load`][Self::load] but accepts any `Read` source.
    ///
    /// Useful for testing (pass a `std::io::Cursor`) or embedded profile
    /// strings in demo binaries.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProfileError> {
        let raw: BTreeMap<String, RawProfile> = serde_json::from_reader(reader)
            .map_err(|e| ProfileError::Parse(e.to_string()))?;

        let mut inner = BTreeMap::new();
        for (class, record) in raw {
            let profile = record.validate(&class)?;
            inner.insert(class, Arc::new(profile));
        }
        Ok(Self { inner })
    }

    /// Shared handle to the profile for `class`, if registered.
    pub fn get(&self, class: &str) -> Option<Arc<MobilityProfile>> {
        self.inner.get(class).cloned()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.inner.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate `(class_name, profile)` in deterministic (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<MobilityProfile>)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ── Raw record + validation ───────────────────────────────────────────────────

/// One class entry as it appears in the JSON file, before validation.
/// Every field is optional here so that validation — not serde — decides
/// what is missing and can name the offending class.
#[derive(Deserialize)]
struct RawProfile {
    speed: Option<f32>,
    vision: Option<u32>,
    #[serde(rename = "type")]
    kind: Option<String>,
    reaction_time: Option<u64>,
    tolerance: Option<f32>,
    move_delay: Option<u64>,
    can_use_stairs: Option<bool>,
    avoid_terrain: Option<Vec<String>>,
}

impl RawProfile {
    fn validate(self, class: &str) -> Result<MobilityProfile, ProfileError> {
        fn require<T>(
            value: Option<T>,
            class: &str,
            field: &'static str,
        ) -> Result<T, ProfileError> {
            value.ok_or_else(|| ProfileError::MissingField {
                class: class.to_owned(),
                field,
            })
        }

        let mut avoided = TerrainSet::EMPTY;
        for label in self.avoid_terrain.unwrap_or_default() {
            match Terrain::from_label(&label) {
                Some(kind) => avoided.insert(kind),
                None => {
                    return Err(ProfileError::UnknownTerrain {
                        class: class.to_owned(),
                        label,
                    });
                }
            }
        }

        Ok(MobilityProfile {
            class_name: class.to_owned(),
            speed: require(self.speed, class, "speed")?,
            vision: require(self.vision, class, "vision")?,
            kind: require(self.kind, class, "type")?,
            reaction_ticks: require(self.reaction_time, class, "reaction_time")?,
            tolerance: require(self.tolerance, class, "tolerance")?,
            move_delay_ticks: require(self.move_delay, class, "move_delay")?,
            access: TerrainAccess {
                can_use_stairs: self.can_use_stairs.unwrap_or(true),
                avoided,
            },
        })
    }
}
