//! Terrain classification shared across all grid-related crates.
//!
//! Terrain is a hard property of a cell (mutable at runtime by environment
//! events).  Crowding is deliberately *not* part of terrain — occupancy is a
//! soft cost signal owned by the grid.

/// The terrain kind of one grid cell.
///
/// The numeric codes match the scenario matrix encoding (`0`–`3`).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    /// Open floor.
    #[default]
    Passable,
    /// Impassable for everyone (wall, rubble, closed door).
    Blocked,
    /// Passable but hazardous; profiles may list it as avoided.
    Danger,
    /// Passable only for stair-capable profiles that do not avoid stairs.
    Stairs,
}

impl Terrain {
    /// Decode a scenario-matrix code.  Returns `None` for unknown codes.
    pub fn from_code(code: u8) -> Option<Terrain> {
        match code {
            0 => Some(Terrain::Passable),
            1 => Some(Terrain::Blocked),
            2 => Some(Terrain::Danger),
            3 => Some(Terrain::Stairs),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Terrain::Passable => 0,
            Terrain::Blocked => 1,
            Terrain::Danger => 2,
            Terrain::Stairs => 3,
        }
    }

    /// Human-readable label, useful for CSV column values and profile files.
    pub fn as_str(self) -> &'static str {
        match self {
            Terrain::Passable => "passable",
            Terrain::Blocked => "blocked",
            Terrain::Danger => "danger",
            Terrain::Stairs => "stairs",
        }
    }

    /// Parse the label accepted in profile `avoid_terrain` lists.
    pub fn from_label(label: &str) -> Option<Terrain> {
        match label {
            "passable" => Some(Terrain::Passable),
            "blocked" => Some(Terrain::Blocked),
            "danger" => Some(Terrain::Danger),
            "stairs" => Some(Terrain::Stairs),
            _ => None,
        }
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── TerrainSet ────────────────────────────────────────────────────────────────

/// A small set of terrain kinds, stored as a bitmask.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainSet(u8);

impl TerrainSet {
    pub const EMPTY: TerrainSet = TerrainSet(0);

    #[inline]
    pub fn insert(&mut self, kind: Terrain) {
        self.0 |= 1u8 << kind.code();
    }

    #[inline]
    pub fn contains(self, kind: Terrain) -> bool {
        self.0 & (1u8 << kind.code()) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Terrain> for TerrainSet {
    fn from_iter<I: IntoIterator<Item = Terrain>>(iter: I) -> Self {
        let mut set = TerrainSet::EMPTY;
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

// ── TerrainAccess ─────────────────────────────────────────────────────────────

/// The per-profile view the grid consults when answering walkability.
///
/// Resolved once at profile-load time; the grid never sees the full mobility
/// profile, only this compact access descriptor.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainAccess {
    /// Whether stairs are physically usable (wheelchairs: no).
    pub can_use_stairs: bool,
    /// Terrain kinds this profile refuses to enter even when usable.
    pub avoided: TerrainSet,
}

impl TerrainAccess {
    /// Unrestricted access: stairs usable, nothing avoided.
    pub const UNRESTRICTED: TerrainAccess = TerrainAccess {
        can_use_stairs: true,
        avoided: TerrainSet::EMPTY,
    };

    /// `true` if this profile may enter a cell of the given kind, ignoring
    /// bounds (the grid checks those) and `Blocked` (nobody enters those).
    #[inline]
    pub fn permits(self, kind: Terrain) -> bool {
        if kind == Terrain::Stairs && !self.can_use_stairs {
            return false;
        }
        !self.avoided.contains(kind)
    }
}

impl Default for TerrainAccess {
    fn default() -> Self {
        Self::UNRESTRICTED
    }
}
