//! Barrel wood types and the distance graph between them.
//!
//! Wood types are partitioned into groups. Normal groups sit on a small
//! lattice of (temperature, humidity, oak) and their distance is the number
//! of lattice hops between them:
//!
//! ```text
//!               OAK    HOT_DRY --- NETHER
//!                ^    /   |
//!   COLD --- TEMPERATE    |
//!                     \   |
//!                      HOT_HUMID
//! ```
//!
//! The special group (cut copper) is disconnected from the lattice and sits
//! at a fixed distance from every other group.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string names no wood type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown wood type: {0}")]
pub struct ParseWoodTypeError(pub String);

/// Wood (or other material) a barrel is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WoodType {
    /// Wildcard: any wood is acceptable.
    Any,
    /// Birch planks.
    Birch,
    /// Oak planks.
    Oak,
    /// Jungle planks.
    Jungle,
    /// Spruce planks.
    Spruce,
    /// Acacia planks.
    Acacia,
    /// Dark oak planks.
    DarkOak,
    /// Crimson stems.
    Crimson,
    /// Warped stems.
    Warped,
    /// Mangrove planks.
    Mangrove,
    /// Cherry planks.
    Cherry,
    /// Bamboo planks.
    Bamboo,
    /// Cut copper, in any oxidation stage.
    CutCopper,
    /// Pale oak planks.
    PaleOak,
    /// Sentinel: no barrel at all.
    None,
}

impl WoodType {
    /// Largest distance between two specific wood types.
    pub const MAX_DISTANCE: u32 = Group::MAX_DISTANCE + 1;

    /// Distance between cut copper and every other wood type.
    pub const COPPER_DISTANCE: u32 = Group::SPECIAL_DISTANCE + 1;

    /// All wood types, in index order with the sentinels at either end.
    pub const ALL: [Self; 15] = [
        Self::Any,
        Self::Birch,
        Self::Oak,
        Self::Jungle,
        Self::Spruce,
        Self::Acacia,
        Self::DarkOak,
        Self::Crimson,
        Self::Warped,
        Self::Mangrove,
        Self::Cherry,
        Self::Bamboo,
        Self::CutCopper,
        Self::PaleOak,
        Self::None,
    ];

    /// Human readable name.
    #[must_use]
    pub const fn formatted_name(self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Birch => "Birch",
            Self::Oak => "Oak",
            Self::Jungle => "Jungle",
            Self::Spruce => "Spruce",
            Self::Acacia => "Acacia",
            Self::DarkOak => "Dark Oak",
            Self::Crimson => "Crimson",
            Self::Warped => "Warped",
            Self::Mangrove => "Mangrove",
            Self::Cherry => "Cherry",
            Self::Bamboo => "Bamboo",
            Self::CutCopper => "Cut Copper",
            Self::PaleOak => "Pale Oak",
            Self::None => "None",
        }
    }

    /// Stable numeric index used by older recipe files.
    #[must_use]
    pub const fn index(self) -> i32 {
        match self {
            Self::Any => 0,
            Self::Birch => 1,
            Self::Oak => 2,
            Self::Jungle => 3,
            Self::Spruce => 4,
            Self::Acacia => 5,
            Self::DarkOak => 6,
            Self::Crimson => 7,
            Self::Warped => 8,
            Self::Mangrove => 9,
            Self::Cherry => 10,
            Self::Bamboo => 11,
            Self::CutCopper => 12,
            Self::PaleOak => 13,
            Self::None => -1,
        }
    }

    /// Whether this is a concrete wood rather than `Any` or `None`.
    #[must_use]
    pub const fn is_specific(self) -> bool {
        !matches!(self, Self::Any | Self::None)
    }

    /// Iterates over the concrete wood types.
    pub fn specific() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|wood| wood.is_specific())
    }

    /// Looks a wood type up by its index.
    #[must_use]
    pub fn from_index(index: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|wood| wood.index() == index)
    }

    /// Looks a wood type up by name, ignoring case.
    ///
    /// Accepts the formatted name (`"Dark Oak"`) as well as snake or
    /// upper case spellings (`"dark_oak"`, `"DARK_OAK"`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|wood| wood.formatted_name().eq_ignore_ascii_case(&wanted))
    }

    fn group(self) -> Option<Group> {
        Group::of(self)
    }

    /// Computes the distance between two wood types.
    ///
    /// Similar woods such as oak and dark oak are 1 apart, the farthest pair
    /// is [`Self::MAX_DISTANCE`] apart and cut copper is always
    /// [`Self::COPPER_DISTANCE`] away from anything else.
    ///
    /// Returns `None` if either side is `Any` or `None`, even when both sides
    /// are the same wildcard.
    #[must_use]
    pub fn distance(self, other: Self) -> Option<u32> {
        let group = self.group()?;
        let other_group = other.group()?;
        if self == other {
            return Some(0);
        }
        Some(group.distance(other_group) + 1)
    }

    /// Advances this wood type towards `other` by `steps` hops.
    ///
    /// Each step moves by one group. The result is the target itself once it
    /// is reachable, otherwise the representative wood of the group landed
    /// on. Reaching or leaving cut copper needs at least
    /// [`Group::SPECIAL_DISTANCE`] steps; with fewer nothing changes. A wood
    /// that cannot leave its group stays itself instead of becoming the
    /// group's representative, so dark oak stepped twice towards cut copper
    /// is still dark oak. Taking
    /// [`Self::MAX_DISTANCE`] or more steps always arrives.
    #[must_use]
    pub fn step_towards(self, other: Self, steps: u32) -> Self {
        if self == other || steps >= Self::MAX_DISTANCE {
            return other;
        }

        let (Some(group), Some(other_group)) = (self.group(), other.group()) else {
            return self;
        };
        if group == other_group {
            return other;
        }

        let landed = group.step_towards(other_group, steps);
        if landed == group {
            self
        } else {
            landed.representative()
        }
    }
}

impl fmt::Display for WoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.formatted_name())
    }
}

impl FromStr for WoodType {
    type Err = ParseWoodTypeError;

    /// Parses an index (`"6"`) or a name (`"dark_oak"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = match s.trim().parse::<i32>() {
            Ok(index) => Self::from_index(index),
            Err(_) => Self::from_name(s),
        };
        found.ok_or_else(|| ParseWoodTypeError(s.to_string()))
    }
}

impl TryFrom<String> for WoodType {
    type Error = ParseWoodTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WoodType> for String {
    fn from(value: WoodType) -> Self {
        value.formatted_name().to_lowercase().replace(' ', "_")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Temperature {
    Cold,
    Warm,
    Hot,
    Nether,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Humidity {
    Dry,
    Moderate,
    Humid,
}

/// Position of a normal group on the (temperature, humidity, oak) lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Climate {
    temperature: Temperature,
    humidity: Humidity,
    oak: bool,
}

impl Climate {
    const fn new(temperature: Temperature, humidity: Humidity) -> Self {
        Self {
            temperature,
            humidity,
            oak: false,
        }
    }

    const fn oak(temperature: Temperature, humidity: Humidity) -> Self {
        Self {
            temperature,
            humidity,
            oak: true,
        }
    }

    fn hops(self, other: Self) -> u32 {
        let temperature = (self.temperature as i32 - other.temperature as i32).unsigned_abs();
        let humidity = (self.humidity as i32 - other.humidity as i32).unsigned_abs();
        let oak = u32::from(self.oak != other.oak);
        temperature + humidity + oak
    }
}

/// Groups of similar wood types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Spruce.
    Cold,
    /// Birch and cherry.
    Temperate,
    /// The oak family.
    Oak,
    /// Jungle, mangrove and bamboo.
    HotHumid,
    /// Acacia.
    HotDry,
    /// Nether stems.
    Nether,
    /// Cut copper, disconnected from the climate lattice.
    Special,
}

impl Group {
    /// Largest distance between two groups.
    pub const MAX_DISTANCE: u32 = 4;

    /// Distance between the special group and every other group.
    pub const SPECIAL_DISTANCE: u32 = 3;

    const ALL: [Self; 7] = [
        Self::Cold,
        Self::Temperate,
        Self::Oak,
        Self::HotHumid,
        Self::HotDry,
        Self::Nether,
        Self::Special,
    ];

    const fn climate(self) -> Option<Climate> {
        match self {
            Self::Cold => Some(Climate::new(Temperature::Cold, Humidity::Moderate)),
            Self::Temperate => Some(Climate::new(Temperature::Warm, Humidity::Moderate)),
            Self::Oak => Some(Climate::oak(Temperature::Warm, Humidity::Moderate)),
            Self::HotHumid => Some(Climate::new(Temperature::Hot, Humidity::Humid)),
            Self::HotDry => Some(Climate::new(Temperature::Hot, Humidity::Dry)),
            Self::Nether => Some(Climate::new(Temperature::Nether, Humidity::Dry)),
            Self::Special => None,
        }
    }

    /// Wood types in this group. The first one represents the group.
    #[must_use]
    pub const fn members(self) -> &'static [WoodType] {
        match self {
            Self::Cold => &[WoodType::Spruce],
            Self::Temperate => &[WoodType::Birch, WoodType::Cherry],
            Self::Oak => &[WoodType::Oak, WoodType::DarkOak, WoodType::PaleOak],
            Self::HotHumid => &[WoodType::Jungle, WoodType::Mangrove, WoodType::Bamboo],
            Self::HotDry => &[WoodType::Acacia],
            Self::Nether => &[WoodType::Crimson, WoodType::Warped],
            Self::Special => &[WoodType::CutCopper],
        }
    }

    const fn representative(self) -> WoodType {
        match self {
            Self::Cold => WoodType::Spruce,
            Self::Temperate => WoodType::Birch,
            Self::Oak => WoodType::Oak,
            Self::HotHumid => WoodType::Jungle,
            Self::HotDry => WoodType::Acacia,
            Self::Nether => WoodType::Crimson,
            Self::Special => WoodType::CutCopper,
        }
    }

    /// Finds the group of a wood type. `Any` and `None` belong to no group.
    #[must_use]
    pub fn of(wood: WoodType) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|group| group.members().contains(&wood))
    }

    /// Number of hops between two groups, 0 for the same group.
    #[must_use]
    pub fn distance(self, other: Self) -> u32 {
        if self == other {
            return 0;
        }
        match (self.climate(), other.climate()) {
            (Some(a), Some(b)) => a.hops(b),
            _ => Self::SPECIAL_DISTANCE,
        }
    }

    /// Moves up to `steps` hops towards `to`.
    ///
    /// Among all groups within `steps` of this one, picks the one closest to
    /// `to` (ties go to declaration order). Stays put if that group is not
    /// actually closer.
    #[must_use]
    pub fn step_towards(self, to: Self, steps: u32) -> Self {
        let current = self.distance(to);
        Self::ALL
            .into_iter()
            .enumerate()
            .filter(|(_, group)| self.distance(*group) <= steps)
            .min_by_key(|(order, group)| (group.distance(to), *order))
            .map(|(_, group)| group)
            .filter(|group| group.distance(to) < current)
            .unwrap_or(self)
    }
}
