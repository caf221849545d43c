use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::ops::{Index, IndexMut};
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

pub const SCENE_SIZE: f64 = 950.0;
pub const DEFAULT_BETA_OFFSET: f64 = SCENE_SIZE / 38.0;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    #[strum(to_string = "Σ")]
    Sigma,
    #[strum(to_string = "Δ")]
    Delta,
    #[strum(to_string = "θ")]
    Theta,
    #[strum(to_string = "Ω")]
    Omega,
    #[strum(to_string = "W-")]
    WDash,
    #[strum(to_string = "X-")]
    XDash,
    #[strum(to_string = "Y-")]
    YDash,
    #[strum(to_string = "Z-")]
    ZDash,
    #[strum(to_string = "Σ-")]
    SigmaDash,
    #[strum(to_string = "Δ-")]
    DeltaDash,
    #[strum(to_string = "θ-")]
    ThetaDash,
    #[strum(to_string = "Ω-")]
    OmegaDash,
    #[strum(to_string = "Φ")]
    Phi,
    #[strum(to_string = "Ψ")]
    Psi,
    #[strum(to_string = "Λ")]
    Lambda,
    #[strum(to_string = "Φ-")]
    PhiDash,
    #[strum(to_string = "Ψ-")]
    PsiDash,
    #[strum(to_string = "Λ-")]
    LambdaDash,
    #[strum(to_string = "α")]
    Alpha,
    #[strum(to_string = "β")]
    Beta,
    #[strum(to_string = "Γ")]
    Gamma,
}

impl Letter {
    pub fn letter_type(&self) -> LetterType {
        LetterType::of(*self)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum LetterType {
    Type1,
    Type2,
    Type3,
    Type4,
    Type5,
    Type6,
}

impl LetterType {
    pub fn of(letter: Letter) -> Self {
        use Letter::*;
        match letter {
            A | B | C | D | E | F | G | H | I | J | K | L | M | N | O | P | Q | R | S | T | U
            | V => Self::Type1,
            W | X | Y | Z | Sigma | Delta | Theta | Omega => Self::Type2,
            WDash | XDash | YDash | ZDash | SigmaDash | DeltaDash | ThetaDash | OmegaDash => {
                Self::Type3
            }
            Phi | Psi | Lambda => Self::Type4,
            PhiDash | PsiDash | LambdaDash => Self::Type5,
            Alpha | Beta | Gamma => Self::Type6,
        }
    }

    pub fn letters(&self) -> Vec<Letter> {
        Letter::iter().filter(|l| Self::of(*l) == *self).collect()
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Type1 => "Dual-Shift",
            Self::Type2 => "Shift",
            Self::Type3 => "Cross-Shift",
            Self::Type4 => "Dash",
            Self::Type5 => "Dual-Dash",
            Self::Type6 => "Static",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Color {
    Blue,
    Red,
}

impl Color {
    pub fn other(&self) -> Self {
        match self {
            Self::Blue => Self::Red,
            Self::Red => Self::Blue,
        }
    }

    pub fn attributes_key(&self) -> &'static str {
        match self {
            Self::Blue => "blue_attributes",
            Self::Red => "red_attributes",
        }
    }
}

/// A value for each hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorMap<T> {
    pub blue: T,
    pub red: T,
}

impl<T> ColorMap<T> {
    pub fn new(blue: T, red: T) -> Self {
        Self { blue, red }
    }

    pub fn from_fn(mut f: impl FnMut(Color) -> T) -> Self {
        Self {
            blue: f(Color::Blue),
            red: f(Color::Red),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        [(Color::Blue, &self.blue), (Color::Red, &self.red)].into_iter()
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.blue, &mut self.red);
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &T {
        match color {
            Color::Blue => &self.blue,
            Color::Red => &self.red,
        }
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut T {
        match color {
            Color::Blue => &mut self.blue,
            Color::Red => &mut self.red,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum Location {
    #[strum(to_string = "n", serialize = "north")]
    North,
    #[strum(to_string = "ne", serialize = "northeast")]
    NorthEast,
    #[strum(to_string = "e", serialize = "east")]
    East,
    #[strum(to_string = "se", serialize = "southeast")]
    SouthEast,
    #[strum(to_string = "s", serialize = "south")]
    South,
    #[strum(to_string = "sw", serialize = "southwest")]
    SouthWest,
    #[strum(to_string = "w", serialize = "west")]
    West,
    #[strum(to_string = "nw", serialize = "northwest")]
    NorthWest,
    #[strum(to_string = "center")]
    Center,
}

const COMPASS: [Location; 8] = [
    Location::North,
    Location::NorthEast,
    Location::East,
    Location::SouthEast,
    Location::South,
    Location::SouthWest,
    Location::West,
    Location::NorthWest,
];

impl Location {
    fn compass_index(&self) -> Option<usize> {
        COMPASS.iter().position(|l| l == self)
    }

    fn step(&self, eighths: usize) -> Self {
        self.compass_index()
            .map(|i| COMPASS[(i + eighths) % 8])
            .unwrap_or(Self::Center)
    }

    /// Clockwise degrees from north, screen orientation.
    pub fn angle(&self) -> f64 {
        self.compass_index().map(|i| i as f64 * 45.0).unwrap_or(0.0)
    }

    pub fn is_diagonal(&self) -> bool {
        self.compass_index().is_some_and(|i| i % 2 == 1)
    }

    pub fn rotated_cw(&self) -> Self {
        self.step(2)
    }

    pub fn rotated_ccw(&self) -> Self {
        self.step(6)
    }

    pub fn opposite(&self) -> Self {
        self.step(4)
    }

    /// Reflection across the vertical axis.
    pub fn mirrored(&self) -> Self {
        self.compass_index()
            .map(|i| COMPASS[(8 - i) % 8])
            .unwrap_or(Self::Center)
    }

    /// The location halfway along a quarter step from `start` to `end`.
    pub fn between(start: Self, end: Self) -> Option<Self> {
        if start.rotated_cw() == end {
            Some(start.step(1))
        } else if start.rotated_ccw() == end {
            Some(start.step(7))
        } else {
            None
        }
    }

    /// Unit vector in screen coordinates (y grows downwards).
    pub fn unit_vector(&self) -> (f64, f64) {
        if *self == Self::Center {
            return (0.0, 0.0);
        }
        let rad = self.angle().to_radians();
        (rad.sin(), -rad.cos())
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MotionType {
    Pro,
    Anti,
    Dash,
    Static,
    Float,
}

impl MotionType {
    pub fn is_shift(&self) -> bool {
        matches!(self, Self::Pro | Self::Anti | Self::Float)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum RotationDirection {
    #[strum(to_string = "cw", serialize = "clockwise")]
    Clockwise,
    #[strum(to_string = "ccw", serialize = "counter_clockwise")]
    CounterClockwise,
    #[strum(to_string = "no_rot", serialize = "none")]
    NoRotation,
}

impl RotationDirection {
    pub fn reversed(&self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
            Self::NoRotation => Self::NoRotation,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GridMode {
    #[default]
    Diamond,
    Box,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PropType {
    #[default]
    Staff,
    Club,
    Buugeng,
    Fan,
    Triad,
    Minihoop,
    Doublestar,
    Sword,
    Guitar,
    Ukulele,
    Hand,
    Bigstaff,
}

/// Count of half units, serialised as a JSON number (`1`, `1.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Halves(pub u16);

impl Halves {
    pub const ONE: Self = Self(2);

    pub fn from_f64(value: f64) -> Option<Self> {
        let doubled = value * 2.0;
        (value >= 0.0 && doubled.fract() == 0.0 && doubled <= u16::MAX as f64)
            .then_some(Self(doubled as u16))
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 2.0
    }

    pub fn is_whole(&self) -> bool {
        self.0 % 2 == 0
    }

    /// Number of whole slots this value occupies, rounding up.
    pub fn ceil(&self) -> u32 {
        (self.0 as u32).div_ceil(2)
    }
}

impl fmt::Display for Halves {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}", self.as_f64())
        }
    }
}

impl Serialize for Halves {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() {
            serializer.serialize_u64(self.0 as u64 / 2)
        } else {
            serializer.serialize_f64(self.as_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Halves {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::from_f64(value).ok_or_else(|| {
            serde::de::Error::custom(format!("{value} is not a non-negative multiple of 0.5"))
        })
    }
}

pub const MAX_TURNS: Halves = Halves(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turns {
    Count(Halves),
    Float,
}

impl Turns {
    pub const ZERO: Self = Self::Count(Halves(0));

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn count(&self) -> Option<Halves> {
        match self {
            Self::Count(h) => Some(*h),
            Self::Float => None,
        }
    }

    /// Parses `"fl"`, or a number in `0..=3` by halves.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "fl" => Some(Self::Float),
            other => other
                .parse::<f64>()
                .ok()
                .and_then(Halves::from_f64)
                .filter(|h| *h <= MAX_TURNS)
                .map(Self::Count),
        }
    }
}

impl Default for Turns {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Turns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(h) => write!(f, "{h}"),
            Self::Float => write!(f, "fl"),
        }
    }
}

impl Serialize for Turns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(h) => h.serialize(serializer),
            Self::Float => serializer.serialize_str("fl"),
        }
    }
}

impl<'de> Deserialize<'de> for Turns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Halves::from_f64(n)
                .filter(|h| *h <= MAX_TURNS)
                .map(Turns::Count),
            Raw::Text(s) => Turns::parse(&s),
        };
        parsed.ok_or_else(|| serde::de::Error::custom("turns must be 0..=3 in halves or \"fl\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_letter_has_one_type() {
        let total: usize = LetterType::iter().map(|t| t.letters().len()).sum();
        assert_eq!(total, Letter::iter().count());
        assert_eq!(LetterType::of(Letter::WDash), LetterType::Type3);
        assert_eq!(LetterType::of(Letter::Gamma), LetterType::Type6);
    }

    #[test]
    fn test_letter_serialization() {
        let cases = vec![
            ("\"A\"", Letter::A),
            ("\"Σ\"", Letter::Sigma),
            ("\"θ-\"", Letter::ThetaDash),
            ("\"Λ-\"", Letter::LambdaDash),
        ];
        for (json, expected) in cases {
            let letter: Letter = serde_json::from_str(json).unwrap();
            assert_eq!(letter, expected);
            assert_eq!(serde_json::to_string(&letter).unwrap(), json);
        }
        assert!(serde_json::from_str::<Letter>("\"Q-\"").is_err());
    }

    #[test]
    fn test_location_deserialization() {
        let cases = vec![
            ("\"n\"", Location::North),
            ("\"N\"", Location::North),
            ("\"north\"", Location::North),
            ("\"SE\"", Location::SouthEast),
            ("\"center\"", Location::Center),
        ];
        for (json, expected) in cases {
            let loc: Location = serde_json::from_str(json).unwrap();
            assert_eq!(loc, expected);
        }
        assert_eq!(serde_json::to_string(&Location::NorthWest).unwrap(), "\"nw\"");
    }

    #[test]
    fn test_location_geometry() {
        assert_eq!(Location::North.rotated_cw(), Location::East);
        assert_eq!(Location::North.rotated_ccw(), Location::West);
        assert_eq!(Location::SouthWest.opposite(), Location::NorthEast);
        assert_eq!(Location::East.mirrored(), Location::West);
        assert_eq!(Location::NorthEast.mirrored(), Location::NorthWest);
        assert_eq!(Location::North.mirrored(), Location::North);
        assert_eq!(
            Location::between(Location::North, Location::East),
            Some(Location::NorthEast)
        );
        assert_eq!(
            Location::between(Location::NorthEast, Location::NorthWest),
            Some(Location::North)
        );
        assert_eq!(Location::between(Location::North, Location::South), None);

        let (x, y) = Location::East.unit_vector();
        assert!((x - 1.0).abs() < 1e-9 && y.abs() < 1e-9);
    }

    #[test]
    fn test_rotation_direction_strings() {
        assert_eq!(RotationDirection::NoRotation.to_string(), "no_rot");
        let parsed: RotationDirection = serde_json::from_str("\"CCW\"").unwrap();
        assert_eq!(parsed, RotationDirection::CounterClockwise);
    }

    #[test]
    fn test_turns_serde() {
        assert_eq!(serde_json::to_string(&Turns::ZERO).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&Turns::Count(Halves(3))).unwrap(),
            "1.5"
        );
        assert_eq!(serde_json::to_string(&Turns::Float).unwrap(), "\"fl\"");

        let parsed: Turns = serde_json::from_str("2.5").unwrap();
        assert_eq!(parsed, Turns::Count(Halves(5)));
        let parsed: Turns = serde_json::from_str("\"fl\"").unwrap();
        assert!(parsed.is_float());
        assert!(serde_json::from_str::<Turns>("0.3").is_err());
        assert!(serde_json::from_str::<Turns>("4").is_err());
    }

    #[test]
    fn test_halves_ceil() {
        assert_eq!(Halves(2).ceil(), 1);
        assert_eq!(Halves(3).ceil(), 2);
        assert_eq!(Halves(4).ceil(), 2);
    }

    #[test]
    fn test_color_map_index() {
        let mut map = ColorMap::new(1, 2);
        map[Color::Red] = 5;
        assert_eq!(map[Color::Blue], 1);
        map.swap();
        assert_eq!(map.blue, 5);
    }
}
