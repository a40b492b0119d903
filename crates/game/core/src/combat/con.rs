use strum::Display;

/// Risk band of a mob relative to the player, by level difference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ConColor {
    Gray,
    Green,
    LightBlue,
    Blue,
    White,
    Yellow,
    Red,
}

impl ConColor {
    pub fn of(player_level: u32, mob_level: u32) -> Self {
        let diff = i64::from(mob_level) - i64::from(player_level);
        match diff {
            3.. => Self::Red,
            1..=2 => Self::Yellow,
            0 => Self::White,
            -3..=-1 => Self::Blue,
            -6..=-4 => Self::LightBlue,
            -10..=-7 => Self::Green,
            _ => Self::Gray,
        }
    }
}
