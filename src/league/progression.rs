// Player advancement and lasting injuries.

use serde::{Deserialize, Serialize};

/// Star Player Points needed to reach each level, starting at level 1
pub const SPP_THRESHOLDS: [i32; 7] = [0, 6, 16, 31, 51, 76, 176];

/// Level a player with `spp` Star Player Points has reached
pub fn level_for_spp(spp: i32) -> i32 {
    let reached = SPP_THRESHOLDS.iter().filter(|threshold| spp >= **threshold).count();
    // Level 1 is reached at 0 SPP, so a negative total still counts as level 1
    reached.max(1) as i32
}

/// A player characteristic that a lasting injury can reduce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Characteristic {
    Movement,
    Strength,
    Agility,
    Passing,
    Armor,
}

impl Characteristic {
    /// Column on the players table
    pub fn column(&self) -> &'static str {
        match self {
            Characteristic::Movement => "movement",
            Characteristic::Strength => "strength",
            Characteristic::Agility => "agility",
            Characteristic::Passing => "passing",
            Characteristic::Armor => "armor",
        }
    }

    /// Value after a one point reduction. Characteristics never drop below 1 and
    /// a player without a passing value keeps none.
    pub fn reduced(value: Option<i32>) -> Option<i32> {
        value.map(|v| (v - 1).max(1))
    }
}

/// Injury result entered on a stat line
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum InjuryType {
    #[serde(rename = "badly_hurt")]
    #[sqlx(rename = "badly_hurt")]
    BadlyHurt,
    #[serde(rename = "miss_next_game")]
    #[sqlx(rename = "miss_next_game")]
    MissNextGame,
    #[serde(rename = "niggling")]
    #[sqlx(rename = "niggling")]
    Niggling,
    #[serde(rename = "-1ma")]
    #[sqlx(rename = "-1ma")]
    MovementLoss,
    #[serde(rename = "-1av")]
    #[sqlx(rename = "-1av")]
    ArmorLoss,
    #[serde(rename = "-1ag")]
    #[sqlx(rename = "-1ag")]
    AgilityLoss,
    #[serde(rename = "-1st")]
    #[sqlx(rename = "-1st")]
    StrengthLoss,
    #[serde(rename = "-1pa")]
    #[sqlx(rename = "-1pa")]
    PassingLoss,
    #[serde(rename = "dead")]
    #[sqlx(rename = "dead")]
    Dead,
}

impl InjuryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InjuryType::BadlyHurt => "badly_hurt",
            InjuryType::MissNextGame => "miss_next_game",
            InjuryType::Niggling => "niggling",
            InjuryType::MovementLoss => "-1ma",
            InjuryType::ArmorLoss => "-1av",
            InjuryType::AgilityLoss => "-1ag",
            InjuryType::StrengthLoss => "-1st",
            InjuryType::PassingLoss => "-1pa",
            InjuryType::Dead => "dead",
        }
    }

    /// Badly hurt heals before the next match and leaves no record
    pub fn is_lasting(&self) -> bool {
        !matches!(self, InjuryType::BadlyHurt)
    }

    pub fn is_permanent(&self) -> bool {
        !matches!(self, InjuryType::BadlyHurt | InjuryType::MissNextGame)
    }

    pub fn characteristic(&self) -> Option<Characteristic> {
        match self {
            InjuryType::MovementLoss => Some(Characteristic::Movement),
            InjuryType::ArmorLoss => Some(Characteristic::Armor),
            InjuryType::AgilityLoss => Some(Characteristic::Agility),
            InjuryType::StrengthLoss => Some(Characteristic::Strength),
            InjuryType::PassingLoss => Some(Characteristic::Passing),
            _ => None,
        }
    }
}
