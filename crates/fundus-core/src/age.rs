use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Whole calendar years between `birthdate` and `today`.
///
/// One year is subtracted when today's month/day precedes the birth
/// month/day, so the age increments on the birthday itself.
pub fn real_age(birthdate: Date, today: Date) -> i32 {
    let mut age = i32::from(today.year()) - i32::from(birthdate.year());
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age
}

/// How far the fundus age sits above the chronological age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AgeDeltaBand {
    /// Fundus age at or below real age.
    Favorable,
    /// One to five years above.
    MildCaution,
    /// More than five years above.
    StrongCaution,
}

impl AgeDeltaBand {
    pub const MILD_CEILING: i32 = 5;

    pub fn classify(delta: i32) -> Self {
        if delta <= 0 {
            Self::Favorable
        } else if delta <= Self::MILD_CEILING {
            Self::MildCaution
        } else {
            Self::StrongCaution
        }
    }

    pub fn message(&self, delta: i32) -> String {
        match self {
            Self::Favorable => "目の健康状態は年齢相応か、それ以上に良好です。".to_string(),
            Self::MildCaution => {
                format!("実年齢より {delta} 歳ほど高めです。生活習慣の見直しをおすすめします。")
            }
            Self::StrongCaution => {
                format!("実年齢より {delta} 歳以上高めです。定期的なチェックを強くおすすめします。")
            }
        }
    }
}

/// Fundus age compared against real age, with its display message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FundusAgeSummary {
    pub fundus_age: i32,
    pub delta: i32,
    pub band: AgeDeltaBand,
    pub message: String,
}

impl FundusAgeSummary {
    pub fn new(fundus_age: i32, real_age: i32) -> Self {
        let delta = fundus_age.saturating_sub(real_age);
        let band = AgeDeltaBand::classify(delta);
        Self {
            fundus_age,
            delta,
            band,
            message: band.message(delta),
        }
    }
}
