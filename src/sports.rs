use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ReportError;

/// Sports published by the Elo report pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sport {
    CollegeBasketball,
    CollegeFootball,
    CollegeBaseball,
    CollegeHockey,
    CollegeLacrosse,
    Nba,
    Nfl,
    Mlb,
    Nhl,
    Pll,
}

impl Sport {
    /// Catalog order, as shown in sport pickers.
    pub const ALL: [Sport; 10] = [
        Sport::CollegeBasketball,
        Sport::CollegeFootball,
        Sport::CollegeBaseball,
        Sport::CollegeHockey,
        Sport::CollegeLacrosse,
        Sport::Nba,
        Sport::Nfl,
        Sport::Mlb,
        Sport::Nhl,
        Sport::Pll,
    ];

    /// Short key used in routes and query strings.
    pub fn key(self) -> &'static str {
        match self {
            Sport::CollegeBasketball => "COLLEGE_BASKETBALL",
            Sport::CollegeFootball => "COLLEGE_FOOTBALL",
            Sport::CollegeBaseball => "COLLEGE_BASEBALL",
            Sport::CollegeHockey => "COLLEGE_HOCKEY",
            Sport::CollegeLacrosse => "COLLEGE_LACROSSE",
            Sport::Nba => "NBA",
            Sport::Nfl => "NFL",
            Sport::Mlb => "MLB",
            Sport::Nhl => "NHL",
            Sport::Pll => "PLL",
        }
    }

    /// Path segment of this sport's directory in the report store.
    pub fn path(self) -> &'static str {
        match self {
            Sport::CollegeBasketball => "basketball/mens-college-basketball",
            Sport::CollegeFootball => "football/college-football",
            Sport::CollegeBaseball => "baseball/college-baseball",
            Sport::CollegeHockey => "hockey/mens-college-hockey",
            Sport::CollegeLacrosse => "lacrosse/mens-college-lacrosse",
            Sport::Nba => "basketball/nba",
            Sport::Nfl => "football/nfl",
            Sport::Mlb => "baseball/mlb",
            Sport::Nhl => "hockey/nhl",
            Sport::Pll => "lacrosse/pll",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Sport::CollegeBasketball => "College Basketball",
            Sport::CollegeFootball => "College Football",
            Sport::CollegeBaseball => "College Baseball",
            Sport::CollegeHockey => "College Hockey",
            Sport::CollegeLacrosse => "College Lacrosse",
            Sport::Nba => "NBA",
            Sport::Nfl => "NFL",
            Sport::Mlb => "MLB",
            Sport::Nhl => "NHL",
            Sport::Pll => "PLL",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Sport {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Sport::ALL
            .into_iter()
            .find(|sport| sport.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ReportError::UnknownSport(s.to_string()))
    }
}

impl Serialize for Sport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// Catalog entry as exposed by `/api/sports`.
#[derive(Debug, Clone, Serialize)]
pub struct SportInfo {
    pub key: Sport,
    pub name: &'static str,
    pub path: &'static str,
}

pub fn catalog() -> Vec<SportInfo> {
    Sport::ALL
        .into_iter()
        .map(|sport| SportInfo {
            key: sport,
            name: sport.display_name(),
            path: sport.path(),
        })
        .collect()
}
