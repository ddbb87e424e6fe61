use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::identity::IdentityMap;
use crate::model::{Team, Venue};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString, Display,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum League {
    Afl,
    Epl,
    Mlb,
    Nba,
    Ncaab,
    Ncaaf,
    Nfl,
    Nhl,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString, Display,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SeasonType {
    Preseason,
    Regular,
    Postseason,
    Offseason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    pub pool: String,
    pub combination: Vec<String>,
    pub dividend: f64,
}
impl Dividend {
    pub fn key(&self) -> (String, Vec<String>) {
        (self.pool.clone(), self.combination.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub dt: NaiveDateTime,
    pub league: League,
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default)]
    pub game_number: Option<u32>,
    #[serde(default)]
    pub venue: Option<Venue>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub end_dt: Option<NaiveDateTime>,
    #[serde(default)]
    pub attendance: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub season_type: Option<SeasonType>,
    #[serde(default)]
    pub postponed: Option<bool>,
    #[serde(default)]
    pub play_off: Option<bool>,
    #[serde(default)]
    pub dividends: Vec<Dividend>,
}
impl Game {
    pub fn new(league: League, dt: NaiveDateTime) -> Self {
        Self {
            dt,
            league,
            week: None,
            game_number: None,
            venue: None,
            teams: vec![],
            end_dt: None,
            attendance: None,
            year: None,
            season_type: None,
            postponed: None,
            play_off: None,
            dividends: vec![],
        }
    }

    /// Identifies the real-world fixture this record describes, independently of the provider's
    /// spelling of the participants. A record without a season is keyed by its calendar year.
    pub fn key(&self, teams: &IdentityMap) -> GameKey {
        let mut participants: Vec<_> = self
            .teams
            .iter()
            .map(|team| {
                teams
                    .resolve(&team.identifier)
                    .unwrap_or(team.identifier.as_str())
                    .to_string()
            })
            .collect();
        participants.sort();
        GameKey {
            league: self.league,
            year: self.year.unwrap_or(self.dt.year()),
            date: self.dt.date(),
            participants,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameKey {
    pub league: League,
    /// The season, or the calendar year of the game where no season is given.
    pub year: i32,
    pub date: NaiveDate,
    pub participants: Vec<String>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;
    use crate::testing::{dt, game, team};

    #[test]
    fn league_names() {
        assert_eq!(League::Afl, League::from_str("afl").unwrap());
        assert_eq!("ncaaf", League::Ncaaf.to_string());
        assert_eq!(r#""nba""#, serde_json::to_string(&League::Nba).unwrap());
        assert!(League::from_str("cfl").is_err());
    }

    #[test]
    fn names_parse_back() {
        for league in League::iter() {
            assert_eq!(league, League::from_str(&league.to_string()).unwrap());
        }
        for season_type in SeasonType::iter() {
            let json = serde_json::to_string(&season_type).unwrap();
            assert_eq!(format!(r#""{season_type}""#), json);
        }
        assert_eq!(8, League::iter().count());
    }

    #[test]
    fn key_ignores_spelling_and_order() {
        let map = IdentityMap::from_iter([("Sydney Swans", "swans_idx"), ("Geelong Cats", "geelong_idx")]);
        let afltables = game(dt(2024, 4, 6, 19, 30), vec![team("swans_idx", None), team("geelong_idx", None)]);
        let oddsportal = game(
            dt(2024, 4, 6, 19, 25),
            vec![team("Geelong Cats", None), team("Sydney Swans", None)],
        );
        assert_eq!(afltables.key(&map), oddsportal.key(&map));
        assert_eq!(vec!["geelong_idx", "swans_idx"], afltables.key(&map).participants);
    }

    #[test]
    fn key_without_season_uses_calendar_year() {
        let map = IdentityMap::default();
        let seasoned = game(dt(2024, 4, 6, 19, 30), vec![team("a", None), team("b", None)]);
        let unseasoned = Game {
            year: None,
            ..seasoned.clone()
        };
        assert_eq!(2024, unseasoned.key(&map).year);
        assert_eq!(seasoned.key(&map), unseasoned.key(&map));
    }

    #[test]
    fn key_separates_dates() {
        let map = IdentityMap::default();
        let first = game(dt(2024, 4, 6, 19, 30), vec![team("a", None), team("b", None)]);
        let rematch = game(dt(2024, 8, 10, 13, 45), vec![team("a", None), team("b", None)]);
        assert_ne!(first.key(&map), rematch.key(&map));
    }
}
