use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::interest::{distinct_by, more_interesting, union_by, Combine};
use crate::model::Statistics;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bookie {
    pub identifier: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Odds {
    /// Decimal price.
    pub odds: f64,
    pub bookie: Bookie,
    #[serde(default)]
    pub dt: Option<NaiveDateTime>,
}
impl Odds {
    /// The same bookmaker quoting the same price is one observation, whenever it was captured.
    pub fn key(&self) -> String {
        format!("{}-{}", self.bookie.identifier, self.odds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News {
    pub title: String,
    pub published: NaiveDateTime,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}
impl News {
    pub fn key(&self) -> (String, NaiveDateTime) {
        (self.title.clone(), self.published)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coach {
    pub identifier: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl Combine for Coach {
    fn combine(self, candidate: Self) -> Self {
        Self {
            identifier: candidate.identifier,
            name: more_interesting(self.name, candidate.name),
            birth_date: more_interesting(self.birth_date, candidate.birth_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub identifier: String,
    #[serde(default)]
    pub jersey: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub statistics: Statistics,
}
impl Player {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            jersey: None,
            name: None,
            statistics: Statistics::default(),
        }
    }

    /// Players are matched across sources by jersey number where one is given, as identifiers are
    /// rarely shared between providers.
    pub fn key(&self) -> &str {
        self.jersey.as_deref().unwrap_or(&self.identifier)
    }
}

impl Combine for Player {
    fn combine(self, candidate: Self) -> Self {
        Self {
            identifier: candidate.identifier,
            jersey: more_interesting(self.jersey, candidate.jersey),
            name: more_interesting(self.name, candidate.name),
            statistics: self.statistics.combine(candidate.statistics),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub ladder_rank: Option<u32>,
    #[serde(default)]
    pub lbw: Option<u32>,
    #[serde(default)]
    pub end_dt: Option<NaiveDateTime>,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub odds: Vec<Odds>,
    #[serde(default)]
    pub news: Vec<News>,
    #[serde(default)]
    pub coaches: Vec<Coach>,
}
impl Team {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            location: None,
            points: None,
            ladder_rank: None,
            lbw: None,
            end_dt: None,
            statistics: Statistics::default(),
            players: vec![],
            odds: vec![],
            news: vec![],
            coaches: vec![],
        }
    }

    /// The team's statistics, with any counting statistic the provider left out summed from the
    /// team's players.
    pub fn totals(&self) -> Statistics {
        Statistics::accumulate(self.players.iter().map(|player| &player.statistics))
            .combine(self.statistics.clone())
    }
}

impl Combine for Team {
    fn combine(self, candidate: Self) -> Self {
        Self {
            identifier: candidate.identifier,
            name: candidate.name,
            location: more_interesting(self.location, candidate.location),
            points: more_interesting(self.points, candidate.points),
            ladder_rank: more_interesting(self.ladder_rank, candidate.ladder_rank),
            lbw: more_interesting(self.lbw, candidate.lbw),
            end_dt: more_interesting(self.end_dt, candidate.end_dt),
            statistics: self.statistics.combine(candidate.statistics),
            players: union_by(
                self.players,
                candidate.players,
                |player| player.key().to_string(),
                Combine::combine,
            ),
            odds: distinct_by(self.odds, candidate.odds, Odds::key),
            news: distinct_by(self.news, candidate.news, News::key),
            coaches: union_by(
                self.coaches,
                candidate.coaches,
                |coach| coach.identifier.clone(),
                Combine::combine,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bookie_odds, player};

    #[test]
    fn player_key_prefers_jersey() {
        let mut player = Player::new("p1");
        assert_eq!("p1", player.key());
        player.jersey = Some("10".into());
        assert_eq!("10", player.key());
    }

    #[test]
    fn odds_key() {
        assert_eq!("sportsbet-1.85", bookie_odds("sportsbet", 1.85).key());
    }

    #[test]
    fn team_unions_players_by_jersey() {
        let current = Team {
            players: vec![player("10", Some(3))],
            ..Team::new("swans_idx", "Sydney")
        };
        let candidate = Team {
            players: vec![player("10", None), player("11", Some(5))],
            ..Team::new("swans_idx", "Sydney Swans")
        };
        let combined = current.combine(candidate);
        assert_eq!("Sydney Swans", combined.name);
        assert_eq!(2, combined.players.len());
        assert_eq!(Some("10"), combined.players[0].jersey.as_deref());
        assert_eq!(Some(3), combined.players[0].statistics.kicks);
        assert_eq!(Some("11"), combined.players[1].jersey.as_deref());
        assert_eq!(Some(5), combined.players[1].statistics.kicks);
    }

    #[test]
    fn team_dedups_odds_keeping_first() {
        let first = Odds {
            dt: NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|date| date.and_hms_opt(9, 0, 0)),
            ..bookie_odds("tab", 2.1)
        };
        let current = Team {
            odds: vec![first.clone()],
            ..Team::new("swans_idx", "Sydney")
        };
        let candidate = Team {
            odds: vec![bookie_odds("tab", 2.1), bookie_odds("tab", 2.05)],
            ..Team::new("swans_idx", "Sydney")
        };
        let combined = current.combine(candidate);
        assert_eq!(vec![first, bookie_odds("tab", 2.05)], combined.odds);
    }

    #[test]
    fn totals_fall_back_to_player_sums() {
        let mut team = Team {
            players: vec![player("10", Some(12)), player("11", Some(9)), player("12", None)],
            ..Team::new("swans_idx", "Sydney")
        };
        team.statistics.marks = Some(80);
        team.players[0].statistics.marks = Some(5);
        team.statistics.kicks = Some(200);
        let totals = team.totals();
        assert_eq!(Some(200), totals.kicks);
        assert_eq!(Some(80), totals.marks);

        team.statistics.kicks = None;
        assert_eq!(Some(21), team.totals().kicks);
        assert_eq!(None, team.totals().goals);
    }

    #[test]
    fn team_scalars_fold() {
        let current = Team {
            points: Some(87.0),
            ladder_rank: Some(2),
            ..Team::new("swans_idx", "Sydney")
        };
        let candidate = Team {
            points: None,
            location: Some("Sydney".into()),
            ..Team::new("swans_idx", "Sydney")
        };
        let combined = current.combine(candidate);
        assert_eq!(Some(87.0), combined.points);
        assert_eq!(Some(2), combined.ladder_rank);
        assert_eq!(Some("Sydney".to_string()), combined.location);
    }
}
