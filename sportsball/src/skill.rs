//! Point-in-time skill ratings over a chronological stream of games.
//!
//! Games are replayed in order of their start time. Before a game updates any rating, the ratings
//! of its participants are snapshotted; the snapshot is therefore a function of earlier games
//! only. Teams and players are rated in separate pools.

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Months, NaiveDateTime};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::frame::columns::{
    find_player_count, find_team_count, player_identifier_column, team_identifier_column,
    team_points_column, GAME_DT_COLUMN,
};
use crate::frame::{Cell, Frame};
use crate::rating::{PlackettLuce, Rating};

/// The lookback period of a rating computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Window {
    All,
    Years(u32),
}
impl Window {
    /// The earliest start time of a game that may inform ratings at `dt`, or `None` if the window
    /// is unbounded.
    pub fn start(&self, dt: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Window::All => None,
            Window::Years(years) => Some(
                dt.checked_sub_months(Months::new(years.saturating_mul(12)))
                    .unwrap_or(NaiveDateTime::MIN),
            ),
        }
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Window::All => write!(f, "all"),
            Window::Years(years) => write!(f, "{years}y"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid window {0:?}")]
pub struct ParseWindowError(String);

impl FromStr for Window {
    type Err = ParseWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Window::All);
        }
        let years = s.strip_suffix('y').unwrap_or(s);
        match years.parse() {
            Ok(years) if years > 0 => Ok(Window::Years(years)),
            _ => Err(ParseWindowError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Window {
    type Error = ParseWindowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Window> for String {
    fn from(window: Window) -> Self {
        window.to_string()
    }
}

/// A team's appearance in a game.
#[derive(Debug, Clone, PartialEq)]
pub struct Entrant {
    pub slot: usize,
    pub identifier: String,
    /// Absent for a game not yet played, or one a provider did not score.
    pub points: Option<f64>,
    pub players: Vec<(usize, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    /// Index of the row the fixture was read from.
    pub row: usize,
    pub dt: NaiveDateTime,
    pub entrants: Vec<Entrant>,
}

/// Pre-game skill of one entrant.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSkill {
    pub slot: usize,
    pub rating: Rating,
    pub win_probability: f64,
    /// 1 for the entrant with the highest ordinal.
    pub rank: usize,
    pub players: Vec<(usize, Rating)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixtureSkill {
    pub row: usize,
    pub teams: Vec<TeamSkill>,
}

#[derive(Debug, Default)]
struct Pools {
    teams: FxHashMap<String, Rating>,
    players: FxHashMap<String, Rating>,
}

pub struct SkillEngine<'a> {
    model: &'a PlackettLuce,
    window: Window,
}
impl<'a> SkillEngine<'a> {
    pub fn new(model: &'a PlackettLuce, window: Window) -> Self {
        Self { model, window }
    }

    /// Computes the pre-game skill of every fixture. `fixtures` must be in chronological order; the
    /// output is in the same order.
    pub fn run(&self, fixtures: &[Fixture]) -> Vec<FixtureSkill> {
        let mut pools = Pools::default();
        let mut history: VecDeque<usize> = VecDeque::new();
        let mut skills = Vec::with_capacity(fixtures.len());
        for (index, fixture) in fixtures.iter().enumerate() {
            if let Some(start) = self.window.start(fixture.dt) {
                let retained = history.len();
                while history
                    .front()
                    .is_some_and(|&earlier| fixtures[earlier].dt < start)
                {
                    history.pop_front();
                }
                if history.len() != retained {
                    debug!(
                        "window {} evicted {} games before {start}; replaying {}",
                        self.window,
                        retained - history.len(),
                        history.len()
                    );
                    pools = Pools::default();
                    for &earlier in &history {
                        self.update(&mut pools, &fixtures[earlier]);
                    }
                }
                history.push_back(index);
            }
            skills.push(self.snapshot(&pools, fixture));
            self.update(&mut pools, fixture);
        }
        skills
    }

    /// The team ratings after every fixture has been played, as seen from the last fixture's
    /// datetime, in descending order of ordinal.
    pub fn standings(&self, fixtures: &[Fixture]) -> Vec<(String, Rating)> {
        let Some(last) = fixtures.last() else {
            return vec![];
        };
        let start = self.window.start(last.dt);
        let mut pools = Pools::default();
        for fixture in fixtures {
            if start.map_or(true, |start| fixture.dt >= start) {
                self.update(&mut pools, fixture);
            }
        }
        let mut standings: Vec<_> = pools.teams.into_iter().collect();
        standings.sort_by(|(a_identifier, a), (b_identifier, b)| {
            b.ordinal()
                .total_cmp(&a.ordinal())
                .then_with(|| a_identifier.cmp(b_identifier))
        });
        standings
    }

    fn team_rating(&self, pools: &Pools, identifier: &str) -> Rating {
        pools
            .teams
            .get(identifier)
            .copied()
            .unwrap_or_else(|| self.model.rating())
    }

    fn player_rating(&self, pools: &Pools, identifier: &str) -> Rating {
        pools
            .players
            .get(identifier)
            .copied()
            .unwrap_or_else(|| self.model.rating())
    }

    fn snapshot(&self, pools: &Pools, fixture: &Fixture) -> FixtureSkill {
        let ratings: Vec<_> = fixture
            .entrants
            .iter()
            .map(|entrant| self.team_rating(pools, &entrant.identifier))
            .collect();
        let probabilities = self.model.predict_win(
            &ratings.iter().map(|&rating| vec![rating]).collect::<Vec<_>>(),
        );
        let teams = fixture
            .entrants
            .iter()
            .zip(ratings.iter().zip(probabilities))
            .map(|(entrant, (rating, win_probability))| TeamSkill {
                slot: entrant.slot,
                rating: *rating,
                win_probability,
                rank: 1 + ratings
                    .iter()
                    .filter(|other| other.ordinal() > rating.ordinal())
                    .count(),
                players: entrant
                    .players
                    .iter()
                    .map(|(slot, identifier)| (*slot, self.player_rating(pools, identifier)))
                    .collect(),
            })
            .collect();
        FixtureSkill {
            row: fixture.row,
            teams,
        }
    }

    fn update(&self, pools: &mut Pools, fixture: &Fixture) {
        let scored: Vec<(&Entrant, f64)> = fixture
            .entrants
            .iter()
            .filter_map(|entrant| entrant.points.map(|points| (entrant, points)))
            .collect();
        if scored.len() < 2 {
            return;
        }

        let teams: Vec<_> = scored
            .iter()
            .map(|(entrant, _)| vec![self.team_rating(pools, &entrant.identifier)])
            .collect();
        let points: Vec<_> = scored.iter().map(|(_, points)| *points).collect();
        for ((entrant, _), rated) in scored.iter().zip(self.model.rate(&teams, &points)) {
            pools.teams.insert(entrant.identifier.clone(), rated[0]);
        }

        let lineups: Vec<_> = scored
            .into_iter()
            .filter(|(entrant, _)| !entrant.players.is_empty())
            .collect();
        if lineups.len() < 2 {
            return;
        }
        let teams: Vec<Vec<_>> = lineups
            .iter()
            .map(|(entrant, _)| {
                entrant
                    .players
                    .iter()
                    .map(|(_, identifier)| self.player_rating(pools, identifier))
                    .collect()
            })
            .collect();
        let points: Vec<_> = lineups.iter().map(|(_, points)| *points).collect();
        for ((entrant, _), rated) in lineups.iter().zip(self.model.rate(&teams, &points)) {
            for ((_, identifier), rating) in entrant.players.iter().zip(rated) {
                pools.players.insert(identifier.clone(), rating);
            }
        }
    }
}

/// Reads the fixtures of a frame in chronological order, ties broken by row.
///
/// A team slot is read only where it has an identifier; a player slot likewise. Rows without a
/// usable game datetime are skipped.
pub fn extract_fixtures(frame: &Frame) -> Vec<Fixture> {
    let Some(dts) = frame.column(GAME_DT_COLUMN) else {
        warn!("frame has no {GAME_DT_COLUMN} column");
        return vec![];
    };
    let slots: Vec<TeamColumns> = (0..find_team_count(frame))
        .map(|team| TeamColumns::new(frame, team))
        .collect();

    let mut fixtures = vec![];
    for (row, dt) in dts.iter().enumerate() {
        let Some(dt) = dt.as_datetime() else {
            debug!("skipping row {row} without a game datetime");
            continue;
        };
        let entrants = slots
            .iter()
            .enumerate()
            .filter_map(|(slot, columns)| columns.entrant(slot, row))
            .collect();
        fixtures.push(Fixture { row, dt, entrants });
    }
    fixtures.sort_by_key(|fixture| (fixture.dt, fixture.row));
    fixtures
}

struct TeamColumns<'a> {
    identifiers: Option<&'a [Cell]>,
    points: Option<&'a [Cell]>,
    players: Vec<(usize, &'a [Cell])>,
}
impl<'a> TeamColumns<'a> {
    fn new(frame: &'a Frame, team: usize) -> Self {
        Self {
            identifiers: frame.column(&team_identifier_column(team)),
            points: frame.column(&team_points_column(team)),
            players: (0..find_player_count(frame, team))
                .filter_map(|player| {
                    frame
                        .column(&player_identifier_column(team, player))
                        .map(|column| (player, column))
                })
                .collect(),
        }
    }

    fn entrant(&self, slot: usize, row: usize) -> Option<Entrant> {
        let identifier = self.identifiers?[row].as_text()?.into_owned();
        let points = self
            .points
            .and_then(|points| points[row].as_f64())
            .filter(|points| points.is_finite());
        let players = self
            .players
            .iter()
            .filter_map(|(player, column)| {
                column[row]
                    .as_text()
                    .map(|identifier| (*player, identifier.into_owned()))
            })
            .collect();
        Some(Entrant {
            slot,
            identifier,
            points,
            players,
        })
    }
}
