//! Assembly of derived feature columns onto a frame of games.

use anyhow::bail;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::frame::columns::{
    find_player_count, find_team_count, player_skill_column, team_skill_column, GAME_DT_COLUMN,
    SEASON_START_DT_COLUMN, SEASON_TYPE_COLUMN, SEASON_YEAR_COLUMN,
};
use crate::frame::{Cell, Frame, FrameError};
use crate::rating;
use crate::rating::PlackettLuce;
use crate::skill::{extract_fixtures, SkillEngine, Window};

const TEAM_FIELDS: [&str; 5] = ["mu", "sigma", "ordinal", "win_probability", "rank"];
const PLAYER_FIELDS: [&str; 3] = ["mu", "sigma", "ordinal"];

/// Appends derived columns to a frame, leaving existing columns and row order untouched.
pub trait Feature {
    fn process(&self, frame: Frame) -> Result<Frame, FrameError>;
}

/// Applies each of `features` in turn.
pub fn process_all(features: &[Box<dyn Feature>], frame: Frame) -> Result<Frame, FrameError> {
    features
        .iter()
        .try_fold(frame, |frame, feature| feature.process(frame))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub windows: Vec<Window>,
    pub model: rating::Config,
    /// Whether to emit per-player columns in addition to per-team ones.
    pub players: bool,
}
impl Config {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.windows.is_empty() {
            bail!("at least one window must be specified");
        }
        for (index, window) in self.windows.iter().enumerate() {
            if self.windows[..index].contains(window) {
                bail!("duplicate window {window}");
            }
        }
        self.model.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            windows: vec![Window::Years(1), Window::All],
            model: rating::Config::default(),
            players: true,
        }
    }
}

/// Pre-game skill ratings, one set of columns per configured window.
#[derive(Debug)]
pub struct SkillFeature {
    config: Config,
    model: PlackettLuce,
}
impl SkillFeature {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn model(&self) -> &PlackettLuce {
        &self.model
    }
}

impl TryFrom<Config> for SkillFeature {
    type Error = anyhow::Error;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        config.validate()?;
        let model = PlackettLuce::try_from(config.model.clone())?;
        Ok(Self { config, model })
    }
}

impl Feature for SkillFeature {
    fn process(&self, mut frame: Frame) -> Result<Frame, FrameError> {
        let rows = frame.rows();
        let fixtures = extract_fixtures(&frame);
        let team_count = find_team_count(&frame);
        let player_counts: Vec<_> = (0..team_count)
            .map(|team| {
                if self.config.players {
                    find_player_count(&frame, team)
                } else {
                    0
                }
            })
            .collect();
        info!(
            "rating {} of {rows} rows across {team_count} team slots",
            fixtures.len()
        );

        for window in &self.config.windows {
            let skills = SkillEngine::new(&self.model, *window).run(&fixtures);
            let mut team_columns: Vec<[Vec<Cell>; 5]> =
                (0..team_count).map(|_| null_columns(rows)).collect();
            let mut player_columns: Vec<Vec<[Vec<Cell>; 3]>> = player_counts
                .iter()
                .map(|&count| (0..count).map(|_| null_columns(rows)).collect())
                .collect();

            for skill in &skills {
                for team in &skill.teams {
                    let values = [
                        team.rating.mu,
                        team.rating.sigma,
                        team.rating.ordinal(),
                        team.win_probability,
                        team.rank as f64,
                    ];
                    for (column, value) in team_columns[team.slot].iter_mut().zip(values) {
                        column[skill.row] = value.into();
                    }
                    for &(slot, rating) in &team.players {
                        let Some(columns) = player_columns[team.slot].get_mut(slot) else {
                            continue;
                        };
                        let values = [rating.mu, rating.sigma, rating.ordinal()];
                        for (column, value) in columns.iter_mut().zip(values) {
                            column[skill.row] = value.into();
                        }
                    }
                }
            }

            let label = window.to_string();
            for (team, columns) in team_columns.into_iter().enumerate() {
                for (field, cells) in TEAM_FIELDS.iter().zip(columns) {
                    frame.push_column(team_skill_column(team, &label, field), cells)?;
                }
            }
            for (team, players) in player_columns.into_iter().enumerate() {
                for (player, columns) in players.into_iter().enumerate() {
                    for (field, cells) in PLAYER_FIELDS.iter().zip(columns) {
                        frame.push_column(player_skill_column(team, player, &label, field), cells)?;
                    }
                }
            }
            debug!("appended skill columns for window {label}");
        }
        Ok(frame)
    }
}

fn null_columns<const N: usize>(rows: usize) -> [Vec<Cell>; N] {
    std::array::from_fn(|_| vec![Cell::Null; rows])
}

/// The start of each game's season: the datetime of the first row, in row order, sharing its year
/// and season type.
#[derive(Debug, Default)]
pub struct SeasonStartFeature;

impl Feature for SeasonStartFeature {
    fn process(&self, mut frame: Frame) -> Result<Frame, FrameError> {
        let keys: Vec<_> = (0..frame.rows())
            .map(|row| {
                let year = frame.cell(row, SEASON_YEAR_COLUMN).and_then(Cell::as_text)?;
                let season_type = frame
                    .cell(row, SEASON_TYPE_COLUMN)
                    .and_then(Cell::as_text)
                    .unwrap_or_default();
                let dt = frame.cell(row, GAME_DT_COLUMN).and_then(Cell::as_datetime)?;
                Some((format!("{year}-{season_type}"), dt))
            })
            .collect();

        let mut starts = FxHashMap::default();
        for (season, dt) in keys.iter().flatten() {
            starts.entry(season.as_str()).or_insert(*dt);
        }
        let cells = keys
            .iter()
            .map(|key| {
                Cell::from(
                    key.as_ref()
                        .and_then(|(season, _)| starts.get(season.as_str()))
                        .copied(),
                )
            })
            .collect();
        frame.push_column(SEASON_START_DT_COLUMN, cells)?;
        Ok(frame)
    }
}
