//! Column naming for flattened games.
//!
//! Nested fields are addressed by `/`-separated paths; list elements by their index, e.g.
//! `teams/1/players/4/identifier`.

use std::sync::LazyLock;

use regex::Regex;

use crate::frame::Frame;

pub const SEPARATOR: &str = "/";
pub const GAME_DT_COLUMN: &str = "dt";
pub const SEASON_YEAR_COLUMN: &str = "year";
pub const SEASON_TYPE_COLUMN: &str = "season_type";
pub const SEASON_START_DT_COLUMN: &str = "season/start_dt";

const TEAMS: &str = "teams";
const PLAYERS: &str = "players";
const IDENTIFIER: &str = "identifier";
const POINTS: &str = "points";
const SKILL: &str = "skill";

static PLAYER_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^teams/(\d+)/players/(\d+)/identifier$").unwrap());

pub fn join<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

pub fn team_column_prefix(team: usize) -> String {
    format!("{TEAMS}{SEPARATOR}{team}")
}

pub fn team_identifier_column(team: usize) -> String {
    join(&[team_column_prefix(team).as_str(), IDENTIFIER])
}

pub fn team_points_column(team: usize) -> String {
    join(&[team_column_prefix(team).as_str(), POINTS])
}

pub fn player_column_prefix(team: usize, player: usize) -> String {
    format!("{}{SEPARATOR}{PLAYERS}{SEPARATOR}{player}", team_column_prefix(team))
}

pub fn player_identifier_column(team: usize, player: usize) -> String {
    join(&[player_column_prefix(team, player).as_str(), IDENTIFIER])
}

pub fn team_skill_column(team: usize, window: &str, field: &str) -> String {
    join(&[team_column_prefix(team).as_str(), SKILL, window, field])
}

pub fn player_skill_column(team: usize, player: usize, window: &str, field: &str) -> String {
    join(&[player_column_prefix(team, player).as_str(), SKILL, window, field])
}

/// The number of leading team slots that have an identifier column.
pub fn find_team_count(frame: &Frame) -> usize {
    let mut team_count = 0;
    while frame.has_column(&team_identifier_column(team_count)) {
        team_count += 1;
    }
    team_count
}

/// One more than the highest player slot with an identifier column under `team`; zero if the team
/// has no player columns.
pub fn find_player_count(frame: &Frame, team: usize) -> usize {
    frame
        .names()
        .iter()
        .filter_map(|name| PLAYER_IDENTIFIER.captures(name))
        .filter(|captures| captures[1].parse::<usize>().ok() == Some(team))
        .filter_map(|captures| captures[2].parse::<usize>().ok())
        .max()
        .map_or(0, |player| player + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Cell;

    #[test]
    fn names() {
        assert_eq!("teams/0/identifier", team_identifier_column(0));
        assert_eq!("teams/3/points", team_points_column(3));
        assert_eq!("teams/1/players/12/identifier", player_identifier_column(1, 12));
        assert_eq!("teams/1/skill/5y/ordinal", team_skill_column(1, "5y", "ordinal"));
        assert_eq!(
            "teams/0/players/2/skill/all/mu",
            player_skill_column(0, 2, "all", "mu")
        );
        assert_eq!("venue/address/city", join(&["venue", "address", "city"]));
    }

    #[test]
    fn discover_slots() {
        let mut frame = Frame::with_rows(1);
        for name in [
            "dt",
            "teams/0/identifier",
            "teams/1/identifier",
            "teams/3/identifier",
            "teams/0/players/0/identifier",
            "teams/0/players/4/identifier",
            "teams/1/players/0/kicks",
            "teams/10/players/7/identifier",
        ] {
            frame.push_column(name, vec![Cell::Null]).unwrap();
        }
        assert_eq!(2, find_team_count(&frame));
        assert_eq!(5, find_player_count(&frame, 0));
        assert_eq!(0, find_player_count(&frame, 1));
        assert_eq!(8, find_player_count(&frame, 10));
    }
}
