//! Console tables for the command-line tools.

use stanza::style::HAlign::Left;
use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};

use crate::league::CombinedGame;
use crate::rating::Rating;

/// Tabulates `standings` in the given order, one rated entrant per row.
pub fn tabulate_ratings(standings: &[(String, Rating)]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(4)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(20)).with(Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "#".into(),
                "Team".into(),
                "Mu".into(),
                "Sigma".into(),
                "Ordinal".into(),
            ],
        ));
    for (index, (identifier, rating)) in standings.iter().enumerate() {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{}", index + 1).into(),
                identifier.clone().into(),
                format!("{:.3}", rating.mu).into(),
                format!("{:.3}", rating.sigma).into(),
                format!("{:.3}", rating.ordinal()).into(),
            ],
        ));
    }
    table
}

/// Tabulates the games that could not be merged.
pub fn tabulate_failures(games: &[CombinedGame]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(10)).with(Left)),
            Col::new(Styles::default().with(MinWidth(30)).with(Left)),
            Col::new(Styles::default().with(MinWidth(20)).with(Left)),
            Col::new(Styles::default().with(MinWidth(30)).with(Left)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Date".into(),
                "Participants".into(),
                "Providers".into(),
                "Error".into(),
            ],
        ));
    for game in games {
        if let Err(err) = &game.result {
            table.push_row(Row::new(
                Styles::default(),
                vec![
                    game.key.date.to_string().into(),
                    game.key.participants.join(" v ").into(),
                    game.providers.join(", ").into(),
                    err.to_string().into(),
                ],
            ));
        }
    }
    table
}
