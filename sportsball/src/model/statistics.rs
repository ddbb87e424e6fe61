//! Per-game statistics, shared by players and teams.

use serde::{Deserialize, Serialize};

use crate::interest::{more_interesting, Combine};

/// Declares an all-optional statistics record along with its field-wise merge, its ordered field
/// listing and the summation of its counting fields.
macro_rules! statistics {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            counts { $($count:ident),* $(,)? }
            rates { $($rate:ident),* $(,)? }
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $count: Option<u32>,
            )*
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $rate: Option<f64>,
            )*
        }
        impl $name {
            /// Field names paired with their values, in declaration order.
            pub fn fields(&self) -> Vec<(&'static str, Option<f64>)> {
                vec![
                    $((stringify!($count), self.$count.map(f64::from)),)*
                    $((stringify!($rate), self.$rate),)*
                ]
            }

            /// Sums the counting fields of `parts`. A field remains `None` unless at least one part
            /// carries it. Sums saturate at `u32::MAX`. Rates are not summable and are left empty.
            pub fn accumulate<'a>(parts: impl IntoIterator<Item = &'a Self>) -> Self {
                let mut sum = Self::default();
                for part in parts {
                    $(
                        if let Some(value) = part.$count {
                            let total = sum.$count.get_or_insert(0);
                            *total = total.saturating_add(value);
                        }
                    )*
                }
                sum
            }
        }

        impl Combine for $name {
            fn combine(self, candidate: Self) -> Self {
                Self {
                    $($count: more_interesting(self.$count, candidate.$count),)*
                    $($rate: more_interesting(self.$rate, candidate.$rate),)*
                }
            }
        }
    };
}

statistics! {
    /// Statistics recorded against a player or a team for a single game. Football codes, basketball
    /// and gridiron share the one record; providers fill in the fields relevant to their sport.
    pub struct Statistics {
        counts {
            kicks,
            marks,
            handballs,
            disposals,
            goals,
            behinds,
            hit_outs,
            tackles,
            rebounds,
            insides,
            clearances,
            clangers,
            free_kicks_for,
            free_kicks_against,
            brownlow_votes,
            contested_possessions,
            uncontested_possessions,
            contested_marks,
            marks_inside,
            one_percenters,
            bounces,
            goal_assists,
            field_goals,
            field_goals_attempted,
            offensive_rebounds,
            defensive_rebounds,
            assists,
            turnovers,
            steals,
            blocks,
            personal_fouls,
            free_throws,
            free_throws_attempted,
            fumbles,
            fumbles_lost,
            forced_fumbles,
        }
        rates {
            field_goals_percentage,
            free_throws_percentage,
            disposal_efficiency,
            time_on_ground,
        }
    }
}
