//! Per-team record aggregation over a set of games.

use std::collections::HashSet;

use crate::models::{Game, TeamId, TeamStats};

/// Aggregate a team's record over `games`.
///
/// Only completed games the team played in count. With `opponents` set,
/// only games against one of those teams count. A forfeit is a loss (and a
/// forfeit loss) for the forfeiting side and a win for the other side,
/// regardless of the reported score. Runs and innings always accumulate.
pub fn aggregate_stats<'a, I>(
    team_id: &TeamId,
    games: I,
    opponents: Option<&HashSet<TeamId>>,
) -> TeamStats
where
    I: IntoIterator<Item = &'a Game>,
{
    let mut stats = TeamStats::default();

    for game in games {
        if !game.is_completed() {
            continue;
        }
        let Some(side) = game.side_of(team_id) else {
            continue;
        };
        if let Some(filter) = opponents {
            match game.team(side.other()) {
                Some(opponent) if filter.contains(opponent) => {}
                _ => continue,
            }
        }

        let runs_for = game.runs(side);
        let runs_against = game.runs(side.other());
        stats.runs_for += runs_for;
        stats.runs_against += runs_against;
        stats.offensive_innings += game.innings_batted(side);
        stats.defensive_innings += game.innings_batted(side.other());

        if game.forfeited_by(side) {
            stats.losses += 1;
            stats.forfeit_losses += 1;
            continue;
        }
        if game.forfeited_by(side.other()) {
            stats.wins += 1;
            continue;
        }

        match runs_for.cmp(&runs_against) {
            std::cmp::Ordering::Greater => stats.wins += 1,
            std::cmp::Ordering::Less => stats.losses += 1,
            std::cmp::Ordering::Equal => stats.ties += 1,
        }
    }

    stats
}
