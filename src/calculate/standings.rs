//! Standings: points ranking with the tie-break cascade applied.

use std::collections::BTreeMap;

use tracing::debug;

use super::{aggregate_stats, resolve_ties};
use crate::models::{Game, PlayoffFormat, PoolId, StandingEntry, Team};

/// Rank `teams` over the pool-play games in `games`.
///
/// Ranks are contiguous from 1 and never shared. Playoff games are ignored.
pub fn build_standings(teams: &[Team], games: &[Game]) -> Vec<StandingEntry> {
    let pool_play: Vec<&Game> = games.iter().filter(|g| !g.is_playoff).collect();
    let team_refs: Vec<&Team> = teams.iter().collect();
    rank_group(&team_refs, &pool_play)
}

/// Rank each pool on its own, giving pool-local ranks.
///
/// Pools come out ordered by pool id; teams without a pool form a last group.
pub fn build_pool_standings(teams: &[Team], games: &[Game]) -> Vec<StandingEntry> {
    let pool_play: Vec<&Game> = games.iter().filter(|g| !g.is_playoff).collect();

    let mut pools: BTreeMap<PoolId, Vec<&Team>> = BTreeMap::new();
    let mut unpooled: Vec<&Team> = Vec::new();
    for team in teams {
        match &team.pool_id {
            Some(pool_id) => pools.entry(pool_id.clone()).or_default().push(team),
            None => unpooled.push(team),
        }
    }

    let mut entries = Vec::with_capacity(teams.len());
    for (pool_id, pool_teams) in &pools {
        debug!("Ranking pool {} ({} teams)", pool_id, pool_teams.len());
        entries.extend(rank_group(pool_teams, &pool_play));
    }
    if !unpooled.is_empty() {
        entries.extend(rank_group(&unpooled, &pool_play));
    }
    entries
}

/// Division-wide or per-pool standings, whichever the format seeds from.
pub fn standings_for_format(
    teams: &[Team],
    games: &[Game],
    format: &PlayoffFormat,
) -> Vec<StandingEntry> {
    if format.uses_pool_seeding() {
        build_pool_standings(teams, games)
    } else {
        build_standings(teams, games)
    }
}

fn rank_group(teams: &[&Team], games: &[&Game]) -> Vec<StandingEntry> {
    let mut scored: Vec<(&Team, u32)> = teams
        .iter()
        .map(|team| {
            let points = aggregate_stats(&team.id, games.iter().copied(), None).points();
            (*team, points)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let mut ordered: Vec<&Team> = Vec::with_capacity(scored.len());
    for chunk in scored.chunk_by(|a, b| a.1 == b.1) {
        let tied: Vec<&Team> = chunk.iter().map(|(team, _)| *team).collect();
        if tied.len() > 1 {
            debug!("{} teams tied on {} points", tied.len(), chunk[0].1);
        }
        ordered.extend(resolve_ties(&tied, games));
    }

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, team)| {
            let stats = aggregate_stats(&team.id, games.iter().copied(), None);
            StandingEntry {
                team_id: team.id.clone(),
                team_name: team.name.clone(),
                pool_id: team.pool_id.clone(),
                rank: (i + 1) as u32,
                points: stats.points(),
                stats,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ranked_names(entries: &[StandingEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.team_name.as_str()).collect()
    }

    fn round_robin() -> (Vec<Team>, Vec<Game>) {
        let teams = vec![
            Team::new("a", "Alpha"),
            Team::new("b", "Bravo"),
            Team::new("c", "Charlie"),
            Team::new("d", "Delta"),
        ];
        let games = vec![
            Game::new("g1", "a", "b").with_final_score(5, 2).with_innings(7.0, 7.0),
            Game::new("g2", "c", "d").with_final_score(3, 3).with_innings(7.0, 7.0),
            Game::new("g3", "a", "c").with_final_score(4, 1).with_innings(7.0, 7.0),
            Game::new("g4", "b", "d").with_final_score(6, 0).with_innings(7.0, 7.0),
            Game::new("g5", "d", "a").with_final_score(2, 1).with_innings(7.0, 7.0),
            Game::new("g6", "b", "c").with_final_score(2, 3).with_innings(7.0, 7.0),
        ];
        (teams, games)
    }

    #[test]
    fn test_ranks_by_points() {
        let (teams, games) = round_robin();

        let standings = build_standings(&teams, &games);

        // Alpha 2-1 (4 pts), Charlie 1-1-1 (3), Delta 1-1-1 (3), Bravo 1-2 (2)
        assert_eq!(standings[0].team_name, "Alpha");
        assert_eq!(standings[0].points, 4);
        assert_eq!(standings[3].team_name, "Bravo");
        assert_eq!(
            standings.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn test_two_way_point_tie_uses_head_to_head() {
        let (teams, games) = round_robin();

        let standings = build_standings(&teams, &games);

        // Charlie and Delta tied their meeting; Charlie allowed 9 in 21, Delta 10 in 21.
        assert_eq!(ranked_names(&standings), vec!["Alpha", "Charlie", "Delta", "Bravo"]);
    }

    #[test]
    fn test_standings_deterministic() {
        let (teams, games) = round_robin();
        let mut reversed = teams.clone();
        reversed.reverse();

        let first = build_standings(&teams, &games);
        let second = build_standings(&teams, &games);
        let third = build_standings(&reversed, &games);

        assert_eq!(first, second);
        assert_eq!(ranked_names(&first), ranked_names(&third));
    }

    #[test]
    fn test_rank_totality_with_no_games() {
        let teams: Vec<Team> = (1..=6)
            .map(|i| Team::new(format!("t{}", i), format!("Team {}", i)))
            .collect();

        let standings = build_standings(&teams, &[]);

        let ranks: Vec<u32> = standings.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
        assert!(standings.iter().all(|e| e.points == 0));
    }

    #[test]
    fn test_playoff_games_excluded() {
        let teams = vec![Team::new("a", "Alpha"), Team::new("b", "Bravo")];
        let mut playoff = Game::new("p1", "b", "a").with_final_score(9, 0);
        playoff.is_playoff = true;
        let games = vec![Game::new("g1", "a", "b").with_final_score(1, 0), playoff];

        let standings = build_standings(&teams, &games);

        assert_eq!(standings[0].team_name, "Alpha");
        assert_eq!(standings[0].stats.games_played(), 1);
        assert_eq!(standings[1].stats.runs_for, 0);
    }

    #[test]
    fn test_pool_standings_have_local_ranks() {
        let teams = vec![
            Team::new("a1", "A One").with_pool("A"),
            Team::new("a2", "A Two").with_pool("A"),
            Team::new("b1", "B One").with_pool("B"),
            Team::new("b2", "B Two").with_pool("B"),
            Team::new("b3", "B Three").with_pool("B"),
        ];
        let games = vec![
            Game::new("g1", "a1", "a2").with_final_score(1, 2),
            Game::new("g2", "b1", "b2").with_final_score(5, 0),
            Game::new("g3", "b2", "b3").with_final_score(5, 0),
            Game::new("g4", "b3", "b1").with_final_score(0, 2),
        ];

        let standings = build_pool_standings(&teams, &games);

        let summary: Vec<(&str, &str, u32)> = standings
            .iter()
            .map(|e| {
                (
                    e.pool_id.as_ref().map(|p| p.as_str()).unwrap_or(""),
                    e.team_name.as_str(),
                    e.rank,
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("A", "A Two", 1),
                ("A", "A One", 2),
                ("B", "B One", 1),
                ("B", "B Two", 2),
                ("B", "B Three", 3),
            ]
        );
    }

    #[test]
    fn test_standings_for_format_selects_scope() {
        let teams = vec![
            Team::new("a1", "A One").with_pool("A"),
            Team::new("b1", "B One").with_pool("B"),
        ];

        let pooled = standings_for_format(&teams, &[], &PlayoffFormat::TopEightFourPools);
        assert!(pooled.iter().all(|e| e.rank == 1));

        let division = standings_for_format(&teams, &[], &PlayoffFormat::Top(4));
        assert_eq!(division.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2]);
    }
}
