use crate::models::player::{LeaderboardEntry, LeaderboardQuery, Player, SortOrder};

/// Sorts players for the leaderboard. Ties fall back to name so the order is stable.
pub fn rank_players(mut players: Vec<Player>, query: &LeaderboardQuery) -> Vec<LeaderboardEntry> {
    let key = query.sort_by.unwrap_or_default();
    let order = query.order.unwrap_or_default();

    players.sort_by(|a, b| {
        let primary = match order {
            SortOrder::Asc => key.compare(a, b),
            SortOrder::Desc => key.compare(b, a),
        };
        primary.then_with(|| a.name.cmp(&b.name))
    });

    players
        .into_iter()
        .enumerate()
        .map(|(index, player)| LeaderboardEntry {
            rank: index + 1,
            win_percentage: player.win_percentage(),
            player,
        })
        .collect()
}
