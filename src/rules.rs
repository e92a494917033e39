use crate::model::{BattleFormat, Face, Player, FACES};

#[inline] pub fn is_face(n: Face) -> bool { (1..=6).contains(&n) }

/// Occurrences of each face, index 0 holding the count of 1s.
pub fn face_counts(rolls: &[Face]) -> [usize; 6] {
    let mut counts = [0usize; 6];
    for &r in rolls {
        if is_face(r) { counts[(r - 1) as usize] += 1; }
    }
    counts
}

/// Faces that can still win. With no bets placed every face is eligible.
pub fn eligible_faces(players: &[Player]) -> Vec<Face> {
    let bets: Vec<Face> = players.iter().filter_map(|p| p.bet).collect();
    if bets.is_empty() { return FACES.to_vec(); }
    FACES.iter().copied().filter(|f| bets.contains(f)).collect()
}

/// Lowest eligible face whose count reached the format threshold.
pub fn battle_winner(rolls: &[Face], format: BattleFormat, players: &[Player]) -> Option<Face> {
    let counts = face_counts(rolls);
    let threshold = format.threshold();
    eligible_faces(players)
        .into_iter()
        .find(|&f| counts[(f - 1) as usize] >= threshold)
}

pub fn winning_players(players: &[Player], face: Face) -> Vec<usize> {
    players.iter().enumerate().filter(|(_, p)| p.bet == Some(face)).map(|(i, _)| i).collect()
}

/// A bet collides when some other player already holds the same face.
pub fn bet_collides(players: &[Player], idx: usize, bet: Face) -> bool {
    players.iter().enumerate().any(|(i, p)| i != idx && p.bet == Some(bet))
}

pub fn bets_unique(players: &[Player]) -> bool {
    let mut seen = [false; 6];
    for bet in players.iter().filter_map(|p| p.bet) {
        if !is_face(bet) { return false; }
        let slot = &mut seen[(bet - 1) as usize];
        if *slot { return false; }
        *slot = true;
    }
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceProgress {
    pub face: Face,
    pub count: usize,
    pub threshold: usize,
    pub is_winner: bool,
    pub is_leader: bool,
}

/// Per-face counts for the battle panel. The leader is any face tied at the
/// highest non-zero count that has not reached the threshold yet.
pub fn battle_progress(rolls: &[Face], format: BattleFormat) -> Vec<FaceProgress> {
    let counts = face_counts(rolls);
    let threshold = format.threshold();
    let max = counts.iter().copied().max().unwrap_or(0);
    FACES.iter().map(|&face| {
        let count = counts[(face - 1) as usize];
        let is_winner = count >= threshold;
        FaceProgress { face, count, threshold, is_winner, is_leader: count > 0 && !is_winner && count == max }
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bettors(bets: &[Option<Face>]) -> Vec<Player> {
        bets.iter().map(|&bet| Player { name: String::new(), bet }).collect()
    }

    #[test]
    fn no_bets_first_face_to_threshold_wins() {
        let players = bettors(&[None]);
        assert_eq!(battle_winner(&[2, 5], BattleFormat::BestOf3, &players), None);
        assert_eq!(battle_winner(&[2, 5, 2], BattleFormat::BestOf3, &players), Some(2));
    }

    #[test]
    fn unbet_face_cannot_win() {
        let players = bettors(&[Some(2), Some(5)]);
        assert_eq!(battle_winner(&[3, 3, 5], BattleFormat::BestOf3, &players), None);
        assert_eq!(battle_winner(&[3, 3, 5, 5], BattleFormat::BestOf3, &players), Some(5));
        assert_eq!(winning_players(&players, 5), vec![1]);
    }

    #[test]
    fn ties_go_to_lowest_face() {
        let players = bettors(&[None]);
        assert_eq!(battle_winner(&[6, 4, 6, 4], BattleFormat::BestOf3, &players), Some(4));
    }

    #[test]
    fn best_of_five_needs_three() {
        let players = bettors(&[None]);
        assert_eq!(battle_winner(&[1, 1, 2, 2], BattleFormat::BestOf5, &players), None);
        assert_eq!(battle_winner(&[1, 1, 2, 2, 1], BattleFormat::BestOf5, &players), Some(1));
    }

    #[test]
    fn collision_ignores_own_bet() {
        let players = bettors(&[Some(3), None]);
        assert!(bet_collides(&players, 1, 3));
        assert!(!bet_collides(&players, 0, 3));
        assert!(bets_unique(&players));
        assert!(!bets_unique(&bettors(&[Some(4), Some(4)])));
    }

    #[test]
    fn progress_marks_leader_and_winner() {
        let progress = battle_progress(&[2, 5, 5], BattleFormat::BestOf5);
        let five = progress[4];
        assert_eq!((five.count, five.is_leader, five.is_winner), (2, true, false));
        assert!(!progress[1].is_leader);
        let progress = battle_progress(&[5, 5], BattleFormat::BestOf3);
        assert!(progress[4].is_winner && !progress[4].is_leader);
    }
}
