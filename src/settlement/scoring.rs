use std::cmp::Ordering;

/// Result class of a score line, from the home side's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

/// Classifies a score line into win/draw/loss for the home side
pub fn outcome(home_score: i32, away_score: i32) -> Outcome {
    match home_score.cmp(&away_score) {
        Ordering::Greater => Outcome::HomeWin,
        Ordering::Equal => Outcome::Draw,
        Ordering::Less => Outcome::AwayWin,
    }
}

/// Points awarded for a prediction against the final score
///
/// 2 for the exact score line, 1 for the right outcome with the wrong
/// score line, 0 otherwise.
pub fn score_prediction(
    predicted_home: i32,
    predicted_away: i32,
    actual_home: i32,
    actual_away: i32,
) -> i32 {
    if predicted_home == actual_home && predicted_away == actual_away {
        return 2;
    }
    if outcome(predicted_home, predicted_away) == outcome(actual_home, actual_away) {
        return 1;
    }
    0
}
