use chrono::{DateTime, Utc};

/// Whether the prediction window for a match is still open
///
/// The window closes exactly at kickoff: `now == kickoff` is closed.
/// Both operands are UTC instants, so there is no naive/aware ambiguity
/// to normalize away.
pub fn is_open(now: DateTime<Utc>, kickoff: DateTime<Utc>) -> bool {
    now < kickoff
}
