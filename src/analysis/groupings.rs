/// Calendar-day grouping.
///
/// `group_by_day` takes the flat, chronological observation list produced
/// by the ingest layer and splits it into one `DayGroup` per local calendar
/// date, so the reporter can print a header per day without re-scanning.

use chrono::NaiveDate;

use crate::model::Observation;

/// All observations that fall on one calendar date, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub observations: Vec<Observation>,
}

impl DayGroup {
    /// Highest observation of the day; first one wins on ties.
    pub fn high(&self) -> Option<&Observation> {
        self.observations
            .iter()
            .fold(None, |best: Option<&Observation>, o| match best {
                Some(b) if b.height_ft >= o.height_ft => Some(b),
                _ => Some(o),
            })
    }

    /// Lowest observation of the day; first one wins on ties.
    pub fn low(&self) -> Option<&Observation> {
        self.observations
            .iter()
            .fold(None, |best: Option<&Observation>, o| match best {
                Some(b) if b.height_ft <= o.height_ft => Some(b),
                _ => Some(o),
            })
    }
}

/// Partitions observations by `timestamp.date()`.
///
/// Groups come out ordered by date. Within a group, observations keep the
/// order they had in the input. Every observation lands in exactly one group.
pub fn group_by_day(observations: &[Observation]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();

    for obs in observations {
        let date = obs.timestamp.date();
        match groups.iter_mut().find(|g| g.date == date) {
            Some(group) => group.observations.push(obs.clone()),
            None => groups.push(DayGroup {
                date,
                observations: vec![obs.clone()],
            }),
        }
    }

    // Input is normally chronological already; a stable sort keeps it so
    // and still orders days correctly if it is not.
    groups.sort_by_key(|g| g.date);
    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
