//! Schedule aggregation — merge resolved occurrences into day sections.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::calendar::model::CalendarEvent;
use crate::config::SectionConfig;
use crate::routines::model::RoutineDefinition;
use crate::schedule::instance::ActionableInstance;
use crate::schedule::overrides::OverrideIndex;
use crate::schedule::resolve::{
    TimelineItem, resolve_events, resolve_routines, resolve_tasks,
};
use crate::tasks::model::Task;

/// A date's agenda, bucketed for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySections {
    pub all_day: Vec<TimelineItem>,
    pub morning: Vec<TimelineItem>,
    pub afternoon: Vec<TimelineItem>,
    pub evening: Vec<TimelineItem>,
    pub unscheduled: Vec<TimelineItem>,
}

impl DaySections {
    /// Total number of items across all sections.
    pub fn len(&self) -> usize {
        self.all_day.len()
            + self.morning.len()
            + self.afternoon.len()
            + self.evening.len()
            + self.unscheduled.len()
    }

    /// Whether the agenda holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve and merge the three entity kinds into one agenda for `date`.
///
/// Deterministic: identical inputs (including array order) produce
/// identical output. The wall clock is never consulted — "happening
/// now" is a display flag computed by [`happening_now`], outside this
/// function, and never affects ordering.
pub fn aggregate(
    tasks: &[Task],
    routines: &[RoutineDefinition],
    events: &[CalendarEvent],
    instances: &[ActionableInstance],
    date: NaiveDate,
    sections: &SectionConfig,
) -> DaySections {
    let overrides = OverrideIndex::for_date(instances, date);
    let deferred_in = OverrideIndex::deferred_into(instances, date);

    let mut items = resolve_tasks(tasks, date, &overrides, &deferred_in);
    items.extend(resolve_routines(routines, date, &overrides, &deferred_in));
    items.extend(dedup_events(resolve_events(events, date, &overrides)));

    let mut out = DaySections::default();
    for item in items {
        section_of(&mut out, sections, item);
    }
    // Stable sort: equal starts keep input order; untimed items (only
    // possible in the all-day section) sort after timed ones. The
    // unscheduled section keeps input order as-is.
    for section in [
        &mut out.all_day,
        &mut out.morning,
        &mut out.afternoon,
        &mut out.evening,
    ] {
        section.sort_by_key(|item| (item.start.is_none(), item.start));
    }
    out
}

/// Drop duplicate events sharing a `(title, start)` pair.
///
/// The external calendar may hand back the same event under two feeds.
/// First occurrence wins; input order is authoritative. Tasks and
/// routines are never structurally deduped.
fn dedup_events(events: Vec<TimelineItem>) -> Vec<TimelineItem> {
    let mut seen: HashSet<(String, Option<NaiveDateTime>)> = HashSet::new();
    events
        .into_iter()
        .filter(|item| seen.insert((item.title.clone(), item.start)))
        .collect()
}

fn section_of(out: &mut DaySections, sections: &SectionConfig, item: TimelineItem) {
    if item.all_day {
        out.all_day.push(item);
        return;
    }
    match item.start {
        None => out.unscheduled.push(item),
        Some(start) => {
            let hour = start.hour();
            if hour < sections.afternoon_start_hour {
                out.morning.push(item);
            } else if hour < sections.evening_start_hour {
                out.afternoon.push(item);
            } else {
                out.evening.push(item);
            }
        }
    }
}

/// Display-only: whether `item` is in progress at `now`.
///
/// Items without an end are treated as an hour long. Kept outside
/// [`aggregate`] so ordering never depends on the wall clock.
pub fn happening_now(item: &TimelineItem, now: NaiveDateTime) -> bool {
    match (item.start, item.end) {
        (Some(start), Some(end)) => start <= now && now < end,
        (Some(start), None) => start <= now && now < start + Duration::hours(1),
        (None, _) => false,
    }
}
