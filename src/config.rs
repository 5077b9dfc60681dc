//! Configuration types.

/// Day-section boundaries used when bucketing a day's agenda.
///
/// Hours are inclusive on the lower bound, exclusive on the upper:
/// morning runs from 00:00 up to `afternoon_start_hour`, afternoon up to
/// `evening_start_hour`, evening covers the rest of the day.
#[derive(Debug, Clone)]
pub struct SectionConfig {
    /// First hour of the afternoon section.
    pub afternoon_start_hour: u32,
    /// First hour of the evening section.
    pub evening_start_hour: u32,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            afternoon_start_hour: 12,
            evening_start_hour: 17,
        }
    }
}
