use serde::Serialize;

use crate::classify::{data_kind, SlotKind};
use crate::electives::ElectiveResolver;
use crate::labels::{infer_class_duration, LabelDescriptor};
use crate::slot::TimetableGrid;

/// Half-up rounding to one decimal place: `floor(10*x + 0.5) / 10`.
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub total_classes: usize,
    pub free_periods: usize,
    pub break_or_lunch_periods: usize,
    pub weekly_hours: f64,
    pub class_duration_minutes: u32,
}

impl WeeklyStats {
    pub fn counted_periods(&self) -> usize {
        self.total_classes + self.free_periods + self.break_or_lunch_periods
    }
}

/// Walks the first `working_days` days and the first `hours_per_day` data
/// periods of each, clipped to what the grid actually holds. Break and lunch
/// periods count toward neither classes nor free periods.
pub fn aggregate(
    grid: &TimetableGrid,
    labels: &[LabelDescriptor],
    working_days: usize,
    hours_per_day: usize,
    resolver: &ElectiveResolver<'_>,
    fallback_minutes: u32,
) -> WeeklyStats {
    let mut stats = WeeklyStats {
        class_duration_minutes: infer_class_duration(labels, fallback_minutes),
        ..WeeklyStats::default()
    };

    for day in grid.iter().take(working_days) {
        for cell in day.iter().take(hours_per_day) {
            match data_kind(cell.as_ref(), resolver) {
                SlotKind::Break | SlotKind::Lunch => stats.break_or_lunch_periods += 1,
                SlotKind::Free => stats.free_periods += 1,
                SlotKind::Class | SlotKind::ElectiveResolved | SlotKind::ElectiveUnresolved => {
                    stats.total_classes += 1
                }
            }
        }
    }

    stats.weekly_hours = round_off_1_decimal(
        stats.total_classes as f64 * f64::from(stats.class_duration_minutes) / 60.0,
    );
    tracing::debug!(
        total_classes = stats.total_classes,
        free_periods = stats.free_periods,
        weekly_hours = stats.weekly_hours,
        "weekly stats aggregated"
    );
    stats
}
