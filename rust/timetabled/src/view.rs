use chrono::Datelike;
use serde::Serialize;

use crate::classify::{classify_day, ClassifiedSlot};
use crate::electives::ElectiveResolver;
use crate::labels::LabelDescriptor;
use crate::slot::TimetableGrid;
use crate::stats::{aggregate, WeeklyStats};

/// Everything one render needs; borrowed from the caller for the call only.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub grid: &'a TimetableGrid,
    pub labels: &'a [LabelDescriptor],
    pub working_days: usize,
    pub hours_per_day: usize,
    pub day_names: &'a [String],
    pub period_minutes_fallback: u32,
    pub resolver: ElectiveResolver<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub day_index: usize,
    pub day_name: String,
    pub is_working_day: bool,
    pub slots: Vec<ClassifiedSlot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub labels: Vec<LabelDescriptor>,
    pub days: Vec<DayView>,
    pub stats: WeeklyStats,
}

fn day_name(input: &RenderInput<'_>, day_index: usize) -> String {
    input
        .day_names
        .get(day_index)
        .cloned()
        .unwrap_or_else(|| format!("Day {}", day_index + 1))
}

pub fn day_view(input: &RenderInput<'_>, day_index: usize) -> DayView {
    if day_index >= input.working_days {
        return DayView {
            day_index,
            day_name: day_name(input, day_index),
            is_working_day: false,
            slots: Vec::new(),
        };
    }
    let day = input.grid.get(day_index).map(Vec::as_slice).unwrap_or(&[]);
    DayView {
        day_index,
        day_name: day_name(input, day_index),
        is_working_day: true,
        slots: classify_day(input.labels, day, &input.resolver),
    }
}

pub fn week_view(input: &RenderInput<'_>) -> WeekView {
    let days = (0..input.working_days)
        .map(|d| day_view(input, d))
        .collect();
    WeekView {
        labels: input.labels.to_vec(),
        days,
        stats: weekly_stats(input),
    }
}

pub fn weekly_stats(input: &RenderInput<'_>) -> WeeklyStats {
    aggregate(
        input.grid,
        input.labels,
        input.working_days,
        input.hours_per_day,
        &input.resolver,
        input.period_minutes_fallback,
    )
}

/// Monday is day 0.
pub fn today_index() -> usize {
    chrono::Local::now()
        .weekday()
        .num_days_from_monday() as usize
}
