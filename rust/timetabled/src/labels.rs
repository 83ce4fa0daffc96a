use serde::Serialize;

use crate::slot::{mentions, Interval};

pub const DEFAULT_PERIOD_MINUTES: u32 = 60;

/// Fallback used when a timetable arrives without its own time-slot list.
pub const DEFAULT_TIME_SLOTS: [&str; 8] = [
    "9:00 - 10:00",
    "10:00 - 11:00",
    "11:00 - 12:00",
    "12:00 - 1:00",
    "1:00 - 2:00",
    "2:00 - 3:00",
    "3:00 - 4:00",
    "4:00 - 5:00",
];

pub fn default_time_slots() -> Vec<String> {
    DEFAULT_TIME_SLOTS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    Class,
    Break,
    Lunch,
}

impl LabelKind {
    pub fn interval(self) -> Option<Interval> {
        match self {
            Self::Class => None,
            Self::Break => Some(Interval::Break),
            Self::Lunch => Some(Interval::Lunch),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDescriptor {
    pub index: usize,
    pub original_label: String,
    pub normalized_label: String,
    pub display_label: String,
    pub kind: LabelKind,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl LabelDescriptor {
    pub fn parse(index: usize, raw: &str) -> Self {
        let original_label = raw.trim().to_string();
        let kind = if mentions(&original_label, "lunch") {
            LabelKind::Lunch
        } else if mentions(&original_label, "break") {
            LabelKind::Break
        } else {
            LabelKind::Class
        };

        let stripped = strip_interval_markers(&original_label);
        let normalized_label = match kind.interval() {
            Some(interval) if parse_time_range(&stripped).is_none() => {
                interval.title().to_string()
            }
            _ => stripped,
        };

        let range = parse_time_range(&normalized_label);
        let display_label = match kind.interval() {
            Some(interval) if range.is_some() => {
                format!("{} ({})", normalized_label, interval.title())
            }
            Some(interval) => interval.title().to_string(),
            None => normalized_label.clone(),
        };

        let (start_time, end_time) = match range {
            Some(r) => (Some(r.start_text), Some(r.end_text)),
            None => (None, None),
        };

        Self {
            index,
            original_label,
            normalized_label,
            display_label,
            kind,
            start_time,
            end_time,
        }
    }

    pub fn interval(&self) -> Option<Interval> {
        self.kind.interval()
    }

    pub fn is_ordinary(&self) -> bool {
        self.kind == LabelKind::Class
    }
}

/// Labels for a raw time-slot list; an empty list falls back to the default slots.
pub fn parse_labels<S: AsRef<str>>(raw: &[S]) -> Vec<LabelDescriptor> {
    if raw.is_empty() {
        return DEFAULT_TIME_SLOTS
            .iter()
            .enumerate()
            .map(|(i, s)| LabelDescriptor::parse(i, s))
            .collect();
    }
    raw.iter()
        .enumerate()
        .map(|(i, s)| LabelDescriptor::parse(i, s.as_ref()))
        .collect()
}

// Removes "(LUNCH)" / "(Break)" style suffixes, keeping any time range.
fn strip_interval_markers(label: &str) -> String {
    let mut out = String::new();
    let mut rest = label;
    while let Some(open) = rest.find('(') {
        let Some(close_rel) = rest[open..].find(')') else {
            break;
        };
        let close = open + close_rel;
        let inner = &rest[open + 1..close];
        out.push_str(&rest[..open]);
        if !(mentions(inner, "lunch") || mentions(inner, "break")) {
            out.push_str(&rest[open..=close]);
        }
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    let collapsed = out.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c == '-' || c.is_whitespace())
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub start_text: String,
    pub end_text: String,
}

impl TimeRange {
    /// Labels are written on a 12-hour clock without am/pm ("12:00 - 1:00"),
    /// so an end before the start wraps by twelve hours. Zero when the range
    /// is empty or still not within 1..12 hours after wrapping.
    pub fn duration_minutes(&self) -> u32 {
        const HALF_DAY: i64 = 12 * 60;
        let mut d = i64::from(self.end_minutes) - i64::from(self.start_minutes);
        if d == 0 {
            return 0;
        }
        if d < 0 {
            d += HALF_DAY;
        }
        if d <= 0 || d >= HALF_DAY {
            return 0;
        }
        d as u32
    }
}

fn parse_clock(s: &str) -> Option<u32> {
    let (h, m) = s.trim().split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    if !h.bytes().all(|b| b.is_ascii_digit()) || !m.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

/// Parses the leading `H:MM - H:MM` range of a label (spaces around the dash optional).
pub fn parse_time_range(label: &str) -> Option<TimeRange> {
    let label = label.trim();
    let (left, right) = label
        .split_once('-')
        .or_else(|| label.split_once('\u{2013}'))?;
    let start_text = left.trim();
    let end_text = right
        .trim()
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("");
    let start_minutes = parse_clock(start_text)?;
    let end_minutes = parse_clock(end_text)?;
    Some(TimeRange {
        start_minutes,
        end_minutes,
        start_text: start_text.to_string(),
        end_text: end_text.to_string(),
    })
}

/// Single period length for the whole week, taken from the first ordinary label
/// that carries a parsable range. Periods of different lengths are not distinguished.
pub fn infer_class_duration(labels: &[LabelDescriptor], fallback: u32) -> u32 {
    labels
        .iter()
        .filter(|l| l.is_ordinary())
        .find_map(|l| parse_time_range(&l.normalized_label))
        .map(|r| r.duration_minutes())
        .filter(|m| *m > 0)
        .unwrap_or(fallback)
}
