use serde::Serialize;

use crate::align::{align_day, Alignment};
use crate::electives::{ElectiveResolver, Resolution};
use crate::labels::LabelDescriptor;
use crate::slot::{mentions, Interval, Slot, SlotStatus};

pub const BREAK_COLOR: &str = "blue";
pub const LUNCH_COLOR: &str = "amber";
pub const FREE_COLOR: &str = "grey";
pub const ELECTIVE_COLOR: &str = "purple";

/// Subject colors. Order is part of the contract: reordering changes every
/// subject's color for existing users.
pub const SUBJECT_PALETTE: [&str; 10] = [
    "indigo", "emerald", "rose", "sky", "violet", "teal", "orange", "pink", "lime", "cyan",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Class,
    Free,
    Break,
    Lunch,
    ElectiveUnresolved,
    ElectiveResolved,
}

impl SlotKind {
    pub fn is_interval(self) -> bool {
        matches!(self, Self::Break | Self::Lunch)
    }

    pub fn is_elective(self) -> bool {
        matches!(self, Self::ElectiveUnresolved | Self::ElectiveResolved)
    }
}

impl From<Interval> for SlotKind {
    fn from(i: Interval) -> Self {
        match i {
            Interval::Break => Self::Break,
            Interval::Lunch => Self::Lunch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedSlot {
    pub kind: SlotKind,
    pub display_text: String,
    pub color_token: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl ClassifiedSlot {
    /// Cell text handed to the export encoders.
    pub fn export_text(&self) -> String {
        match self.kind {
            SlotKind::Lunch => "Lunch".to_string(),
            SlotKind::Break => "Break".to_string(),
            SlotKind::Free => "Free".to_string(),
            _ => self.display_text.clone(),
        }
    }
}

/// What a display period shows before any text or color is attached.
#[derive(Debug, Clone, Copy)]
pub enum Cell<'a> {
    Synthetic(Interval),
    Data(Option<&'a Slot>),
}

/// 32-bit rolling hash `h = c + ((h << 5) - h)` over the UTF-16 units of the
/// lowercased name.
pub fn subject_hash(name: &str) -> i32 {
    name.to_lowercase()
        .encode_utf16()
        .fold(0i32, |h, unit| (unit as i32).wrapping_add((h << 5).wrapping_sub(h)))
}

pub fn subject_color(name: &str) -> &'static str {
    let idx = subject_hash(name).unsigned_abs() as usize % SUBJECT_PALETTE.len();
    SUBJECT_PALETTE[idx]
}

pub fn is_elective_subject(slot: &Slot, resolver: &ElectiveResolver<'_>) -> bool {
    slot.status == Some(SlotStatus::Elective)
        || resolver.is_group_name(&slot.subject_name)
        || mentions(&slot.subject_name, "elective")
}

/// Kind of a data cell; shared by the grid and the statistics so both agree.
pub fn data_kind(slot: Option<&Slot>, resolver: &ElectiveResolver<'_>) -> SlotKind {
    let Some(slot) = slot else {
        return SlotKind::Free;
    };
    if slot.is_free() {
        return SlotKind::Free;
    }
    if let Some(interval) = slot.interval() {
        return interval.into();
    }
    if is_elective_subject(slot, resolver) {
        return match resolver.resolve(1) {
            Resolution::Resolved(_) => SlotKind::ElectiveResolved,
            Resolution::Unresolved(_) => SlotKind::ElectiveUnresolved,
        };
    }
    SlotKind::Class
}

fn class_text(slot: &Slot) -> String {
    match slot.class_name() {
        Some(class_name) => format!("{} \u{2014} {}", slot.subject_name.trim(), class_name),
        None => slot.subject_name.trim().to_string(),
    }
}

/// Classifies one display period. Pure: the same inputs always give the same slot.
pub fn classify(
    cell: Cell<'_>,
    descriptor: &LabelDescriptor,
    resolver: &ElectiveResolver<'_>,
    elective_ordinal: usize,
) -> ClassifiedSlot {
    let (kind, display_text, color_token) = match cell {
        Cell::Synthetic(interval) => (
            interval.into(),
            interval.title().to_string(),
            interval_color(interval),
        ),
        Cell::Data(slot) => match (data_kind(slot, resolver), slot) {
            (SlotKind::Free, _) | (_, None) => {
                (SlotKind::Free, "Free".to_string(), FREE_COLOR.to_string())
            }
            (kind @ (SlotKind::Break | SlotKind::Lunch), Some(slot)) => {
                let interval = if kind == SlotKind::Lunch {
                    Interval::Lunch
                } else {
                    Interval::Break
                };
                let text = match slot.subject_name.trim() {
                    "" => interval.title().to_string(),
                    s => s.to_string(),
                };
                (kind, text, interval_color(interval))
            }
            (SlotKind::ElectiveResolved | SlotKind::ElectiveUnresolved, Some(_)) => {
                match resolver.resolve(elective_ordinal.max(1)) {
                    Resolution::Resolved(text) => {
                        (SlotKind::ElectiveResolved, text, ELECTIVE_COLOR.to_string())
                    }
                    Resolution::Unresolved(text) => {
                        (SlotKind::ElectiveUnresolved, text, ELECTIVE_COLOR.to_string())
                    }
                }
            }
            (SlotKind::Class, Some(slot)) => (
                SlotKind::Class,
                class_text(slot),
                subject_color(&slot.subject_name).to_string(),
            ),
        },
    };

    ClassifiedSlot {
        kind,
        display_text,
        color_token,
        start_time: descriptor.start_time.clone(),
        end_time: descriptor.end_time.clone(),
    }
}

fn interval_color(interval: Interval) -> String {
    match interval {
        Interval::Break => BREAK_COLOR.to_string(),
        Interval::Lunch => LUNCH_COLOR.to_string(),
    }
}

/// Aligns and classifies one day, one slot per label. The elective ordinal
/// restarts at 1 for every day.
pub fn classify_day(
    labels: &[LabelDescriptor],
    day: &[Option<Slot>],
    resolver: &ElectiveResolver<'_>,
) -> Vec<ClassifiedSlot> {
    let alignment = align_day(labels, day);
    let mut electives_seen = 0usize;
    let mut out = Vec::with_capacity(labels.len());
    for (label, a) in labels.iter().zip(alignment) {
        let cell = match a {
            Alignment::Synthetic => match label.interval() {
                Some(interval) => Cell::Synthetic(interval),
                None => Cell::Data(None),
            },
            Alignment::Data(i) => Cell::Data(day.get(i).and_then(|c| c.as_ref())),
            Alignment::Missing => Cell::Data(None),
        };
        if let Cell::Data(Some(slot)) = cell {
            if data_kind(Some(slot), resolver).is_elective() {
                electives_seen += 1;
            }
        }
        out.push(classify(cell, label, resolver, electives_seen));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::electives::{ElectiveBook, ElectiveGroup};
    use crate::labels::parse_labels;
    use proptest::prelude::*;

    fn js_style_hash(name: &str) -> i64 {
        // Reference arithmetic with explicit 32-bit truncation after each step.
        let mut h: i64 = 0;
        for unit in name.to_lowercase().encode_utf16() {
            let shifted = ((h as i32) << 5) as i64;
            h = ((unit as i64) + (shifted - h)) as i32 as i64;
        }
        h
    }

    #[test]
    fn hash_matches_reference_arithmetic() {
        for name in ["Math", "physics", "Computer Science", "Éducation physique", ""] {
            assert_eq!(subject_hash(name) as i64, js_style_hash(name), "{}", name);
        }
        assert_eq!(subject_hash("a"), 97);
        assert_eq!(subject_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn colors_ignore_case() {
        assert_eq!(subject_color("MATH"), subject_color("math"));
        assert_eq!(subject_color("Math"), SUBJECT_PALETTE[(subject_hash("math").unsigned_abs() as usize) % 10]);
    }

    #[test]
    fn example_row_with_synthetic_lunch() {
        let labels = parse_labels(&["9:00-10:00", "10:00-11:00 (LUNCH)", "11:00-12:00"]);
        let day = vec![Some(Slot::subject("Math")), Some(Slot::subject("Free"))];
        let row = classify_day(&labels, &day, &ElectiveResolver::default());

        assert_eq!(row.len(), 3);
        assert_eq!(row[0].kind, SlotKind::Class);
        assert_eq!(row[0].display_text, "Math");
        assert_eq!(row[0].start_time.as_deref(), Some("9:00"));
        assert_eq!(row[1].kind, SlotKind::Lunch);
        assert_eq!(row[1].display_text, "Lunch");
        assert_eq!(row[1].color_token, LUNCH_COLOR);
        assert_eq!(row[2].kind, SlotKind::Free);
        assert_eq!(row[2].display_text, "Free");
        assert_eq!(row[2].color_token, FREE_COLOR);
    }

    #[test]
    fn data_break_wins_over_ordinary_label() {
        let labels = parse_labels(&["9:00-10:00"]);
        let day = vec![Some(Slot::subject("Morning Break"))];
        let row = classify_day(&labels, &day, &ElectiveResolver::default());
        assert_eq!(row[0].kind, SlotKind::Break);
        assert_eq!(row[0].display_text, "Morning Break");
        assert_eq!(row[0].export_text(), "Break");
        assert_eq!(row[0].color_token, BREAK_COLOR);
    }

    #[test]
    fn class_name_is_appended() {
        let labels = parse_labels(&["9:00-10:00"]);
        let day = vec![Some(Slot::subject("Physics").with_class("11B"))];
        let row = classify_day(&labels, &day, &ElectiveResolver::default());
        assert_eq!(row[0].display_text, "Physics \u{2014} 11B");
    }

    #[test]
    fn elective_ordinal_restarts_each_day() {
        let labels = parse_labels(&["1", "2", "3"]);
        let day = vec![
            Some(Slot::subject("Elective")),
            Some(Slot::subject("Math")),
            Some(Slot::subject("Option").with_status(SlotStatus::Elective)),
        ];
        let resolver = ElectiveResolver::default();
        let row = classify_day(&labels, &day, &resolver);
        assert_eq!(row[0].display_text, "Elective 1");
        assert_eq!(row[2].display_text, "Elective 2");
        let again = classify_day(&labels, &day, &resolver);
        assert_eq!(again, row);
    }

    #[test]
    fn group_named_cell_resolves_to_selection() {
        let mut book = ElectiveBook::default();
        book.set_groups(vec![ElectiveGroup::new("Arts Block", 1, &["Drama", "Music"])]);
        let labels = parse_labels(&["9:00-10:00"]);
        let day = vec![Some(Slot::subject("Arts Block"))];

        let row = classify_day(&labels, &day, &book.resolver(Some("s1")));
        assert_eq!(row[0].kind, SlotKind::ElectiveUnresolved);
        assert_eq!(row[0].display_text, "Elective (Not Selected)");

        book.save_student_elective("s1", "Arts Block", &["Drama".to_string()])
            .expect("save");
        let row = classify_day(&labels, &day, &book.resolver(Some("s1")));
        assert_eq!(row[0].kind, SlotKind::ElectiveResolved);
        assert_eq!(row[0].display_text, "Drama (elective)");
    }

    proptest! {
        #[test]
        fn same_subject_same_color_in_any_order(names in prop::collection::vec("[A-Za-z ]{1,12}", 1..8)) {
            let first: Vec<&str> = names.iter().map(|n| subject_color(n)).collect();
            let reversed: Vec<&str> = names.iter().rev().map(|n| subject_color(n)).collect();
            let mut back = reversed.clone();
            back.reverse();
            prop_assert_eq!(first, back);
            for n in &names {
                prop_assert_eq!(subject_color(n), subject_color(&n.to_uppercase()));
            }
        }
    }
}
