use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Free,
    Break,
    Elective,
    Confirmed,
    SubRequest,
}

impl SlotStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Self::Free),
            "break" => Some(Self::Break),
            "elective" => Some(Self::Elective),
            "confirmed" => Some(Self::Confirmed),
            "sub_request" | "subrequest" => Some(Self::SubRequest),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Break => "break",
            Self::Elective => "elective",
            Self::Confirmed => "confirmed",
            Self::SubRequest => "sub_request",
        }
    }
}

/// Non-teaching interval carried either by a label header or by a data cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Break,
    Lunch,
}

impl Interval {
    pub fn title(self) -> &'static str {
        match self {
            Self::Break => "Break",
            Self::Lunch => "Lunch",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub subject_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SlotStatus>,
}

impl Slot {
    pub fn subject(name: impl Into<String>) -> Self {
        Self {
            subject_name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: SlotStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn is_free(&self) -> bool {
        let subject = self.subject_name.trim();
        match self.status {
            Some(SlotStatus::Free) => true,
            Some(SlotStatus::Break) | Some(SlotStatus::Elective) => subject == "Free",
            _ => subject.is_empty() || subject == "Free",
        }
    }

    /// Break/lunch marker embedded in the data itself. Free cells never count.
    pub fn interval(&self) -> Option<Interval> {
        if self.status == Some(SlotStatus::Free) {
            return None;
        }
        if self.status == Some(SlotStatus::Break) || mentions(&self.subject_name, "break") {
            return Some(Interval::Break);
        }
        if mentions(&self.subject_name, "lunch") {
            return Some(Interval::Lunch);
        }
        None
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

pub type Day = Vec<Option<Slot>>;
pub type TimetableGrid = Vec<Day>;

pub(crate) fn mentions(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(needle)
}

fn opt_string(v: Option<&Value>) -> Option<String> {
    v.and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Lenient cell decoding: null and non-object cells are absent, a bare string is a subject.
pub fn slot_from_json(v: &Value) -> Option<Slot> {
    match v {
        Value::String(s) => Some(Slot::subject(s.trim())),
        Value::Object(obj) => {
            let subject_name = obj
                .get("subjectName")
                .or_else(|| obj.get("subject"))
                .and_then(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            let status = obj
                .get("status")
                .and_then(|v| v.as_str())
                .and_then(SlotStatus::parse);
            Some(Slot {
                subject_name,
                class_name: opt_string(obj.get("className")),
                teacher_id: opt_string(obj.get("teacherId")),
                status,
            })
        }
        _ => None,
    }
}

pub fn parse_day(v: &Value) -> Day {
    v.as_array()
        .map(|cells| cells.iter().map(slot_from_json).collect())
        .unwrap_or_default()
}

pub fn parse_grid(v: &Value) -> TimetableGrid {
    let grid: TimetableGrid = v
        .as_array()
        .map(|days| days.iter().map(parse_day).collect())
        .unwrap_or_default();
    if !v.is_array() && !v.is_null() {
        tracing::warn!("timetable grid is not an array; treating it as empty");
    }
    grid
}
