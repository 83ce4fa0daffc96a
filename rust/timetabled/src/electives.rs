use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;

pub const NOT_SELECTED_TEXT: &str = "Elective (Not Selected)";

fn default_choose_count() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectiveGroup {
    pub group_name: String,
    #[serde(default = "default_choose_count")]
    pub choose_count: usize,
    #[serde(default)]
    pub options: Vec<String>,
}

impl ElectiveGroup {
    pub fn new(group_name: &str, choose_count: usize, options: &[&str]) -> Self {
        Self {
            group_name: group_name.to_string(),
            choose_count: choose_count.max(1),
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn is_multi_choice(&self) -> bool {
        self.choose_count > 1
    }

    fn accepts(&self, option: &str) -> bool {
        self.options.is_empty() || self.options.iter().any(|o| o == option)
    }
}

/// A committed choice: a scalar for single-choice groups, an ordered set otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ElectiveSelection {
    Single(String),
    Multi(Vec<String>),
}

impl ElectiveSelection {
    pub fn options(&self) -> Vec<&str> {
        match self {
            Self::Single(s) => vec![s.as_str()],
            Self::Multi(v) => v.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(s) => s.trim().is_empty(),
            Self::Multi(v) => v.iter().all(|s| s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectiveErrorKind {
    Locked,
    CapExceeded,
    UnknownGroup,
    UnknownOption,
    Empty,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElectiveError {
    pub kind: ElectiveErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ElectiveError {
    fn new(kind: ElectiveErrorKind, message: impl Into<String>) -> Self {
        let code = match kind {
            ElectiveErrorKind::Locked => "elective_locked",
            ElectiveErrorKind::CapExceeded => "elective_cap_exceeded",
            ElectiveErrorKind::UnknownGroup => "unknown_group",
            ElectiveErrorKind::UnknownOption => "unknown_option",
            ElectiveErrorKind::Empty => "empty_selection",
        };
        Self {
            kind,
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for ElectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ElectiveError {}

/// One student's committed selections, kept in commit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElectiveSelections {
    entries: Vec<(String, ElectiveSelection)>,
}

impl ElectiveSelections {
    pub fn get(&self, group_name: &str) -> Option<&ElectiveSelection> {
        self.entries
            .iter()
            .find(|(g, _)| g == group_name)
            .map(|(_, s)| s)
    }

    pub fn is_locked(&self, group_name: &str) -> bool {
        self.get(group_name).map(|s| !s.is_empty()).unwrap_or(false)
    }

    pub fn has_any(&self) -> bool {
        self.entries.iter().any(|(_, s)| !s.is_empty())
    }

    /// Every chosen option across all groups, in commit order.
    pub fn flattened(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|(_, s)| s.options())
            .filter(|o| !o.trim().is_empty())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElectiveSelection)> {
        self.entries.iter().map(|(g, s)| (g.as_str(), s))
    }

    /// Commits `values` for `group`. A group with a non-empty selection is
    /// final: later writes are rejected and leave it untouched.
    pub fn save(
        &mut self,
        group: &ElectiveGroup,
        values: &[String],
    ) -> Result<&ElectiveSelection, ElectiveError> {
        let name = group.group_name.as_str();
        if self.is_locked(name) {
            return Err(ElectiveError::new(
                ElectiveErrorKind::Locked,
                format!("selection for {} is already confirmed", name),
            )
            .with_details(json!({ "groupName": name })));
        }

        let chosen = normalize_values(values);
        if chosen.is_empty() {
            return Err(ElectiveError::new(
                ElectiveErrorKind::Empty,
                "choose at least one option",
            ));
        }
        if let Some(bad) = chosen.iter().find(|o| !group.accepts(o)) {
            return Err(ElectiveError::new(
                ElectiveErrorKind::UnknownOption,
                format!("{} is not an option of {}", bad, name),
            )
            .with_details(json!({ "groupName": name, "option": bad })));
        }
        if chosen.len() > group.choose_count {
            return Err(cap_error(group, chosen.len()));
        }

        let selection = if group.is_multi_choice() {
            ElectiveSelection::Multi(chosen)
        } else {
            ElectiveSelection::Single(chosen.into_iter().next().unwrap_or_default())
        };

        // An empty leftover entry may exist from an earlier cleared value.
        self.entries.retain(|(g, _)| g != name);
        self.entries.push((name.to_string(), selection));
        Ok(&self.entries[self.entries.len() - 1].1)
    }
}

fn cap_error(group: &ElectiveGroup, attempted: usize) -> ElectiveError {
    ElectiveError::new(
        ElectiveErrorKind::CapExceeded,
        format!(
            "you can choose at most {} option(s) for {}",
            group.choose_count, group.group_name
        ),
    )
    .with_details(json!({
        "groupName": group.group_name,
        "chooseCount": group.choose_count,
        "attempted": attempted,
    }))
}

fn normalize_values(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        let v = v.trim();
        if v.is_empty() || out.iter().any(|o| o == v) {
            continue;
        }
        out.push(v.to_string());
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct StudentElectives {
    pub selections: ElectiveSelections,
    drafts: HashMap<String, Vec<String>>,
}

impl StudentElectives {
    pub fn draft(&self, group_name: &str) -> &[String] {
        self.drafts
            .get(group_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Elective groups on offer plus every student's selections and pending drafts.
#[derive(Debug, Clone, Default)]
pub struct ElectiveBook {
    groups: Vec<ElectiveGroup>,
    students: HashMap<String, StudentElectives>,
}

impl ElectiveBook {
    pub fn groups(&self) -> &[ElectiveGroup] {
        &self.groups
    }

    /// Replaces the offered groups. Committed selections are kept.
    pub fn set_groups(&mut self, groups: Vec<ElectiveGroup>) {
        self.groups = groups
            .into_iter()
            .filter(|g| !g.group_name.trim().is_empty())
            .map(|mut g| {
                g.choose_count = g.choose_count.max(1);
                g
            })
            .collect();
    }

    pub fn group(&self, group_name: &str) -> Option<&ElectiveGroup> {
        self.groups.iter().find(|g| g.group_name == group_name)
    }

    pub fn student(&self, student_id: &str) -> Option<&StudentElectives> {
        self.students.get(student_id)
    }

    pub fn selections(&self, student_id: &str) -> Option<&ElectiveSelections> {
        self.students.get(student_id).map(|s| &s.selections)
    }

    fn known_group(&self, group_name: &str) -> Result<ElectiveGroup, ElectiveError> {
        self.group(group_name).cloned().ok_or_else(|| {
            ElectiveError::new(
                ElectiveErrorKind::UnknownGroup,
                format!("unknown elective group: {}", group_name),
            )
        })
    }

    pub fn save_student_elective(
        &mut self,
        student_id: &str,
        group_name: &str,
        values: &[String],
    ) -> Result<ElectiveSelection, ElectiveError> {
        let group = self.known_group(group_name)?;
        let student = self.students.entry(student_id.to_string()).or_default();
        match student.selections.save(&group, values) {
            Ok(saved) => {
                let saved = saved.clone();
                student.drafts.remove(group_name);
                tracing::info!(student_id, group_name, "elective selection confirmed");
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!(student_id, group_name, code = %e.code, "elective save rejected");
                Err(e)
            }
        }
    }

    /// Adds `option` to the student's pending draft, or removes it when already
    /// present. Single-choice drafts swap the option; multi-choice drafts refuse
    /// to grow past `choose_count`.
    pub fn toggle_draft(
        &mut self,
        student_id: &str,
        group_name: &str,
        option: &str,
    ) -> Result<Vec<String>, ElectiveError> {
        let group = self.known_group(group_name)?;
        let option = option.trim();
        if !group.accepts(option) || option.is_empty() {
            return Err(ElectiveError::new(
                ElectiveErrorKind::UnknownOption,
                format!("{} is not an option of {}", option, group_name),
            ));
        }

        let student = self.students.entry(student_id.to_string()).or_default();
        if student.selections.is_locked(group_name) {
            return Err(ElectiveError::new(
                ElectiveErrorKind::Locked,
                format!("selection for {} is already confirmed", group_name),
            ));
        }

        let draft = student.drafts.entry(group_name.to_string()).or_default();
        if let Some(pos) = draft.iter().position(|o| o == option) {
            draft.remove(pos);
        } else if !group.is_multi_choice() {
            draft.clear();
            draft.push(option.to_string());
        } else if draft.len() >= group.choose_count {
            return Err(cap_error(&group, draft.len() + 1));
        } else {
            draft.push(option.to_string());
        }
        Ok(draft.clone())
    }

    pub fn confirm_draft(
        &mut self,
        student_id: &str,
        group_name: &str,
    ) -> Result<ElectiveSelection, ElectiveError> {
        let draft = self
            .students
            .get(student_id)
            .map(|s| s.draft(group_name).to_vec())
            .unwrap_or_default();
        self.save_student_elective(student_id, group_name, &draft)
    }

    pub fn resolver<'a>(&'a self, student_id: Option<&str>) -> ElectiveResolver<'a> {
        ElectiveResolver {
            groups: &self.groups,
            selections: student_id.and_then(|id| self.selections(id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unresolved(String),
    Resolved(String),
}

/// Read-only view used while classifying elective cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElectiveResolver<'a> {
    groups: &'a [ElectiveGroup],
    selections: Option<&'a ElectiveSelections>,
}

impl<'a> ElectiveResolver<'a> {
    pub fn new(groups: &'a [ElectiveGroup], selections: Option<&'a ElectiveSelections>) -> Self {
        Self { groups, selections }
    }

    pub fn is_group_name(&self, subject: &str) -> bool {
        let subject = subject.trim();
        !subject.is_empty() && self.groups.iter().any(|g| g.group_name == subject)
    }

    /// `ordinal` is the 1-based count of elective cells seen so far in the day.
    pub fn resolve(&self, ordinal: usize) -> Resolution {
        let chosen = self
            .selections
            .map(|s| s.flattened())
            .unwrap_or_default();
        if chosen.is_empty() {
            if self.groups.is_empty() {
                return Resolution::Unresolved(format!("Elective {}", ordinal));
            }
            return Resolution::Unresolved(NOT_SELECTED_TEXT.to_string());
        }
        Resolution::Resolved(
            chosen
                .iter()
                .map(|name| format!("{} (elective)", name))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}
