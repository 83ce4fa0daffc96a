use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::labels::{default_time_slots, DEFAULT_PERIOD_MINUTES};

pub const SETTINGS_FILE: &str = "timetabled.toml";

const MAX_DAY_NAME_LEN: usize = 32;
const MAX_SLOT_LABEL_LEN: usize = 64;

fn default_day_names() -> Vec<String> {
    [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PdfSettings {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub font_size: f32,
}

impl Default for PdfSettings {
    fn default() -> Self {
        // A4 landscape, in points.
        Self {
            page_width: 842.0,
            page_height: 595.0,
            margin: 36.0,
            font_size: 9.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub working_days: usize,
    pub hours_per_day: usize,
    pub day_names: Vec<String>,
    pub time_slots: Vec<String>,
    pub period_minutes_fallback: u32,
    pub text_column_gap: usize,
    pub pdf: PdfSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            working_days: 5,
            hours_per_day: 8,
            day_names: default_day_names(),
            time_slots: default_time_slots(),
            period_minutes_fallback: DEFAULT_PERIOD_MINUTES,
            text_column_gap: 2,
            pdf: PdfSettings::default(),
        }
    }
}

impl Settings {
    /// Reads `<workspace>/timetabled.toml` when present.
    pub fn load_from_workspace(workspace: &Path) -> anyhow::Result<Option<Self>> {
        let path = workspace.join(SETTINGS_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.to_string_lossy()))?;
        let parsed: Settings = toml::from_str(&text)
            .with_context(|| format!("invalid settings file {}", path.to_string_lossy()))?;
        parsed
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid settings file {}: {}", path.to_string_lossy(), e))?;
        Ok(Some(parsed))
    }

    pub fn validate(&self) -> Result<(), String> {
        check_range("workingDays", self.working_days as i64, 1, 7)?;
        check_range("hoursPerDay", self.hours_per_day as i64, 1, 16)?;
        check_range(
            "periodMinutesFallback",
            i64::from(self.period_minutes_fallback),
            1,
            600,
        )?;
        check_range("textColumnGap", self.text_column_gap as i64, 1, 8)?;
        if self.day_names.len() < self.working_days {
            return Err(format!(
                "dayNames must name at least {} days",
                self.working_days
            ));
        }
        if self.pdf.font_size < 4.0 || self.pdf.font_size > 24.0 {
            return Err("pdf.fontSize must be in 4..=24".to_string());
        }
        if self.pdf.page_width <= 2.0 * self.pdf.margin + 72.0
            || self.pdf.page_height <= 2.0 * self.pdf.margin + 72.0
        {
            return Err("pdf page is too small for its margins".to_string());
        }
        Ok(())
    }

    /// Applies a camelCase JSON patch. On error nothing is changed.
    pub fn apply_patch(&mut self, patch: &Value) -> Result<(), String> {
        let obj = patch
            .as_object()
            .ok_or_else(|| "patch must be an object".to_string())?;
        let mut next = self.clone();
        for (key, value) in obj {
            match key.as_str() {
                "workingDays" => next.working_days = parse_i64_range(value, key, 1, 7)? as usize,
                "hoursPerDay" => next.hours_per_day = parse_i64_range(value, key, 1, 16)? as usize,
                "periodMinutesFallback" => {
                    next.period_minutes_fallback = parse_i64_range(value, key, 1, 600)? as u32
                }
                "textColumnGap" => {
                    next.text_column_gap = parse_i64_range(value, key, 1, 8)? as usize
                }
                "dayNames" => next.day_names = parse_string_array(value, key, MAX_DAY_NAME_LEN)?,
                "timeSlots" => {
                    next.time_slots = parse_string_array(value, key, MAX_SLOT_LABEL_LEN)?
                }
                "pdf" => apply_pdf_patch(&mut next.pdf, value)?,
                other => return Err(format!("unknown setting: {}", other)),
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

fn apply_pdf_patch(pdf: &mut PdfSettings, value: &Value) -> Result<(), String> {
    let obj: &Map<String, Value> = value
        .as_object()
        .ok_or_else(|| "pdf must be an object".to_string())?;
    for (key, v) in obj {
        let n = v
            .as_f64()
            .ok_or_else(|| format!("pdf.{} must be a number", key))? as f32;
        match key.as_str() {
            "pageWidth" => pdf.page_width = n,
            "pageHeight" => pdf.page_height = n,
            "margin" => pdf.margin = n,
            "fontSize" => pdf.font_size = n,
            other => return Err(format!("unknown setting: pdf.{}", other)),
        }
    }
    Ok(())
}

fn check_range(key: &str, n: i64, min: i64, max: i64) -> Result<(), String> {
    if !(min..=max).contains(&n) {
        return Err(format!("{} must be in {}..={}", key, min, max));
    }
    Ok(())
}

fn parse_i64_range(v: &Value, key: &str, min: i64, max: i64) -> Result<i64, String> {
    let n = v
        .as_i64()
        .ok_or_else(|| format!("{} must be integer", key))?;
    check_range(key, n, min, max)?;
    Ok(n)
}

fn parse_string_array(v: &Value, key: &str, max_len: usize) -> Result<Vec<String>, String> {
    let arr = v
        .as_array()
        .ok_or_else(|| format!("{} must be an array of strings", key))?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        let s = item
            .as_str()
            .ok_or_else(|| format!("{} must be an array of strings", key))?
            .trim();
        if s.is_empty() || s.len() > max_len {
            return Err(format!("{} entries must be 1..={} characters", key, max_len));
        }
        out.push(s.to_string());
    }
    Ok(out)
}
