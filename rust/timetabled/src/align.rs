use serde::Serialize;

use crate::labels::LabelDescriptor;
use crate::slot::Slot;

/// Where a display period takes its content from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "dataIndex", rename_all = "camelCase")]
pub enum Alignment {
    /// Break/lunch header with no backing data cell.
    Synthetic,
    Data(usize),
    /// Ordinary label past the end of the day's data.
    Missing,
}

impl Alignment {
    pub fn data_index(self) -> Option<usize> {
        match self {
            Self::Data(i) => Some(i),
            _ => None,
        }
    }
}

/// Maps each display period of `labels` onto the day's data.
///
/// A break/lunch header only consumes a data cell when that cell is itself a
/// break/lunch marker; otherwise it is synthetic and the data pointer stays put.
/// The pointer never passes the end of `day`, and data left over after the last
/// label is unreachable.
pub fn align_day(labels: &[LabelDescriptor], day: &[Option<Slot>]) -> Vec<Alignment> {
    let mut p = 0usize;
    let mut out = Vec::with_capacity(labels.len());
    for label in labels {
        let cell_is_interval = day
            .get(p)
            .and_then(|c| c.as_ref())
            .and_then(Slot::interval)
            .is_some();

        if label.interval().is_some() && !cell_is_interval {
            out.push(Alignment::Synthetic);
            continue;
        }
        if p >= day.len() {
            out.push(Alignment::Missing);
            continue;
        }
        out.push(Alignment::Data(p));
        p += 1;
    }

    if p < day.len() {
        tracing::debug!(
            consumed = p,
            available = day.len(),
            "labels exhausted before day data"
        );
    }
    out
}
