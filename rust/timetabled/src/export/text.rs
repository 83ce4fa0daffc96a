use crate::matrix::ExportMatrix;

fn width(s: &str) -> usize {
    s.chars().count()
}

/// Column-aligned plain text: every column padded to its widest cell plus
/// `gap` spaces, with a dashed rule under the header.
pub fn encode_text(matrix: &ExportMatrix, gap: usize) -> String {
    let cols = matrix.column_count();
    let mut widths = vec![0usize; cols];
    for line in matrix.lines() {
        for (i, cell) in line.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(width(cell));
        }
    }

    let render = |line: &[String]| -> String {
        let mut out = String::new();
        for (i, w) in widths.iter().enumerate() {
            let cell = line.get(i).map(String::as_str).unwrap_or("");
            out.push_str(cell);
            if i + 1 < cols {
                out.push_str(&" ".repeat(w - width(cell) + gap));
            }
        }
        out.trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&render(&matrix.header));
    out.push('\n');
    let rule_len = widths.iter().sum::<usize>() + gap * cols.saturating_sub(1);
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');
    for row in &matrix.rows {
        out.push_str(&render(row));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_line_up() {
        let m = ExportMatrix {
            header: vec!["Time".into(), "Monday".into(), "Tuesday".into()],
            rows: vec![
                vec!["9:00 - 10:00".into(), "Math \u{2014} 10A".into(), "Free".into()],
                vec!["Break".into(), "Break".into(), "Break".into()],
            ],
        };
        let text = encode_text(&m, 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Time          Monday      Tuesday");
        assert_eq!(lines[1], "-".repeat(12 + 10 + 7 + 4));
        assert_eq!(lines[2], "9:00 - 10:00  Math \u{2014} 10A  Free");
        assert_eq!(lines[3], "Break         Break       Break");
    }
}
