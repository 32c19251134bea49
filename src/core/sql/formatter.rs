/// Fixed-width text rendering for result sets.
pub struct TableFormatter;

impl TableFormatter {
    /// Renders headers and rows as a pipe-delimited grid. Columns are sized
    /// to their widest cell with one space of padding on each side and a
    /// minimum content width of three characters.
    pub fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.len());
                }
            }
        }
        for width in &mut widths {
            *width = (*width).max(3);
        }

        let mut out = String::new();
        out.push_str(&Self::format_row(headers, &widths));
        out.push('\n');

        out.push('|');
        for width in &widths {
            out.push(' ');
            out.push_str(&"-".repeat(*width));
            out.push_str(" |");
        }
        out.push('\n');

        for row in rows {
            out.push_str(&Self::format_row(row, &widths));
            out.push('\n');
        }
        out
    }

    fn format_row(cells: &[String], widths: &[usize]) -> String {
        let mut line = String::from("|");
        for (i, cell) in cells.iter().enumerate() {
            if i < widths.len() {
                let padding = widths[i].saturating_sub(cell.len());
                line.push(' ');
                line.push_str(cell);
                line.push_str(&" ".repeat(padding + 1));
                line.push('|');
            }
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let headers = vec!["id".to_string(), "name".to_string()];
        let rows = vec![
            vec!["1".to_string(), "alice".to_string()],
            vec!["2".to_string(), "bo".to_string()],
        ];
        let rendered = TableFormatter::format_table(&headers, &rows);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        // every line is as wide as the header line
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
        assert!(lines[0].contains("id"));
        assert!(lines[1].starts_with("| ---"));
        assert!(lines[2].contains("alice"));
    }
}
