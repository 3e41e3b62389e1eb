//! Tab-separated export of survey responses.
//!
//! Each user's responses arrive as sparse rows (one filled cell per
//! row, positioned by question index). [`collapse_rows`] packs those
//! sparse rows together so disjoint answers share a line, while
//! duplicate answers to the same question spill onto additional lines.

/// A single recorded answer, positioned for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    /// Display name of the responding user.
    pub user: String,
    /// Index of the question within the survey's column order.
    pub question_index: usize,
    /// The chosen option index, as recorded.
    pub option: i32,
}

/// First-fit packing of sparse rows.
///
/// Every cell of every input row is placed into the first output row
/// whose key column (index 0) matches the input row's key and whose
/// cell at that position is still free; when none fits, a new output
/// row keyed like the input is started. Empty cells are packed like
/// filled ones, so an empty cell landing on an occupied column opens a
/// blank row that survives in the output. Empty input yields an empty
/// result.
#[must_use]
pub fn collapse_rows(rows: &[Vec<String>]) -> Vec<Vec<String>> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let width = first.len();

    let mut result: Vec<Vec<String>> = vec![vec![String::new(); width]];
    for row in rows {
        for (i, item) in row.iter().enumerate() {
            let slot = result
                .iter_mut()
                .find(|res| res[i].is_empty() && res[0] == row[0]);
            if let Some(res) = slot {
                res[i].clone_from(item);
            } else {
                let mut fresh = vec![String::new(); width];
                fresh[0].clone_from(&row[0]);
                fresh[i].clone_from(item);
                result.push(fresh);
            }
        }
    }
    result
}

/// Render survey responses as TSV.
///
/// The header row is `Username` followed by the question titles; data
/// rows carry the chosen option index in the matching column. Users
/// appear in order of their first recorded answer.
#[must_use]
pub fn render_tsv(question_titles: &[String], entries: &[ExportEntry]) -> String {
    let width = question_titles.len();

    // Group sparse rows per user, preserving first-seen user order.
    let mut per_user: Vec<(String, Vec<Vec<String>>)> = Vec::new();
    for entry in entries {
        let mut row = vec![String::new(); width];
        if let Some(cell) = row.get_mut(entry.question_index) {
            *cell = entry.option.to_string();
        }
        match per_user.iter_mut().find(|(user, _)| *user == entry.user) {
            Some((_, rows)) => rows.push(row),
            None => per_user.push((entry.user.clone(), vec![row])),
        }
    }

    let mut lines = Vec::with_capacity(per_user.len() + 1);
    let mut header = vec!["Username".to_string()];
    header.extend(question_titles.iter().cloned());
    lines.push(header.join("\t"));

    for (user, rows) in per_user {
        for collapsed in collapse_rows(&rows) {
            lines.push(format!("{user}\t{}", collapsed.join("\t")));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn collapse_merges_disjoint_rows() {
        let rows = vec![row(&["", "1", ""]), row(&["", "", "2"])];
        let collapsed = collapse_rows(&rows);

        // The second row's empty middle cell cannot land on the
        // occupied column, so it opens a blank row that stays behind.
        assert_eq!(
            collapsed,
            vec![row(&["", "1", "2"]), row(&["", "", ""])]
        );
    }

    #[test]
    fn collapse_spills_duplicate_columns() {
        let rows = vec![row(&["", "1", ""]), row(&["", "3", ""])];
        let collapsed = collapse_rows(&rows);

        assert_eq!(collapsed, vec![row(&["", "1", ""]), row(&["", "3", ""])]);
    }

    #[test]
    fn collapse_keeps_rows_with_distinct_keys_apart() {
        let rows = vec![row(&["2", ""]), row(&["", "0"])];
        let collapsed = collapse_rows(&rows);

        // The keyed row never merges with the unkeyed one.
        assert_eq!(collapsed, vec![row(&["", "0"]), row(&["2", ""])]);
    }

    #[test]
    fn collapse_of_nothing_is_nothing() {
        assert!(collapse_rows(&[]).is_empty());
    }

    #[test]
    fn tsv_disjoint_answers_share_a_line() {
        let titles = vec!["Q1".to_string(), "Q2".to_string(), "Q3".to_string()];
        let entries = vec![
            ExportEntry {
                user: "ada".to_string(),
                question_index: 1,
                option: 1,
            },
            ExportEntry {
                user: "grace".to_string(),
                question_index: 1,
                option: 0,
            },
            ExportEntry {
                user: "ada".to_string(),
                question_index: 2,
                option: 2,
            },
        ];

        let tsv = render_tsv(&titles, &entries);
        let lines: Vec<&str> = tsv.lines().collect();

        assert_eq!(lines[0], "Username\tQ1\tQ2\tQ3");
        assert_eq!(lines[1], "ada\t\t1\t2");
        // Packing ada's two sparse rows leaves a blank row behind.
        assert_eq!(lines[2], "ada\t\t\t");
        assert_eq!(lines[3], "grace\t\t0\t");
    }

    #[test]
    fn tsv_first_column_answer_starts_its_own_row() {
        // An answer in column 0 becomes the row key and never merges
        // with rows whose key column is blank.
        let titles = vec!["Q1".to_string(), "Q2".to_string()];
        let entries = vec![
            ExportEntry {
                user: "ada".to_string(),
                question_index: 0,
                option: 1,
            },
            ExportEntry {
                user: "ada".to_string(),
                question_index: 1,
                option: 2,
            },
        ];

        let tsv = render_tsv(&titles, &entries);
        let lines: Vec<&str> = tsv.lines().collect();

        assert_eq!(lines[1], "ada\t\t2");
        assert_eq!(lines[2], "ada\t1\t");
    }

    #[test]
    fn tsv_with_no_entries_is_just_the_header() {
        let titles = vec!["Q1".to_string()];
        assert_eq!(render_tsv(&titles, &[]), "Username\tQ1");
    }
}
