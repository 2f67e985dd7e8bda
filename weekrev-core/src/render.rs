//! HTML and plaintext report bodies.

use askama::Template;

use crate::ReportSection;

/// Per-section view handed to the templates; row shading and column
/// labels are computed here so the templates stay logic-free.
#[derive(Debug)]
pub struct SectionView {
    pub title: String,
    pub query: String,
    pub content_id: String,
    pub column_label: &'static str,
    pub rows: Vec<RowView>,
}

#[derive(Debug)]
pub struct RowView {
    pub label: String,
    pub count: u64,
    pub shaded: bool,
}

impl SectionView {
    pub fn new(section: &ReportSection) -> Self {
        let rows = section
            .totals
            .iter()
            .enumerate()
            .map(|(index, (label, count))| RowView {
                label: label.clone(),
                count: *count,
                shaded: index % 2 == 0,
            })
            .collect();

        Self {
            title: section.spec.title.clone(),
            query: section.spec.query.clone(),
            content_id: section.content_id.clone(),
            column_label: section.spec.group_key.column_label(),
            rows,
        }
    }
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct HtmlReport<'a> {
    pub sections: &'a [SectionView],
}

#[derive(Template)]
#[template(path = "report.txt", escape = "none")]
pub struct TextReport<'a> {
    pub week_ending: String,
    pub sections: &'a [SectionView],
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekrev_sdk::{GroupKey, SearchSpec};

    fn section(totals: Vec<(String, u64)>) -> ReportSection {
        ReportSection {
            spec: SearchSpec::new(
                "Status != 'resolved'",
                GroupKey::Owner,
                "Open tickets by Owner",
            ),
            totals,
            content_id: "0.deadbeefdeadbeef@weekrev".to_string(),
            png: Vec::new(),
        }
    }

    #[test]
    fn html_contains_image_and_zebra_table() {
        let section = section(vec![("alice".to_string(), 2), ("bob".to_string(), 1)]);
        let views = vec![SectionView::new(&section)];
        let html = HtmlReport { sections: &views }.render().expect("rendered html");

        assert!(html.contains(r#"<img src="cid:0.deadbeefdeadbeef@weekrev""#));
        assert!(html.contains("<th>Owner</th>"));
        assert!(html.contains("<th>Tickets</th>"));
        assert!(html.contains(r#"<tr style="background:#CCC;">"#));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn html_escapes_labels() {
        let section = section(vec![("<script>".to_string(), 1)]);
        let views = vec![SectionView::new(&section)];
        let html = HtmlReport { sections: &views }.render().expect("rendered html");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_section_renders_header_only_table() {
        let section = section(Vec::new());
        let views = vec![SectionView::new(&section)];
        let html = HtmlReport { sections: &views }.render().expect("rendered html");
        assert!(html.contains("<th>Owner</th>"));
        assert!(!html.contains("<td>"));
    }

    #[test]
    fn text_fallback_lists_counts() {
        let section = section(vec![("alice".to_string(), 2)]);
        let views = vec![SectionView::new(&section)];
        let text = TextReport {
            week_ending: "2026-08-03".to_string(),
            sections: &views,
        }
        .render()
        .expect("rendered text");

        assert!(text.contains("Week in Review 2026-08-03"));
        assert!(text.contains("Open tickets by Owner"));
        assert!(text.contains("alice: 2"));
    }

    #[test]
    fn rows_alternate_shading_starting_shaded() {
        let section = section(vec![
            ("a".to_string(), 1),
            ("b".to_string(), 1),
            ("c".to_string(), 1),
        ]);
        let view = SectionView::new(&section);
        let shading: Vec<bool> = view.rows.iter().map(|row| row.shaded).collect();
        assert_eq!(shading, vec![true, false, true]);
    }
}
