//! The week-in-review report pipeline: fetch every saved search,
//! aggregate counts, render a chart and table per section, and compose
//! the final multipart email.

use anyhow::{Context as _, Result};
use askama::Template as _;
use lettre::Message;
use std::fs;
use tracing::debug;
use weekrev_sdk::{SearchSpec, TicketSource, WeekWindow};

pub mod aggregate;
pub mod chart;
pub mod compose;
pub mod render;
pub mod searches;

pub use compose::MailConfig;

/// One fully rendered section, ready for composition.
#[derive(Debug)]
pub struct ReportSection {
    pub spec: SearchSpec,
    pub totals: Vec<(String, u64)>,
    pub content_id: String,
    pub png: Vec<u8>,
}

/// Runs every search and renders its chart. Fetching happens up front:
/// the report is only meaningful if all sections succeed, so the first
/// failure aborts before anything is rendered.
pub fn build_sections(
    source: &dyn TicketSource,
    window: &WeekWindow,
) -> Result<Vec<ReportSection>> {
    let specs = searches::search_set(window);

    let mut result_lists = Vec::with_capacity(specs.len());
    for spec in &specs {
        result_lists.push(source.search(spec)?);
    }

    // Charts land in a run-scoped directory; dropping it cleans up on
    // every exit path.
    let chart_dir = tempfile::tempdir().context("failed to create chart directory")?;

    let mut sections = Vec::with_capacity(specs.len());
    for (index, (spec, records)) in specs.into_iter().zip(result_lists).enumerate() {
        let counts = aggregate::aggregate(&records, spec.group_key.field_name());
        let totals = aggregate::sorted_totals(&counts, spec.sort_direction());
        debug!(section = %spec.title, ?totals, "aggregated section");

        let path = chart_dir.path().join(format!("section-{}.png", index));
        chart::render_chart(&spec.title, &spec.query, &totals, &path)?;
        let png =
            fs::read(&path).with_context(|| format!("failed to read chart {}", path.display()))?;

        let content_id = compose::content_id(index, &png);
        sections.push(ReportSection {
            spec,
            totals,
            content_id,
            png,
        });
    }

    Ok(sections)
}

/// The whole linear run: Fetch(all), Aggregate, Render, Compose.
pub fn build_report(
    source: &dyn TicketSource,
    window: &WeekWindow,
    mail: &MailConfig,
) -> Result<Message> {
    let sections = build_sections(source, window)?;

    let views: Vec<render::SectionView> = sections.iter().map(render::SectionView::new).collect();
    let html = render::HtmlReport { sections: &views }
        .render()
        .context("failed to render HTML body")?;
    let text = render::TextReport {
        week_ending: window.end().to_string(),
        sections: &views,
    }
    .render()
    .context("failed to render plaintext body")?;

    let subject = format!("Week in Review {}", window.end());
    let images = sections
        .into_iter()
        .map(|section| (section.content_id, section.png))
        .collect();

    compose::compose_email(mail, &subject, html, text, images)
}
