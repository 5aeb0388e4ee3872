//! Markdown run report

use crate::output::stats::RunStatistics;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report of a run to `output_path`
pub fn write_markdown_report(stats: &RunStatistics, output_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let markdown = format_markdown_report(stats);
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats run statistics as markdown
pub fn format_markdown_report(stats: &RunStatistics) -> String {
    let mut md = String::new();

    md.push_str("# Aqua-Harvest Run Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", stats.started_at.to_rfc3339()));
    if let Some(finished) = &stats.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = stats.duration_seconds() {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Status**: {}\n", stats.status.as_str()));
    md.push_str(&format!("- **Config Hash**: {}\n\n", stats.config_hash));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Records Added**: {}\n", stats.records_added()));
    md.push_str(&format!("- **Fetch Failures**: {}\n", stats.fetch_failures()));
    md.push_str(&format!("- **Invalid Pages**: {}\n", stats.invalid_records()));
    md.push_str(&format!(
        "- **Translation Requests**: {} ({} cache hits, {} failures)\n\n",
        stats.translation.requests, stats.translation.cache_hits, stats.translation.failures
    ));

    if !stats.categories.is_empty() {
        md.push_str("## Categories\n\n");
        md.push_str("| Category | Subcategories | Listed | New | Added | Failures | Invalid | Total |\n");
        md.push_str("|----------|---------------|--------|-----|-------|----------|---------|-------|\n");

        for category in &stats.categories {
            let subcategories = if category.used_fallback {
                format!("{} (whole category)", category.subcategories_visited)
            } else {
                category.subcategories_visited.to_string()
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
                category.slug,
                subcategories,
                category.urls_listed,
                category.new_urls,
                category.records_added,
                category.fetch_failures,
                category.invalid_records,
                category.records_after()
            ));
        }
        md.push('\n');
    }

    md
}
