use crate::report::{CategoryFindings, Report, Scale, Tier};
use crate::util::escape_html;
use anyhow::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use url::Url;

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub url: String,
    pub generated_at: DateTime<Local>,
    pub analysis_calls: usize,
    pub version: String,
    pub llm_provider: String,
    pub llm_model: String,
}

impl ReportMetadata {
    pub fn new(url: &Url, generated_at: DateTime<Local>, analysis_calls: usize) -> Self {
        Self {
            url: url.to_string(),
            generated_at,
            analysis_calls,
            version: env!("CARGO_PKG_VERSION").to_string(),
            llm_provider: String::new(),
            llm_model: String::new(),
        }
    }

    pub fn with_model(mut self, provider: impl Into<String>, model: impl Into<String>) -> Self {
        self.llm_provider = provider.into();
        self.llm_model = model.into();
        self
    }

    fn display_date(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M").to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Html,
    Markdown,
    All,
}

impl ReportFormat {
    fn includes(&self, other: ReportFormat) -> bool {
        *self == ReportFormat::All || *self == other
    }
}

/// Every requested rendering, produced before anything touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    documents: Vec<(&'static str, String)>,
}

impl RenderedReport {
    /// `(extension, content)` pairs in write order.
    pub fn documents(&self) -> &[(&'static str, String)] {
        &self.documents
    }

    pub fn get(&self, extension: &str) -> Option<&str> {
        self.documents
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, content)| content.as_str())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a ReportMetadata,
    summary: JsonSummary,
    categories: &'a [CategoryFindings],
}

#[derive(Serialize)]
struct JsonSummary {
    total_findings: usize,
    good: usize,
    needs_work: usize,
    critical: usize,
}

pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        report: &Report,
        metadata: &ReportMetadata,
        format: ReportFormat,
    ) -> Result<RenderedReport> {
        let mut documents = Vec::new();

        if format.includes(ReportFormat::Markdown) {
            documents.push(("md", self.render_markdown(report, metadata)));
        }
        if format.includes(ReportFormat::Html) {
            documents.push(("html", self.render_html(report, metadata)));
        }
        if format.includes(ReportFormat::Json) {
            documents.push(("json", self.render_json(report, metadata)?));
        }

        Ok(RenderedReport { documents })
    }

    pub fn render_markdown(&self, report: &Report, metadata: &ReportMetadata) -> String {
        let mut md = String::new();

        md.push_str("# 🤖 COMPREHENSIVE CRO AUDIT\n\n");
        md.push_str(&format!("**URL:** {}\n", metadata.url));
        md.push_str(&format!("**Date:** {}\n", metadata.display_date()));
        md.push_str("**Analysis Depth:** Granular per-item\n\n");

        for group in report.categories() {
            let denominator = group.category.scale.denominator();
            md.push_str(&format!("## {}\n\n", group.category.name));

            for finding in &group.findings {
                let tier = group.tier_of(finding);
                md.push_str(&format!("### {} {}\n", tier.icon(), finding.question));
                md.push_str(&format!("- **Score:** {}/{}\n", finding.score, denominator));
                md.push_str(&format!("- **Analysis:** {}\n", finding.details));
                md.push_str(&format!("- **💡 Fix:** {}\n\n", finding.solution));
            }
            md.push_str("---\n\n");
        }

        md.push_str(&format!("**Scoring:** {}\n", scoring_legend()));
        md.push_str(&format!(
            "*Powered by AI - {} API calls*\n",
            metadata.analysis_calls
        ));
        md
    }

    pub fn render_html(&self, report: &Report, metadata: &ReportMetadata) -> String {
        let url = escape_html(&metadata.url);
        let mut html = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>CRO Audit: {url}</title>
    <style>
        body {{ font-family: -apple-system, sans-serif; margin: 40px; background: #f5f5f5; }}
        .container {{ max-width: 900px; margin: 0 auto; background: white; padding: 40px; border-radius: 8px; }}
        h1 {{ color: #1a73e8; }}
        .meta {{ color: #666; margin-bottom: 30px; }}
        .category {{ margin-bottom: 30px; border: 1px solid #ddd; border-radius: 8px; overflow: hidden; }}
        .category-header {{ background: #f1f3f4; padding: 15px; font-weight: 600; text-transform: uppercase; }}
        .item {{ padding: 20px; border-bottom: 1px solid #eee; }}
        .item:last-child {{ border-bottom: none; }}
        .score {{ font-weight: bold; margin-bottom: 10px; }}
        .score.high {{ color: #0f9d58; }}
        .score.med {{ color: #f4b400; }}
        .score.low {{ color: #d93025; }}
        .fix {{ background: #e8f0fe; padding: 15px; border-radius: 4px; margin-top: 10px; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>🤖 Comprehensive CRO Audit</h1>
        <div class="meta">
            URL: <a href="{url}">{url}</a><br>
            Date: {date}<br>
            Analysis: Granular per-item
        </div>
"#,
            url = url,
            date = metadata.display_date(),
        );

        for group in report.categories() {
            let denominator = group.category.scale.denominator();
            html.push_str(&format!(
                "        <div class=\"category\"><div class=\"category-header\">{}</div>\n",
                escape_html(group.category.name)
            ));

            for finding in &group.findings {
                let tier = group.tier_of(finding);
                html.push_str(&format!(
                    r#"            <div class="item">
                <h3>{question}</h3>
                <div class="score {class}">Score: {score}/{denominator}</div>
                <p><strong>Analysis:</strong> {details}</p>
                <div class="fix"><strong>💡 Fix:</strong> {solution}</div>
            </div>
"#,
                    question = escape_html(&finding.question),
                    class = tier.css_class(),
                    score = finding.score,
                    denominator = denominator,
                    details = escape_html(&finding.details),
                    solution = escape_html(&finding.solution),
                ));
            }
            html.push_str("        </div>\n");
        }

        html.push_str(&format!(
            r#"        <div class="meta" style="margin-top: 40px; border-top: 1px solid #eee; padding-top: 20px;">
            {legend}<br>
            Powered by AI - {calls} API calls
        </div>
    </div>
</body>
</html>
"#,
            legend = scoring_legend(),
            calls = metadata.analysis_calls,
        ));
        html
    }

    pub fn render_json(&self, report: &Report, metadata: &ReportMetadata) -> Result<String> {
        let counts = report.tier_counts();
        let document = JsonReport {
            metadata,
            summary: JsonSummary {
                total_findings: report.total_findings(),
                good: counts.good,
                needs_work: counts.needs_work,
                critical: counts.critical,
            },
            categories: report.categories(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Write every rendered document as `<output_dir>/<basename>.<ext>`.
    pub fn export_report(
        &self,
        rendered: &RenderedReport,
        output_dir: &Path,
        basename: &str,
    ) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(output_dir)?;
        let mut exported_files = Vec::new();

        for (extension, content) in rendered.documents() {
            let path = output_dir.join(format!("{}.{}", basename, extension));
            fs::write(&path, content)?;
            exported_files.push(path);
        }

        Ok(exported_files)
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

fn scoring_legend() -> String {
    let three = Scale::ThreePoint;
    let ten = Scale::TenPoint;
    format!(
        "{} 0={} | {} 1={} | {} 2+={} (headline: {} 0-3, {} 4-6, {} 7+ out of {})",
        three.classify(0).icon(),
        Tier::Critical.label(),
        three.classify(1).icon(),
        Tier::NeedsWork.label(),
        three.classify(2).icon(),
        Tier::Good.label(),
        ten.classify(3).icon(),
        ten.classify(6).icon(),
        ten.classify(7).icon(),
        ten.denominator(),
    )
}

/// `CRO_COMPREHENSIVE_<host>_<YYYYmmdd_HHMMSS>` with a leading `www.` dropped.
/// Dots and IPv6 colons become underscores; brackets are removed.
pub fn report_basename(url: &Url, timestamp: &DateTime<Local>) -> String {
    let host = url.host_str().unwrap_or("unknown");
    let host: String = host
        .strip_prefix("www.")
        .unwrap_or(host)
        .chars()
        .filter(|c| !matches!(c, '[' | ']'))
        .map(|c| if matches!(c, '.' | ':') { '_' } else { c })
        .collect();
    format!(
        "CRO_COMPREHENSIVE_{}_{}",
        host,
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Category, Finding, ReportBuilder};
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    fn sample_report() -> Report {
        let orient = Category::three_point("1. Orient Upon Entrance");
        let headline = Category::ten_point("10. Headline Copy Quality");

        let mut builder = ReportBuilder::new();
        builder.push(
            &orient,
            Finding::new("Clear page goal?", 1, "Two CTAs <compete>", "Pick \"one\" & drop the other"),
        );
        builder.push(&headline, Finding::new("Specificity", 7, "Has numbers", "Keep it"));
        builder.push(&headline, Finding::new("Clarity", 3, "Jargon", "Plain words"));
        builder.finish()
    }

    fn metadata() -> ReportMetadata {
        let url = Url::parse("https://www.acme.io/pricing").unwrap();
        ReportMetadata::new(&url, fixed_time(), 40).with_model("OpenAI", "gpt-4o-mini")
    }

    #[test]
    fn markdown_uses_category_scale_and_tier_icons() {
        let md = Reporter::new().render_markdown(&sample_report(), &metadata());

        assert!(md.starts_with("# 🤖 COMPREHENSIVE CRO AUDIT"));
        assert!(md.contains("**Date:** 2024-03-09 14:05"));
        assert!(md.contains("### 🟡 Clear page goal?\n- **Score:** 1/3\n"));
        assert!(md.contains("### 🟢 Specificity\n- **Score:** 7/10\n"));
        assert!(md.contains("### 🔴 Clarity\n- **Score:** 3/10\n"));
        assert!(md.contains("40 API calls"));
    }

    #[test]
    fn html_escapes_interpolated_text() {
        let html = Reporter::new().render_html(&sample_report(), &metadata());

        assert!(html.contains("Two CTAs &lt;compete&gt;"));
        assert!(html.contains("Pick &quot;one&quot; &amp; drop the other"));
        assert!(!html.contains("<compete>"));
        assert!(html.contains(r#"<div class="score med">Score: 1/3</div>"#));
        assert!(html.contains(r#"<div class="score high">Score: 7/10</div>"#));
        assert!(html.contains(r#"<div class="score low">Score: 3/10</div>"#));
        assert!(html.contains("Powered by AI - 40 API calls"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let reporter = Reporter::new();
        let report = sample_report();
        let metadata = metadata();

        let first = reporter.render(&report, &metadata, ReportFormat::All).unwrap();
        let second = reporter.render(&report, &metadata, ReportFormat::All).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn json_carries_metadata_summary_and_categories() {
        let json = Reporter::new().render_json(&sample_report(), &metadata()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["analysis_calls"], 40);
        assert_eq!(value["metadata"]["url"], "https://www.acme.io/pricing");
        assert_eq!(value["summary"]["total_findings"], 3);
        assert_eq!(value["summary"]["critical"], 1);
        assert_eq!(value["categories"][1]["category"]["scale"], "TenPoint");
        assert_eq!(value["categories"][1]["findings"][0]["score"], 7);
    }

    #[test]
    fn format_selection_controls_documents() {
        let reporter = Reporter::new();
        let rendered = reporter
            .render(&sample_report(), &metadata(), ReportFormat::Markdown)
            .unwrap();
        assert_eq!(rendered.documents().len(), 1);
        assert!(rendered.get("md").is_some());
        assert!(rendered.get("html").is_none());

        let all = reporter
            .render(&sample_report(), &metadata(), ReportFormat::All)
            .unwrap();
        let extensions: Vec<_> = all.documents().iter().map(|(ext, _)| *ext).collect();
        assert_eq!(extensions, vec!["md", "html", "json"]);
    }

    #[test]
    fn basename_strips_www_and_dots() {
        let url = Url::parse("https://www.acme.co.uk/landing").unwrap();
        assert_eq!(
            report_basename(&url, &fixed_time()),
            "CRO_COMPREHENSIVE_acme_co_uk_20240309_140507"
        );

        let bare = Url::parse("http://shop.example.com").unwrap();
        assert!(report_basename(&bare, &fixed_time()).starts_with("CRO_COMPREHENSIVE_shop_example_com_"));
    }

    #[test]
    fn basename_is_portable_for_ipv6_hosts() {
        let url = Url::parse("http://[::1]:8080/landing").unwrap();
        let name = report_basename(&url, &fixed_time());

        assert_eq!(name, "CRO_COMPREHENSIVE___1_20240309_140507");
        assert!(!name.contains(|c: char| matches!(c, ':' | '[' | ']')));
    }
}
