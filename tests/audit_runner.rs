use async_trait::async_trait;
use cro_auditor::catalog::{self, Catalog};
use cro_auditor::llm::{Analyst, ChatBackend, ChatRequest};
use cro_auditor::report::Scale;
use cro_auditor::{AnalysisError, Auditor, PageSnapshot};

/// Answers each prompt kind with a fixed reply, or fails every call.
struct ScriptedBackend {
    configured: bool,
    judgment: Result<&'static str, &'static str>,
    features: &'static str,
    headline: &'static str,
}

impl ScriptedBackend {
    fn healthy() -> Self {
        Self {
            configured: true,
            judgment: Ok(r#"{"score": 2, "issues": ["Mostly clear"], "suggestion": "Tighten the H1"}"#),
            features: r#"{"features": [
                {"feature": "Instant rollbacks", "unique": true, "pain_point": "Broken deploys", "severity": 5, "frequency": 4, "outcome": "Calm releases"},
                {"feature": "Preview URLs", "unique": false, "pain_point": "Slow reviews", "severity": 2, "frequency": 2, "outcome": "Faster feedback"}
            ]}"#,
            headline: r#"{"dimensions": [
                {"name": "Specificity", "score": 8, "analysis": "Has a number", "suggestion": "Keep it"},
                {"name": "Uniqueness", "score": 5, "analysis": "Generic", "suggestion": "Name the rival"},
                {"name": "Desire", "score": 6, "analysis": "Some pull", "suggestion": "Lead with outcome"},
                {"name": "Clarity", "score": 9, "analysis": "Clear", "suggestion": "None"},
                {"name": "Succinctness", "score": 3, "analysis": "Wordy", "suggestion": "Cut half"}
            ]}"#,
        }
    }

    fn failing() -> Self {
        Self {
            judgment: Err("connection refused"),
            ..Self::healthy()
        }
    }

    fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::healthy()
        }
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, AnalysisError> {
        let reply = if request.system == catalog::PRODUCT_ANALYST_SYSTEM_PROMPT {
            self.judgment.map(|_| self.features)
        } else if request.system == catalog::HEADLINE_SYSTEM_PROMPT {
            self.judgment.map(|_| self.headline)
        } else {
            self.judgment
        };

        reply
            .map(str::to_string)
            .map_err(|e| AnalysisError::Request(e.to_string()))
    }
}

fn auditor(backend: ScriptedBackend) -> Auditor {
    Auditor::new(Analyst::new(Box::new(backend)))
}

fn landing_page(form: &str) -> PageSnapshot {
    PageSnapshot::from_html(&format!(
        r#"<html><head><title>Acme Deploy</title></head><body>
           <h1>Deploy any app in 60 seconds</h1>
           <h2>Built for DevOps teams</h2>
           <p>Acme turns a git push into a running production service.</p>
           <a class="btn" href="/signup">Start free trial</a>
           {form}
           </body></html>"#
    ))
}

fn form_with_fields(count: usize) -> String {
    format!("<form>{}</form>", "<input>".repeat(count))
}

fn category_names(auditor_report: &cro_auditor::Report) -> Vec<&'static str> {
    auditor_report
        .categories()
        .iter()
        .map(|c| c.category.name)
        .collect()
}

#[tokio::test]
async fn report_follows_catalog_order_with_and_without_form() {
    let expected: Vec<&str> = Catalog::standard()
        .sections()
        .iter()
        .map(|s| s.category.name)
        .collect();

    for page in [landing_page(""), landing_page(&form_with_fields(2))] {
        let report = auditor(ScriptedBackend::healthy()).run(&page).await;
        assert_eq!(category_names(&report), expected);
    }
}

#[tokio::test]
async fn healthy_run_scores_every_item_and_counts_calls() {
    let auditor = auditor(ScriptedBackend::healthy());
    let report = auditor.run(&landing_page("")).await;

    let orient = report.category("1. Orient Upon Entrance").unwrap();
    assert_eq!(orient.findings.len(), 4);
    assert!(orient.findings.iter().all(|f| f.score == 2));
    assert_eq!(orient.findings[0].details, "Mostly clear");
    assert_eq!(orient.findings[0].solution, "Tighten the H1");

    let features = report.category("9. Feature-Pain Point Analysis").unwrap();
    assert_eq!(features.findings.len(), 2);
    assert_eq!(features.findings[0].question, "Instant rollbacks [UNIQUE]");
    assert_eq!(features.findings[0].score, 3);
    assert_eq!(features.findings[1].score, 0);

    let headline = report.category("10. Headline Copy Quality").unwrap();
    assert_eq!(headline.category.scale, Scale::TenPoint);
    assert_eq!(headline.findings.len(), 5);
    assert_eq!(headline.findings[3].score, 9);

    assert!(auditor.analyst().is_available());
    assert_eq!(auditor.calls(), auditor.catalog().max_service_calls());
    assert_eq!(auditor.calls(), 40);
}

#[tokio::test]
async fn failing_service_degrades_every_item_without_aborting() {
    let auditor = auditor(ScriptedBackend::failing());
    let report = auditor.run(&landing_page("")).await;

    assert_eq!(report.categories().len(), Catalog::standard().sections().len());
    for group in report.categories() {
        for finding in &group.findings {
            assert_eq!(finding.score, 0, "{} should be degraded", finding.question);
            assert!(!finding.details.is_empty());
        }
    }

    let orient = report.category("1. Orient Upon Entrance").unwrap();
    assert!(orient.findings[0].details.contains("connection refused"));
    assert_eq!(orient.findings[0].solution, "Manual review");

    let features = report.category("9. Feature-Pain Point Analysis").unwrap();
    assert_eq!(features.findings.len(), 1);
    assert_eq!(features.findings[0].question, "Extraction error");

    let headline = report.category("10. Headline Copy Quality").unwrap();
    assert_eq!(headline.findings[0].question, "Analysis error");
}

#[tokio::test]
async fn missing_credential_skips_the_network_entirely() {
    let auditor = auditor(ScriptedBackend::unconfigured());
    let report = auditor.run(&landing_page("")).await;

    assert_eq!(auditor.calls(), 0);
    assert!(!auditor.analyst().is_available());

    let orient = report.category("1. Orient Upon Entrance").unwrap();
    assert_eq!(orient.findings[0].details, "API not available");

    let headline = report.category("10. Headline Copy Quality").unwrap();
    assert_eq!(headline.findings.len(), 1);
    assert_eq!(headline.findings[0].question, "API unavailable");
}

#[tokio::test]
async fn form_group_depends_on_field_count() {
    let absent = auditor(ScriptedBackend::healthy())
        .run(&landing_page(""))
        .await;
    let form = absent.category("7. Form Design").unwrap();
    assert_eq!(form.findings.len(), 1);
    assert_eq!(form.findings[0].question, "No form detected");

    for (fields, score) in [(2, 3), (5, 1), (8, 0)] {
        let report = auditor(ScriptedBackend::healthy())
            .run(&landing_page(&form_with_fields(fields)))
            .await;
        let form = report.category("7. Form Design").unwrap();
        assert_eq!(form.findings[0].question, "Minimum fields?");
        assert_eq!(form.findings[0].score, score, "{} fields", fields);
        assert_eq!(form.findings.len(), 9);
    }
}

#[tokio::test]
async fn empty_feature_list_yields_single_placeholder() {
    let backend = ScriptedBackend {
        features: r#"{"features": []}"#,
        ..ScriptedBackend::healthy()
    };
    let report = auditor(backend).run(&landing_page("")).await;

    let features = report.category("9. Feature-Pain Point Analysis").unwrap();
    assert_eq!(features.findings.len(), 1);
    assert_eq!(features.findings[0].question, "No features extracted");
    assert_eq!(features.findings[0].score, 0);
}
