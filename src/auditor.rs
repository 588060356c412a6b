use crate::catalog::{self, AuditItem, Catalog, FixedItem};
use crate::llm::{Analyst, FeatureExtraction, HeadlineReview, Judgment};
use crate::report::{Category, Finding, Report, ReportBuilder};
use crate::snapshot::PageSnapshot;
use tracing::{debug, warn};

/// Runs the checklist against one page.
///
/// Items execute strictly in catalog order, one service call at a time. A
/// failing item becomes a zero-scored finding carrying the error and the run
/// moves on; nothing short of a panic stops an audit once it has started.
pub struct Auditor {
    analyst: Analyst,
    catalog: Catalog,
}

impl Auditor {
    pub fn new(analyst: Analyst) -> Self {
        Self::with_catalog(analyst, Catalog::standard())
    }

    pub fn with_catalog(analyst: Analyst, catalog: Catalog) -> Self {
        Self { analyst, catalog }
    }

    pub fn analyst(&self) -> &Analyst {
        &self.analyst
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Service calls attempted so far across every run of this auditor.
    pub fn calls(&self) -> usize {
        self.analyst.calls()
    }

    pub async fn run(&self, page: &PageSnapshot) -> Report {
        let sections = self.catalog.sections();
        let mut builder = ReportBuilder::new();

        for (i, section) in sections.iter().enumerate() {
            println!("🔍 {}/{}: {}", i + 1, sections.len(), section.category.name);

            for item in &section.items {
                let findings = self.run_item(&section.category, item, page).await;
                builder.extend(&section.category, findings);
            }
        }

        let report = builder.finish();
        debug!(
            findings = report.total_findings(),
            calls = self.calls(),
            "audit finished"
        );
        report
    }

    async fn run_item(
        &self,
        category: &Category,
        item: &AuditItem,
        page: &PageSnapshot,
    ) -> Vec<Finding> {
        match item {
            AuditItem::Fixed(fixed) => vec![self.run_fixed(category, fixed, page).await],
            AuditItem::FormDesign => catalog::form_design_findings(page),
            AuditItem::FeatureExtraction => {
                let result = self
                    .analyst
                    .request_json::<FeatureExtraction>(
                        catalog::PRODUCT_ANALYST_SYSTEM_PROMPT,
                        &catalog::feature_extraction_prompt(page),
                    )
                    .await;
                if let Err(err) = &result {
                    warn!(category = category.name, error = %err, "feature extraction failed");
                }
                catalog::feature_findings(result)
            }
            AuditItem::HeadlineDimensions => {
                let result = self
                    .analyst
                    .request_json::<HeadlineReview>(
                        catalog::HEADLINE_SYSTEM_PROMPT,
                        &catalog::headline_prompt(page),
                    )
                    .await;
                if let Err(err) = &result {
                    warn!(category = category.name, error = %err, "headline review failed");
                }
                catalog::headline_findings(result)
            }
        }
    }

    async fn run_fixed(&self, category: &Category, item: &FixedItem, page: &PageSnapshot) -> Finding {
        let context = item.context(page);
        let judgment = match self
            .analyst
            .evaluate(item.question, &context, item.guidance)
            .await
        {
            Ok(judgment) => judgment,
            Err(err) => {
                warn!(category = category.name, item = item.label, error = %err, "checklist item failed");
                Judgment::fallback(&err)
            }
        };

        Finding::from_judgment(item.label, judgment, category.scale)
    }
}
