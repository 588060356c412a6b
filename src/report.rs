use crate::llm::Judgment;
use serde::Serialize;

/// Scoring scale of a category. Carried explicitly on every category so
/// rendering never has to guess it from the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Scale {
    ThreePoint,
    TenPoint,
}

/// Visual severity bucket of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Good,
    NeedsWork,
    Critical,
}

impl Scale {
    pub fn denominator(&self) -> u8 {
        match self {
            Scale::ThreePoint => 3,
            Scale::TenPoint => 10,
        }
    }

    pub fn classify(&self, score: u8) -> Tier {
        match self {
            Scale::TenPoint => match score {
                7.. => Tier::Good,
                4..=6 => Tier::NeedsWork,
                _ => Tier::Critical,
            },
            Scale::ThreePoint => match score {
                2.. => Tier::Good,
                1 => Tier::NeedsWork,
                _ => Tier::Critical,
            },
        }
    }

    /// Round a raw service score and clamp it into `0..=denominator`.
    pub fn normalize(&self, raw: f64) -> u8 {
        if !raw.is_finite() {
            return 0;
        }
        raw.round().clamp(0.0, f64::from(self.denominator())) as u8
    }
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Good => "Good",
            Tier::NeedsWork => "Needs Work",
            Tier::Critical => "Critical",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tier::Good => "🟢",
            Tier::NeedsWork => "🟡",
            Tier::Critical => "🔴",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Tier::Good => "high",
            Tier::NeedsWork => "med",
            Tier::Critical => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub scale: Scale,
}

impl Category {
    pub const fn three_point(name: &'static str) -> Self {
        Self {
            name,
            scale: Scale::ThreePoint,
        }
    }

    pub const fn ten_point(name: &'static str) -> Self {
        Self {
            name,
            scale: Scale::TenPoint,
        }
    }
}

/// One scored, explained checklist result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub question: String,
    pub score: u8,
    pub details: String,
    pub solution: String,
}

impl Finding {
    pub fn new(
        question: impl Into<String>,
        score: u8,
        details: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            score,
            details: details.into(),
            solution: solution.into(),
        }
    }

    pub fn from_judgment(question: impl Into<String>, judgment: Judgment, scale: Scale) -> Self {
        Self {
            question: question.into(),
            score: scale.normalize(judgment.score),
            details: judgment.issues.join(". "),
            solution: judgment.suggestion,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFindings {
    pub category: Category,
    pub findings: Vec<Finding>,
}

impl CategoryFindings {
    pub fn tier_of(&self, finding: &Finding) -> Tier {
        self.category.scale.classify(finding.score)
    }
}

/// Finalized audit result, grouped by category in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    categories: Vec<CategoryFindings>,
}

impl Report {
    pub fn categories(&self) -> &[CategoryFindings] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategoryFindings> {
        self.categories.iter().find(|c| c.category.name == name)
    }

    pub fn total_findings(&self) -> usize {
        self.categories.iter().map(|c| c.findings.len()).sum()
    }

    pub fn tier_counts(&self) -> TierCounts {
        let mut counts = TierCounts::default();
        for group in &self.categories {
            for finding in &group.findings {
                match group.tier_of(finding) {
                    Tier::Good => counts.good += 1,
                    Tier::NeedsWork => counts.needs_work += 1,
                    Tier::Critical => counts.critical += 1,
                }
            }
        }
        counts
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TierCounts {
    pub good: usize,
    pub needs_work: usize,
    pub critical: usize,
}

/// Append-only accumulator owned by the runner while the catalog executes.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    categories: Vec<CategoryFindings>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: &Category, finding: Finding) {
        match self
            .categories
            .iter_mut()
            .find(|c| c.category.name == category.name)
        {
            Some(group) => group.findings.push(finding),
            None => self.categories.push(CategoryFindings {
                category: category.clone(),
                findings: vec![finding],
            }),
        }
    }

    pub fn extend(&mut self, category: &Category, findings: impl IntoIterator<Item = Finding>) {
        for finding in findings {
            self.push(category, finding);
        }
    }

    pub fn finish(self) -> Report {
        Report {
            categories: self.categories,
        }
    }
}
