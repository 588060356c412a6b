//! The CRO checklist: categories in display order and the items inside them.
//!
//! Fixed items build their prompt context from only the snapshot fields their
//! question is about. The form group is scored locally. Feature extraction and
//! headline dimensions are composite items: one service call each, fanned out
//! into however many findings the reply carries.

use crate::error::AnalysisError;
use crate::llm::{FeatureExtraction, HeadlineReview};
use crate::report::{Category, Finding, Scale};
use crate::snapshot::PageSnapshot;

pub const ORIENT: Category = Category::three_point("1. Orient Upon Entrance");
pub const MOTIVATION: Category = Category::three_point("2. Appeal to User Motivation");
pub const UNIQUE_VALUE: Category = Category::three_point("3. Convey Unique Value");
pub const CREDIBILITY: Category = Category::three_point("4. Establish Credibility");
pub const OBJECTIONS: Category = Category::three_point("5. Address Objections/Fears");
pub const OFFER: Category = Category::three_point("6. Present the Offer");
pub const FORM_DESIGN: Category = Category::three_point("7. Form Design");
pub const EDITING_CLARITY: Category =
    Category::three_point("8. Sales Page Editing Checklist - Clarity");
pub const EDITING_MESSAGING: Category =
    Category::three_point("8. Sales Page Editing Checklist - Messaging");
pub const EDITING_PERSUASION: Category =
    Category::three_point("8. Sales Page Editing Checklist - Persuasion");
pub const EDITING_ENGAGEMENT: Category =
    Category::three_point("8. Sales Page Editing Checklist - Engagement");
pub const EDITING_PRUNING: Category =
    Category::three_point("8. Sales Page Editing Checklist - Pruning");
pub const FEATURE_PAIN: Category = Category::three_point("9. Feature-Pain Point Analysis");
pub const HEADLINE: Category = Category::ten_point("10. Headline Copy Quality");

pub const MAX_FEATURES: usize = 5;

pub const PRODUCT_ANALYST_SYSTEM_PROMPT: &str =
    "You are an expert product analyst. Return valid JSON only.";
pub const HEADLINE_SYSTEM_PROMPT: &str =
    "You are an expert headline copywriter. Return valid JSON only.";

pub const HEADLINE_DIMENSIONS: [&str; 5] =
    ["Specificity", "Uniqueness", "Desire", "Clarity", "Succinctness"];

/// A checklist question answered by one service call on a 0–3 scale.
#[derive(Clone, Copy)]
pub struct FixedItem {
    pub label: &'static str,
    pub question: &'static str,
    pub guidance: &'static str,
    context: fn(&PageSnapshot) -> String,
}

impl FixedItem {
    pub fn context(&self, page: &PageSnapshot) -> String {
        (self.context)(page)
    }
}

impl std::fmt::Debug for FixedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedItem")
            .field("label", &self.label)
            .field("question", &self.question)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum AuditItem {
    Fixed(FixedItem),
    /// Scored locally: field-count heuristic plus manual-review placeholders.
    FormDesign,
    /// One call, up to [`MAX_FEATURES`] findings.
    FeatureExtraction,
    /// One call, one finding per headline dimension.
    HeadlineDimensions,
}

#[derive(Debug, Clone)]
pub struct Section {
    pub category: Category,
    pub items: Vec<AuditItem>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    sections: Vec<Section>,
}

impl Catalog {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of service calls a full run can make with a configured backend.
    pub fn max_service_calls(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.items)
            .filter(|item| !matches!(item, AuditItem::FormDesign))
            .count()
    }

    pub fn standard() -> Self {
        Self::new(vec![
            Section {
                category: ORIENT,
                items: vec![
                    fixed(
                        "Does header explain WHAT the product is?",
                        "Does the header copy explain WHAT the product/service is?",
                        "The H1 should immediately clarify the product category and function. Score 3 if crystal clear, 0 if vague.",
                        |page| {
                            format!(
                                "H1: '{}'\nH2: '{}'\nFirst paragraph: '{}'",
                                page.primary_heading,
                                page.secondary_heading,
                                page.first_hero_paragraph().unwrap_or("None")
                            )
                        },
                    ),
                    fixed(
                        "Does header match ad/SERP expectations?",
                        "Does the header copy match the pre-click ad or SERP copy?",
                        "Check for message match/scent. Title is a proxy for ad copy. Strong overlap = 3, no overlap = 0.",
                        title_and_h1,
                    ),
                    fixed(
                        "Does copy call out WHO it's for?",
                        "Does the copy clearly call out WHO the product/service is for?",
                        "Look for explicit audience targeting like 'for DevOps teams' or 'built for marketers'. Score 3 if specific, 0 if generic.",
                        |page| {
                            format!(
                                "H1: '{}'\nH2: '{}'\nHero: '{}'",
                                page.primary_heading,
                                page.secondary_heading,
                                page.first_hero_paragraph().unwrap_or("")
                            )
                        },
                    ),
                    fixed(
                        "Is there a clear page goal?",
                        "Is there a clear, visually dominant page goal that leads into the funnel?",
                        "Evaluate if there's ONE primary action. Score 3 if clear dominant CTA, 0 if confusing/multiple equal CTAs.",
                        |page| format!("CTAs found: {}", join_or(&page.call_to_actions, ", ", "None")),
                    ),
                ],
            },
            Section {
                category: MOTIVATION,
                items: vec![
                    fixed(
                        "Focus on pain/gain outcomes?",
                        "Does the copy focus on desired outcomes or pain elimination?",
                        "Look for pain (frustrations, risks) and gain (achievements, outcomes) language. Score 3 if strong focus, 0 if product-centric only.",
                        |page| format!("Hero copy:\n{}", hero_text(page)),
                    ),
                    fixed(
                        "Specific and vivid language?",
                        "Are these desires/pain points described specifically and vividly?",
                        "Check for specific, quantified language vs generic ('save time' = bad, 'deploy in 60 seconds' = good). Score 3 if vivid, 0 if generic.",
                        |page| {
                            format!(
                                "Hero copy:\n{}\n\nAll headings: {}",
                                hero_text(page),
                                headings(page, 5, ", ")
                            )
                        },
                    ),
                ],
            },
            Section {
                category: UNIQUE_VALUE,
                items: vec![
                    fixed(
                        "Feature-benefit bridges?",
                        "Does the copy bridge product features to user desires?",
                        "Look for 'so that', 'which means', 'allowing you to' connectors. Score 3 if consistent bridges, 0 if feature-dump.",
                        |page| sample_copy(page, 1000),
                    ),
                    fixed(
                        "Competitive advantages explained?",
                        "Does copy explain advantages over existing solutions?",
                        "Look for competitive differentiation, comparisons, or 'unlike X' language. Score 3 if clear differentiation, 0 if generic.",
                        |page| format!("Headings: {}", headings(page, 10, ", ")),
                    ),
                    fixed(
                        "Claims backed by proof?",
                        "Does copy support claims with objective proof?",
                        "Look for stats, numbers, percentages, case study data. Score 3 if proof-heavy, 0 if unsubstantiated claims.",
                        |page| sample_copy(page, 1000),
                    ),
                    fixed(
                        "Visual demonstrations included?",
                        "Does copy support claims with demonstrations/previews?",
                        "Check if visual demos/screenshots exist. Score 3 if strong visual proof, 0 if text-only.",
                        media_summary,
                    ),
                ],
            },
            Section {
                category: CREDIBILITY,
                items: vec![
                    fixed(
                        "Customer testimonials present?",
                        "Does copy include customer endorsements from target market?",
                        "Check for customer quotes. Score 3 if multiple relevant testimonials, 0 if none.",
                        testimonial_text,
                    ),
                    fixed(
                        "Media endorsements?",
                        "Does copy include high-profile media endorsements?",
                        "Look for 'Featured in', 'As seen on', media logos. Score 3 if strong media presence, 0 if none.",
                        |page| sample_copy(page, 800),
                    ),
                    fixed(
                        "Popularity metrics shown?",
                        "Does copy include impressive popularity metrics?",
                        "Look for '10,000+ users', '5-star rated', large numbers. Score 3 if compelling metrics, 0 if no social proof numbers.",
                        |page| sample_copy(page, 800),
                    ),
                    fixed(
                        "Testimonials verifiable?",
                        "Are testimonials easily verifiable?",
                        "Check for full names, job titles, companies, photos. Score 3 if fully attributed, 0 if anonymous.",
                        testimonial_text,
                    ),
                ],
            },
            Section {
                category: OBJECTIONS,
                items: vec![
                    fixed(
                        "Guarantees/reassurances offered?",
                        "Does copy offer guarantees or reassurances?",
                        "Look for money-back guarantees, free trials, 'cancel anytime', risk reversals. Score 3 if strong guarantees, 0 if none.",
                        |page| sample_copy(page, 1000),
                    ),
                    fixed(
                        "Critical questions addressed?",
                        "Does copy address conversion-critical questions?",
                        "Look for FAQ, 'How it works', answers to pricing/setup/time questions. Score 3 if comprehensive FAQ, 0 if glossed over.",
                        |page| format!("Headings: {}", page.headings.join(", ")),
                    ),
                ],
            },
            Section {
                category: OFFER,
                items: vec![
                    fixed(
                        "CTA focuses on value?",
                        "Does CTA focus on acquiring value vs mechanical action?",
                        "Good: 'Get Your Free Audit', 'Start Testing'. Bad: 'Submit', 'Click Here'. Score 3 if value-focused, 0 if mechanical.",
                        cta_text,
                    ),
                    fixed(
                        "CTA visually dominant?",
                        "Is the CTA the most visually dominant element?",
                        "Score 3 if CTA stands out clearly, 0 if buried/small.",
                        |page| {
                            format!(
                                "{}\nNote: Check visual hierarchy manually if scoring low.",
                                cta_text(page)
                            )
                        },
                    ),
                    fixed(
                        "CTA outcome clear?",
                        "Does CTA make clear what user gets upon converting?",
                        "Should be obvious what happens after clicking. Score 3 if crystal clear, 0 if ambiguous.",
                        cta_text,
                    ),
                    fixed(
                        "Value maximized, cost minimized?",
                        "Does offer maximize value and minimize cost perception?",
                        "Look for 'free', 'no credit card', value stacking, cost anchoring. Score 3 if optimized, 0 if value unclear.",
                        |page| sample_copy(page, 800),
                    ),
                    fixed(
                        "Urgency/scarcity present?",
                        "Does offer include time-sensitive incentives?",
                        "Look for urgency: limited-time, countdown, scarcity. Score 3 if strong urgency, 0 if none.",
                        |page| sample_copy(page, 800),
                    ),
                ],
            },
            Section {
                category: FORM_DESIGN,
                items: vec![AuditItem::FormDesign],
            },
            Section {
                category: EDITING_CLARITY,
                items: vec![
                    fixed(
                        "Offer clarity?",
                        "Is the offer and its purpose stated with maximum clarity?",
                        "Score 3 if the offer is crystal clear within 3 seconds of landing. Score 0 if visitor must search to understand what's being offered.",
                        |page| {
                            format!(
                                "H1: '{}'\nH2: '{}'\nFirst paragraph: '{}'",
                                page.primary_heading,
                                page.secondary_heading,
                                page.first_hero_paragraph().unwrap_or("")
                            )
                        },
                    ),
                    fixed(
                        "Value prop obvious?",
                        "Is the value proposition immediately obvious?",
                        "The main benefit should jump out. Score 3 if value is obvious without reading body copy, 0 if buried.",
                        |page| {
                            format!(
                                "H1: '{}'\nH2: '{}'",
                                page.primary_heading, page.secondary_heading
                            )
                        },
                    ),
                ],
            },
            Section {
                category: EDITING_MESSAGING,
                items: vec![
                    fixed(
                        "Ad scent match?",
                        "Is hero copy consistent with ad/SERP entry points?",
                        "Message match is critical. Score 3 if title/H1 align perfectly (ad scent), 0 if mismatch creates confusion.",
                        title_and_h1,
                    ),
                    fixed(
                        "Reader motivation reflected?",
                        "Does copy reflect reader's motivations and pain points?",
                        "Copy should speak to reader's world, not yours. Score 3 if empathetic and motivation-focused, 0 if company-centric.",
                        |page| format!("Hero copy:\n{}", hero_text(page)),
                    ),
                ],
            },
            Section {
                category: EDITING_PERSUASION,
                items: vec![
                    fixed(
                        "Overwhelming value?",
                        "Does page convey overwhelming value and opportunity?",
                        "Value stacking is key. Score 3 if benefits are abundant and compelling, 0 if value is unclear or weak.",
                        |page| sample_copy(page, 1000),
                    ),
                    fixed(
                        "'So what?' and 'Prove it?' answered?",
                        "Does copy answer 'So what?' and 'Prove it?' for skeptics?",
                        "Every claim needs proof and benefit clarity. Score 3 if skeptic-proof with evidence, 0 if unsubstantiated claims.",
                        |page| sample_copy(page, 1000),
                    ),
                    fixed(
                        "Claims have evidence?",
                        "Are claims substantiated with evidence?",
                        "Look for testimonials, data, case studies. Score 3 if evidence-rich, 0 if claims without proof.",
                        |page| {
                            format!(
                                "{}\nTestimonials: {}",
                                sample_copy(page, 1000),
                                page.testimonials.len()
                            )
                        },
                    ),
                ],
            },
            Section {
                category: EDITING_ENGAGEMENT,
                items: vec![
                    fixed(
                        "Vivid word pictures?",
                        "Have generic descriptions been replaced with vivid 'word pictures'?",
                        "Vivid language creates mental images. Score 3 if copy paints pictures ('deploy in 60 seconds'), 0 if abstract/boring ('fast deployment').",
                        |page| sample_copy(page, 800),
                    ),
                    fixed(
                        "Guides attention to visuals?",
                        "Does copy guide attention to key visual elements?",
                        "Look for directive language like 'notice the screenshot above', 'see how'. Score 3 if copy directs eyes, 0 if disconnected from visuals.",
                        |page| sample_copy(page, 600),
                    ),
                    fixed(
                        "Visuals support message?",
                        "Do imagery and video directly support the copy's message?",
                        "Visuals should enhance, not decorate. Score 3 if visuals prove claims/show product, 0 if generic stock photos.",
                        media_summary,
                    ),
                    fixed(
                        "Authentic details?",
                        "Does content include authentic, memorable details?",
                        "Specificity builds trust. Score 3 if specific names/numbers/stories ('Sarah at TechCorp saved 40 hours'), 0 if generic.",
                        |page| sample_copy(page, 800),
                    ),
                ],
            },
            Section {
                category: EDITING_PRUNING,
                items: vec![
                    fixed(
                        "Non-essential removed?",
                        "Has all non-essential content been removed?",
                        "Every word must earn its place. Score 3 if lean and focused, 0 if bloated with fluff.",
                        |page| {
                            format!(
                                "Found {} paragraphs over 50 words",
                                page.long_paragraph_count()
                            )
                        },
                    ),
                    fixed(
                        "Elements reflect motivation?",
                        "Does every element reflect reader's motivation?",
                        "Each section should address a desire or pain. Score 3 if motivation-centric throughout, 0 if product-centric.",
                        |page| format!("Headings:\n{}", headings(page, 8, "\n")),
                    ),
                    fixed(
                        "Elements clarify value?",
                        "Does every element convey/clarify value?",
                        "Features need benefit bridges. Score 3 if value is clear everywhere, 0 if feature-dumping without benefits.",
                        |page| sample_copy(page, 800),
                    ),
                    fixed(
                        "Elements prove claims?",
                        "Does every element prove a claim?",
                        "Claims need proof. Score 3 if every claim backed by evidence, 0 if unsubstantiated assertions.",
                        |page| sample_copy(page, 800),
                    ),
                    fixed(
                        "Addresses objections?",
                        "Does every element address anxiety/objection?",
                        "Anticipate concerns. Score 3 if objections are pre-answered (FAQ, guarantees), 0 if ignored.",
                        |page| sample_copy(page, 800),
                    ),
                    fixed(
                        "Authentic specificity?",
                        "Does every element add authenticity/specificity?",
                        "Generic kills trust. Score 3 if specific throughout ('1,247 teams', real names), 0 if vague ('many customers').",
                        |page| sample_copy(page, 800),
                    ),
                ],
            },
            Section {
                category: FEATURE_PAIN,
                items: vec![AuditItem::FeatureExtraction],
            },
            Section {
                category: HEADLINE,
                items: vec![AuditItem::HeadlineDimensions],
            },
        ])
    }
}

fn fixed(
    label: &'static str,
    question: &'static str,
    guidance: &'static str,
    context: fn(&PageSnapshot) -> String,
) -> AuditItem {
    AuditItem::Fixed(FixedItem {
        label,
        question,
        guidance,
        context,
    })
}

fn join_or(values: &[String], separator: &str, empty: &str) -> String {
    if values.is_empty() {
        empty.to_string()
    } else {
        values.join(separator)
    }
}

fn headings(page: &PageSnapshot, limit: usize, separator: &str) -> String {
    page.headings
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

fn hero_text(page: &PageSnapshot) -> String {
    page.hero_paragraphs
        .iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

fn sample_copy(page: &PageSnapshot, max_chars: usize) -> String {
    format!("Sample copy:\n{}", page.body_sample(max_chars))
}

fn title_and_h1(page: &PageSnapshot) -> String {
    format!("Page Title: '{}'\nH1: '{}'", page.title, page.primary_heading)
}

fn testimonial_text(page: &PageSnapshot) -> String {
    format!("Testimonials:\n{}", join_or(&page.testimonials, "\n---\n", "None found"))
}

fn cta_text(page: &PageSnapshot) -> String {
    format!("CTAs: {}", join_or(&page.call_to_actions, ", ", "No CTAs found"))
}

fn media_summary(page: &PageSnapshot) -> String {
    let media = page.media_counts();
    format!("Found {} videos, {} images", media.videos, media.images)
}

const FORM_PLACEHOLDERS: [(&str, &str, &str); 8] = [
    (
        "Single-column layout?",
        "Manual visual check required",
        "Use single-column vertical layout for mobile.",
    ),
    (
        "Labels visible (not placeholders)?",
        "Manual check required",
        "Place labels above fields, don't rely on placeholders.",
    ),
    (
        "Input types optimized?",
        "Manual check",
        "Use type='email' for email, type='tel' for phone, etc.",
    ),
    (
        "Error messages clear?",
        "Manual check",
        "Show inline errors: 'Enter a valid email address'.",
    ),
    (
        "Form preserves data on error?",
        "Requires testing",
        "Don't clear form on submit error.",
    ),
    (
        "Trust icons present?",
        "Manual check",
        "Add 'Secure checkout' or SSL badges.",
    ),
    (
        "Help available if issues?",
        "Manual check",
        "Add 'Need help?' link with chat/phone.",
    ),
    (
        "Confidence copy near form?",
        "Manual check",
        "Add testimonial or 'Join 10k users' above form.",
    ),
];

/// Fewer fields convert better: three or fewer is ideal, seven or more fails.
pub fn field_count_score(field_count: usize) -> u8 {
    match field_count {
        0..=3 => 3,
        4..=6 => 1,
        _ => 0,
    }
}

/// Form-design findings. No service calls: the field count is scored here and
/// the remaining checks need a human looking at the rendered form.
pub fn form_design_findings(page: &PageSnapshot) -> Vec<Finding> {
    let Some(form) = page.first_form() else {
        return vec![Finding::new(
            "No form detected",
            0,
            "No forms found on page",
            "N/A",
        )];
    };

    let score = field_count_score(form.field_count);
    let solution = if score == 3 {
        "Keep the form at three fields or fewer."
    } else {
        "Cut the form down to the essential fields; three or fewer converts best."
    };

    let mut findings = vec![Finding::new(
        "Minimum fields?",
        score,
        format!("Form has {} input fields", form.field_count),
        solution,
    )];

    findings.extend(
        FORM_PLACEHOLDERS
            .iter()
            .map(|(question, issue, suggestion)| Finding::new(*question, 0, *issue, *suggestion)),
    );

    findings
}

pub fn feature_extraction_prompt(page: &PageSnapshot) -> String {
    format!(
        r#"Analyze this landing page and extract the product features and associated pain points.

**Page Content:**
Title: {title}
H1: {h1}
H2: {h2}
Hero: {hero}
Headings: {headings}
Sample Copy:
{sample}

**Task:** Identify up to {max} key product features mentioned on this page and their associated pain points.

For each feature, provide:
1. **Feature name** (e.g., "AI-Powered Test Generation")
2. **Is it unique?** (yes/no - does it differentiate from competitors?)
3. **Associated pain point** (what problem does it solve?)
4. **Severity** (1-5: how painful is this problem?)
5. **Frequency** (1-5: how often do users face this?)
6. **Desirable outcome** (what result does the user want?)

Return as JSON:
{{
  "features": [
    {{
      "feature": "Feature name",
      "unique": true/false,
      "pain_point": "Specific pain point",
      "severity": 1-5,
      "frequency": 1-5,
      "outcome": "Desired result"
    }}
  ]
}}

Be specific and base your analysis on actual page content."#,
        title = page.title,
        h1 = page.primary_heading,
        h2 = page.secondary_heading,
        hero = page.first_hero_paragraph().unwrap_or(""),
        headings = headings(page, 10, ", "),
        sample = page.body_sample(2000),
        max = MAX_FEATURES,
    )
}

/// Severity × frequency (each 1–5) floored onto the 0–3 scale.
///
/// A severe but rare pain (5 × 1) floors to 1 and anything under 5 floors to 0.
pub fn feature_score(severity: u32, frequency: u32) -> u8 {
    ((severity * frequency) / 5).min(3) as u8
}

fn rating(raw: f64) -> u32 {
    if raw.is_finite() {
        raw.round().clamp(0.0, 5.0) as u32
    } else {
        0
    }
}

pub fn feature_findings(result: Result<FeatureExtraction, AnalysisError>) -> Vec<Finding> {
    let features = match result {
        Ok(extraction) => extraction.features,
        Err(AnalysisError::MissingCredential) => return vec![api_unavailable()],
        Err(AnalysisError::MalformedResponse(reason)) => {
            return vec![Finding::new(
                "No features extracted",
                0,
                format!("Unable to identify clear product features from page content. {}", reason),
                "Make features more prominent and explicit on the page",
            )]
        }
        Err(err) => {
            return vec![Finding::new(
                "Extraction error",
                0,
                format!("Error: {}", err),
                "Manual feature-pain analysis needed",
            )]
        }
    };

    if features.is_empty() {
        return vec![Finding::new(
            "No features extracted",
            0,
            "Unable to identify clear product features from page content",
            "Make features more prominent and explicit on the page",
        )];
    }

    features
        .into_iter()
        .take(MAX_FEATURES)
        .map(|feature| {
            let severity = rating(feature.severity);
            let frequency = rating(feature.frequency);
            let marker = if feature.unique { " [UNIQUE]" } else { "" };

            Finding::new(
                format!("{}{}", feature.feature, marker),
                feature_score(severity, frequency),
                format!(
                    "Pain: {}. Severity: {}/5, Frequency: {}/5, Total Score: {}",
                    feature.pain_point,
                    severity,
                    frequency,
                    severity * frequency
                ),
                format!("Desired Outcome: {}", feature.outcome),
            )
        })
        .collect()
}

pub fn headline_prompt(page: &PageSnapshot) -> String {
    let dimension_template = HEADLINE_DIMENSIONS
        .iter()
        .map(|name| {
            format!(
                "    {{\n      \"name\": \"{}\",\n      \"score\": 1-10,\n      \"analysis\": \"Why this score\",\n      \"suggestion\": \"Specific rewrite example\"\n    }}",
                name
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"Analyze this landing page's headline and subheadline copy quality.

**H1:** "{h1}"
**H2:** "{h2}"

Evaluate across these 5 dimensions (score each 1-10):

1. **Specificity**: Does it use concrete, specific language vs vague generalities?
   - 10 = Very specific with numbers/details ("Reduce testing time by 50%")
   - 1 = Completely generic ("Better results")

2. **Uniqueness**: Does it differentiate from competitors?
   - 10 = Clearly unique positioning
   - 1 = Could apply to any competitor

3. **Desire**: Does it tap into deep motivations/outcomes?
   - 10 = Connects to core desires (speed, freedom, success)
   - 1 = Feature-focused, no emotional appeal

4. **Clarity**: Is it immediately understandable?
   - 10 = Crystal clear in 3 seconds
   - 1 = Confusing or requires thought

5. **Succinctness**: Is it concise without wasted words?
   - 10 = Every word necessary
   - 1 = Bloated, could cut 50%+

Return JSON:
{{
  "dimensions": [
{dimensions}
  ]
}}"#,
        h1 = page.primary_heading,
        h2 = page.secondary_heading,
        dimensions = dimension_template,
    )
}

pub fn headline_findings(result: Result<HeadlineReview, AnalysisError>) -> Vec<Finding> {
    let dimensions = match result {
        Ok(review) => review.dimensions,
        Err(AnalysisError::MissingCredential) => return vec![api_unavailable()],
        Err(AnalysisError::MalformedResponse(reason)) => {
            return vec![Finding::new(
                "Analysis unavailable",
                0,
                format!("Unable to analyze headline. {}", reason),
                "Manual review needed",
            )]
        }
        Err(err) => {
            return vec![Finding::new(
                "Analysis error",
                0,
                format!("Error: {}", err),
                "Manual headline review needed",
            )]
        }
    };

    if dimensions.is_empty() {
        return vec![Finding::new(
            "Analysis unavailable",
            0,
            "Unable to analyze headline",
            "Manual review needed",
        )];
    }

    dimensions
        .into_iter()
        .map(|dimension| {
            Finding::new(
                dimension.name,
                Scale::TenPoint.normalize(dimension.score),
                dimension.analysis,
                dimension.suggestion,
            )
        })
        .collect()
}

fn api_unavailable() -> Finding {
    Finding::new("API unavailable", 0, "OpenAI API not configured", "N/A")
}
