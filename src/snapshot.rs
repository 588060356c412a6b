use crate::util::truncate_chars;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

pub const NO_TITLE: &str = "No Title";
pub const NO_H1: &str = "No H1";
pub const NO_H2: &str = "No H2";

pub const BODY_EXCERPT_CHARS: usize = 5000;
pub const MAX_HERO_PARAGRAPHS: usize = 3;
pub const MIN_HERO_PARAGRAPH_CHARS: usize = 20;
pub const MAX_CALL_TO_ACTIONS: usize = 5;
pub const MAX_HEADINGS: usize = 10;
pub const MAX_TESTIMONIALS: usize = 3;
pub const TESTIMONIAL_CHARS: usize = 200;
pub const LONG_PARAGRAPH_WORDS: usize = 50;

/// Normalized content of one audited page.
///
/// Built once per run and only ever handed out by shared reference. Absent
/// headings are already replaced by their placeholders, so audit items never
/// need their own defaulting. Counts that only a few items care about (media,
/// forms, paragraph length) are derived from the retained markup on demand.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub title: String,
    pub primary_heading: String,
    pub secondary_heading: String,
    pub body_excerpt: String,
    pub hero_paragraphs: Vec<String>,
    pub call_to_actions: Vec<String>,
    pub headings: Vec<String>,
    pub testimonials: Vec<String>,
    markup: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaCounts {
    /// `<video>` plus embedded `<iframe>` players.
    pub videos: usize,
    pub images: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSummary {
    pub field_count: usize,
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

fn cta_class() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)btn|button|cta").expect("static regex is valid"))
}

fn testimonial_class() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)testimon|review|quote").expect("static regex is valid"))
}

fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn class_matches(element: &ElementRef, pattern: &Regex) -> bool {
    element
        .value()
        .attr("class")
        .map_or(false, |class| pattern.is_match(class))
}

fn first_text_or(document: &Html, css: &'static str, placeholder: &str) -> String {
    document
        .select(&selector(css))
        .next()
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}

/// Visible text of the document: every text node outside script/style/noscript,
/// whitespace-normalized and joined by single spaces.
fn visible_text(document: &Html) -> String {
    let mut pieces = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |el| matches!(el.name(), "script" | "style" | "noscript"))
        });
        if hidden {
            continue;
        }

        pieces.extend(text.split_whitespace());
    }

    pieces.join(" ")
}

impl PageSnapshot {
    /// Extract a snapshot from rendered page markup.
    pub fn from_html(markup: &str) -> Self {
        let document = Html::parse_document(markup);

        let body_excerpt = truncate_chars(&visible_text(&document), BODY_EXCERPT_CHARS).to_string();

        let hero_paragraphs = document
            .select(&selector("p"))
            .map(|p| element_text(&p))
            .filter(|text| text.chars().count() > MIN_HERO_PARAGRAPH_CHARS)
            .take(MAX_HERO_PARAGRAPHS)
            .collect();

        let call_to_actions = document
            .select(&selector("a, button"))
            .filter(|el| class_matches(el, cta_class()))
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
            .take(MAX_CALL_TO_ACTIONS)
            .collect();

        let headings = document
            .select(&selector("h1, h2, h3"))
            .map(|h| element_text(&h))
            .take(MAX_HEADINGS)
            .collect();

        let testimonials = document
            .select(&selector("[class]"))
            .filter(|el| class_matches(el, testimonial_class()))
            .map(|el| truncate_chars(&element_text(&el), TESTIMONIAL_CHARS).to_string())
            .take(MAX_TESTIMONIALS)
            .collect();

        Self {
            title: first_text_or(&document, "title", NO_TITLE),
            primary_heading: first_text_or(&document, "h1", NO_H1),
            secondary_heading: first_text_or(&document, "h2", NO_H2),
            body_excerpt,
            hero_paragraphs,
            call_to_actions,
            headings,
            testimonials,
            markup: markup.to_string(),
        }
    }

    fn document(&self) -> Html {
        Html::parse_document(&self.markup)
    }

    pub fn first_hero_paragraph(&self) -> Option<&str> {
        self.hero_paragraphs.first().map(String::as_str)
    }

    /// First `max_chars` characters of the body excerpt.
    pub fn body_sample(&self, max_chars: usize) -> &str {
        truncate_chars(&self.body_excerpt, max_chars)
    }

    pub fn media_counts(&self) -> MediaCounts {
        let document = self.document();
        MediaCounts {
            videos: document.select(&selector("video, iframe")).count(),
            images: document.select(&selector("img")).count(),
        }
    }

    /// Input-field count of the first form on the page, if there is one.
    pub fn first_form(&self) -> Option<FormSummary> {
        let document = self.document();
        let form = document.select(&selector("form")).next()?;
        Some(FormSummary {
            field_count: form.select(&selector("input")).count(),
        })
    }

    pub fn long_paragraph_count(&self) -> usize {
        self.document()
            .select(&selector("p"))
            .filter(|p| {
                p.text()
                    .flat_map(str::split_whitespace)
                    .count()
                    > LONG_PARAGRAPH_WORDS
            })
            .count()
    }
}
