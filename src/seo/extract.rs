//! On-page SEO metadata extraction
//!
//! The document is parsed once; every field lookup tolerates missing
//! elements. String values are trimmed and empty strings become `None`.

use crate::seo::score::{compute_score, ScoreInputs, SeoGrade};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use thiserror::Error;

/// Failure while extracting SEO data
#[derive(Debug, Error)]
pub enum SeoError {
    #[error("Invalid selector '{0}'")]
    Selector(String),
}

/// Open Graph link-preview fields (`<meta property="og:*">`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OpenGraph {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
}

/// Twitter Card fields (`<meta name="twitter:*">`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TwitterCard {
    #[serde(rename = "card")]
    pub card_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// SEO metadata and score of one HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeoReport {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub canonical: Option<String>,
    pub robots: Option<String>,
    pub h1_tags: Vec<String>,
    pub images_without_alt: usize,
    pub total_images: usize,
    pub score: u8,
    pub grade: SeoGrade,
}

impl SeoReport {
    /// An all-empty report: score 0, grade F
    pub fn empty() -> Self {
        Self::default()
    }

    fn score_inputs(&self) -> ScoreInputs<'_> {
        ScoreInputs {
            title: self.title.as_deref(),
            description: self.description.as_deref(),
            h1_count: self.h1_tags.len(),
            has_canonical: self.canonical.is_some(),
            has_og_title: self.open_graph.title.is_some(),
            has_og_description: self.open_graph.description.is_some(),
            has_twitter_card: self.twitter.card_type.is_some(),
            total_images: self.total_images,
            images_without_alt: self.images_without_alt,
        }
    }
}

/// Extracts SEO metadata from HTML, never failing
///
/// Any extraction failure yields `SeoReport::empty()`.
///
/// # Example
///
/// ```
/// use sumi_scope::seo::extract_seo;
///
/// let report = extract_seo("<html><head><title>Hello</title></head></html>");
/// assert_eq!(report.title.as_deref(), Some("Hello"));
/// assert_eq!(report.score, 10);
/// ```
pub fn extract_seo(html: &str) -> SeoReport {
    match try_extract_seo(html) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!("SEO extraction failed: {}", e);
            SeoReport::empty()
        }
    }
}

/// Extracts SEO metadata from HTML and scores it
///
/// # Returns
///
/// * `Ok(SeoReport)` - Extracted fields with score and grade
/// * `Err(SeoError)` - A selector could not be built
pub fn try_extract_seo(html: &str) -> Result<SeoReport, SeoError> {
    let document = Html::parse_document(html);
    let metas = MetaIndex::new(&document)?;

    let description = metas
        .find("name", "description", true)
        .or_else(|| metas.find("property", "og:description", true))
        .and_then(content_of);

    let open_graph = OpenGraph {
        title: metas.content("property", "og:title"),
        description: metas.content("property", "og:description"),
        image: metas.content("property", "og:image"),
        url: metas.content("property", "og:url"),
    };

    let twitter = TwitterCard {
        card_type: metas.content("name", "twitter:card"),
        title: metas.content("name", "twitter:title"),
        description: metas.content("name", "twitter:description"),
        image: metas.content("name", "twitter:image"),
    };

    let (total_images, images_without_alt) = image_stats(&document)?;

    let mut report = SeoReport {
        title: extract_title(&document)?,
        description,
        keywords: metas
            .find("name", "keywords", true)
            .and_then(content_of),
        open_graph,
        twitter,
        canonical: extract_canonical(&document)?,
        robots: metas.content("name", "robots"),
        h1_tags: extract_h1_tags(&document)?,
        images_without_alt,
        total_images,
        score: 0,
        grade: SeoGrade::F,
    };

    report.score = compute_score(&report.score_inputs());
    report.grade = SeoGrade::from_score(report.score);

    Ok(report)
}

fn selector(css: &str) -> Result<Selector, SeoError> {
    Selector::parse(css).map_err(|_| SeoError::Selector(css.to_string()))
}

/// Trims a value, mapping empty strings to None
fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn content_of(element: ElementRef<'_>) -> Option<String> {
    element.value().attr("content").and_then(non_empty)
}

/// All `<meta>` elements of a document, searched in document order
struct MetaIndex<'a> {
    elements: Vec<ElementRef<'a>>,
}

impl<'a> MetaIndex<'a> {
    fn new(document: &'a Html) -> Result<Self, SeoError> {
        let meta = selector("meta")?;
        Ok(Self {
            elements: document.select(&meta).collect(),
        })
    }

    /// First meta element whose `attr` equals `key`
    fn find(&self, attr: &str, key: &str, ignore_case: bool) -> Option<ElementRef<'a>> {
        self.elements.iter().copied().find(|element| {
            element.value().attr(attr).is_some_and(|value| {
                if ignore_case {
                    value.eq_ignore_ascii_case(key)
                } else {
                    value == key
                }
            })
        })
    }

    /// Content of the first meta element with an exact (case-sensitive) key
    fn content(&self, attr: &str, key: &str) -> Option<String> {
        self.find(attr, key, false).and_then(content_of)
    }
}

fn extract_title(document: &Html) -> Result<Option<String>, SeoError> {
    let title = selector("title")?;
    Ok(document
        .select(&title)
        .next()
        .and_then(|element| non_empty(&element.text().collect::<String>())))
}

fn extract_canonical(document: &Html) -> Result<Option<String>, SeoError> {
    let link = selector("link[rel][href]")?;
    Ok(document
        .select(&link)
        .find(|element| {
            element
                .value()
                .attr("rel")
                .is_some_and(|rel| rel.split_whitespace().any(|t| t.eq_ignore_ascii_case("canonical")))
        })
        .and_then(|element| element.value().attr("href"))
        .and_then(non_empty))
}

fn extract_h1_tags(document: &Html) -> Result<Vec<String>, SeoError> {
    let h1 = selector("h1")?;
    Ok(document
        .select(&h1)
        .filter_map(|element| non_empty(&element.text().collect::<String>()))
        .collect())
}

/// Returns (total images, images without an alt attribute)
fn image_stats(document: &Html) -> Result<(usize, usize), SeoError> {
    let img = selector("img")?;
    let mut total = 0;
    let mut without_alt = 0;
    for element in document.select(&img) {
        total += 1;
        if element.value().attr("alt").is_none() {
            without_alt += 1;
        }
    }
    Ok((total, without_alt))
}
