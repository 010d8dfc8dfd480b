//! Boilerplate-stripping extraction from raw markup.
//!
//! Uses scraper for HTML parsing. The body and the title are read in two
//! independent passes so either one may succeed without the other.

use super::MarkupExtractor;
use lazy_static::lazy_static;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};

/// Tags whose contents never belong to an article body
const BOILERPLATE_TAGS: &[&str] = &[
    "nav", "header", "footer", "aside", "script", "style", "noscript", "template", "iframe",
    "svg", "button",
];

/// Class or id tokens marking navigation, widgets and other page chrome
const BOILERPLATE_HINTS: &[&str] = &[
    "nav", "navbar", "menu", "sidebar", "footer", "breadcrumb", "breadcrumbs", "comment",
    "comments", "advert", "ad", "ads", "share", "social", "cookie", "newsletter", "subscribe",
    "promo", "related",
];

/// Tags collected as text blocks
const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre",
];

/// Likely article containers, most specific first
const CONTAINER_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    "[itemprop='articleBody']",
    ".entry-content",
    ".post-content",
    ".article-body",
    "#content",
    ".content",
];

const TITLE_META_SELECTORS: &[&str] = &[
    "meta[property='og:title']",
    "meta[name='twitter:title']",
    "meta[name='title']",
];

lazy_static! {
    static ref BLOCK_SELECTOR: Selector =
        Selector::parse("p, h1, h2, h3, h4, h5, h6, li, blockquote, pre").expect("block selector");
    static ref CONTAINERS: Vec<Selector> = CONTAINER_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("container selector"))
        .collect();
    static ref TITLE_METAS: Vec<Selector> = TITLE_META_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("meta selector"))
        .collect();
    static ref TITLE_SELECTOR: Selector = Selector::parse("title").expect("title selector");
    static ref H1_SELECTOR: Selector = Selector::parse("h1").expect("h1 selector");
}

/// Primary strategy: container detection plus boilerplate filtering
#[derive(Debug, Clone)]
pub struct BoilerplateExtractor {
    min_block_chars: usize,
}

impl BoilerplateExtractor {
    pub fn new(min_block_chars: usize) -> Self {
        Self { min_block_chars }
    }
}

impl Default for BoilerplateExtractor {
    fn default() -> Self {
        Self::new(20)
    }
}

impl MarkupExtractor for BoilerplateExtractor {
    fn extract_text(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);

        for selector in CONTAINERS.iter() {
            if let Some(container) = document.select(selector).next() {
                let blocks = collect_blocks(container, self.min_block_chars);
                if !blocks.is_empty() {
                    return Some(blocks.join("\n\n"));
                }
            }
        }

        // Fall back to the whole document, still excluding chrome
        let blocks = collect_blocks(document.root_element(), self.min_block_chars);
        (!blocks.is_empty()).then(|| blocks.join("\n\n"))
    }

    fn extract_title(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);

        let from_meta = TITLE_METAS.iter().find_map(|selector| {
            document
                .select(selector)
                .filter_map(|meta| meta.value().attr("content"))
                .map(collapse_whitespace)
                .find(|title| !title.is_empty())
        });

        from_meta
            .or_else(|| first_text(&document, &TITLE_SELECTOR))
            .or_else(|| first_text(&document, &H1_SELECTOR))
    }
}

/// Text of the first non-empty element matching `selector`
fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

/// Collect outermost text blocks under `root`, skipping page chrome.
///
/// Only elements between a block and `root` are checked for chrome. Inside a
/// detected container a `<header>` holds the headline and is kept.
/// Headings are always kept; other blocks need at least `min_chars` characters.
fn collect_blocks(root: ElementRef<'_>, min_chars: usize) -> Vec<String> {
    let keep_headers = root.value().name() != "html";
    root.select(&BLOCK_SELECTOR)
        .filter(|block| {
            !nested_in_block(block, root) && !in_boilerplate(block, root, keep_headers)
        })
        .filter_map(|block| {
            let text = element_text(block);
            let heading = is_heading(block.value().name());
            let long_enough = text.chars().count() >= min_chars;
            (!text.is_empty() && (heading || long_enough)).then_some(text)
        })
        .collect()
}

/// True if the element or any ancestor below `root` is page chrome
fn in_boilerplate(element: &ElementRef<'_>, root: ElementRef<'_>, keep_headers: bool) -> bool {
    let below_root = element
        .ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(|node| node.value().as_element());

    std::iter::once(element.value())
        .chain(below_root)
        .filter(|el| !(keep_headers && el.name() == "header"))
        .any(is_boilerplate)
}

/// Concatenated text of an element with whitespace collapsed
fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn nested_in_block(block: &ElementRef<'_>, root: ElementRef<'_>) -> bool {
    block
        .ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(|node| node.value().as_element())
        .any(|el| BLOCK_TAGS.contains(&el.name()))
}

fn is_boilerplate(element: &Element) -> bool {
    let name = element.name();
    if BOILERPLATE_TAGS.contains(&name) {
        return true;
    }
    // Page-level wrappers often carry layout classes like "has-sidebar"
    if matches!(name, "html" | "body" | "main" | "article") {
        return false;
    }
    if matches!(
        element.attr("role"),
        Some("navigation" | "banner" | "contentinfo" | "complementary")
    ) {
        return true;
    }

    let class_tokens = element.attr("class").unwrap_or_default().split_whitespace();
    element.id().into_iter().chain(class_tokens).any(is_hint_token)
}

fn is_hint_token(token: &str) -> bool {
    let token = token.to_ascii_lowercase();
    BOILERPLATE_HINTS.iter().any(|hint| {
        token == *hint
            || token
                .strip_prefix(hint)
                .is_some_and(|rest| rest.starts_with('-') || rest.starts_with('_'))
    })
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}
