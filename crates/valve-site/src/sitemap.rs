//! sitemaps.org XML generation.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use valve_catalog::catalog::Category;

use crate::blog::BlogPost;
use crate::html::escape_html;

/// Public pages that are always listed.
pub const STATIC_PAGES: &[&str] = &["", "/produtos", "/sobre", "/contato", "/blog"];

/// How often a page is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        }
    }
}

/// One `<url>` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

/// Collects site URLs and renders the sitemap.
#[derive(Debug, Clone)]
pub struct SitemapBuilder {
    site_url: String,
    today: NaiveDate,
    urls: Vec<SitemapUrl>,
    seen: HashSet<String>,
}

impl SitemapBuilder {
    /// Builder with the static pages already listed.
    pub fn new(site_url: impl Into<String>, today: NaiveDate) -> Self {
        let site_url = site_url.into().trim_end_matches('/').to_string();
        let mut builder = Self {
            site_url,
            today,
            urls: Vec::new(),
            seen: HashSet::new(),
        };
        for page in STATIC_PAGES {
            let priority = if page.is_empty() { 1.0 } else { 0.8 };
            builder.push(page, today, ChangeFreq::Weekly, priority);
        }
        builder
    }

    /// Add a URL by site-relative path. Returns `false` for a duplicate.
    pub fn push(&mut self, path: &str, lastmod: NaiveDate, changefreq: ChangeFreq, priority: f32) -> bool {
        let loc = format!("{}{}", self.site_url, path);
        if !self.seen.insert(loc.clone()) {
            return false;
        }
        self.urls.push(SitemapUrl {
            loc,
            lastmod,
            changefreq,
            priority,
        });
        true
    }

    /// Add each active category and its active products.
    pub fn with_catalog(mut self, categories: &[Category]) -> Self {
        for category in categories.iter().filter(|c| c.is_active) {
            let today = self.today;
            self.push(
                &format!("/produtos/{}", category.slug),
                today,
                ChangeFreq::Monthly,
                0.7,
            );
            for product in category.active_products() {
                self.push(
                    &format!("/produtos/{}/{}", category.slug, product.slug),
                    today,
                    ChangeFreq::Monthly,
                    0.6,
                );
            }
        }
        self
    }

    /// Add the given posts; callers pass only published ones.
    pub fn with_posts<'a>(mut self, posts: impl IntoIterator<Item = &'a BlogPost>) -> Self {
        for post in posts {
            let lastmod = post
                .last_modified()
                .map(|d| d.date_naive())
                .unwrap_or(self.today);
            self.push(&format!("/blog/{}", post.slug), lastmod, ChangeFreq::Monthly, 0.6);
        }
        self
    }

    pub fn urls(&self) -> &[SitemapUrl] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Render the `<urlset>` document.
    pub fn render(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for url in &self.urls {
            xml.push_str(&format!(
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
                escape_html(&url.loc),
                url.lastmod.format("%Y-%m-%d"),
                url.changefreq.as_str(),
                url.priority,
            ));
        }
        xml.push_str("</urlset>\n");
        xml
    }
}
