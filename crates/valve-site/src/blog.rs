//! Blog posts and their SEO metadata.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use valve_catalog::repository::parse_listing;
use valve_catalog::slug::slugify;
use valve_catalog::PostId;

use crate::error::SiteResult;
use crate::html::{strip_tags, truncate_chars};

pub const SEO_TITLE_MAX: usize = 70;
pub const SEO_DESCRIPTION_MAX: usize = 160;

/// A blog post as served by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "blank_string")]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "blank_string")]
    pub cover_image: Option<String>,
    /// Absolute cover URL, when the API resolves one.
    #[serde(default, deserialize_with = "blank_string", skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default, rename = "category_name", deserialize_with = "blank_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "blank_string")]
    pub meta_title: Option<String>,
    #[serde(default, deserialize_with = "blank_string")]
    pub meta_description: Option<String>,
    #[serde(default, deserialize_with = "keywords")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "blank_string")]
    pub focus_keyword: Option<String>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_published: bool,
    /// Legacy publication flag still sent by older admin clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl BlogPost {
    pub fn new(id: impl Into<PostId>, title: impl Into<String>) -> Self {
        let mut post = Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        };
        post.ensure_slug();
        post
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn publish_at(mut self, at: DateTime<Utc>) -> Self {
        self.is_published = true;
        self.published_at = Some(at);
        self
    }

    /// Title for `<title>`, preferring the meta title.
    pub fn seo_title(&self) -> String {
        let title = self
            .meta_title
            .as_deref()
            .unwrap_or(self.title.as_str())
            .trim();
        truncate_chars(title, SEO_TITLE_MAX)
    }

    /// Meta description: meta field, then excerpt, then the content's text.
    pub fn seo_description(&self) -> String {
        let text = match self.meta_description.as_deref().or(self.excerpt.as_deref()) {
            Some(text) => strip_tags(text),
            None => strip_tags(&self.content),
        };
        truncate_chars(&text, SEO_DESCRIPTION_MAX)
    }

    /// Keywords with the focus keyword first, without duplicates.
    pub fn keyword_list(&self) -> Vec<String> {
        let mut list: Vec<String> = Vec::new();
        for keyword in self.focus_keyword.iter().chain(self.keywords.iter()) {
            let keyword = keyword.trim();
            if !keyword.is_empty() && !list.iter().any(|k| k.eq_ignore_ascii_case(keyword)) {
                list.push(keyword.to_string());
            }
        }
        list
    }

    /// Derive the slug from the title when it is blank.
    pub fn ensure_slug(&mut self) {
        if self.slug.trim().is_empty() {
            self.slug = slugify(&self.title);
        }
    }

    /// Cover image, preferring the resolved URL.
    pub fn cover(&self) -> Option<&str> {
        self.cover_image_url.as_deref().or(self.cover_image.as_deref())
    }

    /// Published and not scheduled for later.
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        let published = self.is_published || self.published == Some(true);
        published && self.published_at.map_or(true, |at| at <= now)
    }

    /// Date used for ordering: publication, else creation.
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        self.published_at.or(self.created_at)
    }

    /// Date shown as `lastmod`: last update, else the effective date.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or_else(|| self.effective_date())
    }
}

/// Visible posts, newest first.
pub fn published_posts(posts: &[BlogPost], now: DateTime<Utc>) -> Vec<&BlogPost> {
    let mut visible: Vec<&BlogPost> = posts.iter().filter(|p| p.is_visible(now)).collect();
    visible.sort_by(|a, b| b.effective_date().cmp(&a.effective_date()));
    visible
}

/// Parse a post listing: a bare array or a paginated `results` envelope.
pub fn parse_posts(json: &str) -> SiteResult<Vec<BlogPost>> {
    let mut posts: Vec<BlogPost> = parse_listing(json)?;
    for post in &mut posts {
        post.ensure_slug();
    }
    Ok(posts)
}

fn blank_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKeywords {
    List(Vec<String>),
    Text(String),
}

/// Keywords arrive as a list or a comma-separated string.
fn keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawKeywords> = Option::deserialize(deserializer)?;
    let list = match raw {
        Some(RawKeywords::List(list)) => list,
        Some(RawKeywords::Text(text)) => text.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    };
    Ok(list
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect())
}

/// RFC 3339 timestamp or plain `YYYY-MM-DD`; blank means absent.
fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let raw = match raw.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(None),
    };
    parse_timestamp(raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_api_post() {
        let json = r#"{
            "results": [{
                "id": 7,
                "title": "Como escolher a válvula certa",
                "slug": "",
                "content": "<p>Texto</p>",
                "excerpt": "",
                "cover_image": "blog/capa.jpg",
                "cover_image_url": "/media/blog/capa.jpg",
                "category": 3,
                "category_name": "Manutenção",
                "keywords": "válvulas, inox, ,esfera",
                "is_published": true,
                "published": true,
                "published_at": "2024-03-10T09:30:00.123456-03:00",
                "created_at": "2024-03-01",
                "updated_at": null
            }],
            "count": 1
        }"#;
        let posts = parse_posts(json).unwrap();
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.id.as_str(), "7");
        assert_eq!(post.slug, "como-escolher-a-valvula-certa");
        assert_eq!(post.excerpt, None);
        assert_eq!(post.cover(), Some("/media/blog/capa.jpg"));
        assert_eq!(post.category.as_deref(), Some("Manutenção"));
        assert_eq!(post.keywords, vec!["válvulas", "inox", "esfera"]);
        assert_eq!(
            post.published_at.map(|d| d.to_rfc3339()),
            Some("2024-03-10T12:30:00.123456+00:00".to_string())
        );
        assert_eq!(post.last_modified(), post.published_at);
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        assert!(parse_posts(r#"[{"id": 1, "title": "x", "created_at": "yesterday"}]"#).is_err());
    }

    #[test]
    fn test_seo_fallbacks() {
        let mut post = BlogPost::new("1", "Título").with_content("<h1>Intro</h1><p>Corpo do texto.</p>");
        assert_eq!(post.seo_title(), "Título");
        assert_eq!(post.seo_description(), "Intro Corpo do texto.");

        post.excerpt = Some("Resumo".to_string());
        assert_eq!(post.seo_description(), "Resumo");

        post.meta_description = Some("x".repeat(200));
        let description = post.seo_description();
        assert_eq!(description.chars().count(), SEO_DESCRIPTION_MAX);
        assert!(description.ends_with('…'));

        post.meta_title = Some("Meta".to_string());
        assert_eq!(post.seo_title(), "Meta");
    }

    #[test]
    fn test_keyword_list() {
        let mut post = BlogPost::new("1", "t");
        post.keywords = vec!["inox".to_string(), "Esfera".to_string()];
        post.focus_keyword = Some("esfera".to_string());
        assert_eq!(post.keyword_list(), vec!["esfera", "inox"]);
    }

    #[test]
    fn test_published_posts_order_and_visibility() {
        let now = at(2024, 6, 1);
        let old = BlogPost::new("1", "Old").publish_at(at(2024, 1, 1));
        let new = BlogPost::new("2", "New").publish_at(at(2024, 5, 1));
        let scheduled = BlogPost::new("3", "Later").publish_at(at(2024, 7, 1));
        let draft = BlogPost::new("4", "Draft");

        let posts = vec![old, new, scheduled, draft];
        let visible: Vec<&str> = published_posts(&posts, now)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(visible, vec!["New", "Old"]);
    }
}
