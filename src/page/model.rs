//! Read-only typed view over a published page document.
//!
//! Every accessor is total: an absent key, a `null`, or a missing subtree
//! reads as the empty string.

use std::borrow::Cow;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{Map, Value};

/// Untyped page data as published by the CMS.
pub type PageDocument = Map<String, Value>;

/// How a page was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    /// Normal site visitor; the page carries its published content.
    #[default]
    Display,
    /// Opened from the CMS editor. Holds the launcher script tag, which is
    /// empty when the editor origin was not allowed.
    Editor(String),
}

/// A CMS page loaded from a JSON/Standalone data file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    data: PageDocument,
    mode: Mode,
}

impl Page {
    /// Wrap parsed page JSON. Anything other than an object is treated as `{}`.
    pub fn new(json: Value) -> Self {
        match json {
            Value::Object(data) => Self {
                data,
                mode: Mode::Display,
            },
            _ => Self::empty(),
        }
    }

    /// A page with no content.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Page opened from the CMS editor: no content, only the script tag that
    /// loads the in-page editor.
    pub fn editor(script: impl Into<String>) -> Self {
        Self {
            data: PageDocument::new(),
            mode: Mode::Editor(script.into()),
        }
    }

    /// Standard SEO fields, e.g. `page.seo().title()`.
    pub fn seo(&self) -> Seo<'_> {
        Seo {
            data: subtree(&self.data, "seo"),
        }
    }

    /// Content areas, e.g. `page.content().get("body")`.
    pub fn content(&self) -> Slots<'_> {
        Slots {
            data: subtree(&self.data, "content"),
        }
    }

    /// Page specific properties, e.g. `page.properties().get("containerClass")`.
    pub fn properties(&self) -> Slots<'_> {
        Slots {
            data: subtree(&self.data, "properties"),
        }
    }

    /// Custom CSS for a `<style>` tag.
    pub fn css(&self) -> Cow<'_, str> {
        text(self.data.get("css"))
    }

    /// Custom script for a `<script>` tag.
    pub fn js(&self) -> Cow<'_, str> {
        text(self.data.get("js"))
    }

    /// Custom code for the `<head>` tag.
    pub fn header(&self) -> Cow<'_, str> {
        text(self.data.get("header"))
    }

    /// Custom code for the page footer.
    pub fn footer(&self) -> Cow<'_, str> {
        text(self.data.get("footer"))
    }

    /// Page title, e.g. the `<h1>`. See [`Seo::title`] for `<title>`.
    pub fn title(&self) -> Cow<'_, str> {
        text(self.data.get("title"))
    }

    /// Script tag loading the in-page editor; empty outside editor mode.
    pub fn editor_script(&self) -> &str {
        match &self.mode {
            Mode::Editor(script) => script,
            Mode::Display => "",
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_editor(&self) -> bool {
        matches!(self.mode, Mode::Editor(_))
    }
}

/// SEO subtree of a page.
#[derive(Debug, Clone, Copy)]
pub struct Seo<'a> {
    data: Option<&'a PageDocument>,
}

impl<'a> Seo<'a> {
    /// `<head><title>` value.
    pub fn title(&self) -> Cow<'a, str> {
        self.field("title")
    }

    /// `<meta name="keywords">` value.
    pub fn keywords(&self) -> Cow<'a, str> {
        self.field("keywords")
    }

    /// `<meta name="description">` value.
    pub fn metadesc(&self) -> Cow<'a, str> {
        self.field("metadesc")
    }

    /// `<link rel="canonical">` value.
    pub fn canonical_url(&self) -> Cow<'a, str> {
        self.field("canonical_url")
    }

    fn field(&self, key: &str) -> Cow<'a, str> {
        text(self.data.and_then(|data| data.get(key)))
    }
}

/// Open-ended named slots: content areas or page properties.
///
/// Keys are whatever the published JSON holds; unknown keys read as `''`.
#[derive(Debug, Clone, Copy)]
pub struct Slots<'a> {
    data: Option<&'a PageDocument>,
}

impl<'a> Slots<'a> {
    pub fn get(&self, key: &str) -> Cow<'a, str> {
        text(self.data.and_then(|data| data.get(key)))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.is_some_and(|data| data.contains_key(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.data
            .into_iter()
            .flat_map(|data| data.keys().map(String::as_str))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Cow<'a, str>)> {
        self.data
            .into_iter()
            .flat_map(|data| data.iter().map(|(k, v)| (k.as_str(), text(Some(v)))))
    }

    pub fn is_empty(&self) -> bool {
        self.data.map_or(true, Map::is_empty)
    }
}

fn subtree<'a>(data: &'a PageDocument, key: &str) -> Option<&'a PageDocument> {
    data.get(key).and_then(Value::as_object)
}

/// Render a JSON value as slot text.
fn text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

impl Serialize for Page {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut page = serializer.serialize_struct("Page", 10)?;
        page.serialize_field("editor", &self.is_editor())?;
        page.serialize_field("title", &self.title())?;
        page.serialize_field("css", &self.css())?;
        page.serialize_field("js", &self.js())?;
        page.serialize_field("header", &self.header())?;
        page.serialize_field("footer", &self.footer())?;
        page.serialize_field("editor_script", self.editor_script())?;
        page.serialize_field("seo", &self.seo())?;
        page.serialize_field("content", &self.content())?;
        page.serialize_field("properties", &self.properties())?;
        page.end()
    }
}

impl Serialize for Seo<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seo = serializer.serialize_struct("Seo", 4)?;
        seo.serialize_field("title", &self.title())?;
        seo.serialize_field("keywords", &self.keywords())?;
        seo.serialize_field("metadesc", &self.metadesc())?;
        seo.serialize_field("canonical_url", &self.canonical_url())?;
        seo.end()
    }
}

impl Serialize for Slots<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
