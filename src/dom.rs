//! In-memory mirror of the dashboard page.
//!
//! Elements are addressed by the same identifiers the page template uses, so
//! the controller writes text, markup, classes and attributes exactly as a
//! script would against the live DOM. The page renderer reads them back.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Element identifiers the page must provide.
pub mod ids {
    pub const ACTIVE_DETECTIONS: &str = "active-detections";
    pub const LAST_DETECTION_TIME: &str = "last-detection-time";
    pub const TOTAL_DETECTIONS_DASH: &str = "total-detections-dash";
    pub const RECENT_ALERTS_CONTAINER: &str = "recent-alerts-container";
    pub const AVG_ACCURACY: &str = "avg-accuracy";
    pub const ALERTS_SENT: &str = "alerts-sent";
    pub const ALL_DETECTIONS_TABLE: &str = "all-detections-table";
    pub const VIDEO_FEED: &str = "videoFeed";
    pub const TOGGLE_FEED_BUTTON: &str = "toggleFeedButton";
    pub const NO_SIGNAL_TEXT: &str = "noSignalText";
}

pub const HIDDEN: &str = "hidden";

// ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Markup between the element's tags. Always safe to emit verbatim.
    pub inner_html: String,
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    // ---
    /// Replace the content with `text`, escaped.
    pub fn set_text(&mut self, text: impl AsRef<str>) {
        self.inner_html = escape_html(text.as_ref());
    }

    pub fn set_html(&mut self, html: impl Into<String>) {
        self.inner_html = html.into();
    }

    pub fn add_class(&mut self, classes: &[&str]) {
        self.classes.extend(classes.iter().map(|c| c.to_string()));
    }

    pub fn remove_class(&mut self, classes: &[&str]) {
        for class in classes {
            self.classes.remove(*class);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// ` class="..."` followed by the attributes, escaped, for an opening tag.
    pub fn render_attributes(&self) -> String {
        let mut out = String::new();
        if !self.classes.is_empty() {
            let classes: Vec<&str> = self.classes.iter().map(String::as_str).collect();
            out.push_str(&format!(r#" class="{}""#, escape_html(&classes.join(" "))));
        }
        for (name, value) in &self.attributes {
            out.push_str(&format!(r#" {}="{}""#, name, escape_html(value)));
        }
        out
    }
}

/// All addressable elements of the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document {
    elements: BTreeMap<String, Element>,
}

impl Document {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Mutable handle on `id`, created empty on first access.
    pub fn element_mut(&mut self, id: &str) -> &mut Element {
        self.elements.entry(id.to_string()).or_default()
    }

    /// Content of `id`, empty when the element was never written.
    pub fn inner_html(&self, id: &str) -> &str {
        self.get(id).map_or("", |e| e.inner_html.as_str())
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.get(id).is_some_and(|e| e.has_class(class))
    }

    /// Opening-tag attributes for `id`, including the `id` itself.
    pub fn attributes_of(&self, id: &str) -> String {
        let rest = self.get(id).map(Element::render_attributes).unwrap_or_default();
        format!(r#"id="{}"{}"#, escape_html(id), rest)
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
