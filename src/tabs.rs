//! Tab switching between the dashboard panes.

use thiserror::Error;

use crate::dom::{Document, HIDDEN};

pub const DASHBOARD_TAB: &str = "dashboard";
pub const ANALYTICS_TAB: &str = "analytics";

/// Tabs in display order. The first one is shown at start-up.
pub const TABS: [&str; 2] = [DASHBOARD_TAB, ANALYTICS_TAB];

const ACTIVE: &str = "active";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown tab: {0}")]
pub struct UnknownTab(pub String);

// ---

/// Identifier of the tab control for `tab`.
pub fn tab_id(tab: &str) -> String {
    format!("tab-{tab}")
}

/// Identifier of the content pane for `tab`.
pub fn pane_id(tab: &str) -> String {
    format!("{tab}-content")
}

pub fn is_visible(doc: &Document, tab: &str) -> bool {
    !doc.has_class(&pane_id(tab), HIDDEN)
}

/// Mark `tab` active and show only its pane.
pub fn activate(doc: &mut Document, tab: &str) -> Result<(), UnknownTab> {
    // ---
    if !TABS.contains(&tab) {
        return Err(UnknownTab(tab.to_string()));
    }
    for name in TABS {
        let control = doc.element_mut(&tab_id(name));
        let pane_hidden = name != tab;
        if pane_hidden {
            control.remove_class(&[ACTIVE]);
        } else {
            control.add_class(&[ACTIVE]);
        }
        let pane = doc.element_mut(&pane_id(name));
        if pane_hidden {
            pane.add_class(&[HIDDEN]);
        } else {
            pane.remove_class(&[HIDDEN]);
        }
    }
    Ok(())
}
