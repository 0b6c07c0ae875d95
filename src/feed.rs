//! Live video feed toggle.

use serde::Serialize;
use tracing::info;

use crate::dom::{ids, Document, HIDDEN};

const STOP_CLASSES: [&str; 2] = ["bg-red-600", "hover:bg-red-700"];
const START_CLASSES: [&str; 2] = ["bg-green-600", "hover:bg-green-700"];

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedState {
    Running,
    Stopped,
}

/// Feed element wiring: where the live stream and the placeholder live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSources {
    pub live_url: String,
    pub no_signal_url: String,
}

#[derive(Debug, Clone)]
pub struct Feed {
    sources: FeedSources,
    state: FeedState,
}

impl Feed {
    // ---
    /// A feed in the `Running` state. Call [`Feed::start`] to write it to the page.
    pub fn new(sources: FeedSources) -> Self {
        Self {
            sources,
            state: FeedState::Running,
        }
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == FeedState::Running
    }

    pub fn start(&mut self, doc: &mut Document) {
        let feed = doc.element_mut(ids::VIDEO_FEED);
        feed.set_attribute("src", self.sources.live_url.clone());
        feed.remove_class(&["opacity-0"]);
        feed.add_class(&["opacity-100"]);

        let button = doc.element_mut(ids::TOGGLE_FEED_BUTTON);
        button.set_text("Stop Feed");
        button.remove_class(&START_CLASSES);
        button.add_class(&STOP_CLASSES);

        doc.element_mut(ids::NO_SIGNAL_TEXT).add_class(&[HIDDEN]);

        self.state = FeedState::Running;
        info!("Video feed started");
    }

    pub fn stop(&mut self, doc: &mut Document) {
        let feed = doc.element_mut(ids::VIDEO_FEED);
        feed.set_attribute("src", self.sources.no_signal_url.clone());
        feed.remove_class(&["opacity-100"]);
        feed.add_class(&["opacity-0"]);

        let button = doc.element_mut(ids::TOGGLE_FEED_BUTTON);
        button.set_text("Start Feed");
        button.remove_class(&STOP_CLASSES);
        button.add_class(&START_CLASSES);

        doc.element_mut(ids::NO_SIGNAL_TEXT).remove_class(&[HIDDEN]);

        self.state = FeedState::Stopped;
        info!("Video feed stopped");
    }

    pub fn toggle(&mut self, doc: &mut Document) -> FeedState {
        match self.state {
            FeedState::Running => self.stop(doc),
            FeedState::Stopped => self.start(doc),
        }
        self.state
    }
}
