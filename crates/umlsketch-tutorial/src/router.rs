//! Section navigation within one tutorial page
//!
//! The router is an explicit value owned by whoever drives the page; there
//! is no process-wide "current page". It tracks which section is active and
//! the history of visited sections so "back" works.

use crate::error::{Result, TutorialError};

/// Where a navigation control leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    /// Another tutorial page
    Page(String),
    /// A section of the current page
    Section(String),
}

impl NavTarget {
    /// Classify a control from its `href` and `data-section` attributes
    ///
    /// Links to `.html` files leave the page; anything else with a section
    /// id stays on it.
    pub fn classify(href: Option<&str>, section: Option<&str>) -> Option<Self> {
        if let Some(href) = href {
            if href.contains(".html") {
                return Some(Self::Page(href.to_string()));
            }
        }
        section
            .filter(|s| !s.is_empty())
            .map(|s| Self::Section(s.to_string()))
    }
}

/// Active-section state of one page
#[derive(Debug, Clone)]
pub struct Router {
    sections: Vec<String>,
    history: Vec<String>,
}

impl Router {
    /// Create a router; the first section starts active
    pub fn new<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sections: Vec<String> = sections.into_iter().map(Into::into).collect();
        let history = sections.first().cloned().into_iter().collect();
        Self { sections, history }
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// Currently active section
    pub fn active(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    /// URL fragment of the active section, e.g. `#basics`
    pub fn fragment(&self) -> Option<String> {
        self.active().map(|s| format!("#{}", s))
    }

    pub fn contains(&self, section: &str) -> bool {
        self.sections.iter().any(|s| s == section)
    }

    /// Activate `section` and record it in history
    pub fn navigate(&mut self, section: &str) -> Result<&str> {
        if !self.contains(section) {
            return Err(TutorialError::UnknownSection(section.to_string()));
        }
        if self.active() != Some(section) {
            log::debug!("Navigating to section {}", section);
            self.history.push(section.to_string());
        }
        Ok(self.active().unwrap_or_default())
    }

    /// Return to the previously active section
    ///
    /// Returns the newly active section, or `None` when there is nothing to
    /// go back to (state is left unchanged).
    pub fn back(&mut self) -> Option<&str> {
        if self.history.len() < 2 {
            return None;
        }
        self.history.pop();
        self.active()
    }

    /// Activate the section named by a URL hash, if it exists
    ///
    /// Used when a page is loaded with `#section`. Does not add a history
    /// entry beyond replacing the initial one.
    pub fn restore_from_fragment(&mut self, fragment: &str) -> bool {
        let id = fragment.trim_start_matches('#');
        if id.is_empty() || !self.contains(id) {
            return false;
        }
        self.history.clear();
        self.history.push(id.to_string());
        true
    }
}
