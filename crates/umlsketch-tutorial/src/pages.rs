//! Tutorial page table
//!
//! The tutorial is a fixed sequence of pages. Each page knows its previous
//! and next page so a footer can offer "previous / next" links, and the
//! position in the sequence gives the reader's progress.

use serde::Serialize;

/// One tutorial page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// File path the page is served from, relative to its directory
    pub path: &'static str,
    /// Display title
    pub title: &'static str,
    /// Link to the previous page, relative to this page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<&'static str>,
    /// Link to the next page, relative to this page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<&'static str>,
}

const TUTORIAL_PAGES: &[Page] = &[
    Page {
        path: "index.html",
        title: "Introduction",
        prev: None,
        next: Some("pages/sequence.html"),
    },
    Page {
        path: "sequence.html",
        title: "Sequence",
        prev: Some("../index.html"),
        next: Some("class.html"),
    },
    Page {
        path: "class.html",
        title: "Class",
        prev: Some("sequence.html"),
        next: Some("usecase.html"),
    },
    Page {
        path: "usecase.html",
        title: "Use Case",
        prev: Some("class.html"),
        next: Some("activity.html"),
    },
    Page {
        path: "activity.html",
        title: "Activity",
        prev: Some("usecase.html"),
        next: Some("state.html"),
    },
    Page {
        path: "state.html",
        title: "State",
        prev: Some("activity.html"),
        next: Some("component.html"),
    },
    Page {
        path: "component.html",
        title: "Component",
        prev: Some("state.html"),
        next: Some("tips.html"),
    },
    Page {
        path: "tips.html",
        title: "Tips",
        prev: Some("component.html"),
        next: None,
    },
];

/// Reading progress through the tutorial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Completion in percent, 0 for an empty tutorial
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f32 * 100.0 / self.total as f32
        }
    }
}

/// Ordered list of tutorial pages
#[derive(Debug, Clone)]
pub struct PageTable {
    pages: Vec<Page>,
}

impl Default for PageTable {
    fn default() -> Self {
        Self::tutorial()
    }
}

impl PageTable {
    /// The PlantUML tutorial: introduction, six diagram kinds, tips
    pub fn tutorial() -> Self {
        Self {
            pages: TUTORIAL_PAGES.to_vec(),
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn position(&self, current_path: &str) -> Option<usize> {
        let current = current_path.split(['?', '#']).next().unwrap_or(current_path);
        self.pages.iter().position(|page| {
            current == page.path || current.ends_with(&format!("/{}", page.path))
        })
    }

    /// Page served at `current_path` (e.g. `/tutorial/pages/class.html`)
    pub fn hint_for(&self, current_path: &str) -> Option<&Page> {
        self.position(current_path).map(|i| &self.pages[i])
    }

    /// Progress when reading the page at `current_path`
    pub fn progress(&self, current_path: &str) -> Option<Progress> {
        self.position(current_path).map(|i| Progress {
            completed: i + 1,
            total: self.pages.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutorial_has_eight_pages() {
        let table = PageTable::tutorial();
        assert_eq!(table.len(), 8);
        assert_eq!(table.pages()[0].title, "Introduction");
        assert_eq!(table.pages()[7].title, "Tips");
    }

    #[test]
    fn test_hint_for_nested_path() {
        let table = PageTable::tutorial();
        let page = table.hint_for("/tutorial/pages/class.html").unwrap();

        assert_eq!(page.prev, Some("sequence.html"));
        assert_eq!(page.next, Some("usecase.html"));
    }

    #[test]
    fn test_first_and_last_pages() {
        let table = PageTable::tutorial();

        let first = table.hint_for("index.html").unwrap();
        assert_eq!(first.prev, None);
        assert_eq!(first.next, Some("pages/sequence.html"));

        let last = table.hint_for("/pages/tips.html#extras").unwrap();
        assert_eq!(last.next, None);
    }

    #[test]
    fn test_suffix_must_be_a_whole_segment() {
        let table = PageTable::tutorial();
        assert!(table.hint_for("/pages/subclass.html").is_none());
        assert!(table.hint_for("/about.html").is_none());
    }

    #[test]
    fn test_progress() {
        let table = PageTable::tutorial();
        let progress = table.progress("/pages/activity.html").unwrap();

        assert_eq!(progress.completed, 5);
        assert_eq!(progress.total, 8);
        assert!((progress.percent() - 62.5).abs() < f32::EPSILON);
    }
}
