//! umlsketch-tutorial - Navigation and editor helpers for the PlantUML tutorial
//!
//! - [`pages`]: the tutorial's page sequence, previous/next hints, progress
//! - [`router`]: active-section state of one page, with history
//! - [`editor`]: trigger completions, indentation and key bindings for
//!   diagram text areas
//!
//! # Example
//!
//! ```
//! use umlsketch_tutorial::{PageTable, Router};
//!
//! let table = PageTable::tutorial();
//! let page = table.hint_for("/pages/class.html").unwrap();
//! assert_eq!(page.next, Some("usecase.html"));
//!
//! let mut router = Router::new(["basics", "relations"]);
//! router.navigate("relations").unwrap();
//! assert_eq!(router.back(), Some("basics"));
//! ```

pub mod editor;
pub mod error;
pub mod pages;
pub mod router;

pub use editor::{command_for, complete, indent, Edit, EditorCommand};
pub use error::{Result, TutorialError};
pub use pages::{Page, PageTable, Progress};
pub use router::{NavTarget, Router};
