//! Editing helpers for diagram text areas
//!
//! Offsets are byte offsets into UTF-8 text and must fall on character
//! boundaries.

use crate::error::{Result, TutorialError};

/// Text inserted by the indent command
pub const INDENT: &str = "    ";

/// Trigger word -> expansion, applied when a line consists of the trigger
const COMPLETIONS: &[(&str, &str)] = &[
    ("@start", "@startuml\n\n@enduml"),
    ("participant", "participant \"Actor Name\" as Actor"),
    ("class", "class ClassName {\n    -attribute: type\n    +method()\n}"),
    ("usecase", "usecase \"Use Case Name\" as UC1"),
];

/// Text after an edit, with the new cursor position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub cursor: usize,
}

/// Command bound to a key in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    /// Render the diagram (Ctrl+Enter)
    Render,
    /// Insert indentation (Tab)
    Indent,
}

/// Map a key press to an editor command
pub fn command_for(key: &str, ctrl: bool) -> Option<EditorCommand> {
    match (key, ctrl) {
        ("Enter", true) => Some(EditorCommand::Render),
        ("Tab", false) => Some(EditorCommand::Indent),
        _ => None,
    }
}

/// Expansion registered for a trigger word
pub fn expansion(trigger: &str) -> Option<&'static str> {
    COMPLETIONS
        .iter()
        .find(|(t, _)| *t == trigger)
        .map(|(_, expansion)| *expansion)
}

/// All trigger words
pub fn triggers() -> impl Iterator<Item = &'static str> {
    COMPLETIONS.iter().map(|(trigger, _)| *trigger)
}

/// Expand the trigger on the cursor's line, if the line is exactly a trigger
///
/// The line is the text between the previous newline and `cursor`,
/// surrounding whitespace ignored. The line is replaced by the expansion and
/// the cursor moves to its end.
pub fn complete(text: &str, cursor: usize) -> Option<Edit> {
    if cursor > text.len() || !text.is_char_boundary(cursor) {
        return None;
    }

    let line_start = text[..cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let expansion = expansion(text[line_start..cursor].trim())?;

    let mut result = String::with_capacity(text.len() + expansion.len());
    result.push_str(&text[..line_start]);
    result.push_str(expansion);
    result.push_str(&text[cursor..]);

    Some(Edit {
        text: result,
        cursor: line_start + expansion.len(),
    })
}

/// Replace the selection `start..end` with four spaces
pub fn indent(text: &str, start: usize, end: usize) -> Result<Edit> {
    let invalid = || TutorialError::InvalidSelection {
        start,
        end,
        len: text.len(),
    };
    if start > end || end > text.len() {
        return Err(invalid());
    }
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return Err(invalid());
    }

    let mut result = String::with_capacity(text.len() + INDENT.len());
    result.push_str(&text[..start]);
    result.push_str(INDENT);
    result.push_str(&text[end..]);

    Ok(Edit {
        text: result,
        cursor: start + INDENT.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_skeleton() {
        let edit = complete("@start ", 7).unwrap();
        assert_eq!(edit.text, "@startuml\n\n@enduml");
        assert_eq!(edit.cursor, edit.text.len());
    }

    #[test]
    fn test_complete_on_later_line() {
        let text = "@startuml\n  participant \n@enduml";
        let cursor = text.find(" \n@enduml").unwrap() + 1;

        let edit = complete(text, cursor).unwrap();
        assert_eq!(
            edit.text,
            "@startuml\nparticipant \"Actor Name\" as Actor\n@enduml"
        );
        assert_eq!(&edit.text[edit.cursor..], "\n@enduml");
    }

    #[test]
    fn test_no_completion_for_partial_line() {
        assert!(complete("Alice -> class ", 15).is_none());
        assert!(complete("classy ", 7).is_none());
    }

    #[test]
    fn test_complete_rejects_bad_cursor() {
        assert!(complete("class", 99).is_none());
        assert!(complete("é", 1).is_none());
    }

    #[test]
    fn test_indent_replaces_selection() {
        let edit = indent("A -> B", 0, 0).unwrap();
        assert_eq!(edit.text, "    A -> B");
        assert_eq!(edit.cursor, 4);

        let edit = indent("A -> B", 1, 5).unwrap();
        assert_eq!(edit.text, "A    B");
        assert_eq!(edit.cursor, 5);
    }

    #[test]
    fn test_indent_rejects_bad_selection() {
        assert!(matches!(
            indent("abc", 2, 1),
            Err(TutorialError::InvalidSelection { .. })
        ));
        assert!(indent("abc", 0, 10).is_err());
    }

    #[test]
    fn test_key_commands() {
        assert_eq!(command_for("Enter", true), Some(EditorCommand::Render));
        assert_eq!(command_for("Tab", false), Some(EditorCommand::Indent));
        assert_eq!(command_for("Enter", false), None);
    }

    #[test]
    fn test_triggers() {
        let all: Vec<_> = triggers().collect();
        assert_eq!(all, vec!["@start", "participant", "class", "usecase"]);
        assert!(expansion("usecase").unwrap().contains("UC1"));
    }
}
