//! Walks the tutorial the way a reader does: page to page, section to section

use umlsketch_tutorial::{complete, NavTarget, PageTable, Router};

#[test]
fn test_follow_next_links_to_the_end() {
    let table = PageTable::tutorial();
    let mut path = "index.html".to_string();
    let mut visited = vec![table.hint_for(&path).unwrap().title];

    while let Some(next) = table.hint_for(&path).unwrap().next {
        // Relative links resolve against the pages/ directory after the first hop
        path = format!("/site/pages/{}", next.trim_start_matches("pages/"));
        visited.push(table.hint_for(&path).unwrap().title);
    }

    assert_eq!(visited.len(), table.len());
    assert_eq!(visited.last(), Some(&"Tips"));
    assert_eq!(table.progress(&path).unwrap().percent(), 100.0);
}

#[test]
fn test_page_table_serializes_without_missing_links() {
    let table = PageTable::tutorial();
    let json = serde_json::to_value(table.pages()).unwrap();

    assert!(json[0].get("prev").is_none());
    assert_eq!(json[0]["next"], "pages/sequence.html");
    assert!(json[7].get("next").is_none());
}

#[test]
fn test_section_clicks_drive_router() {
    let mut router = Router::new(["intro", "syntax", "examples"]);

    let clicks = [
        (Some("#syntax"), Some("syntax")),
        (Some("class.html"), None),
        (None, Some("examples")),
    ];

    let mut pages = Vec::new();
    for (href, section) in clicks {
        match NavTarget::classify(href, section) {
            Some(NavTarget::Section(id)) => {
                router.navigate(&id).unwrap();
            }
            Some(NavTarget::Page(target)) => pages.push(target),
            None => {}
        }
    }

    assert_eq!(router.active(), Some("examples"));
    assert_eq!(pages, vec!["class.html".to_string()]);
    assert_eq!(router.back(), Some("syntax"));
}

#[test]
fn test_typing_a_skeleton() {
    let edit = complete("@start ", 7).unwrap();
    let edit = complete(&format!("{}class ", &edit.text[..10]), 16).unwrap();
    assert!(edit.text.starts_with("@startuml\nclass ClassName {"));
}
