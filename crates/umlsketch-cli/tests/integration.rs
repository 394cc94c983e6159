//! Integration tests for the umlsketch CLI
//!
//! Commands run against temp files and a local mock server standing in
//! for the PlantUML servers.

use std::fs;
use std::path::PathBuf;

use httpmock::MockServer;
use tempfile::TempDir;
use umlsketch_cli::{check_command, load_settings, pages_command, render_command, url_command};
use umlsketch_cli::OutputFormat;
use umlsketch_diagrams::{DiagramEncoder, DiagramSource, Settings};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
const DIAGRAM: &str = "@startuml\nAlice -> Bob: Hello\n@enduml\n";

fn write_diagram(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

/// Settings with a broken primary and a working fallback on `server`
fn mock_settings(server: &MockServer) -> Settings {
    let toml = format!(
        r#"
[render]
timeout_secs = 5

[[endpoints]]
name = "primary"
template = "{base}/primary/png/{{token}}"

[[endpoints]]
name = "fallback"
template = "{base}/fallback/png/{{token}}"
"#,
        base = server.base_url()
    );
    Settings::from_toml_str(&toml).unwrap()
}

fn token(settings: &Settings, text: &str) -> String {
    settings
        .encoder()
        .encode(&DiagramSource::new(text))
        .unwrap()
        .as_str()
        .to_string()
}

#[test]
fn test_check_valid_diagram() {
    let dir = TempDir::new().unwrap();
    let input = write_diagram(&dir, "ok.puml", DIAGRAM);

    assert!(check_command(&input, OutputFormat::Text).unwrap());
    assert!(check_command(&input, OutputFormat::Json).unwrap());
}

#[test]
fn test_check_reports_missing_marker() {
    let dir = TempDir::new().unwrap();
    let input = write_diagram(&dir, "broken.puml", "Alice -> Bob\n@enduml");

    assert!(!check_command(&input, OutputFormat::Json).unwrap());
}

#[test]
fn test_check_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = check_command(&dir.path().join("nope.puml"), OutputFormat::Text).unwrap_err();
    assert!(err.to_string().contains("Input file not found"));
}

#[test]
fn test_url_uses_one_token_for_all_servers() {
    let dir = TempDir::new().unwrap();
    let input = write_diagram(&dir, "seq.puml", DIAGRAM);
    let settings = Settings::default();

    let urls = url_command(&input, &settings).unwrap();

    assert_eq!(urls.len(), 2);
    let token = token(&settings, DIAGRAM);
    assert_eq!(
        urls[0],
        format!("https://www.plantuml.com/plantuml/png/{}", token)
    );
    assert!(urls[1].ends_with(&token));
}

#[test]
fn test_url_rejects_invalid_diagram() {
    let dir = TempDir::new().unwrap();
    let input = write_diagram(&dir, "empty.puml", "   \n");

    assert!(url_command(&input, &Settings::default()).is_err());
}

#[test]
fn test_load_settings_defaults_when_missing() {
    let dir = TempDir::new().unwrap();
    let settings = load_settings(&dir.path().join("umlsketch.toml")).unwrap();
    assert_eq!(settings.endpoints.len(), 2);
}

#[test]
fn test_load_settings_rejects_empty_endpoint_list() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("umlsketch.toml");
    fs::write(&path, "endpoints = []\n").unwrap();

    let err = load_settings(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("at least one"));
}

#[tokio::test]
async fn test_render_falls_back_and_writes_files() {
    let server = MockServer::start_async().await;
    let settings = mock_settings(&server);
    let token = token(&settings, DIAGRAM);

    let primary = server
        .mock_async(|when, then| {
            when.method("GET").path(format!("/primary/png/{}", token));
            then.status(503);
        })
        .await;
    let fallback = server
        .mock_async(|when, then| {
            when.method("GET").path(format!("/fallback/png/{}", token));
            then.status(200).header("content-type", "image/png").body(PNG);
        })
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_diagram(&dir, "seq.puml", DIAGRAM);
    let out = dir.path().join("out");

    let written = render_command(&input, &out, "preview", true, &settings)
        .await
        .unwrap();

    primary.assert_async().await;
    fallback.assert_async().await;

    let png = written
        .iter()
        .find(|p| p.extension().is_some_and(|e| e == "png"))
        .unwrap();
    let name = png.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("plantuml-diagram-"));
    assert_eq!(fs::read(png).unwrap(), PNG);

    let source_copy = png.with_extension("puml");
    assert_eq!(fs::read_to_string(source_copy).unwrap(), DIAGRAM);

    let html = fs::read_to_string(out.join("preview.html")).unwrap();
    assert!(html.contains("/fallback/png/"));
}

#[tokio::test]
async fn test_render_fails_when_output_cannot_be_written() {
    let server = MockServer::start_async().await;
    let settings = mock_settings(&server);
    server
        .mock_async(|when, then| {
            when.method("GET");
            then.status(200).header("content-type", "image/png").body(PNG);
        })
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_diagram(&dir, "seq.puml", DIAGRAM);
    let out = dir.path().join("out");
    fs::write(&out, "a regular file").unwrap();

    let err = render_command(&input, &out, "preview", false, &settings)
        .await
        .unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("Failed to save render output"));
    assert!(message.contains("Failed to create output directory"));
}

#[tokio::test]
async fn test_render_rejects_surface_with_path_separator() {
    let server = MockServer::start_async().await;
    let settings = mock_settings(&server);
    let mock = server
        .mock_async(|when, then| {
            when.method("GET");
            then.status(200).body(PNG);
        })
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_diagram(&dir, "seq.puml", DIAGRAM);
    let out = dir.path().join("out");

    let err = render_command(&input, &out, "../escape", true, &settings)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Invalid surface name"));
    assert!(!dir.path().join("escape.html").exists());
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_render_fails_when_all_servers_down() {
    let server = MockServer::start_async().await;
    let settings = mock_settings(&server);
    let mock = server
        .mock_async(|when, then| {
            when.method("GET");
            then.status(500);
        })
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_diagram(&dir, "seq.puml", DIAGRAM);
    let out = dir.path().join("out");

    let err = render_command(&input, &out, "preview", true, &settings)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("None of the 2 PlantUML servers"));
    mock.assert_hits_async(2).await;

    let html = fs::read_to_string(out.join("preview.html")).unwrap();
    assert!(html.contains("Retry"));
}

#[tokio::test]
async fn test_render_rejects_invalid_without_requests() {
    let server = MockServer::start_async().await;
    let settings = mock_settings(&server);
    let mock = server
        .mock_async(|when, then| {
            when.method("GET");
            then.status(200).body(PNG);
        })
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_diagram(&dir, "bad.puml", "Alice -> Bob");

    assert!(render_command(&input, &dir.path().join("out"), "preview", false, &settings)
        .await
        .is_err());
    mock.assert_hits_async(0).await;
}

#[test]
fn test_pages_command() {
    pages_command(None, OutputFormat::Text).unwrap();
    pages_command(Some("/tutorial/pages/state.html"), OutputFormat::Json).unwrap();
    assert!(pages_command(Some("/nowhere.html"), OutputFormat::Text).is_err());
}
