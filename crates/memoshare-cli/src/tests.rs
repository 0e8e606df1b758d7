use chrono::NaiveDate;
use clap::Parser;
use memoshare_core::attachments::AttachmentRef;
use memoshare_core::config::SharedStore;
use memoshare_core::credentials::CredentialSource;
use memoshare_core::secret_store::MemorySecretStore;
use memoshare_core::usage::{initial_matrix_at, UsageWindow};
use pretty_assertions::assert_eq;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::commands::common::normalize_content;
use crate::commands::config::{describe_config, run_config, run_config_set, ConfigSummary};
use crate::commands::heatmap::{intensity_glyph, render_heatmap};
use crate::commands::share::{build_share_input, parse_attachment_arg};
use crate::error::CliError;

fn memory_store(dir: &tempfile::TempDir) -> SharedStore<MemorySecretStore> {
    SharedStore::new(dir.path(), MemorySecretStore::default())
}

#[test]
fn normalize_content_trims_and_rejects_empty() {
    assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_content(" \n\t "), None);
}

#[test]
fn share_command_collects_repeated_attachments() {
    let cli = Cli::try_parse_from([
        "memoshare",
        "share",
        "look",
        "at",
        "this",
        "--attach",
        "https://example.com",
        "-a",
        "photo.png",
    ])
    .unwrap();

    match cli.command {
        Commands::Share { text, attachments } => {
            assert_eq!(text, vec!["look", "at", "this"]);
            assert_eq!(attachments, vec!["https://example.com", "photo.png"]);
        }
        _ => panic!("expected share command"),
    }
}

#[test]
fn group_dir_is_global() {
    let cli = Cli::try_parse_from(["memoshare", "heatmap", "--group-dir", "/tmp/group"]).unwrap();
    assert_eq!(cli.group_dir.as_deref(), Some(std::path::Path::new("/tmp/group")));
    assert!(matches!(
        cli.command,
        Commands::Heatmap {
            weeks: 12,
            json: false
        }
    ));
}

#[test]
fn http_attachment_is_a_link() {
    let attachment = parse_attachment_arg(" https://example.com/a?b=1 ").unwrap();
    assert!(matches!(
        attachment,
        AttachmentRef::Url(url) if url.as_str() == "https://example.com/a?b=1"
    ));
}

#[test]
fn link_scheme_is_matched_case_insensitively() {
    let attachment = parse_attachment_arg("HTTPS://Example.com/page").unwrap();
    assert!(matches!(
        attachment,
        AttachmentRef::Url(url) if url.as_str() == "https://example.com/page"
    ));
}

#[test]
fn non_web_schemes_are_not_links() {
    let error = parse_attachment_arg("ftp://example.com/photo.png").unwrap_err();
    assert!(matches!(error, CliError::AttachmentNotFound(_)));
}

#[test]
fn file_url_attachment_resolves_to_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shot.jpg");
    std::fs::write(&path, b"placeholder").unwrap();
    let file_url = url::Url::from_file_path(&path).unwrap();

    let attachment = parse_attachment_arg(file_url.as_str()).unwrap();
    assert!(matches!(attachment, AttachmentRef::Image(_)));
}

#[test]
fn heatmap_weeks_are_bounded() {
    assert!(Cli::try_parse_from(["memoshare", "heatmap", "--weeks", "0"]).is_err());
    assert!(Cli::try_parse_from(["memoshare", "heatmap", "--weeks", "4000000000"]).is_err());
    assert!(Cli::try_parse_from(["memoshare", "heatmap", "--weeks", "521"]).is_err());

    let cli = Cli::try_parse_from(["memoshare", "heatmap", "--weeks", "520"]).unwrap();
    assert!(matches!(cli.command, Commands::Heatmap { weeks: 520, .. }));
}

#[test]
fn image_file_attachment_points_at_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.PNG");
    std::fs::write(&path, b"placeholder").unwrap();

    let attachment = parse_attachment_arg(path.to_str().unwrap()).unwrap();
    let AttachmentRef::Image(source) = attachment else {
        panic!("expected an image attachment");
    };
    assert_eq!(source.inline, None);
    let location = source.location.unwrap();
    assert_eq!(location.scheme(), "file");
    assert!(location.path().ends_with("/photo.PNG"));
}

#[test]
fn other_files_are_passed_through_as_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.pdf");
    std::fs::write(&path, b"%PDF").unwrap();

    let attachment = parse_attachment_arg(path.to_str().unwrap()).unwrap();
    assert_eq!(
        attachment,
        AttachmentRef::Other {
            type_identifier: "application/pdf".to_string()
        }
    );
}

#[test]
fn missing_attachment_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.jpg");
    let error = parse_attachment_arg(missing.to_str().unwrap()).unwrap_err();
    assert!(matches!(error, CliError::AttachmentNotFound(_)));
}

#[test]
fn share_input_requires_text_or_attachments() {
    assert!(matches!(
        build_share_input("   ".to_string(), &[]),
        Err(CliError::EmptyContent)
    ));

    let input = build_share_input(
        String::new(),
        &["https://example.com/only-link".to_string()],
    )
    .unwrap();
    assert_eq!(input.text, "");
    assert_eq!(input.attachments.len(), 1);
}

#[test]
fn intensity_levels() {
    assert_eq!(intensity_glyph(0), '·');
    assert_eq!(intensity_glyph(1), '░');
    assert_eq!(intensity_glyph(3), '▒');
    assert_eq!(intensity_glyph(5), '▓');
    assert_eq!(intensity_glyph(40), '█');
}

#[test]
fn heatmap_renders_weekday_rows() {
    // Wednesday; the window starts on Sunday 2024-03-03.
    let today = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
    let mut matrix = initial_matrix_at(today, UsageWindow::weeks(2));
    matrix[1].count = 1;
    matrix[10].count = 6;

    let rendered = render_heatmap(&matrix);
    let lines: Vec<_> = rendered.lines().collect();

    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "7 memo(s) from 2024-03-03 to 2024-03-13");
    assert_eq!(lines[1], "Sun ··");
    assert_eq!(lines[2], "Mon ░·");
    assert_eq!(lines[4], "Wed ·█");
    assert_eq!(lines[5], "Thu ·");
    assert_eq!(lines[7], "Sat ·");
}

#[test]
fn empty_matrix_renders_nothing() {
    assert_eq!(render_heatmap(&[]), "");
}

#[test]
fn config_set_then_describe() {
    let dir = tempfile::tempdir().unwrap();
    let store = memory_store(&dir);

    run_config_set(
        &store,
        Some(" https://memos.example.com ".to_string()),
        Some("open-1".to_string()),
        Some("secret-token".to_string()),
    )
    .unwrap();

    assert_eq!(
        describe_config(&store),
        ConfigSummary {
            config_path: store.config_path().display().to_string(),
            host: Some("https://memos.example.com".to_string()),
            open_id: Some("open-1".to_string()),
            access_token_set: true,
        }
    );
    assert_eq!(
        store.access_token().unwrap().as_deref(),
        Some("secret-token")
    );
}

#[test]
fn config_set_keeps_unspecified_values_and_clears_empty_open_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = memory_store(&dir);
    run_config_set(
        &store,
        Some("https://memos.example.com".to_string()),
        Some("open-1".to_string()),
        None,
    )
    .unwrap();

    run_config_set(&store, None, Some(String::new()), None).unwrap();

    let summary = describe_config(&store);
    assert_eq!(summary.host.as_deref(), Some("https://memos.example.com"));
    assert_eq!(summary.open_id, None);
    assert!(!summary.access_token_set);
}

#[test]
fn config_set_rejects_invalid_host_and_empty_invocation() {
    let dir = tempfile::tempdir().unwrap();
    let store = memory_store(&dir);

    let error = run_config_set(&store, Some("memos.local".to_string()), None, None).unwrap_err();
    assert!(matches!(error, CliError::Config(message) if message.contains("memos.local")));
    assert!(!store.config_path().exists());

    assert!(matches!(
        run_config_set(&store, None, None, None),
        Err(CliError::Config(_))
    ));
}

#[test]
fn config_clear_removes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let store = memory_store(&dir);
    run_config_set(
        &store,
        Some("https://memos.example.com".to_string()),
        None,
        Some("token".to_string()),
    )
    .unwrap();

    run_config(ConfigCommands::Clear, &store).unwrap();

    let summary = describe_config(&store);
    assert_eq!(summary.host, None);
    assert!(!summary.access_token_set);
}
