use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn loctable(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("loctable").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn test_bilingual_sheet_then_split() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("ref.ini"), "a=Hello\nb=World\n").unwrap();
    fs::write(temp_dir.path().join("global.ini"), "a=Привіт\n").unwrap();

    let output = loctable(temp_dir.path())
        .args(["to-bilingual-sheet", "global.ini", "-r", "ref.ini", "-o", "out.xlsx"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(temp_dir.path().join("out.xlsx").exists());

    let output = loctable(temp_dir.path())
        .args(["split", "out.xlsx", "-b", "base.ini", "-o", "tr.ini"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let base = fs::read_to_string(temp_dir.path().join("base.ini")).unwrap();
    let translation = fs::read_to_string(temp_dir.path().join("tr.ini")).unwrap();
    assert!(base.contains("a=Hello\r\n"));
    assert!(base.contains("b=World\r\n"));
    assert!(translation.contains("a=Привіт\r\n"));
}

#[test]
fn test_to_sheet_writes_split_documents() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("convert.toml"),
        "[split-documents]\nui = \"UI_\"\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("global.ini"), "UI_ok=OK\nother=Text\n").unwrap();

    let output = loctable(temp_dir.path())
        .args(["to-sheet", "global.ini", "-o", "global.ini.xlsx"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(temp_dir.path().join("global.ini.xlsx").exists());
    assert!(temp_dir.path().join("ui.xlsx").exists());
}

#[test]
fn test_merge_with_reference() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("global_ref.ini"),
        "a=Hello\nb=Level %d of %d\nc=New\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("orig.ini"), "a=Hello\nb=Level %d\n").unwrap();
    fs::write(temp_dir.path().join("tr.ini"), "a=Привіт\nb=Рівень %d\n").unwrap();

    let output = loctable(temp_dir.path())
        .args(["merge", "orig.ini", "tr.ini", "-o", "out/global.ini"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let merged = fs::read_to_string(temp_dir.path().join("out/global.ini")).unwrap();
    assert_eq!(merged, "\u{feff}a=Привіт\r\nb=Level %d of %d\r\nc=New\r\n");
}

#[test]
fn test_merge_version_suffix_without_reference() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("orig.ini"),
        "pause_ForegroundMainMenuScreenName=Alpha\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("tr.ini"),
        "pause_ForegroundMainMenuScreenName=Альфа\n",
    )
    .unwrap();

    let output = loctable(temp_dir.path())
        .args([
            "merge", "orig.ini", "tr.ini", "--no-ref", "--no-check", "-v", "1.2", "-o",
            "global.ini",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let merged = fs::read_to_string(temp_dir.path().join("global.ini")).unwrap();
    assert!(merged.contains("pause_ForegroundMainMenuScreenName=Альфа - v1.2\r\n"));
}

#[test]
fn test_merge_accepts_flat_files_without_ini_extension() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("global.ini.original"), "a=Hello\n").unwrap();
    fs::write(temp_dir.path().join("global.ini.translation"), "a=Привіт\n").unwrap();

    let output = loctable(temp_dir.path())
        .args([
            "merge",
            "global.ini.original",
            "global.ini.translation",
            "--no-ref",
            "-o",
            "out.ini",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let merged = fs::read_to_string(temp_dir.path().join("out.ini")).unwrap();
    assert_eq!(merged, "\u{feff}a=Привіт\r\n");
}

#[test]
fn test_transform_output_feeds_to_sheet() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("global.ini"), "a=«ґ»\n").unwrap();

    loctable(temp_dir.path())
        .args(["transform", "global.ini"])
        .assert()
        .success();
    loctable(temp_dir.path())
        .args(["to-sheet", "global.ini.out", "-o", "global.ini.xlsx"])
        .assert()
        .success();
    assert!(temp_dir.path().join("global.ini.xlsx").exists());
}

#[test]
fn test_check_json_report() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("orig.ini"), "a=Hit %d enemies\nb=Text\n").unwrap();
    fs::write(temp_dir.path().join("tr.ini"), "a=Вбито ворогів\nb=Текст\n").unwrap();

    let output = loctable(temp_dir.path())
        .args(["check", "orig.ini", "tr.ini", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["issues"].as_array().unwrap().len(), 1);
    assert_eq!(report["issues"][0]["key"], "a");
    assert_eq!(report["issues"][0]["kind"], "unnamed_format_changed");
}

#[test]
fn test_check_clean_translation_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("orig.ini"), "a=Hit %d enemies\n").unwrap();
    fs::write(temp_dir.path().join("tr.ini"), "a=Вбито %d ворогів\n").unwrap();

    loctable(temp_dir.path())
        .args(["check", "orig.ini", "tr.ini"])
        .assert()
        .success();
}

#[test]
fn test_transform_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("global.ini"), "a=«ґ»\n").unwrap();

    loctable(temp_dir.path())
        .args(["transform", "global.ini", "--dry-run"])
        .assert()
        .success();
    assert!(!temp_dir.path().join("global.ini.out").exists());

    loctable(temp_dir.path())
        .args(["transform", "global.ini"])
        .assert()
        .success();
    assert!(temp_dir.path().join("global.ini.out").exists());
}

#[test]
fn test_init_config() {
    let temp_dir = TempDir::new().unwrap();

    loctable(temp_dir.path())
        .args(["init-config", "ui", "hud", "--lost-newline"])
        .assert()
        .success();

    let config = fs::read_to_string(temp_dir.path().join("convert.toml")).unwrap();
    assert!(config.contains("[split-documents]"));
    assert!(config.contains("ui = \"\""));
    assert!(config.contains("lost_newline = true"));
}

#[test]
fn test_unsupported_input_format_fails() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("strings.txt"), "a=1\n").unwrap();

    let output = loctable(temp_dir.path())
        .args(["merge", "strings.txt", "--no-ref"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported file format"));
}

#[test]
fn test_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = loctable(temp_dir.path())
        .args(["split", "missing.xlsx"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File does not exist"));
}
