use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("zoia"))
}

fn repo_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn module_index() -> PathBuf {
    repo_root()
        .join("tests")
        .join("fixtures")
        .join("module_index.json")
}

fn name_words(name: &str) -> [i32; 4] {
    let mut bytes = [0u8; 16];
    bytes[..name.len()].copy_from_slice(name.as_bytes());
    let mut words = [0i32; 4];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

/// One stereo Audio Input module, no connections, one page, trailing colors.
fn write_patch(dir: &Path, file_name: &str) -> PathBuf {
    let mut words = vec![0];
    words.extend(name_words("Clean"));
    words.push(1);
    words.extend([14, 1, 0, 0, 1, 0, 0, 0, 0, 0]);
    words.extend(name_words("In"));
    words.push(0);
    words.push(1);
    words.extend(name_words("main"));
    words.push(0);
    words.push(4);
    words.extend([0, 0]);
    words[0] = (words.len() * 4) as i32;

    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).expect("write patch");
    path
}

#[test]
fn help_supports_decode_and_parse() {
    cmd()
        .arg("patch")
        .arg("decode")
        .arg("--help")
        .assert()
        .success();
    cmd()
        .arg("patch")
        .arg("parse")
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn version_includes_build_info() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.bin");
    let output = temp.path().join("patch.json");

    cmd()
        .arg("patch")
        .arg("decode")
        .arg(missing)
        .arg("--module-index")
        .arg(module_index())
        .arg("-o")
        .arg(output)
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn stdout_outputs_document() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_patch(temp.path(), "001_zoia_Clean.bin");

    let assert = cmd()
        .arg("patch")
        .arg("decode")
        .arg(input)
        .arg("--module-index")
        .arg(module_index())
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let document: Value = serde_json::from_str(&stdout).expect("valid json");

    assert_eq!(document["name"], "Clean");
    assert_eq!(document["modules"][0]["name"], "In");
    assert_eq!(document["modules"][0]["type"], "Audio Input");
    assert_eq!(document["modules"][0]["color"], "Yellow");
    assert_eq!(document["pages"].as_array().map(Vec::len), Some(64));
    assert_eq!(document["pages"][0], "main");
    assert_eq!(document["meta"]["i_o"]["inputs"], "Stereo");
    assert_eq!(document["meta"]["i_o"]["outputs"], Value::Null);
}

#[test]
fn output_is_written_with_parent_dirs() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_patch(temp.path(), "001_zoia_Clean.bin");
    let output = temp.path().join("out").join("nested").join("clean.json");

    cmd()
        .arg("patch")
        .arg("decode")
        .arg(input)
        .arg("--module-index")
        .arg(module_index())
        .arg("-o")
        .arg(&output)
        .arg("--pretty")
        .assert()
        .success()
        .stderr(contains("OK: document written"));

    let text = std::fs::read_to_string(&output).expect("read output");
    assert!(text.contains('\n'));
    let document: Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(document["meta"]["n_modules"], 1);
}

#[test]
fn glob_input_resolves_single_match() {
    let temp = TempDir::new().expect("tempdir");
    write_patch(temp.path(), "007_zoia_Clean.bin");
    let pattern = temp.path().join("007_*.bin");

    cmd()
        .arg("patch")
        .arg("parse")
        .arg(pattern)
        .arg("--module-index")
        .arg(module_index())
        .arg("--stdout")
        .assert()
        .success()
        .stdout(contains("\"Clean\""));
}

#[test]
fn glob_with_multiple_matches_fails() {
    let temp = TempDir::new().expect("tempdir");
    write_patch(temp.path(), "001_zoia_A.bin");
    write_patch(temp.path(), "002_zoia_B.bin");
    let pattern = temp.path().join("*.bin");

    cmd()
        .arg("patch")
        .arg("decode")
        .arg(pattern)
        .arg("--module-index")
        .arg(module_index())
        .arg("--stdout")
        .assert()
        .code(2)
        .stderr(contains("multiple files match pattern"));
}

#[test]
fn non_bin_input_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_patch(temp.path(), "patch.syx");

    cmd()
        .arg("patch")
        .arg("decode")
        .arg(input)
        .arg("--module-index")
        .arg(module_index())
        .arg("--stdout")
        .assert()
        .code(2)
        .stderr(contains("unsupported input format"));
}

#[test]
fn output_equal_to_input_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_patch(temp.path(), "001_zoia_Clean.bin");

    cmd()
        .arg("patch")
        .arg("decode")
        .arg(&input)
        .arg("--module-index")
        .arg(module_index())
        .arg("-o")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(contains("output path must differ from input"));
}

#[test]
fn missing_module_index_is_reported() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_patch(temp.path(), "001_zoia_Clean.bin");

    cmd()
        .arg("patch")
        .arg("decode")
        .arg(input)
        .arg("--module-index")
        .arg(temp.path().join("ModuleIndex.json"))
        .arg("--stdout")
        .assert()
        .code(2)
        .stderr(contains("module index not found").and(contains("hint:")));
}

#[test]
fn corrupt_patch_fails_without_output() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("broken.bin");
    std::fs::write(&input, [1u8, 2, 3]).expect("write patch");
    let output = temp.path().join("broken.json");

    cmd()
        .arg("patch")
        .arg("decode")
        .arg(&input)
        .arg("--module-index")
        .arg(module_index())
        .arg("-o")
        .arg(&output)
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("patch failed to parse")));
    assert!(!output.exists());
}

#[test]
fn stdout_and_output_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_patch(temp.path(), "001_zoia_Clean.bin");
    let output = temp.path().join("patch.json");

    cmd()
        .arg("patch")
        .arg("decode")
        .arg(input)
        .arg("--module-index")
        .arg(module_index())
        .arg("--stdout")
        .arg("-o")
        .arg(output)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_patch(temp.path(), "001_zoia_Clean.bin");

    cmd()
        .arg("patch")
        .arg("decode")
        .arg(input)
        .arg("--module-index")
        .arg(module_index())
        .arg("--stdout")
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_patch(temp.path(), "001_zoia_Clean.bin");
    let output = temp.path().join("patch.json");

    cmd()
        .arg("patch")
        .arg("decode")
        .arg(input)
        .arg("--module-index")
        .arg(module_index())
        .arg("-o")
        .arg(output)
        .arg("--quiet")
        .arg("--summary")
        .assert()
        .success()
        .stderr(contains("OK:").not().and(contains("Patch:").not()));
}

#[test]
fn summary_lists_meta() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_patch(temp.path(), "001_zoia_Clean.bin");

    cmd()
        .arg("patch")
        .arg("decode")
        .arg(input)
        .arg("--module-index")
        .arg(module_index())
        .arg("--stdout")
        .arg("--summary")
        .assert()
        .success()
        .stderr(
            contains("Patch: Clean")
                .and(contains("modules: 1"))
                .and(contains("inputs: Stereo"))
                .and(contains("outputs: -")),
        );
}

#[test]
fn long_output_flag_writes_document() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_patch(temp.path(), "001_zoia_Clean.bin");
    let output = temp.path().join("clean.json");

    cmd()
        .arg("patch")
        .arg("decode")
        .arg(input)
        .arg("--module-index")
        .arg(module_index())
        .arg("--output")
        .arg(&output)
        .arg("--quiet")
        .assert()
        .success();

    let document: Value =
        serde_json::from_str(&std::fs::read_to_string(&output).expect("read output"))
            .expect("valid json");
    assert_eq!(document["name"], "Clean");
}
