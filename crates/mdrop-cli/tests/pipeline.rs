//! End-to-end CLI workflow: commit to an allowlist, generate proof files, verify them.

#![allow(
    clippy::indexing_slicing,
    reason = "Test code should panic on invalid data"
)]

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use mdrop_core::schema::commitment::Commitment;
use mdrop_tree::MerkleTree;
use tempfile::tempdir;
use test_utils::{allowlist_csv, csv_row, leaves, record_fields};

fn s(path: &Path) -> &str {
    path.to_str().expect("path is valid UTF-8")
}

fn mdrop() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mdrop");
    cmd.env("RUST_LOG", "warn");
    cmd
}

/// Ten valid records followed by one row with a malformed amount.
fn write_allowlist(dir: &Path) -> std::path::PathBuf {
    let fields = record_fields(10);
    let pairs: Vec<(&str, &str)> = fields
        .iter()
        .map(|(a, b)| (a.as_str(), b.as_str()))
        .collect();
    let mut csv = allowlist_csv(&pairs);
    csv.push_str(&csv_row(10, &fields[0].0, "12abc"));
    csv.push('\n');

    let path = dir.join("airdrop.csv");
    fs::write(&path, csv).expect("Failed to write allowlist");
    path
}

fn read_commitment(path: &Path) -> Commitment {
    let json = fs::read_to_string(path).expect("Failed to read commitment");
    serde_json::from_str(&json).expect("Failed to parse commitment")
}

#[test]
fn root_writes_commitment() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let input = write_allowlist(temp_dir.path());
    let commitment_path = temp_dir.path().join("commitment.json");

    mdrop()
        .args([
            "root",
            "--input",
            s(&input),
            "--commitment-out",
            s(&commitment_path),
        ])
        .assert()
        .success();

    let commitment = read_commitment(&commitment_path);
    let expected = MerkleTree::from_leaves(&leaves(10)).expect("tree should build");
    assert_eq!(commitment.root, expected.root());
    assert_eq!(commitment.leaf_count, 10);
    assert_eq!(commitment.skipped_rows, 1);
    assert_eq!(commitment.duplicate_leaves, 0);
}

#[test]
fn proofs_then_verify() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let input = write_allowlist(temp_dir.path());
    let commitment_path = temp_dir.path().join("commitment.json");
    let output_dir = temp_dir.path().join("proofs");

    mdrop()
        .args([
            "proofs",
            "--input",
            s(&input),
            "--commitment-out",
            s(&commitment_path),
            "--workers",
            "4",
            "--output-dir",
            s(&output_dir),
        ])
        .assert()
        .success();

    let commitment = read_commitment(&commitment_path);
    let mut line_counts = Vec::new();
    for worker_id in 0..4 {
        let path = output_dir.join(format!("airdrop_processed_{worker_id}.csv"));
        let text = fs::read_to_string(&path).expect("Failed to read proof file");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,address,a,b,c,d,e,amount,proof"));
        line_counts.push(lines.count());

        mdrop()
            .args([
                "verify",
                "file",
                "--proofs-in",
                s(&path),
                "--commitment",
                s(&commitment_path),
            ])
            .assert()
            .success();
    }
    assert_eq!(line_counts, vec![3, 3, 2, 2]);

    // Row 5 sits in worker 1's file, second line after the header.
    let text = fs::read_to_string(output_dir.join("airdrop_processed_1.csv"))
        .expect("Failed to read proof file");
    let line = text.lines().nth(2).expect("worker 1 should have a second entry");
    let (row, proof) = line.rsplit_once(',').expect("line should carry a proof");
    let fields: Vec<&str> = row.split(',').collect();
    assert_eq!(fields[0], "5");

    let root = commitment.root.to_string();
    mdrop()
        .args([
            "verify", "claim", "--address", fields[1], "--amount", fields[7], "--proof", proof,
            "--root", &root,
        ])
        .assert()
        .success();

    mdrop()
        .args([
            "verify", "claim", "--address", fields[1], "--amount", "1", "--proof", proof,
            "--root", &root,
        ])
        .assert()
        .failure();
}

#[test]
fn tampered_proof_file_fails_verification() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let input = write_allowlist(temp_dir.path());
    let commitment_path = temp_dir.path().join("commitment.json");
    let output_dir = temp_dir.path().join("proofs");

    mdrop()
        .args([
            "proofs",
            "--input",
            s(&input),
            "--commitment-out",
            s(&commitment_path),
            "--workers",
            "2",
            "--output-dir",
            s(&output_dir),
            "--output-prefix",
            "batch",
        ])
        .assert()
        .success();

    let path = output_dir.join("batch_0.csv");
    let text = fs::read_to_string(&path).expect("Failed to read proof file");
    fs::write(&path, text.replacen(",1000,", ",1001,", 1)).expect("Failed to tamper");

    mdrop()
        .args([
            "verify",
            "file",
            "--proofs-in",
            s(&path),
            "--commitment",
            s(&commitment_path),
        ])
        .assert()
        .failure();
}

#[test]
fn invalid_runs_fail() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let empty = temp_dir.path().join("empty.csv");
    fs::write(&empty, allowlist_csv(&[])).expect("Failed to write allowlist");

    mdrop()
        .args([
            "root",
            "--input",
            s(&empty),
            "--commitment-out",
            s(&temp_dir.path().join("commitment.json")),
        ])
        .assert()
        .failure();

    let input = write_allowlist(temp_dir.path());
    mdrop()
        .args(["proofs", "--input", s(&input), "--workers", "0"])
        .assert()
        .failure();
}

#[test]
fn schema_prints_commitment_fields() {
    let output = mdrop()
        .arg("schema")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).expect("stdout is UTF-8");
    assert!(stdout.contains("leaf_count"));
    assert!(stdout.contains("duplicate_leaves"));
}
