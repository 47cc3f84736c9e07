//! End-to-end tests of the read-refine binary over fixture FASTA files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

// Three unrelated reference sequences; reads are exact slices so the
// built-in aligner maps them with full quality.
const R1: &str = "ACGTACGGTTCAGCATTACGGATCCAGTCAAGGTCCAGTTACCGGTTGACGGATTACGGTCAGGTACCAGTA";
const R2: &str = "TTGACCATGGCAGGCAACTTGGCCGTAAGGCACAGTTCCTGATTGGCAATCCATGGTTCGCAAGGTTCCAAT";
const R3: &str = "GAGTCCTAGGATCGAGGTTAGAGTCTTCCAGTGGAGGCATTGGAACTAGCGAGGTGACCTAAGGCCTTAGGA";

fn write(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

fn reads_fasta(sources: &[(&str, usize)]) -> String {
    let mut fasta = String::new();
    let mut read_number = 0;
    for &(sequence, count) in sources {
        for start in 0..count {
            read_number += 1;
            fasta.push_str(&format!(">read{read_number}\n{}\n", &sequence[start..start + 24]));
        }
    }
    fasta
}

fn cmd() -> Command {
    Command::cargo_bin("read-refine").unwrap()
}

#[test]
fn test_profile_two_references() {
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("refs.fa"),
        &format!(">R1\n{R1}\n>R2\n{R2}\n"),
    );
    write(&dir.path().join("reads.fa"), &reads_fasta(&[(R1, 7), (R2, 3)]));
    let prefix = dir.path().join("out");

    cmd()
        .args(["profile", "--kmer-size", "8", "--min-seed-fraction", "0.5"])
        .arg("--references")
        .arg(dir.path().join("refs.fa"))
        .arg("--reads")
        .arg(dir.path().join("reads.fa"))
        .arg("--output")
        .arg(&prefix)
        .assert()
        .success()
        .stdout(predicate::str::contains("Refinement skipped"));

    let raw = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
    assert!(raw.contains("R1,0.7"));
    assert!(raw.contains("R2,0.3"));

    // Two candidates: refined table must equal the raw one
    let refined = std::fs::read_to_string(dir.path().join("out_refined.csv")).unwrap();
    assert_eq!(raw, refined);

    let retained = std::fs::read_to_string(dir.path().join("out_filtered_genomes.lsv")).unwrap();
    assert_eq!(retained, "R1\nR2\n");
}

#[test]
fn test_profile_filters_cross_mapping_reference() {
    // R1 and R2 share a long segment; reads from it are ambiguous. R3 gets
    // clean exclusive reads and anchors the true cluster; R1 and R2 keep a
    // single unique tail read each and land in the false cluster.
    let r1 = format!("{R1}GGCATTACGATCAGGT");
    let r2 = format!("{R1}CCTTAAGCGTACCAGG");

    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("refs.fa"),
        &format!(">R1\n{r1}\n>R2\n{r2}\n>R3\n{R3}\n"),
    );

    let mut reads = reads_fasta(&[(R3, 20)]);
    reads.push_str(&format!(">tail1\n{}\n", &r1[r1.len() - 24..]));
    reads.push_str(&format!(">tail2\n{}\n", &r2[r2.len() - 24..]));
    reads.push_str(&reads_fasta(&[(R1, 6)]));
    write(&dir.path().join("reads.fa"), &reads);
    let prefix = dir.path().join("out");

    cmd()
        .args(["profile", "--kmer-size", "8", "--min-seed-fraction", "0.5"])
        .arg("--references")
        .arg(dir.path().join("refs.fa"))
        .arg("--reads")
        .arg(dir.path().join("reads.fa"))
        .arg("--output")
        .arg(&prefix)
        .assert()
        .success()
        .stdout(predicate::str::contains("Refinement retained"));

    let retained = std::fs::read_to_string(dir.path().join("out_filtered_genomes.lsv")).unwrap();
    assert!(retained.contains("R3"));
    assert!(!retained.contains("R1"));
    assert!(!retained.contains("R2"));
}

#[test]
fn test_profile_skips_filtering_when_only_two_references_have_hits() {
    // Three candidates in the pool, but R3 attracts no reads. The filter
    // gates on references with evidence, so both populated references
    // survive and the refined table equals the raw one.
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("refs.fa"),
        &format!(">R1\n{R1}\n>R2\n{R2}\n>R3\n{R3}\n"),
    );
    write(&dir.path().join("reads.fa"), &reads_fasta(&[(R1, 7), (R2, 3)]));
    let prefix = dir.path().join("out");

    cmd()
        .args(["profile", "--kmer-size", "8", "--min-seed-fraction", "0.5"])
        .arg("--references")
        .arg(dir.path().join("refs.fa"))
        .arg("--reads")
        .arg(dir.path().join("reads.fa"))
        .arg("--output")
        .arg(&prefix)
        .assert()
        .success()
        .stdout(predicate::str::contains("Refinement skipped"));

    let raw = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
    assert!(raw.contains("R1,0.7"));
    assert!(raw.contains("R2,0.3"));

    let refined = std::fs::read_to_string(dir.path().join("out_refined.csv")).unwrap();
    assert_eq!(raw, refined);

    let retained = std::fs::read_to_string(dir.path().join("out_filtered_genomes.lsv")).unwrap();
    assert_eq!(retained, "R1\nR2\nR3\n");
}

#[test]
fn test_classify_with_evidence_artifact() {
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("refs.fa"),
        &format!(">R1\n{R1}\n>R2\n{R2}\n"),
    );
    write(&dir.path().join("reads.fa"), &reads_fasta(&[(R1, 4)]));
    let prefix = dir.path().join("raw");

    cmd()
        .args(["classify", "--kmer-size", "8", "--min-seed-fraction", "0.5", "--evidence"])
        .arg("--references")
        .arg(dir.path().join("refs.fa"))
        .arg("--reads")
        .arg(dir.path().join("reads.fa"))
        .arg("--output")
        .arg(&prefix)
        .assert()
        .success();

    let table = std::fs::read_to_string(dir.path().join("raw.csv")).unwrap();
    assert!(table.contains("R1,1"));

    let evidence: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("raw_evidence.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(evidence["R1"]["hit_count"], 4);
    assert_eq!(evidence["R2"]["hit_count"], 0);
}

#[test]
fn test_genome_directory_with_name_list() {
    let dir = TempDir::new().unwrap();
    let genomes = dir.path().join("genomes");
    std::fs::create_dir(&genomes).unwrap();
    write(&genomes.join("R1.fa"), &format!(">R1\n{R1}\n"));
    write(&genomes.join("R2.fa"), &format!(">R2\n{R2}\n"));
    // Name list includes one entry the directory cannot resolve
    write(&dir.path().join("names.lsv"), "R1\nR2\nMissing\n");
    write(&dir.path().join("reads.fa"), &reads_fasta(&[(R1, 2), (R2, 2)]));
    let prefix = dir.path().join("out");

    cmd()
        .args(["profile", "--kmer-size", "8", "--min-seed-fraction", "0.5"])
        .arg("--references")
        .arg(&genomes)
        .arg("--names")
        .arg(dir.path().join("names.lsv"))
        .arg("--reads")
        .arg(dir.path().join("reads.fa"))
        .arg("--output")
        .arg(&prefix)
        .assert()
        .success();

    let raw = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
    assert!(raw.contains("R1,0.5"));
    assert!(raw.contains("R2,0.5"));
}

#[test]
fn test_missing_reads_file_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("refs.fa"), &format!(">R1\n{R1}\n"));

    cmd()
        .arg("profile")
        .arg("--references")
        .arg(dir.path().join("refs.fa"))
        .arg("--reads")
        .arg(dir.path().join("nonexistent.fa"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("read pool"));
}
