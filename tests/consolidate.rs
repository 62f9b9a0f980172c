mod common;

use std::fs;

use common::{sheet_html, write_sheet};
use tempfile::tempdir;
use tpu_tools::ToolError;
use tpu_tools::consolidate::{self, ConsolidateOptions, discover_sheets};
use tpu_tools::model::{Record, SheetSummary};

fn valid_sheet(codes: &[&str]) -> String {
    let rows: Vec<Vec<&str>> = codes.iter().map(|code| vec![*code, "Classe"]).collect();
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    sheet_html(&["Código", "Descrição"], &rows)
}

#[test]
fn missing_directory_is_fatal_and_writes_nothing() {
    let temp_dir = tempdir().expect("temporary directory");
    let missing = temp_dir.path().join("nowhere");
    let output = temp_dir.path().join("out.json");

    let error = consolidate::run(&missing, &output, &ConsolidateOptions::default())
        .expect_err("directory rejected");

    assert!(matches!(error, ToolError::DirectoryNotFound(ref path) if *path == missing));
    assert_eq!(error.exit_code(), 1);
    assert!(!output.exists());
}

#[test]
fn file_path_is_not_a_directory() {
    let temp_dir = tempdir().expect("temporary directory");
    let file = write_sheet(temp_dir.path(), "a.xls", &valid_sheet(&["1"]));

    let error = discover_sheets(&file, "xls").expect_err("file rejected");

    assert!(matches!(error, ToolError::DirectoryNotFound(_)));
}

#[test]
fn directory_without_sheets_writes_nothing() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("input");
    fs::create_dir(&input).expect("input directory");
    fs::write(input.join("notes.txt"), "hello").expect("text written");
    write_sheet(&input, "modern.xlsx", &valid_sheet(&["1"]));
    fs::create_dir(input.join("nested.xls")).expect("nested directory");
    let output = temp_dir.path().join("out.json");

    let error = consolidate::run(&input, &output, &ConsolidateOptions::default())
        .expect_err("no sheets");

    assert!(matches!(error, ToolError::NoInputFiles { .. }));
    assert_eq!(error.exit_code(), 2);
    assert!(!output.exists());
}

#[test]
fn invalid_sheets_are_skipped_and_order_follows_file_names() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("input");
    fs::create_dir(&input).expect("input directory");
    write_sheet(&input, "65_Tabela_Classes_B.xls", &valid_sheet(&["1", "2", "3"]));
    write_sheet(
        &input,
        "65_Tabela_Classes_A.xls",
        &sheet_html(&["Nome"], &[&["ignored"]]),
    );
    let output = temp_dir.path().join("doctxt").join("classes.json");

    let consolidation = consolidate::run(&input, &output, &ConsolidateOptions::default())
        .expect("consolidated");

    assert_eq!(
        consolidation.sheets,
        vec![
            SheetSummary {
                file_name: "65_Tabela_Classes_A.xls".into(),
                records: 0
            },
            SheetSummary {
                file_name: "65_Tabela_Classes_B.xls".into(),
                records: 3
            },
        ]
    );

    let written = fs::read_to_string(&output).expect("output read");
    let parsed: Vec<Record> = serde_json::from_str(&written).expect("JSON parsed");
    let codes: Vec<&str> = parsed.iter().map(|record| record.code.as_str()).collect();
    assert_eq!(codes, vec!["1", "2", "3"]);
    assert!(parsed.iter().all(|record| record.source == "B"));
}

#[test]
fn records_follow_sheet_order_and_keep_duplicates() {
    let temp_dir = tempdir().expect("temporary directory");
    write_sheet(temp_dir.path(), "65_Tabela_Classes_Civel.xls", &valid_sheet(&["7", "8"]));
    write_sheet(temp_dir.path(), "65_Tabela_Classes_Criminal.XLS", &valid_sheet(&["9", "7"]));

    let consolidation =
        consolidate::consolidate(temp_dir.path(), &ConsolidateOptions::default())
            .expect("consolidated");

    let pairs: Vec<(&str, &str)> = consolidation
        .records
        .iter()
        .map(|record| (record.source.as_str(), record.code.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("Civel", "7"), ("Civel", "8"), ("Criminal", "9"), ("Criminal", "7")]
    );
    assert_eq!(consolidation.files_processed(), 2);
    assert_eq!(consolidation.total_records(), 4);
}

#[test]
fn sheets_without_records_signal_no_valid_data() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("input");
    fs::create_dir(&input).expect("input directory");
    write_sheet(&input, "a.xls", &sheet_html(&["Nome"], &[&["x"]]));
    write_sheet(&input, "b.xls", &sheet_html(&["Código"], &[]));
    fs::write(input.join("c.xls"), b"garbage").expect("garbage written");
    let output = temp_dir.path().join("out.json");

    let error = consolidate::run(&input, &output, &ConsolidateOptions::default())
        .expect_err("nothing to write");

    assert!(matches!(error, ToolError::NoValidData(_)));
    assert_eq!(error.exit_code(), 2);
    assert!(!output.exists());
}

#[test]
fn repeated_runs_write_identical_bytes() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("input");
    fs::create_dir(&input).expect("input directory");
    write_sheet(
        &input,
        "65_Tabela_Classes_Foo.xls",
        &sheet_html(
            &["Código", "Cód. Pai", "Sigla", "Descrição"],
            &[&["100", "", "R", "Root class"], &["101", "100", "", "Child"]],
        ),
    );
    write_sheet(&input, "65_Tabela_Classes_Bar.xls", &valid_sheet(&["5"]));
    let output = temp_dir.path().join("out.json");

    consolidate::run(&input, &output, &ConsolidateOptions::default()).expect("first run");
    let first = fs::read(&output).expect("first output");
    consolidate::run(&input, &output, &ConsolidateOptions::default()).expect("second run");
    let second = fs::read(&output).expect("second output");

    assert_eq!(first, second);

    let parsed: serde_json::Value = serde_json::from_slice(&first).expect("JSON parsed");
    assert_eq!(
        parsed,
        serde_json::json!([
            {"code": "5", "description": "Classe", "source": "Bar"},
            {"code": "100", "abbreviation": "R", "description": "Root class", "source": "Foo"},
            {"code": "101", "parent_code": "100", "description": "Child", "source": "Foo"}
        ])
    );
    assert!(String::from_utf8(first).expect("UTF-8 output").contains("\n  {"));
}

#[test]
fn existing_output_is_replaced() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("input");
    fs::create_dir(&input).expect("input directory");
    write_sheet(&input, "65_Tabela_Classes_Foo.xls", &valid_sheet(&["1"]));
    let output = temp_dir.path().join("out.json");
    fs::write(&output, "stale contents that are longer than the new file").expect("stale");

    consolidate::run(&input, &output, &ConsolidateOptions::default()).expect("consolidated");

    let parsed: Vec<Record> =
        serde_json::from_str(&fs::read_to_string(&output).expect("output read"))
            .expect("JSON parsed");
    let mut expected = Record::new("1", "Foo");
    expected.description = Some("Classe".into());
    assert_eq!(parsed, vec![expected]);
    assert!(!temp_dir.path().join("out.json.partial").exists());
}

#[test]
fn custom_extension_and_prefix_are_honoured() {
    let temp_dir = tempdir().expect("temporary directory");
    write_sheet(temp_dir.path(), "TPU_Assuntos.htm", &valid_sheet(&["42"]));
    write_sheet(temp_dir.path(), "65_Tabela_Classes_Foo.xls", &valid_sheet(&["1"]));
    let options = ConsolidateOptions {
        extension: "htm".into(),
        source_prefix: "TPU_".into(),
    };

    let consolidation =
        consolidate::consolidate(temp_dir.path(), &options).expect("consolidated");

    assert_eq!(consolidation.records.len(), 1);
    assert_eq!(consolidation.records[0].source, "Assuntos");
}

#[cfg(unix)]
#[test]
fn symlinked_sheets_are_included() {
    let temp_dir = tempdir().expect("temporary directory");
    let storage = temp_dir.path().join("storage");
    let input = temp_dir.path().join("input");
    fs::create_dir(&storage).expect("storage directory");
    fs::create_dir(&input).expect("input directory");
    let target = write_sheet(&storage, "real.xls", &valid_sheet(&["3"]));
    std::os::unix::fs::symlink(&target, input.join("65_Tabela_Classes_Link.xls"))
        .expect("symlink created");

    let consolidation =
        consolidate::consolidate(&input, &ConsolidateOptions::default()).expect("consolidated");

    assert_eq!(consolidation.records.len(), 1);
    assert_eq!(consolidation.records[0].source, "Link");
}

#[test]
fn leading_tilde_expands_to_home() {
    let home = std::path::Path::new("/home/ana");

    assert_eq!(
        consolidate::expand_home(std::path::Path::new("~/planilhas"), Some(home)),
        home.join("planilhas")
    );
    assert_eq!(
        consolidate::expand_home(std::path::Path::new("/data/~/x"), Some(home)),
        std::path::PathBuf::from("/data/~/x")
    );
    assert_eq!(
        consolidate::expand_home(std::path::Path::new("~/planilhas"), None),
        std::path::PathBuf::from("~/planilhas")
    );
}
