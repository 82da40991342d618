// tests/unit_ingest.rs
use powerscan_core::files::InputFile;
use powerscan_core::ingest::ingest_report;
use powerscan_core::report::parse_report;
use powerscan_core::sink::MemorySink;
use powerscan_core::text::TextPointer;

fn file() -> InputFile {
    // 4 lines: lengths 16, 10, 12, 0
    InputFile::from_source(
        "n_cst_string.sru".into(),
        "integer li_count\n// comment\nend function\n",
    )
}

fn ingest(json: &str) -> (InputFile, MemorySink) {
    let file = file();
    let sink = MemorySink::new();
    let report = parse_report(json).expect("test report must parse");
    ingest_report(&sink, &file, &report);
    (file, sink)
}

#[test]
fn empty_report_produces_nothing() {
    let (file, sink) = ingest("{}");
    let records = sink.file_records(&file);
    assert!(records.issues.is_empty());
    assert!(records.metrics.is_empty());
    assert!(records.code_lines.is_empty());
    assert!(records.no_check_lines.is_empty());
    assert!(records.symbols.is_empty());
    assert!(records.cpd_tokens.is_empty());
    assert!(records.highlights.is_empty());
    assert!(records.errors.is_empty());
}

#[test]
fn issues_get_the_rule_prefix_back() {
    let (file, sink) = ingest(
        r#"{"Issues": [{
            "Rule": "EmptyCatch",
            "Location": {"Start": {"Line": 1, "LineOffset": 0}, "End": {"Line": 1, "LineOffset": 7}},
            "Message": "Remove this empty catch block"
        }]}"#,
    );
    let records = sink.file_records(&file);
    assert_eq!(records.issues.len(), 1);
    let issue = &records.issues[0];
    assert_eq!(issue.rule_key, "PBEmptyCatch");
    assert_eq!(issue.range.start(), TextPointer::new(1, 0));
    assert_eq!(issue.range.end(), TextPointer::new(1, 7));
    assert_eq!(issue.message, "Remove this empty catch block");
}

#[test]
fn eof_sentinel_issue_spans_the_last_line() {
    // line 4 is the last (empty) line; offsets are placeholders
    let (file, sink) = ingest(
        r#"{"Issues": [{
            "Rule": "SyntaxError",
            "Location": {"Start": {"Line": 4, "LineOffset": 0}, "End": {"Line": 4, "LineOffset": 1}},
            "Message": "unexpected end of file"
        }]}"#,
    );
    let records = sink.file_records(&file);
    assert_eq!(records.issues.len(), 1);
    assert_eq!(records.issues[0].range, file.select_line(4));
}

#[test]
fn metrics_fan_out_per_code_line() {
    let (file, sink) = ingest(
        r#"{"Metrics": {
            "ClassCount": 1,
            "StatementCount": 5,
            "FunctionCount": 2,
            "LinesOfCode": [1, 3],
            "CommentLines": [2],
            "CyclomaticComplexity": 3,
            "CognitiveComplexity": 4
        }}"#,
    );
    let records = sink.file_records(&file);
    assert_eq!(records.metrics["classes"], 1);
    assert_eq!(records.metrics["statements"], 5);
    assert_eq!(records.metrics["functions"], 2);
    assert_eq!(records.metrics["ncloc"], 2);
    assert_eq!(records.metrics["comment_lines"], 1);
    assert_eq!(records.metrics["complexity"], 3);
    assert_eq!(records.metrics["cognitive_complexity"], 4);
    assert_eq!(records.code_lines, vec![1, 3]);
}

#[test]
fn no_sonar_lines_are_registered() {
    let (file, sink) = ingest(r#"{"NoSonarLines": [2, 3, 2]}"#);
    let records = sink.file_records(&file);
    assert_eq!(records.no_check_lines.into_iter().collect::<Vec<_>>(), vec![2, 3]);
}

#[test]
fn symbols_keep_reference_order() {
    let (file, sink) = ingest(
        r#"{"SymbolTable": [{
            "Position": {"Start": {"Line": 1, "LineOffset": 8}, "End": {"Line": 1, "LineOffset": 16}},
            "References": [
                {"Start": {"Line": 3, "LineOffset": 0}, "End": {"Line": 3, "LineOffset": 3}},
                {"Start": {"Line": 2, "LineOffset": 3}, "End": {"Line": 2, "LineOffset": 10}}
            ]
        }]}"#,
    );
    let records = sink.file_records(&file);
    assert_eq!(records.symbols.len(), 1);
    let symbol = &records.symbols[0];
    assert_eq!(symbol.declaration.start(), TextPointer::new(1, 8));
    assert_eq!(symbol.references.len(), 2);
    assert_eq!(symbol.references[0].start(), TextPointer::new(3, 0));
    assert_eq!(symbol.references[1].start(), TextPointer::new(2, 3));
}

#[test]
fn symbol_without_references_is_fine() {
    let (file, sink) = ingest(
        r#"{"SymbolTable": [{
            "Position": {"Start": {"Line": 1, "LineOffset": 0}, "End": {"Line": 1, "LineOffset": 7}}
        }]}"#,
    );
    let records = sink.file_records(&file);
    assert_eq!(records.symbols.len(), 1);
    assert!(records.symbols[0].references.is_empty());
}

#[test]
fn engine_reported_errors_carry_detail() {
    let (file, sink) = ingest(
        r#"{"AnalysisErrors": [
            {"Message": "lexer gave up", "StackTrace": "at Lexer.Scan()"},
            {"Message": "no trace here"}
        ]}"#,
    );
    let records = sink.file_records(&file);
    assert_eq!(records.errors.len(), 2);
    assert_eq!(records.errors[0].message, "lexer gave up");
    assert_eq!(records.errors[0].detail.as_deref(), Some("at Lexer.Scan()"));
    assert!(records.errors[1].detail.is_none());
}

#[test]
fn out_of_bounds_issue_abandons_only_that_section() {
    // Issue offset 17 exceeds line 1 (16 chars); highlight section is valid.
    let (file, sink) = ingest(
        r#"{
            "Issues": [{
                "Rule": "LineLength",
                "Location": {"Start": {"Line": 1, "LineOffset": 0}, "End": {"Line": 1, "LineOffset": 17}},
                "Message": "too long"
            }],
            "Highlightings": [{
                "Position": {"Start": {"Line": 2, "LineOffset": 0}, "End": {"Line": 2, "LineOffset": 10}},
                "TypeOfText": "comment"
            }]
        }"#,
    );
    let records = sink.file_records(&file);
    assert!(records.issues.is_empty());
    assert_eq!(records.errors.len(), 1);
    assert!(records.errors[0].message.starts_with("RangeError:"), "{}", records.errors[0].message);
    assert_eq!(records.highlights.len(), 1);
}

#[test]
fn unknown_category_abandons_only_the_highlight_section() {
    let (file, sink) = ingest(
        r#"{
            "Highlightings": [{
                "Position": {"Start": {"Line": 2, "LineOffset": 0}, "End": {"Line": 2, "LineOffset": 10}},
                "TypeOfText": "glitter"
            }],
            "NoSonarLines": [1]
        }"#,
    );
    let records = sink.file_records(&file);
    assert!(records.highlights.is_empty());
    assert_eq!(records.errors.len(), 1);
    assert!(
        records.errors[0].message.starts_with("UnknownCategoryError:"),
        "{}",
        records.errors[0].message
    );
    assert_eq!(records.no_check_lines.len(), 1);
}

#[test]
fn cpd_tokens_keep_stream_order() {
    let (file, sink) = ingest(
        r#"{"CpdTokens": [
            {"Position": {"Start": {"Line": 1, "LineOffset": 0}, "End": {"Line": 1, "LineOffset": 7}}, "Image": "integer"},
            {"Position": {"Start": {"Line": 1, "LineOffset": 8}, "End": {"Line": 1, "LineOffset": 16}}, "Image": "IDENT"}
        ]}"#,
    );
    let records = sink.file_records(&file);
    assert_eq!(records.cpd_tokens.len(), 2);
    assert_eq!(records.cpd_tokens[0].image, "integer");
    assert_eq!(records.cpd_tokens[1].image, "IDENT");
}

#[test]
fn highlight_categories_are_normalized() {
    let (file, sink) = ingest(
        r#"{"Highlightings": [{
            "Position": {"Start": {"Line": 2, "LineOffset": 0}, "End": {"Line": 2, "LineOffset": 10}},
            "TypeOfText": "structuredComment"
        }]}"#,
    );
    let records = sink.file_records(&file);
    assert_eq!(records.highlights.len(), 1);
    let json = serde_json::to_string(&records.highlights[0].category).unwrap();
    assert_eq!(json, "\"STRUCTURED_COMMENT\"");
}
