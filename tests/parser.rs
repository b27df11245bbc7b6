use csv_dialects::syntax::CsvParser;
use csv_dialects::Dialect;

fn rows(text: &str, dialect: Dialect) -> Vec<Vec<String>> {
    CsvParser::from_str(text, dialect).read_all().unwrap()
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

#[test]
fn newline_variants_normalize_to_one_record_each() {
    for dialect in [Dialect::rfc4180(), Dialect::excel()] {
        for input in ["a\r\nb\r\nc", "a\nb\nc", "a\rb\rc"] {
            let got = rows(input, dialect.clone());
            assert_eq!(
                got,
                vec![row(&["a"]), row(&["b"]), row(&["c"])],
                "input {input:?} under {dialect:?}"
            );
        }
    }
}

#[test]
fn empty_input_yields_end_of_stream_immediately() {
    let mut p = CsvParser::from_str("", Dialect::rfc4180());
    assert_eq!(p.read_row().unwrap(), None);
}

#[test]
fn final_record_without_trailing_newline_is_returned_in_full() {
    assert_eq!(
        rows("a,b\nc,d", Dialect::rfc4180()),
        vec![row(&["a", "b"]), row(&["c", "d"])]
    );
}

#[test]
fn trailing_delimiter_produces_a_final_empty_field() {
    assert_eq!(rows("a,", Dialect::rfc4180()), vec![row(&["a", ""])]);
    assert_eq!(rows("a,\n", Dialect::rfc4180()), vec![row(&["a", ""])]);
}

#[test]
fn blank_physical_line_is_a_one_element_record() {
    assert_eq!(
        rows("a\n\nb\n", Dialect::rfc4180()),
        vec![row(&["a"]), row(&[""]), row(&["b"])]
    );
}

#[test]
fn quoted_fields_keep_delimiters_and_newlines() {
    let got = rows("\"a,b\",\"c\nd\"\n", Dialect::rfc4180());
    assert_eq!(got, vec![row(&["a,b", "c\nd"])]);
}

#[test]
fn doubled_quote_encodes_one_literal_quote() {
    let got = rows("\"he said \"\"hi\"\"\"\n", Dialect::rfc4180());
    assert_eq!(got, vec![row(&["he said \"hi\""])]);
}

#[test]
fn rfc4180_rejects_text_after_closing_quote() {
    let err = CsvParser::from_str("\"a\"b\n", Dialect::rfc4180())
        .read_row()
        .unwrap_err();
    assert!(err.to_string().contains("after closing quote"));
}

#[test]
fn rfc4180_rejects_quote_inside_unquoted_field() {
    let err = CsvParser::from_str("a\"b\n", Dialect::rfc4180())
        .read_row()
        .unwrap_err();
    assert!(err.to_string().contains("unexpected quote"));
}

#[test]
fn rfc4180_rejects_unterminated_quote_at_eof() {
    let err = CsvParser::from_str("\"never closed", Dialect::rfc4180())
        .read_row()
        .unwrap_err();
    assert!(err.to_string().contains("unterminated"));
}

#[test]
fn excel_skips_whitespace_around_quoted_fields() {
    let got = rows("a, \"b c\" ,d\r\n", Dialect::excel());
    assert_eq!(got, vec![row(&["a", "b c", "d"])]);
}

#[test]
fn excel_treats_stray_quotes_as_literal() {
    let got = rows("5\" pipe,b\r\n", Dialect::excel());
    assert_eq!(got, vec![row(&["5\" pipe", "b"])]);
}

#[test]
fn excel_reinterprets_text_after_closing_quote_as_unquoted() {
    let got = rows("\"ab\"cd,e\r\n", Dialect::excel());
    assert_eq!(got, vec![row(&["abcd", "e"])]);
}

#[test]
fn excel_semicolon_delimits_on_semicolons() {
    let got = rows("a;b,c\r\n", Dialect::excel_semicolon());
    assert_eq!(got, vec![row(&["a", "b,c"])]);
}

#[test]
fn tsv_has_no_quoting_at_all() {
    let got = rows("a\t\"b\"\tc\n", Dialect::tsv());
    assert_eq!(got, vec![row(&["a", "\"b\"", "c"])]);
}

#[test]
fn json_csv_backslash_escapes_delimiter_and_quote() {
    let got = rows("a\\,b,c\n", Dialect::json_csv());
    assert_eq!(got, vec![row(&["a,b", "c"])]);

    let got = rows("\"a\\\"b\"\n", Dialect::json_csv());
    assert_eq!(got, vec![row(&["a\"b"])]);
}

#[test]
fn json_csv_tolerates_unbalanced_quote_at_eof() {
    let got = rows("a,\"never closed", Dialect::json_csv());
    assert_eq!(got, vec![row(&["a", "never closed"])]);
}

#[test]
fn line_numbers_advance_per_logical_newline() {
    let mut p = CsvParser::from_str("a\r\nb\nc", Dialect::rfc4180());
    assert_eq!(p.line(), 1);
    p.read_row().unwrap();
    assert_eq!(p.line(), 2);
    p.read_row().unwrap();
    assert_eq!(p.line(), 3);
}

#[test]
fn custom_dialect_with_pipe_delimiter() {
    let dialect = Dialect::builder().delimiter('|').build().unwrap();
    let got = rows("a|b|\"c|d\"\n", dialect);
    assert_eq!(got, vec![row(&["a", "b", "c|d"])]);
}
