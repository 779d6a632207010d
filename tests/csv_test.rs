mod common;

use parsimony::prelude::*;
use pretty_assertions::assert_eq;

fn append<T>(mut left: Vec<T>, _: String, right: Vec<T>) -> Vec<T> {
    left.extend(right);
    left
}

fn csv() -> Parser<Vec<Vec<String>>> {
    let quoted = string("\"")
        .concat(
            &string("\"\"")
                .map(|_| "\"".to_string())
                .or(&regex("[^\"]"))
                .zero_or_more(|a, b| a + &b, String::new()),
        )
        .concat_left(&string("\""));
    let cell = quoted.or(&regex("[^\",\n]*"));

    let row_end = string("\n").or(&end().map(|_| String::new()));
    let row = row_end
        .not()
        .concat(&cell.map(|cell| vec![cell]).delimit(&string(","), append));
    let rows = row.map(|row| vec![row]).delimit(&string("\n"), append);

    rows.concat_left(&string("\n").optional())
        .concat_left(&end())
}

fn parse(input: &str) -> Result<Vec<Vec<String>>, ParseError> {
    csv().run(input).into_result().map(|(_, rows)| rows)
}

fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

#[test]
fn test_plain_rows() {
    assert_eq!(
        parse("a,b,c\n1,2,3"),
        Ok(table(&[&["a", "b", "c"], &["1", "2", "3"]]))
    );
    assert_eq!(
        parse("a,b,c\n1,2,3\n"),
        Ok(table(&[&["a", "b", "c"], &["1", "2", "3"]]))
    );
    assert_eq!(parse("a,,c"), Ok(table(&[&["a", "", "c"]])));
}

#[test]
fn test_quoted_cells() {
    assert_eq!(
        parse("\"a,b\",\"say \"\"hi\"\"\"\nx,y"),
        Ok(table(&[&["a,b", "say \"hi\""], &["x", "y"]]))
    );
    // 引用符の中では改行も値の一部
    assert_eq!(
        parse("\"multi\nline\",x"),
        Ok(table(&[&["multi\nline", "x"]]))
    );
}

#[test]
fn test_invalid_input() {
    assert!(parse("").is_err());
    assert_eq!(
        parse("\"unterminated"),
        Err(ParseError::new("Not reached to end of parsing", Some(0)))
    );
}
