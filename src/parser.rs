// ABOUTME: Parser module - the reader that turns source text into a Value tree

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1},
    combinator::{opt, recognize},
    IResult, Parser,
};

use crate::error::ParseError;
use crate::value::Value;
use std::collections::VecDeque;

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_+-*\\/=<>!&".contains(c)
}

/// Byte offset of `rest` into `source`, used to locate parse errors. Callers
/// hold only ASCII-range positions meaningfully (see the crate's Unicode
/// identifier non-goal); this is a byte, not a grapheme, offset.
fn offset(source: &str, rest: &str) -> usize {
    source.len() - rest.len()
}

fn skip_ws(mut input: &str) -> &str {
    loop {
        let trimmed = input.trim_start_matches([' ', '\t', '\r', '\n']);
        if let Some(rest) = trimmed.strip_prefix(';') {
            input = match rest.find('\n') {
                Some(i) => &rest[i..],
                None => "",
            };
            continue;
        }
        if trimmed.len() == input.len() {
            return trimmed;
        }
        input = trimmed;
    }
}

fn parse_number(input: &str) -> IResult<&str, &str> {
    recognize((
        opt(alt((char('+'), char('-')))),
        digit1,
        opt((char('.'), digit1)),
    ))
    .parse(input)
}

/// Parses a number token into Integer or Double per the collapse rule: a
/// `.`-containing token is a Double unless its fractional part is all
/// zeros and the integral part fits an i64, in which case it collapses to
/// Integer. A dot-less token is always Integer.
fn make_number(text: &str) -> Value {
    match text.find('.') {
        Some(dot) => {
            let fraction = &text[dot + 1..];
            if fraction.bytes().all(|b| b == b'0') {
                if let Ok(i) = text[..dot].parse::<i64>() {
                    return Value::Integer(i);
                }
            }
            Value::Double(text.parse().expect("validated by grammar"))
        }
        // The grammar only bounds the token's shape, not its magnitude: a
        // dot-free run of digits too wide for i64 (e.g. 20 nines) still
        // parses here, so fall back to Double rather than unwrap an Err.
        None => match text.parse::<i64>() {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Double(text.parse().expect("validated by grammar")),
        },
    }
}

fn parse_symbol(input: &str) -> IResult<&str, Value> {
    let (rest, text) = take_while1(is_symbol_char)(input)?;
    Ok((rest, Value::Symbol(text.to_string())))
}

fn read_atom<'a>(source: &str, input: &'a str) -> Result<(&'a str, Value), ParseError> {
    if let Ok((rest, text)) = parse_number(input) {
        return Ok((rest, make_number(text)));
    }
    if let Ok((rest, value)) = parse_symbol(input) {
        return Ok((rest, value));
    }
    let bad_char = input.chars().next().unwrap();
    Err(ParseError::new(
        format!("unexpected character '{}'", bad_char),
        offset(source, input),
        bad_char.len_utf8(),
    ))
}

fn read_string<'a>(source: &str, input: &'a str) -> Result<(&'a str, Value), ParseError> {
    let start = offset(source, input);
    let mut iter = input.char_indices();
    iter.next(); // the opening quote
    for (i, c) in iter {
        if c == '"' {
            let content = &input[1..i];
            return Ok((&input[i + 1..], Value::String(content.to_string())));
        }
    }
    Err(ParseError::new(
        "unterminated string literal",
        start,
        input.len(),
    ))
}

fn read_expr<'a>(
    source: &str,
    mut input: &'a str,
    close: char,
    is_qexpr: bool,
) -> Result<(&'a str, Value), ParseError> {
    let mut cells = VecDeque::new();
    loop {
        input = skip_ws(input);
        match input.chars().next() {
            None => {
                return Err(ParseError::new(
                    format!("unterminated expression, expected '{}'", close),
                    offset(source, input),
                    0,
                ))
            }
            Some(c) if c == close => {
                input = &input[c.len_utf8()..];
                break;
            }
            _ => {
                let (rest, value) = read_value(source, input)?;
                cells.push_back(value);
                input = rest;
            }
        }
    }
    let expr = if is_qexpr {
        Value::QExpression(cells)
    } else {
        Value::SExpression(cells)
    };
    Ok((input, expr))
}

fn read_value<'a>(source: &str, input: &'a str) -> Result<(&'a str, Value), ParseError> {
    let input = skip_ws(input);
    match input.chars().next() {
        None => Err(ParseError::new(
            "unexpected end of input",
            offset(source, input),
            0,
        )),
        Some('(') => read_expr(source, &input[1..], ')', false),
        Some('[') => read_expr(source, &input[1..], ']', true),
        Some(c @ (')' | ']')) => Err(ParseError::new(
            format!("unexpected '{}'", c),
            offset(source, input),
            1,
        )),
        Some('"') => read_string(source, input),
        _ => read_atom(source, input),
    }
}

/// Parses `source` into a single top-level `SExpression` wrapping every
/// form found (empty input yields an empty `SExpression`).
pub fn parse(source: &str) -> Result<Value, ParseError> {
    let mut rest = source;
    let mut top = VecDeque::new();
    loop {
        rest = skip_ws(rest);
        if rest.is_empty() {
            break;
        }
        let (next_rest, value) = read_value(source, rest)?;
        top.push_back(value);
        rest = next_rest;
    }
    Ok(Value::SExpression(top))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(src: &str) -> Value {
        let parsed = parse(src).unwrap();
        let mut cells = parsed.into_cells("test").unwrap();
        assert_eq!(cells.len(), 1, "expected exactly one top-level form");
        cells.pop_front().unwrap()
    }

    #[test]
    fn test_empty_input_is_empty_sexpression() {
        let parsed = parse("").unwrap();
        assert!(matches!(parsed, Value::SExpression(cells) if cells.is_empty()));
        let parsed = parse("   ; just a comment\n").unwrap();
        assert!(matches!(parsed, Value::SExpression(cells) if cells.is_empty()));
    }

    #[test]
    fn test_integers_and_doubles() {
        assert!(matches!(parse_one("42"), Value::Integer(42)));
        assert!(matches!(parse_one("-7"), Value::Integer(-7)));
        assert!(matches!(parse_one("3.5"), Value::Double(d) if (d - 3.5).abs() < 1e-9));
    }

    #[test]
    fn test_trailing_zero_fraction_collapses_to_integer() {
        assert!(matches!(parse_one("3.0"), Value::Integer(3)));
        assert!(matches!(parse_one("-3.00"), Value::Integer(-3)));
    }

    #[test]
    fn test_plus_minus_without_digit_is_symbol() {
        assert!(matches!(parse_one("+"), Value::Symbol(s) if s == "+"));
        assert!(matches!(parse_one("-"), Value::Symbol(s) if s == "-"));
    }

    #[test]
    fn test_symbol_chars() {
        assert!(matches!(parse_one("foo-bar_1"), Value::Symbol(s) if s == "foo-bar_1"));
        assert!(matches!(parse_one("<="), Value::Symbol(s) if s == "<="));
        assert!(matches!(parse_one("&"), Value::Symbol(s) if s == "&"));
    }

    #[test]
    fn test_backslash_is_a_symbol_char() {
        assert!(matches!(parse_one("\\"), Value::Symbol(s) if s == "\\"));
        let parsed = parse_one("(\\ [x] x)");
        assert!(matches!(parsed, Value::SExpression(cells) if cells.len() == 3));
    }

    #[test]
    fn test_overly_wide_integer_literal_falls_back_to_double() {
        assert!(matches!(parse_one("99999999999999999999"), Value::Double(_)));
    }

    #[test]
    fn test_string_has_no_escape_processing() {
        assert!(matches!(parse_one(r#""a\nb""#), Value::String(s) if s == r"a\nb"));
    }

    #[test]
    fn test_sexpression_and_qexpression() {
        let parsed = parse_one("(+ 1 2)");
        assert!(matches!(parsed, Value::SExpression(cells) if cells.len() == 3));
        let parsed = parse_one("[1 2 3]");
        assert!(matches!(parsed, Value::QExpression(cells) if cells.len() == 3));
    }

    #[test]
    fn test_comments_are_skipped() {
        let parsed = parse_one("(+ 1 2) ; trailing comment");
        assert!(matches!(parsed, Value::SExpression(_)));
        let parsed = parse("; leading comment\n(+ 1 2)").unwrap();
        let cells = parsed.into_cells("test").unwrap();
        assert_eq!(cells.len(), 1);
    }

    #[test]
    fn test_multiple_top_level_forms() {
        let parsed = parse("(def [x] 1) x").unwrap();
        let cells = parsed.into_cells("test").unwrap();
        assert_eq!(cells.len(), 2);
    }

    #[test]
    fn test_unterminated_string_reports_location() {
        let err = parse(r#"(+ 1 "abc)"#).unwrap_err();
        assert_eq!(err.begin, 5);
    }

    #[test]
    fn test_unterminated_sexpression_reports_location() {
        let err = parse("(+ 1 2").unwrap_err();
        assert_eq!(err.begin, 6);
    }

    #[test]
    fn test_mismatched_closing_bracket() {
        let err = parse("(+ 1 2]").unwrap_err();
        assert_eq!(err.begin, 6);
    }

    #[test]
    fn test_unexpected_closing_bracket_at_top_level() {
        let err = parse(")").unwrap_err();
        assert_eq!(err.begin, 0);
    }
}
