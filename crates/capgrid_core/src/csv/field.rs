//! Field-level CSV primitives shared by export and import.
//!
//! Quoting follows RFC 4180: a double quote opens a quoted field only as the
//! first character of that field. Quotes anywhere else are literal text.

/// Escapes one field for output.
///
/// A field containing a comma, a double quote or a line break is wrapped in
/// double quotes with every inner quote doubled; anything else is verbatim.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// A quoted field still open when the input ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnclosedQuote {
    /// 1-based physical line on which the quoted field opened.
    pub line: usize,
}

/// Splits one record into fields with quote awareness.
///
/// Inside a quoted field a comma is literal and a doubled quote is one
/// literal quote. Fields are not trimmed.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                other => current.push(other),
            }
            continue;
        }
        match ch {
            '"' if at_field_start => in_quotes = true,
            ',' => {
                fields.push(std::mem::take(&mut current));
                at_field_start = true;
                continue;
            }
            other => current.push(other),
        }
        at_field_start = false;
    }
    fields.push(current);
    fields
}

/// Splits a document into non-blank records.
///
/// Records end at `\n`, `\r\n` or `\r` outside a quoted field; line breaks
/// inside one stay part of the record.
///
/// # Errors
/// Returns `UnclosedQuote` when a quoted field is never closed, instead of
/// folding the rest of the document into that field.
pub fn split_records(text: &str) -> Result<Vec<String>, UnclosedQuote> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line = 1;
    let mut quote_opened_on = 0;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                    current.push('"');
                    continue;
                }
                '"' => in_quotes = false,
                '\n' => line += 1,
                '\r' if chars.peek() != Some(&'\n') => line += 1,
                _ => {}
            }
            current.push(ch);
            continue;
        }
        match ch {
            '\r' | '\n' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                line += 1;
                push_record(&mut records, &mut current);
                at_field_start = true;
                continue;
            }
            '"' if at_field_start => {
                in_quotes = true;
                quote_opened_on = line;
            }
            _ => {}
        }
        at_field_start = ch == ',';
        current.push(ch);
    }

    if in_quotes {
        return Err(UnclosedQuote {
            line: quote_opened_on,
        });
    }
    push_record(&mut records, &mut current);
    Ok(records)
}

fn push_record(records: &mut Vec<String>, current: &mut String) {
    let record = std::mem::take(current);
    if !record.trim().is_empty() {
        records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_field, split_line, split_records, UnclosedQuote};

    #[test]
    fn plain_fields_are_verbatim() {
        assert_eq!(escape_field("Detection"), "Detection");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn special_fields_are_quoted_and_doubled() {
        assert_eq!(escape_field("good, fast"), "\"good, fast\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("a\nb"), "\"a\nb\"");
    }

    #[test]
    fn escaped_field_splits_back_to_original() {
        let original = "comma, \"quote\" and\nnewline";
        let line = format!("Perf,Description,{},tail", escape_field(original));
        let fields = split_line(&line);
        assert_eq!(fields, vec!["Perf", "Description", original, "tail"]);
    }

    #[test]
    fn split_line_keeps_empty_and_untrimmed_fields() {
        assert_eq!(split_line("a,,b ,"), vec!["a", "", "b ", ""]);
    }

    #[test]
    fn mid_field_quotes_are_literal() {
        assert_eq!(
            split_line("Size,Description,15\" screen,x"),
            vec!["Size", "Description", "15\" screen", "x"]
        );
    }

    #[test]
    fn split_records_handles_mixed_line_endings_and_blank_lines() {
        let records = split_records("h1,h2\r\n\r\nr1,x\nr2,y\rr3,z\n").unwrap();
        assert_eq!(records, vec!["h1,h2", "r1,x", "r2,y", "r3,z"]);
    }

    #[test]
    fn split_records_keeps_quoted_line_breaks() {
        let records = split_records("h\r\nPerf,\"line1\r\nline2\"\r\nnext").unwrap();
        assert_eq!(records, vec!["h", "Perf,\"line1\r\nline2\"", "next"]);
        assert_eq!(split_line(&records[1])[1], "line1\r\nline2");
    }

    #[test]
    fn split_records_treats_mid_field_quote_as_text() {
        let records = split_records("h\nSize,Description,15\" screen\nCost,Score,3\n").unwrap();
        assert_eq!(
            records,
            vec!["h", "Size,Description,15\" screen", "Cost,Score,3"]
        );
    }

    #[test]
    fn split_records_keeps_doubled_quotes_for_the_field_splitter() {
        let records = split_records("h\nP,\"say \"\"hi\"\"\nthere\",x\n").unwrap();
        assert_eq!(records, vec!["h", "P,\"say \"\"hi\"\"\nthere\",x"]);
        assert_eq!(split_line(&records[1])[1], "say \"hi\"\nthere");
    }

    #[test]
    fn unclosed_quoted_field_is_rejected_with_its_line() {
        let err = split_records("h\nPerf,Score,1\nPerf,Description,\"open\nCost,Score,3\n")
            .unwrap_err();
        assert_eq!(err, UnclosedQuote { line: 3 });
    }
}
