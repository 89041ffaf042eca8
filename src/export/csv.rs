//! Minimal RFC 4180 writer for the comment table.

use std::borrow::Cow;

use crate::core::Comment;

pub const HEADER: [&str; 4] = ["author", "text", "like_count", "published_at"];

/// Quote a field when it holds a delimiter, quote or line break; inner quotes are doubled.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape_field(field));
    }
    out.push_str("\r\n");
}

/// Render comments as CSV with a header row. Text is exported as plain text.
pub fn comments_to_csv(comments: &[Comment]) -> String {
    let mut out = String::new();
    push_record(&mut out, HEADER);
    for comment in comments {
        let text = comment.plain_text();
        let likes = comment.like_count.to_string();
        let published = comment.published_at.to_rfc3339();
        push_record(
            &mut out,
            [
                comment.author.as_str(),
                text.as_str(),
                likes.as_str(),
                published.as_str(),
            ],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn plain_fields_are_left_alone() {
        assert_eq!(escape_field("hello world"), "hello world");
        assert!(matches!(escape_field("x"), Cow::Borrowed(_)));
    }

    #[test]
    fn delimiters_and_quotes_are_quoted() {
        assert_eq!(escape_field("a, b"), "\"a, b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn renders_header_and_rows() {
        let comments = vec![Comment {
            author: "Doe, Jane".into(),
            text: "Loved it, &quot;really&quot;<br>thanks".into(),
            like_count: 12,
            published_at: Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap(),
        }];
        let csv = comments_to_csv(&comments);
        let mut lines = csv.split("\r\n");
        assert_eq!(lines.next(), Some("author,text,like_count,published_at"));
        assert_eq!(
            lines.next(),
            Some("\"Doe, Jane\",\"Loved it, \"\"really\"\"\nthanks\",12,2024-02-03T04:05:06+00:00")
        );
    }
}
