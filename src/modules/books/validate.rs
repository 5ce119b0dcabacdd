//! Structural validation of inbound book payloads.
//!
//! The schema is a fixed, ordered field table; validation walks it and
//! reports one human-readable message per violated constraint, in schema
//! order. Create and update share the same contract: the full payload is
//! required both times.

use serde_json::Value;

use super::models::BookData;

const MIN_YEAR: i64 = 1000;

#[derive(Debug, Clone, Copy)]
enum FieldRule {
    NonEmptyText,
    Uri,
    PositiveInt,
    Year,
}

const BOOK_SCHEMA: &[(&str, FieldRule)] = &[
    ("isbn", FieldRule::NonEmptyText),
    ("amazon_url", FieldRule::Uri),
    ("author", FieldRule::NonEmptyText),
    ("language", FieldRule::NonEmptyText),
    ("pages", FieldRule::PositiveInt),
    ("publisher", FieldRule::NonEmptyText),
    ("title", FieldRule::NonEmptyText),
    ("year", FieldRule::Year),
];

/// Check an arbitrary payload against the book schema.
///
/// Returns the parsed payload when every constraint holds, otherwise the
/// ordered list of violations. Pure function of the payload and the schema;
/// the store is never consulted.
pub fn validate_book(payload: &Value) -> Result<BookData, Vec<String>> {
    let Some(object) = payload.as_object() else {
        return Err(vec!["payload must be a JSON object".to_string()]);
    };

    let mut errors = Vec::new();
    for (name, rule) in BOOK_SCHEMA {
        match object.get(*name) {
            None | Some(Value::Null) => {
                errors.push(format!("missing required field \"{name}\""));
            }
            Some(value) => {
                if let Some(message) = check_field(name, *rule, value) {
                    errors.push(message);
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value(payload.clone())
        .map_err(|err| vec![format!("payload does not match the book schema: {err}")])
}

fn check_field(name: &str, rule: FieldRule, value: &Value) -> Option<String> {
    match rule {
        FieldRule::NonEmptyText => match value.as_str() {
            Some(text) if !text.trim().is_empty() => None,
            _ => Some(format!("field \"{name}\" must be a non-empty string")),
        },
        FieldRule::Uri => match value.as_str() {
            Some(text) if url::Url::parse(text).is_ok() => None,
            _ => Some(format!("field \"{name}\" must be a valid URI")),
        },
        FieldRule::PositiveInt => match value.as_i64() {
            Some(n) if n > 0 && n <= i64::from(i32::MAX) => None,
            _ => Some(format!("field \"{name}\" must be a positive integer")),
        },
        FieldRule::Year => {
            let max_year = i64::from(time::OffsetDateTime::now_utc().year()) + 1;
            match value.as_i64() {
                Some(n) if (MIN_YEAR..=max_year).contains(&n) => None,
                _ => Some(format!(
                    "field \"{name}\" must be an integer between {MIN_YEAR} and {max_year}"
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_payload() -> Value {
        json!({
            "isbn": "0691161518",
            "amazon_url": "http://a.co/eobPtX2",
            "author": "Matthew Lane",
            "language": "english",
            "pages": 264,
            "publisher": "Princeton University Press",
            "title": "Power-Up: Unlocking the Hidden Mathematics in Video Games",
            "year": 2017
        })
    }

    #[test]
    fn accepts_a_complete_valid_payload() {
        let data = validate_book(&full_payload()).unwrap();
        assert_eq!(data.isbn, "0691161518");
        assert_eq!(data.author, "Matthew Lane");
        assert_eq!(data.pages, 264);
        assert_eq!(data.year, 2017);
    }

    #[test]
    fn empty_object_reports_every_field_in_schema_order() {
        let errors = validate_book(&json!({})).unwrap_err();
        assert_eq!(errors.len(), 8);
        assert_eq!(errors[0], "missing required field \"isbn\"");
        assert_eq!(errors[1], "missing required field \"amazon_url\"");
        assert_eq!(errors[7], "missing required field \"year\"");
    }

    #[test]
    fn partial_payload_is_rejected() {
        let errors = validate_book(&json!({
            "isbn": "0691161518",
            "title": "Power-Up"
        }))
        .unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.iter().all(|e| e.starts_with("missing required field")));
    }

    #[test]
    fn non_object_payloads_are_rejected() {
        for payload in [json!([]), json!("book"), json!(42), Value::Null] {
            let errors = validate_book(&payload).unwrap_err();
            assert_eq!(errors, vec!["payload must be a JSON object".to_string()]);
        }
    }

    #[test]
    fn null_fields_count_as_missing() {
        let mut payload = full_payload();
        payload["author"] = Value::Null;
        let errors = validate_book(&payload).unwrap_err();
        assert_eq!(errors, vec!["missing required field \"author\"".to_string()]);
    }

    #[test]
    fn empty_strings_are_rejected() {
        let mut payload = full_payload();
        payload["publisher"] = json!("   ");
        let errors = validate_book(&payload).unwrap_err();
        assert_eq!(
            errors,
            vec!["field \"publisher\" must be a non-empty string".to_string()]
        );
    }

    #[test]
    fn amazon_url_must_parse_as_uri() {
        let mut payload = full_payload();
        payload["amazon_url"] = json!("not a url");
        let errors = validate_book(&payload).unwrap_err();
        assert_eq!(errors, vec!["field \"amazon_url\" must be a valid URI".to_string()]);
    }

    #[test]
    fn pages_must_be_a_positive_integer() {
        for bad in [json!(0), json!(-5), json!(2.5), json!("264"), json!(i64::MAX)] {
            let mut payload = full_payload();
            payload["pages"] = bad;
            let errors = validate_book(&payload).unwrap_err();
            assert_eq!(
                errors,
                vec!["field \"pages\" must be a positive integer".to_string()]
            );
        }
    }

    #[test]
    fn year_must_be_plausible() {
        for bad in [json!(999), json!(3000), json!("2017")] {
            let mut payload = full_payload();
            payload["year"] = bad;
            let errors = validate_book(&payload).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert!(errors[0].starts_with("field \"year\" must be an integer between"));
        }
    }

    #[test]
    fn next_year_is_accepted_for_forthcoming_titles() {
        let mut payload = full_payload();
        payload["year"] = json!(time::OffsetDateTime::now_utc().year() + 1);
        assert!(validate_book(&payload).is_ok());
    }

    #[test]
    fn unknown_extra_fields_are_ignored() {
        let mut payload = full_payload();
        payload["edition"] = json!("first");
        assert!(validate_book(&payload).is_ok());
    }

    #[test]
    fn violations_accumulate_across_fields() {
        let mut payload = full_payload();
        payload["pages"] = json!(-1);
        payload["year"] = json!(1);
        let errors = validate_book(&payload).unwrap_err();
        assert_eq!(errors.len(), 2);
        // Schema order: pages before year.
        assert!(errors[0].contains("pages"));
        assert!(errors[1].contains("year"));
    }
}
