use serde_json::Value;

use super::literal::{self, Literal};

/// Outcome of normalizing a raw genre field
///
/// Parsing is total: every input lands in exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreField {
    /// The field was a list of genre objects; names joined with ", "
    Parsed(String),
    /// The field was not a list of genre objects; the raw text is kept
    Raw(String),
    /// The field was missing or empty
    Empty,
}

impl GenreField {
    pub fn as_str(&self) -> &str {
        match self {
            GenreField::Parsed(text) | GenreField::Raw(text) => text,
            GenreField::Empty => "",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            GenreField::Parsed(text) | GenreField::Raw(text) => text,
            GenreField::Empty => String::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, GenreField::Raw(_))
    }
}

/// Normalizes genre text such as `[{'id': 28, 'name': 'Action'}]` into `Action`
pub fn parse_genres(raw: &str) -> GenreField {
    if raw.is_empty() {
        return GenreField::Empty;
    }
    match literal::parse(raw).ok().as_ref().and_then(join_names) {
        Some(names) => GenreField::Parsed(names),
        None => GenreField::Raw(raw.to_string()),
    }
}

/// Normalizes a genre field straight from a catalog record
///
/// Strings go through [`parse_genres`]; JSON arrays are already structured and
/// skip the literal parser. Other scalars are kept as their text.
pub fn parse_genre_value(value: Option<&Value>) -> GenreField {
    match value {
        None | Some(Value::Null) => GenreField::Empty,
        Some(Value::String(raw)) => parse_genres(raw),
        Some(value @ Value::Array(_)) => match join_names(&Literal::from_json(value)) {
            Some(names) => GenreField::Parsed(names),
            None => GenreField::Raw(value.to_string()),
        },
        Some(other) => GenreField::Raw(other.to_string()),
    }
}

/// Joins the `name` of every element of a list
///
/// A missing `name` contributes an empty string. Returns `None` when the value
/// is not a list, an element is not a dict, or a `name` is not a string.
fn join_names(value: &Literal) -> Option<String> {
    let Literal::List(items) = value else {
        return None;
    };
    let names = items
        .iter()
        .map(|item| match item {
            Literal::Dict(_) => match item.get("name") {
                Some(Literal::Str(name)) => Some(name.as_str()),
                Some(_) => None,
                None => Some(""),
            },
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(names.join(", "))
}
