//! Physical naming conventions.
//!
//! These names are part of the storage contract with the database, so they
//! must stay bit-for-bit stable:
//!
//! - tables: `snake_case(plural(Type))`
//! - join tables: `snake_case(plural("{left}_{label}_{right}"))`
//! - foreign keys: `snake_case("{label}_{from}_id")` (in) or
//!   `snake_case("{label}_by_{from}_id")` (out)

use crate::path_parser::ast::Direction;

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("woman", "women"),
    ("man", "men"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
];

const UNCOUNTABLE: &[&str] = &["sheep", "series", "species", "news", "equipment"];

/// Lower-case words joined by `_`, split on non-alphanumerics and camel-case
/// boundaries (`BlogPost` -> `blog_post`, `HTMLPage` -> `html_page`).
pub fn snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("_")
}

/// Pluralise the trailing word of `word`, keeping everything before it.
pub fn plural(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    for uncountable in UNCOUNTABLE {
        if lower.ends_with(uncountable) && starts_word(word, word.len() - uncountable.len()) {
            return word.to_string();
        }
    }

    for (singular, plural) in IRREGULAR_PLURALS {
        if lower.ends_with(singular) {
            let start = word.len() - singular.len();
            if starts_word(word, start) {
                return format!("{}{}", &word[..start], match_case(&word[start..], plural));
            }
        }
    }

    let shout = word
        .chars()
        .last()
        .is_some_and(|c| c.is_ascii_uppercase())
        && word.len() > 1
        && word.chars().rev().nth(1).is_some_and(|c| c.is_ascii_uppercase());
    let suffix = |s: &str| {
        if shout {
            s.to_ascii_uppercase()
        } else {
            s.to_string()
        }
    };

    if ["s", "x", "z", "ch", "sh"].iter().any(|end| lower.ends_with(end)) {
        return format!("{}{}", word, suffix("es"));
    }

    if lower.ends_with('y') {
        let before_y = lower.chars().rev().nth(1);
        if before_y.is_some_and(|c| c.is_ascii_alphabetic() && !"aeiou".contains(c)) {
            return format!("{}{}", &word[..word.len() - 1], suffix("ies"));
        }
    }

    format!("{}{}", word, suffix("s"))
}

fn starts_word(word: &str, start: usize) -> bool {
    if start == 0 {
        return true;
    }
    let bytes = word.as_bytes();
    !bytes[start - 1].is_ascii_alphanumeric() || bytes[start].is_ascii_uppercase()
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().all(|c| c.is_ascii_uppercase()) && original.len() > 1 {
        replacement.to_ascii_uppercase()
    } else if original.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        let mut chars = replacement.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    } else {
        replacement.to_string()
    }
}

pub fn table_name(type_name: &str) -> String {
    snake_case(&plural(type_name))
}

pub fn join_table_name(left: &str, label: &str, right: &str) -> String {
    snake_case(&plural(&format!("{}_{}_{}", left, label, right)))
}

pub fn join_left_column_name(left: &str) -> String {
    snake_case(&format!("{}_id", left))
}

pub fn join_right_column_name(label: &str, right: &str) -> String {
    snake_case(&format!("{}_{}_id", label, right))
}

pub fn foreign_key_column_name(label: &str, from_type: &str, direction: Direction) -> String {
    match direction {
        Direction::In => snake_case(&format!("{}_{}_id", label, from_type)),
        Direction::Out => snake_case(&format!("{}_by_{}_id", label, from_type)),
    }
}

/// Column backing a declared scalar field, e.g. `createdAt` -> `created_at`.
pub fn column_name(field: &str) -> String {
    snake_case(field)
}
