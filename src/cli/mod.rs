//! CLI command implementations

pub mod add;
pub mod list;
pub mod manage;

/// Split a code into runs of three digits for display, eg `123 456`.
pub fn group_digits(code: &str) -> String {
    code.chars()
        .collect::<Vec<_>>()
        .chunks(3)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The first block of a uuid, enough to tell credentials apart.
pub fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}
