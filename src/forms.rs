use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());
static USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.]*$").unwrap());

/// Validation messages keyed by form field, rendered next to the field.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Field must be non-blank and at most `max` characters.
    pub fn required(&mut self, field: &'static str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.add(field, "This field is required.");
        } else if value.chars().count() > max {
            self.add(field, format!("Field must be at most {max} characters long."));
        }
    }

    /// Value becomes a single URL path segment; `.` and `..` collapse away.
    pub fn path_segment(&mut self, field: &'static str, value: &str) {
        if matches!(value, "." | "..") {
            self.add(field, "Not a valid search term.");
        }
    }

    pub fn email(&mut self, field: &'static str, value: &str) {
        if !value.is_empty() && !EMAIL.is_match(value) {
            self.add(field, "Invalid email address.");
        }
    }

    pub fn username(&mut self, field: &'static str, value: &str) {
        if !value.is_empty() && !USERNAME.is_match(value) {
            self.add(field, "Usernames must have only letters, numbers, dots or underscores");
        }
    }
}
