use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

use crate::entry::{Field, SubmissionForm};
use crate::normalization::normalize_website;

pub const NAME_REQUIRED: &str = "Shop name is required.";
pub const CITY_REQUIRED: &str = "City is required.";
pub const COUNTRY_REQUIRED: &str = "Country is required.";
pub const INVALID_WEBSITE: &str = "Enter a valid URL (e.g., https://example.com).";

/// Field-level problems with a submission, keyed by field. Empty when
/// the submission is acceptable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }
}

/// Checks a candidate submission. Every check runs, so the result holds
/// one message for each offending field.
pub fn validate(candidate: &SubmissionForm) -> FieldErrors {
    let mut errors = FieldErrors::default();

    let required = [
        (Field::Name, NAME_REQUIRED),
        (Field::City, CITY_REQUIRED),
        (Field::Country, COUNTRY_REQUIRED),
    ];

    for (field, message) in required.iter() {
        if candidate.get(*field).trim().is_empty() {
            errors.insert(*field, *message);
        }
    }

    if !candidate.website.trim().is_empty() && !is_absolute_url(&normalize_website(&candidate.website)) {
        errors.insert(Field::Website, INVALID_WEBSITE);
    }

    errors
}

fn is_absolute_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok()
}
