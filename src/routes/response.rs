use std::collections::BTreeMap;

use serde::Serialize;

use crate::entry::{EntryId, Field, SubmissionForm};
use crate::listing::ListedEntry;
use crate::validation::FieldErrors;

/// The key the non-field banner is reported under, next to the field
/// errors.
const BANNER_KEY: &str = "submit";

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Healthz {
        revision: Option<&'a str>,
        timestamp: Option<&'a str>,
        version: &'a str,
    },
    Home {
        title: &'a str,
        tagline: &'a str,
        actions: Vec<Action<'a>>,
    },
    Form {
        fields: Vec<FormField>,
    },
    Listing {
        shops: Vec<ListedEntry<'a>>,
    },
    Submitted {
        id: EntryId,
        listing: &'a str,
    },
}

/// A link the landing view offers.
#[derive(Debug, Serialize)]
pub struct Action<'a> {
    pub(crate) label: &'a str,
    pub(crate) path: &'a str,
}

/// How the form presents one field.
#[derive(Debug, Serialize)]
pub struct FormField {
    name: &'static str,
    label: &'static str,
    placeholder: &'static str,
    required: bool,
}

impl From<Field> for FormField {
    fn from(field: Field) -> Self {
        FormField {
            name: field.key(),
            label: field.label(),
            placeholder: field.placeholder(),
            required: field.is_required(),
        }
    }
}

/// A submission that went back to editing: the messages to show and
/// the values to show them next to.
#[derive(Debug, Serialize)]
pub struct SubmissionErrors<'a> {
    errors: BTreeMap<&'static str, &'static str>,
    form: &'a SubmissionForm,
}

impl<'a> SubmissionErrors<'a> {
    pub fn new(form: &'a SubmissionForm, errors: &FieldErrors, banner: Option<&'static str>) -> Self {
        let mut messages = errors
            .iter()
            .map(|(field, message)| (field.key(), message))
            .collect::<BTreeMap<_, _>>();

        if let Some(banner) = banner {
            messages.insert(BANNER_KEY, banner);
        }

        SubmissionErrors {
            errors: messages,
            form,
        }
    }
}
