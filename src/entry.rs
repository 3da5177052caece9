use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// The identifier the store assigns to an entry.
pub type EntryId = Uuid;

/// The names of the submission form's fields.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Address,
    City,
    Country,
    Website,
    Instagram,
    Description,
    SubmittedBy,
}

impl Field {
    /// Every field, in the order the form presents them.
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Address,
        Field::City,
        Field::Country,
        Field::Website,
        Field::Instagram,
        Field::Description,
        Field::SubmittedBy,
    ];

    /// Whether the form refuses to submit while the field is blank.
    pub fn is_required(self) -> bool {
        matches!(self, Field::Name | Field::City | Field::Country)
    }

    /// The key used for the field in forms and documents.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Address => "address",
            Field::City => "city",
            Field::Country => "country",
            Field::Website => "website",
            Field::Instagram => "instagram",
            Field::Description => "description",
            Field::SubmittedBy => "submittedBy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Shop Name",
            Field::Address => "Address",
            Field::City => "City",
            Field::Country => "Country",
            Field::Website => "Website",
            Field::Instagram => "Instagram Handle",
            Field::Description => "Description",
            Field::SubmittedBy => "Your name or email",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Name => "e.g., SliderCuts Studios",
            Field::Address => "Street, city, postcode",
            Field::City => "e.g., London",
            Field::Country => "e.g., United Kingdom",
            Field::Website => "https://example.com",
            Field::Instagram => "@barbershop",
            Field::Description => "Anything people should know?",
            Field::SubmittedBy => "So we can reach you if needed",
        }
    }
}

/// The raw values of the submission form, exactly as entered.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionForm {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub website: String,
    pub instagram: String,
    pub description: String,
    pub submitted_by: String,
}

impl SubmissionForm {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Address => &self.address,
            Field::City => &self.city,
            Field::Country => &self.country,
            Field::Website => &self.website,
            Field::Instagram => &self.instagram,
            Field::Description => &self.description,
            Field::SubmittedBy => &self.submitted_by,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();

        match field {
            Field::Name => self.name = value,
            Field::Address => self.address = value,
            Field::City => self.city = value,
            Field::Country => self.country = value,
            Field::Website => self.website = value,
            Field::Instagram => self.instagram = value,
            Field::Description => self.description = value,
            Field::SubmittedBy => self.submitted_by = value,
        }
    }

    /// Whether every field is empty.
    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// The user-submitted text of an entry after cleanup.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct EntryFields {
    /// The business name. Never blank once stored.
    pub name: String,

    /// The street address, if provided.
    pub address: String,

    /// The city. Never blank once stored.
    pub city: String,

    /// The country. Never blank once stored.
    pub country: String,

    /// An absolute URL with an explicit scheme, or empty.
    pub website: String,

    /// The Instagram handle without a leading `@`, or empty.
    pub instagram: String,

    /// Free-form description.
    pub description: String,

    /// How to reach the submitter, if they said.
    pub submitted_by: String,
}

impl EntryFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Address => &self.address,
            Field::City => &self.city,
            Field::Country => &self.country,
            Field::Website => &self.website,
            Field::Instagram => &self.instagram,
            Field::Description => &self.description,
            Field::SubmittedBy => &self.submitted_by,
        }
    }
}

/// A validated entry that has not been written to the store yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewEntry {
    #[serde(flatten)]
    fields: EntryFields,
}

impl NewEntry {
    /// Builds the record to persist from an already normalized and
    /// validated form, trimming the remaining free-text fields.
    pub(crate) fn from_form(form: SubmissionForm) -> Self {
        let SubmissionForm {
            name,
            address,
            city,
            country,
            website,
            instagram,
            description,
            submitted_by,
        } = form;

        NewEntry {
            fields: EntryFields {
                name: name.trim().to_owned(),
                address: address.trim().to_owned(),
                city: city.trim().to_owned(),
                country: country.trim().to_owned(),
                website,
                instagram,
                description: description.trim().to_owned(),
                submitted_by: submitted_by.trim().to_owned(),
            },
        }
    }

    pub fn fields(&self) -> &EntryFields {
        &self.fields
    }

    pub fn into_fields(self) -> EntryFields {
        self.fields
    }
}

/// A single entry in the directory.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    /// The ID of the entry.
    id: EntryId,

    /// The date and time the store accepted it.
    #[serde(with = "time::serde::timestamp")]
    created_at: OffsetDateTime,

    /// The user-submitted text.
    #[serde(flatten)]
    fields: EntryFields,
}

impl DirectoryEntry {
    pub fn new(id: EntryId, created_at: OffsetDateTime, fields: EntryFields) -> Self {
        DirectoryEntry {
            id,
            created_at,
            fields,
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn fields(&self) -> &EntryFields {
        &self.fields
    }

    /// Joins city and country with a comma, leaving out whichever is
    /// empty. `None` if both are.
    pub fn location(&self) -> Option<String> {
        let parts = [self.fields.city.as_str(), self.fields.country.as_str()];
        let present = parts.iter().filter(|p| !p.is_empty()).copied().collect::<Vec<_>>();

        if present.is_empty() {
            None
        } else {
            Some(present.join(", "))
        }
    }

    /// The Instagram handle as shown to readers, with exactly one `@`.
    pub fn instagram_handle(&self) -> Option<String> {
        let handle = self.fields.instagram.trim_start_matches('@');

        if handle.is_empty() {
            None
        } else {
            Some(format!("@{}", handle))
        }
    }
}
