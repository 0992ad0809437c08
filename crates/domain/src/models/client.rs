//! Client domain model and the commands that create, change and search clients.

use serde::{Deserialize, Serialize};
use shared::validation::{validate_email, validate_name, validate_phone_numbers};
use validator::{Validate, ValidationError, ValidationErrors};

use super::phone::Phone;

/// A contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

/// A client together with every phone it owns, ordered by phone id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientWithPhones {
    #[serde(flatten)]
    pub client: Client,
    pub phones: Vec<Phone>,
}

impl ClientWithPhones {
    /// Phone numbers only, in phone id order.
    pub fn phone_numbers(&self) -> Vec<&str> {
        self.phones.iter().map(|p| p.phone_number.as_str()).collect()
    }
}

/// Input for creating a client and, in the same transaction, its phones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_new_client_phones"))]
pub struct NewClient {
    #[validate(custom(function = "shared::validation::validate_name"))]
    pub first_name: String,

    #[validate(custom(function = "shared::validation::validate_name"))]
    pub last_name: String,

    #[validate(email(message = "Email address is not valid"))]
    #[validate(length(max = 100, message = "Email must be at most 100 characters"))]
    pub email: Option<String>,

    #[serde(default)]
    pub phones: Vec<String>,
}

fn validate_new_client_phones(client: &NewClient) -> Result<(), ValidationError> {
    validate_phone_numbers(&client.phones)
}

impl NewClient {
    /// Starts a new client with the given names; input is trimmed.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: trimmed(first_name),
            last_name: trimmed(last_name),
            email: None,
            phones: Vec::new(),
        }
    }

    /// Sets the e-mail address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(trimmed(email));
        self
    }

    /// Adds a single phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phones.push(trimmed(phone));
        self
    }

    /// Adds several phone numbers, keeping their order.
    pub fn with_phones<I, S>(mut self, phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phones.extend(phones.into_iter().map(trimmed));
        self
    }
}

/// Explicit intent for an optional column in a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Leave the stored value untouched.
    #[default]
    Keep,
    /// Replace the stored value.
    Set(T),
    /// Store NULL.
    Clear,
}

impl<T> FieldUpdate<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }

    /// The new value, if this is a `Set`.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            FieldUpdate::Set(value) => Some(value),
            _ => None,
        }
    }
}

/// Partial update of a client (only the provided fields change).
///
/// `phones: Some(list)` replaces the whole phone set; `Some(vec![])` removes
/// every phone, while `None` leaves phones as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: FieldUpdate<String>,
    pub phones: Option<Vec<String>>,
}

impl ClientUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(trimmed(first_name));
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(trimmed(last_name));
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = FieldUpdate::Set(trimmed(email));
        self
    }

    pub fn clear_email(mut self) -> Self {
        self.email = FieldUpdate::Clear;
        self
    }

    pub fn phones<I, S>(mut self, phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phones = Some(phones.into_iter().map(trimmed).collect());
        self
    }

    /// True when the update would not touch anything.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_keep()
            && self.phones.is_none()
    }
}

impl Validate for ClientUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(first_name) = &self.first_name {
            if let Err(e) = validate_name(first_name) {
                errors.add("first_name", e);
            }
        }
        if let Some(last_name) = &self.last_name {
            if let Err(e) = validate_name(last_name) {
                errors.add("last_name", e);
            }
        }
        if let Some(email) = self.email.as_set() {
            if let Err(e) = validate_email(email) {
                errors.add("email", e);
            }
        }
        if let Some(phones) = &self.phones {
            if let Err(e) = validate_phone_numbers(phones) {
                errors.add("phones", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Search criteria for clients. Every provided field must match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

fn trimmed(value: impl Into<String>) -> String {
    value.into().trim().to_string()
}
