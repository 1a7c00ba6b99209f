//! Edit view role: form state, validation, and submission for create and
//! update.

use std::marker::PhantomData;

use serde_json::{Map, Value};

use healthpoints_models::{EntityRecord, FieldViolation, UserRef, time, validate};

use crate::error::StoreError;
use crate::sessions::Nav;
use crate::store::{EntityStore, Phase};
use crate::users::UserDirectory;

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// The form starts empty and submits a create.
    Create,
    /// The form starts from the stored record and submits an update.
    Edit(i64),
}

/// Why a submission was not sent to the server.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Another write is already in flight.
    #[error("a submission is already in flight")]
    Busy,
    /// The form failed validation; nothing was sent.
    #[error("validation failed for {0:?}")]
    Invalid(Vec<FieldViolation>),
    /// The write reached the store and failed there.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// State machine for an entity's edit form.
///
/// The form holds raw values keyed by wire field name, the way a form widget
/// produces them: numbers may arrive as strings, datetimes use the editable
/// `YYYY-MM-DDTHH:MM` format, and the `user` field holds a directory
/// identifier. Submission validates, coerces, and resolves those values into
/// a typed record before handing it to the store.
#[derive(Debug)]
pub struct EditSession<E: EntityRecord> {
    mode: EditMode,
    users: Vec<UserRef>,
    form: Map<String, Value>,
    _marker: PhantomData<E>,
}

impl<E: EntityRecord> EditSession<E> {
    /// Session for the given mode; the form is populated on activation.
    #[must_use]
    pub fn new(mode: EditMode) -> Self {
        Self {
            mode,
            users: Vec::new(),
            form: Map::new(),
            _marker: PhantomData,
        }
    }

    /// The session's mode.
    #[must_use]
    pub const fn mode(&self) -> EditMode {
        self.mode
    }

    /// Whether submission will create a new record.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self.mode, EditMode::Create)
    }

    /// Directory entries available for the `user` reference picker.
    #[must_use]
    pub fn users(&self) -> &[UserRef] {
        &self.users
    }

    /// Current raw form values.
    #[must_use]
    pub const fn form(&self) -> &Map<String, Value> {
        &self.form
    }

    /// Current raw value of one form field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.form.get(name)
    }

    /// Set one form field to a raw value.
    pub fn set_field(&mut self, name: &str, value: Value) {
        self.form.insert(name.to_string(), value);
    }

    /// Enter the edit view: fetch the record being edited (create mode
    /// starts from a clean store instead), load the user directory, and
    /// initialise the form.
    ///
    /// Stored datetime fields are converted to the editable format and the
    /// `user` reference collapses to its identifier, matching what the form
    /// widgets work with.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`] when the record fetch or the
    /// directory load fails.
    pub async fn activate(
        &mut self,
        store: &mut EntityStore<E>,
        directory: &UserDirectory,
    ) -> Result<(), StoreError> {
        match self.mode {
            EditMode::Edit(id) => store.fetch_one(id).await?,
            EditMode::Create => store.reset(),
        }
        self.users = directory.fetch().await?;
        self.form = match self.mode {
            EditMode::Create => Self::default_form(),
            EditMode::Edit(_) => Self::form_from_record(store.entity())?,
        };
        Ok(())
    }

    fn default_form() -> Map<String, Value> {
        let mut form = Map::new();
        for field in E::DATETIME_FIELDS {
            form.insert(
                (*field).to_string(),
                Value::String(time::default_edit_timestamp()),
            );
        }
        form
    }

    fn form_from_record(record: &E) -> Result<Map<String, Value>, StoreError> {
        let value = serde_json::to_value(record).map_err(|source| StoreError::Encode {
            name: E::NAME,
            source,
        })?;
        let Value::Object(mut form) = value else {
            return Ok(Map::new());
        };

        for field in E::DATETIME_FIELDS {
            if let Some(Value::String(wire)) = form.get(*field)
                && let Ok(instant) = chrono::DateTime::parse_from_rfc3339(wire)
            {
                form.insert(
                    (*field).to_string(),
                    Value::String(time::to_edit_format(instant.with_timezone(&chrono::Utc))),
                );
            }
        }
        if let Some(Value::Object(user)) = form.get("user") {
            let id = user.get("id").cloned().unwrap_or(Value::Null);
            form.insert("user".to_string(), id);
        }
        Ok(form)
    }

    /// Validate the form and submit it to the store.
    ///
    /// On success the store's write event has been consumed and
    /// [`Nav::BackToList`] is returned; the caller only navigates.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Busy`] when a write is already in flight,
    /// [`SubmitError::Invalid`] when validation fails (nothing was sent), and
    /// [`SubmitError::Store`] when the server rejects the write.
    pub async fn submit(&mut self, store: &mut EntityStore<E>) -> Result<Nav, SubmitError> {
        if store.phase() == &Phase::Updating {
            return Err(SubmitError::Busy);
        }

        let mut violations = validate(&self.form, E::rules());
        let mut instants = Vec::new();
        for field in E::DATETIME_FIELDS {
            if let Some(Value::String(raw)) = self.form.get(*field) {
                match time::from_edit_format(raw) {
                    Ok(instant) => instants.push((*field, instant)),
                    Err(err) => violations.push(FieldViolation {
                        field: (*field).to_string(),
                        message: err.to_string(),
                    }),
                }
            }
        }
        if !violations.is_empty() {
            return Err(SubmitError::Invalid(violations));
        }

        let record = self.build_record(store, &instants)?;
        match self.mode {
            EditMode::Create => store.create(&record).await?,
            EditMode::Edit(_) => store.update(&record).await?,
        }

        if store.take_write_success().is_some() {
            Ok(Nav::BackToList)
        } else {
            Ok(Nav::Stay)
        }
    }

    /// Leave the form without submitting.
    #[must_use]
    pub const fn cancel(&self) -> Nav {
        Nav::BackToList
    }

    fn build_record(
        &self,
        store: &EntityStore<E>,
        instants: &[(&str, chrono::DateTime<chrono::Utc>)],
    ) -> Result<E, SubmitError> {
        let mut payload = match self.mode {
            EditMode::Edit(_) => match serde_json::to_value(store.entity()) {
                Ok(Value::Object(map)) => map,
                Ok(_) => Map::new(),
                Err(source) => {
                    return Err(SubmitError::Store(StoreError::Encode {
                        name: E::NAME,
                        source,
                    }));
                }
            },
            EditMode::Create => Map::new(),
        };

        for (name, value) in &self.form {
            payload.insert(name.clone(), value.clone());
        }
        for (field, instant) in instants {
            payload.insert(
                (*field).to_string(),
                Value::String(time::to_wire_format(*instant)),
            );
        }
        for rule in E::rules() {
            if !(rule.numeric || rule.min.is_some() || rule.max.is_some()) {
                continue;
            }
            if let Some(Value::String(raw)) = payload.get(rule.field)
                && let Some(number) = coerce_number(raw)
            {
                payload.insert(rule.field.to_string(), number);
            }
        }
        if let Some(reference) = payload.get("user").filter(|value| !value.is_object()) {
            let resolved = user_id_of(reference)
                .and_then(|id| self.users.iter().find(|user| user.id == id))
                .and_then(|user| serde_json::to_value(user).ok())
                .unwrap_or(Value::Null);
            payload.insert("user".to_string(), resolved);
        }

        serde_json::from_value(Value::Object(payload)).map_err(|source| {
            SubmitError::Store(StoreError::Encode {
                name: E::NAME,
                source,
            })
        })
    }
}

fn coerce_number(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(Value::from(integer));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

fn user_id_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
