use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sqlx::{postgres::PgRow, query_builder::Separated, FromRow, Postgres};
use uuid::Uuid;

/// Bookkeeping columns every stored record carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EntityMeta {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

impl EntityMeta {
    /// Fills in the identity and creation time of a record about to be added.
    /// A caller-supplied id is kept.
    pub fn stamp_created(&mut self, now: DateTime<Utc>) {
        if self.id.is_nil() {
            self.id = Uuid::new_v4();
        }
        self.created_at = now;
    }

    pub fn stamp_updated(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.updated_at = Some(now);
    }
}

/// A record type managed by the generic repository.
///
/// `COLUMNS` lists the entity-specific columns in the order
/// [`Entity::bind_columns`] pushes their values; the meta columns
/// (`id`, `created_at`, `updated_at`, `is_deleted`) are handled by the store.
pub trait Entity:
    for<'r> FromRow<'r, PgRow>
    + Serialize
    + DeserializeOwned
    + Clone
    + Send
    + Sync
    + Unpin
    + 'static
{
    const TABLE: &'static str;
    const LABEL: &'static str;
    const COLUMNS: &'static [&'static str];

    fn meta(&self) -> &EntityMeta;

    fn meta_mut(&mut self) -> &mut EntityMeta;

    fn bind_columns<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>);

    fn id(&self) -> Uuid {
        self.meta().id
    }

    fn is_deleted(&self) -> bool {
        self.meta().is_deleted
    }
}

/// Records created and edited through a validated form.
///
/// Edits are field-by-field: `apply_form` only touches the fields the form
/// owns and never the meta columns.
pub trait Editable: Entity {
    type Form: validator::Validate + Send;

    /// Cleans raw input before validation, e.g. blank optional fields.
    fn normalize(form: Self::Form) -> Self::Form {
        form
    }

    fn from_form(form: Self::Form) -> Self;

    fn apply_form(&mut self, form: Self::Form);
}
