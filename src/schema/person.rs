use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::{
    database::{error::ErrorExt, Connection, Result},
    types::id::{marker::PersonMarker, Id},
};

/// An account row, minus its credential columns.
///
/// The phone digest and the encrypted code never leave the database:
/// every query matches on them server-side and selects only the
/// columns below.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Person {
    pub id: Id<PersonMarker>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub verified: bool,
    pub reminders: bool,
    pub consent: bool,
    /// When set, this person files surveys on behalf of the
    /// referenced person instead of themselves.
    pub primary_participant: Option<Id<PersonMarker>>,
    pub otp_issued_at: Option<DateTime<Utc>>,
}

/// The two checkboxes a caller submits along with their code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub reminders: bool,
    pub consent: bool,
}

const PERSON_COLUMNS: &str = "id, created_at, updated_at, verified, reminders, consent, \
     primary_participant, otp_issued_at";

impl Person {
    #[tracing::instrument(skip(digest), fields(digest = "<hidden>"))]
    pub async fn by_phone_digest(conn: &mut Connection, digest: &str) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            r#"SELECT {PERSON_COLUMNS} FROM "person" WHERE phone_digest = $1"#
        ))
        .bind(digest)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    /// Matches a person by phone digest AND a stored, unexpired code.
    ///
    /// The code is decrypted inside the query for the comparison and
    /// is never read into the process. `None` means the pair does not
    /// match anything current, which is an expected outcome, not an
    /// error.
    #[tracing::instrument(skip_all)]
    pub async fn by_credentials(
        conn: &mut Connection,
        digest: &str,
        code: &str,
        secret_key: &str,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            r#"SELECT {PERSON_COLUMNS} FROM "person"
               WHERE phone_digest = $1
                 AND otp_expires_at > now()
                 AND pgp_sym_decrypt(otp_code, $2) = $3"#
        ))
        .bind(digest)
        .bind(secret_key)
        .bind(code)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    /// Stores a freshly generated code, encrypted at rest, together
    /// with its issuance and expiry timestamps. Returns `None` when no
    /// person carries the digest.
    #[tracing::instrument(skip_all)]
    pub async fn store_code(
        conn: &mut Connection,
        digest: &str,
        code: &str,
        secret_key: &str,
        ttl_secs: u64,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            r#"UPDATE "person"
               SET otp_code = pgp_sym_encrypt($2, $3),
                   otp_expires_at = now() + make_interval(secs => $4),
                   otp_issued_at = now(),
                   updated_at = now()
               WHERE phone_digest = $1
               RETURNING {PERSON_COLUMNS}"#
        ))
        .bind(digest)
        .bind(code)
        .bind(secret_key)
        .bind(ttl_secs as f64)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    /// Marks the person verified and ORs in the requested
    /// preferences. Flags only ever go from false to true here; a
    /// submission with a box unticked leaves an earlier true alone.
    #[tracing::instrument(skip(id), fields(id = "<hidden>"))]
    pub async fn mark_verified(
        conn: &mut Connection,
        id: Id<PersonMarker>,
        preferences: Preferences,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(&format!(
            r#"UPDATE "person"
               SET verified = true,
                   reminders = reminders OR $2,
                   consent = consent OR $3,
                   updated_at = now()
               WHERE id = $1
               RETURNING {PERSON_COLUMNS}"#
        ))
        .bind(id)
        .bind(preferences.reminders)
        .bind(preferences.consent)
        .fetch_one(conn)
        .await
        .into_db_error()
    }
}
