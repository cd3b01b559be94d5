use chrono::{DateTime, NaiveDate, Utc};
use error_stack::Report;
use sqlx::FromRow;

use crate::{
    database::{error::ErrorExt, Connection, Error, Result},
    types::id::{
        marker::{PersonMarker, SurveyMarker},
        Id,
    },
};

/// One daily record: `person` filed it, `participant` is who it is
/// about. At most one row exists per (person, participant, date); the
/// unique index on that triple is what makes resubmissions and races
/// converge on a single row.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Survey {
    pub id: Id<SurveyMarker>,
    pub person: Id<PersonMarker>,
    pub participant: Id<PersonMarker>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Survey {
    #[tracing::instrument(skip(person, participant))]
    pub async fn find_today(
        conn: &mut Connection,
        person: Id<PersonMarker>,
        participant: Id<PersonMarker>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"SELECT * FROM "survey"
               WHERE person = $1 AND participant = $2 AND date = current_date"#,
        )
        .bind(person)
        .bind(participant)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    /// Returns today's survey for the pair, inserting it first if it
    /// does not exist yet.
    ///
    /// A conflicting concurrent insert is not an error: the insert
    /// arm comes back empty and the re-read picks up whichever row
    /// won. Either way exactly one row exists afterwards.
    #[tracing::instrument(skip(person, participant))]
    pub async fn find_or_create_today(
        conn: &mut Connection,
        person: Id<PersonMarker>,
        participant: Id<PersonMarker>,
    ) -> Result<Self> {
        let inserted = sqlx::query_as::<_, Self>(
            r#"INSERT INTO "survey" (person, participant)
               VALUES ($1, $2)
               ON CONFLICT (person, participant, date) DO NOTHING
               RETURNING *"#,
        )
        .bind(person)
        .bind(participant)
        .fetch_optional(&mut *conn)
        .await
        .into_db_error()?;

        if let Some(survey) = inserted {
            return Ok(survey);
        }

        // Someone else created it between our statements; it must be
        // readable now.
        Self::find_today(conn, person, participant)
            .await?
            .ok_or_else(|| Report::new(Error::Internal(sqlx::Error::RowNotFound)))
    }
}
