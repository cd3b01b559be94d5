use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use chrono::Utc;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

use crate::{
    auth::{cooldown_remaining, phone_digest, resolve_participant},
    database::error::ErrorExt,
    http::Error,
    schema::{Person, Preferences, Survey},
    sms,
    types::{form::auth, validation, Error as ErrorType},
    App,
};

/// `POST /auth/authorize`: issues a fresh code for a registered
/// phone number and hands it to the SMS provider.
#[tracing::instrument(skip_all)]
pub async fn authorize(
    app: web::Data<App>,
    form: Json<auth::authorize::Request>,
) -> Result<HttpResponse, Error> {
    form.validate()?;

    let phone = validation::normalize_phone(form.phone.as_str());
    if !validation::has_country_prefix(&phone, &app.config.auth.country_prefix) {
        #[derive(Debug, Error)]
        #[error("Unsupported country calling code")]
        struct UnsupportedCountry;
        return Err(Error::from_context(
            ErrorType::WrongCountryCode,
            UnsupportedCountry,
        ));
    }

    let secret_key = app.config.auth.secret_key.as_str();
    let digest = phone_digest(secret_key, &phone);

    let mut conn = app.db_write().await?;
    let Some(person) = Person::by_phone_digest(&mut *conn, &digest).await? else {
        // Same response for "not registered" and "made-up number";
        // this endpoint must not confirm which numbers exist.
        #[derive(Debug, Error)]
        #[error("No person matches the given phone number")]
        struct NoMatch;
        return Err(Error::from_context(ErrorType::UnknownPhone, NoMatch));
    };

    let window = Duration::from_secs(app.config.auth.resend_cooldown_secs.get());
    if let Some(remaining) = cooldown_remaining(person.otp_issued_at, Utc::now(), window) {
        #[derive(Debug, Error)]
        #[error("A code was issued too recently")]
        struct IssuedTooRecently;
        return Err(Error::from_context(
            ErrorType::CooldownActive {
                retry_after_secs: remaining.as_secs().max(1),
            },
            IssuedTooRecently,
        ));
    }

    let code = sms::generate_code();
    let stored = Person::store_code(
        &mut *conn,
        &digest,
        &code,
        secret_key,
        app.config.auth.otp_ttl_secs.get(),
    )
    .await?;
    drop(conn);

    if stored.is_none() {
        // The row disappeared between the lookup and the update;
        // nothing was issued.
        #[derive(Debug, Error)]
        #[error("No person matches the given phone number")]
        struct NoMatch;
        return Err(Error::from_context(ErrorType::UnknownPhone, NoMatch));
    }

    app.sms
        .send_code(&phone, &code, &form.language)
        .await
        .map_err(|report| Error::from_report(ErrorType::Internal, report))?;

    Ok(HttpResponse::NoContent().finish())
}

/// `POST /auth/verify`: checks the submitted phone/code pair and, in
/// the same transaction, marks the account verified and resolves
/// today's survey.
///
/// Credential match, flag updates and survey attachment commit as one
/// unit so a client can never observe "verified but no survey" or the
/// other way around, no matter how often it retries.
#[tracing::instrument(skip_all)]
pub async fn verify(
    app: web::Data<App>,
    form: Json<auth::verify::Request>,
) -> Result<HttpResponse, Error> {
    form.validate()?;

    if !form.consent {
        #[derive(Debug, Error)]
        #[error("Verification submitted without consent")]
        struct MissingConsent;
        return Err(Error::from_context(ErrorType::ConsentRequired, MissingConsent));
    }

    let secret_key = app.config.auth.secret_key.as_str();
    let phone = validation::normalize_phone(form.phone.as_str());
    let digest = phone_digest(secret_key, &phone);

    let mut tx = app.primary_db.begin().await?;

    let person = Person::by_credentials(&mut *tx, &digest, form.code.as_str(), secret_key).await?;
    let Some(person) = person else {
        // Not told apart from "expired" or "never requested" on
        // purpose. Dropping the transaction rolls back; a failed
        // attempt changes nothing.
        #[derive(Debug, Error)]
        #[error("Phone and code pair did not match")]
        struct NoCredentialMatch;
        return Err(Error::from_context(
            ErrorType::InvalidCredential,
            NoCredentialMatch,
        ));
    };

    let person = Person::mark_verified(
        &mut *tx,
        person.id,
        Preferences {
            reminders: form.reminders,
            consent: form.consent,
        },
    )
    .await?;

    let participant = resolve_participant(person.id, person.primary_participant);
    let survey = Survey::find_or_create_today(&mut *tx, person.id, participant).await?;

    tx.commit().await.into_db_error()?;

    Ok(HttpResponse::Ok().json(auth::verify::Response { id: survey.id }))
}
