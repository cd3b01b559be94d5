//! The decision pieces of the verification flow.
//!
//! Everything here is a pure function over values the handlers pull
//! out of the store, so each rule can be tested without a database.
//! The handlers in `http::controllers::auth` wire these decisions to
//! the store inside one transaction.

use chrono::{DateTime, Utc};
use sha2::Digest;
use std::time::Duration;

use crate::schema::Preferences;
use crate::types::id::{marker::PersonMarker, Id};

/// Deterministic keyed digest of a normalized phone number; the only
/// lookup key for person rows.
///
/// One-way on purpose: no operation ever needs the number back, only
/// equality. Rotating the key therefore invalidates every stored
/// digest at once.
pub fn phone_digest(secret_key: &str, phone: &str) -> String {
    let mut hasher = sha2::Sha512::default();
    hasher.update(format!("{secret_key}:{phone}"));
    hex::encode(hasher.finalize())
}

/// Who today's survey is about: the recorded primary participant when
/// the person files on someone else's behalf, else the person
/// themselves. Survey rows always store a concrete participant.
pub fn resolve_participant(
    person: Id<PersonMarker>,
    primary_participant: Option<Id<PersonMarker>>,
) -> Id<PersonMarker> {
    primary_participant.unwrap_or(person)
}

/// Account flags after a successful verification.
///
/// `verified` is set unconditionally; the preference flags only ever
/// go from false to true. The `mark_verified` update implements the
/// same rule with SQL `OR` so that concurrent submissions cannot
/// unset anything either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub verified: bool,
    pub reminders: bool,
    pub consent: bool,
}

pub fn merged_flags(current: Flags, requested: Preferences) -> Flags {
    Flags {
        verified: true,
        reminders: current.reminders || requested.reminders,
        consent: current.consent || requested.consent,
    }
}

/// How much of the re-issuance window is left, or `None` once another
/// code may be sent. The same value is surfaced to clients so their
/// countdown matches the authoritative one.
pub fn cooldown_remaining(
    issued_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> Option<Duration> {
    let elapsed = (now - issued_at?).to_std().ok()?;
    let remaining = window.checked_sub(elapsed)?;
    (!remaining.is_zero()).then_some(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn id(n: u128) -> Id<PersonMarker> {
        Id::new(Uuid::from_u128(n))
    }

    #[test]
    fn test_phone_digest_is_deterministic() {
        let a = phone_digest("server secret key", "+4560550709");
        let b = phone_digest("server secret key", "+4560550709");
        assert_eq!(a, b);

        // and depends on both inputs
        assert_ne!(a, phone_digest("server secret key", "+4560550708"));
        assert_ne!(a, phone_digest("another secret key", "+4560550709"));
    }

    #[test]
    fn test_resolve_participant() {
        // self-reporting person
        assert_eq!(resolve_participant(id(1), None), id(1));
        // dependent filing on behalf of their primary participant
        assert_eq!(resolve_participant(id(1), Some(id(2))), id(2));
    }

    #[test]
    fn test_merged_flags_are_monotonic() {
        let all_set = Flags {
            verified: true,
            reminders: true,
            consent: true,
        };
        let opt_out = Preferences {
            reminders: false,
            consent: false,
        };

        // opting out later never unsets anything
        assert_eq!(merged_flags(all_set, opt_out), all_set);

        // first verification sets exactly what was asked for
        let fresh = Flags {
            verified: false,
            reminders: false,
            consent: false,
        };
        let merged = merged_flags(
            fresh,
            Preferences {
                reminders: true,
                consent: true,
            },
        );
        assert_eq!(merged, all_set);

        // verified flips regardless of preferences
        assert!(merged_flags(fresh, opt_out).verified);
    }

    #[test]
    fn test_cooldown_remaining() {
        let window = Duration::from_secs(5);
        let issued = Utc.timestamp_opt(1_585_000_000, 0).unwrap();

        // no code issued yet
        assert_eq!(cooldown_remaining(None, issued, window), None);

        // inside the window
        let now = issued + chrono::Duration::seconds(2);
        assert_eq!(
            cooldown_remaining(Some(issued), now, window),
            Some(Duration::from_secs(3))
        );

        // exactly at and past the boundary
        let now = issued + chrono::Duration::seconds(5);
        assert_eq!(cooldown_remaining(Some(issued), now, window), None);
        let now = issued + chrono::Duration::seconds(60);
        assert_eq!(cooldown_remaining(Some(issued), now, window), None);

        // an issuance timestamp in the future (clock skew) does not
        // lock the number out
        let now = issued - chrono::Duration::seconds(1);
        assert_eq!(cooldown_remaining(Some(issued), now, window), None);
    }
}
