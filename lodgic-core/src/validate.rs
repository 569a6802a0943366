use crate::error::BookingError;
use crate::reservation::Reservation;

const MIN_STAY_DAYS: i64 = 1;
const MAX_STAY_DAYS: i64 = 30;

/// Shape validation for a booking request: date ordering, stay length,
/// guest email. Room-number format is checked separately by the
/// orchestrator so it can be rejected with its own error kind.
pub fn validate_reservation(reservation: &Reservation) -> Result<(), BookingError> {
    if reservation.start >= reservation.end {
        return Err(BookingError::Validation(
            "start date must be before the end date".to_string(),
        ));
    }

    let duration = reservation.duration_days();
    if !(MIN_STAY_DAYS..=MAX_STAY_DAYS).contains(&duration) {
        return Err(BookingError::Validation(format!(
            "reservation duration must be between {MIN_STAY_DAYS} and {MAX_STAY_DAYS} days, got {duration}"
        )));
    }

    if !is_valid_email(&reservation.guest_email) {
        return Err(BookingError::Validation(
            "invalid guest email address".to_string(),
        ));
    }

    Ok(())
}

/// Minimal local@domain.tld shape: one '@', no whitespace, a dot in the
/// domain with something on both sides. Deliverability is not our problem.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn reservation(days: i64) -> Reservation {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Reservation {
            id: Uuid::nil(),
            room_number: "101".to_string(),
            guest_email: "guest@example.com".to_string(),
            start,
            end: start + Duration::days(days),
            checked_in: false,
            checked_out: false,
        }
    }

    #[test]
    fn accepts_one_to_thirty_day_stays() {
        assert!(validate_reservation(&reservation(1)).is_ok());
        assert!(validate_reservation(&reservation(30)).is_ok());
    }

    #[test]
    fn rejects_start_not_before_end() {
        let mut r = reservation(1);
        r.end = r.start;
        assert!(matches!(
            validate_reservation(&r),
            Err(BookingError::Validation(_))
        ));

        r.end = r.start - Duration::days(1);
        assert!(matches!(
            validate_reservation(&r),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_durations() {
        // Under a day and over thirty days.
        let mut r = reservation(1);
        r.end = r.start + Duration::hours(6);
        assert!(validate_reservation(&r).is_err());
        assert!(validate_reservation(&reservation(31)).is_err());
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["", "no-at-sign", "a@b", "a b@c.com", "@c.com", "a@b@c.d"] {
            let mut r = reservation(2);
            r.guest_email = email.to_string();
            assert!(validate_reservation(&r).is_err(), "{email:?} should fail");
        }
    }

    #[test]
    fn accepts_plain_emails() {
        for email in ["a@b.com", "guest.name@hotel.example.org"] {
            let mut r = reservation(2);
            r.guest_email = email.to_string();
            assert!(validate_reservation(&r).is_ok(), "{email:?} should pass");
        }
    }
}
