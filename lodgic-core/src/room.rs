use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub number: String,
    /// Opaque status code; the service stores and returns it unchanged.
    #[serde(default)]
    pub state: i64,
}

/// Room numbers are three digits: floor, tens, units. '00' doors do not
/// exist, so the units digit must be non-zero.
///
/// Valid: "101", "202", "305". Invalid: "000", "-101", "2020".
pub fn is_valid_room_number(number: &str) -> bool {
    let bytes = number.as_bytes();
    matches!(bytes, [a, b, c]
        if a.is_ascii_digit() && b.is_ascii_digit() && (b'1'..=b'9').contains(c))
}

/// Integer form of a valid room number, as stored in the rooms table.
/// Returns `None` for anything that fails `is_valid_room_number`.
pub fn room_number_to_int(number: &str) -> Option<i64> {
    if !is_valid_room_number(number) {
        return None;
    }
    number.parse::<i64>().ok()
}

/// Inverse of `room_number_to_int`: zero-padded three-digit string, so
/// "021" survives the round-trip.
pub fn format_room_number(number: i64) -> String {
    format!("{:03}", number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_room_numbers() {
        for n in ["101", "202", "305", "011", "999"] {
            assert!(is_valid_room_number(n), "{n} should be valid");
        }
    }

    #[test]
    fn rejects_invalid_room_numbers() {
        for n in ["", "000", "100", "-101", "2020", "10", "1a1", "10 "] {
            assert!(!is_valid_room_number(n), "{n} should be invalid");
        }
    }

    #[test]
    fn codec_round_trips_every_valid_number() {
        for floor in 0..10 {
            for tens in 0..10 {
                for units in 1..10 {
                    let s = format!("{floor}{tens}{units}");
                    let n = room_number_to_int(&s).expect("valid number");
                    assert_eq!(format_room_number(n), s);
                }
            }
        }
    }

    #[test]
    fn to_int_rejects_invalid_forms() {
        assert_eq!(room_number_to_int("000"), None);
        assert_eq!(room_number_to_int("12"), None);
        assert_eq!(room_number_to_int("abc"), None);
    }
}
