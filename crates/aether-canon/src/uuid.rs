//! RFC-4122 UUID parsing to network-order bytes.

/// A malformed UUID string, rejected before it can reach a digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UuidError {
    /// The string was not in `8-4-4-4-12` hyphenated form.
    #[error("malformed UUID: expected 8-4-4-4-12 hyphenated form, got {0:?}")]
    BadFormat(String),
    /// A group contained a non-hex-digit character.
    #[error("malformed UUID: non-hex digit in {0:?}")]
    NonHexDigit(String),
}

/// Parses a hyphenated UUID string into its 16 network-order bytes:
/// `time_low, time_mid, time_hi_and_version, clock_seq_hi, clock_seq_low,
/// node`, in that field order, each field big-endian.
///
/// Rejects anything that isn't exactly 36 characters in `8-4-4-4-12` form
/// with hex digits in every group. Malformed input never reaches a caller
/// that would feed it to a digest.
pub fn parse_uuid(s: &str) -> Result<[u8; 16], UuidError> {
    let groups: Vec<&str> = s.split('-').collect();
    let expected_lengths = [8usize, 4, 4, 4, 12];
    if groups.len() != 5 {
        return Err(UuidError::BadFormat(s.to_string()));
    }
    for (group, expected_len) in groups.iter().zip(expected_lengths) {
        if group.len() != expected_len {
            return Err(UuidError::BadFormat(s.to_string()));
        }
    }
    let mut out = [0u8; 16];
    let joined: String = groups.concat();
    let bytes = hex::decode(&joined).map_err(|_| UuidError::NonHexDigit(s.to_string()))?;
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_vector_round_trips_to_expected_bytes() {
        let bytes = parse_uuid("00112233-4455-6677-8899-AABBCCDDEEFF").unwrap();
        assert_eq!(
            bytes,
            [0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]
        );
    }

    #[test]
    fn rejects_wrong_group_count() {
        assert!(parse_uuid("00112233-4455-6677-8899").is_err());
    }

    #[test]
    fn rejects_wrong_group_length() {
        assert!(parse_uuid("001122-4455-6677-8899-AABBCCDDEEFF").is_err());
    }

    #[test]
    fn rejects_non_hex_digit() {
        assert!(parse_uuid("0011223g-4455-6677-8899-AABBCCDDEEFF").is_err());
    }
}
