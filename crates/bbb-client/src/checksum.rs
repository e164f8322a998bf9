//! Request checksums and query-string encoding.
//!
//! Every API call carries a `checksum` query parameter: the hex digest of the
//! action name, the encoded query string (without the checksum) and the
//! shared secret, concatenated with no delimiters. The server recomputes it
//! from the raw query string, so the bytes hashed here must be exactly the
//! bytes sent on the wire.

use ring::digest;
use std::fmt;
use tracing::debug;

/// Digest used for request checksums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// SHA-1, still the default on older servers.
    Sha1,
    /// SHA-256.
    #[default]
    Sha256,
}

impl HashAlgorithm {
    /// Resolve an algorithm by its configuration name (`SHA1` or `SHA256`).
    ///
    /// Any other value, including lowercase spellings, falls back to
    /// [`HashAlgorithm::Sha256`] without error.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "SHA1" => Self::Sha1,
            "SHA256" => Self::Sha256,
            other => {
                debug!(
                    target: "bbb.config",
                    requested = %other,
                    "Unrecognized hash algorithm, using SHA256"
                );
                Self::Sha256
            }
        }
    }

    /// Configuration name of the algorithm.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
        }
    }

    fn digest_algorithm(self) -> &'static digest::Algorithm {
        match self {
            Self::Sha1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
            Self::Sha256 => &digest::SHA256,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encode parameters as a query string, preserving the given order.
///
/// Keys and values are percent-encoded independently. Unreserved characters
/// (`A-Z a-z 0-9 - . _ ~`) pass through and a space becomes `%20`.
#[must_use]
pub fn encode_params(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Compute the lowercase hex checksum of `action ++ encoded_params ++ secret`.
#[must_use]
pub fn checksum(
    action: &str,
    encoded_params: &str,
    secret: &str,
    algorithm: HashAlgorithm,
) -> String {
    let mut context = digest::Context::new(algorithm.digest_algorithm());
    context.update(action.as_bytes());
    context.update(encoded_params.as_bytes());
    context.update(secret.as_bytes());
    hex::encode(context.finish().as_ref())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_known_values() {
        assert_eq!(HashAlgorithm::from_name("SHA1"), HashAlgorithm::Sha1);
        assert_eq!(HashAlgorithm::from_name("SHA256"), HashAlgorithm::Sha256);
    }

    #[test]
    fn test_from_name_falls_back_to_sha256() {
        assert_eq!(HashAlgorithm::from_name("MD5"), HashAlgorithm::Sha256);
        assert_eq!(HashAlgorithm::from_name(""), HashAlgorithm::Sha256);
        // Matching is exact
        assert_eq!(HashAlgorithm::from_name("sha1"), HashAlgorithm::Sha256);
    }

    #[test]
    fn test_name_round_trips_through_from_name() {
        for algorithm in [HashAlgorithm::Sha1, HashAlgorithm::Sha256] {
            assert_eq!(HashAlgorithm::from_name(algorithm.name()), algorithm);
            assert_eq!(algorithm.to_string(), algorithm.name());
        }
    }

    #[test]
    fn test_encode_params_empty() {
        assert_eq!(encode_params(&[]), "");
    }

    #[test]
    fn test_encode_params_preserves_order() {
        let encoded = encode_params(&[("meetingID", "m1"), ("fullName", "Bob"), ("password", "pw")]);
        assert_eq!(encoded, "meetingID=m1&fullName=Bob&password=pw");

        let reversed = encode_params(&[("password", "pw"), ("meetingID", "m1")]);
        assert_eq!(reversed, "password=pw&meetingID=m1");
    }

    #[test]
    fn test_encode_params_escapes_reserved_characters() {
        let encoded = encode_params(&[("name", "Team Standup & Retro"), ("a=b", "x/y?z")]);
        assert_eq!(encoded, "name=Team%20Standup%20%26%20Retro&a%3Db=x%2Fy%3Fz");
    }

    #[test]
    fn test_encode_params_keeps_unreserved_characters() {
        assert_eq!(encode_params(&[("k", "a-b.c_d~e")]), "k=a-b.c_d~e");
    }

    #[test]
    fn test_checksum_known_vectors() {
        // sha1("abc") and sha256("abc") split across the three parts
        assert_eq!(
            checksum("a", "b", "c", HashAlgorithm::Sha1),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            checksum("a", "b", "c", HashAlgorithm::Sha256),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_checksum_concatenates_without_delimiters() {
        let split = checksum("end", "", "s", HashAlgorithm::Sha256);
        let joined = checksum("", "", "ends", HashAlgorithm::Sha256);
        assert_eq!(split, joined);
    }

    #[test]
    fn test_checksum_is_deterministic() {
        let first = checksum("create", "meetingID=m1", "secret", HashAlgorithm::Sha1);
        let second = checksum("create", "meetingID=m1", "secret", HashAlgorithm::Sha1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_checksum_changes_with_any_input_byte() {
        let base = checksum("join", "meetingID=m1", "secret", HashAlgorithm::Sha256);

        assert_ne!(base, checksum("joim", "meetingID=m1", "secret", HashAlgorithm::Sha256));
        assert_ne!(base, checksum("join", "meetingID=m2", "secret", HashAlgorithm::Sha256));
        assert_ne!(base, checksum("join", "meetingID=m1", "secreT", HashAlgorithm::Sha256));
        assert_ne!(base, checksum("join", "meetingID=m1", "secret", HashAlgorithm::Sha1));
    }

    #[test]
    fn test_checksum_is_lowercase_hex_of_expected_length() {
        let sha1 = checksum("create", "", "secret", HashAlgorithm::Sha1);
        let sha256 = checksum("create", "", "secret", HashAlgorithm::Sha256);

        assert_eq!(sha1.len(), 40);
        assert_eq!(sha256.len(), 64);
        for hex_digest in [&sha1, &sha256] {
            assert!(hex_digest
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }
}
