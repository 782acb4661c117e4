//! Header-guarded fixture files: `# v=1 sha256=<hex> len=<bytes>\n` followed
//! by canonical content. Readers verify the header before trusting the
//! body, so a hand-edited or truncated fixture fails loudly instead of
//! silently feeding corrupt bytes into a test.

use sha2::{Digest as _, Sha256};
use thiserror::Error;

const CURRENT_FIXTURE_VERSION: u32 = 1;

/// Errors raised while parsing or verifying a fixture file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// The file had no header line at all.
    #[error("fixture is missing its header line")]
    MissingHeader,
    /// The header line did not match the expected `# v=.. sha256=.. len=..` shape.
    #[error("malformed fixture header: {0:?}")]
    MalformedHeader(String),
    /// The header named a fixture format version this reader does not
    /// understand.
    #[error("unsupported fixture version {actual}, expected {expected}")]
    UnsupportedVersion {
        /// The version this reader supports.
        expected: u32,
        /// The version found in the header.
        actual: u32,
    },
    /// The header's declared length did not match the actual body length.
    #[error("fixture declares length {declared} but body is {actual} bytes")]
    LengthMismatch {
        /// The declared length.
        declared: usize,
        /// The actual body length.
        actual: usize,
    },
    /// The header's declared digest did not match the recomputed one.
    #[error("fixture content does not match its declared sha256")]
    DigestMismatch,
}

/// A fixture's verified header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureHeader {
    /// Fixture format version.
    pub version: u32,
    /// Lowercase hex SHA-256 of the body, as declared in the header.
    pub sha256_hex: String,
    /// Declared body length in bytes.
    pub len: usize,
}

/// Renders the header line (without trailing content) for `body`.
pub fn render_header(body: &[u8]) -> String {
    let digest_hex = hex::encode(Sha256::digest(body));
    format!("# v={} sha256={} len={}\n", CURRENT_FIXTURE_VERSION, digest_hex, body.len())
}

/// Serializes a full fixture file: header line followed by `body` verbatim.
pub fn write_fixture(body: &[u8]) -> Vec<u8> {
    let mut out = render_header(body).into_bytes();
    out.extend_from_slice(body);
    out
}

fn parse_header_line(line: &str) -> Result<FixtureHeader, FixtureError> {
    let rest = line
        .strip_prefix("# v=")
        .ok_or_else(|| FixtureError::MalformedHeader(line.to_string()))?;
    let (version_str, rest) = rest
        .split_once(" sha256=")
        .ok_or_else(|| FixtureError::MalformedHeader(line.to_string()))?;
    let (sha256_hex, rest) = rest
        .split_once(" len=")
        .ok_or_else(|| FixtureError::MalformedHeader(line.to_string()))?;
    let version: u32 = version_str
        .parse()
        .map_err(|_| FixtureError::MalformedHeader(line.to_string()))?;
    let len: usize = rest
        .trim_end()
        .parse()
        .map_err(|_| FixtureError::MalformedHeader(line.to_string()))?;
    Ok(FixtureHeader {
        version,
        sha256_hex: sha256_hex.to_string(),
        len,
    })
}

/// Parses and verifies a fixture file, returning the verified header and
/// the body bytes. Fails closed on any header/body mismatch rather than
/// returning partially-trusted content.
pub fn read_fixture(file_bytes: &[u8]) -> Result<(FixtureHeader, Vec<u8>), FixtureError> {
    let newline_pos = file_bytes
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(FixtureError::MissingHeader)?;
    let header_line =
        std::str::from_utf8(&file_bytes[..newline_pos]).map_err(|_| FixtureError::MissingHeader)?;
    let header = parse_header_line(header_line)?;

    if header.version != CURRENT_FIXTURE_VERSION {
        return Err(FixtureError::UnsupportedVersion {
            expected: CURRENT_FIXTURE_VERSION,
            actual: header.version,
        });
    }

    let body = file_bytes[newline_pos + 1..].to_vec();
    if body.len() != header.len {
        return Err(FixtureError::LengthMismatch {
            declared: header.len,
            actual: body.len(),
        });
    }

    let actual_hex = hex::encode(Sha256::digest(&body));
    if actual_hex != header.sha256_hex {
        return Err(FixtureError::DigestMismatch);
    }

    Ok((header, body))
}
