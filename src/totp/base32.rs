use data_encoding::{Encoding, Specification};

const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Decode a base32 secret into raw key bytes.
///
/// Decoding is lenient: case is ignored, whitespace and `=` padding are
/// stripped and any other character outside the RFC 4648 alphabet is
/// skipped. Leftover bits that do not fill a byte are dropped, so the
/// output holds `5 * symbols / 8` bytes. An input without a single valid
/// symbol decodes to an empty vector.
pub fn decode(input: &str) -> Vec<u8> {
    let mut symbols = normalize(input);

    // An unpadded group of 1, 3 or 6 symbols carries no complete extra
    // byte, and data-encoding rejects those lengths outright.
    if matches!(symbols.len() % 8, 1 | 3 | 6) {
        symbols.pop();
    }

    match lenient_encoding() {
        Some(enc) => enc.decode(symbols.as_bytes()).unwrap_or_default(),
        None => Vec::new(),
    }
}

/// Uppercase the input and keep only symbols of the base32 alphabet.
fn normalize(input: &str) -> String {
    input
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| ALPHABET.contains(*c))
        .collect()
}

/// RFC 4648 base32 without padding that tolerates non-zero trailing bits.
fn lenient_encoding() -> Option<Encoding> {
    let mut spec = Specification::new();
    spec.symbols.push_str(ALPHABET);
    spec.check_trailing_bits = false;
    spec.encoding().ok()
}
