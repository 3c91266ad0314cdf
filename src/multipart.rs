use rand::Rng;

use crate::request::FilePayload;

const HEX: &[u8] = b"0123456789abcdef";

/// Generate a fresh multipart boundary: 24 lowercase hex characters.
///
/// A new token is generated for every request, so concurrent requests never
/// share boundary state.
pub(crate) fn generate_boundary() -> String {
    let mut rng = rand::thread_rng();
    (0..24).map(|_| HEX[rng.gen_range(0..16)] as char).collect()
}

/// Encode a file payload as a single-part `multipart/form-data` body.
///
/// The payload is text-only; the content length the caller advertises must be
/// the UTF-8 byte length of the returned string, not its character count.
pub(crate) fn encode(file: &FilePayload, boundary: &str) -> String {
    [
        "--",
        boundary,
        "\r\n",
        "Content-Type: application/json; charset=utf-8",
        "\r\n",
        "Content-Disposition: form-data; name=\"file\"; filename=\"",
        &file.name,
        "\"",
        "\r\n\r\n",
        &file.contents,
        "\r\n",
        "--",
        boundary,
        "--",
    ]
    .concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_24_lowercase_hex_chars() {
        let boundary = generate_boundary();
        assert_eq!(boundary.len(), 24);
        assert!(boundary.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn boundaries_differ_between_calls() {
        // 16^24 values; a collision here means the generator is broken.
        assert_ne!(generate_boundary(), generate_boundary());
    }

    #[test]
    fn encodes_a_single_part_bounded_on_both_ends() {
        let file = FilePayload::new("aoi.json", "{\"a\":1}");
        let boundary = generate_boundary();
        let body = encode(&file, &boundary);

        assert!(body.starts_with(&format!("--{boundary}\r\n")));
        assert!(body.ends_with(&format!("\r\n--{boundary}--")));
        assert_eq!(body.matches(&format!("--{boundary}")).count(), 2);

        assert!(body.contains("Content-Type: application/json; charset=utf-8\r\n"));
        assert!(
            body.contains("Content-Disposition: form-data; name=\"file\"; filename=\"aoi.json\"\r\n\r\n")
        );
        assert!(body.contains("{\"a\":1}\r\n"));
    }

    #[test]
    fn content_length_counts_utf8_bytes_not_chars() {
        let file = FilePayload::new("aoi.json", "{\"hello\":\"\u{221a}world\"}");
        let body = encode(&file, "aabbccddeeff001122334455");

        // The square root sign is 3 bytes in UTF-8.
        assert_eq!(body.len(), body.chars().count() + 2);
    }
}
