//! Byte input to text lines, with encoding detection.
//!
//! Argenta exports are often Windows-1252 rather than UTF-8. Valid UTF-8
//! is taken as is; anything else goes through chardet detection.

use std::io::Read;

const UTF8_BOM: &str = "\u{feff}";

/// Decoded text plus the encoding it was read as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: String,
}

impl Decoded {
    /// Split into lines without terminators (`\n` or `\r\n`).
    pub fn into_lines(self) -> Vec<String> {
        self.text.lines().map(str::to_string).collect()
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes using the named encoding, falling back to lossy UTF-8
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        // WHATWG decodes every Latin-1 label as Windows-1252.
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    }
}

/// Decode bytes, preferring strict UTF-8. A leading BOM is dropped.
pub fn decode(bytes: &[u8]) -> Decoded {
    let (text, encoding) = match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), "utf-8".to_string()),
        Err(_) => {
            let encoding = detect_encoding(bytes);
            (decode_content(bytes, &encoding), encoding)
        }
    };

    let text = match text.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    };
    Decoded { text, encoding }
}

/// Read a whole stream and decode it into lines.
pub fn read_lines<R: Read>(mut reader: R) -> std::io::Result<Vec<String>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(decode(&bytes).into_lines())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        let decoded = decode("Naam v/d tegenpartij;Café".as_bytes());
        assert_eq!(decoded.encoding, "utf-8");
        assert_eq!(decoded.text, "Naam v/d tegenpartij;Café");
    }

    #[test]
    fn test_bom_stripped() {
        let decoded = decode("\u{feff}Valutadatum;Munt".as_bytes());
        assert_eq!(decoded.text, "Valutadatum;Munt");
    }

    #[test]
    fn test_windows_1252_decoding() {
        // "Société" in Windows-1252
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "windows-1252");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_latin1_currency_sign_not_euro() {
        let decoded = decode_content(&[0x31, 0xA4], "iso-8859-1");
        assert_eq!(decoded, "1\u{a4}");
        assert_eq!(decode_content(&[0xE9], "latin1"), "é");
    }

    #[test]
    fn test_non_utf8_is_detected_not_rejected() {
        let bytes: &[u8] = b"Beschrijving;Naam\nOverschrijving;Andr\xe9\n";
        let decoded = decode(bytes);
        assert!(decoded.text.starts_with("Beschrijving;Naam\n"));
    }

    #[test]
    fn test_read_lines_handles_crlf() {
        let lines = read_lines("a;b\r\n\r\nc;d\r\n".as_bytes()).unwrap();
        assert_eq!(lines, vec!["a;b", "", "c;d"]);
    }
}
