//! XML key files
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <KeyFile>
//!     <Meta>
//!         <Version>1.00</Version>
//!     </Meta>
//!     <Key>
//!         <Data>base64 of 32 bytes</Data>
//!     </Key>
//! </KeyFile>
//! ```
//!
//! Version 2.x files carry hex in `Data`, optionally grouped with
//! whitespace, and a `Hash` attribute holding the first 4 bytes of
//! SHA-256(key) in uppercase hex. Only version 1.00 is ever written.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;
use xml::reader::{ParserConfig, XmlEvent};
use zeroize::{Zeroize, Zeroizing};

use super::KEY_LEN;
use crate::crypto::{sha256, SecureBytes};

pub const WRITTEN_VERSION: &str = "1.00";

/// Everything up to and including the opening `<Data>` tag
pub const HEAD: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\r\n\
                        <KeyFile>\r\n\
                        \t<Meta>\r\n\
                        \t\t<Version>1.00</Version>\r\n\
                        \t</Meta>\r\n\
                        \t<Key>\r\n\
                        \t\t<Data>";

/// Everything from the closing `</Data>` tag on
pub const TAIL: &str = "</Data>\r\n\t</Key>\r\n</KeyFile>";

/// Base64 length of a 32-byte key
pub const ENCODED_KEY_LEN: usize = 44;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const ROOT: &str = "KeyFile";
const VERSION_PATH: [&str; 3] = [ROOT, "Meta", "Version"];
const DATA_PATH: [&str; 3] = [ROOT, "Key", "Data"];
const HASH_ATTRIBUTE: &str = "Hash";

pub(super) fn render(key: &[u8; KEY_LEN]) -> Zeroizing<String> {
    let mut doc = Zeroizing::new(String::with_capacity(
        HEAD.len() + ENCODED_KEY_LEN + TAIL.len(),
    ));
    doc.push_str(HEAD);
    STANDARD.encode_string(key, &mut *doc);
    doc.push_str(TAIL);
    doc
}

#[derive(Default)]
struct Fields {
    version: Option<String>,
    data: Option<Zeroizing<String>>,
    hash: Option<String>,
}

/// Returns the declared version and the key, or `None` when `data` is not
/// a usable XML key file
pub(super) fn parse(data: &[u8]) -> Option<(String, SecureBytes)> {
    let fields = read_fields(data)?;
    let text = fields.data?;
    let version = fields
        .version
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| WRITTEN_VERSION.to_string());

    let major: u32 = version.split('.').next()?.trim().parse().ok()?;
    let digits = Zeroizing::new(text.split_whitespace().collect::<String>());

    let key = match major {
        1 => decode_base64(&digits)?,
        2 => decode_hex(&digits, fields.hash.as_deref())?,
        _ => {
            debug!(%version, "unsupported XML key file version");
            return None;
        }
    };

    Some((version, key))
}

fn read_fields(data: &[u8]) -> Option<Fields> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let reader = ParserConfig::new().create_reader(data);

    let mut path: Vec<String> = Vec::new();
    let mut fields = Fields::default();

    for event in reader {
        match event.ok()? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                if path.is_empty() && name.local_name != ROOT {
                    return None;
                }
                path.push(name.local_name);

                if path == DATA_PATH {
                    fields.hash = attributes
                        .into_iter()
                        .find(|a| a.name.local_name == HASH_ATTRIBUTE)
                        .map(|a| a.value);
                    fields.data.get_or_insert_with(|| Zeroizing::new(String::new()));
                }
            }
            XmlEvent::Characters(mut text) | XmlEvent::CData(mut text) => {
                if path == VERSION_PATH {
                    fields.version.get_or_insert_with(String::new).push_str(&text);
                } else if path == DATA_PATH {
                    if let Some(buf) = fields.data.as_mut() {
                        buf.push_str(&text);
                    }
                }
                text.zeroize();
            }
            XmlEvent::EndElement { .. } => {
                path.pop();
            }
            _ => {}
        }
    }

    Some(fields)
}

fn decode_base64(digits: &str) -> Option<SecureBytes> {
    let key = SecureBytes::new(STANDARD.decode(digits).ok()?);
    (key.len() == KEY_LEN).then_some(key)
}

fn decode_hex(digits: &str, hash: Option<&str>) -> Option<SecureBytes> {
    if digits.len() != KEY_LEN * 2 {
        return None;
    }
    let mut key = SecureBytes::zeroed(KEY_LEN);
    hex::decode_to_slice(digits, &mut key).ok()?;

    if let Some(expected) = hash {
        let actual = hex::encode_upper(&sha256(&key)[..4]);
        let expected: String = expected.split_whitespace().collect();
        if !actual.eq_ignore_ascii_case(&expected) {
            debug!("XML key file hash mismatch");
            return None;
        }
    }

    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_lengths() {
        assert_eq!(HEAD.len(), 113);
        assert_eq!(TAIL.len(), 28);
        assert_eq!(STANDARD.encode([0u8; KEY_LEN]).len(), ENCODED_KEY_LEN);
        assert_eq!(render(&[0u8; KEY_LEN]).len(), 185);
    }

    #[test]
    fn test_render_parse() {
        let key = [0x5Au8; KEY_LEN];
        let doc = render(&key);
        let (version, parsed) = parse(doc.as_bytes()).unwrap();
        assert_eq!(version, "1.00");
        assert_eq!(&*parsed, &key);
    }

    #[test]
    fn test_missing_version_means_v1() {
        let doc = format!(
            "<KeyFile><Key><Data>{}</Data></Key></KeyFile>",
            STANDARD.encode([3u8; KEY_LEN])
        );
        let (version, key) = parse(doc.as_bytes()).unwrap();
        assert_eq!(version, "1.00");
        assert_eq!(&*key, &[3u8; KEY_LEN]);
    }

    #[test]
    fn test_bom_and_cdata() {
        let doc = format!(
            "\u{FEFF}<?xml version=\"1.0\"?><KeyFile><Meta><Version>1.0</Version></Meta>\
             <Key><Data><![CDATA[{}]]></Data></Key></KeyFile>",
            STANDARD.encode([4u8; KEY_LEN])
        );
        let (version, key) = parse(doc.as_bytes()).unwrap();
        assert_eq!(version, "1.0");
        assert_eq!(&*key, &[4u8; KEY_LEN]);
    }

    #[test]
    fn test_wrong_root_or_shape_is_rejected() {
        let b64 = STANDARD.encode([1u8; KEY_LEN]);
        let wrong_root = format!("<Other><Key><Data>{}</Data></Key></Other>", b64);
        let no_data = "<KeyFile><Meta><Version>1.00</Version></Meta></KeyFile>";
        let short = format!(
            "<KeyFile><Key><Data>{}</Data></Key></KeyFile>",
            STANDARD.encode([1u8; 16])
        );
        let not_base64 = "<KeyFile><Key><Data>***</Data></Key></KeyFile>";

        assert!(parse(wrong_root.as_bytes()).is_none());
        assert!(parse(no_data.as_bytes()).is_none());
        assert!(parse(short.as_bytes()).is_none());
        assert!(parse(not_base64.as_bytes()).is_none());
        assert!(parse(b"<KeyFile><Key><Data>").is_none());
        assert!(parse(b"plain text").is_none());
    }

    #[test]
    fn test_unknown_major_version_is_rejected() {
        let doc = format!(
            "<KeyFile><Meta><Version>3.0</Version></Meta><Key><Data>{}</Data></Key></KeyFile>",
            STANDARD.encode([1u8; KEY_LEN])
        );
        assert!(parse(doc.as_bytes()).is_none());
    }

    fn v2_doc(key: &[u8; KEY_LEN], hash: &str) -> String {
        let digits = hex::encode_upper(key);
        let grouped: Vec<&str> = (0..8).map(|i| &digits[i * 8..i * 8 + 8]).collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<KeyFile>\n\t<Meta>\n\t\t<Version>2.0</Version>\n\t</Meta>\n\
             \t<Key>\n\t\t<Data Hash=\"{}\">\n\t\t\t{} {} {} {}\n\t\t\t{} {} {} {}\n\t\t</Data>\n\t</Key>\n</KeyFile>\n",
            hash, grouped[0], grouped[1], grouped[2], grouped[3],
            grouped[4], grouped[5], grouped[6], grouped[7]
        )
    }

    #[test]
    fn test_version_2_hex_with_hash() {
        let key: [u8; KEY_LEN] = std::array::from_fn(|i| i as u8);
        let hash = hex::encode_upper(&sha256(&key)[..4]);

        let (version, parsed) = parse(v2_doc(&key, &hash).as_bytes()).unwrap();
        assert_eq!(version, "2.0");
        assert_eq!(&*parsed, &key);
    }

    #[test]
    fn test_version_2_wrong_hash_is_rejected() {
        let key = [0x11u8; KEY_LEN];
        assert!(parse(v2_doc(&key, "00000000").as_bytes()).is_none());
    }
}
