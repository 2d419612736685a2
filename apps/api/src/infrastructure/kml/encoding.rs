use crate::domain::conversion::errors::ConversionError;
use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use quick_xml::{Reader, events::Event};
use std::borrow::Cow;

/// Decode raw upload bytes to text.
///
/// Precedence: byte-order mark, UTF-16 sniffed from the leading `<?`, the
/// `encoding` of the XML declaration, then UTF-8.
pub fn decode_source(raw: &[u8]) -> Result<Cow<'_, str>, ConversionError> {
    let (encoding, body) = if let Some((encoding, bom_len)) = Encoding::for_bom(raw) {
        (encoding, &raw[bom_len..])
    } else if let Some(encoding) = sniff_utf16(raw) {
        (encoding, raw)
    } else {
        (declared_encoding(raw)?.unwrap_or(UTF_8), raw)
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            ConversionError::MalformedXml(format!("not valid {}", encoding.name()))
        })
}

fn sniff_utf16(raw: &[u8]) -> Option<&'static Encoding> {
    match raw.get(..4)? {
        [0x3C, 0x00, 0x3F, 0x00] => Some(UTF_16LE),
        [0x00, 0x3C, 0x00, 0x3F] => Some(UTF_16BE),
        _ => None,
    }
}

/// Encoding named by the XML declaration, if there is one.
///
/// A declaration readable as ASCII rules out UTF-16, so such a label is ignored.
fn declared_encoding(raw: &[u8]) -> Result<Option<&'static Encoding>, ConversionError> {
    let mut reader = Reader::from_reader(raw);
    let decl = match reader.read_event() {
        Ok(Event::Decl(decl)) => decl,
        _ => return Ok(None),
    };

    let label = match decl.encoding() {
        Some(Ok(label)) => label,
        Some(Err(e)) => return Err(ConversionError::MalformedXml(e.to_string())),
        None => return Ok(None),
    };

    let encoding = Encoding::for_label(&label).ok_or_else(|| {
        ConversionError::MalformedXml(format!(
            "unsupported encoding '{}'",
            String::from_utf8_lossy(&label)
        ))
    })?;

    if encoding == UTF_16LE || encoding == UTF_16BE {
        Ok(None)
    } else {
        Ok(Some(encoding))
    }
}
