use encoding_rs::{Encoding, UTF_8};

use crate::ExtractError;

const XML_DECLARATION_START: &[u8] = b"<?xml";
const XML_DECLARATION_END: &[u8] = b"?>";

/// Returns the label of the `encoding` pseudo-attribute of an XML declaration, if any.
fn declared_encoding(declaration: &str) -> Option<&str> {
    let rest = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let rest = &rest[1..];
    Some(&rest[..rest.find(quote)?])
}

/// Decodes an XML document from the charset named in its declaration and strips
/// the declaration, so the result can be handed to a UTF-8 only parser.
/// Documents without a declaration are read as UTF-8.
pub(crate) fn decode_document(bytes: &[u8]) -> Result<String, ExtractError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let (encoding, body) = if bytes.starts_with(XML_DECLARATION_START) {
        let end = bytes
            .windows(XML_DECLARATION_END.len())
            .position(|window| window == XML_DECLARATION_END)
            .ok_or_else(|| ExtractError::XmlDeserialize("Unterminated XML declaration".to_string()))?;
        let declaration = String::from_utf8_lossy(&bytes[..end]);
        let encoding = match declared_encoding(&declaration) {
            Some(label) => Encoding::for_label(label.trim().as_bytes())
                .ok_or_else(|| ExtractError::UnsupportedEncoding(label.to_string()))?,
            None => UTF_8,
        };
        (encoding, &bytes[end + XML_DECLARATION_END.len()..])
    } else {
        (UTF_8, bytes)
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        return Err(ExtractError::XmlDeserialize(format!(
            "Document is not valid {}",
            encoding.name()
        )));
    }

    Ok(text.into_owned())
}
