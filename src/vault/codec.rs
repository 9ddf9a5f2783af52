use crate::vault::models::{Category, Credential};
use crate::vault::ports::RecordCodec;
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct JsonCodec;

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let s = serde_json::to_string_pretty(value)?;
    Ok(s.into_bytes())
}

fn decode<T: DeserializeOwned>(data: &[u8], what: &str) -> Result<T> {
    let s = std::str::from_utf8(data).map_err(|_| anyhow!("{what} content not valid UTF-8"))?;
    serde_json::from_str(s).with_context(|| format!("Failed to parse {what} content"))
}

impl RecordCodec for JsonCodec {
    fn encode_credentials(&self, credentials: &[Credential]) -> Result<Vec<u8>> {
        encode(credentials)
    }

    fn decode_credentials(&self, data: &[u8]) -> Result<Vec<Credential>> {
        decode(data, "credential")
    }

    fn encode_categories(&self, categories: &[Category]) -> Result<Vec<u8>> {
        encode(categories)
    }

    fn decode_categories(&self, data: &[u8]) -> Result<Vec<Category>> {
        decode(data, "category")
    }

    fn encode_flag(&self, value: bool) -> Result<Vec<u8>> {
        encode(&value)
    }

    fn decode_flag(&self, data: &[u8]) -> Result<bool> {
        decode(data, "flag")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_records_written_by_the_desktop_app() {
        let raw = br#"[{"id":"1700000000000abc123xyz","service":"Mail","username":"me","password":"pw","description":"","category":"other","createdAt":"2024-01-02T03:04:05.678Z","updatedAt":"2024-01-02T03:04:05.678Z"}]"#;
        let creds = JsonCodec.decode_credentials(raw).unwrap();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].service, "Mail");
        assert_eq!(creds[0].category, "other");
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let raw = br#"[{"id":"x","service":"S","password":"p","createdAt":"2024-01-02T03:04:05Z","updatedAt":"2024-01-02T03:04:05Z"}]"#;
        let creds = JsonCodec.decode_credentials(raw).unwrap();
        assert_eq!(creds[0].username, "");
        assert_eq!(creds[0].description, "");
        assert_eq!(creds[0].category, "other");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(JsonCodec.decode_credentials(b"{not json").is_err());
        assert!(JsonCodec.decode_flag(b"\"maybe\"").is_err());
    }
}
