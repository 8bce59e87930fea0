use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSessionData {
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub game_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquippedItem {
    #[serde(default)]
    pub item_glb_url: String,
    #[serde(default)]
    pub item_image_url: String,
    #[serde(default)]
    pub item_name: String,
}

impl EquippedItem {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.item_glb_url.is_empty() || self.item_name.is_empty() {
            return Err(format!(
                "missing required data (itemGlbUrl: '{}', itemName: '{}')",
                self.item_glb_url, self.item_name
            ));
        }
        Ok(())
    }
}

pub(crate) fn decode_payload<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let source = error.into_inner();
        if path.is_empty() || path == "." {
            source.to_string()
        } else {
            format!("at {path}: {source}")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_data_tolerates_missing_fields() {
        let data: ExternalSessionData = decode_payload(r#"{"gameToken":"tok"}"#).expect("decode");
        assert_eq!(data.game_token, "tok");
        assert_eq!(data.game_id, "");
    }

    #[test]
    fn session_data_rejects_non_objects() {
        assert!(decode_payload::<ExternalSessionData>("null").is_err());
        assert!(decode_payload::<ExternalSessionData>("{not json").is_err());
        assert!(decode_payload::<ExternalSessionData>("").is_err());
    }

    #[test]
    fn decode_error_names_offending_field() {
        let error = decode_payload::<ExternalSessionData>(r#"{"gameToken":5}"#).expect_err("type");
        assert!(error.starts_with("at gameToken:"), "{error}");
    }

    #[test]
    fn equipped_item_requires_glb_url_and_name() {
        let item: EquippedItem =
            decode_payload(r#"{"itemGlbUrl":"https://cdn/p.glb","itemName":"Plane"}"#)
                .expect("decode");
        assert!(item.validate().is_ok());

        let missing: EquippedItem =
            decode_payload(r#"{"itemImageUrl":"https://cdn/p.png","itemName":"Plane"}"#)
                .expect("decode");
        assert!(missing.validate().is_err());
    }
}
