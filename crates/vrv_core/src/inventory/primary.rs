use tracing::debug;

use super::types::{InventoryItem, InventoryResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PrimaryDecode {
    Trusted(InventoryResponse),
    Insufficient { decoded: usize },
    Failed { message: String },
}

pub(crate) fn decode_primary(raw: &str) -> PrimaryDecode {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let mut response =
        match serde_path_to_error::deserialize::<_, InventoryResponse>(&mut deserializer) {
        Ok(response) => response,
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            let message = if path.is_empty() || path == "." {
                format!("decode inventory json: {source}")
            } else {
                format!("decode inventory json at {path}: {source}")
            };
            return PrimaryDecode::Failed { message };
        }
    };

    let decoded = response.items.len();
    response.items.retain(InventoryItem::is_usable);
    if response.items.is_empty() {
        return PrimaryDecode::Insufficient { decoded };
    }
    if response.items.len() < decoded {
        debug!(
            decoded,
            kept = response.items.len(),
            "inventory_primary_unusable_items_dropped"
        );
    }
    PrimaryDecode::Trusted(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_payload_is_trusted() {
        let raw = r#"{"total":1,"items":[{"id":"a","name":"A","isListed":true}],"hasMore":true}"#;
        let PrimaryDecode::Trusted(response) = decode_primary(raw) else {
            panic!("expected trusted decode");
        };
        assert!(response.has_more);
        assert!(response.items[0].is_listed);
    }

    #[test]
    fn wrapped_items_are_not_trusted() {
        let raw = r#"{"total":1,"items":[{"0":{"id":"x","name":"Potion"}}]}"#;
        assert_eq!(
            decode_primary(raw),
            PrimaryDecode::Insufficient { decoded: 1 }
        );
    }

    #[test]
    fn empty_items_are_insufficient() {
        assert_eq!(
            decode_primary(r#"{"total":4,"items":[]}"#),
            PrimaryDecode::Insufficient { decoded: 0 }
        );
    }

    #[test]
    fn unusable_items_are_dropped_from_a_trusted_decode() {
        let raw = r#"{"total":9,"hasMore":true,"items":[
            {"id":"a","attributes":[{"name":"rarity","value":"epic"}],"name":"Axe","isListed":true,"templateId":"t1"},
            {"id":"","name":"B"},
            {"id":"c","name":"Cup"}
        ]}"#;
        let PrimaryDecode::Trusted(response) = decode_primary(raw) else {
            panic!("expected trusted decode");
        };
        let ids = response
            .items
            .iter()
            .map(|item| item.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(response.total, 9);
        assert!(response.has_more);
        let axe = &response.items[0];
        assert_eq!(axe.name, "Axe");
        assert!(axe.is_listed);
        assert_eq!(axe.template_id, "t1");
        assert_eq!(axe.attributes.len(), 1);
        assert_eq!(axe.attributes[0].name, "rarity");
    }

    #[test]
    fn type_mismatch_reports_json_path() {
        let raw = r#"{"total":1,"items":[{"id":"a","name":"A","isListed":"yes"}]}"#;
        let PrimaryDecode::Failed { message } = decode_primary(raw) else {
            panic!("expected failed decode");
        };
        assert!(message.contains("items[0].isListed"), "{message}");
    }
}
