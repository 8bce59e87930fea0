mod fallback;
mod primary;
mod types;

use tracing::{debug, info};

pub use types::{InventoryItem, InventoryResponse, ItemAttribute};

use fallback::scan_inventory;
use primary::{decode_primary, PrimaryDecode};

/// Parses an inventory payload from the game backend.
///
/// A structured decode is attempted first and returned unchanged when every item it
/// produced carries an `id` and a `name`. Anything else goes through the brace-aware
/// fallback scanner. This never fails; the worst case is an empty item list.
pub fn parse_inventory_response(raw: &str) -> InventoryResponse {
    debug!(length = raw.len(), "inventory_parse_begin");

    match decode_primary(raw) {
        PrimaryDecode::Trusted(response) => {
            debug!(
                item_count = response.items.len(),
                total = response.total,
                "inventory_primary_decode_ok"
            );
            return response;
        }
        PrimaryDecode::Insufficient { decoded } => {
            info!(decoded, "inventory_primary_decode_no_usable_items_using_fallback");
        }
        PrimaryDecode::Failed { message } => {
            info!(error = %message, "inventory_primary_decode_failed_using_fallback");
        }
    }

    let response = scan_inventory(raw);
    info!(
        item_count = response.items.len(),
        total = response.total,
        "inventory_fallback_scan_complete"
    );
    response
}
