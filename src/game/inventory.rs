/// Inventory operations on a player's owned item stacks
use super::types::{InventoryResult, Item, PlayerItem, PlayerProgress};

// ============================================================================
// Inventory Operations
// ============================================================================

/// Add an item to player's inventory, merging into an existing stack
pub fn add_item_to_inventory(
    player: &mut PlayerProgress,
    item_id: &str,
    quantity: u32,
) -> InventoryResult {
    if quantity == 0 {
        return InventoryResult::Unchanged {
            reason: "Cannot add zero items".to_string(),
        };
    }
    if item_id.is_empty() {
        return InventoryResult::Unchanged {
            reason: "Empty item id".to_string(),
        };
    }

    if let Some(stack) = player.inventory.get_mut(item_id) {
        stack.quantity = stack.quantity.saturating_add(quantity);
        return InventoryResult::Added {
            quantity,
            stacked: true,
        };
    }

    player
        .inventory
        .insert(item_id.to_string(), PlayerItem::new(item_id, quantity));

    InventoryResult::Added {
        quantity,
        stacked: false,
    }
}

/// Remove an item from player's inventory. Removing more than held drops the
/// whole stack.
pub fn remove_item_from_inventory(
    player: &mut PlayerProgress,
    item_id: &str,
    quantity: u32,
) -> InventoryResult {
    if quantity == 0 {
        return InventoryResult::Unchanged {
            reason: "Cannot remove zero items".to_string(),
        };
    }

    let Some(stack) = player.inventory.get_mut(item_id) else {
        return InventoryResult::Unchanged {
            reason: "Item not in inventory".to_string(),
        };
    };

    if quantity >= stack.quantity {
        let removed_quantity = stack.quantity;
        player.inventory.remove(item_id);
        InventoryResult::Removed {
            quantity: removed_quantity,
            emptied: true,
        }
    } else {
        stack.quantity -= quantity;
        InventoryResult::Removed {
            quantity,
            emptied: false,
        }
    }
}

/// Check if player has at least a certain quantity of an item
pub fn has_item(player: &PlayerProgress, item_id: &str, quantity: u32) -> bool {
    get_item_quantity(player, item_id) >= quantity.max(1)
}

/// Get the quantity of an item in inventory
pub fn get_item_quantity(player: &PlayerProgress, item_id: &str) -> u32 {
    player
        .inventory
        .get(item_id)
        .map(|stack| stack.quantity)
        .unwrap_or(0)
}

/// Total number of items held across all stacks
pub fn total_item_count(player: &PlayerProgress) -> u32 {
    player
        .inventory
        .values()
        .fold(0u32, |acc, stack| acc.saturating_add(stack.quantity))
}

/// Format inventory for display, resolving names through the catalog
pub fn format_inventory(
    player: &PlayerProgress,
    get_item: impl Fn(&str) -> Option<Item>,
) -> Vec<String> {
    if player.inventory.is_empty() {
        return vec!["Empty".to_string()];
    }

    let mut lines = Vec::new();
    for (idx, stack) in player.inventory.values().enumerate() {
        let name = get_item(&stack.item_id)
            .map(|item| item.name)
            .unwrap_or_else(|| stack.item_id.clone());
        let qty_str = if stack.quantity > 1 {
            format!("{}x ", stack.quantity)
        } else {
            String::new()
        };
        lines.push(format!("{}. {}{}", idx + 1, qty_str, name));
    }

    lines.push(format!(
        "Total: {} stacks, {} items",
        player.inventory.len(),
        total_item_count(player)
    ));
    lines
}
