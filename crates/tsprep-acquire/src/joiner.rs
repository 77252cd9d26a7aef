//! Joins the sales facts with their item and store dimensions.

use tracing::debug;
use tsprep_common::{Result, Table};

/// Inner-joins `sales.item` to `items.item_id` and `sales.store` to
/// `stores.store_id`, dropping both id columns from the result.
///
/// Sales whose item or store has no match are dropped without notice.
pub fn combine(sales: &Table, items: &Table, stores: &Table) -> Result<Table> {
    let with_items = sales
        .inner_join(items, "item", "item_id")?
        .drop_column("item_id")?;
    let combined = with_items
        .inner_join(stores, "store", "store_id")?
        .drop_column("store_id")?;

    debug!(
        sales = sales.len(),
        combined = combined.len(),
        "Combined sales with items and stores"
    );
    Ok(combined)
}
