//! Integration tests for cart synchronization between contexts.
//!
//! Each `AppState` plays one browser tab; tabs on the same origin share only
//! the persisted slot.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use outcast_core::LineItemKey;
use outcast_integration_tests::{file_tab, memory_tab, next_change, product, tee};
use outcast_storefront::storage::{MemoryOrigin, SlotStorage};

// =============================================================================
// In-process origin
// =============================================================================

#[tokio::test]
async fn test_add_in_one_tab_appears_in_other() {
    let origin = MemoryOrigin::new();
    let first = memory_tab(&origin);
    let second = memory_tab(&origin);
    let _sync = second.start_sync();
    let mut refreshed = second.cart().subscribe();

    first.manager().add_item(tee("M"));

    let cart = next_change(&mut refreshed).await.unwrap();
    assert_eq!(cart, first.cart().snapshot());
    assert_eq!(second.manager().item_count(), 1);
    assert_eq!(second.view().subtotal, "GHS 25.00");
}

#[tokio::test]
async fn test_writer_does_not_refresh_itself() {
    let origin = MemoryOrigin::new();
    let tab = memory_tab(&origin);
    let _sync = tab.start_sync();

    tab.manager().add_item(tee("M"));
    let mut refreshed = tab.cart().subscribe();
    tab.manager().add_item(tee("M"));
    assert!(refreshed.has_changed().unwrap());
    refreshed.borrow_and_update();

    // Give the listener a chance to run; it must not replace the cart again
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!refreshed.has_changed().unwrap());
    assert_eq!(tab.manager().item_count(), 2);
}

#[tokio::test]
async fn test_last_write_wins() {
    let origin = MemoryOrigin::new();
    let first = memory_tab(&origin);
    let second = memory_tab(&origin);
    let _sync = first.start_sync();
    let mut refreshed = first.cart().subscribe();

    first.manager().add_item(tee("M"));
    refreshed.borrow_and_update();

    // The second tab never saw the Tee, so its write drops it
    second.manager().add_item(product("Cap", 15, "L"));

    let cart = next_change(&mut refreshed).await.unwrap();
    assert_eq!(cart.len(), 1);
    assert!(cart.get(&LineItemKey::new("Cap", Some("L".to_string()))).is_some());
    assert!(cart.get(&LineItemKey::new("Tee", Some("M".to_string()))).is_none());
}

#[tokio::test]
async fn test_clear_in_other_tab_empties_cart() {
    let origin = MemoryOrigin::new();
    let first = memory_tab(&origin);
    first.manager().add_item(tee("M"));

    let second = memory_tab(&origin);
    assert_eq!(second.manager().item_count(), 1);
    let _sync = second.start_sync();
    let mut refreshed = second.cart().subscribe();

    first.manager().clear();

    let cart = next_change(&mut refreshed).await.unwrap();
    assert!(cart.is_empty());
    assert!(!second.view().checkout_visible());
}

#[tokio::test]
async fn test_removed_slot_empties_cart() {
    let origin = MemoryOrigin::new();
    let first = memory_tab(&origin);
    first.manager().add_item(tee("M"));

    let second = memory_tab(&origin);
    let _sync = second.start_sync();
    let mut refreshed = second.cart().subscribe();

    first.store().remove().unwrap();

    let cart = next_change(&mut refreshed).await.unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_garbage_written_by_other_tab_empties_cart() {
    let origin = MemoryOrigin::new();
    let tab = memory_tab(&origin);
    tab.manager().add_item(tee("M"));
    let _sync = tab.start_sync();
    let mut refreshed = tab.cart().subscribe();

    origin
        .open_context()
        .set_item(outcast_storefront::storage::keys::CART, "{not a cart")
        .unwrap();

    let cart = next_change(&mut refreshed).await.unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_other_slots_are_ignored() {
    let origin = MemoryOrigin::new();
    let tab = memory_tab(&origin);
    tab.manager().add_item(tee("M"));
    let _sync = tab.start_sync();
    let mut refreshed = tab.cart().subscribe();
    refreshed.borrow_and_update();

    origin.open_context().set_item("theme", "dark").unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!refreshed.has_changed().unwrap());
    assert_eq!(tab.manager().item_count(), 1);
}

#[tokio::test]
async fn test_separate_origins_do_not_share() {
    let shop = MemoryOrigin::new();
    let other = MemoryOrigin::new();
    memory_tab(&shop).manager().add_item(tee("M"));
    assert!(memory_tab(&other).cart().is_empty());
}

// =============================================================================
// Directory origin
// =============================================================================

#[tokio::test]
async fn test_file_origin_page_load_reads_slot() {
    let dir = tempfile::tempdir().unwrap();
    let (first, _) = file_tab(dir.path()).unwrap();
    first.manager().add_item(tee("M"));
    first.manager().add_item(tee("M"));

    let (second, _) = file_tab(dir.path()).unwrap();
    assert_eq!(second.cart().snapshot(), first.cart().snapshot());
    assert!(dir.path().join("so_cart.json").exists());
}

#[tokio::test]
async fn test_file_origin_sync() {
    let dir = tempfile::tempdir().unwrap();
    let (first, _) = file_tab(dir.path()).unwrap();
    let (second, storage) = file_tab(dir.path()).unwrap();

    let _watcher = storage.spawn_watcher(
        second.store().key(),
        second.config().sync_poll_interval,
    );
    let _sync = second.start_sync();
    let mut refreshed = second.cart().subscribe();

    first.manager().add_item(product("Hoodie", 90, "XL"));

    let cart = next_change(&mut refreshed).await.unwrap();
    assert_eq!(cart, first.cart().snapshot());

    first.manager().clear();
    let cart = next_change(&mut refreshed).await.unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_file_origin_persists_browser_format() {
    let dir = tempfile::tempdir().unwrap();
    let (tab, _) = file_tab(dir.path()).unwrap();
    tab.manager().add_item(tee("L"));

    let raw = std::fs::read_to_string(dir.path().join("so_cart.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "name": "Tee",
            "price": 25,
            "image": "img/tee.jpg",
            "size": "L",
            "quantity": 1
        }])
    );
}
