//! Integration tests for shopper scenarios, checked through the rendered cart.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use outcast_core::LineItemKey;
use outcast_integration_tests::{memory_tab, product, tee};
use outcast_storefront::product::{ADDED_LABEL, AddOutcome, AddToCartButton, ProductCard};
use outcast_storefront::render::text_table;
use outcast_storefront::storage::MemoryOrigin;

#[test]
fn test_same_product_twice_merges() {
    let tab = memory_tab(&MemoryOrigin::new());
    tab.manager().add_item(tee("M"));
    tab.manager().add_item(tee("M"));

    let view = tab.view();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items.first().unwrap().quantity, 2);
    assert_eq!(view.subtotal, "GHS 50.00");
    assert!(view.checkout_visible());
    assert!(tab.render_count().unwrap().contains(">2<"));
}

#[test]
fn test_sizes_are_separate_lines() {
    let tab = memory_tab(&MemoryOrigin::new());
    tab.manager().add_item(tee("M"));
    tab.manager().add_item(product("Tee", 30, "L"));

    let view = tab.view();
    let sizes: Vec<_> = view.items.iter().map(|item| item.size.as_str()).collect();
    assert_eq!(sizes, ["M", "L"]);
    assert_eq!(view.subtotal, "GHS 55.00");
}

#[test]
fn test_removing_only_item_shows_empty_state() {
    let tab = memory_tab(&MemoryOrigin::new());
    tab.manager().add_item(tee("M"));
    tab.manager()
        .remove_item(&LineItemKey::new("Tee", Some("M".to_string())))
        .unwrap();

    let view = tab.view();
    assert!(view.is_empty());
    assert_eq!(view.subtotal, "GHS 0.00");
    assert!(!view.checkout_visible());

    let items = tab.render_items().unwrap();
    assert!(items.contains("Your cart is empty"));
    let summary = tab.render_summary().unwrap();
    assert!(summary.contains("hidden"));

    let messages: Vec<_> = tab
        .notifier()
        .toasts()
        .into_iter()
        .map(|toast| toast.message)
        .collect();
    assert_eq!(messages, ["Tee (M) added to cart!", "Removed Tee from cart"]);
}

#[test]
fn test_decrement_by_position_keeps_order() {
    let tab = memory_tab(&MemoryOrigin::new());
    tab.manager().add_item(product("Cap", 15, "M"));
    tab.manager().add_item(tee("M"));
    tab.manager().add_item(product("Hoodie", 90, "XL"));

    // The shopper clicks "-" on the first row of the rendered view
    let key = tab.cart().read(|cart| cart.key_at(0)).unwrap();
    tab.manager().change_quantity(&key, -1);

    let view = tab.view();
    let names: Vec<_> = view.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["Tee", "Hoodie"]);
    assert_eq!(view.items.last().unwrap().position, 1);
    assert!(text_table(&view).ends_with("Total: GHS 115.00\n"));
}

#[tokio::test(start_paused = true)]
async fn test_product_card_to_cart() {
    let tab = memory_tab(&MemoryOrigin::new());
    let mut card = ProductCard::new(
        "Outcast Tee",
        "GHS 120.00",
        Some("img/outcast-tee.jpg".to_string()),
        ["S", "M", "L"].map(String::from).to_vec(),
    );
    card.select_size("L");

    let button = AddToCartButton::new("Add to Cart", tab.config().add_feedback);
    assert_eq!(button.click(&card, Some(tab.manager())), AddOutcome::Added(1));
    assert_eq!(button.state().label, ADDED_LABEL);

    let view = tab.view();
    let line = view.items.first().unwrap();
    assert_eq!(line.name, "Outcast Tee");
    assert_eq!(line.size, "L");
    assert_eq!(line.unit_price, "GHS 120.00");

    let toasts = tab.notifier().toasts();
    assert_eq!(toasts.first().unwrap().message, "Outcast Tee (L) added to cart!");
    assert_eq!(
        toasts.first().unwrap().image.as_deref(),
        Some("img/outcast-tee.jpg")
    );

    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(button.state().label, "Add to Cart");
    assert!(tab.notifier().toasts().is_empty());
}
