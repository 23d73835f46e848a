//! Integration tests for the simulated checkout.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use outcast_integration_tests::{memory_tab, next_change, tee};
use outcast_storefront::checkout::{BUSY_LABEL, CONFIRMATION, READY_LABEL, Rejection};
use outcast_storefront::storage::MemoryOrigin;

#[tokio::test(start_paused = true)]
async fn test_checkout_disables_trigger_then_clears_cart() {
    let origin = MemoryOrigin::new();
    let tab = memory_tab(&origin);
    tab.manager().add_item(tee("M"));
    tab.manager().add_item(tee("L"));

    let pending = tab.checkout().begin().unwrap();

    let summary_html = tab.render_summary().unwrap();
    assert!(summary_html.contains(BUSY_LABEL));
    assert!(summary_html.contains("disabled"));

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(tab.manager().item_count(), 2);

    let summary = pending.wait().await;
    assert_eq!(summary.lines, 2);
    assert_eq!(summary.subtotal.display(), "GHS 50.00");
    assert_eq!(summary.confirmation(), CONFIRMATION);

    assert!(tab.cart().is_empty());
    assert!(tab.store().load().is_empty());
    let summary_html = tab.render_summary().unwrap();
    assert!(summary_html.contains(READY_LABEL));
    assert!(!summary_html.contains("disabled"));
    assert!(summary_html.contains("GHS 0.00"));
}

#[tokio::test(start_paused = true)]
async fn test_checkout_on_empty_cart_is_noop() {
    let tab = memory_tab(&MemoryOrigin::new());
    assert_eq!(tab.checkout().run().await.unwrap_err(), Rejection::EmptyCart);
    assert!(!tab.checkout().trigger().disabled);
}

#[tokio::test(start_paused = true)]
async fn test_double_click_runs_one_order() {
    let tab = memory_tab(&MemoryOrigin::new());
    tab.manager().add_item(tee("M"));

    let first = tab.checkout().begin().unwrap();
    assert_eq!(
        tab.checkout().begin().unwrap_err(),
        Rejection::AlreadyProcessing
    );
    first.wait().await;
    assert!(tab.cart().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_completed_checkout_reaches_other_tabs() {
    let origin = MemoryOrigin::new();
    let buyer = memory_tab(&origin);
    buyer.manager().add_item(tee("M"));

    let onlooker = memory_tab(&origin);
    assert_eq!(onlooker.manager().item_count(), 1);
    let _sync = onlooker.start_sync();
    let mut refreshed = onlooker.cart().subscribe();

    buyer.checkout().run().await.unwrap();

    let cart = next_change(&mut refreshed).await.unwrap();
    assert!(cart.is_empty());
}
