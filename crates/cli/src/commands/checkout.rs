//! Simulated checkout command.

use outcast_storefront::AppError;

use super::Page;

/// Run the simulated checkout and wait for it to complete.
///
/// # Errors
///
/// Returns `AppError::Checkout` if the cart is empty.
pub async fn run(page: &Page) -> Result<(), AppError> {
    let pending = page.state.checkout().begin()?;
    println!(
        "{} ({} items, {})",
        page.state.checkout().trigger().label,
        pending.summary.item_count,
        pending.summary.subtotal
    );

    let summary = pending.wait().await;
    println!("{}", summary.confirmation());
    Ok(())
}
