//! Cart commands: add, qty, remove, clear, show, count.

use outcast_core::{Product, QuantityChange};
use outcast_storefront::AppError;
use outcast_storefront::cart::store::encode;
use outcast_storefront::product::ProductCard;
use outcast_storefront::render::text_table;

use super::{Page, resolve};

/// How `show` prints the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Html,
    Json,
}

/// Build the product described on the command line.
///
/// Goes through the same card path as the shop page, so unreadable price
/// text becomes a zero price with a warning.
#[must_use]
pub fn product_from_args(name: &str, price: &str, size: Option<String>, image: String) -> Product {
    let mut card = ProductCard::new(
        name,
        price,
        Some(image).filter(|image| !image.is_empty()),
        size.clone().into_iter().collect(),
    );
    if let Some(size) = size {
        card.select_size(&size);
    }
    card.to_product()
}

/// Add one unit of a product.
pub fn add(page: &Page, name: &str, price: &str, size: Option<String>, image: String) {
    let product = product_from_args(name, price, size, image);
    let quantity = page.state.manager().add_item(product);
    page.print_toasts();
    tracing::debug!(quantity, "Line quantity after add");
}

/// Change a line's quantity by `delta`.
///
/// # Errors
///
/// Returns an error if `item` does not address exactly one line.
pub fn change_quantity(
    page: &Page,
    item: &str,
    size: Option<&str>,
    delta: i64,
) -> Result<(), AppError> {
    let key = page.state.cart().read(|cart| resolve(cart, item, size))?;

    match page.state.manager().change_quantity(&key, delta) {
        Some(QuantityChange::Updated(quantity)) => println!("{key}: {quantity}"),
        Some(QuantityChange::Removed(_)) => println!("{key}: removed"),
        None => return Err(AppError::NotFound(key.to_string())),
    }
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if `item` does not address exactly one line.
pub fn remove(page: &Page, item: &str, size: Option<&str>) -> Result<(), AppError> {
    let key = page.state.cart().read(|cart| resolve(cart, item, size))?;

    if page.state.manager().remove_item(&key).is_none() {
        return Err(AppError::NotFound(key.to_string()));
    }
    page.print_toasts();
    Ok(())
}

pub fn clear(page: &Page) {
    page.state.manager().clear();
    println!("Cart cleared");
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if rendering or encoding fails.
pub fn show(page: &Page, format: Format) -> Result<(), AppError> {
    match format {
        Format::Table => print!("{}", text_table(&page.state.view())),
        Format::Html => {
            println!("{}", page.state.render_items()?);
            println!("{}", page.state.render_summary()?);
            println!("{}", page.state.render_count()?);
        }
        Format::Json => {
            let raw = page.state.cart().read(encode)?;
            println!("{raw}");
        }
    }
    Ok(())
}

pub fn count(page: &Page) {
    println!("{}", page.state.manager().item_count());
}
