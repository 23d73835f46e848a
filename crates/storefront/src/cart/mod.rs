//! Cart engine: persistence, shared state, mutations and cross-context sync.
//!
//! - [`CartStore`] - reads and writes the cart slot
//! - [`CartState`] - the owned in-memory cart plus its change signal
//! - [`CartManager`] - add / change quantity / remove / clear, persisting after each
//! - [`SyncListener`] - adopts carts written by other contexts

pub mod manager;
pub mod state;
pub mod store;
pub mod sync;

pub use manager::CartManager;
pub use state::CartState;
pub use store::CartStore;
pub use sync::SyncListener;
