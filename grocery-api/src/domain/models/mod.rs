pub mod cart;
pub mod product;
pub mod transaction;

pub use cart::{add_or_increment, compute_cart_total, Cart, CartEntry, CartLine, MAX_LINE_QUANTITY};
pub use product::Product;
pub use transaction::{Transaction, TransactionDraft, TransactionLine};
