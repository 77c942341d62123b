pub mod cart;
pub mod checkout;
pub mod detections;
pub mod extract;
pub mod products;
pub mod seed;
pub mod transactions;
