//! Business services for the warung backend

pub mod order;
pub mod product;
pub mod stats;

pub use order::OrderService;
pub use product::ProductService;
pub use stats::{OrderWindow, StatsService};
