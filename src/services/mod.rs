pub mod database;
pub mod orders;

pub use database::{key_collation, MongoDb};
pub use orders::OrderService;
