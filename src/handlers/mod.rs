pub mod health;
pub mod inventory;
pub mod ledgers;
pub mod orders;
pub mod rates;
pub mod staff;
pub mod wholesaler;

pub use health::health_check;
