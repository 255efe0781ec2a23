pub mod inventory;
pub mod ledger;
pub mod order;
pub mod rate;
pub mod staff;
pub mod wholesaler;

pub use inventory::{InventoryItem, StockStatus};
pub use ledger::{Ledger, LedgerEntry};
pub use order::{daily_counter_key, daily_order_id, DailyCounter, DeliveryStatus, Order, OrderFinancials};
pub use rate::Rate;
pub use staff::Staff;
pub use wholesaler::WholesalerPurchase;
