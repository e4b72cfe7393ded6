//! Business logic, one service per concern. Services are cheap-to-clone
//! structs over a shared database pool; handlers stay thin.

pub mod products;
pub mod rfq;
pub mod shipments;
pub mod trading_steps;

pub use products::ProductService;
pub use rfq::RfqService;
pub use shipments::ShipmentService;
pub use trading_steps::TradingStepService;
