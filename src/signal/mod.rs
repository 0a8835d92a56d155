pub mod channel;
pub mod constellation;
pub mod error_count;
pub mod generator;
pub mod rds;

pub use channel::AwgnChannel;
pub use constellation::{SymbolMapper, default_constellation, nearest};
pub use error_count::ErrorCount;
pub use generator::SymbolGenerator;
pub use rds::RdsStatistics;
