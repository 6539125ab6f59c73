pub mod chart;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod pageviews;
pub mod platform;

pub use chart::*;
pub use dashboard::*;
pub use export::*;
pub use filter::*;
pub use pageviews::*;
pub use platform::*;
