//! Market data model

pub mod candle;
pub mod chart;

pub use candle::Candle;
pub use chart::CandleChart;
