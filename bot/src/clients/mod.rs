pub mod gemini;
pub mod upbit;

pub use gemini::GeminiClient;
pub use upbit::UpbitClient;
