pub mod fallback;
pub mod history;
pub mod upstream;

pub use fallback::FallbackRates;
pub use history::TrendGenerator;
pub use upstream::UpstreamRateProvider;
