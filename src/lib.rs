// Library exports for fit-tracker
// The CLI crate and the integration tests build on these modules

pub mod ai;
pub mod api;
pub mod cache;
pub mod config;
pub mod debounce;
pub mod metrics;
pub mod models;
pub mod retry;

pub use ai::{AiBackend, AiService, GenerationRequest};
pub use api::{ApiError, BackendClient};
pub use cache::{stable_key, Flight, FlightGuard, ResultCache};
pub use config::Config;
pub use retry::{RetryClassify, RetryPolicy};
