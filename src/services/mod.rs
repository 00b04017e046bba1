pub mod capability;
pub mod error_handling;
pub mod future_adapter;
pub mod sample_service;

pub use capability::{FetchCapability, FetchResult, OnComplete, SharedCapability};
pub use error_handling::FetchError;
pub use future_adapter::{FutureAdapter, sample_adapter};
pub use sample_service::{HttpSampleService, SampleService, StaticSampleService};
