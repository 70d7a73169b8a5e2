mod services;

pub use services::{OpenGraphFetcher, PreviewFetcher};
