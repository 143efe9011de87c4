pub mod error;
pub mod http;
pub mod mock;
pub mod provider;
pub mod types;

pub use error::ApiError;
pub use http::{HttpAudioService, HttpServiceConfig};
pub use mock::{MockBehavior, MockService};
pub use provider::AudioService;
pub use types::{AudioFile, AudioResult, CloneRequest, Flow, ServiceRequest, SynthesisRequest};
