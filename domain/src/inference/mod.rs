//! Single-model inference: requests, results and classified failures.

pub mod error;
pub mod stream;
pub mod value_objects;

pub use error::InferenceError;
pub use stream::StreamEvent;
pub use value_objects::{ChunkEvent, ModelResult, QueryRequest, QuestionKind};
