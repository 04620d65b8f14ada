pub mod bitable;
pub mod etl;
pub mod normalize;
pub mod pipeline;
pub mod render;

pub use crate::domain::model::{RawRecord, RecordPage, Summary, TokenResponse};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
