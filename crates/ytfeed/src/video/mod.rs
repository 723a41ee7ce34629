pub mod types;
pub mod video_info;

pub use types::{LiveStatus, TriState, VideoType};
pub use video_info::{VideoDetail, VideoPageResult, VideoSummary};
