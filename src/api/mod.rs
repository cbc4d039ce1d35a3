//! Client for the interview backend's HTTP API.

pub mod client;
pub mod errors;
pub mod feed_transport;
pub mod mjpeg;
pub mod types;

pub use client::ApiClient;
pub use errors::ApiError;
pub use feed_transport::FeedShutdown;
pub use mjpeg::{Frame, MjpegReader};
pub use types::{
    Difficulty, FeedbackReport, Identity, InterviewMode, InterviewPlan, PlannedQuestion,
    QuestionRequest, ResumeAnalysis,
};
