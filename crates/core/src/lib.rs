//! ytknow core library
//!
//! Video URL and time parsing, view-state projection of extraction results,
//! player controls, input debouncing and exports for the ytknow front end.

pub mod backend;
pub mod config;
pub mod controls;
pub mod debounce;
pub mod error;
pub mod export;
pub mod paths;
pub mod session;
pub mod time;
pub mod types;
pub mod video;
pub mod view;

// Re-export commonly used items at crate root
pub use backend::{ExtractionBackend, HttpBackend};
pub use config::Config;
pub use controls::{ControlGroup, PlayerControl, PlayerControls, PreviewControl, RELAX_DELAY};
pub use debounce::{DEBOUNCE_DELAY, Debouncer};
pub use error::{Result, TimeParseError, YtknowError};
pub use export::{ExportFormat, export_json, export_text, render_export, write_export};
pub use paths::{default_export_dir, export_file_name, get_export_path};
pub use session::{Message, Session};
pub use time::{format_seconds_to_time, parse_time_param, parse_time_strict, parse_time_to_seconds};
pub use types::{
    Category, ExtractionFailure, ExtractionOutcome, ExtractionRequest, ExtractionResult,
    HealthStatus, TRANSPORT_ERROR_MESSAGE,
};
pub use video::{TimeWindow, VideoDescriptor, extract_video_id};
pub use view::{
    PreviewView, Section, ViewMode, ViewState, compute_preview_view, compute_result_view,
    loading_view,
};
