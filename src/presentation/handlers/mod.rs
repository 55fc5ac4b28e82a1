mod api_debug;
mod audio_response;
mod conversion_form;
mod convert;
mod health;
mod index;
mod job_status;
mod start_job;

pub use api_debug::api_debug_handler;
pub use conversion_form::{parse_flag, parse_pitch, parse_speed, read_conversion_form};
pub use convert::convert_handler;
pub use health::health_handler;
pub use index::index_handler;
pub use job_status::job_status_handler;
pub use start_job::start_job_handler;
