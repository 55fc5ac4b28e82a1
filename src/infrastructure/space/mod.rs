mod gradio_space_client;
mod mock_space_client;
pub mod sse;
mod space_url;

pub use gradio_space_client::{
    GradioSpaceClient, call_event_state, create_gradio_space_client, queue_event_state,
};
pub use mock_space_client::MockSpaceClient;
pub use space_url::resolve_space_url;
