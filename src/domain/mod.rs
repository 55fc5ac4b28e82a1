mod audio_artifact;
mod conversion_request;
mod conversion_result;
mod endpoint_candidate;
mod job_handle;
mod job_state;
mod payload_shape;
mod uploaded_file;

pub use audio_artifact::AudioArtifact;
pub use conversion_request::{
    AudioUpload, ConversionParams, ConversionRequest, DEFAULT_PITCH, DEFAULT_REMOVE_HISS,
    DEFAULT_SPEED,
};
pub use conversion_result::{ConversionResult, DEFAULT_AUDIO_CONTENT_TYPE};
pub use endpoint_candidate::EndpointCandidate;
pub use job_handle::{JobHandle, RawJobHandle};
pub use job_state::{JobState, PENDING_STAGE};
pub use payload_shape::PayloadShape;
pub use uploaded_file::UploadedFile;
