mod space_client;

pub use space_client::{ApiDescription, SpaceClient, SpaceError};
