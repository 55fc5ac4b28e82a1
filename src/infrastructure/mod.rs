pub mod observability;
pub mod space;
