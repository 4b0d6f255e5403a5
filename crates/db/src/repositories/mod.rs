//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod completion_repo;
pub mod model_repo;
pub mod output_image_repo;
pub mod pack_repo;

pub use completion_repo::CompletionRepo;
pub use model_repo::ModelRepo;
pub use output_image_repo::OutputImageRepo;
pub use pack_repo::PackRepo;
