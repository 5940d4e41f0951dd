pub mod cleanup_job;

pub use cleanup_job::CleanupJob;
