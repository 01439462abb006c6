mod config;
mod finalize;
mod render;

pub use config::config;
pub use finalize::finalize;
pub use render::render;
