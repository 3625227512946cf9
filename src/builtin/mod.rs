//! Bundled demo plugin implementations.

mod custom_block;
mod style;
mod vanilla;

pub use custom_block::CustomBlockPlugin;
pub use style::StylePlugin;
pub use vanilla::VanillaPlugin;
