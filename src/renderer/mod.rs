pub mod renderer;
pub mod traits;
pub mod renders;

pub use renderer::*;
pub use traits::*;
