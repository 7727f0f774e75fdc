mod async_task;
mod contour;
mod export;
mod image_state;
mod selection;
mod transform;
mod viewer;

pub use async_task::*;
pub use contour::*;
pub use export::*;
pub use image_state::*;
pub use selection::*;
pub use transform::*;
pub use viewer::*;

pub type BoxFuture<'a, T> = futures::future::BoxFuture<'a, T>;
