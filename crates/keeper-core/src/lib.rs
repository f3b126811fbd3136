//! Shared models + decision logic for the model keeper.

pub mod decide;
pub mod model;
pub mod time;

pub use decide::*;
pub use model::*;
pub use time::*;
