pub mod detectors;
pub mod error;
pub mod features;
pub mod io;
pub mod normalize;
pub mod pipeline;
pub mod plot;
pub mod score;
pub mod signal;
pub mod window;

pub use error::*;
pub use pipeline::*;
pub use score::*;
pub use signal::*;
