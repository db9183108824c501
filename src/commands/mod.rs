mod compress;
mod decompress;
mod detect;
pub mod io;
mod stats;
mod verify;

pub use compress::*;
pub use decompress::*;
pub use detect::*;
pub use stats::*;
pub use verify::*;
