pub mod config;
pub mod error;
pub mod observation;

pub use config::{load_dotenv, DetectionConfig, PValueMethod, ResolvedConfig};
pub use error::*;
pub use observation::*;
