pub mod csv_import;

pub use csv_import::{load_observations, read_observations};
