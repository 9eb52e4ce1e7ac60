pub mod csv_loader;

pub use csv_loader::{load_questions, read_input, REQUIRED_COLUMNS};
