pub mod bar;
pub mod export;
pub mod loader;

pub use bar::{Bar, PriceSeries};
pub use export::{save_events_csv, save_results_csv, write_events_csv, write_results_csv};
pub use loader::{load_csv, read_csv, LoadError};
