pub mod handlers;
pub mod report;
pub mod run;

pub use handlers::{load_seeds_from_file, load_seeds_from_source, parse_seed_line};
pub use report::{OutputFormat, render_report, write_report};
pub use run::{DiscoveryHandler, RunError, RunOptions, RunProgressCallback, RunReport, execute_run};
