pub mod config_io;
pub mod scenario_io;
