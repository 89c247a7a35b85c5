//! CLI subcommand implementations

pub mod authorize;
pub mod networks;
pub mod openfga;
pub mod run;
