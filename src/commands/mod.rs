//! Command layer - one module per subcommand
//!
//! Commands assemble configuration from CLI options, construct the store
//! clients, and delegate the actual work to the services layer.

pub mod builds;
pub mod promote;
