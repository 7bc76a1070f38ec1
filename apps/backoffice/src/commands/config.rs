//! # Config Commands
//!
//! Read access to the loaded configuration.

use tracing::debug;

use crate::state::ConfigState;

/// Gets the current application configuration.
///
/// ## When Used
/// - Start-up, to title the window with the shop name
/// - Money formatting (currency symbol)
/// - Week pickers (salary and cashbox week definitions)
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
