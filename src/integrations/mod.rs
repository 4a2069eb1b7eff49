//! External service integrations.

pub mod google_ads_client {
    pub use crate::google_ads_client::*;
}
