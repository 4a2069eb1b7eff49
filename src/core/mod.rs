// Domain-layer modules and shared errors/models
pub mod validation {
    pub use crate::validation::*;
}

pub mod ad_models {
    pub use crate::ad_models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
