//! The `/v1/models` listing.
//!
//! The gateway serves exactly one model, the one it is configured with.

use chrono::Utc;

use crate::config::GatewayConfig;
use crate::translate::openai_types::{ModelList, ModelObject};

pub const OWNED_BY: &str = "openai";

#[must_use]
pub fn model_list(config: &GatewayConfig) -> ModelList {
    ModelList {
        object: "list".to_string(),
        data: vec![ModelObject {
            id: config.model.clone(),
            object: "model".to_string(),
            created: Utc::now().timestamp(),
            owned_by: OWNED_BY.to_string(),
        }],
    }
}
