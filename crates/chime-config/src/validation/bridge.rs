//! Bridge section validation.

use crate::schema::ChimeConfig;

use super::helpers::{validate_not_blank, validate_range};

pub(crate) fn validate_bridge(errors: &mut Vec<String>, config: &ChimeConfig) {
    validate_not_blank(errors, "bridge.start_url", &config.bridge.start_url);
    validate_range(
        errors,
        "bridge.backlog_limit",
        config.bridge.backlog_limit,
        1,
        10_000,
    );
}
