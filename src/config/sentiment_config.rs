//! Sentiment policy selection.

use super::VarSource;
use crate::domain::sentiment::SentimentPolicy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentEnvConfig {
    pub policy: SentimentPolicy,
}

impl SentimentEnvConfig {
    pub fn from_source(vars: VarSource<'_>) -> Result<Self> {
        let policy = match vars("SENTIMENT_POLICY") {
            Some(s) => SentimentPolicy::from_str(&s)?,
            None => SentimentPolicy::default(),
        };
        Ok(Self { policy })
    }
}
