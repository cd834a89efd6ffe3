//! Recipe types: a named roast profile and its metadata.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Step;

/// A persisted roast profile: metadata plus an ordered list of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub roast_name: String,

    /// Execution order of the roast.
    pub steps: Vec<Step>,

    pub roast_description: RoastDescription,
    pub creator: String,
    pub bean: Bean,

    /// Sum of all step durations in seconds.
    ///
    /// Derived: only meaningful right after [`Recipe::refresh_total_time`].
    #[serde(default)]
    pub total_time: u64,

    /// File this recipe was loaded from or last saved to.
    #[serde(skip)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoastDescription {
    pub roast_type: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bean {
    pub region: String,
    pub country: String,
    pub source: BeanSource,
}

/// Where the beans were bought.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeanSource {
    pub link: String,
    pub reseller: String,
}

impl Recipe {
    /// Sums the section times of every step.
    ///
    /// Summed as `u64` so no list of `u32` section times can overflow.
    pub fn computed_total_time(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.section_time())).sum()
    }

    /// Recomputes `total_time` from the steps.
    pub fn refresh_total_time(&mut self) {
        self.total_time = self.computed_total_time();
    }
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            roast_name: String::new(),
            steps: vec![Step::default()],
            roast_description: RoastDescription::default(),
            creator: String::new(),
            bean: Bean::default(),
            total_time: 0,
            file: None,
        }
    }
}
