//! Enumerations and field types for task management.
//!
//! This module defines the structured values used to classify tasks and to
//! drive the derived list view: priorities, status filters and profiles.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum Priority {
    #[serde(alias = "high")]
    High,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

impl Priority {
    /// All priorities in selector order.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort rank; higher ranks are listed first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Status filter applied before search and sort.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
    Today,
}

impl StatusFilter {
    /// Next filter in the cycle used by the list view.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Today,
            StatusFilter::Today => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Completed => "Completed",
            StatusFilter::Pending => "Pending",
            StatusFilter::Today => "Due Today",
        }
    }
}

/// Behavioural profile of the task list.
///
/// `Dated` tasks carry a required due date and a priority, and the list offers
/// filtering and search. `Basic` tasks are text plus a completion flag.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Dated,
    Basic,
}

impl Profile {
    /// Whether the profile exposes date and priority fields.
    pub fn has_details(self) -> bool {
        matches!(self, Profile::Dated)
    }

    /// Whether filter and search controls are offered.
    pub fn has_query(self) -> bool {
        matches!(self, Profile::Dated)
    }
}
