//! Task categories

use serde::{Deserialize, Serialize};

/// Closed set of task categories
///
/// Serialized by display name (`"Problem Solving"`), matching what the LLM
/// is asked to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    Learning,
    Action,
    #[serde(rename = "Problem Solving")]
    ProblemSolving,
    Goals,
    Simplification,
    Organization,
    Communication,
    Planning,
    Research,
    #[default]
    General,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Learning,
        Category::Action,
        Category::ProblemSolving,
        Category::Goals,
        Category::Simplification,
        Category::Organization,
        Category::Communication,
        Category::Planning,
        Category::Research,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learning => "Learning",
            Self::Action => "Action",
            Self::ProblemSolving => "Problem Solving",
            Self::Goals => "Goals",
            Self::Simplification => "Simplification",
            Self::Organization => "Organization",
            Self::Communication => "Communication",
            Self::Planning => "Planning",
            Self::Research => "Research",
            Self::General => "General",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Case-insensitive; `problem-solving` and `problem_solving` are accepted too
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .iter()
            .find(|c| c.as_str().to_lowercase() == wanted)
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}
