//! Pattern-based file classification
//!
//! Classification is pattern-based, not extension-based; the five category
//! patterns are mutually exclusive over the filenames this system produces.
//! When a pattern fails to compile, matching degrades to case-insensitive
//! keyword containment plus a `.csv` extension check, which assigns the
//! same categories for all filenames produced here.

use crate::DataType;
use regex::Regex;
use tracing::warn;

/// One of the five organization categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Raw usage events
    Raw,
    /// App usage survey responses
    Survey,
    /// iOS sensor data
    IosSensor,
    /// Preprocessed usage data
    Preprocessed,
    /// All three time-use-diary variants
    Diary,
}

impl Category {
    /// All categories in the order the organize pass processes them.
    pub const ALL: [Category; 5] = [
        Category::Raw,
        Category::Survey,
        Category::IosSensor,
        Category::Preprocessed,
        Category::Diary,
    ];

    /// The category a data type's exports are organized into.
    pub fn of_data_type(data_type: DataType) -> Self {
        match data_type {
            DataType::Raw => Category::Raw,
            DataType::Survey => Category::Survey,
            DataType::IosSensor => Category::IosSensor,
            DataType::Preprocessed => Category::Preprocessed,
            DataType::DiaryDaytime | DataType::DiaryNighttime | DataType::DiarySummarized => {
                Category::Diary
            }
        }
    }

    /// Destination subfolder name inside the download folder.
    pub fn folder_name(&self) -> &'static str {
        match self {
            Category::Raw => "Chronicle Android Raw Data Downloads",
            Category::Survey => "Chronicle Android Survey Data Downloads",
            Category::IosSensor => "Chronicle iOS Sensor Data Downloads",
            Category::Preprocessed => "Chronicle Android Preprocessed Data Downloads",
            Category::Diary => "Chronicle Time Use Diary Data Downloads",
        }
    }

    /// Filename pattern matched by the regex path.
    pub fn pattern(&self) -> &'static str {
        match self {
            Category::Raw => r"[\s\S]*(Raw)[\s\S]*\.csv",
            Category::Survey => r"[\s\S]*(Survey)[\s\S]*\.csv",
            Category::IosSensor => r"[\s\S]*(IOSSensor)[\s\S]*\.csv",
            Category::Preprocessed => r"[\s\S]*(Preprocessed)[\s\S]*\.csv",
            Category::Diary => r"[\s\S]*(Time Use Diary)[\s\S]*\.csv",
        }
    }

    /// Keyword matched by the fallback path.
    pub fn keyword(&self) -> &'static str {
        match self {
            Category::Raw => "raw",
            Category::Survey => "survey",
            Category::IosSensor => "iossensor",
            Category::Preprocessed => "preprocessed",
            Category::Diary => "time use diary",
        }
    }
}

/// Matches filenames against one category.
#[derive(Debug)]
pub struct FileClassifier {
    category: Category,
    regex: Option<Regex>,
}

impl FileClassifier {
    /// Build a classifier for a category using its standard pattern.
    pub fn new(category: Category) -> Self {
        Self::with_pattern(category, category.pattern())
    }

    /// Build a classifier with an explicit pattern. A pattern that fails to
    /// compile degrades the classifier to keyword matching.
    pub fn with_pattern(category: Category, pattern: &str) -> Self {
        let regex = match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!(
                    category = ?category,
                    "Pattern failed to compile, falling back to keyword matching: {e}"
                );
                None
            }
        };
        Self { category, regex }
    }

    /// The category this classifier matches.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Whether this classifier runs on the keyword fallback path.
    pub fn is_fallback(&self) -> bool {
        self.regex.is_none()
    }

    /// Whether a filename belongs to this classifier's category.
    pub fn matches(&self, file_name: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(file_name),
            None => {
                let lower = file_name.to_lowercase();
                lower.contains(self.category.keyword()) && lower.ends_with(".csv")
            }
        }
    }
}
