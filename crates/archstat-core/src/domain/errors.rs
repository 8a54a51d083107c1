use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StockResult<T> = Result<T, StockError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockErrorCategory {
    InputValidation,
    DataIntegrity,
    NoApplicableData,
    WeightSum,
    Internal,
}

impl StockErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidation => 2,
            Self::DataIntegrity => 3,
            Self::NoApplicableData => 4,
            Self::WeightSum => 4,
            Self::Internal => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InputValidation => "InputValidation",
            Self::DataIntegrity => "DataIntegrity",
            Self::NoApplicableData => "NoApplicableData",
            Self::WeightSum => "WeightSum",
            Self::Internal => "Internal",
        }
    }
}

/// Central error type for the aggregation pipeline.
///
/// Each error carries a stable placeholder code (`INPUT.*`, `DATA.*`,
/// `AGG.*`, `SYS.*`) so diagnostics stay greppable across releases while
/// the human-readable message can evolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockError {
    category: StockErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl StockError {
    pub fn new(
        category: StockErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(StockErrorCategory::InputValidation, placeholder, message)
    }

    pub fn data_integrity(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(StockErrorCategory::DataIntegrity, placeholder, message)
    }

    pub fn no_applicable_data(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(StockErrorCategory::NoApplicableData, placeholder, message)
    }

    pub fn weight_sum(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(StockErrorCategory::WeightSum, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(StockErrorCategory::Internal, placeholder, message)
    }

    pub const fn category(&self) -> StockErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }
}

impl Display for StockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.label(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for StockError {}
