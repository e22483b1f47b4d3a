use std::{
    error::Error,
    fmt::{self, Display},
};

/// The specific result type for the storage module.
pub type Result<T> = std::result::Result<T, StorageErr>;

/// Error returned whenever a feature map is restored from a snapshot holding
/// values it can never reach through its own operations.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageErr {
    NegativeTotal { feature: String, value: f64 },
    NanTotal { feature: String },
}

impl Display for StorageErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeTotal { feature, value } => {
                write!(f, "squared gradient total for {feature} is negative: {value}")
            }
            Self::NanTotal { feature } => {
                write!(f, "squared gradient total for {feature} is NaN")
            }
        }
    }
}

impl Error for StorageErr {}
