//! Embedding vector type

use crate::error::{IndexError, Result};
use std::str::FromStr;

/// A dense embedding vector of `f64` components
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Create a new vector from a Vec<f64>
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Get the dimension of the vector
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Get the underlying data as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Check that the vector is usable as an entry or query:
    /// at least one component, none of them NaN or infinite.
    pub fn validate(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(IndexError::InvalidVector {
                reason: "vector has no components".to_string(),
            });
        }
        if let Some(pos) = self.data.iter().position(|x| !x.is_finite()) {
            return Err(IndexError::InvalidVector {
                reason: format!("component {} is not finite ({})", pos, self.data[pos]),
            });
        }
        Ok(())
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}

/// Parse a vector from a comma-separated string such as `"1.0, 2.0, 3.0"`.
impl FromStr for Vector {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        let data: Result<Vec<f64>> = s
            .split(',')
            .map(|x| {
                x.trim()
                    .parse::<f64>()
                    .map_err(|_| IndexError::InvalidVector {
                        reason: format!("Invalid float: {}", x),
                    })
            })
            .collect();
        Ok(Vector::new(data?))
    }
}
