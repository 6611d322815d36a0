use std::fmt;

pub const MIN_BUCKET_NAME_LEN: usize = 3;
pub const MAX_BUCKET_NAME_LEN: usize = 63;

/// A bucket name accepted by the gateway: ASCII alphanumerics and hyphens,
/// between 3 and 63 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    pub fn parse(raw: impl Into<String>) -> Result<Self, BucketNameError> {
        let raw = raw.into();
        let len = raw.chars().count();

        if len < MIN_BUCKET_NAME_LEN {
            return Err(BucketNameError::TooShort {
                min: MIN_BUCKET_NAME_LEN,
            });
        }
        if len > MAX_BUCKET_NAME_LEN {
            return Err(BucketNameError::TooLong {
                max: MAX_BUCKET_NAME_LEN,
            });
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
        {
            return Err(BucketNameError::InvalidCharacter(c));
        }

        Ok(Self(raw))
    }

    /// Rehydrates a name that was validated before it was persisted.
    pub fn from_trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BucketNameError {
    #[error("Bucket name must be at least {min} characters")]
    TooShort { min: usize },
    #[error("Bucket name must be at most {max} characters")]
    TooLong { max: usize },
    #[error("Bucket name must be alphanumeric (hyphens allowed), found {0:?}")]
    InvalidCharacter(char),
}
