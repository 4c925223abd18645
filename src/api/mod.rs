//! Typed client wrappers for the backend API. One module per resource, all
//! sharing the uniform response envelope: `code == 0` is the sole success
//! discriminator, regardless of the transport status code.

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub mod auth;
pub mod dorm;
pub mod repairs;
pub mod students;
pub mod sys;
pub mod visitors;

/// The uniform wrapper around every backend response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(rename = "traceId", default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl<T> Envelope<T> {
    /// Extracts the payload of a successful envelope.
    ///
    /// # Errors
    /// [`Error::Domain`] carrying the envelope message when `code != 0`, and
    /// [`Error::Decode`] when a successful envelope has no payload.
    pub fn into_data(self) -> Result<T, Error> {
        self.check_code()?;
        self.data
            .ok_or_else(|| Error::Decode("response envelope is missing data".to_string()))
    }

    /// Checks the envelope code only, for operations with no payload.
    ///
    /// # Errors
    /// [`Error::Domain`] carrying the envelope message when `code != 0`.
    pub fn check(self) -> Result<(), Error> {
        self.check_code()
    }

    fn check_code(&self) -> Result<(), Error> {
        if self.code == 0 {
            Ok(())
        } else {
            Err(Error::Domain {
                code: self.code,
                message: self.message.clone(),
            })
        }
    }
}

/// One page of a paginated listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub list: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::Envelope;
    use crate::error::Error;
    use anyhow::Result;

    #[test]
    fn success_envelope_yields_data() -> Result<()> {
        let envelope: Envelope<String> =
            serde_json::from_str(r#"{"code":0,"message":"ok","data":"T"}"#)?;
        assert_eq!(envelope.into_data()?, "T");
        Ok(())
    }

    #[test]
    fn nonzero_code_is_a_domain_failure_even_on_http_200() -> Result<()> {
        let envelope: Envelope<String> = serde_json::from_str(
            r#"{"code":7,"message":"bad credentials","data":null,"traceId":"t-1"}"#,
        )?;
        assert_eq!(envelope.trace_id.as_deref(), Some("t-1"));
        let err = envelope.into_data().expect_err("expected domain error");
        assert_eq!(
            err,
            Error::Domain {
                code: 7,
                message: "bad credentials".to_string()
            }
        );
        Ok(())
    }

    #[test]
    fn check_accepts_null_data() -> Result<()> {
        let envelope: Envelope<()> = serde_json::from_str(r#"{"code":0,"message":"","data":null}"#)?;
        envelope.check()?;
        Ok(())
    }
}
