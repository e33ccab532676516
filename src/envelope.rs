//! Status-tagged result envelope.
//!
//! Serializes as `{"status":"OK","data":<payload>}` or
//! `{"status":"ERR","data":"<error message>"}`.

use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Err,
}

/// Envelope payload: the success value or the rendered error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnvelopeData<T> {
    Ok(T),
    Err(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub data: EnvelopeData<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: Status::Ok,
            data: EnvelopeData::Ok(data),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            status: Status::Err,
            data: EnvelopeData::Err(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// The payload, if the envelope is `OK`.
    pub fn into_data(self) -> Option<T> {
        match self.data {
            EnvelopeData::Ok(data) => Some(data),
            EnvelopeData::Err(_) => None,
        }
    }
}

/// Converts a crate [`Result`] into an [`Envelope`].
pub trait IntoEnvelope<T> {
    fn into_envelope(self) -> Envelope<T>;
}

impl<T> IntoEnvelope<T> for Result<T> {
    fn into_envelope(self) -> Envelope<T> {
        match self {
            Ok(data) => Envelope::ok(data),
            Err(e) => Envelope::err(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::executor::Done;

    #[test]
    fn ok_envelope_shape() {
        let env = Ok::<_, Error>(Done {}).into_envelope();
        assert!(env.is_ok());
        assert_eq!(
            serde_json::to_string(&env).unwrap(),
            r#"{"status":"OK","data":{}}"#
        );
    }

    #[test]
    fn err_envelope_carries_message() {
        let env = Err::<Done, _>(Error::NoDatabasePath).into_envelope();
        assert!(!env.is_ok());
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            serde_json::json!({
                "status": "ERR",
                "data": "no database path given and none cached",
            })
        );
        assert_eq!(env.into_data(), None);
    }
}
