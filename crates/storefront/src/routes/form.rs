//! Form submission extraction.
//!
//! Write endpoints accept either `multipart/form-data` or
//! `application/x-www-form-urlencoded` bodies. [`FormFields`] reads both into
//! a flat name → value map; the typed accessors apply the configured
//! [`FormPolicy`] to numeric fields.

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    Form,
    extract::{FromRequest, Multipart, Query, Request},
    http::header::CONTENT_TYPE,
};
use bazaar_core::{Price, Username};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::AppError;

/// How missing or unparseable numbers in a form are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPolicy {
    /// Reject with 400.
    #[default]
    Strict,
    /// Fall back to zero.
    Lenient,
}

impl FromStr for FormPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!("expected 'strict' or 'lenient', got '{other}'")),
        }
    }
}

/// Errors raised while reading a submitted form.
#[derive(Debug, Error)]
pub enum FormError {
    /// The body could not be read as a form.
    #[error("malformed form: {0}")]
    Malformed(String),

    /// A required field was not submitted.
    #[error("missing field '{0}'")]
    MissingField(String),

    /// A numeric field did not hold a usable number.
    #[error("field '{field}' is not a valid number")]
    InvalidNumber {
        /// Field name.
        field: String,
    },

    /// A field failed validation.
    #[error("field '{field}' is invalid: {reason}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A field holding embedded JSON could not be decoded.
    #[error("field '{field}' is not valid JSON: {reason}")]
    InvalidJson {
        /// Field name.
        field: String,
        /// Decoder message.
        reason: String,
    },
}

/// Text fields of a submitted form.
///
/// When a name is repeated, the first value wins. File parts are read as text.
#[derive(Debug, Clone, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    /// Build from name/value pairs, keeping the first value of each name.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut fields = HashMap::new();
        for (name, value) in pairs {
            fields.entry(name).or_insert(value);
        }
        Self(fields)
    }

    /// Read the form of a request a handler has already routed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Form` if the body cannot be read as a form.
    pub async fn read(request: Request) -> Result<Self, AppError> {
        Self::from_request(request, &()).await
    }

    /// Raw value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value of a field that must be present.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingField` if the field was not submitted.
    pub fn require(&self, name: &str) -> Result<&str, FormError> {
        self.get(name)
            .ok_or_else(|| FormError::MissingField(name.to_string()))
    }

    /// Value of an optional text field, empty when absent.
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// A required username field.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingField` or `FormError::InvalidValue`.
    pub fn username(&self, name: &str) -> Result<Username, FormError> {
        Username::parse(self.require(name)?).map_err(|e| FormError::InvalidValue {
            field: name.to_string(),
            reason: e.to_string(),
        })
    }

    /// The `price` field.
    ///
    /// # Errors
    ///
    /// Under [`FormPolicy::Strict`], a missing, unparseable or negative price
    /// is an error. Under [`FormPolicy::Lenient`] it becomes zero.
    pub fn price(&self, policy: FormPolicy) -> Result<Price, FormError> {
        const FIELD: &str = "price";

        let parsed = self
            .require(FIELD)
            .and_then(|raw| {
                Price::parse(raw).map_err(|_| FormError::InvalidNumber {
                    field: FIELD.to_string(),
                })
            });

        match (parsed, policy) {
            (Ok(price), _) => Ok(price),
            (Err(_), FormPolicy::Lenient) => Ok(Price::ZERO),
            (Err(e), FormPolicy::Strict) => Err(e),
        }
    }

    /// The optional `balance` field, zero when absent or blank.
    ///
    /// # Errors
    ///
    /// Under [`FormPolicy::Strict`], an unparseable balance is an error.
    /// Under [`FormPolicy::Lenient`] it becomes zero.
    pub fn balance(&self, policy: FormPolicy) -> Result<Decimal, FormError> {
        const FIELD: &str = "balance";

        let Some(raw) = self.get(FIELD).map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Decimal::ZERO);
        };

        match Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
            Ok(balance) => Ok(balance),
            Err(_) if policy == FormPolicy::Lenient => Ok(Decimal::ZERO),
            Err(_) => Err(FormError::InvalidNumber {
                field: FIELD.to_string(),
            }),
        }
    }

    /// Decode a field that carries a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingField` or `FormError::InvalidJson`.
    pub fn json<T: DeserializeOwned>(&self, name: &str) -> Result<T, FormError> {
        serde_json::from_str(self.require(name)?).map_err(|e| FormError::InvalidJson {
            field: name.to_string(),
            reason: e.to_string(),
        })
    }
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase);

        match content_type {
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| FormError::Malformed(e.body_text()))?;
                Ok(read_multipart(multipart).await?)
            }
            Some(_) => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| FormError::Malformed(e.body_text()))?;
                Ok(Self::from_pairs(pairs))
            }
            // No body type: fall back to the query string
            None => {
                let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
                    .map_err(|e| FormError::Malformed(e.body_text()))?;
                Ok(Self::from_pairs(pairs))
            }
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<FormFields, FormError> {
    let mut pairs = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FormError::Malformed(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| FormError::Malformed(e.body_text()))?;
        pairs.push((name, value));
    }
    Ok(FormFields::from_pairs(pairs))
}
