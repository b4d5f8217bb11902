use rst_common::standard::serde_json::{self, Value};
use rst_common::standard::serde_json::value::RawValue;

use super::types::{CredentialError, OfferFraming};

const OFFER_ID_KEY: &str = "@id";

/// `Offer` is a single credential offer taken from the raw offers list given by the agent runtime
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    id: String,
    body: String,
}

impl Offer {
    /// `candidates` reads every offer from the raw list using the given framing, in the order
    /// given by the agent runtime
    ///
    /// Each structured offer keeps its exact text, it is never re-serialized
    pub fn candidates(raw: &str, framing: OfferFraming) -> Result<Vec<Self>, CredentialError> {
        match framing {
            OfferFraming::Structured => Self::structured(raw),
            OfferFraming::Legacy => Ok(Self::legacy(raw).into_iter().collect()),
        }
    }

    /// `parse_list` reads the whole raw offers list, used to show pending offers
    pub fn parse_list(raw: &str) -> Result<Vec<Value>, CredentialError> {
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: Value = serde_json::from_str(raw)
            .map_err(|err| CredentialError::InvalidOffer(err.to_string()))?;

        match parsed {
            Value::Array(offers) => Ok(offers),
            _ => Err(CredentialError::InvalidOffer(
                "offers must be a JSON array".to_string(),
            )),
        }
    }

    pub fn id(&self) -> String {
        self.id.to_owned()
    }

    pub fn body(&self) -> String {
        self.body.to_owned()
    }

    fn structured(raw: &str) -> Result<Vec<Self>, CredentialError> {
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let offers: Vec<Box<RawValue>> = serde_json::from_str(raw)
            .map_err(|err| CredentialError::InvalidOffer(err.to_string()))?;

        offers
            .iter()
            .map(|offer| {
                let body = offer.get().to_string();
                let parsed: Value = serde_json::from_str(&body)
                    .map_err(|err| CredentialError::InvalidOffer(err.to_string()))?;

                Ok(Self {
                    id: Self::extract_id(&parsed).unwrap_or_else(|| body.clone()),
                    body,
                })
            })
            .collect()
    }

    fn legacy(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        chars.next();
        chars.next_back();

        let body = chars.as_str().to_string();
        if body.trim().is_empty() {
            return None;
        }

        let id = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| Self::extract_id(&value))
            .unwrap_or_else(|| body.clone());

        Some(Self { id, body })
    }

    fn extract_id(offer: &Value) -> Option<String> {
        let candidate = match offer {
            Value::Array(parts) => parts.first()?.get(OFFER_ID_KEY),
            _ => offer.get(OFFER_ID_KEY),
        };

        candidate
            .and_then(|value| value.as_str())
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
    }
}
