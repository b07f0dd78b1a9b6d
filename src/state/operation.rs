//! Operation controller: validate, request, show result
//!
//! The three operations share one code path. Each is a marker type
//! implementing [`Operation`], which supplies the four things that differ:
//! input validation, endpoint, request body and the mapping of the response
//! into panel fields.
//!
//! # Flow
//!
//! ```text
//! submit(input) ──invalid──▶ Rejected([ShowError, HideLoading])
//!      │
//!      └──valid──▶ Dispatched { start: [loading, hide all], request }
//!                        │
//!                  complete(service, request)
//!                        │
//!              [result or error commands..., HideLoading]
//! ```
//!
//! `HideLoading` is always the last command of a completion.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

use super::panels::{self, PanelId, UiCommand};
use crate::api::models::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, GenerateKeyRequest,
    KeyResponse,
};
use crate::api::{paths, ApiError, CryptoService};

/// The three remote operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    GenerateKey,
    Encrypt,
    Decrypt,
}

impl OperationKind {
    /// Endpoint path on the service
    pub fn path(&self) -> &'static str {
        match self {
            OperationKind::GenerateKey => paths::GENERATE_KEY,
            OperationKind::Encrypt => paths::ENCRYPT,
            OperationKind::Decrypt => paths::DECRYPT,
        }
    }

    /// Progressive form used in transport error messages
    pub fn verb_ing(&self) -> &'static str {
        match self {
            OperationKind::GenerateKey => "generating key",
            OperationKind::Encrypt => "encrypting message",
            OperationKind::Decrypt => "decrypting message",
        }
    }
}

/// Successful result contents, one variant per panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultFields {
    GeneratedKey {
        key: String,
    },
    Encrypted {
        encrypted_message: String,
        /// Key the service used (the supplied one or a fresh one)
        used_key: String,
    },
    Decrypted {
        decrypted_message: String,
    },
}

impl ResultFields {
    pub fn panel(&self) -> PanelId {
        match self {
            ResultFields::GeneratedKey { .. } => PanelId::GeneratedKey,
            ResultFields::Encrypted { .. } => PanelId::EncryptResult,
            ResultFields::Decrypted { .. } => PanelId::DecryptResult,
        }
    }
}

/// Missing local input; never reaches the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingMessage,
    MissingEncryptedMessage,
    MissingKey,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMessage => write!(f, "Please enter a message to encrypt"),
            Self::MissingEncryptedMessage => write!(f, "Please enter an encrypted message"),
            Self::MissingKey => write!(f, "Please enter the decryption key"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Why an operation produced no result
///
/// `Display` is the exact text shown in the error panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    Validation(ValidationError),
    /// Non-2xx answer; `detail` is shown verbatim when present
    Service { status: u16, detail: Option<String> },
    /// Network failure, timeout or malformed body
    Transport {
        kind: OperationKind,
        message: String,
    },
}

impl OperationError {
    pub fn from_api(kind: OperationKind, err: ApiError) -> Self {
        match err {
            ApiError::Service { status, detail } => Self::Service { status, detail },
            ApiError::Transport(message) => Self::Transport { kind, message },
        }
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "{}", e),
            Self::Service {
                detail: Some(detail),
                ..
            } => write!(f, "{}", detail),
            Self::Service {
                status,
                detail: None,
            } => write!(f, "HTTP error, status {}", status),
            Self::Transport { kind, message } => {
                write!(f, "Error {}: {}", kind.verb_ing(), message)
            }
        }
    }
}

impl std::error::Error for OperationError {}

impl From<ValidationError> for OperationError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

pub type OperationResult = Result<ResultFields, OperationError>;

/// What differs between the three operations
pub trait Operation: Send + Sync + 'static {
    const KIND: OperationKind;
    /// Raw form contents
    type Input;
    /// Validated request body
    type Body: Serialize + fmt::Debug + Send + Sync + 'static;
    type Response: DeserializeOwned + Send;

    fn validate(input: &Self::Input) -> Result<Self::Body, ValidationError>;

    fn into_fields(response: Self::Response) -> ResultFields;
}

/// Non-blank trimmed value, or `None`
fn present(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug)]
pub struct GenerateKey;

impl Operation for GenerateKey {
    const KIND: OperationKind = OperationKind::GenerateKey;
    type Input = ();
    type Body = GenerateKeyRequest;
    type Response = KeyResponse;

    fn validate(_input: &()) -> Result<GenerateKeyRequest, ValidationError> {
        Ok(GenerateKeyRequest {})
    }

    fn into_fields(response: KeyResponse) -> ResultFields {
        ResultFields::GeneratedKey { key: response.key }
    }
}

/// Encrypt form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptInput {
    pub message: String,
    /// Blank means "let the service generate one"
    pub key: String,
}

#[derive(Debug)]
pub struct Encrypt;

impl Operation for Encrypt {
    const KIND: OperationKind = OperationKind::Encrypt;
    type Input = EncryptInput;
    type Body = EncryptRequest;
    type Response = EncryptResponse;

    fn validate(input: &EncryptInput) -> Result<EncryptRequest, ValidationError> {
        let message = present(&input.message).ok_or(ValidationError::MissingMessage)?;
        Ok(EncryptRequest {
            message,
            key: present(&input.key),
        })
    }

    fn into_fields(response: EncryptResponse) -> ResultFields {
        ResultFields::Encrypted {
            encrypted_message: response.encrypted_message,
            used_key: response.key,
        }
    }
}

/// Decrypt form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecryptInput {
    pub encrypted_message: String,
    pub key: String,
}

#[derive(Debug)]
pub struct Decrypt;

impl Operation for Decrypt {
    const KIND: OperationKind = OperationKind::Decrypt;
    type Input = DecryptInput;
    type Body = DecryptRequest;
    type Response = DecryptResponse;

    fn validate(input: &DecryptInput) -> Result<DecryptRequest, ValidationError> {
        let encrypted_message =
            present(&input.encrypted_message).ok_or(ValidationError::MissingEncryptedMessage)?;
        let key = present(&input.key).ok_or(ValidationError::MissingKey)?;
        Ok(DecryptRequest {
            encrypted_message,
            key,
        })
    }

    fn into_fields(response: DecryptResponse) -> ResultFields {
        ResultFields::Decrypted {
            decrypted_message: response.decrypted_message,
        }
    }
}

/// A validated request waiting to be sent
#[derive(Debug)]
pub struct OperationRequest<O: Operation> {
    pub body: O::Body,
}

impl<O: Operation> OperationRequest<O> {
    pub fn kind(&self) -> OperationKind {
        O::KIND
    }
}

/// Outcome of a submit
#[derive(Debug)]
pub enum Submission<O: Operation> {
    /// Validation failed; apply the commands and stop
    Rejected(Vec<UiCommand>),
    /// Apply `start` now, then run [`complete`] with `request`
    Dispatched {
        start: Vec<UiCommand>,
        request: OperationRequest<O>,
    },
}

/// Validate form input and decide whether a request goes out
pub fn submit<O: Operation>(input: &O::Input) -> Submission<O> {
    match O::validate(input) {
        Err(e) => {
            let err = OperationError::from(e);
            tracing::debug!("{:?} rejected: {}", O::KIND, err);
            Submission::Rejected(panels::show_error(err.to_string()))
        }
        Ok(body) => {
            let mut start = panels::show_loading();
            start.extend(panels::hide_all());
            Submission::Dispatched {
                start,
                request: OperationRequest { body },
            }
        }
    }
}

/// Send exactly one request and map the answer
pub async fn execute<O, S>(service: &S, request: OperationRequest<O>) -> OperationResult
where
    O: Operation,
    S: CryptoService,
{
    service
        .post::<O::Body, O::Response>(O::KIND.path(), &request.body)
        .await
        .map(O::into_fields)
        .map_err(|e| OperationError::from_api(O::KIND, e))
}

/// Run a dispatched request to completion and build the final commands
pub async fn complete<O, S>(service: &S, request: OperationRequest<O>) -> Vec<UiCommand>
where
    O: Operation,
    S: CryptoService,
{
    let mut commands = match execute(service, request).await {
        Ok(fields) => {
            tracing::info!("{:?} succeeded", O::KIND);
            panels::show_result(fields)
        }
        Err(e) => {
            tracing::warn!("{:?} failed: {}", O::KIND, e);
            panels::show_error(e.to_string())
        }
    };
    commands.push(UiCommand::HideLoading);
    commands
}

/// Commands for a request task that died before producing an answer
pub fn abandoned(kind: OperationKind, reason: impl fmt::Display) -> Vec<UiCommand> {
    let err = OperationError::Transport {
        kind,
        message: reason.to_string(),
    };
    let mut commands = panels::show_error(err.to_string());
    commands.push(UiCommand::HideLoading);
    commands
}
