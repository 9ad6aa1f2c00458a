//! Error taxonomy shared by the repository and the query pipelines.
//!
//! Every failure that crosses the repository boundary is flattened into a
//! [`TippleError`] and carried as a value inside
//! [`Resource::Error`](crate::resource::Resource::Error). Variants hold the
//! rendered cause chain rather than the source error so that results stay
//! `Clone + Eq`, which the pipelines rely on for duplicate suppression.

/// A failure reported by the repository.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TippleError {
    /// The request never produced a usable HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded into catalog records.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// A lookup that must yield one record yielded none.
    #[error("empty result: no {0} returned")]
    Empty(&'static str),

    /// The local favourite or day-cache store failed.
    #[error("local store error: {0}")]
    LocalStore(String),
}

impl TippleError {
    /// Classify a failure raised by a [`NetworkDataSource`](crate::network::NetworkDataSource).
    ///
    /// Data sources may attach a `TippleError` directly; otherwise a
    /// `serde_json` error anywhere in the chain marks a decoding failure and
    /// everything else is treated as transport.
    pub fn from_network(err: &anyhow::Error) -> Self {
        if let Some(known) = err.downcast_ref::<TippleError>() {
            return known.clone();
        }
        if err.chain().any(|cause| cause.is::<serde_json::Error>()) {
            return TippleError::Deserialization(format!("{err:#}"));
        }
        TippleError::Transport(format!("{err:#}"))
    }

    /// Wrap a failure raised by a [`LocalStore`](crate::store::LocalStore).
    pub fn from_local(err: &anyhow::Error) -> Self {
        TippleError::LocalStore(format!("{err:#}"))
    }
}
