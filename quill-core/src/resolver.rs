//! Resolver: message type -> handler type name. Explicit declaration first, then convention;
//! successful bindings are cached per message type.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::Cache;
use crate::config::DispatchConfig;
use crate::container::HandlerLookup;
use crate::convention::conventional_handler_name;
use crate::error::DispatchError;
use crate::message::{Message, MessageMeta};

/// Registered name of a handler type (its fully-qualified type name).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandlerName(String);

impl HandlerName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct Resolver {
    lookup: Arc<dyn HandlerLookup>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
    prefix: String,
}

impl Resolver {
    pub fn new(lookup: Arc<dyn HandlerLookup>, cache: Arc<dyn Cache>, config: &DispatchConfig) -> Self {
        Self {
            lookup,
            cache,
            ttl: config.resolution_ttl(),
            prefix: config.cache_prefix.clone(),
        }
    }

    /// Handler for `message`. Only the message's type matters, never its field values.
    pub async fn resolve<M: Message>(&self, _message: &M) -> Result<HandlerName, DispatchError> {
        self.resolve_meta(MessageMeta::of::<M>()).await
    }

    pub async fn resolve_meta(&self, meta: MessageMeta) -> Result<HandlerName, DispatchError> {
        let key = self.cache_key(meta.type_name);
        let name = self
            .cache
            .remember(&key, self.ttl, move || async move { self.bind(meta) })
            .await?;
        Ok(HandlerName(name))
    }

    /// Drop the cached binding for `M`; the next dispatch resolves it again.
    pub async fn forget<M: Message>(&self) -> Result<(), DispatchError> {
        let key = self.cache_key(M::type_name());
        self.cache.forget(&key).await?;
        Ok(())
    }

    pub fn cache_key(&self, message_type: &str) -> String {
        format!("{}:{}", self.prefix, message_type)
    }

    fn bind(&self, meta: MessageMeta) -> Result<String, DispatchError> {
        if let Some(declared) = meta.declared_handler {
            if !self.lookup.contains(declared) {
                return Err(DispatchError::Configuration(format!(
                    "{} declares handler {}, which is not registered",
                    meta.type_name, declared
                )));
            }
            tracing::debug!(message_type = meta.type_name, handler = declared, "bound declared handler");
            return Ok(declared.to_owned());
        }

        let candidate = conventional_handler_name(meta.type_name);
        if !self.lookup.contains(&candidate) {
            return Err(DispatchError::HandlerNotFound {
                message_type: meta.type_name.to_owned(),
                candidate,
            });
        }
        tracing::debug!(message_type = meta.type_name, handler = %candidate, "bound handler by convention");
        Ok(candidate)
    }
}
