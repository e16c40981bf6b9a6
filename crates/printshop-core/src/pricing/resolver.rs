//! Price resolver with stale-response discarding.

use crate::error::PricingFailure;
use crate::money::{Currency, Money};
use crate::pricing::{
    PriceCache, PriceKey, PriceQuote, PriceRequest, PriceResponse, PriceStatus, PricingSource,
};
use crate::selection::Selection;
use crate::ConfiguratorError;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default caller-imposed timeout for a pricing call.
pub const DEFAULT_QUOTE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Default)]
struct QuoteSlot {
    /// Bumped by every request and invalidation; a response is applied only
    /// if the revision it was issued under is still current.
    revision: u64,
    quote: PriceQuote,
}

/// Turns complete selections into price quotes.
///
/// Each configurator owns one resolver; the pricing source and the
/// [`PriceCache`] may be shared.
pub struct PriceResolver {
    source: Arc<dyn PricingSource>,
    slot: Arc<Mutex<QuoteSlot>>,
    cache: Option<PriceCache>,
    timeout: Duration,
}

impl PriceResolver {
    /// Create a resolver with no memoization.
    pub fn new(source: Arc<dyn PricingSource>, timeout: Duration) -> Self {
        Self {
            source,
            slot: Arc::new(Mutex::new(QuoteSlot::default())),
            cache: None,
            timeout,
        }
    }

    /// Memoize resolved unit prices in `cache`.
    pub fn with_cache(mut self, cache: PriceCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// A resolver for another session sharing this one's source and cache
    /// but not its quote.
    pub fn for_new_session(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            slot: Arc::new(Mutex::new(QuoteSlot::default())),
            cache: self.cache.clone(),
            timeout: self.timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The latest quote.
    pub fn current(&self) -> PriceQuote {
        self.slot.lock().quote.clone()
    }

    /// Drop the current quote and orphan any in-flight request.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock();
        slot.revision += 1;
        slot.quote = PriceQuote::idle();
    }

    /// Re-tag the current quote after a quantity change.
    ///
    /// Unit prices do not depend on quantity, so a pending or resolved quote
    /// for the same item stays valid.
    pub fn retag(&self, selection: &Selection) {
        let mut slot = self.slot.lock();
        if let Some(tagged) = slot.quote.selection.as_mut() {
            if tagged.same_priced_item(selection) {
                tagged.quantity = selection.quantity;
            }
        }
    }

    /// Start a quote for `selection`.
    ///
    /// Fails with `IncompleteSelection` without any network call when the
    /// selection is incomplete. Otherwise the quote is `Pending` (or already
    /// `Resolved` from the cache) when this returns; the returned task
    /// performs the call.
    pub fn request_quote(&self, selection: &Selection) -> Result<QuoteTask, ConfiguratorError> {
        let request = PriceRequest::from_selection(selection).ok_or_else(|| {
            ConfiguratorError::IncompleteSelection(selection.missing().join(", "))
        })?;
        let key = PriceKey::for_request(&request);

        let mut slot = self.slot.lock();
        slot.revision += 1;
        let revision = slot.revision;

        if let Some(unit_price) = self.cache.as_ref().and_then(|c| c.get(&key)) {
            tracing::debug!(%key, revision, "quote served from cache");
            slot.quote = PriceQuote::resolved(selection.clone(), unit_price);
            return Ok(QuoteTask {
                revision,
                request,
                state: TaskState::Ready {
                    quote: slot.quote.clone(),
                    slot: Arc::clone(&self.slot),
                },
            });
        }

        tracing::debug!(%key, revision, "quote requested");
        slot.quote = PriceQuote::pending(selection.clone());
        drop(slot);

        Ok(QuoteTask {
            revision,
            request,
            state: TaskState::Fetch {
                key,
                source: Arc::clone(&self.source),
                slot: Arc::clone(&self.slot),
                cache: self.cache.clone(),
                timeout: self.timeout,
            },
        })
    }
}

enum TaskState {
    Ready {
        quote: PriceQuote,
        slot: Arc<Mutex<QuoteSlot>>,
    },
    Fetch {
        key: PriceKey,
        source: Arc<dyn PricingSource>,
        slot: Arc<Mutex<QuoteSlot>>,
        cache: Option<PriceCache>,
        timeout: Duration,
    },
}

/// Result of running a [`QuoteTask`].
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome {
    /// The response was applied; this is now the current quote.
    Applied(PriceQuote),
    /// The selection changed while the request was in flight; the response
    /// was dropped.
    Superseded,
}

impl QuoteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, QuoteOutcome::Applied(_))
    }
}

/// An issued quote request.
///
/// `run` performs the pricing call and applies the result if the request
/// is still current. It is `Send + 'static`, so a UI can spawn it on its
/// executor.
pub struct QuoteTask {
    revision: u64,
    request: PriceRequest,
    state: TaskState,
}

impl fmt::Debug for QuoteTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteTask")
            .field("revision", &self.revision)
            .field("request", &self.request)
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl QuoteTask {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn request(&self) -> &PriceRequest {
        &self.request
    }

    /// Already resolved from the cache; `run` makes no call.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, TaskState::Ready { .. })
    }

    pub async fn run(self) -> QuoteOutcome {
        let (key, source, slot, cache, timeout) = match self.state {
            TaskState::Ready { quote, slot } => {
                return if slot.lock().revision == self.revision {
                    QuoteOutcome::Applied(quote)
                } else {
                    QuoteOutcome::Superseded
                };
            }
            TaskState::Fetch {
                key,
                source,
                slot,
                cache,
                timeout,
            } => (key, source, slot, cache, timeout),
        };

        let status = match tokio::time::timeout(timeout, source.quote(&self.request)).await {
            Ok(Ok(response)) => resolve_response(response),
            Ok(Err(failure)) => PriceStatus::Failed { failure },
            Err(_) => PriceStatus::Failed {
                failure: PricingFailure::NetworkError(format!(
                    "no response within {} ms",
                    timeout.as_millis()
                )),
            },
        };

        if let (PriceStatus::Resolved { unit_price }, Some(cache)) = (&status, &cache) {
            cache.insert(key.clone(), *unit_price);
        }

        let mut slot = slot.lock();
        if slot.revision != self.revision {
            tracing::debug!(
                %key,
                revision = self.revision,
                current = slot.revision,
                "discarding superseded quote response"
            );
            return QuoteOutcome::Superseded;
        }

        match &status {
            PriceStatus::Failed { failure } => {
                tracing::warn!(%key, kind = failure.kind(), error = %failure, "quote failed");
            }
            _ => tracing::debug!(%key, revision = self.revision, "quote applied"),
        }
        slot.quote.status = status;
        QuoteOutcome::Applied(slot.quote.clone())
    }
}

fn resolve_response(response: PriceResponse) -> PriceStatus {
    let Some(currency) = Currency::from_code(&response.currency) else {
        return PriceStatus::Failed {
            failure: PricingFailure::ServerError(format!(
                "unsupported currency {:?}",
                response.currency
            )),
        };
    };
    match Money::from_decimal(response.retail_price, currency) {
        Some(unit_price) => PriceStatus::Resolved { unit_price },
        None => PriceStatus::Failed {
            failure: PricingFailure::ServerError(format!(
                "invalid retail price {}",
                response.retail_price
            )),
        },
    }
}
