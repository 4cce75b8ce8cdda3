//! Comments backend client and the two-phase token pipeline
//!
//! The backend is one endpoint switched by a `mode` query parameter:
//!
//! - `?videoId=<id>&mode=token` returns a continuation token (phase 1)
//! - `?token=<token>&mode=comments` returns comments for that token (phase 2)
//! - `?videoId=<id>` returns comments directly (phase 2 fallback)
//!
//! [`CommentPipeline`] lets callers issue phase 1 early, lets phase 2 wait on the
//! published [`TokenState`], and keeps one in-flight request per
//! `(video_id, mode)`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use url::Url;

use crate::config::CommentsConfig;
use crate::crawler::fetcher::{FetchedResponse, PageFetcher};
use crate::crawler::headers::build_comment_headers;
use crate::error::{Error, Result};
use crate::models::{CommentPage, CommentSort, CommentToken};
use crate::utils::error::{FetchError, ParseError};

/// Body shape of a non-success response
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the comments backend
pub struct CommentClient {
    fetcher: PageFetcher,
    endpoint: Url,
}

impl CommentClient {
    /// Create a client from configuration
    pub fn new(config: &CommentsConfig) -> std::result::Result<Self, FetchError> {
        let fetcher = PageFetcher::with_timeout(std::time::Duration::from_secs(
            config.request_timeout_secs,
        ))?;
        Ok(Self {
            fetcher,
            endpoint: parse_endpoint(&config.endpoint)?,
        })
    }

    /// Create a client with default settings against `endpoint`
    pub fn with_endpoint(endpoint: &str) -> std::result::Result<Self, FetchError> {
        Self::new(&CommentsConfig {
            endpoint: endpoint.to_string(),
            ..CommentsConfig::default()
        })
    }

    /// Phase-1 URL: `?videoId=<id>&mode=token`
    pub fn token_url(&self, video_id: &str, sort: CommentSort) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("videoId", video_id)
            .append_pair("mode", "token");
        with_sort(url, sort)
    }

    /// Phase-2 URL for a token: `?token=<token>&mode=comments`
    ///
    /// The token already encodes the ordering, so no `sort` is added.
    pub fn comments_url(&self, token: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("token", token)
            .append_pair("mode", "comments");
        url
    }

    /// Phase-2 fallback URL: `?videoId=<id>`
    pub fn direct_url(&self, video_id: &str, sort: CommentSort) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("videoId", video_id);
        with_sort(url, sort)
    }

    /// Fetch the continuation token for a video
    pub async fn fetch_token(&self, video_id: &str, sort: CommentSort) -> Result<CommentToken> {
        self.get_json(self.token_url(video_id, sort)).await
    }

    /// Fetch comments for a token obtained in phase 1
    pub async fn fetch_by_token(&self, token: &str) -> Result<CommentPage> {
        self.get_json(self.comments_url(token)).await
    }

    /// Fetch comments by video id, without a token
    pub async fn fetch_direct(&self, video_id: &str, sort: CommentSort) -> Result<CommentPage> {
        self.get_json(self.direct_url(video_id, sort)).await
    }

    /// Fetch the page following `continuation`
    pub async fn fetch_next_page(&self, continuation: &str) -> Result<CommentPage> {
        self.get_json(self.comments_url(continuation)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.fetcher.get(url.as_str(), build_comment_headers()).await?;

        if !response.is_success() {
            let message = error_message(&response);
            tracing::warn!(
                url = %url,
                status = response.status,
                message = message.as_deref().unwrap_or(""),
                "Comments request failed"
            );
            return Err(FetchError::api(response.status, message).into());
        }

        let body = response.text()?;
        let value = serde_json::from_str(&body).map_err(ParseError::from)?;
        Ok(value)
    }
}

fn parse_endpoint(endpoint: &str) -> std::result::Result<Url, FetchError> {
    Url::parse(endpoint).map_err(|e| FetchError::InvalidUrl(format!("{endpoint}: {e}")))
}

fn with_sort(mut url: Url, sort: CommentSort) -> Url {
    if sort == CommentSort::Newest {
        url.query_pairs_mut().append_pair("sort", sort.as_str());
    }
    url
}

/// Server-provided `error` message from a failure body, if any
fn error_message(response: &FetchedResponse) -> Option<String> {
    serde_json::from_str::<ErrorBody>(&response.text_lossy())
        .ok()
        .and_then(|body| body.error)
}

/// Phase-1 outcome as seen by phase 2
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// Token request still in flight
    Pending,
    /// Phase 1 produced a usable token
    ReadyWithToken {
        token: String,
        total_count_text: Option<String>,
    },
    /// Phase 1 failed or returned no token; phase 2 falls back to the video id
    ReadyWithoutToken,
}

impl TokenState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    fn from_result(result: &Result<CommentToken>) -> Self {
        match result {
            Ok(token) => match token.usable_token() {
                Some(t) => Self::ReadyWithToken {
                    token: t.to_string(),
                    total_count_text: token.total_count_text.clone(),
                },
                None => Self::ReadyWithoutToken,
            },
            Err(_) => Self::ReadyWithoutToken,
        }
    }
}

type Published<T> = Option<std::result::Result<T, Arc<Error>>>;

/// A spawned request whose result every caller of the same key shares
struct Flight<T> {
    rx: watch::Receiver<Published<T>>,
}

impl<T> Clone for Flight<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Flight<T> {
    fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(None);
        tokio::spawn(async move {
            let result = fut.await.map_err(Arc::new);
            let _ = tx.send(Some(result));
        });
        Self { rx }
    }

    /// Finished with an error; a new start may replace it
    fn failed(&self) -> bool {
        matches!(&*self.rx.borrow(), Some(Err(_)))
    }

    fn peek(&self) -> Option<T> {
        match &*self.rx.borrow() {
            Some(Ok(value)) => Some(value.clone()),
            _ => None,
        }
    }

    async fn wait(&self) -> Result<T> {
        let mut rx = self.rx.clone();
        let published = rx
            .wait_for(Option::is_some)
            .await
            .map(|guard| guard.clone())
            .map_err(|_| Error::Aborted)?;

        match published {
            Some(Ok(value)) => Ok(value),
            Some(Err(err)) => Err(Error::Shared(err)),
            None => Err(Error::Aborted),
        }
    }

    fn same(&self, other: &Self) -> bool {
        self.rx.same_channel(&other.rx)
    }
}

/// Handle to a phase-1 token request
///
/// Cloning is cheap; every clone observes the same request.
#[derive(Clone)]
pub struct TokenHandle {
    flight: Flight<CommentToken>,
    state: watch::Receiver<TokenState>,
}

impl TokenHandle {
    /// Current state without waiting
    pub fn state(&self) -> TokenState {
        self.state.borrow().clone()
    }

    /// Wait until phase 1 settles and return the published state
    pub async fn ready(&self) -> TokenState {
        let mut rx = self.state.clone();
        rx.wait_for(|s| !s.is_pending())
            .await
            .map(|guard| guard.clone())
            .unwrap_or(TokenState::ReadyWithoutToken)
    }

    /// Wait for the phase-1 response itself, including its error
    pub async fn token(&self) -> Result<CommentToken> {
        self.flight.wait().await
    }
}

type CacheKey = (String, CommentSort);

#[derive(Default)]
struct Entry {
    token: Option<TokenHandle>,
    comments: Option<Flight<CommentPage>>,
}

/// Two-phase comment loader with a per-video cache
///
/// Results are cached by `(video_id, sort)` regardless of whether they came
/// through the token path or the direct fallback. Failed requests are not
/// cached; the next call starts a fresh one.
pub struct CommentPipeline {
    client: Arc<CommentClient>,
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl CommentPipeline {
    pub fn new(client: CommentClient) -> Self {
        Self {
            client: Arc::new(client),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Underlying client, for one-off requests such as next pages
    pub fn client(&self) -> &CommentClient {
        &self.client
    }

    /// Start phase 1 for a video, or return the request already started
    ///
    /// A token request that already failed is started again. `load_comments`
    /// never starts phase 1 itself.
    pub async fn prefetch_token(&self, video_id: &str, sort: CommentSort) -> TokenHandle {
        let mut entries = self.entries.lock().await;
        let entry = entries.entry((video_id.to_string(), sort)).or_default();

        if let Some(handle) = &entry.token {
            if !handle.flight.failed() {
                tracing::trace!(video_id = %video_id, "Reusing token request");
                return handle.clone();
            }
        }

        tracing::debug!(video_id = %video_id, sort = sort.as_str(), "Requesting comment token");

        let (state_tx, state_rx) = watch::channel(TokenState::Pending);
        let client = Arc::clone(&self.client);
        let id = video_id.to_string();

        let flight = Flight::spawn(async move {
            let result = client.fetch_token(&id, sort).await;
            if let Err(err) = &result {
                tracing::warn!(video_id = %id, error = %err, "Token request failed, falling back");
            }
            state_tx.send_replace(TokenState::from_result(&result));
            result
        });

        let handle = TokenHandle {
            flight,
            state: state_rx,
        };
        entry.token = Some(handle.clone());
        handle
    }

    /// Load the first page of comments for a video
    ///
    /// Waits for phase 1 when it was prefetched, then issues exactly one
    /// request: by token when one was published, by video id otherwise.
    /// Without a prefetch the request goes straight to the video id.
    pub async fn load_comments(&self, video_id: &str, sort: CommentSort) -> Result<CommentPage> {
        let key = (video_id.to_string(), sort);

        let flight = {
            let mut entries = self.entries.lock().await;
            let entry = entries.entry(key.clone()).or_default();

            let existing = entry.comments.as_ref().filter(|f| !f.failed()).cloned();
            match existing {
                Some(flight) => flight,
                None => {
                    let flight = Flight::spawn(load_page(
                        Arc::clone(&self.client),
                        entry.token.clone(),
                        video_id.to_string(),
                        sort,
                    ));
                    entry.comments = Some(flight.clone());
                    flight
                }
            }
        };

        let result = flight.wait().await;

        if result.is_err() {
            let mut entries = self.entries.lock().await;
            if let Some(entry) = entries.get_mut(&key) {
                if entry.comments.as_ref().is_some_and(|f| f.same(&flight)) {
                    entry.comments = None;
                }
            }
        }

        result
    }

    /// Fetch the page after `continuation`; never cached
    pub async fn fetch_next_page(&self, continuation: &str) -> Result<CommentPage> {
        self.client.fetch_next_page(continuation).await
    }

    /// Cached first page, if one has completed successfully
    pub async fn cached(&self, video_id: &str, sort: CommentSort) -> Option<CommentPage> {
        let entries = self.entries.lock().await;
        entries
            .get(&(video_id.to_string(), sort))
            .and_then(|entry| entry.comments.as_ref())
            .and_then(Flight::peek)
    }

    /// Drop everything cached for a video and sort order
    pub async fn invalidate(&self, video_id: &str, sort: CommentSort) {
        self.entries.lock().await.remove(&(video_id.to_string(), sort));
    }

    /// Drop the whole cache
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

async fn load_page(
    client: Arc<CommentClient>,
    handle: Option<TokenHandle>,
    video_id: String,
    sort: CommentSort,
) -> Result<CommentPage> {
    let state = match handle {
        Some(handle) => handle.ready().await,
        None => TokenState::ReadyWithoutToken,
    };

    match state {
        TokenState::ReadyWithToken {
            token,
            total_count_text,
        } => {
            tracing::debug!(video_id = %video_id, "Loading comments by token");
            let mut page = client.fetch_by_token(&token).await?;
            if page.total_count_text.is_none() {
                page.total_count_text = total_count_text;
            }
            Ok(page)
        }
        TokenState::ReadyWithoutToken | TokenState::Pending => {
            tracing::debug!(video_id = %video_id, "Loading comments by video id");
            client.fetch_direct(&video_id, sort).await
        }
    }
}
