//! Request orchestration for the dashboard.
//!
//! A [`Dashboard`] owns the current result set and replaces it wholesale on
//! every completed request. Each request path carries a sequence number; a
//! response that arrives after a newer request on the same path began is
//! dropped.

use crate::backend::OptionsBackend;
use crate::domain::news::{AnalyzeArticleRequest, ArticleAnalysis};
use crate::domain::options::Side;
use crate::domain::snapshot::{MultiSnapshotRequest, SymbolSnapshot};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod summary;
pub mod tickers;

/// Display options entered alongside the tickers.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotQuery {
    pub expiration: Option<String>,
    pub side: Side,
    pub limit: u32,
    pub news_count: u32,
    pub include_press_releases: bool,
}

impl Default for SnapshotQuery {
    fn default() -> Self {
        Self {
            expiration: None,
            side: Side::Both,
            limit: 20,
            news_count: 3,
            include_press_releases: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSelection {
    pub ticker: String,
    pub url: String,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub snapshots: Arc<Vec<SymbolSnapshot>>,
    pub error: Option<String>,
    pub selection: Option<ArticleSelection>,
    pub analysis: Option<Arc<ArticleAnalysis>>,
    pub analysis_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Nothing to send (no tickers after normalization).
    Skipped,
    /// Response was stored, success or failure.
    Applied,
    /// A newer request on the same path started first; the response was dropped.
    Superseded,
}

pub struct Dashboard {
    backend: Arc<dyn OptionsBackend>,
    batch_seq: AtomicU64,
    analysis_seq: AtomicU64,
    state: RwLock<DashboardState>,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn OptionsBackend>) -> Self {
        Self {
            backend,
            batch_seq: AtomicU64::new(0),
            analysis_seq: AtomicU64::new(0),
            state: RwLock::new(DashboardState::default()),
        }
    }

    pub async fn state(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Fetches a batch snapshot for `raw_tickers` (comma/space separated).
    ///
    /// Returns an error only for invalid display options, in which case no
    /// request is sent and the state is left alone. Backend failures are
    /// stored on the state: the snapshot list is cleared and `error` is set.
    pub async fn fetch_snapshots(
        &self,
        raw_tickers: &str,
        query: &SnapshotQuery,
    ) -> anyhow::Result<FetchOutcome> {
        let tickers = tickers::parse_tickers(raw_tickers);
        if tickers.is_empty() {
            tracing::debug!("no tickers after normalization; skipping request");
            return Ok(FetchOutcome::Skipped);
        }

        let req = MultiSnapshotRequest::try_new(
            tickers,
            query.expiration.clone(),
            query.side,
            query.limit,
            query.news_count,
            query.include_press_releases,
        )?;

        let seq = self.batch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            seq,
            tickers = ?req.tickers,
            side = %req.side,
            backend = self.backend.backend_name(),
            "fetching snapshots"
        );

        let res = self.backend.multi_snapshot(&req).await;

        let mut state = self.state.write().await;
        if self.batch_seq.load(Ordering::SeqCst) != seq {
            tracing::warn!(seq, "discarding superseded snapshot response");
            return Ok(FetchOutcome::Superseded);
        }

        // In-flight analyses belong to the replaced result set.
        self.analysis_seq.fetch_add(1, Ordering::SeqCst);
        state.selection = None;
        state.analysis = None;
        state.analysis_error = None;

        match res {
            Ok(snapshots) => {
                tracing::info!(seq, count = snapshots.len(), "snapshots loaded");
                state.snapshots = Arc::new(snapshots);
                state.error = None;
            }
            Err(err) => {
                tracing::warn!(seq, error = %err, "snapshot request failed");
                state.snapshots = Arc::new(Vec::new());
                state.error = Some(format!("{err:#}"));
            }
        }

        Ok(FetchOutcome::Applied)
    }

    /// Requests an impact analysis for one article. Failures clear only the
    /// analysis pane.
    pub async fn analyze_article(&self, ticker: &str, url: &str) -> anyhow::Result<FetchOutcome> {
        let req = AnalyzeArticleRequest::try_new(ticker, url)?;
        let seq = self.analysis_seq.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.write().await;
            state.selection = Some(ArticleSelection {
                ticker: req.ticker.clone(),
                url: req.url.clone(),
            });
            state.analysis = None;
            state.analysis_error = None;
        }

        tracing::info!(seq, ticker = %req.ticker, url = %req.url, "analyzing article");
        let res = self.backend.analyze_article(&req).await;

        let mut state = self.state.write().await;
        if self.analysis_seq.load(Ordering::SeqCst) != seq {
            tracing::warn!(seq, "discarding superseded article analysis");
            return Ok(FetchOutcome::Superseded);
        }

        match res {
            Ok(analysis) => {
                state.analysis = Some(Arc::new(analysis));
            }
            Err(err) => {
                tracing::warn!(seq, error = %err, "article analysis failed");
                state.analysis = None;
                state.analysis_error = Some(format!("{err:#}"));
            }
        }

        Ok(FetchOutcome::Applied)
    }
}
