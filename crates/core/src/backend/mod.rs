use crate::domain::news::{AnalyzeArticleRequest, ArticleAnalysis};
use crate::domain::snapshot::{MultiSnapshotRequest, SymbolSnapshot};

pub mod error;
pub mod http;

pub const MULTI_SNAPSHOT_PATH: &str = "/options/multi-snapshot";
pub const ANALYZE_ARTICLE_PATH: &str = "/news/analyze-article";

/// The two calls the dashboard issues on user action.
#[async_trait::async_trait]
pub trait OptionsBackend: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn multi_snapshot(
        &self,
        req: &MultiSnapshotRequest,
    ) -> anyhow::Result<Vec<SymbolSnapshot>>;

    async fn analyze_article(&self, req: &AnalyzeArticleRequest)
        -> anyhow::Result<ArticleAnalysis>;
}
