use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, Implementation, ListResourcesResult, PaginatedRequestParam, ProtocolVersion,
    RawResource, ReadResourceRequestParam, ReadResourceResult, ResourceContents,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{
    ErrorData as McpError, Json, RoleServer, ServerHandler, ServiceExt, tool, tool_handler,
    tool_router,
};
use tracing::{debug, info};

use crate::analyses::{self, AnalysisOptions, TrendPeriod};
use crate::analysis::AnalysisRegistry;
use crate::report;
use crate::types::Dataset;
use crate::utils::NumberFormatOptions;

use super::types::*;

/// Resource URI constants
mod resource_uris {
    pub const OVERVIEW: &str = "reviews://dataset/overview";
    pub const STRUCTURE: &str = "reviews://dataset/structure";
    pub const CATALOG: &str = "reviews://analysis/catalog";
}

/// The reviewscope MCP Server
#[derive(Clone)]
pub struct ReviewscopeMcpServer {
    dataset: Arc<Dataset>,
    registry: Arc<AnalysisRegistry>,
    options: Arc<AnalysisOptions>,
    format: NumberFormatOptions,
    tool_router: ToolRouter<Self>,
}

fn respond<T>(outcome: analyses::Outcome<T>) -> Result<Json<AnalysisResponse<T>>, String> {
    Ok(Json(outcome.into()))
}

impl ReviewscopeMcpServer {
    pub fn new(
        dataset: Arc<Dataset>,
        registry: Arc<AnalysisRegistry>,
        options: AnalysisOptions,
        format: NumberFormatOptions,
    ) -> Self {
        Self {
            dataset,
            registry,
            options: Arc::new(options),
            format,
            tool_router: Self::tool_router(),
        }
    }

    /// Text body of a resource, or `None` for an unknown URI.
    fn resource_text(&self, uri: &str) -> Option<String> {
        match uri {
            resource_uris::OVERVIEW => Some(report::overview_text(&self.dataset, &self.format)),
            resource_uris::STRUCTURE => Some(report::structure_text(&self.dataset, &self.format)),
            resource_uris::CATALOG => Some(report::catalog_text(&self.registry.catalog())),
            _ => None,
        }
    }
}

#[tool_router]
impl ReviewscopeMcpServer {
    #[tool(
        name = "review_score_distribution",
        description = "Distribution of star ratings (1-5) with percentages, mean, median and range."
    )]
    async fn review_score_distribution(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::ScoreDistribution>>, String> {
        respond(analyses::score_distribution(&self.dataset))
    }

    #[tool(
        name = "sentiment_analysis",
        description = "Split reviews into positive, negative and neutral using a fixed word lexicon."
    )]
    async fn sentiment_analysis(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::SentimentBreakdown>>, String> {
        respond(analyses::sentiment_breakdown(&self.dataset))
    }

    #[tool(
        name = "top_reviewers",
        description = "Users with the most reviews. Reviews without a user name are grouped as \"Unknown\"."
    )]
    async fn top_reviewers(
        &self,
        Parameters(req): Parameters<TopReviewersRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::TopReviewers>>, String> {
        respond(analyses::top_reviewers(
            &self.dataset,
            req.limit,
            &self.options,
        ))
    }

    #[tool(
        name = "version_analysis",
        description = "Most common app versions among reviews, with their share of all reviews."
    )]
    async fn version_analysis(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::VersionDistribution>>, String> {
        respond(analyses::version_distribution(&self.dataset, &self.options))
    }

    #[tool(
        name = "thumbs_up_analysis",
        description = "Thumbs-up engagement: total, average, maximum and share of reviews with at least one."
    )]
    async fn thumbs_up_analysis(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::ThumbsUpStats>>, String> {
        respond(analyses::thumbs_up(&self.dataset))
    }

    #[tool(
        name = "content_length_analysis",
        description = "Review length in characters and words, ignoring empty reviews."
    )]
    async fn content_length_analysis(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::ContentLength>>, String> {
        respond(analyses::content_length(&self.dataset))
    }

    #[tool(
        name = "common_topics",
        description = "Most frequent words in review text, excluding stopwords and words of three letters or fewer."
    )]
    async fn common_topics(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::KeywordFrequency>>, String> {
        respond(analyses::common_topics(&self.dataset, &self.options))
    }

    #[tool(
        name = "rating_by_version",
        description = "Average rating per app version, best first."
    )]
    async fn rating_by_version(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::RatingByVersion>>, String> {
        respond(analyses::rating_by_version(&self.dataset, &self.options))
    }

    #[tool(
        name = "review_trends",
        description = "Review counts and average rating for the most recent days or months, oldest first."
    )]
    async fn review_trends(
        &self,
        Parameters(req): Parameters<ReviewTrendsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::ReviewTrends>>, String> {
        let period = req
            .period
            .as_deref()
            .and_then(|p| p.parse::<TrendPeriod>().ok());
        respond(analyses::review_trends(
            &self.dataset,
            period,
            req.periods,
            &self.options,
        ))
    }

    #[tool(
        name = "user_engagement_score",
        description = "Users ranked by engagement score: 0.4 x reviews + 0.3 x thumbs up + 0.3 x average rating."
    )]
    async fn user_engagement_score(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::UserEngagement>>, String> {
        respond(analyses::user_engagement(&self.dataset, &self.options))
    }

    #[tool(
        name = "review_completeness",
        description = "How many rows have a non-blank value for each column."
    )]
    async fn review_completeness(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::Completeness>>, String> {
        respond(analyses::completeness(&self.dataset))
    }

    #[tool(
        name = "keyword_sentiment_analysis",
        description = "Sentiment of the reviews that mention a keyword, with a few sample reviews."
    )]
    async fn keyword_sentiment_analysis(
        &self,
        Parameters(req): Parameters<KeywordSentimentRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::KeywordSentiment>>, String> {
        respond(analyses::keyword_sentiment(
            &self.dataset,
            req.keyword.as_deref(),
            &self.options,
        ))
    }

    #[tool(
        name = "rating_sentiment",
        description = "Sentiment implied by star ratings: 4-5 positive, 3 neutral, 1-2 negative."
    )]
    async fn rating_sentiment(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::SentimentBreakdown>>, String> {
        respond(analyses::rating_sentiment(&self.dataset))
    }

    #[tool(
        name = "length_by_rating",
        description = "Average and longest review length for each star rating."
    )]
    async fn length_by_rating(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::LengthByRating>>, String> {
        respond(analyses::length_by_rating(&self.dataset))
    }

    #[tool(
        name = "issue_mentions",
        description = "How many reviews mention common problems such as crashes, buffering or login trouble."
    )]
    async fn issue_mentions(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::MentionCounts>>, String> {
        respond(analyses::issue_mentions(&self.dataset))
    }

    #[tool(
        name = "feature_mentions",
        description = "How many reviews talk about each product feature group (casting, downloads, pricing, ...)."
    )]
    async fn feature_mentions(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::MentionCounts>>, String> {
        respond(analyses::feature_mentions(&self.dataset))
    }

    #[tool(
        name = "summary_report",
        description = "Headline numbers: review count, rating statistics, sentiment splits, top version and top keyword."
    )]
    async fn summary_report(
        &self,
        Parameters(_req): Parameters<NoArgsRequest>,
    ) -> Result<Json<AnalysisResponse<analyses::SummaryReport>>, String> {
        respond(analyses::summary_report(&self.dataset, &self.options))
    }
}

#[tool_handler]
impl ServerHandler for ReviewscopeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "reviewscope".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Reviewscope Review Analytics".to_string()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Reviewscope MCP Server - Descriptive statistics over an app-review export. \
                 Query rating distributions, sentiment, reviewers, versions, trends and keywords."
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: vec![
                RawResource::new(resource_uris::OVERVIEW, "Dataset Overview".to_string())
                    .no_annotation(),
                RawResource::new(resource_uris::STRUCTURE, "Dataset Structure".to_string())
                    .no_annotation(),
                RawResource::new(resource_uris::CATALOG, "Analysis Catalog".to_string())
                    .no_annotation(),
            ],
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        debug!("Reading resource {uri}");
        match self.resource_text(&uri) {
            Some(text) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(text, uri)],
            }),
            None => Err(McpError::resource_not_found(
                "resource_not_found",
                Some(rmcp::serde_json::json!({ "uri": uri })),
            )),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_mcp_server(
    dataset: Arc<Dataset>,
    registry: Arc<AnalysisRegistry>,
    options: AnalysisOptions,
    format: NumberFormatOptions,
) -> anyhow::Result<()> {
    use rmcp::transport::stdio;

    info!(
        "Starting MCP server over stdio with {} reviews ({})",
        dataset.len(),
        dataset.origin
    );
    let server = ReviewscopeMcpServer::new(dataset, registry, options, format);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
