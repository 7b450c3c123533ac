//! SQL warehouse store over sqlx (SQLite driver)

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use shared_types::{
    AnalysisOverview, AnalysisRecord, DashboardStats, DashboardSummary, Marker, Recommendation,
    RecommendationRoi, Scores, ViolationTally,
};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use super::summary::{RECENT_ANALYSES, TOP_RECOMMENDATIONS, TOP_VIOLATIONS};
use super::{AnalysisStore, StoreError, StoreResult};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS analyses (
        analysis_id TEXT PRIMARY KEY,
        video_id TEXT NOT NULL,
        title TEXT NOT NULL,
        duration_s REAL NOT NULL DEFAULT 0,
        mobility REAL NOT NULL DEFAULT 0,
        vision REAL NOT NULL DEFAULT 0,
        hearing REAL NOT NULL DEFAULT 0,
        cognition REAL NOT NULL DEFAULT 0,
        total REAL NOT NULL DEFAULT 0,
        issue_count INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS markers (
        marker_id TEXT PRIMARY KEY,
        analysis_id TEXT NOT NULL,
        type TEXT NOT NULL,
        ts_start_ms INTEGER NOT NULL,
        ts_end_ms INTEGER NOT NULL,
        confidence REAL NOT NULL DEFAULT 0,
        bbox TEXT,
        text TEXT,
        notes TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recommendations (
        rec_id TEXT PRIMARY KEY,
        analysis_id TEXT NOT NULL,
        title TEXT NOT NULL,
        impact TEXT NOT NULL,
        effort TEXT NOT NULL,
        policy TEXT NOT NULL,
        rationale TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_markers_analysis ON markers(analysis_id)",
    "CREATE INDEX IF NOT EXISTS idx_recommendations_analysis ON recommendations(analysis_id)",
    "CREATE INDEX IF NOT EXISTS idx_analyses_created ON analyses(created_at)",
];

#[derive(Debug, FromRow)]
struct AnalysisRow {
    analysis_id: String,
    video_id: String,
    title: String,
    duration_s: f64,
    mobility: f64,
    vision: f64,
    hearing: f64,
    cognition: f64,
    total: f64,
    issue_count: i64,
    created_at: String,
}

impl AnalysisRow {
    fn scores(&self) -> Scores {
        Scores {
            mobility: self.mobility,
            vision: self.vision,
            hearing: self.hearing,
            cognition: self.cognition,
            total: self.total,
        }
    }

    fn overview(&self) -> StoreResult<AnalysisOverview> {
        Ok(AnalysisOverview {
            analysis_id: self.analysis_id.clone(),
            video_id: self.video_id.clone(),
            title: self.title.clone(),
            duration_s: self.duration_s,
            scores: self.scores(),
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct MarkerRow {
    marker_id: String,
    kind: String,
    ts_start_ms: i64,
    ts_end_ms: i64,
    confidence: f64,
    bbox: Option<String>,
    text: Option<String>,
    notes: Option<String>,
}

impl TryFrom<MarkerRow> for Marker {
    type Error = StoreError;

    fn try_from(row: MarkerRow) -> StoreResult<Self> {
        Ok(Marker {
            marker_id: row.marker_id,
            kind: row.kind,
            ts_start_ms: row.ts_start_ms,
            ts_end_ms: row.ts_end_ms,
            confidence: row.confidence,
            bbox: row.bbox.as_deref().map(serde_json::from_str).transpose()?,
            text: row.text.as_deref().map(serde_json::from_str).transpose()?,
            notes: row.notes,
        })
    }
}

#[derive(Debug, FromRow)]
struct RecommendationRow {
    rec_id: String,
    title: String,
    impact: String,
    effort: String,
    policy: String,
    rationale: String,
}

impl TryFrom<RecommendationRow> for Recommendation {
    type Error = StoreError;

    fn try_from(row: RecommendationRow) -> StoreResult<Self> {
        Ok(Recommendation {
            rec_id: row.rec_id,
            title: row.title,
            impact: row.impact.parse().map_err(StoreError::Corrupt)?,
            effort: row.effort.parse().map_err(StoreError::Corrupt)?,
            policy: row.policy,
            rationale: row.rationale,
        })
    }
}

#[derive(Debug, FromRow)]
struct StatsRow {
    total_buildings: i64,
    total_violations: i64,
    avg_compliance: f64,
    high_priority_fixes: i64,
}

#[derive(Debug, FromRow)]
struct ViolationRow {
    kind: String,
    count: i64,
    avg_confidence: f64,
    videos_affected: i64,
}

#[derive(Debug, FromRow)]
struct RoiRow {
    title: String,
    impact: String,
    effort: String,
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("created_at '{}': {}", raw, e)))
}

pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Connect to the warehouse; schema creation happens in `initialize`
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        tracing::info!("Connecting to database: {}", database_url);

        // Every connection to an in-memory SQLite database gets its own database
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = options.connect(database_url).await?;
        Ok(Self { pool })
    }

    async fn load_markers(&self, analysis_id: &str) -> StoreResult<Vec<Marker>> {
        let rows: Vec<MarkerRow> = sqlx::query_as(
            r#"
            SELECT marker_id, type AS kind, ts_start_ms, ts_end_ms, confidence, bbox, text, notes
            FROM markers
            WHERE analysis_id = ?
            ORDER BY ts_start_ms, marker_id
            "#,
        )
        .bind(analysis_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Marker::try_from).collect()
    }

    async fn load_recommendations(&self, analysis_id: &str) -> StoreResult<Vec<Recommendation>> {
        let rows: Vec<RecommendationRow> = sqlx::query_as(
            r#"
            SELECT rec_id, title, impact, effort, policy, rationale
            FROM recommendations
            WHERE analysis_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(analysis_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Recommendation::try_from).collect()
    }
}

#[async_trait]
impl AnalysisStore for SqlStore {
    async fn initialize(&self) -> StoreResult<()> {
        tracing::info!("Running database migrations...");
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("Migrations complete");
        Ok(())
    }

    async fn store_analysis(&self, record: &AnalysisRecord) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO analyses (analysis_id, video_id, title, duration_s,
                mobility, vision, hearing, cognition, total, issue_count, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.analysis_id)
        .bind(&record.video_id)
        .bind(&record.title)
        .bind(record.duration_s)
        .bind(record.scores.mobility)
        .bind(record.scores.vision)
        .bind(record.scores.hearing)
        .bind(record.scores.cognition)
        .bind(record.scores.total)
        .bind(record.issue_count as i64)
        .bind(format_timestamp(&record.created_at))
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM markers WHERE analysis_id = ?")
            .bind(&record.analysis_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM recommendations WHERE analysis_id = ?")
            .bind(&record.analysis_id)
            .execute(&mut *tx)
            .await?;

        for marker in &record.markers {
            let bbox = marker.bbox.map(|b| serde_json::to_string(&b)).transpose()?;
            let text = marker
                .text
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;

            sqlx::query(
                r#"
                INSERT INTO markers (marker_id, analysis_id, type, ts_start_ms, ts_end_ms,
                    confidence, bbox, text, notes)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&marker.marker_id)
            .bind(&record.analysis_id)
            .bind(&marker.kind)
            .bind(marker.ts_start_ms)
            .bind(marker.ts_end_ms)
            .bind(marker.confidence)
            .bind(bbox)
            .bind(text)
            .bind(&marker.notes)
            .execute(&mut *tx)
            .await?;
        }

        for rec in &record.recommendations {
            sqlx::query(
                r#"
                INSERT INTO recommendations (rec_id, analysis_id, title, impact, effort,
                    policy, rationale)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&rec.rec_id)
            .bind(&record.analysis_id)
            .bind(&rec.title)
            .bind(rec.impact.as_str())
            .bind(rec.effort.as_str())
            .bind(&rec.policy)
            .bind(&rec.rationale)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(
            analysis_id = %record.analysis_id,
            markers = record.markers.len(),
            recommendations = record.recommendations.len(),
            "Stored analysis"
        );
        Ok(())
    }

    async fn get_analysis(&self, analysis_id: &str) -> StoreResult<Option<AnalysisRecord>> {
        let row: Option<AnalysisRow> = sqlx::query_as(
            r#"
            SELECT analysis_id, video_id, title, duration_s, mobility, vision, hearing,
                   cognition, total, issue_count, created_at
            FROM analyses
            WHERE analysis_id = ?
            "#,
        )
        .bind(analysis_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let markers = self.load_markers(analysis_id).await?;
        let recommendations = self.load_recommendations(analysis_id).await?;

        Ok(Some(AnalysisRecord {
            scores: row.scores(),
            created_at: parse_timestamp(&row.created_at)?,
            analysis_id: row.analysis_id,
            video_id: row.video_id,
            title: row.title,
            duration_s: row.duration_s,
            issue_count: row.issue_count.max(0) as usize,
            markers,
            recommendations,
        }))
    }

    async fn dashboard(&self) -> StoreResult<DashboardSummary> {
        let stats: StatsRow = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(DISTINCT video_id) FROM analyses) AS total_buildings,
                (SELECT COUNT(*) FROM markers) AS total_violations,
                (SELECT COALESCE(ROUND(AVG(total)), 0.0) FROM analyses) AS avg_compliance,
                (SELECT COUNT(*) FROM recommendations WHERE impact = 'high') AS high_priority_fixes
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let analyses: Vec<AnalysisRow> = sqlx::query_as(
            r#"
            SELECT analysis_id, video_id, title, duration_s, mobility, vision, hearing,
                   cognition, total, issue_count, created_at
            FROM analyses
            ORDER BY created_at DESC, analysis_id DESC
            LIMIT ?
            "#,
        )
        .bind(RECENT_ANALYSES as i64)
        .fetch_all(&self.pool)
        .await?;

        let violations: Vec<ViolationRow> = sqlx::query_as(
            r#"
            SELECT
                type AS kind,
                COUNT(*) AS count,
                AVG(confidence) AS avg_confidence,
                COUNT(DISTINCT analysis_id) AS videos_affected
            FROM markers
            GROUP BY type
            ORDER BY count DESC, kind ASC
            LIMIT ?
            "#,
        )
        .bind(TOP_VIOLATIONS as i64)
        .fetch_all(&self.pool)
        .await?;

        // Cost and value tiers match Effort::estimated_cost and Impact::risk_mitigation_value
        let recommendations: Vec<RoiRow> = sqlx::query_as(
            r#"
            SELECT title, impact, effort
            FROM recommendations
            ORDER BY
                (CASE impact WHEN 'high' THEN 50000 WHEN 'medium' THEN 20000 ELSE 5000 END)
                - (CASE effort WHEN 'low' THEN 1000 WHEN 'medium' THEN 5000 ELSE 20000 END) DESC,
                title ASC, impact ASC, effort ASC
            LIMIT ?
            "#,
        )
        .bind(TOP_RECOMMENDATIONS as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardSummary {
            stats: DashboardStats {
                total_buildings: stats.total_buildings as u64,
                total_violations: stats.total_violations as u64,
                avg_compliance: stats.avg_compliance,
                high_priority_fixes: stats.high_priority_fixes as u64,
            },
            analyses: analyses
                .iter()
                .map(AnalysisRow::overview)
                .collect::<StoreResult<_>>()?,
            violations: violations
                .into_iter()
                .map(|row| ViolationTally {
                    kind: row.kind,
                    count: row.count as u64,
                    avg_confidence: row.avg_confidence,
                    videos_affected: row.videos_affected as u64,
                })
                .collect(),
            recommendations: recommendations
                .into_iter()
                .map(|row| -> StoreResult<RecommendationRoi> {
                    Ok(RecommendationRoi::new(
                        row.title,
                        row.impact.parse().map_err(StoreError::Corrupt)?,
                        row.effort.parse().map_err(StoreError::Corrupt)?,
                    ))
                })
                .collect::<StoreResult<_>>()?,
        })
    }

    fn backend(&self) -> &'static str {
        "sql"
    }
}
