//! Typed wrappers over the portal's routes.

use serde::Serialize;
use serde_json::{json, Value};
use url::form_urlencoded;

use super::client::{ApiClient, RequestOptions};
use super::transport::Method;
use crate::error::{ExamPrepError, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// One of `upsc`, `mpsc`, `ssc`.
    pub exam_interest: String,
    pub password: String,
    pub confirm_password: String,
}

/// Fields left `None` are not sent and stay unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_interest: Option<String>,
}

/// A bookmark on a video or a paper. The unused id is sent as `null`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRequest {
    pub video_id: Option<i64>,
    pub paper_id: Option<i64>,
    pub bookmark_type: String,
}

impl BookmarkRequest {
    pub fn video(video_id: i64) -> Self {
        Self {
            video_id: Some(video_id),
            paper_id: None,
            bookmark_type: "video".to_string(),
        }
    }

    pub fn paper(paper_id: i64) -> Self {
        Self {
            video_id: None,
            paper_id: Some(paper_id),
            bookmark_type: "paper".to_string(),
        }
    }
}

/// Exam center fields for create and update. `None` fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maps_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

fn to_body<T: Serialize>(payload: &T) -> Result<String> {
    serde_json::to_string(payload)
        .map_err(|e| ExamPrepError::RequestFailed(format!("Failed to encode request body: {}", e)))
}

/// `?a=1&b=2`, or nothing when there are no filters.
fn query_string(filters: &[(&str, &str)]) -> String {
    if filters.is_empty() {
        return String::new();
    }
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(filters)
        .finish();
    format!("?{}", encoded)
}

/// Percent-encode one path segment. Spaces become `%20`, not `+`.
fn path_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn exam_filter(exam: Option<&str>) -> Vec<(&str, &str)> {
    exam.map(|exam| vec![("exam", exam)]).unwrap_or_default()
}

impl ApiClient {
    fn adopt_token(&self, response: &Value) -> Result<()> {
        match response.get("token").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => self.set_token(Some(token)),
            _ => Ok(()),
        }
    }

    // Authentication

    /// Create an account. A token in the answer is held and persisted.
    pub async fn register(&self, user: &RegisterRequest) -> Result<Value> {
        let options = RequestOptions::method(Method::Post).with_body(to_body(user)?);
        let response = self.request("/auth/register", options).await?;
        self.adopt_token(&response)?;
        Ok(response)
    }

    /// Sign in. A token in the answer is held and persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<Value> {
        let body = to_body(&json!({ "email": email, "password": password }))?;
        let response = self
            .request("/auth/login", RequestOptions::method(Method::Post).with_body(body))
            .await?;
        self.adopt_token(&response)?;
        Ok(response)
    }

    /// Sign out. The token is cleared whether or not the server was reached; a
    /// failed call is still reported.
    pub async fn logout(&self) -> Result<()> {
        let outcome = self
            .request("/auth/logout", RequestOptions::method(Method::Post))
            .await;
        let cleared = self.set_token(None);
        outcome?;
        cleared
    }

    pub async fn profile(&self) -> Result<Value> {
        self.request("/auth/profile", RequestOptions::get()).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Value> {
        let options = RequestOptions::method(Method::Put).with_body(to_body(update)?);
        self.request("/auth/profile", options).await
    }

    // Exams

    pub async fn exams(&self) -> Result<Value> {
        self.request("/exams", RequestOptions::get()).await
    }

    pub async fn exam(&self, id: i64) -> Result<Value> {
        self.request(&format!("/exams/{}", id), RequestOptions::get()).await
    }

    pub async fn exam_by_code(&self, code: &str) -> Result<Value> {
        self.request(&format!("/exams/code/{}", path_segment(code)), RequestOptions::get())
            .await
    }

    pub async fn exam_stats(&self, id: i64) -> Result<Value> {
        self.request(&format!("/exams/{}/stats", id), RequestOptions::get())
            .await
    }

    // Videos

    pub async fn videos(&self, filters: &[(&str, &str)]) -> Result<Value> {
        self.request(&format!("/videos{}", query_string(filters)), RequestOptions::get())
            .await
    }

    pub async fn video(&self, id: i64) -> Result<Value> {
        self.request(&format!("/videos/{}", id), RequestOptions::get()).await
    }

    pub async fn videos_by_exam(&self, exam_code: &str, filters: &[(&str, &str)]) -> Result<Value> {
        let endpoint = format!(
            "/videos/exam/{}{}",
            path_segment(exam_code),
            query_string(filters)
        );
        self.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn search_videos(&self, query: &str, filters: &[(&str, &str)]) -> Result<Value> {
        let endpoint = format!("/videos/search/{}{}", path_segment(query), query_string(filters));
        self.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn video_categories(&self) -> Result<Value> {
        self.request("/videos/categories/list", RequestOptions::get())
            .await
    }

    // Papers

    pub async fn papers(&self, filters: &[(&str, &str)]) -> Result<Value> {
        self.request(&format!("/papers{}", query_string(filters)), RequestOptions::get())
            .await
    }

    pub async fn paper(&self, id: i64) -> Result<Value> {
        self.request(&format!("/papers/{}", id), RequestOptions::get()).await
    }

    pub async fn papers_by_exam(&self, exam_code: &str, filters: &[(&str, &str)]) -> Result<Value> {
        let endpoint = format!(
            "/papers/exam/{}{}",
            path_segment(exam_code),
            query_string(filters)
        );
        self.request(&endpoint, RequestOptions::get()).await
    }

    /// Record a download and get the file location.
    pub async fn download_paper(&self, id: i64) -> Result<Value> {
        self.request(
            &format!("/papers/{}/download", id),
            RequestOptions::method(Method::Post),
        )
        .await
    }

    pub async fn search_papers(&self, query: &str, filters: &[(&str, &str)]) -> Result<Value> {
        let endpoint = format!("/papers/search/{}{}", path_segment(query), query_string(filters));
        self.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn paper_years(&self, exam: Option<&str>) -> Result<Value> {
        let endpoint = format!("/papers/years/list{}", query_string(&exam_filter(exam)));
        self.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn paper_types(&self, exam: Option<&str>) -> Result<Value> {
        let endpoint = format!("/papers/types/list{}", query_string(&exam_filter(exam)));
        self.request(&endpoint, RequestOptions::get()).await
    }

    // Schedules

    pub async fn schedules(&self, filters: &[(&str, &str)]) -> Result<Value> {
        self.request(&format!("/schedules{}", query_string(filters)), RequestOptions::get())
            .await
    }

    pub async fn schedule(&self, id: i64) -> Result<Value> {
        self.request(&format!("/schedules/{}", id), RequestOptions::get())
            .await
    }

    pub async fn schedules_by_exam(&self, exam_code: &str, filters: &[(&str, &str)]) -> Result<Value> {
        let endpoint = format!(
            "/schedules/exam/{}{}",
            path_segment(exam_code),
            query_string(filters)
        );
        self.request(&endpoint, RequestOptions::get()).await
    }

    /// Events from today on, soonest first. The server defaults `limit` to 10.
    pub async fn upcoming_schedules(&self, exam: Option<&str>, limit: u32) -> Result<Value> {
        let limit = limit.to_string();
        let mut filters = vec![("limit", limit.as_str())];
        filters.extend(exam_filter(exam));
        let endpoint = format!("/schedules/upcoming/list{}", query_string(&filters));
        self.request(&endpoint, RequestOptions::get()).await
    }

    /// Events of one month, `month` being 1-12.
    pub async fn calendar(&self, year: i32, month: u32, exam: Option<&str>) -> Result<Value> {
        let endpoint = format!(
            "/schedules/calendar/{}/{}{}",
            year,
            month,
            query_string(&exam_filter(exam))
        );
        self.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn event_types(&self) -> Result<Value> {
        self.request("/schedules/types/list", RequestOptions::get())
            .await
    }

    // Users

    pub async fn user_progress(&self, filters: &[(&str, &str)]) -> Result<Value> {
        self.request(&format!("/users/progress{}", query_string(filters)), RequestOptions::get())
            .await
    }

    pub async fn bookmarks(&self, filters: &[(&str, &str)]) -> Result<Value> {
        self.request(&format!("/users/bookmarks{}", query_string(filters)), RequestOptions::get())
            .await
    }

    pub async fn add_bookmark(&self, bookmark: &BookmarkRequest) -> Result<Value> {
        let options = RequestOptions::method(Method::Post).with_body(to_body(bookmark)?);
        self.request("/users/bookmarks", options).await
    }

    pub async fn remove_bookmark(&self, bookmark_id: i64) -> Result<Value> {
        self.request(
            &format!("/users/bookmarks/{}", bookmark_id),
            RequestOptions::method(Method::Delete),
        )
        .await
    }

    pub async fn user_stats(&self) -> Result<Value> {
        self.request("/users/stats", RequestOptions::get()).await
    }

    pub async fn dashboard(&self) -> Result<Value> {
        self.request("/users/dashboard", RequestOptions::get()).await
    }

    // Centers

    /// Active centers, optionally narrowed by `city` or `state`.
    pub async fn centers(&self, filters: &[(&str, &str)]) -> Result<Value> {
        self.request(&format!("/centers{}", query_string(filters)), RequestOptions::get())
            .await
    }

    pub async fn create_center(&self, center: &CenterDetails) -> Result<Value> {
        let options = RequestOptions::method(Method::Post).with_body(to_body(center)?);
        self.request("/centers", options).await
    }

    pub async fn update_center(&self, id: i64, changes: &CenterDetails) -> Result<Value> {
        let options = RequestOptions::method(Method::Put).with_body(to_body(changes)?);
        self.request(&format!("/centers/{}", id), options).await
    }

    /// Deactivate a center. The row is kept.
    pub async fn delete_center(&self, id: i64) -> Result<Value> {
        self.request(&format!("/centers/{}", id), RequestOptions::method(Method::Delete))
            .await
    }
}
