use std::sync::Arc;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::ApiClient;
use crate::auth::UserId;
use crate::errors::ClientError;
use crate::models::{Course, PurchaseRecord};

#[derive(Clone)]
pub struct CourseService {
    api: Arc<ApiClient>,
}

impl CourseService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Fetches the full course snapshot, modules and videos included.
    #[instrument(skip(self))]
    pub async fn course_detail(&self, course_id: &str) -> Result<Course, ClientError> {
        let url = self
            .api
            .endpoint(&format!("learnhub/api/course/coursedetail/{course_id}"))?;
        let body: CourseDetailResponse = self.api.get_json(url).await?;
        Ok(body.coursedetail)
    }

    /// Fetches every purchase record for `user_id` in one request. The
    /// server answers 204 when the user owns nothing.
    #[instrument(skip(self, user_id))]
    pub async fn purchased_courses(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PurchaseRecord>, ClientError> {
        let url = self.api.endpoint("learnhub/api/payment/purchaseCourse")?;
        let response = self
            .api
            .post(url, &PurchaseListRequest { user_id: user_id.as_str() })
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let body: PurchaseListResponse = ApiClient::decode_or_error(response).await?;
        Ok(body.purchase_courses)
    }
}

#[derive(Debug, Deserialize)]
struct CourseDetailResponse {
    coursedetail: Course,
}

#[derive(Debug, Serialize)]
struct PurchaseListRequest<'a> {
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct PurchaseListResponse {
    #[serde(rename = "purchaseCourses")]
    purchase_courses: Vec<PurchaseRecord>,
}
