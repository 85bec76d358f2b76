//! # Grades Repository
//!
//! One operation per use case. Every operation returns an [`Outcome`]; all
//! remote failures are classified into [`ApiError`] here so callers only
//! ever see a message.

use super::error::{ApiError, RemoteError};
use super::remote::{RemoteClient, RemoteRequest};
use crate::gradebook::models::{
    AverageResponse, Grade, GradePatch, NewGradeRequest, NewStudentRequest, NewSubjectRequest,
    Student, Subject,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Success-or-failure result of a repository operation.
pub type Outcome<T> = Result<T, ApiError>;

/// Use-case level access to the grade-book service.
#[async_trait]
pub trait GradesRepository: Send + Sync {
    async fn list_students(&self) -> Outcome<Vec<Student>>;

    async fn create_student(&self, name: &str) -> Outcome<Student>;

    async fn list_subjects(&self) -> Outcome<Vec<Subject>>;

    async fn create_subject(&self, name: &str) -> Outcome<Subject>;

    async fn list_grades(
        &self,
        student_filter: Option<i64>,
        subject_filter: Option<i64>,
    ) -> Outcome<Vec<Grade>>;

    async fn create_grade(&self, student_id: i64, subject_id: i64, score: f64) -> Outcome<Grade>;

    async fn update_grade(&self, grade_id: i64, patch: GradePatch) -> Outcome<Grade>;

    async fn get_subject_average(&self, subject_id: i64) -> Outcome<AverageResponse>;
}

/// Repository over any [`RemoteClient`].
pub struct DefaultGradesRepository<C> {
    client: C,
}

impl<C: RemoteClient> DefaultGradesRepository<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Send the request, decode the payload, classify any failure.
    async fn call<T: DeserializeOwned>(
        &self,
        request: Result<RemoteRequest, RemoteError>,
    ) -> Outcome<T> {
        let (described, result) = match request {
            Ok(request) => {
                let described = request.describe();
                let result = self.fetch(request, &described).await;
                (described, result)
            }
            Err(error) => ("Building request".to_string(), Err(error)),
        };

        result.map_err(|error| {
            let api_error = ApiError::from(error);
            tracing::warn!("{described} failed: {api_error}");
            api_error
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RemoteRequest,
        described: &str,
    ) -> Result<T, RemoteError> {
        tracing::debug!("Repository call: {described}");
        let value = self.client.send(request).await?;
        serde_json::from_value(value)
            .map_err(|e| RemoteError::Decode(format!("Unexpected response for {described}: {e}")))
    }
}

#[async_trait]
impl<C: RemoteClient> GradesRepository for DefaultGradesRepository<C> {
    async fn list_students(&self) -> Outcome<Vec<Student>> {
        self.call(Ok(RemoteRequest::get("students"))).await
    }

    async fn create_student(&self, name: &str) -> Outcome<Student> {
        let body = NewStudentRequest {
            name: name.to_string(),
        };
        self.call(RemoteRequest::post("students").with_json(&body)).await
    }

    async fn list_subjects(&self) -> Outcome<Vec<Subject>> {
        self.call(Ok(RemoteRequest::get("subjects"))).await
    }

    async fn create_subject(&self, name: &str) -> Outcome<Subject> {
        let body = NewSubjectRequest {
            name: name.to_string(),
        };
        self.call(RemoteRequest::post("subjects").with_json(&body)).await
    }

    async fn list_grades(
        &self,
        student_filter: Option<i64>,
        subject_filter: Option<i64>,
    ) -> Outcome<Vec<Grade>> {
        let request = RemoteRequest::get("grades")
            .with_optional_query("student_id", student_filter)
            .with_optional_query("subject_id", subject_filter);
        self.call(Ok(request)).await
    }

    async fn create_grade(&self, student_id: i64, subject_id: i64, score: f64) -> Outcome<Grade> {
        let body = NewGradeRequest {
            student_id,
            subject_id,
            score,
        };
        self.call(RemoteRequest::post("grades").with_json(&body)).await
    }

    async fn update_grade(&self, grade_id: i64, patch: GradePatch) -> Outcome<Grade> {
        let request = RemoteRequest::patch(format!("grades/{grade_id}")).with_json(&patch);
        self.call(request).await
    }

    async fn get_subject_average(&self, subject_id: i64) -> Outcome<AverageResponse> {
        let request = RemoteRequest::get(format!("subjects/{subject_id}/average"));
        self.call(Ok(request)).await
    }
}
