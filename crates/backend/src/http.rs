use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use trainer_core::model::{
    Book, BookId, MilestoneId, MilestoneRecord, Note, Pet, PetId, ReadingStatus, SessionId,
    TrainingSession,
};

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::records::{
    CreatedSession, DashboardRecord, GoalDraft, GoalRecord, NewPet, NewSession, SessionChanges,
    StatsRecord, SummaryRecord,
};
use crate::repository::TrainerBackend;
use crate::wire::{
    ActiveBody, BookDto, BookStatusBody, CreatedSessionDto, DashboardDto, ErrorBody, GoalBody,
    GoalDto, GoalEnvelopeDto, MilestoneDto, NewPetBody, NewSessionBody, NoteDto, PetDto,
    SessionChangesBody, SessionDto, StatsDto, SummaryDto, into_sessions,
};

/// `TrainerBackend` over the REST API.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    /// Build a client with the configured per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the TLS backend cannot be initialised.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let request = self.client.get(self.config.endpoint(path));
        let response = self.send(request, "GET", path).await?;
        decode(response).await
    }

    async fn write<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let label = method_label(&method);
        let request = self
            .client
            .request(method, self.config.endpoint(path))
            .json(body);
        let response = self.send(request, label, path).await?;
        decode(response).await
    }

    async fn send(
        &self,
        request: RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> Result<Response, BackendError> {
        tracing::debug!(method, path, "backend request");
        let response = request.send().await.map_err(|err| {
            tracing::warn!(method, path, error = %err, "backend request failed");
            transport_error(err)
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(method, path, status = status.as_u16(), "backend response");
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(method, path, "backend resource not found");
            return Err(BackendError::NotFound);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .unwrap_or_default()
            .message();
        tracing::warn!(method, path, status = status.as_u16(), %message, "backend rejected request");
        Err(BackendError::Status { status, message })
    }
}

fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::POST => "POST",
        Method::PATCH => "PATCH",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        _ => "GET",
    }
}

fn transport_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Http(err)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|err| BackendError::Decode(err.to_string()))
}

#[async_trait]
impl TrainerBackend for HttpBackend {
    async fn list_sessions(&self) -> Result<Vec<TrainingSession>, BackendError> {
        let dtos: Vec<SessionDto> = self.get("/training_sessions").await?;
        Ok(into_sessions(dtos)?)
    }

    async fn list_notes(&self) -> Result<Vec<Note>, BackendError> {
        let dtos: Vec<NoteDto> = self.get("/blogs").await?;
        Ok(dtos.into_iter().map(Note::from).collect())
    }

    async fn list_pets(&self) -> Result<Vec<Pet>, BackendError> {
        let dtos: Vec<PetDto> = self.get("/pets").await?;
        Ok(dtos.into_iter().map(Pet::from).collect())
    }

    async fn list_milestones(&self) -> Result<Vec<MilestoneRecord>, BackendError> {
        let dtos: Vec<MilestoneDto> = self.get("/milestones").await?;
        Ok(dtos.into_iter().map(MilestoneRecord::from).collect())
    }

    async fn dashboard(&self) -> Result<DashboardRecord, BackendError> {
        let dto: DashboardDto = self.get("/training/dashboard").await?;
        Ok(dto.into_record()?)
    }

    async fn summary(&self) -> Result<SummaryRecord, BackendError> {
        let dto: SummaryDto = self.get("/training_sessions/summary").await?;
        Ok(dto.into())
    }

    async fn stats(&self) -> Result<StatsRecord, BackendError> {
        let dto: StatsDto = self.get("/training/stats").await?;
        Ok(dto.into_record())
    }

    async fn certification_goal(&self) -> Result<Option<GoalRecord>, BackendError> {
        match self.get::<GoalEnvelopeDto>("/certification_goal").await {
            Ok(envelope) => Ok(envelope.into_record()),
            Err(BackendError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn default_books(&self) -> Result<Vec<Book>, BackendError> {
        let dtos: Vec<BookDto> = self.get("/books/defaults").await?;
        Ok(dtos.into_iter().map(Book::from).collect())
    }

    async fn my_books(&self) -> Result<Vec<Book>, BackendError> {
        let dtos: Vec<BookDto> = self.get("/books/my_list").await?;
        Ok(dtos.into_iter().map(Book::from).collect())
    }

    async fn create_session(&self, session: &NewSession) -> Result<CreatedSession, BackendError> {
        let body = NewSessionBody::from_new(session);
        let dto: CreatedSessionDto = self.write(Method::POST, "/training_sessions", &body).await?;
        Ok(dto.into_created()?)
    }

    async fn mark_milestone_celebrated(&self, id: MilestoneId) -> Result<(), BackendError> {
        let path = format!("/milestones/{id}/mark_celebrated");
        let request = self.client.patch(self.config.endpoint(&path));
        self.send(request, "PATCH", &path).await?;
        Ok(())
    }

    async fn update_session(
        &self,
        id: SessionId,
        changes: &SessionChanges,
    ) -> Result<TrainingSession, BackendError> {
        let path = format!("/training_sessions/{id}");
        let body = SessionChangesBody::from_changes(changes);
        let dto: SessionDto = self.write(Method::PATCH, &path, &body).await?;
        Ok(dto.into_session()?)
    }

    async fn add_book_to_list(&self, id: BookId) -> Result<Book, BackendError> {
        let path = format!("/books/{id}/add_to_list");
        let dto: BookDto = self.write(Method::POST, &path, &serde_json::json!({})).await?;
        Ok(dto.into())
    }

    async fn update_book_status(
        &self,
        id: BookId,
        status: ReadingStatus,
    ) -> Result<Book, BackendError> {
        let path = format!("/books/{id}");
        let dto: BookDto = self
            .write(Method::PATCH, &path, &BookStatusBody::new(status))
            .await?;
        Ok(dto.into())
    }

    async fn remove_book(&self, id: BookId) -> Result<(), BackendError> {
        let path = format!("/books/{id}");
        let request = self.client.delete(self.config.endpoint(&path));
        self.send(request, "DELETE", &path).await?;
        Ok(())
    }

    async fn create_pet(&self, pet: &NewPet) -> Result<Pet, BackendError> {
        let dto: PetDto = self
            .write(Method::POST, "/pets", &NewPetBody::from_new(pet))
            .await?;
        Ok(dto.into())
    }

    async fn set_pet_active(&self, id: PetId, active: bool) -> Result<Pet, BackendError> {
        let path = format!("/pets/{id}/active");
        let dto: PetDto = self
            .write(Method::PATCH, &path, &ActiveBody { active })
            .await?;
        Ok(dto.into())
    }

    async fn create_goal(&self, goal: &GoalDraft) -> Result<GoalRecord, BackendError> {
        let dto: GoalDto = self
            .write(Method::POST, "/certification_goal", &GoalBody::from_draft(goal))
            .await?;
        Ok(dto.into_record())
    }

    async fn update_goal(&self, goal: &GoalDraft) -> Result<GoalRecord, BackendError> {
        let dto: GoalDto = self
            .write(Method::PATCH, "/certification_goal", &GoalBody::from_draft(goal))
            .await?;
        Ok(dto.into_record())
    }
}
