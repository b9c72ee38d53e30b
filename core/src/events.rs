//! Typed client for the Nullam `/events` REST API.
//!
//! Each method is a single `Gateway` call with a fixed endpoint and a
//! concrete response type; status and decode handling is the gateway's.

use crate::error::Result;
use crate::gateway::Gateway;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    CompanyParticipationDto, EventDto, EventSummaryDto, ParticipantSummaryDto,
    ParticipationType, PersonParticipationDto, ValidationResult,
};

#[derive(Debug, Clone)]
pub struct EventsApi<T = ReqwestTransport> {
    gateway: Gateway<T>,
}

impl<T: Transport> EventsApi<T> {
    /// `gateway` must be rooted at the server, not at `/events`.
    pub fn new(gateway: Gateway<T>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    pub async fn create_event(&self, event: &EventDto) -> Result<ValidationResult> {
        self.gateway.post("/events/addEvent", event).await
    }

    /// `false` when the event is missing or already over.
    pub async fn delete_event(&self, id: i64) -> Result<bool> {
        self.gateway.delete(&format!("/events/deleteEvent/{id}")).await
    }

    pub async fn past_events(&self) -> Result<Vec<EventSummaryDto>> {
        self.gateway.get("/events/pastEvents").await
    }

    pub async fn future_events(&self) -> Result<Vec<EventSummaryDto>> {
        self.gateway.get("/events/futureEvents").await
    }

    pub async fn participants(&self, event_id: i64) -> Result<Vec<ParticipantSummaryDto>> {
        self.gateway
            .get(&format!("/events/participants/{event_id}"))
            .await
    }

    pub async fn add_person_participation(
        &self,
        participation: &PersonParticipationDto,
    ) -> Result<ValidationResult> {
        self.gateway
            .post("/events/addPersonParticipation", participation)
            .await
    }

    pub async fn add_company_participation(
        &self,
        participation: &CompanyParticipationDto,
    ) -> Result<ValidationResult> {
        self.gateway
            .post("/events/addCompanyParticipation", participation)
            .await
    }

    pub async fn edit_person_participation(
        &self,
        participation_id: i64,
        participation: &PersonParticipationDto,
    ) -> Result<ValidationResult> {
        self.gateway
            .put(
                &format!("/events/editPersonParticipation/{participation_id}"),
                participation,
            )
            .await
    }

    pub async fn edit_company_participation(
        &self,
        participation_id: i64,
        participation: &CompanyParticipationDto,
    ) -> Result<ValidationResult> {
        self.gateway
            .put(
                &format!("/events/editCompanyParticipation/{participation_id}"),
                participation,
            )
            .await
    }

    pub async fn delete_participation(
        &self,
        participation_type: ParticipationType,
        participation_id: i64,
    ) -> Result<bool> {
        self.gateway
            .delete(&format!(
                "/events/deleteParticipation/{participation_type}/{participation_id}"
            ))
            .await
    }
}
