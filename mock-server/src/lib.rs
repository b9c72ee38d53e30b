use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

const MAX_EVENT_INFO: usize = 1000;
const MAX_PERSON_INFO: usize = 1500;
const MAX_COMPANY_INFO: usize = 5000;
/// Attendee counts are 32-bit signed on the real server.
const MAX_COMPANY_PARTICIPANTS: i64 = i32::MAX as i64;

const MISSING_OR_BLANK: &str = "One of the fields is missing or blank.";
const TIME_IN_PAST: &str = "Event time cannot be in the past.";
const EVENT_INFO_TOO_LONG: &str = "Additional info is too long.";
const PARTICIPATION_INFO_TOO_LONG: &str = "Additional info is longer than the allowed length.";
const INVALID_CODE_FORMAT: &str = "Code format is invalid.";
const EVENT_NOT_FOUND: &str = "Event not found";
const INVALID_PAYMENT: &str = "Invalid type of payment.";
const INVALID_PARTICIPANT_COUNT: &str = "Number of participants is invalid.";
const PARTICIPATION_NOT_FOUND: &str = "Participation not found.";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub time: NaiveDateTime,
    pub location: String,
    pub additional_info: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: i64,
    pub name: String,
    pub time: NaiveDateTime,
    pub location: String,
    pub number_of_participants: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipationType {
    Person,
    Company,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub name: String,
    pub id_code: String,
    pub participation_id: i64,
    #[serde(rename = "type")]
    pub participation_type: ParticipationType,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    pub name: Option<String>,
    pub time: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub additional_info: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonParticipationInput {
    pub event_id: Option<i64>,
    pub payment_method: Option<String>,
    pub additional_info: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub personal_code: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyParticipationInput {
    pub event_id: Option<i64>,
    pub payment_method: Option<String>,
    pub additional_info: Option<String>,
    pub company_name: Option<String>,
    pub registration_code: Option<String>,
    pub number_of_participants: Option<i64>,
}

#[derive(Clone, Debug)]
enum Participant {
    Person {
        first_name: String,
        last_name: String,
        personal_code: String,
    },
    Company {
        company_name: String,
        registration_code: String,
        number_of_participants: u32,
    },
}

#[derive(Clone, Debug)]
struct Participation {
    event_id: i64,
    payment_method: String,
    participant: Participant,
}

impl Participation {
    fn kind(&self) -> ParticipationType {
        match self.participant {
            Participant::Person { .. } => ParticipationType::Person,
            Participant::Company { .. } => ParticipationType::Company,
        }
    }

    fn headcount(&self) -> u32 {
        match self.participant {
            Participant::Person { .. } => 1,
            Participant::Company {
                number_of_participants,
                ..
            } => number_of_participants,
        }
    }
}

/// In-memory event and participation tables.
#[derive(Debug, Default)]
pub struct Store {
    next_event_id: i64,
    next_participation_id: i64,
    events: BTreeMap<i64, Event>,
    participations: BTreeMap<i64, Participation>,
}

impl Store {
    /// Insert an event without validation. Lets tests seed past events,
    /// which the API itself refuses to create.
    pub fn insert_event(
        &mut self,
        name: &str,
        time: NaiveDateTime,
        location: &str,
        additional_info: Option<String>,
    ) -> i64 {
        self.next_event_id += 1;
        let id = self.next_event_id;
        self.events.insert(
            id,
            Event {
                id,
                name: name.to_string(),
                time,
                location: location.to_string(),
                additional_info,
            },
        );
        id
    }

    fn insert_participation(&mut self, participation: Participation) -> i64 {
        self.next_participation_id += 1;
        let id = self.next_participation_id;
        self.participations.insert(id, participation);
        id
    }

    /// Persons plus company attendees, saturating at `u32::MAX`.
    fn headcount(&self, event_id: i64) -> u32 {
        let total: u64 = self
            .participations
            .values()
            .filter(|p| p.event_id == event_id)
            .map(|p| u64::from(p.headcount()))
            .sum();
        u32::try_from(total).unwrap_or(u32::MAX)
    }

    fn summaries(&self, keep: impl Fn(&Event) -> bool) -> Vec<EventSummary> {
        self.events
            .values()
            .filter(|&event| keep(event))
            .map(|event| EventSummary {
                id: event.id,
                name: event.name.clone(),
                time: event.time,
                location: event.location.clone(),
                number_of_participants: self.headcount(event.id),
            })
            .collect()
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_db(Db::default())
}

pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/events/addEvent", post(create_event))
        .route("/events/deleteEvent/{id}", delete(delete_event))
        .route("/events/pastEvents", get(past_events))
        .route("/events/futureEvents", get(future_events))
        .route("/events/participants/{event_id}", get(participants))
        .route("/events/addPersonParticipation", post(add_person))
        .route("/events/addCompanyParticipation", post(add_company))
        .route("/events/editPersonParticipation/{id}", put(edit_person))
        .route("/events/editCompanyParticipation/{id}", put(edit_company))
        .route(
            "/events/deleteParticipation/{kind}/{id}",
            delete(delete_participation),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_db(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().is_none_or(|s| s.trim().is_empty())
}

fn is_personal_code(code: &str) -> bool {
    code.len() == 11
        && code.chars().all(|c| c.is_ascii_digit())
        && matches!(code.as_bytes()[0], b'1'..=b'8')
}

fn is_registry_code(code: &str) -> bool {
    (7..=8).contains(&code.len()) && code.chars().all(|c| c.is_ascii_digit())
}

fn is_payment_method(method: &str) -> bool {
    matches!(method, "BANK_TRANSFER" | "CASH")
}

fn info_too_long(info: &Option<String>, limit: usize) -> bool {
    info.as_ref().is_some_and(|s| s.chars().count() > limit)
}

fn validate_event(input: &CreateEvent) -> Vec<String> {
    let mut errors = Vec::new();
    if is_blank(&input.name) || input.time.is_none() || is_blank(&input.location) {
        errors.push(MISSING_OR_BLANK.to_string());
    }
    if input.time.is_some_and(|time| time < now()) {
        errors.push(TIME_IN_PAST.to_string());
    }
    if info_too_long(&input.additional_info, MAX_EVENT_INFO) {
        errors.push(EVENT_INFO_TOO_LONG.to_string());
    }
    errors
}

fn validate_person(store: &Store, input: &PersonParticipationInput) -> Vec<String> {
    let (Some(event_id), Some(code), Some(payment)) = (
        input.event_id,
        input.personal_code.as_deref(),
        input.payment_method.as_deref(),
    ) else {
        return vec![MISSING_OR_BLANK.to_string()];
    };
    if is_blank(&input.first_name)
        || is_blank(&input.last_name)
        || code.trim().is_empty()
        || payment.trim().is_empty()
    {
        return vec![MISSING_OR_BLANK.to_string()];
    }

    let mut errors = Vec::new();
    if !is_personal_code(code) {
        errors.push(INVALID_CODE_FORMAT.to_string());
    }
    if info_too_long(&input.additional_info, MAX_PERSON_INFO) {
        errors.push(PARTICIPATION_INFO_TOO_LONG.to_string());
    }
    if !store.events.contains_key(&event_id) {
        errors.push(EVENT_NOT_FOUND.to_string());
    }
    if !is_payment_method(payment) {
        errors.push(INVALID_PAYMENT.to_string());
    }
    errors
}

fn validate_company(store: &Store, input: &CompanyParticipationInput) -> Vec<String> {
    let (Some(event_id), Some(code), Some(payment), Some(count)) = (
        input.event_id,
        input.registration_code.as_deref(),
        input.payment_method.as_deref(),
        input.number_of_participants,
    ) else {
        return vec![MISSING_OR_BLANK.to_string()];
    };
    if is_blank(&input.company_name) || code.trim().is_empty() || payment.trim().is_empty() {
        return vec![MISSING_OR_BLANK.to_string()];
    }

    let mut errors = Vec::new();
    if !is_registry_code(code) {
        errors.push(INVALID_CODE_FORMAT.to_string());
    }
    if info_too_long(&input.additional_info, MAX_COMPANY_INFO) {
        errors.push(PARTICIPATION_INFO_TOO_LONG.to_string());
    }
    if !store.events.contains_key(&event_id) {
        errors.push(EVENT_NOT_FOUND.to_string());
    }
    if !is_payment_method(payment) {
        errors.push(INVALID_PAYMENT.to_string());
    }
    if !(1..=MAX_COMPANY_PARTICIPANTS).contains(&count) {
        errors.push(INVALID_PARTICIPANT_COUNT.to_string());
    }
    errors
}

// Only called after validation, so every field is present.
fn person_record(input: PersonParticipationInput) -> Participation {
    Participation {
        event_id: input.event_id.unwrap_or_default(),
        payment_method: input.payment_method.unwrap_or_default(),
        participant: Participant::Person {
            first_name: input.first_name.unwrap_or_default(),
            last_name: input.last_name.unwrap_or_default(),
            personal_code: input.personal_code.unwrap_or_default(),
        },
    }
}

fn company_record(input: CompanyParticipationInput) -> Participation {
    Participation {
        event_id: input.event_id.unwrap_or_default(),
        payment_method: input.payment_method.unwrap_or_default(),
        participant: Participant::Company {
            company_name: input.company_name.unwrap_or_default(),
            registration_code: input.registration_code.unwrap_or_default(),
            number_of_participants: input
                .number_of_participants
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or_default(),
        },
    }
}

async fn create_event(
    State(db): State<Db>,
    Json(input): Json<CreateEvent>,
) -> Json<ValidationResult> {
    let errors = validate_event(&input);
    if errors.is_empty() {
        let (Some(name), Some(time), Some(location)) = (input.name, input.time, input.location)
        else {
            return Json(ValidationResult::from_errors(vec![MISSING_OR_BLANK.to_string()]));
        };
        let id = db
            .write()
            .await
            .insert_event(&name, time, &location, input.additional_info);
        info!(id, %name, %location, "event created");
    }
    Json(ValidationResult::from_errors(errors))
}

async fn delete_event(State(db): State<Db>, Path(id): Path<i64>) -> Json<bool> {
    let mut store = db.write().await;
    let Some(event) = store.events.get(&id) else {
        return Json(false);
    };
    if event.time < now() {
        return Json(false);
    }
    store.participations.retain(|_, p| p.event_id != id);
    if let Some(event) = store.events.remove(&id) {
        info!(id, name = %event.name, "event deleted");
    }
    Json(true)
}

async fn past_events(State(db): State<Db>) -> Json<Vec<EventSummary>> {
    let now = now();
    Json(db.read().await.summaries(|event| event.time < now))
}

async fn future_events(State(db): State<Db>) -> Json<Vec<EventSummary>> {
    let now = now();
    Json(db.read().await.summaries(|event| event.time > now))
}

async fn participants(
    State(db): State<Db>,
    Path(event_id): Path<i64>,
) -> Json<Vec<ParticipantSummary>> {
    let store = db.read().await;
    let summaries = store
        .participations
        .iter()
        .filter(|(_, p)| p.event_id == event_id)
        .map(|(&participation_id, p)| match &p.participant {
            Participant::Person {
                first_name,
                last_name,
                personal_code,
            } => ParticipantSummary {
                name: format!("{first_name} {last_name}"),
                id_code: personal_code.clone(),
                participation_id,
                participation_type: ParticipationType::Person,
            },
            Participant::Company {
                company_name,
                registration_code,
                ..
            } => ParticipantSummary {
                name: company_name.clone(),
                id_code: registration_code.clone(),
                participation_id,
                participation_type: ParticipationType::Company,
            },
        })
        .collect();
    Json(summaries)
}

async fn add_person(
    State(db): State<Db>,
    Json(input): Json<PersonParticipationInput>,
) -> Json<ValidationResult> {
    let mut store = db.write().await;
    let errors = validate_person(&store, &input);
    if errors.is_empty() {
        let record = person_record(input);
        let event_id = record.event_id;
        let id = store.insert_participation(record);
        info!(id, event_id, "person participation added");
    }
    Json(ValidationResult::from_errors(errors))
}

async fn add_company(
    State(db): State<Db>,
    Json(input): Json<CompanyParticipationInput>,
) -> Json<ValidationResult> {
    let mut store = db.write().await;
    let errors = validate_company(&store, &input);
    if errors.is_empty() {
        let record = company_record(input);
        let event_id = record.event_id;
        let id = store.insert_participation(record);
        info!(id, event_id, "company participation added");
    }
    Json(ValidationResult::from_errors(errors))
}

async fn edit_person(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<PersonParticipationInput>,
) -> Json<ValidationResult> {
    let mut store = db.write().await;
    if store.participations.get(&id).map(Participation::kind) != Some(ParticipationType::Person) {
        return Json(ValidationResult::from_errors(vec![
            PARTICIPATION_NOT_FOUND.to_string()
        ]));
    }
    let errors = validate_person(&store, &input);
    if errors.is_empty() {
        store.participations.insert(id, person_record(input));
        info!(id, "person participation edited");
    }
    Json(ValidationResult::from_errors(errors))
}

async fn edit_company(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<CompanyParticipationInput>,
) -> Json<ValidationResult> {
    let mut store = db.write().await;
    if store.participations.get(&id).map(Participation::kind) != Some(ParticipationType::Company) {
        return Json(ValidationResult::from_errors(vec![
            PARTICIPATION_NOT_FOUND.to_string()
        ]));
    }
    let errors = validate_company(&store, &input);
    if errors.is_empty() {
        store.participations.insert(id, company_record(input));
        info!(id, "company participation edited");
    }
    Json(ValidationResult::from_errors(errors))
}

async fn delete_participation(
    State(db): State<Db>,
    Path((kind, id)): Path<(ParticipationType, i64)>,
) -> Json<bool> {
    let mut store = db.write().await;
    if store.participations.get(&id).map(Participation::kind) != Some(kind) {
        return Json(false);
    }
    let removed = store.participations.remove(&id);
    if let Some(p) = &removed {
        info!(id, event_id = p.event_id, payment = %p.payment_method, "participation deleted");
    }
    Json(removed.is_some())
}
