//! DTOs for the Nullam event registration API.
//!
//! # Design
//! These mirror the server's JSON schema (camelCase field names, ISO-8601
//! local date-times) but are defined independently from the mock-server
//! crate. The integration test catches any drift between the two.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Payload for creating an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub name: String,
    pub time: NaiveDateTime,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// One row of the past/future event listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventSummaryDto {
    pub id: i64,
    pub name: String,
    pub time: NaiveDateTime,
    pub location: String,
    pub number_of_participants: u32,
}

/// Registration of a private person to an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonParticipationDto {
    pub event_id: i64,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub personal_code: String,
}

/// Registration of a company, possibly with several attendees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyParticipationDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participation_id: Option<i64>,
    pub event_id: i64,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    pub company_name: String,
    pub registration_code: String,
    pub number_of_participants: u32,
}

/// One participant of an event: a person or a company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummaryDto {
    /// Full name for a person, legal name for a company.
    pub name: String,
    /// Personal code for a person, registry code for a company.
    pub id_code: String,
    pub participation_id: i64,
    #[serde(rename = "type")]
    pub participation_type: ParticipationType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipationType {
    Person,
    Company,
}

impl ParticipationType {
    /// Path segment used by the delete endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            ParticipationType::Person => "PERSON",
            ParticipationType::Company => "COMPANY",
        }
    }
}

impl fmt::Display for ParticipationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    BankTransfer,
    Cash,
}

impl PaymentMethod {
    /// Human-readable label for forms and listings.
    pub fn display_name(self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::Cash => "Cash",
        }
    }
}

/// Outcome of a create/add/edit call. An empty `errors` list means the
/// server accepted the payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.valid && self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn event_dto_uses_camel_case_and_iso_time() {
        let event = EventDto {
            name: "Suvepäevad".to_string(),
            time: NaiveDate::from_ymd_opt(2030, 6, 21)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
            location: "Tartu".to_string(),
            additional_info: Some("Kaasa telk".to_string()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["time"], "2030-06-21T18:00:00");
        assert_eq!(json["additionalInfo"], "Kaasa telk");
    }

    #[test]
    fn missing_additional_info_is_omitted() {
        let event = EventDto {
            name: "Talvepäevad".to_string(),
            time: NaiveDate::from_ymd_opt(2030, 1, 10)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            location: "Otepää".to_string(),
            additional_info: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("additionalInfo").is_none());
    }

    #[test]
    fn enums_use_server_names() {
        assert_eq!(
            serde_json::to_value(PaymentMethod::BankTransfer).unwrap(),
            "BANK_TRANSFER"
        );
        let kind: ParticipationType = serde_json::from_str(r#""COMPANY""#).unwrap();
        assert_eq!(kind, ParticipationType::Company);
        assert_eq!(PaymentMethod::Cash.display_name(), "Cash");
    }

    #[test]
    fn participant_summary_reads_type_field() {
        let raw = r#"{"name":"Mari Maasikas","idCode":"49403136515","participationId":4,"type":"PERSON"}"#;
        let summary: ParticipantSummaryDto = serde_json::from_str(raw).unwrap();
        assert_eq!(summary.participation_type, ParticipationType::Person);
        assert_eq!(summary.participation_id, 4);
    }

    #[test]
    fn validation_result_with_errors_is_invalid() {
        let result: ValidationResult =
            serde_json::from_str(r#"{"valid":false,"errors":["Event not found"]}"#).unwrap();
        assert!(!result.is_valid());
        let ok: ValidationResult = serde_json::from_str(r#"{"valid":true,"errors":[]}"#).unwrap();
        assert!(ok.is_valid());
    }
}
