use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub current_role: String,
    pub target_role: String,
    pub target_company: String,
    pub years_of_experience: u32,
    pub interview_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

/// Caller-supplied part of a room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomFields {
    pub current_role: String,
    pub target_role: String,
    pub target_company: String,
    pub years_of_experience: u32,
    pub interview_type: String,
    pub resume_url: Option<String>,
}

impl RoomFields {
    /// Names of required fields left blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("currentRole", &self.current_role),
            ("targetRole", &self.target_role),
            ("targetCompany", &self.target_company),
            ("interviewType", &self.interview_type),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUpdate {
    pub current_role: Option<String>,
    pub target_role: Option<String>,
    pub target_company: Option<String>,
    pub years_of_experience: Option<u32>,
    pub interview_type: Option<String>,
    pub resume_url: Option<String>,
}

impl Room {
    pub fn new(id: String, owner_id: &str, fields: RoomFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            current_role: fields.current_role,
            target_role: fields.target_role,
            target_company: fields.target_company,
            years_of_experience: fields.years_of_experience,
            interview_type: fields.interview_type,
            resume_url: fields.resume_url,
            created_at,
            user_id: owner_id.to_string(),
        }
    }

    pub fn apply(&mut self, update: &RoomUpdate) {
        if let Some(v) = &update.current_role {
            self.current_role = v.clone();
        }
        if let Some(v) = &update.target_role {
            self.target_role = v.clone();
        }
        if let Some(v) = &update.target_company {
            self.target_company = v.clone();
        }
        if let Some(v) = update.years_of_experience {
            self.years_of_experience = v;
        }
        if let Some(v) = &update.interview_type {
            self.interview_type = v.clone();
        }
        if let Some(v) = &update.resume_url {
            self.resume_url = Some(v.clone());
        }
    }
}

#[cfg(test)]
impl Room {
    pub fn fields(&self) -> RoomFields {
        RoomFields {
            current_role: self.current_role.clone(),
            target_role: self.target_role.clone(),
            target_company: self.target_company.clone(),
            years_of_experience: self.years_of_experience,
            interview_type: self.interview_type.clone(),
            resume_url: self.resume_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> RoomFields {
        RoomFields {
            current_role: "Intern".into(),
            target_role: "Backend Engineer".into(),
            target_company: "Acme".into(),
            years_of_experience: 2,
            interview_type: "Technical Round".into(),
            resume_url: None,
        }
    }

    #[test]
    fn test_missing_fields() {
        let mut incomplete = fields();
        incomplete.target_company = " ".into();
        incomplete.interview_type.clear();
        assert_eq!(incomplete.missing_fields(), vec!["targetCompany", "interviewType"]);
        assert!(fields().missing_fields().is_empty());
    }

    #[test]
    fn test_room_json_matches_stored_layout() {
        let json = r#"{
            "id": "1718000000000",
            "currentRole": "Intern",
            "targetRole": "Backend Engineer",
            "targetCompany": "Acme",
            "yearsOfExperience": 2,
            "interviewType": "Technical Round",
            "resumeUrl": "blob:http://localhost/abc",
            "createdAt": "2024-06-10T06:13:20.000Z",
            "userId": "1717000000000"
        }"#;
        let room: Room = serde_json::from_str(json).unwrap();
        assert_eq!(room.user_id, "1717000000000");
        assert_eq!(room.fields().target_role, "Backend Engineer");
        assert_eq!(room.resume_url.as_deref(), Some("blob:http://localhost/abc"));
    }

    #[test]
    fn test_apply_partial_update() {
        let mut room = Room::new("1".into(), "owner", fields(), Utc::now());
        room.apply(&RoomUpdate {
            target_company: Some("Globex".into()),
            years_of_experience: Some(5),
            ..RoomUpdate::default()
        });
        assert_eq!(room.target_company, "Globex");
        assert_eq!(room.years_of_experience, 5);
        assert_eq!(room.target_role, "Backend Engineer");
        assert_eq!(room.user_id, "owner");
    }
}
