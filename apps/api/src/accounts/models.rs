use serde::{Deserialize, Serialize};

/// A registered user as exposed to callers and kept in the current slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u32>,
    #[serde(default)]
    pub is_profile_complete: bool,
}

impl Account {
    pub fn new(id: String, email: &str, mobile: &str) -> Self {
        Self {
            id,
            email: email.to_string(),
            first_name: None,
            last_name: None,
            mobile: Some(mobile.to_string()),
            gender: None,
            date_of_birth: None,
            college_name: None,
            resume_url: None,
            years_of_experience: None,
            is_profile_complete: false,
        }
    }

    /// Overwrites every field present in `update`; absent fields are kept.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        fn merge<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }

        merge(&mut self.first_name, &update.first_name);
        merge(&mut self.last_name, &update.last_name);
        merge(&mut self.mobile, &update.mobile);
        merge(&mut self.gender, &update.gender);
        merge(&mut self.date_of_birth, &update.date_of_birth);
        merge(&mut self.college_name, &update.college_name);
        merge(&mut self.resume_url, &update.resume_url);
        merge(&mut self.years_of_experience, &update.years_of_experience);
        if let Some(complete) = update.is_profile_complete {
            self.is_profile_complete = complete;
        }
    }
}

/// Entry of the `users` collection. The secret sits next to the account fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAccount {
    #[serde(flatten)]
    pub account: Account,
    pub password: String,
}

/// Partial profile change. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mobile: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub college_name: Option<String>,
    pub resume_url: Option<String>,
    pub years_of_experience: Option<u32>,
    pub is_profile_complete: Option<bool>,
}

/// Basic-info form submitted once to complete a profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: String,
    pub college_name: String,
    pub years_of_experience: Option<u32>,
    pub resume_url: Option<String>,
}

impl ProfileForm {
    /// Names of required fields left blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("gender", &self.gender),
            ("dateOfBirth", &self.date_of_birth),
            ("collegeName", &self.college_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: Some(self.first_name),
            last_name: Some(self.last_name),
            gender: Some(self.gender),
            date_of_birth: Some(self.date_of_birth),
            college_name: Some(self.college_name),
            years_of_experience: self.years_of_experience,
            resume_url: self.resume_url,
            is_profile_complete: Some(true),
            ..ProfileUpdate::default()
        }
    }
}
