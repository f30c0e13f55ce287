//! Values posted by the public form.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::domain::foundation::{MembershipTypeId, Money, ValidationError};
use crate::domain::membership::{LegalNature, Member};

use super::SignupPolicy;

/// Birth date split across the form's date selects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BirthFields {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
    pub hour: Option<String>,
    pub min: Option<String>,
    pub sec: Option<String>,
}

impl BirthFields {
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            year: Some(dt.year().to_string()),
            month: Some(dt.month().to_string()),
            day: Some(dt.day().to_string()),
            hour: Some(dt.hour().to_string()),
            min: Some(dt.minute().to_string()),
            sec: Some(dt.second().to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    /// The date is only checked once a month has been picked.
    pub fn month_supplied(&self) -> bool {
        self.month.is_some()
    }

    /// Builds the date-time; `Ok(None)` when nothing was entered.
    pub fn to_datetime(&self) -> Result<Option<NaiveDateTime>, ValidationError> {
        if self.is_empty() {
            return Ok(None);
        }

        let year = parse_part(&self.year, "birthyear", 1, 9999)?;
        let month = parse_part(&self.month, "birthmonth", 1, 12)?;
        let day = parse_part(&self.day, "birthday", 1, 31)?;
        let hour = optional_part(&self.hour, "birthhour", 23)?;
        let min = optional_part(&self.min, "birthmin", 59)?;
        let sec = optional_part(&self.sec, "birthsec", 59)?;

        NaiveDate::from_ymd_opt(year as i32, month, day)
            .and_then(|date| date.and_hms_opt(hour, min, sec))
            .map(Some)
            .ok_or_else(|| ValidationError::invalid_format("birth", "not a calendar date"))
    }
}

fn parse_part(value: &Option<String>, field: &str, min: u32, max: u32) -> Result<u32, ValidationError> {
    let raw = value.as_deref().ok_or_else(|| ValidationError::empty_field(field))?;
    let parsed: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::invalid_format(field, "expected a number"))?;
    if parsed < min || parsed > max {
        return Err(ValidationError::out_of_range(field, min as i64, max as i64, parsed as i64));
    }
    Ok(parsed)
}

fn optional_part(value: &Option<String>, field: &str, max: u32) -> Result<u32, ValidationError> {
    match value {
        Some(_) => parse_part(value, field, 0, max),
        None => Ok(0),
    }
}

/// One submission of the public form.
///
/// Blank inputs are `None`; passwords are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub login: Option<String>,
    pub pass1: Option<String>,
    pub pass2: Option<String>,
    pub morphy: Option<String>,
    pub typeid: Option<String>,
    pub civility: Option<String>,
    pub gender: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub zipcode: Option<String>,
    pub town: Option<String>,
    pub country_code: Option<String>,
    pub state_id: Option<String>,
    pub birth: BirthFields,
    pub photo: Option<String>,
    pub public: bool,
    pub amount: Option<String>,
    pub note_private: Option<String>,
    pub budget: Option<String>,
}

impl SignupForm {
    /// True once the visitor typed any identity field.
    pub fn filling_started(&self) -> bool {
        self.email.is_some() || self.firstname.is_some() || self.lastname.is_some()
    }

    pub fn has_email(&self) -> bool {
        self.email.is_some()
    }

    /// Posted type id; an unparseable value counts as none.
    pub fn posted_type(&self) -> Option<MembershipTypeId> {
        self.typeid.as_deref().and_then(|raw| raw.parse().ok())
    }

    /// Type actually used: the forced type, else the posted one.
    pub fn effective_type(&self, policy: &SignupPolicy) -> Option<MembershipTypeId> {
        policy.force_type.or_else(|| self.posted_type())
    }

    /// Nature actually used: the forced nature, else the posted one.
    pub fn effective_nature(&self, policy: &SignupPolicy) -> Option<LegalNature> {
        policy
            .force_nature
            .or_else(|| self.morphy.as_deref().and_then(|raw| raw.parse().ok()))
    }

    /// Country actually stored: the forced country, else the posted one.
    pub fn effective_country(&self, policy: &SignupPolicy) -> Option<String> {
        policy
            .force_country_code
            .clone()
            .or_else(|| self.country_code.clone())
    }

    pub fn posted_amount(&self) -> Result<Option<Money>, ValidationError> {
        self.amount.as_deref().map(Money::parse).transpose()
    }

    /// Declared turnover; zero and garbage count as none.
    pub fn budget_value(&self) -> Option<i64> {
        self.budget
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|value| *value > 0)
    }

    pub fn state_value(&self) -> Option<i32> {
        self.state_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .filter(|value| *value > 0)
    }

    /// Fills every field the visitor did not post from the stored member.
    pub fn prefilled_from(&self, member: &Member) -> SignupForm {
        let profile = &member.profile;
        let keep = |posted: &Option<String>, stored: Option<&String>| {
            posted.clone().or_else(|| stored.cloned())
        };
        let non_blank = |s: &String| {
            if s.trim().is_empty() {
                None
            } else {
                Some(s.clone())
            }
        };

        SignupForm {
            email: keep(&self.email, profile.email.as_ref()),
            firstname: self.firstname.clone().or_else(|| non_blank(&profile.firstname)),
            lastname: self.lastname.clone().or_else(|| non_blank(&profile.lastname)),
            login: self
                .login
                .clone()
                .or_else(|| member.login().map(str::to_string)),
            pass1: self.pass1.clone(),
            pass2: self.pass2.clone(),
            morphy: self
                .morphy
                .clone()
                .or_else(|| Some(member.nature.code().to_string())),
            typeid: self
                .typeid
                .clone()
                .or_else(|| Some(member.type_id.to_string())),
            civility: keep(&self.civility, profile.civility.as_ref()),
            gender: keep(&self.gender, profile.gender.as_ref()),
            company: keep(&self.company, profile.company.as_ref()),
            address: keep(&self.address, profile.address.as_ref()),
            zipcode: keep(&self.zipcode, profile.zip.as_ref()),
            town: keep(&self.town, profile.town.as_ref()),
            country_code: keep(&self.country_code, profile.country_code.as_ref()),
            state_id: self
                .state_id
                .clone()
                .or_else(|| profile.state_id.map(|id| id.to_string())),
            birth: if self.birth.is_empty() {
                profile
                    .birth
                    .as_ref()
                    .map(BirthFields::from_datetime)
                    .unwrap_or_default()
            } else {
                self.birth.clone()
            },
            photo: keep(&self.photo, profile.photo.as_ref()),
            public: self.public || profile.public,
            amount: self
                .amount
                .clone()
                .or_else(|| member.amount.map(|a| a.to_string())),
            note_private: keep(&self.note_private, profile.note_private.as_ref()),
            budget: self
                .budget
                .clone()
                .or_else(|| profile.budget.map(|b| b.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::fixtures::member;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn filling_started_needs_an_identity_field() {
        let mut form = SignupForm::default();
        assert!(!form.filling_started());
        form.town = some("Paris");
        assert!(!form.filling_started());
        form.lastname = some("Lee");
        assert!(form.filling_started());
    }

    #[test]
    fn effective_type_prefers_forced_type() {
        let form = SignupForm {
            typeid: some("2"),
            ..SignupForm::default()
        };
        let mut policy = SignupPolicy::default();
        assert_eq!(form.effective_type(&policy), MembershipTypeId::new(2).ok());

        policy.force_type = MembershipTypeId::new(5).ok();
        assert_eq!(form.effective_type(&policy), MembershipTypeId::new(5).ok());
    }

    #[test]
    fn garbage_type_counts_as_missing() {
        let form = SignupForm {
            typeid: some("abc"),
            ..SignupForm::default()
        };
        assert_eq!(form.effective_type(&SignupPolicy::default()), None);
    }

    #[test]
    fn effective_nature_prefers_forced_nature() {
        let form = SignupForm {
            morphy: some("phy"),
            ..SignupForm::default()
        };
        let mut policy = SignupPolicy::default();
        assert_eq!(form.effective_nature(&policy), Some(LegalNature::Individual));

        policy.force_nature = Some(LegalNature::Organization);
        assert_eq!(form.effective_nature(&policy), Some(LegalNature::Organization));
    }

    #[test]
    fn budget_must_be_positive() {
        let mut form = SignupForm::default();
        form.budget = some("0");
        assert_eq!(form.budget_value(), None);
        form.budget = some("200");
        assert_eq!(form.budget_value(), Some(200));
    }

    #[test]
    fn birth_fields_build_a_date() {
        let birth = BirthFields {
            year: some("1990"),
            month: some("2"),
            day: some("28"),
            ..BirthFields::default()
        };
        let dt = birth.to_datetime().unwrap().unwrap();
        assert_eq!(dt.to_string(), "1990-02-28 00:00:00");
    }

    #[test]
    fn birth_fields_reject_impossible_dates() {
        let birth = BirthFields {
            year: some("1990"),
            month: some("2"),
            day: some("30"),
            ..BirthFields::default()
        };
        assert!(birth.to_datetime().is_err());

        let missing_year = BirthFields {
            month: some("2"),
            day: some("3"),
            ..BirthFields::default()
        };
        assert!(missing_year.to_datetime().is_err());
    }

    #[test]
    fn empty_birth_fields_mean_no_date() {
        assert_eq!(BirthFields::default().to_datetime(), Ok(None));
    }

    #[test]
    fn prefilled_from_keeps_posted_values_and_fills_the_rest() {
        let mut stored = member(9, 3, "stored@x.org");
        stored.profile.town = some("Lyon");
        stored.profile.public = true;

        let posted = SignupForm {
            firstname: some("Posted"),
            ..SignupForm::default()
        };
        let merged = posted.prefilled_from(&stored);

        assert_eq!(merged.firstname.as_deref(), Some("Posted"));
        assert_eq!(merged.lastname.as_deref(), Some("Lee"));
        assert_eq!(merged.email.as_deref(), Some("stored@x.org"));
        assert_eq!(merged.town.as_deref(), Some("Lyon"));
        assert_eq!(merged.typeid.as_deref(), Some("3"));
        assert_eq!(merged.morphy.as_deref(), Some("phy"));
        assert!(merged.public);
    }
}
