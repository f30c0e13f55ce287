//! HTTP DTOs for the public membership form.
//!
//! The form reads the same parameters from the query string and from an
//! urlencoded body. Blank values count as absent.

use serde::Deserialize;

use crate::application::handlers::signup::ResolvePageQuery;
use crate::domain::signup::{BirthFields, SignupForm, DEFAULT_ENTITY};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Every parameter understood by `/public/members/new`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupParams {
    pub action: Option<String>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub urltoken: Option<String>,
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub login: Option<String>,
    pub pass1: Option<String>,
    pub pass2: Option<String>,
    pub morphy: Option<String>,
    pub typeid: Option<String>,
    pub civility_id: Option<String>,
    pub gender: Option<String>,
    pub societe: Option<String>,
    pub address: Option<String>,
    pub zipcode: Option<String>,
    pub town: Option<String>,
    pub country_id: Option<String>,
    pub state_id: Option<String>,
    pub birthyear: Option<String>,
    pub birthmonth: Option<String>,
    pub birthday: Option<String>,
    pub birthhour: Option<String>,
    pub birthmin: Option<String>,
    pub birthsec: Option<String>,
    pub photo: Option<String>,
    pub public: Option<String>,
    pub amount: Option<String>,
    pub note_private: Option<String>,
    pub budget: Option<String>,
    pub backtopage: Option<String>,
    pub entity: Option<String>,
    pub notype: Option<String>,
    /// Anti-CSRF token; accepted, not checked.
    pub token: Option<String>,
    pub submitupdate: Option<String>,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn flag(value: &Option<String>) -> bool {
    matches!(
        present(value).as_deref(),
        Some("1") | Some("on") | Some("true") | Some("yes")
    )
}

impl SignupParams {
    /// Fills every parameter missing here from `fallback`.
    ///
    /// Body values win over query string values.
    pub fn or(self, fallback: SignupParams) -> SignupParams {
        macro_rules! pick {
            ($($field:ident),* $(,)?) => {
                SignupParams { $($field: self.$field.or(fallback.$field)),* }
            };
        }
        pick!(
            action, reference, urltoken, email, firstname, lastname, login, pass1, pass2,
            morphy, typeid, civility_id, gender, societe, address, zipcode, town, country_id,
            state_id, birthyear, birthmonth, birthday, birthhour, birthmin, birthsec, photo,
            public, amount, note_private, budget, backtopage, entity, notype, token,
            submitupdate,
        )
    }

    /// Tenant named by the request; the default one when absent or garbled.
    pub fn entity(&self) -> i32 {
        present(&self.entity)
            .and_then(|e| e.parse().ok())
            .filter(|e| *e > 0)
            .unwrap_or(DEFAULT_ENTITY)
    }

    /// Hide the type select (identification links).
    pub fn hide_type(&self) -> bool {
        flag(&self.notype)
    }

    pub fn backtopage(&self) -> Option<String> {
        present(&self.backtopage)
    }

    pub fn form(&self) -> SignupForm {
        SignupForm {
            email: present(&self.email),
            firstname: present(&self.firstname),
            lastname: present(&self.lastname),
            login: present(&self.login),
            // Passwords are kept verbatim, only empty means absent
            pass1: self.pass1.clone().filter(|p| !p.is_empty()),
            pass2: self.pass2.clone().filter(|p| !p.is_empty()),
            morphy: present(&self.morphy),
            typeid: present(&self.typeid),
            civility: present(&self.civility_id),
            gender: present(&self.gender),
            company: present(&self.societe),
            address: present(&self.address),
            zipcode: present(&self.zipcode),
            town: present(&self.town),
            country_code: present(&self.country_id),
            state_id: present(&self.state_id),
            birth: BirthFields {
                year: present(&self.birthyear),
                month: present(&self.birthmonth),
                day: present(&self.birthday),
                hour: present(&self.birthhour),
                min: present(&self.birthmin),
                sec: present(&self.birthsec),
            },
            photo: present(&self.photo),
            public: flag(&self.public),
            amount: present(&self.amount),
            note_private: present(&self.note_private),
            budget: present(&self.budget),
        }
    }

    pub fn to_query(&self) -> ResolvePageQuery {
        ResolvePageQuery {
            action: present(&self.action),
            reference: present(&self.reference),
            url_token: present(&self.urltoken),
            submit_update: present(&self.submitupdate).is_some(),
            form: self.form(),
            entity: self.entity(),
        }
    }
}
