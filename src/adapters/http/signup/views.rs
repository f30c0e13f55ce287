//! HTML rendering of the public membership form.
//!
//! Pages are plain server-rendered HTML. Every value that comes from the
//! visitor or the database goes through [`escape`].

use std::fmt::Write;

use crate::application::handlers::signup::SignupSettings;
use crate::domain::foundation::Timestamp;
use crate::domain::membership::{LegalNature, Member, MembershipType};
use crate::domain::signup::{messages, FieldError, FormAction, SignupForm, DEFAULT_ENTITY};

/// Escapes text for HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n",
        title = escape(title),
        body = body
    )
}

fn hidden(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(
        out,
        "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
        name,
        escape(value)
    );
}

fn text_input(out: &mut String, name: &str, label: &str, value: Option<&str>) {
    let _ = writeln!(
        out,
        "<label for=\"{name}\">{label}</label> <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{value}\"><br>",
        name = name,
        label = label,
        value = escape(value.unwrap_or_default())
    );
}

fn errors_block(out: &mut String, errors: &[FieldError]) {
    if errors.is_empty() {
        return;
    }
    out.push_str("<div class=\"error\">\n");
    for error in errors {
        let _ = writeln!(
            out,
            "<p data-field=\"{}\">{}</p>",
            escape(&error.field),
            escape(&error.message)
        );
    }
    out.push_str("</div>\n");
}

// ════════════════════════════════════════════════════════════════════════════════
// Form page
// ════════════════════════════════════════════════════════════════════════════════

/// Everything the interactive form shows.
pub struct FormPage<'a> {
    pub action: FormAction,
    pub form: &'a SignupForm,
    pub member: Option<&'a Member>,
    pub url_token: Option<&'a str>,
    /// Open types offered in the select.
    pub types: &'a [MembershipType],
    /// Type the amount and renewal info are computed for.
    pub selected_type: Option<&'a MembershipType>,
    pub errors: &'a [FieldError],
    pub notice: Option<&'a str>,
    pub hide_type: bool,
    pub backtopage: Option<&'a str>,
    pub entity: i32,
}

pub fn render_form(settings: &SignupSettings, page: &FormPage<'_>) -> String {
    let policy = &settings.policy;
    let organization = &settings.organization;
    let renewing = matches!(page.action, FormAction::Renew | FormAction::Update);
    let identifying = page.action == FormAction::Identify;
    let form = page.form;

    let title = if renewing {
        messages::RENEWAL_TITLE
    } else {
        messages::NEW_SUBSCRIPTION_TITLE
    };
    let intro = if renewing {
        policy
            .renew_intro_text
            .clone()
            .unwrap_or_else(|| messages::renewal_intro(&organization.name, organization.contact_email()))
    } else {
        policy.intro_text.clone().unwrap_or_else(|| {
            messages::new_subscription_intro(
                &organization.name,
                &settings.links.identify_url(),
                organization.contact_email(),
            )
        })
    };

    let mut body = String::new();
    let _ = writeln!(body, "<p class=\"intro\">{}</p>", escape(&intro));
    errors_block(&mut body, page.errors);
    if let Some(notice) = page.notice {
        let _ = writeln!(body, "<p class=\"notice\">{}</p>", escape(notice));
    }

    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"{}\">",
        escape(&settings.links.form_url())
    );
    let next = page.action.next_action(form.has_email());
    hidden(&mut body, "action", next.as_str());
    if page.entity != DEFAULT_ENTITY {
        hidden(&mut body, "entity", &page.entity.to_string());
    }
    if let Some(url) = page.backtopage {
        hidden(&mut body, "backtopage", url);
    }
    if page.hide_type {
        hidden(&mut body, "notype", "1");
    }
    if let (true, Some(member)) = (renewing, page.member) {
        hidden(&mut body, "ref", &member.reference());
        hidden(&mut body, "urltoken", page.url_token.unwrap_or_default());
    }

    // Email
    let email_editable =
        policy.skip_table || matches!(page.action, FormAction::Identify | FormAction::Renew);
    if email_editable {
        text_input(&mut body, "email", "Email", form.email.as_deref());
    } else {
        let email = form.email.as_deref().unwrap_or_default();
        let _ = writeln!(body, "<p>Email: {}</p>", escape(email));
        hidden(&mut body, "email", email);
    }

    // Type
    let selected = page.selected_type.map(|t| t.id).or_else(|| form.effective_type(policy));
    match policy.force_type {
        Some(forced) => hidden(&mut body, "typeid", &forced.to_string()),
        None if page.hide_type => {
            if let Some(id) = selected {
                hidden(&mut body, "typeid", &id.to_string());
            }
        }
        None => {
            body.push_str("<label for=\"typeid\">Membership type</label> <select id=\"typeid\" name=\"typeid\">\n<option value=\"\"></option>\n");
            for ty in page.types {
                let _ = writeln!(
                    body,
                    "<option value=\"{}\"{}>{}</option>",
                    ty.id,
                    if Some(ty.id) == selected { " selected" } else { "" },
                    escape(&ty.label)
                );
            }
            body.push_str("</select><br>\n");
        }
    }

    if !identifying {
        member_fields(&mut body, settings, page);
    }

    // Buttons
    let submit_label = match page.action {
        FormAction::Renew => messages::SUBMIT_RENEW_LABEL,
        FormAction::Update => messages::SUBMIT_UPDATE_LABEL,
        FormAction::Identify => messages::SUBMIT_IDENTIFY_LABEL,
        _ => messages::SUBMIT_NEW_LABEL,
    };
    let _ = writeln!(
        body,
        "<input type=\"submit\" name=\"submitsave\" value=\"{}\">",
        submit_label
    );
    if page.action == FormAction::Renew {
        let same_type = page
            .member
            .map_or(false, |m| form.effective_type(policy).map_or(true, |t| t == m.type_id));
        if same_type {
            let _ = writeln!(
                body,
                "<input type=\"submit\" name=\"submitupdate\" value=\"{}\">",
                messages::SUBMIT_UPDATE_LABEL
            );
        } else {
            let _ = writeln!(
                body,
                "<p class=\"note\">{}</p>",
                messages::CANNOT_EDIT_MEMBER_INFO
            );
        }
    }
    if let Some(url) = page.backtopage {
        let _ = writeln!(
            body,
            "<a class=\"cancel\" href=\"{}\">{}</a>",
            escape(url),
            messages::CANCEL_LABEL
        );
    }
    body.push_str("</form>\n");

    layout(title, &body)
}

fn member_fields(body: &mut String, settings: &SignupSettings, page: &FormPage<'_>) {
    let policy = &settings.policy;
    let form = page.form;

    // Nature
    match policy.force_nature {
        Some(nature) => hidden(body, "morphy", nature.code()),
        None => {
            let posted = form.effective_nature(policy);
            body.push_str("<label for=\"morphy\">Nature</label> <select id=\"morphy\" name=\"morphy\">\n<option value=\"\"></option>\n");
            for nature in [LegalNature::Individual, LegalNature::Organization] {
                let _ = writeln!(
                    body,
                    "<option value=\"{}\"{}>{}</option>",
                    nature.code(),
                    if posted == Some(nature) { " selected" } else { "" },
                    nature.label()
                );
            }
            body.push_str("</select><br>\n");
        }
    }

    text_input(body, "societe", "Company", form.company.as_deref());
    text_input(body, "civility_id", "Civility", form.civility.as_deref());
    text_input(body, "lastname", "Last name", form.lastname.as_deref());
    text_input(body, "firstname", "First name", form.firstname.as_deref());

    if policy.login_required() {
        text_input(body, "login", "Login", form.login.as_deref());
        body.push_str("<label for=\"pass1\">Password</label> <input type=\"password\" id=\"pass1\" name=\"pass1\"><br>\n");
        body.push_str("<label for=\"pass2\">Password (again)</label> <input type=\"password\" id=\"pass2\" name=\"pass2\"><br>\n");
    }

    text_input(body, "gender", "Gender", form.gender.as_deref());
    text_input(body, "address", "Address", form.address.as_deref());
    text_input(body, "zipcode", "Zip", form.zipcode.as_deref());
    text_input(body, "town", "Town", form.town.as_deref());
    match &policy.force_country_code {
        Some(code) => hidden(body, "country_id", code),
        None => text_input(body, "country_id", "Country", form.country_code.as_deref()),
    }
    text_input(body, "state_id", "State", form.state_id.as_deref());

    let birth = &form.birth;
    text_input(body, "birthyear", "Birth year", birth.year.as_deref());
    text_input(body, "birthmonth", "Birth month", birth.month.as_deref());
    text_input(body, "birthday", "Birth day", birth.day.as_deref());

    text_input(body, "photo", "Photo URL", form.photo.as_deref());
    let _ = writeln!(
        body,
        "<label for=\"public\">Public profile</label> <input type=\"checkbox\" id=\"public\" name=\"public\" value=\"1\"{}><br>",
        if form.public { " checked" } else { "" }
    );
    let _ = writeln!(
        body,
        "<label for=\"note_private\">Comments</label> <textarea id=\"note_private\" name=\"note_private\">{}</textarea><br>",
        escape(form.note_private.as_deref().unwrap_or_default())
    );

    if policy.show_turnover {
        text_input(body, "budget", "Turnover or budget", form.budget.as_deref());
    }

    if policy.online_payment.is_enabled() {
        let posted = form.posted_amount().ok().flatten();
        let field = policy.amount_field(page.selected_type, posted);
        let value = field.value.to_string();
        if field.editable {
            text_input(body, "amount", "Amount", Some(&value));
            if let Some(advised) = field.advised {
                let _ = writeln!(body, "<p class=\"hint\">Suggested amount: {}</p>", advised);
            }
        } else {
            let _ = writeln!(body, "<p>Amount: {}</p>", escape(&value));
            hidden(body, "amount", &value);
        }
    }

    if let Some(member) = page.member {
        let _ = writeln!(body, "<p class=\"renewal\">{}</p>", escape(&renewal_info(member)));
    }
}

fn renewal_info(member: &Member) -> String {
    match member.end_date {
        Some(end) if member.is_expired(Timestamp::now()) => {
            messages::membership_expired_since(&end.format_date())
        }
        Some(end) => format!(
            "{} {}",
            messages::membership_paid_until(&end.format_date()),
            messages::PAYMENT_RECORDED_FOR_NEXT_PERIOD
        ),
        None => messages::NO_END_DATE.to_string(),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Type table
// ════════════════════════════════════════════════════════════════════════════════

pub fn render_table(settings: &SignupSettings, types: &[MembershipType], entity: i32) -> String {
    let policy = &settings.policy;
    let form_url = escape(&settings.links.form_url());

    let mut body = String::from("<table>\n<tr><th>Type</th><th>Duration</th><th>Amount</th><th>Nature</th><th>Vote</th>");
    if policy.counters_public {
        body.push_str("<th>Members</th>");
    }
    body.push_str("<th></th></tr>\n");

    for ty in types {
        let duration = ty.duration.map(|d| d.label()).unwrap_or_default();
        let amount = if ty.subscription_required {
            let mut amount = ty.displayed_amount(policy.min_amount).to_string();
            if ty.can_edit_amount || policy.edit_amount {
                amount.push_str(" (editable)");
            }
            amount
        } else {
            "–".to_string()
        };
        let vote = if ty.vote_allowed { "Yes" } else { "No" };

        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
            escape(&ty.label),
            escape(&duration),
            escape(&amount),
            ty.nature_label(),
            vote
        );
        if policy.counters_public {
            let _ = write!(body, "<td>{}</td>", ty.member_count);
        }
        let _ = write!(
            body,
            "<td><form method=\"post\" action=\"{}\">",
            form_url
        );
        hidden(&mut body, "action", FormAction::Identify.as_str());
        hidden(&mut body, "typeid", &ty.id.to_string());
        if entity != DEFAULT_ENTITY {
            hidden(&mut body, "entity", &entity.to_string());
        }
        let _ = writeln!(
            body,
            "<input type=\"submit\" value=\"{}\"></form></td></tr>",
            messages::CHOOSE_TYPE_LABEL
        );
    }
    body.push_str("</table>\n");

    layout(messages::MEMBERSHIP_TYPES_TITLE, &body)
}

// ════════════════════════════════════════════════════════════════════════════════
// Completion and error pages
// ════════════════════════════════════════════════════════════════════════════════

pub fn render_completion(message: &str) -> String {
    layout(
        messages::THANK_YOU_TITLE,
        &format!("<p class=\"completion\">{}</p>\n", escape(message)),
    )
}

pub fn render_error(title: &str, message: &str) -> String {
    layout(title, &format!("<p class=\"error\">{}</p>\n", escape(message)))
}
