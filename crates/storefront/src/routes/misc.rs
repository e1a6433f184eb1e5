//! Login panel, contact and newsletter handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::Path};
use serde::Deserialize;
use tracing::instrument;

use super::SurfaceUpdate;
use crate::error::{AppError, Result};
use crate::notice::Notice;
use crate::panel::{PanelAction, PanelState};

pub const CONTACT_FORM_ID: &str = "contact-form";
pub const NEWSLETTER_FORM_ID: &str = "newsletter-form";

// =============================================================================
// Login panel
// =============================================================================

/// Login panel fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/login_panel.html")]
pub struct LoginPanelTemplate {
    pub panel: PanelState,
}

/// Panel form data: the state the control was rendered in.
#[derive(Debug, Default, Deserialize)]
pub struct PanelForm {
    #[serde(default)]
    pub from: String,
}

/// Apply a panel control and render the panel in its new state.
///
/// An unrecognized `from` state is treated as closed.
#[instrument]
pub async fn panel(Path(action): Path<String>, Form(form): Form<PanelForm>) -> Result<LoginPanelTemplate> {
    let action = action
        .parse::<PanelAction>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let from = form.from.parse::<PanelState>().unwrap_or_default();

    Ok(LoginPanelTemplate {
        panel: PanelState::apply(from, action),
    })
}

// =============================================================================
// Contact
// =============================================================================

/// Contact form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactForm {
    fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.message]
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}

/// Blank contact form.
#[derive(Template)]
#[template(path = "partials/contact_form.html")]
pub struct ContactFormTemplate;

/// Submit the contact form (HTMX).
#[instrument(skip(form))]
pub async fn contact(Form(form): Form<ContactForm>) -> Result<SurfaceUpdate> {
    if !form.is_complete() {
        return Ok(SurfaceUpdate::notice(Notice::error(
            "Please fill in all required fields.",
        )));
    }

    tracing::info!(email = %form.email.trim(), "Contact message received");
    let blank = render_blank(&ContactFormTemplate)?;
    Ok(SurfaceUpdate::notice(Notice::success(
        "Thank you for your message! We'll get back to you soon.",
    ))
    .with_fragment(CONTACT_FORM_ID, blank))
}

// =============================================================================
// Newsletter
// =============================================================================

/// Newsletter signup form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewsletterForm {
    pub email: String,
}

/// Blank newsletter form.
#[derive(Template)]
#[template(path = "partials/newsletter_form.html")]
pub struct NewsletterFormTemplate;

/// Subscribe to the newsletter (HTMX). A blank email does nothing.
#[instrument(skip(form))]
pub async fn newsletter(Form(form): Form<NewsletterForm>) -> Result<SurfaceUpdate> {
    if form.email.trim().is_empty() {
        return Ok(SurfaceUpdate::default());
    }

    tracing::info!("Newsletter signup");
    let blank = render_blank(&NewsletterFormTemplate)?;
    Ok(SurfaceUpdate::notice(Notice::success(
        "Thank you for subscribing to our newsletter!",
    ))
    .with_fragment(NEWSLETTER_FORM_ID, blank))
}

fn render_blank(template: &impl Template) -> Result<String> {
    template
        .render()
        .map_err(|e| AppError::Internal(format!("form render failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_requires_name_email_and_message() {
        let mut form = ContactForm {
            name: "Ravi".to_string(),
            email: "ravi@dairy.in".to_string(),
            phone: String::new(),
            message: "  ".to_string(),
        };
        assert!(!form.is_complete());

        form.message = "Do you deliver on Sundays?".to_string();
        assert!(form.is_complete());
    }
}
