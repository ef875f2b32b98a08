//! Contact form validation and notification e-mail composition.
//!
//! Messages are composed here and handed to whatever transport the
//! deployment uses; nothing in this crate sends mail.

use serde::{Deserialize, Serialize};

use crate::config::ContactConfig;
use crate::error::{FieldError, SiteError, SiteResult};
use crate::html::escape_html;

pub const MAX_NAME_CHARS: usize = 120;
pub const MAX_SUBJECT_CHARS: usize = 200;
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// A submitted contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(alias = "nome")]
    pub name: String,

    #[serde(default, alias = "empresa", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    pub email: String,

    #[serde(default, alias = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(alias = "assunto")]
    pub subject: String,

    #[serde(alias = "mensagem")]
    pub message: String,
}

/// A composed notification ready for a mail transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

impl ContactMessage {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Parse a submitted JSON body.
    pub fn from_json(json: &str) -> SiteResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every field, reporting all problems together.
    pub fn validate(&self) -> SiteResult<()> {
        let mut errors = Vec::new();

        check_text(&mut errors, "name", &self.name, MAX_NAME_CHARS);
        check_text(&mut errors, "subject", &self.subject, MAX_SUBJECT_CHARS);
        check_text(&mut errors, "message", &self.message, MAX_MESSAGE_CHARS);

        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "is required"));
        } else if !looks_like_email(self.email.trim()) {
            errors.push(FieldError::new("email", "is not a valid e-mail address"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SiteError::InvalidContact(errors))
        }
    }

    /// Validate and build the notification sent to the site owner.
    pub fn compose(&self, config: &ContactConfig) -> SiteResult<OutgoingEmail> {
        self.validate()?;

        let subject = format!("{} - {}", config.subject_prefix, self.subject.trim());
        Ok(OutgoingEmail {
            from: format!("\"{}\" <{}>", config.from_name, config.from_address),
            to: config.to_address.clone(),
            reply_to: self.email.trim().to_string(),
            html_body: self.html_body(&config.from_name),
            text_body: self.text_body(),
            subject,
        })
    }

    fn optional_fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [("Empresa", &self.company), ("Telefone", &self.phone)]
            .into_iter()
            .filter_map(|(label, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| (label, v))
            })
    }

    fn html_body(&self, site_name: &str) -> String {
        let email = escape_html(self.email.trim());
        let mut rows = format!(
            "<tr><th>Nome</th><td>{}</td></tr>\n",
            escape_html(self.name.trim())
        );
        rows.push_str(&format!(
            "<tr><th>E-mail</th><td><a href=\"mailto:{email}\">{email}</a></td></tr>\n"
        ));
        for (label, value) in self.optional_fields() {
            rows.push_str(&format!(
                "<tr><th>{}</th><td>{}</td></tr>\n",
                label,
                escape_html(value)
            ));
        }

        let message = escape_html(self.message.trim()).replace('\n', "<br>\n");

        format!(
            r#"<!DOCTYPE html>
<html lang="pt-BR">
<head><meta charset="UTF-8"><title>Nova Mensagem de Contato - {site}</title></head>
<body>
<h1>Nova Mensagem de Contato</h1>
<table>
{rows}<tr><th>Assunto</th><td>{subject}</td></tr>
</table>
<h2>Mensagem</h2>
<p>{message}</p>
</body>
</html>
"#,
            site = escape_html(site_name),
            rows = rows,
            subject = escape_html(self.subject.trim()),
            message = message,
        )
    }

    fn text_body(&self) -> String {
        let mut text = format!("Nome: {}\nE-mail: {}\n", self.name.trim(), self.email.trim());
        for (label, value) in self.optional_fields() {
            text.push_str(&format!("{}: {}\n", label, value));
        }
        text.push_str(&format!(
            "Assunto: {}\n\n{}\n",
            self.subject.trim(),
            self.message.trim()
        ));
        text
    }
}

fn check_text(errors: &mut Vec<FieldError>, field: &'static str, value: &str, max: usize) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, "is required"));
    } else if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("must be at most {} characters", max),
        ));
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContactMessage {
        ContactMessage::new(
            "Maria Souza",
            "maria@example.com",
            "Cotação",
            "Preciso de 10 válvulas <inox>\nDN50",
        )
        .with_company("Souza & Filhos")
    }

    #[test]
    fn test_portuguese_keys() {
        let msg = ContactMessage::from_json(
            r#"{"nome": "João", "email": "j@x.com", "telefone": "11 9999",
                "assunto": "Oi", "mensagem": "Olá"}"#,
        )
        .unwrap();
        assert_eq!(msg.name, "João");
        assert_eq!(msg.phone.as_deref(), Some("11 9999"));
        assert_eq!(msg.company, None);
        assert!(msg.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let msg = ContactMessage::new(" ", "not-an-email", "", "x".repeat(5001));
        let err = msg.validate().unwrap_err();
        let SiteError::InvalidContact(fields) = err else {
            panic!("expected InvalidContact");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field).collect();
        assert_eq!(names, vec!["name", "subject", "message", "email"]);
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@@b.co"));
        assert!(!looks_like_email("a b@c.co"));
        assert!(!looks_like_email("a@.co"));
    }

    #[test]
    fn test_compose() {
        let email = sample().compose(&ContactConfig::default()).unwrap();
        assert_eq!(email.from, "\"Nexus Válvulas\" <site@nexusvalvulas.com.br>");
        assert_eq!(email.to, "nexus@nexusvalvulas.com.br");
        assert_eq!(email.reply_to, "maria@example.com");
        assert_eq!(email.subject, "Nova mensagem de contato - Cotação");

        assert!(email.html_body.contains("Souza &amp; Filhos"));
        assert!(email.html_body.contains("&lt;inox&gt;<br>"));
        assert!(email.html_body.contains("mailto:maria@example.com"));
        assert!(!email.html_body.contains("Telefone"));

        assert!(email.text_body.starts_with("Nome: Maria Souza\n"));
        assert!(email.text_body.contains("Empresa: Souza & Filhos\n"));
    }

    #[test]
    fn test_compose_rejects_invalid() {
        let msg = ContactMessage::new("A", "b", "c", "d");
        assert!(matches!(
            msg.compose(&ContactConfig::default()),
            Err(SiteError::InvalidContact(_))
        ));
    }
}
