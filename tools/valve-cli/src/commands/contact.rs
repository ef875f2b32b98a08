//! Contact form command.

use anyhow::{bail, Context as _, Result};
use valve_site::{ContactMessage, SiteError};

use super::ContactArgs;
use crate::context::Context;

/// Run the contact command.
pub async fn run(args: ContactArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.file);
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read contact form: {}", path.display()))?;
    let message = ContactMessage::from_json(&content)
        .with_context(|| format!("Failed to parse contact form: {}", path.display()))?;

    let logger = ctx.logger("contact");

    let email = match message.compose(&ctx.config.contact) {
        Ok(email) => email,
        Err(SiteError::InvalidContact(fields)) => {
            logger
                .warn_builder("contact form rejected")
                .field_usize("invalid_fields", fields.len())
                .emit();
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({ "errors": fields }));
            } else {
                for field in &fields {
                    ctx.output.warn(&field.to_string());
                }
            }
            bail!("Contact form has {} invalid field(s)", fields.len());
        }
        Err(e) => return Err(e.into()),
    };

    logger
        .info_builder("contact notification composed")
        .field("to", email.to.as_str())
        .field_bool("has_company", message.company.is_some())
        .emit();

    if ctx.output.is_json() {
        ctx.output.json(&email);
        return Ok(());
    }

    ctx.output.header("Notification");
    ctx.output.kv("from", &email.from);
    ctx.output.kv("to", &email.to);
    ctx.output.kv("reply-to", &email.reply_to);
    ctx.output.kv("subject", &email.subject);
    println!();
    print!("{}", email.text_body);
    if ctx.output.is_verbose() {
        println!();
        print!("{}", email.html_body);
    }

    Ok(())
}
