//! Login, registration and session commands

use anyhow::Result;
use colored::Colorize;
use kankercare_intake::application::{AuthOutcome, AuthService};
use kankercare_intake::domain::{LoginRecord, RegisterRecord};
use kankercare_intake::rate_limit::cooldown_minutes;
use serde_json::json;

use super::{Context, Status};
use crate::output::render_errors;

fn service(ctx: &Context) -> Result<AuthService> {
    Ok(AuthService::from_config(&ctx.config, ctx.auth_storage()?, ctx.notifier.clone()))
}

pub async fn login(ctx: &Context, email: String, password: String, remember_me: bool) -> Result<Status> {
    let form = LoginRecord {
        email,
        password,
        remember_me: Some(remember_me),
    };
    let outcome = service(ctx)?.login(&form).await;
    Ok(report(ctx, &outcome))
}

pub async fn register(ctx: &Context, form: RegisterRecord) -> Result<Status> {
    let outcome = service(ctx)?.register(&form).await;
    Ok(report(ctx, &outcome))
}

pub fn logout(ctx: &Context) -> Result<Status> {
    service(ctx)?.logout();
    if ctx.format.is_json() {
        ctx.format.print(&json!({ "authenticated": false }));
    } else {
        println!("Logged out");
    }
    Ok(Status::Done)
}

pub fn session(ctx: &Context) -> Result<Status> {
    let auth = service(ctx)?;
    let user = auth.current_user().filter(|_| auth.is_authenticated());

    if ctx.format.is_json() {
        ctx.format.print(&json!({ "authenticated": user.is_some(), "user": user }));
    } else {
        match &user {
            Some(user) => println!(
                "Logged in as {} since {}",
                user.email.bold(),
                user.login_time.format("%Y-%m-%d %H:%M UTC")
            ),
            None => println!("{}", "Not logged in".dimmed()),
        }
    }

    Ok(if user.is_some() {
        Status::Done
    } else {
        Status::Declined
    })
}

fn report(ctx: &Context, outcome: &AuthOutcome) -> Status {
    if ctx.format.is_json() {
        let body = match outcome {
            AuthOutcome::Success => json!({ "status": "success" }),
            AuthOutcome::RateLimited { retry_after } => json!({
                "status": "rate_limited",
                "retryAfterMinutes": cooldown_minutes(*retry_after),
            }),
            AuthOutcome::Invalid(errors) => json!({ "status": "invalid", "errors": errors }),
        };
        ctx.format.print(&json!({ "outcome": body, "notifications": ctx.notifier.drain() }));
    } else if let AuthOutcome::Invalid(errors) = outcome {
        println!("{}", render_errors(errors));
    }

    if outcome.is_success() {
        Status::Done
    } else {
        Status::Declined
    }
}
