use std::io;
use std::time::Duration;

use twilio_rest::{Auth, PageQuery, PageSize, RequestContext, TwilioClient};

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let account_sid = required_env("TWILIO_ACCOUNT_SID")?;
    let auth_token = required_env("TWILIO_AUTH_TOKEN")?;

    let client = TwilioClient::new(Auth::auth_token(account_sid, auth_token)?)?;

    let mut query = PageQuery::new().page_size(PageSize::new(500)?);
    if let Ok(to) = std::env::var("TWILIO_TO") {
        query = query.param("To", to);
    }

    // One deadline for the whole walk, not per page.
    let ctx = RequestContext::with_timeout(Duration::from_secs(120));
    let mut pages = client.message_pages(query);
    let mut total = 0usize;
    while let Some(page) = pages.next(&ctx).await? {
        for message in &page.items {
            println!(
                "{} {} -> {} [{}] {}",
                message.sid,
                message.from.local(),
                message.to.local(),
                message.status.friendly(),
                message.friendly_price().unwrap_or_else(|| "-".to_owned()),
            );
        }
        total += page.items.len();
    }
    println!("{total} messages");

    Ok(())
}
