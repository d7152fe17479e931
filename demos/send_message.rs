use std::io;
use std::time::Duration;

use twilio_rest::{Auth, MessageBody, PhoneNumber, RequestContext, SendMessage, TwilioClient};

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
    let from = required_env("TWILIO_FROM")?;
    let to = required_env("TWILIO_TO")?;
    let body = std::env::var("TWILIO_BODY")
        .unwrap_or_else(|_| "Hello from the twilio-rest demo.".to_owned());

    let client = TwilioClient::new(Auth::auth_token(account_sid, auth_token)?)?;
    let request = SendMessage::text(
        PhoneNumber::new(from)?,
        PhoneNumber::new(to)?,
        MessageBody::new(body)?,
    );

    let ctx = RequestContext::with_timeout(Duration::from_secs(30));
    let message = client.send_message(&ctx, request).await?;
    println!(
        "sid: {}, status: {}, to: {}, segments: {}",
        message.sid,
        message.status.friendly(),
        message.to.local(),
        message.num_segments
    );

    Ok(())
}
