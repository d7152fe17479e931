use std::io;
use std::time::Duration;

use twilio_rest::{AreaCode, Auth, BuyNumber, RequestContext, TwilioClient};

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
    let area_code = required_env("TWILIO_AREA_CODE")?;

    let client = TwilioClient::new(Auth::auth_token(account_sid, auth_token)?)?;
    let ctx = RequestContext::with_timeout(Duration::from_secs(30));

    match client
        .buy_number(&ctx, BuyNumber::AreaCode(AreaCode::new(area_code)?))
        .await
    {
        Ok(number) => println!(
            "bought {} ({}), sms: {}, voice: {}",
            number.phone_number.friendly(),
            number.sid,
            number.capabilities.sms,
            number.capabilities.voice
        ),
        Err(err) => match err.service_error() {
            Some(service) => println!("rejected ({}): {}", service.status, service.title),
            None => return Err(err.into()),
        },
    }

    Ok(())
}
