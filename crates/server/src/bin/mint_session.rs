//! Mint a development session token signed with `IDENTITY_JWT_SECRET`.
//!
//! Usage: `mint-session <identity-id> <email> [ttl-minutes]`
//!
//! Send the output as the `__session` cookie or a Bearer header to exercise
//! the API without the hosted identity provider.
use server::auth::jwt::create_session_token;
use server::config::IdentityConfig;
use shared_types::Identity;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let id = args.next().ok_or("missing <identity-id>")?;
    let email = args.next().ok_or("missing <email>")?;
    let ttl_minutes: i64 = args.next().map(|v| v.parse()).transpose()?.unwrap_or(60);

    let config = IdentityConfig::from_env();
    let secret = config
        .jwt_secret
        .ok_or("IDENTITY_JWT_SECRET must be set")?;

    let token = create_session_token(
        &Identity::new(id, email),
        &secret,
        config.issuer.as_deref(),
        chrono::Duration::minutes(ttl_minutes),
    )?;
    println!("{token}");
    Ok(())
}
