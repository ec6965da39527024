use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use jsonwebtoken::{EncodingKey, Header};
use uuid::Uuid;

/// Mint an HS256 bearer token accepted by the bookstore API (local testing only).
///
/// - Payload: `{ "id": <user uuid>, "iat": <unix>, "exp": <unix> }`
/// - Signed with the same shared secret the API reads from `JWT_SECRET`
/// - Outputs the token, or a ready-to-paste header with `--cookie` / `--header`
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// User id (users.userId). Default: random UUID v4 (resolves to 404 unless it exists).
    #[arg(long)]
    subject: Option<Uuid>,

    /// Lifetime in seconds. Negative values mint an already-expired token.
    #[arg(long, default_value_t = 3600, allow_hyphen_values = true)]
    ttl_seconds: i64,

    /// Override iat (unix seconds). Default: now.
    #[arg(long)]
    iat: Option<i64>,

    /// Shared HS256 secret.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    secret: String,

    /// Print `Cookie: token=<jwt>` instead of the bare token.
    #[arg(long, default_value_t = false, conflicts_with = "header")]
    cookie: bool,

    /// Print `Authorization: Bearer <jwt>` instead of the bare token.
    #[arg(long, default_value_t = false)]
    header: bool,

    /// Print only the token line (no extra lines)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn now_unix() -> Result<i64, Box<dyn std::error::Error>> {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    Ok(i64::try_from(secs)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.secret.is_empty() {
        return Err("secret must not be empty".into());
    }

    let subject = args.subject.unwrap_or_else(Uuid::new_v4);
    let iat = match args.iat {
        Some(iat) => iat,
        None => now_unix()?,
    };
    let exp = iat
        .checked_add(args.ttl_seconds)
        .filter(|exp| *exp >= 0)
        .ok_or("iat + ttl is out of range")?;

    let claims = serde_json::json!({
        "id": subject.to_string(),
        "iat": iat,
        "exp": exp,
    });

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(args.secret.as_bytes()),
    )?;

    let line = if args.cookie {
        format!("Cookie: token={}", token)
    } else if args.header {
        format!("Authorization: Bearer {}", token)
    } else {
        token
    };

    if args.quiet {
        println!("{}", line);
        return Ok(());
    }

    println!("{}", line);
    println!("subject: {}", subject);
    println!("iat: {}", iat);
    println!("exp: {}", exp);

    Ok(())
}
