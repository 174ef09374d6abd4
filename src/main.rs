use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use gitapath::{
    content::{GitaClient, DEFAULT_HOST},
    db::Db,
    email::ResendEmailSender,
    models,
    services::{auth::AuthService, daily_quiz::DailyQuizService, google::GoogleOAuth},
    AppState,
};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// SQLite database location.
    #[arg(long, env, default_value = "sqlite://gitapath.db")]
    database_url: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Public URL of the site, used in email links and the OAuth redirect.
    #[arg(long, env, default_value = "http://127.0.0.1:1414")]
    base_url: String,

    /// Mark cookies `Secure` (serve over HTTPS).
    #[arg(long, env, default_value_t = false)]
    secure_cookies: bool,

    /// RapidAPI key for the Bhagavad Gita content API.
    #[arg(long, env)]
    rapidapi_key: Option<String>,

    #[arg(long, env, default_value = DEFAULT_HOST)]
    rapidapi_host: String,

    /// Overrides `https://{rapidapi_host}`.
    #[arg(long, env)]
    rapidapi_base_url: Option<String>,

    #[arg(long, env)]
    google_client_id: Option<String>,

    #[arg(long, env)]
    google_client_secret: Option<String>,

    /// Resend API key. Verification emails are skipped without it.
    #[arg(long, env)]
    resend_api_key: Option<String>,

    /// Comma separated emails of the admins.
    #[arg(long, env, default_value = "")]
    admin_emails: String,

    /// JSON quiz documents imported when no quiz is stored yet.
    #[arg(long, env)]
    seed_file: Option<std::path::PathBuf>,
}

async fn seed_quizzes(db: &Db, path: &std::path::Path) -> color_eyre::Result<()> {
    if db.count_quizzes().await? > 0 {
        tracing::debug!("quizzes already stored, skipping seed file");
        return Ok(());
    }

    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("could not read seed file {}", path.display()))?;
    let quizzes = match models::parse_upload(&json) {
        Ok(quizzes) => quizzes,
        Err(e) => bail!("invalid seed file {}: {e}", path.display()),
    };
    let ids = db.import_quizzes(&quizzes, None).await?;
    tracing::info!("seeded {} quizzes from {}", ids.len(), path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,tower_http=info,gitapath=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let db = Db::new(&args.database_url).await?;
    if let Some(path) = &args.seed_file {
        seed_quizzes(&db, path).await?;
    }

    let content = match args.rapidapi_base_url {
        Some(base_url) => GitaClient::with_base_url(base_url, args.rapidapi_host, args.rapidapi_key),
        None => GitaClient::new(args.rapidapi_host, args.rapidapi_key),
    };
    let google = GoogleOAuth::from_credentials(
        args.google_client_id,
        args.google_client_secret,
        &args.base_url,
    );
    if google.is_none() {
        tracing::info!("Google sign-in disabled, no client credentials configured");
    }

    let state = AppState {
        auth: AuthService::new(
            db.clone(),
            ResendEmailSender::new(args.resend_api_key),
            args.base_url,
        ),
        quizzes: DailyQuizService::new(db.clone()),
        content,
        google,
        admin_emails: gitapath::parse_admin_emails(&args.admin_emails),
        secure_cookies: args.secure_cookies,
        db,
    };

    let app = gitapath::router(state);
    let listener = tokio::net::TcpListener::bind(&args.address).await?;
    tracing::info!("listening on {}", args.address);
    axum::serve(listener, app).await?;

    Ok(())
}
