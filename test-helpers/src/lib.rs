pub mod mock;
pub mod routes;
pub mod store;
pub mod telemetry;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use payloads::{
    APIClient, Award, Category, ClientConfig, Criterion, MediaChannel,
    Resource, User, requests,
};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::routes::AppState;

pub const ADMIN_EMAIL: &str = "admin@ejat.test";
const ADMIN_PASSWORD: &str = "correct-horse-battery";

/// Build the stand-in API server, but not await it.
///
/// Returns the port that the server has bound to by modifying the config.
pub fn build(
    config: &mut Config,
    state: web::Data<AppState>,
) -> std::io::Result<Server> {
    let allowed_origins = config.allowed_origins.clone();

    // OS assigns the port if binding to 0
    let listener = TcpListener::bind(format!("{}:{}", config.ip, config.port))?;
    config.port = listener.local_addr()?.port();
    let server = HttpServer::new(move || {
        let cors = if allowed_origins.iter().any(|origin| origin == "*") {
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
        } else {
            let mut cors =
                Cors::default().allow_any_method().allow_any_header();
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            cors
        };

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .service(routes::api_services())
            .app_data(state.clone())
    })
    .workers(2)
    .listen(listener)?
    .run();
    Ok(server)
}

pub struct Config {
    /// set to "0.0.0.0" for public access, "127.0.0.1" for local dev
    pub ip: String,
    /// set to 0 to get an os-assigned port
    pub port: u16,
    /// List of allowed CORS origins. Use "*" to allow any origin
    pub allowed_origins: Vec<String>,
    pub admin_email: String,
    pub admin_password: SecretString,
}

impl Config {
    /// Local defaults, used by the tests.
    pub fn local(port: u16) -> Self {
        Self {
            ip: "127.0.0.1".into(),
            port,
            allowed_origins: vec!["*".to_string()],
            admin_email: ADMIN_EMAIL.into(),
            admin_password: SecretString::from(ADMIN_PASSWORD),
        }
    }

    /// Read `IP_ADDRESS`, `PORT`, `ALLOWED_ORIGINS`, `ADMIN_EMAIL` and
    /// `ADMIN_PASSWORD`, falling back to the local defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        use std::env::var;

        let defaults = Self::local(0);
        let port = match var("PORT") {
            Ok(port) => port.parse()?,
            Err(_) => 8000,
        };
        let allowed_origins = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            ip: var("IP_ADDRESS").unwrap_or(defaults.ip),
            port,
            allowed_origins,
            admin_email: var("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: var("ADMIN_PASSWORD")
                .map(SecretString::from)
                .unwrap_or(defaults.admin_password),
        })
    }
}

/// Where the test client keeps its bearer token.
#[derive(Clone, Default)]
pub struct SessionToken(Arc<Mutex<Option<String>>>);

impl SessionToken {
    pub fn set(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(token.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = None;
        }
    }

    pub fn current(&self) -> Option<SecretString> {
        self.0
            .lock()
            .ok()?
            .as_deref()
            .map(SecretString::from)
    }
}

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    pub client: APIClient,
    pub session: SessionToken,
    pub state: web::Data<AppState>,
    credentials: requests::LoginCredentials,
}

impl TestApp {
    pub async fn login_admin(&self) -> anyhow::Result<()> {
        let session = self.client.login(&self.credentials).await?;
        self.session.set(session.token);
        Ok(())
    }

    pub fn logout(&self) {
        self.session.clear();
    }

    /// Server-side expiry: the client keeps sending its now-stale token.
    pub fn expire_sessions(&self) -> anyhow::Result<()> {
        self.state.revoke_sessions()?;
        Ok(())
    }

    /// A second client for the same server and session, with its own
    /// request timeout.
    pub fn client_with_timeout(&self, timeout: Duration) -> APIClient {
        let session = self.session.clone();
        let config = ClientConfig::new(self.client.address.clone())
            .with_timeout(Some(timeout));
        APIClient::new(&config).with_token_provider(move || session.current())
    }

    pub fn categories(&self) -> Resource<Category> {
        Resource::new(self.client.clone(), "/categories")
    }

    pub fn awards(&self) -> Resource<Award> {
        Resource::new(self.client.clone(), "/awards")
    }

    pub fn criteria(&self) -> Resource<Criterion> {
        Resource::new(self.client.clone(), "/criteria")
    }

    pub fn media_channels(&self) -> Resource<MediaChannel> {
        Resource::new(self.client.clone(), "/media-channels")
    }

    pub fn users(&self) -> Resource<User> {
        Resource::new(self.client.clone(), "/users")
    }

    pub async fn create_category(&self, name: &str) -> anyhow::Result<Category> {
        let details = requests::CreateCategory {
            name: name.into(),
            description: Some(format!("{name} journalism")),
        };
        Ok(self.categories().create(&details, "").await?.data)
    }

    /// Create `count` categories named "Category 01", "Category 02", ...
    pub async fn create_categories(
        &self,
        count: usize,
    ) -> anyhow::Result<Vec<Category>> {
        let mut categories = Vec::with_capacity(count);
        for i in 1..=count {
            categories.push(self.create_category(&format!("Category {i:02}")).await?);
        }
        Ok(categories)
    }

    pub async fn create_award(
        &self,
        name: &str,
        year: i32,
    ) -> anyhow::Result<Award> {
        let details = requests::CreateAward {
            name: name.into(),
            year,
            is_open: true,
        };
        Ok(self.awards().create(&details, "").await?.data)
    }
}

pub fn admin_credentials() -> requests::LoginCredentials {
    requests::LoginCredentials {
        email: ADMIN_EMAIL.into(),
        password: ADMIN_PASSWORD.into(),
    }
}

/// Start the stand-in API in the background and return a client for it.
pub fn spawn_app_with_config(mut config: Config) -> std::io::Result<TestApp> {
    let credentials = requests::LoginCredentials {
        email: config.admin_email.clone(),
        password: config.admin_password.expose_secret().to_string(),
    };
    let state = web::Data::new(AppState::new(
        config.admin_email.clone(),
        SecretString::from(config.admin_password.expose_secret()),
    ));

    let server = build(&mut config, state.clone())?;
    tokio::spawn(server);

    let session = SessionToken::default();
    let provider = session.clone();
    let client = APIClient::new(&ClientConfig::new(format!(
        "http://127.0.0.1:{}",
        config.port
    )))
    .with_token_provider(move || provider.current());

    Ok(TestApp {
        port: config.port,
        client,
        session,
        state,
        credentials,
    })
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    telemetry::init_for_tests();
    spawn_app_with_config(Config::local(port)).unwrap()
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, payloads::ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(payloads::ClientError::APIError(code, _)) => {
            assert_eq!(code, expected)
        }
        _ => panic!("Expected APIError"),
    };
}
