use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_cors_origins, parse_environment,
    parse_positive_u64, parse_u16, parse_u32,
};
use super::secret::load_or_create_secret_key;
use super::types::{
    ApiSettings, AssessmentSettings, ConfigError, CorsSettings, DatabaseSettings,
    RuntimeSettings, SecuritySettings, ServerHost, ServerPort, ServerSettings, Settings,
    TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("COURSEWORK_HOST", "0.0.0.0");
        let port = env_or_default("COURSEWORK_PORT", "8000");

        let environment = parse_environment(
            env_optional("COURSEWORK_ENV").or_else(|| env_optional("ENVIRONMENT")),
        );
        let strict_config = env_optional("COURSEWORK_STRICT_CONFIG")
            .map(|value| parse_bool(&value))
            .unwrap_or(false)
            || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "Coursework API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_v1_str = env_or_default("API_V1_STR", "/api/v1");

        let (secret_key, secret_key_generated) = match env_optional("SECRET_KEY") {
            Some(value) => (value, false),
            None => (load_or_create_secret_key(), true),
        };

        let algorithm = env_or_default("ALGORITHM", "HS256");

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "coursework");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "coursework_db");
        let database_url = env_optional("DATABASE_URL");
        let max_connections =
            parse_u32("DB_MAX_CONNECTIONS", env_or_default("DB_MAX_CONNECTIONS", "20"))?;

        let max_items_per_assessment = parse_positive_u64(
            "MAX_ITEMS_PER_ASSESSMENT",
            env_or_default("MAX_ITEMS_PER_ASSESSMENT", "100"),
        )?;

        let log_level = env_or_default("COURSEWORK_LOG_LEVEL", "info");
        let json =
            env_optional("COURSEWORK_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_v1_str },
            security: SecuritySettings {
                secret_key,
                secret_key_generated,
                algorithm,
            },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
                max_connections,
            },
            assessment: AssessmentSettings { max_items_per_assessment },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;

        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn assessment(&self) -> &AssessmentSettings {
        &self.assessment
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.security.algorithm != "HS256" {
            return Err(ConfigError::InvalidValue {
                field: "ALGORITHM",
                value: self.security.algorithm.clone(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DB_MAX_CONNECTIONS",
                value: String::from("0"),
            });
        }

        if self.runtime.strict_config && self.security.secret_key_generated {
            return Err(ConfigError::MissingSecret("SECRET_KEY"));
        }

        Ok(())
    }
}
