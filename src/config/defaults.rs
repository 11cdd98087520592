use super::*;

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.porssisahko.net".to_string(),
            request_timeout_seconds: 10,
            user_agent: format!("porssi/{}", env!("APP_VERSION")),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: "Europe/Helsinki".to_string(),
            cheap_threshold: 5.0,
            expensive_threshold: 15.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: "/tmp/porssi.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8089,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
            web: WebConfig::default(),
            refresh_interval_minutes: 60,
        }
    }
}
