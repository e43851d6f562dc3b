use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub slack_token: String,
    pub slack_api_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            slack_token: env::var("SLACK_BOT_TOKEN").expect("SLACK_BOT_TOKEN must be set"),
            slack_api_url: env::var("SLACK_API_URL").unwrap_or_else(|_| "https://slack.com/api".to_string()),
        }
    }
}
