use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub mod climbs;
pub mod entity;
pub mod feedback;
pub mod gyms;
pub mod routes;
pub mod users;

pub async fn create_db_pool() -> DatabaseConnection {
    let db_path = std::env::var("CRUXLOG_DB").expect("CRUXLOG_DB env var not set");
    let db_url = format!("sqlite://{}?mode=rw", db_path);

    let mut opt = ConnectOptions::new(&db_url);
    opt.max_connections(5);

    Database::connect(opt)
        .await
        .expect("Failed to connect to database")
}

fn map_string_to_option(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn map_option_to_string(s: &Option<String>) -> String {
    s.clone().unwrap_or_default()
}
