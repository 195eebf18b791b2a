use std::sync::Arc;

use log::{LevelFilter, info};
use log4rs::{
    Config,
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::policy::compound::{
            CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
        },
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

use cruxlog_domain::{
    app::construct_app, climb::ArcClimbRepository, feedback::ArcFeedbackRepository,
    gym::ArcGymRepository, route::ArcRouteRepository, user::ArcUserRepository,
};
use cruxlog_persistence_sea_orm::{
    climbs::SqliteClimbRepository, create_db_pool, feedback::SqliteFeedbackRepository,
    gyms::SqliteGymRepository, routes::SqliteRouteRepository, users::SqliteUserRepository,
};

const LOG_SIZE_LIMIT: u64 = 10 * 1024 * 1024; // 10 MB

const LOG_FILE_COUNT: u32 = 3;

fn init_logger() {
    let file_path = std::env::var("LOG_FILE_PATH").expect("LOG_FILE_PATH must be set");
    let archive_pattern =
        std::env::var("LOG_ARCHIVE_PATTERN").expect("LOG_ARCHIVE_PATTERN must be set");

    let stderr_level = LevelFilter::Info;
    let file_level = LevelFilter::Debug;

    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();

    let trigger = SizeTrigger::new(LOG_SIZE_LIMIT);
    let roller = FixedWindowRoller::builder()
        .build(&archive_pattern, LOG_FILE_COUNT)
        .unwrap();
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    let logfile = log4rs::append::rolling_file::RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build(file_path, Box::new(policy))
        .unwrap();

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(file_level)))
                .build("logfile", Box::new(logfile)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(stderr_level)))
                .build("stderr", Box::new(stderr)),
        )
        .build(
            Root::builder()
                .appender("logfile")
                .appender("stderr")
                .build(LevelFilter::Trace),
        )
        .unwrap();

    let _handle = log4rs::init_config(config).expect("Failed to initialize logger");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().expect("Failed to load .env file");

    init_logger();

    let db = create_db_pool().await;

    let user_repository: ArcUserRepository =
        Arc::new(Box::new(SqliteUserRepository::new(db.clone())));
    let gym_repository: ArcGymRepository = Arc::new(Box::new(SqliteGymRepository::new(db.clone())));
    let route_repository: ArcRouteRepository =
        Arc::new(Box::new(SqliteRouteRepository::new(db.clone())));
    let climb_repository: ArcClimbRepository =
        Arc::new(Box::new(SqliteClimbRepository::new(db.clone())));
    let feedback_repository: ArcFeedbackRepository =
        Arc::new(Box::new(SqliteFeedbackRepository::new(db)));

    let app = construct_app(
        user_repository,
        gym_repository,
        route_repository,
        climb_repository,
        feedback_repository,
    );
    app.start().await;

    info!("Starting application");

    let http_app = tokio::spawn(async move {
        cruxlog_http_api::run(app, shutdown_signal()).await;
    });

    if let Err(e) = http_app.await {
        log::error!("HTTP API task failed: {}", e);
    }
}
