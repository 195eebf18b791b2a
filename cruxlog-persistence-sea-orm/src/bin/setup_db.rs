//! Creates the schema and seeds a starter gym so a fresh deployment has
//! routes to log against.

use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, Schema, Set,
};

use cruxlog_domain::grade::grade_info;
use cruxlog_persistence_sea_orm::entity::{climb, feedback, gym, route, user};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let db_path = std::env::var("CRUXLOG_DB").expect("CRUXLOG_DB env var not set");
    let db_url = format!("sqlite://{}?mode=rwc", db_path);

    let mut opt = ConnectOptions::new(&db_url);
    opt.max_connections(1);

    let db = Database::connect(opt)
        .await
        .expect("Failed to connect to database");

    create_tables(&db).await;
    seed_starter_gym(&db).await;

    println!("Database ready at {}", db_path);
}

async fn create_tables(db: &DatabaseConnection) {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = vec![
        schema.create_table_from_entity(user::Entity),
        schema.create_table_from_entity(gym::Entity),
        schema.create_table_from_entity(route::Entity),
        schema.create_table_from_entity(climb::Entity),
        schema.create_table_from_entity(feedback::Entity),
    ];
    for stmt in &mut statements {
        stmt.if_not_exists();
        db.execute(&*stmt)
            .await
            .expect("Failed to create table");
    }
}

async fn seed_starter_gym(db: &DatabaseConnection) {
    let gyms = gym::Entity::find()
        .count(db)
        .await
        .expect("Failed to count gyms");
    if gyms > 0 {
        return;
    }

    let gym = gym::ActiveModel {
        id: Default::default(),
        name: Set("Movement Gowanus".to_string()),
        location: Set("Brooklyn, NY".to_string()),
    }
    .insert(db)
    .await
    .expect("Failed to seed gym");

    let starter_routes = [
        ("yellow", "5.6"),
        ("green", "5.8"),
        ("blue", "5.9"),
        ("red", "5.10a"),
        ("purple", "5.10c"),
        ("orange", "5.11b"),
        ("black", "5.12a"),
    ];
    for (color, grade) in starter_routes {
        route::ActiveModel {
            id: Default::default(),
            gym_id: Set(gym.id),
            color: Set(color.to_string()),
            grade: Set(grade.to_string()),
            difficulty_rank: Set(grade_info(grade).difficulty_rank as i32),
            avg_stars: Set(0.0),
            stars_count: Set(0),
            active: Set(true),
        }
        .insert(db)
        .await
        .expect("Failed to seed route");
    }
}
