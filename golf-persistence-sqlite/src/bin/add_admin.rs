use golf_persistence_sqlite::{SqliteAdminRepository, connect_and_migrate};
use golf_server_app::domain::{AdminId, admin::AdminUser};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: add_admin <username> <password>");
        std::process::exit(1);
    }
    let username = args[1].trim();
    let password = &args[2];
    if username.is_empty() || password.is_empty() {
        eprintln!("Username and password must not be empty");
        std::process::exit(1);
    }

    let db_path = std::env::var("GOLF_DB_PATH").expect("GOLF_DB_PATH env var not set");
    let pool = connect_and_migrate(&db_path)
        .await
        .expect("Failed to open database");
    let admins = SqliteAdminRepository::new(pool);

    let password_hash =
        bcrypt::hash(password, bcrypt::DEFAULT_COST).expect("Failed to hash password");
    let admin = admins
        .upsert_admin(&AdminUser {
            id: AdminId::new(),
            username: username.to_string(),
            password_hash,
        })
        .await
        .expect("Failed to store admin");

    println!("Saved admin [{}] with id [{}]", admin.username, admin.id);
}
