use atelier::{
    domain::{CreateMemberRequest, CreateRewardRequest, CreateWorkshopRequest},
    repository::{
        MemberRepository, SqliteMemberRepository,
        RewardRepository, SqliteRewardRepository,
        SqliteWorkshopRepository,
    },
    service::workshop_service::WorkshopService,
};
use chrono::{Duration, Local, Timelike};
use clap::Parser;
use fake::{faker::name::en::Name, Fake};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

/// Populate a database with demo members, workshops and rewards.
#[derive(Parser, Debug)]
#[command(name = "seed")]
struct Args {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://atelier.db?mode=rwc")]
    database_url: String,

    /// Number of members to create
    #[arg(long, default_value_t = 12)]
    members: usize,
}

const WORKSHOPS: &[(&str, &str, u32, u8)] = &[
    ("Intro to Soldering", "Through-hole basics and safety", 10, 1),
    ("Laser Cutter Induction", "Required before booking the cutter", 15, 1),
    ("CNC Toolpaths", "From CAD model to G-code", 25, 3),
    ("Advanced Welding", "TIG on thin stock", 40, 5),
];

const REWARDS: &[(&str, u32)] = &[
    ("Workshop T-shirt", 50),
    ("Free laser hour", 120),
    ("Locker for a month", 200),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let member_repo = SqliteMemberRepository::new(db_pool.clone());
    let reward_repo = SqliteRewardRepository::new(db_pool.clone());
    let workshop_service = WorkshopService::new(Arc::new(SqliteWorkshopRepository::new(db_pool.clone())));

    // The first workshop runs this hour so the dashboard has something in session.
    println!("🛠️  Creating workshops...");
    let now = Local::now().naive_local();
    let mut workshop_ids = Vec::new();
    for (offset, (title, description, points, min_level)) in WORKSHOPS.iter().enumerate() {
        let starts = now + Duration::days(offset as i64);
        let workshop = workshop_service.create(CreateWorkshopRequest {
            title: title.to_string(),
            description: Some(description.to_string()),
            date: Some(starts.date()),
            time: Some(format!("{:02}:00", starts.hour())),
            location: None,
            points: Some(*points),
            min_level: Some(*min_level),
        }).await?;
        workshop_ids.push(workshop.id);

        // Ids are millisecond timestamps.
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    println!("  ✅ Created {} workshops", workshop_ids.len());

    println!("👥 Creating members...");
    for i in 0..args.members {
        let name: String = Name().fake();
        let member = member_repo.create(CreateMemberRequest { id: None, name }).await?;

        // Spread registrations so every workshop gets a handful of members.
        for (w, workshop_id) in workshop_ids.iter().enumerate() {
            if (i + w) % 2 == 0 {
                member_repo.register(&member.id, workshop_id).await?;
            }
        }
    }
    println!("  ✅ Created {} members", args.members);

    println!("🎁 Creating rewards...");
    for (title, cost) in REWARDS {
        reward_repo.create(CreateRewardRequest {
            title: title.to_string(),
            description: None,
            cost: *cost,
        }).await?;
    }
    println!("  ✅ Created {} rewards", reward_repo.list().await?.len());

    println!("🎉 Seeding complete!");
    Ok(())
}
