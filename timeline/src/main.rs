use std::env;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use serde_json::{json, Value};
use shared::Table;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use timeline::backend::domain::{DragKind, PointerPosition};
use timeline::backend::storage::{InMemoryRowStore, StaticIdentity};
use timeline::{TimelineApp, TimelineConfig};

const DEMO_USER: &str = "demo-user";
const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "demo";

fn allocation_row(id: &str, member: &str, project: &str, start: NaiveDate, days: i64, percentage: u8) -> Value {
    let end = start + Duration::days(days - 1);
    json!({
        "id": id,
        "user_id": DEMO_USER,
        "team_member_id": member,
        "project_id": project,
        "start_date": start.format("%Y-%m-%d").to_string(),
        "end_date": end.format("%Y-%m-%d").to_string(),
        "percentage": percentage,
    })
}

fn seed_demo_data(store: &InMemoryRowStore, today: NaiveDate) -> Result<()> {
    store.seed(
        Table::TeamMembers,
        vec![
            json!({"id": "m1", "user_id": DEMO_USER, "name": "Ana Souza", "role": "Backend"}),
            json!({"id": "m2", "user_id": DEMO_USER, "name": "Bruno Lima", "role": "Design"}),
            json!({"id": "m3", "user_id": DEMO_USER, "name": "Carla Dias", "role": "Frontend"}),
        ],
    )?;
    store.seed(
        Table::Projects,
        vec![
            json!({"id": "p1", "user_id": DEMO_USER, "name": "Apollo", "color": "#ef4444"}),
            json!({"id": "p2", "user_id": DEMO_USER, "name": "Gemini", "color": "#22c55e"}),
        ],
    )?;
    store.seed(
        Table::Allocations,
        vec![
            allocation_row("a1", "m1", "p1", today, 5, 100),
            allocation_row("a2", "m2", "p2", today + Duration::days(2), 10, 50),
            allocation_row("a3", "m3", "p1", today + Duration::days(7), 3, 100),
        ],
    )?;
    Ok(())
}

fn log_grid(app: &TimelineApp<InMemoryRowStore, StaticIdentity>) {
    for row in app.grid_rows() {
        let blocks: Vec<String> = row
            .cells
            .iter()
            .filter_map(|cell| {
                cell.block.as_ref().map(|block| {
                    format!(
                        "{} {}d {} {}%",
                        cell.date, block.span_days, block.project_name, block.percentage.value()
                    )
                })
            })
            .collect();
        info!("{:<12} {}", row.member.name, blocks.join(" | "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = env::var("TIMELINE_CONFIG").unwrap_or_else(|_| "timeline_config.yaml".to_string());
    let config = TimelineConfig::load_or_default(&config_path)?;

    let today = Local::now().date_naive();
    let store = Arc::new(InMemoryRowStore::new());
    seed_demo_data(&store, today)?;
    let identity = Arc::new(StaticIdentity::anonymous().with_account(DEMO_EMAIL, DEMO_PASSWORD, DEMO_USER));

    let mut app = TimelineApp::new(config, store, identity);
    if !app.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await {
        warn!("Demo sign-in failed: {:?}", app.ui.error_message);
        return Ok(());
    }

    let header = app.header();
    info!(
        "Showing {} days across {} months and {} weeks",
        header.days.len(),
        header.months.len(),
        header.weeks.len()
    );
    log_grid(&app);

    // Move a1 two days right and one row down
    let width = app.timeline.geometry.width;
    let height = app.timeline.geometry.height;
    app.handle_pointer_down("a1", DragKind::Move, PointerPosition::new(0.0, 0.0));
    app.handle_pointer_move(PointerPosition::new(2.0 * width, height));
    match app.handle_pointer_up().await {
        Some(moved) => info!("Moved a1 to {} starting {}", moved.team_member_id, moved.start_date),
        None => warn!("Drag was not committed: {:?}", app.ui.error_message),
    }

    log_grid(&app);
    Ok(())
}
